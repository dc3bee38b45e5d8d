//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! Every registry entry becomes a dynamic route that dispatches back into
//! the shared registry, so STDIO and HTTP go through the same table.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
};

use super::registry::ToolRegistry;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(registry: Arc<ToolRegistry>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    registry
        .entries()
        .fold(ToolRouter::new(), |router, entry| {
            let name = entry.name();
            let registry = registry.clone();
            router.with_route(ToolRoute::new_dyn(
                entry.tool().clone(),
                move |ctx: ToolCallContext<'_, S>| {
                    let registry = registry.clone();
                    let args = ctx.arguments.clone().unwrap_or_default();
                    async move { Ok::<_, ErrorData>(registry.call(name, args).await) }.boxed()
                },
            ))
        })
}

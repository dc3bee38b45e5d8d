//! Tool Registry - the dispatch table from tool name to Sage endpoint.
//!
//! The registry is built once at startup. Each entry pairs the rmcp `Tool`
//! metadata with the tool's request projection, so both the rmcp router and
//! the HTTP transport dispatch through the same table.

use std::collections::BTreeMap;

use rmcp::model::{CallToolResult, JsonObject, Tool};
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::ToolError;
use super::definitions::*;
use super::handlers::{SageTool, build_request, error_result, success_result, to_tool};
use crate::domains::sage::{ApiRequest, SageClient};

/// Projection from raw arguments to an API request.
type BuildFn = fn(JsonObject) -> Result<ApiRequest, ToolError>;

/// One row of the dispatch table.
#[derive(Clone)]
pub struct ToolEntry {
    name: &'static str,
    tool: Tool,
    build: BuildFn,
}

impl ToolEntry {
    /// Create the entry for a tool type.
    pub fn of<T: SageTool>() -> Self {
        Self {
            name: T::NAME,
            tool: to_tool::<T>(),
            build: build_request::<T>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tool(&self) -> &Tool {
        &self.tool
    }

    /// Project arguments into the request this tool would send.
    pub fn build(&self, arguments: JsonObject) -> Result<ApiRequest, ToolError> {
        (self.build)(arguments)
    }
}

/// Every tool the server exposes.
fn catalog() -> Vec<ToolEntry> {
    vec![
        ToolEntry::of::<ListContactsTool>(),
        ToolEntry::of::<GetContactTool>(),
        ToolEntry::of::<CreateContactTool>(),
        ToolEntry::of::<ListSalesInvoicesTool>(),
        ToolEntry::of::<GetSalesInvoiceTool>(),
        ToolEntry::of::<CreateSalesInvoiceTool>(),
        ToolEntry::of::<ListPurchaseInvoicesTool>(),
        ToolEntry::of::<GetPurchaseInvoiceTool>(),
        ToolEntry::of::<CreatePurchaseInvoiceTool>(),
        ToolEntry::of::<ListBankAccountsTool>(),
        ToolEntry::of::<GetBankAccountTool>(),
        ToolEntry::of::<ListProductsTool>(),
        ToolEntry::of::<GetProductTool>(),
        ToolEntry::of::<CreateProductTool>(),
        ToolEntry::of::<ListContactPaymentsTool>(),
        ToolEntry::of::<GetContactPaymentTool>(),
        ToolEntry::of::<CreateContactPaymentTool>(),
        ToolEntry::of::<ListLedgerAccountsTool>(),
        ToolEntry::of::<GetLedgerAccountTool>(),
        ToolEntry::of::<ListTaxRatesTool>(),
        ToolEntry::of::<GetBusinessInfoTool>(),
        ToolEntry::of::<ListOtherPaymentsTool>(),
        ToolEntry::of::<CreateOtherPaymentTool>(),
        ToolEntry::of::<CreateOtherReceiptTool>(),
    ]
}

/// Tool registry - owns the dispatch table and the Sage client it calls.
pub struct ToolRegistry {
    client: SageClient,
    entries: BTreeMap<&'static str, ToolEntry>,
}

impl ToolRegistry {
    /// Create a registry with every Sage tool registered.
    pub fn new(client: SageClient) -> Self {
        let entries = catalog()
            .into_iter()
            .map(|entry| (entry.name(), entry))
            .collect();
        Self { client, entries }
    }

    /// Get all tool names, sorted.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.entries.keys().copied().collect()
    }

    /// Get all tools as Tool models (metadata).
    pub fn tools(&self) -> Vec<Tool> {
        self.entries.values().map(|e| e.tool.clone()).collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = &ToolEntry> {
        self.entries.values()
    }

    pub fn client(&self) -> &SageClient {
        &self.client
    }

    /// Run a tool and return the decoded Sage response.
    #[instrument(skip(self, arguments))]
    pub async fn dispatch(&self, name: &str, arguments: JsonObject) -> Result<Value, ToolError> {
        let entry = self.entries.get(name).ok_or_else(|| {
            warn!("Unknown tool requested: {}", name);
            ToolError::not_found(name)
        })?;

        let request = entry.build(arguments)?;
        info!("{} {}", request.method.as_str(), request.path);

        Ok(self.client.execute(&request).await?)
    }

    /// Run a tool and wrap the outcome in the uniform result envelope.
    ///
    /// Failures come back as error-flagged results, never as protocol errors.
    pub async fn call(&self, name: &str, arguments: JsonObject) -> CallToolResult {
        match self.dispatch(name, arguments).await {
            Ok(value) => success_result(&value),
            Err(e) => error_result(&e),
        }
    }
}

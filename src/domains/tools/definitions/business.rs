//! Business information tool.

use schemars::JsonSchema;
use serde::Deserialize;

use crate::domains::sage::ApiRequest;
use crate::domains::tools::{SageTool, ToolError};

/// The tool takes no arguments.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NoParams {}

pub struct GetBusinessInfoTool;

impl SageTool for GetBusinessInfoTool {
    const NAME: &'static str = "sage_get_business_info";
    const DESCRIPTION: &'static str = "Get details of the businesses the access token can reach: name, address, region and subscription.";
    type Params = NoParams;

    fn request(_params: Self::Params) -> Result<ApiRequest, ToolError> {
        Ok(ApiRequest::get("/businesses"))
    }
}

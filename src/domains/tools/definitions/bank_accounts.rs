//! Bank account tools.

use schemars::JsonSchema;
use serde::Deserialize;

use super::common::{IdParams, Pagination, Query, resource_path};
use crate::domains::sage::ApiRequest;
use crate::domains::tools::{SageTool, ToolError};

const BANK_ACCOUNTS: &str = "/bank_accounts";

/// Parameters for listing bank accounts.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListBankAccountsParams {
    #[serde(flatten)]
    pub pagination: Pagination,
}

pub struct ListBankAccountsTool;

impl SageTool for ListBankAccountsTool {
    const NAME: &'static str = "sage_list_bank_accounts";
    const DESCRIPTION: &'static str = "List bank, cash and credit card accounts with their balances.";
    type Params = ListBankAccountsParams;

    fn request(params: Self::Params) -> Result<ApiRequest, ToolError> {
        let path = Query::new()
            .pagination(params.pagination)
            .to_path(BANK_ACCOUNTS)?;
        Ok(ApiRequest::get(path))
    }
}

pub struct GetBankAccountTool;

impl SageTool for GetBankAccountTool {
    const NAME: &'static str = "sage_get_bank_account";
    const DESCRIPTION: &'static str = "Get a single bank account by id.";
    type Params = IdParams;

    fn request(params: Self::Params) -> Result<ApiRequest, ToolError> {
        Ok(ApiRequest::get(resource_path(BANK_ACCOUNTS, &params.id)?))
    }
}

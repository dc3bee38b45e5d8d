//! Ledger account and tax rate tools.

use schemars::JsonSchema;
use serde::Deserialize;

use super::common::{IdParams, Pagination, Query, resource_path};
use crate::domains::sage::ApiRequest;
use crate::domains::tools::{SageTool, ToolError};

const LEDGER_ACCOUNTS: &str = "/ledger_accounts";
const TAX_RATES: &str = "/tax_rates";

/// Parameters for listing ledger accounts.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListLedgerAccountsParams {
    /// Account type, e.g. "SALES", "EXPENSES", "BANK", "CURRENT_ASSETS".
    pub ledger_account_type_id: Option<String>,

    /// Where the account is offered, e.g. "sales", "purchasing", "bank".
    pub visible_in: Option<String>,

    /// Search on account name and nominal code.
    pub search: Option<String>,

    #[serde(flatten)]
    pub pagination: Pagination,
}

pub struct ListLedgerAccountsTool;

impl SageTool for ListLedgerAccountsTool {
    const NAME: &'static str = "sage_list_ledger_accounts";
    const DESCRIPTION: &'static str = "List ledger (nominal) accounts from the chart of accounts. Use the ids when creating invoice or payment lines.";
    type Params = ListLedgerAccountsParams;

    fn request(params: Self::Params) -> Result<ApiRequest, ToolError> {
        let path = Query::new()
            .opt("ledger_account_type_id", params.ledger_account_type_id)
            .opt("visible_in", params.visible_in)
            .opt("search", params.search)
            .pagination(params.pagination)
            .to_path(LEDGER_ACCOUNTS)?;
        Ok(ApiRequest::get(path))
    }
}

pub struct GetLedgerAccountTool;

impl SageTool for GetLedgerAccountTool {
    const NAME: &'static str = "sage_get_ledger_account";
    const DESCRIPTION: &'static str = "Get a single ledger account by id.";
    type Params = IdParams;

    fn request(params: Self::Params) -> Result<ApiRequest, ToolError> {
        Ok(ApiRequest::get(resource_path(LEDGER_ACCOUNTS, &params.id)?))
    }
}

/// Parameters for listing tax rates.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListTaxRatesParams {
    #[serde(flatten)]
    pub pagination: Pagination,
}

pub struct ListTaxRatesTool;

impl SageTool for ListTaxRatesTool {
    const NAME: &'static str = "sage_list_tax_rates";
    const DESCRIPTION: &'static str = "List the tax rates available to the business. Use the ids as tax_rate_id on invoice lines.";
    type Params = ListTaxRatesParams;

    fn request(params: Self::Params) -> Result<ApiRequest, ToolError> {
        let path = Query::new()
            .pagination(params.pagination)
            .to_path(TAX_RATES)?;
        Ok(ApiRequest::get(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::handlers::build_request;
    use serde_json::json;

    #[test]
    fn test_list_ledger_accounts_filters() {
        let args = json!({"visible_in": "sales", "items_per_page": 100})
            .as_object()
            .cloned()
            .unwrap();
        let request = build_request::<ListLedgerAccountsTool>(args).unwrap();
        assert_eq!(request.path, "/ledger_accounts?visible_in=sales&items_per_page=100");
    }

    #[test]
    fn test_list_tax_rates() {
        let request = build_request::<ListTaxRatesTool>(Default::default()).unwrap();
        assert_eq!(request.path, "/tax_rates");
        assert!(request.body.is_none());
    }
}

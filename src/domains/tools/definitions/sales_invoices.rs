//! Sales invoice tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::{
    DateRange, IdParams, InvoiceLine, Pagination, Query, envelope, resource_path, today,
};
use crate::domains::sage::ApiRequest;
use crate::domains::tools::{SageTool, ToolError};

const SALES_INVOICES: &str = "/sales_invoices";

/// Filters shared by the sales and purchase invoice list tools.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListInvoicesParams {
    /// Only invoices for this contact.
    pub contact_id: Option<String>,

    /// Invoice status, e.g. "DRAFT", "UNPAID", "PART_PAID", "PAID", "VOID".
    pub status_id: Option<String>,

    #[serde(flatten)]
    pub dates: DateRange,

    /// Free-text search on invoice number and reference.
    pub search: Option<String>,

    #[serde(flatten)]
    pub pagination: Pagination,
}

impl ListInvoicesParams {
    pub(crate) fn to_path(self, collection: &str) -> Result<String, ToolError> {
        Query::new()
            .opt("contact_id", self.contact_id)
            .opt("status_id", self.status_id)
            .date_range(self.dates)
            .opt("search", self.search)
            .pagination(self.pagination)
            .to_path(collection)
    }
}

pub struct ListSalesInvoicesTool;

impl SageTool for ListSalesInvoicesTool {
    const NAME: &'static str = "sage_list_sales_invoices";
    const DESCRIPTION: &'static str = "List sales invoices. Filter by contact, status, date range or search text; results are paginated.";
    type Params = ListInvoicesParams;

    fn request(params: Self::Params) -> Result<ApiRequest, ToolError> {
        Ok(ApiRequest::get(params.to_path(SALES_INVOICES)?))
    }
}

pub struct GetSalesInvoiceTool;

impl SageTool for GetSalesInvoiceTool {
    const NAME: &'static str = "sage_get_sales_invoice";
    const DESCRIPTION: &'static str = "Get a single sales invoice by id, including its lines and payment status.";
    type Params = IdParams;

    fn request(params: Self::Params) -> Result<ApiRequest, ToolError> {
        Ok(ApiRequest::get(resource_path(SALES_INVOICES, &params.id)?))
    }
}

/// Parameters for creating a sales invoice.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateSalesInvoiceParams {
    /// Customer contact id.
    pub contact_id: String,

    /// Invoice date (YYYY-MM-DD). Defaults to today.
    pub date: Option<String>,

    /// Due date (YYYY-MM-DD). Sage derives it from the contact's terms when absent.
    pub due_date: Option<String>,

    pub reference: Option<String>,

    pub notes: Option<String>,

    /// Invoice lines.
    pub line_items: Vec<InvoiceLine>,
}

#[derive(Debug, Serialize)]
struct SalesInvoiceBody {
    contact_id: String,
    date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    invoice_lines: Vec<InvoiceLine>,
}

pub struct CreateSalesInvoiceTool;

impl SageTool for CreateSalesInvoiceTool {
    const NAME: &'static str = "sage_create_sales_invoice";
    const DESCRIPTION: &'static str = "Create a sales invoice for a customer. The date defaults to today; each line needs a description, quantity and unit price.";
    type Params = CreateSalesInvoiceParams;

    fn request(params: Self::Params) -> Result<ApiRequest, ToolError> {
        let body = SalesInvoiceBody {
            contact_id: params.contact_id,
            date: params.date.unwrap_or_else(today),
            due_date: params.due_date,
            reference: params.reference,
            notes: params.notes,
            invoice_lines: params.line_items,
        };
        Ok(ApiRequest::post(
            SALES_INVOICES,
            envelope("sales_invoice", &body)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::sage::HttpMethod;
    use crate::domains::tools::handlers::build_request;
    use serde_json::{Value, json};

    fn args(value: Value) -> rmcp::model::JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_create_defaults_date_to_today() {
        let request = build_request::<CreateSalesInvoiceTool>(args(json!({
            "contact_id": "C1",
            "line_items": [{"description": "Widget", "quantity": 2, "unit_price": 9.99}]
        })))
        .unwrap();

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.path, "/sales_invoices");

        let body = request.body.unwrap();
        let invoice = &body["sales_invoice"];
        assert_eq!(invoice["date"], json!(today()));
        assert_eq!(invoice["contact_id"], "C1");
        assert_eq!(
            invoice["invoice_lines"],
            json!([{"description": "Widget", "quantity": 2, "unit_price": 9.99}])
        );
        let line = invoice["invoice_lines"][0].as_object().unwrap();
        assert!(!line.contains_key("tax_rate_id"));
        assert!(!line.contains_key("ledger_account_id"));
        assert!(invoice.get("due_date").is_none());
        assert!(invoice.get("reference").is_none());
    }

    #[test]
    fn test_create_keeps_given_fields() {
        let request = build_request::<CreateSalesInvoiceTool>(args(json!({
            "contact_id": "C1",
            "date": "2024-01-31",
            "due_date": "2024-02-29",
            "reference": "PO-7",
            "line_items": [{
                "description": "Consulting",
                "quantity": 1.5,
                "unit_price": 100,
                "tax_rate_id": "GB_STANDARD",
                "ledger_account_id": "L4000"
            }]
        })))
        .unwrap();

        let body = request.body.unwrap();
        let invoice = &body["sales_invoice"];
        assert_eq!(invoice["date"], "2024-01-31");
        assert_eq!(invoice["due_date"], "2024-02-29");
        assert_eq!(invoice["reference"], "PO-7");
        assert_eq!(invoice["invoice_lines"][0]["tax_rate_id"], "GB_STANDARD");
        assert_eq!(invoice["invoice_lines"][0]["unit_price"], json!(100));
    }

    #[test]
    fn test_create_requires_lines() {
        let err =
            build_request::<CreateSalesInvoiceTool>(args(json!({"contact_id": "C1"}))).unwrap_err();
        assert!(err.to_string().contains("line_items"));
    }

    #[test]
    fn test_list_does_not_default_filters() {
        let request = build_request::<ListSalesInvoicesTool>(args(json!({}))).unwrap();
        assert_eq!(request.path, "/sales_invoices");
    }

    #[test]
    fn test_list_with_filters() {
        let request = build_request::<ListSalesInvoicesTool>(args(json!({
            "contact_id": "C1",
            "from_date": "2024-01-01",
            "items_per_page": 20
        })))
        .unwrap();
        assert_eq!(
            request.path,
            "/sales_invoices?contact_id=C1&from_date=2024-01-01&items_per_page=20"
        );
    }

    #[test]
    fn test_get_sales_invoice() {
        let request = build_request::<GetSalesInvoiceTool>(args(json!({"id": "SI-1"}))).unwrap();
        assert_eq!(request.path, "/sales_invoices/SI-1");
    }
}

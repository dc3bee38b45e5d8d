//! Purchase invoice tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::{IdParams, InvoiceLine, envelope, resource_path, today};
use super::sales_invoices::ListInvoicesParams;
use crate::domains::sage::ApiRequest;
use crate::domains::tools::{SageTool, ToolError};

const PURCHASE_INVOICES: &str = "/purchase_invoices";

pub struct ListPurchaseInvoicesTool;

impl SageTool for ListPurchaseInvoicesTool {
    const NAME: &'static str = "sage_list_purchase_invoices";
    const DESCRIPTION: &'static str = "List purchase invoices (bills from vendors). Filter by contact, status, date range or search text; results are paginated.";
    type Params = ListInvoicesParams;

    fn request(params: Self::Params) -> Result<ApiRequest, ToolError> {
        Ok(ApiRequest::get(params.to_path(PURCHASE_INVOICES)?))
    }
}

pub struct GetPurchaseInvoiceTool;

impl SageTool for GetPurchaseInvoiceTool {
    const NAME: &'static str = "sage_get_purchase_invoice";
    const DESCRIPTION: &'static str = "Get a single purchase invoice by id.";
    type Params = IdParams;

    fn request(params: Self::Params) -> Result<ApiRequest, ToolError> {
        Ok(ApiRequest::get(resource_path(PURCHASE_INVOICES, &params.id)?))
    }
}

/// Parameters for recording a purchase invoice.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreatePurchaseInvoiceParams {
    /// Vendor contact id.
    pub contact_id: String,

    /// Invoice date (YYYY-MM-DD). Defaults to today.
    pub date: Option<String>,

    pub due_date: Option<String>,

    pub reference: Option<String>,

    /// The vendor's own invoice number.
    pub vendor_reference: Option<String>,

    pub notes: Option<String>,

    /// Invoice lines.
    pub line_items: Vec<InvoiceLine>,
}

#[derive(Debug, Serialize)]
struct PurchaseInvoiceBody {
    contact_id: String,
    date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vendor_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    invoice_lines: Vec<InvoiceLine>,
}

pub struct CreatePurchaseInvoiceTool;

impl SageTool for CreatePurchaseInvoiceTool {
    const NAME: &'static str = "sage_create_purchase_invoice";
    const DESCRIPTION: &'static str = "Record a purchase invoice from a vendor. The date defaults to today.";
    type Params = CreatePurchaseInvoiceParams;

    fn request(params: Self::Params) -> Result<ApiRequest, ToolError> {
        let body = PurchaseInvoiceBody {
            contact_id: params.contact_id,
            date: params.date.unwrap_or_else(today),
            due_date: params.due_date,
            reference: params.reference,
            vendor_reference: params.vendor_reference,
            notes: params.notes,
            invoice_lines: params.line_items,
        };
        Ok(ApiRequest::post(
            PURCHASE_INVOICES,
            envelope("purchase_invoice", &body)?,
        ))
    }
}

//! Other payment and other receipt tools.
//!
//! Sage keeps both under `/other_payments`; the transaction type tells them
//! apart. Each line posts straight to a ledger account, with no invoice.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Number;

use super::common::{DateRange, Pagination, Query, envelope};
use crate::domains::sage::ApiRequest;
use crate::domains::tools::{SageTool, ToolError};

const OTHER_PAYMENTS: &str = "/other_payments";

/// Parameters for listing other payments and receipts.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListOtherPaymentsParams {
    /// "OTHER_PAYMENT" or "OTHER_RECEIPT". Both are listed when absent.
    pub transaction_type_id: Option<String>,

    #[serde(flatten)]
    pub dates: DateRange,

    #[serde(flatten)]
    pub pagination: Pagination,
}

pub struct ListOtherPaymentsTool;

impl SageTool for ListOtherPaymentsTool {
    const NAME: &'static str = "sage_list_other_payments";
    const DESCRIPTION: &'static str = "List other payments and other receipts (money in or out that is not linked to an invoice).";
    type Params = ListOtherPaymentsParams;

    fn request(params: Self::Params) -> Result<ApiRequest, ToolError> {
        let path = Query::new()
            .opt("transaction_type_id", params.transaction_type_id)
            .date_range(params.dates)
            .pagination(params.pagination)
            .to_path(OTHER_PAYMENTS)?;
        Ok(ApiRequest::get(path))
    }
}

/// A line of an other payment or receipt.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PaymentLine {
    /// Ledger account the line posts to.
    pub ledger_account_id: String,

    /// Line amount including tax.
    #[schemars(with = "f64")]
    pub total_amount: Number,

    /// Line description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_rate_id: Option<String>,
}

/// Parameters for recording an other payment or receipt.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct OtherPaymentParams {
    /// Bank account the money moved through.
    pub bank_account_id: String,

    /// Optional contact (payee or payer).
    pub contact_id: Option<String>,

    /// Transaction date (YYYY-MM-DD).
    pub date: String,

    /// Total amount including tax.
    #[schemars(with = "f64")]
    pub total_amount: Number,

    pub reference: Option<String>,

    /// Payment method, e.g. "BANK_TRANSFER", "CASH".
    pub payment_method_id: Option<String>,

    /// Ledger lines making up the total.
    pub payment_lines: Vec<PaymentLine>,
}

#[derive(Debug, Serialize)]
struct OtherPaymentBody {
    transaction_type_id: &'static str,
    bank_account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    contact_id: Option<String>,
    date: String,
    total_amount: Number,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_method_id: Option<String>,
    payment_lines: Vec<PaymentLine>,
}

fn other_payment(
    transaction_type_id: &'static str,
    params: OtherPaymentParams,
) -> Result<ApiRequest, ToolError> {
    let body = OtherPaymentBody {
        transaction_type_id,
        bank_account_id: params.bank_account_id,
        contact_id: params.contact_id,
        date: params.date,
        total_amount: params.total_amount,
        reference: params.reference,
        payment_method_id: params.payment_method_id,
        payment_lines: params.payment_lines,
    };
    Ok(ApiRequest::post(
        OTHER_PAYMENTS,
        envelope("other_payment", &body)?,
    ))
}

pub struct CreateOtherPaymentTool;

impl SageTool for CreateOtherPaymentTool {
    const NAME: &'static str = "sage_create_other_payment";
    const DESCRIPTION: &'static str = "Record money paid out of a bank account that is not linked to a purchase invoice, e.g. bank charges or wages.";
    type Params = OtherPaymentParams;

    fn request(params: Self::Params) -> Result<ApiRequest, ToolError> {
        other_payment("OTHER_PAYMENT", params)
    }
}

pub struct CreateOtherReceiptTool;

impl SageTool for CreateOtherReceiptTool {
    const NAME: &'static str = "sage_create_other_receipt";
    const DESCRIPTION: &'static str = "Record money received into a bank account that is not linked to a sales invoice, e.g. interest or grants.";
    type Params = OtherPaymentParams;

    fn request(params: Self::Params) -> Result<ApiRequest, ToolError> {
        other_payment("OTHER_RECEIPT", params)
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

    fn receipt_args() -> rmcp::model::JsonObject {
        args(json!({
            "bank_account_id": "B1",
            "date": "2024-05-01",
            "total_amount": 50,
            "payment_lines": [{"ledger_account_id": "L4900", "total_amount": 50, "details": "Interest"}]
        }))
    }

    #[test]
    fn test_receipt_sets_transaction_type() {
        let request = build_request::<CreateOtherReceiptTool>(receipt_args()).unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.path, "/other_payments");
        assert_eq!(
            request.body.unwrap(),
            json!({"other_payment": {
                "transaction_type_id": "OTHER_RECEIPT",
                "bank_account_id": "B1",
                "date": "2024-05-01",
                "total_amount": 50,
                "payment_lines": [{"ledger_account_id": "L4900", "total_amount": 50, "details": "Interest"}]
            }})
        );
    }

    #[test]
    fn test_payment_sets_transaction_type() {
        let request = build_request::<CreateOtherPaymentTool>(receipt_args()).unwrap();
        let body = request.body.unwrap();
        assert_eq!(body["other_payment"]["transaction_type_id"], "OTHER_PAYMENT");
        assert!(body["other_payment"].get("contact_id").is_none());
    }

    #[test]
    fn test_payment_requires_date() {
        let mut arguments = receipt_args();
        arguments.remove("date");
        let err = build_request::<CreateOtherPaymentTool>(arguments).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
        assert!(err.to_string().contains("date"));
    }

    #[test]
    fn test_list_other_payments_by_type() {
        let request = build_request::<ListOtherPaymentsTool>(args(json!({
            "transaction_type_id": "OTHER_RECEIPT"
        })))
        .unwrap();
        assert_eq!(request.path, "/other_payments?transaction_type_id=OTHER_RECEIPT");
    }
}

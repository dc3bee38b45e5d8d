//! Contact payment tools: customer receipts and vendor payments.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Number;

use super::common::{DateRange, IdParams, Pagination, Query, envelope, resource_path};
use crate::domains::sage::ApiRequest;
use crate::domains::tools::{SageTool, ToolError};

const CONTACT_PAYMENTS: &str = "/contact_payments";

/// Parameters for listing contact payments.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListContactPaymentsParams {
    /// Only payments for this contact.
    pub contact_id: Option<String>,

    /// "CUSTOMER_RECEIPT", "VENDOR_PAYMENT", "CUSTOMER_REFUND" or "VENDOR_REFUND".
    pub transaction_type_id: Option<String>,

    #[serde(flatten)]
    pub dates: DateRange,

    #[serde(flatten)]
    pub pagination: Pagination,
}

pub struct ListContactPaymentsTool;

impl SageTool for ListContactPaymentsTool {
    const NAME: &'static str = "sage_list_contact_payments";
    const DESCRIPTION: &'static str = "List payments received from customers and made to vendors.";
    type Params = ListContactPaymentsParams;

    fn request(params: Self::Params) -> Result<ApiRequest, ToolError> {
        let path = Query::new()
            .opt("contact_id", params.contact_id)
            .opt("transaction_type_id", params.transaction_type_id)
            .date_range(params.dates)
            .pagination(params.pagination)
            .to_path(CONTACT_PAYMENTS)?;
        Ok(ApiRequest::get(path))
    }
}

pub struct GetContactPaymentTool;

impl SageTool for GetContactPaymentTool {
    const NAME: &'static str = "sage_get_contact_payment";
    const DESCRIPTION: &'static str = "Get a single contact payment by id, including its allocations.";
    type Params = IdParams;

    fn request(params: Self::Params) -> Result<ApiRequest, ToolError> {
        Ok(ApiRequest::get(resource_path(CONTACT_PAYMENTS, &params.id)?))
    }
}

/// Allocation of a payment against an invoice.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Allocation {
    /// Id of the invoice or credit note being paid.
    pub artefact_id: String,

    /// Amount allocated to it.
    #[schemars(with = "f64")]
    pub amount: Number,
}

/// Parameters for recording a contact payment.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateContactPaymentParams {
    /// "CUSTOMER_RECEIPT" or "VENDOR_PAYMENT".
    pub transaction_type_id: String,

    pub contact_id: String,

    /// Bank account the money moved through.
    pub bank_account_id: String,

    /// Payment date (YYYY-MM-DD).
    pub date: String,

    /// Total amount of the payment.
    #[schemars(with = "f64")]
    pub total_amount: Number,

    pub reference: Option<String>,

    /// Payment method, e.g. "BANK_TRANSFER", "CASH", "CHEQUE", "CREDIT_DEBIT".
    pub payment_method_id: Option<String>,

    /// Invoices this payment settles.
    pub allocations: Option<Vec<Allocation>>,
}

#[derive(Debug, Serialize)]
struct ContactPaymentBody {
    transaction_type_id: String,
    contact_id: String,
    bank_account_id: String,
    date: String,
    total_amount: Number,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_method_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    allocated_artefacts: Option<Vec<Allocation>>,
}

pub struct CreateContactPaymentTool;

impl SageTool for CreateContactPaymentTool {
    const NAME: &'static str = "sage_create_contact_payment";
    const DESCRIPTION: &'static str = "Record a customer receipt or vendor payment, optionally allocated against invoices.";
    type Params = CreateContactPaymentParams;

    fn request(params: Self::Params) -> Result<ApiRequest, ToolError> {
        let body = ContactPaymentBody {
            transaction_type_id: params.transaction_type_id.to_uppercase(),
            contact_id: params.contact_id,
            bank_account_id: params.bank_account_id,
            date: params.date,
            total_amount: params.total_amount,
            reference: params.reference,
            payment_method_id: params.payment_method_id,
            allocated_artefacts: params.allocations,
        };
        Ok(ApiRequest::post(
            CONTACT_PAYMENTS,
            envelope("contact_payment", &body)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::handlers::build_request;
    use serde_json::{Value, json};

    fn args(value: Value) -> rmcp::model::JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_create_payment_with_allocations() {
        let request = build_request::<CreateContactPaymentTool>(args(json!({
            "transaction_type_id": "customer_receipt",
            "contact_id": "C1",
            "bank_account_id": "B1",
            "date": "2024-03-01",
            "total_amount": 120.5,
            "allocations": [{"artefact_id": "SI-1", "amount": 120.5}]
        })))
        .unwrap();

        assert_eq!(request.path, "/contact_payments");
        assert_eq!(
            request.body.unwrap(),
            json!({"contact_payment": {
                "transaction_type_id": "CUSTOMER_RECEIPT",
                "contact_id": "C1",
                "bank_account_id": "B1",
                "date": "2024-03-01",
                "total_amount": 120.5,
                "allocated_artefacts": [{"artefact_id": "SI-1", "amount": 120.5}]
            }})
        );
    }

    #[test]
    fn test_create_payment_requires_date() {
        let err = build_request::<CreateContactPaymentTool>(args(json!({
            "transaction_type_id": "VENDOR_PAYMENT",
            "contact_id": "V1",
            "bank_account_id": "B1",
            "total_amount": 10
        })))
        .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
        assert!(err.to_string().contains("date"));
    }

    #[test]
    fn test_create_payment_omits_absent_allocations() {
        let request = build_request::<CreateContactPaymentTool>(args(json!({
            "transaction_type_id": "VENDOR_PAYMENT",
            "contact_id": "V1",
            "bank_account_id": "B1",
            "date": "2024-03-02",
            "total_amount": 10
        })))
        .unwrap();
        let body = request.body.unwrap();
        let payment = body["contact_payment"].as_object().unwrap();
        assert_eq!(payment["date"], "2024-03-02");
        assert!(!payment.contains_key("allocated_artefacts"));
    }

    #[test]
    fn test_list_contact_payments() {
        let request = build_request::<ListContactPaymentsTool>(args(json!({
            "contact_id": "C1",
            "from_date": "2024-01-01",
            "to_date": "2024-01-31"
        })))
        .unwrap();
        assert_eq!(
            request.path,
            "/contact_payments?contact_id=C1&from_date=2024-01-01&to_date=2024-01-31"
        );
    }
}

//! Tool definitions module.
//!
//! One file per Sage resource. Each tool is a unit struct implementing
//! [`SageTool`](super::SageTool): a name, a description, a parameter type
//! whose schema is the tool's input schema, and a pure projection from those
//! parameters to an API request.

pub mod bank_accounts;
pub mod business;
pub mod common;
pub mod contact_payments;
pub mod contacts;
pub mod ledger_accounts;
pub mod other_payments;
pub mod products;
pub mod purchase_invoices;
pub mod sales_invoices;

pub use bank_accounts::{GetBankAccountTool, ListBankAccountsTool};
pub use business::GetBusinessInfoTool;
pub use contact_payments::{
    CreateContactPaymentTool, GetContactPaymentTool, ListContactPaymentsTool,
};
pub use contacts::{CreateContactTool, GetContactTool, ListContactsTool};
pub use ledger_accounts::{GetLedgerAccountTool, ListLedgerAccountsTool, ListTaxRatesTool};
pub use other_payments::{CreateOtherPaymentTool, CreateOtherReceiptTool, ListOtherPaymentsTool};
pub use products::{CreateProductTool, GetProductTool, ListProductsTool};
pub use purchase_invoices::{
    CreatePurchaseInvoiceTool, GetPurchaseInvoiceTool, ListPurchaseInvoicesTool,
};
pub use sales_invoices::{CreateSalesInvoiceTool, GetSalesInvoiceTool, ListSalesInvoicesTool};

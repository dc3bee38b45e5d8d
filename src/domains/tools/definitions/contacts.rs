//! Contact tools: customers and vendors.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::{IdParams, Pagination, Query, envelope, resource_path};
use crate::domains::sage::ApiRequest;
use crate::domains::tools::{SageTool, ToolError};

const CONTACTS: &str = "/contacts";

// ============================================================================
// sage_list_contacts
// ============================================================================

/// Parameters for listing contacts.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListContactsParams {
    /// Free-text search across name, reference and email.
    pub search: Option<String>,

    /// Restrict to one contact type: "CUSTOMER" or "VENDOR".
    pub contact_type_id: Option<String>,

    #[serde(flatten)]
    pub pagination: Pagination,
}

pub struct ListContactsTool;

impl SageTool for ListContactsTool {
    const NAME: &'static str = "sage_list_contacts";
    const DESCRIPTION: &'static str = "List customers and vendors in Sage Accounting. Supports free-text search, filtering by contact type and pagination.";
    type Params = ListContactsParams;

    fn request(params: Self::Params) -> Result<ApiRequest, ToolError> {
        let path = Query::new()
            .opt("search", params.search)
            .opt("contact_type_id", params.contact_type_id)
            .pagination(params.pagination)
            .to_path(CONTACTS)?;
        Ok(ApiRequest::get(path))
    }
}

// ============================================================================
// sage_get_contact
// ============================================================================

pub struct GetContactTool;

impl SageTool for GetContactTool {
    const NAME: &'static str = "sage_get_contact";
    const DESCRIPTION: &'static str = "Get a single contact by id, including addresses, contact persons and balances.";
    type Params = IdParams;

    fn request(params: Self::Params) -> Result<ApiRequest, ToolError> {
        Ok(ApiRequest::get(resource_path(CONTACTS, &params.id)?))
    }
}

// ============================================================================
// sage_create_contact
// ============================================================================

/// Parameters for creating a contact.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateContactParams {
    /// Contact name.
    pub name: String,

    /// Contact type: "CUSTOMER" or "VENDOR".
    #[schemars(description = "Contact type: 'CUSTOMER' or 'VENDOR'")]
    pub contact_type: String,

    /// Your own reference for the contact.
    pub reference: Option<String>,

    /// VAT or tax registration number.
    pub tax_number: Option<String>,

    pub notes: Option<String>,

    /// Email of the main contact person.
    pub email: Option<String>,

    /// Telephone of the main contact person.
    pub telephone: Option<String>,

    pub address_line_1: Option<String>,
    pub address_line_2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub region: Option<String>,

    /// ISO country code, e.g. "GB".
    pub country_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct ContactBody {
    name: String,
    contact_type_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tax_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    main_address: Option<AddressBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    main_contact_person: Option<ContactPersonBody>,
}

#[derive(Debug, Serialize)]
struct AddressBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    address_line_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address_line_2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    country_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct ContactPersonBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    telephone: Option<String>,
}

pub struct CreateContactTool;

impl SageTool for CreateContactTool {
    const NAME: &'static str = "sage_create_contact";
    const DESCRIPTION: &'static str = "Create a customer or vendor contact in Sage Accounting, optionally with a main address and contact details.";
    type Params = CreateContactParams;

    fn request(params: Self::Params) -> Result<ApiRequest, ToolError> {
        let address = AddressBody {
            address_line_1: params.address_line_1,
            address_line_2: params.address_line_2,
            city: params.city,
            postal_code: params.postal_code,
            region: params.region,
            country_id: params.country_id,
        };
        let has_address = address.address_line_1.is_some()
            || address.address_line_2.is_some()
            || address.city.is_some()
            || address.postal_code.is_some()
            || address.region.is_some()
            || address.country_id.is_some();

        let person = ContactPersonBody {
            email: params.email,
            telephone: params.telephone,
        };
        let has_person = person.email.is_some() || person.telephone.is_some();

        let body = ContactBody {
            name: params.name,
            contact_type_ids: vec![params.contact_type.to_uppercase()],
            reference: params.reference,
            tax_number: params.tax_number,
            notes: params.notes,
            main_address: has_address.then_some(address),
            main_contact_person: has_person.then_some(person),
        };

        Ok(ApiRequest::post(CONTACTS, envelope("contact", &body)?))
    }
}

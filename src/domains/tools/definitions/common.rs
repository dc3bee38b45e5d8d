//! Helpers shared by the Sage tool definitions.
//!
//! Query strings and request bodies only carry fields the caller actually
//! supplied. Sage treats presence, not value, as the filter signal, so an
//! absent option must never turn into `null` or an empty parameter.

use chrono::Local;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::domains::tools::ToolError;

/// Current local date in `YYYY-MM-DD` form.
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Pagination arguments accepted by every list tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct Pagination {
    /// Page number to return (starts at 1).
    pub page: Option<u32>,

    /// Number of items per page (Sage allows up to 200).
    pub items_per_page: Option<u32>,
}

/// Query string builder that skips absent values.
#[derive(Debug, Default)]
pub struct Query {
    pairs: Vec<(&'static str, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `key=value` only when `value` is present.
    pub fn opt<V: ToString>(mut self, key: &'static str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
        self
    }

    pub fn pagination(self, pagination: Pagination) -> Self {
        self.opt("page", pagination.page)
            .opt("items_per_page", pagination.items_per_page)
    }

    pub fn date_range(self, range: DateRange) -> Self {
        self.opt("from_date", range.from_date)
            .opt("to_date", range.to_date)
    }

    /// Append the encoded query to `path`, omitting `?` when empty.
    pub fn to_path(self, path: &str) -> Result<String, ToolError> {
        if self.pairs.is_empty() {
            return Ok(path.to_string());
        }
        let query = serde_urlencoded::to_string(&self.pairs)
            .map_err(|e| ToolError::internal(format!("Failed to encode query: {}", e)))?;
        Ok(format!("{}?{}", path, query))
    }
}

/// Path to a single record in `collection`.
pub fn resource_path(collection: &str, id: &str) -> Result<String, ToolError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ToolError::invalid_arguments("'id' must not be empty"));
    }
    if id
        .chars()
        .any(|c| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace())
    {
        return Err(ToolError::invalid_arguments(format!(
            "'id' contains characters not allowed in a Sage id: {}",
            id
        )));
    }
    Ok(format!("{}/{}", collection, id))
}

/// Wrap `fields` under the singular resource key Sage expects.
pub fn envelope<T: Serialize>(resource: &str, fields: &T) -> Result<Value, ToolError> {
    let fields = serde_json::to_value(fields)
        .map_err(|e| ToolError::internal(format!("Failed to encode {}: {}", resource, e)))?;
    let mut body = Map::new();
    body.insert(resource.to_string(), fields);
    Ok(Value::Object(body))
}

/// Arguments of the single-record fetch tools.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct IdParams {
    /// Sage id of the record.
    pub id: String,
}

/// An invoice line, shared by sales and purchase invoices.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InvoiceLine {
    /// Line description.
    pub description: String,

    /// Quantity of the item.
    #[schemars(with = "f64")]
    pub quantity: Number,

    /// Price per unit, excluding tax.
    #[schemars(with = "f64")]
    pub unit_price: Number,

    /// Tax rate id, e.g. "GB_STANDARD".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_rate_id: Option<String>,

    /// Ledger account the line posts to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_account_id: Option<String>,
}

/// Date filters shared by transaction list tools.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct DateRange {
    /// Only include records dated on or after this day (YYYY-MM-DD).
    pub from_date: Option<String>,

    /// Only include records dated on or before this day (YYYY-MM-DD).
    pub to_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_query_has_no_question_mark() {
        let path = Query::new()
            .opt::<String>("search", None)
            .pagination(Pagination::default())
            .to_path("/contacts")
            .unwrap();
        assert_eq!(path, "/contacts");
    }

    #[test]
    fn test_query_encodes_values_in_order() {
        let path = Query::new()
            .opt("search", Some("acme & sons"))
            .opt("page", Some(2))
            .to_path("/contacts")
            .unwrap();
        assert_eq!(path, "/contacts?search=acme+%26+sons&page=2");
    }

    #[test]
    fn test_resource_path_rejects_malformed_ids() {
        assert_eq!(resource_path("/contacts", " C1 ").unwrap(), "/contacts/C1");
        assert!(resource_path("/contacts", "").is_err());
        assert!(resource_path("/contacts", "a/b").is_err());
        assert!(resource_path("/contacts", "a?b=1").is_err());
        assert!(resource_path("/contacts", "a b").is_err());
    }

    #[test]
    fn test_envelope_wraps_fields() {
        let body = envelope("product", &json!({"description": "Widget"})).unwrap();
        assert_eq!(body, json!({"product": {"description": "Widget"}}));
    }

    #[test]
    fn test_invoice_line_omits_absent_options() {
        let line: InvoiceLine = serde_json::from_value(
            json!({"description": "Widget", "quantity": 2, "unit_price": 9.99, "tax_rate_id": null}),
        )
        .unwrap();
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(
            value,
            json!({"description": "Widget", "quantity": 2, "unit_price": 9.99})
        );
    }

    #[test]
    fn test_today_format() {
        let day = today();
        assert_eq!(day.len(), 10);
        assert!(chrono::NaiveDate::parse_from_str(&day, "%Y-%m-%d").is_ok());
    }
}

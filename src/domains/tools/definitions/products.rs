//! Product tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Number;

use super::common::{IdParams, Pagination, Query, envelope, resource_path};
use crate::domains::sage::ApiRequest;
use crate::domains::tools::{SageTool, ToolError};

const PRODUCTS: &str = "/products";

/// Price name Sage uses for a product's default selling price.
const SELLING_PRICE: &str = "Selling Price";

/// Parameters for listing products.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListProductsParams {
    /// Search on item code and description.
    pub search: Option<String>,

    /// Only active (true) or inactive (false) products.
    pub active: Option<bool>,

    #[serde(flatten)]
    pub pagination: Pagination,
}

pub struct ListProductsTool;

impl SageTool for ListProductsTool {
    const NAME: &'static str = "sage_list_products";
    const DESCRIPTION: &'static str = "List products. Supports search, an active flag and pagination.";
    type Params = ListProductsParams;

    fn request(params: Self::Params) -> Result<ApiRequest, ToolError> {
        let path = Query::new()
            .opt("search", params.search)
            .opt("active", params.active)
            .pagination(params.pagination)
            .to_path(PRODUCTS)?;
        Ok(ApiRequest::get(path))
    }
}

pub struct GetProductTool;

impl SageTool for GetProductTool {
    const NAME: &'static str = "sage_get_product";
    const DESCRIPTION: &'static str = "Get a single product by id, including prices and ledger accounts.";
    type Params = IdParams;

    fn request(params: Self::Params) -> Result<ApiRequest, ToolError> {
        Ok(ApiRequest::get(resource_path(PRODUCTS, &params.id)?))
    }
}

/// Parameters for creating a product.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateProductParams {
    /// Product description.
    pub description: String,

    /// Your code for the product (SKU).
    pub item_code: Option<String>,

    pub notes: Option<String>,

    /// Selling price, excluding tax.
    #[schemars(with = "Option<f64>")]
    pub sales_price: Option<Number>,

    /// Cost price.
    #[schemars(with = "Option<f64>")]
    pub cost_price: Option<Number>,

    /// Ledger account for sales of this product.
    pub sales_ledger_account_id: Option<String>,

    /// Ledger account for purchases of this product.
    pub purchase_ledger_account_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct ProductBody {
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    item_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cost_price: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sales_ledger_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    purchase_ledger_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sales_prices: Option<Vec<SalesPrice>>,
}

#[derive(Debug, Serialize)]
struct SalesPrice {
    price_name: &'static str,
    price: Number,
}

pub struct CreateProductTool;

impl SageTool for CreateProductTool {
    const NAME: &'static str = "sage_create_product";
    const DESCRIPTION: &'static str = "Create a product with an optional selling price, cost price and ledger accounts.";
    type Params = CreateProductParams;

    fn request(params: Self::Params) -> Result<ApiRequest, ToolError> {
        let body = ProductBody {
            description: params.description,
            item_code: params.item_code,
            notes: params.notes,
            cost_price: params.cost_price,
            sales_ledger_account_id: params.sales_ledger_account_id,
            purchase_ledger_account_id: params.purchase_ledger_account_id,
            sales_prices: params.sales_price.map(|price| {
                vec![SalesPrice {
                    price_name: SELLING_PRICE,
                    price,
                }]
            }),
        };
        Ok(ApiRequest::post(PRODUCTS, envelope("product", &body)?))
    }
}

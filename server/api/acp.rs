use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::error::ApiError;
use super::server::AppState;

const ACP_SEARCH_LIMIT: i64 = 5;

/// One entry of the ACP action catalog, shaped like a function-calling
/// schema so an agent runtime can wire these up directly.
#[derive(Debug, Serialize)]
pub struct AcpAction {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

pub fn action_catalog() -> Vec<AcpAction> {
    vec![
        AcpAction {
            name: "search_products",
            description: "Search for products by query across supported retailers",
            parameters: json!({
                "type": "object",
                "properties": {"query": {"type": "string"}, "retailer": {"type": "string"}},
            }),
        },
        AcpAction {
            name: "get_product",
            description: "Get product details by URL or ID",
            parameters: json!({
                "type": "object",
                "properties": {"url": {"type": "string"}},
            }),
        },
        AcpAction {
            name: "add_to_cart",
            description: "Add a product to cart for a specific retailer",
            parameters: json!({
                "type": "object",
                "properties": {"url": {"type": "string"}, "quantity": {"type": "integer"}},
            }),
        },
        AcpAction {
            name: "start_checkout",
            description: "Begin checkout flow (human approval in MVP)",
            parameters: json!({
                "type": "object",
                "properties": {"cart_id": {"type": "string"}},
            }),
        },
    ]
}

pub async fn handle_acp_actions() -> Json<Value> {
    Json(json!({ "actions": action_catalog() }))
}

#[derive(Debug, Deserialize)]
pub struct AcpInvoke {
    pub action: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Routes an agent action to the matching internal function. Cart and
/// checkout stay canned stubs until real retailer integrations exist.
pub async fn handle_acp_invoke(
    State(state): State<AppState>,
    Json(req): Json<AcpInvoke>,
) -> Result<Json<Value>, ApiError> {
    match req.action.as_str() {
        "search_products" => {
            let query = req
                .arguments
                .get("query")
                .and_then(Value::as_str)
                .unwrap_or("");
            let retailer = req.arguments.get("retailer").and_then(Value::as_str);
            let results = state.search.search(query, retailer, ACP_SEARCH_LIMIT)?;
            Ok(Json(json!({ "results": results })))
        }
        "get_product" => {
            let url = req
                .arguments
                .get("url")
                .and_then(Value::as_str)
                .ok_or_else(|| ApiError::bad_request("url required"))?;
            Ok(Json(json!({
                "product": {
                    "title": "Sample Product",
                    "price": 29.99,
                    "url": url,
                    "images": ["https://via.placeholder.com/640x480.png?text=Product"],
                    "specs": {"brand": "Demo", "warranty": "1y"},
                }
            })))
        }
        "add_to_cart" => Ok(Json(json!({ "cart_id": "demo-cart-123", "status": "added" }))),
        "start_checkout" => Ok(Json(
            json!({ "checkout": "manual-approval-required", "status": "pending" }),
        )),
        other => Err(ApiError::bad_request(format!("unknown action: {}", other))),
    }
}

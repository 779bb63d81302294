//! Request handlers

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::{
    api::{errors::ApiError, AppState},
    data::TraceContext,
    services::CatalogSyncService,
};

/// `GET /` - total number of nodes in the graph
pub async fn node_count(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let trace_ctx = TraceContext::for_operation("node_count");
    let count = state
        .graph_store
        .count_nodes(&trace_ctx)
        .await
        .map_err(|e| ApiError::InternalServerError(e.to_string()))?;

    Ok(Json(json!({ "nodeCount": count })))
}

pub async fn health_check() -> &'static str {
    "OK"
}

/// `GET /products` - pushes every graph product to the storefront and
/// returns the products that were synchronized.
pub async fn sync_products(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let trace_ctx = TraceContext::for_operation("sync_products");
    let service = CatalogSyncService::new(state.graph_store.clone(), state.catalog.clone());
    let report = service.sync(&trace_ctx).await?;

    Ok(Json(json!({
        "message": "Products synchronized successfully",
        "data": report.products,
    })))
}

/// `POST /webhooks/shopify` - acknowledges any payload.
pub async fn shopify_webhook(body: Bytes) -> impl IntoResponse {
    match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Object(map)) => {
            let keys: Vec<&String> = map.keys().collect();
            debug!(bytes = body.len(), ?keys, "Shopify webhook received");
        }
        _ => debug!(bytes = body.len(), "Shopify webhook received (non-object payload)"),
    }

    "Webhook received successfully"
}

#[derive(Debug, Deserialize)]
pub struct AuthCallbackParams {
    pub shop: Option<String>,
    pub code: Option<String>,
}

/// `GET /auth/callback?shop=&code=` - completes the OAuth install flow.
/// The token is not kept; only the granted scope is logged.
pub async fn auth_callback(
    State(state): State<AppState>,
    params: Result<Query<AuthCallbackParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::OAuthFailed(e.body_text()))?;
    let (shop, code) = match (params.shop, params.code) {
        (Some(shop), Some(code)) if !shop.is_empty() && !code.is_empty() => (shop, code),
        _ => {
            return Err(ApiError::OAuthFailed(
                "missing shop or code query parameter".to_string(),
            ))
        }
    };

    let token = state
        .auth
        .exchange_access_token(&shop, &code)
        .await
        .map_err(|e| ApiError::OAuthFailed(e.to_string()))?;

    info!(shop = %shop, scope = %token.scope, "OAuth access token granted");
    Ok("Authentication successful")
}

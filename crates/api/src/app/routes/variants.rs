use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};

use brickstore_core::{ProductId, VariantId};
use brickstore_infra::OperationContext;

use crate::app::routes::common;
use crate::app::{dto, errors, AppGateway};

pub fn router() -> Router {
    Router::new()
        .route("/:id/variants", get(get_variants).post(add_variant))
        .route("/:id/variants/:variant_id", put(rename_variant))
        .route(
            "/:id/variants/:variant_id/options",
            post(add_option).put(update_option),
        )
        .route(
            "/:id/variants/:variant_id/options/:value",
            axum::routing::delete(delete_option),
        )
}

fn parse_pair(
    id: &str,
    variant_id: &str,
) -> Result<(ProductId, VariantId), axum::response::Response> {
    Ok((common::parse_id(id)?, common::parse_id(variant_id)?))
}

pub async fn get_variants(
    Extension(gateway): Extension<Arc<AppGateway>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match gateway.get_variants(product_id) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

pub async fn add_variant(
    Extension(gateway): Extension<Arc<AppGateway>>,
    Path(id): Path<String>,
    Json(body): Json<dto::AddVariantRequest>,
) -> axum::response::Response {
    let product_id: ProductId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match gateway.add_variant(
        &OperationContext::anonymous(),
        product_id,
        &body.name,
        &body.options,
    ) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

pub async fn rename_variant(
    Extension(gateway): Extension<Arc<AppGateway>>,
    Path((id, variant_id)): Path<(String, String)>,
    Json(body): Json<dto::RenameVariantRequest>,
) -> axum::response::Response {
    let (product_id, variant_id) = match parse_pair(&id, &variant_id) {
        Ok(ids) => ids,
        Err(response) => return response,
    };

    match gateway.rename_variant(
        &OperationContext::anonymous(),
        product_id,
        variant_id,
        &body.name,
    ) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

pub async fn add_option(
    Extension(gateway): Extension<Arc<AppGateway>>,
    Path((id, variant_id)): Path<(String, String)>,
    Json(body): Json<dto::AddOptionRequest>,
) -> axum::response::Response {
    let (product_id, variant_id) = match parse_pair(&id, &variant_id) {
        Ok(ids) => ids,
        Err(response) => return response,
    };

    match gateway.add_variant_option(
        &OperationContext::anonymous(),
        product_id,
        variant_id,
        &body.value,
    ) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

pub async fn update_option(
    Extension(gateway): Extension<Arc<AppGateway>>,
    Path((id, variant_id)): Path<(String, String)>,
    Json(body): Json<dto::UpdateOptionRequest>,
) -> axum::response::Response {
    let (product_id, variant_id) = match parse_pair(&id, &variant_id) {
        Ok(ids) => ids,
        Err(response) => return response,
    };

    match gateway.update_variant_option(
        &OperationContext::anonymous(),
        product_id,
        variant_id,
        &body.old_value,
        &body.new_value,
    ) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

pub async fn delete_option(
    Extension(gateway): Extension<Arc<AppGateway>>,
    Path((id, variant_id, value)): Path<(String, String, String)>,
) -> axum::response::Response {
    let (product_id, variant_id) = match parse_pair(&id, &variant_id) {
        Ok(ids) => ids,
        Err(response) => return response,
    };

    match gateway.delete_variant_option(
        &OperationContext::anonymous(),
        product_id,
        variant_id,
        &value,
    ) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

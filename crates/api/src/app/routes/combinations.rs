use std::sync::Arc;

use axum::{
    extract::{Extension, Multipart, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{patch, post, put},
    Json, Router,
};

use brickstore_catalog::Selection;
use brickstore_core::{CombinationId, ProductId};
use brickstore_infra::OperationContext;

use crate::app::routes::common::{self, FormData};
use crate::app::{dto, errors, AppGateway};

pub fn router() -> Router {
    Router::new()
        .route("/:id/combinations", post(add_combination))
        .route(
            "/:id/combinations/:combo_id",
            put(update_combination).delete(delete_combination),
        )
        .route("/:id/combinations/:combo_id/price", patch(update_price))
}

/// The combination form ships its selections as a JSON string field.
fn read_selections(form: &FormData) -> Result<Vec<Selection>, axum::response::Response> {
    let raw = form.require("selections")?;
    let selections: Vec<Selection> = serde_json::from_str(raw).map_err(|_| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "field \"selections\" is not a valid selection list",
        )
    })?;
    Ok(selections)
}

pub async fn add_combination(
    Extension(gateway): Extension<Arc<AppGateway>>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> axum::response::Response {
    let product_id: ProductId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let form = match common::collect_multipart(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    let variant_key = match form.require("variantKey") {
        Ok(key) => key.to_string(),
        Err(response) => return response,
    };
    let selections = match read_selections(&form) {
        Ok(selections) => selections,
        Err(response) => return response,
    };
    let ctx = OperationContext::anonymous().with_uploads(form.into_uploads());

    match gateway.add_combination(&ctx, product_id, &variant_key, selections) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

pub async fn update_combination(
    Extension(gateway): Extension<Arc<AppGateway>>,
    Path((id, combo_id)): Path<(String, String)>,
    multipart: Multipart,
) -> axum::response::Response {
    let product_id: ProductId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let combo_id: CombinationId = match common::parse_id(&combo_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let form = match common::collect_multipart(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    let variant_key = match form.require("variantKey") {
        Ok(key) => key.to_string(),
        Err(response) => return response,
    };
    let selections = match read_selections(&form) {
        Ok(selections) => selections,
        Err(response) => return response,
    };
    let deleted_images = match form.json_string_list("deletedImages") {
        Ok(list) => list,
        Err(response) => return response,
    };
    let ctx = OperationContext::anonymous().with_uploads(form.into_uploads());

    match gateway.update_combination(
        &ctx,
        product_id,
        combo_id,
        &variant_key,
        selections,
        &deleted_images,
    ) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

pub async fn update_price(
    Extension(gateway): Extension<Arc<AppGateway>>,
    Path((id, combo_id)): Path<(String, String)>,
    Json(body): Json<dto::UpdatePriceRequest>,
) -> axum::response::Response {
    let product_id: ProductId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let combo_id: CombinationId = match common::parse_id(&combo_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match gateway.update_combination_price(
        &OperationContext::anonymous(),
        product_id,
        combo_id,
        body.new_value,
    ) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

pub async fn delete_combination(
    Extension(gateway): Extension<Arc<AppGateway>>,
    Path((id, combo_id)): Path<(String, String)>,
) -> axum::response::Response {
    let product_id: ProductId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let combo_id: CombinationId = match common::parse_id(&combo_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match gateway.delete_combination(&OperationContext::anonymous(), product_id, combo_id) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

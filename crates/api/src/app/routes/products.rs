use std::sync::Arc;

use axum::{
    extract::{Extension, Multipart, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};

use brickstore_catalog::{NewProduct, ProductEdit};
use brickstore_core::{BrandId, CategoryId, ProductId};
use brickstore_infra::OperationContext;

use crate::app::routes::common::{self, FormData};
use crate::app::{dto, errors, AppGateway};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_product))
        .route(
            "/:id",
            get(get_product).put(edit_product).delete(delete_product),
        )
        .route("/:id/active", patch(toggle_active))
        .route("/:id/variant-mode", patch(toggle_has_variants))
}

struct ProductForm {
    name: String,
    price: Option<u64>,
    category_id: CategoryId,
    brand_id: BrandId,
    product_info: String,
    usage: String,
    has_variants: bool,
}

fn read_product_form(form: &FormData) -> Result<ProductForm, axum::response::Response> {
    let name = form.require("name")?.to_string();
    let category_id: CategoryId = common::parse_id(form.require("categoryId")?)?;
    let brand_id: BrandId = common::parse_id(form.require("brandId")?)?;
    Ok(ProductForm {
        name,
        price: form.price("price"),
        category_id,
        brand_id,
        product_info: form.text("productInfo").unwrap_or_default().to_string(),
        usage: form.text("usage").unwrap_or_default().to_string(),
        has_variants: form.flag("hasVariants"),
    })
}

pub async fn create_product(
    Extension(gateway): Extension<Arc<AppGateway>>,
    multipart: Multipart,
) -> axum::response::Response {
    let form = match common::collect_multipart(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };
    let parsed = match read_product_form(&form) {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };

    let input = NewProduct {
        name: parsed.name,
        price: parsed.price,
        category_id: parsed.category_id,
        brand_id: parsed.brand_id,
        product_info: parsed.product_info,
        usage: parsed.usage,
        has_variants: parsed.has_variants,
    };
    let ctx = OperationContext::anonymous().with_uploads(form.into_uploads());

    match gateway.create_product(&ctx, input) {
        Ok(product) => {
            (StatusCode::CREATED, Json(dto::product_to_json(&product))).into_response()
        }
        Err(e) => errors::gateway_error_to_response(e),
    }
}

pub async fn edit_product(
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
    let parsed = match read_product_form(&form) {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };

    let edit = ProductEdit {
        name: parsed.name,
        price: parsed.price,
        category_id: parsed.category_id,
        brand_id: parsed.brand_id,
        product_info: parsed.product_info,
        usage: parsed.usage,
        has_variants: parsed.has_variants,
    };
    let ctx = OperationContext::anonymous().with_uploads(form.into_uploads());

    match gateway.edit_product(&ctx, product_id, edit) {
        Ok(product) => (StatusCode::OK, Json(dto::product_to_json(&product))).into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(gateway): Extension<Arc<AppGateway>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match gateway.get_product(product_id) {
        Ok(details) => {
            (StatusCode::OK, Json(dto::product_details_to_json(&details))).into_response()
        }
        Err(e) => errors::gateway_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(gateway): Extension<Arc<AppGateway>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match gateway.delete_product(&OperationContext::anonymous(), product_id) {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "id": id, "deleted": true })),
        )
            .into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

pub async fn toggle_active(
    Extension(gateway): Extension<Arc<AppGateway>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match gateway.toggle_active(&OperationContext::anonymous(), product_id) {
        Ok(is_active) => (
            StatusCode::OK,
            Json(serde_json::json!({ "id": id, "isActive": is_active })),
        )
            .into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

pub async fn toggle_has_variants(
    Extension(gateway): Extension<Arc<AppGateway>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match gateway.toggle_has_variants(&OperationContext::anonymous(), product_id) {
        Ok(has_variants) => (
            StatusCode::OK,
            Json(serde_json::json!({ "id": id, "hasVariants": has_variants })),
        )
            .into_response(),
        Err(e) => errors::gateway_error_to_response(e),
    }
}

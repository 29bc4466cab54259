use serde::Deserialize;
use serde_json::json;

use brickstore_catalog::Product;
use brickstore_infra::ProductDetails;

#[derive(Debug, Deserialize)]
pub struct AddVariantRequest {
    pub name: String,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenameVariantRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddOptionRequest {
    pub value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOptionRequest {
    pub old_value: String,
    pub new_value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePriceRequest {
    pub new_value: f64,
}

pub fn product_to_json(product: &Product) -> serde_json::Value {
    json!({
        "id": product.id_typed().to_string(),
        "name": product.name(),
        "price": product.price(),
        "categoryId": product.category_id().to_string(),
        "brandId": product.brand_id().to_string(),
        "productInfo": product.product_info(),
        "usage": product.usage(),
        "isActive": product.is_active(),
        "hasVariants": product.has_variants(),
        "images": product.images(),
        "createdAt": product.created_at(),
        "updatedAt": product.updated_at(),
    })
}

pub fn product_details_to_json(details: &ProductDetails) -> serde_json::Value {
    let mut value = product_to_json(&details.product);
    value["hasStockEntry"] = json!(details.has_stock_entries);
    value
}

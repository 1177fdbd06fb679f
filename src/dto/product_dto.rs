use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use validator::Validate;

use crate::models::product::Product;
use crate::utils::money::two_places;
use crate::utils::validation::validate_price;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProductPayload {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters."))]
    pub name: String,
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters."))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_price"))]
    pub price: Option<Decimal>,
}

impl From<CreateProductPayload> for UpdateProductPayload {
    fn from(value: CreateProductPayload) -> Self {
        Self {
            name: Some(value.name),
            price: Some(value.price),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, IntoParams)]
#[serde(default)]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    pub page: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
}

impl From<Product> for ProductResponse {
    fn from(value: Product) -> Self {
        Self {
            id: value.id,
            name: value.name,
            price: two_places(value.price),
        }
    }
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use validator::Validate;

use crate::models::customer::Customer;
use crate::utils::money::two_places;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCustomerPayload {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters."))]
    pub name: String,
    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 254, message = "Email must be at most 254 characters.")
    )]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct UpdateCustomerPayload {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters."))]
    pub name: Option<String>,
    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 254, message = "Email must be at most 254 characters.")
    )]
    pub email: Option<String>,
}

impl From<CreateCustomerPayload> for UpdateCustomerPayload {
    fn from(value: CreateCustomerPayload) -> Self {
        Self {
            name: Some(value.name),
            email: Some(value.email),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, IntoParams)]
#[serde(default)]
#[into_params(parameter_in = Query)]
pub struct CustomerListQuery {
    pub page: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub joined_on: DateTime<Utc>,
    pub total_spent: Decimal,
    pub order_count: i64,
}

impl From<Customer> for CustomerResponse {
    fn from(value: Customer) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            joined_on: value.joined_on,
            total_spent: two_places(value.total_spent),
            order_count: value.order_count,
        }
    }
}

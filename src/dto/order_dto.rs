use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use validator::Validate;

use crate::dto::customer_dto::CustomerResponse;
use crate::dto::product_dto::ProductResponse;
use crate::models::customer::Customer;
use crate::models::order::{total_price, Order, OrderItem, OrderSummary};
use crate::models::product::Product;
use crate::utils::money::two_places;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemPayload {
    pub product: i64,
    #[validate(range(min = 1, message = "Quantity must be at least 1."))]
    pub quantity: i32,
}

/// Used for both create and full replacement; `items` always replaces the
/// order's current lines.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrderPayload {
    pub customer: i64,
    #[validate(nested)]
    pub items: Vec<OrderItemPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct UpdateOrderPayload {
    pub customer: Option<i64>,
    #[validate(nested)]
    pub items: Option<Vec<OrderItemPayload>>,
}

impl From<CreateOrderPayload> for UpdateOrderPayload {
    fn from(value: CreateOrderPayload) -> Self {
        Self {
            customer: Some(value.customer),
            items: Some(value.items),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, IntoParams)]
#[serde(default)]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    pub page: Option<i64>,
    pub customer: Option<i64>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemResponse {
    pub id: i64,
    pub product: i64,
    pub product_details: ProductResponse,
    pub quantity: i32,
    pub subtotal: Decimal,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(value: OrderItem) -> Self {
        let subtotal = two_places(value.subtotal());
        Self {
            id: value.id,
            product: value.product_id,
            product_details: ProductResponse::from(Product {
                id: value.product_id,
                name: value.product_name,
                price: value.product_price,
            }),
            quantity: value.quantity,
            subtotal,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: i64,
    pub customer: i64,
    pub customer_details: CustomerResponse,
    pub order_date: DateTime<Utc>,
    pub items: Vec<OrderItemResponse>,
    pub total_price: Decimal,
}

/// An order with everything its detail representation embeds.
pub struct OrderDetail {
    pub order: Order,
    pub customer: Customer,
    pub items: Vec<OrderItem>,
}

impl From<OrderDetail> for OrderResponse {
    fn from(value: OrderDetail) -> Self {
        let total = two_places(total_price(&value.items));
        Self {
            id: value.order.id,
            customer: value.order.customer_id,
            customer_details: CustomerResponse::from(value.customer),
            order_date: value.order.order_date,
            items: value.items.into_iter().map(Into::into).collect(),
            total_price: total,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderListItemResponse {
    pub id: i64,
    pub customer: i64,
    pub customer_name: String,
    pub order_date: DateTime<Utc>,
    pub total_price: Decimal,
    pub item_count: i64,
}

impl From<OrderSummary> for OrderListItemResponse {
    fn from(value: OrderSummary) -> Self {
        Self {
            id: value.id,
            customer: value.customer_id,
            customer_name: value.customer_name,
            order_date: value.order_date,
            total_price: two_places(value.total_price),
            item_count: value.item_count,
        }
    }
}

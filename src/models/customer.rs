use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub joined_on: DateTime<Utc>,
    /// Σ quantity × current product price over every order the customer owns.
    pub total_spent: Decimal,
    pub order_count: i64,
}

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use crate::error::Result;
use crate::utils::time::DateRange;

/// Reports keep the five highest-ranked entries.
pub const TOP_N: usize = 5;

/// One line of a matched order, or the order alone when it has no items.
/// Prices are the products' current prices, not the price at sale time.
#[derive(Debug, Clone, FromRow)]
pub struct SaleLine {
    pub order_id: i64,
    pub order_date: DateTime<Utc>,
    pub customer_id: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub product_id: Option<i64>,
    pub product_name: Option<String>,
    pub product_price: Option<Decimal>,
    pub quantity: Option<i32>,
}

impl SaleLine {
    pub fn quantity(&self) -> i64 {
        self.quantity.map(i64::from).unwrap_or(0)
    }

    pub fn subtotal(&self) -> Decimal {
        match (self.quantity, self.product_price) {
            (Some(quantity), Some(price)) => Decimal::from(quantity) * price,
            _ => Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesSummary {
    pub total_sales: Decimal,
    pub total_orders: i64,
    pub total_customers: i64,
    pub total_products_sold: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSpend {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub total_spent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSales {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub total_quantity_sold: i64,
    pub total_revenue: Decimal,
}

pub fn summarize(lines: &[SaleLine]) -> SalesSummary {
    let mut orders = HashSet::new();
    let mut customers = HashSet::new();
    let mut total_sales = Decimal::ZERO;
    let mut total_products_sold = 0_i64;

    for line in lines {
        orders.insert(line.order_id);
        customers.insert(line.customer_id);
        total_sales += line.subtotal();
        total_products_sold += line.quantity();
    }

    SalesSummary {
        total_sales,
        total_orders: orders.len() as i64,
        total_customers: customers.len() as i64,
        total_products_sold,
    }
}

/// Customers by amount spent, descending; equal amounts fall back to
/// ascending id so the ranking is deterministic.
pub fn rank_customers(lines: &[SaleLine], limit: usize) -> Vec<CustomerSpend> {
    let mut by_customer: BTreeMap<i64, CustomerSpend> = BTreeMap::new();
    for line in lines {
        let entry = by_customer
            .entry(line.customer_id)
            .or_insert_with(|| CustomerSpend {
                id: line.customer_id,
                name: line.customer_name.clone(),
                email: line.customer_email.clone(),
                total_spent: Decimal::ZERO,
            });
        entry.total_spent += line.subtotal();
    }

    let mut ranking: Vec<CustomerSpend> = by_customer.into_values().collect();
    ranking.sort_by(|a, b| b.total_spent.cmp(&a.total_spent).then(a.id.cmp(&b.id)));
    ranking.truncate(limit);
    ranking
}

/// Products by units sold, descending; ties by ascending id.
pub fn rank_products(lines: &[SaleLine], limit: usize) -> Vec<ProductSales> {
    let mut by_product: BTreeMap<i64, ProductSales> = BTreeMap::new();
    for line in lines {
        let (Some(id), Some(name), Some(price)) =
            (line.product_id, line.product_name.as_ref(), line.product_price)
        else {
            continue;
        };
        let entry = by_product.entry(id).or_insert_with(|| ProductSales {
            id,
            name: name.clone(),
            price,
            total_quantity_sold: 0,
            total_revenue: Decimal::ZERO,
        });
        entry.total_quantity_sold += line.quantity();
        entry.total_revenue += line.subtotal();
    }

    let mut ranking: Vec<ProductSales> = by_product.into_values().collect();
    ranking.sort_by(|a, b| {
        b.total_quantity_sold
            .cmp(&a.total_quantity_sold)
            .then(a.id.cmp(&b.id))
    });
    ranking.truncate(limit);
    ranking
}

#[derive(Clone)]
pub struct AnalyticsService {
    pool: PgPool,
}

impl AnalyticsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Every order inside `range` joined with its items and their products.
    pub async fn load_sales(&self, range: &DateRange) -> Result<Vec<SaleLine>> {
        let lines = sqlx::query_as::<_, SaleLine>(
            r#"
            SELECT
                o.id AS order_id,
                o.order_date,
                c.id AS customer_id,
                c.name AS customer_name,
                c.email AS customer_email,
                p.id AS product_id,
                p.name AS product_name,
                p.price AS product_price,
                oi.quantity
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            LEFT JOIN order_items oi ON oi.order_id = o.id
            LEFT JOIN products p ON p.id = oi.product_id
            WHERE ($1::timestamptz IS NULL OR o.order_date >= $1)
              AND ($2::timestamptz IS NULL OR o.order_date <= $2)
            ORDER BY o.id, oi.id
            "#,
        )
        .bind(range.from)
        .bind(range.to)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(lines = lines.len(), ?range, "loaded sales lines");
        Ok(lines)
    }

    pub async fn sales_summary(&self, range: &DateRange) -> Result<SalesSummary> {
        let lines = self.load_sales(range).await?;
        Ok(summarize(&lines))
    }

    pub async fn top_customers(&self, range: &DateRange) -> Result<Vec<CustomerSpend>> {
        let lines = self.load_sales(range).await?;
        Ok(rank_customers(&lines, TOP_N))
    }

    pub async fn top_products(&self, range: &DateRange) -> Result<Vec<ProductSales>> {
        let lines = self.load_sales(range).await?;
        Ok(rank_products(&lines, TOP_N))
    }
}

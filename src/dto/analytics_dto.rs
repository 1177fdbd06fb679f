use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::error::Result;
use crate::services::analytics_service::{CustomerSpend, ProductSales, SalesSummary};
use crate::utils::money::to_float;
use crate::utils::time::{DateRange, DateRangeEcho};

#[derive(Debug, Clone, Serialize, Deserialize, Default, IntoParams)]
#[serde(default)]
#[into_params(parameter_in = Query)]
pub struct DateRangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl DateRangeQuery {
    pub fn resolve(&self) -> Result<DateRange> {
        DateRange::parse(self.from.as_deref(), self.to.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesSummaryResponse {
    pub total_sales: f64,
    pub total_orders: i64,
    pub total_customers: i64,
    pub total_products_sold: i64,
    pub date_range: Option<DateRangeEcho>,
}

impl SalesSummaryResponse {
    pub fn new(summary: SalesSummary, range: &DateRange) -> Self {
        Self {
            total_sales: to_float(summary.total_sales),
            total_orders: summary.total_orders,
            total_customers: summary.total_customers,
            total_products_sold: summary.total_products_sold,
            date_range: range.echo(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopCustomerEntry {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub total_spent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopCustomersResponse {
    pub top_customers: Vec<TopCustomerEntry>,
    pub date_range: Option<DateRangeEcho>,
}

impl TopCustomersResponse {
    pub fn new(ranking: Vec<CustomerSpend>, range: &DateRange) -> Self {
        Self {
            top_customers: ranking
                .into_iter()
                .map(|entry| TopCustomerEntry {
                    id: entry.id,
                    name: entry.name,
                    email: entry.email,
                    total_spent: to_float(entry.total_spent),
                })
                .collect(),
            date_range: range.echo(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopProductEntry {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub total_quantity_sold: i64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopProductsResponse {
    pub top_products: Vec<TopProductEntry>,
    pub date_range: Option<DateRangeEcho>,
}

impl TopProductsResponse {
    pub fn new(ranking: Vec<ProductSales>, range: &DateRange) -> Self {
        Self {
            top_products: ranking
                .into_iter()
                .map(|entry| TopProductEntry {
                    id: entry.id,
                    name: entry.name,
                    price: to_float(entry.price),
                    total_quantity_sold: entry.total_quantity_sold,
                    total_revenue: to_float(entry.total_revenue),
                })
                .collect(),
            date_range: range.echo(),
        }
    }
}

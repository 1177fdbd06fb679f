use std::collections::HashSet;

use sqlx::{PgPool, Postgres, Transaction};
use validator::ValidationErrors;

use crate::dto::order_dto::{
    CreateOrderPayload, OrderDetail, OrderItemPayload, OrderListQuery, UpdateOrderPayload,
};
use crate::dto::pagination::{Page, PageRequest};
use crate::error::{Error, Result};
use crate::models::order::{Order, OrderItem, OrderSummary};
use crate::services::customer_service::CustomerService;
use crate::utils::time::DateRange;
use crate::utils::validation::{missing_reference, EMPTY_ORDER_MESSAGE};

#[derive(Clone)]
pub struct OrderService {
    pool: PgPool,
    customers: CustomerService,
}

impl OrderService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            customers: CustomerService::new(pool.clone()),
            pool,
        }
    }

    /// Rejects the payload before anything is written: a supplied item list
    /// needs at least one line, and every referenced row must exist.
    async fn check_references(
        &self,
        customer: Option<i64>,
        items: Option<&[OrderItemPayload]>,
    ) -> Result<()> {
        if items.is_some_and(|items| items.is_empty()) {
            return Err(Error::BadRequest(EMPTY_ORDER_MESSAGE.into()));
        }

        let mut errors = ValidationErrors::new();
        if let Some(customer) = customer {
            if self.customers.find(customer).await?.is_none() {
                errors.add("customer", missing_reference(customer));
            }
        }

        let requested: Vec<i64> = items
            .unwrap_or_default()
            .iter()
            .map(|item| item.product)
            .collect();
        if !requested.is_empty() {
            let known: HashSet<i64> =
                sqlx::query_scalar::<_, i64>("SELECT id FROM products WHERE id = ANY($1)")
                    .bind(&requested)
                    .fetch_all(&self.pool)
                    .await?
                    .into_iter()
                    .collect();

            let mut reported = HashSet::new();
            for id in requested {
                if !known.contains(&id) && reported.insert(id) {
                    errors.add("items", missing_reference(id));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.into())
        }
    }

    async fn insert_items(
        tx: &mut Transaction<'_, Postgres>,
        order_id: i64,
        items: &[OrderItemPayload],
    ) -> Result<()> {
        for item in items {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity) VALUES ($1, $2, $3)",
            )
            .bind(order_id)
            .bind(item.product)
            .bind(item.quantity)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    /// Creates the order and its lines in one transaction.
    pub async fn create(&self, payload: CreateOrderPayload) -> Result<OrderDetail> {
        self.check_references(Some(payload.customer), Some(&payload.items))
            .await?;

        let mut tx = self.pool.begin().await?;
        let order_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO orders (customer_id) VALUES ($1) RETURNING id",
        )
        .bind(payload.customer)
        .fetch_one(&mut *tx)
        .await?;
        Self::insert_items(&mut tx, order_id, &payload.items).await?;
        tx.commit().await?;

        tracing::info!(
            order_id,
            customer_id = payload.customer,
            lines = payload.items.len(),
            "order created"
        );
        self.get_detail(order_id).await
    }

    /// Applies the supplied fields in one transaction. A supplied item list
    /// replaces every line of the order; without one the lines are untouched.
    pub async fn update(&self, id: i64, payload: UpdateOrderPayload) -> Result<OrderDetail> {
        if self.find(id).await?.is_none() {
            return Err(Error::NotFound("Order not found".into()));
        }
        self.check_references(payload.customer, payload.items.as_deref())
            .await?;

        let mut tx = self.pool.begin().await?;
        sqlx::query("UPDATE orders SET customer_id = COALESCE($2, customer_id) WHERE id = $1")
            .bind(id)
            .bind(payload.customer)
            .execute(&mut *tx)
            .await?;
        if let Some(items) = &payload.items {
            sqlx::query("DELETE FROM order_items WHERE order_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::insert_items(&mut tx, id, items).await?;
        }
        tx.commit().await?;

        tracing::info!(
            order_id = id,
            lines_replaced = payload.items.is_some(),
            "order updated"
        );
        self.get_detail(id).await
    }

    pub async fn find(&self, id: i64) -> Result<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            "SELECT id, customer_id, order_date FROM orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(order)
    }

    pub async fn items(&self, order_id: i64) -> Result<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT
                oi.id, oi.order_id, oi.product_id, oi.quantity,
                p.name AS product_name,
                p.price AS product_price
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id = $1
            ORDER BY oi.id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn get_detail(&self, id: i64) -> Result<OrderDetail> {
        let order = self
            .find(id)
            .await?
            .ok_or_else(|| Error::NotFound("Order not found".into()))?;
        let customer = self.customers.get_by_id(order.customer_id).await?;
        let items = self.items(order.id).await?;
        Ok(OrderDetail {
            order,
            customer,
            items,
        })
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Order not found".into()));
        }
        tracing::info!(order_id = id, "order deleted");
        Ok(())
    }

    /// Filters by owning customer and by an inclusive `order_date` window.
    pub async fn list(
        &self,
        query: &OrderListQuery,
        request: PageRequest,
    ) -> Result<Page<OrderSummary>> {
        let range = DateRange::parse(query.from.as_deref(), query.to.as_deref())?;
        let filters = r#"
            WHERE ($1::bigint IS NULL OR o.customer_id = $1)
              AND ($2::timestamptz IS NULL OR o.order_date >= $2)
              AND ($3::timestamptz IS NULL OR o.order_date <= $3)
        "#;

        let total_query = format!("SELECT COUNT(*) FROM orders o {}", filters);
        let total = sqlx::query_scalar::<_, i64>(&total_query)
            .bind(query.customer)
            .bind(range.from)
            .bind(range.to)
            .fetch_one(&self.pool)
            .await?;
        request.ensure_in_range(total)?;

        let items_query = format!(
            r#"
            SELECT
                o.id, o.customer_id, c.name AS customer_name, o.order_date,
                COALESCE(SUM(oi.quantity * p.price), 0)::numeric AS total_price,
                COUNT(oi.id) AS item_count
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            LEFT JOIN order_items oi ON oi.order_id = o.id
            LEFT JOIN products p ON p.id = oi.product_id
            {}
            GROUP BY o.id, c.name
            ORDER BY o.order_date DESC, o.id DESC
            LIMIT $4 OFFSET $5
            "#,
            filters
        );
        let items = sqlx::query_as::<_, OrderSummary>(&items_query)
            .bind(query.customer)
            .bind(range.from)
            .bind(range.to)
            .bind(request.per_page)
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(items, total, request))
    }
}

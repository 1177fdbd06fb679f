use crate::database::constraint::unique_violation;
use crate::dto::customer_dto::{CreateCustomerPayload, CustomerListQuery, UpdateCustomerPayload};
use crate::dto::pagination::{Page, PageRequest};
use crate::error::{Error, Result};
use crate::models::customer::Customer;
use crate::utils::validation::normalize_email;
use sqlx::PgPool;

const CUSTOMER_SELECT: &str = r#"
    SELECT
        c.id, c.name, c.email, c.joined_on,
        COALESCE((
            SELECT SUM(oi.quantity * p.price)
            FROM orders o
            JOIN order_items oi ON oi.order_id = o.id
            JOIN products p ON p.id = oi.product_id
            WHERE o.customer_id = c.id
        ), 0)::numeric AS total_spent,
        (SELECT COUNT(*) FROM orders o WHERE o.customer_id = c.id) AS order_count
    FROM customers c
"#;

#[derive(Clone)]
pub struct CustomerService {
    pool: PgPool,
}

fn map_write_error(err: sqlx::Error) -> Error {
    match unique_violation(&err) {
        Some("customers_email_key") => Error::field(
            "email",
            "unique",
            "customer with this email already exists.",
        ),
        _ => err.into(),
    }
}

impl CustomerService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateCustomerPayload) -> Result<Customer> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO customers (name, email) VALUES ($1, $2) RETURNING id",
        )
        .bind(payload.name.trim())
        .bind(normalize_email(&payload.email))
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        tracing::info!(customer_id = id, "customer created");
        self.get_by_id(id).await
    }

    pub async fn update(&self, id: i64, payload: UpdateCustomerPayload) -> Result<Customer> {
        let updated = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE customers
            SET
                name = COALESCE($2, name),
                email = COALESCE($3, email)
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(payload.name.as_deref().map(str::trim))
        .bind(payload.email.as_deref().map(normalize_email))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        match updated {
            Some(id) => self.get_by_id(id).await,
            None => Err(Error::NotFound("Customer not found".into())),
        }
    }

    pub async fn find(&self, id: i64) -> Result<Option<Customer>> {
        let sql = format!("{} WHERE c.id = $1", CUSTOMER_SELECT);
        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(customer)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Customer> {
        self.find(id)
            .await?
            .ok_or_else(|| Error::NotFound("Customer not found".into()))
    }

    /// Removing a customer removes their orders and order lines with them.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Customer not found".into()));
        }
        tracing::info!(customer_id = id, "customer deleted");
        Ok(())
    }

    pub async fn list(
        &self,
        _query: &CustomerListQuery,
        request: PageRequest,
    ) -> Result<Page<Customer>> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;
        request.ensure_in_range(total)?;

        let sql = format!(
            "{} ORDER BY c.joined_on DESC, c.id DESC LIMIT $1 OFFSET $2",
            CUSTOMER_SELECT
        );
        let items = sqlx::query_as::<_, Customer>(&sql)
            .bind(request.per_page)
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(items, total, request))
    }
}

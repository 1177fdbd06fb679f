use crate::database::constraint::is_check_violation;
use crate::dto::pagination::{Page, PageRequest};
use crate::dto::product_dto::{CreateProductPayload, ProductListQuery, UpdateProductPayload};
use crate::error::{Error, Result};
use crate::models::product::Product;
use crate::utils::validation::PRICE_MESSAGE;
use sqlx::PgPool;

#[derive(Clone)]
pub struct ProductService {
    pool: PgPool,
}

fn map_write_error(err: sqlx::Error) -> Error {
    if is_check_violation(&err) {
        return Error::field("price", "price", PRICE_MESSAGE);
    }
    err.into()
}

impl ProductService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateProductPayload) -> Result<Product> {
        let product = sqlx::query_as::<_, Product>(
            "INSERT INTO products (name, price) VALUES ($1, $2) RETURNING id, name, price",
        )
        .bind(payload.name.trim())
        .bind(payload.price.normalize())
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        tracing::info!(product_id = product.id, "product created");
        Ok(product)
    }

    pub async fn update(&self, id: i64, payload: UpdateProductPayload) -> Result<Product> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET
                name = COALESCE($2, name),
                price = COALESCE($3, price)
            WHERE id = $1
            RETURNING id, name, price
            "#,
        )
        .bind(id)
        .bind(payload.name.as_deref().map(str::trim))
        .bind(payload.price.map(|p| p.normalize()))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        product.ok_or_else(|| Error::NotFound("Product not found".into()))
    }

    pub async fn find(&self, id: i64) -> Result<Option<Product>> {
        let product =
            sqlx::query_as::<_, Product>("SELECT id, name, price FROM products WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(product)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Product> {
        self.find(id)
            .await?
            .ok_or_else(|| Error::NotFound("Product not found".into()))
    }

    /// Order lines referencing the product are removed with it.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Product not found".into()));
        }
        tracing::info!(product_id = id, "product deleted");
        Ok(())
    }

    pub async fn list(
        &self,
        _query: &ProductListQuery,
        request: PageRequest,
    ) -> Result<Page<Product>> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        request.ensure_in_range(total)?;

        let items = sqlx::query_as::<_, Product>(
            "SELECT id, name, price FROM products ORDER BY name, id LIMIT $1 OFFSET $2",
        )
        .bind(request.per_page)
        .bind(request.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(items, total, request))
    }
}

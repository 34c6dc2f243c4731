//! Postgres-backed order repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgConnection;
use sqlx::{FromRow, PgPool};

use cardhaus_core::{
    CustomerDetails, Email, OrderId, OrderLineId, OrderStatus, VariationId,
};

use crate::error::RepositoryError;
use crate::models::{NewOrderLine, Order, OrderLine};
use crate::repository::OrderRepository;

const ORDER_COLUMNS: &str =
    "id, status, customer_name, customer_email, shipping_address, notes, total, \
     created_at, updated_at";

#[derive(FromRow)]
struct OrderRow {
    id: i32,
    status: OrderStatus,
    customer_name: String,
    customer_email: String,
    shipping_address: String,
    notes: Option<String>,
    total: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, lines: Vec<OrderLine>) -> Result<Order, RepositoryError> {
        let email = Email::parse(&self.customer_email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Order {
            id: OrderId::new(self.id),
            status: self.status,
            customer: CustomerDetails {
                name: self.customer_name,
                email,
                shipping_address: self.shipping_address,
                notes: self.notes,
            },
            total: self.total,
            lines,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct OrderLineRow {
    id: i32,
    variation_id: i32,
    quantity: i32,
    unit_price: Decimal,
}

impl From<OrderLineRow> for OrderLine {
    fn from(row: OrderLineRow) -> Self {
        Self {
            id: OrderLineId::new(row.id),
            variation_id: VariationId::new(row.variation_id),
            quantity: row.quantity,
            unit_price: row.unit_price,
        }
    }
}

/// Order repository over `shop.orders` and `shop.order_line`.
#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    /// Create a repository over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn fetch_lines(
    conn: &mut PgConnection,
    order_id: OrderId,
) -> Result<Vec<OrderLine>, RepositoryError> {
    let rows: Vec<OrderLineRow> = sqlx::query_as(
        "SELECT id, variation_id, quantity, unit_price
         FROM shop.order_line WHERE order_id = $1 ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(OrderLine::from).collect())
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(
        &self,
        customer: CustomerDetails,
        lines: Vec<NewOrderLine>,
    ) -> Result<Order, RepositoryError> {
        let total: Decimal = lines.iter().map(NewOrderLine::line_total).sum();

        let mut tx = self.pool.begin().await?;

        let order_row: OrderRow = sqlx::query_as(&format!(
            "INSERT INTO shop.orders
                 (status, customer_name, customer_email, shipping_address, notes, total)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(OrderStatus::Pending)
        .bind(customer.name.as_str())
        .bind(customer.email.as_str())
        .bind(customer.shipping_address.as_str())
        .bind(customer.notes.as_deref())
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        let mut order_lines = Vec::with_capacity(lines.len());
        for line in &lines {
            let row: OrderLineRow = sqlx::query_as(
                "INSERT INTO shop.order_line (order_id, variation_id, quantity, unit_price)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id, variation_id, quantity, unit_price",
            )
            .bind(order_row.id)
            .bind(line.variation_id)
            .bind(line.quantity)
            .bind(line.unit_price)
            .fetch_one(&mut *tx)
            .await?;
            order_lines.push(OrderLine::from(row));
        }

        tx.commit().await?;
        order_row.into_order(order_lines)
    }

    async fn get(&self, order_id: OrderId) -> Result<Order, RepositoryError> {
        let mut conn = self.pool.acquire().await?;

        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.orders WHERE id = $1"
        ))
        .bind(order_id)
        .fetch_optional(&mut *conn)
        .await?;

        let Some(row) = row else {
            return Err(RepositoryError::NotFound(order_id));
        };

        let lines = fetch_lines(&mut *conn, order_id).await?;
        row.into_order(lines)
    }

    async fn transition(
        &self,
        order_id: OrderId,
        new_status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Row lock held until commit; a concurrent transition on the same
        // order waits here and then re-reads the already-moved status.
        let current: Option<OrderStatus> =
            sqlx::query_scalar("SELECT status FROM shop.orders WHERE id = $1 FOR UPDATE")
                .bind(order_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(current) = current else {
            return Err(RepositoryError::NotFound(order_id));
        };

        if !current.can_transition_to(new_status) {
            return Err(RepositoryError::IllegalTransition {
                from: current,
                requested: new_status,
            });
        }

        let order_row: OrderRow = sqlx::query_as(&format!(
            "UPDATE shop.orders SET status = $2, updated_at = now()
             WHERE id = $1
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(order_id)
        .bind(new_status)
        .fetch_one(&mut *tx)
        .await?;

        let lines = fetch_lines(&mut *tx, order_id).await?;
        tx.commit().await?;
        order_row.into_order(lines)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Order>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;

        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.orders
             ORDER BY created_at DESC, id DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&mut *conn)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let lines = fetch_lines(&mut *conn, OrderId::new(row.id)).await?;
            orders.push(row.into_order(lines)?);
        }
        Ok(orders)
    }
}

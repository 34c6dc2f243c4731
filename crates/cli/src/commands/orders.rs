//! Order inspection commands.

use cardhaus_core::OrderId;
use cardhaus_orders::models::Order;
use cardhaus_orders::pg::PgOrderRepository;
use cardhaus_orders::repository::OrderRepository;

/// List the most recently created orders.
///
/// # Errors
///
/// Returns an error on database failure.
pub async fn recent(limit: i64) -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    let repository = PgOrderRepository::new(pool);

    let orders = repository.list_recent(limit).await?;
    for order in &orders {
        print_order(order);
    }
    Ok(())
}

/// Show one order with its lines.
///
/// # Errors
///
/// Returns an error if the order does not exist or on database failure.
pub async fn show(order: i32) -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    let repository = PgOrderRepository::new(pool);

    let order = repository.get(OrderId::new(order)).await?;
    print_order(&order);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_order(order: &Order) {
    println!(
        "order {} [{}] {} <{}> total {} ({})",
        order.id,
        order.status,
        order.customer.name,
        order.customer.email,
        order.total,
        order.created_at.format("%Y-%m-%d %H:%M"),
    );
    for line in &order.lines {
        println!(
            "  variation {} x{} @ {}",
            line.variation_id, line.quantity, line.unit_price
        );
    }
}

pub mod errors;
pub mod menu_item;
pub mod order;
pub mod ports;
pub mod status;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use self::status::OrderStatus;

/// Lightweight projection of an order for list queries and statistics;
/// lines are not loaded.
#[derive(Debug, Clone)]
pub struct OrderSummary {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub restaurant_id: Uuid,
    pub status: OrderStatus,
    pub total_amount: BigDecimal,
    pub estimated_delivery_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

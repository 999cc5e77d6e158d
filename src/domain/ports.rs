use uuid::Uuid;

use super::errors::DomainError;
use super::order::Order;
use super::status::OrderStatus;
use super::OrderSummary;

/// Persistence port for the order lifecycle.
///
/// Mutating operations are use-case grained: each one is executed by the
/// implementation as a single atomic unit (one database transaction), which
/// is what lets placement and cancellation keep their all-or-nothing
/// contract and the stock invariant under concurrency.
pub trait OrderRepository: Send + Sync + 'static {
    fn create(
        &self,
        customer_id: Uuid,
        restaurant_id: Uuid,
        delivery_address: String,
        contact_phone: String,
        notes: Option<String>,
    ) -> Result<Order, DomainError>;

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError>;
    fn find_by_customer(&self, customer_id: Uuid) -> Result<Vec<OrderSummary>, DomainError>;
    fn find_by_restaurant(&self, restaurant_id: Uuid) -> Result<Vec<OrderSummary>, DomainError>;
    fn find_by_status(&self, status: OrderStatus) -> Result<Vec<OrderSummary>, DomainError>;
    fn find_active(&self) -> Result<Vec<OrderSummary>, DomainError>;

    fn add_item(&self, order_id: Uuid, menu_item_id: Uuid, quantity: i32)
        -> Result<Order, DomainError>;
    fn remove_item(&self, order_id: Uuid, menu_item_id: Uuid) -> Result<Order, DomainError>;
    fn update_item_quantity(
        &self,
        order_id: Uuid,
        menu_item_id: Uuid,
        quantity: i32,
    ) -> Result<Order, DomainError>;

    fn place(&self, order_id: Uuid) -> Result<Order, DomainError>;
    fn cancel(&self, order_id: Uuid, reason: Option<String>) -> Result<Order, DomainError>;
    fn update_status(&self, order_id: Uuid, status: OrderStatus) -> Result<Order, DomainError>;
}

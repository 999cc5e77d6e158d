use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::Order;
use crate::domain::ports::OrderRepository;
use crate::domain::status::OrderStatus;
use crate::domain::OrderSummary;

/// Application service over the order repository port.
///
/// Validates request input, then delegates; all stateful rules (cart
/// invariants, stock, transitions) live in the domain aggregate and the
/// repository's transactions.
#[derive(Clone)]
pub struct OrderService<R> {
    repo: R,
}

/// Read-side aggregation over one customer's order history.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerOrderStatistics {
    pub total_orders: i64,
    pub completed_orders: i64,
    pub cancelled_orders: i64,
    /// Sum of order totals over delivered orders only.
    pub total_spent: BigDecimal,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_order(
        &self,
        customer_id: Uuid,
        restaurant_id: Uuid,
        delivery_address: &str,
        contact_phone: &str,
        notes: Option<String>,
    ) -> Result<Order, DomainError> {
        let address = require_text("delivery_address", delivery_address, 500)?;
        let phone = require_text("contact_phone", contact_phone, 32)?;
        self.repo
            .create(customer_id, restaurant_id, address, phone, notes)
    }

    pub fn add_item(
        &self,
        order_id: Uuid,
        menu_item_id: Uuid,
        quantity: i32,
    ) -> Result<Order, DomainError> {
        if quantity <= 0 {
            return Err(DomainError::Validation(format!(
                "quantity must be positive, got {quantity}"
            )));
        }
        self.repo.add_item(order_id, menu_item_id, quantity)
    }

    pub fn remove_item(&self, order_id: Uuid, menu_item_id: Uuid) -> Result<Order, DomainError> {
        self.repo.remove_item(order_id, menu_item_id)
    }

    /// A non-positive quantity behaves as removal, so no validation here.
    pub fn update_quantity(
        &self,
        order_id: Uuid,
        menu_item_id: Uuid,
        quantity: i32,
    ) -> Result<Order, DomainError> {
        self.repo
            .update_item_quantity(order_id, menu_item_id, quantity)
    }

    pub fn place_order(&self, order_id: Uuid) -> Result<Order, DomainError> {
        self.repo.place(order_id)
    }

    pub fn cancel_order(
        &self,
        order_id: Uuid,
        reason: Option<String>,
    ) -> Result<Order, DomainError> {
        self.repo.cancel(order_id, reason)
    }

    pub fn update_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<Order, DomainError> {
        self.repo.update_status(order_id, status)
    }

    pub fn get_order(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        self.repo.find_by_id(id)
    }

    pub fn get_customer_orders(&self, customer_id: Uuid) -> Result<Vec<OrderSummary>, DomainError> {
        self.repo.find_by_customer(customer_id)
    }

    pub fn get_restaurant_orders(
        &self,
        restaurant_id: Uuid,
    ) -> Result<Vec<OrderSummary>, DomainError> {
        self.repo.find_by_restaurant(restaurant_id)
    }

    pub fn get_orders_by_status(
        &self,
        status: OrderStatus,
    ) -> Result<Vec<OrderSummary>, DomainError> {
        self.repo.find_by_status(status)
    }

    pub fn get_active_orders(&self) -> Result<Vec<OrderSummary>, DomainError> {
        self.repo.find_active()
    }

    pub fn get_pending_orders(&self) -> Result<Vec<OrderSummary>, DomainError> {
        self.repo.find_by_status(OrderStatus::Pending)
    }

    pub fn get_customer_order_statistics(
        &self,
        customer_id: Uuid,
    ) -> Result<CustomerOrderStatistics, DomainError> {
        let orders = self.repo.find_by_customer(customer_id)?;
        Ok(statistics_over(&orders))
    }
}

/// Stateless fold producing the per-customer statistics projection.
fn statistics_over(orders: &[OrderSummary]) -> CustomerOrderStatistics {
    let mut stats = CustomerOrderStatistics {
        total_orders: orders.len() as i64,
        completed_orders: 0,
        cancelled_orders: 0,
        total_spent: BigDecimal::from(0),
    };
    for order in orders {
        match order.status {
            OrderStatus::Delivered => {
                stats.completed_orders += 1;
                stats.total_spent += &order.total_amount;
            }
            OrderStatus::Cancelled => stats.cancelled_orders += 1,
            _ => {}
        }
    }
    stats
}

fn require_text(field: &str, value: &str, max_len: usize) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{field} must not be empty")));
    }
    if trimmed.len() > max_len {
        return Err(DomainError::Validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(trimmed.to_string())
}

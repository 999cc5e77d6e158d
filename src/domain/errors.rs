use thiserror::Error;

use super::status::OrderStatus;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Order not found")]
    OrderNotFound,
    #[error("Menu item not found")]
    MenuItemNotFound,
    #[error("Restaurant not found")]
    RestaurantNotFound,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Restaurant is not accepting orders")]
    RestaurantNotApproved,
    #[error("Menu item '{0}' is not available")]
    ItemNotAvailable(String),
    #[error("Menu item belongs to a different restaurant")]
    ItemFromOtherRestaurant,
    #[error("Insufficient stock for '{name}': requested {requested}, {in_stock} in stock")]
    InsufficientStock {
        name: String,
        requested: i32,
        in_stock: i32,
    },
    #[error("Order can no longer be modified (status {0})")]
    OrderNotModifiable(OrderStatus),
    #[error("Cannot place an empty order")]
    EmptyOrder,
    #[error("Invalid status transition {from} -> {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },
    #[error("Order cannot be cancelled from status {0}")]
    NotCancellable(OrderStatus),

    /// A placement lost the race for the last units of stock: the re-check
    /// under lock saw less stock than the cart pre-check did. Retryable by
    /// the client, unlike `InsufficientStock`.
    #[error("Stock for '{name}' was consumed by a concurrent order")]
    StockConflict { name: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

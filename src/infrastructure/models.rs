use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::menu_item::MenuItem;
use crate::domain::order::{Order, OrderLine};
use crate::domain::status::OrderStatus;
use crate::domain::OrderSummary;
use crate::schema::{menu_items, order_lines, order_outbox, orders, restaurants};

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = restaurants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RestaurantRow {
    pub id: Uuid,
    pub name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = restaurants)]
pub struct NewRestaurantRow {
    pub id: Uuid,
    pub name: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = menu_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MenuItemRow {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub available: bool,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MenuItemRow {
    pub fn into_domain(self) -> MenuItem {
        MenuItem {
            id: self.id,
            restaurant_id: self.restaurant_id,
            name: self.name,
            price: self.price,
            available: self.available,
            quantity: self.quantity,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = menu_items)]
pub struct NewMenuItemRow {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub available: bool,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub restaurant_id: Uuid,
    pub status: String,
    pub delivery_address: String,
    pub contact_phone: String,
    pub notes: Option<String>,
    pub total_amount: BigDecimal,
    pub estimated_delivery_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn parse_status(&self) -> Result<OrderStatus, DomainError> {
        self.status
            .parse()
            .map_err(|e: crate::domain::status::UnknownStatus| DomainError::Internal(e.to_string()))
    }

    /// Rehydrate the aggregate from this row and its line rows.
    pub fn into_domain(self, lines: Vec<OrderLineRow>) -> Result<Order, DomainError> {
        let status = self.parse_status()?;
        Ok(Order::from_storage(
            self.id,
            self.customer_id,
            self.restaurant_id,
            status,
            lines.into_iter().map(OrderLineRow::into_domain).collect(),
            self.delivery_address,
            self.contact_phone,
            self.notes,
            self.estimated_delivery_at,
            self.delivered_at,
            self.created_at,
            self.updated_at,
        ))
    }

    pub fn into_summary(self) -> Result<OrderSummary, DomainError> {
        let status = self.parse_status()?;
        Ok(OrderSummary {
            id: self.id,
            customer_id: self.customer_id,
            restaurant_id: self.restaurant_id,
            status,
            total_amount: self.total_amount,
            estimated_delivery_at: self.estimated_delivery_at,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub restaurant_id: Uuid,
    pub status: String,
    pub delivery_address: String,
    pub contact_phone: String,
    pub notes: Option<String>,
    pub total_amount: BigDecimal,
}

impl NewOrderRow {
    pub fn from_domain(order: &Order) -> Self {
        Self {
            id: order.id(),
            customer_id: order.customer_id(),
            restaurant_id: order.restaurant_id(),
            status: order.status().as_str().to_string(),
            delivery_address: order.delivery_address().to_string(),
            contact_phone: order.contact_phone().to_string(),
            notes: order.notes().map(str::to_string),
            total_amount: order.total().clone(),
        }
    }
}

#[derive(
    Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, Associations,
)]
#[diesel(table_name = order_lines)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderLineRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub menu_item_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub created_at: DateTime<Utc>,
}

impl OrderLineRow {
    pub fn into_domain(self) -> OrderLine {
        OrderLine {
            menu_item_id: self.menu_item_id,
            quantity: self.quantity,
            unit_price: self.unit_price,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_lines)]
pub struct NewOrderLineRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub menu_item_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = order_outbox)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OutboxEventRow {
    pub id: Uuid,
    pub aggregate_type: String,
    pub aggregate_id: String,
    pub event_type: String,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_outbox)]
pub struct NewOutboxEventRow {
    pub id: Uuid,
    pub aggregate_type: String,
    pub aggregate_id: String,
    pub event_type: String,
    pub payload: Value,
}

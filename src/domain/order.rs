use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::errors::DomainError;
use super::menu_item::MenuItem;
use super::status::OrderStatus;

/// Delivery estimate stamped on confirmation. A business parameter, not a
/// correctness requirement.
const ESTIMATED_DELIVERY_MINUTES: i64 = 45;

/// One menu item inside an order.
///
/// `unit_price` is a snapshot taken when the line was added; later price
/// changes on the menu do not affect an existing cart.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub menu_item_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

impl OrderLine {
    pub fn line_total(&self) -> BigDecimal {
        &self.unit_price * BigDecimal::from(self.quantity)
    }
}

/// The order aggregate: a customer's cart and, after placement, the order
/// it became.
///
/// Lines are insertion-ordered and keyed by menu item id (re-adding an item
/// merges quantities). The total is derived from the lines and recomputed
/// after every mutation; nothing outside this type may set it. Lines are
/// only mutable while the status is `Pending`.
#[derive(Debug, Clone)]
pub struct Order {
    id: Uuid,
    customer_id: Uuid,
    restaurant_id: Uuid,
    status: OrderStatus,
    lines: Vec<OrderLine>,
    delivery_address: String,
    contact_phone: String,
    notes: Option<String>,
    total: BigDecimal,
    estimated_delivery_at: Option<DateTime<Utc>>,
    delivered_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Order {
    pub fn create(
        customer_id: Uuid,
        restaurant_id: Uuid,
        delivery_address: impl Into<String>,
        contact_phone: impl Into<String>,
        notes: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            customer_id,
            restaurant_id,
            status: OrderStatus::Pending,
            lines: vec![],
            delivery_address: delivery_address.into(),
            contact_phone: contact_phone.into(),
            notes,
            total: BigDecimal::from(0),
            estimated_delivery_at: None,
            delivered_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rehydrate an order from persisted state. The total is recomputed
    /// from the lines rather than trusted from storage.
    #[allow(clippy::too_many_arguments)]
    pub fn from_storage(
        id: Uuid,
        customer_id: Uuid,
        restaurant_id: Uuid,
        status: OrderStatus,
        lines: Vec<OrderLine>,
        delivery_address: String,
        contact_phone: String,
        notes: Option<String>,
        estimated_delivery_at: Option<DateTime<Utc>>,
        delivered_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let mut order = Self {
            id,
            customer_id,
            restaurant_id,
            status,
            lines,
            delivery_address,
            contact_phone,
            notes,
            total: BigDecimal::from(0),
            estimated_delivery_at,
            delivered_at,
            created_at,
            updated_at,
        };
        order.total = order.compute_total();
        order
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
    pub fn customer_id(&self) -> Uuid {
        self.customer_id
    }
    pub fn restaurant_id(&self) -> Uuid {
        self.restaurant_id
    }
    pub fn status(&self) -> OrderStatus {
        self.status
    }
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }
    pub fn line(&self, menu_item_id: Uuid) -> Option<&OrderLine> {
        self.lines.iter().find(|l| l.menu_item_id == menu_item_id)
    }
    pub fn delivery_address(&self) -> &str {
        &self.delivery_address
    }
    pub fn contact_phone(&self) -> &str {
        &self.contact_phone
    }
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
    pub fn total(&self) -> &BigDecimal {
        &self.total
    }
    pub fn estimated_delivery_at(&self) -> Option<DateTime<Utc>> {
        self.estimated_delivery_at
    }
    pub fn delivered_at(&self) -> Option<DateTime<Utc>> {
        self.delivered_at
    }
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn ensure_modifiable(&self) -> Result<(), DomainError> {
        if !self.status.is_modifiable() {
            return Err(DomainError::OrderNotModifiable(self.status));
        }
        Ok(())
    }

    /// Add `quantity` units of `item` to the cart, merging with an existing
    /// line for the same item.
    ///
    /// Stock is checked against the merged quantity but not reserved;
    /// placement re-validates under lock.
    pub fn add_line(&mut self, item: &MenuItem, quantity: i32) -> Result<(), DomainError> {
        self.ensure_modifiable()?;
        if item.restaurant_id != self.restaurant_id {
            return Err(DomainError::ItemFromOtherRestaurant);
        }
        if !item.available {
            return Err(DomainError::ItemNotAvailable(item.name.clone()));
        }
        let merged = self.line(item.id).map_or(0, |l| l.quantity) + quantity;
        if merged > item.quantity {
            return Err(DomainError::InsufficientStock {
                name: item.name.clone(),
                requested: merged,
                in_stock: item.quantity,
            });
        }
        match self.lines.iter_mut().find(|l| l.menu_item_id == item.id) {
            Some(line) => line.quantity = merged,
            None => self.lines.push(OrderLine {
                menu_item_id: item.id,
                quantity,
                unit_price: item.price.clone(),
            }),
        }
        self.recalculate();
        Ok(())
    }

    /// Remove the line for `menu_item_id`. Removing an absent line is a
    /// successful no-op.
    pub fn remove_line(&mut self, menu_item_id: Uuid) -> Result<(), DomainError> {
        self.ensure_modifiable()?;
        self.lines.retain(|l| l.menu_item_id != menu_item_id);
        self.recalculate();
        Ok(())
    }

    /// Set the exact quantity of `item` in the cart. A quantity of zero or
    /// less behaves as removal; a missing line is created.
    pub fn set_line_quantity(&mut self, item: &MenuItem, quantity: i32) -> Result<(), DomainError> {
        self.ensure_modifiable()?;
        if quantity <= 0 {
            return self.remove_line(item.id);
        }
        if item.restaurant_id != self.restaurant_id {
            return Err(DomainError::ItemFromOtherRestaurant);
        }
        if !item.available {
            return Err(DomainError::ItemNotAvailable(item.name.clone()));
        }
        match self.lines.iter_mut().find(|l| l.menu_item_id == item.id) {
            Some(line) => line.quantity = quantity,
            None => self.lines.push(OrderLine {
                menu_item_id: item.id,
                quantity,
                unit_price: item.price.clone(),
            }),
        }
        self.recalculate();
        Ok(())
    }

    /// Confirm the cart. Stock validation and decrement happen in the
    /// placement transaction around this call; the aggregate only enforces
    /// its own state rules and stamps the delivery estimate.
    pub fn place(&mut self) -> Result<(), DomainError> {
        if self.status != OrderStatus::Pending {
            return Err(DomainError::OrderNotModifiable(self.status));
        }
        if self.lines.is_empty() {
            return Err(DomainError::EmptyOrder);
        }
        self.status = OrderStatus::Confirmed;
        self.estimated_delivery_at =
            Some(Utc::now() + Duration::minutes(ESTIMATED_DELIVERY_MINUTES));
        self.touch();
        Ok(())
    }

    /// Cancel the order. Returns `true` when stock must be restored, i.e.
    /// when a placement had already decremented it (CONFIRMED/PREPARING).
    pub fn cancel(&mut self, reason: Option<&str>) -> Result<bool, DomainError> {
        if !self.status.is_cancellable() {
            return Err(DomainError::NotCancellable(self.status));
        }
        let restore_stock = matches!(
            self.status,
            OrderStatus::Confirmed | OrderStatus::Preparing
        );
        if let Some(reason) = reason.map(str::trim).filter(|r| !r.is_empty()) {
            let note = format!("Cancelled: {reason}");
            self.notes = Some(match self.notes.take() {
                Some(existing) => format!("{existing}\n{note}"),
                None => note,
            });
        }
        self.status = OrderStatus::Cancelled;
        self.touch();
        Ok(restore_stock)
    }

    /// Generic status progression per the transition table.
    ///
    /// Transitions with inventory side effects are owned by `place` and
    /// `cancel` and refused here even though the table lists them.
    pub fn transition_to(&mut self, to: OrderStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(to) {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        if to == OrderStatus::Cancelled {
            return Err(DomainError::Validation(
                "use the cancellation endpoint to cancel an order".to_string(),
            ));
        }
        if self.status == OrderStatus::Pending && to == OrderStatus::Confirmed {
            return Err(DomainError::Validation(
                "use the placement endpoint to confirm a pending order".to_string(),
            ));
        }
        if to == OrderStatus::Delivered {
            self.delivered_at = Some(Utc::now());
        }
        self.status = to;
        self.touch();
        Ok(())
    }

    fn compute_total(&self) -> BigDecimal {
        self.lines
            .iter()
            .fold(BigDecimal::from(0), |acc, l| acc + l.line_total())
    }

    fn recalculate(&mut self) {
        self.total = self.compute_total();
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn restaurant_id() -> Uuid {
        Uuid::from_u128(1)
    }

    fn item(id: u128, price: &str, available: bool, quantity: i32) -> MenuItem {
        MenuItem {
            id: Uuid::from_u128(id),
            restaurant_id: restaurant_id(),
            name: format!("Item {id}"),
            price: dec(price),
            available,
            quantity,
        }
    }

    fn pending_order() -> Order {
        Order::create(
            Uuid::new_v4(),
            restaurant_id(),
            "12 Via Roma",
            "+39 055 1234567",
            None,
        )
    }

    #[test]
    fn new_order_is_an_empty_pending_cart() {
        let order = pending_order();
        assert_eq!(order.status(), OrderStatus::Pending);
        assert!(order.lines().is_empty());
        assert_eq!(order.total(), &BigDecimal::from(0));
        assert!(order.estimated_delivery_at().is_none());
    }

    #[test]
    fn add_line_merges_and_recomputes_total() {
        let mut order = pending_order();
        let pizza = item(10, "10.00", true, 5);

        order.add_line(&pizza, 3).unwrap();
        assert_eq!(order.total(), &dec("30.00"));

        order.add_line(&pizza, 2).unwrap();
        assert_eq!(order.lines().len(), 1);
        assert_eq!(order.line(pizza.id).unwrap().quantity, 5);
        assert_eq!(order.total(), &dec("50.00"));
    }

    #[test]
    fn stock_pre_check_applies_to_the_merged_quantity() {
        let mut order = pending_order();
        let pizza = item(10, "10.00", true, 5);

        order.add_line(&pizza, 3).unwrap();
        let err = order.add_line(&pizza, 3).unwrap_err();
        assert!(matches!(
            err,
            DomainError::InsufficientStock {
                requested: 6,
                in_stock: 5,
                ..
            }
        ));
        // Failed add leaves the cart untouched.
        assert_eq!(order.line(pizza.id).unwrap().quantity, 3);
        assert_eq!(order.total(), &dec("30.00"));
    }

    #[test]
    fn add_line_rejects_items_from_another_restaurant() {
        let mut order = pending_order();
        let mut foreign = item(10, "4.00", true, 5);
        foreign.restaurant_id = Uuid::from_u128(99);
        assert!(matches!(
            order.add_line(&foreign, 1),
            Err(DomainError::ItemFromOtherRestaurant)
        ));
    }

    #[test]
    fn add_line_rejects_unavailable_items() {
        let mut order = pending_order();
        let sold_out = item(10, "4.00", false, 5);
        assert!(matches!(
            order.add_line(&sold_out, 1),
            Err(DomainError::ItemNotAvailable(_))
        ));
    }

    #[test]
    fn unit_price_is_snapshotted_at_add_time() {
        let mut order = pending_order();
        let mut pizza = item(10, "10.00", true, 10);
        order.add_line(&pizza, 1).unwrap();

        pizza.price = dec("12.00");
        order.add_line(&pizza, 1).unwrap();

        // Merged line keeps the original snapshot.
        assert_eq!(order.line(pizza.id).unwrap().unit_price, dec("10.00"));
        assert_eq!(order.total(), &dec("20.00"));
    }

    #[test]
    fn remove_line_is_idempotent() {
        let mut order = pending_order();
        let pizza = item(10, "10.00", true, 5);
        order.add_line(&pizza, 2).unwrap();

        order.remove_line(pizza.id).unwrap();
        assert!(order.lines().is_empty());
        assert_eq!(order.total(), &BigDecimal::from(0));

        // Removing again still succeeds.
        order.remove_line(pizza.id).unwrap();
    }

    #[test]
    fn set_line_quantity_sets_creates_and_removes() {
        let mut order = pending_order();
        let pizza = item(10, "10.00", true, 10);

        // Absent line: created with the exact quantity.
        order.set_line_quantity(&pizza, 4).unwrap();
        assert_eq!(order.line(pizza.id).unwrap().quantity, 4);
        assert_eq!(order.total(), &dec("40.00"));

        order.set_line_quantity(&pizza, 2).unwrap();
        assert_eq!(order.line(pizza.id).unwrap().quantity, 2);
        assert_eq!(order.total(), &dec("20.00"));

        // Zero behaves as removal.
        order.set_line_quantity(&pizza, 0).unwrap();
        assert!(order.line(pizza.id).is_none());
        assert_eq!(order.total(), &BigDecimal::from(0));
    }

    #[test]
    fn total_always_equals_sum_of_lines() {
        let mut order = pending_order();
        let pizza = item(10, "10.00", true, 50);
        let drink = item(11, "2.50", true, 50);

        order.add_line(&pizza, 2).unwrap();
        order.add_line(&drink, 4).unwrap();
        order.set_line_quantity(&pizza, 1).unwrap();
        order.remove_line(drink.id).unwrap();

        let expected: BigDecimal = order.lines().iter().map(OrderLine::line_total).sum();
        assert_eq!(order.total(), &expected);
        assert_eq!(order.total(), &dec("10.00"));
    }

    #[test]
    fn place_confirms_and_stamps_delivery_estimate() {
        let mut order = pending_order();
        let pizza = item(10, "10.00", true, 5);
        order.add_line(&pizza, 2).unwrap();

        order.place().unwrap();
        assert_eq!(order.status(), OrderStatus::Confirmed);
        let eta = order.estimated_delivery_at().unwrap();
        assert!(eta > Utc::now());
        assert!(eta <= Utc::now() + Duration::minutes(ESTIMATED_DELIVERY_MINUTES));
    }

    #[test]
    fn place_rejects_an_empty_cart() {
        let mut order = pending_order();
        assert!(matches!(order.place(), Err(DomainError::EmptyOrder)));
        assert_eq!(order.status(), OrderStatus::Pending);
    }

    #[test]
    fn place_rejects_a_non_pending_order() {
        let mut order = pending_order();
        let pizza = item(10, "10.00", true, 5);
        order.add_line(&pizza, 1).unwrap();
        order.place().unwrap();

        assert!(matches!(
            order.place(),
            Err(DomainError::OrderNotModifiable(OrderStatus::Confirmed))
        ));
    }

    #[test]
    fn lines_are_immutable_after_confirmation() {
        let mut order = pending_order();
        let pizza = item(10, "10.00", true, 5);
        order.add_line(&pizza, 2).unwrap();
        order.place().unwrap();

        let before = order.lines().to_vec();
        let total_before = order.total().clone();

        assert!(order.add_line(&pizza, 1).is_err());
        assert!(order.remove_line(pizza.id).is_err());
        assert!(order.set_line_quantity(&pizza, 1).is_err());

        assert_eq!(order.lines(), &before[..]);
        assert_eq!(order.total(), &total_before);
    }

    #[test]
    fn cancelling_a_pending_cart_needs_no_restoration() {
        let mut order = pending_order();
        let restore = order.cancel(None).unwrap();
        assert!(!restore);
        assert_eq!(order.status(), OrderStatus::Cancelled);
    }

    #[test]
    fn cancelling_a_confirmed_order_requests_restoration() {
        let mut order = pending_order();
        let pizza = item(10, "10.00", true, 5);
        order.add_line(&pizza, 2).unwrap();
        order.place().unwrap();

        let restore = order.cancel(Some("customer changed their mind")).unwrap();
        assert!(restore);
        assert_eq!(order.status(), OrderStatus::Cancelled);
        assert!(order
            .notes()
            .unwrap()
            .contains("customer changed their mind"));
    }

    #[test]
    fn cancel_is_rejected_once_terminal_or_en_route() {
        let mut order = pending_order();
        let pizza = item(10, "10.00", true, 5);
        order.add_line(&pizza, 1).unwrap();
        order.place().unwrap();
        order.transition_to(OrderStatus::Preparing).unwrap();
        order.transition_to(OrderStatus::Ready).unwrap();

        assert!(matches!(
            order.cancel(None),
            Err(DomainError::NotCancellable(OrderStatus::Ready))
        ));

        order.transition_to(OrderStatus::OutForDelivery).unwrap();
        order.transition_to(OrderStatus::Delivered).unwrap();
        assert!(order.cancel(None).is_err());
    }

    #[test]
    fn second_cancellation_fails() {
        let mut order = pending_order();
        order.cancel(None).unwrap();
        assert!(matches!(
            order.cancel(None),
            Err(DomainError::NotCancellable(OrderStatus::Cancelled))
        ));
    }

    #[test]
    fn status_walk_to_delivered_stamps_completion() {
        let mut order = pending_order();
        let pizza = item(10, "10.00", true, 5);
        order.add_line(&pizza, 1).unwrap();
        order.place().unwrap();

        order.transition_to(OrderStatus::Preparing).unwrap();
        order.transition_to(OrderStatus::Ready).unwrap();
        order.transition_to(OrderStatus::OutForDelivery).unwrap();
        assert!(order.delivered_at().is_none());
        order.transition_to(OrderStatus::Delivered).unwrap();
        assert_eq!(order.status(), OrderStatus::Delivered);
        assert!(order.delivered_at().is_some());
    }

    #[test]
    fn transition_cannot_skip_states() {
        let mut order = pending_order();
        let pizza = item(10, "10.00", true, 5);
        order.add_line(&pizza, 1).unwrap();
        order.place().unwrap();
        order.transition_to(OrderStatus::Preparing).unwrap();
        order.transition_to(OrderStatus::Ready).unwrap();

        assert!(matches!(
            order.transition_to(OrderStatus::Delivered),
            Err(DomainError::InvalidTransition {
                from: OrderStatus::Ready,
                to: OrderStatus::Delivered,
            })
        ));
    }

    #[test]
    fn transition_refuses_placement_and_cancellation_shortcuts() {
        let mut order = pending_order();
        assert!(matches!(
            order.transition_to(OrderStatus::Confirmed),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            order.transition_to(OrderStatus::Cancelled),
            Err(DomainError::Validation(_))
        ));
        assert_eq!(order.status(), OrderStatus::Pending);
    }

    #[test]
    fn from_storage_recomputes_the_total() {
        let now = Utc::now();
        let order = Order::from_storage(
            Uuid::new_v4(),
            Uuid::new_v4(),
            restaurant_id(),
            OrderStatus::Pending,
            vec![
                OrderLine {
                    menu_item_id: Uuid::from_u128(10),
                    quantity: 2,
                    unit_price: dec("3.25"),
                },
                OrderLine {
                    menu_item_id: Uuid::from_u128(11),
                    quantity: 1,
                    unit_price: dec("8.00"),
                },
            ],
            "12 Via Roma".to_string(),
            "+39 055 1234567".to_string(),
            None,
            None,
            None,
            now,
            now,
        );
        assert_eq!(order.total(), &dec("14.50"));
    }
}

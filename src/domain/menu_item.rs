use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::errors::DomainError;

/// Catalog ledger entry for one sellable item.
///
/// `quantity` is the shared stock count. It is only ever decremented by a
/// placement and incremented by a cancellation; cart edits read it but
/// never write it.
#[derive(Debug, Clone)]
pub struct MenuItem {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub available: bool,
    pub quantity: i32,
}

impl MenuItem {
    /// Consume `quantity` units during placement. The caller holds a row
    /// lock, so a failure here means a concurrent placement got there
    /// first since the cart pre-check.
    pub fn deduct(&mut self, quantity: i32) -> Result<(), DomainError> {
        if !self.available {
            return Err(DomainError::ItemNotAvailable(self.name.clone()));
        }
        if quantity > self.quantity {
            return Err(DomainError::StockConflict {
                name: self.name.clone(),
            });
        }
        self.quantity -= quantity;
        Ok(())
    }

    /// Return `quantity` units to stock when a placed order is cancelled.
    pub fn restock(&mut self, quantity: i32) {
        self.quantity += quantity;
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn item(available: bool, quantity: i32) -> MenuItem {
        MenuItem {
            id: Uuid::new_v4(),
            restaurant_id: Uuid::new_v4(),
            name: "Margherita".to_string(),
            price: BigDecimal::from_str("9.50").unwrap(),
            available,
            quantity,
        }
    }

    #[test]
    fn deduct_consumes_stock() {
        let mut it = item(true, 5);
        it.deduct(3).unwrap();
        assert_eq!(it.quantity, 2);
        it.deduct(2).unwrap();
        assert_eq!(it.quantity, 0);
    }

    #[test]
    fn deduct_never_goes_negative() {
        let mut it = item(true, 1);
        let err = it.deduct(2).unwrap_err();
        assert!(matches!(err, DomainError::StockConflict { .. }));
        assert_eq!(it.quantity, 1);
    }

    #[test]
    fn deduct_rejects_unavailable_item() {
        let mut it = item(false, 10);
        let err = it.deduct(1).unwrap_err();
        assert!(matches!(err, DomainError::ItemNotAvailable(_)));
    }

    #[test]
    fn restock_reverses_deduct() {
        let mut it = item(true, 4);
        it.deduct(4).unwrap();
        it.restock(4);
        assert_eq!(it.quantity, 4);
    }
}

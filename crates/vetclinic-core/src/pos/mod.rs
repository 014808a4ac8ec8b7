//! Point of sale: cart, discount and checkout into the ledger.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::models::{
    format_brl, EntryKind, EntryLine, FinancialEntry, PaymentMethod, SaleItem,
};
use crate::store::{Store, StoreError};

/// Point-of-sale errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PosError {
    #[error("O carrinho está vazio")]
    EmptyCart,

    #[error("Item not in cart: {0}")]
    NotInCart(String),

    #[error("Quantity must be at least 1 and within range")]
    InvalidQuantity,

    #[error("Discount cannot be negative")]
    InvalidDiscount,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type PosResult<T> = Result<T, PosError>;

/// One line in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    pub sku: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: u32,
}

impl CartLine {
    /// Line total in cents.
    pub fn total_cents(&self) -> i64 {
        self.unit_price_cents.saturating_mul(i64::from(self.quantity))
    }
}

/// A sale in progress.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
    discount_cents: i64,
    /// Client being charged, if identified
    pub client_id: Option<String>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add `quantity` units of a catalog item. A SKU already in the cart
    /// has its quantity increased. A quantity whose line total does not fit
    /// in cents is rejected and the cart is left as it was.
    pub fn add_item(&mut self, item: &SaleItem, quantity: u32) -> PosResult<()> {
        if quantity == 0 {
            return Err(PosError::InvalidQuantity);
        }
        match self.lines.iter_mut().find(|l| l.sku == item.sku) {
            Some(line) => {
                let merged = line
                    .quantity
                    .checked_add(quantity)
                    .ok_or(PosError::InvalidQuantity)?;
                checked_line_total(line.unit_price_cents, merged)?;
                line.quantity = merged;
            }
            None => {
                checked_line_total(item.unit_price_cents, quantity)?;
                self.lines.push(CartLine {
                    sku: item.sku.clone(),
                    name: item.name.clone(),
                    unit_price_cents: item.unit_price_cents,
                    quantity,
                });
            }
        }
        Ok(())
    }

    /// Set the quantity of a line.
    pub fn set_quantity(&mut self, sku: &str, quantity: u32) -> PosResult<()> {
        if quantity == 0 {
            return Err(PosError::InvalidQuantity);
        }
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.sku == sku)
            .ok_or_else(|| PosError::NotInCart(sku.to_string()))?;
        checked_line_total(line.unit_price_cents, quantity)?;
        line.quantity = quantity;
        Ok(())
    }

    /// Remove a line.
    pub fn remove_item(&mut self, sku: &str) -> PosResult<CartLine> {
        let index = self
            .lines
            .iter()
            .position(|l| l.sku == sku)
            .ok_or_else(|| PosError::NotInCart(sku.to_string()))?;
        Ok(self.lines.remove(index))
    }

    /// Set a discount in cents.
    pub fn set_discount(&mut self, discount_cents: i64) -> PosResult<()> {
        if discount_cents < 0 {
            return Err(PosError::InvalidDiscount);
        }
        self.discount_cents = discount_cents;
        Ok(())
    }

    pub fn subtotal_cents(&self) -> i64 {
        self.lines
            .iter()
            .map(CartLine::total_cents)
            .fold(0, i64::saturating_add)
    }

    /// Discount actually applied: never more than the subtotal.
    pub fn discount_cents(&self) -> i64 {
        self.discount_cents.min(self.subtotal_cents())
    }

    pub fn total_cents(&self) -> i64 {
        self.subtotal_cents() - self.discount_cents()
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Close the sale: record an income entry in the ledger and empty the
    /// cart. An empty cart is rejected and nothing is recorded.
    ///
    /// A sale discounted down to zero still closes and empties the cart, but
    /// no ledger row is written: the returned entry has `amount_cents == 0`
    /// and is not retrievable from the store.
    pub fn checkout(
        &mut self,
        store: &mut Store,
        payment_method: PaymentMethod,
    ) -> PosResult<FinancialEntry> {
        if self.is_empty() {
            return Err(PosError::EmptyCart);
        }

        let description = self
            .lines
            .iter()
            .map(|l| format!("{}x {}", l.quantity, l.name))
            .collect::<Vec<_>>()
            .join(", ");

        let mut entry = FinancialEntry::new(EntryKind::Income, description, self.total_cents());
        entry.payment_method = Some(payment_method);
        entry.client_id = self.client_id.clone();
        entry.discount_cents = self.discount_cents();
        entry.lines = self
            .lines
            .iter()
            .map(|l| EntryLine {
                sku: l.sku.clone(),
                description: l.name.clone(),
                quantity: l.quantity,
                unit_price_cents: l.unit_price_cents,
            })
            .collect();

        // A fully discounted sale has nothing to book.
        if entry.amount_cents > 0 {
            store.record_entry(entry.clone())?;
        }

        info!(
            entry_id = %entry.id,
            total = %format_brl(entry.amount_cents),
            lines = entry.lines.len(),
            "Sale closed"
        );
        self.clear();
        Ok(entry)
    }
}

fn checked_line_total(unit_price_cents: i64, quantity: u32) -> PosResult<i64> {
    unit_price_cents
        .checked_mul(i64::from(quantity))
        .ok_or(PosError::InvalidQuantity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SaleItemKind;

    fn item(sku: &str, price: i64) -> SaleItem {
        SaleItem::new(sku.into(), format!("Item {}", sku), SaleItemKind::Product, price)
    }

    #[test]
    fn test_add_merges_same_sku() {
        let mut cart = Cart::new();
        cart.add_item(&item("A", 1_000), 1).unwrap();
        cart.add_item(&item("A", 1_000), 2).unwrap();
        cart.add_item(&item("B", 500), 1).unwrap();
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[0].quantity, 3);
        assert_eq!(cart.subtotal_cents(), 3_500);
    }

    #[test]
    fn test_discount_clamped_to_subtotal() {
        let mut cart = Cart::new();
        cart.add_item(&item("A", 1_000), 1).unwrap();
        cart.set_discount(250).unwrap();
        assert_eq!(cart.total_cents(), 750);
        cart.set_discount(5_000).unwrap();
        assert_eq!(cart.total_cents(), 0);
        assert_eq!(cart.set_discount(-1), Err(PosError::InvalidDiscount));
    }

    #[test]
    fn test_quantity_and_removal() {
        let mut cart = Cart::new();
        cart.add_item(&item("A", 1_000), 1).unwrap();
        assert_eq!(cart.add_item(&item("A", 1_000), 0), Err(PosError::InvalidQuantity));
        cart.set_quantity("A", 4).unwrap();
        assert_eq!(cart.total_cents(), 4_000);
        assert!(matches!(cart.set_quantity("Z", 1), Err(PosError::NotInCart(_))));
        cart.remove_item("A").unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantity_overflow_rejected() {
        let mut cart = Cart::new();
        cart.add_item(&item("A", 1), u32::MAX).unwrap();
        assert_eq!(cart.add_item(&item("A", 1), 1), Err(PosError::InvalidQuantity));
        assert_eq!(cart.lines()[0].quantity, u32::MAX);

        let mut pricey = Cart::new();
        assert_eq!(
            pricey.add_item(&item("B", i64::MAX / 2), 3),
            Err(PosError::InvalidQuantity)
        );
        assert!(pricey.is_empty());
        pricey.add_item(&item("B", i64::MAX / 2), 1).unwrap();
        assert_eq!(pricey.set_quantity("B", 3), Err(PosError::InvalidQuantity));
        assert_eq!(pricey.lines()[0].quantity, 1);
    }

    #[test]
    fn test_fully_discounted_checkout_books_nothing() {
        let mut store = Store::new();
        let mut cart = Cart::new();
        cart.add_item(&item("A", 1_000), 1).unwrap();
        cart.set_discount(1_000).unwrap();

        let entry = cart.checkout(&mut store, PaymentMethod::Cash).unwrap();
        assert_eq!(entry.amount_cents, 0);
        assert!(cart.is_empty());
        assert!(store.list_entries().is_empty());
    }

    #[test]
    fn test_checkout_records_income() {
        let mut store = Store::new();
        let mut cart = Cart::new();
        cart.add_item(&item("A", 2_000), 2).unwrap();
        cart.set_discount(500).unwrap();

        let entry = cart.checkout(&mut store, PaymentMethod::DebitCard).unwrap();
        assert_eq!(entry.amount_cents, 3_500);
        assert_eq!(entry.discount_cents, 500);
        assert_eq!(entry.description, "2x Item A");
        assert!(cart.is_empty());
        assert_eq!(store.list_entries(), vec![entry]);
    }

    #[test]
    fn test_checkout_empty_cart_rejected() {
        let mut store = Store::new();
        let mut cart = Cart::new();
        assert_eq!(cart.checkout(&mut store, PaymentMethod::Cash), Err(PosError::EmptyCart));
        assert!(store.list_entries().is_empty());
    }

    #[test]
    fn test_checkout_unknown_client_keeps_cart() {
        let mut store = Store::new();
        let mut cart = Cart::new();
        cart.client_id = Some("missing".into());
        cart.add_item(&item("A", 2_000), 1).unwrap();
        assert!(matches!(
            cart.checkout(&mut store, PaymentMethod::Pix),
            Err(PosError::Store(StoreError::NotFound(_)))
        ));
        assert!(!cart.is_empty());
    }
}

//! Sale catalog and financial ledger models.
//!
//! Money is kept in integer cents.

use serde::{Deserialize, Serialize};

use super::selection::Choice;

/// Whether a catalog entry is a product or a service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SaleItemKind {
    Product,
    Service,
}

/// An item that can be sold at the counter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaleItem {
    /// Stock Keeping Unit - unique identifier
    pub sku: String,
    pub name: String,
    pub kind: SaleItemKind,
    /// Unit price in cents
    pub unit_price_cents: i64,
    /// Whether this item is offered at the counter
    pub active: bool,
}

impl SaleItem {
    /// Create a new active catalog item.
    pub fn new(sku: String, name: String, kind: SaleItemKind, unit_price_cents: i64) -> Self {
        Self {
            sku,
            name,
            kind,
            unit_price_cents,
            active: true,
        }
    }
}

/// Payment method.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    Pix,
}

impl Choice for PaymentMethod {
    fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Dinheiro",
            PaymentMethod::CreditCard => "Cartão de crédito",
            PaymentMethod::DebitCard => "Cartão de débito",
            PaymentMethod::Pix => "PIX",
        }
    }

    fn options() -> &'static [Self] {
        &[
            PaymentMethod::Cash,
            PaymentMethod::CreditCard,
            PaymentMethod::DebitCard,
            PaymentMethod::Pix,
        ]
    }
}

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EntryKind {
    Income,
    Expense,
}

/// One sold line, as recorded in the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryLine {
    pub sku: String,
    pub description: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
}

impl EntryLine {
    /// Line total in cents.
    pub fn total_cents(&self) -> i64 {
        self.unit_price_cents * i64::from(self.quantity)
    }
}

/// A ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinancialEntry {
    /// Local UUID
    pub id: String,
    pub kind: EntryKind,
    pub description: String,
    /// Amount in cents, always positive
    pub amount_cents: i64,
    pub payment_method: Option<PaymentMethod>,
    /// Client who paid, for sales
    pub client_id: Option<String>,
    /// Sold lines; empty for manual entries
    pub lines: Vec<EntryLine>,
    /// Discount applied in cents
    pub discount_cents: i64,
    /// Entry timestamp
    pub recorded_at: String,
}

impl FinancialEntry {
    /// Create a manual ledger entry.
    pub fn new(kind: EntryKind, description: String, amount_cents: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            description,
            amount_cents,
            payment_method: None,
            client_id: None,
            lines: Vec::new(),
            discount_cents: 0,
            recorded_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Signed amount: income positive, expense negative.
    pub fn signed_cents(&self) -> i64 {
        match self.kind {
            EntryKind::Income => self.amount_cents,
            EntryKind::Expense => -self.amount_cents,
        }
    }
}

/// Format cents as "R$ 1.234,56".
pub fn format_brl(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let reais = (cents / 100).to_string();

    let mut grouped = String::new();
    for (i, ch) in reais.chars().enumerate() {
        if i > 0 && (reais.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("{}R$ {},{:02}", sign, grouped, cents % 100)
}

//! Sale catalog and ledger operations.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{remove_where, Store, StoreError, StoreResult};
use crate::models::{Choice, EntryKind, FinancialEntry, SaleItem};

/// Totals over the ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FinancialSummary {
    pub income_cents: i64,
    pub expense_cents: i64,
    pub balance_cents: i64,
    pub entry_count: usize,
    /// Income per payment method label, in first-seen order
    pub income_by_method: Vec<(String, i64)>,
}

impl FinancialSummary {
    /// Summarize a list of entries.
    pub fn from_entries(entries: &[FinancialEntry]) -> Self {
        let mut summary = Self {
            entry_count: entries.len(),
            ..Default::default()
        };

        for entry in entries {
            match entry.kind {
                EntryKind::Income => {
                    summary.income_cents += entry.amount_cents;
                    let label = entry
                        .payment_method
                        .map(|m| m.label().to_string())
                        .unwrap_or_else(|| "Não informado".into());
                    match summary.income_by_method.iter_mut().find(|(l, _)| *l == label) {
                        Some((_, total)) => *total += entry.amount_cents,
                        None => summary.income_by_method.push((label, entry.amount_cents)),
                    }
                }
                EntryKind::Expense => summary.expense_cents += entry.amount_cents,
            }
        }

        summary.balance_cents = summary.income_cents - summary.expense_cents;
        summary
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Store {
    // =========================================================================
    // Sale catalog
    // =========================================================================

    /// Add or replace a catalog item.
    pub fn upsert_sale_item(&mut self, item: SaleItem) -> StoreResult<()> {
        if item.unit_price_cents < 0 {
            return Err(StoreError::Constraint(format!("negative price for {}", item.sku)));
        }
        match self.sale_items.iter_mut().find(|i| i.sku == item.sku) {
            Some(slot) => *slot = item,
            None => self.sale_items.push(item),
        }
        Ok(())
    }

    /// Get a catalog item by SKU.
    pub fn get_sale_item(&self, sku: &str) -> Option<SaleItem> {
        self.sale_items.iter().find(|i| i.sku == sku).cloned()
    }

    /// Active catalog items.
    pub fn list_sale_items(&self) -> Vec<SaleItem> {
        self.sale_items.iter().filter(|i| i.active).cloned().collect()
    }

    // =========================================================================
    // Ledger
    // =========================================================================

    /// Record a ledger entry.
    pub fn record_entry(&mut self, entry: FinancialEntry) -> StoreResult<()> {
        if entry.amount_cents <= 0 {
            return Err(StoreError::Constraint("entry amount must be positive".into()));
        }
        if let Some(client_id) = &entry.client_id {
            if !self.clients.iter().any(|c| &c.id == client_id) {
                return Err(StoreError::NotFound(client_id.clone()));
            }
        }
        info!(
            entry_id = %entry.id,
            kind = ?entry.kind,
            amount_cents = entry.amount_cents,
            "Ledger entry recorded"
        );
        self.entries.push(entry);
        Ok(())
    }

    /// Get an entry by ID.
    pub fn get_entry(&self, id: &str) -> Option<FinancialEntry> {
        self.entries.iter().find(|e| e.id == id).cloned()
    }

    /// Delete an entry.
    pub fn delete_entry(&mut self, id: &str) -> bool {
        remove_where(&mut self.entries, |e| e.id == id) > 0
    }

    /// All entries in recording order.
    pub fn list_entries(&self) -> Vec<FinancialEntry> {
        self.entries.clone()
    }

    /// Entries paid by a client.
    pub fn list_entries_for_client(&self, client_id: &str) -> Vec<FinancialEntry> {
        self.entries
            .iter()
            .filter(|e| e.client_id.as_deref() == Some(client_id))
            .cloned()
            .collect()
    }

    /// Totals over the whole ledger.
    pub fn financial_summary(&self) -> FinancialSummary {
        FinancialSummary::from_entries(&self.entries)
    }
}

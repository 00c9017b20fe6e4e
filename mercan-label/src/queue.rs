//! Print queue
//!
//! Holds one entry per distinct product with a quantity; `expand()`
//! flattens it into the label sequence the document backend paginates.

use serde::{Deserialize, Serialize};
use shared::Product;
use tracing::info;

/// Insertions allowed per bulk add call
pub const MAX_BULK_ADD: usize = 100;

/// One queued product and how many labels it gets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrintQueueEntry {
    pub product: Product,
    pub quantity: u32,
}

/// Ordered print queue, one entry per product
#[derive(Debug, Clone, Default)]
pub struct PrintQueue {
    entries: Vec<PrintQueueEntry>,
}

impl PrintQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[PrintQueueEntry] {
        &self.entries
    }

    /// Distinct products in the queue
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels the queue will produce when expanded
    pub fn total_labels(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| entry.quantity as usize)
            .sum()
    }

    /// Queue a product, bumping the quantity when already present
    pub fn add_product(&mut self, product: &Product) {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.product.id == product.id)
        {
            Some(entry) => entry.quantity += 1,
            None => self.entries.push(PrintQueueEntry {
                product: product.clone(),
                quantity: 1,
            }),
        }
    }

    /// Queue every product not already present, at most [`MAX_BULK_ADD`]
    ///
    /// Returns the number actually inserted. Already-queued products
    /// keep their quantity and do not count against the cap.
    pub fn add_all_filtered(&mut self, products: &[Product]) -> usize {
        let mut inserted = 0;
        for product in products {
            if inserted == MAX_BULK_ADD {
                break;
            }
            if self.entries.iter().any(|entry| entry.product.id == product.id) {
                continue;
            }
            self.entries.push(PrintQueueEntry {
                product: product.clone(),
                quantity: 1,
            });
            inserted += 1;
        }
        if inserted > 0 {
            info!(inserted, total = self.entries.len(), "bulk add to print queue");
        }
        inserted
    }

    /// Set an entry's quantity, floored at 1; unknown index is ignored
    pub fn set_quantity(&mut self, index: usize, quantity: u32) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.quantity = quantity.max(1);
        }
    }

    /// Remove and return the entry at `index`
    pub fn remove(&mut self, index: usize) -> Option<PrintQueueEntry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Flat label sequence: each product repeated `quantity` times
    pub fn expand(&self) -> Vec<&Product> {
        let mut labels = Vec::with_capacity(self.total_labels());
        for entry in &self.entries {
            for _ in 0..entry.quantity {
                labels.push(&entry.product);
            }
        }
        labels
    }
}

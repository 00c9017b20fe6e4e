//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product entity as seen by the label pipeline
///
/// Catalog management lives elsewhere; this is the read-side shape the
/// substitution and print paths consume.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub barcode: String,
    #[serde(default)]
    pub stock_code: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub group: String,
}

impl Product {
    /// Barcode number with stock-code fallback
    ///
    /// Items flagged as barcode/QR encode this value. Empty when the
    /// product carries neither.
    pub fn barcode_or_stock_code(&self) -> &str {
        if self.barcode.is_empty() {
            &self.stock_code
        } else {
            &self.barcode
        }
    }
}

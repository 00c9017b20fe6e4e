//! Code-128 and QR symbol encoding
//!
//! Thin wrappers over `barcoders` and `qrcode` that translate into the
//! module runs and matrices the render backends draw from. Invalid
//! payloads surface as [`EncodeError`]; the caller decides whether to
//! skip the item or abort.

use barcoders::sym::code128::Code128;
use qrcode::{Color, EcLevel, QrCode};
use thiserror::Error;

/// Code-128 character set B prefix (letters, digits, punctuation)
const CODE128_SET_B: char = '\u{0181}';

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Code-128 encoding failed: {0}")]
    Code128(#[from] barcoders::error::Error),

    #[error("QR encoding failed: {0}")]
    Qr(#[from] qrcode::types::QrError),
}

pub type EncodeResult<T> = Result<T, EncodeError>;

/// Encode a value as Code-128 bars
///
/// Returns one entry per module, `true` = bar. The quiet zones and
/// check digit come from the symbology itself; scaling to pixels is the
/// backend's job via the item's module width.
pub fn encode_code128(value: &str) -> EncodeResult<Vec<bool>> {
    let barcode = Code128::new(format!("{CODE128_SET_B}{value}"))?;
    Ok(barcode.encode().iter().map(|&module| module == 1).collect())
}

/// Square QR module matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
    width: usize,
    modules: Vec<bool>,
}

impl QrMatrix {
    /// Modules per side
    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether the module at `(x, y)` is dark
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.modules[y * self.width + x]
    }
}

/// Encode a value as a QR matrix at error correction level M
pub fn encode_qr(value: &str) -> EncodeResult<QrMatrix> {
    let code = QrCode::with_error_correction_level(value, EcLevel::M)?;
    let width = code.width();

    let mut modules = Vec::with_capacity(width * width);
    for y in 0..width {
        for x in 0..width {
            modules.push(code[(x, y)] == Color::Dark);
        }
    }

    Ok(QrMatrix { width, modules })
}

//! Token substitution for label content
//!
//! Template text embeds `{{TOKEN}}` placeholders that are replaced with
//! product data at render time. Replacement is a plain literal pass:
//! unknown tokens stay verbatim, and no replacement value can itself
//! contain a token, so running the pass twice changes nothing.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use shared::Product;

/// Currency sign substituted for `{{PARA_BIRIMI}}`
pub const CURRENCY_SYMBOL: &str = "₺";

/// Placeholder tokens recognized in template content
pub mod tokens {
    pub const PRODUCT_NAME: &str = "{{URUN_ADI}}";
    pub const PRICE: &str = "{{FIYAT}}";
    pub const BARCODE: &str = "{{BARKOD}}";
    pub const BARCODE_QR: &str = "{{BARKOD_QR}}";
    pub const BARCODE_NUMBER: &str = "{{BARKOD_NO}}";
    pub const STOCK_CODE: &str = "{{STOK_KODU}}";
    pub const BRAND: &str = "{{MARKA}}";
    pub const GROUP: &str = "{{GRUP}}";
    pub const DATE: &str = "{{TARIH}}";
    pub const CURRENCY: &str = "{{PARA_BIRIMI}}";
}

/// Replace every known token in `content` with data from `product`.
///
/// `{{BARKOD}}`, `{{BARKOD_QR}}` and `{{BARKOD_NO}}` all resolve to the
/// barcode number with stock-code fallback; the first two only differ in
/// how the editor flags the carrying item.
pub fn substitute(content: &str, product: &Product, today: NaiveDate) -> String {
    let price = format_price(product.price);
    let date = today.format("%d.%m.%Y").to_string();
    let number = product.barcode_or_stock_code();

    let pairs: [(&str, &str); 10] = [
        (tokens::PRODUCT_NAME, product.name.as_str()),
        (tokens::PRICE, price.as_str()),
        (tokens::BARCODE, number),
        (tokens::BARCODE_QR, number),
        (tokens::BARCODE_NUMBER, number),
        (tokens::STOCK_CODE, product.stock_code.as_str()),
        (tokens::BRAND, product.brand.as_str()),
        (tokens::GROUP, product.group.as_str()),
        (tokens::DATE, date.as_str()),
        (tokens::CURRENCY, CURRENCY_SYMBOL),
    ];

    let mut output = content.to_string();
    for (token, value) in pairs {
        if output.contains(token) {
            output = output.replace(token, value);
        }
    }
    output
}

/// Format a price in Turkish convention: dot for thousands, comma for
/// decimals, always two fraction digits.
///
/// # Examples
///
/// ```
/// use mercan_label::format_price;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_price(Decimal::new(1299, 1)), "129,90");
/// assert_eq!(format_price(Decimal::new(123456, 2)), "1.234,56");
/// assert_eq!(format_price(Decimal::new(5, 0)), "5,00");
/// ```
pub fn format_price(price: Decimal) -> String {
    let rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.2}", rounded);
    let (raw_int, frac) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
    let (sign, digits) = match raw_int.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw_int),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped},{frac}")
}

//! Built-in paper sizes and their factory templates

use shared::{
    GridLayout, LabelTemplate, LayoutItem, PaperKind, PaperSize, TextAlign, BARCODE_MIN_HEIGHT,
    BARCODE_MIN_WIDTH,
};

use crate::substitute::tokens;

/// Paper size selected on first run and after a removal
pub const DEFAULT_PAPER_SIZE: &str = "Termal 30x60mm";

/// The factory paper size catalog
///
/// Thermal names follow the Turkish roll convention (height x width).
pub fn built_in_sizes() -> Vec<PaperSize> {
    vec![
        PaperSize::thermal("Termal 30x60mm", 60.0, 30.0),
        PaperSize::thermal("Termal 40x60mm", 60.0, 40.0),
        PaperSize::thermal("Termal 50x100mm", 100.0, 50.0),
        a4_sticker_sheet(),
    ]
}

/// A4 sheet carrying 3 columns x 7 rows of stickers
fn a4_sticker_sheet() -> PaperSize {
    PaperSize {
        name: "A4 Etiket (3x7)".to_string(),
        width_px: 794,
        height_px: 1123,
        width_mm: Some(210.0),
        height_mm: Some(297.0),
        kind: PaperKind::Grid,
        grid: Some(GridLayout {
            columns: 3,
            rows_per_sheet: 7,
            margin_top_px: 57,
            margin_left_px: 27,
            column_gap_px: 10,
            row_gap_px: 0,
            label_width_px: 240,
            label_height_px: 144,
        }),
        is_custom: false,
    }
}

/// Factory template for a built-in size, `None` for custom sizes
///
/// The standard layout is product name on top, price centered below,
/// barcode pinned to the bottom edge.
pub fn default_template(paper_size_name: &str) -> Option<LabelTemplate> {
    let size = built_in_sizes()
        .into_iter()
        .find(|size| size.name == paper_size_name)?;
    let box_width = size.label_width_px() as f32;
    let box_height = size.label_height_px() as f32;

    Some(LabelTemplate {
        paper_size_name: paper_size_name.to_string(),
        items: standard_items(box_width, box_height),
    })
}

fn standard_items(box_width: f32, box_height: f32) -> Vec<LayoutItem> {
    let mut name = LayoutItem::new_text(8.0, 4.0, box_width - 16.0, 29.0, tokens::PRODUCT_NAME);
    if let Some(text) = name.text_mut() {
        text.font_size_px = 11.0;
        text.bold = true;
        text.max_lines = 2;
    }

    let mut price = LayoutItem::new_text(
        8.0,
        36.0,
        box_width - 16.0,
        21.0,
        format!("{} {}", tokens::PRICE, tokens::CURRENCY),
    );
    if let Some(text) = price.text_mut() {
        text.font_size_px = 16.0;
        text.bold = true;
        text.text_align = TextAlign::Center;
    }

    let barcode_x = ((box_width - BARCODE_MIN_WIDTH) / 2.0).round();
    let mut barcode = LayoutItem::new_text(
        barcode_x,
        box_height - BARCODE_MIN_HEIGHT - 4.0,
        BARCODE_MIN_WIDTH,
        BARCODE_MIN_HEIGHT,
        tokens::BARCODE,
    );
    if let Some(text) = barcode.text_mut() {
        text.apply_barcode_defaults();
    }

    vec![name, price, barcode]
}

//! Render pipeline
//!
//! One pure layout pass shared by both backends: every item resolves to
//! a [`RenderInstruction`] carrying its frame and fully-materialized
//! content (substituted text, encoded bars, QR matrix). The preview
//! backend turns instructions into paint ops for the editor canvas; the
//! document backend emits the self-contained print document. Centering
//! math lives here once, so both backends place glyphs identically.

pub mod barcode;
pub mod document;
pub mod preview;

use chrono::NaiveDate;
use serde::Serialize;
use shared::{ItemBody, LabelTemplate, LayoutItem, Product, ShapeBorder, TextAlign, TextItem, TextStyleVariant};
use tracing::warn;
use uuid::Uuid;

use crate::substitute::substitute;

pub use barcode::QrMatrix;
pub use document::{paginate, render_document, PrintDocument};
pub use preview::{render_preview, PaintOp, PreviewScene};

/// Box height at or below `factor * font_size` renders as a single line
const SINGLE_LINE_HEIGHT_FACTOR: f32 = 1.6;

/// Line advance for the human-readable barcode label
const BARCODE_TEXT_LINE_FACTOR: f32 = 1.2;

/// Resolved rendering mode, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Barcode,
    QrCode,
    Shape,
    Text,
}

/// Mode of an item from its explicit flags only
///
/// Sentinel contents were already folded into the flags at authoring
/// time; they are never inspected here.
pub fn resolve_mode(item: &LayoutItem) -> RenderMode {
    match &item.body {
        ItemBody::Text(text) if text.is_barcode => RenderMode::Barcode,
        ItemBody::Text(text) if text.is_qr_code => RenderMode::QrCode,
        ItemBody::Shape(_) => RenderMode::Shape,
        ItemBody::Text(_) => RenderMode::Text,
    }
}

/// Absolute item box in label-local pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Frame {
    fn of(item: &LayoutItem) -> Self {
        Self {
            x: item.x,
            y: item.y,
            width: item.width,
            height: item.height,
        }
    }
}

/// Text overflow handling for a laid-out box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "policy", content = "lines")]
pub enum OverflowPolicy {
    /// Clamp to this many lines, ellipsis on overflow, word-break on
    ClampLines(u32),
    /// No wrap, trailing ellipsis
    SingleLine,
    /// Wrap freely with no line limit
    FreeWrap,
}

/// Font and alignment subset carried into both backends
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size_px: f32,
    pub bold: bool,
    pub style_variant: TextStyleVariant,
    pub color: String,
    pub text_align: TextAlign,
}

impl TextStyle {
    fn of(text: &TextItem) -> Self {
        Self {
            font_family: text.font_family.clone(),
            font_size_px: text.font_size_px,
            bold: text.bold,
            style_variant: text.style_variant,
            color: text.color.clone(),
            text_align: text.text_align,
        }
    }
}

/// Materialized content of one instruction
#[derive(Debug, Clone, PartialEq)]
pub enum RenderContent {
    Text {
        content: String,
        style: TextStyle,
        overflow: OverflowPolicy,
    },
    Barcode {
        value: String,
        bars: Vec<bool>,
        module_width: u32,
        bar_height_px: u32,
        show_text: bool,
        font_size_px: f32,
        color: String,
    },
    QrCode {
        value: String,
        matrix: QrMatrix,
        color: String,
    },
    Shape {
        fill_color: String,
        border: Option<ShapeBorder>,
    },
}

/// One fully-resolved item, ready for either backend
#[derive(Debug, Clone, PartialEq)]
pub struct RenderInstruction {
    pub item_id: Uuid,
    pub frame: Frame,
    pub content: RenderContent,
}

/// Overflow policy per the box height heuristic
fn overflow_policy(height: f32, text: &TextItem) -> OverflowPolicy {
    if text.max_lines > 1 {
        OverflowPolicy::ClampLines(text.max_lines)
    } else if height <= SINGLE_LINE_HEIGHT_FACTOR * text.font_size_px {
        OverflowPolicy::SingleLine
    } else {
        OverflowPolicy::FreeWrap
    }
}

/// Resolve one item against a product
///
/// `None` when a barcode/QR payload cannot be encoded; the failure is
/// logged and the rest of the label still renders.
pub fn layout_item(item: &LayoutItem, product: &Product, today: NaiveDate) -> Option<RenderInstruction> {
    let frame = Frame::of(item);

    let content = match &item.body {
        ItemBody::Shape(shape) => RenderContent::Shape {
            fill_color: shape.fill_color.clone(),
            border: shape.border.clone(),
        },
        ItemBody::Text(text) => {
            let value = substitute(&text.content, product, today);
            match resolve_mode(item) {
                RenderMode::Barcode => match barcode::encode_code128(&value) {
                    Ok(bars) => RenderContent::Barcode {
                        value,
                        bars,
                        module_width: text.barcode_module_width.max(1),
                        bar_height_px: text.barcode_height_px,
                        show_text: text.show_barcode_text,
                        font_size_px: text.font_size_px,
                        color: text.color.clone(),
                    },
                    Err(err) => {
                        warn!(item_id = %item.id, %err, "barcode item left unrendered");
                        return None;
                    }
                },
                RenderMode::QrCode => match barcode::encode_qr(&value) {
                    Ok(matrix) => RenderContent::QrCode {
                        value,
                        matrix,
                        color: text.color.clone(),
                    },
                    Err(err) => {
                        warn!(item_id = %item.id, %err, "QR item left unrendered");
                        return None;
                    }
                },
                _ => RenderContent::Text {
                    content: value,
                    style: TextStyle::of(text),
                    overflow: overflow_policy(frame.height, text),
                },
            }
        }
    };

    Some(RenderInstruction {
        item_id: item.id,
        frame,
        content,
    })
}

/// Resolve a whole template, preserving z-order
pub fn layout_template(
    template: &LabelTemplate,
    product: &Product,
    today: NaiveDate,
) -> Vec<RenderInstruction> {
    template
        .items
        .iter()
        .filter_map(|item| layout_item(item, product, today))
        .collect()
}

/// Bars block placement: centered both axes, independent of text_align
///
/// When the human-readable line is shown it sits directly below the
/// bars, and the pair is centered as one glyph.
pub fn barcode_geometry(
    frame: &Frame,
    module_count: usize,
    module_width: u32,
    bar_height_px: u32,
    show_text: bool,
    font_size_px: f32,
) -> Frame {
    let glyph_width = (module_count as u32 * module_width) as f32;
    let text_height = if show_text {
        font_size_px * BARCODE_TEXT_LINE_FACTOR
    } else {
        0.0
    };
    let glyph_height = bar_height_px as f32 + text_height;

    Frame {
        x: frame.x + ((frame.width - glyph_width) / 2.0).max(0.0),
        y: frame.y + ((frame.height - glyph_height) / 2.0).max(0.0),
        width: glyph_width,
        height: bar_height_px as f32,
    }
}

/// QR placement: square of `min(width, height)`, centered
///
/// Returns the symbol frame and the size of one module cell.
pub fn qr_geometry(frame: &Frame, module_count: usize) -> (Frame, f32) {
    let side = frame.width.min(frame.height);
    let cell = side / module_count.max(1) as f32;

    let symbol = Frame {
        x: frame.x + (frame.width - side) / 2.0,
        y: frame.y + (frame.height - side) / 2.0,
        width: side,
        height: side,
    };
    (symbol, cell)
}

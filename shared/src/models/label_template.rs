//! Label Template Model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum box width enforced when an item becomes a barcode
pub const BARCODE_MIN_WIDTH: f32 = 150.0;
/// Minimum box height enforced when an item becomes a barcode
pub const BARCODE_MIN_HEIGHT: f32 = 50.0;
/// Code-128 module width applied on flagging
pub const DEFAULT_BARCODE_MODULE_WIDTH: u32 = 2;
/// Bar height in px applied on flagging
pub const DEFAULT_BARCODE_HEIGHT_PX: u32 = 40;
/// Font size for the human-readable line applied on flagging
pub const DEFAULT_BARCODE_FONT_SIZE: f32 = 12.0;

/// Text alignment
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Font style variant (italic / stretch combinations)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TextStyleVariant {
    #[default]
    Normal,
    Italic,
    SemiCondensed,
    SemiCondensedItalic,
}

/// Text item payload
///
/// `content` may embed `{{VAR}}` tokens or be literal. The `is_barcode`
/// and `is_qr_code` flags are the render-time source of truth; the
/// sentinel contents only set them during authoring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextItem {
    pub content: String,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size_px: f32,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub style_variant: TextStyleVariant,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub text_align: TextAlign,
    /// >1 enables clamped multi-line wrapping, =1 forces single-line
    /// ellipsis when the box is short
    #[serde(default = "default_max_lines")]
    pub max_lines: u32,
    #[serde(default)]
    pub is_barcode: bool,
    #[serde(default)]
    pub is_qr_code: bool,
    #[serde(default = "default_module_width")]
    pub barcode_module_width: u32,
    #[serde(default = "default_barcode_height")]
    pub barcode_height_px: u32,
    #[serde(default = "default_true")]
    pub show_barcode_text: bool,
}

impl TextItem {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            font_family: default_font_family(),
            font_size_px: default_font_size(),
            bold: false,
            style_variant: TextStyleVariant::Normal,
            color: default_color(),
            text_align: TextAlign::Left,
            max_lines: default_max_lines(),
            is_barcode: false,
            is_qr_code: false,
            barcode_module_width: default_module_width(),
            barcode_height_px: default_barcode_height(),
            show_barcode_text: default_true(),
        }
    }

    /// Display defaults applied when an item becomes a barcode.
    pub fn apply_barcode_defaults(&mut self) {
        self.is_barcode = true;
        self.text_align = TextAlign::Center;
        self.barcode_module_width = DEFAULT_BARCODE_MODULE_WIDTH;
        self.barcode_height_px = DEFAULT_BARCODE_HEIGHT_PX;
        self.font_size_px = DEFAULT_BARCODE_FONT_SIZE;
    }

    /// Display defaults applied when an item becomes a QR code.
    pub fn apply_qr_defaults(&mut self) {
        self.is_qr_code = true;
        self.text_align = TextAlign::Center;
    }
}

fn default_font_family() -> String {
    "Arial".to_string()
}

fn default_font_size() -> f32 {
    12.0
}

fn default_color() -> String {
    "#000000".to_string()
}

fn default_max_lines() -> u32 {
    1
}

fn default_module_width() -> u32 {
    DEFAULT_BARCODE_MODULE_WIDTH
}

fn default_barcode_height() -> u32 {
    DEFAULT_BARCODE_HEIGHT_PX
}

fn default_true() -> bool {
    true
}

fn default_fill_color() -> String {
    "#e0e0e0".to_string()
}

/// Shape border stroke
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShapeBorder {
    pub thickness_px: f32,
    pub color: String,
}

/// Shape item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ShapeItem {
    #[serde(default = "default_fill_color")]
    pub fill_color: String,
    #[serde(default)]
    pub border: Option<ShapeBorder>,
}

impl ShapeItem {
    pub fn new() -> Self {
        Self {
            fill_color: default_fill_color(),
            border: None,
        }
    }
}

/// Item payload, tagged by kind
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ItemBody {
    Text(TextItem),
    Shape(ShapeItem),
}

/// One positioned element on a label
///
/// Coordinates are label-local pixels, top-left origin. Items never
/// share an `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayoutItem {
    pub id: Uuid,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(flatten)]
    pub body: ItemBody,
}

impl LayoutItem {
    pub fn new_text(x: f32, y: f32, width: f32, height: f32, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            width,
            height,
            body: ItemBody::Text(TextItem::new(content)),
        }
    }

    pub fn new_shape(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            width,
            height,
            body: ItemBody::Shape(ShapeItem::new()),
        }
    }

    pub fn text(&self) -> Option<&TextItem> {
        match &self.body {
            ItemBody::Text(text) => Some(text),
            ItemBody::Shape(_) => None,
        }
    }

    pub fn text_mut(&mut self) -> Option<&mut TextItem> {
        match &mut self.body {
            ItemBody::Text(text) => Some(text),
            ItemBody::Shape(_) => None,
        }
    }

    pub fn shape(&self) -> Option<&ShapeItem> {
        match &self.body {
            ItemBody::Shape(shape) => Some(shape),
            ItemBody::Text(_) => None,
        }
    }

    pub fn shape_mut(&mut self) -> Option<&mut ShapeItem> {
        match &mut self.body {
            ItemBody::Shape(shape) => Some(shape),
            ItemBody::Text(_) => None,
        }
    }

    /// Whether a label-local point falls inside the item box
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }
}

/// Label template: the ordered item layout for one paper size
///
/// Array order is paint/z-order, front = later. There is no separate
/// z-index field; reorder commands mutate array position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelTemplate {
    pub paper_size_name: String,
    #[serde(default)]
    pub items: Vec<LayoutItem>,
}

impl LabelTemplate {
    /// Empty shell for a paper size with no stored or default template
    pub fn empty(paper_size_name: impl Into<String>) -> Self {
        Self {
            paper_size_name: paper_size_name.into(),
            items: Vec::new(),
        }
    }

    /// Human-readable JSON for clipboard/support export (one-way)
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

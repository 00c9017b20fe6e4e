//! Template editor state machine
//!
//! Drives the canvas designer: selection, two-press drag, keyboard
//! nudge/resize, zoom, z-order and patch-style item updates. All
//! pointer input arrives in screen pixels and is divided by the zoom
//! factor before hit-testing; item geometry itself always stays in
//! label-local pixels.

use serde::{Deserialize, Serialize};
use shared::{
    ItemBody, LabelTemplate, LayoutItem, ShapeBorder, TextAlign, TextStyleVariant,
    BARCODE_MIN_HEIGHT, BARCODE_MIN_WIDTH,
};
use uuid::Uuid;

use crate::substitute::tokens;

pub const ZOOM_MIN: f32 = 0.5;
pub const ZOOM_MAX: f32 = 2.0;
/// Keyboard nudge distance in label px
pub const NUDGE_STEP: f32 = 1.0;
/// Nudge distance with the fast modifier held
pub const NUDGE_STEP_FAST: f32 = 10.0;
/// Smallest width/height an item can be resized to
pub const MIN_ITEM_SIZE: f32 = 10.0;

/// Interaction state of the canvas
///
/// Dragging only starts on a press over the already-selected item, so
/// the first click on an item never moves it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorState {
    Idle,
    Selected {
        item_id: Uuid,
    },
    Dragging {
        item_id: Uuid,
        /// Pointer offset from the item origin at drag start, label px
        offset_x: f32,
        offset_y: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowKey {
    Up,
    Down,
    Left,
    Right,
}

/// Partial update for the selected item, all fields optional
///
/// Setting `content` re-runs barcode/QR sentinel detection; explicit
/// `is_barcode`/`is_qr_code` values in the same patch override whatever
/// the detection decided. `border` can only set a border; clearing goes
/// through [`TemplateEditor::clear_border`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemUpdate {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub content: Option<String>,
    pub font_family: Option<String>,
    pub font_size_px: Option<f32>,
    pub bold: Option<bool>,
    pub style_variant: Option<TextStyleVariant>,
    pub color: Option<String>,
    pub text_align: Option<TextAlign>,
    pub max_lines: Option<u32>,
    pub is_barcode: Option<bool>,
    pub is_qr_code: Option<bool>,
    pub barcode_module_width: Option<u32>,
    pub barcode_height_px: Option<u32>,
    pub show_barcode_text: Option<bool>,
    pub fill_color: Option<String>,
    pub border: Option<ShapeBorder>,
}

/// Wrap estimate for the editor's overflow warning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineEstimate {
    pub lines: u32,
    pub overflow: bool,
}

/// Estimate how many lines an item's content will occupy when wrapped
///
/// Uses the 0.6em average glyph width heuristic; exact metrics belong
/// to the rendering side. `None` for shapes and barcode/QR items.
pub fn estimate_line_count(item: &LayoutItem) -> Option<LineEstimate> {
    let text = item.text()?;
    if text.is_barcode || text.is_qr_code {
        return None;
    }

    let chars_per_line = ((item.width / (text.font_size_px * 0.6)).floor() as u32).max(1);
    let mut lines = 0u32;
    for segment in text.content.split('\n') {
        let len = segment.chars().count() as u32;
        lines += len.div_ceil(chars_per_line).max(1);
    }

    Some(LineEstimate {
        lines,
        overflow: lines > text.max_lines,
    })
}

/// Canvas editor over one template
#[derive(Debug, Clone)]
pub struct TemplateEditor {
    template: LabelTemplate,
    state: EditorState,
    zoom: f32,
}

impl TemplateEditor {
    pub fn new(template: LabelTemplate) -> Self {
        Self {
            template,
            state: EditorState::Idle,
            zoom: 1.0,
        }
    }

    pub fn template(&self) -> &LabelTemplate {
        &self.template
    }

    pub fn into_template(self) -> LabelTemplate {
        self.template
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn selected_id(&self) -> Option<Uuid> {
        match self.state {
            EditorState::Idle => None,
            EditorState::Selected { item_id } | EditorState::Dragging { item_id, .. } => {
                Some(item_id)
            }
        }
    }

    // ========== Zoom ==========

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// One step in, 0.1 at a time, capped at [`ZOOM_MAX`]
    pub fn zoom_in(&mut self) -> f32 {
        self.zoom = (((self.zoom * 10.0).round() + 1.0) / 10.0).min(ZOOM_MAX);
        self.zoom
    }

    /// One step out, 0.1 at a time, capped at [`ZOOM_MIN`]
    pub fn zoom_out(&mut self) -> f32 {
        self.zoom = (((self.zoom * 10.0).round() - 1.0) / 10.0).max(ZOOM_MIN);
        self.zoom
    }

    // ========== Pointer ==========

    /// Press at screen coordinates
    ///
    /// Hits the topmost item under the pointer. A press on the current
    /// selection starts a drag; on another item it moves the selection;
    /// on empty canvas it deselects.
    pub fn pointer_down(&mut self, screen_x: f32, screen_y: f32) {
        let point_x = screen_x / self.zoom;
        let point_y = screen_y / self.zoom;

        // later items paint on top, so search back to front
        let hit = self
            .template
            .items
            .iter()
            .rev()
            .find(|item| item.contains(point_x, point_y));

        self.state = match hit {
            Some(item) if Some(item.id) == self.selected_id() => EditorState::Dragging {
                item_id: item.id,
                offset_x: point_x - item.x,
                offset_y: point_y - item.y,
            },
            Some(item) => EditorState::Selected { item_id: item.id },
            None => EditorState::Idle,
        };
    }

    /// Pointer movement; only meaningful while dragging
    ///
    /// Positions stay fractional during the drag and are rounded on
    /// release, so slow zoomed-in drags do not accumulate rounding.
    pub fn pointer_move(&mut self, screen_x: f32, screen_y: f32) {
        let EditorState::Dragging {
            item_id,
            offset_x,
            offset_y,
        } = self.state
        else {
            return;
        };

        let point_x = screen_x / self.zoom;
        let point_y = screen_y / self.zoom;
        if let Some(item) = self.item_mut(item_id) {
            item.x = point_x - offset_x;
            item.y = point_y - offset_y;
        }
    }

    /// Release: commit the drag to whole pixels and keep the selection
    pub fn pointer_up(&mut self) {
        if let EditorState::Dragging { item_id, .. } = self.state {
            if let Some(item) = self.item_mut(item_id) {
                item.x = item.x.round();
                item.y = item.y.round();
            }
            self.state = EditorState::Selected { item_id };
        }
    }

    /// Pointer left the canvas mid-drag; treated as a release
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    // ========== Keyboard ==========

    /// Arrow key on the selection
    ///
    /// Moves by 1px, or 10px with `fast`. With `resize`, Left/Right
    /// change width and Up/Down change height instead, never below
    /// [`MIN_ITEM_SIZE`]. Returns whether the key was consumed, so the
    /// caller can suppress canvas scrolling.
    pub fn arrow_key(&mut self, key: ArrowKey, fast: bool, resize: bool) -> bool {
        let EditorState::Selected { item_id } = self.state else {
            return false;
        };
        let Some(item) = self.item_mut(item_id) else {
            return false;
        };

        let step = if fast { NUDGE_STEP_FAST } else { NUDGE_STEP };
        if resize {
            match key {
                ArrowKey::Left => item.width = (item.width - step).max(MIN_ITEM_SIZE),
                ArrowKey::Right => item.width += step,
                ArrowKey::Up => item.height = (item.height - step).max(MIN_ITEM_SIZE),
                ArrowKey::Down => item.height += step,
            }
        } else {
            match key {
                ArrowKey::Left => item.x -= step,
                ArrowKey::Right => item.x += step,
                ArrowKey::Up => item.y -= step,
                ArrowKey::Down => item.y += step,
            }
        }
        true
    }

    // ========== Items ==========

    /// Insert a literal text item and select it
    pub fn add_text(&mut self) -> Uuid {
        self.insert(LayoutItem::new_text(10.0, 10.0, 120.0, 16.0, "Metin"))
    }

    /// Insert a filled shape and select it
    pub fn add_shape(&mut self) -> Uuid {
        self.insert(LayoutItem::new_shape(10.0, 10.0, 100.0, 50.0))
    }

    /// Insert a token item and select it
    ///
    /// The barcode and QR sentinels come in pre-flagged and pre-sized;
    /// any other token is an ordinary text item.
    pub fn add_variable(&mut self, token: &str) -> Uuid {
        let item = match token {
            tokens::BARCODE => {
                let mut item = LayoutItem::new_text(
                    10.0,
                    10.0,
                    BARCODE_MIN_WIDTH,
                    BARCODE_MIN_HEIGHT,
                    token,
                );
                if let Some(text) = item.text_mut() {
                    text.apply_barcode_defaults();
                }
                item
            }
            tokens::BARCODE_QR => {
                let mut item = LayoutItem::new_text(10.0, 10.0, 100.0, 100.0, token);
                if let Some(text) = item.text_mut() {
                    text.apply_qr_defaults();
                }
                item
            }
            _ => LayoutItem::new_text(10.0, 10.0, 140.0, 16.0, token),
        };
        self.insert(item)
    }

    fn insert(&mut self, item: LayoutItem) -> Uuid {
        let item_id = item.id;
        self.template.items.push(item);
        self.state = EditorState::Selected { item_id };
        item_id
    }

    /// Remove the selected item; false when nothing is selected
    pub fn delete_selected(&mut self) -> bool {
        let Some(item_id) = self.selected_id() else {
            return false;
        };
        let Some(index) = self.index_of(item_id) else {
            return false;
        };
        self.template.items.remove(index);
        self.state = EditorState::Idle;
        true
    }

    /// Apply a patch to the selected item; false when nothing is selected
    pub fn update_selected(&mut self, patch: ItemUpdate) -> bool {
        let Some(item_id) = self.selected_id() else {
            return false;
        };
        let Some(item) = self.item_mut(item_id) else {
            return false;
        };

        if let Some(x) = patch.x {
            item.x = x;
        }
        if let Some(y) = patch.y {
            item.y = y;
        }
        if let Some(width) = patch.width {
            item.width = width.max(MIN_ITEM_SIZE);
        }
        if let Some(height) = patch.height {
            item.height = height.max(MIN_ITEM_SIZE);
        }

        match &mut item.body {
            ItemBody::Text(text) => {
                if let Some(font_family) = patch.font_family {
                    text.font_family = font_family;
                }
                if let Some(font_size_px) = patch.font_size_px {
                    text.font_size_px = font_size_px;
                }
                if let Some(bold) = patch.bold {
                    text.bold = bold;
                }
                if let Some(style_variant) = patch.style_variant {
                    text.style_variant = style_variant;
                }
                if let Some(color) = patch.color {
                    text.color = color;
                }
                if let Some(text_align) = patch.text_align {
                    text.text_align = text_align;
                }
                if let Some(max_lines) = patch.max_lines {
                    text.max_lines = max_lines.max(1);
                }

                // line count or font changes re-derive the box height;
                // barcode/QR boxes size from their glyph instead
                if (patch.max_lines.is_some() || patch.font_size_px.is_some())
                    && !text.is_barcode
                    && !text.is_qr_code
                {
                    item.height = (text.font_size_px * 1.3 * text.max_lines as f32).round();
                }

                // sentinels match the whole content exactly; defaults only
                // apply on the flag transition, so editing an already
                // flagged item keeps its tuned module width and bar height
                if let Some(content) = patch.content {
                    text.content = content;
                    if text.content == tokens::BARCODE_QR {
                        if !text.is_qr_code {
                            text.apply_qr_defaults();
                        }
                        text.is_barcode = false;
                    } else if text.content == tokens::BARCODE {
                        if !text.is_barcode {
                            text.apply_barcode_defaults();
                            // a readable barcode needs room; grow, never shrink
                            item.width = item.width.max(BARCODE_MIN_WIDTH);
                            item.height = item.height.max(BARCODE_MIN_HEIGHT);
                        }
                        text.is_qr_code = false;
                    } else {
                        text.is_barcode = false;
                        text.is_qr_code = false;
                    }
                }

                // explicit flags beat sentinel detection
                if let Some(is_barcode) = patch.is_barcode {
                    if is_barcode && !text.is_barcode {
                        text.apply_barcode_defaults();
                        item.width = item.width.max(BARCODE_MIN_WIDTH);
                        item.height = item.height.max(BARCODE_MIN_HEIGHT);
                    } else if !is_barcode {
                        text.is_barcode = false;
                    }
                }
                if let Some(is_qr_code) = patch.is_qr_code {
                    if is_qr_code && !text.is_qr_code {
                        text.apply_qr_defaults();
                    } else if !is_qr_code {
                        text.is_qr_code = false;
                    }
                }

                if let Some(barcode_module_width) = patch.barcode_module_width {
                    text.barcode_module_width = barcode_module_width.max(1);
                }
                if let Some(barcode_height_px) = patch.barcode_height_px {
                    text.barcode_height_px = barcode_height_px;
                }
                if let Some(show_barcode_text) = patch.show_barcode_text {
                    text.show_barcode_text = show_barcode_text;
                }
            }
            ItemBody::Shape(shape) => {
                if let Some(fill_color) = patch.fill_color {
                    shape.fill_color = fill_color;
                }
                if let Some(border) = patch.border {
                    shape.border = Some(border);
                }
            }
        }
        true
    }

    /// Remove the border of the selected shape
    pub fn clear_border(&mut self) -> bool {
        let Some(item_id) = self.selected_id() else {
            return false;
        };
        let Some(shape) = self.item_mut(item_id).and_then(|item| item.shape_mut()) else {
            return false;
        };
        shape.border = None;
        true
    }

    // ========== Z-order ==========
    // Array position is paint order; no z-index field exists.

    /// Paint the selection first (bottom); false at the boundary
    pub fn send_to_back(&mut self) -> bool {
        let Some(index) = self.selected_index() else {
            return false;
        };
        if index == 0 {
            return false;
        }
        let item = self.template.items.remove(index);
        self.template.items.insert(0, item);
        true
    }

    /// Paint the selection last (top); false at the boundary
    pub fn bring_to_front(&mut self) -> bool {
        let Some(index) = self.selected_index() else {
            return false;
        };
        if index + 1 == self.template.items.len() {
            return false;
        }
        let item = self.template.items.remove(index);
        self.template.items.push(item);
        true
    }

    /// Swap one step toward the bottom; false at the boundary
    pub fn step_back(&mut self) -> bool {
        let Some(index) = self.selected_index() else {
            return false;
        };
        if index == 0 {
            return false;
        }
        self.template.items.swap(index, index - 1);
        true
    }

    /// Swap one step toward the top; false at the boundary
    pub fn step_forward(&mut self) -> bool {
        let Some(index) = self.selected_index() else {
            return false;
        };
        if index + 1 == self.template.items.len() {
            return false;
        }
        self.template.items.swap(index, index + 1);
        true
    }

    fn selected_index(&self) -> Option<usize> {
        self.selected_id().and_then(|item_id| self.index_of(item_id))
    }

    fn index_of(&self, item_id: Uuid) -> Option<usize> {
        self.template.items.iter().position(|item| item.id == item_id)
    }

    fn item_mut(&mut self, item_id: Uuid) -> Option<&mut LayoutItem> {
        self.template.items.iter_mut().find(|item| item.id == item_id)
    }
}

//! Paper Size Model

use serde::{Deserialize, Serialize};

/// mm → px conversion factor at 96 DPI (96 / 25.4).
pub const MM_TO_PX: f32 = 3.7795;

/// Convert physical millimeters to rendering pixels.
pub fn mm_to_px(mm: f32) -> u32 {
    (mm * MM_TO_PX).round().max(0.0) as u32
}

/// Derive millimeters back from pixels, for page sizing when mm was never stored.
pub fn px_to_mm(px: u32) -> f32 {
    px as f32 / MM_TO_PX
}

/// Physical paper kind
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaperKind {
    /// Roll paper, one label per physical page
    #[default]
    Thermal,
    /// Sheet paper carrying a grid of labels (e.g. A4 sticker sheets)
    Grid,
}

/// Sheet geometry for grid paper
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GridLayout {
    pub columns: u32,
    pub rows_per_sheet: u32,
    pub margin_top_px: u32,
    pub margin_left_px: u32,
    pub column_gap_px: u32,
    pub row_gap_px: u32,
    pub label_width_px: u32,
    pub label_height_px: u32,
}

impl GridLayout {
    /// Labels sharing one physical sheet
    pub fn items_per_sheet(&self) -> u32 {
        self.columns * self.rows_per_sheet
    }
}

/// Paper size entity
///
/// `width_px`/`height_px` are the rendering units; `width_mm`/`height_mm`
/// are kept when known so document page sizing stays exact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaperSize {
    pub name: String,
    pub width_px: u32,
    pub height_px: u32,
    pub width_mm: Option<f32>,
    pub height_mm: Option<f32>,
    #[serde(default)]
    pub kind: PaperKind,
    #[serde(default)]
    pub grid: Option<GridLayout>,
    #[serde(default)]
    pub is_custom: bool,
}

impl PaperSize {
    /// Thermal size from physical dimensions
    pub fn thermal(name: impl Into<String>, width_mm: f32, height_mm: f32) -> Self {
        Self {
            name: name.into(),
            width_px: mm_to_px(width_mm),
            height_px: mm_to_px(height_mm),
            width_mm: Some(width_mm),
            height_mm: Some(height_mm),
            kind: PaperKind::Thermal,
            grid: None,
            is_custom: false,
        }
    }

    /// Width of one label box in px (the full page for thermal paper)
    pub fn label_width_px(&self) -> u32 {
        match &self.grid {
            Some(grid) => grid.label_width_px,
            None => self.width_px,
        }
    }

    /// Height of one label box in px (the full page for thermal paper)
    pub fn label_height_px(&self) -> u32 {
        match &self.grid {
            Some(grid) => grid.label_height_px,
            None => self.height_px,
        }
    }

    /// Physical page width in mm, derived from px when not stored
    pub fn page_width_mm(&self) -> f32 {
        self.width_mm.unwrap_or_else(|| px_to_mm(self.width_px))
    }

    /// Physical page height in mm, derived from px when not stored
    pub fn page_height_mm(&self) -> f32 {
        self.height_mm.unwrap_or_else(|| px_to_mm(self.height_px))
    }

    /// Labels per physical page
    pub fn items_per_sheet(&self) -> u32 {
        match &self.grid {
            Some(grid) => grid.items_per_sheet(),
            None => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_to_px() {
        assert_eq!(mm_to_px(60.0), 227);
        assert_eq!(mm_to_px(30.0), 113);
        assert_eq!(mm_to_px(40.0), 151);
        assert_eq!(mm_to_px(20.0), 76);
        assert_eq!(mm_to_px(100.0), 378);
        assert_eq!(mm_to_px(50.0), 189);
    }

    #[test]
    fn test_px_to_mm_round_trip() {
        let px = mm_to_px(60.0);
        assert!((px_to_mm(px) - 60.0).abs() < 0.2);
    }

    #[test]
    fn test_thermal_constructor() {
        let size = PaperSize::thermal("Termal 30x60mm", 60.0, 30.0);
        assert_eq!(size.width_px, 227);
        assert_eq!(size.height_px, 113);
        assert_eq!(size.kind, PaperKind::Thermal);
        assert_eq!(size.items_per_sheet(), 1);
        assert_eq!(size.label_width_px(), 227);
        assert_eq!(size.label_height_px(), 113);
        assert!(!size.is_custom);
    }

    #[test]
    fn test_grid_geometry() {
        let grid = GridLayout {
            columns: 3,
            rows_per_sheet: 7,
            margin_top_px: 57,
            margin_left_px: 27,
            column_gap_px: 10,
            row_gap_px: 0,
            label_width_px: 240,
            label_height_px: 144,
        };
        assert_eq!(grid.items_per_sheet(), 21);

        let size = PaperSize {
            name: "A4 Etiket (3x7)".to_string(),
            width_px: 794,
            height_px: 1123,
            width_mm: Some(210.0),
            height_mm: Some(297.0),
            kind: PaperKind::Grid,
            grid: Some(grid),
            is_custom: false,
        };
        assert_eq!(size.items_per_sheet(), 21);
        assert_eq!(size.label_width_px(), 240);
        assert_eq!(size.label_height_px(), 144);
    }

    #[test]
    fn test_page_mm_derived_from_px() {
        let size = PaperSize {
            name: "px-only".to_string(),
            width_px: 227,
            height_px: 113,
            width_mm: None,
            height_mm: None,
            kind: PaperKind::Thermal,
            grid: None,
            is_custom: true,
        };
        assert!((size.page_width_mm() - 60.0).abs() < 0.2);
        assert!((size.page_height_mm() - 30.0).abs() < 0.2);
    }

    #[test]
    fn test_serde_round_trip() {
        let size = PaperSize::thermal("Mini", 40.0, 20.0);
        let json = serde_json::to_string(&size).unwrap();
        let back: PaperSize = serde_json::from_str(&json).unwrap();
        assert_eq!(back, size);
    }
}

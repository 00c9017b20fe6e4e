//! Editor preview backend
//!
//! Flattens render instructions into primitive paint ops over one label
//! box. Barcode bars and QR cells become positioned rectangles, so the
//! canvas only has to fill rects, stroke rects and draw text boxes.
//! Geometry comes from the shared helpers and therefore matches the
//! print document exactly.

use chrono::NaiveDate;
use serde::Serialize;
use shared::{LabelTemplate, PaperSize, Product};

use super::{
    barcode_geometry, layout_template, qr_geometry, OverflowPolicy, RenderContent, TextStyle,
};

/// One canvas drawing primitive, label-local coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PaintOp {
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: String,
    },
    StrokeRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        thickness_px: f32,
        color: String,
    },
    TextBox {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        content: String,
        style: TextStyle,
        overflow: OverflowPolicy,
    },
}

/// Paint list for one label, bottom-up
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewScene {
    pub width_px: u32,
    pub height_px: u32,
    pub ops: Vec<PaintOp>,
}

/// Render the editor's live view of a template against one product
pub fn render_preview(
    paper: &PaperSize,
    template: &LabelTemplate,
    product: &Product,
    today: NaiveDate,
) -> PreviewScene {
    let mut ops = Vec::new();

    for instruction in layout_template(template, product, today) {
        let frame = instruction.frame;
        match instruction.content {
            RenderContent::Shape { fill_color, border } => {
                ops.push(PaintOp::FillRect {
                    x: frame.x,
                    y: frame.y,
                    width: frame.width,
                    height: frame.height,
                    color: fill_color,
                });
                if let Some(border) = border {
                    ops.push(PaintOp::StrokeRect {
                        x: frame.x,
                        y: frame.y,
                        width: frame.width,
                        height: frame.height,
                        thickness_px: border.thickness_px,
                        color: border.color,
                    });
                }
            }

            RenderContent::Text {
                content,
                style,
                overflow,
            } => {
                ops.push(PaintOp::TextBox {
                    x: frame.x,
                    y: frame.y,
                    width: frame.width,
                    height: frame.height,
                    content,
                    style,
                    overflow,
                });
            }

            RenderContent::Barcode {
                value,
                bars,
                module_width,
                bar_height_px,
                show_text,
                font_size_px,
                color,
            } => {
                let bars_frame = barcode_geometry(
                    &frame,
                    bars.len(),
                    module_width,
                    bar_height_px,
                    show_text,
                    font_size_px,
                );
                push_bar_runs(&mut ops, &bars, module_width, &bars_frame, &color);

                if show_text {
                    ops.push(PaintOp::TextBox {
                        x: frame.x,
                        y: bars_frame.y + bars_frame.height,
                        width: frame.width,
                        height: font_size_px * 1.2,
                        content: value,
                        style: barcode_text_style(font_size_px, &color),
                        overflow: OverflowPolicy::SingleLine,
                    });
                }
            }

            RenderContent::QrCode { matrix, color, .. } => {
                let (symbol, cell) = qr_geometry(&frame, matrix.width());
                for y in 0..matrix.width() {
                    let mut x = 0;
                    while x < matrix.width() {
                        if !matrix.is_dark(x, y) {
                            x += 1;
                            continue;
                        }
                        // merge a horizontal run of dark cells into one rect
                        let start = x;
                        while x < matrix.width() && matrix.is_dark(x, y) {
                            x += 1;
                        }
                        ops.push(PaintOp::FillRect {
                            x: symbol.x + start as f32 * cell,
                            y: symbol.y + y as f32 * cell,
                            width: (x - start) as f32 * cell,
                            height: cell,
                            color: color.clone(),
                        });
                    }
                }
            }
        }
    }

    PreviewScene {
        width_px: paper.label_width_px(),
        height_px: paper.label_height_px(),
        ops,
    }
}

/// One fill rect per run of consecutive bar modules
fn push_bar_runs(
    ops: &mut Vec<PaintOp>,
    bars: &[bool],
    module_width: u32,
    bars_frame: &super::Frame,
    color: &str,
) {
    let module = module_width as f32;
    let mut index = 0;
    while index < bars.len() {
        if !bars[index] {
            index += 1;
            continue;
        }
        let start = index;
        while index < bars.len() && bars[index] {
            index += 1;
        }
        ops.push(PaintOp::FillRect {
            x: bars_frame.x + start as f32 * module,
            y: bars_frame.y,
            width: (index - start) as f32 * module,
            height: bars_frame.height,
            color: color.to_string(),
        });
    }
}

fn barcode_text_style(font_size_px: f32, color: &str) -> TextStyle {
    TextStyle {
        font_family: "Arial".to_string(),
        font_size_px,
        bold: false,
        style_variant: shared::TextStyleVariant::Normal,
        color: color.to_string(),
        text_align: shared::TextAlign::Center,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::{LayoutItem, ShapeBorder};

    fn create_test_product() -> Product {
        Product {
            id: 1,
            name: "Çay Bardağı".to_string(),
            price: Decimal::new(1299, 1),
            barcode: "8690123456789".to_string(),
            stock_code: "STK-001".to_string(),
            brand: String::new(),
            group: String::new(),
        }
    }

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()
    }

    fn thermal_paper() -> PaperSize {
        PaperSize::thermal("Termal 30x60mm", 60.0, 30.0)
    }

    #[test]
    fn test_scene_matches_label_box() {
        let template = LabelTemplate::empty("Termal 30x60mm");
        let scene = render_preview(&thermal_paper(), &template, &create_test_product(), test_date());
        assert_eq!(scene.width_px, 227);
        assert_eq!(scene.height_px, 113);
        assert!(scene.ops.is_empty());
    }

    #[test]
    fn test_text_item_becomes_text_box() {
        let mut template = LabelTemplate::empty("Termal 30x60mm");
        template.items.push(LayoutItem::new_text(8.0, 4.0, 211.0, 29.0, "{{URUN_ADI}}"));

        let scene = render_preview(&thermal_paper(), &template, &create_test_product(), test_date());
        assert_eq!(scene.ops.len(), 1);
        match &scene.ops[0] {
            PaintOp::TextBox { x, y, content, .. } => {
                assert_eq!((*x, *y), (8.0, 4.0));
                assert_eq!(content, "Çay Bardağı");
            }
            other => panic!("expected text box, got {other:?}"),
        }
    }

    #[test]
    fn test_shape_with_border_fills_then_strokes() {
        let mut template = LabelTemplate::empty("Termal 30x60mm");
        let mut item = LayoutItem::new_shape(0.0, 0.0, 100.0, 10.0);
        if let Some(shape) = item.shape_mut() {
            shape.border = Some(ShapeBorder {
                thickness_px: 2.0,
                color: "#000000".to_string(),
            });
        }
        template.items.push(item);

        let scene = render_preview(&thermal_paper(), &template, &create_test_product(), test_date());
        assert_eq!(scene.ops.len(), 2);
        assert!(matches!(scene.ops[0], PaintOp::FillRect { .. }));
        assert!(matches!(scene.ops[1], PaintOp::StrokeRect { thickness_px, .. } if thickness_px == 2.0));
    }

    #[test]
    fn test_barcode_bars_centered_with_label_line() {
        let mut template = LabelTemplate::empty("Termal 30x60mm");
        // 13 digits in set B need ~356px of bars at module width 2
        let mut item = LayoutItem::new_text(38.0, 59.0, 400.0, 60.0, "{{BARKOD}}");
        if let Some(text) = item.text_mut() {
            text.apply_barcode_defaults();
        }
        template.items.push(item);

        let scene = render_preview(&thermal_paper(), &template, &create_test_product(), test_date());

        let rects: Vec<_> = scene
            .ops
            .iter()
            .filter_map(|op| match op {
                PaintOp::FillRect { x, width, .. } => Some((*x, *width)),
                _ => None,
            })
            .collect();
        assert!(!rects.is_empty());

        // bar block is horizontally centered in the 400px box at x=38
        let first_bar = rects.iter().map(|(x, _)| *x).fold(f32::MAX, f32::min);
        let last_edge = rects.iter().map(|(x, w)| x + w).fold(0.0, f32::max);
        let left_space = first_bar - 38.0;
        let right_space = (38.0 + 400.0) - last_edge;
        assert!((left_space - right_space).abs() < 0.01);

        // human-readable line below the bars
        let text_box = scene.ops.iter().find_map(|op| match op {
            PaintOp::TextBox { y, content, .. } => Some((*y, content.clone())),
            _ => None,
        });
        let (text_y, content) = text_box.unwrap();
        assert_eq!(content, "8690123456789");
        let bars_top = scene
            .ops
            .iter()
            .find_map(|op| match op {
                PaintOp::FillRect { y, .. } => Some(*y),
                _ => None,
            })
            .unwrap();
        assert!(text_y > bars_top);
    }

    #[test]
    fn test_barcode_without_label_line() {
        let mut template = LabelTemplate::empty("Termal 30x60mm");
        let mut item = LayoutItem::new_text(0.0, 0.0, 150.0, 50.0, "{{BARKOD}}");
        if let Some(text) = item.text_mut() {
            text.apply_barcode_defaults();
            text.show_barcode_text = false;
        }
        template.items.push(item);

        let scene = render_preview(&thermal_paper(), &template, &create_test_product(), test_date());
        assert!(!scene.ops.iter().any(|op| matches!(op, PaintOp::TextBox { .. })));
    }

    #[test]
    fn test_qr_cells_fill_centered_square() {
        let mut template = LabelTemplate::empty("Termal 30x60mm");
        let mut item = LayoutItem::new_text(10.0, 5.0, 120.0, 80.0, "{{BARKOD_QR}}");
        if let Some(text) = item.text_mut() {
            text.apply_qr_defaults();
        }
        template.items.push(item);

        let scene = render_preview(&thermal_paper(), &template, &create_test_product(), test_date());

        // all cells stay inside the centered 80x80 square at (30, 5)
        for op in &scene.ops {
            let PaintOp::FillRect { x, y, width, height, .. } = op else {
                panic!("expected only fill rects, got {op:?}");
            };
            assert!(*x >= 30.0 - 0.01 && x + width <= 110.0 + 0.01);
            assert!(*y >= 5.0 - 0.01 && y + height <= 85.0 + 0.01);
        }
    }

    #[test]
    fn test_paint_order_follows_z_order() {
        let mut template = LabelTemplate::empty("Termal 30x60mm");
        template.items.push(LayoutItem::new_shape(0.0, 0.0, 50.0, 50.0));
        template.items.push(LayoutItem::new_text(0.0, 0.0, 50.0, 20.0, "ust"));

        let scene = render_preview(&thermal_paper(), &template, &create_test_product(), test_date());
        assert!(matches!(scene.ops[0], PaintOp::FillRect { .. }));
        assert!(matches!(scene.ops[1], PaintOp::TextBox { .. }));
    }
}

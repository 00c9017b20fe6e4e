//! Print document backend
//!
//! Emits one self-contained HTML document per print job: embedded
//! styles, `@page` physical sizing, absolutely-positioned labels and
//! inline SVG barcode/QR glyphs. Nothing external is referenced, and
//! the print trigger fires on the document's own load event, so the
//! document is ready the moment it exists.

use chrono::NaiveDate;
use shared::{LabelTemplate, PaperKind, PaperSize, Product, TextAlign, TextStyleVariant};
use uuid::Uuid;

use super::{
    barcode_geometry, layout_template, qr_geometry, OverflowPolicy, RenderContent,
    RenderInstruction, TextStyle,
};

/// Finished print job output
#[derive(Debug, Clone)]
pub struct PrintDocument {
    pub job_id: Uuid,
    pub paper_size_name: String,
    pub page_count: usize,
    pub label_count: usize,
    pub html: String,
}

/// Split a flat label sequence into physical pages
///
/// Thermal paper holds one label per page; grid paper holds
/// `items_per_sheet`. Row-major placement within a page is the
/// builder's job.
pub fn paginate<'a, T>(paper: &PaperSize, labels: &'a [T]) -> Vec<&'a [T]> {
    let per_page = paper.items_per_sheet().max(1) as usize;
    labels.chunks(per_page).collect()
}

/// Render a print document for a flat sequence of label instances
///
/// Each entry in `labels` is one physical label; the queue's `expand()`
/// produces this sequence. The template is laid out once per label
/// against that label's product.
pub fn render_document(
    paper: &PaperSize,
    template: &LabelTemplate,
    labels: &[&Product],
    today: NaiveDate,
) -> PrintDocument {
    let pages = paginate(paper, labels);
    let page_count = pages.len();

    let mut builder = DocumentBuilder::new(paper);
    for page in pages {
        builder.open_page();
        for (slot, product) in page.iter().enumerate() {
            let (left, top) = label_origin(paper, slot);
            let instructions = layout_template(template, product, today);
            builder.label(left, top, &instructions);
        }
        builder.close_page();
    }

    PrintDocument {
        job_id: Uuid::new_v4(),
        paper_size_name: paper.name.clone(),
        page_count,
        label_count: labels.len(),
        html: builder.finish(),
    }
}

/// Top-left corner of a label slot on its page, row-major
fn label_origin(paper: &PaperSize, slot: usize) -> (f32, f32) {
    match (&paper.kind, &paper.grid) {
        (PaperKind::Grid, Some(grid)) => {
            let column = (slot as u32) % grid.columns;
            let row = (slot as u32) / grid.columns;
            let left = grid.margin_left_px + column * (grid.label_width_px + grid.column_gap_px);
            let top = grid.margin_top_px + row * (grid.label_height_px + grid.row_gap_px);
            (left as f32, top as f32)
        }
        _ => (0.0, 0.0),
    }
}

/// Accumulates the document markup
struct DocumentBuilder {
    html: String,
}

impl DocumentBuilder {
    fn new(paper: &PaperSize) -> Self {
        let mut html = String::with_capacity(16 * 1024);
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>Etiket - {}</title>\n", escape(&paper.name)));
        html.push_str("<style>\n");
        html.push_str(&format!(
            "@page {{ size: {}mm {}mm; margin: 0; }}\n",
            paper.page_width_mm(),
            paper.page_height_mm()
        ));
        html.push_str("* { box-sizing: border-box; }\n");
        html.push_str("body { margin: 0; padding: 0; }\n");
        html.push_str(&format!(
            ".page {{ position: relative; width: {}px; height: {}px; overflow: hidden; }}\n",
            paper.width_px, paper.height_px
        ));
        // break between pages only; a break after the last one would
        // feed an extra blank page out of the printer
        html.push_str(".page:not(:last-child) { page-break-after: always; }\n");
        html.push_str(&format!(
            ".label {{ position: absolute; width: {}px; height: {}px; overflow: hidden; }}\n",
            paper.label_width_px(),
            paper.label_height_px()
        ));
        html.push_str(".item { position: absolute; }\n");
        html.push_str("</style>\n</head>\n<body>\n");
        Self { html }
    }

    fn open_page(&mut self) {
        self.html.push_str("<div class=\"page\">\n");
    }

    fn close_page(&mut self) {
        self.html.push_str("</div>\n");
    }

    fn label(&mut self, left: f32, top: f32, instructions: &[RenderInstruction]) {
        self.html.push_str(&format!(
            "<div class=\"label\" style=\"left:{left}px;top:{top}px;\">\n"
        ));
        for instruction in instructions {
            self.item(instruction);
        }
        self.html.push_str("</div>\n");
    }

    // === Items ===

    fn item(&mut self, instruction: &RenderInstruction) {
        let frame = instruction.frame;
        let box_style = format!(
            "left:{}px;top:{}px;width:{}px;height:{}px;",
            frame.x, frame.y, frame.width, frame.height
        );

        match &instruction.content {
            RenderContent::Shape { fill_color, border } => {
                let border_style = match border {
                    Some(border) => format!(
                        "border:{}px solid {};",
                        border.thickness_px,
                        escape(&border.color)
                    ),
                    None => String::new(),
                };
                self.html.push_str(&format!(
                    "<div class=\"item\" style=\"{box_style}background-color:{};{border_style}\"></div>\n",
                    escape(fill_color)
                ));
            }

            RenderContent::Text {
                content,
                style,
                overflow,
            } => {
                self.html.push_str(&format!(
                    "<div class=\"item\" style=\"{box_style}{}{}\">{}</div>\n",
                    font_css(style),
                    overflow_css(*overflow),
                    escape(content)
                ));
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
                    *module_width,
                    *bar_height_px,
                    *show_text,
                    *font_size_px,
                );
                self.html.push_str(&format!(
                    "<div class=\"item\" style=\"{box_style}\">\n"
                ));
                self.html.push_str(&format!(
                    "<svg style=\"position:absolute;left:{}px;top:{}px;\" width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
                    bars_frame.x - frame.x,
                    bars_frame.y - frame.y,
                    bars_frame.width,
                    bars_frame.height
                ));
                self.bar_rects(bars, *module_width, bars_frame.height, color);
                self.html.push_str("</svg>\n");

                if *show_text {
                    self.html.push_str(&format!(
                        "<div style=\"position:absolute;left:0;top:{}px;width:{}px;font-family:Arial;font-size:{}px;text-align:center;color:{};white-space:nowrap;overflow:hidden;\">{}</div>\n",
                        bars_frame.y - frame.y + bars_frame.height,
                        frame.width,
                        font_size_px,
                        escape(color),
                        escape(value)
                    ));
                }
                self.html.push_str("</div>\n");
            }

            RenderContent::QrCode { matrix, color, .. } => {
                let (symbol, cell) = qr_geometry(&frame, matrix.width());
                self.html.push_str(&format!(
                    "<div class=\"item\" style=\"{box_style}\">\n"
                ));
                self.html.push_str(&format!(
                    "<svg style=\"position:absolute;left:{}px;top:{}px;\" width=\"{}\" height=\"{}\" shape-rendering=\"crispEdges\" xmlns=\"http://www.w3.org/2000/svg\">\n",
                    symbol.x - frame.x,
                    symbol.y - frame.y,
                    symbol.width,
                    symbol.height
                ));
                self.qr_rects(matrix, cell, color);
                self.html.push_str("</svg>\n</div>\n");
            }
        }
    }

    /// One `<rect>` per run of consecutive bar modules
    fn bar_rects(&mut self, bars: &[bool], module_width: u32, height: f32, color: &str) {
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
            self.html.push_str(&format!(
                "<rect x=\"{}\" y=\"0\" width=\"{}\" height=\"{height}\" fill=\"{}\"/>\n",
                start as f32 * module,
                (index - start) as f32 * module,
                escape(color)
            ));
        }
    }

    /// Dark QR cells as horizontal run rects, transparent background
    fn qr_rects(&mut self, matrix: &super::QrMatrix, cell: f32, color: &str) {
        for y in 0..matrix.width() {
            let mut x = 0;
            while x < matrix.width() {
                if !matrix.is_dark(x, y) {
                    x += 1;
                    continue;
                }
                let start = x;
                while x < matrix.width() && matrix.is_dark(x, y) {
                    x += 1;
                }
                self.html.push_str(&format!(
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{cell}\" fill=\"{}\"/>\n",
                    start as f32 * cell,
                    y as f32 * cell,
                    (x - start) as f32 * cell,
                    escape(color)
                ));
            }
        }
    }

    fn finish(mut self) -> String {
        self.html.push_str(
            "<script>window.addEventListener('load', function () { window.print(); });</script>\n",
        );
        self.html.push_str("</body>\n</html>\n");
        self.html
    }
}

// === Styling ===

fn font_css(style: &TextStyle) -> String {
    let (font_style, font_stretch) = match style.style_variant {
        TextStyleVariant::Normal => ("normal", "normal"),
        TextStyleVariant::Italic => ("italic", "normal"),
        TextStyleVariant::SemiCondensed => ("normal", "semi-condensed"),
        TextStyleVariant::SemiCondensedItalic => ("italic", "semi-condensed"),
    };
    let text_align = match style.text_align {
        TextAlign::Left => "left",
        TextAlign::Center => "center",
        TextAlign::Right => "right",
    };
    format!(
        "font-family:{};font-size:{}px;font-weight:{};font-style:{font_style};font-stretch:{font_stretch};color:{};text-align:{text_align};line-height:1.3;",
        escape(&style.font_family),
        style.font_size_px,
        if style.bold { 700 } else { 400 },
        escape(&style.color)
    )
}

fn overflow_css(overflow: OverflowPolicy) -> String {
    match overflow {
        OverflowPolicy::ClampLines(lines) => format!(
            "display:-webkit-box;-webkit-line-clamp:{lines};-webkit-box-orient:vertical;overflow:hidden;word-break:break-word;"
        ),
        OverflowPolicy::SingleLine => {
            "white-space:nowrap;overflow:hidden;text-overflow:ellipsis;".to_string()
        }
        OverflowPolicy::FreeWrap => String::new(),
    }
}

/// Minimal HTML/attribute escaping for user-controlled strings
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::{GridLayout, LayoutItem};

    use crate::defaults;

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

    fn grid_paper() -> PaperSize {
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

    #[test]
    fn test_paginate_thermal_one_label_per_page() {
        let labels = vec![1, 2, 3, 4, 5];
        let pages = paginate(&thermal_paper(), &labels);
        assert_eq!(pages.len(), 5);
        assert!(pages.iter().all(|page| page.len() == 1));
    }

    #[test]
    fn test_paginate_grid_fills_sheets() {
        let labels: Vec<u32> = (0..50).collect();
        let pages = paginate(&grid_paper(), &labels);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].len(), 21);
        assert_eq!(pages[1].len(), 21);
        assert_eq!(pages[2].len(), 8);
    }

    #[test]
    fn test_paginate_empty() {
        let labels: Vec<u32> = Vec::new();
        assert!(paginate(&thermal_paper(), &labels).is_empty());
    }

    #[test]
    fn test_label_origin_row_major() {
        let paper = grid_paper();
        assert_eq!(label_origin(&paper, 0), (27.0, 57.0));
        assert_eq!(label_origin(&paper, 1), (277.0, 57.0)); // 27 + 240 + 10
        assert_eq!(label_origin(&paper, 2), (527.0, 57.0));
        assert_eq!(label_origin(&paper, 3), (27.0, 201.0)); // next row, 57 + 144 + 0
    }

    #[test]
    fn test_label_origin_thermal_is_page_origin() {
        assert_eq!(label_origin(&thermal_paper(), 0), (0.0, 0.0));
    }

    #[test]
    fn test_three_labels_three_page_blocks() {
        let paper = thermal_paper();
        let template = defaults::default_template(&paper.name).unwrap();
        let product = create_test_product();
        let labels = vec![&product, &product, &product];

        let document = render_document(&paper, &template, &labels, test_date());
        assert_eq!(document.page_count, 3);
        assert_eq!(document.label_count, 3);
        assert_eq!(document.paper_size_name, "Termal 30x60mm");
        assert_eq!(document.html.matches("<div class=\"page\">").count(), 3);
        // default template: name + price + barcode per label
        assert_eq!(document.html.matches("Çay Bardağı").count(), 3);
        assert_eq!(document.html.matches("129,90 ₺").count(), 3);
        assert_eq!(document.html.matches("<svg").count(), 3);
    }

    #[test]
    fn test_page_break_between_pages_only() {
        let paper = thermal_paper();
        let template = defaults::default_template(&paper.name).unwrap();
        let product = create_test_product();
        let labels = vec![&product, &product];

        let document = render_document(&paper, &template, &labels, test_date());
        assert!(document
            .html
            .contains(".page:not(:last-child) { page-break-after: always; }"));
        // the base page rule carries no break of its own
        let page_rule_start = document.html.find(".page {").unwrap();
        let page_rule_end = document.html[page_rule_start..].find('\n').unwrap() + page_rule_start;
        assert!(!document.html[page_rule_start..page_rule_end].contains("page-break-after"));
    }

    #[test]
    fn test_page_size_in_physical_units() {
        let paper = thermal_paper();
        let template = LabelTemplate::empty(&paper.name);
        let product = create_test_product();

        let document = render_document(&paper, &template, &[&product], test_date());
        assert!(document.html.contains("@page { size: 60mm 30mm; margin: 0; }"));
    }

    #[test]
    fn test_page_size_derived_when_mm_missing() {
        let mut paper = thermal_paper();
        paper.width_mm = None;
        paper.height_mm = None;
        let template = LabelTemplate::empty(&paper.name);
        let product = create_test_product();

        let document = render_document(&paper, &template, &[&product], test_date());
        // 227px / 3.7795 ≈ 60.06mm
        assert!(document.html.contains("@page { size: 60.06"));
    }

    #[test]
    fn test_grid_labels_positioned_on_sheet() {
        let paper = grid_paper();
        let template = defaults::default_template(&paper.name).unwrap();
        let product = create_test_product();
        let labels = vec![&product; 4];

        let document = render_document(&paper, &template, &labels, test_date());
        assert_eq!(document.page_count, 1);
        assert!(document.html.contains("left:27px;top:57px;"));
        assert!(document.html.contains("left:277px;top:57px;"));
        assert!(document.html.contains("left:527px;top:57px;"));
        assert!(document.html.contains("left:27px;top:201px;"));
    }

    #[test]
    fn test_document_is_self_contained() {
        let paper = thermal_paper();
        let template = defaults::default_template(&paper.name).unwrap();
        let product = create_test_product();

        let document = render_document(&paper, &template, &[&product], test_date());
        assert!(document.html.starts_with("<!DOCTYPE html>"));
        assert!(document.html.contains("window.print()"));
        assert!(!document.html.contains("<script src"));
        assert!(!document.html.contains("<link"));
    }

    #[test]
    fn test_text_content_is_escaped() {
        let paper = thermal_paper();
        let mut template = LabelTemplate::empty(&paper.name);
        template.items.push(LayoutItem::new_text(0.0, 0.0, 100.0, 20.0, "{{URUN_ADI}}"));
        let mut product = create_test_product();
        product.name = "6'lı <Set> & Co".to_string();

        let document = render_document(&paper, &template, &[&product], test_date());
        assert!(document.html.contains("6'lı &lt;Set&gt; &amp; Co"));
        assert!(!document.html.contains("<Set>"));
    }

    #[test]
    fn test_clamped_text_emits_line_clamp() {
        let paper = thermal_paper();
        let mut template = LabelTemplate::empty(&paper.name);
        let mut item = LayoutItem::new_text(0.0, 0.0, 100.0, 31.0, "uzun isim");
        if let Some(text) = item.text_mut() {
            text.max_lines = 2;
        }
        template.items.push(item);
        let product = create_test_product();

        let document = render_document(&paper, &template, &[&product], test_date());
        assert!(document.html.contains("-webkit-line-clamp:2"));
        assert!(document.html.contains("word-break:break-word"));
    }

    #[test]
    fn test_qr_svg_rects_use_item_color() {
        let paper = thermal_paper();
        let mut template = LabelTemplate::empty(&paper.name);
        let mut item = LayoutItem::new_text(0.0, 0.0, 100.0, 100.0, "{{BARKOD_QR}}");
        if let Some(text) = item.text_mut() {
            text.apply_qr_defaults();
            text.color = "#112233".to_string();
        }
        template.items.push(item);
        let product = create_test_product();

        let document = render_document(&paper, &template, &[&product], test_date());
        assert!(document.html.contains("fill=\"#112233\""));
        assert!(document.html.contains("shape-rendering=\"crispEdges\""));
    }

    #[test]
    fn test_empty_queue_renders_empty_document() {
        let paper = thermal_paper();
        let template = defaults::default_template(&paper.name).unwrap();

        let document = render_document(&paper, &template, &[], test_date());
        assert_eq!(document.page_count, 0);
        assert_eq!(document.label_count, 0);
        assert!(!document.html.contains("class=\"page\""));
    }

    #[test]
    fn test_job_ids_are_unique() {
        let paper = thermal_paper();
        let template = LabelTemplate::empty(&paper.name);
        let product = create_test_product();

        let a = render_document(&paper, &template, &[&product], test_date());
        let b = render_document(&paper, &template, &[&product], test_date());
        assert_ne!(a.job_id, b.job_id);
    }
}

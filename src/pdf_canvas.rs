//! PDF canvas – a [`Canvas`] backed by `printpdf` (v0.8 ops-based API).
//!
//! Composition is recorded through the embedded [`RecordingCanvas`];
//! `serialize` walks the frozen op stream and emits printpdf ops, flipping
//! from our top-left origin to PDF's bottom-left origin.

use printpdf::*;

use crate::canvas::{
    Align, Canvas, FontSpec, FontWeight, Frame, PageOp, RecordingCanvas, Rgb as CanvasRgb,
};
use crate::error::BuildError;

/// PDF-producing canvas. `serialize` returns the finished document bytes.
pub struct PdfCanvas {
    inner: RecordingCanvas,
    title: String,
}

impl PdfCanvas {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            inner: RecordingCanvas::new(),
            title: title.into(),
        }
    }
}

impl Canvas for PdfCanvas {
    fn set_cursor(&mut self, x: f32, y: f32) {
        self.inner.set_cursor(x, y);
    }

    fn cursor(&self) -> (f32, f32) {
        self.inner.cursor()
    }

    fn set_font(&mut self, family: &str, weight: FontWeight, size: f32) {
        self.inner.set_font(family, weight, size);
    }

    fn font(&self) -> FontSpec {
        self.inner.font()
    }

    fn set_text_color(&mut self, color: CanvasRgb) {
        self.inner.set_text_color(color);
    }

    fn text_color(&self) -> CanvasRgb {
        self.inner.text_color()
    }

    fn set_fill_color(&mut self, color: CanvasRgb) {
        self.inner.set_fill_color(color);
    }

    fn fill_color(&self) -> CanvasRgb {
        self.inner.fill_color()
    }

    fn draw_rect(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.inner.draw_rect(x1, y1, x2, y2);
    }

    fn draw_cell(&mut self, frame: Frame, text: &str, align: Align) -> f32 {
        self.inner.draw_cell(frame, text, align)
    }

    fn draw_wrapped_text(&mut self, frame: Frame, text: &str) -> f32 {
        self.inner.draw_wrapped_text(frame, text)
    }

    fn wrap_lines(&self, text: &str, font_size: f32, max_width: f32) -> Vec<String> {
        self.inner.wrap_lines(text, font_size, max_width)
    }

    fn draw_image(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        data: &[u8],
    ) -> Result<(), BuildError> {
        self.inner.draw_image(x, y, w, h, data)
    }

    fn new_page(&mut self) {
        self.inner.new_page();
    }

    fn page_index(&self) -> usize {
        self.inner.page_index()
    }

    fn page_size(&self) -> (f32, f32) {
        self.inner.page_size()
    }

    fn serialize(&self) -> Result<Vec<u8>, BuildError> {
        let (page_w_pt, page_h_pt) = self.inner.page_size();
        let page_w = Mm(page_w_pt * 0.352778); // pt → mm
        let page_h = Mm(page_h_pt * 0.352778);

        let mut doc = PdfDocument::new(&self.title);
        let mut img_warnings: Vec<PdfWarnMsg> = Vec::new();
        let mut pages = Vec::new();

        for page_ops in self.inner.pages() {
            let mut ops = Vec::new();
            for op in page_ops {
                match op {
                    PageOp::Rect { x1, y1, x2, y2, color } => {
                        ops.push(Op::SetFillColor {
                            col: to_pdf_color(*color),
                        });
                        ops.push(rect_polygon(*x1, page_h_pt - *y2, *x2, page_h_pt - *y1));
                    }
                    PageOp::Text { x, y, text, font, color } => {
                        let builtin = match font.weight {
                            FontWeight::Bold => BuiltinFont::HelveticaBold,
                            FontWeight::Regular => BuiltinFont::Helvetica,
                        };
                        // Baseline ≈ top of line + ascender (≈ 0.75 × size)
                        let baseline_y = page_h_pt - y - font.size * 0.75;

                        ops.push(Op::StartTextSection);
                        ops.push(Op::SetTextCursor {
                            pos: Point {
                                x: Pt(*x),
                                y: Pt(baseline_y),
                            },
                        });
                        ops.push(Op::SetFontSizeBuiltinFont {
                            size: Pt(font.size),
                            font: builtin,
                        });
                        ops.push(Op::SetFillColor {
                            col: to_pdf_color(*color),
                        });
                        ops.push(Op::WriteTextBuiltinFont {
                            items: vec![TextItem::Text(to_winlatin(text))],
                            font: builtin,
                        });
                        ops.push(Op::EndTextSection);
                    }
                    PageOp::Image { x, y, w, h, data } => {
                        // Decode with the `image` crate for pixel dimensions;
                        // register with printpdf as a reusable XObject.
                        let dyn_img = ::image::load_from_memory(data)
                            .map_err(|e| BuildError::ImageDecode(e.to_string()))?;
                        let (px_w, px_h) = (dyn_img.width() as f32, dyn_img.height() as f32);
                        let raw = RawImage::decode_from_bytes(data, &mut img_warnings)
                            .map_err(|e| BuildError::Render(format!("image encode: {e}")))?;
                        let xobj_id = doc.add_image(&raw);

                        // At dpi = 72, 1 px renders as 1 pt, so scale is
                        // desired_pt / px_dim.
                        ops.push(Op::UseXobject {
                            id: xobj_id,
                            transform: XObjectTransform {
                                translate_x: Some(Pt(*x)),
                                translate_y: Some(Pt(page_h_pt - y - h)),
                                dpi: Some(72.0),
                                scale_x: Some(if px_w > 0.0 { w / px_w } else { 1.0 }),
                                scale_y: Some(if px_h > 0.0 { h / px_h } else { 1.0 }),
                                rotate: None,
                            },
                        });
                    }
                }
            }
            pages.push(PdfPage::new(page_w, page_h, ops));
        }

        if pages.is_empty() {
            pages.push(PdfPage::new(page_w, page_h, Vec::new()));
        }

        doc.with_pages(pages);
        Ok(doc.save(&PdfSaveOptions::default(), &mut Vec::new()))
    }
}

fn to_pdf_color(c: CanvasRgb) -> Color {
    Color::Rgb(printpdf::Rgb {
        r: c.r as f32 / 255.0,
        g: c.g as f32 / 255.0,
        b: c.b as f32 / 255.0,
        icc_profile: None,
    })
}

/// Filled axis-aligned rectangle in PDF (bottom-left origin) coordinates.
fn rect_polygon(x1: f32, y1: f32, x2: f32, y2: f32) -> Op {
    let corner = |x: f32, y: f32| LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    };
    Op::DrawPolygon {
        polygon: Polygon {
            rings: vec![PolygonRing {
                points: vec![
                    corner(x1, y1),
                    corner(x2, y1),
                    corner(x2, y2),
                    corner(x1, y2),
                ],
            }],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        },
    }
}

/// Convert a UTF-8 string to raw Windows-1252 bytes wrapped in a String so
/// printpdf writes the bytes unchanged into the PDF stream (builtin fonts
/// use WinAnsiEncoding, one byte per glyph).
fn to_winlatin(s: &str) -> String {
    let bytes: Vec<u8> = s
        .chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80, // euro
            '\u{2026}' => 0x85, // ellipsis
            '\u{2018}' => 0x91, // left single quote
            '\u{2019}' => 0x92, // right single quote
            '\u{201C}' => 0x93, // left double quote
            '\u{201D}' => 0x94, // right double quote
            '\u{2022}' => 0x95, // bullet
            '\u{2013}' => 0x96, // en-dash
            '\u{2014}' => 0x97, // em-dash
            '\u{00A0}' => 0x20, // non-breaking space -> space
            c if (c as u32) < 256 => c as u8,
            _ => b'?',
        })
        .collect();
    // SAFETY: intentionally non-UTF-8 for the 0x80-0x9F range; printpdf
    // passes these bytes straight through, decoded by WinAnsiEncoding.
    #[allow(unsafe_code)]
    unsafe {
        String::from_utf8_unchecked(bytes)
    }
}

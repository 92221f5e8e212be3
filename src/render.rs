//! Rendering helpers – scoped font/color overrides and the painters shared
//! by several layout blocks.
//!
//! The canvas font, text color and fill color are global registers for the
//! duration of a build. Any component that temporarily changes them must
//! restore the previous value on every exit path; the `with_*` helpers
//! guarantee that by snapshotting around a closure.

use crate::canvas::{Align, Canvas, FontWeight, Frame, Rgb};
use crate::document::HeaderFooter;
use crate::geometry::*;

/// Run `f` with a temporary font, restoring the previous font afterwards.
pub fn with_font<C, R>(canvas: &mut C, weight: FontWeight, size: f32, f: impl FnOnce(&mut C) -> R) -> R
where
    C: Canvas + ?Sized,
{
    let saved = canvas.font();
    canvas.set_font(FONT_FAMILY, weight, size);
    let out = f(canvas);
    canvas.set_font(&saved.family, saved.weight, saved.size);
    out
}

/// Run `f` with a temporary text color, restoring the previous one.
pub fn with_text_color<C, R>(canvas: &mut C, color: Rgb, f: impl FnOnce(&mut C) -> R) -> R
where
    C: Canvas + ?Sized,
{
    let saved = canvas.text_color();
    canvas.set_text_color(color);
    let out = f(canvas);
    canvas.set_text_color(saved);
    out
}

/// Fill a rectangle in `color` without disturbing the current fill color.
pub fn fill_rect<C>(canvas: &mut C, color: Rgb, x1: f32, y1: f32, x2: f32, y2: f32)
where
    C: Canvas + ?Sized,
{
    let saved = canvas.fill_color();
    canvas.set_fill_color(color);
    canvas.draw_rect(x1, y1, x2, y2);
    canvas.set_fill_color(saved);
}

/// One row of the totals panel: a dark label cell against a grey value cell
/// meeting at the half-column split.
pub fn totals_row<C>(canvas: &mut C, y: f32, label: &str, value: &str, dark: Rgb, grey: Rgb)
where
    C: Canvas + ?Sized,
{
    let row_h = LARGE_TEXT_FONT_SIZE + TOTAL_MARGIN * 2.0;
    let split = PAGE_WIDTH - BASE_MARGIN - COLUMN_WIDTH / 2.0;

    fill_rect(canvas, dark, PAGE_WIDTH - BASE_MARGIN - COLUMN_WIDTH, y, split, y + row_h);
    canvas.set_cursor(PAGE_WIDTH - BASE_MARGIN - COLUMN_WIDTH, y);
    canvas.draw_cell(
        Frame::new(COLUMN_WIDTH / 2.0 - TOTAL_MARGIN, row_h),
        label,
        Align::MiddleRight,
    );

    fill_rect(canvas, grey, split, y, PAGE_WIDTH - BASE_MARGIN, y + row_h);
    canvas.set_cursor(split + TOTAL_MARGIN, y);
    canvas.draw_cell(
        Frame::new(COLUMN_WIDTH / 2.0 - TOTAL_MARGIN, row_h),
        value,
        Align::Middle,
    );
}

/// Draw the running header and footer on the current page. Scoped: font and
/// color are restored before returning.
pub fn page_decorations<C>(
    canvas: &mut C,
    header: Option<&HeaderFooter>,
    footer: Option<&HeaderFooter>,
    page_number: usize,
) where
    C: Canvas + ?Sized,
{
    let (_, page_h) = canvas.page_size();
    let width = PAGE_WIDTH - BASE_MARGIN * 2.0;

    if let Some(hf) = header {
        with_font(canvas, FontWeight::Regular, hf.font_size, |canvas| {
            canvas.set_cursor(BASE_MARGIN, HEADER_MARGIN_TOP);
            canvas.draw_cell(Frame::new(width, hf.font_size), &hf.text, Align::Center);
            if hf.pagination {
                canvas.set_cursor(BASE_MARGIN, HEADER_MARGIN_TOP);
                canvas.draw_cell(
                    Frame::new(width, hf.font_size),
                    &format!("Page {}", page_number),
                    Align::Right,
                );
            }
        });
    }

    if let Some(hf) = footer {
        let y = page_h - hf.font_size - HEADER_MARGIN_TOP * 2.0;
        with_font(canvas, FontWeight::Regular, hf.font_size, |canvas| {
            canvas.set_cursor(BASE_MARGIN, y);
            canvas.draw_cell(Frame::new(width, hf.font_size), &hf.text, Align::Center);
            if hf.pagination {
                canvas.set_cursor(BASE_MARGIN, y);
                canvas.draw_cell(
                    Frame::new(width, hf.font_size),
                    &format!("Page {}", page_number),
                    Align::Right,
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;

    #[test]
    fn with_font_restores_on_exit() {
        let mut canvas = RecordingCanvas::new();
        canvas.set_font(FONT_FAMILY, FontWeight::Regular, 8.0);
        with_font(&mut canvas, FontWeight::Bold, 14.0, |c| {
            assert_eq!(c.font().size, 14.0);
            assert_eq!(c.font().weight, FontWeight::Bold);
        });
        assert_eq!(canvas.font().size, 8.0);
        assert_eq!(canvas.font().weight, FontWeight::Regular);
    }

    #[test]
    fn with_text_color_restores_on_exit() {
        let mut canvas = RecordingCanvas::new();
        canvas.set_text_color(Rgb::new(35, 35, 35));
        with_text_color(&mut canvas, Rgb::new(82, 82, 82), |c| {
            assert_eq!(c.text_color(), Rgb::new(82, 82, 82));
        });
        assert_eq!(canvas.text_color(), Rgb::new(35, 35, 35));
    }

    #[test]
    fn fill_rect_preserves_fill_color() {
        let mut canvas = RecordingCanvas::new();
        canvas.set_fill_color(Rgb::WHITE);
        fill_rect(&mut canvas, Rgb::new(212, 212, 212), 0.0, 0.0, 10.0, 10.0);
        assert_eq!(canvas.fill_color(), Rgb::WHITE);
        assert_eq!(canvas.pages()[0].len(), 1);
    }
}

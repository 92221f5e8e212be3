//! Layout engine – walks the document top to bottom and emits canvas calls.
//!
//! Composition is a single pass over a running cursor: title and metas in
//! the right column, the two contact cards, description, the item table
//! (the only block that can spill onto continuation pages), notes, the
//! totals panel and the payment term. All anchors come from
//! [`crate::geometry`]; all figures come from a precomputed
//! [`DocumentTotals`] so drawing never changes a number.

use rust_decimal::Decimal;

use crate::blocks;
use crate::canvas::{Align, Canvas, FontWeight, Frame, Rgb};
use crate::contact::Contact;
use crate::document::Document;
use crate::error::BuildError;
use crate::geometry::*;
use crate::item::Item;
use crate::money::{fixed2, Adjustment, CurrencyFormat};
use crate::render::{fill_rect, page_decorations, totals_row, with_font, with_text_color};
use crate::totals::{effective_tax, DocumentTotals, ItemTotals};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// One composition run: borrows the canvas, the document and its computed
/// totals for the duration of [`Composer::compose`].
pub struct Composer<'a, C: Canvas + ?Sized> {
    canvas: &'a mut C,
    doc: &'a Document,
    totals: &'a DocumentTotals,
    fmt: CurrencyFormat,
}

impl<'a, C: Canvas + ?Sized> Composer<'a, C> {
    pub fn new(canvas: &'a mut C, doc: &'a Document, totals: &'a DocumentTotals) -> Self {
        let fmt = doc.options.currency_format();
        Self {
            canvas,
            doc,
            totals,
            fmt,
        }
    }

    fn base_color(&self) -> Rgb {
        self.doc.options.base_text_color.into()
    }

    fn grey_color(&self) -> Rgb {
        self.doc.options.grey_text_color.into()
    }

    fn grey_bg(&self) -> Rgb {
        self.doc.options.grey_bg_color.into()
    }

    fn dark_bg(&self) -> Rgb {
        self.doc.options.dark_bg_color.into()
    }

    /// Start a continuation page and redraw the running decorations. The
    /// cursor moves to the top margin.
    fn break_page(&mut self) {
        self.canvas.new_page();
        let page_number = self.canvas.page_index() + 1;
        page_decorations(
            self.canvas,
            self.doc.header.as_ref(),
            self.doc.footer.as_ref(),
            page_number,
        );
        self.canvas.set_cursor(BASE_MARGIN, BASE_MARGIN_TOP);
        log::debug!("page break, now on page {page_number}");
    }

    pub fn compose(mut self) -> Result<(), BuildError> {
        self.canvas.set_text_color(self.base_color());
        self.canvas
            .set_font(FONT_FAMILY, FontWeight::Regular, 12.0);
        page_decorations(
            self.canvas,
            self.doc.header.as_ref(),
            self.doc.footer.as_ref(),
            1,
        );

        self.append_title();
        self.append_metas();

        let doc = self.doc;
        let (Some(company), Some(customer)) = (&doc.company, &doc.customer) else {
            return Err(BuildError::Validation(
                "both contacts are required".to_string(),
            ));
        };
        let company_bottom =
            self.append_contact(company, BASE_MARGIN, BASE_MARGIN_TOP)?;
        let customer_bottom = self.append_contact(
            customer,
            PAGE_WIDTH - BASE_MARGIN - COLUMN_WIDTH,
            BASE_MARGIN_TOP + 45.0,
        )?;
        self.canvas
            .set_cursor(BASE_MARGIN, company_bottom.max(customer_bottom));

        self.append_description();
        self.append_items();

        // The totals panel never straddles a break; check its worst case.
        let (_, y) = self.canvas.cursor();
        if y + blocks::totals_panel_height(self.doc.discount.is_some()) > MAX_PAGE_HEIGHT {
            self.break_page();
        }

        self.append_notes();
        self.append_total();
        self.append_payment_term();
        Ok(())
    }

    /// Dark banner with the document type caption, top of the right column.
    fn append_title(&mut self) {
        let title = self.doc.doc_type.label(&self.doc.options);
        let dark = self.dark_bg();
        fill_rect(
            self.canvas,
            dark,
            PAGE_WIDTH - BASE_MARGIN - COLUMN_WIDTH,
            BASE_MARGIN_TOP,
            PAGE_WIDTH - BASE_MARGIN,
            BASE_MARGIN_TOP + TITLE_FONT_SIZE + TITLE_MARGIN,
        );
        self.canvas.set_cursor(
            PAGE_WIDTH - BASE_MARGIN - COLUMN_WIDTH,
            BASE_MARGIN_TOP + TITLE_MARGIN / 2.0,
        );
        with_font(self.canvas, FontWeight::Regular, TITLE_FONT_SIZE, |c| {
            c.draw_cell(
                Frame::new(COLUMN_WIDTH, TITLE_FONT_SIZE),
                title,
                Align::Center,
            )
        });
    }

    /// Reference, optional version and date, right-aligned under the title.
    fn append_metas(&mut self) {
        let opts = &self.doc.options;
        let top = BASE_MARGIN_TOP + TITLE_FONT_SIZE + TITLE_MARGIN + 1.0;
        let frame = Frame::new(COLUMN_WIDTH, METAS_FONT_SIZE);

        with_font(self.canvas, FontWeight::Regular, METAS_FONT_SIZE, |c| {
            c.set_cursor(PAGE_WIDTH - BASE_MARGIN - COLUMN_WIDTH, top);
            c.draw_cell(
                frame,
                &format!("{}: {}", opts.text_ref_title, self.doc.reference),
                Align::Right,
            );

            if !self.doc.version.is_empty() {
                c.set_cursor(PAGE_WIDTH - BASE_MARGIN - COLUMN_WIDTH, top + METAS_FONT_SIZE);
                c.draw_cell(
                    frame,
                    &format!("{}: {}", opts.text_version_title, self.doc.version),
                    Align::Right,
                );
            }

            let date = if self.doc.date.is_empty() {
                chrono::Local::now().format("%d/%m/%Y").to_string()
            } else {
                self.doc.date.clone()
            };
            c.set_cursor(
                PAGE_WIDTH - BASE_MARGIN - COLUMN_WIDTH,
                top + METAS_FONT_SIZE * 2.0,
            );
            c.draw_cell(
                frame,
                &format!("{}: {}", opts.text_date_title, date),
                Align::Right,
            );
        });
    }

    /// Contact card: optional logo, shaded name bar, shaded address block.
    /// Returns the bottom Y of the card.
    fn append_contact(&mut self, contact: &Contact, x: f32, y: f32) -> Result<f32, BuildError> {
        let grey_bg = self.grey_bg();
        let mut name_y = y;
        if let Some(logo) = &contact.logo {
            let (w, h) = blocks::logo_display_size(logo)?;
            self.canvas.draw_image(x, y, w, h, logo)?;
            name_y = y + h + CONTACT_MARGIN;
        }

        fill_rect(
            self.canvas,
            grey_bg,
            x,
            name_y,
            x + COLUMN_WIDTH,
            name_y + LARGE_TEXT_FONT_SIZE,
        );
        self.canvas.set_cursor(x + CONTACT_MARGIN, name_y);
        with_font(self.canvas, FontWeight::Bold, LARGE_TEXT_FONT_SIZE, |c| {
            c.draw_cell(
                Frame::new(COLUMN_WIDTH - CONTACT_MARGIN, LARGE_TEXT_FONT_SIZE),
                &contact.name,
                Align::Left,
            )
        });
        let mut bottom = name_y + LARGE_TEXT_FONT_SIZE;

        if let Some(address) = &contact.address {
            let lines = address.lines();
            let block_y = name_y + LARGE_TEXT_FONT_SIZE + CONTACT_MARGIN;
            let block_h = blocks::address_block_height(lines.len());
            fill_rect(
                self.canvas,
                grey_bg,
                x,
                block_y,
                x + COLUMN_WIDTH,
                block_y + block_h,
            );
            self.canvas
                .set_cursor(x + CONTACT_MARGIN, block_y + CONTACT_MARGIN);
            with_font(self.canvas, FontWeight::Regular, LARGE_TEXT_FONT_SIZE, |c| {
                for line in &lines {
                    c.set_x(x + CONTACT_MARGIN);
                    c.draw_wrapped_text(
                        Frame::new(COLUMN_WIDTH - CONTACT_MARGIN * 2.0, block_h),
                        line,
                    );
                }
            });
            let (_, cursor_y) = self.canvas.cursor();
            bottom = cursor_y;
        }
        Ok(bottom)
    }

    fn append_description(&mut self) {
        if self.doc.description.is_empty() {
            return;
        }
        let (_, y) = self.canvas.cursor();
        self.canvas.set_cursor(BASE_MARGIN, y + 10.0);
        with_font(self.canvas, FontWeight::Regular, LARGE_TEXT_FONT_SIZE, |c| {
            c.draw_wrapped_text(Frame::new(190.0, 0.0), &self.doc.description)
        });
    }

    /// Shaded header row of the item table; bold column titles at the fixed
    /// offsets. Leaves the cursor on the title text line.
    fn draw_table_header(&mut self) {
        let doc = self.doc;
        let opts = &doc.options;
        let grey_bg = self.grey_bg();
        let (_, y) = self.canvas.cursor();
        fill_rect(
            self.canvas,
            grey_bg,
            BASE_MARGIN,
            y,
            PAGE_WIDTH - BASE_MARGIN,
            y + ITEM_FONT_SIZE + ITEM_TITLE_MARGIN,
        );

        self.canvas
            .set_cursor(BASE_MARGIN, y + ITEM_TITLE_MARGIN / 2.0);
        with_font(self.canvas, FontWeight::Bold, ITEM_FONT_SIZE, |c| {
            let titles: [(f32, &str); 7] = [
                (BASE_MARGIN + ITEM_TITLE_MARGIN, &opts.text_items_name_title),
                (ITEM_COL_UNIT_PRICE_OFFSET, &opts.text_items_unit_cost_title),
                (ITEM_COL_QUANTITY_OFFSET, &opts.text_items_quantity_title),
                (ITEM_COL_TOTAL_NO_TAX_OFFSET, &opts.text_items_total_no_tax_title),
                (ITEM_COL_TAX_OFFSET, &opts.text_items_tax_title),
                (ITEM_COL_DISCOUNT_OFFSET, &opts.text_items_discount_title),
                (ITEM_COL_TOTAL_WITH_TAX_OFFSET, &opts.text_items_total_with_tax_title),
            ];
            for (x, title) in titles {
                c.set_x(x);
                c.draw_cell(Frame::new(COLUMN_WIDTH, ITEM_FONT_SIZE), title, Align::Left);
            }
        });
    }

    fn append_items(&mut self) {
        let (_, y) = self.canvas.cursor();
        self.canvas.set_cursor(BASE_MARGIN, y + ITEMS_PADDING_TOP);
        self.draw_table_header();

        let (_, y) = self.canvas.cursor();
        self.canvas
            .set_cursor(BASE_MARGIN, y + ITEM_FONT_SIZE + ITEM_TITLE_MARGIN);
        self.canvas
            .set_font(FONT_FAMILY, FontWeight::Regular, ITEM_FONT_SIZE);

        let doc = self.doc;
        let totals = self.totals;
        for (item, computed) in doc.items.iter().zip(&totals.items) {
            self.append_item_row(item, computed);

            let (_, y) = self.canvas.cursor();
            if y > MAX_PAGE_HEIGHT {
                self.break_page();
                self.draw_table_header();
                let (_, y) = self.canvas.cursor();
                self.canvas
                    .set_cursor(BASE_MARGIN, y + ITEM_FONT_SIZE + ITEM_TITLE_MARGIN);
                self.canvas
                    .set_font(FONT_FAMILY, FontWeight::Regular, ITEM_FONT_SIZE);
            }

            let (_, y) = self.canvas.cursor();
            self.canvas.set_y(y + ITEM_ROW_GAP);
        }
    }

    /// One item row. The wrapped name/description stack fixes the row
    /// height; every other column is drawn back at the row top.
    fn append_item_row(&mut self, item: &Item, computed: &ItemTotals) {
        let (_, base_y) = self.canvas.cursor();
        let text_frame = Frame::new(blocks::item_text_width(), ITEM_FONT_SIZE * 3.0);

        self.canvas
            .set_cursor(BASE_MARGIN + ITEM_TITLE_MARGIN, base_y);
        self.canvas.draw_wrapped_text(text_frame, &item.name);

        if let Some(description) = &item.description {
            if !description.is_empty() {
                self.canvas.set_x(BASE_MARGIN + ITEM_TITLE_MARGIN);
                let grey = self.grey_color();
                with_font(self.canvas, FontWeight::Regular, SMALL_TEXT_FONT_SIZE, |c| {
                    with_text_color(c, grey, |c| c.draw_wrapped_text(text_frame, description))
                });
            }
        }

        let (_, end_y) = self.canvas.cursor();
        let row_h = end_y - base_y;

        self.canvas.set_cursor(ITEM_COL_UNIT_PRICE_OFFSET, base_y);
        self.canvas.draw_cell(
            Frame::new(ITEM_COL_QUANTITY_OFFSET - ITEM_COL_UNIT_PRICE_OFFSET, row_h),
            &self.fmt.format(item.unit_cost()),
            Align::Left,
        );

        self.canvas.set_x(ITEM_COL_QUANTITY_OFFSET);
        self.canvas.draw_cell(
            Frame::new(ITEM_COL_TOTAL_NO_TAX_OFFSET - ITEM_COL_QUANTITY_OFFSET, row_h),
            &item.quantity().to_string(),
            Align::Left,
        );

        self.canvas.set_x(ITEM_COL_TOTAL_NO_TAX_OFFSET);
        self.canvas.draw_cell(
            Frame::new(ITEM_COL_DISCOUNT_OFFSET - ITEM_COL_TOTAL_NO_TAX_OFFSET, row_h),
            &self.fmt.format(computed.total_without_tax),
            Align::Left,
        );

        let discount_frame =
            Frame::new(ITEM_COL_TAX_OFFSET - ITEM_COL_DISCOUNT_OFFSET, row_h);
        self.canvas.set_cursor(ITEM_COL_DISCOUNT_OFFSET, base_y);
        match &item.discount {
            None => {
                self.canvas.draw_cell(discount_frame, "--", Align::Left);
            }
            Some(discount) => {
                let (title, detail) = self.discount_cell_text(discount, computed);
                self.split_cell(ITEM_COL_DISCOUNT_OFFSET, base_y, discount_frame, &title, &detail);
            }
        }

        let tax_frame =
            Frame::new(ITEM_COL_TOTAL_WITH_TAX_OFFSET - ITEM_COL_TAX_OFFSET, row_h);
        self.canvas.set_cursor(ITEM_COL_TAX_OFFSET, base_y);
        match effective_tax(item, self.doc.default_tax.as_ref()) {
            None => {
                self.canvas.draw_cell(tax_frame, "--", Align::Left);
            }
            Some(tax) => {
                let (title, detail) = self.tax_cell_text(tax, computed);
                self.split_cell(ITEM_COL_TAX_OFFSET, base_y, tax_frame, &title, &detail);
            }
        }

        self.canvas
            .set_cursor(ITEM_COL_TOTAL_WITH_TAX_OFFSET, base_y);
        self.canvas.draw_cell(
            Frame::new(PAGE_WIDTH - BASE_MARGIN - ITEM_COL_TOTAL_WITH_TAX_OFFSET, row_h),
            &self.fmt.format(computed.total_with_tax),
            Align::Left,
        );

        self.canvas.set_cursor(BASE_MARGIN, base_y + row_h);
    }

    /// Adjustment cell body: the given figure on the first half-line, the
    /// derived counterpart (grey, smaller) on the second. Leaves the cursor
    /// untouched relative to `base_y`.
    fn split_cell(&mut self, x: f32, base_y: f32, frame: Frame, title: &str, detail: &str) {
        let half = Frame::new(frame.w, frame.h / 2.0);
        self.canvas.draw_cell(half, title, Align::Left);

        self.canvas.set_cursor(x, base_y + BASE_TEXT_FONT_SIZE);
        let grey = self.grey_color();
        with_font(self.canvas, FontWeight::Regular, SMALL_TEXT_FONT_SIZE, |c| {
            with_text_color(c, grey, |c| c.draw_cell(half, detail, Align::Left))
        });
        self.canvas.set_cursor(x, base_y);
    }

    fn discount_cell_text(&self, discount: &Adjustment, computed: &ItemTotals) -> (String, String) {
        let base = computed.total_without_tax;
        match discount {
            Adjustment::Percent(p) => {
                let amount = base * *p / HUNDRED;
                (format!("{p} %"), format!("-{}", self.fmt.format(amount)))
            }
            Adjustment::Amount(a) => {
                let title = format!("{a} {}", self.doc.options.currency_symbol.trim());
                if base.is_zero() {
                    log::warn!("item discount percentage undefined on a zero base");
                    (title, "--".to_string())
                } else {
                    (title, format!("-{} %", fixed2(*a * HUNDRED / base)))
                }
            }
        }
    }

    fn tax_cell_text(&self, tax: &Adjustment, computed: &ItemTotals) -> (String, String) {
        let base = computed.total_after_discount;
        match tax {
            Adjustment::Percent(p) => {
                let amount = base * *p / HUNDRED;
                (format!("{p} %"), self.fmt.format(amount))
            }
            Adjustment::Amount(a) => {
                let title = format!("{a} {}", self.doc.options.currency_symbol.trim());
                if base.is_zero() {
                    log::warn!("item tax percentage undefined on a zero base");
                    (title, "--".to_string())
                } else {
                    (title, format!("{} %", fixed2(*a * HUNDRED / base)))
                }
            }
        }
    }

    /// Free-form notes on the left, beside the totals panel. The cursor is
    /// restored so the panel lines up with the notes' top.
    fn append_notes(&mut self) {
        if self.doc.notes.is_empty() {
            return;
        }
        let (_, saved_y) = self.canvas.cursor();
        self.canvas.set_cursor(BASE_MARGIN, saved_y + 10.0);
        with_font(self.canvas, FontWeight::Regular, 9.0, |c| {
            c.draw_wrapped_text(
                Frame::new(PAGE_WIDTH - BASE_MARGIN * 2.0 - COLUMN_WIDTH, 0.0),
                &self.doc.notes,
            )
        });
        self.canvas.set_y(saved_y);
    }

    /// The right-column totals panel: total, optional discount pair, tax,
    /// grand total. Rows are drawn at fixed offsets from the panel top.
    fn append_total(&mut self) {
        let doc = self.doc;
        let opts = &doc.options;
        let dark = self.dark_bg();
        let grey = self.grey_bg();
        let row_h = LARGE_TEXT_FONT_SIZE + TOTAL_MARGIN * 2.0;

        let (_, y) = self.canvas.cursor();
        let top = y + 10.0;
        self.canvas
            .set_font(FONT_FAMILY, FontWeight::Regular, LARGE_TEXT_FONT_SIZE);
        self.canvas.set_text_color(self.base_color());

        totals_row(
            self.canvas,
            top,
            &opts.text_total_no_tax,
            &self.fmt.format(self.totals.total),
            dark,
            grey,
        );

        let tax_y = if let Some(discount) = &doc.discount {
            self.append_discount_rows(top + row_h, discount);
            top + row_h + 25.0
        } else {
            top + row_h
        };

        totals_row(
            self.canvas,
            tax_y,
            &opts.text_total_tax,
            &self.fmt.format(self.totals.tax),
            dark,
            grey,
        );
        totals_row(
            self.canvas,
            tax_y + row_h,
            &opts.text_total_with_tax,
            &self.fmt.format(self.totals.total_with_tax),
            dark,
            grey,
        );
        self.canvas
            .set_cursor(PAGE_WIDTH - BASE_MARGIN - COLUMN_WIDTH, tax_y + row_h);
    }

    /// Double-height discount row: label plus a grey detail line pairing
    /// the given figure with its derived counterpart.
    fn append_discount_rows(&mut self, y: f32, discount: &Adjustment) {
        let doc = self.doc;
        let opts = &doc.options;
        let dark = self.dark_bg();
        let grey_bg = self.grey_bg();
        let split = PAGE_WIDTH - BASE_MARGIN - COLUMN_WIDTH / 2.0;
        let block_h = LARGE_TEXT_FONT_SIZE + 5.0 + TOTAL_MARGIN * 2.0;
        let label_frame = Frame::new(COLUMN_WIDTH / 2.0 - TOTAL_MARGIN, LARGE_TEXT_FONT_SIZE);

        fill_rect(
            self.canvas,
            dark,
            PAGE_WIDTH - BASE_MARGIN - COLUMN_WIDTH,
            y,
            split,
            y + block_h,
        );
        self.canvas
            .set_cursor(PAGE_WIDTH - BASE_MARGIN - COLUMN_WIDTH, y + TOTAL_MARGIN);
        self.canvas
            .draw_cell(label_frame, &opts.text_total_discounted, Align::Right);

        let detail = match discount {
            Adjustment::Percent(p) => format!(
                "-{p} % / -{}",
                self.fmt
                    .format(self.totals.total - self.totals.total_with_discount)
            ),
            Adjustment::Amount(a) => {
                if self.totals.total.is_zero() {
                    log::warn!("document discount percentage undefined on a zero base");
                    format!("-{} / --", self.fmt.format(*a))
                } else {
                    format!(
                        "-{} / -{} %",
                        self.fmt.format(*a),
                        fixed2(*a * HUNDRED / self.totals.total)
                    )
                }
            }
        };
        self.canvas.set_cursor(
            PAGE_WIDTH - BASE_MARGIN - COLUMN_WIDTH,
            y + 9.5 + TOTAL_MARGIN,
        );
        let grey_text = self.grey_color();
        with_font(self.canvas, FontWeight::Regular, BASE_TEXT_FONT_SIZE, |c| {
            with_text_color(c, grey_text, |c| {
                c.draw_cell(
                    Frame::new(COLUMN_WIDTH / 2.0 - TOTAL_MARGIN, BASE_TEXT_FONT_SIZE + 2.0),
                    &detail,
                    Align::Right,
                )
            })
        });

        // Value cell spans slightly above the row so both rows read as one.
        fill_rect(
            self.canvas,
            grey_bg,
            split,
            y - TOTAL_MARGIN,
            PAGE_WIDTH - BASE_MARGIN,
            y + block_h,
        );
        self.canvas.set_cursor(split + TOTAL_MARGIN, y);
        self.canvas.draw_cell(
            Frame::new(
                COLUMN_WIDTH / 2.0 - TOTAL_MARGIN,
                LARGE_TEXT_FONT_SIZE + TOTAL_MARGIN * 2.0,
            ),
            &self.fmt.format(self.totals.total_with_discount),
            Align::Middle,
        );
    }

    fn append_payment_term(&mut self) {
        if self.doc.payment_term.is_empty() {
            return;
        }
        let text = format!(
            "{}: {}",
            self.doc.options.text_payment_term_title, self.doc.payment_term
        );
        let (_, y) = self.canvas.cursor();
        self.canvas.set_cursor(
            PAGE_WIDTH - BASE_MARGIN - COLUMN_WIDTH,
            y + LARGE_TEXT_FONT_SIZE + 5.0 + TOTAL_MARGIN * 2.0,
        );
        with_font(self.canvas, FontWeight::Bold, LARGE_TEXT_FONT_SIZE, |c| {
            c.draw_cell(
                Frame::new(COLUMN_WIDTH, LARGE_TEXT_FONT_SIZE),
                &text,
                Align::Right,
            )
        });
    }
}

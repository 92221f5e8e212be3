//! billcraft – invoice, quotation and delivery note PDF generation.
//!
//! A document build runs as a fixed pipeline:
//!
//! 1. **Model** – the caller assembles a [`Document`] (contacts, items,
//!    adjustments, presentation [`Options`]) through the mutator API or
//!    from JSON.
//! 2. **Validation** – required fields are checked before any drawing.
//! 3. **Waterfall** – [`totals`] computes every per-item and document
//!    figure with exact decimal arithmetic; rendering never recomputes a
//!    number.
//! 4. **Composition** – [`layout::Composer`] walks the document top to
//!    bottom, emitting calls against the [`Canvas`] trait and breaking
//!    pages as the item table grows.
//! 5. **Rendering** – [`PdfCanvas`] serializes the recorded page ops into
//!    the final PDF bytes.
//!
//! ```no_run
//! use billcraft::{Document, DocumentType, Item, Options, Tax};
//! use rust_decimal_macros::dec;
//!
//! # fn main() -> Result<(), billcraft::BuildError> {
//! let mut doc = Document::new(DocumentType::Invoice, Options::default());
//! doc.set_reference("INV-2026-0001")
//!     .set_default_tax(Tax::Percent(dec!(20)))
//!     .append_item(Item {
//!         name: "Consulting".to_string(),
//!         unit_cost: "650".to_string(),
//!         quantity: "3".to_string(),
//!         ..Item::default()
//!     });
//! # doc.set_company(billcraft::Contact { name: "ACME".into(), logo: None, address: None });
//! # doc.set_customer(billcraft::Contact { name: "Globex".into(), logo: None, address: None });
//! let pdf = doc.build()?;
//! std::fs::write("invoice.pdf", pdf).ok();
//! # Ok(())
//! # }
//! ```

pub mod blocks;
pub mod canvas;
pub mod contact;
pub mod document;
pub mod error;
pub mod fonts;
pub mod geometry;
pub mod item;
pub mod layout;
pub mod money;
pub mod options;
pub mod pdf_canvas;
pub mod render;
pub mod totals;

pub use canvas::{Align, Canvas, FontSpec, FontWeight, Frame, PageOp, RecordingCanvas, Rgb};
pub use contact::{Address, Contact};
pub use document::{Document, DocumentType, HeaderFooter};
pub use error::BuildError;
pub use item::Item;
pub use money::{Adjustment, CurrencyFormat, Discount, Tax};
pub use options::Options;
pub use pdf_canvas::PdfCanvas;
pub use totals::{DocumentTotals, ItemTotals};

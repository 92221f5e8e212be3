//! Document – the aggregate the caller assembles and builds. Owns the
//! contacts, items, adjustments and presentation options; `build` runs
//! validation, the financial waterfall, composition and rendering in one
//! synchronous pass.

use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;
use crate::contact::Contact;
use crate::error::BuildError;
use crate::item::Item;
use crate::layout::Composer;
use crate::money::{Discount, Tax};
use crate::options::Options;
use crate::pdf_canvas::PdfCanvas;
use crate::totals::{self, DocumentTotals};

/// The kind of commercial document being produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Invoice,
    Quotation,
    DeliveryNote,
}

impl DocumentType {
    /// The localized caption for this type.
    pub fn label<'a>(&self, options: &'a Options) -> &'a str {
        match self {
            DocumentType::Invoice => &options.text_type_invoice,
            DocumentType::Quotation => &options.text_type_quotation,
            DocumentType::DeliveryNote => &options.text_type_delivery_note,
        }
    }
}

/// Running page header or footer. At most one of each per document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderFooter {
    pub text: String,
    /// Defaults to 7 when left at zero.
    #[serde(default)]
    pub font_size: f32,
    /// Append the current page number.
    #[serde(default)]
    pub pagination: bool,
}

const DEFAULT_HEADER_FOOTER_FONT_SIZE: f32 = 7.0;

impl HeaderFooter {
    fn normalized(mut self) -> Self {
        if self.font_size <= 0.0 {
            self.font_size = DEFAULT_HEADER_FOOTER_FONT_SIZE;
        }
        self
    }
}

/// A commercial document ready to be composed. Construct with
/// [`Document::new`], fill through the mutators, then call
/// [`Document::build`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    #[serde(rename = "ref", default)]
    pub reference: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub date: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub payment_term: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<HeaderFooter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<HeaderFooter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Contact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Item>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Discount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_tax: Option<Tax>,
    #[serde(default)]
    pub options: Options,
}

impl Document {
    pub fn new(doc_type: DocumentType, options: Options) -> Self {
        Self {
            doc_type,
            reference: String::new(),
            version: String::new(),
            description: String::new(),
            notes: String::new(),
            date: String::new(),
            payment_term: String::new(),
            header: None,
            footer: None,
            company: None,
            customer: None,
            items: Vec::new(),
            discount: None,
            default_tax: None,
            options,
        }
    }

    pub fn set_header(&mut self, header: HeaderFooter) -> &mut Self {
        self.header = Some(header.normalized());
        self
    }

    pub fn set_footer(&mut self, footer: HeaderFooter) -> &mut Self {
        self.footer = Some(footer.normalized());
        self
    }

    pub fn set_reference(&mut self, reference: impl Into<String>) -> &mut Self {
        self.reference = reference.into();
        self
    }

    pub fn set_version(&mut self, version: impl Into<String>) -> &mut Self {
        self.version = version.into();
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) -> &mut Self {
        self.notes = notes.into();
        self
    }

    pub fn set_date(&mut self, date: impl Into<String>) -> &mut Self {
        self.date = date.into();
        self
    }

    pub fn set_payment_term(&mut self, payment_term: impl Into<String>) -> &mut Self {
        self.payment_term = payment_term.into();
        self
    }

    pub fn set_company(&mut self, company: Contact) -> &mut Self {
        self.company = Some(company);
        self
    }

    pub fn set_customer(&mut self, customer: Contact) -> &mut Self {
        self.customer = Some(customer);
        self
    }

    /// Append an item; call order is the item table's row order.
    pub fn append_item(&mut self, item: Item) -> &mut Self {
        self.items.push(item);
        self
    }

    pub fn set_discount(&mut self, discount: Discount) -> &mut Self {
        self.discount = Some(discount);
        self
    }

    pub fn set_default_tax(&mut self, tax: Tax) -> &mut Self {
        self.default_tax = Some(tax);
        self
    }

    /// Run the financial waterfall without rendering.
    pub fn totals(&self) -> Result<DocumentTotals, BuildError> {
        totals::compute(&self.items, self.default_tax.as_ref(), self.discount.as_ref())
    }

    /// Check required fields before any layout work begins.
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.reference.is_empty() {
            return Err(BuildError::Validation("document reference is required".to_string()));
        }
        for (role, contact) in [("company", &self.company), ("customer", &self.customer)] {
            let Some(contact) = contact else {
                return Err(BuildError::Validation(format!("{role} contact is required")));
            };
            if contact.name.is_empty() {
                return Err(BuildError::Validation(format!("{role} name is required")));
            }
            if contact.name.chars().count() > 256 {
                return Err(BuildError::Validation(format!(
                    "{role} name exceeds 256 characters"
                )));
            }
            if let Some(address) = &contact.address {
                if address.address.is_empty() {
                    return Err(BuildError::Validation(format!(
                        "{role} address line is required"
                    )));
                }
            }
        }
        for (i, item) in self.items.iter().enumerate() {
            if item.name.is_empty() {
                return Err(BuildError::Validation(format!("item {i} has no name")));
            }
        }
        Ok(())
    }

    /// Validate, compute and compose onto an arbitrary canvas. The canvas is
    /// untouched when validation or the waterfall fails.
    pub fn render_to<C: Canvas + ?Sized>(&self, canvas: &mut C) -> Result<(), BuildError> {
        self.validate()?;
        let totals = self.totals()?;
        Composer::new(canvas, self, &totals).compose()
    }

    /// Full pipeline: validate, compute, compose, render, serialize.
    pub fn build(&self) -> Result<Vec<u8>, BuildError> {
        let title = format!("{} {}", self.doc_type.label(&self.options), self.reference);
        let mut canvas = PdfCanvas::new(title);
        self.render_to(&mut canvas)?;
        canvas.serialize()
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| e.to_string())
    }
}

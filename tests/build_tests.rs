//! End-to-end builds against both canvas backends: full invoices through
//! the recording canvas for structural assertions, and through the PDF
//! backend for the final byte stream.

use billcraft::{
    Adjustment, Address, BuildError, Canvas, Contact, Document, DocumentType, HeaderFooter, Item,
    Options, PageOp, RecordingCanvas,
};
use rust_decimal_macros::dec;
use sha2::{Digest, Sha256};

fn contact(name: &str) -> Contact {
    Contact {
        name: name.to_string(),
        logo: None,
        address: Some(Address {
            address: "89 Rue de Rivoli".to_string(),
            postal_code: "75001".to_string(),
            city: "Paris".to_string(),
            ..Address::default()
        }),
    }
}

fn base_document() -> Document {
    let mut doc = Document::new(DocumentType::Invoice, Options::default());
    doc.set_reference("INV-2026-0042")
        .set_version("1.0")
        .set_date("02/01/2026")
        .set_company(contact("ACME Industries"))
        .set_customer(contact("Globex Corporation"));
    doc
}

fn all_texts(canvas: &RecordingCanvas) -> Vec<String> {
    (0..canvas.pages().len())
        .flat_map(|p| canvas.texts_on_page(p))
        .map(str::to_string)
        .collect()
}

fn tiny_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
    let mut buf = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .expect("png encode");
    buf.into_inner()
}

#[test]
fn many_items_spill_onto_continuation_pages() {
    let mut doc = base_document();
    let description = "Extended maintenance coverage including on-site interventions, \
        spare part logistics, priority hotline access and quarterly preventive \
        inspections as agreed in the framework contract for the current year."
        .to_string();
    for i in 1..=25 {
        doc.append_item(Item {
            name: format!("Item {i:02}"),
            description: Some(description.clone()),
            unit_cost: "120".to_string(),
            quantity: "1".to_string(),
            tax: Some(Adjustment::Percent(dec!(20))),
            ..Item::default()
        });
    }

    let mut canvas = RecordingCanvas::new();
    doc.render_to(&mut canvas).unwrap();

    assert!(
        canvas.pages().len() >= 2,
        "expected a page break, got {} page(s)",
        canvas.pages().len()
    );

    // The table header is repeated on every page the table touches.
    let name_title = Options::default().text_items_name_title;
    let header_count = all_texts(&canvas)
        .iter()
        .filter(|t| **t == name_title)
        .count();
    assert_eq!(header_count, canvas.pages().len());

    // Every item lands on exactly one page.
    for i in 1..=25 {
        let name = format!("Item {i:02}");
        let count = all_texts(&canvas).iter().filter(|t| **t == name).count();
        assert_eq!(count, 1, "{name} drawn {count} times");
    }
}

#[test]
fn header_and_footer_decorate_every_page() {
    let mut doc = base_document();
    doc.set_header(HeaderFooter {
        text: "ACME Industries - internal".to_string(),
        font_size: 0.0,
        pagination: true,
    });
    doc.set_footer(HeaderFooter {
        text: "Thank you for your business".to_string(),
        font_size: 7.0,
        pagination: false,
    });
    for i in 1..=25 {
        doc.append_item(Item {
            name: format!("Row {i}"),
            description: Some("Recurring subscription billed monthly with usage-based \
                overage charges reconciled at the end of the billing period for all \
                registered seats and attached service accounts."
                .to_string()),
            unit_cost: "45".to_string(),
            quantity: "2".to_string(),
            ..Item::default()
        });
    }

    let mut canvas = RecordingCanvas::new();
    doc.render_to(&mut canvas).unwrap();
    assert!(canvas.pages().len() >= 2);

    for page in 0..canvas.pages().len() {
        let texts = canvas.texts_on_page(page);
        assert!(
            texts.contains(&"ACME Industries - internal"),
            "missing header on page {page}"
        );
        assert!(
            texts.contains(&"Thank you for your business"),
            "missing footer on page {page}"
        );
        let page_label = format!("Page {}", page + 1);
        assert!(
            texts.iter().any(|t| *t == page_label),
            "missing {page_label} on page {page}"
        );
    }
}

#[test]
fn validation_failure_leaves_canvas_untouched() {
    let mut doc = base_document();
    doc.customer = None;

    let mut canvas = RecordingCanvas::new();
    let err = doc.render_to(&mut canvas);
    assert!(matches!(err, Err(BuildError::Validation(_))));
    assert_eq!(canvas.pages().len(), 1);
    assert!(canvas.pages()[0].is_empty());
}

#[test]
fn degenerate_document_discount_aborts_the_build() {
    let mut doc = base_document();
    doc.append_item(Item {
        name: "Widget".to_string(),
        unit_cost: "10".to_string(),
        quantity: "1".to_string(),
        ..Item::default()
    });
    doc.set_discount(Adjustment::Amount(dec!(10)));

    let mut canvas = RecordingCanvas::new();
    let err = doc.render_to(&mut canvas);
    assert!(matches!(err, Err(BuildError::DegenerateDiscount)));
    assert!(canvas.pages()[0].is_empty());
}

#[test]
fn unparseable_figures_degrade_to_zero() {
    let mut doc = base_document();
    doc.append_item(Item {
        name: "Mystery line".to_string(),
        unit_cost: "not-a-number".to_string(),
        quantity: "three".to_string(),
        ..Item::default()
    });

    let mut canvas = RecordingCanvas::new();
    doc.render_to(&mut canvas).unwrap();
    let texts = all_texts(&canvas);
    assert!(texts.iter().any(|t| t == "€ 0,00"), "zero totals: {texts:?}");
}

#[test]
fn default_tax_backfills_untaxed_items() {
    let mut doc = base_document();
    doc.set_default_tax(Adjustment::Percent(dec!(10)));
    doc.append_item(Item {
        name: "Untaxed on its own".to_string(),
        unit_cost: "100".to_string(),
        quantity: "1".to_string(),
        ..Item::default()
    });

    let totals = doc.totals().unwrap();
    assert_eq!(totals.tax, dec!(10));
    assert_eq!(totals.total_with_tax, dec!(110));

    let mut canvas = RecordingCanvas::new();
    doc.render_to(&mut canvas).unwrap();
    let texts = all_texts(&canvas);
    assert!(texts.iter().any(|t| t == "10 %"));
    assert!(texts.iter().any(|t| t == "€ 110,00"));
}

#[test]
fn logo_is_placed_at_fixed_height() {
    let mut doc = base_document();
    doc.company.as_mut().unwrap().logo = Some(tiny_png(160, 80));

    let mut canvas = RecordingCanvas::new();
    doc.render_to(&mut canvas).unwrap();

    let image = canvas.pages()[0].iter().find_map(|op| match op {
        PageOp::Image { w, h, .. } => Some((*w, *h)),
        _ => None,
    });
    let (w, h) = image.expect("logo op recorded");
    assert_eq!(h, 80.0);
    assert_eq!(w, 160.0, "width follows the 2:1 aspect ratio");
}

#[test]
fn corrupt_logo_fails_the_build() {
    let mut doc = base_document();
    doc.company.as_mut().unwrap().logo = Some(b"definitely not an image".to_vec());

    let mut canvas = RecordingCanvas::new();
    let err = doc.render_to(&mut canvas);
    assert!(matches!(err, Err(BuildError::ImageDecode(_))));
}

#[test]
fn builds_are_deterministic() {
    let mut doc = base_document();
    doc.set_notes("Late payment incurs statutory interest.")
        .set_payment_term("30 days net")
        .set_discount(Adjustment::Percent(dec!(5)));
    for i in 1..=10 {
        doc.append_item(Item {
            name: format!("Position {i}"),
            unit_cost: "99.90".to_string(),
            quantity: i.to_string(),
            tax: Some(Adjustment::Percent(dec!(20))),
            ..Item::default()
        });
    }

    let digest_of = |doc: &Document| {
        let mut canvas = RecordingCanvas::new();
        doc.render_to(&mut canvas).unwrap();
        Sha256::digest(canvas.serialize().unwrap())
    };
    assert_eq!(digest_of(&doc), digest_of(&doc));
}

#[test]
fn pdf_backend_produces_a_pdf() {
    let mut doc = base_document();
    doc.append_item(Item {
        name: "Consulting".to_string(),
        unit_cost: "650".to_string(),
        quantity: "3".to_string(),
        tax: Some(Adjustment::Percent(dec!(20))),
        ..Item::default()
    });

    let bytes = doc.build().unwrap();
    assert!(bytes.starts_with(b"%PDF-"), "missing PDF magic");
}

#[test]
fn json_document_roundtrips_through_build() {
    let mut doc = base_document();
    doc.append_item(Item {
        name: "Serialized line".to_string(),
        unit_cost: "10".to_string(),
        quantity: "4".to_string(),
        discount: Some(Adjustment::Amount(dec!(5))),
        ..Item::default()
    });

    let restored = Document::from_json(&doc.to_json()).unwrap();
    assert_eq!(restored.items.len(), 1);
    assert_eq!(
        restored.items[0].discount,
        Some(Adjustment::Amount(dec!(5)))
    );

    let mut canvas = RecordingCanvas::new();
    restored.render_to(&mut canvas).unwrap();
    let texts = all_texts(&canvas);
    // 40 gross, 35 after the 5 amount discount
    assert!(texts.iter().any(|t| t == "€ 40,00"));
    assert!(texts.iter().any(|t| t == "€ 35,00"));
}

//! Presentation options – localized label strings, colors and currency
//! formatting parameters. Every field is independent; there is no
//! cross-field validation.

use serde::{Deserialize, Serialize};

use crate::money::CurrencyFormat;

/// Document presentation configuration. All fields have usable defaults;
/// construct with `Options::default()` and override what you need.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    // Document-type captions
    pub text_type_invoice: String,
    pub text_type_quotation: String,
    pub text_type_delivery_note: String,

    // Meta captions
    pub text_ref_title: String,
    pub text_version_title: String,
    pub text_date_title: String,
    pub text_payment_term_title: String,

    // Item table column headers
    pub text_items_name_title: String,
    pub text_items_unit_cost_title: String,
    pub text_items_quantity_title: String,
    pub text_items_total_no_tax_title: String,
    pub text_items_tax_title: String,
    pub text_items_discount_title: String,
    pub text_items_total_with_tax_title: String,

    // Totals panel captions
    pub text_total_no_tax: String,
    pub text_total_discounted: String,
    pub text_total_tax: String,
    pub text_total_with_tax: String,

    // Colors as 0-255 RGB triples
    pub base_text_color: [u8; 3],
    pub grey_text_color: [u8; 3],
    pub grey_bg_color: [u8; 3],
    pub dark_bg_color: [u8; 3],

    // Currency formatting
    pub currency_symbol: String,
    pub currency_precision: u32,
    pub currency_thousand: String,
    pub currency_decimal: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            text_type_invoice: "INVOICE".to_string(),
            text_type_quotation: "QUOTATION".to_string(),
            text_type_delivery_note: "DELIVERY NOTE".to_string(),
            text_ref_title: "Ref.".to_string(),
            text_version_title: "Version".to_string(),
            text_date_title: "Date".to_string(),
            text_payment_term_title: "Payment term".to_string(),
            text_items_name_title: "Name".to_string(),
            text_items_unit_cost_title: "Unit cost".to_string(),
            text_items_quantity_title: "Quantity".to_string(),
            text_items_total_no_tax_title: "Total".to_string(),
            text_items_tax_title: "Tax".to_string(),
            text_items_discount_title: "Discount".to_string(),
            text_items_total_with_tax_title: "Total with tax".to_string(),
            text_total_no_tax: "TOTAL".to_string(),
            text_total_discounted: "TOTAL DISCOUNTED".to_string(),
            text_total_tax: "TAX".to_string(),
            text_total_with_tax: "TOTAL WITH TAX".to_string(),
            base_text_color: [35, 35, 35],
            grey_text_color: [82, 82, 82],
            grey_bg_color: [232, 232, 232],
            dark_bg_color: [212, 212, 212],
            currency_symbol: "€ ".to_string(),
            currency_precision: 2,
            currency_thousand: " ".to_string(),
            currency_decimal: ",".to_string(),
        }
    }
}

impl Options {
    /// The pure monetary formatting function used everywhere a figure is
    /// printed.
    pub fn currency_format(&self) -> CurrencyFormat {
        CurrencyFormat {
            symbol: self.currency_symbol.clone(),
            precision: self.currency_precision,
            thousand: self.currency_thousand.clone(),
            decimal: self.currency_decimal.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let opts = Options::default();
        assert!(!opts.text_type_invoice.is_empty());
        assert!(!opts.text_items_name_title.is_empty());
        assert_eq!(opts.currency_precision, 2);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let opts: Options =
            serde_json::from_str(r#"{"text_type_invoice":"FACTURE"}"#).unwrap();
        assert_eq!(opts.text_type_invoice, "FACTURE");
        assert_eq!(opts.text_ref_title, "Ref.");
    }
}

//! Monetary model – decimal values, the percent/amount adjustment shared by
//! discounts and taxes, and currency string formatting.
//!
//! All waterfall arithmetic runs on [`rust_decimal::Decimal`]; rounding only
//! happens at display time in [`CurrencyFormat::format`].

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A percent-of-base or fixed-amount modifier. The same shape serves both
/// discounts (reduce a base) and taxes (computed atop a base).
///
/// Exactly one arm is ever populated; the legacy wire shape with two optional
/// fields is converted once at deserialization and never re-inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AdjustmentRepr", into = "AdjustmentRepr")]
pub enum Adjustment {
    /// Percentage of the base amount, e.g. `Percent(20)` for 20 %.
    Percent(Decimal),
    /// Absolute amount, independent of the base.
    Amount(Decimal),
}

/// A tax modifier. `Percent` is applied to the post-discount base; `Amount`
/// is taken verbatim.
pub type Tax = Adjustment;

/// A discount modifier, applied against a pre-tax base.
pub type Discount = Adjustment;

impl Adjustment {
    /// Reduce `base` by this adjustment. Never clamps: a discount larger
    /// than the base yields a negative result.
    pub fn apply_discount(&self, base: Decimal) -> Decimal {
        match self {
            Adjustment::Amount(amount) => base - *amount,
            Adjustment::Percent(percent) => base - base * *percent / Decimal::ONE_HUNDRED,
        }
    }

    /// Compute the tax owed on `base`. A fixed amount ignores the base
    /// entirely.
    pub fn tax_on(&self, base: Decimal) -> Decimal {
        match self {
            Adjustment::Amount(amount) => *amount,
            Adjustment::Percent(percent) => base * *percent / Decimal::ONE_HUNDRED,
        }
    }
}

/// Wire representation: `{"percent": "20"}` or `{"amount": "89"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AdjustmentRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    percent: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    amount: Option<Decimal>,
}

impl TryFrom<AdjustmentRepr> for Adjustment {
    type Error = String;

    fn try_from(repr: AdjustmentRepr) -> Result<Self, Self::Error> {
        match (repr.percent, repr.amount) {
            (Some(p), None) => Ok(Adjustment::Percent(p)),
            (None, Some(a)) => Ok(Adjustment::Amount(a)),
            (Some(_), Some(_)) => Err("adjustment sets both percent and amount".to_string()),
            (None, None) => Err("adjustment sets neither percent nor amount".to_string()),
        }
    }
}

impl From<Adjustment> for AdjustmentRepr {
    fn from(adj: Adjustment) -> Self {
        match adj {
            Adjustment::Percent(p) => AdjustmentRepr {
                percent: Some(p),
                amount: None,
            },
            Adjustment::Amount(a) => AdjustmentRepr {
                percent: None,
                amount: Some(a),
            },
        }
    }
}

/// Parse a decimal field leniently: an unparseable string degrades to zero
/// with a warning instead of failing the build. This mirrors the historical
/// behavior of unit-cost and quantity handling.
pub fn parse_decimal_lenient(raw: &str, field: &str) -> Decimal {
    match raw.parse::<Decimal>() {
        Ok(value) => value,
        Err(err) => {
            if !raw.is_empty() {
                log::warn!("unparseable {field} {raw:?} treated as zero: {err}");
            }
            Decimal::ZERO
        }
    }
}

/// Render a decimal with exactly two fraction digits, rounding half away
/// from zero. Used for derived percentages in detail lines.
pub fn fixed2(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Currency string formatting parameters. Pure: `format` has no side
/// effects and is the only place display rounding happens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub precision: u32,
    pub thousand: String,
    pub decimal: String,
}

impl CurrencyFormat {
    /// Format `value` as e.g. `€1 234.56` (or `-€1 234.56`), using the
    /// configured separators and precision.
    pub fn format(&self, value: Decimal) -> String {
        let rounded = value
            .round_dp_with_strategy(self.precision, RoundingStrategy::MidpointAwayFromZero)
            .abs();
        let fixed = format!("{:.*}", self.precision as usize, rounded);

        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (fixed.as_str(), None),
        };

        let mut grouped = String::new();
        let digits: Vec<char> = int_part.chars().collect();
        for (i, ch) in digits.iter().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push_str(&self.thousand);
            }
            grouped.push(*ch);
        }

        let mut out = String::new();
        if value.is_sign_negative() && !rounded.is_zero() {
            out.push('-');
        }
        out.push_str(&self.symbol);
        out.push_str(&grouped);
        if let Some(frac) = frac_part {
            out.push_str(&self.decimal);
            out.push_str(frac);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn eur() -> CurrencyFormat {
        CurrencyFormat {
            symbol: "€".to_string(),
            precision: 2,
            thousand: " ".to_string(),
            decimal: ",".to_string(),
        }
    }

    #[test]
    fn percent_discount_is_exact() {
        let adj = Adjustment::Percent(dec!(10));
        assert_eq!(adj.apply_discount(dec!(100)), dec!(90));
    }

    #[test]
    fn amount_discount_can_go_negative() {
        let adj = Adjustment::Amount(dec!(150));
        assert_eq!(adj.apply_discount(dec!(100)), dec!(-50));
    }

    #[test]
    fn amount_tax_ignores_base() {
        let adj = Adjustment::Amount(dec!(89));
        assert_eq!(adj.tax_on(dec!(1)), dec!(89));
        assert_eq!(adj.tax_on(dec!(100000)), dec!(89));
    }

    #[test]
    fn lenient_parse_degrades_to_zero() {
        assert_eq!(parse_decimal_lenient("12.5", "unit cost"), dec!(12.5));
        assert_eq!(parse_decimal_lenient("twelve", "unit cost"), Decimal::ZERO);
        assert_eq!(parse_decimal_lenient("", "quantity"), Decimal::ZERO);
    }

    #[test]
    fn adjustment_rejects_ambiguous_wire_shape() {
        let err = serde_json::from_str::<Adjustment>(r#"{"percent":"10","amount":"5"}"#);
        assert!(err.is_err());
        let err = serde_json::from_str::<Adjustment>("{}");
        assert!(err.is_err());
    }

    #[test]
    fn adjustment_wire_roundtrip() {
        let adj: Adjustment = serde_json::from_str(r#"{"percent":"20"}"#).unwrap();
        assert_eq!(adj, Adjustment::Percent(dec!(20)));
        let json = serde_json::to_string(&Adjustment::Amount(dec!(89))).unwrap();
        assert_eq!(json, r#"{"amount":"89"}"#);
    }

    #[test]
    fn currency_grouping_and_separators() {
        let fmt = eur();
        assert_eq!(fmt.format(dec!(1234567.891)), "€1 234 567,89");
        assert_eq!(fmt.format(dec!(0)), "€0,00");
        assert_eq!(fmt.format(dec!(-42.5)), "-€42,50");
        assert_eq!(fmt.format(dec!(999)), "€999,00");
    }
}

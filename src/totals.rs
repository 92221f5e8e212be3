//! Financial waterfall – pure total/tax/discount arithmetic over the item
//! list. No layout dependency; every figure printed on the document comes
//! from here.
//!
//! Order of operations: item discount → item tax → document discount →
//! document tax redistribution → grand total. A document discount is
//! absorbed proportionally into each percent-taxed item's base so the
//! printed per-item tax figures stay consistent with the discounted total,
//! while fixed-amount taxes are left untouched. That asymmetry is
//! deliberate.

use rust_decimal::Decimal;

use crate::error::BuildError;
use crate::item::Item;
use crate::money::{Adjustment, Discount, Tax};

/// Per-item waterfall results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemTotals {
    /// `unit cost × quantity`.
    pub total_without_tax: Decimal,
    /// `total_without_tax` after the item's own discount, if any.
    pub total_after_discount: Decimal,
    /// Tax on the post-discount base; zero when the item has no tax.
    pub tax: Decimal,
    /// `total_after_discount + tax`.
    pub total_with_tax: Decimal,
}

/// Document-level waterfall results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTotals {
    /// Sum of all post-item-discount totals.
    pub total: Decimal,
    /// `total` after the document discount; equals `total` when there is no
    /// document discount.
    pub total_with_discount: Decimal,
    /// Total tax, redistributed when a document discount is present.
    pub tax: Decimal,
    /// `total_with_discount + tax`.
    pub total_with_tax: Decimal,
    /// Per-item figures in item order.
    pub items: Vec<ItemTotals>,
}

/// Resolve the tax that effectively applies to an item: its own tax when
/// set, otherwise the document default. Pure; the item is never mutated.
pub fn effective_tax<'a>(item: &'a Item, default_tax: Option<&'a Tax>) -> Option<&'a Tax> {
    item.tax.as_ref().or(default_tax)
}

/// Compute one item's figures against its resolved tax.
pub fn item_totals(item: &Item, tax: Option<&Tax>) -> ItemTotals {
    let total_without_tax = item.unit_cost() * item.quantity();

    let total_after_discount = match &item.discount {
        Some(discount) => discount.apply_discount(total_without_tax),
        None => total_without_tax,
    };

    let tax = match tax {
        Some(t) => t.tax_on(total_after_discount),
        None => Decimal::ZERO,
    };

    ItemTotals {
        total_without_tax,
        total_after_discount,
        tax,
        total_with_tax: total_after_discount + tax,
    }
}

/// Run the full waterfall over `items`.
///
/// With a fixed-amount document discount the implied percent is
/// `amount × 100 / total_with_discount`; a non-positive denominator has no
/// defined answer and fails with [`BuildError::DegenerateDiscount`].
pub fn compute(
    items: &[Item],
    default_tax: Option<&Tax>,
    discount: Option<&Discount>,
) -> Result<DocumentTotals, BuildError> {
    let per_item: Vec<ItemTotals> = items
        .iter()
        .map(|item| item_totals(item, effective_tax(item, default_tax)))
        .collect();

    let total: Decimal = per_item.iter().map(|t| t.total_after_discount).sum();

    let (total_with_discount, tax) = match discount {
        None => {
            let tax = per_item.iter().map(|t| t.tax).sum();
            (total, tax)
        }
        Some(discount) => {
            let total_with_discount = discount.apply_discount(total);

            // Re-express the discount as a percentage of the already
            // discounted base so it can be folded into each item's tax base.
            let discount_percent = match discount {
                Adjustment::Percent(p) => *p,
                Adjustment::Amount(a) => {
                    if total_with_discount <= Decimal::ZERO {
                        return Err(BuildError::DegenerateDiscount);
                    }
                    *a * Decimal::ONE_HUNDRED / total_with_discount
                }
            };

            let mut tax = Decimal::ZERO;
            for (item, computed) in items.iter().zip(&per_item) {
                let Some(item_tax) = effective_tax(item, default_tax) else {
                    continue;
                };
                match item_tax {
                    // Fixed-amount taxes are absolute; the document
                    // discount never touches them.
                    Adjustment::Amount(a) => tax += *a,
                    Adjustment::Percent(tax_percent) => {
                        let base = computed.total_after_discount;
                        let reduced = base - discount_percent * base / Decimal::ONE_HUNDRED;
                        tax += *tax_percent * reduced / Decimal::ONE_HUNDRED;
                    }
                }
            }
            (total_with_discount, tax)
        }
    };

    Ok(DocumentTotals {
        total,
        total_with_discount,
        tax,
        total_with_tax: total_with_discount + tax,
        items: per_item,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Adjustment;
    use rust_decimal_macros::dec;

    fn item(cost: &str, qty: &str) -> Item {
        Item {
            name: "item".to_string(),
            unit_cost: cost.to_string(),
            quantity: qty.to_string(),
            ..Item::default()
        }
    }

    #[test]
    fn plain_item_no_tax_no_discount() {
        // 100 × 2 = 200, no tax
        let items = vec![item("100", "2")];
        let totals = compute(&items, None, None).unwrap();
        assert_eq!(totals.total, dec!(200));
        assert_eq!(totals.tax, dec!(0));
        assert_eq!(totals.total_with_tax, dec!(200));
    }

    #[test]
    fn undiscounted_final_total_is_exact_sum() {
        let items = vec![item("19.99", "3"), item("0.01", "7"), item("1200", "1")];
        let totals = compute(&items, None, None).unwrap();
        assert_eq!(totals.total_with_tax, dec!(19.99) * dec!(3) + dec!(0.07) + dec!(1200));
    }

    #[test]
    fn item_discount_then_tax() {
        // 100 × 1, -10 % discount, 20 % tax → 90 + 18 = 108
        let mut it = item("100", "1");
        it.discount = Some(Adjustment::Percent(dec!(10)));
        it.tax = Some(Adjustment::Percent(dec!(20)));
        let computed = item_totals(&it, it.tax.as_ref());
        assert_eq!(computed.total_after_discount, dec!(90));
        assert_eq!(computed.tax, dec!(18));
        assert_eq!(computed.total_with_tax, dec!(108));
    }

    #[test]
    fn amount_discount_larger_than_base_goes_negative() {
        let mut it = item("100", "1");
        it.discount = Some(Adjustment::Amount(dec!(150)));
        let computed = item_totals(&it, None);
        assert_eq!(computed.total_after_discount, dec!(-50));
    }

    #[test]
    fn document_amount_discount_redistributes_percent_taxes() {
        // Two items with post-discount total 100 each and 10 % tax, document
        // discount of 50: implied percent = 50 × 100 / 150 = 33.33…,
        // per-item reduced base 66.67, per-item tax 6.67, final ≈ 163.33.
        let mut a = item("100", "1");
        a.tax = Some(Adjustment::Percent(dec!(10)));
        let b = a.clone();
        let totals = compute(&[a, b], None, Some(&Adjustment::Amount(dec!(50)))).unwrap();

        assert_eq!(totals.total, dec!(200));
        assert_eq!(totals.total_with_discount, dec!(150));
        let rounded = totals
            .tax
            .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
        assert_eq!(rounded, dec!(13.33));
        let final_rounded = totals
            .total_with_tax
            .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
        assert_eq!(final_rounded, dec!(163.33));
    }

    #[test]
    fn document_discount_leaves_amount_taxes_untouched() {
        let mut a = item("100", "1");
        a.tax = Some(Adjustment::Amount(dec!(89)));
        let mut b = item("100", "1");
        b.tax = Some(Adjustment::Percent(dec!(10)));
        let totals = compute(&[a, b], None, Some(&Adjustment::Percent(dec!(50)))).unwrap();

        // Fixed tax stays 89; percent tax is computed on the halved base.
        assert_eq!(totals.total_with_discount, dec!(100));
        assert_eq!(totals.tax, dec!(89) + dec!(5));
    }

    #[test]
    fn zero_amount_discount_matches_no_discount() {
        let mut a = item("100", "2");
        a.tax = Some(Adjustment::Percent(dec!(20)));
        let without = compute(std::slice::from_ref(&a), None, None).unwrap();
        let with_zero =
            compute(std::slice::from_ref(&a), None, Some(&Adjustment::Amount(dec!(0)))).unwrap();
        assert_eq!(without.tax, with_zero.tax);
        assert_eq!(without.total_with_tax, with_zero.total_with_tax);
    }

    #[test]
    fn degenerate_amount_discount_fails_loudly() {
        let items = vec![item("100", "1")];
        let err = compute(&items, None, Some(&Adjustment::Amount(dec!(100))));
        assert!(matches!(err, Err(BuildError::DegenerateDiscount)));
        let err = compute(&items, None, Some(&Adjustment::Amount(dec!(150))));
        assert!(matches!(err, Err(BuildError::DegenerateDiscount)));
    }

    #[test]
    fn default_tax_backfills_items_without_one() {
        let default = Adjustment::Percent(dec!(10));
        let mut taxed = item("100", "1");
        taxed.tax = Some(Adjustment::Percent(dec!(20)));
        let untaxed = item("100", "1");

        let totals = compute(&[taxed, untaxed], Some(&default), None).unwrap();
        assert_eq!(totals.tax, dec!(20) + dec!(10));
    }
}

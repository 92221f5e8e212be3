//! Items – one row of the document's table, a product or a service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::{parse_decimal_lenient, Discount, Tax};

/// A single line of the item table. Unit cost and quantity are kept as
/// decimal-parseable strings; unparseable values degrade to zero (see
/// [`parse_decimal_lenient`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub unit_cost: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub quantity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<Tax>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Discount>,
}

impl Item {
    pub fn unit_cost(&self) -> Decimal {
        parse_decimal_lenient(&self.unit_cost, "unit cost")
    }

    pub fn quantity(&self) -> Decimal {
        parse_decimal_lenient(&self.quantity, "quantity")
    }
}

//! Aggregate derivations over cart lines.
//!
//! Pure functions of the current line collection; recomputed on every read,
//! never cached.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use suplefit_core::{CurrencyCode, Price};

use crate::store::LineItem;

/// Totals derived from a cart's lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    /// Sum of `unit_price * quantity` over all lines.
    pub total_price: Price,
    /// Sum of quantities (a line with quantity 3 counts as 3).
    pub total_items: u64,
    /// Sum of `(original_price or unit_price) * quantity`; lines without a
    /// recorded original price contribute their current price.
    pub original_total: Price,
    /// Sum of per-line discounts, each floored at zero. A line whose
    /// current price exceeds its "original" does not offset discounts
    /// elsewhere.
    pub total_discount: Price,
}

impl CartTotals {
    /// Compute totals over the given lines.
    ///
    /// The store sells in one currency; the first line's currency (default
    /// currency for an empty cart) labels the sums.
    #[must_use]
    pub fn compute(items: &[LineItem]) -> Self {
        let currency = items
            .first()
            .map_or_else(CurrencyCode::default, |line| line.unit_price.currency_code);

        let mut total_price = Decimal::ZERO;
        let mut total_items = 0u64;
        let mut original_total = Decimal::ZERO;
        let mut total_discount = Decimal::ZERO;

        for line in items {
            let quantity = Decimal::from(line.quantity);
            let unit = line.unit_price.amount;
            let original = line.original_price.map_or(unit, |price| price.amount);

            total_price += unit * quantity;
            total_items += u64::from(line.quantity);
            original_total += original * quantity;
            total_discount += (original - unit).max(Decimal::ZERO) * quantity;
        }

        Self {
            total_price: Price::new(total_price, currency),
            total_items,
            original_total: Price::new(original_total, currency),
            total_discount: Price::new(total_discount, currency),
        }
    }
}

//! Chart-ready views of the aggregation results.
//!
//! The presentation layer draws a pie of today's products and a Monday to
//! Sunday bar chart of the week. This module does the bookkeeping for both:
//! palette slots are handed out by sorted product name, and the week always
//! has seven bars even when some days had no sales.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use shared::{ProductSlice, WeekdayBar};
use std::collections::BTreeMap;

pub const DEFAULT_PALETTE_SIZE: usize = 8;

#[derive(Debug, Clone)]
pub struct ChartDataService {
    palette_size: usize,
}

impl ChartDataService {
    pub fn new() -> Self {
        Self::with_palette_size(DEFAULT_PALETTE_SIZE)
    }

    /// A palette size of zero is treated as one
    pub fn with_palette_size(palette_size: usize) -> Self {
        Self {
            palette_size: palette_size.max(1),
        }
    }

    pub fn palette_size(&self) -> usize {
        self.palette_size
    }

    /// Palette index per product, by position in the sorted list of names.
    ///
    /// Names are sorted and deduplicated first, so the result depends only on
    /// which products exist and never on the order they were seen in.
    pub fn assign_product_colors<'a, I>(&self, products: I) -> BTreeMap<String, usize>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut names: Vec<&str> = products.into_iter().collect();
        names.sort_unstable();
        names.dedup();

        names
            .into_iter()
            .enumerate()
            .map(|(index, name)| (name.to_string(), index % self.palette_size))
            .collect()
    }

    /// Pie slices in product name order
    pub fn product_slices(&self, by_product: &BTreeMap<String, Decimal>) -> Vec<ProductSlice> {
        let total = by_product
            .values()
            .fold(Decimal::ZERO, |total, amount| total.saturating_add(*amount));
        let colors = self.assign_product_colors(by_product.keys().map(String::as_str));

        by_product
            .iter()
            .map(|(product, amount)| ProductSlice {
                product: product.clone(),
                amount: *amount,
                share_percent: share_percent(*amount, total),
                color_index: colors.get(product).copied().unwrap_or(0),
            })
            .collect()
    }

    /// Seven bars, Monday first; days without sales get a zero bar
    pub fn weekday_bars(&self, by_weekday: &BTreeMap<u32, Decimal>) -> Vec<WeekdayBar> {
        (1..=7)
            .map(|weekday| WeekdayBar {
                weekday,
                label: weekday_label(weekday).to_string(),
                amount: by_weekday.get(&weekday).copied().unwrap_or(Decimal::ZERO),
            })
            .collect()
    }
}

impl Default for ChartDataService {
    fn default() -> Self {
        Self::new()
    }
}

fn share_percent(amount: Decimal, total: Decimal) -> f64 {
    if total.is_zero() {
        return 0.0;
    }
    amount
        .checked_div(total)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|percent| percent.round_dp(2).to_f64())
        .unwrap_or(0.0)
}

/// Short label for a weekday number (1 = Monday .. 7 = Sunday)
pub fn weekday_label(weekday: u32) -> &'static str {
    match weekday {
        1 => "Mon",
        2 => "Tue",
        3 => "Wed",
        4 => "Thu",
        5 => "Fri",
        6 => "Sat",
        7 => "Sun",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: i64) -> Decimal {
        Decimal::new(value * 100, 2)
    }

    #[test]
    fn test_colors_depend_only_on_sorted_names() {
        let service = ChartDataService::with_palette_size(2);

        let forward = service.assign_product_colors(["Widget", "Gadget", "Bolt", "Gadget"]);
        let backward = service.assign_product_colors(["Bolt", "Widget", "Gadget"]);

        assert_eq!(forward, backward);
        assert_eq!(forward["Bolt"], 0);
        assert_eq!(forward["Gadget"], 1);
        // Wraps around the two-color palette
        assert_eq!(forward["Widget"], 0);
    }

    #[test]
    fn test_zero_palette_size_is_clamped() {
        let service = ChartDataService::with_palette_size(0);
        assert_eq!(service.palette_size(), 1);
        assert_eq!(service.assign_product_colors(["A", "B"])["B"], 0);
    }

    #[test]
    fn test_product_slices_shares() {
        let service = ChartDataService::new();
        let by_product = BTreeMap::from([
            ("Widget".to_string(), dec(10)),
            ("Gadget".to_string(), dec(5)),
            ("Bolt".to_string(), dec(5)),
        ]);

        let slices = service.product_slices(&by_product);

        let names: Vec<_> = slices.iter().map(|s| s.product.as_str()).collect();
        assert_eq!(names, vec!["Bolt", "Gadget", "Widget"]);
        assert_eq!(slices[2].share_percent, 50.0);
        assert_eq!(slices[0].share_percent, 25.0);
        assert_eq!(slices[2].color_index, 2);
    }

    #[test]
    fn test_product_slices_with_zero_total() {
        let service = ChartDataService::new();
        let by_product = BTreeMap::from([
            ("Widget".to_string(), dec(5)),
            ("Refund".to_string(), dec(-5)),
        ]);

        let slices = service.product_slices(&by_product);
        assert!(slices.iter().all(|s| s.share_percent == 0.0));
        assert!(service.product_slices(&BTreeMap::new()).is_empty());
    }

    #[test]
    fn test_product_slices_with_extreme_amounts() {
        let service = ChartDataService::new();
        let by_product = BTreeMap::from([
            ("Widget".to_string(), Decimal::MAX),
            ("Refund".to_string(), Decimal::new(-1, 2)),
        ]);

        let slices = service.product_slices(&by_product);

        assert_eq!(slices.len(), 2);
        assert!(slices.iter().all(|s| s.share_percent.is_finite()));
    }

    #[test]
    fn test_weekday_bars_fill_missing_days() {
        let service = ChartDataService::new();
        let by_weekday = BTreeMap::from([(3, dec(15)), (7, dec(2))]);

        let bars = service.weekday_bars(&by_weekday);

        assert_eq!(bars.len(), 7);
        assert_eq!(bars[0].label, "Mon");
        assert_eq!(bars[0].amount, Decimal::ZERO);
        assert_eq!(bars[2].amount, dec(15));
        assert_eq!(bars[6].weekday, 7);
        assert_eq!(bars[6].label, "Sun");
    }

    #[test]
    fn test_weekday_label() {
        assert_eq!(weekday_label(1), "Mon");
        assert_eq!(weekday_label(5), "Fri");
        assert_eq!(weekday_label(8), "?");
    }
}

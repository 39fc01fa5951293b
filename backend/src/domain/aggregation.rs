//! Sales aggregation for the statistics screen.
//!
//! Every function here is pure: it receives a snapshot of sales plus a
//! reference instant and returns a freshly built view. Nothing is cached and
//! the input order (the store's insertion order) is preserved in filtered
//! results.
//!
//! The "local calendar" is the time zone carried by the reference instant.
//! Sale dates are converted into that zone before any calendar comparison, so
//! callers pass `chrono::Local::now()` in production and a fixed offset in
//! tests.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{TodaySummary, WeekSummary};
use std::collections::BTreeMap;

use super::models::Sale;

/// Where the "this week" window starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekBoundary {
    /// Monday 00:00 of the current week (seven-day window)
    #[default]
    Calendar,
    /// The Sunday before the current week's Monday (eight-day window)
    IncludePreviousDay,
}

impl WeekBoundary {
    fn extra_days(self) -> i64 {
        match self {
            WeekBoundary::Calendar => 0,
            WeekBoundary::IncludePreviousDay => 1,
        }
    }
}

fn sale_of<S: AsRef<Sale>>(item: &S) -> &Sale {
    item.as_ref()
}

/// First instant of `day` in the given time zone.
///
/// Days that start inside a DST gap begin at the first valid local time.
pub fn start_of_day<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> DateTime<Tz> {
    let midnight = day.and_time(NaiveTime::default());
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(midnight + Duration::hours(1)))
                .earliest()
        })
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight))
}

/// Start of the week containing `now` (Monday = weekday 1).
pub fn start_of_week<Tz: TimeZone>(now: &DateTime<Tz>, boundary: WeekBoundary) -> DateTime<Tz> {
    let days_since_monday = i64::from(now.weekday().number_from_monday() - 1);
    let first_day = now.date_naive() - Duration::days(days_since_monday + boundary.extra_days());
    start_of_day(&now.timezone(), first_day)
}

/// Sales dated on the same calendar day as `now`.
pub fn today_sales<I, Tz>(sales: I, now: &DateTime<Tz>) -> Vec<I::Item>
where
    I: IntoIterator,
    I::Item: AsRef<Sale>,
    Tz: TimeZone,
{
    let tz = now.timezone();
    let today = now.date_naive();
    sales
        .into_iter()
        .filter(|item| sale_of(item).date.with_timezone(&tz).date_naive() == today)
        .collect()
}

/// Sales dated on or after the start of `now`'s week.
pub fn this_week_sales<I, Tz>(sales: I, now: &DateTime<Tz>, boundary: WeekBoundary) -> Vec<I::Item>
where
    I: IntoIterator,
    I::Item: AsRef<Sale>,
    Tz: TimeZone,
{
    let tz = now.timezone();
    let week_start = start_of_week(now, boundary);
    sales
        .into_iter()
        .filter(|item| sale_of(item).date.with_timezone(&tz) >= week_start)
        .collect()
}

/// Exact decimal sum of the amounts; zero for no sales.
///
/// Sums beyond the `Decimal` range clamp to `Decimal::MAX`/`Decimal::MIN`.
pub fn sum_amounts<I>(sales: I) -> Decimal
where
    I: IntoIterator,
    I::Item: AsRef<Sale>,
{
    sales
        .into_iter()
        .fold(Decimal::ZERO, |total, item| total.saturating_add(sale_of(&item).amount))
}

/// Summed amount per product name.
///
/// Keys come back sorted, which keeps anything derived from iteration order
/// (chart colors, legends) stable between refreshes.
pub fn group_by_product<I>(sales: I) -> BTreeMap<String, Decimal>
where
    I: IntoIterator,
    I::Item: AsRef<Sale>,
{
    let mut totals = BTreeMap::new();
    for item in sales {
        let sale = sale_of(&item);
        let total = totals.entry(sale.product.clone()).or_insert(Decimal::ZERO);
        *total = total.saturating_add(sale.amount);
    }
    totals
}

/// Summed amount per weekday (1 = Monday .. 7 = Sunday) in the zone `tz`.
///
/// Only weekdays that actually have sales appear in the result.
pub fn group_by_weekday<I, Tz>(sales: I, tz: &Tz) -> BTreeMap<u32, Decimal>
where
    I: IntoIterator,
    I::Item: AsRef<Sale>,
    Tz: TimeZone,
{
    let mut totals = BTreeMap::new();
    for item in sales {
        let sale = sale_of(&item);
        let weekday = sale.date.with_timezone(tz).weekday().number_from_monday();
        let total = totals.entry(weekday).or_insert(Decimal::ZERO);
        *total = total.saturating_add(sale.amount);
    }
    totals
}

pub fn today_summary<I, Tz>(sales: I, now: &DateTime<Tz>) -> TodaySummary
where
    I: IntoIterator,
    I::Item: AsRef<Sale>,
    Tz: TimeZone,
{
    let today = today_sales(sales, now);
    TodaySummary {
        day: now.date_naive(),
        total: sum_amounts(&today),
        sale_count: today.len(),
        by_product: group_by_product(&today),
    }
}

pub fn week_summary<I, Tz>(sales: I, now: &DateTime<Tz>, boundary: WeekBoundary) -> WeekSummary
where
    I: IntoIterator,
    I::Item: AsRef<Sale>,
    Tz: TimeZone,
{
    let week = this_week_sales(sales, now, boundary);
    WeekSummary {
        week_start: start_of_week(now, boundary).date_naive(),
        total: sum_amounts(&week),
        sale_count: week.len(),
        by_weekday: group_by_weekday(&week, &now.timezone()),
    }
}

//! Analytics periods and date range resolution
//!
//! Dashboards pick a named period (`week`, `month`, ...) and an offset into
//! the past. This module turns that choice into a concrete inclusive
//! `[from, to]` window anchored on "today". Weeks start on Monday.
//!
//! "Today" comes from a [`Clock`] so callers (and tests) control the anchor.

use chrono::{Datelike, Days, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::RangeError;

/// Date format used for statistics query parameters
pub const QUERY_DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Clock
// ============================================================================

/// Source of the current calendar date
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a fixed date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

// ============================================================================
// Date Ranges
// ============================================================================

/// Inclusive calendar date range with `from <= to`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Build a range from two endpoints in either order
    pub fn ordered(a: NaiveDate, b: NaiveDate) -> Self {
        if a > b {
            Self { from: b, to: a }
        } else {
            Self { from: a, to: b }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Number of calendar days covered, both ends included
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    /// Query-string pairs for the statistics endpoint
    pub fn query_params(&self) -> [(&'static str, String); 2] {
        [
            ("from", format_query_date(self.from)),
            ("to", format_query_date(self.to)),
        ]
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            format_query_date(self.from),
            format_query_date(self.to)
        )
    }
}

/// Range picker output: endpoints may be missing or out of order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RangeSelection {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl RangeSelection {
    /// Parse raw `YYYY-MM-DD` endpoints. Blank strings count as missing.
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Result<Self, RangeError> {
        Ok(Self {
            from: parse_optional_date(from)?,
            to: parse_optional_date(to)?,
        })
    }
}

/// Format a date as `YYYY-MM-DD`
pub fn format_query_date(date: NaiveDate) -> String {
    date.format(QUERY_DATE_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_query_date(input: &str) -> Result<NaiveDate, RangeError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, QUERY_DATE_FORMAT)
        .map_err(|_| RangeError::InvalidDate(trimmed.to_string()))
}

fn parse_optional_date(input: Option<&str>) -> Result<Option<NaiveDate>, RangeError> {
    match input.map(str::trim) {
        Some(s) if !s.is_empty() => parse_query_date(s).map(Some),
        _ => Ok(None),
    }
}

/// Order a picker selection; `None` unless both endpoints are set
pub fn normalize_range(selection: Option<RangeSelection>) -> Option<DateRange> {
    let selection = selection?;
    Some(DateRange::ordered(selection.from?, selection.to?))
}

// ============================================================================
// Periods
// ============================================================================

/// Analytics period tag. Unknown tags are kept as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Period {
    #[default]
    All,
    Week,
    Month,
    Quarter,
    Year,
    Custom,
    Other(String),
}

impl Period {
    pub fn as_str(&self) -> &str {
        match self {
            Period::All => "all",
            Period::Week => "week",
            Period::Month => "month",
            Period::Quarter => "quarter",
            Period::Year => "year",
            Period::Custom => "custom",
            Period::Other(tag) => tag,
        }
    }

    /// Calendar granularity for the recurring periods
    pub fn granularity(&self) -> Option<Granularity> {
        match self {
            Period::Week => Some(Granularity::Week),
            Period::Month => Some(Granularity::Month),
            Period::Quarter => Some(Granularity::Quarter),
            Period::Year => Some(Granularity::Year),
            Period::All | Period::Custom | Period::Other(_) => None,
        }
    }
}

impl From<&str> for Period {
    fn from(tag: &str) -> Self {
        match tag {
            "all" => Period::All,
            "week" => Period::Week,
            "month" => Period::Month,
            "quarter" => Period::Quarter,
            "year" => Period::Year,
            "custom" => Period::Custom,
            other => Period::Other(other.to_string()),
        }
    }
}

impl From<String> for Period {
    fn from(tag: String) -> Self {
        Period::from(tag.as_str())
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        match period {
            Period::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl std::str::FromStr for Period {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Period::from(s))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recurring calendar bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Week,
    Month,
    Quarter,
    Year,
}

impl Granularity {
    fn months(&self) -> u32 {
        match self {
            Granularity::Week => 0,
            Granularity::Month => 1,
            Granularity::Quarter => 3,
            Granularity::Year => 12,
        }
    }

    /// Move `date` back by `offset` whole units
    fn shift_back(&self, date: NaiveDate, offset: u32) -> Option<NaiveDate> {
        match self {
            Granularity::Week => date.checked_sub_days(Days::new(7 * u64::from(offset))),
            _ => date.checked_sub_months(Months::new(self.months().checked_mul(offset)?)),
        }
    }

    /// First day of the bucket containing `date`
    pub fn start_of(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Granularity::Week => date.checked_sub_days(Days::new(u64::from(
                date.weekday().num_days_from_monday(),
            ))),
            _ => {
                let month0 = date.month0();
                let first_month0 = month0 - month0 % self.months();
                NaiveDate::from_ymd_opt(date.year(), first_month0 + 1, 1)
            }
        }
    }

    /// Start of the following bucket
    fn next_start(&self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Granularity::Week => start.checked_add_days(Days::new(7)),
            _ => start.checked_add_months(Months::new(self.months())),
        }
    }

    /// Inclusive bucket that lies `offset` units before the one holding `today`
    pub fn bucket(&self, today: NaiveDate, offset: u32) -> Option<DateRange> {
        let anchor = self.shift_back(today, offset)?;
        let from = self.start_of(anchor)?;
        let to = self.next_start(from)?.pred_opt()?;
        Some(DateRange { from, to })
    }
}

/// Resolve a period into a concrete date window.
///
/// `Custom` returns `custom` untouched. The recurring periods return the
/// bucket `offset` units back from today. `All` and unknown tags mean
/// "no bound" and return `None`, as do offsets that leave the calendar.
pub fn range_for_period(
    period: &Period,
    custom: Option<DateRange>,
    offset: u32,
    clock: &dyn Clock,
) -> Option<DateRange> {
    match period {
        Period::Custom => custom,
        recurring => recurring
            .granularity()
            .and_then(|granularity| granularity.bucket(clock.today(), offset)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn resolve(period: &str, today: NaiveDate, offset: u32) -> Option<DateRange> {
        range_for_period(&Period::from(period), None, offset, &FixedClock(today))
    }

    // =========================================================================
    // Recurring Period Tests
    // =========================================================================

    #[rstest]
    // 2026-10-16 is a Friday
    #[case("week", date(2026, 10, 16), 0, date(2026, 10, 12), date(2026, 10, 18))]
    #[case("week", date(2026, 10, 16), 1, date(2026, 10, 5), date(2026, 10, 11))]
    #[case("week", date(2026, 10, 12), 0, date(2026, 10, 12), date(2026, 10, 18))]
    #[case("week", date(2026, 10, 18), 0, date(2026, 10, 12), date(2026, 10, 18))]
    #[case("week", date(2027, 1, 1), 0, date(2026, 12, 28), date(2027, 1, 3))]
    #[case("month", date(2026, 10, 16), 0, date(2026, 10, 1), date(2026, 10, 31))]
    #[case("month", date(2026, 10, 16), 1, date(2026, 9, 1), date(2026, 9, 30))]
    #[case("month", date(2026, 10, 16), 10, date(2025, 12, 1), date(2025, 12, 31))]
    #[case("month", date(2026, 3, 31), 1, date(2026, 2, 1), date(2026, 2, 28))]
    #[case("month", date(2024, 3, 31), 1, date(2024, 2, 1), date(2024, 2, 29))]
    #[case("quarter", date(2026, 10, 16), 0, date(2026, 10, 1), date(2026, 12, 31))]
    #[case("quarter", date(2026, 10, 16), 1, date(2026, 7, 1), date(2026, 9, 30))]
    #[case("quarter", date(2026, 10, 16), 4, date(2025, 10, 1), date(2025, 12, 31))]
    #[case("quarter", date(2026, 2, 15), 1, date(2025, 10, 1), date(2025, 12, 31))]
    #[case("year", date(2026, 10, 16), 0, date(2026, 1, 1), date(2026, 12, 31))]
    #[case("year", date(2026, 10, 16), 2, date(2024, 1, 1), date(2024, 12, 31))]
    fn test_recurring_periods(
        #[case] period: &str,
        #[case] today: NaiveDate,
        #[case] offset: u32,
        #[case] from: NaiveDate,
        #[case] to: NaiveDate,
    ) {
        assert_eq!(resolve(period, today, offset), Some(DateRange { from, to }));
    }

    #[rstest]
    #[case("all")]
    #[case("bogus")]
    #[case("Week")]
    #[case("")]
    fn test_unbounded_periods_return_none(#[case] period: &str) {
        assert_eq!(resolve(period, date(2026, 10, 16), 0), None);
    }

    #[test]
    fn test_custom_returns_given_range_unchanged() {
        let clock = FixedClock(date(2026, 10, 16));
        // Custom ranges are not validated or reordered
        let custom = DateRange {
            from: date(2026, 2, 10),
            to: date(2026, 2, 1),
        };
        assert_eq!(
            range_for_period(&Period::Custom, Some(custom), 3, &clock),
            Some(custom)
        );
        assert_eq!(range_for_period(&Period::Custom, None, 0, &clock), None);
    }

    #[test]
    fn test_out_of_calendar_offsets_return_none() {
        assert_eq!(resolve("year", date(2026, 10, 16), u32::MAX), None);
        assert_eq!(resolve("week", NaiveDate::MAX, 0), None);
    }

    #[test]
    fn test_system_clock_week_starts_monday() {
        let today = SystemClock.today();
        let range = range_for_period(&Period::Week, None, 0, &FixedClock(today)).unwrap();
        assert_eq!(range.from.weekday(), chrono::Weekday::Mon);
        assert_eq!(range.to.weekday(), chrono::Weekday::Sun);
        assert!(range.contains(today));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Property: buckets are ordered, aligned, and hold the shifted anchor
        #[test]
        fn prop_bucket_contains_shifted_anchor(
            days in 0i64..40_000,
            offset in 0u32..240,
            which in 0usize..4,
        ) {
            let today = date(1970, 1, 1) + chrono::Duration::days(days);
            let granularity = [
                Granularity::Week,
                Granularity::Month,
                Granularity::Quarter,
                Granularity::Year,
            ][which];

            let range = granularity.bucket(today, offset).unwrap();
            prop_assert!(range.from <= range.to);
            prop_assert_eq!(granularity.start_of(range.to), Some(range.from));
            prop_assert!(range.contains(granularity.shift_back(today, offset).unwrap()));
            if offset == 0 {
                prop_assert!(range.contains(today));
            }
        }
    }

    // =========================================================================
    // Range Normalization Tests
    // =========================================================================

    #[test]
    fn test_normalize_range_swaps_reversed_endpoints() {
        let selection = RangeSelection {
            from: Some(date(2026, 2, 10)),
            to: Some(date(2026, 2, 1)),
        };
        assert_eq!(
            normalize_range(Some(selection)),
            Some(DateRange {
                from: date(2026, 2, 1),
                to: date(2026, 2, 10)
            })
        );
    }

    #[test]
    fn test_normalize_range_requires_both_endpoints() {
        let partial = RangeSelection {
            from: None,
            to: Some(date(2026, 2, 1)),
        };
        assert_eq!(normalize_range(Some(partial)), None);
        assert_eq!(normalize_range(None), None);
    }

    #[test]
    fn test_parse_selection() {
        let selection = RangeSelection::parse(Some("2026-02-10"), Some(" ")).unwrap();
        assert_eq!(selection.from, Some(date(2026, 2, 10)));
        assert_eq!(selection.to, None);

        let err = RangeSelection::parse(Some("10/02/2026"), None).unwrap_err();
        assert_eq!(err, RangeError::InvalidDate("10/02/2026".to_string()));
    }

    #[test]
    fn test_query_params_format() {
        let range = DateRange {
            from: date(2026, 1, 5),
            to: date(2026, 1, 11),
        };
        assert_eq!(
            range.query_params(),
            [
                ("from", "2026-01-05".to_string()),
                ("to", "2026-01-11".to_string())
            ]
        );
        assert_eq!(range.days(), 7);
        assert_eq!(range.to_string(), "2026-01-05..2026-01-11");
    }

    #[test]
    fn test_period_serde_passthrough() {
        let period: Period = serde_json::from_str("\"quarter\"").unwrap();
        assert_eq!(period, Period::Quarter);

        let other: Period = serde_json::from_str("\"fortnight\"").unwrap();
        assert_eq!(other, Period::Other("fortnight".to_string()));
        assert_eq!(serde_json::to_string(&other).unwrap(), "\"fortnight\"");
    }
}

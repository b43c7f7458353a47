//! Sales report aggregation.
//!
//! Buckets a business's completed sales into consecutive time periods at a
//! requested granularity and totals each bucket. Buckets are half-open date
//! intervals `[start, end)`; the first starts exactly at the requested
//! period start and the last is clipped to the day after the period end.
//! Empty buckets are reported as zero rows, never omitted, so a chart of
//! the result shows the gaps.

use jiff::civil::Date;
use money::Money;
use record_store::{RecordId, SaleSource, StoreError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Bucket width for a sales report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    /// One bucket covering the whole requested range.
    All,
    Day,
    /// Seven-day strides aligned to the period start's weekday.
    Week,
    /// Calendar months; the first and last buckets are clipped to the
    /// requested range.
    Month,
    /// Calendar years, clipped like months.
    Year,
}

impl Granularity {
    /// Accepts the wire vocabulary: `"all"`, `"daily"`, `"weekly"`,
    /// `"monthly"`, `"yearly"`.
    pub fn parse(value: &str) -> Option<Granularity> {
        match value {
            "all" => Some(Granularity::All),
            "daily" => Some(Granularity::Day),
            "weekly" => Some(Granularity::Week),
            "monthly" => Some(Granularity::Month),
            "yearly" => Some(Granularity::Year),
            _ => None,
        }
    }
}

/// One report row: a half-open date interval with its accumulated count
/// and monetary total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub start: Date,
    /// Exclusive: the first day of the next bucket.
    pub end: Date,
    pub count: u64,
    pub total: Money,
}

/// A report request in wire form: ISO calendar dates and the granularity
/// vocabulary of [`Granularity::parse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub business_id: RecordId,
    pub period_start: String,
    pub period_end: String,
    pub granularity: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// A period date was not a `yyyy-mm-dd` calendar date.
    MalformedDate(String),
    /// The granularity string is not in the accepted vocabulary.
    InvalidGranularity(String),
    /// The period start falls after the period end.
    InvalidRange { start: Date, end: Date },
    /// The period end leaves no room for the day-after bucket boundary.
    RangeOutOfBounds(Date),
    /// The sale source failed; the report is abandoned, never partial.
    Store(StoreError),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::MalformedDate(value) => {
                write!(f, "date {value:?} is not in the format yyyy-mm-dd")
            }
            ReportError::InvalidGranularity(value) => {
                write!(f, "{value:?} is not a valid granularity")
            }
            ReportError::InvalidRange { start, end } => {
                write!(f, "report start {start} falls after report end {end}")
            }
            ReportError::RangeOutOfBounds(end) => {
                write!(f, "report end {end} is out of the supported date range")
            }
            ReportError::Store(error) => error.fmt(f),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Store(error) => Some(error),
            _ => None,
        }
    }
}

impl From<StoreError> for ReportError {
    fn from(error: StoreError) -> Self {
        ReportError::Store(error)
    }
}

/// Parses and validates a wire-form request, then aggregates.
pub fn sales_report<S>(source: &S, request: &ReportRequest) -> Result<Vec<ReportPeriod>, ReportError>
where
    S: SaleSource + ?Sized,
{
    let start = parse_report_date(&request.period_start)?;
    let end = parse_report_date(&request.period_end)?;
    let granularity = Granularity::parse(&request.granularity)
        .ok_or_else(|| ReportError::InvalidGranularity(request.granularity.clone()))?;
    aggregate(source, request.business_id, start, end, granularity)
}

/// Buckets all of a business's sales completed within `[period_start,
/// period_end]` (whole days, both inclusive) and totals each bucket.
///
/// The sale source is consulted exactly once; each sale is then placed by
/// binary search over the bucket starts. Totals accumulate in minor units,
/// so no amount of sales drifts the way repeated float addition would.
pub fn aggregate<S>(
    source: &S,
    business_id: RecordId,
    period_start: Date,
    period_end: Date,
    granularity: Granularity,
) -> Result<Vec<ReportPeriod>, ReportError>
where
    S: SaleSource + ?Sized,
{
    if period_start > period_end {
        return Err(ReportError::InvalidRange {
            start: period_start,
            end: period_end,
        });
    }

    info!(
        "sales report for business {} from {} to {} ({:?})",
        business_id, period_start, period_end, granularity
    );

    let mut periods = build_periods(period_start, period_end, granularity)?;
    let sales = source.sales_within(business_id, period_start, period_end)?;

    for sale in &sales {
        let day = sale.sold.date();
        let slot = periods.partition_point(|period| period.start <= day);
        let Some(period) = slot.checked_sub(1).and_then(|index| periods.get_mut(index)) else {
            debug!("sale on {} precedes the report range, skipped", day);
            continue;
        };
        if day >= period.end {
            debug!("sale on {} follows the report range, skipped", day);
            continue;
        }
        period.count += 1;
        period.total = period.total.saturating_add(sale.price);
    }

    Ok(periods)
}

fn parse_report_date(value: &str) -> Result<Date, ReportError> {
    value
        .parse()
        .map_err(|_| ReportError::MalformedDate(value.to_string()))
}

/// Generates the empty buckets tiling `[start, end]`. The exclusive outer
/// boundary is the day after `end`, so a sale on the end date still lands
/// in the last bucket.
fn build_periods(
    start: Date,
    end: Date,
    granularity: Granularity,
) -> Result<Vec<ReportPeriod>, ReportError> {
    let limit = end
        .tomorrow()
        .map_err(|_| ReportError::RangeOutOfBounds(end))?;

    let mut periods = Vec::new();
    let mut cursor = start;
    while cursor < limit {
        let bucket_end = bucket_end(cursor, granularity, limit);
        periods.push(ReportPeriod {
            start: cursor,
            end: bucket_end,
            count: 0,
            total: Money::ZERO,
        });
        cursor = bucket_end;
    }
    Ok(periods)
}

/// The natural end of the bucket beginning at `cursor`, clipped to `limit`.
fn bucket_end(cursor: Date, granularity: Granularity, limit: Date) -> Date {
    let natural = match granularity {
        Granularity::All => None,
        Granularity::Day => cursor.tomorrow().ok(),
        Granularity::Week => shift_days(cursor, 7),
        Granularity::Month => first_of_next_month(cursor),
        Granularity::Year => first_of_next_year(cursor),
    };
    match natural {
        Some(date) if date < limit => date,
        _ => limit,
    }
}

fn shift_days(date: Date, days: u8) -> Option<Date> {
    let mut current = date;
    for _ in 0..days {
        current = current.tomorrow().ok()?;
    }
    Some(current)
}

fn first_of_next_month(date: Date) -> Option<Date> {
    let (year, month) = if date.month() == 12 {
        (date.year().checked_add(1)?, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    Date::new(year, month, 1).ok()
}

fn first_of_next_year(date: Date) -> Option<Date> {
    Date::new(date.year().checked_add(1)?, 1, 1).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use record_store::{MemorySaleSource, SaleRecord};

    fn sale(day: Date, cents: i64) -> SaleRecord {
        SaleRecord {
            business_id: 1,
            listing_id: 1,
            product_name: "Sourdough".into(),
            quantity: 1,
            price: Money::from_minor_units(cents),
            sold: day.at(14, 15, 0, 0),
        }
    }

    #[test]
    fn all_granularity_is_a_single_bucket() {
        let periods =
            build_periods(date(2021, 6, 1), date(2021, 8, 31), Granularity::All).unwrap();
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].start, date(2021, 6, 1));
        assert_eq!(periods[0].end, date(2021, 9, 1));
    }

    #[test]
    fn day_buckets_tile_the_range() {
        let periods = build_periods(date(2021, 6, 1), date(2021, 6, 3), Granularity::Day).unwrap();
        let bounds: Vec<(Date, Date)> = periods.iter().map(|p| (p.start, p.end)).collect();
        assert_eq!(
            bounds,
            vec![
                (date(2021, 6, 1), date(2021, 6, 2)),
                (date(2021, 6, 2), date(2021, 6, 3)),
                (date(2021, 6, 3), date(2021, 6, 4)),
            ]
        );
    }

    #[test]
    fn week_buckets_align_to_the_period_start() {
        // June 1 2021 was a Tuesday; weeks run Tuesday..Tuesday regardless.
        let periods =
            build_periods(date(2021, 6, 1), date(2021, 6, 20), Granularity::Week).unwrap();
        let bounds: Vec<(Date, Date)> = periods.iter().map(|p| (p.start, p.end)).collect();
        assert_eq!(
            bounds,
            vec![
                (date(2021, 6, 1), date(2021, 6, 8)),
                (date(2021, 6, 8), date(2021, 6, 15)),
                (date(2021, 6, 15), date(2021, 6, 21)),
            ]
        );
    }

    #[test]
    fn month_buckets_clip_to_the_requested_range() {
        let periods =
            build_periods(date(2021, 6, 15), date(2021, 8, 10), Granularity::Month).unwrap();
        let bounds: Vec<(Date, Date)> = periods.iter().map(|p| (p.start, p.end)).collect();
        assert_eq!(
            bounds,
            vec![
                (date(2021, 6, 15), date(2021, 7, 1)),
                (date(2021, 7, 1), date(2021, 8, 1)),
                (date(2021, 8, 1), date(2021, 8, 11)),
            ]
        );
    }

    #[test]
    fn year_buckets_cross_december() {
        let periods =
            build_periods(date(2020, 11, 2), date(2022, 2, 1), Granularity::Year).unwrap();
        let bounds: Vec<(Date, Date)> = periods.iter().map(|p| (p.start, p.end)).collect();
        assert_eq!(
            bounds,
            vec![
                (date(2020, 11, 2), date(2021, 1, 1)),
                (date(2021, 1, 1), date(2022, 1, 1)),
                (date(2022, 1, 1), date(2022, 2, 2)),
            ]
        );
    }

    #[test]
    fn buckets_never_overlap_or_gap() {
        for granularity in [
            Granularity::Day,
            Granularity::Week,
            Granularity::Month,
            Granularity::Year,
        ] {
            let periods =
                build_periods(date(2021, 1, 15), date(2021, 12, 20), granularity).unwrap();
            assert_eq!(periods.first().unwrap().start, date(2021, 1, 15));
            assert_eq!(periods.last().unwrap().end, date(2021, 12, 21));
            for pair in periods.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
                assert!(pair[0].start < pair[0].end);
            }
        }
    }

    #[test]
    fn monthly_report_includes_the_empty_july() {
        let source = MemorySaleSource::new(vec![
            sale(date(2021, 6, 10), 1000),
            sale(date(2021, 6, 20), 2050),
            sale(date(2021, 8, 5), 500),
        ]);
        let periods = aggregate(
            &source,
            1,
            date(2021, 6, 1),
            date(2021, 8, 31),
            Granularity::Month,
        )
        .unwrap();

        assert_eq!(periods.len(), 3);
        assert_eq!(periods[0].count, 2);
        assert_eq!(periods[0].total, Money::from_minor_units(3050));
        assert_eq!(periods[1].count, 0);
        assert_eq!(periods[1].total, Money::ZERO);
        assert_eq!(periods[2].count, 1);
        assert_eq!(periods[2].total, Money::from_minor_units(500));
    }

    #[test]
    fn counts_sum_to_sales_in_range() {
        let days = [
            date(2021, 6, 1),
            date(2021, 6, 7),
            date(2021, 6, 8),
            date(2021, 6, 30),
            date(2021, 7, 4),
        ];
        let source = MemorySaleSource::new(days.iter().map(|&d| sale(d, 100)).collect());
        let periods = aggregate(
            &source,
            1,
            date(2021, 6, 1),
            date(2021, 7, 31),
            Granularity::Week,
        )
        .unwrap();
        let counted: u64 = periods.iter().map(|p| p.count).sum();
        assert_eq!(counted, days.len() as u64);
    }

    #[test]
    fn sale_on_the_period_end_lands_in_the_last_bucket() {
        let source = MemorySaleSource::new(vec![sale(date(2021, 6, 30), 100)]);
        let periods = aggregate(
            &source,
            1,
            date(2021, 6, 1),
            date(2021, 6, 30),
            Granularity::Day,
        )
        .unwrap();
        assert_eq!(periods.last().unwrap().count, 1);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let source = MemorySaleSource::default();
        let error = aggregate(
            &source,
            1,
            date(2021, 7, 1),
            date(2021, 6, 1),
            Granularity::Day,
        )
        .unwrap_err();
        assert!(matches!(error, ReportError::InvalidRange { .. }));
    }

    #[test]
    fn single_day_range_is_valid() {
        let source = MemorySaleSource::new(vec![sale(date(2021, 6, 1), 100)]);
        let periods = aggregate(
            &source,
            1,
            date(2021, 6, 1),
            date(2021, 6, 1),
            Granularity::Month,
        )
        .unwrap();
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].start, date(2021, 6, 1));
        assert_eq!(periods[0].end, date(2021, 6, 2));
        assert_eq!(periods[0].count, 1);
    }

    #[test]
    fn wire_request_parsing_and_vocabulary() {
        let source = MemorySaleSource::default();
        let request = ReportRequest {
            business_id: 1,
            period_start: "2021-06-01".into(),
            period_end: "2021-08-31".into(),
            granularity: "monthly".into(),
        };
        assert_eq!(sales_report(&source, &request).unwrap().len(), 3);

        let bad_date = ReportRequest {
            period_start: "01/06/2021".into(),
            ..request.clone()
        };
        assert!(matches!(
            sales_report(&source, &bad_date).unwrap_err(),
            ReportError::MalformedDate(_)
        ));

        let bad_granularity = ReportRequest {
            granularity: "fortnightly".into(),
            ..request
        };
        assert!(matches!(
            sales_report(&source, &bad_granularity).unwrap_err(),
            ReportError::InvalidGranularity(_)
        ));
    }

    #[test]
    fn store_failure_aborts_the_report() {
        struct Broken;
        impl SaleSource for Broken {
            fn sales_within(
                &self,
                _business_id: RecordId,
                _start: Date,
                _end: Date,
            ) -> Result<Vec<SaleRecord>, StoreError> {
                Err(StoreError::unavailable("history table offline"))
            }
        }

        let error = aggregate(
            &Broken,
            1,
            date(2021, 6, 1),
            date(2021, 6, 30),
            Granularity::Day,
        )
        .unwrap_err();
        assert!(matches!(error, ReportError::Store(_)));
    }
}

//! Grouped counts, sums and time series for dashboard cards and charts.
//!
//! Every input row lands in exactly one bucket: missing or blank labels are
//! grouped under [`UNKNOWN_LABEL`]. Buckets are ordered by descending value
//! with a stable sort, so ties keep the order in which labels were first
//! seen.
//!
//! The dashboard feeds `GROUP BY` rows through [`merge_counts`],
//! [`merge_sums`] and the series builders. [`group_count`] and
//! [`group_sum`] apply the same policy to a collection already held in
//! memory, such as the rows of the current page.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

/// Label for rows whose grouping field is missing.
pub const UNKNOWN_LABEL: &str = "ไม่ระบุ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SumBucket {
    pub label: String,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PercentBucket {
    pub label: String,
    pub count: u64,
    pub percent: u32,
}

fn label_or_unknown(label: Option<&str>) -> String {
    match label.map(str::trim) {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => UNKNOWN_LABEL.to_string(),
    }
}

/// Accumulates values per label while remembering first-seen order.
struct Tally<V> {
    order: Vec<String>,
    values: HashMap<String, V>,
}

impl<V: Copy + Default + std::ops::AddAssign> Tally<V> {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            values: HashMap::new(),
        }
    }

    fn add(&mut self, label: String, value: V) {
        match self.values.get_mut(&label) {
            Some(total) => *total += value,
            None => {
                self.values.insert(label.clone(), value);
                self.order.push(label);
            }
        }
    }

    fn into_sorted<K: Ord + Copy>(self, key: impl Fn(V) -> K) -> Vec<(String, V)> {
        let Self { order, mut values } = self;
        let mut pairs: Vec<(String, V)> = order
            .into_iter()
            .map(|label| {
                let value = values.remove(&label).unwrap_or_default();
                (label, value)
            })
            .collect();
        pairs.sort_by(|a, b| key(b.1).cmp(&key(a.1)));
        pairs
    }
}

/// Counts records per label extracted by `key`.
pub fn group_count<R, F>(records: &[R], key: F) -> Vec<Bucket>
where
    F: Fn(&R) -> Option<String>,
{
    merge_counts(records.iter().map(|record| (key(record), 1)))
}

/// Sums `value` per label extracted by `key`.
pub fn group_sum<R, K, V>(records: &[R], key: K, value: V) -> Vec<SumBucket>
where
    K: Fn(&R) -> Option<String>,
    V: Fn(&R) -> i64,
{
    merge_sums(records.iter().map(|record| (key(record), value(record))))
}

/// Folds `(label, count)` rows, e.g. from a `GROUP BY`, into buckets.
/// NULL and blank labels merge into one [`UNKNOWN_LABEL`] bucket.
pub fn merge_counts<I>(rows: I) -> Vec<Bucket>
where
    I: IntoIterator<Item = (Option<String>, u64)>,
{
    let mut tally = Tally::new();
    for (label, count) in rows {
        tally.add(label_or_unknown(label.as_deref()), count);
    }
    tally
        .into_sorted(|count| count)
        .into_iter()
        .map(|(label, count)| Bucket { label, count })
        .collect()
}

/// Folds `(label, sum)` rows into buckets with the same policy as [`merge_counts`].
pub fn merge_sums<I>(rows: I) -> Vec<SumBucket>
where
    I: IntoIterator<Item = (Option<String>, i64)>,
{
    let mut tally = Tally::new();
    for (label, total) in rows {
        tally.add(label_or_unknown(label.as_deref()), total);
    }
    tally
        .into_sorted(|total| total)
        .into_iter()
        .map(|(label, total)| SumBucket { label, total })
        .collect()
}

/// Replaces raw keys (ids, codes) with display labels before merging.
/// Keys without a label count as unknown.
pub fn relabel<K, I>(rows: I, labels: &HashMap<K, String>) -> Vec<(Option<String>, u64)>
where
    K: Eq + Hash,
    I: IntoIterator<Item = (Option<K>, u64)>,
{
    rows.into_iter()
        .map(|(key, count)| (key.and_then(|key| labels.get(&key).cloned()), count))
        .collect()
}

/// Keeps the `n` largest buckets.
pub fn top_n<T>(mut buckets: Vec<T>, n: usize) -> Vec<T> {
    buckets.truncate(n);
    buckets
}

/// `round(count / total * 100)`, or 0 when `total` is 0.
pub fn percent(count: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as u32
}

pub fn percentages(buckets: &[Bucket], total: u64) -> Vec<PercentBucket> {
    buckets
        .iter()
        .map(|bucket| PercentBucket {
            label: bucket.label.clone(),
            count: bucket.count,
            percent: percent(bucket.count, total),
        })
        .collect()
}

/// Calendar granularity of a time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day,
    Month,
    Year,
}

impl Period {
    /// `strftime` pattern of the bucket label. SQLite and chrono render it
    /// identically.
    pub const fn pattern(self) -> &'static str {
        match self {
            Period::Day => "%Y-%m-%d",
            Period::Month => "%Y-%m",
            Period::Year => "%Y",
        }
    }

    pub fn label(self, day: NaiveDate) -> String {
        day.format(self.pattern()).to_string()
    }
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

/// Counts per calendar month for `months` months starting at the month of
/// `first_month`. Months without rows are present with count 0.
pub fn monthly_series<I>(rows: I, first_month: NaiveDate, months: u32) -> Vec<Bucket>
where
    I: IntoIterator<Item = (String, u64)>,
{
    let start = first_of_month(first_month);
    let keys = (0..months).filter_map(|offset| start.checked_add_months(Months::new(offset)));

    fill_series(Period::Month, keys, rows)
}

/// Counts per day for the `days` days ending with `last_day`, oldest first.
pub fn daily_series<I>(rows: I, last_day: NaiveDate, days: u32) -> Vec<Bucket>
where
    I: IntoIterator<Item = (String, u64)>,
{
    let first_day = last_day
        .checked_sub_days(Days::new(u64::from(days.saturating_sub(1))))
        .unwrap_or(last_day);
    let keys = first_day.iter_days().take(days as usize);

    fill_series(Period::Day, keys, rows)
}

/// Counts per calendar year for `years` years starting at `first_year`.
pub fn yearly_series<I>(rows: I, first_year: i32, years: u32) -> Vec<Bucket>
where
    I: IntoIterator<Item = (String, u64)>,
{
    let keys =
        (0..years as i32).filter_map(|offset| NaiveDate::from_ymd_opt(first_year + offset, 1, 1));

    fill_series(Period::Year, keys, rows)
}

/// Pre-generates the label of every key with a zero count, then adds the
/// `(label, count)` rows in one pass. Labels outside the key set are
/// ignored.
fn fill_series<K, I>(period: Period, keys: K, rows: I) -> Vec<Bucket>
where
    K: IntoIterator<Item = NaiveDate>,
    I: IntoIterator<Item = (String, u64)>,
{
    let mut series: Vec<Bucket> = keys
        .into_iter()
        .map(|key| Bucket {
            label: period.label(key),
            count: 0,
        })
        .collect();
    let index: HashMap<String, usize> = series
        .iter()
        .enumerate()
        .map(|(position, bucket)| (bucket.label.clone(), position))
        .collect();

    for (label, count) in rows {
        if let Some(position) = index.get(&label) {
            series[*position].count += count;
        }
    }

    series
}

/// How many of an organization's photo slots are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageTier {
    Complete,
    Partial,
    Missing,
}

impl ImageTier {
    pub const ALL: [ImageTier; 3] = [ImageTier::Complete, ImageTier::Partial, ImageTier::Missing];

    pub fn from_count(count: usize) -> Self {
        match count {
            0 => ImageTier::Missing,
            n if n >= crate::domain::organization::MAX_IMAGES => ImageTier::Complete,
            _ => ImageTier::Partial,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ImageTier::Complete => "รูปครบ",
            ImageTier::Partial => "รูปไม่ครบ",
            ImageTier::Missing => "ไม่มีรูป",
        }
    }
}

/// Image-completeness distribution from `(attached images, organizations)`
/// rows. All three tiers are always present, in a fixed order.
pub fn image_completeness(tallies: &[(usize, u64)]) -> Vec<PercentBucket> {
    let total = tallies.iter().map(|(_, count)| count).sum();
    ImageTier::ALL
        .iter()
        .map(|tier| {
            let count = tallies
                .iter()
                .filter(|(images, _)| ImageTier::from_count(*images) == *tier)
                .map(|(_, count)| count)
                .sum();
            PercentBucket {
                label: tier.label().to_string(),
                count,
                percent: percent(count, total),
            }
        })
        .collect()
}

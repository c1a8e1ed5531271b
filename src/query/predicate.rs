//! Filter predicates shared by the SQL repository and in-memory callers.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

use crate::query::criteria::FilterCriteria;

/// Abstract view of a list row as seen by the filter pipeline.
pub trait Filterable {
    /// Text fields searched by the free-text term, OR-ed together.
    fn search_fields(&self) -> Vec<&str>;
    fn province(&self) -> Option<&str>;
    fn category_id(&self) -> Option<i32>;
    /// Entity-specific "type" dimension.
    fn kind(&self) -> String;
    /// The numeric field range filters apply to.
    fn amount(&self) -> i32;
    fn created_at(&self) -> NaiveDateTime;
}

/// Half-open timestamp interval `[start, end)`. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        match (start, end) {
            (Some(s), Some(e)) if s > e => Self {
                start: Some(e),
                end: Some(s),
            },
            _ => Self { start, end },
        }
    }

    /// Converts inclusive calendar days into `[from 00:00, to + 1 day 00:00)`.
    pub fn from_days(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        let (from, to) = match (from, to) {
            (Some(f), Some(t)) if f > t => (Some(t), Some(f)),
            other => other,
        };

        Self {
            start: from.map(start_of_day),
            end: to.map(|day| start_of_day(day.checked_add_days(Days::new(1)).unwrap_or(day))),
        }
    }

    pub fn is_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.start.is_none_or(|start| ts >= start) && self.end.is_none_or(|end| ts < end)
    }
}

pub(crate) fn start_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}

/// Inclusive numeric interval. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumericRange {
    pub min: Option<i32>,
    pub max: Option<i32>,
}

impl NumericRange {
    pub fn new(min: Option<i32>, max: Option<i32>) -> Self {
        match (min, max) {
            (Some(lo), Some(hi)) if lo > hi => Self {
                min: Some(hi),
                max: Some(lo),
            },
            _ => Self { min, max },
        }
    }

    pub fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, value: i32) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// Normalized filter: every empty field means "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    /// Trimmed, non-empty search term.
    pub search: Option<String>,
    pub provinces: Vec<String>,
    pub category_ids: Vec<i32>,
    pub kinds: Vec<String>,
    pub created: DateRange,
    pub amount: NumericRange,
}

impl Predicate {
    pub fn from_criteria(criteria: &FilterCriteria) -> Self {
        Self {
            search: criteria
                .search
                .as_deref()
                .map(str::trim)
                .filter(|term| !term.is_empty())
                .map(str::to_string),
            provinces: clean_labels(&criteria.provinces),
            category_ids: {
                let mut ids: Vec<i32> = criteria
                    .category_ids
                    .iter()
                    .copied()
                    .filter(|id| *id > 0)
                    .collect();
                ids.sort_unstable();
                ids.dedup();
                ids
            },
            kinds: clean_labels(&criteria.kinds),
            created: DateRange::from_days(criteria.date_from, criteria.date_to),
            amount: NumericRange::new(criteria.min, criteria.max),
        }
    }

    pub fn is_open(&self) -> bool {
        self.search.is_none()
            && self.provinces.is_empty()
            && self.category_ids.is_empty()
            && self.kinds.is_empty()
            && self.created.is_open()
            && self.amount.is_open()
    }

    /// Lower-cased needles for the search term. A locally written phone
    /// number adds its national digits so it matches the stored E.164 form.
    pub fn search_needles(&self) -> Vec<String> {
        let Some(term) = &self.search else {
            return Vec::new();
        };
        let mut needles = vec![term.to_lowercase()];
        if let Some(digits) = national_phone_digits(term) {
            needles.push(digits);
        }
        needles
    }

    /// Evaluates the predicate against an in-memory record.
    pub fn matches<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        let needles = self.search_needles();
        if !needles.is_empty() {
            let fields: Vec<String> = record
                .search_fields()
                .iter()
                .map(|field| field.to_lowercase())
                .collect();
            if !fields
                .iter()
                .any(|field| needles.iter().any(|needle| field.contains(needle.as_str())))
            {
                return false;
            }
        }

        if !self.provinces.is_empty()
            && !record
                .province()
                .is_some_and(|p| self.provinces.iter().any(|wanted| wanted == p))
        {
            return false;
        }

        if !self.category_ids.is_empty()
            && !record
                .category_id()
                .is_some_and(|id| self.category_ids.contains(&id))
        {
            return false;
        }

        if !self.kinds.is_empty() && !self.kinds.contains(&record.kind()) {
            return false;
        }

        self.created.contains(record.created_at()) && self.amount.contains(record.amount())
    }
}

/// Trims, drops blanks and de-duplicates while keeping first-seen order.
fn clean_labels(values: &[String]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(values.len());
    for value in values.iter().map(|v| v.trim()).filter(|v| !v.is_empty()) {
        if !cleaned.iter().any(|seen| seen == value) {
            cleaned.push(value.to_string());
        }
    }
    cleaned
}

/// `081-234 5678` → `812345678`. Only terms made of digits and common
/// separators with a leading trunk `0` qualify.
pub fn national_phone_digits(term: &str) -> Option<String> {
    let compact: String = term
        .chars()
        .filter(|ch| !matches!(ch, ' ' | '-' | '.' | '(' | ')'))
        .collect();
    let digits = compact.strip_prefix('0')?;
    if digits.is_empty() || !digits.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    Some(digits.to_string())
}

/// Builds a `LIKE` pattern for a substring match, escaping wildcards with `\`.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    struct Row {
        name: String,
        phone: String,
        province: Option<String>,
        category_id: Option<i32>,
        kind: String,
        amount: i32,
        created_at: NaiveDateTime,
    }

    impl Filterable for Row {
        fn search_fields(&self) -> Vec<&str> {
            vec![self.name.as_str(), self.phone.as_str()]
        }

        fn province(&self) -> Option<&str> {
            self.province.as_deref()
        }

        fn category_id(&self) -> Option<i32> {
            self.category_id
        }

        fn kind(&self) -> String {
            self.kind.clone()
        }

        fn amount(&self) -> i32 {
            self.amount
        }

        fn created_at(&self) -> NaiveDateTime {
            self.created_at
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(name: &str, phone: &str) -> Row {
        Row {
            name: name.to_string(),
            phone: phone.to_string(),
            province: Some("ลำปาง".to_string()),
            category_id: Some(2),
            kind: "FullLent".to_string(),
            amount: 30,
            created_at: start_of_day(day(2025, 7, 10)),
        }
    }

    fn arb_row() -> impl Strategy<Value = Row> {
        (
            "[a-zA-Zก-ฮ ]{0,12}",
            "[0-9+]{0,12}",
            proptest::option::of("[ก-ฮ]{1,6}"),
            proptest::option::of(1i32..10),
            "[A-Za-z]{1,8}",
            -5i32..200,
            0i64..4_000_000_000,
        )
            .prop_map(
                |(name, phone, province, category_id, kind, amount, secs)| Row {
                    name,
                    phone,
                    province,
                    category_id,
                    kind,
                    amount,
                    created_at: chrono::DateTime::from_timestamp(secs, 0)
                        .unwrap()
                        .naive_utc(),
                },
            )
    }

    #[test]
    fn blank_criteria_are_open() {
        let criteria = FilterCriteria {
            search: Some("   ".to_string()),
            provinces: vec![" ".to_string()],
            kinds: vec![String::new()],
            ..FilterCriteria::default()
        };
        assert!(Predicate::from_criteria(&criteria).is_open());
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let predicate = Predicate::from_criteria(&FilterCriteria {
            search: Some("SOMCHAI".to_string()),
            ..FilterCriteria::default()
        });
        assert!(predicate.matches(&row("somchai jaidee", "0811111111")));
        assert!(!predicate.matches(&row("malee", "0811111111")));

        let by_phone = Predicate::from_criteria(&FilterCriteria {
            search: Some("1111".to_string()),
            ..FilterCriteria::default()
        });
        assert!(by_phone.matches(&row("malee", "0811111111")));
    }

    #[test]
    fn search_folds_non_ascii_case() {
        let predicate = Predicate::from_criteria(&FilterCriteria {
            search: Some("émile".to_string()),
            ..FilterCriteria::default()
        });
        assert!(predicate.matches(&row("Émile Dupont", "0811111111")));
    }

    #[test]
    fn local_phone_format_matches_stored_e164() {
        let predicate = Predicate::from_criteria(&FilterCriteria {
            search: Some("081-234 5678".to_string()),
            ..FilterCriteria::default()
        });
        assert!(predicate.matches(&row("malee", "+66812345678")));
        assert!(!predicate.matches(&row("malee", "+66899999999")));
    }

    #[test]
    fn national_digits_need_a_trunk_prefix() {
        assert_eq!(national_phone_digits("0812345678").as_deref(), Some("812345678"));
        assert_eq!(national_phone_digits("(081) 234.5678").as_deref(), Some("812345678"));
        assert_eq!(national_phone_digits("812345678"), None);
        assert_eq!(national_phone_digits("0"), None);
        assert_eq!(national_phone_digits("0สมชาย"), None);
    }

    #[test]
    fn categorical_filters_are_and_across_dimensions() {
        let r = row("a", "1");
        let both = Predicate::from_criteria(&FilterCriteria {
            provinces: vec!["ลำปาง".to_string()],
            category_ids: vec![2],
            ..FilterCriteria::default()
        });
        assert!(both.matches(&r));

        let wrong_category = Predicate::from_criteria(&FilterCriteria {
            provinces: vec!["ลำปาง".to_string()],
            category_ids: vec![3],
            ..FilterCriteria::default()
        });
        assert!(!wrong_category.matches(&r));

        let either_province = Predicate::from_criteria(&FilterCriteria {
            provinces: vec!["น่าน".to_string(), "ลำปาง".to_string()],
            ..FilterCriteria::default()
        });
        assert!(either_province.matches(&r));
    }

    #[test]
    fn province_filter_excludes_missing_province() {
        let mut r = row("a", "1");
        r.province = None;
        let predicate = Predicate::from_criteria(&FilterCriteria {
            provinces: vec!["ลำปาง".to_string()],
            ..FilterCriteria::default()
        });
        assert!(!predicate.matches(&r));
    }

    #[test]
    fn date_range_is_half_open_over_whole_days() {
        let range = DateRange::from_days(Some(day(2025, 7, 1)), Some(day(2025, 7, 31)));
        assert_eq!(range.start, Some(start_of_day(day(2025, 7, 1))));
        assert_eq!(range.end, Some(start_of_day(day(2025, 8, 1))));
        assert!(range.contains(day(2025, 7, 31).and_hms_opt(23, 59, 59).unwrap()));
        assert!(!range.contains(start_of_day(day(2025, 8, 1))));
        assert!(range.contains(start_of_day(day(2025, 7, 1))));
    }

    #[test]
    fn reversed_ranges_are_swapped() {
        let range = DateRange::from_days(Some(day(2025, 8, 1)), Some(day(2025, 7, 1)));
        assert_eq!(range.start, Some(start_of_day(day(2025, 7, 1))));
        assert_eq!(range.end, Some(start_of_day(day(2025, 8, 2))));

        let numbers = NumericRange::new(Some(60), Some(18));
        assert_eq!(numbers, NumericRange::new(Some(18), Some(60)));
        assert!(numbers.contains(18));
        assert!(numbers.contains(60));
        assert!(!numbers.contains(61));
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
        assert_eq!(like_pattern("สมชาย"), "%สมชาย%");
    }

    proptest! {
        #[test]
        fn empty_criteria_match_everything(rows in prop::collection::vec(arb_row(), 0..30)) {
            let predicate = Predicate::from_criteria(&FilterCriteria::default());
            prop_assert!(rows.iter().all(|r| predicate.matches(r)));
        }

        #[test]
        fn any_matching_field_satisfies_search(r in arb_row(), pick_phone in any::<bool>(), start in 0usize..4) {
            let field = if pick_phone { &r.phone } else { &r.name };
            let chars: Vec<char> = field.chars().collect();
            prop_assume!(!chars.is_empty());
            let start = start.min(chars.len() - 1);
            let term: String = chars[start..].iter().collect();
            prop_assume!(!term.trim().is_empty());

            let predicate = Predicate::from_criteria(&FilterCriteria {
                search: Some(term),
                ..FilterCriteria::default()
            });
            prop_assert!(predicate.matches(&r));
        }
    }
}

use anyhow::anyhow;
use chrono::{Datelike, Duration, Months, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const MARKING_FORMAT: &str = "%Y-%m-%d";

/// A timezone-normalized calendar day (UTC midnight). Arithmetic never
/// mutates; every operation returns a new value. Equality and ordering
/// are at day granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn from_iso(raw: &str) -> Option<Self> {
        // Accept plain dates as well as ISO datetimes; the time-of-day
        // part is discarded.
        if let Ok(date) = NaiveDate::parse_from_str(raw, MARKING_FORMAT) {
            return Some(Self(date));
        }
        raw.get(..10)
            .and_then(|head| NaiveDate::parse_from_str(head, MARKING_FORMAT).ok())
            .map(Self)
    }

    pub fn from_millis(millis: i64) -> Option<Self> {
        chrono::DateTime::from_timestamp_millis(millis).map(|dt| Self(dt.date_naive()))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Weekday index with Sunday = 0 .. Saturday = 6, the numbering the
    /// grid and week math are defined in.
    pub fn weekday_index(&self) -> u32 {
        self.0.weekday().num_days_from_sunday()
    }

    pub fn add_days(&self, days: i64) -> Self {
        self.0
            .checked_add_signed(Duration::days(days))
            .map(Self)
            .unwrap_or(*self)
    }

    pub fn add_weeks(&self, weeks: i64) -> Self {
        self.add_days(weeks * 7)
    }

    /// Month arithmetic clamps the day-of-month: Jan 31 + 1 month is
    /// Feb 28 (or 29).
    pub fn add_months(&self, count: i32) -> Self {
        let shifted = if count >= 0 {
            self.0.checked_add_months(Months::new(count as u32))
        } else {
            self.0.checked_sub_months(Months::new(count.unsigned_abs()))
        };
        shifted.map(Self).unwrap_or(*self)
    }

    pub fn start_of_month(&self) -> Self {
        self.0.with_day(1).map(Self).unwrap_or(*self)
    }

    pub fn end_of_month(&self) -> Self {
        self.start_of_month().add_months(1).add_days(-1)
    }

    pub fn days_in_month(&self) -> u32 {
        self.end_of_month().day()
    }

    /// Milliseconds since the epoch at UTC midnight of this day.
    pub fn timestamp_millis(&self) -> i64 {
        self.0
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis())
            .unwrap_or_default()
    }

    /// Canonical `yyyy-MM-dd` string; the identity used for anchors
    /// and marking keys.
    pub fn to_marking(&self) -> String {
        self.0.format(MARKING_FORMAT).to_string()
    }

    pub fn today_utc() -> Self {
        Self(chrono::Utc::now().date_naive())
    }

    pub fn inner(&self) -> NaiveDate {
        self.0
    }
}

impl std::fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(MARKING_FORMAT))
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// Outbound notification payload; field names match the wire shape
/// consumers already parse (`dateString` stays camelCase).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayInfo {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub timestamp: i64,
    #[serde(rename = "dateString")]
    pub date_string: String,
}

impl DayInfo {
    pub fn from_date(date: CalendarDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            timestamp: date.timestamp_millis(),
            date_string: date.to_marking(),
        }
    }
}

/// The input shapes the normalizer recognizes. Anything else is not
/// representable, so "unrecognized" collapses to invalid content
/// inside a shape (bad ISO text, out-of-range fields, ...).
#[derive(Debug, Clone)]
pub enum DateInput {
    Millis(i64),
    Date(NaiveDate),
    Ymd { year: i32, month: u32, day: u32 },
    Info(DayInfo),
    Iso(String),
}

impl From<i64> for DateInput {
    fn from(millis: i64) -> Self {
        Self::Millis(millis)
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<CalendarDate> for DateInput {
    fn from(date: CalendarDate) -> Self {
        Self::Date(date.inner())
    }
}

impl From<DayInfo> for DateInput {
    fn from(info: DayInfo) -> Self {
        Self::Info(info)
    }
}

impl From<&str> for DateInput {
    fn from(raw: &str) -> Self {
        Self::Iso(raw.to_string())
    }
}

impl From<String> for DateInput {
    fn from(raw: String) -> Self {
        Self::Iso(raw)
    }
}

/// Normalizes any recognized shape to a calendar day. `None` means the
/// input did not resolve; downstream scroll and grid operations must
/// short-circuit on it rather than guess.
pub fn parse_date(input: &DateInput) -> Option<CalendarDate> {
    match input {
        DateInput::Millis(millis) => CalendarDate::from_millis(*millis),
        DateInput::Date(date) => Some(CalendarDate::from(*date)),
        DateInput::Ymd { year, month, day } => CalendarDate::from_ymd(*year, *month, *day),
        // A timestamp-carrying payload wins over its broken-out fields.
        DateInput::Info(info) => CalendarDate::from_millis(info.timestamp),
        DateInput::Iso(raw) => CalendarDate::from_iso(raw),
    }
}

/// Shapes accepted by the locale string normalizer.
#[derive(Debug, Clone)]
pub enum LooseDate {
    Date(NaiveDate),
    Millis(i64),
    Text(String),
}

/// Normalizes loosely formatted input to the marking string. Unlike
/// [`parse_date`], an unrecognized string here is a hard error: this
/// is the user-facing fatal path for malformed date text.
pub fn calendar_date_string(input: &LooseDate) -> anyhow::Result<String> {
    match input {
        LooseDate::Date(date) => Ok(CalendarDate::from(*date).to_marking()),
        LooseDate::Millis(millis) => CalendarDate::from_millis(*millis)
            .map(|d| d.to_marking())
            .ok_or_else(|| anyhow!("timestamp out of range: {millis}")),
        LooseDate::Text(raw) => parse_loose_text(raw),
    }
}

fn parse_loose_text(raw: &str) -> anyhow::Result<String> {
    if let Some(date) = CalendarDate::from_iso(raw) {
        return Ok(date.to_marking());
    }

    let slashed = Regex::new(r"^\d{4}/\d{2}/\d{2}")
        .map_err(|e| anyhow!("internal regex compile failure: {e}"))?;
    if slashed.is_match(raw) {
        if let Ok(date) = NaiveDate::parse_from_str(&raw[..10], "%Y/%m/%d") {
            return Ok(CalendarDate::from(date).to_marking());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%d %b %Y") {
        return Ok(CalendarDate::from(date).to_marking());
    }

    Err(anyhow!("invalid date: {raw}"))
}

/// Fractional month distance from `from` to `to`: whole calendar
/// months plus the remainder as a fraction of the month it falls in.
/// Negative when `to` precedes `from`. Callers round before using it
/// as a page delta.
pub fn month_span(from: CalendarDate, to: CalendarDate) -> f64 {
    if to < from {
        return -month_span(to, from);
    }

    let mut whole = 0i64;
    let mut cursor = from;
    loop {
        let next = cursor.add_months(1);
        if next > to {
            break;
        }
        cursor = next;
        whole += 1;
    }

    let month_len = (cursor.add_months(1).inner() - cursor.inner()).num_days();
    let remainder = (to.inner() - cursor.inner()).num_days();
    if month_len == 0 {
        return whole as f64;
    }
    whole as f64 + remainder as f64 / month_len as f64
}

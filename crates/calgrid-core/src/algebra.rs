use crate::date::CalendarDate;

/// Calendar-field equality on year and month. Absent operands compare
/// conservatively false.
pub fn same_month(a: Option<CalendarDate>, b: Option<CalendarDate>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.year() == b.year() && a.month() == b.month(),
        _ => false,
    }
}

/// Day-granularity equality. Absent operands compare conservatively
/// false.
pub fn same_date(a: Option<CalendarDate>, b: Option<CalendarDate>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// True when `b` falls inside the 7-day display week containing `a`,
/// aligned to `first_day` (0 = Sunday). Holds regardless of which of
/// the two is chronologically first.
pub fn same_week(a: Option<CalendarDate>, b: Option<CalendarDate>, first_day: u32) -> bool {
    let (Some(a), Some(b)) = (a, b) else {
        return false;
    };
    week_dates(a, first_day).contains(&b)
}

/// The 7 days of `date`'s display week, aligned to `first_day`.
pub fn week_dates(date: CalendarDate, first_day: u32) -> Vec<CalendarDate> {
    let mut offset = date.weekday_index() as i64 - (first_day % 7) as i64;
    if offset < 0 {
        offset += 7;
    }
    let start = date.add_days(-offset);
    (0..7).map(|i| start.add_days(i)).collect()
}

/// Non-strict day ordering: true when `a` is no more than a day past
/// `b`, so equal days satisfy both `is_lte` and `is_gte`. This is a
/// same-day tolerance, not a total order; sorting needs the strict
/// `Ord` on [`CalendarDate`] instead.
pub fn is_lte(a: CalendarDate, b: CalendarDate) -> bool {
    (a.inner() - b.inner()).num_days() < 1
}

pub fn is_gte(a: CalendarDate, b: CalendarDate) -> bool {
    (b.inner() - a.inner()).num_days() < 1
}

/// `today` is injected by the caller so the predicate stays
/// deterministic under test.
pub fn is_today(date: CalendarDate, today: CalendarDate) -> bool {
    date == today
}

/// False for today and anything after it.
pub fn is_past_date(date: CalendarDate, today: CalendarDate) -> bool {
    if is_today(date, today) {
        return false;
    }
    date < today
}

/// Marking string of `origin` shifted by `offset` days, rolling month
/// and year boundaries in either direction.
pub fn generate_day(origin: CalendarDate, offset: i64) -> String {
    origin.add_days(offset).to_marking()
}

/// The next `count` marking strings starting at `origin`; a partial
/// display week for layouts narrower than 7 days.
pub fn partial_week(origin: CalendarDate, count: usize) -> Vec<String> {
    (0..count as i64).map(|i| generate_day(origin, i)).collect()
}

/// True when `date` falls outside the optional `[min, max]` bounds,
/// with the same day-tolerance as [`is_lte`]/[`is_gte`].
pub fn not_in_range(
    date: CalendarDate,
    min: Option<CalendarDate>,
    max: Option<CalendarDate>,
) -> bool {
    if let Some(min) = min {
        if !is_gte(date, min) {
            return true;
        }
    }
    if let Some(max) = max {
        if !is_lte(date, max) {
            return true;
        }
    }
    false
}

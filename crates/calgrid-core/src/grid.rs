use crate::algebra::{is_gte, is_lte, same_date};
use crate::date::CalendarDate;

/// Every day of `date`'s calendar month, in order.
pub fn month_days(date: CalendarDate) -> Vec<CalendarDate> {
    from_to(date.start_of_month(), date.end_of_month())
}

fn from_to(a: CalendarDate, b: CalendarDate) -> Vec<CalendarDate> {
    let mut days = Vec::new();
    let mut cursor = a;
    while cursor <= b {
        days.push(cursor);
        cursor = cursor.add_days(1);
    }
    days
}

/// One grid page for `date`'s month: the month itself plus lead-in and
/// lead-out days padding both ends to full display weeks aligned to
/// `first_day`. With `six_weeks` the page always spans exactly 42 days
/// from the padded start, so a month grid keeps constant height
/// whether the month covers 4, 5 or 6 display weeks.
pub fn page(date: CalendarDate, first_day: u32, six_weeks: bool) -> Vec<CalendarDate> {
    let days = month_days(date);
    let fdow = first_day % 7;
    let ldow = (fdow + 6) % 7;

    let mut from = days[0];
    let start_index = from.weekday_index();
    if start_index != fdow {
        from = from.add_days(-(((start_index + 7 - fdow) % 7) as i64));
    }

    let mut to = days[days.len() - 1];
    let end_index = to.weekday_index();
    if end_index != ldow {
        to = to.add_days(((ldow + 7 - end_index) % 7) as i64);
    }

    // Six-week mode overrides whatever end padding was computed above.
    if six_weeks {
        to = from.add_weeks(6).add_days(-1);
    }

    let mut result = Vec::new();
    if is_lte(from, days[0]) {
        result.extend(from_to(from, days[0]));
    }
    result.extend_from_slice(&days[1..days.len() - 1]);
    if is_gte(to, days[days.len() - 1]) {
        result.extend(from_to(days[days.len() - 1], to));
    }
    result
}

/// 0-based display-week row of `date` inside `page_days`, used for the
/// intra-page scroll offset in vertical month lists.
pub fn week_row_of(page_days: &[CalendarDate], date: CalendarDate) -> Option<usize> {
    page_days
        .iter()
        .position(|day| same_date(Some(*day), Some(date)))
        .map(|index| index / 7)
}

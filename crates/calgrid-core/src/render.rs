use std::io::{self, IsTerminal, Write};

use unicode_width::UnicodeWidthStr;

use crate::algebra::{is_today, same_month, week_dates};
use crate::config::Config;
use crate::date::CalendarDate;
use crate::grid::page;
use crate::locale::{Locale, format_numbers, weekday_names};

/// Terminal renderer for month grids and week strips.
#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            color: cfg.color_enabled()?,
        })
    }

    #[tracing::instrument(skip(self, locale))]
    pub fn print_month_grid(
        &mut self,
        date: CalendarDate,
        today: CalendarDate,
        locale: &Locale,
        first_day: u32,
        six_weeks: bool,
    ) -> anyhow::Result<()> {
        let grid = self.month_grid(date, today, locale, first_day, six_weeks);
        let mut out = io::stdout().lock();
        write!(out, "{grid}")?;
        Ok(())
    }

    #[tracing::instrument(skip(self, locale))]
    pub fn print_week_strip(
        &mut self,
        date: CalendarDate,
        today: CalendarDate,
        locale: &Locale,
        first_day: u32,
    ) -> anyhow::Result<()> {
        let strip = self.week_strip(date, today, locale, first_day);
        let mut out = io::stdout().lock();
        write!(out, "{strip}")?;
        Ok(())
    }

    /// One month page, seven columns per row. Lead-in and lead-out
    /// days from adjacent months render dimmed, today inverted.
    pub fn month_grid(
        &self,
        date: CalendarDate,
        today: CalendarDate,
        locale: &Locale,
        first_day: u32,
        six_weeks: bool,
    ) -> String {
        let names = weekday_names(locale, first_day);
        let cell = cell_width(&names);
        let days = page(date, first_day, six_weeks);

        let mut out = String::new();
        out.push_str(&self.title_line(date, locale, cell));
        out.push_str(&names_line(&names, cell));

        for row in days.chunks(7) {
            for day in row {
                out.push_str(&self.day_cell(*day, date, today, locale, cell));
            }
            out.push('\n');
        }
        out
    }

    /// A single display week as one row with its weekday names above.
    pub fn week_strip(
        &self,
        date: CalendarDate,
        today: CalendarDate,
        locale: &Locale,
        first_day: u32,
    ) -> String {
        let names = weekday_names(locale, first_day);
        let cell = cell_width(&names);

        let mut out = names_line(&names, cell);
        for day in week_dates(date, first_day) {
            out.push_str(&self.day_cell(day, day, today, locale, cell));
        }
        out.push('\n');
        out
    }

    fn title_line(&self, date: CalendarDate, locale: &Locale, cell: usize) -> String {
        let month = locale.month_name(date.month()).unwrap_or("?");
        let title = format_numbers(locale, &format!("{month} {}", date.year()));
        let width = cell * 7 + 6;
        let pad = width.saturating_sub(UnicodeWidthStr::width(title.as_str())) / 2;
        format!("{}{}\n", " ".repeat(pad), self.paint(&title, "1"))
    }

    fn day_cell(
        &self,
        day: CalendarDate,
        month_of: CalendarDate,
        today: CalendarDate,
        locale: &Locale,
        cell: usize,
    ) -> String {
        let text = format_numbers(locale, &day.day().to_string());
        let pad = cell.saturating_sub(UnicodeWidthStr::width(text.as_str()));
        let padded = format!("{}{} ", " ".repeat(pad), text);

        if is_today(day, today) {
            self.paint(&padded, "7")
        } else if !same_month(Some(day), Some(month_of)) {
            self.paint(&padded, "90")
        } else {
            padded
        }
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn cell_width(names: &[String]) -> usize {
    names
        .iter()
        .map(|name| UnicodeWidthStr::width(name.as_str()))
        .max()
        .unwrap_or(3)
        .max(2)
}

fn names_line(names: &[String], cell: usize) -> String {
    let mut line = String::new();
    for name in names {
        let pad = cell.saturating_sub(UnicodeWidthStr::width(name.as_str()));
        line.push_str(&" ".repeat(pad));
        line.push_str(name);
        line.push(' ');
    }
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> Renderer {
        // Color painting is gated on a terminal anyway; force it off
        // so assertions see plain text.
        Renderer { color: false }
    }

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::from_ymd(y, m, d).expect("valid date")
    }

    #[test]
    fn month_grid_has_header_names_and_full_weeks() {
        let locale = Locale::default();
        let grid = renderer().month_grid(date(2014, 3, 15), date(2014, 3, 15), &locale, 0, false);
        let lines: Vec<&str> = grid.lines().collect();

        // Title, names row, six display weeks for March 2014.
        assert_eq!(lines.len(), 2 + 6);
        assert!(lines[0].contains("March 2014"));
        assert!(lines[1].trim_start().starts_with("Sun"));
        // First cell is the Feb 23 lead-in day.
        assert!(lines[2].trim_start().starts_with("23"));
        // Last row ends with the Apr 5 lead-out day.
        assert!(lines[7].trim_end().ends_with('5'));
    }

    #[test]
    fn six_weeks_grid_always_renders_six_rows() {
        let locale = Locale::default();
        for month in 1..=12 {
            let grid =
                renderer().month_grid(date(2021, month, 10), date(2021, 1, 1), &locale, 0, true);
            assert_eq!(grid.lines().count(), 8, "month {month}");
        }
    }

    #[test]
    fn week_strip_rotates_names_with_first_day() {
        let locale = Locale::default();
        let strip = renderer().week_strip(date(2021, 1, 6), date(2021, 1, 6), &locale, 1);
        let lines: Vec<&str> = strip.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].trim_start().starts_with("Mon"));
        // Monday-first week of Jan 6 2021 starts on Jan 4.
        assert!(lines[1].trim_start().starts_with('4'));
    }
}

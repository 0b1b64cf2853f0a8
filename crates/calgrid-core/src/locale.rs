use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

/// Calendar display strings. Always passed explicitly to the call
/// sites that need names; the process-wide [`default_locale`] exists
/// only for convenience entry points. Deserializable so a config file
/// can carry a partial `[locale]` table; omitted fields keep the
/// English defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Locale {
    #[serde(default = "default_month_names")]
    pub month_names: Vec<String>,
    #[serde(default = "default_month_names_short")]
    pub month_names_short: Vec<String>,
    #[serde(default = "default_day_names")]
    pub day_names: Vec<String>,
    #[serde(default = "default_day_names_short")]
    pub day_names_short: Vec<String>,
    /// Digit glyphs indexed 0..9; latin digits pass through when absent.
    #[serde(default)]
    pub numbers: Option<Vec<String>>,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            month_names: default_month_names(),
            month_names_short: default_month_names_short(),
            day_names: default_day_names(),
            day_names_short: default_day_names_short(),
            numbers: None,
        }
    }
}

fn default_month_names() -> Vec<String> {
    str_vec(&[
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ])
}

fn default_month_names_short() -> Vec<String> {
    str_vec(&[
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ])
}

fn default_day_names() -> Vec<String> {
    str_vec(&[
        "Sunday",
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
    ])
}

fn default_day_names_short() -> Vec<String> {
    str_vec(&["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"])
}

fn str_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

pub fn default_locale() -> &'static Locale {
    static DEFAULT: OnceLock<Locale> = OnceLock::new();
    DEFAULT.get_or_init(Locale::default)
}

impl Locale {
    /// 1-based month accessor matching `CalendarDate::month`.
    pub fn month_name(&self, month: u32) -> Option<&str> {
        self.month_names
            .get(month.checked_sub(1)? as usize)
            .map(String::as_str)
    }

    pub fn month_name_short(&self, month: u32) -> Option<&str> {
        self.month_names_short
            .get(month.checked_sub(1)? as usize)
            .map(String::as_str)
    }
}

/// Short weekday names rotated so the list starts at `first_day`
/// (0 = Sunday). The locale's own list is never mutated.
pub fn weekday_names(locale: &Locale, first_day: u32) -> Vec<String> {
    let names = &locale.day_names_short;
    let shift = (first_day % 7) as usize;
    if shift == 0 || names.is_empty() {
        return names.clone();
    }
    let shift = shift % names.len();
    let mut rotated = names[shift..].to_vec();
    rotated.extend_from_slice(&names[..shift]);
    rotated
}

/// Replaces latin digits with the locale digit glyphs; identity when
/// the locale has no digit table.
pub fn format_numbers(locale: &Locale, text: &str) -> String {
    let Some(numbers) = &locale.numbers else {
        return text.to_string();
    };

    static LATIN_DIGITS: OnceLock<Option<Regex>> = OnceLock::new();
    let Some(pattern) = LATIN_DIGITS.get_or_init(|| Regex::new("[0-9]").ok()) else {
        return text.to_string();
    };

    pattern
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let digit = caps[0].chars().next().and_then(|c| c.to_digit(10));
            digit
                .and_then(|d| numbers.get(d as usize).cloned())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_names_rotate_without_mutating_source() {
        let locale = Locale::default();
        let monday_first = weekday_names(&locale, 1);
        assert_eq!(monday_first[0], "Mon");
        assert_eq!(monday_first[6], "Sun");

        let saturday_first = weekday_names(&locale, 6);
        assert_eq!(saturday_first[0], "Sat");
        assert_eq!(saturday_first[1], "Sun");
        assert_eq!(saturday_first[6], "Fri");

        // Source list untouched.
        assert_eq!(locale.day_names_short[0], "Sun");
        assert_eq!(weekday_names(&locale, 0), locale.day_names_short);
    }

    #[test]
    fn format_numbers_maps_digits_through_locale_table() {
        let mut locale = Locale::default();
        assert_eq!(format_numbers(&locale, "2021-01-05"), "2021-01-05");

        locale.numbers = Some(
            ["٠", "١", "٢", "٣", "٤", "٥", "٦", "٧", "٨", "٩"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        );
        assert_eq!(format_numbers(&locale, "15"), "١٥");
    }

    #[test]
    fn month_names_are_one_based() {
        let locale = default_locale();
        assert_eq!(locale.month_name(1), Some("January"));
        assert_eq!(locale.month_name_short(12), Some("Dec"));
        assert_eq!(locale.month_name(0), None);
        assert_eq!(locale.month_name(13), None);
    }
}

//! Locale-neutral formatting for dates and phone numbers shown on a CV.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Sentinel used for open-ended date ranges.
pub const PRESENT: &str = "Present";

static YEAR_MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})$").expect("Should compile: YEAR_MONTH_RE"));
static MONTH_SLASH_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2})/(\d{4})$").expect("Should compile: MONTH_SLASH_YEAR_RE"));

/// Renders a month-precision date as `Month YYYY`.
///
/// Accepts `YYYY-MM` and `MM/YYYY`. An empty value or `Present` yields `Present`.
/// Anything else, including day-precision dates, is returned unchanged so no
/// information is dropped.
pub fn format_date_for_cv(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() || value == PRESENT {
        return PRESENT.to_string();
    }

    let parts = YEAR_MONTH_RE
        .captures(value)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .or_else(|| {
            MONTH_SLASH_YEAR_RE
                .captures(value)
                .map(|c| (c[2].to_string(), c[1].to_string()))
        });

    parts
        .and_then(|(year, month)| {
            let year = year.parse::<i32>().ok()?;
            let month = month.parse::<u32>().ok()?;
            NaiveDate::from_ymd_opt(year, month, 1)
        })
        .map(|date| date.format("%B %Y").to_string())
        .unwrap_or_else(|| value.to_string())
}

/// Normalizes a phone number to international form.
///
/// Keeps digits and `+`. Ten-digit numbers without a country code are treated
/// as North American and prefixed with `+1`; North American numbers render as
/// `+1 555 123 4567`. Input without digits is returned as given.
pub fn format_phone_international(phone: &str) -> String {
    let mut cleaned: String = phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return phone.to_string();
    }

    if !cleaned.starts_with('+') {
        if cleaned.len() == 10 {
            cleaned.insert_str(0, "+1");
        } else {
            return phone.to_string();
        }
    }

    let digits: String = cleaned[1..].chars().filter(|c| c.is_ascii_digit()).collect();
    if let Some(rest) = digits.strip_prefix('1') {
        if rest.len() == 10 {
            return format!("+1 {} {} {}", &rest[..3], &rest[3..6], &rest[6..]);
        }
    }

    cleaned
}

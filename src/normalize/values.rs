//! Lenient cell parsing.
//!
//! Spreadsheet exports are inconsistent: ids come out as `1234.0`, dates
//! as ISO strings, Brazilian `dd/mm/yyyy` or Excel serial numbers, money
//! as `R$ 37,50`. These helpers accept the common shapes and return
//! `None` for anything else; callers decide whether that is an issue.

use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Normalizes an employee id cell. Integral floats lose their `.0`.
///
/// # Examples
///
/// ```
/// use meal_voucher_engine::normalize::parse_employee_id;
///
/// assert_eq!(parse_employee_id(" 1234 "), Some("1234".to_string()));
/// assert_eq!(parse_employee_id("1234.0"), Some("1234".to_string()));
/// assert_eq!(parse_employee_id(""), None);
/// ```
pub fn parse_employee_id(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return None;
    }
    match trimmed.split_once('.') {
        Some((whole, fraction))
            if !whole.is_empty()
                && whole.chars().all(|c| c.is_ascii_digit())
                && fraction.chars().all(|c| c == '0') =>
        {
            Some(whole.to_string())
        }
        _ => Some(trimmed.to_string()),
    }
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M:%S"];

/// Largest serial Excel can represent (9999-12-31).
const EXCEL_MAX_SERIAL: i64 = 2_958_465;

/// Parses a date cell.
///
/// ```
/// use meal_voucher_engine::normalize::parse_date;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2025, 5, 20);
/// assert_eq!(parse_date("2025-05-20"), expected);
/// assert_eq!(parse_date("20/05/2025"), expected);
/// assert_eq!(parse_date("2025-05-20 00:00:00"), expected);
/// assert_eq!(parse_date("45797"), expected);
/// assert_eq!(parse_date("31/02/2025"), None);
/// ```
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(datetime.date());
        }
    }

    parse_excel_serial(trimmed)
}

fn parse_excel_serial(value: &str) -> Option<NaiveDate> {
    let serial = match value.split_once('.') {
        Some((whole, _)) => whole,
        None => value,
    };
    let days: i64 = serial.parse().ok()?;
    if !(1..=EXCEL_MAX_SERIAL).contains(&days) {
        return None;
    }
    // Excel's epoch with its 1900 leap-year bug folded in.
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(days))
}

/// Parses a non-negative whole day count; `5.0` is accepted, `5.5` is not.
///
/// ```
/// use meal_voucher_engine::normalize::parse_day_count;
///
/// assert_eq!(parse_day_count("22"), Some(22));
/// assert_eq!(parse_day_count("10.0"), Some(10));
/// assert_eq!(parse_day_count("-1"), None);
/// assert_eq!(parse_day_count("dez"), None);
/// ```
pub fn parse_day_count(value: &str) -> Option<u32> {
    let trimmed = value.trim();
    if let Ok(days) = trimmed.parse::<u32>() {
        return Some(days);
    }
    let decimal = Decimal::from_str(trimmed).ok()?;
    if decimal.is_sign_negative() || !decimal.fract().is_zero() {
        return None;
    }
    decimal.to_u32()
}

/// Parses a currency amount in `37.5`, `37,50`, `1.234,56` or `R$ 37,50` form.
///
/// ```
/// use meal_voucher_engine::normalize::parse_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_amount("R$ 37,50"), Some(Decimal::new(3750, 2)));
/// assert_eq!(parse_amount("35.0"), Some(Decimal::new(350, 1)));
/// assert_eq!(parse_amount("1.234,56"), Some(Decimal::new(123456, 2)));
/// assert_eq!(parse_amount("n/a"), None);
/// ```
pub fn parse_amount(value: &str) -> Option<Decimal> {
    let cleaned: String = value
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned
    };
    Decimal::from_str(&normalized).ok()
}

/// Interprets a termination notice cell: only "OK" (any case) confirms.
pub fn is_notice_confirmed(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("OK"))
}

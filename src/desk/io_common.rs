use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use log::{debug, warn};
use serde_json::Value as JSValue;
use snafu::prelude::*;

use crate::desk::{DeskResult, InvalidDateSnafu};

/// Reads a number that may be written as a JSON number or as a string.
fn read_js_number(x: &JSValue) -> Option<f64> {
    let f = match x {
        JSValue::Number(n) => n.as_f64(),
        JSValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    if f.is_finite() {
        Some(f)
    } else {
        None
    }
}

/// A non-negative count. Missing values are 0, unreadable ones are 0 with a warning.
/// Fractions are truncated towards zero.
pub fn read_js_count(x: &Option<JSValue>, field: &str) -> u32 {
    match x {
        None | Some(JSValue::Null) => {
            debug!("read_js_count: {} is missing, using 0", field);
            0
        }
        Some(v) => match read_js_number(v) {
            Some(f) if f >= 0.0 && f <= u32::MAX as f64 => f.trunc() as u32,
            _ => {
                warn!("read_js_count: could not read {} from {}, using 0", field, v);
                0
            }
        },
    }
}

/// A year. Same coercion rules as counts, fractions included.
pub fn read_js_year(x: &Option<JSValue>, field: &str) -> i32 {
    match x {
        None | Some(JSValue::Null) => {
            debug!("read_js_year: {} is missing, using 0", field);
            0
        }
        Some(v) => match read_js_number(v) {
            Some(f) if f.abs() <= i32::MAX as f64 => f.trunc() as i32,
            _ => {
                warn!("read_js_year: could not read {} from {}, using 0", field, v);
                0
            }
        },
    }
}

pub fn read_js_float(x: &Option<JSValue>, field: &str) -> f64 {
    match x {
        None | Some(JSValue::Null) => 0.0,
        Some(v) => read_js_number(v).unwrap_or_else(|| {
            warn!("read_js_float: could not read {} from {}, using 0", field, v);
            0.0
        }),
    }
}

/// Accepts a plain date (`2025-05-10`) or a full RFC 3339 timestamp, of which
/// only the UTC date is kept.
pub fn parse_date(s: &str) -> DeskResult<NaiveDate> {
    let s = s.trim();
    match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(d) => Ok(d),
        Err(e) => match DateTime::parse_from_rfc3339(s) {
            Ok(dt) => Ok(dt.with_timezone(&Utc).date_naive()),
            Err(_) => Err(e).context(InvalidDateSnafu {
                value: s.to_string(),
            }),
        },
    }
}

/// Midnight UTC of the given day.
pub fn start_of_day(d: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn counts_are_coerced() {
        assert_eq!(read_js_count(&Some(json!(168)), "totalDelegates"), 168);
        assert_eq!(read_js_count(&Some(json!("52400")), "totalMembers"), 52400);
        assert_eq!(read_js_count(&Some(json!(" 12.7 ")), "votes"), 12);
        assert_eq!(read_js_count(&Some(json!("n/a")), "totalMembers"), 0);
        assert_eq!(read_js_count(&Some(json!(-4)), "votes"), 0);
        assert_eq!(read_js_count(&Some(json!(true)), "votes"), 0);
        assert_eq!(read_js_count(&None, "votes"), 0);
    }

    #[test]
    fn years_and_floats() {
        assert_eq!(read_js_year(&Some(json!("2028")), "year"), 2028);
        assert_eq!(read_js_year(&Some(json!([2028])), "year"), 0);
        assert_eq!(read_js_year(&Some(json!(2028.9)), "year"), 2028);
        assert_eq!(read_js_float(&Some(json!(12.7)), "riskScore"), 12.7);
        assert_eq!(read_js_float(&Some(json!("45.5")), "riskScore"), 45.5);
        assert_eq!(read_js_float(&Some(json!({})), "riskScore"), 0.0);
    }

    #[test]
    fn dates() {
        let d = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
        assert_eq!(parse_date("2025-05-10").unwrap(), d);
        assert_eq!(parse_date("2025-05-10T23:30:00+02:00").unwrap(), d);
        assert!(parse_date("10/05/2025").is_err());
        assert_eq!(
            start_of_day(d),
            Utc.with_ymd_and_hms(2025, 5, 10, 0, 0, 0).unwrap()
        );
    }
}

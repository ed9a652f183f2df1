//! Annual peak-flow series from the USGS NWIS services.
//!
//! Peak values come from the peak-flow service; the current year, which has no
//! published peak yet, is filled in from the daily-value service. Both return
//! RDB (tab-separated) text where data lines start with the agency code `USGS`.

use anyhow::Result;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::source::Client;

/// Default NWIS peak-flow endpoint.
pub const PEAK_URL_PREFIX: &str = "https://nwis.waterdata.usgs.gov/nwis/peak";
/// Default NWIS water services root (the daily-value path is appended).
pub const DV_URL_PREFIX: &str = "https://waterservices.usgs.gov/nwis/";

// Dates keep their dashes, site numbers are plain digits.
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// One bar of the peak-flow chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakPoint {
    /// Water year, e.g. `"2017"`.
    pub label: String,
    pub value: f64,
}

fn enc(s: &str) -> String {
    utf8_percent_encode(s.trim(), SAFE).to_string()
}

pub fn peak_url(prefix: &str, site: &str, end_date: &str) -> String {
    format!(
        "{prefix}?site_no={}&agency_cd=USGS&format=rdb&end_date={}",
        enc(site),
        enc(end_date)
    )
}

pub fn daily_value_url(prefix: &str, site: &str, date: &str) -> String {
    let date = enc(date);
    format!(
        "{prefix}dv/?format=rdb&sites={}&startDT={date}&endDT={date}&siteStatus=all",
        enc(site)
    )
}

/// Download an RDB document and split it into lines.
///
/// Failures are logged and reported as `None`; callers render whatever they have.
pub fn fetch_rdb(client: &Client, url: &str) -> Option<Vec<String>> {
    match client.get_text(url) {
        Ok(body) => Some(body.lines().map(str::to_string).collect()),
        Err(e) => {
            log::warn!("bad URL {url}: {e:#}");
            None
        }
    }
}

fn year_of(date: &str) -> Option<&str> {
    static YEAR: OnceLock<Regex> = OnceLock::new();
    let re = YEAR.get_or_init(|| Regex::new(r"^\s*(\d{4})").expect("static regex"));
    re.captures(date)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Merge peak-flow and daily-value RDB lines into one point per year.
///
/// - Only lines beginning with `USGS` are data.
/// - Peak lines: date in column 2, integer peak in column 4. The first line of
///   a year wins; a year is claimed even when its value is blank.
/// - Daily-value lines: date in column 2, value in column 3. Scanning stops at
///   the first year the peak data already covers.
pub fn parse_peak_data<S: AsRef<str>>(
    peak_data: Option<&[S]>,
    dv_data: Option<&[S]>,
) -> Vec<PeakPoint> {
    let mut out = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for line in peak_data.unwrap_or(&[]) {
        let line = line.as_ref();
        if !line.starts_with("USGS") {
            continue;
        }
        let cols: Vec<&str> = line.split('\t').collect();
        let Some(year) = cols.get(2).and_then(|d| year_of(d)) else {
            continue;
        };
        if !seen.insert(year.to_string()) {
            continue;
        }
        let raw = cols.get(4).map(|s| s.trim()).unwrap_or("");
        if raw.is_empty() {
            continue;
        }
        match raw.parse::<i64>() {
            Ok(v) => out.push(PeakPoint {
                label: year.to_string(),
                value: v as f64,
            }),
            Err(e) => log::warn!("peak value {raw:?} for {year}: {e}"),
        }
    }

    for line in dv_data.unwrap_or(&[]) {
        let line = line.as_ref();
        if !line.starts_with("USGS") {
            continue;
        }
        let cols: Vec<&str> = line.split('\t').collect();
        let Some(year) = cols.get(2).and_then(|d| year_of(d)) else {
            continue;
        };
        if seen.contains(year) {
            break;
        }
        let raw = cols.get(3).map(|s| s.trim()).unwrap_or("");
        if raw.is_empty() {
            continue;
        }
        match raw.parse::<f64>() {
            Ok(v) => out.push(PeakPoint {
                label: year.to_string(),
                value: v,
            }),
            Err(e) => log::warn!("daily value {raw:?} for {year}: {e}"),
        }
    }

    out
}

/// Fetch and merge the peak-flow series of one site.
///
/// `dv_date` selects the day whose daily value stands in for the current year.
pub fn fetch_peak_series(
    client: &Client,
    site: &str,
    end_date: &str,
    dv_date: Option<&str>,
    peak_prefix: &str,
    dv_prefix: &str,
) -> Result<Vec<PeakPoint>> {
    let peak = fetch_rdb(client, &peak_url(peak_prefix, site, end_date));
    let dv = dv_date.and_then(|d| fetch_rdb(client, &daily_value_url(dv_prefix, site, d)));
    if peak.is_none() && dv.is_none() {
        anyhow::bail!("no peak-flow data could be retrieved for site {site}");
    }
    Ok(parse_peak_data(peak.as_deref(), dv.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_follow_nwis_layout() {
        assert_eq!(
            peak_url("https://x/peak", "01646500", "2017-05-01"),
            "https://x/peak?site_no=01646500&agency_cd=USGS&format=rdb&end_date=2017-05-01"
        );
        assert_eq!(
            daily_value_url("https://x/nwis/", "01646500", "2017-05-01"),
            "https://x/nwis/dv/?format=rdb&sites=01646500&startDT=2017-05-01&endDT=2017-05-01&siteStatus=all"
        );
    }

    #[test]
    fn site_is_percent_encoded() {
        assert!(peak_url("p", "a b&c", "d").contains("site_no=a%20b%26c"));
    }

    #[test]
    fn year_extraction() {
        assert_eq!(year_of("2017-05-02"), Some("2017"));
        assert_eq!(year_of("17-05"), None);
    }
}

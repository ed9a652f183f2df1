//! Time and logarithmic scales mapping data into plot-local pixels.
//!
//! Both domains are fitted to the samples currently on screen, so the chart
//! re-zooms whenever lines are toggled.

use chrono::DateTime;
use num_format::{Locale, ToFormattedString};

use crate::models::Sample;

/// Lower bound of the vertical domain, in cfs. Keeps the log scale away from zero.
pub const LOG_FLOOR: f64 = 20.0;

const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Candidate tick spacings for the time axis, smallest first.
const TIME_STEPS: [i64; 12] = [
    HOUR_MS,
    3 * HOUR_MS,
    6 * HOUR_MS,
    12 * HOUR_MS,
    DAY_MS,
    2 * DAY_MS,
    7 * DAY_MS,
    14 * DAY_MS,
    30 * DAY_MS,
    91 * DAY_MS,
    182 * DAY_MS,
    365 * DAY_MS,
];

/// Linear map from epoch milliseconds to pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    domain: (i64, i64),
    range: (f64, f64),
}

impl TimeScale {
    pub fn new(domain: (i64, i64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Fit the domain to the extent of `timestamps`; an empty input yields `(0, 0)`.
    pub fn fit<I>(timestamps: I, width: f64) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        let mut extent: Option<(i64, i64)> = None;
        for t in timestamps {
            extent = Some(match extent {
                None => (t, t),
                Some((lo, hi)) => (lo.min(t), hi.max(t)),
            });
        }
        Self::new(extent.unwrap_or((0, 0)), (0.0, width))
    }

    pub fn domain(&self) -> (i64, i64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn map(&self, t: i64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        let offset = (t as i128 - d0 as i128) as f64;
        let span = (d1 as i128 - d0 as i128) as f64;
        r0 + offset / span * (r1 - r0)
    }

    pub fn invert(&self, x: f64) -> i64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if (r1 - r0).abs() < f64::EPSILON {
            return d0;
        }
        let span = (d1 as i128 - d0 as i128) as f64;
        (d0 as f64 + (x - r0) / (r1 - r0) * span).round() as i64
    }

    /// Roughly `count` evenly spaced ticks inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<i64> {
        let (d0, d1) = self.domain;
        if d1 <= d0 || count == 0 {
            return vec![d0];
        }
        // Widened so domains spanning most of the i64 range cannot overflow.
        let (lo, hi) = (d0 as i128, d1 as i128);
        let span = hi - lo;
        let count = count as i128;
        let year = (365 * DAY_MS) as i128;
        let step = TIME_STEPS
            .iter()
            .map(|s| *s as i128)
            .find(|s| span / s <= count)
            .unwrap_or_else(|| (span / year / count).max(1) * year);
        let mut t = lo.div_euclid(step) * step;
        if t < lo {
            t += step;
        }
        let mut out = Vec::new();
        while t <= hi {
            out.push(t as i64);
            t += step;
        }
        out
    }
}

/// Axis label for a time tick, e.g. `May  2`.
pub fn format_time_tick(t: i64) -> String {
    match DateTime::from_timestamp_millis(t) {
        Some(dt) => dt.format("%B %e").to_string(),
        None => t.to_string(),
    }
}

/// Base-10 logarithmic map from discharge to pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LogScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Domain is `[LOG_FLOOR, max(values)]`; with no values the domain collapses onto the floor.
    /// The range is inverted so larger values sit higher on screen.
    pub fn fit<I>(values: I, height: f64) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let max = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))));
        Self::new((LOG_FLOOR, max.unwrap_or(LOG_FLOOR)), (height, 0.0))
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Non-positive values have no logarithm and map to NaN.
    pub fn map(&self, v: f64) -> f64 {
        if v <= 0.0 {
            return f64::NAN;
        }
        let (l0, l1) = (self.domain.0.log10(), self.domain.1.log10());
        let (r0, r1) = self.range;
        if (l1 - l0).abs() < f64::EPSILON {
            return r0;
        }
        r0 + (v.log10() - l0) / (l1 - l0) * (r1 - r0)
    }

    pub fn invert(&self, y: f64) -> f64 {
        let (l0, l1) = (self.domain.0.log10(), self.domain.1.log10());
        let (r0, r1) = self.range;
        if (r1 - r0).abs() < f64::EPSILON {
            return self.domain.0;
        }
        10f64.powf(l0 + (y - r0) / (r1 - r0) * (l1 - l0))
    }

    /// Ticks at 1..9 x 10^k inside the domain; only powers of ten once the
    /// domain spans more than `count` decades.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        if lo <= 0.0 || !hi.is_finite() {
            return Vec::new();
        }
        let k0 = lo.log10().floor() as i32;
        let k1 = hi.log10().ceil() as i32;
        let decades_only = (k1 - k0) as usize > count;
        let mut out = Vec::new();
        for k in k0..=k1 {
            let base = 10f64.powi(k);
            let multipliers: &[f64] = if decades_only {
                &[1.0]
            } else {
                &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]
            };
            for m in multipliers {
                let v = m * base;
                if v >= lo - 1e-9 && v <= hi + 1e-9 {
                    out.push(v);
                }
            }
        }
        out
    }
}

/// Whole-number axis label with locale grouping, e.g. `1,000`.
pub fn format_log_tick(v: f64, locale: &Locale) -> String {
    (v.round() as i64).to_formatted_string(locale)
}

/// The pair of scales used for one render of the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartScales {
    pub x: TimeScale,
    pub y: LogScale,
}

impl ChartScales {
    pub fn fit<'a, I>(samples: I, inner_width: f64, inner_height: f64) -> Self
    where
        I: IntoIterator<Item = &'a Sample> + Clone,
    {
        Self {
            x: TimeScale::fit(samples.clone().into_iter().map(|s| s.timestamp), inner_width),
            y: LogScale::fit(samples.into_iter().map(|s| s.value), inner_height),
        }
    }

    /// Plot-local pixel position of a sample.
    pub fn project(&self, sample: &Sample) -> (f64, f64) {
        (self.x.map(sample.timestamp), self.y.map(sample.value))
    }
}

use ahash::AHashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FloodvizError;

/// One gauge reading as delivered by the data endpoint.
///
/// Wire names follow the JSON produced by the floodviz backend
/// (`key`, `time_mili`, `value`, `time`, `timezone`, `name`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sample {
    #[serde(rename = "key")]
    pub series_key: String,
    /// Milliseconds since the Unix epoch.
    #[serde(rename = "time_mili", deserialize_with = "de_i64_from_string_or_number")]
    pub timestamp: i64,
    /// Discharge in cfs. Some backends serialize it as a string.
    #[serde(deserialize_with = "de_f64_from_string_or_number")]
    pub value: f64,
    /// Human readable local time, used verbatim in labels.
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub timezone: String,
    #[serde(rename = "name", default)]
    pub display_name: String,
}

impl Sample {
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Label shown next to the focus marker, e.g. `01646500: 1520 cfs 2017-05-02 10:00 EST`.
    pub fn focus_label(&self) -> String {
        format!(
            "{}: {} cfs {} {}",
            self.series_key, self.value, self.time, self.timezone
        )
    }
}

/// Serde helper: parse `f64` from either a JSON number or a numeric string.
fn de_f64_from_string_or_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct F64Visitor;

    impl<'de> Visitor<'de> for F64Visitor {
        type Value = f64;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a number or a string holding a number")
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v)
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v as f64)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v as f64)
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            s.trim().parse::<f64>().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(F64Visitor)
}

/// Serde helper: parse epoch milliseconds from a JSON integer, float or string.
fn de_i64_from_string_or_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct I64Visitor;

    impl<'de> Visitor<'de> for I64Visitor {
        type Value = i64;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "an integer timestamp in milliseconds")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            i64::try_from(v).map_err(E::custom)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v)
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if !v.is_finite() {
                return Err(E::custom("non-finite timestamp"));
            }
            Ok(v.round() as i64)
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(v) => Ok(v),
                Err(_) => s
                    .parse::<f64>()
                    .map_err(E::custom)
                    .and_then(|v| self.visit_f64(v)),
            }
        }
    }

    deserializer.deserialize_any(I64Visitor)
}

/// Chronologically ordered samples of one site.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub key: String,
    pub display_name: String,
    samples: Vec<Sample>,
}

impl Series {
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// All series fetched for the widget, keyed by site key.
///
/// Keys keep the order in which they first appeared in the input.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    series: Vec<Series>,
    index: AHashMap<String, usize>,
}

impl Dataset {
    /// Group samples into series. Samples with an empty key are rejected.
    pub fn from_samples(samples: Vec<Sample>) -> Result<Self, FloodvizError> {
        let mut series: Vec<Series> = Vec::new();
        let mut index: AHashMap<String, usize> = AHashMap::new();
        for (i, s) in samples.into_iter().enumerate() {
            if s.series_key.trim().is_empty() {
                return Err(FloodvizError::EmptySeriesKey { index: i });
            }
            let slot = match index.get(&s.series_key) {
                Some(&slot) => slot,
                None => {
                    index.insert(s.series_key.clone(), series.len());
                    series.push(Series {
                        key: s.series_key.clone(),
                        display_name: s.display_name.clone(),
                        samples: Vec::new(),
                    });
                    series.len() - 1
                }
            };
            series[slot].samples.push(s);
        }
        for s in &mut series {
            s.samples.sort_by_key(|p| p.timestamp);
        }
        Ok(Self { series, index })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Series> {
        self.index.get(key).map(|&i| &self.series[i])
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.key.as_str())
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn sample_count(&self) -> usize {
        self.series.iter().map(Series::len).sum()
    }
}

//! Loading hydrograph samples from a file or over HTTP.
//!
//! The data endpoint returns a flat JSON array of sample records:
//!
//! ```json
//! [{"key": "01646500", "time_mili": 1493683200000, "value": "1520",
//!   "time": "2017-05-02 00:00", "timezone": "EST", "name": "Potomac River"}]
//! ```
//!
//! ### Notes
//! - `value` and `time_mili` may arrive as strings; both forms are accepted.
//! - Transient HTTP failures (5xx / network errors) are tried up to three times with a
//!   short backoff. The widget itself never retries.
//!
//! Typical usage:
//! ```no_run
//! let dataset = floodviz::source::load_dataset("data/hydrograph.json")?;
//! println!("{} series", dataset.len());
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::models::{Dataset, Sample};
use anyhow::{Context, Result, anyhow, bail};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use std::time::Duration;

/// Blocking HTTP client with the timeouts used for all floodviz requests.
#[derive(Debug, Clone)]
pub struct Client {
    http: HttpClient,
}

impl Client {
    pub fn new() -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(5))
            .user_agent(concat!("floodviz_rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build http client")?;
        Ok(Self { http })
    }

    /// GET `url` and return the body, retrying on 5xx and network errors.
    pub fn get_text(&self, url: &str) -> Result<String> {
        with_retries(
            || match self.http.get(url).send() {
                Ok(r) if r.status().is_success() => {
                    r.text().context("read body").map_err(Failure::Fatal)
                }
                Ok(r) if r.status().is_server_error() => {
                    log::warn!("GET {url}: HTTP {}, retrying", r.status());
                    Err(Failure::Transient(anyhow!("server error: HTTP {}", r.status())))
                }
                Ok(r) => Err(Failure::Fatal(anyhow!("request failed with HTTP {}", r.status()))),
                Err(e) => Err(Failure::Transient(anyhow::Error::new(e).context("network error"))),
            },
            std::thread::sleep,
        )
    }

    /// Fetch and decode a sample array.
    pub fn fetch_samples(&self, url: &str) -> Result<Vec<Sample>> {
        let body = self.get_text(url).with_context(|| format!("GET {url}"))?;
        parse_samples(&body).with_context(|| format!("decode samples from {url}"))
    }
}

/// Pause before the second and third attempt.
const BACKOFF_MS: [u64; 2] = [100, 300];

/// Why a single request attempt failed.
enum Failure {
    /// 5xx or transport error; worth another try.
    Transient(anyhow::Error),
    Fatal(anyhow::Error),
}

/// Run `attempt` up to three times, pausing between tries. The error of the
/// last transient failure is returned once the attempts run out.
fn with_retries<T>(
    mut attempt: impl FnMut() -> std::result::Result<T, Failure>,
    mut pause: impl FnMut(Duration),
) -> Result<T> {
    let mut last_err = match attempt() {
        Ok(v) => return Ok(v),
        Err(Failure::Fatal(e)) => return Err(e),
        Err(Failure::Transient(e)) => e,
    };
    for backoff_ms in BACKOFF_MS {
        pause(Duration::from_millis(backoff_ms));
        match attempt() {
            Ok(v) => return Ok(v),
            Err(Failure::Fatal(e)) => return Err(e),
            Err(Failure::Transient(e)) => last_err = e,
        }
    }
    Err(last_err.context(format!("giving up after {} attempts", BACKOFF_MS.len() + 1)))
}

pub fn is_remote(location: &str) -> bool {
    let l = location.trim_start().to_ascii_lowercase();
    l.starts_with("http://") || l.starts_with("https://")
}

/// Decode a JSON array of sample records.
pub fn parse_samples(json: &str) -> Result<Vec<Sample>> {
    let samples: Vec<Sample> = serde_json::from_str(json).context("parse sample array")?;
    Ok(samples)
}

/// Read samples from a local path or an `http(s)://` URL.
pub fn load_samples(location: &str) -> Result<Vec<Sample>> {
    if location.trim().is_empty() {
        bail!("no data path configured");
    }
    if is_remote(location) {
        return Client::new()?.fetch_samples(location.trim());
    }
    let txt = std::fs::read_to_string(location).with_context(|| format!("read {location}"))?;
    parse_samples(&txt).with_context(|| format!("decode samples from {location}"))
}

/// Read samples and group them into a dataset.
pub fn load_dataset(location: &str) -> Result<Dataset> {
    let samples = load_samples(location)?;
    log::debug!("loaded {} sample(s) from {location}", samples.len());
    Ok(Dataset::from_samples(samples)?)
}

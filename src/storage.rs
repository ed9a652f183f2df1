use crate::models::Sample;
use anyhow::Result;
use csv::WriterBuilder;
use std::borrow::Cow;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Neutralize spreadsheet formulas: text cells starting with `=`, `+`, `-` or `@`
/// get a leading single quote.
fn safe_cell(s: &str) -> Cow<'_, str> {
    if s.starts_with(['=', '+', '-', '@']) {
        Cow::Owned(format!("'{s}"))
    } else {
        Cow::Borrowed(s)
    }
}

/// Save samples as CSV with header.
pub fn save_csv<P: AsRef<Path>>(samples: &[&Sample], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("key", "name", "time_mili", "time", "timezone", "value"))?;
    for s in samples {
        wtr.serialize((
            safe_cell(&s.series_key),
            safe_cell(&s.display_name),
            s.timestamp,
            safe_cell(&s.time),
            safe_cell(&s.timezone),
            s.value,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save samples as a pretty JSON array in the same shape the widget loads.
pub fn save_json<P: AsRef<Path>>(samples: &[&Sample], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(samples)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

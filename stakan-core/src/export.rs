use std::borrow::Cow;
use std::fmt::Write as _;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::types::Candle;

/// A rendered CSV export: file name plus full document content.
///
/// Rendering only; actually writing the document to disk (or handing it to a
/// browser download) is the caller's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDocument {
    /// Suggested file name, `{symbol}_candles_{instant}.csv` with `:` and
    /// `.` in the instant replaced by `-` for filesystem safety.
    pub file_name: String,
    /// UTF-8 document starting with a byte-order mark so spreadsheet tools
    /// detect the encoding.
    pub content: String,
}

const HEADER: &str = "open_time,close_time,symbol,open,high,low,close,volume";

/// Render a candle dataset as a CSV document.
///
/// Returns `None` for an empty dataset: the caller should surface a
/// "nothing to export" notice and perform no write. Timestamps are rendered
/// as full ISO-8601 instants with millisecond precision; the file name stamp
/// comes from `exported_at` so exports are reproducible in tests.
#[must_use]
pub fn candles_to_csv(candles: &[Candle], exported_at: DateTime<Utc>) -> Option<CsvDocument> {
    let first = candles.first()?;

    let mut content = String::from('\u{feff}');
    content.push_str(HEADER);
    for c in candles {
        content.push('\n');
        let _ = write!(
            content,
            "{},{},{},{},{},{},{},{}",
            iso_instant(c.open_time),
            iso_instant(c.close_time),
            csv_field(&c.symbol),
            c.open,
            c.high,
            c.low,
            c.close,
            c.volume
        );
    }

    let stamp = iso_instant(exported_at).replace([':', '.'], "-");
    Some(CsvDocument {
        file_name: format!("{}_candles_{stamp}.csv", first.symbol),
        content,
    })
}

fn iso_instant(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Double-quote a field when it contains the delimiter.
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains(',') {
        Cow::Owned(format!("\"{value}\""))
    } else {
        Cow::Borrowed(value)
    }
}

//! Bar loading for the runner: headered CSV in, validated chronological bars out.
//!
//! Column headers are matched against known aliases (Chinese exchange exports
//! and English investing-style exports). Values are normalized on the way in:
//! - change `1.5%` -> 0.015
//! - volume `12.3M` -> 12_300_000, `1.2B` -> 1_200_000_000, empty or `-` -> 0
//! - thousands separators are stripped from plain numbers
//!
//! Any malformed row aborts the whole load; no strategy runs on partial data.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};

use signalbench_core::domain::Bar;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file {path} could not be read: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("line {line}: malformed number in '{column}': {value:?}")]
    MalformedNumber {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("line {line}: malformed percentage: {value:?}")]
    MalformedPercent { line: u64, value: String },

    #[error("line {line}: malformed volume: {value:?}")]
    MalformedVolume { line: u64, value: String },

    #[error("line {line}: malformed date: {value:?}")]
    MalformedDate { line: u64, value: String },

    #[error("duplicate date {0}")]
    DuplicateDate(NaiveDate),

    #[error("data file contains no bars")]
    Empty,
}

/// Result of loading bars, including the dataset fingerprint.
#[derive(Debug, Clone)]
pub struct LoadedData {
    /// Bars in ascending date order.
    pub bars: Vec<Bar>,
    /// Dataset hash for reproducibility (BLAKE3 over all bar data).
    pub dataset_hash: String,
}

const DATE_ALIASES: &[&str] = &["日期", "Date"];
const CLOSE_ALIASES: &[&str] = &["收盘", "Close", "Price"];
const OPEN_ALIASES: &[&str] = &["开盘", "Open"];
const HIGH_ALIASES: &[&str] = &["高", "High"];
const LOW_ALIASES: &[&str] = &["低", "Low"];
const VOLUME_ALIASES: &[&str] = &["交易量", "Vol.", "Volume"];
const CHANGE_ALIASES: &[&str] = &["涨跌幅", "Change %", "Change"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Column positions resolved from the header row.
struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: Option<usize>,
    change: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, LoadError> {
        let names: Vec<&str> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim())
            .collect();
        let find = |aliases: &[&str]| {
            aliases
                .iter()
                .find_map(|alias| names.iter().position(|n| n == alias))
        };
        let require = |aliases: &[&str], label: &'static str| {
            find(aliases).ok_or(LoadError::MissingColumn(label))
        };

        Ok(Self {
            date: require(DATE_ALIASES, "date")?,
            open: require(OPEN_ALIASES, "open")?,
            high: require(HIGH_ALIASES, "high")?,
            low: require(LOW_ALIASES, "low")?,
            close: require(CLOSE_ALIASES, "close")?,
            volume: find(VOLUME_ALIASES),
            change: find(CHANGE_ALIASES),
        })
    }
}

/// Load bars from a CSV file.
///
/// This is the primary entry point for the runner to get bar data.
pub fn load_bars(path: &Path) -> Result<LoadedData, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let loaded = parse_bars(file)?;
    info!(
        path = %path.display(),
        bars = loaded.bars.len(),
        hash = %&loaded.dataset_hash[..12],
        "loaded bars"
    );
    Ok(loaded)
}

/// Parse bars from any CSV reader (header row required).
pub fn parse_bars<R: Read>(reader: R) -> Result<LoadedData, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns = Columns::resolve(rdr.headers()?)?;

    let mut bars = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let bar = Bar {
            date: parse_date(field(columns.date), line)?,
            open: parse_number(field(columns.open), "open", line)?,
            high: parse_number(field(columns.high), "high", line)?,
            low: parse_number(field(columns.low), "low", line)?,
            close: parse_number(field(columns.close), "close", line)?,
            volume: match columns.volume {
                Some(idx) => parse_volume(field(idx), line)?,
                None => 0.0,
            },
            pct_change: match columns.change {
                Some(idx) => parse_percent(field(idx), line)?,
                None => 0.0,
            },
        };
        bars.push(bar);
    }

    if bars.is_empty() {
        return Err(LoadError::Empty);
    }

    bars.sort_by_key(|b| b.date);
    if let Some(dup) = bars.windows(2).find(|w| w[0].date == w[1].date) {
        return Err(LoadError::DuplicateDate(dup[0].date));
    }

    let insane = bars.iter().filter(|b| !b.is_sane()).count();
    if insane > 0 {
        warn!(insane, total = bars.len(), "bars failing OHLC sanity checks");
    }

    let dataset_hash = compute_dataset_hash(&bars);
    Ok(LoadedData { bars, dataset_hash })
}

fn parse_date(raw: &str, line: u64) -> Result<NaiveDate, LoadError> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| LoadError::MalformedDate {
            line,
            value: raw.to_string(),
        })
}

fn parse_plain(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_number(raw: &str, column: &'static str, line: u64) -> Result<f64, LoadError> {
    parse_plain(raw).ok_or_else(|| LoadError::MalformedNumber {
        line,
        column,
        value: raw.to_string(),
    })
}

/// `"1.5%"` (or `"1.5"`) -> 0.015.
fn parse_percent(raw: &str, line: u64) -> Result<f64, LoadError> {
    parse_plain(raw.trim_end_matches('%').trim())
        .map(|v| v / 100.0)
        .ok_or_else(|| LoadError::MalformedPercent {
            line,
            value: raw.to_string(),
        })
}

/// Suffixed magnitudes: `M` = 1e6, `B` = 1e9. Empty or `-` is zero volume.
fn parse_volume(raw: &str, line: u64) -> Result<f64, LoadError> {
    if raw.is_empty() || raw == "-" {
        return Ok(0.0);
    }
    let (digits, scale) = if let Some(d) = raw.strip_suffix(&['M', 'm'][..]) {
        (d, 1e6)
    } else if let Some(d) = raw.strip_suffix(&['B', 'b'][..]) {
        (d, 1e9)
    } else {
        (raw, 1.0)
    };
    parse_plain(digits.trim())
        .map(|v| v * scale)
        .ok_or_else(|| LoadError::MalformedVolume {
            line,
            value: raw.to_string(),
        })
}

/// Compute a deterministic BLAKE3 hash over all bar data.
///
/// The hash covers dates and every numeric field in chronological order.
pub fn compute_dataset_hash(bars: &[Bar]) -> String {
    let mut hasher = blake3::Hasher::new();
    for bar in bars {
        hasher.update(bar.date.to_string().as_bytes());
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.high.to_le_bytes());
        hasher.update(&bar.low.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
        hasher.update(&bar.volume.to_le_bytes());
        hasher.update(&bar.pct_change.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHINESE: &str = "\
日期,收盘,开盘,高,低,交易量,涨跌幅
2024-01-03,10.20,10.00,10.30,9.90,12.5M,2.00%
2024-01-02,10.00,9.80,10.10,9.70,1.2B,-0.50%
";

    #[test]
    fn parses_and_sorts_chinese_export() {
        let data = parse_bars(CHINESE.as_bytes()).unwrap();
        assert_eq!(data.bars.len(), 2);
        let first = &data.bars[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(first.close, 10.0);
        assert_eq!(first.volume, 1.2e9);
        assert!((first.pct_change - -0.005).abs() < 1e-12);
        let second = &data.bars[1];
        assert_eq!(second.volume, 12.5e6);
        assert!((second.pct_change - 0.02).abs() < 1e-12);
        assert_eq!(data.dataset_hash.len(), 64);
    }

    #[test]
    fn parses_english_aliases_and_us_dates() {
        let csv = "\
\"Date\",\"Price\",\"Open\",\"High\",\"Low\",\"Vol.\",\"Change %\"
\"01/05/2024\",\"1,234.50\",\"1,230.00\",\"1,240.00\",\"1,220.00\",\"-\",\"0.37%\"
";
        let data = parse_bars(csv.as_bytes()).unwrap();
        let bar = &data.bars[0];
        assert_eq!(bar.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(bar.close, 1234.5);
        assert_eq!(bar.volume, 0.0);
    }

    #[test]
    fn optional_columns_default_to_zero() {
        let csv = "Date,Open,High,Low,Close\n2024/02/01,1,2,0.5,1.5\n";
        let bar = &parse_bars(csv.as_bytes()).unwrap().bars[0];
        assert_eq!(bar.volume, 0.0);
        assert_eq!(bar.pct_change, 0.0);
    }

    #[test]
    fn missing_close_column_is_reported() {
        let csv = "Date,Open,High,Low\n2024-01-02,1,2,0.5\n";
        let err = parse_bars(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("close")));
    }

    #[test]
    fn malformed_fields_abort() {
        let bad_number = "Date,Open,High,Low,Close\n2024-01-02,1,2,0.5,abc\n";
        assert!(matches!(
            parse_bars(bad_number.as_bytes()).unwrap_err(),
            LoadError::MalformedNumber { column: "close", line: 2, .. }
        ));

        let bad_volume = "Date,Open,High,Low,Close,Volume\n2024-01-02,1,2,0.5,1,12X\n";
        assert!(matches!(
            parse_bars(bad_volume.as_bytes()).unwrap_err(),
            LoadError::MalformedVolume { .. }
        ));

        let bad_pct = "Date,Open,High,Low,Close,Change %\n2024-01-02,1,2,0.5,1,up%\n";
        assert!(matches!(
            parse_bars(bad_pct.as_bytes()).unwrap_err(),
            LoadError::MalformedPercent { .. }
        ));

        let bad_date = "Date,Open,High,Low,Close\nyesterday,1,2,0.5,1\n";
        assert!(matches!(
            parse_bars(bad_date.as_bytes()).unwrap_err(),
            LoadError::MalformedDate { .. }
        ));
    }

    #[test]
    fn duplicate_dates_are_rejected() {
        let csv = "Date,Open,High,Low,Close\n2024-01-02,1,2,0.5,1\n2024-01-02,1,2,0.5,1\n";
        let err = parse_bars(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateDate(_)));
    }

    #[test]
    fn header_only_is_empty() {
        let csv = "Date,Open,High,Low,Close\n";
        assert!(matches!(parse_bars(csv.as_bytes()).unwrap_err(), LoadError::Empty));
    }

    #[test]
    fn hash_is_order_independent_of_input_rows() {
        let reversed = "\
日期,收盘,开盘,高,低,交易量,涨跌幅
2024-01-02,10.00,9.80,10.10,9.70,1.2B,-0.50%
2024-01-03,10.20,10.00,10.30,9.90,12.5M,2.00%
";
        let a = parse_bars(CHINESE.as_bytes()).unwrap();
        let b = parse_bars(reversed.as_bytes()).unwrap();
        assert_eq!(a.dataset_hash, b.dataset_hash);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_bars(Path::new("/nonexistent/600016.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}

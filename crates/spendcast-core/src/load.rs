//! Expense record loading (CSV and JSON)
//!
//! Record stores export either a CSV with `date,amount,category` columns or a
//! JSON array of objects. Both are parsed into [`ImportedRecord`]s carrying an
//! identity hash so repeated exports can be merged with [`dedupe`].

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::ExpenseRecord;

/// A parsed record plus its identity hash
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedRecord {
    pub record: ExpenseRecord,
    pub import_hash: String,
}

/// Supported record file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Csv,
    Json,
}

impl RecordFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Load, parse and deduplicate a record file
pub fn load_file(path: &Path) -> Result<Vec<ExpenseRecord>> {
    let format = RecordFormat::from_path(path).ok_or_else(|| {
        Error::Import(format!(
            "Unsupported record file (expected .csv or .json): {}",
            path.display()
        ))
    })?;
    let file = File::open(path)?;

    let imported = match format {
        RecordFormat::Csv => parse_csv(file)?,
        RecordFormat::Json => parse_json(file)?,
    };

    let total = imported.len();
    let records = dedupe(imported);
    debug!(
        path = %path.display(),
        total,
        unique = records.len(),
        "Loaded expense records"
    );
    Ok(records)
}

/// Column positions resolved from the header row
struct Columns {
    date: usize,
    amount: usize,
    category: usize,
    id: Option<usize>,
    note: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.contains(&h.trim().to_lowercase().as_str()))
        };

        Ok(Self {
            date: find(&["date", "expense_date"])
                .ok_or_else(|| Error::Import("Missing date column".into()))?,
            amount: find(&["amount"])
                .ok_or_else(|| Error::Import("Missing amount column".into()))?,
            category: find(&["category"])
                .ok_or_else(|| Error::Import("Missing category column".into()))?,
            id: find(&["id"]),
            note: find(&["description", "note"]),
        })
    }
}

/// Parse a CSV export with a header row
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<ImportedRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut records = Vec::new();

    for (line, result) in rdr.records().enumerate() {
        let row = result?;
        // Header is line 1
        let line = line + 2;

        let field = |idx: usize, name: &str| {
            row.get(idx)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| Error::Import(format!("Missing {} on line {}", name, line)))
        };

        let date = parse_date(field(columns.date, "date")?)?;
        let amount = parse_amount(field(columns.amount, "amount")?)?;
        let category = field(columns.category, "category")?.to_string();
        let identity = columns
            .id
            .and_then(|i| row.get(i))
            .filter(|s| !s.is_empty())
            .or_else(|| columns.note.and_then(|i| row.get(i)));

        records.push(imported(date, amount, category, identity)?);
    }

    debug!("Parsed {} CSV expense records", records.len());
    Ok(records)
}

/// JSON record as exported by the record store
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(alias = "expense_date")]
    date: String,
    amount: f64,
    category: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default, alias = "note")]
    description: Option<String>,
}

/// Parse a JSON array of records
pub fn parse_json<R: Read>(reader: R) -> Result<Vec<ImportedRecord>> {
    let raw: Vec<RawRecord> = serde_json::from_reader(reader)?;
    let records = raw
        .into_iter()
        .map(|r| {
            let date = parse_date(&r.date)?;
            let identity = r.id.as_deref().or(r.description.as_deref());
            imported(date, r.amount, r.category, identity)
        })
        .collect::<Result<Vec<_>>>()?;

    debug!("Parsed {} JSON expense records", records.len());
    Ok(records)
}

/// Drop records whose identity hash was already seen, keeping the first
pub fn dedupe(records: Vec<ImportedRecord>) -> Vec<ExpenseRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(r.import_hash.clone()))
        .map(|r| r.record)
        .collect()
}

fn imported(
    date: NaiveDate,
    amount: f64,
    category: String,
    identity: Option<&str>,
) -> Result<ImportedRecord> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidData(format!(
            "Expense amount must be a non-negative number, got {} on {}",
            amount, date
        )));
    }
    let category = category.trim().to_string();
    if category.is_empty() {
        return Err(Error::InvalidData(format!("Missing category on {}", date)));
    }

    let import_hash = generate_hash(&date, amount, &category, identity);
    Ok(ImportedRecord {
        record: ExpenseRecord::new(date, amount, category),
        import_hash,
    })
}

/// Generate an identity hash for deduplication
fn generate_hash(date: &NaiveDate, amount: f64, category: &str, identity: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(date.to_string().as_bytes());
    hasher.update(format!("{:.2}", amount).as_bytes());
    hasher.update(category.as_bytes());
    if let Some(identity) = identity {
        hasher.update(identity.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Parse a date string in various common formats
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    // Timestamps from the record store carry a time part; keep the date
    let s = s.split('T').next().unwrap_or(s);

    let formats = [
        "%Y-%m-%d", // 2024-01-15
        "%m/%d/%Y", // 01/15/2024
        "%m/%d/%y", // 01/15/24
        "%Y/%m/%d", // 2024/01/15
        "%m-%d-%Y", // 01-15-2024
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    Err(Error::Import(format!("Unable to parse date: {}", s)))
}

/// Parse an amount string, handling currency symbols and thousands separators
pub fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s.trim().replace(['$', '¥', '€', '£', ',', ' '], "");

    cleaned
        .parse::<f64>()
        .map_err(|_| Error::Import(format!("Unable to parse amount: {}", s)))
}

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde_json::Value;

use crate::state::band_model::{self, BandRow};

/// A sheet as exported with a header row: first entry names the columns.
pub type SheetMatrix = Vec<Vec<Value>>;

#[derive(Debug)]
pub enum SourceError {
    Io(io::Error),
    Parse(serde_json::Error),
    NotAWorkbook,
    MalformedSheet { band: String, reason: String },
    EmptySource,
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Io(e) => write!(f, "IO error: {e}"),
            SourceError::Parse(e) => write!(f, "Workbook parse error: {e}"),
            SourceError::NotAWorkbook => write!(f, "Workbook root is not an object of sheets"),
            SourceError::MalformedSheet { band, reason } => {
                write!(f, "Sheet '{band}' is malformed: {reason}")
            }
            SourceError::EmptySource => write!(f, "Sheet has no data rows"),
        }
    }
}

impl std::error::Error for SourceError {}

impl From<io::Error> for SourceError {
    fn from(e: io::Error) -> Self {
        SourceError::Io(e)
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(e: serde_json::Error) -> Self {
        SourceError::Parse(e)
    }
}

/// Yields the rows of a band, or `SourceError::EmptySource` when there are none.
pub trait BandSource {
    fn fetch_rows(&self, band: &str) -> Result<Vec<BandRow>, SourceError>;
}

/// Every band sheet of a workbook, keyed by band name.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Workbook {
    sheets: BTreeMap<String, SheetMatrix>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sheets(sheets: BTreeMap<String, SheetMatrix>) -> Self {
        Self { sheets }
    }

    pub fn band_names(&self) -> Vec<String> {
        self.sheets.keys().cloned().collect()
    }

    pub fn sheet(&self, band: &str) -> Option<&SheetMatrix> {
        self.sheets.get(band)
    }

    pub fn insert_sheet(&mut self, band: impl Into<String>, sheet: SheetMatrix) {
        self.sheets.insert(band.into(), sheet);
    }
}

impl BandSource for Workbook {
    fn fetch_rows(&self, band: &str) -> Result<Vec<BandRow>, SourceError> {
        match self.sheets.get(band) {
            Some(sheet) => decode_sheet(sheet),
            None => {
                tracing::debug!(band, "no sheet for band");
                Err(SourceError::EmptySource)
            }
        }
    }
}

pub fn parse_workbook(content: &str) -> Result<Workbook, SourceError> {
    let value: Value = serde_json::from_str(content)?;

    let Value::Object(map) = value else {
        return Err(SourceError::NotAWorkbook);
    };

    let mut sheets = BTreeMap::new();
    for (band, sheet) in map {
        let Value::Array(entries) = sheet else {
            return Err(malformed(&band, "sheet is not an array"));
        };
        let mut matrix = Vec::with_capacity(entries.len());
        for (idx, entry) in entries.into_iter().enumerate() {
            match entry {
                Value::Array(cells) => matrix.push(cells),
                _ => return Err(malformed(&band, &format!("entry {idx} is not an array"))),
            }
        }
        sheets.insert(band, matrix);
    }

    Ok(Workbook { sheets })
}

pub fn load_workbook(path: &Path) -> Result<Workbook, SourceError> {
    let content = fs::read_to_string(path)?;
    parse_workbook(&content)
}

/// Reads the workbook without blocking the runtime; parsing happens after the read.
pub async fn load_workbook_async(path: &Path) -> Result<Workbook, SourceError> {
    let content = tokio::fs::read_to_string(path).await?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "workbook read");
    parse_workbook(&content)
}

/// Decodes the data rows of a sheet against its header row.
///
/// A sheet needs the header plus at least two data rows.
pub fn decode_sheet(sheet: &[Vec<Value>]) -> Result<Vec<BandRow>, SourceError> {
    if sheet.len() < 3 {
        return Err(SourceError::EmptySource);
    }

    let header: Vec<String> = sheet[0].iter().map(band_model::display_value).collect();
    Ok(sheet[1..]
        .iter()
        .map(|cells| decode_row(&header, cells))
        .collect())
}

fn decode_row(header: &[String], cells: &[Value]) -> BandRow {
    let mut row = BandRow::default();

    for (name, cell) in header.iter().zip(cells.iter()) {
        match name.as_str() {
            "master" => row.master = cell.clone(),
            "start" => row.start = band_model::number_value(cell).unwrap_or(0.0),
            "end" => row.end = band_model::number_value(cell).unwrap_or(0.0),
            "service" => row.service = band_model::display_value(cell),
            "remark" => row.remark = band_model::display_value(cell),
            "content" => row.content = band_model::display_value(cell),
            "Item_No" | "itemNo" | "item_no" => row.item_no = band_model::integer_value(cell),
            "truncated" => {
                row.truncated = band_model::is_truthy(cell).then(|| band_model::display_value(cell))
            }
            "vertical" => row.vertical = band_model::is_truthy(cell),
            "hex" => {
                row.hex = band_model::is_truthy(cell).then(|| band_model::display_value(cell))
            }
            _ => {
                row.extra.insert(name.clone(), cell.clone());
            }
        }
    }

    row
}

fn malformed(band: &str, reason: &str) -> SourceError {
    SourceError::MalformedSheet {
        band: band.to_string(),
        reason: reason.to_string(),
    }
}

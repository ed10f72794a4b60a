use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::state::layout::PageLayout;

#[derive(Debug)]
pub enum WindowIoError {
    Io(io::Error),
    Serialize(serde_json::Error),
}

impl std::fmt::Display for WindowIoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowIoError::Io(e) => write!(f, "IO error: {e}"),
            WindowIoError::Serialize(e) => write!(f, "Page export error: {e}"),
        }
    }
}

impl std::error::Error for WindowIoError {}

impl From<io::Error> for WindowIoError {
    fn from(e: io::Error) -> Self {
        WindowIoError::Io(e)
    }
}

impl From<serde_json::Error> for WindowIoError {
    fn from(e: serde_json::Error) -> Self {
        WindowIoError::Serialize(e)
    }
}

/// On-disk shape of an exported page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageExport {
    pub band: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub layout: PageLayout,
}

pub fn page_to_json(export: &PageExport) -> Result<String, WindowIoError> {
    Ok(serde_json::to_string_pretty(export)?)
}

pub fn save_page(path: &Path, export: &PageExport) -> Result<(), WindowIoError> {
    let json = page_to_json(export)?;
    super::atomic_write_string(path, &json)?;
    tracing::debug!(path = %path.display(), "page exported");
    Ok(())
}

pub fn load_page(path: &Path) -> Result<PageExport, WindowIoError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

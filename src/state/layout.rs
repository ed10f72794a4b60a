use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::aggregator;
use crate::state::band_model::{self, BandRow, PageWindow};
use crate::state::selection::Selection;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BlockLabel {
    Full {
        service: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        remark: Option<String>,
    },
    Truncated {
        text: String,
    },
}

impl BlockLabel {
    pub fn for_row(row: &BandRow) -> Self {
        match row.truncated.as_deref() {
            Some(text) if !text.is_empty() => BlockLabel::Truncated {
                text: text.to_string(),
            },
            _ => BlockLabel::Full {
                service: row.service.clone(),
                remark: (!row.remark.is_empty()).then(|| row.remark.clone()),
            },
        }
    }

    pub fn text(&self) -> String {
        match self {
            BlockLabel::Full {
                service,
                remark: Some(remark),
            } => format!("{service} ({remark})"),
            BlockLabel::Full { service, .. } => service.clone(),
            BlockLabel::Truncated { text } => text.clone(),
        }
    }
}

/// One clickable block inside a segment column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockLayout {
    pub item_no: Option<i64>,
    pub label: BlockLabel,
    pub tooltip: String,
    pub height_share: f64,
    pub vertical: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
    pub scoped: bool,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentLayout {
    pub master: Value,
    pub width_fraction: f64,
    pub start_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_label: Option<String>,
    pub blocks: Vec<BlockLayout>,
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct PageLayout {
    pub page: usize,
    pub total_pages: usize,
    pub span_length: f64,
    pub segments: Vec<SegmentLayout>,
}

impl PageLayout {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Builds the sizing and labelling model of a page window.
///
/// Only the segment in the last slot of a full page carries an end label.
pub fn layout_page(window: &PageWindow, page_size: usize, selection: &Selection) -> PageLayout {
    let segments = window
        .segments
        .iter()
        .enumerate()
        .map(|(idx, segment)| {
            let height_share = 1.0 / segment.rows.len().max(1) as f64;
            let blocks = segment
                .rows
                .iter()
                .map(|row| BlockLayout {
                    item_no: row.item_no,
                    label: BlockLabel::for_row(row),
                    tooltip: row.service.clone(),
                    height_share,
                    vertical: row.vertical,
                    hex: row.hex.clone(),
                    scoped: selection.is_scoped(row.item_no),
                    active: selection.is_active(row.item_no),
                })
                .collect();

            SegmentLayout {
                master: segment.master.clone(),
                width_fraction: aggregator::layout_width(
                    segment.start,
                    segment.end,
                    window.span_length,
                ),
                start_label: band_model::display_extent(segment.start),
                end_label: (idx + 1 == page_size)
                    .then(|| band_model::display_extent(segment.end)),
                blocks,
            }
        })
        .collect();

    PageLayout {
        page: window.page,
        total_pages: window.total_pages,
        span_length: window.span_length,
        segments,
    }
}

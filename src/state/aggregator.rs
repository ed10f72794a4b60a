use std::collections::BTreeMap;

use crate::state::band_model::{self, BandRow, PageWindow, Segment};

pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Share of the page width the segments of one page fill together.
const WIDTH_FILL: f64 = 0.95;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BandError {
    EmptySource,
    PageOutOfRange { page: usize, total_pages: usize },
}

impl std::fmt::Display for BandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BandError::EmptySource => write!(f, "band source has no data rows"),
            BandError::PageOutOfRange { page, total_pages } => {
                write!(f, "page {page} is outside 1..={}", (*total_pages).max(1))
            }
        }
    }
}

impl std::error::Error for BandError {}

/// Groups data rows into one segment per distinct truthy `master`.
///
/// Segments come out in first-occurrence order and each keeps every row
/// sharing its `master`, in input order. Fewer than two rows is an empty
/// source.
pub fn group_segments(rows: &[BandRow]) -> Result<Vec<Segment>, BandError> {
    if rows.len() < 2 {
        return Err(BandError::EmptySource);
    }

    let mut index_by_key: BTreeMap<String, usize> = BTreeMap::new();
    let mut segments: Vec<Segment> = Vec::new();
    let mut dropped = 0usize;

    for row in rows {
        let Some(key) = band_model::master_key(&row.master) else {
            dropped += 1;
            continue;
        };

        match index_by_key.get(&key).copied() {
            Some(idx) => segments[idx].rows.push(row.clone()),
            None => {
                index_by_key.insert(key, segments.len());
                segments.push(Segment {
                    master: row.master.clone(),
                    start: row.start,
                    end: row.end,
                    vertical: row.vertical,
                    rows: vec![row.clone()],
                });
            }
        }
    }

    if dropped > 0 {
        tracing::warn!(
            dropped,
            total = rows.len(),
            "rows without a master were left out of grouping"
        );
    }
    tracing::debug!(segments = segments.len(), "grouped band rows");

    Ok(segments)
}

pub fn total_pages(segment_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    segment_count.div_ceil(page_size)
}

/// Computes the window of segments shown on a 1-based `page`.
pub fn paginate(
    segments: &[Segment],
    page: usize,
    page_size: usize,
) -> Result<PageWindow, BandError> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(segments.len(), page_size);

    if page == 0 || page > total_pages.max(1) {
        return Err(BandError::PageOutOfRange { page, total_pages });
    }

    if segments.is_empty() {
        return Ok(PageWindow {
            page,
            total_pages,
            segments: Vec::new(),
            span_length: 0.0,
        });
    }

    let from = (page - 1) * page_size;
    let to = (page * page_size).min(segments.len());
    let visible = segments[from..to].to_vec();

    // Short last pages measure against the real final segment.
    let first = &segments[from];
    let last = if page < total_pages {
        &segments[page * page_size - 1]
    } else {
        &segments[segments.len() - 1]
    };
    let span_length = (first.start - last.end).abs();

    Ok(PageWindow {
        page,
        total_pages,
        segments: visible,
        span_length,
    })
}

/// Fraction of the page width a segment spanning `start..end` occupies.
pub fn layout_width(start: f64, end: f64, span_length: f64) -> f64 {
    match width_ratio(start, end, span_length) {
        Some(ratio) => ratio * WIDTH_FILL,
        None => 0.0,
    }
}

fn width_ratio(start: f64, end: f64, span_length: f64) -> Option<f64> {
    if span_length == 0.0 || !span_length.is_finite() {
        return None;
    }
    let ratio = (start - end).abs() / span_length;
    ratio.is_finite().then_some(ratio)
}

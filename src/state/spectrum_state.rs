use crate::io::workbook_io::{BandSource, SourceError};
use crate::state::aggregator::{self, DEFAULT_PAGE_SIZE};
use crate::state::band_model::{BandRow, PageWindow, Segment};
use crate::state::layout::{self, PageLayout};
use crate::state::selection::Selection;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionField {
    Scope,
}

impl SelectionField {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionField::Scope => "scope",
        }
    }
}

/// Receives the notifications the parent view reacts to.
pub trait SpectrumObserver {
    fn on_content_changed(&mut self, content: &str);
    fn on_selection_changed(&mut self, field: SelectionField, value: Option<i64>);
}

/// Observer that ignores every notification.
impl SpectrumObserver for () {
    fn on_content_changed(&mut self, _content: &str) {}
    fn on_selection_changed(&mut self, _field: SelectionField, _value: Option<i64>) {}
}

/// Derived band state owned by the host. Segments are rebuilt on every band
/// load and the window on every page, segment or page-count change.
#[derive(Clone, Debug, PartialEq)]
pub struct SpectrumState {
    band: Option<String>,
    segments: Vec<Segment>,
    page: usize,
    page_size: usize,
    total_pages: usize,
    window: PageWindow,
}

impl Default for SpectrumState {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectrumState {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            band: None,
            segments: Vec::new(),
            page: 1,
            page_size: page_size.max(1),
            total_pages: 0,
            window: PageWindow {
                page: 1,
                ..PageWindow::default()
            },
        }
    }

    pub fn band(&self) -> Option<&str> {
        self.band.as_deref()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn window(&self) -> &PageWindow {
        &self.window
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Replaces the segments with a grouping of `rows` and returns to page 1.
    ///
    /// Fewer than two rows, or rows that all lack a master, reset the state
    /// instead of failing.
    pub fn load_band(
        &mut self,
        band: &str,
        rows: &[BandRow],
        observer: &mut impl SpectrumObserver,
    ) {
        let segments = match aggregator::group_segments(rows) {
            Ok(segments) if !segments.is_empty() => segments,
            Ok(_) => {
                tracing::warn!(band, "no row in band carries a master, resetting");
                self.reset_with_band(Some(band), observer);
                return;
            }
            Err(err) => {
                tracing::debug!(band, %err, "resetting");
                self.reset_with_band(Some(band), observer);
                return;
            }
        };

        self.band = Some(band.to_string());
        self.total_pages = aggregator::total_pages(segments.len(), self.page_size);
        self.segments = segments;
        self.page = 1;
        self.recompute_window();

        tracing::info!(
            band,
            segments = self.segments.len(),
            pages = self.total_pages,
            "band loaded"
        );

        let content = self
            .segments
            .first()
            .and_then(Segment::first_content)
            .unwrap_or_default()
            .to_string();
        observer.on_content_changed(&content);
    }

    /// Fetches `band` from `source` and loads it. An empty or missing sheet
    /// resets; any other source failure is returned and leaves the state as is.
    pub fn load_from_source<S: BandSource + ?Sized>(
        &mut self,
        source: &S,
        band: &str,
        observer: &mut impl SpectrumObserver,
    ) -> Result<(), SourceError> {
        match source.fetch_rows(band) {
            Ok(rows) => {
                self.load_band(band, &rows, observer);
                Ok(())
            }
            Err(SourceError::EmptySource) => {
                tracing::info!(band, "band has no data rows, resetting");
                self.reset_with_band(Some(band), observer);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    pub fn reset(&mut self, observer: &mut impl SpectrumObserver) {
        self.reset_with_band(None, observer);
    }

    /// Moves to `page`, clamped into the valid range. Returns the page used.
    pub fn set_page(&mut self, page: usize) -> usize {
        let clamped = page.clamp(1, self.total_pages.max(1));
        if clamped != page {
            tracing::debug!(requested = page, clamped, "page clamped");
        }
        self.page = clamped;
        self.recompute_window();
        clamped
    }

    /// Handles a click on the block for `item_no`.
    ///
    /// Returns false, without notifying, when no row carries that number.
    pub fn select(&self, item_no: i64, observer: &mut impl SpectrumObserver) -> bool {
        let Some(row) = self.find_row(item_no) else {
            return false;
        };
        let content = row.content.clone();
        observer.on_selection_changed(SelectionField::Scope, Some(item_no));
        observer.on_content_changed(&content);
        true
    }

    pub fn find_row(&self, item_no: i64) -> Option<&BandRow> {
        self.segments
            .iter()
            .flat_map(|segment| segment.rows.iter())
            .find(|row| row.item_no == Some(item_no))
    }

    pub fn page_layout(&self, selection: &Selection) -> PageLayout {
        layout::layout_page(&self.window, self.page_size, selection)
    }

    fn reset_with_band(&mut self, band: Option<&str>, observer: &mut impl SpectrumObserver) {
        self.band = band.map(str::to_string);
        self.segments.clear();
        self.total_pages = 0;
        self.page = 1;
        self.recompute_window();
        observer.on_selection_changed(SelectionField::Scope, None);
        observer.on_content_changed("");
    }

    fn recompute_window(&mut self) {
        self.window = match aggregator::paginate(&self.segments, self.page, self.page_size) {
            Ok(window) => window,
            Err(err) => {
                // page is clamped before every recompute
                tracing::error!(%err, "window out of range, showing nothing");
                PageWindow {
                    page: self.page,
                    total_pages: self.total_pages,
                    ..PageWindow::default()
                }
            }
        };
    }
}

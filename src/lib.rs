pub mod io;
pub mod state;

pub use io::workbook_io::{BandSource, SourceError, Workbook};
pub use state::aggregator::{group_segments, layout_width, paginate, BandError, DEFAULT_PAGE_SIZE};
pub use state::band_model::{BandRow, PageWindow, Segment};
pub use state::selection::Selection;
pub use state::spectrum_state::{SelectionField, SpectrumObserver, SpectrumState};

pub mod aggregator;
pub mod band_model;
pub mod layout;
pub mod selection;
pub mod spectrum_state;

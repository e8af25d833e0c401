//! Data ingestion, roll-up and normalisation layer.

pub mod aggregate;
pub mod arcgis;
pub mod normalize;
pub mod records;
pub mod store;

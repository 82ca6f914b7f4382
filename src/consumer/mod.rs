//! Consumer-side state built from incoming messages.
//!
//! - [`TileStore`]: latest payload per tile, with stale-payload rejection
//! - [`GpsTrackPoints`]: GPS track assembled from add/remove deltas

mod gps_track;
mod tiles;

pub use gps_track::GpsTrackPoints;
pub use tiles::TileStore;

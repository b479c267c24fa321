pub mod markers;
pub mod selection;
pub mod surface;

pub use markers::{MapMarker, MarkerStore};
pub use selection::{SelectionController, SelectionState};
pub use surface::{MapSurface, ViewCommand, ViewQueue, DEFAULT_DEPOT};

//! The sketch engine: geometry construction, history, snapping, and
//! measurement for a single feature drawn on the map canvas.
//!
//! Everything in here is rendering-agnostic. The state machine operates on
//! lon/lat coordinate rings; the bevy glue in [`crate::editor`] forwards
//! pointer events into it and projects its output back onto the screen.
//!
//! ## Module Structure
//!
//! - [`ring`] - [`CoordinateRing`] and [`GeometryKind`]
//! - [`history`] - [`RingHistory`] undo/redo snapshot stacks
//! - [`snap`] - Snap-target search over reference geometries
//! - [`session`] - [`DrawSession`] state machine (Idle/Sketching/Finished)
//! - [`measure`] - Per-segment measurement rows and TSV export
//! - [`geojson`] - GeoJSON geometry serialization

mod geojson;
mod history;
mod measure;
mod ring;
mod session;
mod snap;

pub use geojson::geometry_json;
pub use history::RingHistory;
pub use measure::{export_table, measure_rows, summarize, MeasureRow, MeasureSummary};
pub use ring::{rectangle_ring, CoordinateRing, GeometryKind};
pub use session::{CommittedFeature, DrawSession, SketchPhase};
pub use snap::{find_snap_target, SnapSources, SnapTarget};

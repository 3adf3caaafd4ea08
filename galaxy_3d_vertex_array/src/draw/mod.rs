/// Draw module - rendering context, draw engines and array locking

pub mod context;
pub mod cva;
pub mod draw_arrays;
pub mod draw_elements;

pub use context::{Context, DrawStats, RecordingMode};
pub use cva::{CvaState, LockPhase, PendingElements};

/// Array module - client array descriptors, conversion and state summary

pub mod types;
pub mod convert;
pub mod summary;
pub mod array_store;
pub mod interleaved;

pub use types::*;
pub use convert::{ClientArray, Component, Converter, EltFn, RangeFn};
pub use summary::{ArraySummary, VertexFlags, MAX_TEXTURE_UNITS};
pub use array_store::{ArrayDescriptor, ArrayStore};
pub use interleaved::{ColorField, InterleavedFormat, InterleavedLayout};

//! Re-parameterization of trimmed B-rep faces.
//!
//! An imported face arrives as a raw analytic or freeform surface plus
//! boundary loops of heterogeneous curve segments. This crate rebuilds each
//! face on canonical geometry: the surface becomes a tensor-product rational
//! B-spline, every loop is merged into one composite curve with a single
//! monotone parameterization, and each composite is projected into the
//! surface's (u, v) domain as a trim curve. The rebuilt faces can then be
//! sampled into a JSON document and queried for point containment in the
//! parameter domain.
//!
//! [`pipeline::process_shape`] runs the whole thing over a
//! [`topology::shape::ShapeStore`]; the stage modules under [`pipeline`] are
//! usable individually.

pub mod error;
pub mod export;
pub mod geometry;
pub mod pipeline;
pub mod topology;

pub use error::FaceError;
pub use export::{FaceEntry, PcurveSamples, ShapeDocument, SurfaceBounds};
pub use pipeline::classify::{classify_grid, classify_point, Classification};
pub use pipeline::{process_shape, FaceFailure, PipelineConfig, RunReport};

use thiserror::Error;

/// Structured failure information for the per-face pipeline.
///
/// Every variant is scoped to a single face: the driver records it together
/// with the face identifier and moves on to the next face.
#[derive(Debug, Clone, Error)]
pub enum FaceError {
    /// The raw surface cannot be expressed as a finite-degree tensor-product
    /// rational B-spline (e.g. unbounded or non-finite parameter range).
    #[error("surface kind {kind} cannot be canonicalized: {reason}")]
    UnsupportedSurfaceKind { kind: &'static str, reason: &'static str },

    /// No (u, v) path stayed within the projection tolerance over the full
    /// parameter interval of the composite curve.
    #[error("projection deviation {max_deviation} exceeds tolerance {tolerance}")]
    ProjectionToleranceExceeded { max_deviation: f64, tolerance: f64 },

    /// Discretization was requested for a boundary segment that has no
    /// attached trim curve.
    #[error("boundary segment has no attached trim curve")]
    NoTrimCurve,

    /// A loop yields zero usable boundary segments after skipping
    /// degeneracies.
    #[error("loop has no usable boundary segments ({skipped} degenerate skipped)")]
    DegenerateLoop { skipped: usize },
}

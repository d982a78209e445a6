//! Boundary Discretizer: uniform sampling of trim curves into the arrays the
//! exporter writes out.

use tracing::debug;

use crate::error::FaceError;
use crate::export::{FaceEntry, PcurveSamples, SurfaceBounds};

use super::projector::TrimCurve;
use super::reconstruct::{RebuiltFace, RebuiltLoop};

/// Sample `trim` at `n` uniform parameters.
///
/// The step is `(last - first) / n`, so the first sample sits exactly at the
/// interval start and the last one step short of the end. For a closed loop
/// this avoids duplicating the seam point.
pub fn discretize_trim(trim: &TrimCurve, n: usize) -> PcurveSamples {
    let n = n.max(1);
    let t0 = trim.first_parameter();
    let step = (trim.last_parameter() - t0) / n as f64;

    let mut samples = PcurveSamples::with_capacity(n);
    for i in 0..n {
        let uv = trim.evaluate(t0 + step * i as f64);
        samples.push(uv.u, uv.v);
    }
    samples
}

/// Sample one rebuilt loop, failing if it was never projected.
pub fn discretize_loop(rebuilt: &RebuiltLoop, n: usize) -> Result<PcurveSamples, FaceError> {
    let trim = rebuilt.trim.as_ref().ok_or(FaceError::NoTrimCurve)?;
    Ok(discretize_trim(trim, n))
}

/// Build the export entry for a rebuilt face: surface bounds plus `n`
/// samples per boundary loop, inner loops in source order.
pub fn discretize_face(face: &RebuiltFace, n: usize) -> Result<FaceEntry, FaceError> {
    let (u1, u2, v1, v2) = face.surface.bounds();
    let outer_pcurve = discretize_loop(&face.outer, n)?;
    let inner_pcurves = face
        .inners
        .iter()
        .map(|inner| discretize_loop(inner, n))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        samples = n,
        inner_loops = inner_pcurves.len(),
        "face discretized"
    );
    Ok(FaceEntry {
        surface_bounds: SurfaceBounds { u1, u2, v1, v2 },
        outer_pcurve,
        inner_pcurves,
    })
}

//! The face re-parameterization pipeline.
//!
//! Stages run per face: canonicalize the surface, compose each boundary loop
//! into one curve, project it into the surface's (u, v) domain, then sample
//! the trim curves and classify points for export. [`process_shape`] drives
//! the whole pipeline over a store of imported faces.

pub mod classify;
pub mod compositor;
pub mod discretize;
pub mod projector;
pub mod reconstruct;

use tracing::{debug, info, instrument, warn};

use crate::error::FaceError;
use crate::export::{FaceEntry, ShapeDocument};
use crate::topology::shape::{Face, FaceId, ShapeStore};

use discretize::discretize_face;
use reconstruct::rebuild_face;

/// Tolerances and resource budgets shared by the pipeline stages.
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    /// Maximum end-to-start distance treated as a clean join between
    /// consecutive boundary segments.
    pub join_tolerance: f64,
    /// Maximum 3-D deviation accepted between a composite curve and its
    /// projection re-evaluated on the surface.
    pub projection_tolerance: f64,
    /// Distance in the (u, v) domain under which a query point counts as
    /// lying on a boundary.
    pub classification_tolerance: f64,
    /// Points sampled along a composite curve when projecting it.
    pub projection_samples: usize,
    /// Iteration budget per projected point.
    pub max_projection_iterations: u32,
    /// Points sampled per trim curve in the exported document.
    pub export_samples: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            join_tolerance: 1e-4,
            projection_tolerance: 1e-4,
            classification_tolerance: 1e-3,
            projection_samples: 129,
            max_projection_iterations: 32,
            export_samples: 256,
        }
    }
}

impl PipelineConfig {
    /// Looser tolerances for models with sloppy joins.
    pub fn relaxed() -> Self {
        Self {
            join_tolerance: 1e-2,
            projection_tolerance: 1e-2,
            classification_tolerance: 1e-2,
            ..Self::default()
        }
    }

    /// Tighter tolerances and denser sampling for high-precision export.
    pub fn precise() -> Self {
        Self {
            join_tolerance: 1e-6,
            projection_tolerance: 1e-6,
            projection_samples: 513,
            max_projection_iterations: 64,
            export_samples: 1024,
            ..Self::default()
        }
    }
}

/// A face the pipeline could not process, with the stage error.
#[derive(Debug, Clone)]
pub struct FaceFailure {
    pub face_id: FaceId,
    pub label: String,
    pub error: FaceError,
}

/// Outcome of a whole-shape run: the exported document plus the faces that
/// were skipped with their errors.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub document: ShapeDocument,
    pub failures: Vec<FaceFailure>,
}

impl RunReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run the pipeline over every face in the store that `filter` accepts.
///
/// Faces are visited in insertion order and labelled `FACE_{index}` by that
/// order. A failing face is recorded and skipped; it never aborts the run.
#[instrument(skip(store, config, filter))]
pub fn process_shape<F>(store: &ShapeStore, config: &PipelineConfig, filter: F) -> RunReport
where
    F: Fn(FaceId, &Face) -> bool,
{
    let mut document = ShapeDocument::new();
    let mut failures = Vec::new();
    let total = store.faces.len();

    for (index, (face_id, face)) in store.faces.iter().enumerate() {
        let label = format!("FACE_{index}");
        if !filter(face_id, face) {
            debug!(label, "face filtered out");
            continue;
        }
        info!(
            label,
            total,
            surface = face.surface.surface_type_name(),
            loops = face.loop_count(),
            "processing face"
        );
        match process_face(store, face_id, config) {
            Ok(entry) => {
                document.insert(label, entry);
            }
            Err(error) => {
                warn!(label, %error, "face skipped");
                failures.push(FaceFailure {
                    face_id,
                    label,
                    error,
                });
            }
        }
    }

    info!(
        exported = document.len(),
        failed = failures.len(),
        "shape processed"
    );
    RunReport { document, failures }
}

fn process_face(
    store: &ShapeStore,
    face_id: FaceId,
    config: &PipelineConfig,
) -> Result<FaceEntry, FaceError> {
    let rebuilt = rebuild_face(store, face_id, config)?;
    discretize_face(&rebuilt, config.export_samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::surfaces::{Plane, Surface};
    use crate::topology::primitives::{make_plate_with_hole, make_rectangular_face};

    #[test]
    fn test_process_shape_labels_faces_in_order() {
        let mut store = ShapeStore::new();
        make_rectangular_face(&mut store, 1.0, 1.0);
        make_rectangular_face(&mut store, 2.0, 2.0);

        let report = process_shape(&store, &PipelineConfig::default(), |_, _| true);
        assert!(report.is_complete());
        assert_eq!(report.document.len(), 2);
        assert!(report.document.get("FACE_0").is_some());
        assert!(report.document.get("FACE_1").is_some());
    }

    #[test]
    fn test_filter_selects_single_face() {
        let mut store = ShapeStore::new();
        make_rectangular_face(&mut store, 1.0, 1.0);
        make_plate_with_hole(&mut store, 10.0, 6.0, 5.0, 3.0, 1.0);

        let report = process_shape(&store, &PipelineConfig::default(), |_, face| {
            face.inner_loops.len() == 1
        });
        assert_eq!(report.document.len(), 1);
        let entry = report.document.get("FACE_1").unwrap();
        assert_eq!(entry.inner_pcurves.len(), 1);
    }

    #[test]
    fn test_failing_face_is_recorded_not_fatal() {
        let mut store = ShapeStore::new();
        make_rectangular_face(&mut store, 1.0, 1.0);
        // Degenerate parameter bounds make the second face unprocessable.
        store.add_face(Surface::Plane(Plane::xy()), (0.0, 0.0), (0.0, 1.0), vec![]);

        let report = process_shape(&store, &PipelineConfig::default(), |_, _| true);
        assert_eq!(report.document.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].label, "FACE_1");
    }
}

//! Face Reconstructor: replaces a face's raw geometry with the canonical
//! surface and per-loop composite + trim curves.

use tracing::{debug, info, instrument};

use crate::error::FaceError;
use crate::geometry::convert::ParametricSurface;
use crate::topology::shape::{FaceId, LoopId, ShapeStore};

use super::compositor::{compose_loop, CompositeCurve};
use super::projector::{project_curve, TrimCurve};
use super::PipelineConfig;

/// One boundary loop after reconstruction: the merged 3-D curve and, once
/// projected, its trim curve in the surface domain.
#[derive(Debug, Clone)]
pub struct RebuiltLoop {
    pub composite: CompositeCurve,
    pub trim: Option<TrimCurve>,
}

/// A face rebuilt on canonical geometry. Loop structure mirrors the source
/// face: one outer loop, inner loops in their original order.
#[derive(Debug, Clone)]
pub struct RebuiltFace {
    pub surface: ParametricSurface,
    pub outer: RebuiltLoop,
    pub inners: Vec<RebuiltLoop>,
}

impl RebuiltFace {
    pub fn loop_count(&self) -> usize {
        1 + self.inners.len()
    }

    /// All rebuilt loops, outer first.
    pub fn loops(&self) -> impl Iterator<Item = &RebuiltLoop> {
        std::iter::once(&self.outer).chain(self.inners.iter())
    }
}

fn rebuild_loop(
    store: &ShapeStore,
    loop_id: LoopId,
    surface: &ParametricSurface,
    config: &PipelineConfig,
) -> Result<RebuiltLoop, FaceError> {
    let composite = compose_loop(store, loop_id, config.join_tolerance)?;
    let trim = project_curve(
        &composite,
        surface,
        config.projection_tolerance,
        config.projection_samples,
        config.max_projection_iterations,
    )?;
    Ok(RebuiltLoop {
        composite,
        trim: Some(trim),
    })
}

/// Rebuild one face: canonicalize the surface once, then compose and project
/// every loop against it. Any stage error fails the whole face.
#[instrument(skip(store, config))]
pub fn rebuild_face(
    store: &ShapeStore,
    face_id: FaceId,
    config: &PipelineConfig,
) -> Result<RebuiltFace, FaceError> {
    let face = &store.faces[face_id];
    let surface = ParametricSurface::from_raw(&face.surface, face.u_bounds, face.v_bounds)?;

    debug!(loop_kind = "outer", "rebuilding loop");
    let outer = rebuild_loop(store, face.outer_loop, &surface, config)?;
    let inners = face
        .inner_loops
        .iter()
        .map(|&loop_id| {
            debug!(loop_kind = "inner", "rebuilding loop");
            rebuild_loop(store, loop_id, &surface, config)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let rebuilt = RebuiltFace {
        surface,
        outer,
        inners,
    };
    info!(loops = rebuilt.loop_count(), "face rebuilt");
    Ok(rebuilt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::primitives::{make_plate_with_hole, make_rectangular_face};

    #[test]
    fn test_rebuilt_face_preserves_loop_structure() {
        let mut store = ShapeStore::new();
        let face_id = make_plate_with_hole(&mut store, 10.0, 6.0, 5.0, 3.0, 1.0);
        let rebuilt = rebuild_face(&store, face_id, &PipelineConfig::default()).unwrap();

        assert_eq!(rebuilt.loop_count(), store.faces[face_id].loop_count());
        assert_eq!(rebuilt.inners.len(), 1);
        // Outer comes first in iteration order.
        let first = rebuilt.loops().next().unwrap();
        assert!(
            (first.composite.last_parameter() - rebuilt.outer.composite.last_parameter()).abs()
                < 1e-12
        );
    }

    #[test]
    fn test_trim_interval_matches_composite() {
        let mut store = ShapeStore::new();
        let face_id = make_rectangular_face(&mut store, 4.0, 2.0);
        let rebuilt = rebuild_face(&store, face_id, &PipelineConfig::default()).unwrap();

        let trim = rebuilt.outer.trim.as_ref().unwrap();
        assert!((trim.first_parameter() - rebuilt.outer.composite.first_parameter()).abs() < 1e-12);
        assert!((trim.last_parameter() - rebuilt.outer.composite.last_parameter()).abs() < 1e-12);
    }

    #[test]
    fn test_rectangle_outer_parameter_span_is_perimeter() {
        let mut store = ShapeStore::new();
        let face_id = make_rectangular_face(&mut store, 4.0, 2.0);
        let rebuilt = rebuild_face(&store, face_id, &PipelineConfig::default()).unwrap();

        assert!((rebuilt.outer.composite.first_parameter() - 0.0).abs() < 1e-12);
        assert!((rebuilt.outer.composite.last_parameter() - 12.0).abs() < 1e-4);
    }
}

//! Loop Curve Compositor: merges a loop's ordered boundary segments into one
//! composite curve with a single strictly increasing parameterization.

use tracing::{debug, warn};

use crate::error::FaceError;
use crate::geometry::convert::curve_to_nurbs;
use crate::geometry::nurbs::NurbsCurve;
use crate::geometry::point::Point3d;
use crate::topology::shape::{LoopId, ShapeStore};

/// A single 3-D parametric curve spanning an entire loop.
///
/// Canonical segments are kept in traversal order under one global parameter:
/// the first segment retains its native interval and each subsequent segment
/// is knot-shifted to continue the running parameter, so the composite has a
/// single monotonically increasing parameterization with the loop's sense.
#[derive(Debug, Clone)]
pub struct CompositeCurve {
    segments: Vec<NurbsCurve>,
    /// breaks[i] is the global parameter at which segment i starts;
    /// breaks[segments.len()] is the end of the composite.
    breaks: Vec<f64>,
    /// Join tolerance used during the merge.
    pub join_tolerance: f64,
    /// Largest end-to-start gap accepted during the merge.
    pub max_join_gap: f64,
}

impl CompositeCurve {
    pub fn first_parameter(&self) -> f64 {
        self.breaks[0]
    }

    pub fn last_parameter(&self) -> f64 {
        self.breaks[self.breaks.len() - 1]
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn start_point(&self) -> Point3d {
        self.segments[0].start_point()
    }

    pub fn end_point(&self) -> Point3d {
        self.segments[self.segments.len() - 1].end_point()
    }

    /// Evaluate at a global parameter, clamped to the composite's interval.
    pub fn evaluate(&self, t: f64) -> Point3d {
        let t = t.clamp(self.first_parameter(), self.last_parameter());
        // Index of the segment whose interval contains t.
        let idx = match self.breaks[1..self.breaks.len() - 1]
            .iter()
            .position(|b| t < *b)
        {
            Some(i) => i,
            None => self.segments.len() - 1,
        };
        self.segments[idx].evaluate(t)
    }
}

/// Merge the loop's segments into a [`CompositeCurve`] under the join
/// tolerance. Degenerate segments are skipped; a loop with no usable
/// segments fails with [`FaceError::DegenerateLoop`].
pub fn compose_loop(
    store: &ShapeStore,
    loop_id: LoopId,
    join_tolerance: f64,
) -> Result<CompositeCurve, FaceError> {
    let mut segments: Vec<NurbsCurve> = Vec::new();
    let mut breaks: Vec<f64> = Vec::new();
    let mut max_join_gap: f64 = 0.0;
    let mut skipped = 0usize;

    for segment in store.ordered_segments(loop_id) {
        if segment.degenerate || segment.t_end - segment.t_start <= 0.0 {
            skipped += 1;
            continue;
        }

        let converted = curve_to_nurbs(&segment.curve, segment.t_start, segment.t_end);
        let converted = if segment.forward {
            converted
        } else {
            converted.reversed()
        };

        if segments.is_empty() {
            let (t0, t1) = converted.domain();
            breaks.push(t0);
            breaks.push(t1);
            segments.push(converted);
        } else {
            let prev_end = segments[segments.len() - 1].end_point();
            let gap = prev_end.distance_to(&converted.start_point());
            if gap > join_tolerance {
                // Tolerated best-effort join; the gap is recorded so callers
                // can inspect it.
                warn!(gap, join_tolerance, "segment join gap exceeds tolerance");
            }
            max_join_gap = max_join_gap.max(gap);

            let shifted = converted.with_knots_shifted_to(*breaks.last().expect("non-empty"));
            breaks.push(shifted.domain().1);
            segments.push(shifted);
        }
    }

    if segments.is_empty() {
        return Err(FaceError::DegenerateLoop { skipped });
    }

    let composite = CompositeCurve {
        segments,
        breaks,
        join_tolerance,
        max_join_gap,
    };

    let closure_gap = composite.end_point().distance_to(&composite.start_point());
    if closure_gap > join_tolerance {
        warn!(closure_gap, join_tolerance, "composite loop does not close");
    }
    debug!(
        segments = composite.segment_count(),
        first = composite.first_parameter(),
        last = composite.last_parameter(),
        max_join_gap,
        "composed loop curve"
    );

    Ok(composite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::curves::{Circle3d, Curve, Line3d};
    use crate::geometry::vector::Vec3;
    use crate::topology::primitives::make_rectangular_face;
    use crate::topology::shape::{BoundarySegment, ShapeStore};
    use crate::geometry::surfaces::{Plane, Surface};
    use std::f64::consts::PI;

    #[test]
    fn test_rectangle_composite_spans_perimeter() {
        let mut store = ShapeStore::new();
        let face_id = make_rectangular_face(&mut store, 4.0, 2.0);
        let outer = store.faces[face_id].outer_loop;

        let composite = compose_loop(&store, outer, 1e-4).unwrap();
        assert_eq!(composite.segment_count(), 4);
        assert!((composite.first_parameter() - 0.0).abs() < 1e-12);
        assert!((composite.last_parameter() - 12.0).abs() < 1e-4);
        // The loop closes back onto its start.
        assert!(composite.start_point().distance_to(&composite.end_point()) < 1e-9);
    }

    #[test]
    fn test_composite_is_continuous_at_breaks() {
        let mut store = ShapeStore::new();
        let face_id = make_rectangular_face(&mut store, 3.0, 1.0);
        let outer = store.faces[face_id].outer_loop;
        let composite = compose_loop(&store, outer, 1e-4).unwrap();

        for b in [3.0, 4.0, 7.0] {
            let before = composite.evaluate(b - 1e-9);
            let after = composite.evaluate(b + 1e-9);
            assert!(before.distance_to(&after) < 1e-6, "jump at break {}", b);
        }
    }

    #[test]
    fn test_single_canonical_segment_is_idempotent() {
        let mut store = ShapeStore::new();
        let circle = Circle3d::new(Point3d::ORIGIN, Vec3::Z, 1.0);
        let canonical = curve_to_nurbs(&Curve::Circle(circle), 0.5, 4.0);
        let face_id = store.add_face(
            Surface::Plane(Plane::xy()),
            (-2.0, 2.0),
            (-2.0, 2.0),
            vec![BoundarySegment::forward(Curve::Nurbs(canonical), 0.5, 4.0)],
        );
        let outer = store.faces[face_id].outer_loop;
        let composite = compose_loop(&store, outer, 1e-4).unwrap();
        assert!((composite.first_parameter() - 0.5).abs() < 1e-12);
        assert!((composite.last_parameter() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_degenerate_loop_fails() {
        let mut store = ShapeStore::new();
        let c = Curve::Line(Line3d::new(Point3d::ORIGIN, Vec3::X));
        let face_id = store.add_face(
            Surface::Plane(Plane::xy()),
            (0.0, 1.0),
            (0.0, 1.0),
            vec![
                BoundarySegment::degenerate(c.clone(), 0.0),
                BoundarySegment::degenerate(c, 1.0),
            ],
        );
        let outer = store.faces[face_id].outer_loop;
        let err = compose_loop(&store, outer, 1e-4).unwrap_err();
        assert!(matches!(err, FaceError::DegenerateLoop { skipped: 2 }));
    }

    #[test]
    fn test_degenerate_segments_skipped_not_fatal() {
        let mut store = ShapeStore::new();
        let face_id = make_rectangular_face(&mut store, 2.0, 2.0);
        let outer = store.faces[face_id].outer_loop;
        // Splice a degenerate segment into the loop order.
        let c = Curve::Line(Line3d::new(Point3d::ORIGIN, Vec3::X));
        let degenerate = store.segments.insert(BoundarySegment::degenerate(c, 0.0));
        store.loops[outer].segments.insert(2, degenerate);

        let composite = compose_loop(&store, outer, 1e-4).unwrap();
        assert_eq!(composite.segment_count(), 4);
        assert!((composite.last_parameter() - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_reversed_segment_is_flipped_into_loop_sense() {
        let mut store = ShapeStore::new();
        let a = Point3d::new(0.0, 0.0, 0.0);
        let b = Point3d::new(1.0, 0.0, 0.0);
        let c = Point3d::new(1.0, 1.0, 0.0);
        // Second segment's curve runs c -> b; the segment is marked reversed
        // so the loop still traverses b -> c.
        let seg1 = BoundarySegment::forward(Curve::Line(Line3d::from_points(a, b)), 0.0, 1.0);
        let mut seg2 = BoundarySegment::forward(Curve::Line(Line3d::from_points(c, b)), 0.0, 1.0);
        seg2.forward = false;
        let face_id = store.add_face(
            Surface::Plane(Plane::xy()),
            (0.0, 1.0),
            (0.0, 1.0),
            vec![seg1, seg2],
        );
        let outer = store.faces[face_id].outer_loop;
        let composite = compose_loop(&store, outer, 1e-4).unwrap();

        assert!(composite.start_point().distance_to(&a) < 1e-12);
        assert!(composite.end_point().distance_to(&c) < 1e-12);
        assert!((composite.max_join_gap - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_full_circle_loop_composites_to_one_segment() {
        let mut store = ShapeStore::new();
        let circle = Circle3d::new(Point3d::ORIGIN, Vec3::Z, 2.0);
        let face_id = store.add_face(
            Surface::Plane(Plane::xy()),
            (-3.0, 3.0),
            (-3.0, 3.0),
            vec![BoundarySegment::forward(
                Curve::Circle(circle),
                0.0,
                2.0 * PI,
            )],
        );
        let outer = store.faces[face_id].outer_loop;
        let composite = compose_loop(&store, outer, 1e-4).unwrap();
        assert_eq!(composite.segment_count(), 1);
        assert!(composite.start_point().distance_to(&composite.end_point()) < 1e-12);
    }
}

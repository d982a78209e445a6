//! Property-based tests for pipeline invariants using the `proptest` crate.

use proptest::prelude::*;

use face_reparam::geometry::curves::{Circle3d, Curve};
use face_reparam::geometry::point::{Point2d, Point3d};
use face_reparam::geometry::vector::Vec3;
use face_reparam::geometry::convert::curve_to_nurbs;
use face_reparam::pipeline::compositor::compose_loop;
use face_reparam::pipeline::discretize::discretize_trim;
use face_reparam::pipeline::reconstruct::rebuild_face;
use face_reparam::topology::primitives::{make_disk_face, make_rectangular_face};
use face_reparam::topology::shape::ShapeStore;
use face_reparam::{classify_point, Classification, PipelineConfig};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Rectangle extents away from degenerate sizes.
fn arb_extents() -> impl Strategy<Value = (f64, f64)> {
    (0.5f64..50.0, 0.5f64..50.0)
}

/// Circle radius in a reasonable range.
fn arb_radius() -> impl Strategy<Value = f64> {
    0.5f64..20.0
}

/// A non-empty arc interval inside one full turn.
fn arb_arc() -> impl Strategy<Value = (f64, f64)> {
    (0.0f64..3.0, 0.2f64..3.0).prop_map(|(a, span)| (a, a + span))
}

const TOL: f64 = 1e-6;

// ---------------------------------------------------------------------------
// 1. Composite parameter span equals the sum of segment spans
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn composite_span_is_sum_of_segment_spans((w, h) in arb_extents()) {
        let mut store = ShapeStore::new();
        let face_id = make_rectangular_face(&mut store, w, h);
        let outer = store.faces[face_id].outer_loop;
        let composite = compose_loop(&store, outer, 1e-4).unwrap();

        let perimeter = 2.0 * (w + h);
        prop_assert!((composite.first_parameter() - 0.0).abs() < TOL);
        prop_assert!(
            (composite.last_parameter() - perimeter).abs() < TOL,
            "span {} != perimeter {}",
            composite.last_parameter(),
            perimeter
        );
    }
}

// ---------------------------------------------------------------------------
// 2. Circle arcs stay on the circle after canonicalization
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn canonical_arc_stays_on_circle(r in arb_radius(), (t1, t2) in arb_arc()) {
        let circle = Circle3d::new(Point3d::ORIGIN, Vec3::Z, r);
        let c = curve_to_nurbs(&Curve::Circle(circle), t1, t2);
        prop_assert!((c.domain().0 - t1).abs() < TOL);
        prop_assert!((c.domain().1 - t2).abs() < TOL);
        for i in 0..=32 {
            let t = t1 + (t2 - t1) * (i as f64 / 32.0);
            let p = c.evaluate(t);
            let rad = (p.x * p.x + p.y * p.y).sqrt();
            prop_assert!((rad - r).abs() < 1e-9 * r.max(1.0),
                "off circle at t={}: r={}", t, rad);
        }
    }
}

// ---------------------------------------------------------------------------
// 3. Discretizer sample count and stride
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn discretizer_emits_requested_samples(
        (w, h) in arb_extents(),
        n in 2usize..200,
    ) {
        let mut store = ShapeStore::new();
        let face_id = make_rectangular_face(&mut store, w, h);
        let rebuilt = rebuild_face(&store, face_id, &PipelineConfig::default()).unwrap();
        let trim = rebuilt.outer.trim.as_ref().unwrap();

        let samples = discretize_trim(trim, n);
        prop_assert_eq!(samples.len(), n);

        // First sample sits at the interval start.
        let start = trim.evaluate(trim.first_parameter());
        prop_assert!((samples.u[0] - start.u).abs() < TOL);
        prop_assert!((samples.v[0] - start.v).abs() < TOL);

        // Samples are evenly spaced in parameter, one step short of the end.
        let step = (trim.last_parameter() - trim.first_parameter()) / n as f64;
        let expected_last = trim.evaluate(trim.first_parameter() + step * (n - 1) as f64);
        prop_assert!((samples.u[n - 1] - expected_last.u).abs() < TOL);
        prop_assert!((samples.v[n - 1] - expected_last.v).abs() < TOL);
    }
}

// ---------------------------------------------------------------------------
// 4. Interior points of a rectangle classify inside, exterior outside
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn rectangle_interior_classifies_inside(
        (w, h) in arb_extents(),
        fu in 0.1f64..0.9,
        fv in 0.1f64..0.9,
    ) {
        let mut store = ShapeStore::new();
        let face_id = make_rectangular_face(&mut store, w, h);
        let rebuilt = rebuild_face(&store, face_id, &PipelineConfig::default()).unwrap();

        // Keep clear of the boundary tolerance band.
        let margin = 0.05 * w.min(h);
        let p = Point2d::new(
            (margin + fu * (w - 2.0 * margin)).clamp(margin, w - margin),
            (margin + fv * (h - 2.0 * margin)).clamp(margin, h - margin),
        );
        prop_assert_eq!(
            classify_point(&rebuilt, &p, 1e-4),
            Classification::Inside
        );

        let outside = Point2d::new(w + 1.0 + fu, h + 1.0 + fv);
        prop_assert_eq!(
            classify_point(&rebuilt, &outside, 1e-4),
            Classification::Outside
        );
    }
}

// ---------------------------------------------------------------------------
// 5. Loop structure survives reconstruction
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn reconstruction_preserves_loop_count(r in arb_radius()) {
        let mut store = ShapeStore::new();
        let face_id = make_disk_face(&mut store, 0.0, 0.0, r);
        let rebuilt = rebuild_face(&store, face_id, &PipelineConfig::default()).unwrap();
        prop_assert_eq!(rebuilt.loop_count(), store.faces[face_id].loop_count());

        // Trim interval matches the composite interval for every loop.
        for rl in rebuilt.loops() {
            let trim = rl.trim.as_ref().unwrap();
            prop_assert!((trim.first_parameter() - rl.composite.first_parameter()).abs() < TOL);
            prop_assert!((trim.last_parameter() - rl.composite.last_parameter()).abs() < TOL);
        }
    }
}

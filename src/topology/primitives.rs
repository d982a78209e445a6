//! Ready-made faces for tests and demos, standing in for the (excluded)
//! model importer.

use tracing::{info, instrument};

use super::shape::{BoundarySegment, FaceId, ShapeStore};
use crate::geometry::curves::{Circle3d, Curve, Line3d};
use crate::geometry::point::Point3d;
use crate::geometry::surfaces::{Plane, Surface};
use crate::geometry::vector::Vec3;

fn line_segment(a: Point3d, b: Point3d) -> BoundarySegment {
    let len = a.distance_to(&b);
    BoundarySegment::forward(Curve::Line(Line3d::from_points(a, b)), 0.0, len)
}

/// A planar rectangular face on the XY plane: outer loop of 4 straight
/// segments traversed counter-clockwise, parameter bounds `[0,w] x [0,h]`.
#[instrument(skip(store))]
pub fn make_rectangular_face(store: &mut ShapeStore, w: f64, h: f64) -> FaceId {
    info!(w, h, "creating rectangular face");
    let corners = [
        Point3d::new(0.0, 0.0, 0.0),
        Point3d::new(w, 0.0, 0.0),
        Point3d::new(w, h, 0.0),
        Point3d::new(0.0, h, 0.0),
    ];
    let segments = (0..4)
        .map(|i| line_segment(corners[i], corners[(i + 1) % 4]))
        .collect();
    store.add_face(Surface::Plane(Plane::xy()), (0.0, w), (0.0, h), segments)
}

fn circle_loop(center_u: f64, center_v: f64, radius: f64) -> Vec<BoundarySegment> {
    let center = Point3d::new(center_u, center_v, 0.0);
    let circle = Circle3d::with_axes(center, Vec3::Z, Vec3::X, radius);
    vec![BoundarySegment::forward(
        Curve::Circle(circle),
        0.0,
        2.0 * std::f64::consts::PI,
    )]
}

/// A planar disk: circular outer loop of one full-circle segment, on the XY
/// plane with parameter bounds padded around the circle.
#[instrument(skip(store))]
pub fn make_disk_face(store: &mut ShapeStore, center_u: f64, center_v: f64, radius: f64) -> FaceId {
    info!(center_u, center_v, radius, "creating disk face");
    let pad = radius * 0.5;
    store.add_face(
        Surface::Plane(Plane::xy()),
        (center_u - radius - pad, center_u + radius + pad),
        (center_v - radius - pad, center_v + radius + pad),
        circle_loop(center_u, center_v, radius),
    )
}

/// A rectangular plate with one circular hole: rectangular outer loop plus a
/// single-segment inner loop.
#[instrument(skip(store))]
pub fn make_plate_with_hole(
    store: &mut ShapeStore,
    w: f64,
    h: f64,
    hole_u: f64,
    hole_v: f64,
    hole_radius: f64,
) -> FaceId {
    info!(w, h, hole_u, hole_v, hole_radius, "creating plate with hole");
    let face_id = make_rectangular_face(store, w, h);
    store.add_inner_loop(face_id, circle_loop(hole_u, hole_v, hole_radius));
    face_id
}

//! Canonicalization of raw curves and surfaces into tensor-product rational
//! B-spline form.
//!
//! Analytic kinds are converted exactly: circles and ellipses become rational
//! quadratics (arc segments of at most 90 degrees, interior weights
//! cos(span/2)), and the quadric surfaces are built as surfaces of revolution
//! from a unit-circle arc and a profile curve in (radial, axial) coordinates,
//! with weights multiplying across the tensor product.

use tracing::debug;

use crate::error::FaceError;

use super::curves::Curve;
use super::nurbs::{NurbsCurve, NurbsSurface};
use super::point::Point3d;
use super::surfaces::Surface;
use super::vector::Vec3;

/// A rational-quadratic arc of the unit circle, in local (x, y) coordinates.
///
/// Knots span the angular interval, so the curve domain equals the requested
/// angle range even though the rational parameterization is not arc length.
struct UnitArc {
    points: Vec<[f64; 2]>,
    weights: Vec<f64>,
    knots: Vec<f64>,
}

fn unit_arc(a1: f64, a2: f64) -> UnitArc {
    assert!(a2 > a1, "arc span must be positive");
    let span = a2 - a1;
    let num_segments = (span / std::f64::consts::FRAC_PI_2).ceil().max(1.0) as usize;
    let d = span / num_segments as f64;
    let w = (d / 2.0).cos();
    let bulge = 1.0 / w;

    let mut points = Vec::with_capacity(2 * num_segments + 1);
    let mut weights = Vec::with_capacity(2 * num_segments + 1);
    points.push([a1.cos(), a1.sin()]);
    weights.push(1.0);
    for k in 0..num_segments {
        let mid = a1 + d * (k as f64 + 0.5);
        let end = a1 + d * (k as f64 + 1.0);
        points.push([mid.cos() * bulge, mid.sin() * bulge]);
        weights.push(w);
        points.push([end.cos(), end.sin()]);
        weights.push(1.0);
    }

    let mut knots = Vec::with_capacity(2 * num_segments + 4);
    knots.extend_from_slice(&[a1, a1, a1]);
    for k in 1..num_segments {
        let b = a1 + d * k as f64;
        knots.push(b);
        knots.push(b);
    }
    knots.extend_from_slice(&[a2, a2, a2]);

    UnitArc {
        points,
        weights,
        knots,
    }
}

/// Convert one boundary-segment curve over `[t1, t2]` into canonical rational
/// B-spline form. The resulting curve's domain is exactly `[t1, t2]`.
pub fn curve_to_nurbs(curve: &Curve, t1: f64, t2: f64) -> NurbsCurve {
    assert!(t2 > t1, "segment parameter interval must be non-empty");
    match curve {
        Curve::Line(line) => NurbsCurve::bspline(
            1,
            vec![line.evaluate(t1), line.evaluate(t2)],
            vec![t1, t1, t2, t2],
        ),
        Curve::Circle(circle) => {
            let arc = unit_arc(t1, t2);
            let y_axis = circle.y_axis();
            let control_points = arc
                .points
                .iter()
                .map(|[x, y]| {
                    circle.center
                        + circle.x_axis * (circle.radius * x)
                        + y_axis * (circle.radius * y)
                })
                .collect();
            NurbsCurve::new(2, control_points, arc.weights, arc.knots)
        }
        Curve::Ellipse(ellipse) => {
            let arc = unit_arc(t1, t2);
            let minor_axis = ellipse.minor_axis();
            let control_points = arc
                .points
                .iter()
                .map(|[x, y]| {
                    ellipse.center
                        + ellipse.major_axis * (ellipse.major_radius * x)
                        + minor_axis * (ellipse.minor_radius * y)
                })
                .collect();
            NurbsCurve::new(2, control_points, arc.weights, arc.knots)
        }
        // Already canonical; the stated interval is trusted to lie in the
        // curve domain.
        Curve::Nurbs(nurbs) => nurbs.clone(),
    }
}

/// A profile curve in (radial, axial) coordinates used to build surfaces of
/// revolution.
struct Profile {
    degree: usize,
    // (r, z) pairs
    points: Vec<[f64; 2]>,
    weights: Vec<f64>,
    knots: Vec<f64>,
}

fn check_bounds(
    kind: &'static str,
    (u1, u2): (f64, f64),
    (v1, v2): (f64, f64),
) -> Result<(), FaceError> {
    if !(u1.is_finite() && u2.is_finite() && v1.is_finite() && v2.is_finite()) {
        return Err(FaceError::UnsupportedSurfaceKind {
            kind,
            reason: "non-finite parameter bounds",
        });
    }
    if u2 <= u1 || v2 <= v1 {
        return Err(FaceError::UnsupportedSurfaceKind {
            kind,
            reason: "degenerate parameter bounds",
        });
    }
    Ok(())
}

/// Convert a raw surface with the face's parameter bounds into canonical
/// tensor-product rational B-spline form.
pub fn surface_to_nurbs(
    surface: &Surface,
    u_bounds: (f64, f64),
    v_bounds: (f64, f64),
) -> Result<NurbsSurface, FaceError> {
    let kind = surface.surface_type_name();
    debug!(kind, ?u_bounds, ?v_bounds, "canonicalizing surface");

    match surface {
        Surface::Nurbs(nurbs) => {
            check_bounds(kind, nurbs.domain_u(), nurbs.domain_v())?;
            Ok(nurbs.clone())
        }
        Surface::Plane(plane) => {
            check_bounds(kind, u_bounds, v_bounds)?;
            let (u1, u2) = u_bounds;
            let (v1, v2) = v_bounds;
            Ok(NurbsSurface::new(
                1,
                1,
                vec![
                    plane.evaluate(u1, v1),
                    plane.evaluate(u1, v2),
                    plane.evaluate(u2, v1),
                    plane.evaluate(u2, v2),
                ],
                vec![],
                vec![u1, u1, u2, u2],
                vec![v1, v1, v2, v2],
                2,
                2,
            ))
        }
        Surface::Cylinder(cyl) => {
            check_bounds(kind, u_bounds, v_bounds)?;
            let (v1, v2) = v_bounds;
            let profile = Profile {
                degree: 1,
                points: vec![[cyl.radius, v1], [cyl.radius, v2]],
                weights: vec![1.0, 1.0],
                knots: vec![v1, v1, v2, v2],
            };
            Ok(revolve(cyl.origin, cyl.axis, cyl.ref_dir, u_bounds, &profile))
        }
        Surface::Cone(cone) => {
            check_bounds(kind, u_bounds, v_bounds)?;
            let (v1, v2) = v_bounds;
            let tan_a = cone.half_angle.tan();
            let profile = Profile {
                degree: 1,
                points: vec![[v1 * tan_a, v1], [v2 * tan_a, v2]],
                weights: vec![1.0, 1.0],
                knots: vec![v1, v1, v2, v2],
            };
            Ok(revolve(cone.apex, cone.axis, cone.ref_dir, u_bounds, &profile))
        }
        Surface::Sphere(sphere) => {
            check_bounds(kind, u_bounds, v_bounds)?;
            let (v1, v2) = v_bounds;
            let arc = unit_arc(v1, v2);
            let profile = Profile {
                degree: 2,
                points: arc
                    .points
                    .iter()
                    .map(|[x, y]| [sphere.radius * x, sphere.radius * y])
                    .collect(),
                weights: arc.weights,
                knots: arc.knots,
            };
            Ok(revolve(
                sphere.center,
                sphere.axis,
                sphere.ref_dir,
                u_bounds,
                &profile,
            ))
        }
        Surface::Torus(torus) => {
            check_bounds(kind, u_bounds, v_bounds)?;
            let (v1, v2) = v_bounds;
            let arc = unit_arc(v1, v2);
            let profile = Profile {
                degree: 2,
                points: arc
                    .points
                    .iter()
                    .map(|[x, y]| {
                        [
                            torus.major_radius + torus.minor_radius * x,
                            torus.minor_radius * y,
                        ]
                    })
                    .collect(),
                weights: arc.weights,
                knots: arc.knots,
            };
            Ok(revolve(
                torus.center,
                torus.axis,
                torus.ref_dir,
                u_bounds,
                &profile,
            ))
        }
    }
}

/// Build the surface of revolution of `profile` about `axis` through
/// `origin`, over the angular range `u_bounds`.
///
/// The tensor product of a unit-circle arc and a profile in (r, z)
/// coordinates is exact for rational forms: homogeneous numerators and
/// denominators both factorize, so the surface weight at (i, j) is the
/// product of the arc and profile weights.
fn revolve(
    origin: Point3d,
    axis: Vec3,
    ref_dir: Vec3,
    u_bounds: (f64, f64),
    profile: &Profile,
) -> NurbsSurface {
    let arc = unit_arc(u_bounds.0, u_bounds.1);
    let y_dir = axis.cross(&ref_dir);
    let num_u = arc.points.len();
    let num_v = profile.points.len();

    let mut control_points = Vec::with_capacity(num_u * num_v);
    let mut weights = Vec::with_capacity(num_u * num_v);
    for (i, [x, y]) in arc.points.iter().enumerate() {
        for (j, [r, z]) in profile.points.iter().enumerate() {
            control_points.push(origin + ref_dir * (x * r) + y_dir * (y * r) + axis * *z);
            weights.push(arc.weights[i] * profile.weights[j]);
        }
    }

    NurbsSurface::new(
        2,
        profile.degree,
        control_points,
        weights,
        arc.knots,
        profile.knots.clone(),
        num_u,
        num_v,
    )
}

/// Canonical tensor-product surface consumed by the projector and the face
/// reconstructor. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct ParametricSurface {
    nurbs: NurbsSurface,
}

impl ParametricSurface {
    /// Wrap an already-canonical surface, validating its parameter bounds.
    pub fn new(nurbs: NurbsSurface) -> Result<Self, FaceError> {
        check_bounds("Nurbs", nurbs.domain_u(), nurbs.domain_v())?;
        Ok(Self { nurbs })
    }

    /// Canonicalize a raw surface directly.
    pub fn from_raw(
        surface: &Surface,
        u_bounds: (f64, f64),
        v_bounds: (f64, f64),
    ) -> Result<Self, FaceError> {
        Self::new(surface_to_nurbs(surface, u_bounds, v_bounds)?)
    }

    pub fn nurbs(&self) -> &NurbsSurface {
        &self.nurbs
    }

    /// Parameter bounds (u1, u2, v1, v2).
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let (u1, u2) = self.nurbs.domain_u();
        let (v1, v2) = self.nurbs.domain_v();
        (u1, u2, v1, v2)
    }

    pub fn evaluate(&self, u: f64, v: f64) -> Point3d {
        self.nurbs.evaluate(u, v)
    }

    pub fn d_du(&self, u: f64, v: f64) -> Vec3 {
        self.nurbs.d_du(u, v)
    }

    pub fn d_dv(&self, u: f64, v: f64) -> Vec3 {
        self.nurbs.d_dv(u, v)
    }
}

//! Surface Projector: maps a 3-D composite curve into the 2-D parameter
//! domain of a canonical surface, producing a trim curve (pCurve).

use nalgebra::{Matrix2, Vector2};
use tracing::{debug, instrument};

use crate::error::FaceError;
use crate::geometry::convert::ParametricSurface;
use crate::geometry::nurbs::NurbsCurve2d;
use crate::geometry::point::{Point2d, Point3d};

use super::compositor::CompositeCurve;

/// A 2-D parametric curve in a surface's (u, v) domain.
///
/// Covers the same parameter interval as the composite curve it was
/// projected from.
#[derive(Debug, Clone)]
pub struct TrimCurve {
    curve: NurbsCurve2d,
    /// Tolerance at which the projection was accepted.
    pub tolerance: f64,
}

impl TrimCurve {
    pub fn first_parameter(&self) -> f64 {
        self.curve.domain().0
    }

    pub fn last_parameter(&self) -> f64 {
        self.curve.domain().1
    }

    pub fn evaluate(&self, t: f64) -> Point2d {
        self.curve.evaluate(t)
    }
}

/// Resolution of the coarse grid used to seed the first projected point.
const SEED_GRID: usize = 16;

/// Iterative nearest-point refinement: Gauss-Newton on the squared distance
/// to `target`, with finite-difference surface partials. Parameters stay
/// clamped to the surface domain; the iteration count is a hard budget.
fn refine_nearest_point(
    surface: &ParametricSurface,
    target: &Point3d,
    seed: (f64, f64),
    max_iterations: u32,
) -> (f64, f64) {
    let (u1, u2, v1, v2) = surface.bounds();
    let param_scale = (u2 - u1).max(v2 - v1);
    let (mut u, mut v) = seed;

    for _ in 0..max_iterations {
        let r = surface.evaluate(u, v) - *target;
        let su = surface.d_du(u, v);
        let sv = surface.d_dv(u, v);

        // Normal equations of the 3x2 Jacobian.
        let a = Matrix2::new(su.dot(&su), su.dot(&sv), su.dot(&sv), sv.dot(&sv));
        let b = Vector2::new(-su.dot(&r), -sv.dot(&r));
        let Some(a_inv) = a.try_inverse() else {
            // Singular at parameterization degeneracies (e.g. sphere poles).
            break;
        };
        let step = a_inv * b;
        u = (u + step.x).clamp(u1, u2);
        v = (v + step.y).clamp(v1, v2);

        if step.norm() < 1e-12 * param_scale.max(1.0) {
            break;
        }
    }
    (u, v)
}

/// Coarse scan of the surface domain for the (u, v) cell nearest `target`.
fn grid_seed(surface: &ParametricSurface, target: &Point3d) -> (f64, f64) {
    let (u1, u2, v1, v2) = surface.bounds();
    let mut best = (u1, v1);
    let mut best_dist = f64::INFINITY;
    for i in 0..=SEED_GRID {
        for j in 0..=SEED_GRID {
            let u = u1 + (u2 - u1) * (i as f64 / SEED_GRID as f64);
            let v = v1 + (v2 - v1) * (j as f64 / SEED_GRID as f64);
            let d = surface.evaluate(u, v).distance_to(target);
            if d < best_dist {
                best_dist = d;
                best = (u, v);
            }
        }
    }
    best
}

/// Project `composite` onto `surface`, producing a [`TrimCurve`] over the
/// same parameter interval.
///
/// Each sampled curve point is refined from the previous solution so the
/// (u, v) path is a continuous curve rather than an independent point cloud.
/// Fails with [`FaceError::ProjectionToleranceExceeded`] if the maximum
/// pointwise deviation over the interval exceeds `tolerance` (including the
/// case where the iteration budget runs out before convergence).
#[instrument(skip(composite, surface))]
pub fn project_curve(
    composite: &CompositeCurve,
    surface: &ParametricSurface,
    tolerance: f64,
    samples: usize,
    max_iterations: u32,
) -> Result<TrimCurve, FaceError> {
    let n = samples.max(2);
    let t0 = composite.first_parameter();
    let t1 = composite.last_parameter();

    let mut params = Vec::with_capacity(n);
    let mut points = Vec::with_capacity(n);
    let mut prev: Option<(f64, f64)> = None;
    let mut max_deviation: f64 = 0.0;

    for i in 0..n {
        let t = t0 + (t1 - t0) * (i as f64 / (n - 1) as f64);
        let target = composite.evaluate(t);
        let seed = match prev {
            Some(uv) => uv,
            None => grid_seed(surface, &target),
        };
        let (u, v) = refine_nearest_point(surface, &target, seed, max_iterations);
        let deviation = surface.evaluate(u, v).distance_to(&target);
        max_deviation = max_deviation.max(deviation);
        prev = Some((u, v));
        params.push(t);
        points.push(Point2d::new(u, v));
    }

    if max_deviation > tolerance {
        return Err(FaceError::ProjectionToleranceExceeded {
            max_deviation,
            tolerance,
        });
    }

    debug!(samples = n, max_deviation, "projection accepted");
    Ok(TrimCurve {
        curve: NurbsCurve2d::polyline(points, &params),
        tolerance,
    })
}

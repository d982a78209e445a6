//! Point Classifier: locates (u, v) query points relative to a rebuilt
//! face's trimmed region.

use tracing::debug;

use crate::geometry::point::Point2d;

use super::projector::TrimCurve;
use super::reconstruct::RebuiltFace;

/// Standing of a query point relative to the face region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Inside,
    Outside,
    OnBoundary,
    /// The test was inconclusive: crossing counts along the two probe
    /// directions disagree, or a loop has no trim curve to test against.
    Ambiguous,
}

/// Points sampled per loop when flattening trim curves for classification.
const BOUNDARY_SAMPLES: usize = 256;

/// Closed polyline approximation of a trim curve in the (u, v) domain.
fn loop_polyline(trim: &TrimCurve) -> Vec<Point2d> {
    let t0 = trim.first_parameter();
    let step = (trim.last_parameter() - t0) / BOUNDARY_SAMPLES as f64;
    let mut points: Vec<Point2d> = (0..BOUNDARY_SAMPLES)
        .map(|i| trim.evaluate(t0 + step * i as f64))
        .collect();
    // Close the loop explicitly so every edge is tested.
    points.push(points[0]);
    points
}

fn distance_to_segment(p: &Point2d, a: &Point2d, b: &Point2d) -> f64 {
    let ab = *b - *a;
    let ap = *p - *a;
    let len_sq = ab.dot(&ab);
    if len_sq == 0.0 {
        return p.distance_to(a);
    }
    let t = (ap.dot(&ab) / len_sq).clamp(0.0, 1.0);
    p.distance_to(&a.lerp(b, t))
}

fn distance_to_polyline(p: &Point2d, polyline: &[Point2d]) -> f64 {
    polyline
        .windows(2)
        .map(|w| distance_to_segment(p, &w[0], &w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Crossings of the ray from `p` in the +u direction with the polyline.
fn crossings_u(p: &Point2d, polyline: &[Point2d]) -> usize {
    polyline
        .windows(2)
        .filter(|w| {
            let (a, b) = (&w[0], &w[1]);
            if (a.v > p.v) == (b.v > p.v) {
                return false;
            }
            let u_hit = a.u + (b.u - a.u) * (p.v - a.v) / (b.v - a.v);
            u_hit > p.u
        })
        .count()
}

/// Crossings of the ray from `p` in the +v direction with the polyline.
fn crossings_v(p: &Point2d, polyline: &[Point2d]) -> usize {
    polyline
        .windows(2)
        .filter(|w| {
            let (a, b) = (&w[0], &w[1]);
            if (a.u > p.u) == (b.u > p.u) {
                return false;
            }
            let v_hit = a.v + (b.v - a.v) * (p.u - a.u) / (b.u - a.u);
            v_hit > p.v
        })
        .count()
}

/// Classify `point` against the face's boundary loops.
///
/// A point within `tolerance` of any loop is [`Classification::OnBoundary`].
/// Otherwise parity of boundary crossings decides, probed along both the +u
/// and +v directions; if the two probes disagree the result is
/// [`Classification::Ambiguous`] rather than a guess.
pub fn classify_point(face: &RebuiltFace, point: &Point2d, tolerance: f64) -> Classification {
    let mut polylines = Vec::with_capacity(face.loop_count());
    for rebuilt in face.loops() {
        match &rebuilt.trim {
            Some(trim) => polylines.push(loop_polyline(trim)),
            None => return Classification::Ambiguous,
        }
    }

    for polyline in &polylines {
        if distance_to_polyline(point, polyline) <= tolerance {
            return Classification::OnBoundary;
        }
    }

    let total_u: usize = polylines.iter().map(|pl| crossings_u(point, pl)).sum();
    let total_v: usize = polylines.iter().map(|pl| crossings_v(point, pl)).sum();
    if total_u % 2 != total_v % 2 {
        debug!(?point, total_u, total_v, "probe parity disagreement");
        return Classification::Ambiguous;
    }
    if total_u % 2 == 1 {
        Classification::Inside
    } else {
        Classification::Outside
    }
}

/// Classify a uniform `nu` x `nv` grid over the surface bounds, in row-major
/// (v-outer) order.
pub fn classify_grid(
    face: &RebuiltFace,
    nu: usize,
    nv: usize,
    tolerance: f64,
) -> Vec<(Point2d, Classification)> {
    let (u1, u2, v1, v2) = face.surface.bounds();
    let mut results = Vec::with_capacity(nu * nv);
    for j in 0..nv {
        let v = v1 + (v2 - v1) * ((j as f64 + 0.5) / nv as f64);
        for i in 0..nu {
            let u = u1 + (u2 - u1) * ((i as f64 + 0.5) / nu as f64);
            let p = Point2d::new(u, v);
            results.push((p, classify_point(face, &p, tolerance)));
        }
    }
    results
}

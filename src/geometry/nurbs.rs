use serde::{Deserialize, Serialize};

use super::point::{Point2d, Point3d};
use super::vector::{Vec2, Vec3};

/// Find the knot span index for parameter t using binary search.
fn find_span(knots: &[f64], num_control_points: usize, degree: usize, t: f64) -> usize {
    let n = num_control_points - 1;
    let p = degree;

    if t >= knots[n + 1] {
        return n;
    }
    if t <= knots[p] {
        return p;
    }

    let mut low = p;
    let mut high = n + 1;
    let mut mid = (low + high) / 2;
    while t < knots[mid] || t >= knots[mid + 1] {
        if t < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }
    mid
}

/// Compute the non-vanishing B-spline basis functions at parameter t.
fn basis_functions(knots: &[f64], span: usize, t: f64, degree: usize) -> Vec<f64> {
    let p = degree;
    let mut n_vals = vec![0.0; p + 1];
    let mut left = vec![0.0; p + 1];
    let mut right = vec![0.0; p + 1];

    n_vals[0] = 1.0;
    for j in 1..=p {
        left[j] = t - knots[span + 1 - j];
        right[j] = knots[span + j] - t;
        let mut saved = 0.0;
        for r in 0..j {
            let temp = n_vals[r] / (right[r + 1] + left[j - r]);
            n_vals[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        n_vals[j] = saved;
    }
    n_vals
}

/// A NURBS (Non-Uniform Rational B-Spline) curve in 3D.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NurbsCurve {
    /// Degree of the curve.
    pub degree: usize,
    /// Control points in 3D.
    pub control_points: Vec<Point3d>,
    /// Weights for rational curves. If empty, treated as all 1.0 (non-rational).
    pub weights: Vec<f64>,
    /// Knot vector (must have len = control_points.len() + degree + 1).
    pub knots: Vec<f64>,
}

impl NurbsCurve {
    pub fn new(degree: usize, control_points: Vec<Point3d>, weights: Vec<f64>, knots: Vec<f64>) -> Self {
        assert!(
            knots.len() == control_points.len() + degree + 1,
            "Knot vector length must be n + p + 1"
        );
        assert!(
            weights.is_empty() || weights.len() == control_points.len(),
            "Weights must be empty or same length as control points"
        );
        Self {
            degree,
            control_points,
            weights,
            knots,
        }
    }

    /// Create a non-rational B-spline curve.
    pub fn bspline(degree: usize, control_points: Vec<Point3d>, knots: Vec<f64>) -> Self {
        Self::new(degree, control_points, vec![], knots)
    }

    fn is_rational(&self) -> bool {
        !self.weights.is_empty()
    }

    fn weight(&self, i: usize) -> f64 {
        if self.is_rational() {
            self.weights[i]
        } else {
            1.0
        }
    }

    pub fn num_control_points(&self) -> usize {
        self.control_points.len()
    }

    /// Parameter domain [t_min, t_max].
    pub fn domain(&self) -> (f64, f64) {
        (self.knots[self.degree], self.knots[self.knots.len() - self.degree - 1])
    }

    /// Evaluate the curve at parameter t.
    pub fn evaluate(&self, t: f64) -> Point3d {
        let span = find_span(&self.knots, self.num_control_points(), self.degree, t);
        let basis = basis_functions(&self.knots, span, t, self.degree);
        let p = self.degree;

        let mut wx = 0.0;
        let mut wy = 0.0;
        let mut wz = 0.0;
        let mut w_sum = 0.0;
        for i in 0..=p {
            let idx = span - p + i;
            let cp = self.control_points[idx];
            let w = self.weight(idx);
            let bw = basis[i] * w;
            wx += cp.x * bw;
            wy += cp.y * bw;
            wz += cp.z * bw;
            w_sum += bw;
        }
        Point3d::new(wx / w_sum, wy / w_sum, wz / w_sum)
    }

    /// Evaluate the first derivative at parameter t by central differences.
    pub fn derivative(&self, t: f64) -> Vec3 {
        let dt = 1e-8;
        let (tmin, tmax) = self.domain();
        let t0 = (t - dt).max(tmin);
        let t1 = (t + dt).min(tmax);
        let p0 = self.evaluate(t0);
        let p1 = self.evaluate(t1);
        let actual_dt = t1 - t0;
        if actual_dt.abs() < 1e-15 {
            return Vec3::ZERO;
        }
        (p1 - p0) / actual_dt
    }

    pub fn start_point(&self) -> Point3d {
        self.evaluate(self.domain().0)
    }

    pub fn end_point(&self) -> Point3d {
        self.evaluate(self.domain().1)
    }

    /// Compute an approximate arc length by sampling.
    pub fn approximate_length(&self, num_samples: usize) -> f64 {
        let (t0, t1) = self.domain();
        let mut length = 0.0;
        let mut prev = self.evaluate(t0);
        for i in 1..=num_samples {
            let t = t0 + (t1 - t0) * (i as f64 / num_samples as f64);
            let curr = self.evaluate(t);
            length += prev.distance_to(&curr);
            prev = curr;
        }
        length
    }

    /// Reverse the traversal sense while keeping the parameter domain.
    ///
    /// Control points and weights are reversed; the knot vector is mirrored
    /// about the domain so that `reversed.evaluate(t0 + t1 - t) == evaluate(t)`.
    pub fn reversed(&self) -> Self {
        let (t0, t1) = self.domain();
        let mut control_points = self.control_points.clone();
        control_points.reverse();
        let mut weights = self.weights.clone();
        weights.reverse();
        let mut knots: Vec<f64> = self.knots.iter().rev().map(|k| t0 + t1 - k).collect();
        // Guard against sign noise breaking non-decreasing order.
        for i in 1..knots.len() {
            if knots[i] < knots[i - 1] {
                knots[i] = knots[i - 1];
            }
        }
        Self {
            degree: self.degree,
            control_points,
            weights,
            knots,
        }
    }

    /// Translate the knot vector so the domain starts at `new_start`.
    pub fn with_knots_shifted_to(&self, new_start: f64) -> Self {
        let (t0, _) = self.domain();
        let offset = new_start - t0;
        let knots = self.knots.iter().map(|k| k + offset).collect();
        Self {
            degree: self.degree,
            control_points: self.control_points.clone(),
            weights: self.weights.clone(),
            knots,
        }
    }
}

/// A NURBS curve in the 2D parameter domain of a surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NurbsCurve2d {
    pub degree: usize,
    pub control_points: Vec<Point2d>,
    pub weights: Vec<f64>,
    pub knots: Vec<f64>,
}

impl NurbsCurve2d {
    pub fn new(degree: usize, control_points: Vec<Point2d>, weights: Vec<f64>, knots: Vec<f64>) -> Self {
        assert!(
            knots.len() == control_points.len() + degree + 1,
            "Knot vector length must be n + p + 1"
        );
        assert!(
            weights.is_empty() || weights.len() == control_points.len(),
            "Weights must be empty or same length as control points"
        );
        Self {
            degree,
            control_points,
            weights,
            knots,
        }
    }

    /// Create a non-rational 2D B-spline curve.
    pub fn bspline(degree: usize, control_points: Vec<Point2d>, knots: Vec<f64>) -> Self {
        Self::new(degree, control_points, vec![], knots)
    }

    /// Degree-1 interpolant through `points`, one knot per point.
    ///
    /// `params` must be strictly increasing and the same length as `points`.
    pub fn polyline(points: Vec<Point2d>, params: &[f64]) -> Self {
        assert!(points.len() >= 2, "polyline needs at least two points");
        assert_eq!(points.len(), params.len());
        let mut knots = Vec::with_capacity(points.len() + 2);
        knots.push(params[0]);
        knots.extend_from_slice(params);
        knots.push(params[params.len() - 1]);
        Self::bspline(1, points, knots)
    }

    fn is_rational(&self) -> bool {
        !self.weights.is_empty()
    }

    fn weight(&self, i: usize) -> f64 {
        if self.is_rational() {
            self.weights[i]
        } else {
            1.0
        }
    }

    pub fn num_control_points(&self) -> usize {
        self.control_points.len()
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.knots[self.degree], self.knots[self.knots.len() - self.degree - 1])
    }

    pub fn evaluate(&self, t: f64) -> Point2d {
        let span = find_span(&self.knots, self.num_control_points(), self.degree, t);
        let basis = basis_functions(&self.knots, span, t, self.degree);
        let p = self.degree;

        let mut wu = 0.0;
        let mut wv = 0.0;
        let mut w_sum = 0.0;
        for i in 0..=p {
            let idx = span - p + i;
            let cp = self.control_points[idx];
            let w = self.weight(idx);
            let bw = basis[i] * w;
            wu += cp.u * bw;
            wv += cp.v * bw;
            w_sum += bw;
        }
        Point2d::new(wu / w_sum, wv / w_sum)
    }

    pub fn derivative(&self, t: f64) -> Vec2 {
        let dt = 1e-8;
        let (tmin, tmax) = self.domain();
        let t0 = (t - dt).max(tmin);
        let t1 = (t + dt).min(tmax);
        let p0 = self.evaluate(t0);
        let p1 = self.evaluate(t1);
        let actual_dt = t1 - t0;
        if actual_dt.abs() < 1e-15 {
            return Vec2::ZERO;
        }
        let d = p1 - p0;
        Vec2::new(d.u / actual_dt, d.v / actual_dt)
    }
}

/// A NURBS surface (tensor-product).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NurbsSurface {
    pub degree_u: usize,
    pub degree_v: usize,
    /// Control points grid: [u_index * num_v + v_index]
    pub control_points: Vec<Point3d>,
    pub weights: Vec<f64>,
    pub knots_u: Vec<f64>,
    pub knots_v: Vec<f64>,
    pub num_u: usize,
    pub num_v: usize,
}

impl NurbsSurface {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        degree_u: usize,
        degree_v: usize,
        control_points: Vec<Point3d>,
        weights: Vec<f64>,
        knots_u: Vec<f64>,
        knots_v: Vec<f64>,
        num_u: usize,
        num_v: usize,
    ) -> Self {
        assert_eq!(control_points.len(), num_u * num_v);
        assert!(weights.is_empty() || weights.len() == num_u * num_v);
        assert_eq!(knots_u.len(), num_u + degree_u + 1);
        assert_eq!(knots_v.len(), num_v + degree_v + 1);
        Self {
            degree_u,
            degree_v,
            control_points,
            weights,
            knots_u,
            knots_v,
            num_u,
            num_v,
        }
    }

    fn is_rational(&self) -> bool {
        !self.weights.is_empty()
    }

    fn weight(&self, u_idx: usize, v_idx: usize) -> f64 {
        if self.is_rational() {
            self.weights[u_idx * self.num_v + v_idx]
        } else {
            1.0
        }
    }

    pub fn domain_u(&self) -> (f64, f64) {
        (
            self.knots_u[self.degree_u],
            self.knots_u[self.knots_u.len() - self.degree_u - 1],
        )
    }

    pub fn domain_v(&self) -> (f64, f64) {
        (
            self.knots_v[self.degree_v],
            self.knots_v[self.knots_v.len() - self.degree_v - 1],
        )
    }

    /// Evaluate the surface at (u, v).
    pub fn evaluate(&self, u: f64, v: f64) -> Point3d {
        let span_u = find_span(&self.knots_u, self.num_u, self.degree_u, u);
        let span_v = find_span(&self.knots_v, self.num_v, self.degree_v, v);
        let basis_u = basis_functions(&self.knots_u, span_u, u, self.degree_u);
        let basis_v = basis_functions(&self.knots_v, span_v, v, self.degree_v);

        let mut wx = 0.0;
        let mut wy = 0.0;
        let mut wz = 0.0;
        let mut w_sum = 0.0;

        for i in 0..=self.degree_u {
            let u_idx = span_u - self.degree_u + i;
            for j in 0..=self.degree_v {
                let v_idx = span_v - self.degree_v + j;
                let cp = self.control_points[u_idx * self.num_v + v_idx];
                let w = self.weight(u_idx, v_idx);
                let bw = basis_u[i] * basis_v[j] * w;
                wx += cp.x * bw;
                wy += cp.y * bw;
                wz += cp.z * bw;
                w_sum += bw;
            }
        }

        if self.is_rational() {
            Point3d::new(wx / w_sum, wy / w_sum, wz / w_sum)
        } else {
            Point3d::new(wx, wy, wz)
        }
    }

    /// Partial derivative along u via central differences.
    pub fn d_du(&self, u: f64, v: f64) -> Vec3 {
        let du = 1e-7;
        let (u_min, u_max) = self.domain_u();
        let u0 = (u - du).max(u_min);
        let u1 = (u + du).min(u_max);
        let actual = u1 - u0;
        if actual.abs() < 1e-15 {
            return Vec3::ZERO;
        }
        (self.evaluate(u1, v) - self.evaluate(u0, v)) / actual
    }

    /// Partial derivative along v via central differences.
    pub fn d_dv(&self, u: f64, v: f64) -> Vec3 {
        let dv = 1e-7;
        let (v_min, v_max) = self.domain_v();
        let v0 = (v - dv).max(v_min);
        let v1 = (v + dv).min(v_max);
        let actual = v1 - v0;
        if actual.abs() < 1e-15 {
            return Vec3::ZERO;
        }
        (self.evaluate(u, v1) - self.evaluate(u, v0)) / actual
    }

    /// Compute the surface normal at (u, v).
    pub fn normal(&self, u: f64, v: f64) -> Vec3 {
        let n = self.d_du(u, v).cross(&self.d_dv(u, v));
        n.normalized().unwrap_or(Vec3::Z)
    }
}

use serde::{Deserialize, Serialize};

use super::nurbs::NurbsSurface;
use super::point::Point3d;
use super::vector::Vec3;

/// All raw surface representations a face may arrive with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Surface {
    Plane(Plane),
    Cylinder(Cylinder),
    Cone(Cone),
    Sphere(Sphere),
    Torus(Torus),
    Nurbs(NurbsSurface),
}

/// An infinite plane with an in-plane (u, v) frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point3d,
    pub normal: Vec3,
    pub u_axis: Vec3,
    pub v_axis: Vec3,
}

impl Plane {
    pub fn new(origin: Point3d, normal: Vec3) -> Self {
        let normal = normal.normalize();
        let u_axis = if normal.x.abs() < 0.9 {
            Vec3::X.cross(&normal).normalize()
        } else {
            Vec3::Y.cross(&normal).normalize()
        };
        let v_axis = normal.cross(&u_axis);
        Self {
            origin,
            normal,
            u_axis,
            v_axis,
        }
    }

    pub fn xy() -> Self {
        Self {
            origin: Point3d::ORIGIN,
            normal: Vec3::Z,
            u_axis: Vec3::X,
            v_axis: Vec3::Y,
        }
    }

    pub fn evaluate(&self, u: f64, v: f64) -> Point3d {
        self.origin + self.u_axis * u + self.v_axis * v
    }
}

/// A cylinder surface (infinite along axis).
/// Parameterized by (u = angle, v = height along axis).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Cylinder {
    pub origin: Point3d,
    pub axis: Vec3,
    pub radius: f64,
    pub ref_dir: Vec3,
}

impl Cylinder {
    pub fn new(origin: Point3d, axis: Vec3, radius: f64) -> Self {
        let axis = axis.normalize();
        let ref_dir = if axis.x.abs() < 0.9 {
            Vec3::X.cross(&axis).normalize()
        } else {
            Vec3::Y.cross(&axis).normalize()
        };
        Self {
            origin,
            axis,
            radius,
            ref_dir,
        }
    }

    pub fn evaluate(&self, u: f64, v: f64) -> Point3d {
        let y_dir = self.axis.cross(&self.ref_dir);
        self.origin
            + self.ref_dir * (self.radius * u.cos())
            + y_dir * (self.radius * u.sin())
            + self.axis * v
    }
}

/// A cone surface. Parameterized by (u = angle, v = distance from apex along axis).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Cone {
    pub apex: Point3d,
    pub axis: Vec3,
    pub half_angle: f64,
    pub ref_dir: Vec3,
}

impl Cone {
    pub fn new(apex: Point3d, axis: Vec3, half_angle: f64) -> Self {
        let axis = axis.normalize();
        let ref_dir = if axis.x.abs() < 0.9 {
            Vec3::X.cross(&axis).normalize()
        } else {
            Vec3::Y.cross(&axis).normalize()
        };
        Self {
            apex,
            axis,
            half_angle,
            ref_dir,
        }
    }

    pub fn evaluate(&self, u: f64, v: f64) -> Point3d {
        let y_dir = self.axis.cross(&self.ref_dir);
        let r = v * self.half_angle.tan();
        self.apex + self.axis * v + self.ref_dir * (r * u.cos()) + y_dir * (r * u.sin())
    }
}

/// A sphere surface. Parameterized by (u = longitude, v = latitude).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Point3d,
    pub radius: f64,
    pub axis: Vec3,
    pub ref_dir: Vec3,
}

impl Sphere {
    pub fn new(center: Point3d, radius: f64) -> Self {
        Self {
            center,
            radius,
            axis: Vec3::Z,
            ref_dir: Vec3::X,
        }
    }

    pub fn evaluate(&self, u: f64, v: f64) -> Point3d {
        let y_dir = self.axis.cross(&self.ref_dir);
        let cos_v = v.cos();
        self.center
            + self.ref_dir * (self.radius * cos_v * u.cos())
            + y_dir * (self.radius * cos_v * u.sin())
            + self.axis * (self.radius * v.sin())
    }
}

/// A torus surface. Parameterized by (u = major angle, v = minor angle).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Torus {
    pub center: Point3d,
    pub axis: Vec3,
    pub major_radius: f64,
    pub minor_radius: f64,
    pub ref_dir: Vec3,
}

impl Torus {
    pub fn new(center: Point3d, axis: Vec3, major_radius: f64, minor_radius: f64) -> Self {
        let axis = axis.normalize();
        let ref_dir = if axis.x.abs() < 0.9 {
            Vec3::X.cross(&axis).normalize()
        } else {
            Vec3::Y.cross(&axis).normalize()
        };
        Self {
            center,
            axis,
            major_radius,
            minor_radius,
            ref_dir,
        }
    }

    pub fn evaluate(&self, u: f64, v: f64) -> Point3d {
        let y_dir = self.axis.cross(&self.ref_dir);
        let r = self.major_radius + self.minor_radius * v.cos();
        self.center
            + self.ref_dir * (r * u.cos())
            + y_dir * (r * u.sin())
            + self.axis * (self.minor_radius * v.sin())
    }
}

impl Surface {
    pub fn evaluate(&self, u: f64, v: f64) -> Point3d {
        match self {
            Surface::Plane(p) => p.evaluate(u, v),
            Surface::Cylinder(c) => c.evaluate(u, v),
            Surface::Cone(c) => c.evaluate(u, v),
            Surface::Sphere(s) => s.evaluate(u, v),
            Surface::Torus(t) => t.evaluate(u, v),
            Surface::Nurbs(n) => n.evaluate(u, v),
        }
    }

    pub fn surface_type_name(&self) -> &'static str {
        match self {
            Surface::Plane(_) => "Plane",
            Surface::Cylinder(_) => "Cylinder",
            Surface::Cone(_) => "Cone",
            Surface::Sphere(_) => "Sphere",
            Surface::Torus(_) => "Torus",
            Surface::Nurbs(_) => "Nurbs",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_plane_evaluate() {
        let p = Plane::xy();
        let pt = p.evaluate(3.0, 4.0);
        assert!((pt.x - 3.0).abs() < 1e-12);
        assert!((pt.y - 4.0).abs() < 1e-12);
        assert!(pt.z.abs() < 1e-12);
    }

    #[test]
    fn test_cylinder_on_surface() {
        let c = Cylinder::new(Point3d::ORIGIN, Vec3::Z, 5.0);
        for i in 0..20 {
            let u = 2.0 * PI * (i as f64 / 20.0);
            let p = c.evaluate(u, 0.0);
            let r = (p.x * p.x + p.y * p.y).sqrt();
            assert!((r - 5.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_sphere_on_surface() {
        let s = Sphere::new(Point3d::ORIGIN, 3.0);
        for i in 0..10 {
            for j in 0..10 {
                let u = 2.0 * PI * (i as f64 / 10.0);
                let v = -FRAC_PI_2 + PI * (j as f64 / 10.0);
                let p = s.evaluate(u, v);
                let r = p.distance_to(&Point3d::ORIGIN);
                assert!((r - 3.0).abs() < 1e-10, "r={} at u={}, v={}", r, u, v);
            }
        }
    }

    #[test]
    fn test_torus_on_surface() {
        let t = Torus::new(Point3d::ORIGIN, Vec3::Z, 10.0, 3.0);
        for i in 0..10 {
            let u = 2.0 * PI * (i as f64 / 10.0);
            let p = t.evaluate(u, 0.0);
            let dist_xy = (p.x * p.x + p.y * p.y).sqrt();
            assert!((dist_xy - 13.0).abs() < 1e-8, "dist_xy={} at u={}", dist_xy, u);
        }
    }

    #[test]
    fn test_cone_radius_grows_linearly() {
        let c = Cone::new(Point3d::ORIGIN, Vec3::Z, PI / 4.0);
        let p1 = c.evaluate(0.0, 1.0);
        let p2 = c.evaluate(0.0, 2.0);
        let r1 = (p1.x * p1.x + p1.y * p1.y).sqrt();
        let r2 = (p2.x * p2.x + p2.y * p2.y).sqrt();
        assert!((r1 - 1.0).abs() < 1e-10);
        assert!((r2 - 2.0).abs() < 1e-10);
    }
}

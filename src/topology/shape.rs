//! Arena-backed model of the imported shape.
//!
//! The (excluded) model importer populates this store; the pipeline only
//! reads from it. Outer-vs-inner standing of a loop is supplied by the
//! importer through `Face::outer_loop` / `Face::inner_loops` and is never
//! re-derived geometrically.

use slotmap::{new_key_type, SlotMap};

use crate::geometry::curves::Curve;
use crate::geometry::surfaces::Surface;

new_key_type! {
    pub struct FaceId;
    pub struct LoopId;
    pub struct SegmentId;
}

/// One piece of a loop's boundary.
#[derive(Debug, Clone)]
pub struct BoundarySegment {
    pub curve: Curve,
    /// Parameter interval [t_start, t_end] on `curve`.
    pub t_start: f64,
    pub t_end: f64,
    /// true if the segment traverses its curve in the forward direction
    /// relative to loop order.
    pub forward: bool,
    /// Zero-length/collapsed segment; skipped during composition but kept in
    /// loop iteration order.
    pub degenerate: bool,
}

impl BoundarySegment {
    pub fn forward(curve: Curve, t_start: f64, t_end: f64) -> Self {
        Self {
            curve,
            t_start,
            t_end,
            forward: true,
            degenerate: false,
        }
    }

    pub fn degenerate(curve: Curve, t: f64) -> Self {
        Self {
            curve,
            t_start: t,
            t_end: t,
            forward: true,
            degenerate: true,
        }
    }
}

/// Ordered, cyclic sequence of boundary segments bounding a face region.
#[derive(Debug, Clone)]
pub struct Loop {
    pub segments: Vec<SegmentId>,
    pub face: FaceId,
}

/// A face of the imported shape: a raw surface, its parameter bounds, and
/// one outer plus zero or more inner loops.
#[derive(Debug, Clone)]
pub struct Face {
    pub surface: Surface,
    pub u_bounds: (f64, f64),
    pub v_bounds: (f64, f64),
    pub outer_loop: LoopId,
    pub inner_loops: Vec<LoopId>,
}

impl Face {
    /// All loops of the face, outer first.
    pub fn loops(&self) -> impl Iterator<Item = LoopId> + '_ {
        std::iter::once(self.outer_loop).chain(self.inner_loops.iter().copied())
    }

    pub fn loop_count(&self) -> usize {
        1 + self.inner_loops.len()
    }
}

/// Arena-based storage for the imported shape topology.
#[derive(Debug, Clone, Default)]
pub struct ShapeStore {
    pub faces: SlotMap<FaceId, Face>,
    pub loops: SlotMap<LoopId, Loop>,
    pub segments: SlotMap<SegmentId, BoundarySegment>,
}

impl ShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a face with its outer loop's segments; inner loops can be
    /// appended with [`ShapeStore::add_inner_loop`].
    pub fn add_face(
        &mut self,
        surface: Surface,
        u_bounds: (f64, f64),
        v_bounds: (f64, f64),
        outer_segments: Vec<BoundarySegment>,
    ) -> FaceId {
        let outer_loop = self.loops.insert(Loop {
            segments: vec![],
            face: FaceId::default(),
        });
        let face_id = self.faces.insert(Face {
            surface,
            u_bounds,
            v_bounds,
            outer_loop,
            inner_loops: vec![],
        });
        self.loops[outer_loop].face = face_id;
        self.fill_loop(outer_loop, outer_segments);
        face_id
    }

    /// Append an inner (hole) loop to an existing face.
    pub fn add_inner_loop(&mut self, face_id: FaceId, segments: Vec<BoundarySegment>) -> LoopId {
        let loop_id = self.loops.insert(Loop {
            segments: vec![],
            face: face_id,
        });
        self.fill_loop(loop_id, segments);
        self.faces[face_id].inner_loops.push(loop_id);
        loop_id
    }

    fn fill_loop(&mut self, loop_id: LoopId, segments: Vec<BoundarySegment>) {
        let ids: Vec<SegmentId> = segments
            .into_iter()
            .map(|s| self.segments.insert(s))
            .collect();
        self.loops[loop_id].segments = ids;
    }

    /// Boundary segments of a loop in traversal order.
    pub fn ordered_segments(&self, loop_id: LoopId) -> impl Iterator<Item = &BoundarySegment> {
        self.loops[loop_id]
            .segments
            .iter()
            .map(move |&sid| &self.segments[sid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::curves::Line3d;
    use crate::geometry::point::Point3d;
    use crate::geometry::surfaces::Plane;
    use crate::geometry::vector::Vec3;

    fn segment(a: Point3d, b: Point3d) -> BoundarySegment {
        let len = a.distance_to(&b);
        BoundarySegment::forward(Curve::Line(Line3d::from_points(a, b)), 0.0, len)
    }

    #[test]
    fn test_face_loop_order() {
        let mut store = ShapeStore::new();
        let face_id = store.add_face(
            Surface::Plane(Plane::xy()),
            (0.0, 1.0),
            (0.0, 1.0),
            vec![segment(
                Point3d::ORIGIN,
                Point3d::new(1.0, 0.0, 0.0),
            )],
        );
        let inner = store.add_inner_loop(
            face_id,
            vec![segment(
                Point3d::new(0.2, 0.2, 0.0),
                Point3d::new(0.8, 0.2, 0.0),
            )],
        );

        let face = &store.faces[face_id];
        assert_eq!(face.loop_count(), 2);
        let loops: Vec<LoopId> = face.loops().collect();
        assert_eq!(loops[0], face.outer_loop);
        assert_eq!(loops[1], inner);
    }

    #[test]
    fn test_ordered_segments_preserve_insertion_order() {
        let mut store = ShapeStore::new();
        let p = [
            Point3d::ORIGIN,
            Point3d::new(1.0, 0.0, 0.0),
            Point3d::new(1.0, 1.0, 0.0),
        ];
        let face_id = store.add_face(
            Surface::Plane(Plane::xy()),
            (0.0, 1.0),
            (0.0, 1.0),
            vec![segment(p[0], p[1]), segment(p[1], p[2])],
        );
        let face = &store.faces[face_id];
        let starts: Vec<Point3d> = store
            .ordered_segments(face.outer_loop)
            .map(|s| s.curve.evaluate(s.t_start))
            .collect();
        assert!(starts[0].distance_to(&p[0]) < 1e-12);
        assert!(starts[1].distance_to(&p[1]) < 1e-12);
    }

    #[test]
    fn test_degenerate_segment_flag() {
        let c = Curve::Line(Line3d::new(Point3d::ORIGIN, Vec3::X));
        let s = BoundarySegment::degenerate(c, 0.0);
        assert!(s.degenerate);
        assert_eq!(s.t_start, s.t_end);
    }
}

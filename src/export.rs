//! Result Exporter: serde types for the JSON document produced from a
//! processed shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Parameter bounds of a face's canonical surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceBounds {
    pub u1: f64,
    pub u2: f64,
    pub v1: f64,
    pub v2: f64,
}

/// Sampled trim curve as parallel coordinate arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PcurveSamples {
    #[serde(rename = "U")]
    pub u: Vec<f64>,
    #[serde(rename = "V")]
    pub v: Vec<f64>,
}

impl PcurveSamples {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            u: Vec::with_capacity(n),
            v: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, u: f64, v: f64) {
        self.u.push(u);
        self.v.push(v);
    }

    pub fn len(&self) -> usize {
        self.u.len()
    }

    pub fn is_empty(&self) -> bool {
        self.u.is_empty()
    }
}

/// One exported face: surface bounds plus its sampled boundary pcurves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceEntry {
    pub surface_bounds: SurfaceBounds,
    pub outer_pcurve: PcurveSamples,
    pub inner_pcurves: Vec<PcurveSamples>,
}

/// The whole exported document, keyed by face label.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShapeDocument {
    #[serde(flatten)]
    faces: BTreeMap<String, FaceEntry>,
}

impl ShapeDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: String, entry: FaceEntry) {
        self.faces.insert(label, entry);
    }

    pub fn get(&self, label: &str) -> Option<&FaceEntry> {
        self.faces.get(label)
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FaceEntry)> {
        self.faces.iter()
    }
}

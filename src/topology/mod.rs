pub mod shape;
pub mod primitives;

pub mod point;
pub mod vector;
pub mod curves;
pub mod surfaces;
pub mod nurbs;
pub mod convert;

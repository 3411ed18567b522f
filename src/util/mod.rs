pub mod geometry;
pub mod trace;

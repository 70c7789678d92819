//! Builder style entry points, one module per workflow.

pub mod compare;
pub mod hide;
pub mod unveil;

pub mod config;
pub mod consts;
pub mod error;
pub mod geometry;
pub mod image;
pub mod reticle;
pub mod session;
pub mod sync;
pub mod transform;
pub mod viewport;

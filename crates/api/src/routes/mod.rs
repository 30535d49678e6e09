//! HTTP Routes

pub mod health;
pub mod prometheus;
pub mod predict;

//! Render-time contract
//!
//! Per frame the host calls [`publish_frame`], which selects the highest-priority
//! registered volume and pushes its light arrays, placement and index texture to a
//! [`ShaderParameterSink`].

pub mod params;
mod volumes;

pub use params::{names, ParameterBlock, ParameterValue, ShaderParameterSink};
pub use volumes::{publish_frame, VolumeKey, VolumeRegistry};

//! Light sources
//!
//! Point light data, the registry that owns it, and the per-light attenuation terms the
//! shader consumes.

mod attenuation;
mod light;
mod registry;

pub use attenuation::{Attenuation, FADE_START_FRACTION, MIN_RANGE_SQR};
pub use light::{BakeLight, BakedPlacement, LightId, PointLight, MAX_LIGHTS};
pub use registry::{LightKey, LightRegistry};

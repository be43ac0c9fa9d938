//! Value types for light control parameters.

mod brightness;
mod dim_level;
mod power;

pub use brightness::Brightness;
pub use dim_level::DimLevel;
pub use power::PowerState;

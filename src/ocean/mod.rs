pub mod field;
pub mod noise;
pub mod ocean_cascade;
pub mod ocean_parameters;
pub mod ocean_surface;
pub mod pipelines;
pub mod spectrum_model;

pub use ocean_cascade::CascadeBand;
pub use ocean_parameters::{ConfigError, OceanConfiguration, OceanWaveParameters};
pub use ocean_surface::OceanSurface;
pub use spectrum_model::{JonswapSpectrum, SpectrumModel};

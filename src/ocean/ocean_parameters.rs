use std::error::Error;
use std::fmt;

use cgmath::Vector2;

use crate::ocean::ocean_cascade::CascadeBand;

/// Grid sizes below this leave the twiddle pass with less than one full
/// work group per stage (N/2 over the 8-wide granularity).
pub const MIN_GRID_SIZE: u32 = 16;

/// Physical and shaping inputs of the wave spectrum. Passed into every
/// recomputation as an immutable snapshot; editing them marks the frozen
/// spectrum dirty rather than mutating shared state in place.
#[derive(Clone, Copy, Debug)]
pub struct OceanWaveParameters {
  pub wind_speed: f32,
  /// Unit vector the wind blows toward, in the horizontal plane.
  pub wind_direction: Vector2<f32>,
  pub gravity: f32,
  pub fetch: f32,
  pub depth: f32,
  /// 0..1, pulls the directional spread toward long swell.
  pub swell: f32,
  pub spread_blend: f32,
  pub peak_enhancement: f32,
  /// Attenuates wavelengths shorter than roughly this many meters.
  pub short_waves_fade: f32,
  pub scale: f32,
}

impl Default for OceanWaveParameters {
  fn default() -> OceanWaveParameters {
    OceanWaveParameters {
      wind_speed: 10.0,
      wind_direction: Vector2::new(1.0, 0.0),
      gravity: 9.81,
      fetch: 100000.0,
      depth: 500.0,
      swell: 0.7,
      spread_blend: 1.0,
      peak_enhancement: 3.3,
      short_waves_fade: 0.01,
      scale: 1.0,
    }
  }
}

/// Grid size plus the ordered cascade bands. Band 0 serves the height
/// query. Validated before any field is allocated.
#[derive(Clone, Debug)]
pub struct OceanConfiguration {
  pub size: u32,
  pub bands: Vec<CascadeBand>,
}

impl OceanConfiguration {
  pub fn new(size: u32, bands: Vec<CascadeBand>) -> Self {
    Self { size, bands }
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if !self.size.is_power_of_two() {
      return Err(ConfigError::SizeNotPowerOfTwo(self.size));
    }
    if self.size < MIN_GRID_SIZE {
      return Err(ConfigError::SizeBelowMinimum {
        size: self.size,
        min: MIN_GRID_SIZE,
      });
    }
    if self.bands.is_empty() {
      return Err(ConfigError::NoCascades);
    }
    for (index, band) in self.bands.iter().enumerate() {
      if !(band.wavelength > 0.0) {
        return Err(ConfigError::InvalidWavelength {
          band: index,
          wavelength: band.wavelength,
        });
      }
      if !(band.cutoff_low >= 0.0 && band.cutoff_low < band.cutoff_high) {
        return Err(ConfigError::InvalidCutoffs {
          band: index,
          low: band.cutoff_low,
          high: band.cutoff_high,
        });
      }
    }
    for pair in self.bands.windows(2) {
      if pair[1].cutoff_low < pair[0].cutoff_high {
        log::warn!(
          "cascade bands overlap ({}..{} then {}..{}); overlapping wavenumbers double-count energy",
          pair[0].cutoff_low,
          pair[0].cutoff_high,
          pair[1].cutoff_low,
          pair[1].cutoff_high,
        );
      }
    }
    Ok(())
  }
}

/// Fatal configuration problems, reported at construction time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigError {
  SizeNotPowerOfTwo(u32),
  SizeBelowMinimum { size: u32, min: u32 },
  NoCascades,
  InvalidWavelength { band: usize, wavelength: f32 },
  InvalidCutoffs { band: usize, low: f32, high: f32 },
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::SizeNotPowerOfTwo(size) => {
        write!(f, "grid size {size} is not a power of two")
      }
      ConfigError::SizeBelowMinimum { size, min } => {
        write!(f, "grid size {size} is below the minimum of {min}")
      }
      ConfigError::NoCascades => write!(f, "at least one cascade band is required"),
      ConfigError::InvalidWavelength { band, wavelength } => {
        write!(f, "cascade {band} has non-positive wavelength {wavelength}")
      }
      ConfigError::InvalidCutoffs { band, low, high } => {
        write!(
          f,
          "cascade {band} has invalid cutoffs: low {low} must be >= 0 and < high {high}"
        )
      }
    }
  }
}

impl Error for ConfigError {}

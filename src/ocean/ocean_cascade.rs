use std::f32::consts::PI;

/// One wavenumber band of the surface.
///
/// The wavelength is the reference scale mapping texels to wavenumbers;
/// the cutoffs band-limit the spectrum so adjacent cascades do not
/// double-count energy. Cascades are ordered and band 0 is the one the
/// height query reads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CascadeBand {
  pub wavelength: f32,
  pub cutoff_low: f32,
  pub cutoff_high: f32,
}

impl CascadeBand {
  /// Smallest wavelength a band can still resolve with roughly six
  /// texels per period, used to place the default boundaries.
  fn resolution_cutoff(wavelength: f32) -> f32 {
    2.0 * PI / wavelength * 6.0
  }

  /// Three-scale split covering swell through ripple.
  pub fn default_bands() -> Vec<CascadeBand> {
    let wavelength_0 = 500.0;
    let wavelength_1 = 85.0;
    let wavelength_2 = 10.0;

    let boundary_1 = Self::resolution_cutoff(wavelength_1);
    let boundary_2 = Self::resolution_cutoff(wavelength_2);

    vec![
      CascadeBand {
        wavelength: wavelength_0,
        cutoff_low: 0.0001,
        cutoff_high: boundary_1,
      },
      CascadeBand {
        wavelength: wavelength_1,
        cutoff_low: boundary_1,
        cutoff_high: boundary_2,
      },
      CascadeBand {
        wavelength: wavelength_2,
        cutoff_low: boundary_2,
        cutoff_high: 9999.0,
      },
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_bands_tile_the_wavenumber_axis() {
    let bands = CascadeBand::default_bands();
    assert_eq!(bands.len(), 3);
    for pair in bands.windows(2) {
      assert_eq!(pair[0].cutoff_high, pair[1].cutoff_low);
      assert!(pair[0].wavelength > pair[1].wavelength);
    }
  }
}

use std::f32::consts::PI;

use crate::compute::ComputeDevice;
use crate::ocean::field::{Complex32, Grid, SpectrumPair, WaveData};
use crate::ocean::noise::NoiseField;
use crate::ocean::ocean_cascade::CascadeBand;
use crate::ocean::ocean_parameters::OceanWaveParameters;
use crate::ocean::spectrum_model::SpectrumModel;

/// Wavenumbers below this are treated as the DC texel.
const MIN_WAVENUMBER: f32 = 1e-6;

/// Builds the frozen spectrum: per-texel wave metadata plus the H0
/// amplitude pair used by the time evolution step. Runs at startup and
/// whenever wave parameters change, never per frame.
pub struct InitialSpectrumPipeline {
  size: usize,
  h0k: Grid<Complex32>,
}

impl InitialSpectrumPipeline {
  pub fn new(size: usize, layers: usize) -> Self {
    Self {
      size,
      h0k: Grid::new(size, layers),
    }
  }

  pub fn dispatch(
    &mut self,
    device: &ComputeDevice,
    noise: &NoiseField,
    bands: &[CascadeBand],
    params: &OceanWaveParameters,
    model: &dyn SpectrumModel,
    spectrum: &mut Grid<SpectrumPair>,
    waves_data: &mut Grid<WaveData>,
  ) {
    let size = self.size;
    let half = size as f32 / 2.0;
    let wind_angle = params.wind_direction.y.atan2(params.wind_direction.x);
    let depth = params.depth;
    let gravity = params.gravity;

    device.dispatch2(
      self.h0k.as_mut_slice(),
      waves_data.as_mut_slice(),
      size,
      |row, h0_row, wave_row| {
        let layer = row / size;
        let y = row % size;
        let band = &bands[layer];
        let dk = 2.0 * PI / band.wavelength;

        let k_z = (y as f32 - half) * dk;
        for x in 0..size {
          let k_x = (x as f32 - half) * dk;
          let k = (k_x * k_x + k_z * k_z).sqrt();

          if k < MIN_WAVENUMBER {
            h0_row[x] = Complex32::default();
            wave_row[x] = WaveData {
              k_x,
              one_over_k: 1.0,
              k_z,
              omega: 0.0,
            };
            continue;
          }

          let kd_tanh = (k * depth).tanh();
          let omega = (gravity * k * kd_tanh).sqrt();
          // d(omega)/dk through the finite-depth dispersion relation;
          // sech^2 written as 1 - tanh^2.
          let d_omega_dk =
            gravity * (kd_tanh + k * depth * (1.0 - kd_tanh * kd_tanh)) / (2.0 * omega);

          let theta = k_z.atan2(k_x) - wind_angle;
          let variance = model.variance(k, theta, omega, d_omega_dk);
          let window = band_window(k, band.cutoff_low, band.cutoff_high);

          h0_row[x] = noise.sample(x, y) * (variance * dk * dk / 2.0).sqrt() * window;
          wave_row[x] = WaveData {
            k_x,
            one_over_k: 1.0 / k,
            k_z,
            omega,
          };
        }
      },
    );

    let h0k = &self.h0k;
    device.dispatch(spectrum.as_mut_slice(), size, |row, out| {
      let layer = row / size;
      let y = row % size;
      let mirror_y = (size - y) % size;
      for (x, slot) in out.iter_mut().enumerate() {
        let mirror_x = (size - x) % size;
        *slot = SpectrumPair {
          h0: h0k.get(layer, x, y),
          h0_minus_k_conj: h0k.get(layer, mirror_x, mirror_y).conj(),
        };
      }
    });
  }
}

/// Band-pass window over [low, high] with smoothstep shoulders so
/// adjacent cascades hand energy over without a hard seam.
fn band_window(k: f32, low: f32, high: f32) -> f32 {
  if k < low || k > high {
    return 0.0;
  }
  let width = 0.1 * (high - low);
  smoothstep(low, low + width, k) * (1.0 - smoothstep(high - width, high, k))
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
  let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
  t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ocean::spectrum_model::JonswapSpectrum;

  fn build(size: usize, band: CascadeBand) -> (Grid<SpectrumPair>, Grid<WaveData>) {
    let params = OceanWaveParameters::default();
    let model = JonswapSpectrum::from_parameters(&params);
    let noise = NoiseField::seeded(size, 11);
    let device = ComputeDevice::new(2);

    let mut spectrum = Grid::new(size, 1);
    let mut waves_data = Grid::new(size, 1);
    let mut pipeline = InitialSpectrumPipeline::new(size, 1);
    pipeline.dispatch(
      &device,
      &noise,
      &[band],
      &params,
      &model,
      &mut spectrum,
      &mut waves_data,
    );
    (spectrum, waves_data)
  }

  fn wide_band() -> CascadeBand {
    CascadeBand {
      wavelength: 100.0,
      cutoff_low: 0.0001,
      cutoff_high: 9999.0,
    }
  }

  #[test]
  fn pairs_hold_the_mirrored_conjugate() {
    let size = 32;
    let (spectrum, _) = build(size, wide_band());
    for y in 0..size {
      for x in 0..size {
        let pair = spectrum.get(0, x, y);
        let mirror = spectrum.get(0, (size - x) % size, (size - y) % size);
        assert_eq!(pair.h0_minus_k_conj, mirror.h0.conj());
      }
    }
  }

  #[test]
  fn energy_stays_inside_the_band_cutoffs() {
    let size = 32;
    let band = CascadeBand {
      wavelength: 100.0,
      cutoff_low: 0.2,
      cutoff_high: 0.5,
    };
    let (spectrum, waves_data) = build(size, band);
    let mut inside = 0;
    for y in 0..size {
      for x in 0..size {
        let w = waves_data.get(0, x, y);
        let k = (w.k_x * w.k_x + w.k_z * w.k_z).sqrt();
        let h0 = spectrum.get(0, x, y).h0;
        if k < band.cutoff_low || k > band.cutoff_high {
          assert_eq!(h0, Complex32::default(), "energy leaked to k {k}");
        } else if h0 != Complex32::default() {
          inside += 1;
        }
      }
    }
    assert!(inside > 0, "band produced no energy at all");
  }

  #[test]
  fn dc_texel_carries_no_wave() {
    let size = 32;
    let (spectrum, waves_data) = build(size, wide_band());
    let center = size / 2;
    let w = waves_data.get(0, center, center);
    assert_eq!(w.omega, 0.0);
    assert_eq!(w.one_over_k, 1.0);
    assert_eq!(spectrum.get(0, center, center).h0, Complex32::default());
  }

  #[test]
  fn omega_follows_deep_water_dispersion() {
    let size = 32;
    let (_, waves_data) = build(size, wide_band());
    let w = waves_data.get(0, 20, 16);
    let k = (w.k_x * w.k_x + w.k_z * w.k_z).sqrt();
    let deep = (9.81 * k).sqrt();
    assert!(
      (w.omega - deep).abs() < deep * 1e-3,
      "omega {} vs deep-water {deep}",
      w.omega
    );
  }
}

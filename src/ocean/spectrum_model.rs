use std::f32::consts::PI;

use crate::ocean::ocean_parameters::OceanWaveParameters;

/// Energy model evaluated once per texel when the frozen spectrum is
/// (re)built. Implementations return the variance density in wavenumber
/// space; the pipeline handles amplitude conversion and band limiting.
pub trait SpectrumModel: Send + Sync {
  /// Variance contributed by the wave with wavenumber `k`, propagation
  /// angle `theta` relative to the wind, dispersion frequency `omega`
  /// and group-velocity factor `d_omega_dk`.
  fn variance(&self, k: f32, theta: f32, omega: f32, d_omega_dk: f32) -> f32;
}

/// Fetch-limited JONSWAP frequency spectrum with a swell-weighted
/// cosine-power directional spread.
#[derive(Clone, Copy, Debug)]
pub struct JonswapSpectrum {
  alpha: f32,
  peak_omega: f32,
  gravity: f32,
  peak_enhancement: f32,
  swell: f32,
  spread_blend: f32,
  short_waves_fade: f32,
  scale: f32,
  zero_energy: bool,
}

impl JonswapSpectrum {
  pub fn from_parameters(params: &OceanWaveParameters) -> Self {
    let zero_energy =
      !(params.wind_speed > 0.0) || !(params.fetch > 0.0) || !(params.gravity > 0.0);

    let (alpha, peak_omega) = if zero_energy {
      (0.0, 1.0)
    } else {
      (
        jonswap_alpha(params.gravity, params.fetch, params.wind_speed),
        jonswap_peak_frequency(params.gravity, params.fetch, params.wind_speed),
      )
    };

    Self {
      alpha,
      peak_omega,
      gravity: params.gravity,
      peak_enhancement: params.peak_enhancement,
      swell: params.swell.clamp(0.01, 1.0),
      spread_blend: params.spread_blend.clamp(0.0, 1.0),
      short_waves_fade: params.short_waves_fade,
      scale: params.scale,
      zero_energy,
    }
  }

  pub fn peak_omega(&self) -> f32 {
    self.peak_omega
  }

  fn frequency_spectrum(&self, omega: f32) -> f32 {
    let sigma = if omega <= self.peak_omega { 0.07 } else { 0.09 };
    let r = (-(omega - self.peak_omega) * (omega - self.peak_omega)
      / (2.0 * sigma * sigma * self.peak_omega * self.peak_omega))
      .exp();
    let omega_ratio = self.peak_omega / omega;

    self.alpha * self.gravity * self.gravity / omega.powi(5)
      * (-1.25 * omega_ratio.powi(4)).exp()
      * self.peak_enhancement.powf(r)
  }

  fn directional_spread(&self, theta: f32, omega: f32) -> f32 {
    let ratio = omega / self.peak_omega;
    let base = if ratio > 1.0 {
      9.77 * ratio.powf(-2.5)
    } else {
      6.97 * ratio.powf(5.0)
    };
    let s = base + 16.0 * (self.peak_omega / omega).tanh() * self.swell * self.swell;

    let spread = spread_normalization(s) * (theta * 0.5).cos().abs().powf(2.0 * s);
    lerp(0.5 / PI, spread, self.spread_blend)
  }
}

impl SpectrumModel for JonswapSpectrum {
  fn variance(&self, k: f32, theta: f32, omega: f32, d_omega_dk: f32) -> f32 {
    if self.zero_energy || !(omega > 0.0) || !(k > 0.0) {
      return 0.0;
    }

    let fade = (-self.short_waves_fade * self.short_waves_fade * k * k).exp();

    self.scale
      * self.frequency_spectrum(omega)
      * self.directional_spread(theta, omega)
      * fade
      * d_omega_dk.abs()
      / k
  }
}

pub fn jonswap_alpha(gravity: f32, fetch: f32, wind_speed: f32) -> f32 {
  0.076 * (gravity * fetch / wind_speed / wind_speed).powf(-0.22)
}

pub fn jonswap_peak_frequency(gravity: f32, fetch: f32, wind_speed: f32) -> f32 {
  22.0 * (wind_speed * fetch / gravity / gravity).powf(-0.33)
}

/// Polynomial fit of the cos^(2s) normalization constant.
fn spread_normalization(s: f32) -> f32 {
  if s < 5.0 {
    -0.000564 * s.powi(4) + 0.00776 * s.powi(3) - 0.044 * s.powi(2) + 0.192 * s + 0.163
  } else {
    -4.80e-8 * s.powi(4) + 1.07e-5 * s.powi(3) - 9.53e-4 * s.powi(2) + 5.90e-2 * s + 3.93e-1
  }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
  a + (b - a) * t
}

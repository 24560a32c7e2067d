use std::time::{Duration, Instant};

use fft_ocean::ocean::{
  CascadeBand, OceanConfiguration, OceanSurface, OceanWaveParameters,
};

fn single_band_config(size: u32) -> OceanConfiguration {
  OceanConfiguration::new(
    size,
    vec![CascadeBand {
      wavelength: 100.0,
      cutoff_low: 0.01,
      cutoff_high: 1.0,
    }],
  )
}

fn surface(size: u32, seed: u64) -> OceanSurface {
  OceanSurface::seeded(single_band_config(size), OceanWaveParameters::default(), seed)
    .expect("valid configuration")
}

#[test]
fn displacement_has_zero_mean() {
  let mut ocean = surface(256, 1);
  ocean.dispatch(3.0, 1.0 / 60.0);

  let base = ocean.displacement().base();
  let mut sum = (0.0f64, 0.0f64, 0.0f64);
  for sample in base.layer(0) {
    sum.0 += sample.x as f64;
    sum.1 += sample.y as f64;
    sum.2 += sample.z as f64;
  }
  let texels = (256 * 256) as f64;
  assert!((sum.0 / texels).abs() < 1e-2, "x mean {}", sum.0 / texels);
  assert!((sum.1 / texels).abs() < 1e-2, "y mean {}", sum.1 / texels);
  assert!((sum.2 / texels).abs() < 1e-2, "z mean {}", sum.2 / texels);
}

#[test]
fn same_seed_reproduces_the_surface_exactly() {
  let mut a = surface(64, 77);
  let mut b = surface(64, 77);

  for tick in 0..3 {
    let time = tick as f32 / 60.0;
    a.dispatch(time, 1.0 / 60.0);
    b.dispatch(time, 1.0 / 60.0);
  }

  assert_eq!(
    a.displacement().base().as_slice(),
    b.displacement().base().as_slice()
  );
  assert_eq!(
    a.derivatives().base().as_slice(),
    b.derivatives().base().as_slice()
  );
  assert_eq!(
    a.turbulence().base().as_slice(),
    b.turbulence().base().as_slice()
  );
}

#[test]
fn heights_wrap_at_the_tile_length() {
  let mut ocean = surface(64, 5);
  ocean.dispatch(2.0, 1.0 / 60.0);
  ocean.refresh_height_snapshot();

  // Probe away from texel boundaries so both lookups land on the same texel.
  let h = ocean.height_at(10.3, 20.6);
  assert_eq!(h, ocean.height_at(10.3 + 100.0, 20.6));
  assert_eq!(h, ocean.height_at(10.3 - 200.0, 20.6 + 100.0));
}

#[test]
fn zero_wind_means_a_flat_ocean() {
  let mut params = OceanWaveParameters::default();
  params.wind_speed = 0.0;
  let mut ocean =
    OceanSurface::seeded(single_band_config(64), params, 2).expect("valid configuration");
  ocean.dispatch(5.0, 1.0 / 60.0);
  ocean.refresh_height_snapshot();

  for sample in ocean.displacement().base().layer(0) {
    assert!(sample.x == 0.0 && sample.y == 0.0 && sample.z == 0.0);
  }
  assert_eq!(ocean.height_at(13.0, -7.0), 0.0);
}

#[test]
fn outputs_stay_finite_over_many_ticks() {
  let mut ocean = surface(64, 12);
  for tick in 0..30 {
    ocean.dispatch(tick as f32 / 60.0, 1.0 / 60.0);
  }

  for sample in ocean.displacement().base().as_slice() {
    assert!(sample.x.is_finite() && sample.y.is_finite() && sample.z.is_finite());
  }
  for sample in ocean.derivatives().base().as_slice() {
    assert!(
      sample.dyx.is_finite()
        && sample.dyz.is_finite()
        && sample.dxx.is_finite()
        && sample.dzz.is_finite()
    );
  }
  for &foam in ocean.turbulence().base().as_slice() {
    assert!((0.0..=1.0).contains(&foam), "turbulence {foam} left [0, 1]");
  }
}

#[test]
fn slope_output_matches_the_height_gradient() {
  let size = 128usize;
  let config = OceanConfiguration::new(
    size as u32,
    vec![CascadeBand {
      wavelength: 100.0,
      cutoff_low: 0.01,
      cutoff_high: 0.4,
    }],
  );
  let mut ocean = OceanSurface::seeded(config, OceanWaveParameters::default(), 21)
    .expect("valid configuration");
  ocean.dispatch(1.5, 1.0 / 60.0);

  let displacement = ocean.displacement().base();
  let derivatives = ocean.derivatives().base();
  let texel = 100.0 / size as f32;

  let mut err_sq = 0.0f64;
  let mut ref_sq = 0.0f64;
  for y in 0..size {
    for x in 0..size {
      let left = displacement.get(0, (x + size - 1) % size, y).y;
      let right = displacement.get(0, (x + 1) % size, y).y;
      let central = (right - left) / (2.0 * texel);
      let spectral = derivatives.get(0, x, y).dyx;
      err_sq += ((central - spectral) as f64).powi(2);
      ref_sq += (spectral as f64).powi(2);
    }
  }
  let rms_err = err_sq.sqrt();
  let rms_ref = ref_sq.sqrt();
  assert!(
    rms_err < 0.05 * rms_ref + 1e-9,
    "slope mismatch: rms error {rms_err} vs rms slope {rms_ref}"
  );
}

#[test]
fn mip_chains_halve_down_to_the_configured_depth() {
  let mut ocean = surface(64, 4);
  ocean.dispatch(0.5, 1.0 / 60.0);

  for chain_levels in [
    ocean.displacement().levels(),
    ocean.derivatives().levels(),
    ocean.turbulence().levels(),
  ] {
    assert_eq!(chain_levels, 4);
  }
  for level in 0..4 {
    assert_eq!(ocean.displacement().level(level).size(), 64 >> level);
    assert_eq!(ocean.turbulence().level(level).size(), 64 >> level);
  }

  // Coarsest displacement mip of a zero-mean field sits near zero.
  let far = ocean.displacement().level(3).get(0, 0, 0);
  assert!(far.y.is_finite());
}

#[test]
fn async_readback_eventually_serves_heights() {
  let mut ocean = surface(64, 8);
  ocean.dispatch(2.5, 1.0 / 60.0);

  let expected = ocean.displacement().base().get(0, 3, 9).y;
  let texel = 100.0 / 64.0;
  let probe = (3.0 * texel + 0.01, 9.0 * texel + 0.01);

  let deadline = Instant::now() + Duration::from_secs(2);
  loop {
    if ocean.height_at(probe.0, probe.1) == expected {
      break;
    }
    assert!(
      Instant::now() < deadline,
      "readback never published the dispatched heights"
    );
    std::thread::sleep(Duration::from_millis(1));
  }
  assert!(!ocean.readback_failed());
}

#[test]
fn three_band_surface_keeps_bands_separate() {
  let config = OceanConfiguration::new(64, CascadeBand::default_bands());
  let mut ocean = OceanSurface::seeded(config, OceanWaveParameters::default(), 31)
    .expect("valid configuration");
  ocean.dispatch(1.0, 1.0 / 60.0);

  let base = ocean.displacement().base();
  assert_eq!(base.layers(), 3);

  // The widest band carries most of the default spectrum's energy.
  let mut energy = [0.0f64; 3];
  for (layer, slot) in energy.iter_mut().enumerate() {
    for sample in base.layer(layer) {
      *slot += (sample.y as f64).powi(2);
    }
  }
  assert!(
    energy[0] > energy[2],
    "swell band {} should out-carry the ripple band {}",
    energy[0],
    energy[2]
  );
}

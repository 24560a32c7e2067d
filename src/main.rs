use std::process;
use std::time::Instant;

use fft_ocean::ocean::{
  CascadeBand, ConfigError, OceanConfiguration, OceanSurface, OceanWaveParameters,
};

fn main() {
  env_logger::init();
  if let Err(err) = run() {
    log::error!("{err}");
    process::exit(1);
  }
}

fn run() -> Result<(), ConfigError> {
  let config = OceanConfiguration::new(256, CascadeBand::default_bands());
  let mut surface = OceanSurface::new(config, OceanWaveParameters::default())?;

  let delta_time = 1.0 / 60.0;
  let ticks = 600;
  let started = Instant::now();

  for tick in 0..ticks {
    let time = tick as f32 * delta_time;
    surface.dispatch(time, delta_time);

    if tick % 60 == 0 {
      surface.refresh_height_snapshot();
      let foam = surface.turbulence().base().layer(0);
      let foam_mean = foam.iter().sum::<f32>() / foam.len() as f32;
      let foam_max = foam.iter().fold(0.0f32, |a, &b| a.max(b));
      log::info!(
        "t = {time:5.2}s  height(0, 0) = {:+.3} m  height(40, 25) = {:+.3} m  foam mean {foam_mean:.3} max {foam_max:.3}",
        surface.height_at(0.0, 0.0),
        surface.height_at(40.0, 25.0),
      );
    }
  }

  let elapsed = started.elapsed();
  log::info!(
    "{ticks} ticks in {elapsed:.2?} ({:.1} ticks/s)",
    ticks as f64 / elapsed.as_secs_f64()
  );
  if surface.readback_failed() {
    log::warn!("height readback degraded during the run");
  }
  Ok(())
}

use crate::compute::{ComputeDevice, HeightReadback, HeightSnapshot};
use crate::ocean::field::{
  Complex32, DerivativeSample, DisplacementSample, Grid, MipChain, SpectrumPair, WaveData,
};
use crate::ocean::noise::NoiseField;
use crate::ocean::ocean_parameters::{ConfigError, OceanConfiguration, OceanWaveParameters};
use crate::ocean::pipelines::{
  GenerateMipmapsPipeline, Ifft, InitialSpectrumPipeline, ResultFillerPipeline, ScratchArena,
  TimeDependentSpectrumPipeline,
};
use crate::ocean::spectrum_model::{JonswapSpectrum, SpectrumModel};

const MIP_LEVEL_COUNT: usize = 4;

/// The simulated surface: frozen spectrum, per-frame evolution and the
/// assembled output fields, one layer per cascade band.
///
/// `dispatch` advances the whole surface one tick. Editing parameters or
/// swapping the spectrum model marks the frozen spectrum dirty; the next
/// tick rebuilds it before evolving, so a tick always renders a
/// consistent parameter snapshot.
pub struct OceanSurface {
  config: OceanConfiguration,
  parameters: OceanWaveParameters,
  model: Box<dyn SpectrumModel>,
  parameters_changed: bool,

  device: ComputeDevice,
  noise: NoiseField,

  spectrum: Grid<SpectrumPair>,
  waves_data: Grid<WaveData>,
  dx_dz: Grid<Complex32>,
  dy_dxz: Grid<Complex32>,
  dyx_dyz: Grid<Complex32>,
  dxx_dzz: Grid<Complex32>,

  displacement: MipChain<DisplacementSample>,
  derivatives: MipChain<DerivativeSample>,
  turbulence: MipChain<f32>,

  initial_spectrum: InitialSpectrumPipeline,
  time_dependent: TimeDependentSpectrumPipeline,
  result_filler: ResultFillerPipeline,
  mipmaps: GenerateMipmapsPipeline,
  ifft: Ifft,
  scratch: ScratchArena,

  readback: HeightReadback,
}

impl OceanSurface {
  pub fn new(
    config: OceanConfiguration,
    parameters: OceanWaveParameters,
  ) -> Result<Self, ConfigError> {
    config.validate()?;
    let noise = NoiseField::generate(config.size as usize, &mut rand::thread_rng());
    Ok(Self::build(config, parameters, noise))
  }

  /// Deterministic variant: the same seed and configuration reproduce the
  /// same surface sample for sample.
  pub fn seeded(
    config: OceanConfiguration,
    parameters: OceanWaveParameters,
    seed: u64,
  ) -> Result<Self, ConfigError> {
    config.validate()?;
    let noise = NoiseField::seeded(config.size as usize, seed);
    Ok(Self::build(config, parameters, noise))
  }

  fn build(
    config: OceanConfiguration,
    parameters: OceanWaveParameters,
    noise: NoiseField,
  ) -> Self {
    let size = config.size as usize;
    let layers = config.bands.len();
    log::info!(
      "creating ocean surface: {size}x{size}, {layers} cascade bands, {} mip levels",
      MIP_LEVEL_COUNT
    );

    let mut surface = Self {
      config,
      parameters,
      model: Box::new(JonswapSpectrum::from_parameters(&parameters)),
      parameters_changed: true,
      device: ComputeDevice::with_available_parallelism(),
      noise,
      spectrum: Grid::new(size, layers),
      waves_data: Grid::new(size, layers),
      dx_dz: Grid::new(size, layers),
      dy_dxz: Grid::new(size, layers),
      dyx_dyz: Grid::new(size, layers),
      dxx_dzz: Grid::new(size, layers),
      displacement: MipChain::new(size, layers, MIP_LEVEL_COUNT),
      derivatives: MipChain::new(size, layers, MIP_LEVEL_COUNT),
      turbulence: MipChain::new(size, layers, MIP_LEVEL_COUNT),
      initial_spectrum: InitialSpectrumPipeline::new(size, layers),
      time_dependent: TimeDependentSpectrumPipeline::new(size),
      result_filler: ResultFillerPipeline::new(size),
      mipmaps: GenerateMipmapsPipeline::new(),
      ifft: Ifft::new(size, layers),
      scratch: ScratchArena::new(size, layers),
      readback: HeightReadback::new(),
    };
    surface.init();
    surface
  }

  /// Rebuild the frozen spectrum from the current parameters and model.
  pub fn init(&mut self) {
    self.initial_spectrum.dispatch(
      &self.device,
      &self.noise,
      &self.config.bands,
      &self.parameters,
      self.model.as_ref(),
      &mut self.spectrum,
      &mut self.waves_data,
    );
    self.parameters_changed = false;
    log::debug!("frozen spectrum rebuilt");
  }

  /// Advance the surface to `time`, assemble the output fields and issue
  /// the asynchronous height readback for this tick.
  pub fn dispatch(&mut self, time: f32, delta_time: f32) {
    if self.parameters_changed {
      self.init();
    }

    self.time_dependent.dispatch(
      &self.device,
      &self.spectrum,
      &self.waves_data,
      time,
      &mut self.dx_dz,
      &mut self.dy_dxz,
      &mut self.dyx_dyz,
      &mut self.dxx_dzz,
    );

    self.ifft.inverse(&mut self.dx_dz, &mut self.scratch, &self.device);
    self.ifft.inverse(&mut self.dy_dxz, &mut self.scratch, &self.device);
    self.ifft.inverse(&mut self.dyx_dyz, &mut self.scratch, &self.device);
    self.ifft.inverse(&mut self.dxx_dzz, &mut self.scratch, &self.device);

    self.result_filler.dispatch(
      &self.device,
      &self.dx_dz,
      &self.dy_dxz,
      &self.dyx_dyz,
      &self.dxx_dzz,
      delta_time,
      self.displacement.base_mut(),
      self.derivatives.base_mut(),
      self.turbulence.base_mut(),
    );

    self
      .mipmaps
      .dispatch(&mut self.displacement, &mut self.derivatives, &mut self.turbulence);

    self.readback.request(self.height_snapshot());
  }

  pub fn change_parameters(&mut self, parameters: OceanWaveParameters) {
    self.parameters = parameters;
    self.model = Box::new(JonswapSpectrum::from_parameters(&parameters));
    self.parameters_changed = true;
  }

  pub fn set_spectrum_model(&mut self, model: Box<dyn SpectrumModel>) {
    self.model = model;
    self.parameters_changed = true;
  }

  /// Eventually-consistent height of the widest cascade band at a world
  /// position. Never blocks.
  pub fn height_at(&self, world_x: f32, world_z: f32) -> f32 {
    self.readback.height_at(world_x, world_z)
  }

  /// Publish the current height field synchronously, bypassing the
  /// asynchronous path. Useful for deterministic startup.
  pub fn refresh_height_snapshot(&self) {
    self.readback.publish_now(self.height_snapshot());
  }

  pub fn readback_failed(&self) -> bool {
    self.readback.is_failed()
  }

  fn height_snapshot(&self) -> HeightSnapshot {
    let base = self.displacement.base();
    let heights = base.layer(0).iter().map(|sample| sample.y).collect();
    HeightSnapshot::new(base.size(), self.config.bands[0].wavelength, heights)
  }

  pub fn size(&self) -> usize {
    self.config.size as usize
  }

  pub fn configuration(&self) -> &OceanConfiguration {
    &self.config
  }

  pub fn parameters(&self) -> &OceanWaveParameters {
    &self.parameters
  }

  pub fn foam_settings_mut(&mut self) -> &mut crate::ocean::pipelines::FoamSettings {
    &mut self.result_filler.foam
  }

  pub fn spectrum(&self) -> &Grid<SpectrumPair> {
    &self.spectrum
  }

  pub fn waves_data(&self) -> &Grid<WaveData> {
    &self.waves_data
  }

  pub fn displacement(&self) -> &MipChain<DisplacementSample> {
    &self.displacement
  }

  pub fn derivatives(&self) -> &MipChain<DerivativeSample> {
    &self.derivatives
  }

  pub fn turbulence(&self) -> &MipChain<f32> {
    &self.turbulence
  }

  /// Base-level displacement as a flat f32 channel view (x, y, z per
  /// texel), for uploads or serialization.
  pub fn displacement_channels(&self) -> &[f32] {
    bytemuck::cast_slice(self.displacement.base().as_slice())
  }

  /// Base-level derivatives as a flat f32 channel view (dyx, dyz, dxx,
  /// dzz per texel).
  pub fn derivative_channels(&self) -> &[f32] {
    bytemuck::cast_slice(self.derivatives.base().as_slice())
  }
}

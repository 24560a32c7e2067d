use crate::compute::ComputeDevice;
use crate::ocean::field::{Complex32, DerivativeSample, DisplacementSample, Grid};

/// Foam response of the surface. Folding injects turbulence where the
/// horizontal displacement compresses the surface; decay bleeds it away.
#[derive(Clone, Copy, Debug)]
pub struct FoamSettings {
  /// Jacobian value under which the surface counts as folded.
  pub threshold: f32,
  pub decay_rate: f32,
  pub injection_rate: f32,
}

impl Default for FoamSettings {
  fn default() -> Self {
    Self {
      threshold: 0.84,
      decay_rate: 0.1,
      injection_rate: 1.0,
    }
  }
}

/// Unpacks the four transformed fields into displacement and derivative
/// samples and advances the turbulence accumulator.
pub struct ResultFillerPipeline {
  size: usize,
  pub lambda: f32,
  pub foam: FoamSettings,
}

impl ResultFillerPipeline {
  pub fn new(size: usize) -> Self {
    Self {
      size,
      lambda: 1.2,
      foam: FoamSettings::default(),
    }
  }

  #[allow(clippy::too_many_arguments)]
  pub fn dispatch(
    &self,
    device: &ComputeDevice,
    dx_dz: &Grid<Complex32>,
    dy_dxz: &Grid<Complex32>,
    dyx_dyz: &Grid<Complex32>,
    dxx_dzz: &Grid<Complex32>,
    delta_time: f32,
    displacement: &mut Grid<DisplacementSample>,
    derivatives: &mut Grid<DerivativeSample>,
    turbulence: &mut Grid<f32>,
  ) {
    let size = self.size;
    let lambda = self.lambda;
    let foam = self.foam;

    let packed_a = dx_dz.as_slice();
    let packed_b = dy_dxz.as_slice();
    let packed_c = dyx_dyz.as_slice();
    let packed_d = dxx_dzz.as_slice();

    device.dispatch3(
      displacement.as_mut_slice(),
      derivatives.as_mut_slice(),
      turbulence.as_mut_slice(),
      size,
      |row, disp_row, deriv_row, foam_row| {
        let base = row * size;
        for x in 0..size {
          let dx = packed_a[base + x].re;
          let dz = packed_a[base + x].im;
          let dy = packed_b[base + x].re;
          let dxz = packed_b[base + x].im;
          let dyx = packed_c[base + x].re;
          let dyz = packed_c[base + x].im;
          let dxx = packed_d[base + x].re;
          let dzz = packed_d[base + x].im;

          disp_row[x] = DisplacementSample {
            x: lambda * dx,
            y: dy,
            z: lambda * dz,
          };
          deriv_row[x] = DerivativeSample {
            dyx,
            dyz,
            dxx: lambda * dxx,
            dzz: lambda * dzz,
          };

          let jacobian = (1.0 + lambda * dxx) * (1.0 + lambda * dzz)
            - lambda * dxz * lambda * dxz;
          let folding = (foam.threshold - jacobian).max(0.0);
          let decayed = (foam_row[x] - delta_time * foam.decay_rate).max(0.0);
          foam_row[x] = (decayed + folding * delta_time * foam.injection_rate).min(1.0);
        }
      },
    );
  }
}

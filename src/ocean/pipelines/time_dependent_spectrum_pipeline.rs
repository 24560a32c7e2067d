use crate::compute::ComputeDevice;
use crate::ocean::field::{Complex32, Grid, SpectrumPair, WaveData};

/// Advances the frozen spectrum to a point in time and packs the eight
/// evolved quantities into four complex fields, two real signals per
/// transform. The inverse FFT separates them again because each packed
/// pair comes out real on its own.
pub struct TimeDependentSpectrumPipeline {
  size: usize,
}

impl TimeDependentSpectrumPipeline {
  pub fn new(size: usize) -> Self {
    Self { size }
  }

  #[allow(clippy::too_many_arguments)]
  pub fn dispatch(
    &self,
    device: &ComputeDevice,
    spectrum: &Grid<SpectrumPair>,
    waves_data: &Grid<WaveData>,
    time: f32,
    dx_dz: &mut Grid<Complex32>,
    dy_dxz: &mut Grid<Complex32>,
    dyx_dyz: &mut Grid<Complex32>,
    dxx_dzz: &mut Grid<Complex32>,
  ) {
    let size = self.size;
    let pairs = spectrum.as_slice();
    let waves = waves_data.as_slice();

    device.dispatch4(
      dx_dz.as_mut_slice(),
      dy_dxz.as_mut_slice(),
      dyx_dyz.as_mut_slice(),
      dxx_dzz.as_mut_slice(),
      size,
      |row, out_a, out_b, out_c, out_d| {
        let base = row * size;
        for x in 0..size {
          let pair = pairs[base + x];
          let wave = waves[base + x];

          let phase = wave.omega * time;
          let forward = Complex32::new(phase.cos(), phase.sin());
          let h = pair.h0 * forward + pair.h0_minus_k_conj * forward.conj();
          let ih = Complex32::new(-h.im, h.re);

          let unit_x = wave.k_x * wave.one_over_k;
          let unit_z = wave.k_z * wave.one_over_k;

          let displacement_x = ih * unit_x;
          let displacement_y = h;
          let displacement_z = ih * unit_z;

          let displacement_x_dx = -h * wave.k_x * unit_x;
          let displacement_y_dx = ih * wave.k_x;
          let displacement_z_dx = -h * wave.k_x * unit_z;

          let displacement_y_dz = ih * wave.k_z;
          let displacement_z_dz = -h * wave.k_z * unit_z;

          out_a[x] = pack(displacement_x, displacement_z);
          out_b[x] = pack(displacement_y, displacement_z_dx);
          out_c[x] = pack(displacement_y_dx, displacement_y_dz);
          out_d[x] = pack(displacement_x_dx, displacement_z_dz);
        }
      },
    );
  }
}

/// a + i*b, valid because both operands come out real after the inverse
/// transform of a conjugate-symmetric spectrum.
#[inline]
fn pack(a: Complex32, b: Complex32) -> Complex32 {
  Complex32::new(a.re - b.im, a.im + b.re)
}

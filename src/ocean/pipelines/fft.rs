use std::f32::consts::PI;

use crate::compute::ComputeDevice;
use crate::ocean::field::{Complex32, Grid};

/// Precomputed butterfly for one transform position at one stage: the
/// two gather indices along the transform axis and the forward twiddle
/// factor. The inverse pass conjugates the twiddle.
#[derive(Clone, Copy, Debug)]
struct ButterflyData {
  twiddle: Complex32,
  a: u32,
  b: u32,
}

/// Ping-pong pair reused by every transform of a frame. Sized for all
/// cascade layers of one packed field.
pub struct ScratchArena {
  buffers: [Vec<Complex32>; 2],
}

impl ScratchArena {
  pub fn new(size: usize, layers: usize) -> Self {
    let len = layers * size * size;
    Self {
      buffers: [vec![Complex32::default(); len], vec![Complex32::default(); len]],
    }
  }

  fn split(&mut self, active: usize) -> (&[Complex32], &mut [Complex32]) {
    let (a, b) = self.buffers.split_at_mut(1);
    if active == 0 {
      (&a[0], &mut b[0])
    } else {
      (&b[0], &mut a[0])
    }
  }
}

/// Batched 2D inverse FFT over every cascade layer of a field.
///
/// Radix-2 decimation in time in gather form: each output position reads
/// two source positions through a precomputed index/twiddle table, so the
/// first stage's bit reversal costs nothing extra. Horizontal stages run
/// along rows, vertical stages along columns, then a final pass folds in
/// the (-1)^(x+y) shift that recenters the spectrum origin.
///
/// The inverse is unnormalized; amplitude scaling lives in the spectrum.
pub struct Ifft {
  size: usize,
  layers: usize,
  log_size: usize,
  table: Vec<ButterflyData>,
}

impl Ifft {
  pub fn new(size: usize, layers: usize) -> Self {
    debug_assert!(size.is_power_of_two());
    let log_size = size.trailing_zeros() as usize;

    let mut table = Vec::with_capacity(log_size * size);
    for stage in 0..log_size {
      let span = 1usize << (stage + 1);
      let half = 1usize << stage;
      for pos in 0..size {
        let j = pos % span;
        let a_pos = pos - j + (j % half);
        let b_pos = a_pos + half;
        let (a, b) = if stage == 0 {
          (bit_reverse(a_pos, log_size), bit_reverse(b_pos, log_size))
        } else {
          (a_pos, b_pos)
        };
        let angle = -2.0 * PI * j as f32 / span as f32;
        table.push(ButterflyData {
          twiddle: Complex32::new(angle.cos(), angle.sin()),
          a: a as u32,
          b: b as u32,
        });
      }
    }

    Self {
      size,
      layers,
      log_size,
      table,
    }
  }

  /// Replace `grid` with its 2D inverse transform, all layers at once.
  pub fn inverse(&self, grid: &mut Grid<Complex32>, scratch: &mut ScratchArena, device: &ComputeDevice) {
    debug_assert_eq!(grid.size(), self.size);
    debug_assert_eq!(grid.layers(), self.layers);

    let size = self.size;
    scratch.buffers[0].copy_from_slice(grid.as_slice());
    let mut active = 0;

    for stage in 0..self.log_size {
      let table = &self.table[stage * size..(stage + 1) * size];
      let (src, dst) = scratch.split(active);
      device.dispatch(dst, size, |row, out| {
        let src_row = &src[row * size..(row + 1) * size];
        for (x, slot) in out.iter_mut().enumerate() {
          let bf = &table[x];
          *slot = src_row[bf.a as usize] + bf.twiddle.conj() * src_row[bf.b as usize];
        }
      });
      active = 1 - active;
    }

    for stage in 0..self.log_size {
      let table = &self.table[stage * size..(stage + 1) * size];
      let (src, dst) = scratch.split(active);
      device.dispatch(dst, size, |row, out| {
        let layer_base = (row / size) * size * size;
        let bf = &table[row % size];
        let row_a = &src[layer_base + bf.a as usize * size..][..size];
        let row_b = &src[layer_base + bf.b as usize * size..][..size];
        let w = bf.twiddle.conj();
        for x in 0..size {
          out[x] = row_a[x] + w * row_b[x];
        }
      });
      active = 1 - active;
    }

    let result = &scratch.buffers[active];
    device.dispatch(grid.as_mut_slice(), size, |row, out| {
      let y = row % size;
      let src_row = &result[row * size..(row + 1) * size];
      for (x, slot) in out.iter_mut().enumerate() {
        let sign = if (x + y) % 2 == 0 { 1.0 } else { -1.0 };
        *slot = src_row[x] * sign;
      }
    });
  }
}

fn bit_reverse(x: usize, bits: usize) -> usize {
  x.reverse_bits() >> (usize::BITS as usize - bits)
}

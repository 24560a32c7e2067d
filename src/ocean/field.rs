use bytemuck::{Pod, Zeroable};

/// Complex sample type shared by every frequency-domain field.
pub type Complex32 = num_complex::Complex<f32>;

/// H0(k) together with the conjugated amplitude at the mirrored
/// wavevector, packed so the time evolution step reads both at once.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SpectrumPair {
  pub h0: Complex32,
  pub h0_minus_k_conj: Complex32,
}

/// Per-texel wave metadata: wavevector components, reciprocal magnitude
/// and dispersion angular frequency. Frozen between parameter changes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct WaveData {
  pub k_x: f32,
  pub one_over_k: f32,
  pub k_z: f32,
  pub omega: f32,
}

/// Spatial-domain displacement of one texel (horizontal x/z, vertical y).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct DisplacementSample {
  pub x: f32,
  pub y: f32,
  pub z: f32,
}

/// Horizontal slopes of the height field plus the choppiness-scaled
/// second derivatives, feeding normal reconstruction.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct DerivativeSample {
  pub dyx: f32,
  pub dyz: f32,
  pub dxx: f32,
  pub dzz: f32,
}

/// Square, power-of-two-sized grid layered by cascade count.
/// Storage is layer-major, then row-major within a layer.
#[derive(Clone, Debug)]
pub struct Grid<T> {
  size: usize,
  layers: usize,
  data: Vec<T>,
}

impl<T: Copy + Default> Grid<T> {
  pub fn new(size: usize, layers: usize) -> Self {
    Self {
      size,
      layers,
      data: vec![T::default(); layers * size * size],
    }
  }

  pub fn size(&self) -> usize {
    self.size
  }

  pub fn layers(&self) -> usize {
    self.layers
  }

  /// Total row count across all layers, the unit of one dispatch.
  pub fn rows(&self) -> usize {
    self.layers * self.size
  }

  #[inline]
  pub fn index(&self, layer: usize, x: usize, y: usize) -> usize {
    debug_assert!(layer < self.layers && x < self.size && y < self.size);
    (layer * self.size + y) * self.size + x
  }

  #[inline]
  pub fn get(&self, layer: usize, x: usize, y: usize) -> T {
    self.data[self.index(layer, x, y)]
  }

  #[inline]
  pub fn set(&mut self, layer: usize, x: usize, y: usize, value: T) {
    let i = self.index(layer, x, y);
    self.data[i] = value;
  }

  pub fn layer(&self, layer: usize) -> &[T] {
    let stride = self.size * self.size;
    &self.data[layer * stride..(layer + 1) * stride]
  }

  pub fn as_slice(&self) -> &[T] {
    &self.data
  }

  pub fn as_mut_slice(&mut self) -> &mut [T] {
    &mut self.data
  }

  pub fn fill(&mut self, value: T) {
    self.data.fill(value);
  }
}

/// 2x2 box reduction used when building mip levels.
pub trait BoxFilter: Copy {
  fn box4(a: Self, b: Self, c: Self, d: Self) -> Self;
}

impl BoxFilter for f32 {
  fn box4(a: Self, b: Self, c: Self, d: Self) -> Self {
    (a + b + c + d) * 0.25
  }
}

impl BoxFilter for DisplacementSample {
  fn box4(a: Self, b: Self, c: Self, d: Self) -> Self {
    Self {
      x: (a.x + b.x + c.x + d.x) * 0.25,
      y: (a.y + b.y + c.y + d.y) * 0.25,
      z: (a.z + b.z + c.z + d.z) * 0.25,
    }
  }
}

impl BoxFilter for DerivativeSample {
  fn box4(a: Self, b: Self, c: Self, d: Self) -> Self {
    Self {
      dyx: (a.dyx + b.dyx + c.dyx + d.dyx) * 0.25,
      dyz: (a.dyz + b.dyz + c.dyz + d.dyz) * 0.25,
      dxx: (a.dxx + b.dxx + c.dxx + d.dxx) * 0.25,
      dzz: (a.dzz + b.dzz + c.dzz + d.dzz) * 0.25,
    }
  }
}

/// An output field together with its smoothed multi-resolution levels for
/// distant sampling. Level 0 is the full-resolution field.
#[derive(Clone, Debug)]
pub struct MipChain<T> {
  levels: Vec<Grid<T>>,
}

impl<T: Copy + Default + BoxFilter> MipChain<T> {
  pub fn new(size: usize, layers: usize, levels: usize) -> Self {
    debug_assert!(levels >= 1 && size >> (levels - 1) >= 1);
    let levels = (0..levels).map(|l| Grid::new(size >> l, layers)).collect();
    Self { levels }
  }

  pub fn levels(&self) -> usize {
    self.levels.len()
  }

  pub fn base(&self) -> &Grid<T> {
    &self.levels[0]
  }

  pub fn base_mut(&mut self) -> &mut Grid<T> {
    &mut self.levels[0]
  }

  pub fn level(&self, level: usize) -> &Grid<T> {
    &self.levels[level]
  }

  /// Rebuild every level below the base by 2x2 box downsampling.
  pub fn rebuild(&mut self) {
    for l in 1..self.levels.len() {
      let (coarse, fine) = self.levels.split_at_mut(l);
      let src = &coarse[l - 1];
      let dst = &mut fine[0];
      for layer in 0..dst.layers() {
        for y in 0..dst.size() {
          for x in 0..dst.size() {
            let value = T::box4(
              src.get(layer, 2 * x, 2 * y),
              src.get(layer, 2 * x + 1, 2 * y),
              src.get(layer, 2 * x, 2 * y + 1),
              src.get(layer, 2 * x + 1, 2 * y + 1),
            );
            dst.set(layer, x, y, value);
          }
        }
      }
    }
  }
}

use crate::ocean::field::{DerivativeSample, DisplacementSample, MipChain};

/// Refreshes the reduced-resolution levels of every output field after
/// the frame's base levels are written.
pub struct GenerateMipmapsPipeline;

impl GenerateMipmapsPipeline {
  pub fn new() -> Self {
    Self
  }

  pub fn dispatch(
    &self,
    displacement: &mut MipChain<DisplacementSample>,
    derivatives: &mut MipChain<DerivativeSample>,
    turbulence: &mut MipChain<f32>,
  ) {
    displacement.rebuild();
    derivatives.rebuild();
    turbulence.rebuild();
  }
}

impl Default for GenerateMipmapsPipeline {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn refreshes_all_three_chains() {
    let mut displacement: MipChain<DisplacementSample> = MipChain::new(8, 1, 3);
    let mut derivatives: MipChain<DerivativeSample> = MipChain::new(8, 1, 3);
    let mut turbulence: MipChain<f32> = MipChain::new(8, 1, 3);

    displacement.base_mut().fill(DisplacementSample { x: 1.0, y: 2.0, z: 3.0 });
    turbulence.base_mut().fill(0.25);

    GenerateMipmapsPipeline::new().dispatch(&mut displacement, &mut derivatives, &mut turbulence);

    let far = displacement.level(2).get(0, 0, 0);
    assert_eq!((far.x, far.y, far.z), (1.0, 2.0, 3.0));
    assert_eq!(turbulence.level(2).get(0, 0, 0), 0.25);
    assert_eq!(derivatives.level(1).get(0, 0, 0), DerivativeSample::default());
  }
}

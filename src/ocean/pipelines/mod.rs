mod fft;
mod generate_mipmaps_pipeline;
mod initial_spectrum_pipeline;
mod result_filler_pipeline;
mod time_dependent_spectrum_pipeline;

pub use fft::{Ifft, ScratchArena};
pub use generate_mipmaps_pipeline::GenerateMipmapsPipeline;
pub use initial_spectrum_pipeline::InitialSpectrumPipeline;
pub use result_filler_pipeline::{FoamSettings, ResultFillerPipeline};
pub use time_dependent_spectrum_pipeline::TimeDependentSpectrumPipeline;

mod device;
mod readback;

pub use device::ComputeDevice;
pub use readback::{HeightReadback, HeightSnapshot};

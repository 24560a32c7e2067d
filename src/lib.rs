//! Spectral ocean wave simulation.
//!
//! An oceanographic spectrum (JONSWAP by default) seeds a frozen set of
//! wave amplitudes; every tick evolves them through the dispersion
//! relation, inverse-FFTs the packed fields back to the spatial domain
//! and assembles displacement, derivative and foam outputs per cascade
//! band. Heights are queryable through an asynchronous readback that
//! never blocks the simulation.

pub mod compute;
pub mod ocean;

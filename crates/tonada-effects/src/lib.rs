//! Effect units for the tonada engine.
//!
//! The mixed voice signal runs through up to four units in a fixed
//! order: **filter → EQ → reverb → echo**. Each unit is independently
//! bypassable; a bypassed unit costs one branch and nothing else.
//! Between units the signal returns to the engine's `i32` mixing
//! domain, so the chain sounds the same as the integer pipeline it
//! reproduces.
//!
//! # Units
//!
//! - [`Filter`]: state-variable filter with selectable low/band/high
//!   pass output
//! - [`ThreeBandEq`]: peaking EQ at 120 Hz / 1 kHz / 8 kHz with whole-dB
//!   gains
//! - [`Reverb`]: Schroeder reverb, four combs into two allpasses
//! - [`Echo`]: single-tap delay on an integer ring buffer
//! - [`EffectsChain`]: owns the units and applies the fixed order
//!
//! Reverb and echo own heap buffers, so they are built on demand with
//! fallible constructors and installed into the chain only on success.
//!
//! # `no_std` Support
//!
//! Like the rest of the workspace, this crate is `no_std`-compatible
//! with `alloc`:
//!
//! ```toml
//! [dependencies]
//! tonada-effects = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std as alloc;

pub mod chain;
pub mod echo;
pub mod eq;
pub mod filter;
pub mod reverb;

pub use chain::EffectsChain;
pub use echo::{Echo, MAX_ECHO_MS, MIN_ECHO_MS};
pub use eq::{EQ_BAND_FREQUENCIES, EQ_MAX_GAIN_DB, ThreeBandEq};
pub use filter::Filter;
pub use reverb::Reverb;

pub use tonada_core::{Effect, SvfOutput};

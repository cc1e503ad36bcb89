//! Tonada Core - DSP primitives for the tonada synthesis engine
//!
//! This crate provides the foundational building blocks the voice and
//! effects layers are assembled from, designed for real-time processing
//! with zero allocation in the audio path.
//!
//! # Core Abstractions
//!
//! ## Effect System
//!
//! - [`Effect`] - Object-safe trait for all audio effects
//!
//! ## Oscillation & Modulation
//!
//! - [`SineTable`] - Precomputed 512-entry sine wavetable with linear
//!   interpolation, the primary oscillator source
//! - [`Lfo`] - Low-frequency oscillator (sine and triangle) for vibrato
//!   and tremolo modulation
//!
//! ## Filters
//!
//! - [`StateVariableFilter`] - Chamberlin SVF with selectable
//!   lowpass/highpass/bandpass output
//! - [`Biquad`] - Second-order IIR section with RBJ peaking-EQ
//!   coefficients, used for the parametric EQ bands
//! - [`CombFilter`] - Feedback comb with high-frequency damping for the
//!   Schroeder reverb
//! - [`AllpassFilter`] - Schroeder allpass diffusor
//!
//! ## Utilities
//!
//! - [`flush_denormal`] - Keeps feedback paths out of denormal territory
//! - [`wet_dry_mix`] - Equal-cost dry/wet crossfade
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (with `alloc`) for embedded targets.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! tonada-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations in audio processing paths; delay
//!   buffers are sized once at construction
//! - **No dependencies on std**: Pure `no_std` with `libm` for math
//! - **Fallible construction**: Buffered primitives offer `try_new` so a
//!   failed allocation degrades one effect instead of aborting

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
pub mod biquad;
pub mod comb;
pub mod effect;
pub mod lfo;
pub mod math;
pub mod svf;
pub mod wavetable;

// Re-export main types at crate root
pub use allpass::AllpassFilter;
pub use biquad::{Biquad, peaking_coefficients};
pub use comb::CombFilter;
pub use effect::Effect;
pub use lfo::{Lfo, LfoWaveform};
pub use math::{flush_denormal, wet_dry_mix};
pub use svf::{StateVariableFilter, SvfOutput};
pub use wavetable::{SineTable, WAVETABLE_SIZE};

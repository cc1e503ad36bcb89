//! Profile and settings management for the tonada engine.
//!
//! A [`Profile`] is a named TOML snapshot of every engine setting:
//! synthesis basics (rate, voices, waveform), the per-stage effect
//! tables, LFO routing, and the output backend. This crate handles the
//! file format, per-user storage paths, built-in factory profiles, and
//! clamp-and-report normalization of out-of-range values.
//!
//! # Example
//!
//! ```rust,no_run
//! use tonada_config::{Profile, normalize, user_profiles_dir};
//!
//! let mut profile = Profile::load("warm.toml").unwrap();
//! for adjustment in normalize(&mut profile) {
//!     eprintln!("adjusted {adjustment}");
//! }
//!
//! let path = user_profiles_dir().join("warm-copy.toml");
//! profile.save(&path).unwrap();
//! ```

mod error;
mod profile;

/// Factory profiles bundled with the library.
pub mod factory;

/// Platform-specific profile paths.
pub mod paths;

/// Profile normalization.
pub mod validation;

pub use error::ConfigError;
pub use factory::{FACTORY_PROFILE_NAMES, factory_profile, factory_profiles, is_factory_profile};
pub use paths::{ensure_user_dir, find_profile, list_profiles, user_profiles_dir};
pub use profile::{
    BackendConfig, BackendKind, DelayConfig, EqConfig, FilterConfig, FilterModeKind, LfoConfig,
    LfoShapeKind, Profile, ReverbConfig, WaveformKind,
};
pub use validation::{Adjustment, normalize};

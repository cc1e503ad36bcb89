//! Fixed-order effects chain.
//!
//! Owns at most four units and applies them to the mixed signal in the
//! engine's canonical order: filter, EQ, reverb, echo. Filter and EQ
//! are always allocated (they are a few dozen bytes of state) and
//! gated by enable flags; reverb and echo carry heap buffers, so they
//! are built elsewhere and installed or removed whole. That keeps every
//! allocation off the per-sample path.
//!
//! The signal enters and leaves each stage as `i32`: a float stage's
//! output is truncated toward zero before the next stage sees it,
//! reproducing the integer mixing pipeline this chain is specified
//! against.

use tonada_core::Effect;

use crate::echo::Echo;
use crate::eq::ThreeBandEq;
use crate::filter::Filter;
use crate::reverb::Reverb;

/// Filter → EQ → reverb → echo, each independently bypassable.
///
/// # Example
///
/// ```rust
/// use tonada_effects::{EffectsChain, Reverb};
///
/// let mut chain = EffectsChain::new(22050.0);
/// chain.set_filter_enabled(true);
/// chain.install_reverb(Reverb::new(22050.0));
/// let out = chain.process(12_000);
/// # let _ = out;
/// ```
#[derive(Debug, Clone)]
pub struct EffectsChain {
    filter: Filter,
    filter_enabled: bool,
    eq: ThreeBandEq,
    eq_enabled: bool,
    reverb: Option<Reverb>,
    echo: Option<Echo>,
    sample_rate: f32,
}

impl EffectsChain {
    /// Create a chain with every unit bypassed.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            filter: Filter::new(sample_rate),
            filter_enabled: false,
            eq: ThreeBandEq::new(sample_rate),
            eq_enabled: false,
            reverb: None,
            echo: None,
            sample_rate,
        }
    }

    /// Sample rate the chain is configured for.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// The filter stage.
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// The filter stage, mutably.
    pub fn filter_mut(&mut self) -> &mut Filter {
        &mut self.filter
    }

    /// Enable or bypass the filter stage.
    pub fn set_filter_enabled(&mut self, enabled: bool) {
        self.filter_enabled = enabled;
    }

    /// Whether the filter stage is enabled.
    pub fn filter_enabled(&self) -> bool {
        self.filter_enabled
    }

    /// The EQ stage.
    pub fn eq(&self) -> &ThreeBandEq {
        &self.eq
    }

    /// The EQ stage, mutably.
    pub fn eq_mut(&mut self) -> &mut ThreeBandEq {
        &mut self.eq
    }

    /// Enable or bypass the EQ stage.
    pub fn set_eq_enabled(&mut self, enabled: bool) {
        self.eq_enabled = enabled;
    }

    /// Whether the EQ stage is enabled.
    pub fn eq_enabled(&self) -> bool {
        self.eq_enabled
    }

    /// Install a reverb, clearing any state it carries. Replaces a
    /// previously installed one.
    pub fn install_reverb(&mut self, mut reverb: Reverb) {
        reverb.reset();
        self.reverb = Some(reverb);
    }

    /// Remove and return the installed reverb, if any.
    pub fn remove_reverb(&mut self) -> Option<Reverb> {
        self.reverb.take()
    }

    /// The installed reverb, if any.
    pub fn reverb(&self) -> Option<&Reverb> {
        self.reverb.as_ref()
    }

    /// The installed reverb, mutably.
    pub fn reverb_mut(&mut self) -> Option<&mut Reverb> {
        self.reverb.as_mut()
    }

    /// Install an echo. Its ring is zeroed so a re-enabled echo never
    /// replays a stale tail.
    pub fn install_echo(&mut self, mut echo: Echo) {
        echo.clear();
        self.echo = Some(echo);
    }

    /// Remove and return the installed echo, if any.
    pub fn remove_echo(&mut self) -> Option<Echo> {
        self.echo.take()
    }

    /// The installed echo, if any.
    pub fn echo(&self) -> Option<&Echo> {
        self.echo.as_ref()
    }

    /// The installed echo, mutably.
    pub fn echo_mut(&mut self) -> Option<&mut Echo> {
        self.echo.as_mut()
    }

    /// Run one sample through every enabled stage in order.
    #[inline]
    pub fn process(&mut self, input: i32) -> i32 {
        let mut mixed = input;
        if self.filter_enabled {
            mixed = self.filter.process(mixed as f32) as i32;
        }
        if self.eq_enabled {
            mixed = self.eq.process(mixed as f32) as i32;
        }
        if let Some(reverb) = &mut self.reverb {
            mixed = reverb.process(mixed as f32) as i32;
        }
        if let Some(echo) = &mut self.echo {
            mixed = echo.process_sample(mixed);
        }
        mixed
    }

    /// Visit every allocated stage, bypassed ones included, as a trait
    /// object. Bulk operations (reset, sample-rate changes) go through
    /// here so no stage is missed.
    pub fn for_each_stage(&mut self, mut f: impl FnMut(&mut dyn Effect)) {
        f(&mut self.filter);
        f(&mut self.eq);
        if let Some(reverb) = &mut self.reverb {
            f(reverb);
        }
        if let Some(echo) = &mut self.echo {
            f(echo);
        }
    }

    /// Retune every stage to a new sample rate. Delay-owning stages
    /// rebuild their buffers.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.for_each_stage(|stage| stage.set_sample_rate(sample_rate));
    }

    /// Clear all stage state without touching parameters.
    pub fn reset(&mut self) {
        self.for_each_stage(|stage| stage.reset());
    }
}

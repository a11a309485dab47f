//! Bounded integer value with optional circular wraparound
//!
//! A [`Limiter`] backs every scrollable or incrementable tool: numeric
//! counters clamp at their bounds, icon scrollers may wrap around, and the
//! binary switcher is a two-position circular limiter.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolbarError};

/// Change notification: `(new_value, is_initial)`
pub type ChangeCallback = Box<dyn FnMut(i64, bool) + Send>;

/// Range options exported with a tool's configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimiterConfig {
    pub min: i64,
    pub max: i64,
    pub circle: bool,
}

/// Bounded value holder
pub struct Limiter {
    min: i64,
    max: i64,
    value: i64,
    circle: bool,
    on_change: Option<ChangeCallback>,
}

impl Limiter {
    /// Create a limiter, clamping (or wrapping) the initial value.
    ///
    /// Fails with [`ToolbarError::InvalidRange`] when `min > max` or when
    /// `max - min` does not fit in an `i64`.
    pub fn new(min: i64, max: i64, value: i64, circle: bool) -> Result<Self> {
        // The span must fit in an i64
        if min > max || max.checked_sub(min).is_none() {
            return Err(ToolbarError::InvalidRange { min, max });
        }
        let mut limiter = Self {
            min,
            max,
            value: min,
            circle,
            on_change: None,
        };
        limiter.value = limiter.resolve(i128::from(value));
        Ok(limiter)
    }

    /// Create a limiter with a change callback.
    ///
    /// The callback runs once immediately with `is_initial = true` so the
    /// owner can render its initial state without emitting events.
    pub fn with_callback<F>(min: i64, max: i64, value: i64, circle: bool, callback: F) -> Result<Self>
    where
        F: FnMut(i64, bool) + Send + 'static,
    {
        let mut limiter = Self::new(min, max, value, circle)?;
        let mut callback: ChangeCallback = Box::new(callback);
        callback(limiter.value, true);
        limiter.on_change = Some(callback);
        Ok(limiter)
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn circle(&self) -> bool {
        self.circle
    }

    pub fn span(&self) -> i64 {
        self.max - self.min
    }

    /// Set a new value, returning whether the stored value changed.
    ///
    /// The change callback only fires when it did.
    pub fn set_value(&mut self, new_value: i64) -> bool {
        self.apply(self.resolve(i128::from(new_value)))
    }

    pub fn inc(&mut self) -> bool {
        self.apply(self.resolve(i128::from(self.value) + 1))
    }

    pub fn dec(&mut self) -> bool {
        self.apply(self.resolve(i128::from(self.value) - 1))
    }

    pub fn config(&self) -> LimiterConfig {
        LimiterConfig {
            min: self.min,
            max: self.max,
            circle: self.circle,
        }
    }

    fn apply(&mut self, resolved: i64) -> bool {
        if resolved == self.value {
            return false;
        }
        self.value = resolved;
        if let Some(callback) = self.on_change.as_mut() {
            callback(resolved, false);
        }
        true
    }

    // Computed in i128 so neither far values nor extreme bounds overflow.
    fn resolve(&self, new: i128) -> i64 {
        let (min, max) = (i128::from(self.min), i128::from(self.max));
        let resolved = if (min..=max).contains(&new) {
            new
        } else if !self.circle {
            new.clamp(min, max)
        } else if min == max {
            min
        } else {
            let span = max - min;
            if new < min {
                div_ceil(min - new, span) * span + new + 1
            } else {
                new - div_ceil(new - max, span) * span - 1
            }
        };
        // Always within [min, max] by construction.
        i64::try_from(resolved).unwrap_or(self.min)
    }
}

// Both operands are positive here.
fn div_ceil(numerator: i128, denominator: i128) -> i128 {
    (numerator + denominator - 1) / denominator
}

impl fmt::Debug for Limiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Limiter")
            .field("min", &self.min)
            .field("max", &self.max)
            .field("value", &self.value)
            .field("circle", &self.circle)
            .field("has_callback", &self.on_change.is_some())
            .finish()
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pan and swipe.
//!
//! A pan is one pointer dragged across the surface. It starts once the live
//! vector is at least 10 units long, fires on every following tick while the
//! pointer stays down, and ends when the pointer is lifted. A pan whose final
//! speed exceeds [`Pan::swipe_final_speed`] also fires `swipe` right before
//! `panend`.
//!
//! Pan honors [`GestureOptions::supported_directions`] only for *starting*:
//! once active it accepts every direction, so turning from right to down
//! mid-drag does not end the gesture. The configured set comes back on end.

use crate::direction::Directions;
use crate::error::ConfigError;
use crate::event::{Emitter, Payload};
use crate::geometry::ContactSnapshot;
use crate::interval::{Interval, Measurements, Parameter, ParameterSet, Preconditions, Requirement};
use crate::recognizer::{self, Gesture, GestureOptions, RecognizerCore};
use crate::single;

/// Final speed, in units per second, above which a pan is also a swipe.
pub const DEFAULT_SWIPE_FINAL_SPEED: f64 = 600.0;

/// One-pointer drag recognizer.
#[derive(Clone, Debug)]
pub struct Pan {
    core: RecognizerCore,
    configured: Directions,
    swipe_final_speed: f64,
    is_swipe: bool,
}

impl Pan {
    /// Base event name.
    pub const NAME: &'static str = "pan";
    /// Event name fired for fast pans.
    pub const SWIPE: &'static str = "swipe";

    /// Create a pan recognizer. Without explicit directions every direction is supported.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyDirections`] if `options` declares an empty direction list.
    /// - [`ConfigError::InvertedInterval`] if an acceptance interval has `min > max`.
    pub fn new(options: GestureOptions) -> Result<Self, ConfigError> {
        let configured = options.supported_directions.unwrap_or(Directions::ALL);
        let core = RecognizerCore::new(
            Self::NAME,
            ParameterSet::new()
                .with(Parameter::PointerCount, Interval::exactly(1.0))
                .with(Parameter::Duration, Interval::at_least(0.0))
                .with(Parameter::Distance, Interval::at_least(10.0)),
            ParameterSet::new().with(Parameter::PointerCount, Interval::exactly(1.0)),
            Preconditions {
                requires_pointer_move: Requirement::True,
                requires_active_pointer: Requirement::True,
            },
            GestureOptions {
                supported_directions: Some(configured),
                ..options
            },
        )?;
        Ok(Self {
            core,
            configured,
            swipe_final_speed: DEFAULT_SWIPE_FINAL_SPEED,
            is_swipe: false,
        })
    }

    /// Threshold for [`Pan::SWIPE`].
    #[must_use]
    pub fn swipe_final_speed(&self) -> f64 {
        self.swipe_final_speed
    }

    /// Change the threshold for [`Pan::SWIPE`].
    pub fn set_swipe_final_speed(&mut self, speed: f64) {
        self.swipe_final_speed = speed;
    }

    /// Whether the most recent pan ended as a swipe.
    #[must_use]
    pub fn is_swipe(&self) -> bool {
        self.is_swipe
    }

    /// Directions a pan may start in.
    #[must_use]
    pub fn configured_directions(&self) -> Directions {
        self.configured
    }
}

impl Gesture for Pan {
    fn core(&self) -> &RecognizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RecognizerCore {
        &mut self.core
    }

    fn measure(&self, snapshot: &ContactSnapshot) -> Measurements {
        single::measure(snapshot)
    }

    fn payload(&self, snapshot: &ContactSnapshot) -> Payload {
        single::payload(self.core.origin(), snapshot)
    }

    fn directions(&self) -> Option<Directions> {
        if self.core.is_active() {
            Some(Directions::ALL)
        } else {
            Some(self.configured)
        }
    }

    fn on_start(&mut self, snapshot: &ContactSnapshot, out: &mut Emitter<'_>) {
        self.is_swipe = false;
        recognizer::start(self, snapshot, out);
    }

    fn on_end(&mut self, snapshot: &ContactSnapshot, out: &mut Emitter<'_>) {
        let final_speed = snapshot.primary.global.final_speed;
        if final_speed.is_some_and(|speed| speed > self.swipe_final_speed) {
            self.is_swipe = true;
            recognizer::fire(self, snapshot, out, Self::SWIPE);
        }
        recognizer::end(self, snapshot, out);
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Press: a pointer held still for a while.
//!
//! Press fires once, while the pointer is still down, on the first tick at
//! which the hold lasted at least 600 ms and the pointer is within 10 units
//! of where it went down. Qualification is reactive: without a tick after the
//! threshold, nothing fires.
//!
//! Distance is measured against the pointer-down position (the global
//! vector), not the live window, so slow drift cannot reset the baseline.
//! Once the pointer has been further away than that, press is off for the rest
//! of the contact, even if the pointer comes back and holds still.

use crate::error::ConfigError;
use crate::event::{Emitter, Payload};
use crate::geometry::{ContactId, ContactSnapshot};
use crate::interval::{Interval, Measurements, Parameter, ParameterSet, Preconditions, Requirement};
use crate::recognizer::{self, Gesture, GestureOptions, RecognizerCore, Transition};
use crate::single;

/// Where a [`Press`] stands within the current contact.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PressLatch {
    /// Ready to fire.
    #[default]
    Armed,
    /// Fired during the given contact.
    Fired(ContactId),
    /// Disqualified for the rest of the given contact.
    Invalidated(ContactId),
}

/// Long-press recognizer.
#[derive(Clone, Debug)]
pub struct Press {
    core: RecognizerCore,
    latch: PressLatch,
}

impl Press {
    /// Base event name.
    pub const NAME: &'static str = "press";

    /// Create a press recognizer.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyDirections`] if `options` declares an empty direction list.
    /// - [`ConfigError::InvertedInterval`] if an acceptance interval has `min > max`.
    pub fn new(options: GestureOptions) -> Result<Self, ConfigError> {
        let core = RecognizerCore::new(
            Self::NAME,
            ParameterSet::new()
                .with(Parameter::PointerCount, Interval::exactly(1.0))
                .with(Parameter::Duration, Interval::at_least(600.0))
                .with(Parameter::Distance, Interval::at_most(10.0)),
            ParameterSet::new(),
            Preconditions {
                requires_pointer_move: Requirement::DontCare,
                requires_active_pointer: Requirement::True,
            },
            options,
        )?;
        Ok(Self {
            core,
            latch: PressLatch::Armed,
        })
    }

    /// Current latch state.
    #[must_use]
    pub fn latch(&self) -> PressLatch {
        self.latch
    }

    /// Re-arm at contact boundaries, or once the hold is shorter than the
    /// minimum duration again.
    fn rearm(&mut self, contact: ContactId, duration: f64) {
        let min_duration = self.core.initial_parameters().get(Parameter::Duration).min;
        self.latch = match self.latch {
            PressLatch::Invalidated(id) if id != contact => PressLatch::Armed,
            PressLatch::Fired(id)
                if id != contact || min_duration.is_some_and(|min| duration < min) =>
            {
                PressLatch::Armed
            }
            latch => latch,
        };
    }
}

impl Gesture for Press {
    fn core(&self) -> &RecognizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RecognizerCore {
        &mut self.core
    }

    fn measure(&self, snapshot: &ContactSnapshot) -> Measurements {
        let mut m = single::measure(snapshot);
        m.set(Parameter::Distance, snapshot.primary.global.vector.length());
        m
    }

    fn payload(&self, snapshot: &ContactSnapshot) -> Payload {
        single::payload(self.core.origin(), snapshot)
    }

    fn recognize(&mut self, snapshot: &ContactSnapshot, out: &mut Emitter<'_>) -> Option<Transition> {
        let global = &snapshot.primary.global;
        self.rearm(snapshot.id, global.duration);

        let valid = self.validate(snapshot);
        let max_distance = self.core.initial_parameters().get(Parameter::Distance).max;
        if !valid && max_distance.is_some_and(|max| global.vector.length() > max) {
            if !matches!(self.latch, PressLatch::Invalidated(_)) {
                self.core
                    .trace(format_args!("moved too far, off for {:?}", snapshot.id));
            }
            self.latch = PressLatch::Invalidated(snapshot.id);
        }

        if valid && self.latch == PressLatch::Armed {
            self.core.set_origin(snapshot.event);
            recognizer::fire(self, snapshot, out, Self::NAME);
            self.latch = PressLatch::Fired(snapshot.id);
        }
        None
    }
}

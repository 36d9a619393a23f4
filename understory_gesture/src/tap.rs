// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tap: a short touch that barely moves, reported after release.
//!
//! Tap never becomes active. It is checked on every tick, but its
//! `pointerCount = [0, 0]` interval means it can only succeed on the tick at
//! which the last pointer is lifted. It then fires `tap` once, using that
//! tick's event as its origin. A cancelled contact never taps.
//!
//! Tap fires at most once per contact and re-arms as soon as a new contact
//! is seen, independent of whether any blocked siblings were released in the
//! meantime. A fast double tap therefore produces two `tap` events.

use crate::error::ConfigError;
use crate::event::{Emitter, Payload};
use crate::geometry::{ContactId, ContactSnapshot, PointerEventKind};
use crate::interval::{Interval, Measurements, Parameter, ParameterSet, Preconditions, Requirement};
use crate::recognizer::{self, Gesture, GestureOptions, RecognitionState, RecognizerCore, Transition};
use crate::single;

/// Short-touch recognizer.
#[derive(Clone, Debug)]
pub struct Tap {
    core: RecognizerCore,
    fired_for: Option<ContactId>,
}

impl Tap {
    /// Base event name.
    pub const NAME: &'static str = "tap";

    /// Create a tap recognizer.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyDirections`] if `options` declares an empty direction list.
    /// - [`ConfigError::InvertedInterval`] if an acceptance interval has `min > max`.
    pub fn new(options: GestureOptions) -> Result<Self, ConfigError> {
        let core = RecognizerCore::new(
            Self::NAME,
            ParameterSet::new()
                .with(Parameter::PointerCount, Interval::exactly(0.0))
                .with(Parameter::Duration, Interval::between(0.0, 200.0))
                .with(Parameter::Distance, Interval::at_most(30.0)),
            ParameterSet::new(),
            Preconditions {
                requires_pointer_move: Requirement::DontCare,
                requires_active_pointer: Requirement::False,
            },
            options,
        )?;
        Ok(Self {
            core,
            fired_for: None,
        })
    }

    /// The contact this recognizer last fired for.
    #[must_use]
    pub fn fired_for(&self) -> Option<ContactId> {
        self.fired_for
    }
}

impl Gesture for Tap {
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

    fn recognize(&mut self, snapshot: &ContactSnapshot, out: &mut Emitter<'_>) -> Option<Transition> {
        if self.fired_for == Some(snapshot.id) || snapshot.event.kind == PointerEventKind::Cancel {
            return None;
        }
        if self.validate(snapshot) && self.core.state() == RecognitionState::Possible {
            self.core.set_origin(snapshot.event);
            recognizer::fire(self, snapshot, out, Self::NAME);
            self.fired_for = Some(snapshot.id);
        }
        None
    }
}

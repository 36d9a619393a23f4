// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared recognizer state machine.
//!
//! Every recognizer owns a [`RecognizerCore`]: its name, its
//! [`RecognitionState`], the two acceptance sets (one checked while
//! [`Possible`](RecognitionState::Possible), one while
//! [`Active`](RecognitionState::Active)), its [`Preconditions`] and its
//! [`GestureOptions`]. The [`Gesture`] trait adds the two behaviors that vary
//! between gesture families, [`Gesture::measure`] and [`Gesture::payload`],
//! and provides the state machine on top of them:
//!
//! ```text
//!            valid                  invalid
//! Possible ────────▶ Active ─────────────────▶ Possible
//!    │  ▲              │ valid: fire every tick
//!    ▼  │ unblock      ▼
//!  Blocked
//! ```
//!
//! Transitions happen only inside [`Gesture::recognize`]. Blocking is never
//! done by a recognizer itself: it reports a [`Transition`] and the
//! [`Recognizers`](crate::Recognizers) registry delivers [`BlockMessage`]s to
//! the siblings configured in its block edge list.

use core::fmt;

use crate::direction::{Direction, Directions};
use crate::error::ConfigError;
use crate::event::{Emitter, EventPhase, Payload};
use crate::geometry::{ContactSnapshot, PointerEvent};
use crate::interval::{Facts, Measurements, ParameterSet, Preconditions};

/// Where a recognizer is in its lifecycle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RecognitionState {
    /// Eligible to start.
    #[default]
    Possible,
    /// Recognized and firing continuation events.
    Active,
    /// Suppressed by an active sibling; returns to `Possible` when unblocked.
    Blocked,
}

/// A state change reported by [`Gesture::recognize`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Transition {
    /// `Possible → Active`.
    Started,
    /// `Active → Possible`.
    Ended,
}

/// Instruction sent to a recognizer by a sibling that blocks it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlockMessage {
    /// The blocker started: stop being eligible unless already active.
    Block,
    /// The blocker ended: become eligible again.
    Unblock,
}

/// Per-recognizer options.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GestureOptions {
    /// Whether fired events propagate up the containment hierarchy.
    pub bubbles: bool,
    /// Directions the live movement must match; `None` disables filtering.
    ///
    /// Also selects which direction-suffixed events are fired.
    pub supported_directions: Option<Directions>,
    /// Log every dismissal and fired event at debug level.
    pub debug: bool,
}

impl Default for GestureOptions {
    fn default() -> Self {
        Self {
            bubbles: true,
            supported_directions: None,
            debug: false,
        }
    }
}

impl GestureOptions {
    /// Builder-style setter for [`supported_directions`](Self::supported_directions).
    #[must_use]
    pub fn with_directions(mut self, directions: Directions) -> Self {
        self.supported_directions = Some(directions);
        self
    }
}

/// State and configuration shared by every recognizer.
#[derive(Clone, Debug)]
pub struct RecognizerCore {
    name: &'static str,
    state: RecognitionState,
    initial: ParameterSet,
    active: ParameterSet,
    preconditions: Preconditions,
    options: GestureOptions,
    origin: Option<PointerEvent>,
}

impl RecognizerCore {
    /// Create a core, rejecting configurations that could never work.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyDirections`] if `options` declares an empty direction list.
    /// - [`ConfigError::InvertedInterval`] if any interval has `min > max`.
    pub fn new(
        name: &'static str,
        initial: ParameterSet,
        active: ParameterSet,
        preconditions: Preconditions,
        options: GestureOptions,
    ) -> Result<Self, ConfigError> {
        if options.supported_directions.is_some_and(|d| d.is_empty()) {
            return Err(ConfigError::EmptyDirections { gesture: name });
        }
        for set in [&initial, &active] {
            if let Some(parameter) = set.first_inverted() {
                return Err(ConfigError::InvertedInterval {
                    gesture: name,
                    parameter,
                });
            }
        }
        Ok(Self {
            name,
            state: RecognitionState::Possible,
            initial,
            active,
            preconditions,
            options,
            origin: None,
        })
    }

    /// Base event name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> RecognitionState {
        self.state
    }

    /// `true` while [`RecognitionState::Active`].
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == RecognitionState::Active
    }

    /// Intervals checked before the gesture is recognized.
    #[must_use]
    pub fn initial_parameters(&self) -> &ParameterSet {
        &self.initial
    }

    /// Intervals checked while the gesture is active.
    #[must_use]
    pub fn active_parameters(&self) -> &ParameterSet {
        &self.active
    }

    /// The set that applies in the current state.
    #[must_use]
    pub fn parameters(&self) -> &ParameterSet {
        if self.is_active() {
            &self.active
        } else {
            &self.initial
        }
    }

    /// Boolean preconditions.
    #[must_use]
    pub fn preconditions(&self) -> &Preconditions {
        &self.preconditions
    }

    /// Options this recognizer was built with.
    #[must_use]
    pub fn options(&self) -> &GestureOptions {
        &self.options
    }

    /// The event at which the gesture was last recognized.
    #[must_use]
    pub fn origin(&self) -> Option<&PointerEvent> {
        self.origin.as_ref()
    }

    /// Fix the origin for global measurements.
    pub fn set_origin(&mut self, event: PointerEvent) {
        self.origin = Some(event);
    }

    /// Check one tick's measurements.
    ///
    /// Fails when blocked, when a precondition is unmet, when a measurement
    /// lies outside the interval for the current state, or when `direction`
    /// is outside `directions`. Absent values never fail.
    #[must_use]
    pub fn check(
        &self,
        measurements: &Measurements,
        facts: Facts,
        direction: Option<Direction>,
        directions: Option<Directions>,
    ) -> bool {
        if self.state == RecognitionState::Blocked {
            return false;
        }
        if let Some(flag) = self.preconditions.first_violation(facts) {
            self.trace(format_args!("{flag} not met ({facts:?})"));
            return false;
        }
        let parameters = self.parameters();
        if let Some(parameter) = parameters.first_violation(measurements) {
            self.trace(format_args!(
                "{} = {:?} outside {:?} (active: {})",
                parameter.name(),
                measurements.get(parameter),
                parameters.get(parameter),
                self.is_active()
            ));
            return false;
        }
        if let (Some(allowed), Some(direction)) = (directions, direction) {
            if !allowed.allows(direction) {
                self.trace(format_args!("direction {direction:?} not in {allowed:?}"));
                return false;
            }
        }
        true
    }

    /// Apply a message from a blocking sibling.
    ///
    /// Returns `true` if the state changed. An active recognizer ignores
    /// [`BlockMessage::Block`]; only a blocked one reacts to
    /// [`BlockMessage::Unblock`].
    pub fn receive(&mut self, message: BlockMessage) -> bool {
        let next = match (message, self.state) {
            (BlockMessage::Block, RecognitionState::Possible) => RecognitionState::Blocked,
            (BlockMessage::Unblock, RecognitionState::Blocked) => RecognitionState::Possible,
            _ => return false,
        };
        self.state = next;
        true
    }

    fn activate(&mut self, origin: PointerEvent) {
        self.state = RecognitionState::Active;
        self.origin = Some(origin);
    }

    fn deactivate(&mut self) {
        self.state = RecognitionState::Possible;
    }

    pub(crate) fn trace(&self, message: fmt::Arguments<'_>) {
        if self.options.debug {
            log::debug!("[{}] {message}", self.name);
        }
    }
}

/// Boolean facts of a snapshot's primary pointer.
#[must_use]
pub fn facts(snapshot: &ContactSnapshot) -> Facts {
    Facts {
        has_moved: snapshot.primary.global.has_moved,
        pointer_active: snapshot.primary.is_active,
    }
}

/// A gesture recognizer.
///
/// Implementors supply the core accessors, [`measure`](Self::measure) and
/// [`payload`](Self::payload). The provided methods implement the shared
/// state machine; override [`recognize`](Self::recognize),
/// [`on_start`](Self::on_start) or [`on_end`](Self::on_end) for gesture
/// specific lifecycles and call [`drive`], [`start`], [`end`] or [`fire`] to
/// reuse the shared steps.
pub trait Gesture: fmt::Debug {
    /// Shared state.
    fn core(&self) -> &RecognizerCore;

    /// Shared state, mutably.
    fn core_mut(&mut self) -> &mut RecognizerCore;

    /// Derive the values checked against the acceptance intervals.
    fn measure(&self, snapshot: &ContactSnapshot) -> Measurements;

    /// Build the global and live motion carried by events.
    fn payload(&self, snapshot: &ContactSnapshot) -> Payload;

    /// Directions used for validation and direction-suffixed events.
    fn directions(&self) -> Option<Directions> {
        self.core().options().supported_directions
    }

    /// Whether `snapshot` satisfies this recognizer in its current state.
    fn validate(&self, snapshot: &ContactSnapshot) -> bool {
        self.core().check(
            &self.measure(snapshot),
            facts(snapshot),
            snapshot.primary.live.vector.direction,
            self.directions(),
        )
    }

    /// Run one tick of the state machine.
    fn recognize(&mut self, snapshot: &ContactSnapshot, out: &mut Emitter<'_>) -> Option<Transition> {
        drive(self, snapshot, out)
    }

    /// Called on `Possible → Active`.
    fn on_start(&mut self, snapshot: &ContactSnapshot, out: &mut Emitter<'_>) {
        start(self, snapshot, out);
    }

    /// Called on `Active → Possible`.
    fn on_end(&mut self, snapshot: &ContactSnapshot, out: &mut Emitter<'_>) {
        end(self, snapshot, out);
    }
}

/// The shared state machine: at most one state change per tick.
pub fn drive<G: Gesture + ?Sized>(
    gesture: &mut G,
    snapshot: &ContactSnapshot,
    out: &mut Emitter<'_>,
) -> Option<Transition> {
    let valid = gesture.validate(snapshot);
    match gesture.core().state() {
        RecognitionState::Possible if valid => {
            gesture.on_start(snapshot, out);
            Some(Transition::Started)
        }
        RecognitionState::Active if valid => {
            let name = gesture.core().name();
            fire(gesture, snapshot, out, name);
            None
        }
        RecognitionState::Active => {
            gesture.on_end(snapshot, out);
            Some(Transition::Ended)
        }
        _ => None,
    }
}

/// Activate, take the current event as origin and emit `<name>start`.
pub fn start<G: Gesture + ?Sized>(gesture: &mut G, snapshot: &ContactSnapshot, out: &mut Emitter<'_>) {
    gesture.core_mut().activate(snapshot.event);
    let name = gesture.core().name();
    gesture.core().trace(format_args!("firing {name}start"));
    out.push(name, EventPhase::Start, None, false, gesture.payload(snapshot));
}

/// Deactivate and emit `<name>end`.
pub fn end<G: Gesture + ?Sized>(gesture: &mut G, snapshot: &ContactSnapshot, out: &mut Emitter<'_>) {
    let payload = gesture.payload(snapshot);
    gesture.core_mut().deactivate();
    let name = gesture.core().name();
    gesture.core().trace(format_args!("firing {name}end"));
    out.push(name, EventPhase::End, None, false, payload);
}

/// Emit `name` and, if the live direction is one of the recognizer's
/// directions, the direction-suffixed variant.
pub fn fire<G: Gesture + ?Sized>(
    gesture: &G,
    snapshot: &ContactSnapshot,
    out: &mut Emitter<'_>,
    name: &'static str,
) {
    let core = gesture.core();
    let bubbles = core.options().bubbles;
    let payload = gesture.payload(snapshot);
    core.trace(format_args!("firing {name}"));
    out.push(name, EventPhase::Fired, None, bubbles, payload);

    let Some(direction) = payload.live.direction else {
        return;
    };
    if gesture.directions().is_some_and(|d| d.allows(direction)) {
        core.trace(format_args!("firing {name}{}", direction.suffix()));
        out.push(name, EventPhase::Fired, Some(direction), bubbles, payload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::{Interval, Parameter, Requirement};

    fn core(options: GestureOptions) -> Result<RecognizerCore, ConfigError> {
        RecognizerCore::new(
            "stroke",
            ParameterSet::new().with(Parameter::Distance, Interval::at_least(10.0)),
            ParameterSet::new(),
            Preconditions {
                requires_pointer_move: Requirement::True,
                requires_active_pointer: Requirement::DontCare,
            },
            options,
        )
    }

    fn moved() -> Facts {
        Facts {
            has_moved: true,
            pointer_active: true,
        }
    }

    #[test]
    fn empty_direction_list_is_rejected() {
        let err = core(GestureOptions::default().with_directions(Directions::empty())).unwrap_err();
        assert_eq!(err, ConfigError::EmptyDirections { gesture: "stroke" });
    }

    #[test]
    fn inverted_interval_is_rejected() {
        let err = RecognizerCore::new(
            "stroke",
            ParameterSet::new(),
            ParameterSet::new().with(Parameter::Duration, Interval::between(5.0, 1.0)),
            Preconditions::default(),
            GestureOptions::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvertedInterval {
                gesture: "stroke",
                parameter: Parameter::Duration
            }
        );
    }

    #[test]
    fn check_selects_parameter_set_by_state() {
        let mut c = core(GestureOptions::default()).unwrap();
        let mut m = Measurements::new();
        m.set(Parameter::Distance, 2.0);
        assert!(!c.check(&m, moved(), None, None), "initial set requires distance >= 10");

        c.activate(PointerEvent::moved(1, kurbo::Point::ZERO, 0.0));
        assert!(c.check(&m, moved(), None, None), "active set is unbounded");
    }

    #[test]
    fn check_applies_preconditions_and_directions() {
        let c = core(GestureOptions::default()).unwrap();
        let mut m = Measurements::new();
        m.set(Parameter::Distance, 20.0);
        let still = Facts {
            has_moved: false,
            pointer_active: true,
        };
        assert!(!c.check(&m, still, None, None));
        assert!(c.check(&m, moved(), Some(Direction::Left), Some(Directions::HORIZONTAL)));
        assert!(!c.check(&m, moved(), Some(Direction::Up), Some(Directions::HORIZONTAL)));
        assert!(c.check(&m, moved(), None, Some(Directions::HORIZONTAL)), "no direction is unconstrained");
    }

    #[test]
    fn blocking_only_affects_possible_recognizers() {
        let mut c = core(GestureOptions::default()).unwrap();
        assert!(c.receive(BlockMessage::Block));
        assert_eq!(c.state(), RecognitionState::Blocked);
        let mut m = Measurements::new();
        m.set(Parameter::Distance, 20.0);
        assert!(!c.check(&m, moved(), None, None), "blocked never validates");
        assert!(!c.receive(BlockMessage::Block));
        assert!(c.receive(BlockMessage::Unblock));
        assert_eq!(c.state(), RecognitionState::Possible);

        c.activate(PointerEvent::moved(1, kurbo::Point::ZERO, 0.0));
        assert!(!c.receive(BlockMessage::Block), "active recognizers are left alone");
        assert!(!c.receive(BlockMessage::Unblock));
        assert_eq!(c.state(), RecognitionState::Active);
    }
}

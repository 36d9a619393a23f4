// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture events produced by recognizers.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Point;

use crate::direction::Direction;
use crate::geometry::{ContactId, ContactSnapshot, PointerEvent};
use crate::registry::RecognizerId;

/// Which part of a gesture's lifecycle an event reports.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventPhase {
    /// The gesture was recognized; name suffix `start`.
    Start,
    /// The gesture fired or continued; no suffix.
    Fired,
    /// The gesture stopped; name suffix `end`.
    End,
}

/// Movement measured over one time horizon.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Motion {
    /// Horizontal displacement.
    pub delta_x: f64,
    /// Vertical displacement.
    pub delta_y: f64,
    /// Length of the displacement.
    pub distance: f64,
    /// Horizontal speed, units per second.
    pub speed_x: f64,
    /// Vertical speed, units per second.
    pub speed_y: f64,
    /// Speed, units per second.
    pub speed: f64,
    /// Direction of the displacement.
    pub direction: Option<Direction>,
    /// Relative change of the pointer spread; always 1 for one pointer.
    pub scale: f64,
    /// Signed rotation in degrees; always 0 for one pointer.
    pub rotation: f64,
    /// Current center of the gesture; only set on live motion.
    pub center: Option<Point>,
}

impl Motion {
    /// No movement at all.
    pub const IDLE: Self = Self {
        delta_x: 0.0,
        delta_y: 0.0,
        distance: 0.0,
        speed_x: 0.0,
        speed_y: 0.0,
        speed: 0.0,
        direction: None,
        scale: 1.0,
        rotation: 0.0,
        center: None,
    };
}

/// Global (since the gesture was recognized) and live (current window) motion.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Payload {
    /// Measured from the recognizer's origin event.
    pub global: Motion,
    /// Measured over the live window ending at this tick.
    pub live: Motion,
}

/// A named, semantically labeled gesture event.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GestureEvent {
    /// Base name, e.g. `pan`, `swipe`, `pinch`.
    pub gesture: &'static str,
    /// Lifecycle phase.
    pub phase: EventPhase,
    /// Set on direction-suffixed variants.
    pub direction: Option<Direction>,
    /// The recognizer that produced this event.
    pub recognizer: RecognizerId,
    /// The session the event belongs to.
    pub contact: ContactId,
    /// The raw event of the tick that produced this event.
    pub source: PointerEvent,
    /// Whether the event should propagate up the containment hierarchy.
    pub bubbles: bool,
    /// Measured motion.
    pub payload: Payload,
}

impl GestureEvent {
    /// Full event name: base name, then phase or direction suffix.
    ///
    /// ```
    /// # use understory_gesture::{Direction, EventPhase, GestureEvent};
    /// # fn check(event: &GestureEvent) {
    /// // "panstart", "pan", "panleft", "panend", "swipe", "swipeup", "tap", ...
    /// if event.phase == EventPhase::Fired && event.direction == Some(Direction::Left) {
    ///     assert!(event.name().ends_with("left"));
    /// }
    /// # }
    /// ```
    #[must_use]
    pub fn name(&self) -> String {
        let mut name = String::from(self.gesture);
        name.push_str(self.suffix());
        name
    }

    /// Compare against a full event name without allocating.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        name.strip_prefix(self.gesture)
            .is_some_and(|rest| rest == self.suffix())
    }

    fn suffix(&self) -> &'static str {
        match (self.phase, self.direction) {
            (EventPhase::Start, _) => "start",
            (EventPhase::End, _) => "end",
            (EventPhase::Fired, Some(direction)) => direction.suffix(),
            (EventPhase::Fired, None) => "",
        }
    }
}

/// Collects the events one recognizer produces during one tick.
#[derive(Debug)]
pub struct Emitter<'a> {
    recognizer: RecognizerId,
    contact: ContactId,
    source: PointerEvent,
    events: &'a mut Vec<GestureEvent>,
}

impl<'a> Emitter<'a> {
    /// Emit into `events` on behalf of `recognizer` for the tick in `snapshot`.
    pub fn new(
        recognizer: RecognizerId,
        snapshot: &ContactSnapshot,
        events: &'a mut Vec<GestureEvent>,
    ) -> Self {
        Self {
            recognizer,
            contact: snapshot.id,
            source: snapshot.event,
            events,
        }
    }

    /// Append one event.
    pub fn push(
        &mut self,
        gesture: &'static str,
        phase: EventPhase,
        direction: Option<Direction>,
        bubbles: bool,
        payload: Payload,
    ) {
        self.events.push(GestureEvent {
            gesture,
            phase,
            direction,
            recognizer: self.recognizer,
            contact: self.contact,
            source: self.source,
            bubbles,
            payload,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(gesture: &'static str, phase: EventPhase, direction: Option<Direction>) -> GestureEvent {
        GestureEvent {
            gesture,
            phase,
            direction,
            recognizer: RecognizerId::from_index(0),
            contact: ContactId(1),
            source: PointerEvent::up(1, Point::ZERO, 0.0),
            bubbles: true,
            payload: Payload {
                global: Motion::IDLE,
                live: Motion::IDLE,
            },
        }
    }

    #[test]
    fn names_concatenate_base_and_suffix() {
        assert_eq!(event("pan", EventPhase::Start, None).name(), "panstart");
        assert_eq!(event("pan", EventPhase::Fired, None).name(), "pan");
        assert_eq!(
            event("swipe", EventPhase::Fired, Some(Direction::UpLeft)).name(),
            "swipeupleft"
        );
        assert_eq!(event("pinch", EventPhase::End, None).name(), "pinchend");
    }

    #[test]
    fn is_matches_full_names_only() {
        let e = event("pan", EventPhase::Fired, Some(Direction::Left));
        assert!(e.is("panleft"));
        assert!(!e.is("pan"));
        assert!(!e.is("panleftx"));
        assert!(!e.is("swipeleft"));
    }
}

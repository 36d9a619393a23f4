// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gestures driven by a pair of pointers: pinch, rotate and two-finger pan.
//!
//! All three share the same measurements, taken from the live pair
//! parameters of the snapshot:
//!
//! | Parameter | Measured as |
//! |---|---|
//! | `centerMovement` | distance the midpoint moved |
//! | `distanceChange` | absolute change of the pointer spread |
//! | `rotationAngle` | absolute rotation, degrees |
//! | `vectorAngle` | angle between the two pointers' own vectors, degrees |
//!
//! and differ only in their initial intervals. Under the default bands a pair
//! moving straight apart is a pinch, a pair turning around its midpoint is a
//! rotation, and a pair moving in parallel is a two-finger pan.
//!
//! Direction filtering and direction-suffixed events use the direction of the
//! midpoint's live movement.

use crate::error::ConfigError;
use crate::event::{Motion, Payload};
use crate::geometry::{ContactSnapshot, PointerEvent};
use crate::interval::{Interval, Measurements, Parameter, ParameterSet, Preconditions, Requirement};
use crate::recognizer::{Gesture, GestureOptions, RecognizerCore, facts};
use crate::single;

/// Pointer-count interval for gestures that need at least two pointers.
#[must_use]
pub fn multi_pointer_parameters() -> ParameterSet {
    ParameterSet::new().with(Parameter::PointerCount, Interval::at_least(2.0))
}

/// Pointer-count interval for gestures that need exactly two pointers.
#[must_use]
pub fn two_pointer_parameters() -> ParameterSet {
    multi_pointer_parameters().with(Parameter::PointerCount, Interval::exactly(2.0))
}

/// Two-pointer gestures need a moving, active pointer.
#[must_use]
pub fn two_pointer_preconditions() -> Preconditions {
    Preconditions {
        requires_pointer_move: Requirement::True,
        requires_active_pointer: Requirement::True,
    }
}

/// Single-pointer measurements plus the live pair parameters.
///
/// Without a pair the pair parameters are absent and pass every interval;
/// the pointer count is what keeps such ticks out.
#[must_use]
pub fn measure(snapshot: &ContactSnapshot) -> Measurements {
    let mut m = single::measure(snapshot);
    if let Some(multi) = &snapshot.multi {
        let live = &multi.live;
        m.set(Parameter::CenterMovement, live.center_movement);
        m.set(Parameter::DistanceChange, live.distance_change.abs());
        m.set(Parameter::RotationAngle, live.rotation_angle.abs());
        m.set_opt(Parameter::VectorAngle, live.vector_angle);
    }
    m
}

/// Payload from the pair's midpoint.
///
/// Deltas follow the midpoint: globally since the pair formed, live over the
/// window. Global speeds divide by the time since `origin`. Scale and rotation
/// come from the pair's relative distance change and signed rotation.
#[must_use]
pub fn payload(origin: Option<&PointerEvent>, snapshot: &ContactSnapshot) -> Payload {
    let Some(multi) = &snapshot.multi else {
        return Payload {
            global: Motion::IDLE,
            live: Motion::IDLE,
        };
    };
    let origin = origin.unwrap_or(&snapshot.event);

    let global = Motion {
        scale: multi.global.relative_distance_change,
        rotation: multi.global.rotation_angle,
        ..single::motion(
            &multi.global.center_movement_vector,
            snapshot.event.timestamp - origin.timestamp,
        )
    };
    let live = Motion {
        scale: multi.live.relative_distance_change,
        rotation: multi.live.rotation_angle,
        center: Some(multi.live.center_movement_vector.end),
        ..single::motion(&multi.live.center_movement_vector, multi.live.timespan)
    };

    Payload { global, live }
}

fn validate<G: Gesture + ?Sized>(gesture: &G, snapshot: &ContactSnapshot) -> bool {
    let direction = snapshot
        .multi
        .and_then(|multi| multi.live.center_movement_vector.direction);
    gesture.core().check(
        &gesture.measure(snapshot),
        facts(snapshot),
        direction,
        gesture.directions(),
    )
}

fn core(
    name: &'static str,
    initial: ParameterSet,
    options: GestureOptions,
) -> Result<RecognizerCore, ConfigError> {
    RecognizerCore::new(
        name,
        initial,
        two_pointer_parameters(),
        two_pointer_preconditions(),
        options,
    )
}

/// Two pointers converging or diverging.
#[derive(Clone, Debug)]
pub struct Pinch {
    core: RecognizerCore,
}

impl Pinch {
    /// Base event name.
    pub const NAME: &'static str = "pinch";

    /// Create a pinch recognizer.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyDirections`] if `options` declares an empty direction list.
    /// - [`ConfigError::InvertedInterval`] if an acceptance interval has `min > max`.
    pub fn new(options: GestureOptions) -> Result<Self, ConfigError> {
        let initial = two_pointer_parameters()
            .with(Parameter::CenterMovement, Interval::between(0.0, 50.0))
            .with(Parameter::DistanceChange, Interval::at_least(5.0))
            .with(Parameter::RotationAngle, Interval::at_most(20.0))
            .with(Parameter::VectorAngle, Interval::at_least(10.0));
        Ok(Self {
            core: core(Self::NAME, initial, options)?,
        })
    }
}

impl Gesture for Pinch {
    fn core(&self) -> &RecognizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RecognizerCore {
        &mut self.core
    }

    fn measure(&self, snapshot: &ContactSnapshot) -> Measurements {
        measure(snapshot)
    }

    fn payload(&self, snapshot: &ContactSnapshot) -> Payload {
        payload(self.core.origin(), snapshot)
    }

    fn validate(&self, snapshot: &ContactSnapshot) -> bool {
        validate(self, snapshot)
    }
}

/// Two pointers turning around their midpoint.
#[derive(Clone, Debug)]
pub struct Rotate {
    core: RecognizerCore,
}

impl Rotate {
    /// Base event name.
    pub const NAME: &'static str = "rotate";

    /// Create a rotate recognizer.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyDirections`] if `options` declares an empty direction list.
    /// - [`ConfigError::InvertedInterval`] if an acceptance interval has `min > max`.
    pub fn new(options: GestureOptions) -> Result<Self, ConfigError> {
        let initial = two_pointer_parameters()
            .with(Parameter::CenterMovement, Interval::between(0.0, 50.0))
            .with(Parameter::DistanceChange, Interval::at_most(50.0))
            .with(Parameter::RotationAngle, Interval::at_least(5.0));
        Ok(Self {
            core: core(Self::NAME, initial, options)?,
        })
    }
}

impl Gesture for Rotate {
    fn core(&self) -> &RecognizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RecognizerCore {
        &mut self.core
    }

    fn measure(&self, snapshot: &ContactSnapshot) -> Measurements {
        measure(snapshot)
    }

    fn payload(&self, snapshot: &ContactSnapshot) -> Payload {
        payload(self.core.origin(), snapshot)
    }

    fn validate(&self, snapshot: &ContactSnapshot) -> bool {
        validate(self, snapshot)
    }
}

/// Two pointers moving in parallel.
#[derive(Clone, Debug)]
pub struct TwoFingerPan {
    core: RecognizerCore,
}

impl TwoFingerPan {
    /// Base event name.
    pub const NAME: &'static str = "twofingerpan";

    /// Create a two-finger pan recognizer.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyDirections`] if `options` declares an empty direction list.
    /// - [`ConfigError::InvertedInterval`] if an acceptance interval has `min > max`.
    pub fn new(options: GestureOptions) -> Result<Self, ConfigError> {
        let initial = two_pointer_parameters()
            .with(Parameter::CenterMovement, Interval::at_least(3.0))
            .with(Parameter::DistanceChange, Interval::at_most(50.0))
            .with(Parameter::VectorAngle, Interval::at_most(150.0));
        Ok(Self {
            core: core(Self::NAME, initial, options)?,
        })
    }
}

impl Gesture for TwoFingerPan {
    fn core(&self) -> &RecognizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RecognizerCore {
        &mut self.core
    }

    fn measure(&self, snapshot: &ContactSnapshot) -> Measurements {
        measure(snapshot)
    }

    fn payload(&self, snapshot: &ContactSnapshot) -> Payload {
        payload(self.core.origin(), snapshot)
    }

    fn validate(&self, snapshot: &ContactSnapshot) -> bool {
        validate(self, snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::{Contact, ContactConfig};
    use crate::direction::{Direction, Directions};
    use crate::event::{Emitter, GestureEvent};
    use crate::geometry::ContactId;
    use crate::recognizer::{RecognitionState, Transition};
    use crate::registry::RecognizerId;
    use alloc::vec::Vec;
    use kurbo::Point;

    /// 50 * cos(30°).
    const COS30_50: f64 = 43.301_270_189_221_93;

    fn pair() -> Contact {
        let mut contact = Contact::new(
            ContactId(1),
            PointerEvent::down(1, Point::new(100.0, 100.0), 0.0),
            ContactConfig::default(),
        );
        contact.add_pointer(PointerEvent::down(2, Point::new(200.0, 100.0), 0.0));
        contact
    }

    /// Move both pointers at 200 ms and return the snapshot taken after both moved.
    fn moved(first: Point, second: Point) -> ContactSnapshot {
        let mut contact = pair();
        contact.on_pointer_move(PointerEvent::moved(1, first, 200.0));
        contact.on_pointer_move(PointerEvent::moved(2, second, 200.0));
        contact.snapshot()
    }

    fn apart() -> ContactSnapshot {
        moved(Point::new(80.0, 100.0), Point::new(220.0, 100.0))
    }

    fn turned() -> ContactSnapshot {
        moved(
            Point::new(150.0 - COS30_50, 75.0),
            Point::new(150.0 + COS30_50, 125.0),
        )
    }

    fn parallel() -> ContactSnapshot {
        moved(Point::new(130.0, 100.0), Point::new(230.0, 100.0))
    }

    fn all() -> [(&'static str, bool, bool, bool); 3] {
        let opts = GestureOptions::default();
        let (pinch, rotate, pan) = (
            Pinch::new(opts).unwrap(),
            Rotate::new(opts).unwrap(),
            TwoFingerPan::new(opts).unwrap(),
        );
        let check = |s: &ContactSnapshot| (pinch.validate(s), rotate.validate(s), pan.validate(s));
        let (a, b, c) = (check(&apart()), check(&turned()), check(&parallel()));
        [
            ("apart", a.0, a.1, a.2),
            ("turned", b.0, b.1, b.2),
            ("parallel", c.0, c.1, c.2),
        ]
    }

    #[test]
    fn representative_trajectories_are_exclusive() {
        let [apart, turned, parallel] = all();
        assert_eq!(apart, ("apart", true, false, false));
        assert_eq!(turned, ("turned", false, true, false));
        assert_eq!(parallel, ("parallel", false, false, true));
    }

    #[test]
    fn measurements_take_absolute_live_pair_values() {
        let m = measure(&apart());
        assert_eq!(m.get(Parameter::PointerCount), Some(2.0));
        assert_eq!(m.get(Parameter::CenterMovement), Some(0.0));
        assert_eq!(m.get(Parameter::DistanceChange), Some(40.0));
        assert_eq!(m.get(Parameter::RotationAngle), Some(0.0));
        let vector_angle = m.get(Parameter::VectorAngle).unwrap();
        assert!((vector_angle - 180.0).abs() < 1e-9, "pointers moved in opposite directions");

        // Converging yields the same distance change.
        let m = measure(&moved(Point::new(120.0, 100.0), Point::new(180.0, 100.0)));
        assert_eq!(m.get(Parameter::DistanceChange), Some(40.0));
    }

    #[test]
    fn single_pointer_has_no_pair_measurements() {
        let contact = Contact::new(
            ContactId(1),
            PointerEvent::down(1, Point::ZERO, 0.0),
            ContactConfig::default(),
        );
        let snapshot = contact.snapshot();
        let m = measure(&snapshot);
        assert_eq!(m.get(Parameter::CenterMovement), None);
        let p = payload(None, &snapshot);
        assert_eq!(p.live, Motion::IDLE);
    }

    #[test]
    fn payload_carries_scale_rotation_and_center() {
        let p = payload(None, &apart());
        assert!((p.global.scale - 1.4).abs() < 1e-12);
        assert_eq!(p.global.rotation, 0.0);
        assert_eq!(p.global.speed, 0.0, "no time since origin yet");
        assert_eq!(p.live.center, Some(Point::new(150.0, 100.0)));

        let p = payload(None, &turned());
        assert!((p.live.rotation - 30.0).abs() < 1e-9);
        assert!((p.live.scale - 1.0).abs() < 1e-9);

        let origin = PointerEvent::moved(1, Point::ZERO, 100.0);
        let p = payload(Some(&origin), &parallel());
        assert_eq!(p.global.delta_x, 30.0);
        assert_eq!(p.global.speed_x, 300.0);
        assert_eq!(p.live.direction, Some(Direction::Right));
    }

    #[test]
    fn pinch_ends_when_a_pointer_lifts() {
        let mut pinch = Pinch::new(GestureOptions::default()).unwrap();
        let mut contact = pair();
        let mut events: Vec<GestureEvent> = Vec::new();

        contact.on_pointer_move(PointerEvent::moved(1, Point::new(80.0, 100.0), 200.0));
        contact.on_pointer_move(PointerEvent::moved(2, Point::new(220.0, 100.0), 200.0));
        let snapshot = contact.snapshot();
        let mut out = Emitter::new(RecognizerId::from_index(0), &snapshot, &mut events);
        assert_eq!(pinch.recognize(&snapshot, &mut out), Some(Transition::Started));

        contact.on_pointer_up(PointerEvent::up(2, Point::new(220.0, 100.0), 300.0));
        let snapshot = contact.snapshot();
        let mut out = Emitter::new(RecognizerId::from_index(0), &snapshot, &mut events);
        assert_eq!(pinch.recognize(&snapshot, &mut out), Some(Transition::Ended));

        assert_eq!(pinch.core().state(), RecognitionState::Possible);
        let names: Vec<_> = events.iter().map(GestureEvent::name).collect();
        assert_eq!(names, ["pinchstart", "pinchend"]);
    }

    #[test]
    fn directions_filter_on_midpoint_movement() {
        let pan = TwoFingerPan::new(GestureOptions::default().with_directions(Directions::VERTICAL))
            .unwrap();
        assert!(!pan.validate(&parallel()));
        let pan = TwoFingerPan::new(GestureOptions::default().with_directions(Directions::RIGHT))
            .unwrap();
        assert!(pan.validate(&parallel()));
    }
}

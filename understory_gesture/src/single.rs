// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measurements and payloads for gestures driven by the primary pointer.

use crate::event::{Motion, Payload};
use crate::geometry::{ContactSnapshot, PointerEvent, Vector};
use crate::interval::{Measurements, Parameter};

/// Measurements from the primary pointer.
///
/// `distance` is the length of the live vector.
#[must_use]
pub fn measure(snapshot: &ContactSnapshot) -> Measurements {
    let primary = &snapshot.primary;
    let mut m = Measurements::new();
    m.set(Parameter::PointerCount, snapshot.active_pointers as f64);
    m.set(Parameter::Duration, primary.global.duration);
    m.set(Parameter::CurrentSpeed, primary.live.speed);
    m.set(Parameter::AverageSpeed, primary.global.average_speed);
    m.set_opt(Parameter::FinalSpeed, primary.global.final_speed);
    m.set(Parameter::Distance, primary.live.vector.length());
    m
}

/// Payload from the primary pointer.
///
/// Global motion runs from `origin` (or the current event, if the gesture has
/// none yet) to the primary pointer's current position. Scale and rotation
/// are fixed at 1 and 0.
#[must_use]
pub fn payload(origin: Option<&PointerEvent>, snapshot: &ContactSnapshot) -> Payload {
    let origin = origin.unwrap_or(&snapshot.event);
    let primary = &snapshot.primary;

    let global_vector = Vector::new(origin.position, primary.position, snapshot.granularity);
    let global = motion(&global_vector, snapshot.event.timestamp - origin.timestamp);

    let live = Motion {
        speed: primary.live.speed,
        center: Some(primary.live.vector.end),
        ..motion(&primary.live.vector, primary.live.timespan)
    };

    Payload { global, live }
}

/// Motion along `vector` over `millis`, with scale 1 and rotation 0.
pub(crate) fn motion(vector: &Vector, millis: f64) -> Motion {
    let delta = vector.delta();
    let distance = vector.length();
    let per_second = if millis > 0.0 { 1000.0 / millis } else { 0.0 };
    Motion {
        delta_x: delta.x,
        delta_y: delta.y,
        distance,
        speed_x: delta.x * per_second,
        speed_y: delta.y * per_second,
        speed: distance * per_second,
        direction: vector.direction,
        ..Motion::IDLE
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contact: turn raw pointer events into [`ContactSnapshot`]s.
//!
//! ## Usage
//!
//! 1) Create a [`Contact`] from the first pointer-down event.
//! 2) Feed further events with [`Contact::add_pointer`], [`Contact::on_pointer_move`],
//!    [`Contact::on_pointer_up`] and [`Contact::on_pointer_cancel`].
//! 3) After each event, read a [`Contact::snapshot`] and hand it to recognizers.
//! 4) Drop the contact once [`Contact::is_active`] turns `false`.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use understory_gesture::{Contact, ContactConfig, ContactId, PointerEvent};
//!
//! let down = PointerEvent::down(1, Point::new(10.0, 20.0), 0.0);
//! let mut contact = Contact::new(ContactId(1), down, ContactConfig::default());
//!
//! contact.on_pointer_move(PointerEvent::moved(1, Point::new(40.0, 60.0), 250.0));
//! let snapshot = contact.snapshot();
//!
//! assert_eq!(snapshot.active_pointers, 1);
//! assert_eq!(snapshot.primary.global.vector.length(), 50.0);
//! assert_eq!(snapshot.primary.global.duration, 250.0);
//! ```

use alloc::collections::VecDeque;

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::direction::DirectionGranularity;
use crate::geometry::{
    ContactId, ContactSnapshot, MultiPointerSnapshot, PairParameters, PointerEvent, PointerGlobal,
    PointerId, PointerLive, PointerSnapshot, Vector,
};

/// Tuning for how a [`Contact`] derives its measurements.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContactConfig {
    /// Length of the live window in milliseconds.
    pub vector_timespan: f64,
    /// Granularity used to classify every [`Vector`].
    pub granularity: DirectionGranularity,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            vector_timespan: 100.0,
            granularity: DirectionGranularity::Four,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Sample {
    position: Point,
    time: f64,
}

/// Tracks one pointer from down to up.
#[derive(Clone, Debug)]
struct PointerInput {
    id: PointerId,
    is_active: bool,
    down: Sample,
    /// Oldest entry is the live window start, newest is the current sample.
    history: VecDeque<Sample>,
    has_moved: bool,
    final_speed: Option<f64>,
}

impl PointerInput {
    fn new(id: PointerId, down: Sample) -> Self {
        let mut history = VecDeque::new();
        history.push_back(down);
        Self {
            id,
            is_active: true,
            down,
            history,
            has_moved: false,
            final_speed: None,
        }
    }

    fn current(&self) -> Sample {
        self.history.back().copied().unwrap_or(self.down)
    }

    fn window_start(&self) -> Sample {
        self.history.front().copied().unwrap_or(self.down)
    }

    fn update(&mut self, position: Point, time: f64, timespan: f64) {
        let current = self.current();
        let time = if time < current.time {
            log::warn!(
                "pointer {:?}: timestamp went backwards ({time} < {}), clamping",
                self.id,
                current.time
            );
            current.time
        } else {
            time
        };
        if position != current.position {
            self.has_moved = true;
        }
        self.history.push_back(Sample { position, time });

        // Keep exactly one sample at or before the window cutoff.
        let cutoff = time - timespan;
        while self.history.len() > 1 && self.history[1].time <= cutoff {
            self.history.pop_front();
        }
    }

    fn live(&self, granularity: DirectionGranularity) -> PointerLive {
        let start = self.window_start();
        let end = self.current();
        let vector = Vector::new(start.position, end.position, granularity);
        let timespan = end.time - start.time;
        PointerLive {
            timespan,
            speed: per_second(vector.length(), timespan),
            vector,
        }
    }

    fn release(&mut self, granularity: DirectionGranularity) {
        self.is_active = false;
        self.final_speed = Some(self.live(granularity).speed);
    }

    fn snapshot(&self, granularity: DirectionGranularity) -> PointerSnapshot {
        let current = self.current();
        let vector = Vector::new(self.down.position, current.position, granularity);
        let duration = current.time - self.down.time;
        PointerSnapshot {
            id: self.id,
            is_active: self.is_active,
            position: current.position,
            global: PointerGlobal {
                duration,
                average_speed: per_second(vector.length(), duration),
                final_speed: self.final_speed,
                has_moved: self.has_moved,
                vector,
            },
            live: self.live(granularity),
        }
    }
}

/// The two pointers measured as a pair, and where they were when it formed.
#[derive(Copy, Clone, Debug, PartialEq)]
struct PairOrigin {
    ids: [PointerId; 2],
    first: Point,
    second: Point,
    time: f64,
}

impl PairOrigin {
    /// The pointer's live window start, clamped to when the pair formed.
    fn window_start(&self, input: &PointerInput, at_origin: Point) -> Sample {
        let start = input.window_start();
        if start.time < self.time {
            Sample {
                position: at_origin,
                time: self.time,
            }
        } else {
            start
        }
    }
}

/// One continuous interaction: from the first pointer touching the surface
/// until every pointer is lifted or the interaction is cancelled.
#[derive(Clone, Debug)]
pub struct Contact {
    id: ContactId,
    config: ContactConfig,
    inputs: SmallVec<[PointerInput; 2]>,
    current_event: PointerEvent,
    pair_origin: Option<PairOrigin>,
}

impl Contact {
    /// Start a contact from its first pointer-down event.
    #[must_use]
    pub fn new(id: ContactId, event: PointerEvent, config: ContactConfig) -> Self {
        let mut inputs = SmallVec::new();
        inputs.push(PointerInput::new(
            event.pointer_id,
            Sample {
                position: event.position,
                time: event.timestamp,
            },
        ));
        Self {
            id,
            config,
            inputs,
            current_event: event,
            pair_origin: None,
        }
    }

    /// Session identity.
    #[must_use]
    pub fn id(&self) -> ContactId {
        self.id
    }

    /// Configuration this contact measures with.
    #[must_use]
    pub fn config(&self) -> &ContactConfig {
        &self.config
    }

    /// `true` while at least one pointer is down.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.inputs.iter().any(|input| input.is_active)
    }

    /// Number of pointers currently down.
    #[must_use]
    pub fn active_pointer_count(&self) -> usize {
        self.inputs.iter().filter(|input| input.is_active).count()
    }

    /// The most recent event fed to this contact.
    #[must_use]
    pub fn current_event(&self) -> &PointerEvent {
        &self.current_event
    }

    /// Add another pointer to this contact.
    ///
    /// A down event for a pointer that is already down is ignored. The first
    /// two active pointers form the pair measured by [`MultiPointerSnapshot`];
    /// a pointer that goes down again starts its pair over.
    pub fn add_pointer(&mut self, event: PointerEvent) {
        if self.input(event.pointer_id).is_some_and(|input| input.is_active) {
            return;
        }
        self.current_event = event;
        let sample = Sample {
            position: event.position,
            time: event.timestamp,
        };
        if let Some(input) = self.input_mut(event.pointer_id) {
            *input = PointerInput::new(event.pointer_id, sample);
        } else {
            self.inputs.push(PointerInput::new(event.pointer_id, sample));
        }
        if self
            .pair_origin
            .is_some_and(|origin| origin.ids.contains(&event.pointer_id))
        {
            self.pair_origin = None;
        }
        self.refresh_pair(event.timestamp);
    }

    /// Apply a move event. Returns `false` if the pointer is not part of this contact.
    pub fn on_pointer_move(&mut self, event: PointerEvent) -> bool {
        let timespan = self.config.vector_timespan;
        let Some(input) = self.input_mut(event.pointer_id) else {
            return false;
        };
        if !input.is_active {
            return false;
        }
        input.update(event.position, event.timestamp, timespan);
        self.current_event = event;
        true
    }

    /// Apply a pointer-up event and record the pointer's final speed.
    ///
    /// Returns `false` if the pointer is not part of this contact.
    pub fn on_pointer_up(&mut self, event: PointerEvent) -> bool {
        let timespan = self.config.vector_timespan;
        let granularity = self.config.granularity;
        let Some(input) = self.input_mut(event.pointer_id) else {
            return false;
        };
        if !input.is_active {
            return false;
        }
        input.update(event.position, event.timestamp, timespan);
        input.release(granularity);
        self.current_event = event;
        self.refresh_pair(event.timestamp);
        true
    }

    /// Cancel the whole contact: every pointer becomes inactive without a final speed.
    pub fn on_pointer_cancel(&mut self, event: PointerEvent) {
        let timespan = self.config.vector_timespan;
        if let Some(input) = self.input_mut(event.pointer_id) {
            if input.is_active {
                input.update(event.position, event.timestamp, timespan);
            }
        }
        for input in &mut self.inputs {
            input.is_active = false;
        }
        self.current_event = event;
    }

    /// Measure the contact as of the most recent event.
    #[must_use]
    pub fn snapshot(&self) -> ContactSnapshot {
        let granularity = self.config.granularity;
        ContactSnapshot {
            id: self.id,
            event: self.current_event,
            active_pointers: self.active_pointer_count(),
            primary: self.inputs[0].snapshot(granularity),
            multi: self.multi_snapshot(),
            granularity,
        }
    }

    /// Re-pair on the first two active pointers if they are not the current pair.
    ///
    /// With fewer than two pointers down the last pair is kept, so the tick on
    /// which a pair member lifts still measures that pair.
    fn refresh_pair(&mut self, time: f64) {
        let mut active = self.inputs.iter().filter(|input| input.is_active);
        let (Some(first), Some(second)) = (active.next(), active.next()) else {
            return;
        };
        let ids = [first.id, second.id];
        if self.pair_origin.is_some_and(|origin| origin.ids == ids) {
            return;
        }
        log::trace!("contact {:?}: pairing pointers {ids:?}", self.id);
        self.pair_origin = Some(PairOrigin {
            ids,
            first: first.current().position,
            second: second.current().position,
            time,
        });
    }

    fn multi_snapshot(&self) -> Option<MultiPointerSnapshot> {
        let origin = self.pair_origin?;
        let (first, second) = (self.input(origin.ids[0])?, self.input(origin.ids[1])?);
        let granularity = self.config.granularity;
        let (first_now, second_now) = (first.current(), second.current());
        let now = if first_now.time > second_now.time {
            first_now.time
        } else {
            second_now.time
        };

        let global = pair_parameters(
            [origin.first, origin.second],
            [first_now.position, second_now.position],
            now - origin.time,
            granularity,
        );

        let (first_start, second_start) = (
            origin.window_start(first, origin.first),
            origin.window_start(second, origin.second),
        );
        let window_start = if first_start.time < second_start.time {
            first_start.time
        } else {
            second_start.time
        };
        let live = pair_parameters(
            [first_start.position, second_start.position],
            [first_now.position, second_now.position],
            now - window_start,
            granularity,
        );

        Some(MultiPointerSnapshot { global, live })
    }

    fn input(&self, id: PointerId) -> Option<&PointerInput> {
        self.inputs.iter().find(|input| input.id == id)
    }

    fn input_mut(&mut self, id: PointerId) -> Option<&mut PointerInput> {
        self.inputs.iter_mut().find(|input| input.id == id)
    }
}

fn per_second(distance: f64, millis: f64) -> f64 {
    if millis > 0.0 {
        distance / millis * 1000.0
    } else {
        0.0
    }
}

fn pair_parameters(
    start: [Point; 2],
    end: [Point; 2],
    timespan: f64,
    granularity: DirectionGranularity,
) -> PairParameters {
    let center_movement_vector = Vector::new(
        start[0].midpoint(start[1]),
        end[0].midpoint(end[1]),
        granularity,
    );
    let start_span = start[1] - start[0];
    let end_span = end[1] - end[0];
    let start_distance = start_span.hypot();
    let end_distance = end_span.hypot();

    PairParameters {
        timespan,
        center_movement: center_movement_vector.length(),
        center_movement_vector,
        distance_change: end_distance - start_distance,
        relative_distance_change: if start_distance > 0.0 {
            end_distance / start_distance
        } else {
            1.0
        },
        rotation_angle: rotation_degrees(start_span, end_span),
        vector_angle: angle_between(end[0] - start[0], end[1] - start[1]),
    }
}

/// Signed rotation from `from` to `to`, normalised to `(-180, 180]`.
fn rotation_degrees(from: Vec2, to: Vec2) -> f64 {
    if from == Vec2::ZERO || to == Vec2::ZERO {
        return 0.0;
    }
    let mut degrees = (to.atan2() - from.atan2()).to_degrees();
    if degrees > 180.0 {
        degrees -= 360.0;
    } else if degrees <= -180.0 {
        degrees += 360.0;
    }
    degrees
}

fn angle_between(a: Vec2, b: Vec2) -> Option<f64> {
    if a == Vec2::ZERO || b == Vec2::ZERO {
        return None;
    }
    Some(Vec2::new(a.dot(b), a.cross(b)).atan2().abs().to_degrees())
}

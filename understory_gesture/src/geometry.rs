// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The geometry contract consumed by recognizers.
//!
//! A [`ContactSnapshot`] is an immutable view of one session at one update
//! tick. Recognizers only ever read snapshots; producing them is the job of
//! [`Contact`](crate::Contact) or of any other aggregator that fills in the
//! same fields.
//!
//! Two time horizons are carried side by side:
//! - *global* values are measured from the moment a pointer went down (or, for
//!   pointer pairs, from the moment the pair formed);
//! - *live* values are measured over the short window that ends at the
//!   current tick.
//!
//! Timestamps are milliseconds, speeds are units per second.

use kurbo::{Point, Vec2};

use crate::direction::{Direction, DirectionGranularity};

/// Opaque identity of one continuous multi-pointer interaction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactId(pub u64);

/// Identity of a single pointer (finger, pen or mouse button).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u64);

/// What happened to a pointer at this tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// The pointer touched the surface.
    Down,
    /// The pointer moved while tracked.
    Move,
    /// The pointer was lifted.
    Up,
    /// The platform aborted the interaction.
    Cancel,
}

/// A raw pointer event: one update tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// Which pointer this event belongs to.
    pub pointer_id: PointerId,
    /// What happened.
    pub kind: PointerEventKind,
    /// Position on the observed surface.
    pub position: Point,
    /// Milliseconds on a monotonic clock.
    pub timestamp: f64,
}

impl PointerEvent {
    /// Create an event.
    #[must_use]
    pub fn new(pointer_id: u64, kind: PointerEventKind, position: Point, timestamp: f64) -> Self {
        Self {
            pointer_id: PointerId(pointer_id),
            kind,
            position,
            timestamp,
        }
    }

    /// A [`PointerEventKind::Down`] event.
    #[must_use]
    pub fn down(pointer_id: u64, position: Point, timestamp: f64) -> Self {
        Self::new(pointer_id, PointerEventKind::Down, position, timestamp)
    }

    /// A [`PointerEventKind::Move`] event.
    #[must_use]
    pub fn moved(pointer_id: u64, position: Point, timestamp: f64) -> Self {
        Self::new(pointer_id, PointerEventKind::Move, position, timestamp)
    }

    /// A [`PointerEventKind::Up`] event.
    #[must_use]
    pub fn up(pointer_id: u64, position: Point, timestamp: f64) -> Self {
        Self::new(pointer_id, PointerEventKind::Up, position, timestamp)
    }

    /// A [`PointerEventKind::Cancel`] event.
    #[must_use]
    pub fn cancel(pointer_id: u64, position: Point, timestamp: f64) -> Self {
        Self::new(pointer_id, PointerEventKind::Cancel, position, timestamp)
    }
}

/// A displacement between two points, with its classified direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vector {
    /// Where the displacement starts.
    pub start: Point,
    /// Where the displacement ends.
    pub end: Point,
    /// Classified direction; `None` for a zero-length vector.
    pub direction: Option<Direction>,
}

impl Vector {
    /// Create a vector from `start` to `end`.
    #[must_use]
    pub fn new(start: Point, end: Point, granularity: DirectionGranularity) -> Self {
        Self {
            start,
            end,
            direction: Direction::from_delta(end - start, granularity),
        }
    }

    /// A zero-length vector at `at`.
    #[must_use]
    pub fn stationary(at: Point) -> Self {
        Self {
            start: at,
            end: at,
            direction: None,
        }
    }

    /// `end - start`.
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.end - self.start
    }

    /// Euclidean length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.delta().hypot()
    }
}

/// Per-pointer values measured since the pointer went down.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerGlobal {
    /// Milliseconds since pointer-down.
    pub duration: f64,
    /// Global length divided by duration.
    pub average_speed: f64,
    /// Live speed at release; `None` while the pointer is down or if it was cancelled.
    pub final_speed: Option<f64>,
    /// Whether any move tick changed the pointer position.
    pub has_moved: bool,
    /// Pointer-down position to current position.
    pub vector: Vector,
}

/// Per-pointer values measured over the live window.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerLive {
    /// Milliseconds covered by [`vector`](Self::vector).
    pub timespan: f64,
    /// Live length divided by timespan.
    pub speed: f64,
    /// Window start to current position.
    pub vector: Vector,
}

/// One pointer's state at a tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerSnapshot {
    /// The pointer.
    pub id: PointerId,
    /// `false` once the pointer was lifted or cancelled.
    pub is_active: bool,
    /// Current position.
    pub position: Point,
    /// Measured since pointer-down.
    pub global: PointerGlobal,
    /// Measured over the live window.
    pub live: PointerLive,
}

/// Aggregated values for a pair of pointers over one time horizon.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PairParameters {
    /// Milliseconds covered by these parameters.
    pub timespan: f64,
    /// Movement of the midpoint between the two pointers.
    pub center_movement_vector: Vector,
    /// Length of [`center_movement_vector`](Self::center_movement_vector).
    pub center_movement: f64,
    /// Signed change of the inter-pointer distance; negative when converging.
    pub distance_change: f64,
    /// Current distance divided by starting distance.
    pub relative_distance_change: f64,
    /// Signed degrees in `(-180, 180]`; positive is clockwise.
    pub rotation_angle: f64,
    /// Degrees in `[0, 180]` between the two pointers' own vectors.
    ///
    /// `None` when either pointer did not move.
    pub vector_angle: Option<f64>,
}

/// Aggregated values for the first two pointers of a contact.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MultiPointerSnapshot {
    /// Measured since the pair formed.
    pub global: PairParameters,
    /// Measured over the live window.
    pub live: PairParameters,
}

/// Everything a recognizer sees at one tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContactSnapshot {
    /// Session identity.
    pub id: ContactId,
    /// The raw event that produced this tick.
    pub event: PointerEvent,
    /// Number of pointers currently down.
    pub active_pointers: usize,
    /// The first pointer of the session.
    pub primary: PointerSnapshot,
    /// Present once two or more pointers joined the session.
    pub multi: Option<MultiPointerSnapshot>,
    /// Granularity every [`Vector`] in this snapshot was classified with.
    pub granularity: DirectionGranularity,
}

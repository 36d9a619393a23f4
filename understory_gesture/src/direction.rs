// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compass-style directions for pointer movement.
//!
//! Surfaces use a y-down coordinate system, so a vector with negative `y`
//! points [`Direction::Up`].

use bitflags::bitflags;
use kurbo::Vec2;

/// `tan(22.5°)`: the boundary between an axis-aligned and a diagonal sector.
const DIAGONAL_SLOPE: f64 = 0.414_213_562_373_095_1;

/// A categorical direction of movement.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards negative `x`.
    Left,
    /// Towards positive `x`.
    Right,
    /// Towards negative `y`.
    Up,
    /// Towards positive `y`.
    Down,
    /// Negative `x`, negative `y`.
    UpLeft,
    /// Positive `x`, negative `y`.
    UpRight,
    /// Negative `x`, positive `y`.
    DownLeft,
    /// Positive `x`, positive `y`.
    DownRight,
}

impl Direction {
    /// Lowercase suffix appended to event names, e.g. `pan` + `left`.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
            Self::UpLeft => "upleft",
            Self::UpRight => "upright",
            Self::DownLeft => "downleft",
            Self::DownRight => "downright",
        }
    }

    /// Classify `delta` at the given granularity.
    ///
    /// Returns `None` for a zero-length vector.
    #[must_use]
    pub fn from_delta(delta: Vec2, granularity: DirectionGranularity) -> Option<Self> {
        if delta.x == 0.0 && delta.y == 0.0 {
            return None;
        }
        let ax = delta.x.abs();
        let ay = delta.y.abs();
        let horizontal = if delta.x < 0.0 { Self::Left } else { Self::Right };
        let vertical = if delta.y < 0.0 { Self::Up } else { Self::Down };

        match granularity {
            DirectionGranularity::Four => Some(if ax >= ay { horizontal } else { vertical }),
            DirectionGranularity::Eight => {
                if ay <= ax * DIAGONAL_SLOPE {
                    Some(horizontal)
                } else if ax <= ay * DIAGONAL_SLOPE {
                    Some(vertical)
                } else {
                    Some(match (vertical, horizontal) {
                        (Self::Up, Self::Left) => Self::UpLeft,
                        (Self::Up, _) => Self::UpRight,
                        (_, Self::Left) => Self::DownLeft,
                        _ => Self::DownRight,
                    })
                }
            }
        }
    }
}

/// How finely movement is classified.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DirectionGranularity {
    /// Left, right, up and down; ties go to the horizontal axis.
    #[default]
    Four,
    /// The four axes plus the four diagonals, each covering 45°.
    Eight,
}

bitflags! {
    /// An allow-list of [`Direction`]s.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct Directions: u8 {
        /// [`Direction::Left`].
        const LEFT = 1 << 0;
        /// [`Direction::Right`].
        const RIGHT = 1 << 1;
        /// [`Direction::Up`].
        const UP = 1 << 2;
        /// [`Direction::Down`].
        const DOWN = 1 << 3;
        /// [`Direction::UpLeft`].
        const UP_LEFT = 1 << 4;
        /// [`Direction::UpRight`].
        const UP_RIGHT = 1 << 5;
        /// [`Direction::DownLeft`].
        const DOWN_LEFT = 1 << 6;
        /// [`Direction::DownRight`].
        const DOWN_RIGHT = 1 << 7;

        /// Left and right.
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
        /// Up and down.
        const VERTICAL = Self::UP.bits() | Self::DOWN.bits();
        /// Every direction.
        const ALL = 0xff;
    }
}

impl Directions {
    /// Whether `direction` is in this set.
    #[must_use]
    pub fn allows(self, direction: Direction) -> bool {
        self.contains(direction.into())
    }

    /// Iterate the single directions in this set, in declaration order.
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        [
            Direction::Left,
            Direction::Right,
            Direction::Up,
            Direction::Down,
            Direction::UpLeft,
            Direction::UpRight,
            Direction::DownLeft,
            Direction::DownRight,
        ]
        .into_iter()
        .filter(move |d| self.allows(*d))
    }
}

impl From<Direction> for Directions {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Left => Self::LEFT,
            Direction::Right => Self::RIGHT,
            Direction::Up => Self::UP,
            Direction::Down => Self::DOWN,
            Direction::UpLeft => Self::UP_LEFT,
            Direction::UpRight => Self::UP_RIGHT,
            Direction::DownLeft => Self::DOWN_LEFT,
            Direction::DownRight => Self::DOWN_RIGHT,
        }
    }
}

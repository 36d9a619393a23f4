// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative acceptance ranges and boolean preconditions.
//!
//! A recognizer describes *what* it accepts as data: one [`Interval`] per
//! [`Parameter`] (collected in a [`ParameterSet`]) and a [`Preconditions`]
//! record. Each tick, the recognizer derives [`Measurements`] from the
//! snapshot and checks them against the set that matches its state.
//!
//! ```
//! use understory_gesture::{Interval, Measurements, Parameter, ParameterSet};
//!
//! let set = ParameterSet::new()
//!     .with(Parameter::PointerCount, Interval::exactly(1.0))
//!     .with(Parameter::Distance, Interval::at_least(10.0));
//!
//! let mut measured = Measurements::new();
//! measured.set(Parameter::PointerCount, 1.0);
//! measured.set(Parameter::Distance, 4.0);
//! assert_eq!(set.first_violation(&measured), Some(Parameter::Distance));
//!
//! measured.set(Parameter::Distance, 12.0);
//! assert_eq!(set.first_violation(&measured), None);
//! ```

/// Number of [`Parameter`] variants.
const PARAMETER_COUNT: usize = 10;

/// A numeric quantity a recognizer can constrain.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Parameter {
    /// Pointers currently down.
    PointerCount,
    /// Milliseconds since the primary pointer went down.
    Duration,
    /// Live speed of the primary pointer.
    CurrentSpeed,
    /// Average speed of the primary pointer since pointer-down.
    AverageSpeed,
    /// Speed of the primary pointer at release.
    FinalSpeed,
    /// Length of the primary pointer's displacement.
    Distance,
    /// How far the midpoint of a pointer pair moved.
    CenterMovement,
    /// Absolute change of the distance between a pointer pair.
    DistanceChange,
    /// Absolute rotation of a pointer pair, in degrees.
    RotationAngle,
    /// Angle between the two pointers' own displacement vectors, in degrees.
    VectorAngle,
}

impl Parameter {
    /// Every parameter, in evaluation order.
    pub const ALL: [Self; PARAMETER_COUNT] = [
        Self::PointerCount,
        Self::Duration,
        Self::CurrentSpeed,
        Self::AverageSpeed,
        Self::FinalSpeed,
        Self::Distance,
        Self::CenterMovement,
        Self::DistanceChange,
        Self::RotationAngle,
        Self::VectorAngle,
    ];

    /// Stable human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PointerCount => "pointerCount",
            Self::Duration => "duration",
            Self::CurrentSpeed => "currentSpeed",
            Self::AverageSpeed => "averageSpeed",
            Self::FinalSpeed => "finalSpeed",
            Self::Distance => "distance",
            Self::CenterMovement => "centerMovement",
            Self::DistanceChange => "distanceChange",
            Self::RotationAngle => "rotationAngle",
            Self::VectorAngle => "vectorAngle",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// A closed range with independently optional bounds.
///
/// A missing bound does not constrain; a missing value satisfies every bound.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Interval {
    /// Inclusive lower bound.
    pub min: Option<f64>,
    /// Inclusive upper bound.
    pub max: Option<f64>,
}

impl Interval {
    /// Accepts everything.
    pub const UNBOUNDED: Self = Self {
        min: None,
        max: None,
    };

    /// An interval with explicit optional bounds.
    #[must_use]
    pub const fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// `[min, ∞)`.
    #[must_use]
    pub const fn at_least(min: f64) -> Self {
        Self::new(Some(min), None)
    }

    /// `(-∞, max]`.
    #[must_use]
    pub const fn at_most(max: f64) -> Self {
        Self::new(None, Some(max))
    }

    /// `[min, max]`.
    #[must_use]
    pub const fn between(min: f64, max: f64) -> Self {
        Self::new(Some(min), Some(max))
    }

    /// `[value, value]`.
    #[must_use]
    pub const fn exactly(value: f64) -> Self {
        Self::between(value, value)
    }

    /// `true` if both bounds are present and `min > max`.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        matches!((self.min, self.max), (Some(min), Some(max)) if min > max)
    }

    /// Whether `value` lies within the bounds.
    ///
    /// `None` and NaN are incomparable and therefore accepted.
    #[must_use]
    pub fn contains(&self, value: Option<f64>) -> bool {
        let Some(value) = value else {
            return true;
        };
        if self.min.is_some_and(|min| value < min) {
            return false;
        }
        !self.max.is_some_and(|max| value > max)
    }
}

/// One [`Interval`] per [`Parameter`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ParameterSet {
    intervals: [Interval; PARAMETER_COUNT],
}

impl ParameterSet {
    /// A set where every parameter is unbounded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The interval for `parameter`.
    #[must_use]
    pub fn get(&self, parameter: Parameter) -> Interval {
        self.intervals[parameter.index()]
    }

    /// Replace the interval for `parameter`.
    pub fn set(&mut self, parameter: Parameter, interval: Interval) {
        self.intervals[parameter.index()] = interval;
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, parameter: Parameter, interval: Interval) -> Self {
        self.set(parameter, interval);
        self
    }

    /// Iterate `(parameter, interval)` pairs in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = (Parameter, Interval)> + '_ {
        Parameter::ALL.into_iter().map(|p| (p, self.get(p)))
    }

    /// The first parameter whose measurement falls outside its interval.
    #[must_use]
    pub fn first_violation(&self, measurements: &Measurements) -> Option<Parameter> {
        self.iter()
            .find(|(p, interval)| !interval.contains(measurements.get(*p)))
            .map(|(p, _)| p)
    }

    /// The first parameter whose interval has `min > max`.
    #[must_use]
    pub fn first_inverted(&self) -> Option<Parameter> {
        self.iter()
            .find(|(_, interval)| interval.is_inverted())
            .map(|(p, _)| p)
    }
}

/// Values derived from one snapshot; absent entries are unconstrained.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Measurements {
    values: [Option<f64>; PARAMETER_COUNT],
}

impl Measurements {
    /// No values measured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The measured value for `parameter`, if any.
    #[must_use]
    pub fn get(&self, parameter: Parameter) -> Option<f64> {
        self.values[parameter.index()]
    }

    /// Record a value.
    pub fn set(&mut self, parameter: Parameter, value: f64) {
        self.values[parameter.index()] = Some(value);
    }

    /// Record an optional value; `None` clears the entry.
    pub fn set_opt(&mut self, parameter: Parameter, value: Option<f64>) {
        self.values[parameter.index()] = value;
    }
}

/// Tri-state requirement on a boolean fact.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Requirement {
    /// Any value passes.
    #[default]
    DontCare,
    /// The fact must be `true`.
    True,
    /// The fact must be `false`.
    False,
}

impl Requirement {
    /// Whether `value` meets this requirement.
    #[must_use]
    pub fn accepts(self, value: bool) -> bool {
        match self {
            Self::DontCare => true,
            Self::True => value,
            Self::False => !value,
        }
    }
}

/// Boolean facts a snapshot provides about its primary pointer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Facts {
    /// The primary pointer moved at some point.
    pub has_moved: bool,
    /// The primary pointer is still down.
    pub pointer_active: bool,
}

/// Named boolean preconditions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Preconditions {
    /// Requirement on [`Facts::has_moved`].
    pub requires_pointer_move: Requirement,
    /// Requirement on [`Facts::pointer_active`].
    pub requires_active_pointer: Requirement,
}

impl Preconditions {
    /// The name of the first unmet precondition.
    #[must_use]
    pub fn first_violation(&self, facts: Facts) -> Option<&'static str> {
        if !self.requires_pointer_move.accepts(facts.has_moved) {
            return Some("requiresPointerMove");
        }
        if !self.requires_active_pointer.accepts(facts.pointer_active) {
            return Some("requiresActivePointer");
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_bounds_and_values_pass() {
        assert!(Interval::UNBOUNDED.contains(Some(-1.0e9)));
        assert!(Interval::between(1.0, 2.0).contains(None));
        assert!(Interval::at_least(10.0).contains(Some(f64::NAN)));
    }

    #[test]
    fn bounds_are_inclusive() {
        let interval = Interval::between(0.0, 200.0);
        assert!(interval.contains(Some(0.0)));
        assert!(interval.contains(Some(200.0)));
        assert!(!interval.contains(Some(200.5)));
        assert!(!interval.contains(Some(-0.5)));
        assert!(Interval::exactly(1.0).contains(Some(1.0)));
        assert!(!Interval::exactly(1.0).contains(Some(2.0)));
    }

    #[test]
    fn inverted_intervals_are_detected() {
        assert!(Interval::between(5.0, 1.0).is_inverted());
        assert!(!Interval::at_least(5.0).is_inverted());
        let set = ParameterSet::new().with(Parameter::Duration, Interval::between(9.0, 3.0));
        assert_eq!(set.first_inverted(), Some(Parameter::Duration));
    }

    #[test]
    fn violations_follow_evaluation_order() {
        let set = ParameterSet::new()
            .with(Parameter::PointerCount, Interval::exactly(2.0))
            .with(Parameter::VectorAngle, Interval::at_least(10.0));
        let mut m = Measurements::new();
        m.set(Parameter::PointerCount, 1.0);
        m.set(Parameter::VectorAngle, 1.0);
        assert_eq!(set.first_violation(&m), Some(Parameter::PointerCount));
        m.set(Parameter::PointerCount, 2.0);
        assert_eq!(set.first_violation(&m), Some(Parameter::VectorAngle));
        m.set_opt(Parameter::VectorAngle, None);
        assert_eq!(set.first_violation(&m), None);
    }

    #[test]
    fn requirements_are_tri_state() {
        assert!(Requirement::DontCare.accepts(false));
        assert!(Requirement::True.accepts(true));
        assert!(!Requirement::True.accepts(false));
        assert!(Requirement::False.accepts(false));

        let pre = Preconditions {
            requires_pointer_move: Requirement::True,
            requires_active_pointer: Requirement::False,
        };
        let facts = Facts {
            has_moved: true,
            pointer_active: true,
        };
        assert_eq!(pre.first_violation(facts), Some("requiresActivePointer"));
    }
}

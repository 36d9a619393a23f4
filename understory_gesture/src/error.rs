// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors.

use core::fmt;

use crate::interval::Parameter;
use crate::registry::RecognizerId;

/// A recognizer or registry was configured in a way that can never work.
///
/// Reported at construction time, never during recognition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A direction allow-list was declared but is empty.
    EmptyDirections {
        /// Base name of the offending recognizer.
        gesture: &'static str,
    },
    /// A recognizer was asked to block itself.
    SelfBlock {
        /// Base name of the offending recognizer.
        gesture: &'static str,
    },
    /// An id does not belong to this registry.
    UnknownRecognizer(RecognizerId),
    /// An acceptance interval has `min > max`.
    InvertedInterval {
        /// Base name of the offending recognizer.
        gesture: &'static str,
        /// The parameter with the inverted interval.
        parameter: Parameter,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDirections { gesture } => {
                write!(f, "{gesture}: supported directions must not be empty")
            }
            Self::SelfBlock { gesture } => write!(f, "{gesture}: a recognizer cannot block itself"),
            Self::UnknownRecognizer(id) => write!(f, "no recognizer registered as {id:?}"),
            Self::InvertedInterval { gesture, parameter } => write!(
                f,
                "{gesture}: interval for {} has min greater than max",
                parameter.name()
            ),
        }
    }
}

impl core::error::Error for ConfigError {}

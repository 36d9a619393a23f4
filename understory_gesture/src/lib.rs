// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_gesture --heading-base-level=0

//! Understory Gesture: pointer gesture recognition for UI.
//!
//! This crate turns a raw stream of pointer events (down, move, up, cancel)
//! into named gesture events: `tap`, `press`, `pan` and `swipe` for one
//! pointer, `pinch`, `rotate` and `twofingerpan` for two.
//!
//! ## Pipeline
//!
//! Each raw event is one update tick:
//!
//! 1. A [`Contact`] (one continuous interaction) folds the event into per-pointer
//!    and pointer-pair measurements and produces a [`ContactSnapshot`].
//! 2. The [`Recognizers`] registry runs every recognizer on the snapshot, in
//!    order.
//! 3. Each recognizer checks the snapshot against declarative acceptance
//!    ranges ([`ParameterSet`]) and boolean [`Preconditions`], moves through
//!    its state machine and emits zero or more [`GestureEvent`]s.
//!
//! [`PointerListener`] wires these together and manages the session
//! lifecycle.
//!
//! Every measurement exists on two time horizons: *global* (since the pointer
//! went down, or since the gesture was recognized) and *live* (the short
//! window ending at the current tick). Timestamps are milliseconds, speeds
//! are units per second and angles are degrees, positive clockwise on a
//! y-down surface.
//!
//! ## Recognizers
//!
//! | Recognizer | Events | Recognized when |
//! |---|---|---|
//! | [`Tap`] | `tap` | released within 200 ms, within 30 units |
//! | [`Press`] | `press` | held at least 600 ms within 10 units of pointer-down |
//! | [`Pan`] | `panstart`, `pan`, `pan<dir>`, `panend`, `swipe`, `swipe<dir>` | one pointer moved at least 10 units |
//! | [`Pinch`] | `pinchstart`, `pinch`, `pinchend` | pointer spread changes, midpoint stays |
//! | [`Rotate`] | `rotatestart`, `rotate`, `rotateend` | pointer pair turns |
//! | [`TwoFingerPan`] | `twofingerpanstart`, ... | both pointers move in parallel |
//!
//! A recognizer can block others while it is active; see [`Recognizers::block`].
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use understory_gesture::{ListenerOptions, PointerListener};
//!
//! let mut listener = PointerListener::new(ListenerOptions::default()).unwrap();
//!
//! listener.pointer_down(1, Point::new(0.0, 0.0), 0.0);
//! let events = listener.pointer_move(1, Point::new(40.0, 0.0), 150.0);
//! let names: Vec<String> = events.iter().map(|e| e.name()).collect();
//! assert_eq!(names, ["panstart"]);
//!
//! let events = listener.pointer_move(1, Point::new(80.0, 0.0), 300.0);
//! assert!(events.iter().any(|e| e.is("panright")));
//!
//! let events = listener.pointer_up(1, Point::new(80.0, 0.0), 500.0);
//! assert!(events.iter().any(|e| e.is("panend")));
//! ```
//!
//! ## Custom recognizers
//!
//! Implement [`Gesture`] on a type that owns a [`RecognizerCore`]. The
//! provided methods run the shared state machine; [`single`] and
//! [`two_pointer`] supply the standard measurements and payloads.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. Enable `libm` instead of `std`
//! for the floating point functions Kurbo needs.

#![no_std]

extern crate alloc;

mod contact;
mod direction;
mod error;
mod event;
mod geometry;
mod interval;
mod listener;
mod pan;
mod press;
pub mod recognizer;
mod registry;
pub mod single;
mod tap;
pub mod two_pointer;

pub use contact::{Contact, ContactConfig};
pub use direction::{Direction, DirectionGranularity, Directions};
pub use error::ConfigError;
pub use event::{Emitter, EventPhase, GestureEvent, Motion, Payload};
pub use geometry::{
    ContactId, ContactSnapshot, MultiPointerSnapshot, PairParameters, PointerEvent,
    PointerEventKind, PointerGlobal, PointerId, PointerLive, PointerSnapshot, Vector,
};
pub use interval::{
    Facts, Interval, Measurements, Parameter, ParameterSet, Preconditions, Requirement,
};
pub use listener::{
    DEFAULT_GESTURES, GestureKind, ListenerOptions, PointerCallback, PointerCallbacks,
    PointerListener,
};
pub use pan::{DEFAULT_SWIPE_FINAL_SPEED, Pan};
pub use press::{Press, PressLatch};
pub use recognizer::{
    BlockMessage, Gesture, GestureOptions, RecognitionState, RecognizerCore, Transition,
};
pub use registry::{RecognizerId, Recognizers};
pub use tap::Tap;
pub use two_pointer::{Pinch, Rotate, TwoFingerPan};

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recognizer registry: ordered fan-out and blocking.
//!
//! [`Recognizers`] owns every recognizer attached to one observed surface and
//! runs them, in insertion order, on each tick. Blocking is a directed edge
//! list: `block(a, b)` means "while `a` is active, `b` may not start".
//!
//! - When a recognizer reports [`Transition::Started`], every recognizer it
//!   blocks receives [`BlockMessage::Block`]. Recognizers that are already
//!   active ignore it.
//! - When it reports [`Transition::Ended`], each of its blockees receives
//!   [`BlockMessage::Unblock`], unless another blocker of that blockee is
//!   still active.
//!
//! Block messages are delivered immediately, so a blockee later in the list
//! is already blocked when it runs in the same tick. Unblock messages are
//! delivered after every recognizer ran, so a blockee cannot fire on the very
//! tick its blocker ended on.
//!
//! ## Minimal example
//!
//! ```
//! use understory_gesture::{GestureOptions, Pan, Pinch, RecognitionState, Recognizers};
//!
//! let mut recognizers = Recognizers::new();
//! let pinch = recognizers.add(Pinch::new(GestureOptions::default()).unwrap());
//! let pan = recognizers.add(Pan::new(GestureOptions::default()).unwrap());
//! recognizers.block(pinch, pan).unwrap();
//!
//! assert_eq!(recognizers.state(pan), Some(RecognitionState::Possible));
//! assert!(recognizers.block(pan, pan).is_err());
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::error::ConfigError;
use crate::event::{Emitter, GestureEvent};
use crate::geometry::ContactSnapshot;
use crate::recognizer::{BlockMessage, Gesture, RecognitionState, Transition};

/// Handle to a recognizer inside a [`Recognizers`] registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecognizerId(usize);

impl RecognizerId {
    #[cfg(test)]
    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Position in the registry's evaluation order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// An ordered set of recognizers plus the block edges between them.
#[derive(Debug, Default)]
pub struct Recognizers {
    gestures: Vec<Box<dyn Gesture>>,
    edges: Vec<(RecognizerId, RecognizerId)>,
}

impl Recognizers {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a recognizer; it runs after every recognizer added before it.
    pub fn add<G: Gesture + 'static>(&mut self, gesture: G) -> RecognizerId {
        self.add_boxed(Box::new(gesture))
    }

    /// Append an already boxed recognizer.
    pub fn add_boxed(&mut self, gesture: Box<dyn Gesture>) -> RecognizerId {
        let id = RecognizerId(self.gestures.len());
        self.gestures.push(gesture);
        id
    }

    /// Number of recognizers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.gestures.len()
    }

    /// `true` if no recognizer was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gestures.is_empty()
    }

    /// Look up a recognizer.
    #[must_use]
    pub fn get(&self, id: RecognizerId) -> Option<&dyn Gesture> {
        match self.gestures.get(id.0) {
            Some(gesture) => Some(gesture.as_ref()),
            None => None,
        }
    }

    /// Look up a recognizer mutably.
    pub fn get_mut(&mut self, id: RecognizerId) -> Option<&mut dyn Gesture> {
        match self.gestures.get_mut(id.0) {
            Some(gesture) => Some(gesture.as_mut()),
            None => None,
        }
    }

    /// First recognizer whose base event name is `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<RecognizerId> {
        self.gestures
            .iter()
            .position(|gesture| gesture.core().name() == name)
            .map(RecognizerId)
    }

    /// Current state of a recognizer.
    #[must_use]
    pub fn state(&self, id: RecognizerId) -> Option<RecognitionState> {
        self.get(id).map(|gesture| gesture.core().state())
    }

    /// Iterate recognizers in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = (RecognizerId, &dyn Gesture)> + '_ {
        self.gestures
            .iter()
            .enumerate()
            .map(|(index, gesture)| (RecognizerId(index), gesture.as_ref()))
    }

    /// Recognizers blocked by `blocker`.
    pub fn blocked_by(&self, blocker: RecognizerId) -> impl Iterator<Item = RecognizerId> + '_ {
        self.edges
            .iter()
            .filter(move |(from, _)| *from == blocker)
            .map(|(_, to)| *to)
    }

    /// While `blocker` is active, `blocked` may not start.
    ///
    /// If `blocker` is active already, `blocked` is blocked right away.
    /// Adding an existing edge again has no effect.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::UnknownRecognizer`] if either handle is not in this registry.
    /// - [`ConfigError::SelfBlock`] if both handles are the same.
    pub fn block(&mut self, blocker: RecognizerId, blocked: RecognizerId) -> Result<(), ConfigError> {
        let blocker_name = self.name(blocker)?;
        self.name(blocked)?;
        if blocker == blocked {
            return Err(ConfigError::SelfBlock {
                gesture: blocker_name,
            });
        }
        if !self.edges.contains(&(blocker, blocked)) {
            self.edges.push((blocker, blocked));
        }
        if self.gestures[blocker.0].core().is_active() {
            self.deliver(blocker, blocked, BlockMessage::Block);
        }
        Ok(())
    }

    /// Remove a block edge. Returns `true` if it existed.
    ///
    /// If `blocked` is currently blocked and no other active recognizer
    /// blocks it, it becomes eligible again.
    pub fn unblock(&mut self, blocker: RecognizerId, blocked: RecognizerId) -> bool {
        let before = self.edges.len();
        self.edges.retain(|edge| *edge != (blocker, blocked));
        if self.edges.len() == before {
            return false;
        }
        if !self.held_by_other(blocked, blocker) {
            self.deliver(blocker, blocked, BlockMessage::Unblock);
        }
        true
    }

    /// Run every recognizer on one tick and collect the events they produce.
    pub fn recognize(&mut self, snapshot: &ContactSnapshot) -> Vec<GestureEvent> {
        let mut events = Vec::new();
        let mut ended: SmallVec<[RecognizerId; 2]> = SmallVec::new();
        for index in 0..self.gestures.len() {
            let id = RecognizerId(index);
            let mut out = Emitter::new(id, snapshot, &mut events);
            match self.gestures[index].recognize(snapshot, &mut out) {
                Some(Transition::Started) => self.propagate(id, Transition::Started),
                Some(Transition::Ended) => ended.push(id),
                None => {}
            }
        }
        for id in ended {
            self.propagate(id, Transition::Ended);
        }
        events
    }

    fn propagate(&mut self, from: RecognizerId, transition: Transition) {
        let message = match transition {
            Transition::Started => BlockMessage::Block,
            Transition::Ended => BlockMessage::Unblock,
        };
        let targets: SmallVec<[RecognizerId; 4]> = self
            .blocked_by(from)
            .filter(|&target| message == BlockMessage::Block || !self.held_by_other(target, from))
            .collect();
        for target in targets {
            self.deliver(from, target, message);
        }
    }

    /// Whether an active recognizer other than `except` blocks `target`.
    fn held_by_other(&self, target: RecognizerId, except: RecognizerId) -> bool {
        self.edges.iter().any(|&(blocker, blocked)| {
            blocked == target
                && blocker != except
                && self.gestures[blocker.0].core().is_active()
        })
    }

    fn deliver(&mut self, from: RecognizerId, to: RecognizerId, message: BlockMessage) {
        let changed = self.gestures[to.0].core_mut().receive(message);
        if changed {
            let target = self.gestures[to.0].core().name();
            self.gestures[from.0]
                .core()
                .trace(format_args!("sent {message:?} to {target}"));
        }
    }

    fn name(&self, id: RecognizerId) -> Result<&'static str, ConfigError> {
        self.gestures
            .get(id.0)
            .map(|gesture| gesture.core().name())
            .ok_or(ConfigError::UnknownRecognizer(id))
    }
}

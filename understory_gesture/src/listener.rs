// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer listener: session lifecycle for one observed surface.
//!
//! [`PointerListener`] is the entry point most applications use. Feed it raw
//! pointer events; it keeps the current [`Contact`], takes a snapshot after
//! each event and runs the [`Recognizers`] on it.
//!
//! - A pointer-down with no live contact starts a new session; further
//!   pointer-downs join it. Pointer-down ticks do not run recognizers.
//! - Move, up and cancel ticks run every recognizer once.
//! - The session is discarded once its last pointer is lifted, and right away
//!   on cancel.
//!
//! Raw-event callbacks in [`PointerCallbacks`] run before recognition, for
//! every event, whether or not it belongs to the current session.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Point;

use crate::contact::{Contact, ContactConfig};
use crate::error::ConfigError;
use crate::event::GestureEvent;
use crate::geometry::{ContactId, PointerEvent, PointerEventKind};
use crate::pan::Pan;
use crate::press::Press;
use crate::recognizer::{Gesture, GestureOptions};
use crate::registry::Recognizers;
use crate::tap::Tap;
use crate::two_pointer::{Pinch, Rotate, TwoFingerPan};

/// The built-in recognizers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    /// [`Tap`].
    Tap,
    /// [`Press`].
    Press,
    /// [`Pan`], including swipe.
    Pan,
    /// [`Pinch`].
    Pinch,
    /// [`Rotate`].
    Rotate,
    /// [`TwoFingerPan`].
    TwoFingerPan,
}

impl GestureKind {
    /// Build the recognizer for this kind.
    ///
    /// # Errors
    ///
    /// Whatever the recognizer's constructor rejects in `options`.
    pub fn build(self, options: GestureOptions) -> Result<Box<dyn Gesture>, ConfigError> {
        Ok(match self {
            Self::Tap => Box::new(Tap::new(options)?),
            Self::Press => Box::new(Press::new(options)?),
            Self::Pan => Box::new(Pan::new(options)?),
            Self::Pinch => Box::new(Pinch::new(options)?),
            Self::Rotate => Box::new(Rotate::new(options)?),
            Self::TwoFingerPan => Box::new(TwoFingerPan::new(options)?),
        })
    }
}

/// Recognizers a listener runs unless told otherwise. Press is opt-in.
pub const DEFAULT_GESTURES: [GestureKind; 5] = [
    GestureKind::Tap,
    GestureKind::Pan,
    GestureKind::Pinch,
    GestureKind::Rotate,
    GestureKind::TwoFingerPan,
];

/// How a [`PointerListener`] is set up.
#[derive(Clone, Debug, PartialEq)]
pub struct ListenerOptions {
    /// Recognizers to build, in evaluation order.
    pub supported_gestures: Vec<GestureKind>,
    /// Options every built recognizer gets.
    pub gesture_options: GestureOptions,
    /// Measurement settings for each session.
    pub contact: ContactConfig,
}

impl Default for ListenerOptions {
    fn default() -> Self {
        Self {
            supported_gestures: DEFAULT_GESTURES.to_vec(),
            gesture_options: GestureOptions::default(),
            contact: ContactConfig::default(),
        }
    }
}

/// A raw-event callback.
pub type PointerCallback = Box<dyn FnMut(&PointerEvent)>;

/// Optional callbacks for raw pointer events.
#[derive(Default)]
pub struct PointerCallbacks {
    /// Called for every pointer-down.
    pub pointer_down: Option<PointerCallback>,
    /// Called for every pointer-move.
    pub pointer_move: Option<PointerCallback>,
    /// Called for every pointer-up.
    pub pointer_up: Option<PointerCallback>,
    /// Called for every pointer-cancel.
    pub pointer_cancel: Option<PointerCallback>,
}

impl PointerCallbacks {
    fn call(&mut self, event: &PointerEvent) {
        let callback = match event.kind {
            PointerEventKind::Down => &mut self.pointer_down,
            PointerEventKind::Move => &mut self.pointer_move,
            PointerEventKind::Up => &mut self.pointer_up,
            PointerEventKind::Cancel => &mut self.pointer_cancel,
        };
        if let Some(callback) = callback {
            callback(event);
        }
    }
}

impl fmt::Debug for PointerCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerCallbacks")
            .field("pointer_down", &self.pointer_down.is_some())
            .field("pointer_move", &self.pointer_move.is_some())
            .field("pointer_up", &self.pointer_up.is_some())
            .field("pointer_cancel", &self.pointer_cancel.is_some())
            .finish()
    }
}

/// Turns a raw pointer stream into gesture events.
#[derive(Debug)]
pub struct PointerListener {
    recognizers: Recognizers,
    config: ContactConfig,
    contact: Option<Contact>,
    callbacks: PointerCallbacks,
    next_contact_id: u64,
}

impl PointerListener {
    /// Build the recognizers named in `options`.
    ///
    /// # Errors
    ///
    /// The first [`ConfigError`] a recognizer constructor reports.
    pub fn new(options: ListenerOptions) -> Result<Self, ConfigError> {
        let mut recognizers = Recognizers::new();
        for kind in &options.supported_gestures {
            recognizers.add_boxed(kind.build(options.gesture_options)?);
        }
        Ok(Self::with_recognizers(recognizers, options.contact))
    }

    /// Use an already configured registry.
    #[must_use]
    pub fn with_recognizers(recognizers: Recognizers, config: ContactConfig) -> Self {
        Self {
            recognizers,
            config,
            contact: None,
            callbacks: PointerCallbacks::default(),
            next_contact_id: 1,
        }
    }

    /// The registry.
    #[must_use]
    pub fn recognizers(&self) -> &Recognizers {
        &self.recognizers
    }

    /// The registry, mutably; use it to add recognizers or block edges.
    pub fn recognizers_mut(&mut self) -> &mut Recognizers {
        &mut self.recognizers
    }

    /// The live session, if any.
    #[must_use]
    pub fn contact(&self) -> Option<&Contact> {
        self.contact.as_ref()
    }

    /// Replace the raw-event callbacks.
    pub fn set_callbacks(&mut self, callbacks: PointerCallbacks) {
        self.callbacks = callbacks;
    }

    /// Process one raw event and return the gesture events it produced, in
    /// recognizer order.
    pub fn handle(&mut self, event: PointerEvent) -> Vec<GestureEvent> {
        self.callbacks.call(&event);
        match event.kind {
            PointerEventKind::Down => {
                self.begin(event);
                Vec::new()
            }
            PointerEventKind::Move => {
                let Some(contact) = self.contact.as_mut() else {
                    return Vec::new();
                };
                if !contact.on_pointer_move(event) {
                    return Vec::new();
                }
                self.recognize()
            }
            PointerEventKind::Up => {
                let Some(contact) = self.contact.as_mut() else {
                    return Vec::new();
                };
                if !contact.on_pointer_up(event) {
                    return Vec::new();
                }
                let events = self.recognize();
                self.finish_if_idle();
                events
            }
            PointerEventKind::Cancel => {
                let Some(contact) = self.contact.as_mut() else {
                    return Vec::new();
                };
                contact.on_pointer_cancel(event);
                let events = self.recognize();
                self.finish_if_idle();
                events
            }
        }
    }

    /// Shorthand for a [`PointerEventKind::Down`] event.
    pub fn pointer_down(&mut self, pointer_id: u64, position: Point, timestamp: f64) -> Vec<GestureEvent> {
        self.handle(PointerEvent::down(pointer_id, position, timestamp))
    }

    /// Shorthand for a [`PointerEventKind::Move`] event.
    pub fn pointer_move(&mut self, pointer_id: u64, position: Point, timestamp: f64) -> Vec<GestureEvent> {
        self.handle(PointerEvent::moved(pointer_id, position, timestamp))
    }

    /// Shorthand for a [`PointerEventKind::Up`] event.
    pub fn pointer_up(&mut self, pointer_id: u64, position: Point, timestamp: f64) -> Vec<GestureEvent> {
        self.handle(PointerEvent::up(pointer_id, position, timestamp))
    }

    /// Shorthand for a [`PointerEventKind::Cancel`] event.
    pub fn pointer_cancel(&mut self, pointer_id: u64, position: Point, timestamp: f64) -> Vec<GestureEvent> {
        self.handle(PointerEvent::cancel(pointer_id, position, timestamp))
    }

    fn begin(&mut self, event: PointerEvent) {
        if let Some(contact) = self.contact.as_mut() {
            contact.add_pointer(event);
            log::trace!(
                "{:?} joined contact {:?} ({} down)",
                event.pointer_id,
                contact.id(),
                contact.active_pointer_count()
            );
            return;
        }
        let id = ContactId(self.next_contact_id);
        self.next_contact_id += 1;
        log::trace!("contact {id:?} started by {:?}", event.pointer_id);
        self.contact = Some(Contact::new(id, event, self.config));
    }

    fn recognize(&mut self) -> Vec<GestureEvent> {
        match &self.contact {
            Some(contact) => self.recognizers.recognize(&contact.snapshot()),
            None => Vec::new(),
        }
    }

    fn finish_if_idle(&mut self) {
        if self.contact.as_ref().is_some_and(|contact| !contact.is_active()) {
            if let Some(contact) = self.contact.take() {
                log::trace!("contact {:?} finished", contact.id());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::string::String;
    use core::cell::Cell;

    fn names(events: &[GestureEvent]) -> Vec<String> {
        events.iter().map(GestureEvent::name).collect()
    }

    #[test]
    fn default_gestures_exclude_press() {
        let listener = PointerListener::new(ListenerOptions::default()).unwrap();
        let order: Vec<_> = listener
            .recognizers()
            .iter()
            .map(|(_, g)| g.core().name())
            .collect();
        assert_eq!(order, ["tap", "pan", "pinch", "rotate", "twofingerpan"]);
    }

    #[test]
    fn invalid_options_are_reported() {
        let options = ListenerOptions {
            gesture_options: GestureOptions::default().with_directions(crate::Directions::empty()),
            ..ListenerOptions::default()
        };
        assert_eq!(
            PointerListener::new(options).unwrap_err(),
            ConfigError::EmptyDirections { gesture: "tap" }
        );
    }

    #[test]
    fn sessions_start_on_down_and_end_on_last_up() {
        let mut listener = PointerListener::new(ListenerOptions::default()).unwrap();
        assert!(listener.pointer_down(1, Point::ZERO, 0.0).is_empty());
        let first = listener.contact().map(Contact::id);
        assert_eq!(first, Some(ContactId(1)));

        listener.pointer_down(2, Point::new(100.0, 0.0), 10.0);
        assert_eq!(listener.contact().map(Contact::active_pointer_count), Some(2));

        listener.pointer_up(1, Point::ZERO, 500.0);
        assert!(listener.contact().is_some(), "one pointer still down");
        listener.pointer_up(2, Point::new(100.0, 0.0), 510.0);
        assert!(listener.contact().is_none());

        listener.pointer_down(1, Point::ZERO, 600.0);
        assert_eq!(listener.contact().map(Contact::id), Some(ContactId(2)));
    }

    #[test]
    fn cancel_discards_the_session() {
        let mut listener = PointerListener::new(ListenerOptions::default()).unwrap();
        listener.pointer_down(1, Point::ZERO, 0.0);
        listener.pointer_down(2, Point::new(50.0, 0.0), 0.0);
        assert!(listener.pointer_cancel(1, Point::ZERO, 50.0).is_empty());
        assert!(listener.contact().is_none());
    }

    #[test]
    fn stray_events_are_ignored() {
        let mut listener = PointerListener::new(ListenerOptions::default()).unwrap();
        assert!(listener.pointer_move(1, Point::new(40.0, 0.0), 10.0).is_empty());
        assert!(listener.pointer_up(1, Point::new(40.0, 0.0), 20.0).is_empty());
        listener.pointer_down(1, Point::ZERO, 30.0);
        assert!(listener.pointer_move(9, Point::new(40.0, 0.0), 40.0).is_empty());
        assert!(listener.contact().is_some());
    }

    #[test]
    fn callbacks_see_every_raw_event() {
        let seen = Rc::new(Cell::new(0_u32));
        let mut listener = PointerListener::new(ListenerOptions::default()).unwrap();
        let (down, up) = (Rc::clone(&seen), Rc::clone(&seen));
        listener.set_callbacks(PointerCallbacks {
            pointer_down: Some(Box::new(move |_: &PointerEvent| down.set(down.get() + 1))),
            pointer_up: Some(Box::new(move |_: &PointerEvent| up.set(up.get() + 10))),
            ..PointerCallbacks::default()
        });
        listener.pointer_down(1, Point::ZERO, 0.0);
        listener.pointer_move(1, Point::new(1.0, 0.0), 10.0);
        listener.pointer_up(1, Point::new(1.0, 0.0), 20.0);
        listener.pointer_up(1, Point::new(1.0, 0.0), 30.0);
        assert_eq!(seen.get(), 21);
    }

    #[test]
    fn quick_touch_is_a_tap() {
        let mut listener = PointerListener::new(ListenerOptions::default()).unwrap();
        listener.pointer_down(1, Point::new(10.0, 10.0), 0.0);
        let events = listener.pointer_up(1, Point::new(11.0, 10.0), 80.0);
        assert_eq!(names(&events), ["tap"]);
        assert_eq!(events[0].contact, ContactId(1));
    }
}

//! Full-screen single-image viewer.
//!
//! [`LightboxState::apply`] is the pure transition function. [`Lightbox`]
//! wraps it with the collection length and the page scroll: scroll is locked
//! on every closed-to-open transition and released on every open-to-closed
//! one, whatever triggered it.

use tracing::debug;

use crate::scroll::ScrollControl;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightboxState {
    #[default]
    Closed,
    Open { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxEvent {
    /// Thumbnail click.
    Open(usize),
    Next,
    Previous,
    Close(CloseTrigger),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTrigger {
    Button,
    Overlay,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowRight,
    ArrowLeft,
    Escape,
}

impl Key {
    /// Map a DOM-style key name; other keys are ignored.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowRight" => Some(Key::ArrowRight),
            "ArrowLeft" => Some(Key::ArrowLeft),
            "Escape" | "Esc" => Some(Key::Escape),
            _ => None,
        }
    }

    pub fn event(self) -> LightboxEvent {
        match self {
            Key::ArrowRight => LightboxEvent::Next,
            Key::ArrowLeft => LightboxEvent::Previous,
            Key::Escape => LightboxEvent::Close(CloseTrigger::Escape),
        }
    }
}

impl LightboxState {
    pub fn index(&self) -> Option<usize> {
        match self {
            LightboxState::Closed => None,
            LightboxState::Open { index } => Some(*index),
        }
    }

    pub fn is_open(&self) -> bool { matches!(self, LightboxState::Open { .. }) }

    /// Next state for `event` over `len` images. Navigation wraps both ways;
    /// opening past the end, or with nothing to show, is ignored.
    pub fn apply(self, event: LightboxEvent, len: usize) -> LightboxState {
        match (self, event) {
            (_, LightboxEvent::Open(i)) if i < len => LightboxState::Open { index: i },
            (_, LightboxEvent::Open(_)) => self,
            (LightboxState::Open { .. }, LightboxEvent::Close(_)) => LightboxState::Closed,
            (LightboxState::Open { index }, LightboxEvent::Next) if len > 0 => {
                LightboxState::Open { index: (index + 1) % len }
            }
            (LightboxState::Open { index }, LightboxEvent::Previous) if len > 0 => {
                LightboxState::Open { index: (index + len - 1) % len }
            }
            _ => self,
        }
    }
}

pub struct Lightbox<S: ScrollControl> {
    state: LightboxState,
    len: usize,
    scroll: S,
}

impl<S: ScrollControl> Lightbox<S> {
    pub fn new(len: usize, scroll: S) -> Self {
        Self { state: LightboxState::Closed, len, scroll }
    }

    pub fn state(&self) -> LightboxState { self.state }

    pub fn index(&self) -> Option<usize> { self.state.index() }

    pub fn is_open(&self) -> bool { self.state.is_open() }

    pub fn len(&self) -> usize { self.len }

    pub fn is_empty(&self) -> bool { self.len == 0 }

    pub fn scroll(&self) -> &S { &self.scroll }

    pub fn dispatch(&mut self, event: LightboxEvent) -> LightboxState {
        let next = self.state.apply(event, self.len);
        self.transition(next);
        self.state
    }

    pub fn open(&mut self, index: usize) -> LightboxState { self.dispatch(LightboxEvent::Open(index)) }

    pub fn next(&mut self) -> LightboxState { self.dispatch(LightboxEvent::Next) }

    pub fn previous(&mut self) -> LightboxState { self.dispatch(LightboxEvent::Previous) }

    pub fn close(&mut self, trigger: CloseTrigger) -> LightboxState {
        self.dispatch(LightboxEvent::Close(trigger))
    }

    /// Keys only act while open.
    pub fn handle_key(&mut self, key: Key) -> LightboxState {
        if !self.is_open() {
            return self.state;
        }
        self.dispatch(key.event())
    }

    /// The collection was refetched with `len` images.
    ///
    /// An index past the end is clamped to the last image; an empty
    /// collection closes the viewer.
    pub fn refresh(&mut self, len: usize) -> LightboxState {
        self.len = len;
        let next = match self.state {
            LightboxState::Open { .. } if len == 0 => LightboxState::Closed,
            LightboxState::Open { index } if index >= len => LightboxState::Open { index: len - 1 },
            other => other,
        };
        self.transition(next);
        self.state
    }

    fn transition(&mut self, next: LightboxState) {
        match (self.state.is_open(), next.is_open()) {
            (false, true) => self.scroll.lock(),
            (true, false) => self.scroll.unlock(),
            _ => {}
        }
        if next != self.state {
            debug!(from = ?self.state, to = ?next, "lightbox");
        }
        self.state = next;
    }
}

impl<S: ScrollControl> Drop for Lightbox<S> {
    fn drop(&mut self) {
        if self.state.is_open() {
            self.scroll.unlock();
        }
    }
}

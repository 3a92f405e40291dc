//! Event types for picker session notifications.
//!
//! The hosting view can subscribe to these to refresh previews or persist
//! state. They're also used by tests to verify that every drag frame
//! produces exactly one commit.

use sitetools_core::{Color, Hsb};

/// Events emitted by `PickerManager`.
#[derive(Debug, Clone, PartialEq)]
pub enum PickerEvent<F> {
    /// A session started for a field.
    Opened(OpenedEvent<F>),

    /// A color was written back through the session's commit callback.
    Committed(CommittedEvent<F>),

    /// The session ended. Always the last event for that session.
    Closed(ClosedEvent<F>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenedEvent<F> {
    pub field: F,
    /// Initial HSB, derived from the field's current color.
    pub hsb: Hsb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommittedEvent<F> {
    pub field: F,
    pub color: Color,
    pub source: CommitSource,
}

/// What produced a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitSource {
    /// Saturation/brightness pad (press or drag frame).
    Pad,
    /// Hue track (press or drag frame).
    HueTrack,
    /// Accepted hex text entry.
    HexEntry,
    /// A pinned color applied while the picker was open.
    Pinned,
    /// Set directly by the host (keyboard, scripted input).
    Direct,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClosedEvent<F> {
    pub field: F,
    pub reason: CloseReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The same swatch was activated again.
    Toggled,
    /// A different swatch was activated.
    Replaced,
    /// Pointer pressed outside the picker while not dragging.
    OutsidePress,
    /// Closed by the host.
    Explicit,
}

/// Callback type for receiving picker events.
pub type EventCallback<F> = Box<dyn FnMut(PickerEvent<F>)>;

/// Simple event collector for testing.
#[derive(Debug)]
pub struct EventCollector<F> {
    events: Vec<PickerEvent<F>>,
}

impl<F> Default for EventCollector<F> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<F> EventCollector<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: PickerEvent<F>) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[PickerEvent<F>] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Filter to only Committed events.
    pub fn committed(&self) -> Vec<&CommittedEvent<F>> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PickerEvent::Committed(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    /// Filter to only Closed events.
    pub fn closed(&self) -> Vec<&ClosedEvent<F>> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PickerEvent::Closed(c) => Some(c),
                _ => None,
            })
            .collect()
    }
}

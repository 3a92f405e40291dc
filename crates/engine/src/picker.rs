//! Interactive HSB color picker.
//!
//! A `PickerManager` is owned by the view that hosts swatches. It holds at
//! most one `PickerSession`, which remembers the field being edited, the
//! current HSB triple and the caller's commit callback. Every change is
//! committed immediately: there is no preview and no cancel.
//!
//! State machine:
//!
//! ```text
//! Closed --activate(f)--> Open(f)
//! Open(f) --activate(f)--> Closed            (toggle)
//! Open(f) --activate(g)--> Open(g)           (replace)
//! Open --press pad/track--> Dragging(axis)   (commits)
//! Dragging --move--> Dragging                (commits every frame)
//! Dragging --release--> Open
//! Open --press outside--> Closed
//! ```
//!
//! Pointer coordinates are in one shared space (the document). Moves are
//! tracked globally while dragging and clamped to the dragged surface.

use sitetools_core::{parse_hex_input, Color, Hsb};

use crate::events::{
    ClosedEvent, CloseReason, CommitSource, CommittedEvent, EventCallback, OpenedEvent, PickerEvent,
};

/// Callback receiving every committed color.
pub type CommitCallback = Box<dyn FnMut(Color)>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in pointer coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left
            && p.x <= self.left + self.width
            && p.y >= self.top
            && p.y <= self.top + self.height
    }

    /// Position of `p` as fractions of width and height, clamped to [0, 1].
    pub fn fraction(&self, p: Point) -> (f64, f64) {
        (
            unit(p.x - self.left, self.width),
            unit(p.y - self.top, self.height),
        )
    }
}

fn unit(offset: f64, extent: f64) -> f64 {
    if extent <= 0.0 || offset.is_nan() {
        return 0.0;
    }
    (offset / extent).clamp(0.0, 1.0)
}

/// Where the picker and its two draggable surfaces sit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickerLayout {
    /// Whole popover; presses outside it close the session.
    pub picker: Bounds,
    /// Saturation (x) / brightness (y) pad.
    pub pad: Bounds,
    /// Horizontal hue track.
    pub hue_track: Bounds,
}

impl Default for PickerLayout {
    fn default() -> Self {
        Self {
            picker: Bounds::new(0.0, 0.0, 220.0, 230.0),
            pad: Bounds::new(10.0, 10.0, 200.0, 150.0),
            hue_track: Bounds::new(10.0, 170.0, 200.0, 16.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    SatBright,
    Hue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerStatus {
    Closed,
    Open,
    Dragging(Axis),
}

/// Outcome of activating a swatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Opened,
    /// Another field's session was closed first.
    Replaced,
    /// The same field was open and is now closed.
    Closed,
}

pub struct PickerSession<F> {
    field: F,
    hsb: Hsb,
    hex_input: String,
    dragging: Option<Axis>,
    layout: PickerLayout,
    on_commit: CommitCallback,
}

impl<F> PickerSession<F> {
    pub fn field(&self) -> &F {
        &self.field
    }

    pub fn hsb(&self) -> Hsb {
        self.hsb
    }

    pub fn color(&self) -> Color {
        Color::from_hsb(self.hsb)
    }

    /// Text currently shown in the hex box.
    pub fn hex_input(&self) -> &str {
        &self.hex_input
    }

    pub fn layout(&self) -> &PickerLayout {
        &self.layout
    }

    pub fn dragging(&self) -> Option<Axis> {
        self.dragging
    }

    /// Load a color, keeping the current hue when the color has none.
    fn load(&mut self, color: Color) {
        let mut hsb = color.hsb();
        if color.is_achromatic() {
            hsb.h = self.hsb.h;
        }
        self.hsb = hsb;
    }

    fn track(&mut self, axis: Axis, p: Point) {
        match axis {
            Axis::SatBright => {
                let (fx, fy) = self.layout.pad.fraction(p);
                self.hsb.s = fx * 100.0;
                self.hsb.b = 100.0 - fy * 100.0;
            }
            Axis::Hue => {
                let (fx, _) = self.layout.hue_track.fraction(p);
                self.hsb.h = (fx * 360.0).rem_euclid(360.0);
            }
        }
    }

    fn commit(&mut self) -> Color {
        let color = self.color();
        self.hex_input = color.to_hex();
        (self.on_commit)(color);
        color
    }
}

/// Owns the (single) live picker session.
pub struct PickerManager<F> {
    session: Option<PickerSession<F>>,
    listener: Option<EventCallback<F>>,
}

impl<F> Default for PickerManager<F> {
    fn default() -> Self {
        Self { session: None, listener: None }
    }
}

impl<F: Clone + PartialEq> PickerManager<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listener(listener: EventCallback<F>) -> Self {
        Self { session: None, listener: Some(listener) }
    }

    pub fn status(&self) -> PickerStatus {
        match &self.session {
            None => PickerStatus::Closed,
            Some(s) => match s.dragging {
                Some(axis) => PickerStatus::Dragging(axis),
                None => PickerStatus::Open,
            },
        }
    }

    pub fn session(&self) -> Option<&PickerSession<F>> {
        self.session.as_ref()
    }

    pub fn is_open_for(&self, field: &F) -> bool {
        self.session.as_ref().is_some_and(|s| &s.field == field)
    }

    fn emit(&mut self, event: PickerEvent<F>) {
        if let Some(listener) = self.listener.as_mut() {
            listener(event);
        }
    }

    /// Activate the swatch for `field`. Re-activating the open field closes
    /// it; any other field replaces the current session.
    pub fn activate(
        &mut self,
        field: F,
        current: Color,
        layout: PickerLayout,
        on_commit: CommitCallback,
    ) -> Activation {
        let activation = match self.session.as_ref().map(|s| s.field == field) {
            Some(true) => {
                self.close_with(CloseReason::Toggled);
                return Activation::Closed;
            }
            Some(false) => {
                self.close_with(CloseReason::Replaced);
                Activation::Replaced
            }
            None => Activation::Opened,
        };

        let hsb = current.hsb();
        self.session = Some(PickerSession {
            field: field.clone(),
            hsb,
            hex_input: current.to_hex(),
            dragging: None,
            layout,
            on_commit,
        });
        self.emit(PickerEvent::Opened(OpenedEvent { field, hsb }));
        activation
    }

    /// Close the current session, if any.
    pub fn close(&mut self) -> bool {
        self.close_with(CloseReason::Explicit)
    }

    fn close_with(&mut self, reason: CloseReason) -> bool {
        match self.session.take() {
            Some(s) => {
                self.emit(PickerEvent::Closed(ClosedEvent { field: s.field, reason }));
                true
            }
            None => false,
        }
    }

    fn commit(&mut self, source: CommitSource) -> Option<Color> {
        let session = self.session.as_mut()?;
        let color = session.commit();
        let field = session.field.clone();
        self.emit(PickerEvent::Committed(CommittedEvent { field, color, source }));
        Some(color)
    }

    /// Pointer pressed. Starts a drag on the pad or hue track, closes the
    /// session when the press lands outside the picker.
    pub fn pointer_down(&mut self, p: Point) -> PickerStatus {
        let Some(session) = self.session.as_mut() else {
            return PickerStatus::Closed;
        };
        if session.dragging.is_some() {
            return self.status();
        }

        let axis = if session.layout.pad.contains(p) {
            Axis::SatBright
        } else if session.layout.hue_track.contains(p) {
            Axis::Hue
        } else {
            if !session.layout.picker.contains(p) {
                self.close_with(CloseReason::OutsidePress);
            }
            return self.status();
        };

        session.dragging = Some(axis);
        session.track(axis, p);
        self.commit(source_for(axis));
        self.status()
    }

    /// Pointer moved anywhere in the document. Only matters while dragging.
    pub fn pointer_move(&mut self, p: Point) -> Option<Color> {
        let session = self.session.as_mut()?;
        let axis = session.dragging?;
        session.track(axis, p);
        self.commit(source_for(axis))
    }

    /// Pointer released anywhere. Ends a drag, keeps the session open.
    pub fn pointer_up(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.dragging = None;
        }
    }

    /// Update the hex box text without committing.
    pub fn set_hex_input(&mut self, text: &str) {
        if let Some(session) = self.session.as_mut() {
            session.hex_input = text.to_string();
        }
    }

    /// Submit hex text. Valid six-digit input is committed; anything else
    /// is discarded and the box reverts to the current color.
    pub fn submit_hex(&mut self, text: &str) -> Option<Color> {
        let session = self.session.as_mut()?;
        match parse_hex_input(text) {
            Some(color) => {
                session.load(color);
                self.commit(CommitSource::HexEntry)
            }
            None => {
                session.hex_input = session.color().to_hex();
                None
            }
        }
    }

    /// Load a pinned color into the open session and commit it.
    pub fn apply_color(&mut self, color: Color) -> Option<Color> {
        self.session.as_mut()?.load(color);
        self.commit(CommitSource::Pinned)
    }

    /// Set hue directly (degrees).
    pub fn set_hue(&mut self, hue: f64) -> Option<Color> {
        let session = self.session.as_mut()?;
        session.hsb = Hsb::new(hue, session.hsb.s, session.hsb.b).clamped();
        self.commit(CommitSource::Direct)
    }

    /// Set saturation and brightness directly (percent).
    pub fn set_sat_bright(&mut self, saturation: f64, brightness: f64) -> Option<Color> {
        let session = self.session.as_mut()?;
        session.hsb = Hsb::new(session.hsb.h, saturation, brightness).clamped();
        self.commit(CommitSource::Direct)
    }
}

fn source_for(axis: Axis) -> CommitSource {
    match axis {
        Axis::SatBright => CommitSource::Pad,
        Axis::Hue => CommitSource::HueTrack,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventCollector;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Commits = Rc<RefCell<Vec<Color>>>;

    fn recorder() -> (Commits, CommitCallback) {
        let commits: Commits = Rc::new(RefCell::new(Vec::new()));
        let sink = commits.clone();
        (commits, Box::new(move |c: Color| sink.borrow_mut().push(c)))
    }

    fn open(manager: &mut PickerManager<&'static str>, field: &'static str, hex: &str) -> Commits {
        let (commits, cb) = recorder();
        manager.activate(field, Color::parse(hex).unwrap(), PickerLayout::default(), cb);
        commits
    }

    #[test]
    fn test_open_derives_hsb_from_current_color() {
        let mut m = PickerManager::new();
        open(&mut m, "solid", "#3366CC");
        let hsb = m.session().unwrap().hsb();
        assert!((hsb.h - 220.0).abs() < 0.5);
        assert!((hsb.s - 75.0).abs() < 0.01);
        assert_eq!(m.status(), PickerStatus::Open);
        assert_eq!(m.session().unwrap().hex_input(), "#3366cc");
    }

    #[test]
    fn test_same_field_toggles_closed() {
        let mut m = PickerManager::new();
        open(&mut m, "solid", "#ffffff");
        let (_, cb) = recorder();
        let result = m.activate("solid", Color::WHITE, PickerLayout::default(), cb);
        assert_eq!(result, Activation::Closed);
        assert_eq!(m.status(), PickerStatus::Closed);
    }

    #[test]
    fn test_other_field_replaces_session() {
        let collector = Rc::new(RefCell::new(EventCollector::<&'static str>::new()));
        let sink = collector.clone();
        let mut m = PickerManager::with_listener(Box::new(move |e: PickerEvent<&'static str>| {
            sink.borrow_mut().push(e)
        }));
        open(&mut m, "stop-0", "#ffffff");
        let (_, cb) = recorder();
        let result = m.activate("stop-1", Color::BLACK, PickerLayout::default(), cb);
        assert_eq!(result, Activation::Replaced);
        assert!(m.is_open_for(&"stop-1"));
        assert!(!m.is_open_for(&"stop-0"));

        let closed = collector.borrow().closed().iter().map(|c| (c.field, c.reason)).collect::<Vec<_>>();
        assert_eq!(closed, vec![("stop-0", CloseReason::Replaced)]);
    }

    #[test]
    fn test_pad_press_and_drag_commit_every_frame() {
        let mut m = PickerManager::new();
        let commits = open(&mut m, "solid", "#ff0000");

        // Pad spans x 10..210, y 10..160.
        assert_eq!(m.pointer_down(Point::new(110.0, 85.0)), PickerStatus::Dragging(Axis::SatBright));
        let hsb = m.session().unwrap().hsb();
        assert_eq!(hsb.s, 50.0);
        assert_eq!(hsb.b, 50.0);

        m.pointer_move(Point::new(210.0, 10.0));
        m.pointer_move(Point::new(160.0, 10.0));
        assert_eq!(commits.borrow().len(), 3);
        assert_eq!(commits.borrow()[1], Color::from_rgb(255, 0, 0));

        m.pointer_up();
        assert_eq!(m.status(), PickerStatus::Open);
        assert!(m.pointer_move(Point::new(20.0, 20.0)).is_none());
        assert_eq!(commits.borrow().len(), 3);
    }

    #[test]
    fn test_drag_outside_widget_clamps() {
        let mut m = PickerManager::new();
        let commits = open(&mut m, "solid", "#00ff00");
        m.pointer_down(Point::new(50.0, 50.0));
        m.pointer_move(Point::new(-500.0, 9000.0));
        let hsb = m.session().unwrap().hsb();
        assert_eq!(hsb.s, 0.0);
        assert_eq!(hsb.b, 0.0);
        assert_eq!(commits.borrow().last().copied(), Some(Color::BLACK));
    }

    #[test]
    fn test_hue_track() {
        let mut m = PickerManager::new();
        let commits = open(&mut m, "solid", "#ff0000");
        // Track spans x 10..210; one third across is 120 degrees.
        let x = 10.0 + 200.0 / 3.0;
        assert_eq!(m.pointer_down(Point::new(x, 175.0)), PickerStatus::Dragging(Axis::Hue));
        assert_eq!(commits.borrow()[0], Color::from_rgb(0, 255, 0));
    }

    #[test]
    fn test_outside_press_closes_unless_dragging() {
        let mut m = PickerManager::new();
        open(&mut m, "solid", "#ff0000");
        m.pointer_down(Point::new(50.0, 50.0));
        // A second press while dragging is ignored.
        assert_eq!(m.pointer_down(Point::new(900.0, 900.0)), PickerStatus::Dragging(Axis::SatBright));
        m.pointer_up();
        // Press inside the popover chrome keeps it open.
        assert_eq!(m.pointer_down(Point::new(215.0, 220.0)), PickerStatus::Open);
        assert_eq!(m.pointer_down(Point::new(900.0, 900.0)), PickerStatus::Closed);
    }

    #[test]
    fn test_hex_entry() {
        let mut m = PickerManager::new();
        let commits = open(&mut m, "solid", "#000000");
        assert_eq!(m.submit_hex("3366cc"), Some(Color::from_rgb(51, 102, 204)));
        m.set_hex_input("#12");
        assert_eq!(m.submit_hex("#12"), None);
        assert_eq!(m.session().unwrap().hex_input(), "#3366cc");
        assert_eq!(commits.borrow().len(), 1);
    }

    #[test]
    fn test_achromatic_entry_keeps_hue() {
        let mut m = PickerManager::new();
        open(&mut m, "solid", "#3366cc");
        m.submit_hex("#808080");
        let hsb = m.session().unwrap().hsb();
        assert!((hsb.h - 220.0).abs() < 0.5);
        assert_eq!(hsb.s, 0.0);
    }

    #[test]
    fn test_apply_pinned_color_requires_open_session() {
        let mut m: PickerManager<&str> = PickerManager::new();
        assert_eq!(m.apply_color(Color::WHITE), None);
        let commits = open(&mut m, "solid", "#000000");
        assert_eq!(m.apply_color(Color::from_rgb(255, 0, 0)), Some(Color::from_rgb(255, 0, 0)));
        assert_eq!(commits.borrow().len(), 1);
    }

    #[test]
    fn test_direct_setters() {
        let mut m = PickerManager::new();
        open(&mut m, "solid", "#ffffff");
        m.set_hue(240.0);
        assert_eq!(m.set_sat_bright(100.0, 100.0), Some(Color::from_rgb(0, 0, 255)));
    }
}

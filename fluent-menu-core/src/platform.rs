//! Host integration.
//!
//! The menu never creates windows or reads input devices itself. A host maps
//! popup surfaces to real overlay windows, reports screen geometry, measures
//! text and forwards pointer and key events.

use std::cell::RefCell;
use std::rc::Rc;

use vello::kurbo::{Point, Rect};

use crate::menu::constants::TEXT_CHAR_WIDTH_EM;
use crate::menu::surface::SurfaceId;

/// Measures single-line text for layout.
pub trait TextMeasure {
    /// Advance width of `text` at `font_size`.
    fn text_width(&self, text: &str, font_size: f32) -> f64;
}

/// Estimates text width from the character count.
///
/// Used when the host has no shaper at hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatedTextMeasure;

impl TextMeasure for EstimatedTextMeasure {
    fn text_width(&self, text: &str, font_size: f32) -> f64 {
        text.chars().count() as f64 * font_size as f64 * TEXT_CHAR_WIDTH_EM
    }
}

static ESTIMATED: EstimatedTextMeasure = EstimatedTextMeasure;

/// The windowing side of a popup.
///
/// All methods take `&self`; hosts use interior mutability where they need it.
pub trait PopupHost {
    /// Bounds of every screen in global coordinates.
    fn screens(&self) -> Vec<Rect>;

    /// Text measurement used for layout.
    fn text_measure(&self) -> &dyn TextMeasure {
        &ESTIMATED
    }

    /// Show the overlay window of `surface` with the given global frame.
    fn map_surface(&self, surface: SurfaceId, frame: Rect);

    /// Hide the overlay window of `surface`.
    fn unmap_surface(&self, surface: SurfaceId);

    /// Route all pointer and key input to `surface` until released.
    fn grab_input(&self, surface: SurfaceId);

    /// Undo [PopupHost::grab_input].
    fn release_input(&self, surface: SurfaceId);
}

/// Opaque identity of a widget a menu can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(pub u64);

/// Callback invoked with the global position of a secondary click.
pub type SecondaryClickHandler = Rc<dyn Fn(Point)>;

/// A host widget that can open a context menu on secondary activation.
pub trait ContextMenuTarget {
    /// Stable identity of the widget.
    fn target_id(&self) -> TargetId;

    /// Install or remove (`None`) the secondary-click handler.
    fn set_secondary_click_handler(&self, handler: Option<SecondaryClickHandler>);
}

/// Something [HeadlessHost] was asked to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// A surface was mapped with this global frame.
    Mapped(SurfaceId, Rect),
    /// A surface was unmapped.
    Unmapped(SurfaceId),
    /// Input was grabbed for a surface.
    Grabbed(SurfaceId),
    /// Input grab of a surface was released.
    Released(SurfaceId),
}

/// A host without windows. Records every request in order.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    screens: RefCell<Vec<Rect>>,
    events: RefCell<Vec<HostEvent>>,
}

impl HeadlessHost {
    /// A host with a single screen.
    pub fn new(screen: Rect) -> Self {
        Self::with_screens(vec![screen])
    }

    /// A host with several screens.
    pub fn with_screens(screens: Vec<Rect>) -> Self {
        Self {
            screens: RefCell::new(screens),
            events: RefCell::new(Vec::new()),
        }
    }

    /// Replace the screen layout.
    pub fn set_screens(&self, screens: Vec<Rect>) {
        *self.screens.borrow_mut() = screens;
    }

    /// Everything recorded so far.
    pub fn events(&self) -> Vec<HostEvent> {
        self.events.borrow().clone()
    }

    /// Everything recorded so far, clearing the log.
    pub fn take_events(&self) -> Vec<HostEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Surfaces currently mapped, with their frames, in mapping order.
    pub fn mapped(&self) -> Vec<(SurfaceId, Rect)> {
        let mut mapped: Vec<(SurfaceId, Rect)> = Vec::new();
        for event in self.events.borrow().iter() {
            match *event {
                HostEvent::Mapped(id, frame) => mapped.push((id, frame)),
                HostEvent::Unmapped(id) => mapped.retain(|(m, _)| *m != id),
                _ => {},
            }
        }
        mapped
    }

    /// Whether `surface` is currently mapped.
    pub fn is_mapped(&self, surface: SurfaceId) -> bool {
        self.mapped().iter().any(|(id, _)| *id == surface)
    }

    fn record(&self, event: HostEvent) {
        log::trace!("headless host: {:?}", event);
        self.events.borrow_mut().push(event);
    }
}

impl PopupHost for HeadlessHost {
    fn screens(&self) -> Vec<Rect> {
        self.screens.borrow().clone()
    }

    fn map_surface(&self, surface: SurfaceId, frame: Rect) {
        self.record(HostEvent::Mapped(surface, frame));
    }

    fn unmap_surface(&self, surface: SurfaceId) {
        self.record(HostEvent::Unmapped(surface));
    }

    fn grab_input(&self, surface: SurfaceId) {
        self.record(HostEvent::Grabbed(surface));
    }

    fn release_input(&self, surface: SurfaceId) {
        self.record(HostEvent::Released(surface));
    }
}

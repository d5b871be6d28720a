//! Popup surfaces
//!
//! A [PopupSurface] is the overlay window of one menu level. It owns the
//! menu's [RenderCache], places itself on screen once per show and paints the
//! draw spec it was shown with until it closes.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use fluent_menu_theme::Theme;
use vello::kurbo::{Affine, Point, Rect, Size};

use crate::menu::constants::{CHILD_POPUP_OVERLAP, VERTICAL_PADDING};
use crate::menu::item::ItemSnapshot;
use crate::menu::render::{paint_menu, DrawSpec, RenderCache};
use crate::menu::shadow::{ShadowCompositor, ShadowLayer};
use crate::platform::PopupHost;
use crate::vgi::Graphics;

static NEXT_SURFACE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide identity of a popup surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(u64);

impl SurfaceId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        Self(NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface-{}", self.0)
    }
}

/// Lifecycle state of a popup surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PopupState {
    /// Not visible.
    Closed,
    /// Building the draw spec and placing itself.
    Building,
    /// Visible and holding the input grab.
    Shown,
    /// Releasing the grab and unmapping.
    Closing,
}

/// Where a popup should appear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Top-left corner at a global point, as for a right click.
    AtPoint(Point),
    /// Next to a parent popup, first row aligned with `row`.
    Beside {
        /// Content frame of the parent popup.
        parent: Rect,
        /// Global rectangle of the opening row.
        row: Rect,
    },
}

/// Everything [PopupSurface::show] needs to build and place the popup.
pub struct ShowRequest<'a> {
    /// Where to appear.
    pub placement: Placement,
    /// Current items.
    pub items: &'a [ItemSnapshot],
    /// Current theme.
    pub theme: &'a Rc<Theme>,
    /// Minimum content width.
    pub min_width: f64,
    /// Distance kept to the screen edges.
    pub screen_margin: f64,
}

/// The overlay window of one menu level.
#[derive(Debug)]
pub struct PopupSurface {
    id: SurfaceId,
    state: PopupState,
    cache: RenderCache,
    shown: Option<Shown>,
}

#[derive(Debug)]
struct Shown {
    spec: Rc<DrawSpec>,
    shadow: Vec<ShadowLayer>,
    margin: f64,
    frame: Rect,
}

impl Default for PopupSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl PopupSurface {
    /// A closed surface with an empty, dirty cache.
    pub fn new() -> Self {
        Self {
            id: SurfaceId::next(),
            state: PopupState::Closed,
            cache: RenderCache::new(),
            shown: None,
        }
    }

    /// Surface id.
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// Lifecycle state.
    pub fn state(&self) -> PopupState {
        self.state
    }

    /// Whether the surface is visible.
    pub fn is_shown(&self) -> bool {
        self.state == PopupState::Shown
    }

    /// The draw cache.
    pub fn cache(&self) -> &RenderCache {
        &self.cache
    }

    /// Mark the cache dirty. A visible popup keeps what it shows until the next show.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    /// The draw spec being displayed.
    pub fn shown_spec(&self) -> Option<&DrawSpec> {
        self.shown.as_ref().map(|s| s.spec.as_ref())
    }

    /// Global content frame while shown.
    pub fn frame(&self) -> Option<Rect> {
        self.shown.as_ref().map(|s| s.frame)
    }

    /// Global frame of the overlay window, shadow included.
    pub fn window_rect(&self) -> Option<Rect> {
        self.shown.as_ref().map(|s| s.frame.inflate(s.margin, s.margin))
    }

    /// Build if needed, place, map and grab input.
    ///
    /// Showing an already visible surface changes nothing; geometry is only
    /// ever computed before the first paint.
    pub fn show(&mut self, request: ShowRequest<'_>, host: &dyn PopupHost) -> Rect {
        if let (PopupState::Shown, Some(frame)) = (self.state, self.frame()) {
            log::debug!("{} already shown", self.id);
            return frame;
        }

        self.state = PopupState::Building;
        let spec = self.cache.build(
            request.items,
            request.theme,
            host.text_measure(),
            request.min_width,
        );
        let size = spec.layout.size;
        let screens = host.screens();
        let frame = match request.placement {
            Placement::AtPoint(anchor) => place_at_point(anchor, size, &screens, request.screen_margin),
            Placement::Beside { parent, row } => place_beside(parent, row, size, &screens, request.screen_margin),
        };

        let compositor = ShadowCompositor::from_theme(&spec.theme);
        let shown = Shown {
            shadow: compositor.layers(Rect::from_origin_size(Point::ZERO, size)),
            margin: compositor.margin(),
            spec,
            frame,
        };
        let window = frame.inflate(shown.margin, shown.margin);
        self.shown = Some(shown);
        self.state = PopupState::Shown;

        host.map_surface(self.id, window);
        host.grab_input(self.id);
        log::debug!("{} shown at {:?}", self.id, frame);
        frame
    }

    /// Release input and unmap. Returns `false` if the surface was not shown.
    pub fn close(&mut self, host: &dyn PopupHost) -> bool {
        if self.state != PopupState::Shown {
            return false;
        }
        self.state = PopupState::Closing;
        host.release_input(self.id);
        host.unmap_surface(self.id);
        self.shown = None;
        self.state = PopupState::Closed;
        log::debug!("{} closed", self.id);
        true
    }

    /// Paint in window-local coordinates (origin at the window's top-left, shadow included).
    pub fn paint(&self, graphics: &mut dyn Graphics, highlight: Option<usize>, pressed: bool) {
        if let Some(shown) = &self.shown {
            let transform = Affine::translate((shown.margin, shown.margin));
            paint_menu(graphics, &shown.spec, &shown.shadow, transform, highlight, pressed);
        }
    }

    /// Whether a global point lies on the popup body.
    pub fn contains(&self, point: Point) -> bool {
        self.frame().is_some_and(|frame| frame.contains(point))
    }

    /// Row under a global point.
    pub fn hit_test(&self, point: Point) -> Option<usize> {
        let shown = self.shown.as_ref()?;
        if !shown.frame.contains(point) {
            return None;
        }
        shown.spec.layout.hit_test(point - shown.frame.origin().to_vec2())
    }

    /// Global rectangle of a row.
    pub fn row_rect(&self, row: usize) -> Option<Rect> {
        let shown = self.shown.as_ref()?;
        let rect = shown.spec.layout.rows.get(row)?.rect;
        Some(rect + shown.frame.origin().to_vec2())
    }

    /// Update the visible check mark of a row without rebuilding.
    ///
    /// Toggling does not change geometry, so the shown draw spec is patched in place.
    pub fn patch_checked(&mut self, row: usize, checked: bool) -> bool {
        let Some(shown) = self.shown.as_mut() else {
            return false;
        };
        match Rc::make_mut(&mut shown.spec).layout.rows.get_mut(row) {
            Some(geometry) if geometry.checkable => {
                geometry.checked = checked;
                true
            },
            _ => false,
        }
    }
}

/// The screen containing `point`, else the nearest one.
pub fn screen_for(point: Point, screens: &[Rect]) -> Option<Rect> {
    screens
        .iter()
        .find(|screen| screen.contains(point))
        .or_else(|| {
            screens.iter().min_by(|a, b| {
                distance_sq(**a, point).total_cmp(&distance_sq(**b, point))
            })
        })
        .copied()
}

fn distance_sq(rect: Rect, point: Point) -> f64 {
    let dx = (rect.x0 - point.x).max(point.x - rect.x1).max(0.0);
    let dy = (rect.y0 - point.y).max(point.y - rect.y1).max(0.0);
    dx * dx + dy * dy
}

fn usable_area(screen: Rect, margin: f64) -> Rect {
    let margin = margin.min(screen.width() / 2.0).min(screen.height() / 2.0).max(0.0);
    screen.inset(-margin)
}

/// Place a popup of `size` with its top-left at `anchor`.
///
/// Axes are resolved independently: horizontal overflow shifts the popup left,
/// vertical overflow makes it grow upward from the anchor. A popup taller than
/// the screen is top-aligned. An anchor outside every screen is clamped to the
/// nearest one; without screens the anchor is used as is.
pub fn place_at_point(anchor: Point, size: Size, screens: &[Rect], margin: f64) -> Rect {
    let Some(screen) = screen_for(anchor, screens) else {
        return Rect::from_origin_size(anchor, size);
    };
    let area = usable_area(screen, margin);
    let anchor = Point::new(anchor.x.clamp(area.x0, area.x1), anchor.y.clamp(area.y0, area.y1));

    let x = anchor.x.min(area.x1 - size.width).max(area.x0);
    let y = if anchor.y + size.height <= area.y1 {
        anchor.y
    } else {
        (anchor.y - size.height).max(area.y0)
    };
    Rect::from_origin_size((x, y), size)
}

/// Place a child popup next to its parent.
///
/// Opens to the right with a small overlap, mirrors to the left when the right
/// side overflows, and clamps as a last resort. The first row lines up with the
/// opening row; near the bottom edge the popup grows upward from that row.
pub fn place_beside(parent: Rect, row: Rect, size: Size, screens: &[Rect], margin: f64) -> Rect {
    let right = parent.x1 - CHILD_POPUP_OVERLAP;
    let top = row.y0 - VERTICAL_PADDING;
    let Some(screen) = screen_for(row.center(), screens) else {
        return Rect::from_origin_size((right, top), size);
    };
    let area = usable_area(screen, margin);

    let left = parent.x0 + CHILD_POPUP_OVERLAP - size.width;
    let x = if right + size.width <= area.x1 {
        right
    } else if left >= area.x0 {
        left
    } else {
        right.min(area.x1 - size.width).max(area.x0)
    };

    let y = if top + size.height <= area.y1 {
        top
    } else {
        row.y1 + VERTICAL_PADDING - size.height
    };
    let y = y.min(area.y1 - size.height).max(area.y0);
    Rect::from_origin_size((x, y), size)
}

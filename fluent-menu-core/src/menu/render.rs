//! Draw-spec building and painting
//!
//! [build_draw_spec] is a pure function of the item snapshots, the theme and
//! the text measurer. [RenderCache] memoises its result per generation and
//! [paint_menu] turns a draw spec into [Graphics] calls.

use std::rc::Rc;

use fluent_menu_theme::Theme;
use vello::kurbo::{Affine, BezPath, Line, Point, Rect, RoundedRect, Size, Stroke};
use vello::peniko::{Brush, Color, Fill};

use crate::menu::constants::*;
use crate::menu::item::{IconHandle, ItemId, ItemKind, ItemSnapshot};
use crate::menu::shadow::ShadowLayer;
use crate::platform::TextMeasure;
use crate::vgi::{shape_to_path, Graphics};

/// Geometry and content of one row, in popup-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct RowGeometry {
    /// The item this row shows.
    pub item: ItemId,
    /// Row kind.
    pub kind: ItemKind,
    /// Full-width row rectangle.
    pub rect: Rect,
    /// Pill shaped hover/selection zone. `None` for separators.
    pub hover_zone: Option<Rect>,
    /// Divider line of separator rows.
    pub separator: Option<Line>,
    /// Label.
    pub text: String,
    /// Label anchor: left end of the vertical centre line.
    pub text_origin: Point,
    /// Shortcut label.
    pub shortcut: Option<String>,
    /// Shortcut anchor, right-aligned.
    pub shortcut_origin: Option<Point>,
    /// Icon.
    pub icon: Option<IconHandle>,
    /// Icon / check mark cell, present when the menu reserves the icon column.
    pub icon_cell: Option<Rect>,
    /// Centre of the submenu chevron.
    pub disclosure: Option<Point>,
    /// Whether the row is enabled.
    pub enabled: bool,
    /// Whether the row toggles on trigger.
    pub checkable: bool,
    /// Check state at build time.
    pub checked: bool,
}

impl RowGeometry {
    /// Whether the row can be hovered, selected and triggered.
    pub fn is_selectable(&self) -> bool {
        self.enabled && self.kind != ItemKind::Separator
    }

    /// Whether the row opens a child menu.
    pub fn has_submenu(&self) -> bool {
        self.kind == ItemKind::Submenu
    }
}

/// Size and rows of a popup's content.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuLayout {
    /// Content size, shadow excluded.
    pub size: Size,
    /// Rows top to bottom.
    pub rows: Vec<RowGeometry>,
}

impl MenuLayout {
    /// The row whose hover zone contains `point` (popup-local).
    pub fn hit_test(&self, point: Point) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.hover_zone.is_some_and(|zone| zone.contains(point)))
    }
}

/// Immutable result of a build: layout plus the theme it was built with.
#[derive(Debug, Clone)]
pub struct DrawSpec {
    /// The geometry.
    pub layout: MenuLayout,
    /// Colours used when painting.
    pub theme: Rc<Theme>,
}

/// Lay out `items` with `theme`.
///
/// Identical inputs yield identical layouts.
pub fn build_draw_spec(
    items: &[ItemSnapshot],
    theme: &Rc<Theme>,
    measure: &dyn TextMeasure,
    min_width: f64,
) -> DrawSpec {
    let pad = theme.item_h_pad;
    let icon_column = items
        .iter()
        .any(|item| item.kind != ItemKind::Separator && (item.icon.is_some() || item.checkable));
    let icon_column_width = if icon_column { ICON_COLUMN_WIDTH } else { 0.0 };

    let shortcut_widths: Vec<Option<f64>> = items
        .iter()
        .map(|item| {
            item.shortcut
                .as_deref()
                .map(|s| measure.text_width(s, theme.shortcut_font_size))
        })
        .collect();

    let mut content_width = min_width;
    for (item, shortcut_width) in items.iter().zip(&shortcut_widths) {
        if item.kind == ItemKind::Separator {
            continue;
        }
        let mut extent = pad + icon_column_width + measure.text_width(&item.text, theme.font_size) + pad;
        if let Some(sw) = shortcut_width {
            extent += SHORTCUT_GAP + sw;
        }
        if item.kind == ItemKind::Submenu {
            extent += DISCLOSURE_WIDTH;
        }
        content_width = content_width.max(extent);
    }
    let width = content_width + PILL_MARGIN * 2.0;

    let label_x = PILL_MARGIN + pad + icon_column_width;
    let mut rows = Vec::with_capacity(items.len());
    let mut y = VERTICAL_PADDING;

    for (item, shortcut_width) in items.iter().zip(&shortcut_widths) {
        let height = match item.kind {
            ItemKind::Separator => SEPARATOR_HEIGHT,
            _ => theme.item_height,
        };
        let rect = Rect::new(0.0, y, width, y + height);
        let center_y = y + height / 2.0;

        let row = if item.kind == ItemKind::Separator {
            RowGeometry {
                item: item.id,
                kind: item.kind,
                rect,
                hover_zone: None,
                separator: Some(Line::new((pad, center_y), (width - pad, center_y))),
                text: String::new(),
                text_origin: Point::new(label_x, center_y),
                shortcut: None,
                shortcut_origin: None,
                icon: None,
                icon_cell: None,
                disclosure: None,
                enabled: false,
                checkable: false,
                checked: false,
            }
        } else {
            let trailing = if item.kind == ItemKind::Submenu { DISCLOSURE_WIDTH } else { 0.0 };
            let icon_cell = icon_column.then(|| {
                Rect::from_center_size(
                    (PILL_MARGIN + pad + theme.icon_size / 2.0, center_y),
                    (theme.icon_size, theme.icon_size),
                )
            });
            RowGeometry {
                item: item.id,
                kind: item.kind,
                rect,
                hover_zone: Some(Rect::new(PILL_MARGIN, y, width - PILL_MARGIN, y + height)),
                separator: None,
                text: item.text.clone(),
                text_origin: Point::new(label_x, center_y),
                shortcut: item.shortcut.clone(),
                shortcut_origin: shortcut_width
                    .map(|sw| Point::new(width - PILL_MARGIN - pad - trailing - sw, center_y)),
                icon: item.icon,
                icon_cell,
                disclosure: (item.kind == ItemKind::Submenu)
                    .then(|| Point::new(width - PILL_MARGIN - pad - ARROW_SIZE, center_y)),
                enabled: item.enabled,
                checkable: item.checkable,
                checked: item.checked,
            }
        };
        rows.push(row);
        y += height;
    }

    DrawSpec {
        layout: MenuLayout {
            size: Size::new(width, y + VERTICAL_PADDING),
            rows,
        },
        theme: theme.clone(),
    }
}

/// Generation-counted cache of one surface's [DrawSpec].
///
/// A build is skipped while the generation it was made for is current.
#[derive(Debug, Default)]
pub struct RenderCache {
    generation: u64,
    built: Option<(u64, Rc<DrawSpec>)>,
    build_count: u64,
}

impl RenderCache {
    /// An empty, dirty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation. Bumped by every [RenderCache::invalidate].
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Drop the cached draw spec and force the next build to recompute.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.built = None;
        log::trace!("render cache invalidated, generation {}", self.generation);
    }

    /// Whether the next [RenderCache::build] will recompute.
    pub fn is_dirty(&self) -> bool {
        !matches!(&self.built, Some((generation, _)) if *generation == self.generation)
    }

    /// The cached spec, or a fresh one if the cache is dirty.
    pub fn build(
        &mut self,
        items: &[ItemSnapshot],
        theme: &Rc<Theme>,
        measure: &dyn TextMeasure,
        min_width: f64,
    ) -> Rc<DrawSpec> {
        if let Some((generation, spec)) = &self.built {
            if *generation == self.generation {
                return spec.clone();
            }
        }
        let spec = Rc::new(build_draw_spec(items, theme, measure, min_width));
        self.build_count += 1;
        log::debug!(
            "built draw spec: {} rows, {:.0}x{:.0}, generation {}",
            spec.layout.rows.len(),
            spec.layout.size.width,
            spec.layout.size.height,
            self.generation
        );
        self.built = Some((self.generation, spec.clone()));
        spec
    }

    /// How many times a draw spec was actually built.
    pub fn build_count(&self) -> u64 {
        self.build_count
    }
}

/// Paint a popup: shadow, body, then rows.
///
/// `transform` maps popup-local coordinates to the target. `highlight` is the
/// hovered or selected row; with `pressed` it gets the pressed fill.
pub fn paint_menu(
    graphics: &mut dyn Graphics,
    spec: &DrawSpec,
    shadow: &[ShadowLayer],
    transform: Affine,
    highlight: Option<usize>,
    pressed: bool,
) {
    let theme = &spec.theme;

    for layer in shadow.iter().rev() {
        let ring = RoundedRect::from_rect(layer.rect, layer.radius);
        fill(graphics, transform, theme.shadow.with_alpha(layer.alpha), &shape_to_path(&ring));
    }

    let body = Rect::from_origin_size(Point::ZERO, spec.layout.size);
    fill(
        graphics,
        transform,
        theme.background,
        &shape_to_path(&RoundedRect::from_rect(body, theme.corner_radius)),
    );
    let half = BORDER_STROKE_WIDTH / 2.0;
    let outline = RoundedRect::from_rect(body.inset(-half), theme.corner_radius - half);
    stroke(graphics, transform, theme.border, BORDER_STROKE_WIDTH, &shape_to_path(&outline));

    for (index, row) in spec.layout.rows.iter().enumerate() {
        if let Some(line) = row.separator {
            stroke(graphics, transform, theme.separator, 1.0, &shape_to_path(&line));
            continue;
        }

        if highlight == Some(index) && row.is_selectable() {
            if let Some(zone) = row.hover_zone {
                let color = if pressed { theme.pressed_fill } else { theme.hover_fill };
                let pill = RoundedRect::from_rect(zone, theme.item_radius);
                fill(graphics, transform, color, &shape_to_path(&pill));
            }
        }

        let fg = if row.enabled { theme.text } else { theme.text_disabled };

        if let Some(cell) = row.icon_cell {
            if row.checkable && row.checked {
                let color = if row.enabled { theme.check_mark } else { theme.text_disabled };
                stroke(graphics, transform, color, CHECK_STROKE_WIDTH, &check_mark(cell.center()));
            } else if let Some(icon) = row.icon {
                let tint = if row.enabled { theme.icon_tint } else { theme.text_disabled };
                graphics.draw_icon(icon, transform.transform_rect_bbox(cell), tint);
            }
        }

        graphics.draw_text(&row.text, transform * row.text_origin, theme.font_size, fg);

        if let (Some(shortcut), Some(origin)) = (&row.shortcut, row.shortcut_origin) {
            let color = if row.enabled { theme.shortcut_text } else { theme.text_disabled };
            graphics.draw_text(shortcut, transform * origin, theme.shortcut_font_size, color);
        }

        if let Some(center) = row.disclosure {
            stroke(graphics, transform, fg, 1.0, &chevron(center));
        }
    }
}

fn fill(graphics: &mut dyn Graphics, transform: Affine, color: Color, path: &BezPath) {
    graphics.fill(Fill::NonZero, transform, &Brush::Solid(color), None, path);
}

fn stroke(graphics: &mut dyn Graphics, transform: Affine, color: Color, width: f64, path: &BezPath) {
    graphics.stroke(&Stroke::new(width), transform, &Brush::Solid(color), None, path);
}

fn check_mark(center: Point) -> BezPath {
    let mut path = BezPath::new();
    path.move_to((center.x - 4.0, center.y));
    path.line_to((center.x - 1.0, center.y + 3.0));
    path.line_to((center.x + 4.0, center.y - 3.5));
    path
}

fn chevron(center: Point) -> BezPath {
    let half = ARROW_SIZE / 2.0;
    let mut path = BezPath::new();
    path.move_to((center.x - half, center.y - ARROW_SIZE));
    path.line_to((center.x + half, center.y));
    path.line_to((center.x - half, center.y + ARROW_SIZE));
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::item::{ItemModel, NewItem};
    use crate::platform::EstimatedTextMeasure;
    use crate::vgi::DisplayList;

    fn model() -> ItemModel<()> {
        let mut model = ItemModel::new();
        model.push(NewItem::new("Cut").with_shortcut("Ctrl+X"));
        model.push(NewItem::new("Copy").with_shortcut("Ctrl+C"));
        model.push_separator();
        model.push(NewItem::new("Paste").with_enabled(false));
        model.push_submenu("More", ());
        model
    }

    fn build(model: &ItemModel<()>, theme: &Rc<Theme>) -> DrawSpec {
        build_draw_spec(&model.snapshots(), theme, &EstimatedTextMeasure, MIN_WIDTH)
    }

    #[test]
    fn rows_stack_top_to_bottom() {
        let theme = Rc::new(Theme::light());
        let spec = build(&model(), &theme);
        let rows = &spec.layout.rows;
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].rect.y0, VERTICAL_PADDING);
        for pair in rows.windows(2) {
            assert!(pair[1].rect.y0 > pair[0].rect.y0);
            assert_eq!(pair[1].rect.y0, pair[0].rect.y1);
        }
        assert_eq!(rows[2].rect.height(), SEPARATOR_HEIGHT);
        assert_eq!(
            spec.layout.size.height,
            4.0 * theme.item_height + SEPARATOR_HEIGHT + 2.0 * VERTICAL_PADDING
        );
    }

    #[test]
    fn disabled_rows_are_laid_out_but_not_selectable() {
        let spec = build(&model(), &Rc::new(Theme::light()));
        let paste = &spec.layout.rows[3];
        assert_eq!(paste.text, "Paste");
        assert!(paste.hover_zone.is_some());
        assert!(!paste.is_selectable());
        assert!(spec.layout.rows[2].hover_zone.is_none());
    }

    #[test]
    fn building_twice_is_identical() {
        let model = model();
        let theme = Rc::new(Theme::dark());
        assert_eq!(build(&model, &theme).layout, build(&model, &theme).layout);
    }

    #[test]
    fn width_respects_minimum_and_long_labels() {
        let theme = Rc::new(Theme::light());
        let mut short: ItemModel<()> = ItemModel::new();
        short.push("Ok");
        assert_eq!(build(&short, &theme).layout.size.width, MIN_WIDTH + 2.0 * PILL_MARGIN);

        let mut long: ItemModel<()> = ItemModel::new();
        long.push("An unusually long label that will not fit in the minimum width");
        assert!(build(&long, &theme).layout.size.width > MIN_WIDTH + 2.0 * PILL_MARGIN);
    }

    #[test]
    fn hover_zone_is_an_inset_pill() {
        let spec = build(&model(), &Rc::new(Theme::light()));
        let row = &spec.layout.rows[0];
        let zone = row.hover_zone.unwrap();
        assert_eq!(zone.x0, PILL_MARGIN);
        assert_eq!(zone.x1, row.rect.x1 - PILL_MARGIN);

        let inside = Point::new(zone.center().x, zone.center().y);
        assert_eq!(spec.layout.hit_test(inside), Some(0));
        assert_eq!(spec.layout.hit_test(Point::new(1.0, inside.y)), None);
        let separator = spec.layout.rows[2].rect.center();
        assert_eq!(spec.layout.hit_test(separator), None);
    }

    #[test]
    fn submenu_rows_reserve_the_chevron() {
        let spec = build(&model(), &Rc::new(Theme::light()));
        let more = &spec.layout.rows[4];
        let chevron = more.disclosure.unwrap();
        assert!(chevron.x > more.text_origin.x);
        assert!(chevron.x < more.rect.x1 - PILL_MARGIN);
        assert!(spec.layout.rows[0].disclosure.is_none());
    }

    #[test]
    fn checkable_rows_reserve_the_icon_column() {
        let theme = Rc::new(Theme::light());
        let mut plain: ItemModel<()> = ItemModel::new();
        plain.push("Wrap");
        let mut checkable: ItemModel<()> = ItemModel::new();
        checkable.push(NewItem::new("Wrap").with_checkable(true));

        let plain = build(&plain, &theme);
        let checkable = build(&checkable, &theme);
        assert!(plain.layout.rows[0].icon_cell.is_none());
        assert!(checkable.layout.rows[0].icon_cell.is_some());
        assert_eq!(
            checkable.layout.rows[0].text_origin.x - plain.layout.rows[0].text_origin.x,
            ICON_COLUMN_WIDTH
        );
    }

    #[test]
    fn cache_skips_builds_until_invalidated() {
        let model = model();
        let theme = Rc::new(Theme::light());
        let mut cache = RenderCache::new();
        assert!(cache.is_dirty());

        let first = cache.build(&model.snapshots(), &theme, &EstimatedTextMeasure, MIN_WIDTH);
        let second = cache.build(&model.snapshots(), &theme, &EstimatedTextMeasure, MIN_WIDTH);
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(cache.build_count(), 1);
        assert!(!cache.is_dirty());

        let generation = cache.generation();
        cache.invalidate();
        assert_eq!(cache.generation(), generation + 1);
        assert!(cache.is_dirty());
        let third = cache.build(&model.snapshots(), &theme, &EstimatedTextMeasure, MIN_WIDTH);
        assert!(!Rc::ptr_eq(&first, &third));
        assert_eq!(first.layout, third.layout);
        assert_eq!(cache.build_count(), 2);
    }

    #[test]
    fn painting_uses_theme_colours() {
        let theme = Rc::new(Theme::dark());
        let spec = build(&model(), &theme);
        let mut list = DisplayList::new();
        paint_menu(&mut list, &spec, &[], Affine::IDENTITY, Some(0), false);

        let fills: Vec<_> = list.fill_colors().iter().map(|c| c.to_rgba8()).collect();
        assert!(fills.contains(&theme.background.to_rgba8()));
        assert!(fills.contains(&theme.hover_fill.to_rgba8()));
        assert_eq!(list.texts(), vec!["Cut", "Ctrl+X", "Copy", "Ctrl+C", "Paste", "More"]);
        assert_eq!(
            list.text_color("Paste").map(|c| c.to_rgba8()),
            Some(theme.text_disabled.to_rgba8())
        );
    }

    #[test]
    fn pressed_row_uses_pressed_fill_and_disabled_rows_never_highlight() {
        let theme = Rc::new(Theme::light());
        let spec = build(&model(), &theme);

        let mut list = DisplayList::new();
        paint_menu(&mut list, &spec, &[], Affine::IDENTITY, Some(1), true);
        let fills: Vec<_> = list.fill_colors().iter().map(|c| c.to_rgba8()).collect();
        assert!(fills.contains(&theme.pressed_fill.to_rgba8()));

        let mut list = DisplayList::new();
        paint_menu(&mut list, &spec, &[], Affine::IDENTITY, Some(3), false);
        assert_eq!(list.fill_colors().len(), 1);
    }
}

//! Hover and keyboard selection
//!
//! One popup has one [InteractionState]. [transition] is pure: it maps a state
//! and an input to the next state plus the [Effect]s the owner has to carry
//! out (repaint, dwell timers, opening children, triggering, closing).

use winit::keyboard::{Key, NamedKey};

use crate::menu::render::MenuLayout;

/// Which row is highlighted and why. Hover and keyboard selection exclude each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    /// Nothing highlighted.
    #[default]
    None,
    /// Highlighted by the pointer.
    Hovered(usize),
    /// Highlighted by keyboard navigation.
    Keyboard(usize),
}

impl Selection {
    /// The highlighted row.
    pub fn row(self) -> Option<usize> {
        match self {
            Self::None => None,
            Self::Hovered(row) | Self::Keyboard(row) => Some(row),
        }
    }
}

/// Keys a menu reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuKey {
    /// Previous selectable row.
    Up,
    /// Next selectable row.
    Down,
    /// Back to the parent menu.
    Left,
    /// Into the selected submenu.
    Right,
    /// Trigger.
    Enter,
    /// Trigger.
    Space,
    /// Close the innermost popup.
    Escape,
}

impl MenuKey {
    /// Map a winit logical key.
    pub fn from_winit(key: &Key) -> Option<Self> {
        match key {
            Key::Named(NamedKey::ArrowUp) => Some(Self::Up),
            Key::Named(NamedKey::ArrowDown) => Some(Self::Down),
            Key::Named(NamedKey::ArrowLeft) => Some(Self::Left),
            Key::Named(NamedKey::ArrowRight) => Some(Self::Right),
            Key::Named(NamedKey::Enter) => Some(Self::Enter),
            Key::Named(NamedKey::Space) => Some(Self::Space),
            Key::Named(NamedKey::Escape) => Some(Self::Escape),
            Key::Character(c) if c.as_str() == " " => Some(Self::Space),
            _ => None,
        }
    }
}

/// Input to a single popup, already hit-tested against its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupInput {
    /// The pointer moved over the popup; the row under it, if any.
    PointerMoved(Option<usize>),
    /// The pointer left the popup.
    PointerLeft,
    /// A button went down over the popup.
    PointerPressed(Option<usize>),
    /// A button went up over the popup.
    PointerReleased(Option<usize>),
    /// A key press.
    Key(MenuKey),
}

/// What the state machine needs to know about a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowInfo {
    /// Enabled and not a separator.
    pub selectable: bool,
    /// Opens a child menu.
    pub has_submenu: bool,
}

impl RowInfo {
    /// Row information of a built layout.
    pub fn from_layout(layout: &MenuLayout) -> Vec<Self> {
        layout
            .rows
            .iter()
            .map(|row| Self {
                selectable: row.is_selectable(),
                has_submenu: row.has_submenu(),
            })
            .collect()
    }
}

/// Where the popup sits in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavContext {
    /// The popup is a submenu.
    pub has_parent: bool,
    /// Row whose child popup is currently open.
    pub open_child: Option<usize>,
}

/// Side effects requested by [transition].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// The highlight changed.
    Repaint,
    /// Start the dwell timer to open the child of this row.
    ScheduleOpen(usize),
    /// Start the dwell timer to close the open child.
    ScheduleCloseChild,
    /// Cancel any pending dwell.
    CancelDwell,
    /// Open the child of `row` now, optionally selecting its first row.
    OpenSubmenu {
        /// The submenu row.
        row: usize,
        /// Move keyboard selection into the child.
        select_first: bool,
    },
    /// Trigger `row`.
    Trigger(usize),
    /// Close this popup and give the selection back to the parent.
    CloseSelf,
    /// Close the whole chain.
    CloseChain,
}

/// Selection plus the row under a pointer press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractionState {
    /// Highlighted row.
    pub selection: Selection,
    /// Row a button went down on, until release.
    pub pressed: Option<usize>,
}

/// Next selectable row after `current`, wrapping around. `None` if nothing is selectable.
pub fn find_next_selectable(rows: &[RowInfo], current: Option<usize>, forward: bool) -> Option<usize> {
    let len = rows.len();
    if len == 0 {
        return None;
    }
    let start = match current {
        Some(idx) if forward => (idx + 1) % len,
        Some(idx) => (idx + len - 1) % len,
        None if forward => 0,
        None => len - 1,
    };
    let mut idx = start;
    for _ in 0..len {
        if rows[idx].selectable {
            return Some(idx);
        }
        idx = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
    }
    None
}

fn selectable(rows: &[RowInfo], row: usize) -> bool {
    rows.get(row).is_some_and(|r| r.selectable)
}

fn has_submenu(rows: &[RowInfo], row: usize) -> bool {
    rows.get(row).is_some_and(|r| r.selectable && r.has_submenu)
}

/// Advance the state machine by one input.
pub fn transition(
    state: InteractionState,
    input: PopupInput,
    rows: &[RowInfo],
    ctx: NavContext,
) -> (InteractionState, Vec<Effect>) {
    let mut next = state;
    let mut effects = Vec::new();

    match input {
        PopupInput::PointerMoved(Some(row)) if selectable(rows, row) => {
            if state.selection == Selection::Hovered(row) {
                return (state, effects);
            }
            next.selection = Selection::Hovered(row);
            effects.push(Effect::Repaint);
            if ctx.open_child == Some(row) {
                effects.push(Effect::CancelDwell);
            } else if has_submenu(rows, row) {
                effects.push(Effect::ScheduleOpen(row));
            } else if ctx.open_child.is_some() {
                effects.push(Effect::ScheduleCloseChild);
            } else {
                effects.push(Effect::CancelDwell);
            }
        },
        PopupInput::PointerMoved(_) => {
            if let Selection::Hovered(_) = state.selection {
                next.selection = Selection::None;
                effects.push(Effect::Repaint);
                effects.push(Effect::CancelDwell);
            }
        },
        PopupInput::PointerLeft => {
            next.pressed = None;
            // While a child is open its row stays lit.
            next.selection = match (state.selection, ctx.open_child) {
                (_, Some(child)) => Selection::Hovered(child),
                (Selection::Keyboard(row), None) => Selection::Keyboard(row),
                _ => Selection::None,
            };
            if next != state {
                effects.push(Effect::Repaint);
            }
            effects.push(Effect::CancelDwell);
        },
        PopupInput::PointerPressed(Some(row)) if selectable(rows, row) => {
            next.pressed = Some(row);
            next.selection = Selection::Hovered(row);
            effects.push(Effect::Repaint);
        },
        PopupInput::PointerPressed(_) => {
            next.pressed = None;
        },
        PopupInput::PointerReleased(hit) => {
            next.pressed = None;
            match (state.pressed, hit) {
                (Some(pressed), Some(row)) if pressed == row && selectable(rows, row) => {
                    effects.push(Effect::Repaint);
                    if has_submenu(rows, row) {
                        effects.push(Effect::CancelDwell);
                        if ctx.open_child != Some(row) {
                            effects.push(Effect::OpenSubmenu {
                                row,
                                select_first: false,
                            });
                        }
                    } else {
                        effects.push(Effect::Trigger(row));
                    }
                },
                (Some(_), _) => effects.push(Effect::Repaint),
                _ => {},
            }
        },
        PopupInput::Key(key) => {
            let current = state.selection.row();
            match key {
                MenuKey::Down | MenuKey::Up => {
                    let forward = key == MenuKey::Down;
                    if let Some(row) = find_next_selectable(rows, current, forward) {
                        next.selection = Selection::Keyboard(row);
                        effects.push(Effect::Repaint);
                        effects.push(Effect::CancelDwell);
                    }
                },
                MenuKey::Right => {
                    if let Some(row) = current.filter(|&row| has_submenu(rows, row)) {
                        next.selection = Selection::Keyboard(row);
                        effects.push(Effect::CancelDwell);
                        effects.push(Effect::OpenSubmenu {
                            row,
                            select_first: true,
                        });
                    }
                },
                MenuKey::Left => {
                    if ctx.has_parent {
                        effects.push(Effect::CancelDwell);
                        effects.push(Effect::CloseSelf);
                    }
                },
                MenuKey::Enter | MenuKey::Space => {
                    if let Some(row) = current.filter(|&row| selectable(rows, row)) {
                        effects.push(Effect::CancelDwell);
                        if has_submenu(rows, row) {
                            effects.push(Effect::OpenSubmenu {
                                row,
                                select_first: true,
                            });
                        } else {
                            effects.push(Effect::Trigger(row));
                        }
                    }
                },
                MenuKey::Escape => {
                    effects.push(Effect::CancelDwell);
                    effects.push(if ctx.has_parent {
                        Effect::CloseSelf
                    } else {
                        Effect::CloseChain
                    });
                },
            }
        },
    }

    if next.selection != state.selection {
        log::trace!("selection {:?} -> {:?}", state.selection, next.selection);
    }
    (next, effects)
}

/// Owns the [InteractionState] of one popup.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: InteractionState,
}

impl InteractionController {
    /// Nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Current selection.
    pub fn selection(&self) -> Selection {
        self.state.selection
    }

    /// Row under a pointer press.
    pub fn pressed(&self) -> Option<usize> {
        self.state.pressed
    }

    /// Feed one input, returning the effects to carry out.
    pub fn handle(&mut self, input: PopupInput, rows: &[RowInfo], ctx: NavContext) -> Vec<Effect> {
        let (next, effects) = transition(self.state, input, rows, ctx);
        self.state = next;
        effects
    }

    /// Keyboard-select `row` if it is selectable. Used when entering a child
    /// or returning to a parent.
    pub fn select(&mut self, row: usize, rows: &[RowInfo]) -> bool {
        if !selectable(rows, row) {
            return false;
        }
        self.state.selection = Selection::Keyboard(row);
        true
    }

    /// Keyboard-select the first selectable row.
    pub fn select_first(&mut self, rows: &[RowInfo]) -> bool {
        match find_next_selectable(rows, None, true) {
            Some(row) => self.select(row, rows),
            None => false,
        }
    }

    /// Forget selection and press, as on close.
    pub fn reset(&mut self) {
        self.state = InteractionState::default();
    }
}

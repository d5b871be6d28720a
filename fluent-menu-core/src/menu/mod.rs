//! Popup menu machinery
//!
//! Leaves first: [item] holds what the caller put into a menu, [render] turns it
//! into a cached [DrawSpec](render::DrawSpec), [shadow] computes the drop shadow,
//! [surface] owns one popup window's lifecycle and placement, [interaction] is
//! the selection state machine and [submenu] coordinates child popups.

use bitflags::bitflags;

/// Layout constants.
pub mod constants;

/// Trigger notification fan-out.
pub mod dispatch;

/// Pointer and keyboard selection state machine.
pub mod interaction;

/// Item descriptors and the ordered item model.
pub mod item;

/// Draw-spec building, caching and painting.
pub mod render;

/// Layered drop shadow.
pub mod shadow;

/// Hover dwell timing and parent/child bookkeeping.
pub mod submenu;

/// Popup surface lifecycle and placement.
pub mod surface;

bitflags! {
    /// What the host has to do after feeding an event to a menu.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Update: u8 {
        /// At least one open popup needs to be repainted.
        const DRAW = 0b01;
        /// The menu chain closed completely.
        const CLOSED = 0b10;
    }
}

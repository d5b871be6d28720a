#![warn(missing_docs)]

//! Core library for fluent-menu => See `fluent-menu` crate.
//!
//! Contains the item model, the draw-spec cache, popup surfaces and the
//! interaction state machines. Windows, input delivery and text shaping are
//! the host's business and reach this crate through [platform].

pub use vello as vg;

/// Contains useful types for interacting with winit.
pub mod window {
    pub use winit::keyboard::*;
}

/// Contains the [MenuConfig](config::MenuConfig) struct.
pub mod config;

/// Contains the popup menu machinery.
pub mod menu;

/// Contains the traits a host implements to display popups.
pub mod platform;

/// Contains the vector graphics interface abstraction.
pub mod vgi;

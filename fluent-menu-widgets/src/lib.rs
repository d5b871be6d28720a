#![warn(missing_docs)]

//! Widget library for fluent-menu => See `fluent-menu` crate.
//!
//! Contains the [ContextMenu](context_menu::ContextMenu) popup tree.

/// Contains the [context_menu::ContextMenu] widget.
pub mod context_menu;

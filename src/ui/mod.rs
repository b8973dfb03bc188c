//! User Interface Module
//!
//! Rendering for the snippet detail view. Layout and widgets live here; all
//! state changes go through the app and the detail panel.

pub mod colors;
pub mod components;
pub mod editor;
pub mod snippet_detail;

//! Event Handling Module
//!
//! This module connects the terminal to the snippet detail panel: keyboard
//! input, and the host-side implementations of the panel's clipboard and
//! notification seams.
//!
//! # Module Organization
//!
//! - **`keys`**: Keyboard input processing per input mode
//! - **`notices`**: Notifier that queues toasts and confirm prompts for the app
//! - **`clipboard`**: System clipboard through the platform copy tool

pub mod clipboard;
pub mod keys;
pub mod notices;

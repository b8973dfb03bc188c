//! Snippet Detail Module
//!
//! Headless detail/edit panel for one multi-file snippet. The panel owns the
//! edit session (working copy, selected file, pending focus) and talks to the
//! outside world only through the collaborator traits in [`collaborators`].
//!
//! # Module Organization
//!
//! - **`panel`**: edit-session state machine and file list operations
//! - **`collaborators`**: store, editor, clipboard, notifier and mode lookup seams
//! - **`events`**: typed publish/subscribe bus shared with the host
//! - **`mode`**: the single syntax-mode application rule and a syntect lookup

pub mod collaborators;
pub mod error;
pub mod events;
pub mod mode;
pub mod panel;

#[cfg(test)]
pub(crate) mod fakes;

pub use collaborators::{
    ClipboardService, Confirmation, EditorOption, EditorSurface, ModeInfo, ModeLookup, Notifier,
    SnippetStore, SyntaxMode,
};
pub use error::DetailError;
pub use events::{EventBus, Subscription, Topic};
pub use mode::SyntectModeLookup;
pub use panel::{
    Deletion, DeletionTarget, EditSession, Focus, PanelServices, PendingDeletion, SaveOutcome,
    SnippetDetailPanel,
};

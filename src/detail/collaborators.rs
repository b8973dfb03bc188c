//! Interfaces the detail panel talks to.
//!
//! The panel never reaches for globals: the store, the editor surface, the
//! clipboard, notifications and syntax lookup are all handed to it when it is
//! mounted, so hosts and tests can swap any of them.

use crate::models::Snippet;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::oneshot;
use uuid::Uuid;

/// Owner of the snippet list and of the "currently selected snippet" pointer.
pub trait SnippetStore {
    fn snippets(&self) -> &[Snippet];
    fn selected_snippet(&self) -> Option<&Snippet>;
    fn select_snippet(&mut self, id: Option<Uuid>);
    fn update_snippet(&mut self, snippet: Snippet) -> anyhow::Result<()>;
    fn delete_snippet(&mut self, snippet: &Snippet) -> anyhow::Result<()>;
    fn increase_copy_time(&mut self, snippet: &Snippet) -> anyhow::Result<()>;
}

/// Syntax mode applied to the editor surface.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyntaxMode {
    /// No highlighting, spelled `"null"` by editors
    #[default]
    Plain,
    Language(String),
}

impl SyntaxMode {
    pub fn id(&self) -> &str {
        match self {
            SyntaxMode::Plain => "null",
            SyntaxMode::Language(id) => id,
        }
    }
}

impl fmt::Display for SyntaxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorOption {
    ReadOnly(bool),
    Mode(SyntaxMode),
    HtmlMode(bool),
}

/// A mounted text surface bound to one file's content.
pub trait EditorSurface {
    fn value(&self) -> String;
    fn set_value(&mut self, text: &str);
    fn set_option(&mut self, option: EditorOption);
    /// Re-layout hook, called when the surrounding chrome changes size
    fn apply_editor_style(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeInfo {
    pub mode: String,
    /// HTML-like content that wants the editor's markup handling
    pub markup: bool,
}

/// Resolves file extensions or human language names to syntax modes.
pub trait ModeLookup {
    fn by_extension(&self, extension: &str) -> Option<ModeInfo>;
    fn by_name(&self, name: &str) -> Option<ModeInfo>;
}

pub trait ClipboardService {
    fn set(&mut self, text: &str) -> anyhow::Result<()>;
}

/// Answer to a yes/no question that may still be waiting on the user.
///
/// A reply channel that is dropped before answering resolves to `false`.
pub struct Confirmation(BoxFuture<'static, bool>);

impl Confirmation {
    pub fn ready(answer: bool) -> Self {
        Self(Box::pin(futures::future::ready(answer)))
    }

    pub fn from_reply(reply: oneshot::Receiver<bool>) -> Self {
        Self(Box::pin(async move { reply.await.unwrap_or(false) }))
    }
}

impl Future for Confirmation {
    type Output = bool;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<bool> {
        self.0.as_mut().poll(cx)
    }
}

impl fmt::Debug for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Confirmation { .. }")
    }
}

pub trait Notifier {
    fn info(&self, message: &str, auto_close: Option<Duration>);
    fn error(&self, message: &str);
    fn confirm(&self, message: &str) -> Confirmation;
}

//! Recording collaborators for panel tests.

use crate::config::UiConfig;
use crate::detail::collaborators::{
    ClipboardService, Confirmation, EditorOption, EditorSurface, ModeInfo, ModeLookup, Notifier,
    SnippetStore, SyntaxMode,
};
use crate::detail::events::EventBus;
use crate::detail::panel::{PanelServices, SnippetDetailPanel};
use crate::models::Snippet;
use anyhow::anyhow;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Update(Snippet),
    Delete(Uuid),
    IncreaseCopy(Uuid),
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    pub snippets: Vec<Snippet>,
    pub selected: Option<Uuid>,
    pub calls: Vec<StoreCall>,
    pub fail_updates: Rc<Cell<bool>>,
}

impl SnippetStore for MemoryStore {
    fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }

    fn selected_snippet(&self) -> Option<&Snippet> {
        let id = self.selected?;
        self.snippets.iter().find(|s| s.id == id)
    }

    fn select_snippet(&mut self, id: Option<Uuid>) {
        self.selected = id;
    }

    fn update_snippet(&mut self, snippet: Snippet) -> anyhow::Result<()> {
        if self.fail_updates.get() {
            return Err(anyhow!("disk full"));
        }
        self.calls.push(StoreCall::Update(snippet.clone()));
        if let Some(slot) = self.snippets.iter_mut().find(|s| s.id == snippet.id) {
            *slot = snippet;
        }
        Ok(())
    }

    fn delete_snippet(&mut self, snippet: &Snippet) -> anyhow::Result<()> {
        self.calls.push(StoreCall::Delete(snippet.id));
        self.snippets.retain(|s| s.id != snippet.id);
        Ok(())
    }

    fn increase_copy_time(&mut self, snippet: &Snippet) -> anyhow::Result<()> {
        self.calls.push(StoreCall::IncreaseCopy(snippet.id));
        if let Some(slot) = self.snippets.iter_mut().find(|s| s.id == snippet.id) {
            slot.copy_count += 1;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FakeEditor {
    pub value: String,
    pub read_only: bool,
    pub mode: SyntaxMode,
    pub html_mode: bool,
    pub style_passes: usize,
}

impl EditorSurface for FakeEditor {
    fn value(&self) -> String {
        self.value.clone()
    }

    fn set_value(&mut self, text: &str) {
        self.value = text.to_string();
    }

    fn set_option(&mut self, option: EditorOption) {
        match option {
            EditorOption::ReadOnly(flag) => self.read_only = flag,
            EditorOption::Mode(mode) => self.mode = mode,
            EditorOption::HtmlMode(flag) => self.html_mode = flag,
        }
    }

    fn apply_editor_style(&mut self) {
        self.style_passes += 1;
    }
}

pub struct FakeModes;

impl ModeLookup for FakeModes {
    fn by_extension(&self, extension: &str) -> Option<ModeInfo> {
        let (mode, markup) = match extension {
            "py" => ("Python", false),
            "rs" => ("Rust", false),
            "html" => ("HTML", true),
            _ => return None,
        };
        Some(ModeInfo {
            mode: mode.to_string(),
            markup,
        })
    }

    fn by_name(&self, name: &str) -> Option<ModeInfo> {
        match name.to_lowercase().as_str() {
            "python" => self.by_extension("py"),
            "rust" => self.by_extension("rs"),
            "html" => self.by_extension("html"),
            _ => None,
        }
    }
}

#[derive(Default)]
struct RecordingClipboard(Rc<RefCell<Vec<String>>>);

impl ClipboardService for RecordingClipboard {
    fn set(&mut self, text: &str) -> anyhow::Result<()> {
        self.0.borrow_mut().push(text.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiNotice {
    Info(String, Option<Duration>),
    Error(String),
    Confirm(String),
}

type Replies = Rc<RefCell<Vec<oneshot::Sender<bool>>>>;

enum Answer {
    Immediate(bool),
    Deferred(Replies),
}

struct RecordingNotifier {
    log: Rc<RefCell<Vec<UiNotice>>>,
    answer: Answer,
}

impl Notifier for RecordingNotifier {
    fn info(&self, message: &str, auto_close: Option<Duration>) {
        self.log
            .borrow_mut()
            .push(UiNotice::Info(message.to_string(), auto_close));
    }

    fn error(&self, message: &str) {
        self.log
            .borrow_mut()
            .push(UiNotice::Error(message.to_string()));
    }

    fn confirm(&self, message: &str) -> Confirmation {
        self.log
            .borrow_mut()
            .push(UiNotice::Confirm(message.to_string()));
        match &self.answer {
            Answer::Immediate(answer) => Confirmation::ready(*answer),
            Answer::Deferred(replies) => {
                let (tx, rx) = oneshot::channel();
                replies.borrow_mut().push(tx);
                Confirmation::from_reply(rx)
            }
        }
    }
}

pub struct Harness {
    pub panel: SnippetDetailPanel<MemoryStore, FakeEditor>,
    pub bus: EventBus,
    notices: Rc<RefCell<Vec<UiNotice>>>,
    clipboard: Rc<RefCell<Vec<String>>>,
    replies: Replies,
    fail_updates: Rc<Cell<bool>>,
}

impl Harness {
    pub fn new(snippet: Snippet) -> Self {
        Self::build(vec![snippet], UiConfig::default(), Some(true))
    }

    pub fn with_answer(snippet: Snippet, answer: bool) -> Self {
        Self::build(vec![snippet], UiConfig::default(), Some(answer))
    }

    pub fn with_config(snippet: Snippet, config: UiConfig) -> Self {
        Self::build(vec![snippet], config, Some(true))
    }

    pub fn with_pending_replies(snippet: Snippet) -> Self {
        Self::build(vec![snippet], UiConfig::default(), None)
    }

    pub fn with_snippets(snippets: Vec<Snippet>) -> Self {
        Self::build(snippets, UiConfig::default(), Some(true))
    }

    fn build(snippets: Vec<Snippet>, config: UiConfig, answer: Option<bool>) -> Self {
        let bus = EventBus::new();
        let notices = Rc::new(RefCell::new(Vec::new()));
        let clipboard = Rc::new(RefCell::new(Vec::new()));
        let replies: Replies = Rc::new(RefCell::new(Vec::new()));
        let fail_updates = Rc::new(Cell::new(false));

        let store = MemoryStore {
            selected: snippets.first().map(|s| s.id),
            snippets,
            calls: Vec::new(),
            fail_updates: fail_updates.clone(),
        };
        let answer = match answer {
            Some(answer) => Answer::Immediate(answer),
            None => Answer::Deferred(replies.clone()),
        };
        let services = PanelServices {
            clipboard: Box::new(RecordingClipboard(clipboard.clone())),
            notifier: Box::new(RecordingNotifier {
                log: notices.clone(),
                answer,
            }),
            modes: Arc::new(FakeModes),
            bus: bus.clone(),
            config,
        };

        Self {
            panel: SnippetDetailPanel::mount(store, FakeEditor::default(), services),
            bus,
            notices,
            clipboard,
            replies,
            fail_updates,
        }
    }

    pub fn notices(&self) -> Vec<UiNotice> {
        self.notices.borrow().clone()
    }

    pub fn clipboard(&self) -> Vec<String> {
        self.clipboard.borrow().clone()
    }

    pub fn answer_next(&self, answer: bool) {
        let reply = self.replies.borrow_mut().remove(0);
        let _ = reply.send(answer);
    }

    pub fn drop_replies(&self) {
        self.replies.borrow_mut().clear();
    }

    pub fn fail_store_updates(&self) {
        self.fail_updates.set(true);
    }
}

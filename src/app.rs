use crate::config::Config;
use crate::detail::{
    ClipboardService, DetailError, EventBus, Focus, PanelServices, PendingDeletion,
    SnippetDetailPanel, SnippetStore, Subscription, SyntectModeLookup, Topic,
};
use crate::handlers::clipboard::SystemClipboard;
use crate::handlers::notices::{Notice, StatusNotifier};
use crate::models::{JsonSnippetStore, parse_tags};
use crate::ui::editor::TerminalEditor;
use crate::ui::snippet_detail;
use flume::Receiver;
use ratatui::Frame;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;

pub type DetailPanel = SnippetDetailPanel<JsonSnippetStore, TerminalEditor>;

const ERROR_TOAST_DURATION: Duration = Duration::from_secs(5);

/// Which widget currently receives typed characters
#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    /// Viewing a snippet, keys are commands
    Normal,
    /// Editing session, keys go to the editor surface
    Editor,
    SnippetName,
    Description,
    Tags,
    FileName(usize),
    Language,
    HelpMenu,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub is_error: bool,
    pub expires_at: Option<Instant>,
}

/// Yes/no question waiting on the user
#[derive(Debug)]
pub struct Prompt {
    pub message: String,
    reply: oneshot::Sender<bool>,
}

/// Main Application State Container
///
/// Hosts one snippet detail panel and the terminal-side state around it:
/// the active input mode, the text being typed into an input overlay, the
/// toast and confirm prompt raised by the panel, and a deletion waiting on
/// that prompt.
pub struct App {
    pub panel: DetailPanel,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub toast: Option<Toast>,
    pub prompt: Option<Prompt>,
    pub needs_redraw: bool,
    pub should_quit: bool,
    bus: EventBus,
    notices: Receiver<Notice>,
    pending_deletion: Option<PendingDeletion>,
    edit_start: Subscription,
    edit_end: Subscription,
}

impl App {
    pub fn new(store: JsonSnippetStore, config: Config) -> Self {
        Self::with_clipboard(store, config, Box::new(SystemClipboard::default()))
    }

    pub fn with_clipboard(
        store: JsonSnippetStore,
        config: Config,
        clipboard: Box<dyn ClipboardService>,
    ) -> Self {
        let bus = EventBus::new();
        let (notifier, notices) = StatusNotifier::channel();
        let edit_start = bus.on(Topic::EditStart);
        let edit_end = bus.on(Topic::EditEnd);

        let services = PanelServices {
            clipboard,
            notifier: Box::new(notifier),
            modes: Arc::new(SyntectModeLookup),
            bus: bus.clone(),
            config: config.ui,
        };
        let panel = SnippetDetailPanel::mount(store, TerminalEditor::new(), services);

        Self {
            panel,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            toast: None,
            prompt: None,
            needs_redraw: true,
            should_quit: false,
            bus,
            notices,
            pending_deletion: None,
            edit_start,
            edit_end,
        }
    }

    /// Processes everything that arrived since the last frame: bus signals,
    /// notices from the panel, focus requests and toast expiry
    pub fn tick(&mut self) {
        let result = self.panel.pump_events();
        self.report(result);

        if self.edit_start.drain() > 0 {
            self.input_mode = InputMode::Editor;
        }
        if self.edit_end.drain() > 0 {
            self.input_mode = InputMode::Normal;
            self.input_buffer.clear();
        }

        if let Some(Focus::FileName(index)) = self.panel.take_focus_request() {
            self.open_input(InputMode::FileName(index));
        }

        self.drain_notices();

        if let Some(toast) = &self.toast {
            if toast.expires_at.is_some_and(|at| Instant::now() >= at) {
                self.toast = None;
            }
        }
    }

    fn drain_notices(&mut self) {
        for notice in self.notices.try_iter() {
            match notice {
                Notice::Info {
                    message,
                    auto_close,
                } => {
                    self.toast = Some(Toast {
                        message,
                        is_error: false,
                        expires_at: auto_close.map(|d| Instant::now() + d),
                    });
                }
                Notice::Error { message } => {
                    self.toast = Some(Toast {
                        message,
                        is_error: true,
                        expires_at: Some(Instant::now() + ERROR_TOAST_DURATION),
                    });
                }
                Notice::Confirm { message, reply } => {
                    // A newer question replaces an unanswered one, which then reads as "no"
                    self.prompt = Some(Prompt { message, reply });
                }
            }
        }
    }

    pub fn set_error_message(&mut self, message: String) {
        self.toast = Some(Toast {
            message,
            is_error: true,
            expires_at: Some(Instant::now() + ERROR_TOAST_DURATION),
        });
    }

    pub fn clear_messages(&mut self) {
        self.toast = None;
    }

    /// Surfaces a panel error. Last-file rejections were already announced
    /// by the panel itself.
    fn report<T>(&mut self, result: Result<T, DetailError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(DetailError::LastFile) => None,
            Err(e) => {
                tracing::warn!(error = %e, "panel operation failed");
                self.set_error_message(e.to_string());
                None
            }
        }
    }

    pub fn begin_edit(&mut self) {
        let result = self.panel.begin_edit();
        self.report(result);
        self.tick();
    }

    pub fn save(&mut self) {
        let result = self.panel.save();
        self.report(result);
        self.tick();
    }

    pub fn discard(&mut self) {
        let result = self.panel.discard();
        self.report(result);
        self.tick();
    }

    pub fn copy_selected_file(&mut self) {
        let index = self.panel.selected_file();
        let result = self.panel.copy_file(index);
        self.report(result);
        self.tick();
    }

    pub fn select_file(&mut self, index: usize) {
        let result = self.panel.select_file(index);
        self.report(result);
    }

    pub fn next_file(&mut self) {
        let count = self.panel.visible_files().len();
        if count > 0 {
            self.select_file((self.panel.selected_file() + 1) % count);
        }
    }

    pub fn previous_file(&mut self) {
        let count = self.panel.visible_files().len();
        if count > 0 {
            self.select_file((self.panel.selected_file() + count - 1) % count);
        }
    }

    /// Moves to the neighbouring snippet in the store, wrapping around
    pub fn cycle_snippet(&mut self, forward: bool) {
        let ids: Vec<_> = self.panel.store().snippets().iter().map(|s| s.id).collect();
        if ids.is_empty() {
            return;
        }
        let current = self
            .panel
            .snippet()
            .and_then(|snippet| ids.iter().position(|id| *id == snippet.id));
        let next = match current {
            Some(i) if forward => (i + 1) % ids.len(),
            Some(i) => (i + ids.len() - 1) % ids.len(),
            None => 0,
        };
        let result = self.panel.open_snippet(ids[next]);
        self.report(result);
    }

    pub fn add_file(&mut self) {
        let result = self.panel.add_file();
        self.report(result);
        self.tick();
    }

    pub fn start_file_deletion(&mut self) {
        let index = self.panel.selected_file();
        let result = self.panel.request_file_deletion(index);
        if let Some(pending) = self.report(result) {
            self.await_confirmation(pending);
        }
        self.tick();
    }

    pub fn start_snippet_deletion(&mut self) {
        let result = self.panel.request_snippet_deletion();
        if let Some(pending) = self.report(result) {
            self.await_confirmation(pending);
        }
        self.tick();
    }

    fn await_confirmation(&mut self, pending: PendingDeletion) {
        self.drain_notices();
        if self.prompt.is_some() {
            self.pending_deletion = Some(pending);
        } else {
            // No dialog was raised, the confirmation is already settled
            self.finish_deletion(pending);
        }
    }

    /// Answers the open prompt and finishes the deletion behind it
    pub fn answer_prompt(&mut self, yes: bool) {
        if let Some(prompt) = self.prompt.take() {
            let _ = prompt.reply.send(yes);
        }
        if let Some(pending) = self.pending_deletion.take() {
            self.finish_deletion(pending);
        }
        self.tick();
    }

    fn finish_deletion(&mut self, pending: PendingDeletion) {
        let Some(confirmed) = futures::executor::block_on(pending.confirmed()) else {
            return;
        };
        let result = self.panel.apply_deletion(confirmed);
        self.report(result);

        if self.panel.snippet().is_none() {
            if let Some(id) = self.panel.store().snippets().first().map(|s| s.id) {
                let result = self.panel.open_snippet(id);
                self.report(result);
            }
        }
    }

    /// Opens an input overlay prefilled with the current draft value
    pub fn open_input(&mut self, mode: InputMode) {
        let draft = self.panel.draft();
        self.input_buffer = match (&mode, draft) {
            (InputMode::SnippetName, Some(d)) => d.name.clone(),
            (InputMode::Description, Some(d)) => d.description.clone(),
            (InputMode::Tags, Some(d)) => d.tags.join(" "),
            (InputMode::FileName(i), _) => self
                .panel
                .visible_files()
                .get(*i)
                .map(|f| f.name.clone())
                .unwrap_or_default(),
            _ => String::new(),
        };
        self.input_mode = mode;
    }

    pub fn input_char(&mut self, c: char) {
        self.input_buffer.push(c);
        self.on_input_changed();
    }

    pub fn input_backspace(&mut self) {
        self.input_buffer.pop();
        self.on_input_changed();
    }

    /// File names apply on every keystroke so the syntax mode follows along
    fn on_input_changed(&mut self) {
        if let InputMode::FileName(index) = self.input_mode {
            let result = self.panel.rename_file(index, self.input_buffer.clone());
            self.report(result);
        }
    }

    pub fn submit_input(&mut self) {
        let value = std::mem::take(&mut self.input_buffer);
        let result = match self.input_mode.clone() {
            InputMode::SnippetName => self.panel.set_name(value.trim()),
            InputMode::Description => self.panel.set_description(value),
            InputMode::Tags => self.panel.set_tags(parse_tags(&value)),
            InputMode::FileName(index) => self.panel.rename_file(index, value),
            InputMode::Language => {
                let mode = self.panel.select_language(&value);
                self.toast = Some(Toast {
                    message: format!("Syntax mode: {mode}"),
                    is_error: false,
                    expires_at: Some(Instant::now() + Duration::from_secs(2)),
                });
                Ok(())
            }
            _ => Ok(()),
        };
        self.report(result);
        self.close_input();
    }

    pub fn close_input(&mut self) {
        self.input_buffer.clear();
        self.input_mode = if self.panel.is_editing() {
            InputMode::Editor
        } else {
            InputMode::Normal
        };
    }

    pub fn type_char(&mut self, c: char) {
        if self.panel.editor_mut().insert_char(c) {
            self.content_changed();
        }
    }

    pub fn type_newline(&mut self) {
        if self.panel.editor_mut().insert_newline() {
            self.content_changed();
        }
    }

    pub fn type_backspace(&mut self) {
        if self.panel.editor_mut().backspace() {
            self.content_changed();
        }
    }

    fn content_changed(&mut self) {
        let result = self.panel.update_content();
        self.report(result);
    }

    /// Broadcasts "save all" so an open editing session is kept, then quits
    pub fn request_quit(&mut self) {
        self.bus.emit(Topic::SaveAll);
        self.tick();
        self.should_quit = true;
    }

    pub fn render(&mut self, frame: &mut Frame) {
        snippet_detail::render(frame, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detail::EditorSurface;
    use crate::models::{Snippet, SnippetFile, StorageManager};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct NullClipboard(Rc<RefCell<Vec<String>>>);

    impl ClipboardService for NullClipboard {
        fn set(&mut self, text: &str) -> anyhow::Result<()> {
            self.0.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    fn app_in(dir: &std::path::Path, config: Config) -> (App, Rc<RefCell<Vec<String>>>) {
        let storage = StorageManager::with_data_dir(dir).unwrap();
        let mut store = JsonSnippetStore::open(storage).unwrap();
        store.seed_if_empty().unwrap();
        let copied = Rc::new(RefCell::new(Vec::new()));
        let app = App::with_clipboard(store, config, Box::new(NullClipboard(copied.clone())));
        (app, copied)
    }

    #[test]
    fn editing_signals_switch_input_mode() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = app_in(dir.path(), Config::default());

        app.begin_edit();
        assert_eq!(app.input_mode, InputMode::Editor);
        app.discard();
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn file_deletion_waits_for_the_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = app_in(dir.path(), Config::default());

        app.start_file_deletion();
        assert_eq!(
            app.prompt.as_ref().map(|p| p.message.as_str()),
            Some("Are you sure to delete this file?")
        );
        assert_eq!(app.panel.visible_files().len(), 2);

        app.answer_prompt(true);
        assert!(app.prompt.is_none());
        assert_eq!(app.panel.visible_files().len(), 1);

        app.start_file_deletion();
        assert!(app.prompt.is_none());
        let toast = app.toast.as_ref().unwrap();
        assert!(toast.is_error);
        assert_eq!(toast.message, "The snippet must have at least 1 file");
    }

    #[test]
    fn declining_the_prompt_keeps_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = app_in(dir.path(), Config::default());

        app.start_file_deletion();
        app.answer_prompt(false);

        assert_eq!(app.panel.visible_files().len(), 2);
    }

    #[test]
    fn deletion_without_confirm_dialog_applies_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.ui.show_delete_confirm_dialog = false;
        let (mut app, _) = app_in(dir.path(), config);

        app.start_snippet_deletion();

        assert!(app.prompt.is_none());
        assert!(app.panel.snippet().is_none());
    }

    #[test]
    fn deleting_a_snippet_moves_to_the_next_one() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::with_data_dir(dir.path()).unwrap();
        let mut store = JsonSnippetStore::open(storage).unwrap();
        store.seed_if_empty().unwrap();
        let other = Snippet::with_files("other", vec![SnippetFile::with_content("x.py", "x")]);
        let other_id = other.id;
        let mut db = store.storage().load_database().unwrap();
        db.snippets.push(other);
        store.storage().save_database(&db).unwrap();
        let store = JsonSnippetStore::open(StorageManager::with_data_dir(dir.path()).unwrap())
            .unwrap();

        let mut app = App::with_clipboard(
            store,
            Config::default(),
            Box::new(NullClipboard(Rc::default())),
        );
        app.start_snippet_deletion();
        app.answer_prompt(true);

        assert_eq!(app.panel.snippet().map(|s| s.id), Some(other_id));
        assert_eq!(app.panel.editor().value(), "x");
    }

    #[test]
    fn quitting_while_editing_saves_through_the_bus() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = app_in(dir.path(), Config::default());

        app.begin_edit();
        app.open_input(InputMode::SnippetName);
        app.input_buffer = String::from("Kept on quit");
        app.submit_input();
        app.request_quit();

        assert!(app.should_quit);
        assert!(!app.panel.is_editing());
        let reopened = JsonSnippetStore::open(StorageManager::with_data_dir(dir.path()).unwrap())
            .unwrap();
        assert_eq!(reopened.snippets()[0].name, "Kept on quit");
    }

    #[test]
    fn new_file_focuses_its_name_input_and_renames_live() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = app_in(dir.path(), Config::default());

        app.begin_edit();
        app.add_file();
        assert_eq!(app.input_mode, InputMode::FileName(2));
        assert!(app.input_buffer.is_empty());

        for c in "app.py".chars() {
            app.input_char(c);
        }
        assert_eq!(app.panel.visible_files()[2].name, "app.py");
        assert_eq!(app.panel.editor().mode().id(), "Python");

        app.submit_input();
        assert_eq!(app.input_mode, InputMode::Editor);
    }

    #[test]
    fn typing_updates_the_working_copy() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = app_in(dir.path(), Config::default());

        app.type_char('z');
        assert!(!app.panel.visible_files()[0].value.starts_with('z'));

        app.begin_edit();
        app.type_char('z');
        assert!(app.panel.visible_files()[0].value.starts_with('z'));
    }

    #[test]
    fn copying_shows_a_toast_that_expires() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, copied) = app_in(dir.path(), Config::default());

        app.copy_selected_file();

        assert_eq!(copied.borrow().len(), 1);
        let toast = app.toast.clone().unwrap();
        assert_eq!(toast.message, "Copied to clipboard");
        assert!(!toast.is_error);

        app.toast.as_mut().unwrap().expires_at = Some(Instant::now());
        app.tick();
        assert!(app.toast.is_none());
        assert_eq!(app.panel.snippet().unwrap().copy_count, 1);
    }

    #[test]
    fn tags_input_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = app_in(dir.path(), Config::default());

        app.begin_edit();
        app.open_input(InputMode::Tags);
        assert_eq!(app.input_buffer, "rust demo");
        app.input_buffer = String::from("#cli, tools");
        app.submit_input();
        app.save();

        assert_eq!(app.panel.snippet().unwrap().tags, vec!["cli", "tools"]);
    }
}

use crate::config::UiConfig;
use crate::detail::collaborators::{
    ClipboardService, Confirmation, EditorOption, EditorSurface, ModeLookup, Notifier,
    SnippetStore, SyntaxMode,
};
use crate::detail::error::{DetailError, Result};
use crate::detail::events::{EventBus, Subscription, Topic};
use crate::detail::mode::apply_mode;
use crate::models::{Snippet, SnippetFile, same_tags};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub const COPY_NOTICE_DURATION: Duration = Duration::from_secs(2);

const COPIED_MESSAGE: &str = "Copied to clipboard";
const CONFIRM_DELETE_FILE: &str = "Are you sure to delete this file?";
const CONFIRM_DELETE_SNIPPET: &str = "Are you sure to delete this snippet?";

/// Working copy of a snippet's editable fields.
///
/// Taken as a deep copy when editing starts; nothing here reaches the store
/// until the session is saved.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub files: Vec<SnippetFile>,
}

impl EditSession {
    fn snapshot(snippet: &Snippet) -> Self {
        Self {
            name: snippet.name.clone(),
            description: snippet.description.clone(),
            tags: snippet.tags.clone(),
            files: snippet.files.clone(),
        }
    }

    /// The snippet to submit, or `None` when the session changed nothing
    fn changes_against(&self, snippet: &Snippet) -> Option<Snippet> {
        let dirty = self.name != snippet.name
            || self.description != snippet.description
            || !same_tags(&self.tags, &snippet.tags)
            || self.files != snippet.files;

        if !dirty {
            return None;
        }

        let mut updated = snippet.clone();
        updated.name = self.name.clone();
        updated.description = self.description.clone();
        updated.tags = self.tags.clone();
        updated.files = self.files.clone();
        Some(updated)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
enum Session {
    #[default]
    Viewing,
    Editing(EditSession),
}

/// Input the host should focus after an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    FileName(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Submitted,
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    Applied,
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionTarget {
    File { index: usize, key: Uuid },
    Snippet { id: Uuid },
}

/// A validated deletion waiting on the user's answer.
///
/// Holds no borrow of the panel, so the host may keep it around while a
/// dialog is open. Dropping it cancels the deletion.
#[derive(Debug)]
pub struct PendingDeletion {
    target: DeletionTarget,
    confirmation: Confirmation,
}

impl PendingDeletion {
    pub fn target(&self) -> DeletionTarget {
        self.target
    }

    /// Waits for the answer; `None` means the user declined
    pub async fn confirmed(self) -> Option<ConfirmedDeletion> {
        if self.confirmation.await {
            Some(ConfirmedDeletion {
                target: self.target,
            })
        } else {
            tracing::debug!(target = ?self.target, "deletion declined");
            None
        }
    }
}

#[derive(Debug)]
pub struct ConfirmedDeletion {
    target: DeletionTarget,
}

/// Collaborators that the panel only calls into and never hands back
pub struct PanelServices {
    pub clipboard: Box<dyn ClipboardService>,
    pub notifier: Box<dyn Notifier>,
    pub modes: Arc<dyn ModeLookup>,
    pub bus: EventBus,
    pub config: UiConfig,
}

/// Detail/edit panel for the store's selected multi-file snippet.
pub struct SnippetDetailPanel<S, E> {
    store: S,
    editor: E,
    clipboard: Box<dyn ClipboardService>,
    notifier: Box<dyn Notifier>,
    modes: Arc<dyn ModeLookup>,
    bus: EventBus,
    config: UiConfig,
    session: Session,
    selected_file: usize,
    focus: Option<Focus>,
    signals: Subscription,
}

fn editing_mut<'a>(session: &'a mut Session, op: &'static str) -> Result<&'a mut EditSession> {
    match session {
        Session::Editing(edit) => Ok(edit),
        Session::Viewing => Err(DetailError::RequiresEditing(op)),
    }
}

impl<S, E> SnippetDetailPanel<S, E>
where
    S: SnippetStore,
    E: EditorSurface,
{
    pub fn mount(store: S, editor: E, services: PanelServices) -> Self {
        let PanelServices {
            clipboard,
            notifier,
            modes,
            bus,
            config,
        } = services;

        let signals = bus.on_any(&[Topic::SaveAll, Topic::UnSave]);

        let mut panel = Self {
            store,
            editor,
            clipboard,
            notifier,
            modes,
            bus,
            config,
            session: Session::Viewing,
            selected_file: 0,
            focus: None,
            signals,
        };
        panel.show_selected_snippet();
        panel
    }

    /// Detaches from the bus and hands the store and editor back
    pub fn unmount(self) -> (S, E) {
        tracing::debug!("detail panel unmounted");
        (self.store, self.editor)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut E {
        &mut self.editor
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.session, Session::Editing(_))
    }

    pub fn draft(&self) -> Option<&EditSession> {
        match &self.session {
            Session::Editing(edit) => Some(edit),
            Session::Viewing => None,
        }
    }

    pub fn snippet(&self) -> Option<&Snippet> {
        self.store.selected_snippet()
    }

    pub fn selected_file(&self) -> usize {
        self.selected_file
    }

    /// Files of the current view: the working copy while editing
    pub fn visible_files(&self) -> &[SnippetFile] {
        match &self.session {
            Session::Editing(edit) => &edit.files,
            Session::Viewing => self
                .store
                .selected_snippet()
                .map(|snippet| snippet.files.as_slice())
                .unwrap_or(&[]),
        }
    }

    /// Width of each file tab in percent; tabs share the row equally
    pub fn tab_width_percent(&self) -> f64 {
        tab_width_percent(self.visible_files().len())
    }

    pub fn take_focus_request(&mut self) -> Option<Focus> {
        self.focus.take()
    }

    /// Resets the view onto whatever the store currently has selected
    pub fn show_selected_snippet(&mut self) {
        self.session = Session::Viewing;
        self.selected_file = 0;
        self.focus = None;
        self.editor.set_option(EditorOption::ReadOnly(true));
        if self.visible_files().is_empty() {
            self.editor.set_value("");
        } else {
            self.load_file(0);
        }
    }

    pub fn open_snippet(&mut self, id: Uuid) -> Result<()> {
        if self.is_editing() {
            return Err(DetailError::RequiresViewing("switching snippets"));
        }
        self.store.select_snippet(Some(id));
        self.show_selected_snippet();
        Ok(())
    }

    pub fn begin_edit(&mut self) -> Result<()> {
        if self.is_editing() {
            return Ok(());
        }
        let snippet = self.store.selected_snippet().ok_or(DetailError::NoSnippet)?;
        tracing::info!(snippet = %snippet.id, "editing started");
        self.session = Session::Editing(EditSession::snapshot(snippet));

        self.editor.apply_editor_style();
        self.bus.emit(Topic::EditStart);
        self.editor.set_option(EditorOption::ReadOnly(false));
        Ok(())
    }

    /// Commits the working copy. The store is only called when something
    /// differs from the persisted snippet. A failed submit keeps editing.
    pub fn save(&mut self) -> Result<SaveOutcome> {
        let Session::Editing(edit) = &self.session else {
            return Err(DetailError::RequiresEditing("save"));
        };
        let snippet = self.store.selected_snippet().ok_or(DetailError::NoSnippet)?;
        let id = snippet.id;

        let outcome = match edit.changes_against(snippet) {
            Some(updated) => {
                self.store.update_snippet(updated)?;
                SaveOutcome::Submitted
            }
            None => SaveOutcome::Unchanged,
        };
        tracing::info!(snippet = %id, ?outcome, "editing saved");

        self.session = Session::Viewing;
        self.bus.emit(Topic::EditEnd);
        self.editor.set_option(EditorOption::ReadOnly(true));
        Ok(outcome)
    }

    pub fn discard(&mut self) -> Result<()> {
        if !self.is_editing() {
            return Err(DetailError::RequiresEditing("discard"));
        }
        tracing::info!("editing discarded");

        self.session = Session::Viewing;
        self.selected_file = 0;
        self.focus = None;
        self.bus.emit(Topic::EditEnd);
        self.editor.set_option(EditorOption::ReadOnly(true));
        if !self.visible_files().is_empty() {
            self.load_file(0);
        }
        Ok(())
    }

    /// Handles queued `saveAll`/`unSave` broadcasts in arrival order.
    /// Outside an editing session they are dropped. On a failed save the
    /// later signals stay queued for the next pump.
    pub fn pump_events(&mut self) -> Result<()> {
        while let Some(topic) = self.signals.try_next() {
            if !self.is_editing() {
                continue;
            }
            match topic {
                Topic::SaveAll => {
                    self.save()?;
                }
                Topic::UnSave => self.discard()?,
                Topic::EditStart | Topic::EditEnd => {}
            }
        }
        Ok(())
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        editing_mut(&mut self.session, "renaming the snippet")?.name = name.into();
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<()> {
        editing_mut(&mut self.session, "editing the description")?.description =
            description.into();
        Ok(())
    }

    pub fn set_tags(&mut self, tags: Vec<String>) -> Result<()> {
        editing_mut(&mut self.session, "editing tags")?.tags = tags;
        Ok(())
    }

    pub fn select_file(&mut self, index: usize) -> Result<()> {
        if index >= self.visible_files().len() {
            return Err(DetailError::NoSuchFile(index));
        }
        self.selected_file = index;
        self.load_file(index);
        Ok(())
    }

    fn load_file(&mut self, index: usize) {
        let Some(file) = self.visible_files().get(index) else {
            return;
        };
        let extension = file.extension().to_string();
        let value = file.value.clone();

        let mode = apply_mode(&mut self.editor, self.modes.by_extension(&extension));
        self.editor.set_value(&value);
        tracing::debug!(index, %mode, "file loaded into editor");
    }

    pub fn rename_file(&mut self, index: usize, name: impl Into<String>) -> Result<()> {
        let edit = editing_mut(&mut self.session, "renaming a file")?;
        let file = edit
            .files
            .get_mut(index)
            .ok_or(DetailError::NoSuchFile(index))?;
        file.name = name.into();
        let extension = file.extension().to_string();

        if index == self.selected_file {
            apply_mode(&mut self.editor, self.modes.by_extension(&extension));
        }
        Ok(())
    }

    /// Copies the editor content into the selected file. Called when the
    /// editor reports a change; ignored outside an editing session.
    pub fn update_content(&mut self) -> Result<()> {
        if !self.is_editing() {
            return Ok(());
        }
        let value = self.editor.value();
        let edit = editing_mut(&mut self.session, "editing file content")?;
        if let Some(file) = edit.files.get_mut(self.selected_file) {
            file.value = value;
        }
        Ok(())
    }

    /// Appends an empty file, selects it and asks for its name input
    pub fn add_file(&mut self) -> Result<Uuid> {
        let edit = editing_mut(&mut self.session, "adding a file")?;
        let file = SnippetFile::new();
        let key = file.key;
        edit.files.push(file);
        let index = edit.files.len() - 1;

        self.select_file(index)?;
        self.focus = Some(Focus::FileName(index));
        self.editor.apply_editor_style();
        tracing::debug!(%key, index, "file added");
        Ok(key)
    }

    /// Applies the syntax mode for a human language name
    pub fn select_language(&mut self, name: &str) -> SyntaxMode {
        apply_mode(&mut self.editor, self.modes.by_name(name))
    }

    pub fn copy_file(&mut self, index: usize) -> Result<()> {
        if self.is_editing() {
            return Err(DetailError::RequiresViewing("copying a file"));
        }
        let snippet = self
            .store
            .selected_snippet()
            .ok_or(DetailError::NoSnippet)?
            .clone();
        let file = snippet
            .files
            .get(index)
            .ok_or(DetailError::NoSuchFile(index))?;

        self.clipboard.set(&file.value)?;
        if self.config.show_copy_noti {
            self.notifier
                .info(COPIED_MESSAGE, Some(COPY_NOTICE_DURATION));
        }
        self.store.increase_copy_time(&snippet)?;
        tracing::info!(snippet = %snippet.id, index, "file copied");
        Ok(())
    }

    fn confirmation(&self, message: &str) -> Confirmation {
        if self.config.show_delete_confirm_dialog {
            self.notifier.confirm(message)
        } else {
            Confirmation::ready(true)
        }
    }

    fn reject_last_file(&self) -> DetailError {
        let error = DetailError::LastFile;
        self.notifier.error(&error.to_string());
        error
    }

    pub fn request_file_deletion(&mut self, index: usize) -> Result<PendingDeletion> {
        let files = self.visible_files();
        if files.len() <= 1 {
            return Err(self.reject_last_file());
        }
        let key = files
            .get(index)
            .ok_or(DetailError::NoSuchFile(index))?
            .key;

        Ok(PendingDeletion {
            target: DeletionTarget::File { index, key },
            confirmation: self.confirmation(CONFIRM_DELETE_FILE),
        })
    }

    pub fn request_snippet_deletion(&mut self) -> Result<PendingDeletion> {
        if self.is_editing() {
            return Err(DetailError::RequiresViewing("deleting the snippet"));
        }
        let id = self
            .store
            .selected_snippet()
            .ok_or(DetailError::NoSnippet)?
            .id;

        Ok(PendingDeletion {
            target: DeletionTarget::Snippet { id },
            confirmation: self.confirmation(CONFIRM_DELETE_SNIPPET),
        })
    }

    pub fn apply_deletion(&mut self, confirmed: ConfirmedDeletion) -> Result<()> {
        match confirmed.target {
            DeletionTarget::File { index, key } => self.remove_file(index, key),
            DeletionTarget::Snippet { id } => self.remove_snippet(id),
        }
    }

    pub async fn delete_file(&mut self, index: usize) -> Result<Deletion> {
        let pending = self.request_file_deletion(index)?;
        match pending.confirmed().await {
            Some(confirmed) => {
                self.apply_deletion(confirmed)?;
                Ok(Deletion::Applied)
            }
            None => Ok(Deletion::Declined),
        }
    }

    pub async fn delete_snippet(&mut self) -> Result<Deletion> {
        let pending = self.request_snippet_deletion()?;
        match pending.confirmed().await {
            Some(confirmed) => {
                self.apply_deletion(confirmed)?;
                Ok(Deletion::Applied)
            }
            None => Ok(Deletion::Declined),
        }
    }

    fn remove_file(&mut self, requested: usize, key: Uuid) -> Result<()> {
        // The list may have moved while the dialog was open; the key is authoritative.
        let index = self
            .visible_files()
            .iter()
            .position(|file| file.key == key)
            .ok_or(DetailError::NoSuchFile(requested))?;
        if self.visible_files().len() <= 1 {
            return Err(self.reject_last_file());
        }

        match &mut self.session {
            Session::Editing(edit) => {
                edit.files.remove(index);
            }
            Session::Viewing => {
                let mut updated = self
                    .store
                    .selected_snippet()
                    .ok_or(DetailError::NoSnippet)?
                    .clone();
                updated.files.remove(index);
                self.store.update_snippet(updated)?;
            }
        }
        tracing::info!(%key, index, editing = self.is_editing(), "file deleted");

        let last = self.visible_files().len().saturating_sub(1);
        if self.selected_file > last {
            self.select_file(last)?;
        } else if index <= self.selected_file {
            self.load_file(self.selected_file);
        }
        Ok(())
    }

    fn remove_snippet(&mut self, id: Uuid) -> Result<()> {
        let snippet = self
            .store
            .selected_snippet()
            .filter(|snippet| snippet.id == id)
            .ok_or(DetailError::NoSnippet)?
            .clone();

        self.store.delete_snippet(&snippet)?;
        self.store.select_snippet(None);
        tracing::info!(snippet = %id, "snippet deleted");

        self.show_selected_snippet();
        Ok(())
    }
}

pub fn tab_width_percent(file_count: usize) -> f64 {
    100.0 / file_count.max(1) as f64
}

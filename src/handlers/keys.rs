//! Keyboard Input Handling Module
//!
//! Routes key events to the snippet detail panel. An open confirm prompt
//! takes every key first, then input overlays, then the editor or the
//! viewing commands depending on the current input mode.

use crate::app::{App, InputMode};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Main keyboard event handler and dispatcher.
///
/// Returns `true` when the application should exit.
pub fn handle_key_events(key: KeyEvent, app: &mut App) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global quit, keeps an open editing session
    if ctrl && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c')) {
        app.request_quit();
        return true;
    }

    if app.prompt.is_some() {
        handle_prompt_keys(key, app);
        return false;
    }

    match app.input_mode {
        InputMode::Normal => handle_viewing_keys(key, app),
        InputMode::Editor => {
            handle_editor_keys(key, app);
            false
        }
        InputMode::HelpMenu => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.close_input();
            }
            false
        }
        _ => {
            handle_input_overlay_keys(key, app);
            false
        }
    }
}

fn handle_prompt_keys(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.answer_prompt(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.answer_prompt(false),
        _ => {}
    }
}

/// Commands available while a snippet is only being viewed
fn handle_viewing_keys(key: KeyEvent, app: &mut App) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            app.request_quit();
            return true;
        }
        KeyCode::Char('?') => {
            app.clear_messages();
            app.input_mode = InputMode::HelpMenu;
        }
        KeyCode::Char('e') | KeyCode::Enter => app.begin_edit(),
        KeyCode::Char('c') => app.copy_selected_file(),
        KeyCode::Char('x') => app.start_file_deletion(),
        KeyCode::Char('D') => app.start_snippet_deletion(),
        KeyCode::Char('n') => app.cycle_snippet(true),
        KeyCode::Char('p') => app.cycle_snippet(false),
        KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => app.next_file(),
        KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => app.previous_file(),
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            if index < app.panel.visible_files().len() {
                app.select_file(index);
            }
        }
        KeyCode::Down | KeyCode::Char('j') => app.panel.editor_mut().scroll_by(1),
        KeyCode::Up | KeyCode::Char('k') => app.panel.editor_mut().scroll_by(-1),
        KeyCode::PageDown => app.panel.editor_mut().scroll_by(10),
        KeyCode::PageUp => app.panel.editor_mut().scroll_by(-10),
        KeyCode::Esc => app.clear_messages(),
        _ => {}
    }
    false
}

/// Editing session: control chords drive the panel, everything else types
fn handle_editor_keys(key: KeyEvent, app: &mut App) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    if ctrl {
        match key.code {
            KeyCode::Char('s') => app.save(),
            KeyCode::Char('n') => app.add_file(),
            KeyCode::Char('x') => app.start_file_deletion(),
            KeyCode::Char('r') => {
                let index = app.panel.selected_file();
                app.open_input(InputMode::FileName(index));
            }
            KeyCode::Char('l') => app.open_input(InputMode::Language),
            _ => {}
        }
        return;
    }

    if alt {
        match key.code {
            KeyCode::Right => app.next_file(),
            KeyCode::Left => app.previous_file(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.discard(),
        KeyCode::F(2) => app.open_input(InputMode::SnippetName),
        KeyCode::F(3) => app.open_input(InputMode::Description),
        KeyCode::F(4) => app.open_input(InputMode::Tags),
        KeyCode::Enter => app.type_newline(),
        KeyCode::Backspace => app.type_backspace(),
        KeyCode::Tab => {
            for _ in 0..4 {
                app.type_char(' ');
            }
        }
        KeyCode::Char(c) => app.type_char(c),
        KeyCode::Left => app.panel.editor_mut().move_left(),
        KeyCode::Right => app.panel.editor_mut().move_right(),
        KeyCode::Up => app.panel.editor_mut().move_up(),
        KeyCode::Down => app.panel.editor_mut().move_down(),
        KeyCode::Home => app.panel.editor_mut().move_home(),
        KeyCode::End => app.panel.editor_mut().move_end(),
        _ => {}
    }
}

/// Single-line inputs for the snippet name, description, tags, file names
/// and the language picker
fn handle_input_overlay_keys(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => app.close_input(),
        KeyCode::Enter => app.submit_input(),
        KeyCode::Backspace => app.input_backspace(),
        KeyCode::Char(c) => app.input_char(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::detail::ClipboardService;
    use crate::models::{JsonSnippetStore, StorageManager};

    struct NoClipboard;

    impl ClipboardService for NoClipboard {
        fn set(&mut self, _text: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn app(dir: &std::path::Path) -> App {
        let mut store = JsonSnippetStore::open(StorageManager::with_data_dir(dir).unwrap()).unwrap();
        store.seed_if_empty().unwrap();
        App::with_clipboard(store, Config::default(), Box::new(NoClipboard))
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key_events(KeyEvent::new(code, KeyModifiers::NONE), app)
    }

    fn chord(app: &mut App, modifiers: KeyModifiers, c: char) -> bool {
        handle_key_events(KeyEvent::new(KeyCode::Char(c), modifiers), app)
    }

    #[test]
    fn edit_type_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.input_mode, InputMode::Editor);
        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Char('/'));
        chord(&mut app, KeyModifiers::CONTROL, 's');

        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.panel.snippet().unwrap().files[0].value.starts_with("//fn main"));
    }

    #[test]
    fn escape_discards_edits() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Char('z'));
        press(&mut app, KeyCode::Esc);

        assert!(!app.panel.is_editing());
        assert!(app.panel.snippet().unwrap().files[0].value.starts_with("fn main"));
    }

    #[test]
    fn prompt_captures_keys_until_answered() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        press(&mut app, KeyCode::Char('x'));
        assert!(app.prompt.is_some());
        press(&mut app, KeyCode::Char('e'));
        assert!(!app.panel.is_editing());

        press(&mut app, KeyCode::Char('n'));
        assert!(app.prompt.is_none());
        assert_eq!(app.panel.visible_files().len(), 2);
    }

    #[test]
    fn tab_switches_files_while_viewing() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.panel.selected_file(), 1);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.panel.selected_file(), 0);
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.panel.selected_file(), 1);
    }

    #[test]
    fn f2_renames_the_snippet() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::F(2));
        assert_eq!(app.input_mode, InputMode::SnippetName);
        for _ in 0.."Hello snipdeck".len() {
            press(&mut app, KeyCode::Backspace);
        }
        for c in "Renamed".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Editor);
        chord(&mut app, KeyModifiers::CONTROL, 's');

        assert_eq!(app.panel.snippet().unwrap().name, "Renamed");
    }

    #[test]
    fn quit_keys_exit() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        press(&mut app, KeyCode::Char('e'));
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert!(chord(&mut app, KeyModifiers::CONTROL, 'q'));
        assert!(app.should_quit);
    }
}

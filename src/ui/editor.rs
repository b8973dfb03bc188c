use crate::detail::mode::SYNTAX_SET;
use crate::detail::{EditorOption, EditorSurface, SyntaxMode};
use crate::ui::colors::RosePine;
use once_cell::sync::Lazy;
use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};
use syntect::{easy::HighlightLines, highlighting::ThemeSet, util::LinesWithEndings};
use unicode_width::UnicodeWidthStr;

static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

/// Text surface for the terminal host.
///
/// Keeps content as lines with a char-indexed cursor. Edits are refused while
/// read-only; callers learn about content changes from the `bool` returned by
/// the editing methods.
#[derive(Debug, Clone)]
pub struct TerminalEditor {
    lines: Vec<String>,
    row: usize,
    col: usize,
    scroll: usize,
    read_only: bool,
    mode: SyntaxMode,
    html_mode: bool,
}

impl Default for TerminalEditor {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
            scroll: 0,
            read_only: true,
            mode: SyntaxMode::Plain,
            html_mode: false,
        }
    }
}

fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

impl TerminalEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn mode(&self) -> &SyntaxMode {
        &self.mode
    }

    pub fn html_mode(&self) -> bool {
        self.html_mode
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, |line| line.chars().count())
    }

    pub fn insert_char(&mut self, c: char) -> bool {
        if self.read_only {
            return false;
        }
        if c == '\n' {
            return self.insert_newline();
        }
        let line = &mut self.lines[self.row];
        let at = byte_index(line, self.col);
        line.insert(at, c);
        self.col += 1;
        true
    }

    pub fn insert_newline(&mut self) -> bool {
        if self.read_only {
            return false;
        }
        let line = &mut self.lines[self.row];
        let at = byte_index(line, self.col);
        let rest = line.split_off(at);

        // Keep the indentation of the line being split
        let indent: String = line.chars().take_while(|c| *c == ' ' || *c == '\t').collect();
        self.row += 1;
        self.col = indent.chars().count();
        self.lines.insert(self.row, format!("{indent}{rest}"));
        true
    }

    pub fn backspace(&mut self) -> bool {
        if self.read_only {
            return false;
        }
        if self.col > 0 {
            let line = &mut self.lines[self.row];
            let at = byte_index(line, self.col - 1);
            line.remove(at);
            self.col -= 1;
            true
        } else if self.row > 0 {
            let current = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len(self.row);
            self.lines[self.row].push_str(&current);
            true
        } else {
            false
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line_len(self.row);
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.line_len(self.row) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn move_home(&mut self) {
        self.col = 0;
    }

    pub fn move_end(&mut self) {
        self.col = self.line_len(self.row);
    }

    /// Scrolls the read-only view
    pub fn scroll_by(&mut self, delta: isize) {
        let max = self.lines.len().saturating_sub(1);
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }

    /// First visible line for a viewport of `height` rows
    fn viewport_start(&self, height: usize) -> usize {
        if height == 0 {
            return 0;
        }
        if self.read_only {
            return self.scroll.min(self.lines.len().saturating_sub(1));
        }
        if self.row < self.scroll {
            self.row
        } else if self.row >= self.scroll + height {
            self.row + 1 - height
        } else {
            self.scroll
        }
    }
}

impl EditorSurface for TerminalEditor {
    fn value(&self) -> String {
        self.lines.join("\n")
    }

    fn set_value(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_string).collect();
        self.row = 0;
        self.col = 0;
        self.scroll = 0;
    }

    fn set_option(&mut self, option: EditorOption) {
        match option {
            EditorOption::ReadOnly(flag) => self.read_only = flag,
            EditorOption::Mode(mode) => self.mode = mode,
            EditorOption::HtmlMode(flag) => self.html_mode = flag,
        }
    }

    fn apply_editor_style(&mut self) {
        self.row = self.row.min(self.lines.len().saturating_sub(1));
        self.col = self.col.min(self.line_len(self.row));
        self.scroll = 0;
    }
}

/// Draws the editor with syntax highlighting and, when writable, the cursor
pub fn render(frame: &mut Frame, area: Rect, editor: &TerminalEditor) {
    let status = if editor.read_only { "read-only" } else { "editing" };
    let title = format!(" {} · {} ", editor.mode.id(), status);
    let border = if editor.read_only {
        RosePine::HIGHLIGHT_HIGH
    } else {
        RosePine::GOLD
    };

    let block = Block::bordered()
        .title(title)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(border).bg(RosePine::BASE));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let content_area = Rect {
        width: inner.width.saturating_sub(1),
        ..inner
    };
    let height = content_area.height as usize;
    let start = editor.viewport_start(height);
    let end = (start + height).min(editor.lines.len());
    let visible = editor.lines[start..end].join("\n");

    let lines = highlight(&visible, &editor.mode);
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(RosePine::SURFACE)),
        content_area,
    );

    if editor.lines.len() > height {
        let mut state = ScrollbarState::default()
            .content_length(editor.lines.len())
            .position(start);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .style(Style::default().fg(RosePine::SUBTLE))
            .thumb_style(Style::default().fg(RosePine::HIGHLIGHT_HIGH));
        frame.render_stateful_widget(scrollbar, inner, &mut state);
    }

    if !editor.read_only && editor.row >= start && editor.row < end {
        let line = &editor.lines[editor.row];
        let prefix = &line[..byte_index(line, editor.col)];
        let x = content_area.x + (prefix.width() as u16).min(content_area.width.saturating_sub(1));
        let y = content_area.y + (editor.row - start) as u16;
        frame.set_cursor_position(Position::new(x, y));
    }
}

fn highlight(text: &str, mode: &SyntaxMode) -> Vec<Line<'static>> {
    let syntax = match mode {
        SyntaxMode::Language(name) => SYNTAX_SET.find_syntax_by_name(name),
        SyntaxMode::Plain => None,
    };

    let Some(syntax) = syntax else {
        return text
            .split('\n')
            .map(|line| Line::from(Span::raw(line.to_string()).fg(RosePine::TEXT)))
            .collect();
    };

    let theme = &THEME_SET.themes["base16-mocha.dark"];
    let mut highlighter = HighlightLines::new(syntax, theme);

    LinesWithEndings::from(text)
        .map(|line| {
            let spans: Vec<Span> = highlighter
                .highlight_line(line, &SYNTAX_SET)
                .unwrap_or_default()
                .into_iter()
                .map(|(style, piece)| {
                    let fg = style.foreground;
                    Span::styled(
                        piece.trim_end_matches('\n').to_string(),
                        Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b)),
                    )
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writable(text: &str) -> TerminalEditor {
        let mut editor = TerminalEditor::new();
        editor.set_value(text);
        editor.set_option(EditorOption::ReadOnly(false));
        editor
    }

    #[test]
    fn read_only_editor_ignores_edits() {
        let mut editor = TerminalEditor::new();
        editor.set_value("abc");
        assert!(!editor.insert_char('x'));
        assert!(!editor.backspace());
        assert_eq!(editor.value(), "abc");
    }

    #[test]
    fn typing_inserts_at_cursor() {
        let mut editor = writable("ac");
        editor.move_right();
        assert!(editor.insert_char('b'));
        assert_eq!(editor.value(), "abc");
        assert_eq!(editor.cursor(), (0, 2));
    }

    #[test]
    fn newline_splits_and_keeps_indent() {
        let mut editor = writable("    foo();bar();");
        for _ in 0..10 {
            editor.move_right();
        }
        editor.insert_newline();
        assert_eq!(editor.value(), "    foo();\n    bar();");
        assert_eq!(editor.cursor(), (1, 4));
    }

    #[test]
    fn backspace_at_line_start_joins_lines() {
        let mut editor = writable("ab\ncd");
        editor.move_down();
        assert!(editor.backspace());
        assert_eq!(editor.value(), "abcd");
        assert_eq!(editor.cursor(), (0, 2));
        editor.move_home();
        assert!(!editor.backspace());
    }

    #[test]
    fn multibyte_characters_are_edited_by_char() {
        let mut editor = writable("héllo");
        editor.move_right();
        editor.move_right();
        assert!(editor.backspace());
        assert_eq!(editor.value(), "hllo");
    }

    #[test]
    fn set_value_resets_cursor_and_round_trips_newlines() {
        let mut editor = writable("one");
        editor.move_end();
        editor.set_value("a\n\nb\n");
        assert_eq!(editor.cursor(), (0, 0));
        assert_eq!(editor.value(), "a\n\nb\n");
        assert_eq!(editor.line_count(), 4);
    }

    #[test]
    fn options_update_state() {
        let mut editor = TerminalEditor::new();
        editor.set_option(EditorOption::Mode(SyntaxMode::Language("Rust".into())));
        editor.set_option(EditorOption::HtmlMode(true));
        assert_eq!(editor.mode(), &SyntaxMode::Language("Rust".into()));
        assert!(editor.html_mode());
        assert!(editor.is_read_only());
    }

    #[test]
    fn viewport_follows_cursor_when_writable() {
        let mut editor = writable("1\n2\n3\n4\n5\n6");
        for _ in 0..5 {
            editor.move_down();
        }
        assert_eq!(editor.viewport_start(3), 3);

        editor.set_option(EditorOption::ReadOnly(true));
        editor.scroll_by(2);
        assert_eq!(editor.viewport_start(3), 2);
        editor.scroll_by(-10);
        assert_eq!(editor.viewport_start(3), 0);
    }

    #[test]
    fn highlighting_keeps_one_line_per_source_line() {
        let text = "fn main() {\n    let x = 1;\n}";
        let plain = highlight(text, &SyntaxMode::Plain);
        let rust = highlight(text, &SyntaxMode::Language("Rust".into()));
        assert_eq!(plain.len(), 3);
        assert_eq!(rust.len(), 3);
    }
}

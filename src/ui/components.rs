//! UI Components and Layout Module
//!
//! Reusable pieces drawn around the snippet detail view: the bottom bar with
//! breadcrumbs and shortcuts, toast messages, the confirm prompt, single-line
//! input overlays and the help menu.

use crate::app::{App, InputMode};
use crate::ui::colors::RosePine;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph, Widget},
};

/// Renders the bottom bar: breadcrumbs on the left, shortcuts for the
/// current input mode on the right
pub fn render_bottom_bar(frame: &mut Frame, area: Rect, app: &App) {
    let navbar_chunks = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(2)]).split(area);

    let left_content = Paragraph::new(breadcrumbs(app))
        .alignment(Alignment::Left)
        .style(Style::default().fg(RosePine::SUBTLE))
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(RosePine::HIGHLIGHT_HIGH)),
        );

    let right_content = Paragraph::new(context_shortcuts(&app.input_mode))
        .alignment(Alignment::Right)
        .style(Style::default().fg(RosePine::MUTED))
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(RosePine::HIGHLIGHT_HIGH)),
        );

    left_content.render(navbar_chunks[0], frame.buffer_mut());
    right_content.render(navbar_chunks[1], frame.buffer_mut());
}

pub fn context_shortcuts(mode: &InputMode) -> &'static str {
    match mode {
        InputMode::Normal => {
            " [e] Edit │ [Tab] File │ [c] Copy │ [x] Delete File │ [D] Delete Snippet │ [n/p] Snippet │ [?] Help │ [q] Quit "
        }
        InputMode::Editor => {
            " [^S] Save │ [Esc] Discard │ [^N] New File │ [^X] Delete File │ [^R] Rename │ [F2-F4] Info │ [^L] Language "
        }
        InputMode::HelpMenu => " [Esc] Close ",
        InputMode::FileName(_) => " Type to rename │ [⏎] Done │ [Esc] Close ",
        _ => " [⏎] Confirm │ [Esc] Cancel ",
    }
}

fn breadcrumbs(app: &App) -> Line<'static> {
    let mut spans = vec![Span::styled(
        " 󰅩 Snippets ",
        Style::default().fg(RosePine::BASE).bg(RosePine::IRIS),
    )];

    let name = match app.panel.draft() {
        Some(draft) => Some(draft.name.clone()),
        None => app.panel.snippet().map(|snippet| snippet.name.clone()),
    };
    if let Some(name) = name {
        spans.push(Span::styled(" ❯ ", Style::default().fg(RosePine::MUTED)));
        spans.push(Span::styled(
            format!(" {name} "),
            Style::default().fg(RosePine::SUBTLE),
        ));
    }

    if let Some(file) = app.panel.visible_files().get(app.panel.selected_file()) {
        spans.push(Span::styled(" ❯ ", Style::default().fg(RosePine::MUTED)));
        spans.push(Span::styled(
            format!(" {} ", file.display_name()),
            Style::default().fg(RosePine::BASE).bg(RosePine::GOLD),
        ));
    }

    Line::from(spans)
}

/// Toast line shown near the top of the screen
pub fn render_message_overlay(frame: &mut Frame, area: Rect, message: &str, is_error: bool) {
    let popup_area = spotlight_bar(70, area);

    Clear.render(popup_area, frame.buffer_mut());

    let (icon, color) = if is_error {
        ("✗", RosePine::LOVE)
    } else {
        ("✓", RosePine::FOAM)
    };

    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(color).bg(RosePine::SURFACE));
    let inner_area = block.inner(popup_area);
    block.render(popup_area, frame.buffer_mut());

    let chunks = Layout::horizontal([Constraint::Length(3), Constraint::Min(10)]).split(inner_area);

    Paragraph::new(icon)
        .alignment(Alignment::Center)
        .style(Style::default().fg(color).bold())
        .render(chunks[0], frame.buffer_mut());

    Paragraph::new(message.to_string())
        .alignment(Alignment::Left)
        .style(Style::default().fg(RosePine::TEXT))
        .render(chunks[1], frame.buffer_mut());
}

/// Centered yes/no dialog for an open prompt
pub fn render_confirm_dialog(frame: &mut Frame, message: &str) {
    let popup_area = centered_rect(50, 7, frame.area());
    Clear.render(popup_area, frame.buffer_mut());

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(RosePine::TEXT).bold(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(" [y] ", Style::default().fg(RosePine::BASE).bg(RosePine::LOVE)),
            Span::styled(" Delete    ", Style::default().fg(RosePine::SUBTLE)),
            Span::styled(" [n] ", Style::default().fg(RosePine::BASE).bg(RosePine::FOAM)),
            Span::styled(" Cancel", Style::default().fg(RosePine::SUBTLE)),
        ]),
    ];

    Paragraph::new(content)
        .alignment(Alignment::Center)
        .block(
            Block::bordered()
                .title(" Confirm ")
                .title_alignment(Alignment::Center)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(RosePine::LOVE)),
        )
        .style(Style::default().bg(RosePine::SURFACE))
        .render(popup_area, frame.buffer_mut());
}

fn input_title(mode: &InputMode) -> (&'static str, &'static str) {
    match mode {
        InputMode::SnippetName => (" Snippet Name ", "Name shown in the header"),
        InputMode::Description => (" Description ", "Plain text, shown under the name"),
        InputMode::Tags => (
            " Edit Tags ",
            "Enter tags separated by spaces, prefix with # (e.g. #rust #web)",
        ),
        InputMode::FileName(_) => (" File Name ", "The extension picks the syntax mode"),
        InputMode::Language => (" Language ", "Language name, e.g. Rust, Python, HTML"),
        _ => (" Input ", ""),
    }
}

/// Single-line input popup for the active input mode
pub fn render_input_overlay(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect(70, 8, frame.area());
    Clear.render(popup_area, frame.buffer_mut());

    let (title, help_text) = input_title(&app.input_mode);
    let block = Block::bordered()
        .title(title)
        .title_alignment(Alignment::Center)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(RosePine::IRIS).bg(RosePine::SURFACE));
    let inner_area = block.inner(popup_area);
    block.render(popup_area, frame.buffer_mut());

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .split(inner_area);

    Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(RosePine::SUBTLE))
        .render(chunks[0], frame.buffer_mut());

    Paragraph::new(format!("{}█", app.input_buffer))
        .style(Style::default().fg(RosePine::TEXT))
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(RosePine::HIGHLIGHT_HIGH)),
        )
        .render(chunks[1], frame.buffer_mut());
}

pub fn render_help_menu(frame: &mut Frame) {
    let popup_area = centered_rect(64, 22, frame.area());
    Clear.render(popup_area, frame.buffer_mut());

    let entries = [
        ("Viewing", ""),
        ("e / ⏎", "Start editing"),
        ("Tab / ← →", "Switch file"),
        ("c", "Copy file to clipboard"),
        ("x", "Delete file"),
        ("D", "Delete snippet"),
        ("n / p", "Next / previous snippet"),
        ("↑ ↓", "Scroll"),
        ("Editing", ""),
        ("Ctrl-S", "Save"),
        ("Esc", "Discard changes"),
        ("Ctrl-N", "Add file"),
        ("Ctrl-X", "Delete file"),
        ("Ctrl-R", "Rename file"),
        ("Ctrl-L", "Pick language"),
        ("F2 / F3 / F4", "Name / description / tags"),
        ("Alt-← →", "Switch file"),
        ("Ctrl-Q", "Save and quit"),
    ];

    let lines: Vec<Line> = entries
        .iter()
        .map(|(key, action)| {
            if action.is_empty() {
                Line::from(Span::styled(
                    format!(" {key}"),
                    Style::default().fg(RosePine::GOLD).bold(),
                ))
            } else {
                Line::from(vec![
                    Span::styled(format!("   {key:<14}"), Style::default().fg(RosePine::FOAM)),
                    Span::styled(action.to_string(), Style::default().fg(RosePine::TEXT)),
                ])
            }
        })
        .collect();

    Paragraph::new(lines)
        .block(
            Block::bordered()
                .title(" Help ")
                .title_alignment(Alignment::Center)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(RosePine::IRIS)),
        )
        .style(Style::default().bg(RosePine::SURFACE))
        .render(popup_area, frame.buffer_mut());
}

pub fn spotlight_bar(width_percent: u16, r: Rect) -> Rect {
    let layout = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(1),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .split(layout[1])[1]
}

/// Rectangle of `width_percent` by `height` rows centered in `area`
pub fn centered_rect(width_percent: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .split(area)[1];

    Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .split(vertical)[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcuts_follow_input_mode() {
        assert!(context_shortcuts(&InputMode::Normal).contains("[e] Edit"));
        assert!(context_shortcuts(&InputMode::Editor).contains("[^S] Save"));
        assert!(context_shortcuts(&InputMode::Tags).contains("[⏎] Confirm"));
    }

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = centered_rect(50, 7, area);
        assert_eq!(rect.height, 7);
        assert_eq!(rect.width, 50);
        assert_eq!(rect.x, 25);
        assert!(rect.y + rect.height <= area.height);
    }
}

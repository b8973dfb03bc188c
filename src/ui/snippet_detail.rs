//! Snippet detail view: header with name and metadata, tags, description,
//! file tabs and the editor surface.

use crate::app::{App, InputMode};
use crate::config::{DEFAULT_DATE_FORMAT, UiConfig};
use crate::models::{Snippet, SnippetFile};
use crate::ui::colors::RosePine;
use crate::ui::{components, editor};
use chrono::{DateTime, Utc};
use std::fmt::Write;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Widget},
};

/// Values shown in the header, taken from the draft while editing
struct HeaderView<'a> {
    name: &'a str,
    description: &'a str,
    tags: Vec<&'a str>,
}

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(RosePine::BASE)), area);

    let chunks = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(3),
    ])
    .split(area);

    match app.panel.snippet() {
        Some(snippet) => {
            render_header(frame, chunks[0], app, snippet);
            render_file_tabs(frame, chunks[1], app);
            editor::render(frame, chunks[2], app.panel.editor());
        }
        None => render_empty(frame, chunks[0].union(chunks[2])),
    }
    components::render_bottom_bar(frame, chunks[3], app);

    if let Some(toast) = &app.toast {
        components::render_message_overlay(frame, area, &toast.message, toast.is_error);
    }

    match app.input_mode {
        InputMode::Normal | InputMode::Editor => {}
        InputMode::HelpMenu => components::render_help_menu(frame),
        _ => components::render_input_overlay(frame, app),
    }

    if let Some(prompt) = &app.prompt {
        components::render_confirm_dialog(frame, &prompt.message);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App, snippet: &Snippet) {
    let view = match app.panel.draft() {
        Some(draft) => HeaderView {
            name: &draft.name,
            description: &draft.description,
            tags: draft
                .tags
                .iter()
                .map(String::as_str)
                .filter(|tag| !tag.trim().is_empty())
                .collect(),
        },
        None => HeaderView {
            name: &snippet.name,
            description: &snippet.description,
            tags: snippet.visible_tags(),
        },
    };
    let config = app.panel.config();
    let border = if app.panel.is_editing() {
        RosePine::GOLD
    } else {
        RosePine::HIGHLIGHT_HIGH
    };

    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(border));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let rows = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(inner);
    let top = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(rows[0]);

    Paragraph::new(Span::styled(
        format!(" {}", view.name),
        Style::default().fg(RosePine::TEXT).bold(),
    ))
    .render(top[0], frame.buffer_mut());

    Paragraph::new(info_line(snippet, config).join("  │  "))
        .alignment(Alignment::Right)
        .style(Style::default().fg(RosePine::MUTED))
        .render(top[1], frame.buffer_mut());

    let mut spans = tag_spans(&view.tags, config.tag_color());
    if !view.description.is_empty() {
        spans.push(Span::styled("   ", Style::default()));
        spans.push(Span::styled(
            view.description.to_string(),
            Style::default().fg(RosePine::SUBTLE).italic(),
        ));
    }
    Paragraph::new(Line::from(spans)).render(rows[1], frame.buffer_mut());
}

/// Metadata parts enabled in the config, in display order
fn info_line(snippet: &Snippet, config: &UiConfig) -> Vec<String> {
    let mut parts = Vec::new();
    if config.show_snippet_create_time {
        parts.push(format!(
            "Created {}",
            format_time(&snippet.create_at, &config.date_format)
        ));
    }
    if config.show_snippet_update_time {
        parts.push(format!(
            "Updated {}",
            format_time(&snippet.update_at, &config.date_format)
        ));
    }
    if config.show_snippet_copy_count {
        parts.push(format!("Copied {}", snippet.copy_count));
    }
    parts
}

/// Renders with `format`, or the default format if chrono rejects it
fn format_time(at: &DateTime<Utc>, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", at.format(format)).is_ok() {
        return out;
    }
    at.format(DEFAULT_DATE_FORMAT).to_string()
}

fn tag_spans(tags: &[&str], color: Color) -> Vec<Span<'static>> {
    if tags.is_empty() {
        return vec![Span::styled(
            " No tag",
            Style::default().fg(RosePine::MUTED).italic(),
        )];
    }
    tags.iter()
        .map(|tag| Span::styled(format!(" #{tag}"), Style::default().fg(color)))
        .collect()
}

fn tab_titles(files: &[SnippetFile]) -> Vec<String> {
    files
        .iter()
        .enumerate()
        .map(|(i, file)| format!(" {} {} ", i + 1, file.display_name()))
        .collect()
}

/// One tab per file; every tab gets an equal share of the row
fn render_file_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let files = app.panel.visible_files();
    let block = Block::bordered()
        .title(" Files ")
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(RosePine::HIGHLIGHT_HIGH));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let count = files.len().max(1) as u32;
    let slots = Layout::horizontal(vec![Constraint::Ratio(1, count); files.len()]).split(inner);
    let selected = app.panel.selected_file();

    for (i, (title, slot)) in tab_titles(files).into_iter().zip(slots.iter()).enumerate() {
        let style = if i == selected {
            Style::default().fg(RosePine::BASE).bg(RosePine::ROSE).bold()
        } else {
            Style::default().fg(RosePine::SUBTLE).bg(RosePine::SURFACE)
        };
        Paragraph::new(title)
            .alignment(Alignment::Center)
            .style(style)
            .render(*slot, frame.buffer_mut());
    }
}

fn render_empty(frame: &mut Frame, area: Rect) {
    Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "No snippet selected",
            Style::default().fg(RosePine::SUBTLE).bold(),
        )),
        Line::from(Span::styled(
            "Run `snipdeck list` to see what is stored",
            Style::default().fg(RosePine::MUTED),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::bordered()
            .border_type(BorderType::Rounded)
            .style(Style::default().fg(RosePine::HIGHLIGHT_HIGH)),
    )
    .render(area, frame.buffer_mut());
}

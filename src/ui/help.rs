use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use super::dialogs::centered_rect;

fn key_line(key: &'static str, text: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<11}", key), Style::default().fg(Color::Cyan)),
        Span::raw(text),
    ])
}

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
}

/// 渲染帮助面板
pub fn render(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(70, 70, area);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keys (any key closes) ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let lists_help = vec![
        heading("Lists"),
        Line::from(""),
        key_line("j, ↓", "next task"),
        key_line("k, ↑", "previous task"),
        key_line("g / G", "first / last"),
        key_line("c", "complete task"),
        key_line("d", "delete task"),
        key_line("a, n", "add a task"),
        key_line("Tab", "next pane"),
        key_line("Shift+Tab", "previous pane"),
        key_line("q", "quit"),
    ];

    let form_help = vec![
        heading("Add form"),
        Line::from(""),
        key_line("Enter", "add task"),
        key_line("Tab", "next field"),
        key_line("←/→ Space", "change priority"),
        key_line("Esc", "back to lists"),
        Line::from(""),
        heading("Dialogs"),
        Line::from(""),
        key_line("y", "confirm"),
        key_line("n / Esc", "cancel"),
        key_line("←/→ Enter", "pick a button"),
        key_line("Ctrl+C", "quit anywhere"),
    ];

    f.render_widget(
        Paragraph::new(lists_help)
            .block(Block::default().borders(Borders::RIGHT))
            .wrap(Wrap { trim: false }),
        columns[0],
    );
    f.render_widget(
        Paragraph::new(form_help).wrap(Wrap { trim: false }),
        columns[1],
    );
}

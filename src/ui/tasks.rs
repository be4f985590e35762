use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};

use super::form::priority_color;
use crate::view::TaskListView;

/// 渲染任务列表（全部任务 / 最近任务）
pub fn render(
    f: &mut Frame,
    area: Rect,
    title: &str,
    view: &TaskListView,
    selected: usize,
    is_focused: bool,
) {
    let (border_color, title_style) = if is_focused {
        (
            Color::White,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )
    } else {
        (Color::DarkGray, Style::default().fg(Color::Gray))
    };

    let block = Block::default()
        .title(format!(" {} ({}) ", title, view.cards.len()))
        .title_alignment(Alignment::Center)
        .title_style(title_style)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .border_type(BorderType::Rounded);

    if let Some(message) = view.empty_message {
        let paragraph = Paragraph::new(message)
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = view
        .cards
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let is_selected = is_focused && i == selected;

            let title_style = if card.completed {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };

            let check = if card.completed { "✓ " } else { "  " };

            let mut lines = vec![Line::from(vec![
                Span::styled("● ", Style::default().fg(priority_color(card.priority))),
                Span::styled(check, Style::default().fg(Color::Green)),
                Span::styled(card.title.as_str(), title_style),
                Span::styled(
                    format!("  {}", card.priority),
                    Style::default().fg(priority_color(card.priority)),
                ),
            ])];

            if !card.description.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("    {}", card.description),
                    Style::default().fg(Color::Gray),
                )));
            }

            let mut meta = vec![Span::styled(
                format!("    Due: {}", card.due_label),
                Style::default().fg(Color::Rgb(129, 161, 193)),
            )];
            for action in &card.actions {
                meta.push(Span::styled(
                    format!("  [{}]", action.kind()),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            lines.push(Line::from(meta));

            let style = if is_selected {
                Style::default().bg(Color::Rgb(59, 66, 82))
            } else {
                Style::default()
            };
            ListItem::new(lines).style(style)
        })
        .collect();

    let mut state = ListState::default();
    if is_focused {
        state.select(Some(selected));
    }

    let list = List::new(items).block(block).highlight_symbol("▶");
    f.render_stateful_widget(list, area, &mut state);
}

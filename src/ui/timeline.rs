use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};

use super::form::priority_color;
use crate::view::TimelineView;

/// 渲染时间线：按截止日期分组的待办任务
pub fn render(f: &mut Frame, area: Rect, view: &TimelineView, selected: usize, is_focused: bool) {
    let border_color = if is_focused {
        Color::White
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .title(" Timeline ")
        .title_alignment(Alignment::Center)
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

    // 日期标题不可选，所以列表索引与条目序号不同
    let mut items = Vec::new();
    let mut selected_item = None;
    let mut entry_index = 0;

    for bucket in &view.buckets {
        items.push(ListItem::new(Line::from(vec![
            Span::styled(
                format!(" {:>2} ", bucket.day_label),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Rgb(136, 192, 208))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {}", bucket.month_label),
                Style::default().fg(Color::Rgb(136, 192, 208)),
            ),
        ])));

        for entry in &bucket.entries {
            if is_focused && entry_index == selected {
                selected_item = Some(items.len());
            }
            items.push(ListItem::new(Line::from(vec![
                Span::raw("   "),
                Span::styled("● ", Style::default().fg(priority_color(entry.priority))),
                Span::raw(entry.title.as_str()),
            ])));
            entry_index += 1;
        }
    }

    let mut state = ListState::default();
    state.select(selected_item);

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Rgb(59, 66, 82)))
        .highlight_symbol("▶");
    f.render_stateful_widget(list, area, &mut state);
}

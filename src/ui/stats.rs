use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Paragraph},
};

use crate::view::Stats;

/// 渲染统计面板和总体进度条
pub fn render(f: &mut Frame, area: Rect, stats: &Stats) {
    let block = Block::default()
        .title(" Progress ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .border_type(BorderType::Rounded);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let counts = Line::from(vec![
        Span::raw(" Total "),
        Span::styled(stats.total.to_string(), Style::default().fg(Color::Cyan)),
        Span::raw("   Completed "),
        Span::styled(stats.completed.to_string(), Style::default().fg(Color::Green)),
        Span::raw("   Progress "),
        Span::styled(
            format!("{}%", stats.progress_percent),
            Style::default().fg(Color::Yellow),
        ),
    ]);
    f.render_widget(Paragraph::new(counts), chunks[0]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Rgb(163, 190, 140)).bg(Color::Rgb(59, 66, 82)))
        .percent(u16::from(stats.progress_percent));
    f.render_widget(gauge, chunks[1]);
}

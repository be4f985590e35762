use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

/// 对话框类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogType {
    /// 确认对话框（删除前询问）
    Confirm {
        title: String,
        message: String,
        yes_selected: bool,
    },
    /// 提示对话框，任意键关闭
    Notice { title: String, message: String },
}

/// 渲染居中的对话框
pub fn render_dialog(f: &mut Frame, dialog: &DialogType) {
    let area = centered_rect(50, 30, f.area());

    // 清空对话框区域
    f.render_widget(Clear, area);

    match dialog {
        DialogType::Confirm {
            title,
            message,
            yes_selected,
        } => render_confirm_dialog(f, area, title, message, *yes_selected),
        DialogType::Notice { title, message } => render_notice_dialog(f, area, title, message),
    }
}

fn dialog_block(title: &str, border: Color) -> Block<'static> {
    Block::default()
        .title(format!("  {}  ", title))
        .title_alignment(Alignment::Left)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(Color::Rgb(46, 52, 64))) // Nord background
}

/// 渲染确认对话框
fn render_confirm_dialog(f: &mut Frame, area: Rect, title: &str, message: &str, yes_selected: bool) {
    let block = dialog_block(title, Color::Rgb(235, 203, 139)); // Nord yellow
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // 消息
            Constraint::Length(3), // 按钮
        ])
        .split(inner);

    let message_text = Paragraph::new(message)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Rgb(216, 222, 233)));
    f.render_widget(message_text, chunks[0]);

    let button_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(chunks[1]);

    // 否按钮放左侧，默认选中
    let no_style = if !yes_selected {
        Style::default()
            .bg(Color::Rgb(191, 97, 106))
            .fg(Color::Rgb(46, 52, 64))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Rgb(191, 97, 106))
            .add_modifier(Modifier::DIM)
    };
    f.render_widget(
        Paragraph::new("[ n ] Cancel")
            .style(no_style)
            .alignment(Alignment::Center),
        button_chunks[1],
    );

    let yes_style = if yes_selected {
        Style::default()
            .bg(Color::Rgb(163, 190, 140))
            .fg(Color::Rgb(46, 52, 64))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Rgb(163, 190, 140))
            .add_modifier(Modifier::DIM)
    };
    f.render_widget(
        Paragraph::new("[ y ] OK")
            .style(yes_style)
            .alignment(Alignment::Center),
        button_chunks[2],
    );
}

fn render_notice_dialog(f: &mut Frame, area: Rect, title: &str, message: &str) {
    let block = dialog_block(title, Color::Rgb(163, 190, 140)); // Nord green
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    f.render_widget(
        Paragraph::new(message)
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Rgb(216, 222, 233))),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new("press any key")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Rgb(129, 161, 193))),
        chunks[1],
    );
}

/// 创建一个居中的矩形区域
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

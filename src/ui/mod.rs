pub mod dialogs;
pub mod form;
mod help;
mod stats;
mod tasks;
pub mod text_input;
mod timeline;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, Focus, Mode, Notification, NotificationLevel};
use crate::fs::SlotStorage;

/// 主渲染函数
pub fn render<S: SlotStorage>(f: &mut Frame, app: &mut App<S>) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // 主内容区域
            Constraint::Length(1), // 状态栏
        ])
        .split(f.area());

    // 左：表单 + 统计 | 中：全部任务 | 右：最近任务 + 时间线
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
        ])
        .split(main_chunks[0]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(13), Constraint::Length(4)])
        .split(columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(columns[2]);

    let focus = app.focus;
    form::render(f, left[0], &mut app.form, focus);

    let dashboard = app.controller.dashboard();
    stats::render(f, left[1], &dashboard.stats);
    tasks::render(
        f,
        columns[1],
        "All Tasks",
        &dashboard.all,
        app.selected(Focus::AllTasks),
        focus == Focus::AllTasks,
    );
    tasks::render(
        f,
        right[0],
        "Recent",
        &dashboard.recent,
        app.selected(Focus::Recent),
        focus == Focus::Recent,
    );
    timeline::render(
        f,
        right[1],
        &dashboard.timeline,
        app.selected(Focus::Timeline),
        focus == Focus::Timeline,
    );

    render_statusbar(f, main_chunks[1], app);

    if let Some(dialog) = &app.dialog {
        dialogs::render_dialog(f, dialog);
    }

    if app.mode == Mode::Help {
        help::render(f, f.area());
    }

    if let Some(ref notification) = app.notification {
        render_notification(f, f.area(), notification);
    }
}

fn render_statusbar<S: SlotStorage>(f: &mut Frame, area: Rect, app: &App<S>) {
    let (mode_text, color) = match app.mode {
        Mode::Normal if app.focus.is_form() => ("INSERT", Color::Cyan),
        Mode::Normal => ("NORMAL", Color::Green),
        Mode::Dialog => ("DIALOG", Color::Magenta),
        Mode::Help => ("HELP", Color::Blue),
    };

    let stats = app.controller.dashboard().stats;
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode_text),
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " {} tasks | {} done | ? help ",
            stats.total, stats.completed
        )),
    ]);

    f.render_widget(
        Paragraph::new(line).style(Style::default().bg(Color::Black)),
        area,
    );
}

/// 渲染通知栏
fn render_notification(f: &mut Frame, area: Rect, notification: &Notification) {
    // 通知栏占据顶部 3 行
    let notification_area = Rect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: area.height.min(3),
    };

    let (bg_color, fg_color, prefix) = match notification.level {
        NotificationLevel::Info => (Color::Blue, Color::White, "ℹ"),
        NotificationLevel::Success => (Color::Green, Color::White, "✓"),
        NotificationLevel::Warning => (Color::Yellow, Color::Black, "⚠"),
        NotificationLevel::Error => (Color::Red, Color::White, "✗"),
    };

    let content = Line::from(vec![
        Span::styled(
            format!(" {} ", prefix),
            Style::default()
                .fg(fg_color)
                .bg(bg_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(notification.message.as_str(), Style::default().fg(fg_color)),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(bg_color))
        .style(Style::default().bg(bg_color));

    f.render_widget(Paragraph::new(content).block(block), notification_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Controller;
    use crate::fs::MemorySlots;
    use crate::models::TaskForm;
    use crate::store::{DEFAULT_STORAGE_KEY, TaskStore};
    use chrono::NaiveDate;
    use ratatui::{Terminal, backend::TestBackend};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_render_empty_and_populated_dashboard() {
        let store = TaskStore::load(MemorySlots::new(), DEFAULT_STORAGE_KEY);
        let mut app = App::new(Controller::new(store, true));
        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();

        terminal.draw(|f| render(f, &mut app)).unwrap();
        assert!(buffer_text(&terminal).contains("No tasks yet"));

        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        app.controller
            .submit(&TaskForm::new("Read chapter 3", "", "2099-01-01", "high"), today)
            .unwrap();

        terminal.draw(|f| render(f, &mut app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Read chapter 3"));
        assert!(text.contains("All Tasks (1)"));
    }
}

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::text_input::TextField;
use crate::app::Focus;
use crate::models::{Priority, TaskForm};

/// 添加任务表单的状态
pub struct FormState {
    pub title: TextField,
    pub description: TextField,
    pub due_date: TextField,
    pub priority: Priority,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            title: TextField::new("Title *", "What do you need to study?"),
            description: TextField::new("Description", "optional"),
            due_date: TextField::new("Due date *", "YYYY-MM-DD"),
            priority: Priority::default(),
        }
    }
}

impl FormState {
    pub fn to_form(&self) -> TaskForm {
        TaskForm::new(
            self.title.value(),
            self.description.value(),
            self.due_date.value(),
            self.priority.as_str(),
        )
    }

    pub fn reset(&mut self) {
        self.title.clear();
        self.description.clear();
        self.due_date.clear();
        self.priority = Priority::default();
    }

    pub fn field_mut(&mut self, focus: Focus) -> Option<&mut TextField> {
        match focus {
            Focus::Title => Some(&mut self.title),
            Focus::Description => Some(&mut self.description),
            Focus::DueDate => Some(&mut self.due_date),
            _ => None,
        }
    }
}

/// 渲染表单区域
pub fn render(f: &mut Frame, area: Rect, form: &mut FormState, focus: Focus) {
    let block = Block::default()
        .title(" Add Task ")
        .title_alignment(ratatui::layout::Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focus.is_form() {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        });

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 标题
            Constraint::Length(3), // 描述
            Constraint::Length(3), // 截止日期
            Constraint::Length(1), // 优先级
            Constraint::Length(1), // 提示
            Constraint::Min(0),
        ])
        .split(inner);

    form.title.render(f, chunks[0], focus == Focus::Title);
    form.description.render(f, chunks[1], focus == Focus::Description);
    form.due_date.render(f, chunks[2], focus == Focus::DueDate);

    render_priority(f, chunks[3], form.priority, focus == Focus::Priority);

    let hint = if focus.is_form() {
        "Enter add · Tab next · Esc leave"
    } else {
        "press a to add a task"
    };
    f.render_widget(
        Paragraph::new(hint).style(Style::default().fg(Color::Rgb(129, 161, 193))),
        chunks[4],
    );
}

fn render_priority(f: &mut Frame, area: Rect, selected: Priority, focused: bool) {
    let mut spans = vec![Span::styled(
        " Priority: ",
        if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        },
    )];

    for priority in Priority::ALL {
        let style = if priority == selected {
            Style::default()
                .fg(Color::Black)
                .bg(priority_color(priority))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(priority_color(priority))
        };
        spans.push(Span::styled(format!(" {} ", priority), style));
        spans.push(Span::raw(" "));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// 优先级颜色
pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Blue,
    }
}

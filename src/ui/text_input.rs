use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders},
};
use tui_textarea::{CursorMove, TextArea};

/// 单行输入框（表单字段）
pub struct TextField {
    /// 底层 TextArea 组件
    textarea: TextArea<'static>,
    title: &'static str,
}

impl TextField {
    pub fn new(title: &'static str, placeholder: &str) -> Self {
        let mut textarea = TextArea::default();
        textarea.set_placeholder_text(placeholder);
        textarea.set_placeholder_style(Style::default().fg(Color::Rgb(76, 86, 106)));
        // 单行输入不需要当前行高亮
        textarea.set_cursor_line_style(Style::default());
        Self { textarea, title }
    }

    pub fn value(&self) -> String {
        self.textarea.lines().join(" ")
    }

    pub fn clear(&mut self) {
        self.textarea.move_cursor(CursorMove::Bottom);
        self.textarea.move_cursor(CursorMove::End);
        while self.textarea.delete_char() {}
    }

    /// 处理编辑按键，返回 true 表示按键已被消费
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.textarea.insert_char(c);
            }
            KeyCode::Backspace => {
                self.textarea.delete_char();
            }
            KeyCode::Delete => {
                self.textarea.delete_next_char();
            }
            KeyCode::Left => self.textarea.move_cursor(CursorMove::Back),
            KeyCode::Right => self.textarea.move_cursor(CursorMove::Forward),
            KeyCode::Home => self.textarea.move_cursor(CursorMove::Head),
            KeyCode::End => self.textarea.move_cursor(CursorMove::End),
            _ => return false,
        }
        true
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, focused: bool) {
        let border_color = if focused {
            Color::Rgb(136, 192, 208) // Nord cyan
        } else {
            Color::DarkGray
        };

        // 只有聚焦时显示光标
        let cursor_style = if focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        self.textarea.set_cursor_style(cursor_style);
        self.textarea.set_block(
            Block::default()
                .title(format!(" {} ", self.title))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(border_color)),
        );

        f.render_widget(&self.textarea, area);
    }
}

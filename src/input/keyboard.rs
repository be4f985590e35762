use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Focus, Mode};
use crate::fs::SlotStorage;
use crate::ui::dialogs::DialogType;

/// 处理键盘输入
/// 返回 false 表示应该退出应用
pub fn handle_key_input<S: SlotStorage>(app: &mut App<S>, key: KeyEvent) -> bool {
    handle_key_at(app, key, Local::now().date_naive())
}

fn handle_key_at<S: SlotStorage>(app: &mut App<S>, key: KeyEvent, today: NaiveDate) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }

    match app.mode {
        Mode::Dialog => handle_dialog_mode(app, key),
        Mode::Help => {
            // 任意键关闭帮助
            app.mode = Mode::Normal;
        }
        Mode::Normal if app.focus.is_form() => handle_form_keys(app, key, today),
        Mode::Normal => return handle_list_keys(app, key),
    }
    true
}

fn handle_dialog_mode<S: SlotStorage>(app: &mut App<S>, key: KeyEvent) {
    let Some(dialog) = &mut app.dialog else {
        app.mode = Mode::Normal;
        return;
    };

    match dialog {
        DialogType::Notice { .. } => app.dismiss_dialog(),
        DialogType::Confirm { yes_selected, .. } => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.answer_confirm(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.answer_confirm(false),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
                *yes_selected = !*yes_selected;
            }
            KeyCode::Enter => {
                let confirmed = *yes_selected;
                app.answer_confirm(confirmed);
            }
            _ => {}
        },
    }
}

fn handle_form_keys<S: SlotStorage>(app: &mut App<S>, key: KeyEvent, today: NaiveDate) {
    match key.code {
        KeyCode::Tab => app.focus = app.focus.next(),
        KeyCode::BackTab => app.focus = app.focus.prev(),
        KeyCode::Esc => app.focus = Focus::AllTasks,
        KeyCode::Enter => app.submit_form(today),
        KeyCode::Left if app.focus == Focus::Priority => {
            app.form.priority = app.form.priority.prev();
        }
        KeyCode::Right | KeyCode::Char(' ') if app.focus == Focus::Priority => {
            app.form.priority = app.form.priority.next();
        }
        _ => {
            let focus = app.focus;
            if let Some(field) = app.form.field_mut(focus) {
                field.handle_key(key);
            }
        }
    }
}

fn handle_list_keys<S: SlotStorage>(app: &mut App<S>, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => return false,
        KeyCode::Char('?') => app.mode = Mode::Help,
        KeyCode::Tab => app.focus = app.focus.next(),
        KeyCode::BackTab => app.focus = app.focus.prev(),
        KeyCode::Char('j') | KeyCode::Down => app.move_selection(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_selection(-1),
        KeyCode::Char('g') | KeyCode::Home => app.select_edge(false),
        KeyCode::Char('G') | KeyCode::End => app.select_edge(true),
        KeyCode::Char('c') => app.dispatch_selected("complete"),
        KeyCode::Char('d') | KeyCode::Delete => app.dispatch_selected("delete"),
        KeyCode::Char('a') | KeyCode::Char('n') => app.focus = Focus::Title,
        _ => {}
    }
    true
}

use chrono::NaiveDate;
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

use crate::controller::{Controller, NoticeLevel, Reply};
use crate::fs::SlotStorage;
use crate::ui::dialogs::DialogType;
use crate::ui::form::FormState;
use crate::view::TaskAction;

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl From<NoticeLevel> for NotificationLevel {
    fn from(level: NoticeLevel) -> Self {
        match level {
            NoticeLevel::Info => NotificationLevel::Info,
            NoticeLevel::Success => NotificationLevel::Success,
            NoticeLevel::Warning => NotificationLevel::Warning,
        }
    }
}

/// 通知消息
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub created_at: Instant,
}

impl Notification {
    /// 检查通知是否已过期（3秒后自动消失）
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed().as_secs() >= 3
    }
}

/// 应用模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// 正常模式 - 导航和输入
    Normal,
    /// 对话框模式
    Dialog,
    /// 帮助模式 - 显示快捷键
    Help,
}

/// 当前聚焦的区域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    Title,
    Description,
    DueDate,
    Priority,
    AllTasks,
    Recent,
    Timeline,
}

impl Focus {
    const ORDER: [Focus; 7] = [
        Focus::Title,
        Focus::Description,
        Focus::DueDate,
        Focus::Priority,
        Focus::AllTasks,
        Focus::Recent,
        Focus::Timeline,
    ];

    pub fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn is_form(self) -> bool {
        matches!(
            self,
            Focus::Title | Focus::Description | Focus::DueDate | Focus::Priority
        )
    }
}

/// 应用状态
pub struct App<S: SlotStorage> {
    pub controller: Controller<S>,
    pub mode: Mode,
    pub focus: Focus,
    pub form: FormState,
    /// 每个列表选中的行
    pub selected_index: HashMap<Focus, usize>,
    /// 当前显示的对话框
    pub dialog: Option<DialogType>,
    /// 通知消息
    pub notification: Option<Notification>,
}

impl<S: SlotStorage> App<S> {
    pub fn new(controller: Controller<S>) -> Self {
        Self {
            controller,
            mode: Mode::Normal,
            focus: Focus::AllTasks,
            form: FormState::default(),
            selected_index: HashMap::new(),
            dialog: None,
            notification: None,
        }
    }

    /// 聚焦列表中的行（任务 id + 可用操作）
    pub fn pane_rows(&self, pane: Focus) -> Vec<(u64, Vec<TaskAction>)> {
        let dashboard = self.controller.dashboard();
        match pane {
            Focus::AllTasks => dashboard
                .all
                .cards
                .iter()
                .map(|c| (c.id, c.actions.clone()))
                .collect(),
            Focus::Recent => dashboard
                .recent
                .cards
                .iter()
                .map(|c| (c.id, c.actions.clone()))
                .collect(),
            Focus::Timeline => dashboard
                .timeline
                .buckets
                .iter()
                .flat_map(|b| b.entries.iter())
                .map(|e| (e.id, e.actions.clone()))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn selected(&self, pane: Focus) -> usize {
        self.selected_index.get(&pane).copied().unwrap_or(0)
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.pane_rows(self.focus).len();
        if len == 0 {
            return;
        }
        let current = self.selected(self.focus) as isize;
        let next = (current + delta).clamp(0, len as isize - 1) as usize;
        self.selected_index.insert(self.focus, next);
    }

    pub fn select_edge(&mut self, last: bool) {
        let len = self.pane_rows(self.focus).len();
        let idx = if last { len.saturating_sub(1) } else { 0 };
        self.selected_index.insert(self.focus, idx);
    }

    /// 统一分发：根据选中行的标识符找到对应操作
    pub fn dispatch_selected(&mut self, kind: &str) {
        let rows = self.pane_rows(self.focus);
        let Some((id, actions)) = rows.get(self.selected(self.focus)) else {
            return;
        };

        // 与 HTML 按钮相同：由 (data-action, data-id) 解析出操作
        let action = TaskAction::parse(kind, &id.to_string());
        match action.filter(|a| actions.contains(a)) {
            Some(action) => {
                debug!(id, kind, "dispatching action");
                let reply = self.controller.activate(action);
                self.handle_reply(reply);
            }
            None => self.show_notification(
                format!("Task {} cannot be {}d", id, kind),
                NotificationLevel::Info,
            ),
        }
    }

    /// 提交表单
    pub fn submit_form(&mut self, today: NaiveDate) {
        let form = self.form.to_form();
        match self.controller.submit(&form, today) {
            Ok(reply) => {
                self.form.reset();
                self.focus = Focus::Title;
                self.handle_reply(reply);
            }
            Err(err) => self.show_notification(err.to_string(), NotificationLevel::Error),
        }
    }

    /// 回应确认对话框
    pub fn answer_confirm(&mut self, confirmed: bool) {
        self.dialog = None;
        self.mode = Mode::Normal;
        let reply = self.controller.respond(confirmed);
        self.handle_reply(reply);
    }

    pub fn dismiss_dialog(&mut self) {
        self.dialog = None;
        self.mode = Mode::Normal;
    }

    fn handle_reply(&mut self, reply: Reply) {
        self.clamp_selections();
        match reply {
            Reply::Rendered => {}
            Reply::Notice(notice) if notice.level == NoticeLevel::Success => {
                self.dialog = Some(DialogType::Notice {
                    title: "Done".to_string(),
                    message: notice.message,
                });
                self.mode = Mode::Dialog;
            }
            Reply::Notice(notice) => {
                self.show_notification(notice.message, notice.level.into());
            }
            Reply::Confirm(request) => {
                self.dialog = Some(DialogType::Confirm {
                    title: "Delete Task".to_string(),
                    message: request.message,
                    yes_selected: false,
                });
                self.mode = Mode::Dialog;
            }
        }
    }

    /// 视图重建后保证选中行仍然有效
    fn clamp_selections(&mut self) {
        for pane in [Focus::AllTasks, Focus::Recent, Focus::Timeline] {
            let len = self.pane_rows(pane).len();
            let idx = self.selected(pane).min(len.saturating_sub(1));
            self.selected_index.insert(pane, idx);
        }
    }

    /// 显示通知消息
    pub fn show_notification(&mut self, message: String, level: NotificationLevel) {
        self.notification = Some(Notification {
            message,
            level,
            created_at: Instant::now(),
        });
    }

    /// 清除已过期的通知
    pub fn clear_expired_notification(&mut self) {
        if let Some(ref notification) = self.notification {
            if notification.is_expired() {
                self.notification = None;
            }
        }
    }
}

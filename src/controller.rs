use chrono::NaiveDate;
use tracing::{info, warn};

use crate::fs::SlotStorage;
use crate::models::{FormError, TaskForm};
use crate::store::{Mutation, TaskStore};
use crate::view::{Dashboard, TaskAction, build_dashboard};

pub const ADDED_MESSAGE: &str = "Task added successfully!";
pub const CONFIRM_DELETE_MESSAGE: &str = "Are you sure you want to delete this task?";

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
        }
    }
}

/// A yes/no question the front end must answer through [`Controller::respond`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub message: String,
    pub action: TaskAction,
}

/// What the front end should do after an interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Views were recomputed; nothing else to show
    Rendered,
    /// Views were recomputed (if anything changed) and a message should be shown
    Notice(Notice),
    /// Ask the user before going further
    Confirm(ConfirmRequest),
}

/// 交互控制器：把用户意图转换为存储变更并重新计算视图
pub struct Controller<S: SlotStorage> {
    store: TaskStore<S>,
    dashboard: Dashboard,
    pending_confirm: Option<ConfirmRequest>,
    confirm_delete: bool,
}

impl<S: SlotStorage> Controller<S> {
    pub fn new(store: TaskStore<S>, confirm_delete: bool) -> Self {
        let dashboard = build_dashboard(store.all());
        Self {
            store,
            dashboard,
            pending_confirm: None,
            confirm_delete,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    #[cfg(test)]
    pub fn pending_confirm(&self) -> Option<&ConfirmRequest> {
        self.pending_confirm.as_ref()
    }

    /// 提交表单：校验、添加、重新渲染
    pub fn submit(&mut self, form: &TaskForm, today: NaiveDate) -> Result<Reply, FormError> {
        let new_task = form.validate(today)?;
        let result = self.store.add(new_task);
        self.render();

        Ok(match result {
            Ok(task) => {
                info!(id = task.id, "task added from form");
                Reply::Notice(Notice::new(NoticeLevel::Success, ADDED_MESSAGE))
            }
            Err(err) => save_failed(&err),
        })
    }

    /// Dispatch an action picked from any view
    pub fn activate(&mut self, action: TaskAction) -> Reply {
        match action {
            TaskAction::Complete(id) => {
                let result = self.store.complete(id);
                self.finish_mutation(id, result)
            }
            TaskAction::Delete(id) => {
                if self.store.get(id).is_none() {
                    return not_found(id);
                }
                if self.confirm_delete {
                    let request = ConfirmRequest {
                        message: CONFIRM_DELETE_MESSAGE.to_string(),
                        action,
                    };
                    self.pending_confirm = Some(request.clone());
                    return Reply::Confirm(request);
                }
                let result = self.store.delete(id);
                self.finish_mutation(id, result)
            }
        }
    }

    /// Answer the outstanding confirmation; declining changes nothing
    pub fn respond(&mut self, confirmed: bool) -> Reply {
        let Some(request) = self.pending_confirm.take() else {
            return Reply::Rendered;
        };

        if !confirmed {
            info!(id = request.action.id(), "delete cancelled");
            return Reply::Rendered;
        }

        let id = request.action.id();
        let result = self.store.delete(id);
        self.finish_mutation(id, result)
    }

    fn finish_mutation(&mut self, id: u64, result: anyhow::Result<Mutation>) -> Reply {
        self.render();
        match result {
            Ok(Mutation::Applied) | Ok(Mutation::Unchanged) => Reply::Rendered,
            Ok(Mutation::NotFound) => not_found(id),
            Err(err) => save_failed(&err),
        }
    }

    fn render(&mut self) {
        self.dashboard = build_dashboard(self.store.all());
    }
}

fn not_found(id: u64) -> Reply {
    Reply::Notice(Notice::new(
        NoticeLevel::Info,
        format!("Task {} not found", id),
    ))
}

fn save_failed(err: &anyhow::Error) -> Reply {
    warn!(error = %format!("{:#}", err), "saving tasks failed");
    Reply::Notice(Notice::new(
        NoticeLevel::Warning,
        format!("Changes are not saved: {:#}", err),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemorySlots;
    use crate::store::DEFAULT_STORAGE_KEY;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn controller(confirm_delete: bool) -> Controller<MemorySlots> {
        let store = TaskStore::load(MemorySlots::new(), DEFAULT_STORAGE_KEY);
        Controller::new(store, confirm_delete)
    }

    fn add(ctl: &mut Controller<MemorySlots>, title: &str, due: &str) -> u64 {
        let reply = ctl
            .submit(&TaskForm::new(title, "", due, "high"), today())
            .unwrap();
        assert_eq!(
            reply,
            Reply::Notice(Notice::new(NoticeLevel::Success, ADDED_MESSAGE))
        );
        ctl.store().all().last().unwrap().id
    }

    #[test]
    fn test_submit_adds_and_renders() {
        let mut ctl = controller(true);
        add(&mut ctl, "Read chapter 3", "2099-01-01");

        assert_eq!(ctl.dashboard().stats.total, 1);
        assert_eq!(ctl.dashboard().all.cards[0].title, "Read chapter 3");
        assert_eq!(ctl.dashboard().timeline.buckets.len(), 1);
    }

    #[test]
    fn test_submit_invalid_form_does_not_mutate() {
        let mut ctl = controller(true);
        let result = ctl.submit(&TaskForm::new("", "", "2099-01-01", "low"), today());
        assert_eq!(result, Err(FormError::MissingTitle));
        assert!(ctl.store().is_empty());
    }

    #[test]
    fn test_complete_rerenders_stats() {
        let mut ctl = controller(true);
        let id = add(&mut ctl, "A", "2099-01-01");
        add(&mut ctl, "B", "2099-01-02");

        assert_eq!(ctl.activate(TaskAction::Complete(id)), Reply::Rendered);
        assert_eq!(ctl.activate(TaskAction::Complete(id)), Reply::Rendered);

        let stats = ctl.dashboard().stats;
        assert_eq!((stats.total, stats.completed, stats.progress_percent), (2, 1, 50));
        assert_eq!(ctl.dashboard().timeline.buckets.len(), 1);
    }

    #[test]
    fn test_delete_confirmed() {
        let mut ctl = controller(true);
        let id = add(&mut ctl, "A", "2099-01-01");

        let reply = ctl.activate(TaskAction::Delete(id));
        assert!(matches!(reply, Reply::Confirm(ref r) if r.message == CONFIRM_DELETE_MESSAGE));
        assert_eq!(ctl.store().len(), 1);

        assert_eq!(ctl.respond(true), Reply::Rendered);
        assert!(ctl.store().is_empty());
        assert_eq!(ctl.dashboard().stats.total, 0);
        assert!(ctl.pending_confirm().is_none());
    }

    #[test]
    fn test_delete_declined_is_noop() {
        let mut ctl = controller(true);
        let id = add(&mut ctl, "A", "2099-01-01");
        let before = ctl.dashboard().clone();

        ctl.activate(TaskAction::Delete(id));
        assert_eq!(ctl.respond(false), Reply::Rendered);

        assert_eq!(ctl.store().len(), 1);
        assert_eq!(ctl.dashboard(), &before);
        // 没有待确认请求时再次回应不做任何事
        assert_eq!(ctl.respond(true), Reply::Rendered);
        assert_eq!(ctl.store().len(), 1);
    }

    #[test]
    fn test_delete_without_confirmation() {
        let mut ctl = controller(false);
        let id = add(&mut ctl, "A", "2099-01-01");
        assert_eq!(ctl.activate(TaskAction::Delete(id)), Reply::Rendered);
        assert!(ctl.store().is_empty());
    }

    #[test]
    fn test_unknown_id_reports_not_found() {
        let mut ctl = controller(true);
        add(&mut ctl, "A", "2099-01-01");

        for action in [TaskAction::Complete(7), TaskAction::Delete(7)] {
            match ctl.activate(action) {
                Reply::Notice(notice) => {
                    assert_eq!(notice.level, NoticeLevel::Info);
                    assert!(notice.message.contains("not found"));
                }
                other => panic!("unexpected reply: {:?}", other),
            }
        }
        assert_eq!(ctl.store().len(), 1);
        assert!(ctl.pending_confirm().is_none());
    }

    #[test]
    fn test_save_failure_surfaces_warning() {
        let mut slots = MemorySlots::new();
        slots.fail_writes = true;
        let store = TaskStore::load(slots, DEFAULT_STORAGE_KEY);
        let mut ctl = Controller::new(store, true);

        let reply = ctl
            .submit(&TaskForm::new("A", "", "2099-01-01", "low"), today())
            .unwrap();
        match reply {
            Reply::Notice(notice) => assert_eq!(notice.level, NoticeLevel::Warning),
            other => panic!("unexpected reply: {:?}", other),
        }
        // 内存中的任务仍然可见
        assert_eq!(ctl.dashboard().stats.total, 1);
    }
}

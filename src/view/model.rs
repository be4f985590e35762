use crate::models::Priority;

/// 视图中的单个操作（按钮）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskAction {
    Complete(u64),
    Delete(u64),
}

impl TaskAction {
    pub fn id(&self) -> u64 {
        match self {
            TaskAction::Complete(id) | TaskAction::Delete(id) => *id,
        }
    }

    /// Identifier emitted as `data-action` by markup adapters
    pub fn kind(&self) -> &'static str {
        match self {
            TaskAction::Complete(_) => "complete",
            TaskAction::Delete(_) => "delete",
        }
    }

    /// Resolve an action from a target's `(data-action, data-id)` pair
    pub fn parse(kind: &str, id: &str) -> Option<Self> {
        let id = id.trim().parse::<u64>().ok()?;
        match kind.trim() {
            "complete" => Some(TaskAction::Complete(id)),
            "delete" => Some(TaskAction::Delete(id)),
            _ => None,
        }
    }
}

/// 完成统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    /// 0..=100
    pub progress_percent: u8,
}

/// A task as shown in the all-tasks and recent lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCard {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub due_label: String,
    pub priority: Priority,
    pub actions: Vec<TaskAction>,
}

/// A list region; `empty_message` is set only when `cards` is empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListView {
    pub cards: Vec<TaskCard>,
    pub empty_message: Option<&'static str>,
}

/// Compact row inside a timeline bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub id: u64,
    pub title: String,
    pub priority: Priority,
    pub actions: Vec<TaskAction>,
}

/// All pending tasks sharing one exact `dueDate` key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineBucket {
    pub date_key: String,
    pub day_label: String,
    pub month_label: String,
    pub entries: Vec<TimelineEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineView {
    pub buckets: Vec<TimelineBucket>,
    pub empty_message: Option<&'static str>,
}

/// 完整视图模型：统计 + 三个视图
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub stats: Stats,
    pub all: TaskListView,
    pub recent: TaskListView,
    pub timeline: TimelineView,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parse() {
        assert_eq!(
            TaskAction::parse("complete", "17"),
            Some(TaskAction::Complete(17))
        );
        assert_eq!(TaskAction::parse("delete", " 3 "), Some(TaskAction::Delete(3)));
        assert_eq!(TaskAction::parse("archive", "3"), None);
        assert_eq!(TaskAction::parse("delete", "abc"), None);
    }

    #[test]
    fn test_action_kind_roundtrips_through_parse() {
        for action in [TaskAction::Complete(9), TaskAction::Delete(9)] {
            let id = action.id().to_string();
            assert_eq!(TaskAction::parse(action.kind(), &id), Some(action));
        }
    }
}

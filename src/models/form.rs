use chrono::NaiveDate;
use thiserror::Error;

use super::task::{DUE_DATE_FORMAT, NewTask, Priority};

/// Why a submitted form was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("title is required")]
    MissingTitle,

    #[error("due date '{0}' is not a valid YYYY-MM-DD date")]
    InvalidDueDate(String),

    #[error("due date {due} is before today ({today})")]
    DueDateInPast { due: NaiveDate, today: NaiveDate },

    #[error("priority must be one of low, medium, high (got '{0}')")]
    InvalidPriority(String),
}

/// 表单原始输入（四个字段，均为用户输入的字符串）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub priority: String,
}

impl TaskForm {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: impl Into<String>,
        priority: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            due_date: due_date.into(),
            priority: priority.into(),
        }
    }

    /// 校验输入：标题非空、日期合法且不早于今天、优先级合法
    pub fn validate(&self, today: NaiveDate) -> Result<NewTask, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::MissingTitle);
        }

        let raw_due = self.due_date.trim();
        let due_date = NaiveDate::parse_from_str(raw_due, DUE_DATE_FORMAT)
            .map_err(|_| FormError::InvalidDueDate(raw_due.to_string()))?;
        if due_date < today {
            return Err(FormError::DueDateInPast {
                due: due_date,
                today,
            });
        }

        // 空优先级使用默认值
        let priority = if self.priority.trim().is_empty() {
            Priority::default()
        } else {
            self.priority
                .parse::<Priority>()
                .map_err(|_| FormError::InvalidPriority(self.priority.trim().to_string()))?
        };

        Ok(NewTask {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            due_date,
            priority,
        })
    }
}

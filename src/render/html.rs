//! Markup adapter: renders the dashboard into the named page regions.

use std::fmt::Write;

use crate::view::{Dashboard, TaskAction, TaskCard, TaskListView, TimelineView};

/// 页面中的插入点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlRegions {
    pub all_tasks: String,
    pub recent_tasks: String,
    pub timeline: String,
    pub total_tasks: String,
    pub completed_tasks: String,
    pub progress_percent: String,
    /// Inline style for the progress bar element
    pub overall_progress: String,
}

pub fn render_regions(dashboard: &Dashboard) -> HtmlRegions {
    let stats = dashboard.stats;
    HtmlRegions {
        all_tasks: render_list(&dashboard.all, Some("📚")),
        recent_tasks: render_list(&dashboard.recent, None),
        timeline: render_timeline(&dashboard.timeline),
        total_tasks: stats.total.to_string(),
        completed_tasks: stats.completed.to_string(),
        progress_percent: format!("{}%", stats.progress_percent),
        overall_progress: format!("width: {}%", stats.progress_percent),
    }
}

/// Standalone page with every region filled in
pub fn render_page(dashboard: &Dashboard) -> String {
    let regions = render_regions(dashboard);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Study Tracker</title>
</head>
<body>
<section class="stats">
  <div>Total: <span id="total-tasks">{total}</span></div>
  <div>Completed: <span id="completed-tasks">{completed}</span></div>
  <div>Progress: <span id="progress-percent">{percent}</span></div>
  <div class="progress"><div id="overall-progress" class="progress-bar" style="{bar}"></div></div>
</section>
<section>
  <h2>All Tasks</h2>
  <ul id="all-tasks" class="task-list">{all}</ul>
</section>
<section>
  <h2>Recent Tasks</h2>
  <ul id="recent-tasks" class="task-list">{recent}</ul>
</section>
<section>
  <h2>Timeline</h2>
  <div id="timeline" class="timeline">{timeline}</div>
</section>
</body>
</html>
"#,
        total = regions.total_tasks,
        completed = regions.completed_tasks,
        percent = regions.progress_percent,
        bar = regions.overall_progress,
        all = regions.all_tasks,
        recent = regions.recent_tasks,
        timeline = regions.timeline,
    )
}

fn render_list(view: &TaskListView, icon: Option<&str>) -> String {
    if let Some(message) = view.empty_message {
        return empty_state(icon, message);
    }

    let mut out = String::new();
    for card in &view.cards {
        render_card(&mut out, card);
    }
    out
}

fn render_card(out: &mut String, card: &TaskCard) {
    let completed_marker = if card.completed {
        r#" <span class="completed-marker">(Completed)</span>"#
    } else {
        ""
    };

    let _ = write!(
        out,
        r#"<li class="task-item {priority}"><div class="task-info"><h3>{title}{marker}</h3><p>{description}</p><p class="task-meta">Due: {due} | Priority: {priority}</p></div><div class="task-actions">"#,
        priority = card.priority,
        title = escape(&card.title),
        marker = completed_marker,
        description = escape(&card.description),
        due = escape(&card.due_label),
    );
    for action in &card.actions {
        let label = match action {
            TaskAction::Complete(_) => "Complete",
            TaskAction::Delete(_) => "Delete",
        };
        render_button(out, *action, label);
    }
    out.push_str("</div></li>");
}

fn render_timeline(view: &TimelineView) -> String {
    if let Some(message) = view.empty_message {
        return empty_state(Some("📅"), message);
    }

    let mut out = String::new();
    for bucket in &view.buckets {
        let _ = write!(
            out,
            r#"<div class="timeline-item" data-date="{key}"><div class="timeline-date">{day}<br>{month}</div><div class="timeline-content">"#,
            key = escape(&bucket.date_key),
            day = escape(&bucket.day_label),
            month = escape(&bucket.month_label),
        );
        for entry in &bucket.entries {
            let _ = write!(
                out,
                r#"<div class="task-item {priority}"><div class="task-info"><h3>{title}</h3><p class="task-meta">{priority} priority</p></div><div class="task-actions">"#,
                priority = entry.priority,
                title = escape(&entry.title),
            );
            for action in &entry.actions {
                let label = match action {
                    TaskAction::Complete(_) => "✓",
                    TaskAction::Delete(_) => "✕",
                };
                render_button(&mut out, *action, label);
            }
            out.push_str("</div></div>");
        }
        out.push_str("</div></div>");
    }
    out
}

/// 按钮只携带标识符，由容器统一分发点击事件
fn render_button(out: &mut String, action: TaskAction, label: &str) {
    let class = match action {
        TaskAction::Complete(_) => "btn btn-success",
        TaskAction::Delete(_) => "btn btn-danger",
    };
    let _ = write!(
        out,
        r#"<button class="{class}" data-action="{kind}" data-id="{id}">{label}</button>"#,
        kind = action.kind(),
        id = action.id(),
    );
}

fn empty_state(icon: Option<&str>, message: &str) -> String {
    let icon = icon.map(|i| format!("<i>{}</i>", i)).unwrap_or_default();
    format!(
        r#"<div class="empty-state">{icon}<p>{message}</p></div>"#,
        message = escape(message)
    )
}

/// Escape text for element content and double-quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, Task};
    use crate::view::build_dashboard;
    use chrono::{TimeZone, Utc};

    fn task(id: u64, title: &str, due: &str, completed: bool) -> Task {
        Task {
            id,
            title: title.to_string(),
            description: "desc".to_string(),
            due_date: due.to_string(),
            priority: Priority::High,
            completed,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_empty_regions() {
        let regions = render_regions(&build_dashboard(&[]));
        assert!(regions.all_tasks.contains("No tasks yet"));
        assert!(regions.recent_tasks.contains("No recent tasks"));
        assert!(regions.timeline.contains("No upcoming tasks"));
        assert_eq!(regions.progress_percent, "0%");
        assert_eq!(regions.overall_progress, "width: 0%");
    }

    #[test]
    fn test_user_text_is_escaped() {
        let tasks = vec![task(1, "<script>alert(1)</script>", "2025-01-01", false)];
        let page = render_page(&build_dashboard(&tasks));
        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_buttons_follow_completion() {
        let tasks = vec![task(1, "Done", "2025-01-01", true), task(2, "Open", "2025-01-02", false)];
        let regions = render_regions(&build_dashboard(&tasks));

        assert!(regions.all_tasks.contains("(Completed)"));
        assert!(!regions.all_tasks.contains(r#"data-action="complete" data-id="1""#));
        assert!(regions.all_tasks.contains(r#"data-action="delete" data-id="1""#));
        assert!(regions.all_tasks.contains(r#"data-action="complete" data-id="2""#));
        assert_eq!(regions.completed_tasks, "1");
        assert_eq!(regions.progress_percent, "50%");
    }

    #[test]
    fn test_timeline_markup() {
        let tasks = vec![task(1, "A", "2025-01-05", false), task(2, "B", "2025-01-05", false)];
        let regions = render_regions(&build_dashboard(&tasks));
        assert_eq!(regions.timeline.matches("timeline-item").count(), 1);
        assert!(regions.timeline.contains("5<br>Jan"));
        assert!(regions.timeline.contains("high priority"));
    }
}

use std::fmt::Write;

use crate::view::{Stats, TaskListView, TimelineView};

/// 任务列表的纯文本表格
pub fn render_list(view: &TaskListView) -> String {
    if let Some(message) = view.empty_message {
        return format!("{}\n", message);
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<15}  {:<6}  {:<18}  {:<4}  TITLE",
        "ID", "PRIO", "DUE", "DONE"
    );
    let _ = writeln!(
        out,
        "{:-<15}  {:-<6}  {:-<18}  {:-<4}  {:-<30}",
        "", "", "", "", ""
    );

    for card in &view.cards {
        let done = if card.completed { "x" } else { "" };
        let _ = writeln!(
            out,
            "{:<15}  {:<6}  {:<18}  {:<4}  {}",
            card.id, card.priority, card.due_label, done, card.title
        );
        if !card.description.is_empty() {
            let _ = writeln!(out, "{:>51}{}", "", card.description);
        }
    }
    out
}

pub fn render_timeline(view: &TimelineView) -> String {
    if let Some(message) = view.empty_message {
        return format!("{}\n", message);
    }

    let mut out = String::new();
    for bucket in &view.buckets {
        let _ = writeln!(
            out,
            "{:>2} {}  ({})",
            bucket.day_label, bucket.month_label, bucket.date_key
        );
        for entry in &bucket.entries {
            let _ = writeln!(
                out,
                "      [{}] {}  #{}",
                entry.priority, entry.title, entry.id
            );
        }
    }
    out
}

pub fn render_stats(stats: &Stats) -> String {
    format!(
        "Total: {}\nCompleted: {}\nProgress: {}%\n",
        stats.total, stats.completed, stats.progress_percent
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, Task};
    use crate::view::build_dashboard;
    use chrono::{TimeZone, Utc};

    fn task(id: u64, due: &str) -> Task {
        Task {
            id,
            title: format!("Task {id}"),
            description: String::new(),
            due_date: due.to_string(),
            priority: Priority::Low,
            completed: false,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_render_list_rows_in_due_order() {
        let dashboard = build_dashboard(&[task(2, "2025-02-01"), task(1, "2025-01-01")]);
        let text = render_list(&dashboard.all);
        let first = text.find("Task 1").unwrap();
        let second = text.find("Task 2").unwrap();
        assert!(first < second);
        assert!(text.contains("Wed, Jan 1, 2025"));
    }

    #[test]
    fn test_render_empty_states() {
        let dashboard = build_dashboard(&[]);
        assert_eq!(render_list(&dashboard.all), "No tasks yet. Add your first study task!\n");
        assert!(render_timeline(&dashboard.timeline).starts_with("No upcoming tasks"));
    }

    #[test]
    fn test_render_stats() {
        let dashboard = build_dashboard(&[task(1, "2025-01-01")]);
        assert_eq!(
            render_stats(&dashboard.stats),
            "Total: 1\nCompleted: 0\nProgress: 0%\n"
        );
    }

    #[test]
    fn test_render_timeline() {
        let dashboard = build_dashboard(&[task(1, "2025-01-05"), task(2, "2025-01-05")]);
        let text = render_timeline(&dashboard.timeline);
        assert!(text.starts_with(" 5 Jan  (2025-01-05)"));
        assert!(text.contains("[low] Task 2  #2"));
    }
}

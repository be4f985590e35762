pub mod dashboard;
pub mod model;

pub use dashboard::build_dashboard;
pub use model::{Dashboard, Stats, TaskAction, TaskCard, TaskListView, TimelineView};

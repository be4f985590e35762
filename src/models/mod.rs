pub mod form;
pub mod task;

pub use form::{FormError, TaskForm};
pub use task::{NewTask, Priority, Task};

pub mod cycle;
pub mod dependency;
pub mod queries;

pub use dependency::{add_dependency, remove_dependency};
pub use queries::{get_blocked_tasks, get_blockers, get_dependents, get_ready_tasks};

pub mod dependency;
pub mod health;
pub mod plan;
pub mod stats;
pub mod task;

pub use dependency::*;
pub use health::*;
pub use plan::*;
pub use stats::*;
pub use task::*;

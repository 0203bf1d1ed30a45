pub mod error;
pub mod grouper;
pub mod memo;
pub mod partition;
pub mod render;
pub mod rod;
pub mod scheduler;
pub mod tabulated;
pub mod types;

pub use error::{OptimizeError, Result};
pub use rod::{compare_strategies, solve_rod_cutting};
pub use scheduler::optimize_queue;

//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `TaskState`: the per-task state machine (pending, rendering, success, etc.)
//! - `VisitedSet`: session-scoped record of URLs already scheduled

mod session_state;
mod task_state;

// Re-export main types
pub use session_state::VisitedSet;
pub use task_state::TaskState;

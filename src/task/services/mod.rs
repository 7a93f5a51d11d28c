//! Application services for task planning.

mod insights;
mod lifecycle;
mod subtasks;
mod update;

pub use insights::{EventBoard, ScoredTask, TaskInsightsService};
pub use lifecycle::{
    CreateTaskRequest, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
};
pub use subtasks::{
    FallbackReason, GeneratedPlan, PlanSource, SubtaskGenerator, fallback_subtasks, parse_plan,
};
pub use update::{TaskUpdateCoordinator, TaskUpdateError, TaskUpdateResult};

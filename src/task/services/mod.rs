//! Application services for task lifecycle orchestration.

mod bulk;
mod concurrency;
mod error;
mod lifecycle;
mod request;

pub use bulk::TaskBulkResult;
pub use concurrency::ensure_not_stale;
pub use error::{TaskErrorKind, TaskLifecycleError, TaskLifecycleResult};
pub use lifecycle::TaskLifecycleService;
pub use request::CreateTaskRequest;

//! Domain model for task lifecycle management.
//!
//! The task domain models the task aggregate, its lifecycle and callback
//! states, the precondition table shared by default and forced transitions,
//! and the per-key outcome of bulk operations. Infrastructure concerns stay
//! outside of the domain boundary.

mod attachment;
mod bulk;
mod classification;
mod error;
mod ids;
mod object_reference;
mod state;
mod task;
mod transition;
mod workbasket;

pub use attachment::Attachment;
pub use bulk::BulkOperationResult;
pub use classification::{ClassificationProfile, ClassificationSummary};
pub use error::{ParseCallbackStateError, ParseTaskStateError, TaskDomainError};
pub use ids::{
    AttachmentId, ClassificationKey, DomainName, ExternalId, TaskId, UserId, WorkbasketId,
};
pub use object_reference::ObjectReference;
pub use state::{CallbackState, TaskState};
pub use task::{NewTask, PersistedTaskData, Task, TaskUpdate};
pub use transition::{TaskAction, TransitionMode, TransitionSubject, ensure_permitted};
pub use workbasket::WorkbasketSummary;

//! Task aggregate root and its lifecycle mutations.

use super::{
    Attachment, AttachmentId, CallbackState, ClassificationKey, DomainName, ExternalId,
    ObjectReference, TaskAction, TaskDomainError, TaskId, TaskState, TransitionMode,
    TransitionSubject, UserId, WorkbasketId, WorkbasketSummary, ensure_permitted,
};
use crate::service_level::domain::Schedule;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Task aggregate root.
///
/// Lifecycle methods validate their preconditions before touching any field,
/// so a rejected call leaves the task unchanged. Successful mutations stamp
/// `modified` with the clock's current time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    external_id: ExternalId,
    workbasket_id: WorkbasketId,
    domain: DomainName,
    classification_domain: DomainName,
    classification_key: ClassificationKey,
    primary_object_reference: ObjectReference,
    state: TaskState,
    callback_state: CallbackState,
    owner: Option<UserId>,
    read: bool,
    transferred: bool,
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
    claimed: Option<DateTime<Utc>>,
    completed: Option<DateTime<Utc>>,
    planned: DateTime<Utc>,
    due: DateTime<Utc>,
    priority: i32,
    attachments: Vec<Attachment>,
    custom_attributes: BTreeMap<String, String>,
    callback_info: BTreeMap<String, String>,
}

/// Parameter object for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Correlation key, unique across tasks.
    pub external_id: ExternalId,
    /// Workbasket receiving the task.
    pub workbasket: WorkbasketSummary,
    /// Classification of the task itself.
    pub classification_key: ClassificationKey,
    /// Business object the task is about.
    pub primary_object_reference: ObjectReference,
    /// Initial callback state.
    pub callback_state: CallbackState,
    /// Attachments in caller order.
    pub attachments: Vec<Attachment>,
    /// Caller-defined attributes.
    pub custom_attributes: BTreeMap<String, String>,
    /// Data for the system processing the callback.
    pub callback_info: BTreeMap<String, String>,
    /// Resolved planned and due instants.
    pub schedule: Schedule,
    /// Resolved priority.
    pub priority: i32,
}

/// Fields an update may change, already resolved against classifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUpdate {
    /// New classification of the task.
    pub classification_key: ClassificationKey,
    /// New primary object reference.
    pub primary_object_reference: ObjectReference,
    /// New read flag.
    pub read: bool,
    /// New attachment list.
    pub attachments: Vec<Attachment>,
    /// New custom attributes.
    pub custom_attributes: BTreeMap<String, String>,
    /// New callback information.
    pub callback_info: BTreeMap<String, String>,
    /// Resolved planned and due instants.
    pub schedule: Schedule,
    /// Resolved priority.
    pub priority: i32,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted external identifier.
    pub external_id: ExternalId,
    /// Persisted workbasket.
    pub workbasket_id: WorkbasketId,
    /// Persisted domain.
    pub domain: DomainName,
    /// Domain the task and attachment classifications are resolved in.
    pub classification_domain: DomainName,
    /// Persisted classification key.
    pub classification_key: ClassificationKey,
    /// Persisted primary object reference.
    pub primary_object_reference: ObjectReference,
    /// Persisted lifecycle state.
    pub state: TaskState,
    /// Persisted callback state.
    pub callback_state: CallbackState,
    /// Persisted owner.
    pub owner: Option<UserId>,
    /// Persisted read flag.
    pub read: bool,
    /// Persisted transferred flag.
    pub transferred: bool,
    /// Persisted creation timestamp.
    pub created: DateTime<Utc>,
    /// Persisted modification timestamp.
    pub modified: DateTime<Utc>,
    /// Persisted claim timestamp.
    pub claimed: Option<DateTime<Utc>>,
    /// Persisted completion timestamp.
    pub completed: Option<DateTime<Utc>>,
    /// Persisted planned instant.
    pub planned: DateTime<Utc>,
    /// Persisted due instant.
    pub due: DateTime<Utc>,
    /// Persisted priority.
    pub priority: i32,
    /// Persisted attachments.
    pub attachments: Vec<Attachment>,
    /// Persisted custom attributes.
    pub custom_attributes: BTreeMap<String, String>,
    /// Persisted callback information.
    pub callback_info: BTreeMap<String, String>,
}

impl Task {
    /// Creates a new task in [`TaskState::Ready`].
    #[must_use]
    pub fn create(new_task: NewTask, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            external_id: new_task.external_id,
            workbasket_id: new_task.workbasket.id,
            classification_domain: new_task.workbasket.domain.clone(),
            domain: new_task.workbasket.domain,
            classification_key: new_task.classification_key,
            primary_object_reference: new_task.primary_object_reference,
            state: TaskState::Ready,
            callback_state: new_task.callback_state,
            owner: None,
            read: false,
            transferred: false,
            created: timestamp,
            modified: timestamp,
            claimed: None,
            completed: None,
            planned: new_task.schedule.planned,
            due: new_task.schedule.due,
            priority: new_task.priority,
            attachments: new_task.attachments,
            custom_attributes: new_task.custom_attributes,
            callback_info: new_task.callback_info,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            external_id: data.external_id,
            workbasket_id: data.workbasket_id,
            domain: data.domain,
            classification_domain: data.classification_domain,
            classification_key: data.classification_key,
            primary_object_reference: data.primary_object_reference,
            state: data.state,
            callback_state: data.callback_state,
            owner: data.owner,
            read: data.read,
            transferred: data.transferred,
            created: data.created,
            modified: data.modified,
            claimed: data.claimed,
            completed: data.completed,
            planned: data.planned,
            due: data.due,
            priority: data.priority,
            attachments: data.attachments,
            custom_attributes: data.custom_attributes,
            callback_info: data.callback_info,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the external identifier.
    #[must_use]
    pub const fn external_id(&self) -> &ExternalId {
        &self.external_id
    }

    /// Returns the workbasket holding the task.
    #[must_use]
    pub const fn workbasket_id(&self) -> &WorkbasketId {
        &self.workbasket_id
    }

    /// Returns the task's domain.
    #[must_use]
    pub const fn domain(&self) -> &DomainName {
        &self.domain
    }

    /// Returns the domain the task's classifications belong to.
    ///
    /// Fixed at creation; a transfer changes [`Self::domain`] only.
    #[must_use]
    pub const fn classification_domain(&self) -> &DomainName {
        &self.classification_domain
    }

    /// Returns the task's classification key.
    #[must_use]
    pub const fn classification_key(&self) -> &ClassificationKey {
        &self.classification_key
    }

    /// Returns the primary object reference.
    #[must_use]
    pub const fn primary_object_reference(&self) -> &ObjectReference {
        &self.primary_object_reference
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        self.state
    }

    /// Returns the callback state.
    #[must_use]
    pub const fn callback_state(&self) -> CallbackState {
        self.callback_state
    }

    /// Returns the owner, if any.
    #[must_use]
    pub const fn owner(&self) -> Option<&UserId> {
        self.owner.as_ref()
    }

    /// Returns whether the task has been read.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.read
    }

    /// Returns whether the task has been transferred.
    #[must_use]
    pub const fn is_transferred(&self) -> bool {
        self.transferred
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    /// Returns the claim timestamp, if claimed.
    #[must_use]
    pub const fn claimed(&self) -> Option<DateTime<Utc>> {
        self.claimed
    }

    /// Returns the completion timestamp, if completed.
    #[must_use]
    pub const fn completed(&self) -> Option<DateTime<Utc>> {
        self.completed
    }

    /// Returns the planned instant.
    #[must_use]
    pub const fn planned(&self) -> DateTime<Utc> {
        self.planned
    }

    /// Returns the due instant.
    #[must_use]
    pub const fn due(&self) -> DateTime<Utc> {
        self.due
    }

    /// Returns the schedule formed by planned and due.
    #[must_use]
    pub const fn schedule(&self) -> Schedule {
        Schedule {
            planned: self.planned,
            due: self.due,
        }
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    /// Returns the attachments in caller order.
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Returns the custom attributes.
    #[must_use]
    pub const fn custom_attributes(&self) -> &BTreeMap<String, String> {
        &self.custom_attributes
    }

    /// Returns the callback information.
    #[must_use]
    pub const fn callback_info(&self) -> &BTreeMap<String, String> {
        &self.callback_info
    }

    // Snapshot edits. These only change the caller's copy; the task service
    // persists them through an update.

    /// Marks the task as read or unread.
    pub fn set_read(&mut self, read: bool) {
        self.read = read;
    }

    /// Requests a new planned instant.
    pub fn set_planned(&mut self, planned: DateTime<Utc>) {
        self.planned = planned;
    }

    /// Requests a new due instant.
    pub fn set_due(&mut self, due: DateTime<Utc>) {
        self.due = due;
    }

    /// Requests a new classification.
    pub fn set_classification_key(&mut self, classification_key: ClassificationKey) {
        self.classification_key = classification_key;
    }

    /// Requests a new primary object reference.
    pub fn set_primary_object_reference(&mut self, object_reference: ObjectReference) {
        self.primary_object_reference = object_reference;
    }

    /// Appends an attachment.
    pub fn add_attachment(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    /// Removes an attachment, returning it when present.
    pub fn remove_attachment(&mut self, attachment_id: AttachmentId) -> Option<Attachment> {
        let position = self
            .attachments
            .iter()
            .position(|attachment| attachment.id() == attachment_id)?;
        Some(self.attachments.remove(position))
    }

    /// Sets a custom attribute.
    pub fn set_custom_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.custom_attributes.insert(key.into(), value.into());
    }

    /// Removes a custom attribute, returning its value when present.
    pub fn remove_custom_attribute(&mut self, key: &str) -> Option<String> {
        self.custom_attributes.remove(key)
    }

    /// Sets a callback information entry.
    pub fn set_callback_info(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.callback_info.insert(key.into(), value.into());
    }

    // Lifecycle mutations.

    fn subject(&self) -> TransitionSubject<'_> {
        TransitionSubject {
            task_id: self.id,
            state: self.state,
            owner: self.owner.as_ref(),
        }
    }

    fn ensure(
        &self,
        action: TaskAction,
        mode: TransitionMode,
        caller: &UserId,
    ) -> Result<(), TaskDomainError> {
        ensure_permitted(self.subject(), action, mode, caller)
    }

    /// Claims the task for `caller`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidState`] or
    /// [`TaskDomainError::InvalidOwner`] when the claim precondition for
    /// `mode` is violated.
    pub fn claim(
        &mut self,
        caller: &UserId,
        mode: TransitionMode,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure(TaskAction::Claim, mode, caller)?;
        let now = clock.utc();
        self.state = TaskState::Claimed;
        self.owner = Some(caller.clone());
        self.claimed = Some(now);
        self.read = true;
        self.modified = now;
        Ok(())
    }

    /// Releases the claim, returning the task to [`TaskState::Ready`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidState`] when the task is not
    /// claimed, or [`TaskDomainError::InvalidOwner`] when `caller` is not the
    /// owner and `mode` is [`TransitionMode::Default`].
    pub fn cancel_claim(
        &mut self,
        caller: &UserId,
        mode: TransitionMode,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure(TaskAction::CancelClaim, mode, caller)?;
        self.state = TaskState::Ready;
        self.owner = None;
        self.claimed = None;
        self.modified = clock.utc();
        Ok(())
    }

    /// Completes the task.
    ///
    /// A forced completion of an unclaimed task claims it for `caller`
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidState`] or
    /// [`TaskDomainError::InvalidOwner`] when the completion precondition for
    /// `mode` is violated.
    pub fn complete(
        &mut self,
        caller: &UserId,
        mode: TransitionMode,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure(TaskAction::Complete, mode, caller)?;
        let now = clock.utc();
        if self.state == TaskState::Ready {
            self.owner = Some(caller.clone());
            self.claimed = Some(now);
        }
        self.state = TaskState::Completed;
        self.completed = Some(now);
        self.modified = now;
        Ok(())
    }

    /// Cancels the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidState`] when the task is already in
    /// a terminal state.
    pub fn cancel(&mut self, caller: &UserId, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.end(TaskAction::Cancel, TaskState::Cancelled, caller, clock)
    }

    /// Terminates the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidState`] when the task is already in
    /// a terminal state.
    pub fn terminate(
        &mut self,
        caller: &UserId,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.end(TaskAction::Terminate, TaskState::Terminated, caller, clock)
    }

    fn end(
        &mut self,
        action: TaskAction,
        end_state: TaskState,
        caller: &UserId,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure(action, TransitionMode::Default, caller)?;
        self.state = end_state;
        self.modified = clock.utc();
        Ok(())
    }

    /// Moves the task into `destination`, marking it unread and transferred.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidState`] when the task is in a
    /// terminal state.
    pub fn transfer_to(
        &mut self,
        destination: &WorkbasketSummary,
        caller: &UserId,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure(TaskAction::Transfer, TransitionMode::Default, caller)?;
        self.workbasket_id = destination.id.clone();
        self.domain = destination.domain.clone();
        self.read = false;
        self.transferred = true;
        self.modified = clock.utc();
        Ok(())
    }

    /// Assigns an owner to a ready task without claiming it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidState`] when the task is not ready.
    pub fn assign_owner(
        &mut self,
        owner: Option<UserId>,
        caller: &UserId,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure(TaskAction::SetOwner, TransitionMode::Default, caller)?;
        self.owner = owner;
        self.modified = clock.utc();
        Ok(())
    }

    /// Checks both deletion gates.
    ///
    /// The callback gate applies in every mode; the completion gate is
    /// skipped for [`TransitionMode::Forced`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::CallbackNotProcessed`] or
    /// [`TaskDomainError::NotCompleted`].
    pub fn ensure_deletable(&self, mode: TransitionMode) -> Result<(), TaskDomainError> {
        if !self.callback_state.permits_deletion() {
            return Err(TaskDomainError::CallbackNotProcessed(self.id));
        }
        if mode == TransitionMode::Default && self.state != TaskState::Completed {
            return Err(TaskDomainError::NotCompleted {
                task_id: self.id,
                state: self.state,
            });
        }
        Ok(())
    }

    /// Moves the callback state to `target`.
    ///
    /// `NONE` is never accepted; `CALLBACK_PROCESSING_COMPLETED` needs a
    /// completed task; `CLAIMED` needs a claimed task whose callback is
    /// required; `CALLBACK_PROCESSING_REQUIRED` needs a task that is not
    /// completed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::CallbackStateRejected`] when the rule for
    /// `target` is violated.
    pub fn change_callback_state(
        &mut self,
        target: CallbackState,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let allowed = match target {
            CallbackState::None => false,
            CallbackState::CallbackProcessingCompleted => self.state == TaskState::Completed,
            CallbackState::Claimed => {
                self.state == TaskState::Claimed
                    && self.callback_state == CallbackState::CallbackProcessingRequired
            }
            CallbackState::CallbackProcessingRequired => self.state != TaskState::Completed,
        };
        if !allowed {
            return Err(TaskDomainError::CallbackStateRejected {
                task_id: self.id,
                state: self.state,
                callback_state: self.callback_state,
                target,
            });
        }
        self.callback_state = target;
        self.modified = clock.utc();
        Ok(())
    }

    /// Replaces planned and due.
    pub fn reschedule(&mut self, schedule: Schedule, clock: &impl Clock) {
        self.planned = schedule.planned;
        self.due = schedule.due;
        self.modified = clock.utc();
    }

    /// Rejects snapshots whose protected fields differ from `persisted`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ImmutableField`] naming the first changed
    /// protected field.
    pub fn ensure_protected_fields_match(&self, persisted: &Self) -> Result<(), TaskDomainError> {
        let changed_field = if self.external_id != persisted.external_id {
            Some("external id")
        } else if self.workbasket_id != persisted.workbasket_id {
            Some("workbasket")
        } else if self.classification_domain != persisted.classification_domain {
            Some("classification domain")
        } else if self.state != persisted.state {
            Some("state")
        } else if self.owner != persisted.owner {
            Some("owner")
        } else if self.callback_state != persisted.callback_state {
            Some("callback state")
        } else {
            None
        };
        match changed_field {
            Some(field) => Err(TaskDomainError::ImmutableField {
                task_id: self.id,
                field,
            }),
            None => Ok(()),
        }
    }

    /// Applies a resolved update.
    pub fn apply_update(&mut self, update: TaskUpdate, clock: &impl Clock) {
        self.classification_key = update.classification_key;
        self.primary_object_reference = update.primary_object_reference;
        self.read = update.read;
        self.attachments = update.attachments;
        self.custom_attributes = update.custom_attributes;
        self.callback_info = update.callback_info;
        self.planned = update.schedule.planned;
        self.due = update.schedule.due;
        self.priority = update.priority;
        self.modified = clock.utc();
    }
}

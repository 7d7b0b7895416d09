//! Service layer for single-task lifecycle operations.

use super::{
    CreateTaskRequest, TaskLifecycleError, TaskLifecycleResult, concurrency::ensure_not_stale,
};
use crate::service_level::domain::ServiceLevelCalculator;
use crate::task::{
    domain::{
        Attachment, CallbackState, ClassificationKey, ClassificationProfile, ClassificationSummary,
        DomainName, ExternalId, NewTask, Task, TaskDomainError, TaskId, TaskUpdate, TransitionMode,
        UserId, WorkbasketId, WorkbasketSummary,
    },
    ports::{
        AuthorizationGate, ClassificationLookup, Permission, TaskRepository, WorkbasketDirectory,
    },
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info};

/// Task lifecycle orchestration service.
///
/// Every operation takes the calling user explicitly. Operations load the
/// task, check the caller's workbasket permission, apply the domain rule and
/// write back with a conditional update keyed on the loaded `modified`
/// stamp.
pub struct TaskLifecycleService<R, A, D, C>
where
    R: TaskRepository,
    A: AuthorizationGate,
    D: ClassificationLookup + WorkbasketDirectory,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    authorization: Arc<A>,
    reference_data: Arc<D>,
    calculator: Arc<ServiceLevelCalculator>,
    clock: Arc<C>,
}

impl<R, A, D, C> TaskLifecycleService<R, A, D, C>
where
    R: TaskRepository,
    A: AuthorizationGate,
    D: ClassificationLookup + WorkbasketDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(
        repository: Arc<R>,
        authorization: Arc<A>,
        reference_data: Arc<D>,
        calculator: Arc<ServiceLevelCalculator>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            repository,
            authorization,
            reference_data,
            calculator,
            clock,
        }
    }

    /// Creates a task in `READY`.
    ///
    /// Planned and due are resolved against the minimum service level of the
    /// task's and its attachments' classifications; the priority is the
    /// maximum of their priorities.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when input validation fails, the caller
    /// lacks `APPEND` on the workbasket, a classification or the workbasket is
    /// unknown, planned and due are inconsistent, or the external identifier
    /// is taken.
    pub async fn create_task(
        &self,
        caller: &UserId,
        request: CreateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let workbasket_id = WorkbasketId::new(request.workbasket_id)?;
        let classification_key = ClassificationKey::new(request.classification_key)?;
        let workbasket = self.resolve_workbasket(&workbasket_id).await?;
        self.authorize(&workbasket.id, Permission::Append, caller)
            .await?;

        let external_id = match request.external_id {
            Some(value) => ExternalId::new(value)?,
            None => ExternalId::generate(),
        };
        let profile = self
            .classification_profile(&workbasket.domain, &classification_key, &request.attachments)
            .await?;
        let schedule = self.calculator.resolve(
            request.planned,
            request.due,
            self.clock.utc(),
            profile.service_level,
        )?;

        let task = Task::create(
            NewTask {
                external_id,
                workbasket,
                classification_key,
                primary_object_reference: request.primary_object_reference,
                callback_state: request.callback_state,
                attachments: request.attachments,
                custom_attributes: request.custom_attributes,
                callback_info: request.callback_info,
                schedule,
                priority: profile.priority,
            },
            &*self.clock,
        );
        self.repository.store(&task).await?;
        info!(task_id = %task.id(), external_id = %task.external_id(), "task created");
        Ok(task)
    }

    /// Retrieves a task the caller may read.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for unknown identifiers or an
    /// authorization error when the caller lacks `READ`.
    pub async fn get_task(&self, caller: &UserId, id: TaskId) -> TaskLifecycleResult<Task> {
        self.load_authorized(id, Permission::Read, caller).await
    }

    /// Claims a ready task for the caller.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is unknown, the caller
    /// lacks `READ`, the task is not `READY`, or another user owns it.
    pub async fn claim(&self, caller: &UserId, id: TaskId) -> TaskLifecycleResult<Task> {
        self.transition(caller, id, Permission::Read, |task, clock| {
            task.claim(caller, TransitionMode::Default, clock)
        })
        .await
    }

    /// Claims any non-terminal task for the caller, taking it over from its
    /// current owner.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is unknown, the caller
    /// lacks `READ`, or the task is in a terminal state.
    pub async fn force_claim(&self, caller: &UserId, id: TaskId) -> TaskLifecycleResult<Task> {
        self.transition(caller, id, Permission::Read, |task, clock| {
            task.claim(caller, TransitionMode::Forced, clock)
        })
        .await
    }

    /// Releases the caller's claim.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is unknown, the caller
    /// lacks `READ`, the task is not `CLAIMED`, or the caller is not the
    /// owner.
    pub async fn cancel_claim(&self, caller: &UserId, id: TaskId) -> TaskLifecycleResult<Task> {
        self.transition(caller, id, Permission::Read, |task, clock| {
            task.cancel_claim(caller, TransitionMode::Default, clock)
        })
        .await
    }

    /// Releases a claim regardless of its owner.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is unknown, the caller
    /// lacks `READ`, or the task is not `CLAIMED`.
    pub async fn force_cancel_claim(
        &self,
        caller: &UserId,
        id: TaskId,
    ) -> TaskLifecycleResult<Task> {
        self.transition(caller, id, Permission::Read, |task, clock| {
            task.cancel_claim(caller, TransitionMode::Forced, clock)
        })
        .await
    }

    /// Completes a task claimed by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is unknown, the caller
    /// lacks `READ`, the task is not `CLAIMED`, or the caller is not the
    /// owner.
    pub async fn complete(&self, caller: &UserId, id: TaskId) -> TaskLifecycleResult<Task> {
        self.complete_with(caller, id, TransitionMode::Default).await
    }

    /// Completes any non-terminal task, claiming it first when necessary.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is unknown, the caller
    /// lacks `READ`, or the task is in a terminal state.
    pub async fn force_complete(&self, caller: &UserId, id: TaskId) -> TaskLifecycleResult<Task> {
        self.complete_with(caller, id, TransitionMode::Forced).await
    }

    pub(super) async fn complete_with(
        &self,
        caller: &UserId,
        id: TaskId,
        mode: TransitionMode,
    ) -> TaskLifecycleResult<Task> {
        self.transition(caller, id, Permission::Read, |task, clock| {
            task.complete(caller, mode, clock)
        })
        .await
    }

    /// Cancels a ready or claimed task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is unknown, the caller
    /// lacks `READ`, or the task is in a terminal state.
    pub async fn cancel(&self, caller: &UserId, id: TaskId) -> TaskLifecycleResult<Task> {
        self.transition(caller, id, Permission::Read, |task, clock| {
            task.cancel(caller, clock)
        })
        .await
    }

    /// Terminates a ready or claimed task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is unknown, the caller
    /// lacks `ADMINISTER`, or the task is in a terminal state.
    pub async fn terminate(&self, caller: &UserId, id: TaskId) -> TaskLifecycleResult<Task> {
        self.transition(caller, id, Permission::Administer, |task, clock| {
            task.terminate(caller, clock)
        })
        .await
    }

    /// Transfers a task to another workbasket.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task or destination is
    /// unknown, the caller lacks `TRANSFER` on the source or `APPEND` on the
    /// destination, or the task is in a terminal state.
    pub async fn transfer(
        &self,
        caller: &UserId,
        id: TaskId,
        destination_id: &WorkbasketId,
    ) -> TaskLifecycleResult<Task> {
        let task = self
            .load_authorized(id, Permission::Transfer, caller)
            .await?;
        let destination = self.open_destination(caller, destination_id).await?;
        self.move_task(caller, task, &destination).await
    }

    /// Transfers a task into an already opened destination.
    pub(super) async fn transfer_into(
        &self,
        caller: &UserId,
        id: TaskId,
        destination: &WorkbasketSummary,
    ) -> TaskLifecycleResult<Task> {
        let task = self
            .load_authorized(id, Permission::Transfer, caller)
            .await?;
        self.move_task(caller, task, destination).await
    }

    /// Resolves a transfer destination and checks `APPEND` on it.
    pub(super) async fn open_destination(
        &self,
        caller: &UserId,
        destination_id: &WorkbasketId,
    ) -> TaskLifecycleResult<WorkbasketSummary> {
        let destination = self.resolve_workbasket(destination_id).await?;
        self.authorize(&destination.id, Permission::Append, caller)
            .await?;
        Ok(destination)
    }

    async fn move_task(
        &self,
        caller: &UserId,
        mut task: Task,
        destination: &WorkbasketSummary,
    ) -> TaskLifecycleResult<Task> {
        let loaded_modified = task.modified();
        let source = task.workbasket_id().clone();
        task.transfer_to(destination, caller, &*self.clock)?;
        self.persist(&task, loaded_modified).await?;
        info!(
            task_id = %task.id(),
            from = %source,
            to = %destination.id,
            "task transferred"
        );
        Ok(task)
    }

    /// Deletes a completed task whose callback does not block deletion.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is unknown, the caller
    /// lacks `ADMINISTER`, the callback is still pending, or the task is not
    /// `COMPLETED`.
    pub async fn delete_task(&self, caller: &UserId, id: TaskId) -> TaskLifecycleResult<()> {
        self.delete_with(caller, id, TransitionMode::Default).await
    }

    /// Deletes a task in any state whose callback does not block deletion.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is unknown, the caller
    /// lacks `ADMINISTER`, or the callback is still pending.
    pub async fn force_delete_task(&self, caller: &UserId, id: TaskId) -> TaskLifecycleResult<()> {
        self.delete_with(caller, id, TransitionMode::Forced).await
    }

    pub(super) async fn delete_with(
        &self,
        caller: &UserId,
        id: TaskId,
        mode: TransitionMode,
    ) -> TaskLifecycleResult<()> {
        let task = self
            .load_authorized(id, Permission::Administer, caller)
            .await?;
        task.ensure_deletable(mode)?;
        self.repository.delete(id).await?;
        info!(task_id = %id, forced = mode == TransitionMode::Forced, "task deleted");
        Ok(())
    }

    /// Persists the caller's edits to a task snapshot.
    ///
    /// The snapshot's `modified` stamp must match the stored task. The
    /// classification, primary object reference, read flag, attachments,
    /// custom attributes and callback information are taken from the
    /// snapshot; priority and planned/due are re-resolved against the
    /// classifications.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Concurrency`] for stale snapshots,
    /// [`TaskDomainError::ImmutableField`] when a protected field changed,
    /// [`crate::service_level::domain::ServiceLevelError::Inconsistent`] when
    /// both planned and due changed and disagree with the service level, or
    /// lookup and authorization errors.
    pub async fn update_task(&self, caller: &UserId, snapshot: &Task) -> TaskLifecycleResult<Task> {
        let persisted = self
            .load_authorized(snapshot.id(), Permission::Read, caller)
            .await?;
        ensure_not_stale(snapshot, &persisted)?;
        snapshot.ensure_protected_fields_match(&persisted)?;

        let profile = self
            .classification_profile(
                persisted.classification_domain(),
                snapshot.classification_key(),
                snapshot.attachments(),
            )
            .await?;
        let planned_changed = snapshot.planned() != persisted.planned();
        let due_changed = snapshot.due() != persisted.due();
        let schedule = self.calculator.resolve(
            planned_changed.then_some(snapshot.planned()),
            due_changed.then_some(snapshot.due()),
            persisted.planned(),
            profile.service_level,
        )?;

        let mut updated = persisted.clone();
        updated.apply_update(
            TaskUpdate {
                classification_key: snapshot.classification_key().clone(),
                primary_object_reference: snapshot.primary_object_reference().clone(),
                read: snapshot.is_read(),
                attachments: snapshot.attachments().to_vec(),
                custom_attributes: snapshot.custom_attributes().clone(),
                callback_info: snapshot.callback_info().clone(),
                schedule,
                priority: profile.priority,
            },
            &*self.clock,
        );
        self.persist(&updated, persisted.modified()).await?;
        debug!(task_id = %updated.id(), "task updated");
        Ok(updated)
    }

    pub(super) async fn assign_owner(
        &self,
        caller: &UserId,
        id: TaskId,
        owner: Option<&UserId>,
    ) -> TaskLifecycleResult<Task> {
        self.transition(caller, id, Permission::Read, |task, clock| {
            task.assign_owner(owner.cloned(), caller, clock)
        })
        .await
    }

    pub(super) async fn reschedule_from_planned(
        &self,
        caller: &UserId,
        id: TaskId,
        planned: DateTime<Utc>,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load_authorized(id, Permission::Read, caller).await?;
        let loaded_modified = task.modified();
        let profile = self
            .classification_profile(
                task.classification_domain(),
                task.classification_key(),
                task.attachments(),
            )
            .await?;
        let schedule = self
            .calculator
            .schedule_from_planned(planned, profile.service_level)?;
        task.reschedule(schedule, &*self.clock);
        self.persist(&task, loaded_modified).await?;
        Ok(task)
    }

    pub(super) async fn change_callback_state(
        &self,
        caller: &UserId,
        external_id: ExternalId,
        target: CallbackState,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self
            .repository
            .find_by_external_id(&external_id)
            .await?
            .ok_or(TaskLifecycleError::ExternalIdNotFound(external_id))?;
        self.authorize(task.workbasket_id(), Permission::Read, caller)
            .await?;
        let loaded_modified = task.modified();
        task.change_callback_state(target, &*self.clock)?;
        self.persist(&task, loaded_modified).await?;
        Ok(task)
    }

    async fn transition<F>(
        &self,
        caller: &UserId,
        id: TaskId,
        permission: Permission,
        apply: F,
    ) -> TaskLifecycleResult<Task>
    where
        F: FnOnce(&mut Task, &C) -> Result<(), TaskDomainError>,
    {
        let mut task = self.load_authorized(id, permission, caller).await?;
        let loaded_modified = task.modified();
        let from = task.state();
        apply(&mut task, &*self.clock)?;
        self.persist(&task, loaded_modified).await?;
        debug!(task_id = %id, %caller, %from, to = %task.state(), "task transition applied");
        Ok(task)
    }

    pub(super) async fn load(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(id))
    }

    pub(super) async fn load_authorized(
        &self,
        id: TaskId,
        permission: Permission,
        caller: &UserId,
    ) -> TaskLifecycleResult<Task> {
        let task = self.load(id).await?;
        self.authorize(task.workbasket_id(), permission, caller)
            .await?;
        Ok(task)
    }

    async fn authorize(
        &self,
        workbasket_id: &WorkbasketId,
        permission: Permission,
        caller: &UserId,
    ) -> TaskLifecycleResult<()> {
        Ok(self
            .authorization
            .check(workbasket_id, permission, caller)
            .await?)
    }

    async fn persist(
        &self,
        task: &Task,
        loaded_modified: DateTime<Utc>,
    ) -> TaskLifecycleResult<()> {
        Ok(self.repository.update(task, loaded_modified).await?)
    }

    async fn resolve_workbasket(
        &self,
        id: &WorkbasketId,
    ) -> TaskLifecycleResult<WorkbasketSummary> {
        self.reference_data
            .find_workbasket(id)
            .await?
            .ok_or_else(|| TaskLifecycleError::WorkbasketNotFound(id.clone()))
    }

    async fn classification_profile(
        &self,
        domain: &DomainName,
        classification_key: &ClassificationKey,
        attachments: &[Attachment],
    ) -> TaskLifecycleResult<ClassificationProfile> {
        let task_classification = self.find_classification(classification_key, domain).await?;
        let mut attachment_classifications = Vec::with_capacity(attachments.len());
        for attachment in attachments {
            attachment_classifications.push(
                self.find_classification(attachment.classification_key(), domain)
                    .await?,
            );
        }
        Ok(ClassificationProfile::combine(
            &task_classification,
            &attachment_classifications,
        ))
    }

    async fn find_classification(
        &self,
        key: &ClassificationKey,
        domain: &DomainName,
    ) -> TaskLifecycleResult<ClassificationSummary> {
        self.reference_data
            .find_classification(key, domain)
            .await?
            .ok_or_else(|| TaskLifecycleError::ClassificationNotFound {
                key: key.clone(),
                domain: domain.clone(),
            })
    }
}

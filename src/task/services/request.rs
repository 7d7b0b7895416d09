//! Request payloads for task services.

use crate::task::domain::{Attachment, CallbackState, ObjectReference};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    pub(super) workbasket_id: String,
    pub(super) classification_key: String,
    pub(super) primary_object_reference: ObjectReference,
    pub(super) external_id: Option<String>,
    pub(super) callback_state: CallbackState,
    pub(super) planned: Option<DateTime<Utc>>,
    pub(super) due: Option<DateTime<Utc>>,
    pub(super) attachments: Vec<Attachment>,
    pub(super) custom_attributes: BTreeMap<String, String>,
    pub(super) callback_info: BTreeMap<String, String>,
}

impl CreateTaskRequest {
    /// Creates a request with the required task fields.
    #[must_use]
    pub fn new(
        workbasket_id: impl Into<String>,
        classification_key: impl Into<String>,
        primary_object_reference: ObjectReference,
    ) -> Self {
        Self {
            workbasket_id: workbasket_id.into(),
            classification_key: classification_key.into(),
            primary_object_reference,
            external_id: None,
            callback_state: CallbackState::None,
            planned: None,
            due: None,
            attachments: Vec::new(),
            custom_attributes: BTreeMap::new(),
            callback_info: BTreeMap::new(),
        }
    }

    /// Sets the external identifier instead of generating one.
    #[must_use]
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    /// Sets the initial callback state.
    #[must_use]
    pub fn with_callback_state(mut self, callback_state: CallbackState) -> Self {
        self.callback_state = callback_state;
        self
    }

    /// Requests a planned instant.
    #[must_use]
    pub fn with_planned(mut self, planned: DateTime<Utc>) -> Self {
        self.planned = Some(planned);
        self
    }

    /// Requests a due instant.
    #[must_use]
    pub fn with_due(mut self, due: DateTime<Utc>) -> Self {
        self.due = Some(due);
        self
    }

    /// Adds an attachment.
    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Adds a custom attribute.
    #[must_use]
    pub fn with_custom_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.custom_attributes.insert(key.into(), value.into());
        self
    }

    /// Adds a callback information entry.
    #[must_use]
    pub fn with_callback_info(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.callback_info.insert(key.into(), value.into());
        self
    }
}

//! Documents attached to a task, each with its own classification.

use super::{AttachmentId, ClassificationKey, ObjectReference};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A document or object attached to a task.
///
/// The attachment's classification contributes to the task's effective
/// service level and priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    id: AttachmentId,
    classification_key: ClassificationKey,
    object_reference: ObjectReference,
    channel: Option<String>,
    received: Option<DateTime<Utc>>,
    custom_attributes: BTreeMap<String, String>,
}

impl Attachment {
    /// Creates an attachment with a fresh identifier.
    #[must_use]
    pub fn new(classification_key: ClassificationKey, object_reference: ObjectReference) -> Self {
        Self {
            id: AttachmentId::new(),
            classification_key,
            object_reference,
            channel: None,
            received: None,
            custom_attributes: BTreeMap::new(),
        }
    }

    /// Sets the channel the attachment arrived through.
    #[must_use]
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Sets the instant the attachment was received.
    #[must_use]
    pub fn with_received(mut self, received: DateTime<Utc>) -> Self {
        self.received = Some(received);
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

    /// Returns the attachment identifier.
    #[must_use]
    pub const fn id(&self) -> AttachmentId {
        self.id
    }

    /// Returns the attachment's classification key.
    #[must_use]
    pub const fn classification_key(&self) -> &ClassificationKey {
        &self.classification_key
    }

    /// Returns the attached object reference.
    #[must_use]
    pub const fn object_reference(&self) -> &ObjectReference {
        &self.object_reference
    }

    /// Returns the channel, if recorded.
    #[must_use]
    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    /// Returns the receipt instant, if recorded.
    #[must_use]
    pub const fn received(&self) -> Option<DateTime<Utc>> {
        self.received
    }

    /// Returns the custom attributes.
    #[must_use]
    pub const fn custom_attributes(&self) -> &BTreeMap<String, String> {
        &self.custom_attributes
    }
}

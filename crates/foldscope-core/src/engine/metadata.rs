use crate::core::analytics::distogram::Distogram;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Optional information attached to a structure after it was loaded.
///
/// None of these fields are computed by the registry itself: distograms come
/// from the analysis workflow, everything else from the external job service.
/// The same type doubles as a patch for [`merge`](StructureMetadata::merge).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StructureMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distogram: Option<Distogram>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl StructureMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_distogram(mut self, distogram: Distogram) -> Self {
        self.distogram = Some(distogram);
        self
    }
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }
    pub fn with_completed_at(mut self, at: DateTime<Utc>) -> Self {
        self.completed_at = Some(at);
        self
    }
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Overwrites every field the patch supplies and leaves the others untouched.
    pub fn merge(&mut self, patch: StructureMetadata) {
        let StructureMetadata {
            distogram,
            confidence,
            created_at,
            completed_at,
            error,
            owner,
        } = patch;

        if distogram.is_some() {
            self.distogram = distogram;
        }
        if confidence.is_some() {
            self.confidence = confidence;
        }
        if created_at.is_some() {
            self.created_at = created_at;
        }
        if completed_at.is_some() {
            self.completed_at = completed_at;
        }
        if error.is_some() {
            self.error = error;
        }
        if owner.is_some() {
            self.owner = owner;
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

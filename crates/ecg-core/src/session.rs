//! The analyzer session: one controller owning all client-side state.
//!
//! [`AnalyzerSession`] ties the upload batch, the analysis lifecycle, the
//! active view and the pending notifications together. Every change goes
//! through a transition method; nothing is mutated from the outside.
//!
//! Submission is split in two so a front-end can keep interacting while the
//! request is in flight:
//!
//! 1. [`begin_submission`](AnalyzerSession::begin_submission) validates the
//!    batch, moves to `Loading`, and hands back a ticket plus the images.
//! 2. [`finish_submission`](AnalyzerSession::finish_submission) applies the
//!    outcome, unless the ticket went stale because the batch was reset or
//!    changed in the meantime.
//!
//! [`submit`](AnalyzerSession::submit) does both around an
//! [`AnalysisBackend`] call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisState;
use crate::backend::AnalysisBackend;
use crate::error::{Error, Result};
use crate::preview;
use crate::types::{CandidateFile, FileId, ImagePart};
use crate::upload::{AddOutcome, Preview, PreviewJob, UploadBatch, UploadState};
use crate::validator::ImageValidator;
use crate::view::ActiveView;

/// Severity of a [`Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// Informational
    Info,
    /// Something went wrong
    Error,
}

/// Transient message for the user (a "toast").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Short headline
    pub title: String,

    /// Details
    pub description: String,

    /// Severity
    pub level: NotificationLevel,

    /// When the notification was raised
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates an error notification.
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            level: NotificationLevel::Error,
            created_at: Utc::now(),
        }
    }

    /// Creates an informational notification.
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            level: NotificationLevel::Info,
            created_at: Utc::now(),
        }
    }
}

/// Identifies one submission; stale tickets are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionTicket(u64);

/// Client-side controller for the upload-then-view workflow.
#[derive(Debug, Default)]
pub struct AnalyzerSession {
    upload: UploadState,
    analysis: AnalysisState,
    view: ActiveView,
    notifications: Vec<Notification>,
    generation: u64,
}

impl AnalyzerSession {
    /// Creates a fresh session with default validation limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fresh session with a custom validator.
    pub fn with_validator(validator: ImageValidator) -> Self {
        Self {
            upload: UploadState::new(validator),
            ..Self::default()
        }
    }

    /// Returns the current batch.
    pub fn batch(&self) -> &UploadBatch {
        self.upload.batch()
    }

    /// Previews aligned with the batch.
    pub fn previews(&self) -> Vec<Preview> {
        self.upload.previews()
    }

    /// Returns the upload state.
    pub fn upload(&self) -> &UploadState {
        &self.upload
    }

    /// Returns the analysis state.
    pub fn analysis(&self) -> &AnalysisState {
        &self.analysis
    }

    /// Returns the active view.
    pub fn view(&self) -> ActiveView {
        self.view
    }

    /// Notifications raised since the last drain.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Takes all pending notifications.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Returns `true` when the submit action should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.upload.batch().is_empty() && !self.analysis.is_loading()
    }

    /// Validates and appends files; see [`UploadState::add_files`].
    ///
    /// Each rejection raises an error notification. A batch change resets
    /// the analysis and invalidates any outstanding submission.
    pub fn add_files(&mut self, candidates: Vec<CandidateFile>) -> AddOutcome {
        let outcome = self.upload.add_files(candidates);

        for reason in &outcome.rejected {
            self.notifications
                .push(Notification::error("Image rejected", reason.to_string()));
        }
        if outcome.changed() {
            self.batch_changed();
        }

        outcome
    }

    /// Removes the file at `index`.
    pub fn remove_file(&mut self, index: usize) -> Result<&UploadBatch> {
        self.upload.remove_file(index)?;
        self.batch_changed();
        Ok(self.upload.batch())
    }

    /// Clears everything and returns to the upload view.
    pub fn reset(&mut self) {
        self.upload.reset();
        self.analysis = AnalysisState::Idle;
        self.view = ActiveView::Upload;
        self.notifications.clear();
        self.generation += 1;
    }

    /// Records a finished preview read; see [`UploadState::complete_preview`].
    pub fn complete_preview(&mut self, id: FileId, data_url: String) -> bool {
        self.upload.complete_preview(id, data_url)
    }

    /// Generates every missing preview and applies the results.
    ///
    /// Returns how many previews were applied.
    pub async fn load_previews(&mut self, jobs: Vec<PreviewJob>) -> Result<usize> {
        let mut applied = 0;
        for (id, url) in preview::generate_previews(jobs).await? {
            if self.upload.complete_preview(id, url) {
                applied += 1;
            }
        }
        Ok(applied)
    }

    /// Returns to the upload view without touching state.
    pub fn back_to_upload(&mut self) {
        self.view = ActiveView::Upload;
    }

    /// Starts a submission.
    ///
    /// Fails without side effects on the batch when it is empty or when an
    /// analysis is already loading. On success the analysis is `Loading` and
    /// the result view is active.
    pub fn begin_submission(&mut self) -> Result<(SubmissionTicket, Vec<ImagePart>)> {
        if self.upload.batch().is_empty() {
            self.notifications.push(Notification::error(
                "No image selected",
                "Please upload an ECG image first",
            ));
            return Err(Error::EmptyBatch);
        }
        if self.analysis.is_loading() {
            return Err(Error::AnalysisInProgress);
        }

        self.generation += 1;
        self.analysis = AnalysisState::Loading;
        self.view = ActiveView::Result;

        let parts = self.upload.batch().to_parts();
        tracing::info!(image_count = parts.len(), "Submitting batch for analysis");
        Ok((SubmissionTicket(self.generation), parts))
    }

    /// Applies the outcome of a submission.
    ///
    /// Returns `false` if the ticket is stale and the outcome was dropped.
    pub fn finish_submission(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<String>,
    ) -> bool {
        if ticket.0 != self.generation || !self.analysis.is_loading() {
            tracing::debug!("Dropping outcome of superseded submission");
            return false;
        }

        match outcome {
            Ok(result) => {
                tracing::info!(chars = result.len(), "Analysis completed");
                self.notifications.push(Notification::info(
                    "Analysis complete",
                    "The ECG interpretation is ready",
                ));
                self.analysis = AnalysisState::Completed { result };
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(error = %message, "Analysis failed");
                self.notifications
                    .push(Notification::error("Analysis failed", message.clone()));
                self.analysis = AnalysisState::Failed { error: message };
            }
        }
        true
    }

    /// Submits the batch to `backend` and waits for the outcome.
    pub async fn submit(&mut self, backend: &dyn AnalysisBackend) -> Result<()> {
        let (ticket, parts) = self.begin_submission()?;
        let outcome = backend.analyze(parts).await;
        self.finish_submission(ticket, outcome);
        Ok(())
    }

    fn batch_changed(&mut self) {
        self.analysis = AnalysisState::Idle;
        self.generation += 1;
    }
}

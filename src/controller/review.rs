//! Submission review workflow.

use std::sync::Arc;

use crate::client::{ArenaApi, ClientError};
use crate::models::{ManualRecord, NewSubmission, Submission};
use crate::notify::{NoticeLevel, Notifier};

/// Drives the public submission form and the moderator review queue.
pub struct ReviewQueue<A: ArenaApi> {
    api: Arc<A>,
    notifier: Arc<dyn Notifier>,
}

impl<A: ArenaApi> ReviewQueue<A> {
    pub fn new(api: Arc<A>, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, notifier }
    }

    /// Submit a record for review. Rejects obviously empty forms before
    /// going to the network.
    pub async fn submit(&self, submission: &NewSubmission) -> Result<bool, ClientError> {
        if submission.atk_team.is_empty()
            || submission.def_team.is_empty()
            || submission.wins + submission.losses == 0
        {
            self.notifier.notify(
                "Both teams and at least one battle are required",
                NoticeLevel::Error,
            );
            return Ok(false);
        }

        match self.api.submit(submission).await {
            Ok(()) => {
                self.notifier
                    .notify("Submission received", NoticeLevel::Success);
                Ok(true)
            }
            Err(e) => {
                self.notifier.notify(&e.to_string(), NoticeLevel::Error);
                Err(e)
            }
        }
    }

    /// Pending submissions awaiting a decision.
    pub async fn pending(&self) -> Result<Vec<Submission>, ClientError> {
        self.api.submissions().await
    }

    /// Already-decided submissions, newest first as the server returns them.
    pub async fn history(&self) -> Result<Vec<Submission>, ClientError> {
        self.api.submission_history().await
    }

    pub async fn approve(&self, id: u64) -> Result<(), ClientError> {
        self.decide(id, "approved", self.api.approve_submission(id).await)
    }

    pub async fn reject(&self, id: u64) -> Result<(), ClientError> {
        self.decide(id, "rejected", self.api.reject_submission(id).await)
    }

    /// Undo an approval, removing the submission's battles from the stats.
    pub async fn revert(&self, id: u64) -> Result<(), ClientError> {
        self.decide(id, "reverted", self.api.revert_submission(id).await)
    }

    /// Add a record directly, bypassing review. Moderator only.
    pub async fn manual_add(&self, record: &ManualRecord) -> Result<(), ClientError> {
        match self.api.manual_add(record).await {
            Ok(()) => {
                self.notifier.notify("Records added", NoticeLevel::Success);
                Ok(())
            }
            Err(e) => {
                self.notifier.notify(&e.to_string(), NoticeLevel::Error);
                Err(e)
            }
        }
    }

    fn decide(
        &self,
        id: u64,
        verb: &str,
        outcome: Result<(), ClientError>,
    ) -> Result<(), ClientError> {
        match outcome {
            Ok(()) => {
                self.notifier.notify(
                    &format!("Submission #{} {}", id, verb),
                    NoticeLevel::Success,
                );
                Ok(())
            }
            Err(e) => {
                self.notifier.notify(&e.to_string(), NoticeLevel::Error);
                Err(e)
            }
        }
    }
}

//! Community submissions awaiting moderator review.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Review state of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Pending => write!(f, "pending"),
            SubmissionStatus::Approved => write!(f, "approved"),
            SubmissionStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A submitted battle record, as listed by the review endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: u64,

    pub server: String,

    pub season: u32,

    #[serde(default)]
    pub tag: String,

    pub atk_team: Vec<u32>,

    pub def_team: Vec<u32>,

    pub wins: u32,

    pub losses: u32,

    #[serde(default)]
    pub note: String,

    /// Server-side path of the attached screenshot, when one was uploaded.
    #[serde(default)]
    pub image_path: Option<String>,

    pub status: SubmissionStatus,

    /// Unix seconds.
    pub created_at: i64,
}

/// Payload for the public submission form.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub server: String,
    pub season: u32,
    pub tag: String,
    pub atk_team: Vec<u32>,
    pub def_team: Vec<u32>,
    pub wins: u32,
    pub losses: u32,
    pub note: String,
    /// Optional local screenshot to attach.
    pub image: Option<PathBuf>,
}

impl NewSubmission {
    /// Comma-joined team field as the form endpoint expects it.
    pub fn team_field(team: &[u32]) -> String {
        team.iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// A record added directly by a moderator, bypassing review.
#[derive(Debug, Clone, Serialize)]
pub struct ManualRecord {
    pub server: String,
    pub season: u32,
    pub tag: String,
    pub atk_team: Vec<u32>,
    pub def_team: Vec<u32>,
    pub wins: u32,
    pub losses: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_submission_wire_parse() {
        let submission: Submission = serde_json::from_value(serde_json::json!({
            "id": 12,
            "server": "jp",
            "season": 11,
            "tag": "",
            "atk_team": [10010, 10005, 13009, 10045, 20008, 26005],
            "def_team": [10059, 10004, 16003, 10084, 20020, 20024],
            "wins": 3,
            "losses": 1,
            "note": "double shield works",
            "image_path": "/uploads/1735689600_proof.png",
            "status": "pending",
            "created_at": 1735689600
        }))
        .unwrap();
        assert_eq!(submission.status, SubmissionStatus::Pending);
        assert_eq!(submission.atk_team.len(), 6);
        assert_eq!(submission.image_path.as_deref(), Some("/uploads/1735689600_proof.png"));
    }

    #[test]
    fn test_submission_status_display() {
        assert_eq!(SubmissionStatus::Pending.to_string(), "pending");
        assert_eq!(SubmissionStatus::Approved.to_string(), "approved");
        assert_eq!(SubmissionStatus::Rejected.to_string(), "rejected");
    }

    #[test]
    fn test_team_field_join() {
        assert_eq!(NewSubmission::team_field(&[10010, 20008]), "10010,20008");
        assert_eq!(NewSubmission::team_field(&[]), "");
    }

    #[test]
    fn test_manual_record_wire_shape() {
        let body = serde_json::to_value(ManualRecord {
            server: "global".to_string(),
            season: 9,
            tag: String::new(),
            atk_team: vec![1, 2],
            def_team: vec![3, 4],
            wins: 5,
            losses: 2,
        })
        .unwrap();
        assert_eq!(body["atk_team"], serde_json::json!([1, 2]));
        assert_eq!(body["wins"], 5);
    }
}

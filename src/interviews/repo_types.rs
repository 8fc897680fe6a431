use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "interview_round_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RoundType {
    #[default]
    Screening,
    Technical,
    Hr,
    Final,
    Offer,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "interview_mode", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InterviewMode {
    #[default]
    Online,
    Offline,
    Hybrid,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "interview_platform", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Zoom,
    Teams,
    Meet,
    OnSite,
    Phone,
    #[default]
    Other,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "interview_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "interview_result", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InterviewResult {
    #[default]
    Waiting,
    Selected,
    Rejected,
    OnHold,
}

impl InterviewResult {
    /// Selected and rejected are only reachable once the interview took place.
    pub fn is_final(self) -> bool {
        matches!(self, InterviewResult::Selected | InterviewResult::Rejected)
    }
}

/// Row of `interviews`.
#[derive(Debug, Clone, FromRow)]
pub struct Interview {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_name: String,
    pub role: String,
    pub package_offered: String,
    pub job_url: String,
    pub hr_name: String,
    pub hr_contact: String,
    pub round_number: i32,
    pub round_type: RoundType,
    pub mode: InterviewMode,
    pub platform: Platform,
    pub location: String,
    pub scheduled_at: OffsetDateTime,
    pub follow_up_date: Option<Date>,
    pub status: InterviewStatus,
    pub result: InterviewResult,
    pub prep_notes: String,
    pub feedback: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Writable columns of an interview, as they will be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewFields {
    pub company_name: String,
    pub role: String,
    pub package_offered: String,
    pub job_url: String,
    pub hr_name: String,
    pub hr_contact: String,
    pub round_number: i32,
    pub round_type: RoundType,
    pub mode: InterviewMode,
    pub platform: Platform,
    pub location: String,
    pub scheduled_at: OffsetDateTime,
    pub follow_up_date: Option<Date>,
    pub status: InterviewStatus,
    pub result: InterviewResult,
    pub prep_notes: String,
    pub feedback: String,
}

impl From<&Interview> for InterviewFields {
    fn from(i: &Interview) -> Self {
        Self {
            company_name: i.company_name.clone(),
            role: i.role.clone(),
            package_offered: i.package_offered.clone(),
            job_url: i.job_url.clone(),
            hr_name: i.hr_name.clone(),
            hr_contact: i.hr_contact.clone(),
            round_number: i.round_number,
            round_type: i.round_type,
            mode: i.mode,
            platform: i.platform,
            location: i.location.clone(),
            scheduled_at: i.scheduled_at,
            follow_up_date: i.follow_up_date,
            status: i.status,
            result: i.result,
            prep_notes: i.prep_notes.clone(),
            feedback: i.feedback.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CompanyRounds {
    pub company_name: String,
    pub total_rounds: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, FromRow)]
pub struct InterviewSummary {
    pub total: i64,
    pub scheduled: i64,
    pub completed: i64,
    pub cancelled: i64,
    pub no_show: i64,
    pub waiting: i64,
    pub selected: i64,
    pub rejected: i64,
    pub on_hold: i64,
}

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::repo_types::{
    Interview, InterviewFields, InterviewMode, InterviewResult, InterviewStatus, Platform,
    RoundType,
};
use crate::error::FieldErrors;
use crate::listing::nullable;

fn first_round() -> i32 {
    1
}

/// POST body.
#[derive(Debug, Deserialize)]
pub struct InterviewInput {
    pub company_name: String,
    pub role: String,
    #[serde(default)]
    pub package_offered: String,
    #[serde(default)]
    pub job_url: String,
    #[serde(default)]
    pub hr_name: String,
    #[serde(default)]
    pub hr_contact: String,
    #[serde(default = "first_round")]
    pub round_number: i32,
    #[serde(default)]
    pub round_type: RoundType,
    #[serde(default)]
    pub mode: InterviewMode,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub location: String,
    #[serde(with = "time::serde::rfc3339")]
    pub scheduled_at: OffsetDateTime,
    #[serde(default)]
    pub follow_up_date: Option<Date>,
    #[serde(default)]
    pub status: InterviewStatus,
    #[serde(default)]
    pub result: InterviewResult,
    #[serde(default)]
    pub prep_notes: String,
    #[serde(default)]
    pub feedback: String,
}

impl From<InterviewInput> for InterviewFields {
    fn from(i: InterviewInput) -> Self {
        Self {
            company_name: i.company_name,
            role: i.role,
            package_offered: i.package_offered,
            job_url: i.job_url,
            hr_name: i.hr_name,
            hr_contact: i.hr_contact,
            round_number: i.round_number,
            round_type: i.round_type,
            mode: i.mode,
            platform: i.platform,
            location: i.location,
            scheduled_at: i.scheduled_at,
            follow_up_date: i.follow_up_date,
            status: i.status,
            result: i.result,
            prep_notes: i.prep_notes,
            feedback: i.feedback,
        }
    }
}

/// PUT and PATCH body; `follow_up_date: null` clears the date.
#[derive(Debug, Default, Deserialize)]
pub struct InterviewPatch {
    pub company_name: Option<String>,
    pub role: Option<String>,
    pub package_offered: Option<String>,
    pub job_url: Option<String>,
    pub hr_name: Option<String>,
    pub hr_contact: Option<String>,
    pub round_number: Option<i32>,
    pub round_type: Option<RoundType>,
    pub mode: Option<InterviewMode>,
    pub platform: Option<Platform>,
    pub location: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub scheduled_at: Option<OffsetDateTime>,
    #[serde(default, deserialize_with = "nullable")]
    pub follow_up_date: Option<Option<Date>>,
    pub status: Option<InterviewStatus>,
    pub result: Option<InterviewResult>,
    pub prep_notes: Option<String>,
    pub feedback: Option<String>,
}

impl InterviewPatch {
    pub fn missing_required(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.company_name.is_none() {
            errors.add("company_name", "This field is required.");
        }
        if self.role.is_none() {
            errors.add("role", "This field is required.");
        }
        if self.scheduled_at.is_none() {
            errors.add("scheduled_at", "This field is required.");
        }
        errors
    }

    pub fn apply(self, mut f: InterviewFields) -> InterviewFields {
        macro_rules! set {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = self.$field { f.$field = v; })*
            };
        }
        set!(
            company_name,
            role,
            package_offered,
            job_url,
            hr_name,
            hr_contact,
            round_number,
            round_type,
            mode,
            platform,
            location,
            scheduled_at,
            follow_up_date,
            status,
            result,
            prep_notes,
            feedback,
        );
        f
    }
}

/// Body of `add-feedback`: only these three fields may change.
#[derive(Debug, Default, Deserialize)]
pub struct FeedbackPatch {
    pub feedback: Option<String>,
    pub result: Option<InterviewResult>,
    pub status: Option<InterviewStatus>,
}

impl FeedbackPatch {
    pub fn apply(self, mut f: InterviewFields) -> InterviewFields {
        if let Some(feedback) = self.feedback {
            f.feedback = feedback;
        }
        if let Some(result) = self.result {
            f.result = result;
        }
        if let Some(status) = self.status {
            f.status = status;
        }
        f
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct InterviewListQuery {
    pub status: Option<InterviewStatus>,
    pub result: Option<InterviewResult>,
    pub round_type: Option<RoundType>,
    pub mode: Option<InterviewMode>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

impl InterviewListQuery {
    pub fn is_plain(&self) -> bool {
        self.status.is_none()
            && self.result.is_none()
            && self.round_type.is_none()
            && self.mode.is_none()
            && self.search.is_none()
            && self.ordering.is_none()
    }
}

#[derive(Debug, Serialize)]
pub struct InterviewResponse {
    pub id: Uuid,
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
    #[serde(with = "time::serde::rfc3339")]
    pub scheduled_at: OffsetDateTime,
    pub follow_up_date: Option<Date>,
    pub status: InterviewStatus,
    pub result: InterviewResult,
    pub prep_notes: String,
    pub feedback: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Interview> for InterviewResponse {
    fn from(i: Interview) -> Self {
        Self {
            id: i.id,
            company_name: i.company_name,
            role: i.role,
            package_offered: i.package_offered,
            job_url: i.job_url,
            hr_name: i.hr_name,
            hr_contact: i.hr_contact,
            round_number: i.round_number,
            round_type: i.round_type,
            mode: i.mode,
            platform: i.platform,
            location: i.location,
            scheduled_at: i.scheduled_at,
            follow_up_date: i.follow_up_date,
            status: i.status,
            result: i.result,
            prep_notes: i.prep_notes,
            feedback: i.feedback,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

use reqwest::Url;

use super::repo_types::{InterviewFields, InterviewStatus};
use crate::error::FieldErrors;

pub const MAX_NAME_LEN: usize = 255;
pub const MAX_PACKAGE_LEN: usize = 100;

fn check_len(errors: &mut FieldErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(field, format!("Ensure this field has no more than {max} characters."));
    }
}

/// Empty, or an absolute http(s) URL.
pub fn is_valid_job_url(raw: &str) -> bool {
    if raw.is_empty() {
        return true;
    }
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

/// Checks an interview as it is about to be written, including the
/// result/status pairing.
pub fn validate_interview(f: &InterviewFields) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for (field, value) in [("company_name", &f.company_name), ("role", &f.role)] {
        if value.trim().is_empty() {
            errors.add(field, "This field may not be blank.");
        } else {
            check_len(&mut errors, field, value, MAX_NAME_LEN);
        }
    }
    check_len(&mut errors, "package_offered", &f.package_offered, MAX_PACKAGE_LEN);
    check_len(&mut errors, "hr_name", &f.hr_name, MAX_NAME_LEN);
    check_len(&mut errors, "hr_contact", &f.hr_contact, MAX_NAME_LEN);
    check_len(&mut errors, "location", &f.location, MAX_NAME_LEN);

    if !is_valid_job_url(&f.job_url) {
        errors.add("job_url", "Enter a valid URL.");
    }
    if f.round_number < 1 {
        errors.add("round_number", "Ensure this value is greater than or equal to 1.");
    }
    if f.result.is_final() && f.status != InterviewStatus::Completed {
        errors.add(
            "status",
            "Status must be 'completed' when result is selected or rejected.",
        );
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interviews::dto::{FeedbackPatch, InterviewInput, InterviewPatch};
    use crate::interviews::repo_types::{InterviewResult, Platform, RoundType};
    use time::macros::datetime;

    fn fields() -> InterviewFields {
        let input: InterviewInput = serde_json::from_str(
            r#"{"company_name":"Acme","role":"Backend Engineer",
                "scheduled_at":"2026-03-10T10:00:00Z"}"#,
        )
        .unwrap();
        input.into()
    }

    #[test]
    fn input_defaults() {
        let f = fields();
        assert_eq!(f.round_number, 1);
        assert_eq!(f.round_type, RoundType::Screening);
        assert_eq!(f.platform, Platform::Other);
        assert_eq!(f.status, InterviewStatus::Scheduled);
        assert_eq!(f.result, InterviewResult::Waiting);
        assert_eq!(f.scheduled_at, datetime!(2026-03-10 10:00 UTC));
        assert!(validate_interview(&f).is_empty());
    }

    #[test]
    fn final_result_requires_completed_status() {
        for result in [InterviewResult::Selected, InterviewResult::Rejected] {
            let mut f = fields();
            f.result = result;
            assert!(validate_interview(&f).get("status").is_some());
            f.status = InterviewStatus::Completed;
            assert!(validate_interview(&f).is_empty());
        }
        let mut on_hold = fields();
        on_hold.result = InterviewResult::OnHold;
        assert!(validate_interview(&on_hold).is_empty());
    }

    #[test]
    fn feedback_checks_merged_state() {
        let mut stored = fields();
        stored.status = InterviewStatus::Completed;
        let patch: FeedbackPatch =
            serde_json::from_str(r#"{"result":"selected","feedback":"great"}"#).unwrap();
        let merged = patch.apply(stored);
        assert!(validate_interview(&merged).is_empty());

        let patch: FeedbackPatch = serde_json::from_str(r#"{"result":"rejected"}"#).unwrap();
        assert!(!validate_interview(&patch.apply(fields())).is_empty());
    }

    #[test]
    fn feedback_ignores_other_fields() {
        let patch: FeedbackPatch =
            serde_json::from_str(r#"{"feedback":"ok","company_name":"Other"}"#).unwrap();
        let merged = patch.apply(fields());
        assert_eq!(merged.company_name, "Acme");
        assert_eq!(merged.feedback, "ok");
    }

    #[test]
    fn job_url_must_be_http() {
        assert!(is_valid_job_url(""));
        assert!(is_valid_job_url("https://jobs.example.com/123"));
        assert!(is_valid_job_url("http://example.com"));
        assert!(!is_valid_job_url("ftp://example.com/file"));
        assert!(!is_valid_job_url("not a url"));
        assert!(!is_valid_job_url("example.com/jobs"));
    }

    #[test]
    fn round_number_must_be_positive() {
        let mut f = fields();
        f.round_number = 0;
        assert!(validate_interview(&f).get("round_number").is_some());
    }

    #[test]
    fn put_requires_core_fields() {
        let patch: InterviewPatch = serde_json::from_str(r#"{"role":"x"}"#).unwrap();
        let errors = patch.missing_required();
        assert!(errors.get("company_name").is_some());
        assert!(errors.get("scheduled_at").is_some());
        assert!(errors.get("role").is_none());
    }

    #[test]
    fn patch_clears_follow_up_and_keeps_the_rest() {
        let mut f = fields();
        f.follow_up_date = Some(time::macros::date!(2026 - 03 - 20));
        let patch: InterviewPatch =
            serde_json::from_str(r#"{"follow_up_date":null,"round_number":2}"#).unwrap();
        let merged = patch.apply(f);
        assert_eq!(merged.follow_up_date, None);
        assert_eq!(merged.round_number, 2);
        assert_eq!(merged.company_name, "Acme");
    }
}

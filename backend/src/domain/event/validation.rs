//! Event payload validation.
//!
//! Validation never fails fast: every problem is reported as a [`Violation`]
//! in a stable order. Presence checks run first; the cross-field business
//! checks only run once every required value is present.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::EventDraft;

/// Object name reported on every event violation.
pub const EVENT_OBJECT_NAME: &str = "eventDto";

const REJECTED_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn rejected_date(value: NaiveDateTime) -> Option<String> {
    Some(value.format(REJECTED_DATE_FORMAT).to_string())
}

/// Single field-level or object-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub object_name: &'static str,
    /// Offending field. `None` marks an error on the whole object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    pub code: &'static str,
    pub default_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_value: Option<String>,
}

impl Violation {
    fn field(
        field: &'static str,
        code: &'static str,
        message: impl Into<String>,
        rejected: Option<String>,
    ) -> Self {
        Self {
            object_name: EVENT_OBJECT_NAME,
            field: Some(field),
            code,
            default_message: message.into(),
            rejected_value: rejected,
        }
    }

    fn global(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            object_name: EVENT_OBJECT_NAME,
            field: None,
            code,
            default_message: message.into(),
            rejected_value: None,
        }
    }
}

fn not_blank(violations: &mut Vec<Violation>, field: &'static str, value: Option<&str>) {
    if value.is_none_or(|text| text.trim().is_empty()) {
        violations.push(Violation::field(
            field,
            "NotBlank",
            "must not be blank",
            value.map(str::to_owned),
        ));
    }
}

fn not_null_date(
    violations: &mut Vec<Violation>,
    field: &'static str,
    value: Option<NaiveDateTime>,
) {
    if value.is_none() {
        violations.push(Violation::field(field, "NotNull", "must not be null", None));
    }
}

fn non_negative(violations: &mut Vec<Violation>, field: &'static str, value: Option<i32>) {
    match value {
        None => violations.push(Violation::field(field, "NotNull", "must not be null", None)),
        Some(number) if number < 0 => violations.push(Violation::field(
            field,
            "Min",
            "must be greater than or equal to 0",
            Some(number.to_string()),
        )),
        Some(_) => {}
    }
}

/// Validate an event payload, returning every violation found.
///
/// An empty vector means the draft can be turned into
/// [`super::EventDetails`].
///
/// # Examples
/// ```
/// use events_api::domain::{EventDraft, validate_event};
///
/// let violations = validate_event(&EventDraft::default());
/// assert!(violations.iter().any(|v| v.field == Some("name")));
/// ```
pub fn validate_event(draft: &EventDraft) -> Vec<Violation> {
    let mut violations = Vec::new();

    not_blank(&mut violations, "name", draft.name.as_deref());
    not_blank(&mut violations, "description", draft.description.as_deref());
    not_null_date(
        &mut violations,
        "beginEnrollmentDateTime",
        draft.begin_enrollment_date_time,
    );
    not_null_date(
        &mut violations,
        "closeEnrollmentDateTime",
        draft.close_enrollment_date_time,
    );
    not_null_date(
        &mut violations,
        "beginEventDateTime",
        draft.begin_event_date_time,
    );
    not_null_date(&mut violations, "endEventDateTime", draft.end_event_date_time);
    non_negative(&mut violations, "basePrice", draft.base_price);
    non_negative(&mut violations, "maxPrice", draft.max_price);
    non_negative(
        &mut violations,
        "limitOfEnrollment",
        draft.limit_of_enrollment,
    );

    if !violations.is_empty() {
        return violations;
    }

    business_rules(draft, &mut violations);
    violations
}

fn business_rules(draft: &EventDraft, violations: &mut Vec<Violation>) {
    if let (Some(base), Some(max)) = (draft.base_price, draft.max_price) {
        if max != 0 && base > max {
            violations.push(Violation::global("wrongPrices", "Values of prices are wrong"));
        }
    }

    let (Some(begin_enrollment), Some(close_enrollment), Some(begin_event), Some(end_event)) = (
        draft.begin_enrollment_date_time,
        draft.close_enrollment_date_time,
        draft.begin_event_date_time,
        draft.end_event_date_time,
    ) else {
        return;
    };

    if end_event < begin_event {
        violations.push(Violation::field(
            "endEventDateTime",
            "wrongValue",
            "endEventDateTime must not be before beginEventDateTime",
            rejected_date(end_event),
        ));
    }
    if close_enrollment < begin_enrollment {
        violations.push(Violation::field(
            "closeEnrollmentDateTime",
            "wrongValue",
            "closeEnrollmentDateTime must not be before beginEnrollmentDateTime",
            rejected_date(close_enrollment),
        ));
    }
    if begin_event < close_enrollment {
        violations.push(Violation::field(
            "beginEventDateTime",
            "wrongValue",
            "beginEventDateTime must not be before closeEnrollmentDateTime",
            rejected_date(begin_event),
        ));
    }
}

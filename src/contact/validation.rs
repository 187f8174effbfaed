use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::dom::ids;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    Name,
    Email,
    Message,
}

impl FieldId {
    pub const ALL: [FieldId; 3] = [FieldId::Name, FieldId::Email, FieldId::Message];

    pub fn element_id(self) -> &'static str {
        match self {
            FieldId::Name => ids::FIELD_NAME,
            FieldId::Email => ids::FIELD_EMAIL,
            FieldId::Message => ids::FIELD_MESSAGE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0:?} is required")]
    EmptyField(FieldId),
    #[error("email address is malformed")]
    MalformedEmail,
}

impl ValidationError {
    pub fn field(self) -> FieldId {
        match self {
            ValidationError::EmptyField(field) => field,
            ValidationError::MalformedEmail => FieldId::Email,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactFields {
    pub fn value(&self, field: FieldId) -> &str {
        match field {
            FieldId::Name => &self.name,
            FieldId::Email => &self.email,
            FieldId::Message => &self.message,
        }
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Fields to mark, in form order, each at most once.
    pub fn invalid_fields(&self) -> Vec<FieldId> {
        FieldId::ALL
            .into_iter()
            .filter(|field| self.errors.iter().any(|e| e.field() == *field))
            .collect()
    }
}

/// Required fields must be non-blank. A non-empty email must also look like `local@domain.tld`;
/// a whitespace-only email therefore reports both errors.
pub fn validate(fields: &ContactFields) -> ValidationReport {
    let mut errors: Vec<ValidationError> = FieldId::ALL
        .into_iter()
        .filter(|field| fields.value(*field).trim().is_empty())
        .map(ValidationError::EmptyField)
        .collect();

    if !fields.email.is_empty() && !is_valid_email(&fields.email) {
        errors.push(ValidationError::MalformedEmail);
    }
    ValidationReport { errors }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str, email: &str, message: &str) -> ContactFields {
        ContactFields {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    #[test]
    fn complete_submission_is_valid() {
        let report = validate(&fields("Ana", "ana@softsy.com.br", "Olá"));
        assert!(report.is_valid());
        assert!(report.invalid_fields().is_empty());
    }

    #[test]
    fn empty_name_is_reported() {
        let report = validate(&fields("", "a@b.com", "hi"));
        assert_eq!(report.errors(), &[ValidationError::EmptyField(FieldId::Name)]);
        assert_eq!(report.invalid_fields(), vec![FieldId::Name]);
    }

    #[test]
    fn whitespace_only_counts_as_empty() {
        let report = validate(&fields("  \t", "a@b.com", "\n"));
        assert_eq!(report.invalid_fields(), vec![FieldId::Name, FieldId::Message]);
    }

    #[test]
    fn malformed_email_marks_only_email() {
        let report = validate(&fields("Ana", "not-an-email", "hi"));
        assert_eq!(report.errors(), &[ValidationError::MalformedEmail]);
        assert_eq!(report.invalid_fields(), vec![FieldId::Email]);
    }

    #[test]
    fn blank_email_reports_empty_and_malformed_once_per_field() {
        let report = validate(&fields("Ana", "   ", "hi"));
        assert_eq!(
            report.errors(),
            &[ValidationError::EmptyField(FieldId::Email), ValidationError::MalformedEmail]
        );
        assert_eq!(report.invalid_fields(), vec![FieldId::Email]);
    }

    #[test]
    fn empty_email_is_only_empty() {
        let report = validate(&fields("Ana", "", "hi"));
        assert_eq!(report.errors(), &[ValidationError::EmptyField(FieldId::Email)]);
    }

    #[test]
    fn email_pattern() {
        for good in ["a@b.co", "first.last@sub.domain.org", "x+tag@d.io"] {
            assert!(is_valid_email(good), "{}", good);
        }
        for bad in ["a@b", "@b.com", "a@.", "a b@c.com", "a@b.com ", "a@@b.com", "a@b."] {
            assert!(!is_valid_email(bad), "{}", bad);
        }
    }
}

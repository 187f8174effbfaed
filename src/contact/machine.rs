//! Submission lifecycle of the contact form, free of any DOM access.
//!
//! `Idle -> (validate) -> Idle` when rejected, `Idle -> Submitting -> Idle` when accepted.
//! Validation runs synchronously inside [`FormMachine::submit`], so it never shows up as a
//! resting phase.

use super::submit::SubmitError;
use super::validation::{validate, ContactFields, ValidationReport};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Idle,
    Submitting,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SubmitStep {
    /// A submission is already in flight.
    Ignored,
    Rejected(ValidationReport),
    Accepted(ContactFields),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Completion {
    Succeeded,
    Failed(SubmitError),
    /// Nothing was in flight, e.g. after teardown raced the timer.
    Stale,
}

#[derive(Debug, Default)]
pub struct FormMachine {
    phase: FormPhase,
}

impl FormMachine {
    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn submit(&mut self, fields: ContactFields) -> SubmitStep {
        if self.phase == FormPhase::Submitting {
            return SubmitStep::Ignored;
        }
        let report = validate(&fields);
        if !report.is_valid() {
            return SubmitStep::Rejected(report);
        }
        self.phase = FormPhase::Submitting;
        SubmitStep::Accepted(fields)
    }

    pub fn complete(&mut self, outcome: Result<(), SubmitError>) -> Completion {
        if self.phase != FormPhase::Submitting {
            return Completion::Stale;
        }
        self.phase = FormPhase::Idle;
        match outcome {
            Ok(()) => Completion::Succeeded,
            Err(e) => Completion::Failed(e),
        }
    }

    /// Drops an in-flight submission without completing it.
    pub fn abort(&mut self) {
        self.phase = FormPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::validation::{FieldId, ValidationError};

    fn fields(name: &str, email: &str, message: &str) -> ContactFields {
        ContactFields {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    #[test]
    fn rejected_submit_stays_idle() {
        let mut machine = FormMachine::default();
        let step = machine.submit(fields("", "a@b.com", "hi"));
        match step {
            SubmitStep::Rejected(report) => {
                assert_eq!(report.errors(), &[ValidationError::EmptyField(FieldId::Name)]);
            }
            other => panic!("expected rejection, got {:?}", other),
        }
        assert_eq!(machine.phase(), FormPhase::Idle);
    }

    #[test]
    fn accepted_submit_enters_submitting() {
        let mut machine = FormMachine::default();
        let step = machine.submit(fields("Ana", "ana@b.com", "hi"));
        assert_eq!(step, SubmitStep::Accepted(fields("Ana", "ana@b.com", "hi")));
        assert_eq!(machine.phase(), FormPhase::Submitting);
    }

    #[test]
    fn resubmit_while_submitting_is_ignored() {
        let mut machine = FormMachine::default();
        machine.submit(fields("Ana", "ana@b.com", "hi"));
        assert_eq!(machine.submit(fields("Bia", "bia@b.com", "oi")), SubmitStep::Ignored);
        assert_eq!(machine.phase(), FormPhase::Submitting);
    }

    #[test]
    fn completion_returns_to_idle() {
        let mut machine = FormMachine::default();
        machine.submit(fields("Ana", "ana@b.com", "hi"));
        assert_eq!(machine.complete(Ok(())), Completion::Succeeded);
        assert_eq!(machine.phase(), FormPhase::Idle);

        machine.submit(fields("Ana", "ana@b.com", "hi"));
        assert_eq!(
            machine.complete(Err(SubmitError::Rejected("busy".into()))),
            Completion::Failed(SubmitError::Rejected("busy".into()))
        );
        assert_eq!(machine.phase(), FormPhase::Idle);
    }

    #[test]
    fn completion_without_submission_is_stale() {
        let mut machine = FormMachine::default();
        assert_eq!(machine.complete(Ok(())), Completion::Stale);

        machine.submit(fields("Ana", "ana@b.com", "hi"));
        machine.abort();
        assert_eq!(machine.complete(Ok(())), Completion::Stale);
    }
}

//! Submit-button and result-panel state for one form.
//!
//! `Idle → Submitting → {Succeeded, Failed}`, plus `Invalid` when client
//! validation stops a submit before any request is made. Only one request
//! may be in flight: `begin` while `Submitting` is refused.

use crate::form::{Field, FormState};

/// Button label while idle.
pub const SUBMIT_LABEL: &str = "Submit";

/// Button label while a request is in flight.
pub const LOADING_LABEL: &str = "Submitting...";

/// The two result panels shown below a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Success,
    Error,
}

/// Where a form is in its submit cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Idle,
    /// Validation failed; `focus` is the first invalid field.
    Invalid { focus: Field },
    Submitting,
    Succeeded { contact_id: Option<String> },
    Failed { message: String },
}

/// Illegal transition of the submit state machine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedbackError {
    #[error("a submission is already in progress")]
    AlreadySubmitting,

    #[error("no submission is in progress")]
    NotSubmitting,
}

/// Submit state of one form.
#[derive(Debug, Clone, Default)]
pub struct SubmitFeedback {
    state: SubmitState,
}

impl SubmitFeedback {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    /// Record that validation stopped the submit.
    ///
    /// # Errors
    ///
    /// [`FeedbackError::AlreadySubmitting`] while a request is in flight.
    pub fn invalid(&mut self, focus: Field) -> Result<(), FeedbackError> {
        self.ensure_idle()?;
        self.state = SubmitState::Invalid { focus };
        Ok(())
    }

    /// Start a request: disables the control and hides both panels.
    ///
    /// # Errors
    ///
    /// [`FeedbackError::AlreadySubmitting`] while a request is in flight.
    pub fn begin(&mut self) -> Result<(), FeedbackError> {
        self.ensure_idle()?;
        self.state = SubmitState::Submitting;
        Ok(())
    }

    /// The request succeeded: show the success panel and reset the form.
    ///
    /// # Errors
    ///
    /// [`FeedbackError::NotSubmitting`] if no request was in flight.
    pub fn succeed(
        &mut self,
        form: &mut FormState,
        contact_id: Option<String>,
    ) -> Result<(), FeedbackError> {
        self.ensure_submitting()?;
        form.reset();
        self.state = SubmitState::Succeeded { contact_id };
        Ok(())
    }

    /// The request failed: show the error panel. The form keeps its values.
    ///
    /// # Errors
    ///
    /// [`FeedbackError::NotSubmitting`] if no request was in flight.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), FeedbackError> {
        self.ensure_submitting()?;
        self.state = SubmitState::Failed {
            message: message.into(),
        };
        Ok(())
    }

    /// Whether the submit control accepts clicks.
    #[must_use]
    pub fn control_enabled(&self) -> bool {
        self.state != SubmitState::Submitting
    }

    #[must_use]
    pub fn button_label(&self) -> &'static str {
        if self.state == SubmitState::Submitting {
            LOADING_LABEL
        } else {
            SUBMIT_LABEL
        }
    }

    /// The result panel currently shown, if any.
    #[must_use]
    pub fn visible_panel(&self) -> Option<Panel> {
        match self.state {
            SubmitState::Succeeded { .. } => Some(Panel::Success),
            SubmitState::Failed { .. } | SubmitState::Invalid { .. } => Some(Panel::Error),
            SubmitState::Idle | SubmitState::Submitting => None,
        }
    }

    /// The panel to scroll into view after a request finished.
    #[must_use]
    pub fn scroll_target(&self) -> Option<Panel> {
        match self.state {
            SubmitState::Succeeded { .. } => Some(Panel::Success),
            SubmitState::Failed { .. } => Some(Panel::Error),
            _ => None,
        }
    }

    fn ensure_idle(&self) -> Result<(), FeedbackError> {
        if self.state == SubmitState::Submitting {
            return Err(FeedbackError::AlreadySubmitting);
        }
        Ok(())
    }

    fn ensure_submitting(&self) -> Result<(), FeedbackError> {
        if self.state != SubmitState::Submitting {
            return Err(FeedbackError::NotSubmitting);
        }
        Ok(())
    }
}

//! Waterdip Dashboard Monitor Wizard
//!
//! The three-step monitor creation flow: condition, action, review. Step
//! changes go through the pure [`transition`] function; [`MonitorWizard`]
//! adds the create call, the notifications and the navigation on success.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};
use waterdip_client::resources::monitors::{
    CreateMonitorRequest, Dimensions, MonitorConditionRequest, MonitorIdentification, Threshold,
};
use waterdip_client::{ApiResponse, Mutation, WaterdipClient};
use waterdip_common::{MonitorType, Result, Severity, ThresholdDirection, WaterdipError};

use crate::notify::Notifier;
use crate::routes::{Navigator, Route};

/// Notification raised after a monitor is created.
pub const MONITOR_CREATED_MESSAGE: &str = "Monitor created successfully!";

/// Monitor type label that creates a monitor without dimensions.
pub const MODEL_PERFORMANCE_LABEL: &str = "Model Performance";

// =============================================================================
// Steps and Events
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    Condition,
    Action,
    Review,
    Submitted,
}

impl WizardStep {
    pub fn label(&self) -> &'static str {
        match self {
            WizardStep::Condition => "Monitor Condition",
            WizardStep::Action => "Action",
            WizardStep::Review => "Review",
            WizardStep::Submitted => "Done",
        }
    }

    /// Caption of the forward button on this step.
    pub fn submit_label(&self) -> &'static str {
        if *self == WizardStep::Review {
            "Add Monitor"
        } else {
            "Next"
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single field change in the draft.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftEdit {
    MonitorType(String),
    Identification {
        model_id: String,
        model_version_id: String,
    },
    EvaluationMetric(String),
    EvaluationWindow(String),
    Features(Vec<String>),
    Predictions(Vec<String>),
    ThresholdDirection(String),
    ThresholdValue(f64),
    MonitorName(String),
    Severity(Severity),
}

#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    Edit(DraftEdit),
    Next,
    Back,
    Submitted,
    SubmitFailed,
}

impl WizardEvent {
    fn name(&self) -> &'static str {
        match self {
            WizardEvent::Edit(_) => "edit",
            WizardEvent::Next => "next",
            WizardEvent::Back => "back",
            WizardEvent::Submitted => "submitted",
            WizardEvent::SubmitFailed => "submit failed",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("cannot apply '{event}' on step '{step}'")]
    InvalidTransition {
        step: WizardStep,
        event: &'static str,
    },
}

impl From<WizardError> for WaterdipError {
    fn from(err: WizardError) -> Self {
        WaterdipError::InvalidTransition(err.to_string())
    }
}

// =============================================================================
// Draft
// =============================================================================

/// The in-progress monitor as the form holds it, labels included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardDraft {
    pub monitor_type: String,
    pub identification: MonitorIdentification,
    pub evaluation_metric: String,
    pub evaluation_window: String,
    pub dimensions: Dimensions,
    pub threshold_direction: String,
    pub threshold_value: f64,
    pub monitor_name: String,
    pub severity: Severity,
}

impl WizardDraft {
    /// Draft for a monitor type label scoped to one model version.
    pub fn new(
        monitor_type: impl Into<String>,
        model_id: impl Into<String>,
        model_version_id: impl Into<String>,
    ) -> Self {
        Self {
            monitor_type: monitor_type.into(),
            identification: MonitorIdentification {
                model_id: model_id.into(),
                model_version_id: model_version_id.into(),
            },
            ..Default::default()
        }
    }

    fn apply(&mut self, edit: DraftEdit) {
        match edit {
            DraftEdit::MonitorType(label) => self.monitor_type = label,
            DraftEdit::Identification {
                model_id,
                model_version_id,
            } => {
                self.identification = MonitorIdentification {
                    model_id,
                    model_version_id,
                }
            }
            DraftEdit::EvaluationMetric(metric) => self.evaluation_metric = metric,
            DraftEdit::EvaluationWindow(window) => self.evaluation_window = window,
            DraftEdit::Features(features) => self.dimensions.features = features,
            DraftEdit::Predictions(predictions) => self.dimensions.predictions = predictions,
            DraftEdit::ThresholdDirection(label) => self.threshold_direction = label,
            DraftEdit::ThresholdValue(value) => self.threshold_value = value,
            DraftEdit::MonitorName(name) => self.monitor_name = name,
            DraftEdit::Severity(severity) => self.severity = severity,
        }
    }

    /// The `monitor.create` body for this draft.
    pub fn to_request(&self) -> CreateMonitorRequest {
        let dimensions = if self.monitor_type == MODEL_PERFORMANCE_LABEL {
            None
        } else {
            Some(self.dimensions.clone())
        };
        CreateMonitorRequest {
            monitor_name: self.monitor_name.clone(),
            monitor_type: MonitorType::from_label(&self.monitor_type),
            monitor_identification: self.identification.clone(),
            monitor_condition: MonitorConditionRequest {
                evaluation_metric: self.evaluation_metric.clone(),
                dimensions,
                threshold: Threshold {
                    threshold: ThresholdDirection::from_label(&self.threshold_direction),
                    value: self.threshold_value,
                },
                evaluation_window: self.evaluation_window.clone(),
            },
            severity: self.severity,
        }
    }
}

// =============================================================================
// Transition
// =============================================================================

/// Apply one event. Rejected events leave the caller's state untouched.
pub fn transition(
    step: WizardStep,
    mut draft: WizardDraft,
    event: WizardEvent,
) -> std::result::Result<(WizardStep, WizardDraft), WizardError> {
    let invalid = WizardError::InvalidTransition {
        step,
        event: event.name(),
    };
    let next = match (step, event) {
        (WizardStep::Submitted, _) => return Err(invalid),
        (_, WizardEvent::Edit(edit)) => {
            draft.apply(edit);
            step
        }
        (WizardStep::Condition, WizardEvent::Next) => WizardStep::Action,
        (WizardStep::Action, WizardEvent::Next) => WizardStep::Review,
        (WizardStep::Action, WizardEvent::Back) => WizardStep::Condition,
        (WizardStep::Review, WizardEvent::Back) => WizardStep::Action,
        (WizardStep::Review, WizardEvent::Submitted) => WizardStep::Submitted,
        (WizardStep::Review, WizardEvent::SubmitFailed) => WizardStep::Review,
        _ => return Err(invalid),
    };
    Ok((next, draft))
}

// =============================================================================
// Monitor Wizard
// =============================================================================

/// The wizard bound to the create-monitor call.
pub struct MonitorWizard {
    step: WizardStep,
    draft: WizardDraft,
    create: Mutation<CreateMonitorRequest, ApiResponse<Value>>,
    notifier: Notifier,
    navigator: Navigator,
}

impl MonitorWizard {
    pub fn new(
        client: &WaterdipClient,
        notifier: Notifier,
        navigator: Navigator,
        draft: WizardDraft,
    ) -> Self {
        Self {
            step: WizardStep::Condition,
            draft,
            create: client.create_monitor_mutation(),
            notifier,
            navigator,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &WizardDraft {
        &self.draft
    }

    pub fn is_submitting(&self) -> bool {
        self.create.is_loading()
    }

    pub fn dispatch(&mut self, event: WizardEvent) -> std::result::Result<WizardStep, WizardError> {
        let from = self.step;
        let (step, draft) = transition(self.step, self.draft.clone(), event)?;
        if step != from {
            debug!(from = %from, to = %step, "wizard step");
        }
        self.step = step;
        self.draft = draft;
        Ok(step)
    }

    pub fn edit(&mut self, edit: DraftEdit) -> std::result::Result<WizardStep, WizardError> {
        self.dispatch(WizardEvent::Edit(edit))
    }

    pub fn next(&mut self) -> std::result::Result<WizardStep, WizardError> {
        self.dispatch(WizardEvent::Next)
    }

    pub fn back(&mut self) -> std::result::Result<WizardStep, WizardError> {
        self.dispatch(WizardEvent::Back)
    }

    /// "Add Monitor": send the draft once.
    ///
    /// On success the wizard is done and the monitor list is shown. On
    /// failure the wizard stays on review with the draft intact.
    pub async fn submit(&mut self) -> Result<WizardStep> {
        if self.step != WizardStep::Review {
            return Err(WizardError::InvalidTransition {
                step: self.step,
                event: "submit",
            }
            .into());
        }

        let request = self.draft.to_request();
        match self.create.mutate(request).await {
            Ok(_) => {
                info!(monitor_name = %self.draft.monitor_name, "monitor created");
                self.dispatch(WizardEvent::Submitted)?;
                self.notifier.success(MONITOR_CREATED_MESSAGE);
                self.navigator.navigate(Route::Monitors);
                Ok(self.step)
            }
            Err(err) => {
                self.dispatch(WizardEvent::SubmitFailed)?;
                self.notifier.mutation_failed(&err);
                Err(err)
            }
        }
    }
}

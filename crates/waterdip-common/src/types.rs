//! Waterdip Types - Shared Domain Enumerations
//!
//! Enumerations shared by the API client and the dashboard core. Each type
//! carries its wire name (as the monitoring API spells it) and, where the UI
//! shows a different label, the mapping from that label.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Model Types
// =============================================================================

/// Kind of data a model consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    Text,
    Tabular,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Text => write!(f, "TEXT"),
            DataType::Tabular => write!(f, "TABULAR"),
            DataType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// =============================================================================
// Monitor Types
// =============================================================================

/// Category of a monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MonitorType {
    Drift,
    DataQuality,
    #[default]
    #[serde(other)]
    Performance,
}

impl MonitorType {
    /// Map a UI label to the server constant.
    ///
    /// Anything that is not "Data Quality" or "Drift" is a performance monitor.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Data Quality" => MonitorType::DataQuality,
            "Drift" => MonitorType::Drift,
            _ => MonitorType::Performance,
        }
    }

    /// Server constant name.
    pub fn as_str(&self) -> &'static str {
        match self {
            MonitorType::Drift => "DRIFT",
            MonitorType::DataQuality => "DATA_QUALITY",
            MonitorType::Performance => "PERFORMANCE",
        }
    }
}

impl fmt::Display for MonitorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction a monitor threshold is compared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ThresholdDirection {
    #[serde(rename = "lt")]
    LessThan,
    #[default]
    #[serde(rename = "gt")]
    GreaterThan,
}

impl ThresholdDirection {
    /// Map the wizard's "Lesser"/"Greater" choice. Only "Lesser" yields `lt`.
    pub fn from_label(label: &str) -> Self {
        if label == "Lesser" {
            ThresholdDirection::LessThan
        } else {
            ThresholdDirection::GreaterThan
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThresholdDirection::LessThan => "lt",
            ThresholdDirection::GreaterThan => "gt",
        }
    }
}

/// Severity assigned to a monitor and its alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Navigation Types
// =============================================================================

/// Which section of the dashboard the user is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathLocation {
    Model,
    Monitor,
    Dataset,
}

/// Sort direction of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

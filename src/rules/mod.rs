//! Prompt rules: how often to prompt and what kind of alert to show
//!
//! # Modules
//!
//! - [`manager`]: Per-severity rules resolution

pub mod manager;

pub use manager::{RulesManager, RulesManagerBuilder};

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::engine::decision::Interaction;
use crate::error::ConfigError;

/// Minimum interval between two prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptFrequency {
    Immediately,
    Daily,
    Weekly,
}

impl PromptFrequency {
    pub fn interval(&self) -> TimeDelta {
        match self {
            PromptFrequency::Immediately => TimeDelta::zero(),
            PromptFrequency::Daily => TimeDelta::days(1),
            PromptFrequency::Weekly => TimeDelta::days(7),
        }
    }
}

/// Kind of alert presented to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    /// Update only; cannot be dismissed
    Force,
    /// Update, skip this version, or remind later
    Option,
    /// Update or skip this version
    Skip,
    /// No built-in UI; the host application decides what to render
    None,
}

impl AlertType {
    /// Whether an alert of this type offers the given interaction
    pub fn offers(&self, interaction: Interaction) -> bool {
        match self {
            AlertType::Force => interaction == Interaction::Update,
            AlertType::Option => true,
            AlertType::Skip => matches!(interaction, Interaction::Update | Interaction::Skip),
            AlertType::None => false,
        }
    }
}

/// Prompt policy applied to one update severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rules {
    pub frequency: PromptFrequency,
    pub alert_type: AlertType,
}

impl Rules {
    /// Prompt every check; user may skip or postpone
    pub const ANNOYING: Rules = Rules::new(PromptFrequency::Immediately, AlertType::Option);
    /// Prompt every check; user must update
    pub const CRITICAL: Rules = Rules::new(PromptFrequency::Immediately, AlertType::Force);
    /// Library-wide default for severities without explicit rules
    pub const DEFAULT: Rules = Rules::new(PromptFrequency::Weekly, AlertType::Option);
    pub const PERSISTENT: Rules = Rules::new(PromptFrequency::Daily, AlertType::Option);
    pub const RELAXED: Rules = Rules::new(PromptFrequency::Weekly, AlertType::Skip);
    /// Report every check without built-in UI
    pub const SILENT: Rules = Rules::new(PromptFrequency::Immediately, AlertType::None);

    const PRESETS: &[(&str, Rules)] = &[
        ("annoying", Rules::ANNOYING),
        ("critical", Rules::CRITICAL),
        ("default", Rules::DEFAULT),
        ("persistent", Rules::PERSISTENT),
        ("relaxed", Rules::RELAXED),
        ("silent", Rules::SILENT),
    ];

    pub const fn new(frequency: PromptFrequency, alert_type: AlertType) -> Self {
        Self {
            frequency,
            alert_type,
        }
    }

    /// Resolve a named preset such as `"critical"`
    pub fn preset(name: &str) -> Result<Rules, ConfigError> {
        Self::PRESETS
            .iter()
            .find(|(preset, _)| *preset == name)
            .map(|(_, rules)| *rules)
            .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))
    }
}

impl Default for Rules {
    fn default() -> Self {
        Rules::DEFAULT
    }
}

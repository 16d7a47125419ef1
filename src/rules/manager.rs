//! Per-severity rules resolution

use crate::rules::Rules;
use crate::version::semver::UpdateSeverity;

/// Rules for each update severity.
///
/// Every non-`None` severity always resolves to a `Rules` value: the fields
/// are not optional, so an unresolved severity cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RulesManager {
    major: Rules,
    minor: Rules,
    patch: Rules,
    revision: Rules,
}

impl RulesManager {
    /// Apply the same rules to every severity
    pub const fn with_global(rules: Rules) -> Self {
        Self {
            major: rules,
            minor: rules,
            patch: rules,
            revision: rules,
        }
    }

    pub fn builder() -> RulesManagerBuilder {
        RulesManagerBuilder::default()
    }

    /// Rules for a severity, or `None` when no update is available
    pub fn rules(&self, severity: UpdateSeverity) -> Option<Rules> {
        match severity {
            UpdateSeverity::Major => Some(self.major),
            UpdateSeverity::Minor => Some(self.minor),
            UpdateSeverity::Patch => Some(self.patch),
            UpdateSeverity::Revision => Some(self.revision),
            UpdateSeverity::None => None,
        }
    }
}

impl Default for RulesManager {
    fn default() -> Self {
        Self::with_global(Rules::DEFAULT)
    }
}

/// Builder that overrides any subset of severities.
///
/// Unset severities inherit the global rules when one is given, otherwise
/// [`Rules::DEFAULT`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RulesManagerBuilder {
    global: Option<Rules>,
    major: Option<Rules>,
    minor: Option<Rules>,
    patch: Option<Rules>,
    revision: Option<Rules>,
}

impl RulesManagerBuilder {
    pub fn global(mut self, rules: Rules) -> Self {
        self.global = Some(rules);
        self
    }

    pub fn major(mut self, rules: Rules) -> Self {
        self.major = Some(rules);
        self
    }

    pub fn minor(mut self, rules: Rules) -> Self {
        self.minor = Some(rules);
        self
    }

    pub fn patch(mut self, rules: Rules) -> Self {
        self.patch = Some(rules);
        self
    }

    pub fn revision(mut self, rules: Rules) -> Self {
        self.revision = Some(rules);
        self
    }

    pub fn build(self) -> RulesManager {
        let fallback = self.global.unwrap_or(Rules::DEFAULT);
        RulesManager {
            major: self.major.unwrap_or(fallback),
            minor: self.minor.unwrap_or(fallback),
            patch: self.patch.unwrap_or(fallback),
            revision: self.revision.unwrap_or(fallback),
        }
    }
}

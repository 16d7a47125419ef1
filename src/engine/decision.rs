//! Prompt decision: whether and how to alert for an available update

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::DEFAULT_RELEASED_FOR_DAYS;
use crate::rules::{AlertType, RulesManager};
use crate::store::InstallationState;
use crate::version::info::VersionInfo;

/// User response reported back by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interaction {
    /// Go to the store / install the update
    Update,
    /// Never prompt again for this exact version
    Skip,
    /// Remind me next time
    Later,
}

/// Result of a decision; transient, never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Action {
    ShowAlert {
        alert_type: AlertType,
        info: VersionInfo,
    },
    NoAction,
}

impl Action {
    pub fn alert_type(&self) -> Option<AlertType> {
        match self {
            Action::ShowAlert { alert_type, .. } => Some(*alert_type),
            Action::NoAction => None,
        }
    }
}

/// Pure decision function over version metadata and prompt history.
///
/// The engine performs no I/O. Callers load the state before calling
/// [`DecisionEngine::decide`] and persist the returned state afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionEngine {
    released_for_days: u32,
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self {
            released_for_days: DEFAULT_RELEASED_FOR_DAYS,
        }
    }
}

impl DecisionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum age of a release before users are prompted about it.
    ///
    /// Only applies when the metadata carries a release date.
    pub fn with_released_for_days(mut self, days: u32) -> Self {
        self.released_for_days = days;
        self
    }

    pub fn released_for_days(&self) -> u32 {
        self.released_for_days
    }

    pub fn decide(
        &self,
        info: &VersionInfo,
        mut state: InstallationState,
        now: DateTime<Utc>,
        manager: &RulesManager,
    ) -> (Action, InstallationState) {
        let severity = info.severity();
        let latest = info.latest_available;

        let Some(rules) = manager.rules(severity) else {
            debug!(
                "No update available: installed {}, latest {}",
                info.current_installed, latest
            );
            return (Action::NoAction, state);
        };

        // Users below the minimum must not be able to dismiss the alert
        let below_minimum = info.below_minimum();
        let alert_type = if below_minimum {
            AlertType::Force
        } else {
            rules.alert_type
        };

        if !below_minimum
            && let Some(released) = info.release_date
            && now - released < TimeDelta::days(i64::from(self.released_for_days))
        {
            debug!(
                "Skipping prompt for {}: released {} is younger than {} days",
                latest, released, self.released_for_days
            );
            return (Action::NoAction, state);
        }

        if alert_type != AlertType::Force {
            if state.has_skipped(&latest) {
                debug!("Skipping prompt for {}: version was skipped", latest);
                return (Action::NoAction, state);
            }

            if let Some(last) = state.last_prompt_timestamp
                && now - last < rules.frequency.interval()
            {
                debug!(
                    "Skipping prompt for {}: last prompt at {} within {:?} interval",
                    latest, last, rules.frequency
                );
                return (Action::NoAction, state);
            }
        }

        info!(
            "Prompting {} update {} -> {} with {:?} alert",
            severity, info.current_installed, latest, alert_type
        );

        state.last_prompted_version = Some(latest);
        state.last_prompt_timestamp = Some(now);

        (
            Action::ShowAlert {
                alert_type,
                info: info.clone(),
            },
            state,
        )
    }

    /// Apply a user interaction with an alert of `alert_type` to the state.
    ///
    /// `Skip` is the only way versions enter the skip list. `Later` restarts the
    /// frequency window at `now`. `Update` leaves the state untouched, as does
    /// any interaction the alert did not offer.
    pub fn record_interaction(
        &self,
        mut state: InstallationState,
        info: &VersionInfo,
        alert_type: AlertType,
        interaction: Interaction,
        now: DateTime<Utc>,
    ) -> InstallationState {
        if !alert_type.offers(interaction) {
            warn!(
                "Ignoring {:?}: not offered by {:?} alert",
                interaction, alert_type
            );
            return state;
        }

        match interaction {
            Interaction::Skip => {
                info!("User skipped version {}", info.latest_available);
                state.skipped_versions.insert(info.latest_available);
            }
            Interaction::Later => {
                debug!("User postponed update to {}", info.latest_available);
                state.last_prompt_timestamp = Some(now);
            }
            Interaction::Update => {
                debug!("User accepted update to {}", info.latest_available);
            }
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{PromptFrequency, Rules};
    use crate::version::semver::SemanticVersion;
    use chrono::TimeZone;
    use rstest::rstest;

    fn v(s: &str) -> SemanticVersion {
        s.parse().unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap()
    }

    fn info(current: &str, latest: &str) -> VersionInfo {
        VersionInfo::new(v(current), v(latest))
    }

    #[test]
    fn minor_update_with_no_history_shows_option_alert() {
        let engine = DecisionEngine::new();
        let manager = RulesManager::builder()
            .minor(Rules::new(PromptFrequency::Weekly, AlertType::Option))
            .build();
        let info = info("1.2.0.0", "1.3.0.0");

        let (action, state) = engine.decide(&info, InstallationState::default(), now(), &manager);

        assert_eq!(
            action,
            Action::ShowAlert {
                alert_type: AlertType::Option,
                info: info.clone(),
            }
        );
        assert_eq!(state.last_prompted_version, Some(v("1.3.0.0")));
        assert_eq!(state.last_prompt_timestamp, Some(now()));
        assert!(state.skipped_versions.is_empty());
    }

    #[rstest]
    #[case("1.2.0.0", "1.2.0.0")]
    #[case("1.3.0.0", "1.2.0.0")]
    fn no_newer_version_yields_no_action_and_unchanged_state(
        #[case] current: &str,
        #[case] latest: &str,
    ) {
        let engine = DecisionEngine::new();
        let prior = InstallationState {
            last_prompted_version: Some(v("1.1.0.0")),
            ..Default::default()
        };

        let (action, state) = engine.decide(
            &info(current, latest),
            prior.clone(),
            now(),
            &RulesManager::with_global(Rules::CRITICAL),
        );

        assert_eq!(action, Action::NoAction);
        assert_eq!(state, prior);
    }

    #[test]
    fn below_minimum_forces_alert_despite_skip_and_frequency() {
        let engine = DecisionEngine::new();
        let info = info("1.0.0.0", "2.0.0.0").with_minimum_required(v("1.5.0.0"));
        let prior = InstallationState {
            last_prompted_version: Some(v("2.0.0.0")),
            last_prompt_timestamp: Some(now() - TimeDelta::minutes(1)),
            skipped_versions: [v("2.0.0.0")].into_iter().collect(),
        };

        let (action, _) = engine.decide(
            &info,
            prior,
            now(),
            &RulesManager::with_global(Rules::RELAXED),
        );

        assert_eq!(action.alert_type(), Some(AlertType::Force));
    }

    #[test]
    fn at_minimum_uses_configured_rules() {
        let engine = DecisionEngine::new();
        let info = info("1.5.0.0", "2.0.0.0").with_minimum_required(v("1.5.0.0"));

        let (action, _) = engine.decide(
            &info,
            InstallationState::default(),
            now(),
            &RulesManager::with_global(Rules::RELAXED),
        );

        assert_eq!(action.alert_type(), Some(AlertType::Skip));
    }

    #[test]
    fn skipped_version_yields_no_action() {
        let engine = DecisionEngine::new();
        let prior = InstallationState {
            skipped_versions: [v("1.3.0.0")].into_iter().collect(),
            ..Default::default()
        };

        let (action, state) = engine.decide(
            &info("1.2.0.0", "1.3.0.0"),
            prior.clone(),
            now(),
            &RulesManager::with_global(Rules::ANNOYING),
        );

        assert_eq!(action, Action::NoAction);
        assert_eq!(state, prior);
    }

    #[test]
    fn configured_force_bypasses_skip_list() {
        let engine = DecisionEngine::new();
        let prior = InstallationState {
            skipped_versions: [v("2.0.0.0")].into_iter().collect(),
            last_prompt_timestamp: Some(now()),
            ..Default::default()
        };

        let (action, _) = engine.decide(
            &info("1.0.0.0", "2.0.0.0"),
            prior,
            now(),
            &RulesManager::builder().major(Rules::CRITICAL).build(),
        );

        assert_eq!(action.alert_type(), Some(AlertType::Force));
    }

    #[rstest]
    #[case(PromptFrequency::Weekly, TimeDelta::days(6), false)]
    #[case(PromptFrequency::Weekly, TimeDelta::days(7) - TimeDelta::seconds(1), false)]
    #[case(PromptFrequency::Weekly, TimeDelta::days(7), true)]
    #[case(PromptFrequency::Weekly, TimeDelta::days(8), true)]
    #[case(PromptFrequency::Daily, TimeDelta::hours(23), false)]
    #[case(PromptFrequency::Daily, TimeDelta::hours(24), true)]
    #[case(PromptFrequency::Immediately, TimeDelta::zero(), true)]
    fn frequency_gate_is_inclusive_at_interval(
        #[case] frequency: PromptFrequency,
        #[case] elapsed: TimeDelta,
        #[case] shows_alert: bool,
    ) {
        let engine = DecisionEngine::new();
        let manager = RulesManager::with_global(Rules::new(frequency, AlertType::Option));
        let prior = InstallationState {
            last_prompted_version: Some(v("1.3.0.0")),
            last_prompt_timestamp: Some(now() - elapsed),
            ..Default::default()
        };

        let (action, _) = engine.decide(&info("1.2.0.0", "1.3.0.0"), prior, now(), &manager);

        assert_eq!(matches!(action, Action::ShowAlert { .. }), shows_alert);
    }

    #[test]
    fn alert_type_none_is_still_reported_and_recorded() {
        let engine = DecisionEngine::new();

        let (action, state) = engine.decide(
            &info("1.2.0.0", "1.2.0.1"),
            InstallationState::default(),
            now(),
            &RulesManager::with_global(Rules::SILENT),
        );

        assert_eq!(action.alert_type(), Some(AlertType::None));
        assert_eq!(state.last_prompt_timestamp, Some(now()));
    }

    #[rstest]
    #[case(TimeDelta::hours(12), false)]
    #[case(TimeDelta::days(1), true)]
    fn release_age_gate_waits_for_configured_days(
        #[case] age: TimeDelta,
        #[case] shows_alert: bool,
    ) {
        let engine = DecisionEngine::new().with_released_for_days(1);
        let info = info("1.2.0.0", "1.3.0.0").with_release_date(now() - age);

        let (action, _) = engine.decide(
            &info,
            InstallationState::default(),
            now(),
            &RulesManager::with_global(Rules::ANNOYING),
        );

        assert_eq!(matches!(action, Action::ShowAlert { .. }), shows_alert);
    }

    #[test]
    fn release_age_gate_does_not_apply_below_minimum() {
        let engine = DecisionEngine::new().with_released_for_days(7);
        let info = info("1.0.0.0", "1.3.0.0")
            .with_minimum_required(v("1.1.0.0"))
            .with_release_date(now());

        let (action, _) = engine.decide(
            &info,
            InstallationState::default(),
            now(),
            &RulesManager::default(),
        );

        assert_eq!(action.alert_type(), Some(AlertType::Force));
    }

    #[test]
    fn skip_interaction_suppresses_until_newer_version() {
        let engine = DecisionEngine::new();
        let manager = RulesManager::with_global(Rules::ANNOYING);
        let first = info("1.2.0.0", "1.3.0.0");

        let (_, state) = engine.decide(&first, InstallationState::default(), now(), &manager);
        let state =
            engine.record_interaction(state, &first, AlertType::Option, Interaction::Skip, now());

        let (action, state) = engine.decide(&first, state, now() + TimeDelta::days(30), &manager);
        assert_eq!(action, Action::NoAction);

        let newer = info("1.2.0.0", "1.4.0.0");
        let (action, _) = engine.decide(&newer, state, now() + TimeDelta::days(30), &manager);
        assert!(matches!(action, Action::ShowAlert { .. }));
    }

    #[test]
    fn later_interaction_restarts_frequency_window() {
        let engine = DecisionEngine::new();
        let info = info("1.2.0.0", "1.3.0.0");
        let prior = InstallationState {
            last_prompt_timestamp: Some(now() - TimeDelta::days(3)),
            ..Default::default()
        };

        let state =
            engine.record_interaction(prior, &info, AlertType::Option, Interaction::Later, now());

        assert_eq!(state.last_prompt_timestamp, Some(now()));
        assert!(state.skipped_versions.is_empty());
    }

    #[test]
    fn update_interaction_leaves_state_untouched() {
        let engine = DecisionEngine::new();
        let prior = InstallationState {
            last_prompted_version: Some(v("1.3.0.0")),
            last_prompt_timestamp: Some(now() - TimeDelta::days(3)),
            ..Default::default()
        };

        let state = engine.record_interaction(
            prior.clone(),
            &info("1.2.0.0", "1.3.0.0"),
            AlertType::Force,
            Interaction::Update,
            now(),
        );

        assert_eq!(state, prior);
    }

    #[rstest]
    #[case(AlertType::Force, Interaction::Skip)]
    #[case(AlertType::Force, Interaction::Later)]
    #[case(AlertType::Skip, Interaction::Later)]
    #[case(AlertType::None, Interaction::Skip)]
    #[case(AlertType::None, Interaction::Update)]
    fn interaction_not_offered_by_alert_leaves_state_untouched(
        #[case] alert_type: AlertType,
        #[case] interaction: Interaction,
    ) {
        let engine = DecisionEngine::new();
        let prior = InstallationState {
            last_prompted_version: Some(v("2.0.0.0")),
            last_prompt_timestamp: Some(now() - TimeDelta::days(3)),
            ..Default::default()
        };
        let info = info("1.0.0.0", "2.0.0.0").with_minimum_required(v("1.5.0.0"));

        let state =
            engine.record_interaction(prior.clone(), &info, alert_type, interaction, now());

        assert_eq!(state, prior);
    }

    #[test]
    fn action_serializes_with_kind_tag() {
        let action = Action::ShowAlert {
            alert_type: AlertType::Skip,
            info: info("1.0.0.0", "1.0.1.0"),
        };

        let json = serde_json::to_value(&action).unwrap();

        assert_eq!(json["kind"], "showAlert");
        assert_eq!(json["alertType"], "skip");
        assert_eq!(json["info"]["latestAvailable"], "1.0.1.0");
        assert_eq!(
            serde_json::to_value(Action::NoAction).unwrap()["kind"],
            "noAction"
        );
    }
}

//! Check cycle orchestration
//!
//! Handles:
//! - Serializing check cycles (one in flight at a time)
//! - Fetching metadata and loading the installation state
//! - Running the decision engine
//! - Persisting the resulting state once the action is final
//! - Optionally presenting the alert and recording the user's answer

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::engine::decision::{Action, DecisionEngine, Interaction};
use crate::error::CheckError;
use crate::fetch::MetadataFetcher;
use crate::present::PresentationAdapter;
use crate::rules::{AlertType, RulesManager};
use crate::store::{InstallationState, PersistenceStore};
use crate::version::info::VersionInfo;
use crate::version::semver::UpdateSeverity;

/// Result delivered exactly once per check cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutcome {
    pub action: Action,
    pub severity: UpdateSeverity,
    /// Interaction reported by the presentation layer, if one was shown
    pub interaction: Option<Interaction>,
    /// False when the state write failed; the action is still valid
    pub state_persisted: bool,
}

pub struct UpdateChecker<F, S> {
    fetcher: F,
    store: S,
    rules: RulesManager,
    engine: DecisionEngine,
    in_flight: Mutex<()>,
}

impl<F: MetadataFetcher, S: PersistenceStore> UpdateChecker<F, S> {
    pub fn new(fetcher: F, store: S, rules: RulesManager) -> Self {
        Self {
            fetcher,
            store,
            rules,
            engine: DecisionEngine::default(),
            in_flight: Mutex::new(()),
        }
    }

    pub fn with_engine(mut self, engine: DecisionEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one check cycle without presenting anything.
    ///
    /// Fails with [`CheckError::InProgress`] if another cycle is running.
    pub async fn check(&self, now: DateTime<Utc>) -> Result<CheckOutcome, CheckError> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| CheckError::InProgress)?;

        let (outcome, _) = self.run_cycle(now).await?;
        Ok(outcome)
    }

    /// Run one check cycle, present any alert and record the answer
    pub async fn check_and_present<P: PresentationAdapter>(
        &self,
        adapter: &P,
        now: DateTime<Utc>,
    ) -> Result<CheckOutcome, CheckError> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| CheckError::InProgress)?;

        let (mut outcome, state) = self.run_cycle(now).await?;

        let Action::ShowAlert { alert_type, info } = outcome.action.clone() else {
            return Ok(outcome);
        };

        let Some(interaction) = adapter.present(alert_type, &info).await else {
            debug!("No interaction reported for {}", info.latest_available);
            return Ok(outcome);
        };

        if !alert_type.offers(interaction) {
            warn!(
                "Ignoring {:?}: not offered by {:?} alert",
                interaction, alert_type
            );
            return Ok(outcome);
        }

        let next = self
            .engine
            .record_interaction(state.clone(), &info, alert_type, interaction, now);
        if next != state {
            outcome.state_persisted &= self.persist(&next);
        }
        outcome.interaction = Some(interaction);

        Ok(outcome)
    }

    /// Record an interaction with an alert presented outside the checker.
    ///
    /// Interactions `alert_type` does not offer leave the stored state as is.
    pub async fn record_interaction(
        &self,
        info: &VersionInfo,
        alert_type: AlertType,
        interaction: Interaction,
        now: DateTime<Utc>,
    ) -> Result<InstallationState, CheckError> {
        let _guard = self.in_flight.lock().await;

        let state = self.store.load()?;
        let next = self
            .engine
            .record_interaction(state.clone(), info, alert_type, interaction, now);
        if next != state {
            self.store.save(&next)?;
        }

        Ok(next)
    }

    async fn run_cycle(
        &self,
        now: DateTime<Utc>,
    ) -> Result<(CheckOutcome, InstallationState), CheckError> {
        let info = self
            .fetcher
            .fetch()
            .await
            .inspect_err(|e| warn!("Version metadata fetch failed: {}", e))?;

        let state = self.store.load()?;
        let severity = info.severity();
        let (action, next) = self.engine.decide(&info, state, now, &self.rules);

        // Only a shown alert changes the state
        let state_persisted = match action {
            Action::ShowAlert { .. } => self.persist(&next),
            Action::NoAction => true,
        };

        Ok((
            CheckOutcome {
                action,
                severity,
                interaction: None,
                state_persisted,
            },
            next,
        ))
    }

    fn persist(&self, state: &InstallationState) -> bool {
        match self.store.save(state) {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    "Failed to persist installation state, prompt history is now inconsistent: {}",
                    e
                );
                false
            }
        }
    }
}

//! Presentation seam between the decision engine and the host UI

use crate::engine::decision::Interaction;
use crate::rules::AlertType;
use crate::version::info::VersionInfo;

/// Renders an alert and reports what the user chose.
///
/// Returns `None` when nothing was shown (for example `AlertType::None`) or
/// the user gave no answer.
#[async_trait::async_trait]
pub trait PresentationAdapter: Send + Sync {
    async fn present(&self, alert_type: AlertType, info: &VersionInfo) -> Option<Interaction>;
}

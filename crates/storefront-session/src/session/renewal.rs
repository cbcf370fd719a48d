//! Background access-token renewal.

use std::sync::Weak;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::manager::{RefreshOutcome, SessionInner, SessionManager};

/// Refreshes every `interval` until cancelled, until a refresh does not
/// succeed, or until the manager is dropped.
pub(super) fn spawn(
    handle: &Handle,
    manager: Weak<SessionInner>,
    cancel: CancellationToken,
    interval: Duration,
) {
    handle.spawn(async move {
        debug!(interval_ms = %interval.as_millis(), "Token renewal scheduled");
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("Token renewal cancelled");
                    break;
                }
                _ = tokio::time::sleep(interval) => {}
            }

            let Some(inner) = manager.upgrade() else {
                break;
            };
            match SessionManager::from_inner(inner).refresh_outcome().await {
                RefreshOutcome::Refreshed | RefreshOutcome::InFlight => {}
                outcome => {
                    debug!(outcome = ?outcome, "Token renewal stopped");
                    break;
                }
            }
        }
    });
}

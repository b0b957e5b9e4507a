//! Idle watchdog: a background sweep that terminates sessions with no
//! recent activity and reaps finished ones from the registry.

use std::sync::Arc;

use nocturne_protocol::TerminationReason;
use tokio::task::JoinHandle;
use tokio::time;

use crate::registry::SessionRegistry;
use crate::{GameStore, Notifier};

/// Spawns the sweep task. One per registry; runs until the runtime
/// shuts down.
pub fn spawn_watchdog<N: Notifier, S: GameStore>(
    registry: Arc<SessionRegistry<N, S>>,
) -> JoinHandle<()> {
    let sweep_interval = registry.config().sweep_interval;
    let idle_after = registry.config().idle_after;

    tokio::spawn(async move {
        let mut ticker = time::interval(sweep_interval);
        // interval fires immediately; swallow that tick so the first
        // sweep happens a full interval in.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            sweep(&registry, idle_after).await;
        }
    })
}

async fn sweep<N: Notifier, S: GameStore>(
    registry: &SessionRegistry<N, S>,
    idle_after: std::time::Duration,
) {
    let mut expired = 0usize;
    for handle in registry.handles().await {
        // A dead actor fails the probe; the reap below clears it.
        let Ok(info) = handle.info().await else { continue };
        if info.idle_for >= idle_after {
            tracing::warn!(
                session_id = %info.session_id,
                idle_secs = info.idle_for.as_secs(),
                "idle session expired"
            );
            if handle.force_terminate(TerminationReason::Idle).await.is_ok() {
                expired += 1;
            }
        }
    }

    let reaped = registry.reap_finished().await;
    if expired > 0 || reaped > 0 {
        tracing::info!(expired, reaped, "watchdog sweep finished");
    } else {
        tracing::debug!("watchdog sweep finished, nothing to do");
    }
}

use std::time::Duration;

use launchpad_ledger_interface::LedgerChange;
use sqlx::postgres::{PgListener, PgPool};
use tokio::sync::broadcast;
use tracing::{error, warn};

use crate::CHANGES_CHANNEL;

const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Forward `pg_notify` payloads to the in-process change feed.
pub(crate) async fn forward_notifications(pool: PgPool, sender: broadcast::Sender<LedgerChange>) {
    loop {
        let mut listener = match PgListener::connect_with(&pool).await {
            Ok(listener) => listener,
            Err(e) => {
                error!(error = %e, "Could not connect ledger listener");
                tokio::time::sleep(RECONNECT_DELAY).await;
                continue;
            }
        };

        if let Err(e) = listener.listen(CHANGES_CHANNEL).await {
            error!(error = %e, "Could not listen to ledger changes");
            tokio::time::sleep(RECONNECT_DELAY).await;
            continue;
        }

        loop {
            match listener.recv().await {
                Ok(notification) => {
                    match serde_json::from_str::<LedgerChange>(notification.payload()) {
                        Ok(change) => {
                            let _ = sender.send(change);
                        }
                        Err(e) => {
                            warn!(payload = notification.payload(), error = %e, "Malformed ledger change")
                        }
                    }
                }
                Err(e) => {
                    error!(error = %e, "Ledger listener disconnected");
                    break;
                }
            }
        }

        tokio::time::sleep(RECONNECT_DELAY).await;
    }
}

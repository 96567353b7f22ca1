// ============================================================================
// Background Fetch Worker
// ============================================================================
// Thread dédié qui exécute les requêtes HTTP sans bloquer l'UI
//
// - Reçoit des FetchCommand via un channel (command_rx)
// - Lance chaque requête comme une tâche tokio indépendante
// - Renvoie un FetchOutcome via un autre channel (result_tx)
//
// CONCEPT RUST : Thread OS + runtime tokio
// - L'event loop TUI reste synchrone
// - Le runtime vit dans le thread worker et disparaît avec lui
// - Deux requêtes successives peuvent être en vol en même temps : c'est le
//   contrôleur qui ignore les réponses périmées
// ============================================================================

use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::api::MarketDataSource;
use crate::controller::{FetchCommand, FetchOutcome};

/// Lance le worker de fetch
///
/// Le thread s'arrête quand tous les Sender de commandes sont fermés.
///
/// # Arguments
/// * `command_rx` - Receiver des commandes émises par le contrôleur
/// * `result_tx` - Sender des résultats vers l'event loop
/// * `source` - Source des données de marché (HTTP en production)
pub fn spawn_fetch_worker(
    command_rx: mpsc::Receiver<FetchCommand>,
    result_tx: mpsc::Sender<FetchOutcome>,
    source: Arc<dyn MarketDataSource>,
) -> Result<JoinHandle<()>> {
    // Runtime créé ici pour propager l'erreur à l'appelant
    let runtime =
        tokio::runtime::Runtime::new().context("Échec de la création du runtime tokio")?;

    let handle = std::thread::Builder::new()
        .name("fetch-worker".to_string())
        .spawn(move || {
            // Boucle de réception : recv() bloque le thread worker, pas l'UI
            while let Ok(command) = command_rx.recv() {
                info!(seq = command.seq, params = ?command.params, "Worker received command");

                let source = Arc::clone(&source);
                let result_tx = result_tx.clone();

                runtime.spawn(async move {
                    let outcome = match source.fetch_markets(command.params).await {
                        Ok(entries) => FetchOutcome::Loaded {
                            seq: command.seq,
                            entries,
                        },
                        Err(error) => FetchOutcome::Failed {
                            seq: command.seq,
                            error,
                        },
                    };

                    if result_tx.send(outcome).is_err() {
                        warn!(seq = command.seq, "Result channel closed, dropping outcome");
                    }
                });
            }

            debug!("Command channel closed, shutting down runtime");
            // Laisse aux requêtes en vol une chance de se terminer proprement
            runtime.shutdown_timeout(std::time::Duration::from_millis(500));
            info!("Worker thread exiting (channel closed)");
        })
        .context("Échec du lancement du thread worker")?;

    Ok(handle)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::error::FetchFailure;
    use crate::models::{Currency, MarketEntry, QueryParameters};

    /// Source factice : renvoie une entrée par page demandée, ou une erreur
    /// pour l'euro
    struct FakeSource {
        calls: Mutex<Vec<QueryParameters>>,
    }

    #[async_trait]
    impl MarketDataSource for FakeSource {
        async fn fetch_markets(
            &self,
            params: QueryParameters,
        ) -> Result<Vec<MarketEntry>, FetchFailure> {
            self.calls.lock().unwrap().push(params);
            if params.currency == Currency::Eur {
                return Err(FetchFailure::Network("unreachable".to_string()));
            }
            Ok(vec![MarketEntry::new(
                format!("coin-{}", params.page),
                "Coin",
                1.0,
                2.0,
                "",
            )])
        }
    }

    #[test]
    fn test_worker_round_trip() {
        let (command_tx, command_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::channel();
        let source = Arc::new(FakeSource {
            calls: Mutex::new(Vec::new()),
        });

        let handle = spawn_fetch_worker(command_rx, result_tx, source.clone()).unwrap();

        let params = QueryParameters {
            page: 5,
            ..QueryParameters::default()
        };
        command_tx.send(FetchCommand { seq: 1, params }).unwrap();

        let outcome = result_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        match outcome {
            FetchOutcome::Loaded { seq, entries } => {
                assert_eq!(seq, 1);
                assert_eq!(entries[0].id, "coin-5");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        drop(command_tx);
        handle.join().unwrap();
        assert_eq!(source.calls.lock().unwrap().as_slice(), &[params]);
    }

    #[test]
    fn test_worker_reports_failure() {
        let (command_tx, command_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::channel();
        let source = Arc::new(FakeSource {
            calls: Mutex::new(Vec::new()),
        });

        let handle = spawn_fetch_worker(command_rx, result_tx, source).unwrap();

        let params = QueryParameters {
            currency: Currency::Eur,
            ..QueryParameters::default()
        };
        command_tx.send(FetchCommand { seq: 9, params }).unwrap();

        let outcome = result_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(
            outcome,
            FetchOutcome::Failed {
                seq: 9,
                error: FetchFailure::Network("unreachable".to_string()),
            }
        );

        drop(command_tx);
        handle.join().unwrap();
    }

    /// Source lente sur la page 1 : la requête suivante la double
    struct SlowFirstPage;

    #[async_trait]
    impl MarketDataSource for SlowFirstPage {
        async fn fetch_markets(
            &self,
            params: QueryParameters,
        ) -> Result<Vec<MarketEntry>, FetchFailure> {
            if params.page == 1 {
                tokio::time::sleep(Duration::from_millis(800)).await;
            }
            Ok(vec![MarketEntry::new(
                format!("coin-{}", params.page),
                "Coin",
                1.0,
                2.0,
                "",
            )])
        }
    }

    #[test]
    fn test_overlapping_commands_run_concurrently() {
        let (command_tx, command_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::channel();

        let handle = spawn_fetch_worker(command_rx, result_tx, Arc::new(SlowFirstPage)).unwrap();

        let page_one = QueryParameters::default();
        let page_two = QueryParameters {
            page: 2,
            ..QueryParameters::default()
        };
        command_tx.send(FetchCommand { seq: 1, params: page_one }).unwrap();
        command_tx.send(FetchCommand { seq: 2, params: page_two }).unwrap();

        // La page 2 n'attend pas la fin de la page 1
        let first = result_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        let second = result_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(first.seq(), 2);
        assert_eq!(second.seq(), 1);

        drop(command_tx);
        handle.join().unwrap();
    }
}

// ============================================================================
// Structure : MarketController
// ============================================================================
// Contrôleur filtre/fetch : possède les paramètres de requête, les résultats
// affichés et l'indicateur de chargement.
//
// Cycle :  changement de paramètre -> loading = true -> FetchCommand
//          -> (worker) -> FetchOutcome -> résultats ou échec -> loading = false
//
// CONCEPTS RUST :
// 1. Encapsulation : champs privés, mutation uniquement via les setters
// 2. Channels : chaque changement validé envoie UNE commande au worker
// 3. Numéro de séquence : une réponse périmée n'écrase jamais une réponse
//    plus récente
// ============================================================================

use std::sync::mpsc;

use chrono::{DateTime, Local};
use tracing::{debug, error, info, warn};

use crate::error::FetchFailure;
use crate::models::{Currency, FilterChange, MarketEntry, QueryParameters, SortOrder};

// ============================================================================
// Messages échangés avec le worker
// ============================================================================

/// Commande envoyée au worker : exécuter une requête
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchCommand {
    /// Numéro de séquence, strictement croissant
    pub seq: u64,

    /// Paramètres complets de la requête
    pub params: QueryParameters,
}

/// Résultat renvoyé par le worker
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Données décodées, dans l'ordre de l'API
    Loaded {
        seq: u64,
        entries: Vec<MarketEntry>,
    },

    /// Échec du fetch
    Failed {
        seq: u64,
        error: FetchFailure,
    },
}

impl FetchOutcome {
    pub fn seq(&self) -> u64 {
        match self {
            FetchOutcome::Loaded { seq, .. } | FetchOutcome::Failed { seq, .. } => *seq,
        }
    }
}

// ============================================================================
// Contrôleur
// ============================================================================

/// État partagé par tous les contrôles de la page
pub struct MarketController {
    params: QueryParameters,
    results: Vec<MarketEntry>,
    loading: bool,

    /// Séquence de la dernière commande émise (0 = aucune)
    latest_seq: u64,

    initialized: bool,
    last_updated: Option<DateTime<Local>>,
    last_failure: Option<FetchFailure>,

    command_tx: mpsc::Sender<FetchCommand>,
}

impl MarketController {
    /// Crée un contrôleur avec les paramètres par défaut, sans rien charger
    ///
    /// Le premier fetch part avec initialize().
    pub fn new(command_tx: mpsc::Sender<FetchCommand>) -> Self {
        Self {
            params: QueryParameters::default(),
            results: Vec::new(),
            loading: false,
            latest_seq: 0,
            initialized: false,
            last_updated: None,
            last_failure: None,
            command_tx,
        }
    }

    /// Chargement initial : paramètres par défaut + premier fetch
    ///
    /// Ne s'exécute qu'une seule fois.
    pub fn initialize(&mut self) {
        if self.initialized {
            warn!("Controller already initialized, ignoring");
            return;
        }
        self.initialized = true;
        self.params = QueryParameters::default();
        info!(params = ?self.params, "Initial market data load");
        self.issue_fetch();
    }

    // ========================================================================
    // Setters : chaque changement validé déclenche exactement un fetch
    // ========================================================================

    /// Change la devise, les autres paramètres sont conservés
    pub fn set_currency(&mut self, currency: Currency) {
        let next = QueryParameters {
            currency,
            ..self.params
        };
        self.commit(next);
    }

    /// Change l'ordre de tri, les autres paramètres sont conservés
    pub fn set_sort_order(&mut self, order: SortOrder) {
        let next = QueryParameters { order, ..self.params };
        self.commit(next);
    }

    /// Applique un changement émis par un sélecteur de filtre
    ///
    /// CONCEPT RUST : match exhaustif sur le tag
    pub fn apply_filter(&mut self, change: FilterChange) {
        debug!(?change, "Filter changed");
        match change {
            FilterChange::Currency(currency) => self.set_currency(currency),
            FilterChange::Order(order) => self.set_sort_order(order),
        }
    }

    /// Change de page en gardant la taille de page
    pub fn set_page(&mut self, page: u32) {
        let next = QueryParameters {
            page: page.max(1),
            ..self.params
        };
        self.commit(next);
    }

    /// Change page ET taille de page en une seule étape
    ///
    /// Aucune requête intermédiaire avec l'ancienne page et la nouvelle
    /// taille n'est émise.
    pub fn set_page_and_size(&mut self, page: u32, page_size: u32) {
        let next = QueryParameters {
            page: page.max(1),
            page_size: page_size.max(1),
            ..self.params
        };
        self.commit(next);
    }

    /// Valide de nouveaux paramètres
    ///
    /// Une valeur identique à l'actuelle n'est pas un changement : pas de
    /// fetch.
    fn commit(&mut self, next: QueryParameters) {
        if next == self.params {
            debug!(params = ?next, "Parameters unchanged, no fetch");
            return;
        }
        info!(from = ?self.params, to = ?next, "Query parameters changed");
        self.params = next;
        self.issue_fetch();
    }

    /// Passe en chargement et envoie la commande au worker
    fn issue_fetch(&mut self) {
        self.latest_seq += 1;
        self.loading = true;

        let command = FetchCommand {
            seq: self.latest_seq,
            params: self.params,
        };
        debug!(seq = command.seq, "Issuing fetch command");

        // Worker mort : le fetch échoue tout de suite, même traitement
        // qu'une erreur réseau
        if self.command_tx.send(command).is_err() {
            self.apply_outcome(FetchOutcome::Failed {
                seq: command.seq,
                error: FetchFailure::WorkerUnavailable,
            });
        }
    }

    // ========================================================================
    // Réconciliation des résultats
    // ========================================================================

    /// Intègre le résultat d'un fetch
    ///
    /// - Succès : remplace entièrement les résultats
    /// - Échec : log, résultats précédents conservés
    /// - Séquence périmée : ignoré, le fetch le plus récent est encore en vol
    pub fn apply_outcome(&mut self, outcome: FetchOutcome) {
        let seq = outcome.seq();
        if seq != self.latest_seq {
            debug!(seq, latest = self.latest_seq, "Discarding stale fetch outcome");
            return;
        }

        match outcome {
            FetchOutcome::Loaded { entries, .. } => {
                info!(seq, entries = entries.len(), "Market data loaded");
                self.results = entries;
                self.last_updated = Some(Local::now());
                self.last_failure = None;
            }
            FetchOutcome::Failed { error, .. } => {
                error!(seq, params = ?self.params, error = %error, "Failed to fetch market data");
                self.last_failure = Some(error);
            }
        }

        self.loading = false;
    }

    // ========================================================================
    // Accès en lecture
    // ========================================================================

    pub fn params(&self) -> &QueryParameters {
        &self.params
    }

    pub fn results(&self) -> &[MarketEntry] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Heure locale du dernier chargement réussi
    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }

    /// Dernier échec, effacé par le prochain succès
    pub fn last_failure(&self) -> Option<&FetchFailure> {
        self.last_failure.as_ref()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn controller() -> (MarketController, mpsc::Receiver<FetchCommand>) {
        let (tx, rx) = mpsc::channel();
        (MarketController::new(tx), rx)
    }

    fn entries(prefix: &str, count: usize) -> Vec<MarketEntry> {
        (0..count)
            .map(|i| {
                MarketEntry::new(
                    format!("{}-{}", prefix, i),
                    format!("Coin {}", i),
                    100.0 + i as f64,
                    1_000.0 * i as f64,
                    format!("https://img/{}-{}.png", prefix, i),
                )
            })
            .collect()
    }

    /// Commandes en attente dans le channel
    fn drain(rx: &mpsc::Receiver<FetchCommand>) -> Vec<FetchCommand> {
        rx.try_iter().collect()
    }

    #[test]
    fn test_initialize_issues_default_fetch() {
        let (mut ctl, rx) = controller();
        assert!(!ctl.is_loading());

        ctl.initialize();
        assert!(ctl.is_loading());

        let commands = drain(&rx);
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].params, QueryParameters::default());
        assert_eq!(commands[0].seq, 1);
    }

    #[test]
    fn test_initialize_runs_once() {
        let (mut ctl, rx) = controller();
        ctl.initialize();
        ctl.initialize();
        assert_eq!(drain(&rx).len(), 1);
    }

    #[test]
    fn test_each_change_sends_full_parameter_set() {
        let (mut ctl, rx) = controller();
        ctl.initialize();
        drain(&rx);

        ctl.set_page(4);
        ctl.set_sort_order(SortOrder::MarketCapAsc);
        ctl.set_currency(Currency::Eur);

        let commands = drain(&rx);
        assert_eq!(commands.len(), 3);
        assert_eq!(
            commands[2].params,
            QueryParameters {
                currency: Currency::Eur,
                order: SortOrder::MarketCapAsc,
                page_size: 10,
                page: 4,
            }
        );
        assert_eq!(commands[1].params.page, 4);
        assert_eq!(commands[1].params.currency, Currency::Usd);
    }

    #[test]
    fn test_unchanged_value_does_not_fetch() {
        let (mut ctl, rx) = controller();
        ctl.initialize();
        drain(&rx);

        ctl.set_currency(Currency::Usd);
        ctl.apply_filter(FilterChange::Order(SortOrder::MarketCapDesc));
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn test_page_and_size_is_atomic() {
        let (mut ctl, rx) = controller();
        ctl.initialize();
        drain(&rx);

        ctl.set_page_and_size(3, 20);

        let commands = drain(&rx);
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].params.page, 3);
        assert_eq!(commands[0].params.page_size, 20);
    }

    #[test]
    fn test_loading_flag_lifecycle() {
        let (mut ctl, rx) = controller();
        ctl.initialize();
        let seq = drain(&rx)[0].seq;
        assert!(ctl.is_loading());

        ctl.apply_outcome(FetchOutcome::Loaded {
            seq,
            entries: entries("a", 3),
        });
        assert!(!ctl.is_loading());

        ctl.set_currency(Currency::Eur);
        assert!(ctl.is_loading());
        let seq = drain(&rx)[0].seq;

        ctl.apply_outcome(FetchOutcome::Failed {
            seq,
            error: FetchFailure::Network("reset".to_string()),
        });
        assert!(!ctl.is_loading());
    }

    #[test]
    fn test_success_replaces_results_in_order() {
        let (mut ctl, rx) = controller();
        ctl.initialize();
        let seq = drain(&rx)[0].seq;

        let loaded = entries("a", 10);
        ctl.apply_outcome(FetchOutcome::Loaded {
            seq,
            entries: loaded.clone(),
        });

        assert_eq!(ctl.results(), loaded.as_slice());
        assert!(ctl.last_updated().is_some());
        assert!(ctl.last_failure().is_none());
    }

    #[test]
    fn test_failure_keeps_previous_results() {
        let (mut ctl, rx) = controller();
        ctl.initialize();
        let seq = drain(&rx)[0].seq;
        let loaded = entries("a", 5);
        ctl.apply_outcome(FetchOutcome::Loaded {
            seq,
            entries: loaded.clone(),
        });

        ctl.set_page(2);
        let seq = drain(&rx)[0].seq;
        ctl.apply_outcome(FetchOutcome::Failed {
            seq,
            error: FetchFailure::Status(500),
        });

        assert_eq!(ctl.results(), loaded.as_slice());
        assert!(!ctl.is_loading());
        // Pas de retour arrière sur les paramètres
        assert_eq!(ctl.params().page, 2);
        assert_eq!(ctl.last_failure(), Some(&FetchFailure::Status(500)));
    }

    #[test]
    fn test_first_load_failure_leaves_empty_results() {
        let (mut ctl, rx) = controller();
        ctl.initialize();
        let seq = drain(&rx)[0].seq;
        ctl.apply_outcome(FetchOutcome::Failed {
            seq,
            error: FetchFailure::Malformed("eof".to_string()),
        });
        assert!(ctl.results().is_empty());
        assert!(!ctl.is_loading());
    }

    #[test]
    fn test_stale_outcome_is_discarded() {
        let (mut ctl, rx) = controller();
        ctl.initialize();
        ctl.set_currency(Currency::Eur);
        let commands = drain(&rx);
        let (old, new) = (commands[0].seq, commands[1].seq);

        // La réponse récente arrive d'abord
        ctl.apply_outcome(FetchOutcome::Loaded {
            seq: new,
            entries: entries("eur", 2),
        });
        // L'ancienne arrive ensuite : ignorée
        ctl.apply_outcome(FetchOutcome::Loaded {
            seq: old,
            entries: entries("usd", 7),
        });

        assert_eq!(ctl.results().len(), 2);
        assert_eq!(ctl.results()[0].id, "eur-0");
        assert!(!ctl.is_loading());
    }

    #[test]
    fn test_loading_stays_on_until_latest_settles() {
        let (mut ctl, rx) = controller();
        ctl.initialize();
        ctl.set_page(2);
        let commands = drain(&rx);

        ctl.apply_outcome(FetchOutcome::Loaded {
            seq: commands[0].seq,
            entries: entries("p1", 1),
        });
        assert!(ctl.is_loading());
        assert!(ctl.results().is_empty());
    }

    #[test]
    fn test_closed_worker_is_a_fetch_failure() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut ctl = MarketController::new(tx);

        ctl.initialize();
        assert!(!ctl.is_loading());
        assert_eq!(ctl.last_failure(), Some(&FetchFailure::WorkerUnavailable));
    }

    // ------------------------------------------------------------------------
    // Capture des logs : l'échec doit laisser une trace
    // ------------------------------------------------------------------------

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failure_is_logged() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let (mut ctl, rx) = controller();
            ctl.initialize();
            let seq = drain(&rx)[0].seq;
            ctl.apply_outcome(FetchOutcome::Failed {
                seq,
                error: FetchFailure::Network("connection reset".to_string()),
            });
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("ERROR"));
        assert!(output.contains("Failed to fetch market data"));
        assert!(output.contains("connection reset"));
    }
}

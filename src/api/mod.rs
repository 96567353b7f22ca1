// ============================================================================
// Module : api
// ============================================================================
// Source des données de marché : le trait MarketDataSource et son
// implémentation HTTP pour l'API CoinGecko
// ============================================================================

pub mod coingecko; // Client HTTP CoinGecko (`coins/markets`)

use async_trait::async_trait;

use crate::error::FetchFailure;
use crate::models::{MarketEntry, QueryParameters};

// Re-export des éléments principaux
pub use coingecko::{build_markets_url, parse_markets_body, CoinGeckoClient};

// ============================================================================
// Trait : MarketDataSource
// ============================================================================
// CONCEPT RUST : Trait object + async
// - Le worker manipule un Arc<dyn MarketDataSource>
// - #[async_trait] transforme la méthode async en Future boxée et Send,
//   ce qui permet de la lancer avec tokio::spawn
// - Les tests injectent une fausse source sans réseau
// ============================================================================

/// Fournisseur de données de marché
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Exécute une requête pour les paramètres donnés
    ///
    /// Toute erreur (réseau, statut HTTP, JSON invalide) devient un
    /// FetchFailure : rien d'autre ne sort de cette frontière.
    async fn fetch_markets(
        &self,
        params: QueryParameters,
    ) -> Result<Vec<MarketEntry>, FetchFailure>;
}

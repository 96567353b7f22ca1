// ============================================================================
// Coinmarkets - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;        // Source des données de marché (CoinGecko)
pub mod app;        // État de la page
pub mod config;     // Configuration (hôte API, logs)
pub mod controller; // Contrôleur filtre/fetch
pub mod error;      // FetchFailure
pub mod handler;    // Clavier -> actions
pub mod models;     // Structures de données
pub mod ui;         // Interface utilisateur
pub mod worker;     // Thread de fetch en arrière-plan

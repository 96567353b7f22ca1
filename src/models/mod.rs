// ============================================================================
// Module : models
// ============================================================================
// Structures de données de l'application : paramètres de requête et
// lignes de marché décodées depuis l'API
// ============================================================================

pub mod market_entry; // Une ligne de marché (un actif)
pub mod query;        // Paramètres de filtre, tri et pagination

// Re-export des structures principales
// On peut faire : use coinmarkets::models::QueryParameters;
pub use market_entry::MarketEntry;
pub use query::{
    Currency, FilterChange, QueryParameters, SelectOption, SortOrder, PAGE_SIZE_OPTIONS,
    PAGINATION_TOTAL,
};

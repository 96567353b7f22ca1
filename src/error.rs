// ============================================================================
// Erreurs du chemin de fetch
// ============================================================================
// FetchFailure est l'unique type d'erreur produit par un fetch de données de
// marché. Les variants ne servent qu'à rendre les logs lisibles : le
// contrôleur traite tous les cas de la même façon (log, fin du chargement,
// résultats précédents conservés).
//
// CONCEPT RUST : thiserror
// - #[derive(Error)] implémente std::error::Error
// - #[error("...")] génère l'implémentation de Display
// ============================================================================

use thiserror::Error;

/// Échec d'un fetch de données de marché
///
/// Clone : l'erreur voyage du worker vers le thread UI dans un channel et
/// reste affichée dans la barre de statut.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    /// Erreur réseau (DNS, connexion, TLS, corps illisible)
    #[error("network error: {0}")]
    Network(String),

    /// Réponse HTTP hors 2xx
    #[error("HTTP status {0}")]
    Status(u16),

    /// Corps reçu mais impossible à décoder
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// Le worker de fetch n'accepte plus de commandes
    #[error("fetch worker unavailable")]
    WorkerUnavailable,
}

impl From<reqwest::Error> for FetchFailure {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            FetchFailure::Status(status.as_u16())
        } else if err.is_decode() {
            FetchFailure::Malformed(err.to_string())
        } else {
            FetchFailure::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchFailure {
    fn from(err: serde_json::Error) -> Self {
        FetchFailure::Malformed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(FetchFailure::Status(429).to_string(), "HTTP status 429");
        assert_eq!(
            FetchFailure::WorkerUnavailable.to_string(),
            "fetch worker unavailable"
        );
    }

    #[test]
    fn test_from_serde_error() {
        let err = serde_json::from_str::<Vec<u32>>("{not json").unwrap_err();
        assert!(matches!(FetchFailure::from(err), FetchFailure::Malformed(_)));
    }
}

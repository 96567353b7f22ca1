// ============================================================================
// Configuration
// ============================================================================
// L'hôte de l'API est fixé à la compilation :
//   COINMARKETS_API_URL=https://pro-api.coingecko.com/api/v3 cargo build
// Sans cette variable, l'API publique CoinGecko est utilisée.
//
// CONCEPT RUST : option_env!
// - Lit une variable d'environnement au moment de la COMPILATION
// - Retourne Option<&'static str> (None si absente)
// - Rien n'est lu au lancement du binaire
// ============================================================================

use std::path::PathBuf;

/// Hôte par défaut de l'API de marché
pub const DEFAULT_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Filtre de logs par défaut (surchargé par RUST_LOG)
pub const DEFAULT_LOG_FILTER: &str = "coinmarkets=debug,info";

/// Nom du fichier de logs (suffixé par la date via la rotation quotidienne)
pub const LOG_FILE_NAME: &str = "coinmarkets.log";

/// Configuration de l'application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// URL de base de l'API, sans slash final
    pub api_base_url: String,

    /// User-Agent envoyé avec chaque requête
    pub user_agent: String,

    /// Répertoire des fichiers de logs
    pub log_dir: PathBuf,
}

impl Config {
    /// Construit la configuration à partir des valeurs de compilation
    pub fn load() -> Self {
        let api_base_url = option_env!("COINMARKETS_API_URL").unwrap_or(DEFAULT_API_URL);
        Self::with_api_url(api_base_url)
    }

    /// Configuration pointant vers un hôte donné
    pub fn with_api_url(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            user_agent: format!("coinmarkets/{}", env!("CARGO_PKG_VERSION")),
            log_dir: default_log_dir(),
        }
    }
}

/// Emplacement des logs
/// - Linux : ~/.local/share/coinmarkets/logs
/// - macOS : ~/Library/Application Support/coinmarkets/logs
/// - Windows : %LOCALAPPDATA%\coinmarkets\logs
/// - Sinon : ./logs
fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("coinmarkets").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = Config::with_api_url("http://localhost:8080/api/v3/");
        assert_eq!(config.api_base_url, "http://localhost:8080/api/v3");
    }

    #[test]
    fn test_user_agent_names_crate() {
        let config = Config::with_api_url(DEFAULT_API_URL);
        assert!(config.user_agent.starts_with("coinmarkets/"));
        assert!(config.log_dir.ends_with("logs"));
    }
}

// ============================================================================
// API Client : CoinGecko
// ============================================================================
// Récupère une page de données de marché depuis l'endpoint `coins/markets`
//
// GET <base>/coins/markets?vs_currency=usd&order=market_cap_desc
//                         &per_page=10&page=1&sparkline=false
//
// La réponse est un tableau JSON d'objets ; seuls id, name, current_price,
// circulating_supply et image sont lus.
// ============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, error, info, instrument};

use crate::api::MarketDataSource;
use crate::config::Config;
use crate::error::FetchFailure;
use crate::models::{MarketEntry, QueryParameters};

/// Client HTTP vers l'API CoinGecko
///
/// CONCEPT RUST : reqwest::Client réutilisable
/// - Le client garde un pool de connexions
/// - Il est créé une seule fois puis partagé (Clone = Arc interne)
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: reqwest::Client,
    base_url: String,
}

impl CoinGeckoClient {
    /// Crée le client à partir de la configuration
    ///
    /// Pas de timeout : une requête reste en vol jusqu'à sa résolution.
    pub fn new(config: &Config) -> Result<Self> {
        debug!(base_url = %config.api_base_url, "Creating HTTP client");
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
        })
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
    /// CONCEPT RUST : #[instrument]
    /// - Ajoute un span avec les paramètres de la requête
    /// - Tous les logs à l'intérieur portent ce contexte
    #[instrument(
        skip(self, params),
        fields(
            vs_currency = params.currency.as_str(),
            order = params.order.as_str(),
            per_page = params.page_size,
            page = params.page
        )
    )]
    async fn fetch_markets(
        &self,
        params: QueryParameters,
    ) -> Result<Vec<MarketEntry>, FetchFailure> {
        let url = build_markets_url(&self.base_url, &params);
        debug!(url = %url, "Sending HTTP request to market-data API");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        // Vérifie que la réponse est un succès HTTP (200-299)
        if !status.is_success() {
            error!(status = %status, "Market-data API returned error status");
            return Err(FetchFailure::Status(status.as_u16()));
        }

        // Le corps est lu en texte puis décodé par serde_json : un JSON
        // invalide donne toujours FetchFailure::Malformed
        let body = response.text().await?;
        let entries = parse_markets_body(&body)?;

        info!(entries = entries.len(), "Successfully fetched market data");
        Ok(entries)
    }
}

/// Construit l'URL complète de la requête
///
/// La query string reflète TOUS les paramètres courants.
pub fn build_markets_url(base_url: &str, params: &QueryParameters) -> String {
    let query = params
        .query_pairs()
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}/coins/markets?{}", base_url.trim_end_matches('/'), query)
}

/// Décode le corps JSON en liste ordonnée de MarketEntry
///
/// L'ordre du tableau JSON est conservé tel quel.
pub fn parse_markets_body(body: &str) -> Result<Vec<MarketEntry>, FetchFailure> {
    let entries: Vec<MarketEntry> = serde_json::from_str(body)?;
    debug!(parsed = entries.len(), "Finished parsing market data");
    Ok(entries)
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Currency, SortOrder};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const TWO_COINS: &str = r#"[
        {"id":"bitcoin","symbol":"btc","name":"Bitcoin","image":"https://img/btc.png",
         "current_price":67000,"circulating_supply":19700000,"market_cap":1},
        {"id":"ethereum","symbol":"eth","name":"Ethereum","image":"https://img/eth.png",
         "current_price":3100.5,"circulating_supply":120000000,"market_cap":2}
    ]"#;

    /// Serveur HTTP minimal : répond une seule fois puis renvoie la ligne de
    /// requête reçue
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            String::from_utf8_lossy(&request)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });

        (format!("http://{}", addr), handle)
    }

    #[test]
    fn test_build_markets_url_defaults() {
        let url = build_markets_url(
            "https://api.coingecko.com/api/v3",
            &QueryParameters::default(),
        );
        assert_eq!(
            url,
            "https://api.coingecko.com/api/v3/coins/markets?vs_currency=usd&order=market_cap_desc&per_page=10&page=1&sparkline=false"
        );
    }

    #[test]
    fn test_build_markets_url_all_fields() {
        let params = QueryParameters {
            currency: Currency::Eur,
            order: SortOrder::MarketCapAsc,
            page_size: 20,
            page: 3,
        };
        let url = build_markets_url("http://localhost/", &params);
        assert!(url.starts_with("http://localhost/coins/markets?"));
        assert!(url.contains("vs_currency=eur"));
        assert!(url.contains("order=market_cap_asc"));
        assert!(url.contains("per_page=20"));
        assert!(url.contains("page=3"));
        assert!(url.ends_with("sparkline=false"));
    }

    #[test]
    fn test_parse_preserves_order() {
        let entries = parse_markets_body(TWO_COINS).unwrap();
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["bitcoin", "ethereum"]);
        assert_eq!(entries[1].current_price, Some(3100.5));
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let result = parse_markets_body(r#"{"status":{"error_code":429}}"#);
        assert!(matches!(result, Err(FetchFailure::Malformed(_))));
    }

    #[test]
    fn test_parse_rejects_missing_id() {
        let result = parse_markets_body(r#"[{"name":"Nameless","image":""}]"#);
        assert!(matches!(result, Err(FetchFailure::Malformed(_))));
    }

    #[tokio::test]
    async fn test_fetch_markets_against_local_server() {
        let (base, server) = serve_once("HTTP/1.1 200 OK", TWO_COINS).await;
        let client = CoinGeckoClient::new(&Config::with_api_url(&base)).unwrap();

        let params = QueryParameters {
            page: 2,
            ..QueryParameters::default()
        };
        let entries = client.fetch_markets(params).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Bitcoin");

        let request_line = server.await.unwrap();
        assert_eq!(
            request_line,
            "GET /coins/markets?vs_currency=usd&order=market_cap_desc&per_page=10&page=2&sparkline=false HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn test_fetch_markets_error_status() {
        let (base, server) = serve_once("HTTP/1.1 429 Too Many Requests", "{}").await;
        let client = CoinGeckoClient::new(&Config::with_api_url(&base)).unwrap();

        let result = client.fetch_markets(QueryParameters::default()).await;
        assert_eq!(result, Err(FetchFailure::Status(429)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_markets_connection_refused() {
        // Port réservé puis libéré : la connexion échoue
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            CoinGeckoClient::new(&Config::with_api_url(&format!("http://{}", addr))).unwrap();
        let result = client.fetch_markets(QueryParameters::default()).await;
        assert!(matches!(result, Err(FetchFailure::Network(_))));
    }
}

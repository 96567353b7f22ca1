// ============================================================================
// Structure : MarketEntry
// ============================================================================
// Une ligne de données de marché pour un actif, telle que renvoyée par
// l'endpoint `coins/markets`
//
// CONCEPTS RUST :
// 1. Serde : seuls les champs utiles sont déclarés, les autres champs du
//    JSON sont ignorés automatiquement
// 2. Option<f64> : l'API renvoie parfois `null` pour les valeurs numériques
// ============================================================================

use serde::Deserialize;

use crate::models::Currency;

/// Une ligne du tableau de marché
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarketEntry {
    /// Identifiant unique (ex: "bitcoin"), clé de ligne du tableau
    pub id: String,

    /// Nom affiché (ex: "Bitcoin")
    pub name: String,

    /// Prix actuel dans la devise demandée
    #[serde(default)]
    pub current_price: Option<f64>,

    /// Offre en circulation
    #[serde(default)]
    pub circulating_supply: Option<f64>,

    /// URL du logo de l'actif
    #[serde(rename = "image", default)]
    pub image_url: String,
}

impl MarketEntry {
    /// Crée une entrée (utilisé surtout par les tests)
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        current_price: f64,
        circulating_supply: f64,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            current_price: Some(current_price),
            circulating_supply: Some(circulating_supply),
            image_url: image_url.into(),
        }
    }

    /// Prix suffixé par le code de la devise active
    ///
    /// Format : "67012.5 usd"
    pub fn price_display(&self, currency: Currency) -> String {
        match self.current_price {
            Some(price) => format!("{} {}", price, currency.as_str()),
            None => format!("- {}", currency.as_str()),
        }
    }

    /// Offre en circulation, sans mise en forme
    pub fn supply_display(&self) -> String {
        self.circulating_supply
            .map(|supply| supply.to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================

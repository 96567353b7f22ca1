// ============================================================================
// Structure : QueryParameters
// ============================================================================
// Paramètres qui pilotent la requête vers l'API de marché :
// devise, ordre de tri, page et taille de page
//
// CONCEPTS RUST :
// 1. Enums Copy : Currency et SortOrder sont de simples tags, copiés à
//    chaque passage en argument (pas de move)
// 2. const : tables d'options et constantes de pagination connues à la
//    compilation
// ============================================================================

/// Total affiché par la pagination.
/// Fixe : l'API `coins/markets` ne renvoie pas le nombre total d'actifs.
pub const PAGINATION_TOTAL: u32 = 10_000;

/// Tailles de page proposées par le sélecteur de pagination
pub const PAGE_SIZE_OPTIONS: [u32; 5] = [5, 10, 20, 50, 100];

/// Option d'un sélecteur : valeur envoyée à l'API + libellé affiché
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

// ============================================================================
// Enum : Currency
// ============================================================================

/// Devise de cotation (`vs_currency` côté API)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Currency {
    #[default]
    Usd,
    Eur,
}

impl Currency {
    /// Toutes les devises, dans l'ordre du sélecteur
    pub const ALL: [Currency; 2] = [Currency::Usd, Currency::Eur];

    /// Valeur envoyée dans la query string (ex: "usd")
    ///
    /// C'est aussi le suffixe affiché après les prix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "usd",
            Currency::Eur => "eur",
        }
    }

    /// Devise correspondant à une valeur d'option (inverse de as_str)
    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }

    /// Libellé affiché dans le sélecteur
    pub fn label(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }

    /// Options du sélecteur de devise
    pub fn options() -> Vec<SelectOption> {
        Self::ALL
            .iter()
            .map(|c| SelectOption {
                value: c.as_str(),
                label: c.label(),
            })
            .collect()
    }
}

// ============================================================================
// Enum : SortOrder
// ============================================================================

/// Ordre de tri (`order` côté API)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    MarketCapDesc,
    MarketCapAsc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 2] = [SortOrder::MarketCapDesc, SortOrder::MarketCapAsc];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::MarketCapDesc => "market_cap_desc",
            SortOrder::MarketCapAsc => "market_cap_asc",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.as_str() == value)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::MarketCapDesc => "Market cap descending",
            SortOrder::MarketCapAsc => "Market cap ascending",
        }
    }

    pub fn options() -> Vec<SelectOption> {
        Self::ALL
            .iter()
            .map(|o| SelectOption {
                value: o.as_str(),
                label: o.label(),
            })
            .collect()
    }
}

// ============================================================================
// Enum : FilterChange
// ============================================================================
// CONCEPT RUST : Enum avec données comme "tag + valeur"
// - Le variant identifie le paramètre modifié
// - La donnée porte la nouvelle valeur, typée
// - Impossible d'envoyer une devise comme ordre de tri
// ============================================================================

/// Changement émis par un sélecteur de filtre
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterChange {
    Currency(Currency),
    Order(SortOrder),
}

// ============================================================================
// Structure : QueryParameters
// ============================================================================

/// Paramètres courants de la requête
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryParameters {
    /// Devise de cotation
    pub currency: Currency,

    /// Ordre de tri par capitalisation
    pub order: SortOrder,

    /// Nombre de lignes par page (> 0)
    pub page_size: u32,

    /// Numéro de page, commence à 1
    pub page: u32,
}

impl Default for QueryParameters {
    fn default() -> Self {
        Self {
            currency: Currency::Usd,
            order: SortOrder::MarketCapDesc,
            page_size: 10,
            page: 1,
        }
    }
}

impl QueryParameters {
    /// Paires clé/valeur de la query string, dans l'ordre envoyé à l'API
    ///
    /// Tous les paramètres sont toujours présents, pas seulement celui qui
    /// vient de changer.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("vs_currency", self.currency.as_str().to_string()),
            ("order", self.order.as_str().to_string()),
            ("per_page", self.page_size.to_string()),
            ("page", self.page.to_string()),
            ("sparkline", "false".to_string()),
        ]
    }

    /// Nombre de pages pour la taille de page courante
    pub fn page_count(&self) -> u32 {
        page_count(self.page_size)
    }
}

/// Nombre de pages pour un total fixe de PAGINATION_TOTAL entrées
///
/// CONCEPT RUST : div_ceil
/// - Division arrondie au supérieur (10000 / 3 -> 3334)
/// - max(1) protège contre une taille de page nulle
pub fn page_count(page_size: u32) -> u32 {
    PAGINATION_TOTAL.div_ceil(page_size.max(1)).max(1)
}

/// Ramène une page dans l'intervalle [1, page_count(page_size)]
pub fn clamp_page(page: u32, page_size: u32) -> u32 {
    page.clamp(1, page_count(page_size))
}

/// Taille de page suivante dans le menu (reste sur la dernière)
pub fn next_page_size(current: u32) -> u32 {
    PAGE_SIZE_OPTIONS
        .iter()
        .copied()
        .find(|&size| size > current)
        .unwrap_or(PAGE_SIZE_OPTIONS[PAGE_SIZE_OPTIONS.len() - 1])
}

/// Taille de page précédente dans le menu (reste sur la première)
pub fn previous_page_size(current: u32) -> u32 {
    PAGE_SIZE_OPTIONS
        .iter()
        .rev()
        .copied()
        .find(|&size| size < current)
        .unwrap_or(PAGE_SIZE_OPTIONS[0])
}

// ============================================================================
// Tests unitaires
// ============================================================================

// ============================================================================
// Structure : App
// ============================================================================
// État de la page TUI
//
// - Le MarketController possède les paramètres, les résultats et le flag de
//   chargement. App ne les modifie JAMAIS directement : elle appelle ses
//   setters.
// - App possède l'état purement visuel : focus, liste déroulante ouverte,
//   ligne surlignée, visualiseur de code monté ou non, confirmation de quit.
// ============================================================================

use tracing::{debug, info};

use crate::controller::{FetchOutcome, MarketController};
use crate::models::query::{clamp_page, next_page_size, previous_page_size};
use crate::models::{Currency, FilterChange, SelectOption, SortOrder};
use crate::ui::code_viewer::{CodeViewer, VIEWER_SOURCE};

// ============================================================================
// Enum : Focus
// ============================================================================
// CONCEPT RUST : Enums pour state machines
// - Un seul contrôle actif à la fois
// - Tab / Shift+Tab font tourner le focus
// ============================================================================

/// Contrôle qui reçoit les touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Sélecteur de devise
    Currency,

    /// Sélecteur d'ordre de tri
    Order,

    /// Tableau + pagination
    Table,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Currency => Focus::Order,
            Focus::Order => Focus::Table,
            Focus::Table => Focus::Currency,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Focus::Currency => Focus::Table,
            Focus::Order => Focus::Currency,
            Focus::Table => Focus::Order,
        }
    }

    /// Sélecteur correspondant, si le focus est sur un sélecteur
    pub fn filter_kind(self) -> Option<FilterKind> {
        match self {
            Focus::Currency => Some(FilterKind::Currency),
            Focus::Order => Some(FilterKind::Order),
            Focus::Table => None,
        }
    }
}

// ============================================================================
// Sélecteurs de filtre
// ============================================================================

/// Identifie un des deux sélecteurs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Currency,
    Order,
}

impl FilterKind {
    /// Options listées par ce sélecteur
    pub fn options(self) -> Vec<SelectOption> {
        match self {
            FilterKind::Currency => Currency::options(),
            FilterKind::Order => SortOrder::options(),
        }
    }

    /// Changement correspondant à l'option numéro `index`
    ///
    /// Le changement est reconstruit depuis la valeur portée par l'option.
    pub fn change_at(self, index: usize) -> Option<FilterChange> {
        let option = self.options().get(index).copied()?;
        match self {
            FilterKind::Currency => Currency::from_value(option.value).map(FilterChange::Currency),
            FilterKind::Order => SortOrder::from_value(option.value).map(FilterChange::Order),
        }
    }
}

/// Liste déroulante ouverte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dropdown {
    pub kind: FilterKind,

    /// Option surlignée (pas encore validée)
    pub highlighted: usize,
}

// ============================================================================
// App
// ============================================================================

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Two-step quit : première pression de 'q' -> true, deuxième -> quit
    pub confirm_quit: bool,

    /// Contrôle actif
    pub focus: Focus,

    /// Liste déroulante ouverte, s'il y en a une
    pub dropdown: Option<Dropdown>,

    /// Ligne surlignée dans le tableau
    pub selected_row: usize,

    /// Visualiseur de code (None = démonté)
    pub code_viewer: Option<CodeViewer>,

    /// Contrôleur filtre/fetch
    pub controller: MarketController,
}

impl App {
    /// Crée l'application autour d'un contrôleur
    ///
    /// Le visualiseur de code est monté immédiatement. Le premier fetch
    /// n'est pas lancé ici : voir start().
    pub fn new(controller: MarketController) -> Self {
        Self {
            running: true,
            confirm_quit: false,
            focus: Focus::Table,
            dropdown: None,
            selected_row: 0,
            code_viewer: Some(CodeViewer::mount(VIEWER_SOURCE)),
            controller,
        }
    }

    /// Démarre la page : chargement initial
    pub fn start(&mut self) {
        self.controller.initialize();
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    // ========================================================================
    // Focus
    // ========================================================================

    pub fn focus_next(&mut self) {
        self.dropdown = None;
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.dropdown = None;
        self.focus = self.focus.previous();
    }

    // ========================================================================
    // Listes déroulantes
    // ========================================================================

    /// Ouvre la liste du sélecteur actif, surlignée sur la valeur courante
    pub fn open_dropdown(&mut self) {
        let Some(kind) = self.focus.filter_kind() else {
            return;
        };
        let params = self.controller.params();
        let highlighted = match kind {
            FilterKind::Currency => Currency::ALL.iter().position(|c| *c == params.currency),
            FilterKind::Order => SortOrder::ALL.iter().position(|o| *o == params.order),
        }
        .unwrap_or(0);

        debug!(?kind, highlighted, "Dropdown opened");
        self.dropdown = Some(Dropdown { kind, highlighted });
    }

    pub fn close_dropdown(&mut self) {
        self.dropdown = None;
    }

    pub fn is_dropdown_open(&self) -> bool {
        self.dropdown.is_some()
    }

    pub fn dropdown_up(&mut self) {
        if let Some(dropdown) = self.dropdown.as_mut() {
            dropdown.highlighted = dropdown.highlighted.saturating_sub(1);
        }
    }

    pub fn dropdown_down(&mut self) {
        if let Some(dropdown) = self.dropdown.as_mut() {
            let max_index = dropdown.kind.options().len().saturating_sub(1);
            dropdown.highlighted = (dropdown.highlighted + 1).min(max_index);
        }
    }

    /// Valide l'option surlignée : le contrôleur reçoit le changement tagué
    pub fn commit_dropdown(&mut self) {
        let Some(dropdown) = self.dropdown.take() else {
            return;
        };
        if let Some(change) = dropdown.kind.change_at(dropdown.highlighted) {
            info!(?change, "User selected filter option");
            self.controller.apply_filter(change);
        }
    }

    // ========================================================================
    // Tableau
    // ========================================================================

    /// Ligne précédente
    pub fn navigate_up(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    /// Ligne suivante, sans dépasser la dernière
    pub fn navigate_down(&mut self) {
        let max_index = self.controller.results().len().saturating_sub(1);
        self.selected_row = (self.selected_row + 1).min(max_index);
    }

    // ========================================================================
    // Pagination
    // ========================================================================

    /// Va à une page (bornée à [1, nombre de pages])
    pub fn go_to_page(&mut self, page: u32) {
        let params = *self.controller.params();
        let page = clamp_page(page, params.page_size);
        if page != params.page {
            self.selected_row = 0;
        }
        self.controller.set_page(page);
    }

    pub fn next_page(&mut self) {
        let page = self.controller.params().page.saturating_add(1);
        self.go_to_page(page);
    }

    pub fn previous_page(&mut self) {
        let page = self.controller.params().page.saturating_sub(1);
        self.go_to_page(page);
    }

    pub fn first_page(&mut self) {
        self.go_to_page(1);
    }

    pub fn last_page(&mut self) {
        let page_count = self.controller.params().page_count();
        self.go_to_page(page_count);
    }

    /// Change la taille de page en une seule requête
    ///
    /// La page courante est conservée si elle existe encore avec la nouvelle
    /// taille, sinon ramenée à la dernière page.
    pub fn change_page_size(&mut self, page_size: u32) {
        let params = *self.controller.params();
        if page_size == params.page_size {
            return;
        }
        let page = clamp_page(params.page, page_size);
        self.selected_row = 0;
        self.controller.set_page_and_size(page, page_size);
    }

    pub fn larger_page_size(&mut self) {
        let size = next_page_size(self.controller.params().page_size);
        self.change_page_size(size);
    }

    pub fn smaller_page_size(&mut self) {
        let size = previous_page_size(self.controller.params().page_size);
        self.change_page_size(size);
    }

    // ========================================================================
    // Visualiseur de code
    // ========================================================================

    /// Démonte le visualiseur s'il est affiché, le remonte sinon
    pub fn toggle_code_viewer(&mut self) {
        if self.code_viewer.take().is_some() {
            info!("Code viewer hidden");
        } else {
            self.code_viewer = Some(CodeViewer::mount(VIEWER_SOURCE));
        }
    }

    // ========================================================================
    // Résultats du worker
    // ========================================================================

    /// Transmet un résultat au contrôleur puis recale la ligne surlignée
    pub fn apply_outcome(&mut self, outcome: FetchOutcome) {
        self.controller.apply_outcome(outcome);
        let max_index = self.controller.results().len().saturating_sub(1);
        self.selected_row = self.selected_row.min(max_index);
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

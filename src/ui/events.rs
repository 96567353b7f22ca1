// ============================================================================
// Gestion des événements
// ============================================================================
// Lit le clavier via crossterm et produit des Event pour l'event loop.
// Les helpers is_*_event traduisent une touche en intention (page suivante,
// ouvrir un sélecteur, etc.) ; handler.rs décide quoi en faire selon le
// focus courant.
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Terminal redimensionné
    Resize(u16, u16),

    /// Tick régulier : aucun input pendant tick_rate
    Tick,
}

impl Event {
    /// Raccourci : touche sans modificateur
    pub fn key(code: KeyCode) -> Self {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }
}

// ============================================================================
// Structure EventHandler
// ============================================================================
// CONCEPT : Singleton pattern pour gérer les événements
// - Un seul handler pour toute l'application
// - Pas besoin de stocker d'état (stateless)
// ============================================================================

/// Gestionnaire d'événements
pub struct EventHandler {
    /// Délai max d'attente d'un input avant d'émettre un Tick
    tick_rate: Duration,
}

impl EventHandler {
    /// Crée un gestionnaire avec le tick par défaut (250ms)
    pub fn new() -> Self {
        Self::with_tick_rate(Duration::from_millis(250))
    }

    /// Crée un gestionnaire avec un tick personnalisé
    pub fn with_tick_rate(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Lit le prochain événement (bloquant avec timeout)
    ///
    /// CONCEPT RUST : Result et ?
    /// - poll() peut échouer (I/O error)
    /// - read() peut échouer
    /// - ? propage automatiquement les erreurs
    ///
    /// CONCEPT : Non-blocking I/O avec timeout
    /// - poll(timeout) attend au plus tick_rate
    /// - Si pas d'événement, retourne Ok(Event::Tick)
    /// - Pendant ce temps, les résultats de fetch s'accumulent dans leur
    ///   channel et sont traités à l'itération suivante
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            // Il y a un événement, on le lit
            match event::read()? {
                // Événement clavier
                CrosstermEvent::Key(key) => {
                    // CONCEPT : Filter sur KeyEventKind
                    // Sur certains OS, on reçoit Press ET Release
                    // On ne veut gérer que Press pour éviter les doublons
                    if key.kind == KeyEventKind::Press {
                        Ok(Event::Key(key))
                    } else {
                        // Ignore Release, retourne Tick
                        Ok(Event::Tick)
                    }
                }

                CrosstermEvent::Resize(width, height) => Ok(Event::Resize(width, height)),

                // Souris, focus, collage : ignorés
                _ => Ok(Event::Tick),
            }
        } else {
            // Timeout : pas d'événement, retourne Tick
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helper : Convertir KeyEvent en action
// ============================================================================
// CONCEPT RUST : Pattern matching avancé
// - Match sur KeyCode pour identifier la touche
// - Peut aussi matcher sur les modifiers (Ctrl, Alt, Shift)
// ============================================================================

/// Vérifie si l'événement est la touche 'q' (quitter)
pub fn is_quit_event(event: &Event) -> bool {
    // CONCEPT RUST : Pattern matching avec if let
    // - Destructure Event::Key et vérifie le KeyCode en une ligne
    // - Plus élégant que match pour un seul cas
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
    } else {
        false
    }
}

/// Vérifie si l'événement est Échap
pub fn is_escape_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Esc)
    } else {
        false
    }
}

/// Vérifie si l'événement est Espace
pub fn is_space_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char(' '))
    } else {
        false
    }
}

/// Vérifie si l'événement est Entrée
pub fn is_enter_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Enter)
    } else {
        false
    }
}

/// Vérifie si l'événement est la flèche vers le haut ou 'k' (vim)
///
/// CONCEPT RUST : Multiple patterns avec |
/// - KeyCode::Up | KeyCode::Char('k') : match l'un ou l'autre
pub fn is_up_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K'))
    } else {
        false
    }
}

/// Vérifie si l'événement est la flèche vers le bas ou 'j' (vim)
pub fn is_down_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J'))
    } else {
        false
    }
}

/// Vérifie si l'événement est la flèche gauche ou 'h' (page précédente)
pub fn is_previous_page_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Left | KeyCode::Char('h'))
    } else {
        false
    }
}

/// Vérifie si l'événement est la flèche droite ou 'l' (page suivante)
pub fn is_next_page_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Right | KeyCode::Char('l'))
    } else {
        false
    }
}

/// Vérifie si l'événement est Début (première page)
pub fn is_first_page_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Home)
    } else {
        false
    }
}

/// Vérifie si l'événement est Fin (dernière page)
pub fn is_last_page_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::End)
    } else {
        false
    }
}

/// Vérifie si l'événement est ']' (taille de page suivante)
pub fn is_larger_page_size_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char(']'))
    } else {
        false
    }
}

/// Vérifie si l'événement est '[' (taille de page précédente)
pub fn is_smaller_page_size_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('['))
    } else {
        false
    }
}

/// Vérifie si l'événement est Tab (contrôle suivant)
pub fn is_focus_next_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Tab)
    } else {
        false
    }
}

/// Vérifie si l'événement est Shift+Tab (contrôle précédent)
///
/// Selon le terminal, Shift+Tab arrive en BackTab ou en Tab + SHIFT
pub fn is_focus_previous_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        key.code == KeyCode::BackTab
            || (key.code == KeyCode::Tab && key.modifiers.contains(KeyModifiers::SHIFT))
    } else {
        false
    }
}

/// Vérifie si l'événement est 'v' (afficher / masquer le visualiseur de code)
pub fn is_toggle_viewer_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('v') | KeyCode::Char('V'))
    } else {
        false
    }
}

// ============================================================================
// Tests
// ============================================================================

// ============================================================================
// Gestion des événements clavier
// ============================================================================
// Traduit un Event en appel sur App selon le contexte :
// 1. Liste déroulante ouverte : ↑↓ pour choisir, Enter valide, Esc ferme
// 2. Focus sur un sélecteur : Enter / Espace ouvre la liste
// 3. Focus sur le tableau : ↑↓ lignes, ←→ pages, [ ] taille de page
// Touches globales : q (quit en deux temps), Tab / Shift+Tab, v
// ============================================================================

use tracing::{debug, info};

use crate::app::{App, Focus};
use crate::ui::events::{
    is_down_event, is_enter_event, is_escape_event, is_first_page_event, is_focus_next_event,
    is_focus_previous_event, is_larger_page_size_event, is_last_page_event, is_next_page_event,
    is_previous_page_event, is_quit_event, is_smaller_page_size_event, is_space_event,
    is_toggle_viewer_event, is_up_event, Event,
};

/// Traite un événement et met à jour l'état de l'application
///
/// CONCEPT RUST : Pattern matching avec guards
/// - L'ordre des bras compte : la liste déroulante ouverte capture les
///   touches avant le reste
pub fn handle_event(app: &mut App, event: Event) {
    match event {
        Event::Key(_) if is_quit_event(&event) => {
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        // ========================================
        // Liste déroulante ouverte
        // ========================================
        Event::Key(_) if app.is_dropdown_open() => {
            app.cancel_quit();
            if is_up_event(&event) {
                app.dropdown_up();
            } else if is_down_event(&event) {
                app.dropdown_down();
            } else if is_enter_event(&event) || is_space_event(&event) {
                app.commit_dropdown();
            } else if is_escape_event(&event) {
                debug!("Dropdown closed without change");
                app.close_dropdown();
            }
        }

        // ========================================
        // Touches globales
        // ========================================
        // Shift+Tab avant Tab : certains terminaux envoient Tab + SHIFT
        Event::Key(_) if is_focus_previous_event(&event) => {
            app.cancel_quit();
            app.focus_previous();
            debug!(focus = ?app.focus, "Focus moved");
        }
        Event::Key(_) if is_focus_next_event(&event) => {
            app.cancel_quit();
            app.focus_next();
            debug!(focus = ?app.focus, "Focus moved");
        }
        Event::Key(_) if is_toggle_viewer_event(&event) => {
            app.cancel_quit();
            app.toggle_code_viewer();
        }

        // ========================================
        // Sélecteurs
        // ========================================
        Event::Key(_)
            if (is_enter_event(&event) || is_space_event(&event))
                && app.focus != Focus::Table =>
        {
            app.cancel_quit();
            app.open_dropdown();
        }

        // ========================================
        // Tableau et pagination
        // ========================================
        Event::Key(_) if app.focus == Focus::Table => {
            app.cancel_quit();
            if is_up_event(&event) {
                app.navigate_up();
            } else if is_down_event(&event) {
                app.navigate_down();
            } else if is_next_page_event(&event) {
                app.next_page();
            } else if is_previous_page_event(&event) {
                app.previous_page();
            } else if is_first_page_event(&event) {
                app.first_page();
            } else if is_last_page_event(&event) {
                app.last_page();
            } else if is_larger_page_size_event(&event) {
                app.larger_page_size();
            } else if is_smaller_page_size_event(&event) {
                app.smaller_page_size();
            }
        }

        Event::Key(_) => {
            // Toute autre touche : annule la confirmation de quit
            app.cancel_quit();
        }

        Event::Resize(width, height) => {
            debug!(width, height, "Terminal resized");
        }

        Event::Tick => {}
    }
}

// ============================================================================
// Tests : scénarios de bout en bout (clavier -> commande de fetch)
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    use crossterm::event::KeyCode;

    use crate::controller::{FetchCommand, MarketController};
    use crate::models::{Currency, QueryParameters, SortOrder};

    fn app() -> (App, mpsc::Receiver<FetchCommand>) {
        let (tx, rx) = mpsc::channel();
        let mut app = App::new(MarketController::new(tx));
        app.start();
        (app, rx)
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_event(app, Event::key(code));
    }

    #[test]
    fn test_two_step_quit() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.is_running());
        assert!(app.is_awaiting_quit_confirmation());

        press(&mut app, KeyCode::Down);
        assert!(!app.is_awaiting_quit_confirmation());

        press(&mut app, KeyCode::Char('q'));
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.is_running());
    }

    #[test]
    fn test_switch_currency_via_dropdown() {
        let (mut app, rx) = app();
        rx.try_iter().count();

        // Table -> Currency
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Currency);

        press(&mut app, KeyCode::Enter);
        assert!(app.is_dropdown_open());
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        let commands: Vec<_> = rx.try_iter().collect();
        assert_eq!(commands.len(), 1);
        assert_eq!(
            commands[0].params,
            QueryParameters {
                currency: Currency::Eur,
                ..QueryParameters::default()
            }
        );
    }

    #[test]
    fn test_escape_closes_dropdown_without_fetch() {
        let (mut app, rx) = app();
        rx.try_iter().count();

        press(&mut app, KeyCode::BackTab); // Table -> Order
        assert_eq!(app.focus, Focus::Order);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Esc);

        assert!(!app.is_dropdown_open());
        assert_eq!(app.controller.params().order, SortOrder::MarketCapDesc);
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn test_page_keys_on_table() {
        let (mut app, rx) = app();
        rx.try_iter().count();

        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Left);

        let pages: Vec<u32> = rx.try_iter().map(|c| c.params.page).collect();
        assert_eq!(pages, vec![2, 3, 2]);
    }

    #[test]
    fn test_page_keys_ignored_on_selectors() {
        let (mut app, rx) = app();
        rx.try_iter().count();

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn test_viewer_toggle_key() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::Char('v'));
        assert!(app.code_viewer.is_none());
        press(&mut app, KeyCode::Char('v'));
        assert!(app.code_viewer.is_some());
    }
}

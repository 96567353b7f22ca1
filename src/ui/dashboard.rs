// ============================================================================
// Dashboard - Rendu de la page
// ============================================================================
// ┌ Coins & Markets ─────────────────────────────────────────────┐
// │ [Currency ▾] [Order ▾]                                       │
// │ ┌ Markets ──────────────────────┐ ┌ Source ────────────────┐ │
// │ │ tableau                       │ │ visualiseur de code    │ │
// │ └───────────────────────────────┘ └────────────────────────┘ │
// │ détail de la ligne                                           │
// │ pagination                                                   │
// │ statut + raccourcis                                          │
// └──────────────────────────────────────────────────────────────┘
//
// CONCEPTS RATATUI :
// 1. Layout : split() découpe un Rect en zones
// 2. Widgets : Block, Paragraph, Table, List
// 3. Les popups (liste déroulante) sont dessinés en dernier
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::{filters, market_table};

/// Dessine la page complète
///
/// # Arguments
/// * `frame` - Surface de dessin ratatui
/// * `app` - État de l'application (lecture seule)
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, chunks[0]);
    filters::render_filters(frame, app, chunks[1]);
    render_body(frame, app, chunks[2]);
    market_table::render_selection_detail(frame, app, chunks[3]);
    market_table::render_pagination(frame, app, chunks[4]);
    render_footer(frame, app, chunks[5]);

    // Popup au-dessus de tout le reste
    filters::render_dropdown(frame, app, chunks[1]);
}

/// Crée le layout vertical de la page
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Sélecteurs
            Constraint::Min(0),    // Tableau + visualiseur
            Constraint::Length(3), // Détail de ligne
            Constraint::Length(3), // Pagination
            Constraint::Length(4), // Statut + raccourcis
        ])
        .split(area)
        .to_vec()
}

/// Dessine le header avec le titre
fn render_header(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let title = Line::from(Span::styled(
        "Coins & Markets",
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    ));

    let paragraph = Paragraph::new(title)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Tableau à gauche, visualiseur de code à droite s'il est monté
fn render_body(frame: &mut Frame, app: &App, area: Rect) {
    match &app.code_viewer {
        Some(viewer) => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(area);
            market_table::render_table(frame, app, columns[0]);
            viewer.render(frame, columns[1]);
        }
        None => market_table::render_table(frame, app, area),
    }
}

// ============================================================================
// Footer : statut + raccourcis
// ============================================================================

/// Dessine le statut du dernier fetch et les raccourcis clavier
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let lines = vec![status_line(app), shortcuts_line(app)];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Ligne de statut : chargement, dernier échec ou heure de mise à jour
fn status_line(app: &App) -> Line<'static> {
    let controller = &app.controller;

    if controller.is_loading() {
        return Line::from(Span::styled(
            "⏳ Chargement…",
            Style::default().fg(Color::Yellow),
        ));
    }

    if let Some(failure) = controller.last_failure() {
        return Line::from(Span::styled(
            format!("⚠ Échec du dernier chargement : {}", failure),
            Style::default().fg(Color::Red),
        ));
    }

    match controller.last_updated() {
        Some(at) => Line::from(Span::styled(
            format!("✓ Mis à jour à {}", at.format("%H:%M:%S")),
            Style::default().fg(Color::Green),
        )),
        None => Line::from(""),
    }
}

/// Raccourcis selon le contexte
fn shortcuts_line(app: &App) -> Line<'static> {
    let key = |label: &'static str| {
        Span::styled(
            label,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    };

    if app.is_awaiting_quit_confirmation() {
        return Line::from(vec![
            Span::styled(
                "⚠  Appuyez sur ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]);
    }

    if app.is_dropdown_open() {
        return Line::from(vec![
            key("[↑↓]"),
            Span::raw(" Choose  "),
            key("[Enter]"),
            Span::raw(" Apply  "),
            key("[Esc]"),
            Span::raw(" Cancel"),
        ]);
    }

    let mut spans = vec![key("[q]"), Span::raw(" Quit  "), key("[Tab]"), Span::raw(" Focus  ")];
    match app.focus {
        Focus::Currency | Focus::Order => {
            spans.push(key("[Enter]"));
            spans.push(Span::raw(" Open  "));
        }
        Focus::Table => {
            spans.push(key("[↑↓]"));
            spans.push(Span::raw(" Rows  "));
            spans.push(key("[←→]"));
            spans.push(Span::raw(" Page  "));
            spans.push(key("[ [ ] ]"));
            spans.push(Span::raw(" Page size  "));
        }
    }
    spans.push(key("[v]"));
    spans.push(Span::raw(" Source"));

    Line::from(spans)
}

// ============================================================================
// Tests : rendu sur un backend de test
// ============================================================================

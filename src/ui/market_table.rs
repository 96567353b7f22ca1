// ============================================================================
// Market Table - Tableau paginé des données de marché
// ============================================================================
// Une ligne par MarketEntry, dans l'ordre de l'API :
//   | ◉ Nom | Prix + devise | Offre en circulation |
// Sous le tableau : détail de la ligne surlignée, puis la pagination.
//
// CONCEPT RATATUI : Table + TableState
// - Table : widget lignes/colonnes avec en-tête
// - TableState : ligne sélectionnée, construite à chaque frame depuis App
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, Focus};
use crate::models::{PAGE_SIZE_OPTIONS, PAGINATION_TOTAL};

/// Dessine le tableau
pub fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let controller = &app.controller;
    let currency = controller.params().currency;

    // Le titre sert d'indicateur de chargement
    let title = if controller.is_loading() {
        " ⏳ Markets (loading…) "
    } else {
        " 📊 Markets "
    };
    let border = if app.focus == Focus::Table {
        Color::Yellow
    } else {
        Color::Cyan
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title);

    if controller.results().is_empty() {
        let message = if controller.is_loading() {
            "Chargement des données…"
        } else {
            "Aucune donnée"
        };
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(message, Style::default().fg(Color::Gray))),
        ])
        .block(block)
        .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec!["Name", "Current Price", "Circulating Supply"]).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    // Les lignes suivent exactement l'ordre des résultats
    let rows: Vec<Row> = controller
        .results()
        .iter()
        .map(|entry| {
            Row::new(vec![
                Cell::from(Line::from(vec![
                    Span::styled("◉ ", Style::default().fg(Color::Yellow)),
                    Span::raw(entry.name.clone()),
                ])),
                Cell::from(entry.price_display(currency)),
                Cell::from(entry.supply_display()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(40),
        Constraint::Percentage(30),
        Constraint::Percentage(30),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default();
    state.select(Some(app.selected_row));

    frame.render_stateful_widget(table, area, &mut state);
}

/// Dessine le détail de la ligne surlignée (id + URL de l'image)
///
/// Le terminal ne peut pas afficher le logo : on montre son URL.
pub fn render_selection_detail(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let line = match app.controller.results().get(app.selected_row) {
        Some(entry) => Line::from(vec![
            Span::styled(entry.id.clone(), Style::default().fg(Color::Yellow)),
            Span::raw("  image: "),
            Span::styled(entry.image_url.clone(), Style::default().fg(Color::Blue)),
        ]),
        None => Line::from(Span::styled("-", Style::default().fg(Color::DarkGray))),
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Dessine la pagination
///
/// Total fixe de PAGINATION_TOTAL : l'API ne donne pas le vrai nombre.
pub fn render_pagination(frame: &mut Frame, app: &App, area: Rect) {
    let params = app.controller.params();

    let mut spans = vec![
        Span::styled("‹ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Page {} / {}", params.page, params.page_count()),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ›", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("   {} items   Page size: ", PAGINATION_TOTAL)),
    ];

    // Menu des tailles : la taille active est mise en valeur
    for size in PAGE_SIZE_OPTIONS {
        let style = if size == params.page_size {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", size), style));
        spans.push(Span::raw(" "));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(Line::from(spans))
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Filters - Sélecteurs de devise et d'ordre de tri
// ============================================================================
// Chaque sélecteur affiche le libellé de la valeur courante. Quand il est
// ouvert, une liste déroulante est dessinée par-dessus le contenu, juste
// sous le sélecteur.
//
// CONCEPT RATATUI : Clear
// - Efface une zone avant d'y dessiner un popup
// - Sans Clear, le tableau en dessous "transparaîtrait"
// ============================================================================

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, FilterKind, Focus};

/// Largeur minimale d'un sélecteur (assez pour "Market cap descending ▾")
const SELECT_MIN_WIDTH: u16 = 30;

/// Découpe la rangée des filtres en deux zones (devise, ordre)
pub fn filter_areas(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(SELECT_MIN_WIDTH),
            Constraint::Length(SELECT_MIN_WIDTH),
            Constraint::Min(0),
        ])
        .split(area);
    (chunks[0], chunks[1])
}

/// Dessine les deux sélecteurs
pub fn render_filters(frame: &mut Frame, app: &App, area: Rect) {
    let (currency_area, order_area) = filter_areas(area);
    let params = app.controller.params();

    render_select(
        frame,
        currency_area,
        " Currency ",
        params.currency.label(),
        app.focus == Focus::Currency,
    );
    render_select(
        frame,
        order_area,
        " Order ",
        params.order.label(),
        app.focus == Focus::Order,
    );
}

/// Dessine un sélecteur fermé
fn render_select(frame: &mut Frame, area: Rect, title: &str, label: &str, focused: bool) {
    let border = if focused { Color::Yellow } else { Color::Cyan };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title.to_string());

    let line = Line::from(vec![
        Span::styled(
            label.to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ▾", Style::default().fg(border)),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Dessine la liste déroulante ouverte (si besoin)
///
/// À appeler EN DERNIER pour qu'elle passe au-dessus du reste.
pub fn render_dropdown(frame: &mut Frame, app: &App, filters_area: Rect) {
    let Some(dropdown) = app.dropdown else {
        return;
    };

    let (currency_area, order_area) = filter_areas(filters_area);
    let anchor = match dropdown.kind {
        FilterKind::Currency => currency_area,
        FilterKind::Order => order_area,
    };

    let options = dropdown.kind.options();
    let screen = frame.size();
    let popup = Rect {
        x: anchor.x,
        y: anchor.y.saturating_add(anchor.height).min(screen.height.saturating_sub(1)),
        width: anchor.width,
        height: (options.len() as u16 + 2)
            .min(screen.height.saturating_sub(anchor.y + anchor.height)),
    };

    let items: Vec<ListItem> = options
        .iter()
        .map(|option| ListItem::new(format!(" {}", option.label)))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    state.select(Some(dropdown.highlighted));

    frame.render_widget(Clear, popup);
    frame.render_stateful_widget(list, popup, &mut state);
}

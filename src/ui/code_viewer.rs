// ============================================================================
// Code Viewer - Visualiseur de code en lecture seule
// ============================================================================
// Affiche un extrait de code constant avec coloration syntaxique et numéros
// de ligne. Aucun lien avec le contrôleur : c'est un panneau décoratif.
//
// CONCEPT RUST : RAII
// - mount() construit le buffer coloré (la "ressource" du visualiseur)
// - Drop libère le buffer quand le panneau quitte l'affichage
// - App stocke un Option<CodeViewer> : None = démonté
// ============================================================================

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::{debug, info};

/// Extrait affiché par défaut : le cycle filtre -> fetch -> tableau
pub const VIEWER_SOURCE: &str = r#"// Cycle filtre -> fetch -> tableau
pub fn set_currency(&mut self, currency: Currency) {
    let next = QueryParameters { currency, ..self.params };
    self.commit(next);
}

fn commit(&mut self, next: QueryParameters) {
    if next == self.params {
        return;
    }
    self.params = next;
    self.latest_seq += 1;
    self.loading = true;
    let _ = self.command_tx.send(FetchCommand {
        seq: self.latest_seq,
        params: self.params,
    });
}

pub fn apply_outcome(&mut self, outcome: FetchOutcome) {
    if outcome.seq() != self.latest_seq {
        return; // réponse périmée
    }
    match outcome {
        FetchOutcome::Loaded { entries, .. } => self.results = entries,
        FetchOutcome::Failed { error, .. } => error!(%error, "fetch failed"),
    }
    self.loading = false;
}

// GET /coins/markets?vs_currency=usd&order=market_cap_desc
//     &per_page=10&page=1&sparkline=false
"#;

/// Mots-clés Rust colorés en jaune
const KEYWORDS: &[&str] = &[
    "as", "async", "await", "const", "else", "enum", "fn", "for", "if", "impl", "in", "let",
    "loop", "match", "mod", "mut", "pub", "return", "self", "Self", "struct", "trait", "use",
    "where", "while",
];

/// Visualiseur monté : possède les lignes déjà colorées
#[derive(Debug)]
pub struct CodeViewer {
    title: &'static str,
    lines: Vec<Line<'static>>,
}

impl CodeViewer {
    /// Monte le visualiseur sur un texte source
    ///
    /// La coloration est calculée une seule fois ici, pas à chaque frame.
    pub fn mount(source: &'static str) -> Self {
        let raw_lines: Vec<&str> = source.lines().collect();
        let gutter_width = raw_lines.len().to_string().len();

        let lines = raw_lines
            .iter()
            .enumerate()
            .map(|(index, text)| {
                let mut spans = vec![
                    Span::styled(
                        format!("{:>width$}", index + 1, width = gutter_width),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
                ];
                spans.extend(highlight_line(text));
                Line::from(spans)
            })
            .collect::<Vec<_>>();

        info!(lines = lines.len(), "Code viewer mounted");
        Self {
            title: " 📄 Source ",
            lines,
        }
    }

    /// Lignes rendues (gouttière + code coloré)
    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Dessine le panneau
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(self.title);

        let paragraph = Paragraph::new(self.lines.clone()).block(block);
        frame.render_widget(paragraph, area);
    }
}

impl Drop for CodeViewer {
    fn drop(&mut self) {
        debug!(lines = self.lines.len(), "Code viewer released");
    }
}

// ============================================================================
// Coloration syntaxique
// ============================================================================
// Tokenizer minimal ligne par ligne :
// - "//" jusqu'à la fin de ligne : commentaire
// - "..." : chaîne (gère \" )
// - chiffres : nombre
// - identifiants : mot-clé, type (Majuscule) ou identifiant simple
// - le reste : ponctuation, sans style
// ============================================================================

/// Découpe une ligne en Spans colorés
pub fn highlight_line(line: &str) -> Vec<Span<'static>> {
    let chars: Vec<char> = line.chars().collect();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Commentaire : tout le reste de la ligne
        if c == '/' && chars.get(i + 1) == Some(&'/') {
            let text: String = chars[i..].iter().collect();
            spans.push(Span::styled(
                text,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ));
            break;
        }

        let start = i;
        let style = if c == '"' {
            i += 1;
            while i < chars.len() && chars[i] != '"' {
                if chars[i] == '\\' {
                    i += 1;
                }
                i += 1;
            }
            i = (i + 1).min(chars.len());
            Style::default().fg(Color::Green)
        } else if c.is_ascii_digit() {
            while i < chars.len()
                && (chars[i].is_ascii_alphanumeric() || chars[i] == '_' || chars[i] == '.')
            {
                i += 1;
            }
            Style::default().fg(Color::Magenta)
        } else if c.is_alphabetic() || c == '_' {
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            if KEYWORDS.contains(&word.as_str()) {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if word.starts_with(|ch: char| ch.is_uppercase()) {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            }
        } else {
            // Ponctuation et espaces : regroupés jusqu'au prochain token
            i += 1;
            while i < chars.len()
                && !(chars[i].is_alphanumeric()
                    || chars[i] == '_'
                    || chars[i] == '"'
                    || (chars[i] == '/' && chars.get(i + 1) == Some(&'/')))
            {
                i += 1;
            }
            Style::default()
        };

        let text: String = chars[start..i].iter().collect();
        spans.push(Span::styled(text, style));
    }

    spans
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(spans: &[Span<'_>]) -> Vec<String> {
        spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn test_highlight_keywords_and_types() {
        let spans = highlight_line("pub fn load(params: QueryParameters)");
        assert_eq!(spans[0].content, "pub");
        assert_eq!(spans[0].style.fg, Some(Color::Yellow));

        let ty = spans.iter().find(|s| s.content == "QueryParameters").unwrap();
        assert_eq!(ty.style.fg, Some(Color::Cyan));

        // Rien n'est perdu : la concaténation redonne la ligne
        assert_eq!(texts(&spans).concat(), "pub fn load(params: QueryParameters)");
    }

    #[test]
    fn test_highlight_string_and_comment() {
        let spans = highlight_line(r#"error!("a \"quoted\" b"); // note"#);
        let string = spans.iter().find(|s| s.content.starts_with('"')).unwrap();
        assert_eq!(string.content, r#""a \"quoted\" b""#);
        assert_eq!(string.style.fg, Some(Color::Green));

        let last = spans.last().unwrap();
        assert_eq!(last.content, "// note");
        assert_eq!(last.style.fg, Some(Color::DarkGray));
    }

    #[test]
    fn test_highlight_unterminated_string() {
        let spans = highlight_line(r#"let s = "open"#);
        assert_eq!(texts(&spans).concat(), r#"let s = "open"#);
    }

    #[test]
    fn test_mount_numbers_every_line() {
        let viewer = CodeViewer::mount(VIEWER_SOURCE);
        assert_eq!(viewer.line_count(), VIEWER_SOURCE.lines().count());

        let first = &viewer.lines()[0];
        let gutter = first.spans[0].content.trim();
        assert_eq!(gutter, "1");
    }
}

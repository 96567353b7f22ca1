// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod code_viewer;  // Visualiseur de code en lecture seule
pub mod dashboard;    // Layout de la page, header, footer
pub mod events;       // Lecture du clavier
pub mod filters;      // Sélecteurs devise / ordre + liste déroulante
pub mod market_table; // Tableau, détail de ligne, pagination

// Re-exports pour simplifier les imports
pub use dashboard::render;
pub use events::{Event, EventHandler};

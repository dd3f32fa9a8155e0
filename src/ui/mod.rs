//! UI-Layer mit egui: Kartenfläche, Kopfzeile, Detailkarte und Status-Bar.

pub mod header;
/// Karten-Engine auf einer egui-Zeichenfläche
///
/// Implementiert `MapEngine` und `EngineFactory` für die Desktop-Oberfläche.
pub mod map_canvas;
pub mod profile_card;
pub mod status;

pub use header::render_header;
pub use map_canvas::{
    show_map_canvas, CanvasEngine, CanvasEngineFactory, CanvasResponse, CanvasSurface,
};
pub use profile_card::{show_profile_card, ProfileCardState};
pub use status::render_status_bar;

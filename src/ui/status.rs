//! Status-Bar am unteren Bildschirmrand.

use crate::app::AppState;
use crate::map::SessionPhase;

/// Rendert die Status-Bar
pub fn render_status_bar(ctx: &egui::Context, state: &AppState) {
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let phase = match state.map.phase() {
                SessionPhase::Idle => "Idle",
                SessionPhase::Pending => "Lädt",
                SessionPhase::Live => "Live",
            };
            match state.map.handle() {
                Some(handle) => ui.label(format!("Session #{}: {}", handle.id(), phase)),
                None => ui.label(format!("Session: {}", phase)),
            };

            ui.separator();

            ui.label(format!(
                "Marker: {} / Entitäten: {}",
                state.marker_count(),
                state.entities.len()
            ));

            ui.separator();

            ui.label(format!(
                "Viewport: {:.0}×{:.0}",
                state.view.viewport_size[0], state.view.viewport_size[1]
            ));

            ui.separator();

            match state.selection.current() {
                Some(entity) => ui.label(format!("Auswahl: {}", entity.name)),
                None => ui.label("Auswahl: -"),
            };

            if let Some(ref msg) = state.view.last_error {
                ui.separator();
                ui.label(egui::RichText::new(format!("⚠ {}", msg)).color(egui::Color32::YELLOW));
            }
        });
    });
}

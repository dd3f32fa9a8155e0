//! Detailkarte der gewählten Entität mit rotierender Galerie.

use crate::core::Entity;
use std::time::Duration;

/// Sekunden bis zum nächsten Galeriebild.
const GALLERY_INTERVAL_SECS: f64 = 3.0;
/// Kartenbreite in Pixeln.
const CARD_WIDTH: f32 = 360.0;
/// Galeriehöhe in Pixeln.
const GALLERY_HEIGHT: f32 = 180.0;

const EMERALD: egui::Color32 = egui::Color32::from_rgb(16, 185, 129);
const ROSE: egui::Color32 = egui::Color32::from_rgb(244, 63, 94);
const WHATSAPP_GREEN: egui::Color32 = egui::Color32::from_rgb(22, 163, 74);

/// Platzhalter-Galerie: Farbverläufe von oben nach unten.
const GALLERY: [(egui::Color32, egui::Color32); 3] = [
    (
        egui::Color32::from_rgb(244, 114, 182),
        egui::Color32::from_rgb(139, 92, 246),
    ),
    (
        egui::Color32::from_rgb(56, 189, 248),
        egui::Color32::from_rgb(16, 185, 129),
    ),
    (
        egui::Color32::from_rgb(251, 191, 36),
        egui::Color32::from_rgb(239, 68, 68),
    ),
];

/// Zustand der Galerie-Rotation.
#[derive(Debug, Default)]
pub struct ProfileCardState {
    shown_for: Option<String>,
    active_image: usize,
    last_switch: f64,
}

impl ProfileCardState {
    /// Erstellt einen leeren Zustand.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index des aktuell gezeigten Galeriebilds
    pub fn active_image(&self) -> usize {
        self.active_image
    }

    /// Schaltet die Galerie weiter, sobald das Intervall abgelaufen ist.
    ///
    /// Ein Wechsel der Entität setzt die Galerie auf das erste Bild zurück.
    /// Gibt die Restzeit bis zum nächsten Wechsel zurück.
    pub fn advance(&mut self, entity_id: &str, now: f64) -> f64 {
        if self.shown_for.as_deref() != Some(entity_id) {
            self.shown_for = Some(entity_id.to_string());
            self.active_image = 0;
            self.last_switch = now;
        }

        let elapsed = now - self.last_switch;
        if elapsed >= GALLERY_INTERVAL_SECS {
            let steps = (elapsed / GALLERY_INTERVAL_SECS).floor();
            self.active_image = (self.active_image + steps as usize) % GALLERY.len();
            self.last_switch += steps * GALLERY_INTERVAL_SECS;
        }

        GALLERY_INTERVAL_SECS - (now - self.last_switch)
    }

    /// Vergisst die zuletzt gezeigte Entität.
    pub fn reset(&mut self) {
        self.shown_for = None;
        self.active_image = 0;
    }
}

fn paint_gradient(
    painter: &egui::Painter,
    rect: egui::Rect,
    top: egui::Color32,
    bottom: egui::Color32,
) {
    let mut mesh = egui::Mesh::default();
    mesh.colored_vertex(rect.left_top(), top);
    mesh.colored_vertex(rect.right_top(), top);
    mesh.colored_vertex(rect.right_bottom(), bottom);
    mesh.colored_vertex(rect.left_bottom(), bottom);
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    painter.add(egui::Shape::mesh(mesh));
}

fn render_gallery(ui: &mut egui::Ui, active_image: usize) {
    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(CARD_WIDTH, GALLERY_HEIGHT),
        egui::Sense::hover(),
    );
    let painter = ui.painter_at(rect);
    let (top, bottom) = GALLERY[active_image % GALLERY.len()];
    paint_gradient(&painter, rect, top, bottom);

    // Indikatorpunkte
    let spacing = 14.0;
    let first_x = rect.center().x - spacing * (GALLERY.len() as f32 - 1.0) / 2.0;
    for index in 0..GALLERY.len() {
        let center = egui::pos2(first_x + spacing * index as f32, rect.bottom() - 14.0);
        let (radius, alpha) = if index == active_image {
            (4.0, 255)
        } else {
            (3.0, 140)
        };
        painter.circle_filled(
            center,
            radius,
            egui::Color32::from_white_alpha(alpha),
        );
    }
}

/// Zeigt die Detailkarte zur gewählten Entität am unteren Rand.
pub fn show_profile_card(ctx: &egui::Context, card: &mut ProfileCardState, entity: &Entity) {
    let now = ctx.input(|i| i.time);
    let remaining = card.advance(&entity.id, now);
    ctx.request_repaint_after(Duration::from_secs_f64(remaining.max(0.0)));

    egui::Area::new(egui::Id::new("profile_card"))
        .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -32.0])
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(egui::Color32::WHITE)
                .corner_radius(egui::CornerRadius::same(24))
                .inner_margin(egui::Margin::same(0))
                .show(ui, |ui| {
                    ui.set_width(CARD_WIDTH);
                    render_gallery(ui, card.active_image());

                    egui::Frame::new()
                        .inner_margin(egui::Margin::same(20))
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                ui.vertical(|ui| {
                                    ui.label(
                                        egui::RichText::new(&entity.name)
                                            .size(20.0)
                                            .strong()
                                            .color(egui::Color32::from_rgb(17, 24, 39)),
                                    );
                                    let (text, color) = if entity.active {
                                        ("Disponible", EMERALD)
                                    } else {
                                        ("No disponible", ROSE)
                                    };
                                    ui.label(egui::RichText::new(text).color(color).strong());
                                });

                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| {
                                        let button = egui::Button::new(
                                            egui::RichText::new("WhatsApp")
                                                .color(egui::Color32::WHITE)
                                                .strong(),
                                        )
                                        .fill(WHATSAPP_GREEN)
                                        .corner_radius(egui::CornerRadius::same(255));
                                        if ui.add(button).clicked() {
                                            log::info!("Kontakt zu '{}' angefragt", entity.name);
                                        }
                                    },
                                );
                            });

                            ui.add_space(8.0);
                            ui.label(
                                egui::RichText::new(&entity.description)
                                    .color(egui::Color32::from_rgb(75, 85, 99)),
                            );
                        });
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gallery_rotates_every_interval() {
        let mut card = ProfileCardState::new();

        card.advance("m1", 10.0);
        assert_eq!(card.active_image(), 0);

        card.advance("m1", 12.9);
        assert_eq!(card.active_image(), 0);

        card.advance("m1", 13.0);
        assert_eq!(card.active_image(), 1);

        card.advance("m1", 19.5);
        assert_eq!(card.active_image(), 0);
    }

    #[test]
    fn switching_entity_restarts_gallery() {
        let mut card = ProfileCardState::new();
        card.advance("m1", 0.0);
        card.advance("m1", 3.5);
        assert_eq!(card.active_image(), 1);

        let remaining = card.advance("m2", 4.0);

        assert_eq!(card.active_image(), 0);
        approx::assert_relative_eq!(remaining, GALLERY_INTERVAL_SECS);
    }
}

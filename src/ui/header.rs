//! Kopfzeile über der Karte: Logo, Navigation und Live-Badge.

const BRAND_COLOR: egui::Color32 = egui::Color32::from_rgb(22, 163, 74);

/// Navigationseinträge der Kopfzeile.
pub const NAV_LINKS: [&str; 3] = ["Home", "Explorar", "Info"];
/// Text des Live-Badges.
pub const LIVE_BADGE: &str = "Concepción · En vivo";

fn header_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(egui::Color32::from_white_alpha(230))
        .corner_radius(egui::CornerRadius::same(255))
        .inner_margin(egui::Margin::symmetric(14, 8))
}

/// Rendert die schwebende Kopfzeile.
pub fn render_header(ctx: &egui::Context) {
    egui::Area::new(egui::Id::new("header_brand"))
        .anchor(egui::Align2::LEFT_TOP, [16.0, 16.0])
        .show(ctx, |ui| {
            header_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    let (rect, _) =
                        ui.allocate_exact_size(egui::vec2(28.0, 28.0), egui::Sense::hover());
                    ui.painter().circle_filled(rect.center(), 14.0, BRAND_COLOR);
                    ui.painter().text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        "P",
                        egui::FontId::proportional(16.0),
                        egui::Color32::WHITE,
                    );

                    ui.add_space(8.0);
                    for link in NAV_LINKS {
                        // Navigation ohne Ziel, nur Platzhalter
                        if ui.link(link).clicked() {
                            log::debug!("Navigation '{}' gewählt", link);
                        }
                    }
                });
            });
        });

    egui::Area::new(egui::Id::new("header_badge"))
        .anchor(egui::Align2::RIGHT_TOP, [-16.0, 16.0])
        .show(ctx, |ui| {
            header_frame().show(ui, |ui| {
                ui.label(egui::RichText::new(LIVE_BADGE).color(BRAND_COLOR).strong());
            });
        });
}

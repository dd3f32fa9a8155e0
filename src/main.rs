//! Pinmap.
//!
//! Interaktive Kartenansicht mit Profil-Pins und Detailkarte.
//! egui-Host um den Session-Koordinator der Library.

use eframe::egui;
use pinmap::core::{entity_source_for, Container};
use pinmap::{
    ui, AppController, AppIntent, AppState, EngineCapability, MapViewOptions, SessionHandle,
    SessionPhase,
};
use std::rc::Rc;

/// ID des Karten-Containers.
const CONTAINER_ID: &str = "map-view";

fn main() -> Result<(), eframe::Error> {
    AppRunner::run()
}

struct AppRunner;

impl AppRunner {
    fn run() -> Result<(), eframe::Error> {
        // Logger initialisieren
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();

        log::info!("Pinmap v{} startet...", env!("CARGO_PKG_VERSION"));

        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1280.0, 800.0])
                .with_title("Pinmap"),
            ..Default::default()
        };

        eframe::run_native(
            "Pinmap",
            options,
            Box::new(|_cc| Ok(Box::new(MapViewApp::new()))),
        )
    }
}

/// Haupt-Anwendungsstruktur
struct MapViewApp {
    state: AppState,
    controller: AppController,
    surface: ui::CanvasSurface,
    card: ui::ProfileCardState,
    /// Session, deren Engine-Fähigkeit gerade geladen wird
    loading_for: Option<SessionHandle>,
}

impl MapViewApp {
    fn new() -> Self {
        // Optionen aus TOML laden (oder Standardwerte)
        let config_path = MapViewOptions::config_path();
        let options = MapViewOptions::load_from_file(&config_path);
        if !config_path.exists() {
            // Vorlage zum Anpassen ablegen
            if let Err(e) = options.save_to_file(&config_path) {
                log::warn!("Optionen-Datei nicht schreibbar: {:#}", e);
            }
        }

        let access_token = options.read_access_token();
        if access_token.is_none() {
            log::warn!(
                "Kein Access-Token in {} gesetzt, die Karte wird nicht erstellt",
                options.access_token_env
            );
        }

        let entities = entity_source_for(options.entities_path.as_deref()).entities();
        log::info!("{} Entitäten für die Karte bereit", entities.len());
        let mut state = AppState::with_entities(entities, access_token);
        state.options = options;

        Self {
            state,
            controller: AppController::new(),
            surface: ui::CanvasSurface::new(),
            card: ui::ProfileCardState::new(),
            loading_for: None,
        }
    }
}

impl eframe::App for MapViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.state.should_exit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        let events = self.collect_ui_events(ctx);
        self.process_events(events);
        self.controller.process_pending(&mut self.state);

        self.advance_engine_loading();

        if self.state.map.phase() == SessionPhase::Pending
            || self.state.map.session().is_some_and(|s| {
                let fits = s.fit_schedule();
                fits.on_first_paint || fits.on_next_frame
            })
        {
            ctx.request_repaint();
        }
    }
}

impl MapViewApp {
    fn collect_ui_events(&mut self, ctx: &egui::Context) -> Vec<AppIntent> {
        let mut events = Vec::new();

        if !self.state.view.is_mounted() && self.loading_for.is_none() {
            self.surface.mount();
            events.push(AppIntent::MountRequested {
                container: Container::new(CONTAINER_ID, [0.0, 0.0]),
            });
        }

        ui::render_status_bar(ctx, &self.state);
        ui::render_header(ctx);

        match self.state.selection.current() {
            Some(entity) => ui::show_profile_card(ctx, &mut self.card, entity),
            None => self.card.reset(),
        }

        if self.state.selection.current().is_some()
            && ctx.input(|i| i.key_pressed(egui::Key::Escape))
        {
            events.push(AppIntent::OverlayDismissed);
        }
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Q)) {
            events.push(AppIntent::ExitRequested);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let canvas = ui::show_map_canvas(ui, &self.surface, &self.state.options);

                if let Some(size) = canvas.resized {
                    events.push(AppIntent::ContainerResized { size });
                }

                // Das Overlay deckt die Karte ab: jeder Klick daneben schließt es.
                let clicked = canvas.clicked_background || canvas.clicked_marker.is_some();
                if clicked && self.state.selection.current().is_some() {
                    events.push(AppIntent::OverlayDismissed);
                } else if let Some(marker) = canvas.clicked_marker {
                    self.state.map.click_engine_marker(marker);
                }
            });

        events.push(AppIntent::PaintCycle);
        events
    }

    fn process_events(&mut self, events: Vec<AppIntent>) {
        for event in events {
            if let Err(e) = self.controller.handle_intent(&mut self.state, event) {
                log::error!("Event handling failed: {:#}", e);
            }
        }
    }

    /// Die Engine-Fähigkeit steht einen Frame nach dem Mount bereit.
    fn advance_engine_loading(&mut self) {
        if self.state.map.phase() != SessionPhase::Pending {
            self.loading_for = None;
            return;
        }
        let Some(handle) = self.state.map.handle() else {
            return;
        };
        if self.loading_for != Some(handle) {
            log::debug!("Engine-Fähigkeit für Session #{} angefordert", handle.id());
            self.loading_for = Some(handle);
            return;
        }

        let capability = EngineCapability::new(Rc::new(self.surface.factory()));
        if let Err(e) = self.controller.handle_intent(
            &mut self.state,
            AppIntent::EngineCapabilityLoaded { handle, capability },
        ) {
            log::error!("Event handling failed: {:#}", e);
        }
        self.loading_for = None;
    }
}

impl Drop for MapViewApp {
    fn drop(&mut self) {
        if let Err(e) = self
            .controller
            .handle_intent(&mut self.state, AppIntent::UnmountRequested)
        {
            log::error!("Event handling failed: {:#}", e);
        }
        self.surface.unmount();
    }
}

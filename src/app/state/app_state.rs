use crate::app::events::IntentQueue;
use crate::app::{AppIntent, CommandLog};
use crate::core::{EngineConfig, Entity, SelectCallback};
use crate::map::MapLifecycleCoordinator;
use crate::shared::MapViewOptions;
use std::rc::Rc;

use super::{SelectionController, ViewState};

/// Hauptzustand der Anwendung
pub struct AppState {
    /// Lebenszyklus der Map-Session (Engine, Marker, Sizer)
    pub map: MapLifecycleCoordinator,
    /// Auswahl für die Detailkarte
    pub selection: SelectionController,
    /// View-State
    pub view: ViewState,
    /// Entitätsliste, die beim nächsten Mount gerendert wird
    pub entities: Vec<Entity>,
    /// Laufzeit-Optionen
    pub options: MapViewOptions,
    /// Access-Token für die Engine (aus der Umgebung)
    pub access_token: Option<String>,
    /// Intents aus Engine-Callbacks, werden vom Controller abgearbeitet
    pub intents: IntentQueue,
    /// Verlauf ausgeführter Commands
    pub command_log: CommandLog,
    /// Signalisiert dem Host, die Anwendung kontrolliert zu beenden
    pub should_exit: bool,
}

impl AppState {
    /// Erstellt einen neuen, leeren App-State
    pub fn new() -> Self {
        let intents = IntentQueue::new();
        let sink = intents.clone();
        let on_select: SelectCallback = Rc::new(move |entity: &Entity| {
            sink.push(AppIntent::MarkerSelected {
                entity: entity.clone(),
            });
        });

        Self {
            map: MapLifecycleCoordinator::new(on_select),
            selection: SelectionController::new(),
            view: ViewState::new(),
            entities: Vec::new(),
            options: MapViewOptions::default(),
            access_token: None,
            intents,
            command_log: CommandLog::new(),
            should_exit: false,
        }
    }

    /// App-State mit Entitäten und Token.
    pub fn with_entities(entities: Vec<Entity>, access_token: Option<String>) -> Self {
        let mut state = Self::new();
        state.entities = entities;
        state.access_token = access_token;
        state
    }

    /// Engine-Konfiguration aus Optionen und Token
    pub fn engine_config(&self) -> EngineConfig {
        self.options.engine_config(self.access_token.clone())
    }

    /// Anzahl eingehängter Marker (für UI-Anzeige)
    pub fn marker_count(&self) -> usize {
        self.map.session().map_or(0, |s| s.markers().len())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

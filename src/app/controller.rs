//! Application Controller für zentrale Event-Verarbeitung.

use super::{AppCommand, AppIntent, AppState};

/// Orchestriert UI-Events und Use-Cases auf den AppState.
#[derive(Default)]
pub struct AppController;

impl AppController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Verarbeitet einen Intent über Intent->Command Mapping.
    pub fn handle_intent(&mut self, state: &mut AppState, intent: AppIntent) -> anyhow::Result<()> {
        let commands = self.map_intent_to_commands(state, intent);
        for command in commands {
            self.handle_command(state, command)?;
        }

        Ok(())
    }

    /// Arbeitet alle Intents ab, die Marker-Callbacks in die Warteschlange gelegt haben.
    ///
    /// Fehler einzelner Intents werden geloggt; die restlichen laufen weiter.
    /// Gibt die Anzahl verarbeiteter Intents zurück.
    pub fn process_pending(&mut self, state: &mut AppState) -> usize {
        if state.intents.is_empty() {
            return 0;
        }
        let count = state.intents.len();
        log::debug!("{} wartende Intent(s) aus Engine-Callbacks", count);
        let pending = state.intents.drain();
        for intent in pending {
            if let Err(e) = self.handle_intent(state, intent) {
                log::error!("Event handling failed: {:#}", e);
            }
        }
        count
    }

    fn map_intent_to_commands(&self, state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
        super::intent_mapping::map_intent_to_commands(state, intent)
    }

    /// Führt mutierende Commands auf dem AppState aus.
    /// Dispatcht an Feature-Handler in `handlers/`.
    pub fn handle_command(
        &mut self,
        state: &mut AppState,
        command: AppCommand,
    ) -> anyhow::Result<()> {
        state.command_log.record(&command);
        use super::handlers;

        match command {
            // === Lebenszyklus ===
            AppCommand::StartSession { container } => {
                handlers::lifecycle::start_session(state, container)
            }
            AppCommand::ResolveSession { handle, capability } => {
                handlers::lifecycle::resolve_session(state, handle, &capability)?
            }
            AppCommand::EndSession => handlers::lifecycle::end_session(state),
            AppCommand::RunPaintCycle => handlers::lifecycle::run_paint_cycle(state),
            AppCommand::ReplaceEntities { entities } => {
                handlers::lifecycle::replace_entities(state, entities)?
            }

            // === Viewport ===
            AppCommand::ResizeViewport { size } => handlers::view::set_viewport_size(state, size),

            // === Selektion ===
            AppCommand::SelectEntity { entity } => handlers::selection::select(state, entity),
            AppCommand::DismissSelection => handlers::selection::dismiss(state),

            // === Anwendungssteuerung ===
            AppCommand::RequestExit => handlers::lifecycle::request_exit(state),
        }

        Ok(())
    }
}

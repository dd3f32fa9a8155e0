//! Mapping von UI-Intents auf mutierende App-Commands.

use super::{AppCommand, AppIntent, AppState};

/// Übersetzt einen `AppIntent` in eine Sequenz ausführbarer `AppCommand`s.
pub fn map_intent_to_commands(state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
    match intent {
        AppIntent::MountRequested { container } => vec![AppCommand::StartSession { container }],
        AppIntent::UnmountRequested => {
            vec![AppCommand::EndSession, AppCommand::DismissSelection]
        }
        AppIntent::EngineCapabilityLoaded { handle, capability } => {
            vec![AppCommand::ResolveSession { handle, capability }]
        }
        AppIntent::PaintCycle => vec![AppCommand::RunPaintCycle],
        AppIntent::ContainerResized { size } => vec![AppCommand::ResizeViewport { size }],
        AppIntent::MarkerSelected { entity } => vec![AppCommand::SelectEntity { entity }],
        AppIntent::OverlayDismissed => {
            // Ohne offene Karte gibt es nichts zu schließen
            if state.selection.current().is_none() {
                Vec::new()
            } else {
                vec![AppCommand::DismissSelection]
            }
        }
        AppIntent::EntitiesReplaced { entities } => {
            vec![AppCommand::ReplaceEntities { entities }]
        }
        AppIntent::ExitRequested => vec![
            AppCommand::EndSession,
            AppCommand::DismissSelection,
            AppCommand::RequestExit,
        ],
    }
}

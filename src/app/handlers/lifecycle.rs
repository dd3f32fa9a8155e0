//! Handler für Mount, Auflösung, Paint-Zyklen und Unmount der Kartenansicht.

use crate::app::events::EngineCapability;
use crate::app::use_cases;
use crate::app::AppState;
use crate::core::{Container, Entity};
use crate::map::SessionHandle;

/// Fordert eine Map-Session an.
pub fn start_session(state: &mut AppState, container: Container) {
    use_cases::lifecycle::mount(state, container);
}

/// Löst die ausstehende Session auf und propagiert Konstruktionsfehler.
pub fn resolve_session(
    state: &mut AppState,
    handle: SessionHandle,
    capability: &EngineCapability,
) -> anyhow::Result<()> {
    use_cases::lifecycle::resolve(state, handle, capability)
}

/// Beendet die aktuelle Session.
pub fn end_session(state: &mut AppState) {
    use_cases::lifecycle::unmount(state);
}

/// Führt fällige Fits des Paint-Zyklus aus.
pub fn run_paint_cycle(state: &mut AppState) {
    use_cases::lifecycle::paint_cycle(state);
}

/// Ersetzt die Entitätsliste.
pub fn replace_entities(state: &mut AppState, entities: Vec<Entity>) -> anyhow::Result<()> {
    use_cases::lifecycle::replace_entities(state, entities)
}

/// Fordert das kontrollierte Beenden der Anwendung an.
pub fn request_exit(state: &mut AppState) {
    state.should_exit = true;
}

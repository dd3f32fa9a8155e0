//! Use-Case-Funktionen für Mount, Auflösung und Unmount der Kartenansicht.

use crate::app::events::EngineCapability;
use crate::app::AppState;
use crate::core::{validate_unique_ids, Container, Entity};
use crate::map::{ResolveOutcome, SessionHandle};

/// Fordert eine Map-Session für den Container an.
pub fn mount(state: &mut AppState, container: Container) {
    state.view.viewport_size = container.size;
    state.view.container = Some(container.clone());
    state.view.last_error = None;
    let entities = state.entities.clone();
    state.map.start_session(container, entities);
}

/// Löst die ausstehende Session mit der geladenen Engine-Fähigkeit auf.
///
/// Ein Abbruch ist kein Fehler. Konstruktionsfehler werden im View-State
/// vermerkt und an den Aufrufer weitergereicht.
pub fn resolve(
    state: &mut AppState,
    handle: SessionHandle,
    capability: &EngineCapability,
) -> anyhow::Result<()> {
    let config = state.engine_config();
    match state
        .map
        .resolve_session(handle, capability.factory(), &config)
    {
        Ok(ResolveOutcome::Live) => {
            state.view.last_error = None;
            Ok(())
        }
        Ok(ResolveOutcome::Cancelled) => Ok(()),
        Err(e) => {
            state.view.last_error = Some(e.to_string());
            Err(e.into())
        }
    }
}

/// Beendet die aktuelle Session (idempotent).
pub fn unmount(state: &mut AppState) {
    state.map.end_current();
    state.view.container = None;
}

/// Führt fällige Initial-Fits aus.
pub fn paint_cycle(state: &mut AppState) {
    state.view.paint_cycles += 1;
    let fits = state.map.on_paint_cycle();
    if fits > 0 {
        log::debug!("{} Fit(s) im Paint-Zyklus {}", fits, state.view.paint_cycles);
    }
}

/// Ersetzt die Entitätsliste und baut die Marker der Session neu auf.
pub fn replace_entities(
    state: &mut AppState,
    entities: Vec<Entity>,
) -> anyhow::Result<()> {
    validate_unique_ids(&entities)?;
    let config = state.engine_config();
    match state.map.replace_entities(entities.clone(), &config) {
        Ok(count) => {
            state.entities = entities;
            log::info!("Entitätsliste ersetzt ({} Marker)", count);
            Ok(())
        }
        Err(e) => {
            state.view.last_error = Some(e.to_string());
            Err(e.into())
        }
    }
}

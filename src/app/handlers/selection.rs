//! Handler für die Einzelauswahl.

use crate::app::use_cases;
use crate::app::AppState;
use crate::core::Entity;

/// Selektiert die Entität des angeklickten Markers.
pub fn select(state: &mut AppState, entity: Entity) {
    use_cases::selection::select_entity(state, entity);
}

/// Hebt die aktuelle Selektion auf.
pub fn dismiss(state: &mut AppState) {
    use_cases::selection::dismiss(state);
}

//! Use-Case-Funktionen für die Einzelauswahl (Detailkarte).

use crate::app::AppState;
use crate::core::Entity;

/// Zeigt die Detailkarte für die Entität.
pub fn select_entity(state: &mut AppState, entity: Entity) {
    state.selection.select(entity);
}

/// Schließt die Detailkarte.
pub fn dismiss(state: &mut AppState) {
    state.selection.dismiss();
}

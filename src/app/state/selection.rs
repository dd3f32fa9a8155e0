use crate::core::Entity;

/// Auswahlzustand: keine oder genau eine Entität.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SelectionState {
    /// Nichts ausgewählt, keine Detailkarte
    #[default]
    Idle,
    /// Detailkarte für die Entität sichtbar
    Showing(Entity),
}

/// Einzelslot-Auswahl der Kartenansicht.
///
/// Wird nur durch Marker-Klick (`select`) und explizites Schließen
/// (`dismiss`) verändert. Kein Verlauf, kein Stapel.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    state: SelectionState,
}

impl SelectionController {
    /// Erstellt einen Controller im Zustand `Idle`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selektiert die Entität. Eine bestehende Auswahl wird direkt ersetzt.
    pub fn select(&mut self, entity: Entity) {
        log::debug!("Entität '{}' selektiert", entity.id);
        self.state = SelectionState::Showing(entity);
    }

    /// Hebt die Auswahl auf. Gibt `false` zurück, wenn nichts ausgewählt war.
    pub fn dismiss(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            SelectionState::Idle => false,
            SelectionState::Showing(entity) => {
                log::debug!("Auswahl von '{}' aufgehoben", entity.id);
                true
            }
        }
    }

    /// Aktuell ausgewählte Entität
    pub fn current(&self) -> Option<&Entity> {
        match &self.state {
            SelectionState::Idle => None,
            SelectionState::Showing(entity) => Some(entity),
        }
    }

    /// Aktueller Zustand
    pub fn state(&self) -> &SelectionState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sample_entities;

    #[test]
    fn select_replaces_previous_selection() {
        let entities = sample_entities();
        let mut selection = SelectionController::new();

        selection.select(entities[0].clone());
        selection.select(entities[1].clone());

        assert_eq!(selection.current(), Some(&entities[1]));
        assert_eq!(*selection.state(), SelectionState::Showing(entities[1].clone()));
    }

    #[test]
    fn dismiss_returns_to_idle() {
        let entities = sample_entities();
        let mut selection = SelectionController::new();

        selection.select(entities[0].clone());
        assert!(selection.dismiss());

        assert_eq!(selection.current(), None);
        assert_eq!(*selection.state(), SelectionState::Idle);
    }

    #[test]
    fn dismiss_on_idle_is_noop() {
        let mut selection = SelectionController::new();

        assert!(!selection.dismiss());
        assert!(!selection.dismiss());

        assert!(selection.current().is_none());
    }
}

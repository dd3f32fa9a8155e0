//! Marker-Registry: ein Pin pro Entität, in Listenreihenfolge.

use crate::core::{
    EngineError, EngineMarkerId, Entity, MapEngine, MarkerAnchor, MarkerElement, MarkerHandle,
    MarkerVisual, SelectCallback,
};
use indexmap::IndexMap;

/// Besitzt alle Marker einer Session, indiziert nach Entitäts-ID.
#[derive(Debug, Default)]
pub struct MarkerRegistry {
    handles: IndexMap<String, MarkerHandle>,
}

impl MarkerRegistry {
    /// Erstellt eine leere Registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hängt für jede Entität einen Marker ein.
    ///
    /// Bestehende Marker werden vorher vollständig entfernt (kein Diffing).
    /// Lehnt die Engine einen Marker ab, werden die bereits eingehängten
    /// wieder entfernt und die Registry bleibt leer.
    pub fn attach_all(
        &mut self,
        engine: &mut dyn MapEngine,
        entities: &[Entity],
        anchor: MarkerAnchor,
        on_select: &SelectCallback,
    ) -> Result<usize, EngineError> {
        self.detach_all(engine);

        for entity in entities {
            if self.handles.contains_key(&entity.id) {
                log::warn!("Entität '{}' doppelt in der Liste, übersprungen", entity.id);
                continue;
            }

            let element = MarkerElement {
                title: entity.name.clone(),
                visual: MarkerVisual::for_entity(entity),
                anchor,
            };
            let engine_marker = match engine.add_marker(element.clone(), entity.position()) {
                Ok(id) => id,
                Err(e) => {
                    let rolled_back = self.detach_all(engine);
                    log::warn!(
                        "Marker-Aufbau abgebrochen, {} Marker zurückgenommen: {}",
                        rolled_back,
                        e
                    );
                    return Err(e);
                }
            };

            self.handles.insert(
                entity.id.clone(),
                MarkerHandle::new(entity.clone(), engine_marker, element, on_select.clone()),
            );
        }

        log::debug!("{} Marker eingehängt", self.handles.len());
        Ok(self.handles.len())
    }

    /// Entfernt alle Marker aus der Engine und gibt ihre Klick-Callbacks frei.
    pub fn detach_all(&mut self, engine: &mut dyn MapEngine) -> usize {
        let count = self.handles.len();
        for (_, mut handle) in self.handles.drain(..) {
            handle.release();
            engine.remove_marker(handle.engine_marker());
        }
        count
    }

    /// Anzahl eingehängter Marker
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// `true`, wenn keine Marker eingehängt sind
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Alle Handles in Einhänge-Reihenfolge
    pub fn handles(&self) -> impl Iterator<Item = &MarkerHandle> {
        self.handles.values()
    }

    /// Handle zur Entitäts-ID
    pub fn get(&self, entity_id: &str) -> Option<&MarkerHandle> {
        self.handles.get(entity_id)
    }

    /// Handle zur Engine-Marker-ID
    pub fn find_by_engine_marker(&self, marker: EngineMarkerId) -> Option<&MarkerHandle> {
        self.handles.values().find(|h| h.engine_marker() == marker)
    }

    /// Klick auf den Marker einer Entität.
    pub fn click(&self, entity_id: &str) -> bool {
        self.get(entity_id).is_some_and(MarkerHandle::click)
    }

    /// Klick, wie ihn die Engine meldet (per Engine-Marker-ID).
    pub fn click_engine_marker(&self, marker: EngineMarkerId) -> bool {
        self.find_by_engine_marker(marker)
            .is_some_and(MarkerHandle::click)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        sample_entities, Container, EngineConfig, EngineFactory, HeadlessEngineFactory, LngLat,
    };
    use std::cell::RefCell;
    use std::rc::Rc;

    fn config() -> EngineConfig {
        EngineConfig {
            center: LngLat::new(-73.0498, -36.8201),
            zoom: 12.0,
            style: "test-style".to_string(),
            access_token: Some("token".to_string()),
            access_token_env: "MAPBOX_ACCESS_TOKEN".to_string(),
            marker_anchor: MarkerAnchor::Center,
        }
    }

    fn engine(factory: &HeadlessEngineFactory) -> Box<dyn MapEngine> {
        factory
            .create(&Container::new("map", [800.0, 600.0]), &config())
            .expect("Headless-Engine sollte erstellbar sein")
    }

    fn recording_callback() -> (SelectCallback, Rc<RefCell<Vec<String>>>) {
        let clicked = Rc::new(RefCell::new(Vec::new()));
        let sink = clicked.clone();
        let callback: SelectCallback =
            Rc::new(move |entity: &Entity| sink.borrow_mut().push(entity.id.clone()));
        (callback, clicked)
    }

    #[test]
    fn attach_all_creates_one_marker_per_entity_at_its_position() {
        let factory = HeadlessEngineFactory::new();
        let mut engine = engine(&factory);
        let entities = sample_entities();
        let (callback, _) = recording_callback();
        let mut registry = MarkerRegistry::new();

        let count = registry
            .attach_all(engine.as_mut(), &entities, MarkerAnchor::Center, &callback)
            .expect("Attach sollte gelingen");

        assert_eq!(count, entities.len());
        let log = factory.log();
        let log = log.borrow();
        assert_eq!(log.live_markers.len(), entities.len());
        for (handle, entity) in registry.handles().zip(&entities) {
            assert_eq!(handle.entity_id(), entity.id);
            let (element, position) = &log.live_markers[&handle.engine_marker()];
            approx::assert_relative_eq!(position.lng, entity.lng);
            approx::assert_relative_eq!(position.lat, entity.lat);
            assert_eq!(element.title, entity.name);
        }
    }

    #[test]
    fn detach_all_leaves_no_live_markers_and_unwires_clicks() {
        let factory = HeadlessEngineFactory::new();
        let mut engine = engine(&factory);
        let (callback, clicked) = recording_callback();
        let mut registry = MarkerRegistry::new();
        registry
            .attach_all(
                engine.as_mut(),
                &sample_entities(),
                MarkerAnchor::Center,
                &callback,
            )
            .expect("Attach sollte gelingen");

        assert_eq!(registry.detach_all(engine.as_mut()), 5);

        assert!(registry.is_empty());
        assert!(factory.log().borrow().live_markers.is_empty());
        assert!(!registry.click("m1"));
        assert!(clicked.borrow().is_empty());
        assert_eq!(registry.detach_all(engine.as_mut()), 0);
    }

    #[test]
    fn toggling_active_changes_only_that_marker() {
        let factory = HeadlessEngineFactory::new();
        let mut engine = engine(&factory);
        let (callback, _) = recording_callback();
        let mut entities = sample_entities();
        let mut registry = MarkerRegistry::new();

        registry
            .attach_all(engine.as_mut(), &entities, MarkerAnchor::Center, &callback)
            .expect("Attach sollte gelingen");
        let before: Vec<_> = registry.handles().map(|h| h.visual()).collect();

        entities[2].active = !entities[2].active;
        registry
            .attach_all(engine.as_mut(), &entities, MarkerAnchor::Center, &callback)
            .expect("Rebuild sollte gelingen");
        let after: Vec<_> = registry.handles().map(|h| h.visual()).collect();

        for (index, (b, a)) in before.iter().zip(&after).enumerate() {
            if index == 2 {
                assert_ne!(b, a);
            } else {
                assert_eq!(b, a);
            }
        }
        assert_eq!(factory.log().borrow().live_markers.len(), entities.len());
    }

    #[test]
    fn click_routes_bound_entity_to_callback() {
        let factory = HeadlessEngineFactory::new();
        let mut engine = engine(&factory);
        let (callback, clicked) = recording_callback();
        let mut registry = MarkerRegistry::new();
        registry
            .attach_all(
                engine.as_mut(),
                &sample_entities(),
                MarkerAnchor::Center,
                &callback,
            )
            .expect("Attach sollte gelingen");

        let m4_marker = registry.get("m4").map(|h| h.engine_marker()).expect("m4");
        assert!(registry.click_engine_marker(m4_marker));
        assert!(registry.click("m2"));
        assert!(!registry.click("unknown"));

        assert_eq!(*clicked.borrow(), vec!["m4".to_string(), "m2".to_string()]);
    }

    #[test]
    fn rejected_marker_rolls_back_already_attached_ones() {
        let factory = HeadlessEngineFactory::new().rejecting_markers_after(2);
        let mut engine = engine(&factory);
        let (callback, _) = recording_callback();
        let mut registry = MarkerRegistry::new();

        let result = registry.attach_all(
            engine.as_mut(),
            &sample_entities(),
            MarkerAnchor::Center,
            &callback,
        );

        assert!(matches!(result, Err(EngineError::MarkerRejected { .. })));
        assert!(registry.is_empty());
        assert!(factory.log().borrow().live_markers.is_empty());
    }

    #[test]
    fn attach_all_with_empty_list_is_fine() {
        let factory = HeadlessEngineFactory::new();
        let mut engine = engine(&factory);
        let (callback, _) = recording_callback();
        let mut registry = MarkerRegistry::new();

        let count = registry
            .attach_all(engine.as_mut(), &[], MarkerAnchor::Center, &callback)
            .expect("Leere Liste ist gültig");

        assert_eq!(count, 0);
        assert_eq!(registry.detach_all(engine.as_mut()), 0);
    }
}

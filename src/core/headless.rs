//! Engine ohne Darstellung: protokolliert alle Aufrufe in ein geteiltes Log.
//!
//! Wird für Tests und headless Läufe verwendet. Mehrere Engines derselben
//! Factory schreiben in dasselbe `EngineLog`.

use super::engine::{
    Container, EngineConfig, EngineError, EngineFactory, EngineMarkerId, MapEngine, MarkerElement,
};
use super::LngLat;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Einzelner protokollierter Engine-Aufruf.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Engine erstellt
    Created { container: String, style: String },
    /// Re-Measure
    Resized,
    /// Marker eingehängt
    MarkerAdded(EngineMarkerId),
    /// Marker entfernt
    MarkerRemoved(EngineMarkerId),
    /// Engine freigegeben
    Removed,
}

/// Aufgezeichneter Zustand aller Engines einer Factory.
#[derive(Debug, Default)]
pub struct EngineLog {
    /// Aufrufe in Reihenfolge
    pub events: Vec<EngineEvent>,
    /// Aktuell eingehängte Marker
    pub live_markers: IndexMap<EngineMarkerId, (MarkerElement, LngLat)>,
    /// Anzahl erstellter Engines
    pub created: usize,
    /// Anzahl freigegebener Engines
    pub removed: usize,
    /// Anzahl Re-Measure-Aufrufe
    pub resizes: usize,
    /// Erster Frame gezeichnet (wird von außen gesetzt)
    painted: bool,
    first_paint_reported: bool,
    next_marker_id: u64,
}

impl EngineLog {
    /// Anzahl lebender Engines (erstellt, aber nicht freigegeben).
    pub fn live_engines(&self) -> usize {
        self.created.saturating_sub(self.removed)
    }

    /// Simuliert den ersten fertig gezeichneten Frame.
    pub fn mark_painted(&mut self) {
        self.painted = true;
    }
}

/// Geteiltes Log zwischen Factory, Engines und Test.
pub type SharedEngineLog = Rc<RefCell<EngineLog>>;

/// Factory für `HeadlessEngine`s.
#[derive(Debug, Default)]
pub struct HeadlessEngineFactory {
    log: SharedEngineLog,
    fail_with: Option<EngineError>,
    reject_markers_after: Option<usize>,
}

impl HeadlessEngineFactory {
    /// Erstellt eine Factory mit leerem Log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Zugriff auf das geteilte Log.
    pub fn log(&self) -> SharedEngineLog {
        self.log.clone()
    }

    /// Jede Konstruktion schlägt mit dem Fehler fehl.
    pub fn failing(mut self, error: EngineError) -> Self {
        self.fail_with = Some(error);
        self
    }

    /// Engines akzeptieren nur `count` Marker, danach `MarkerRejected`.
    pub fn rejecting_markers_after(mut self, count: usize) -> Self {
        self.reject_markers_after = Some(count);
        self
    }
}

impl EngineFactory for HeadlessEngineFactory {
    fn name(&self) -> &str {
        "headless"
    }

    fn create(
        &self,
        container: &Container,
        config: &EngineConfig,
    ) -> Result<Box<dyn MapEngine>, EngineError> {
        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }

        let mut log = self.log.borrow_mut();
        log.created += 1;
        log.events.push(EngineEvent::Created {
            container: container.id.0.clone(),
            style: config.style.clone(),
        });

        Ok(Box::new(HeadlessEngine {
            log: self.log.clone(),
            accepted_markers: 0,
            reject_markers_after: self.reject_markers_after,
            own_markers: Vec::new(),
            removed: false,
        }))
    }
}

/// Engine ohne Darstellung.
pub struct HeadlessEngine {
    log: SharedEngineLog,
    accepted_markers: usize,
    reject_markers_after: Option<usize>,
    own_markers: Vec<EngineMarkerId>,
    removed: bool,
}

impl MapEngine for HeadlessEngine {
    fn take_first_paint(&mut self) -> bool {
        let mut log = self.log.borrow_mut();
        if self.removed || !log.painted || log.first_paint_reported {
            return false;
        }
        log.first_paint_reported = true;
        true
    }

    fn resize(&mut self) {
        if self.removed {
            return;
        }
        let mut log = self.log.borrow_mut();
        log.resizes += 1;
        log.events.push(EngineEvent::Resized);
    }

    fn add_marker(
        &mut self,
        element: MarkerElement,
        position: LngLat,
    ) -> Result<EngineMarkerId, EngineError> {
        if self.removed {
            return Err(EngineError::Backend("Engine bereits freigegeben".to_string()));
        }
        if self
            .reject_markers_after
            .is_some_and(|limit| self.accepted_markers >= limit)
        {
            return Err(EngineError::MarkerRejected {
                title: element.title,
                reason: "Limit erreicht".to_string(),
            });
        }

        let mut log = self.log.borrow_mut();
        log.next_marker_id += 1;
        let id = EngineMarkerId(log.next_marker_id);
        log.live_markers.insert(id, (element, position));
        log.events.push(EngineEvent::MarkerAdded(id));
        self.accepted_markers += 1;
        self.own_markers.push(id);
        Ok(id)
    }

    fn remove_marker(&mut self, marker: EngineMarkerId) {
        let mut log = self.log.borrow_mut();
        if log.live_markers.shift_remove(&marker).is_some() {
            log.events.push(EngineEvent::MarkerRemoved(marker));
        }
        self.own_markers.retain(|id| *id != marker);
    }

    fn remove(&mut self) {
        if self.removed {
            return;
        }
        self.removed = true;

        let mut log = self.log.borrow_mut();
        // Eine freigegebene Engine nimmt ihre restlichen Marker mit.
        for id in self.own_markers.drain(..) {
            log.live_markers.shift_remove(&id);
        }
        log.removed += 1;
        log.painted = false;
        log.first_paint_reported = false;
        log.events.push(EngineEvent::Removed);
    }
}

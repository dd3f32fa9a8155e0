//! Lebenszyklus der Map-Session: anfordern, auflösen oder abbrechen, beenden.
//!
//! Der Start ist zweiphasig. `start_session` legt eine ausstehende Session
//! mit Abbruch-Token an; erst `resolve_session` (sobald die Engine-Fähigkeit
//! geladen ist) erstellt Engine, Marker und Größenbeobachtung. Wurde die
//! Session zwischenzeitlich beendet, passiert bei der Auflösung nichts mehr.

use super::session::MapSession;
use super::SessionHandle;
use crate::core::{
    Container, ContainerId, EngineConfig, EngineError, EngineFactory, EngineMarkerId, Entity,
    SelectCallback,
};
use std::cell::Cell;
use std::rc::Rc;

/// Abbruch-Token einer ausstehenden Session.
///
/// Wird beim Beenden gesetzt und bei der Auflösung als Erstes geprüft.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    /// Ob die Session abgebrochen wurde
    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }

    fn cancel(&self) {
        self.0.set(true);
    }
}

/// Phase des Koordinators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Keine Session
    Idle,
    /// Engine-Fähigkeit wird geladen
    Pending,
    /// Engine, Marker und Beobachtung laufen
    Live,
}

/// Ergebnis einer Auflösung.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// Session vollständig aufgebaut
    Live,
    /// Session wurde vor der Auflösung beendet; nichts wurde erstellt
    Cancelled,
}

/// Fehler beim Aufbau einer Session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Engine konnte nicht erstellt oder bestückt werden
    #[error("Karte konnte nicht erstellt werden: {0}")]
    Construction(#[from] EngineError),
}

struct PendingSession {
    handle: SessionHandle,
    container: Container,
    entities: Vec<Entity>,
    token: CancelToken,
}

enum SessionSlot {
    Pending(PendingSession),
    Live(MapSession),
}

impl SessionSlot {
    fn handle(&self) -> SessionHandle {
        match self {
            Self::Pending(pending) => pending.handle,
            Self::Live(session) => session.handle(),
        }
    }

    fn container_id(&self) -> &ContainerId {
        match self {
            Self::Pending(pending) => &pending.container.id,
            Self::Live(session) => &session.container().id,
        }
    }
}

/// Orchestriert Erstellung und Abbau der (höchstens einen) Map-Session.
pub struct MapLifecycleCoordinator {
    on_select: SelectCallback,
    slot: Option<SessionSlot>,
    next_handle: u64,
}

impl MapLifecycleCoordinator {
    /// Erstellt einen Koordinator. `on_select` wird an jeden Marker gebunden.
    pub fn new(on_select: SelectCallback) -> Self {
        Self {
            on_select,
            slot: None,
            next_handle: 1,
        }
    }

    /// Fordert eine Session für den Container an.
    ///
    /// Existiert bereits eine (ausstehende oder lebende) Session für denselben
    /// Container, wird deren Handle zurückgegeben. Eine Session für einen
    /// anderen Container wird vorher beendet (Remount).
    pub fn start_session(&mut self, container: Container, entities: Vec<Entity>) -> SessionHandle {
        if let Some(slot) = &self.slot {
            if *slot.container_id() == container.id {
                log::debug!(
                    "Session für Container '{}' existiert bereits",
                    container.id.0
                );
                return slot.handle();
            }
            let previous = slot.handle();
            log::info!("Remount: beende Session {:?}", previous);
            self.end_session(previous);
        }

        let handle = SessionHandle(self.next_handle);
        self.next_handle += 1;

        log::info!(
            "Map-Session {:?} angefordert für Container '{}' ({} Entitäten)",
            handle,
            container.id.0,
            entities.len()
        );
        self.slot = Some(SessionSlot::Pending(PendingSession {
            handle,
            container,
            entities,
            token: CancelToken::default(),
        }));
        handle
    }

    /// Abbruch-Token einer ausstehenden Session.
    pub fn cancel_token(&self, handle: SessionHandle) -> Option<CancelToken> {
        match &self.slot {
            Some(SessionSlot::Pending(pending)) if pending.handle == handle => {
                Some(pending.token.clone())
            }
            _ => None,
        }
    }

    /// Löst eine ausstehende Session mit der geladenen Engine-Fähigkeit auf.
    ///
    /// Ist die Session inzwischen beendet (oder gehört das Handle zu keiner
    /// ausstehenden Session), wird nichts erstellt und `Cancelled` geliefert.
    /// Bei einem Konstruktionsfehler bleibt keine Session zurück.
    pub fn resolve_session(
        &mut self,
        handle: SessionHandle,
        factory: &dyn EngineFactory,
        config: &EngineConfig,
    ) -> Result<ResolveOutcome, SessionError> {
        let pending = match self.slot.take() {
            Some(SessionSlot::Pending(pending))
                if pending.handle == handle && !pending.token.is_cancelled() =>
            {
                pending
            }
            other => {
                self.slot = other;
                log::debug!("Auflösung von {:?} verworfen (abgebrochen)", handle);
                return Ok(ResolveOutcome::Cancelled);
            }
        };

        if let Err(e) = config.require_access_token() {
            log::error!("Map-Session {:?} fehlgeschlagen: {}", handle, e);
            return Err(e.into());
        }

        let engine = factory.create(&pending.container, config).map_err(|e| {
            log::error!(
                "Engine '{}' für {:?} nicht erstellbar: {}",
                factory.name(),
                handle,
                e
            );
            SessionError::from(e)
        })?;

        let session = MapSession::assemble(
            handle,
            pending.container,
            engine,
            &pending.entities,
            config.marker_anchor,
            &self.on_select,
        )?;

        log::info!(
            "Map-Session {:?} aktiv ({} Marker, Engine '{}')",
            handle,
            session.markers().len(),
            factory.name()
        );
        self.slot = Some(SessionSlot::Live(session));
        Ok(ResolveOutcome::Live)
    }

    /// Beendet die Session. Idempotent; unbekannte Handles sind ein No-op.
    ///
    /// Gibt `true` zurück, wenn tatsächlich etwas beendet wurde.
    pub fn end_session(&mut self, handle: SessionHandle) -> bool {
        match self.slot.take() {
            Some(SessionSlot::Pending(pending)) if pending.handle == handle => {
                pending.token.cancel();
                log::info!("Ausstehende Map-Session {:?} abgebrochen", handle);
                true
            }
            Some(SessionSlot::Live(session)) if session.handle() == handle => {
                session.teardown();
                true
            }
            other => {
                self.slot = other;
                false
            }
        }
    }

    /// Beendet die aktuelle Session, falls vorhanden.
    pub fn end_current(&mut self) -> bool {
        match self.handle() {
            Some(handle) => self.end_session(handle),
            None => false,
        }
    }

    /// Aktuelle Phase
    pub fn phase(&self) -> SessionPhase {
        match &self.slot {
            None => SessionPhase::Idle,
            Some(SessionSlot::Pending(_)) => SessionPhase::Pending,
            Some(SessionSlot::Live(_)) => SessionPhase::Live,
        }
    }

    /// Handle der aktuellen Session
    pub fn handle(&self) -> Option<SessionHandle> {
        self.slot.as_ref().map(SessionSlot::handle)
    }

    /// Lebende Session
    pub fn session(&self) -> Option<&MapSession> {
        match &self.slot {
            Some(SessionSlot::Live(session)) => Some(session),
            _ => None,
        }
    }

    fn session_mut(&mut self) -> Option<&mut MapSession> {
        match &mut self.slot {
            Some(SessionSlot::Live(session)) => Some(session),
            _ => None,
        }
    }

    /// Paint-Zyklus der UI: führt fällige Initial-Fits aus.
    pub fn on_paint_cycle(&mut self) -> usize {
        self.session_mut().map_or(0, MapSession::on_paint_cycle)
    }

    /// Größenänderung des Containers.
    ///
    /// Bei ausstehender Session wird nur die gemerkte Größe aktualisiert,
    /// damit die Engine mit der aktuellen Größe entsteht.
    pub fn on_container_resize(&mut self, size: [f32; 2]) -> bool {
        match &mut self.slot {
            Some(SessionSlot::Pending(pending)) => {
                pending.container.size = size;
                false
            }
            Some(SessionSlot::Live(session)) => session.on_container_resize(size),
            None => false,
        }
    }

    /// Ersetzt die Entitätsliste der aktuellen Session.
    ///
    /// Lebende Sessions bauen ihre Marker vollständig neu auf. Scheitert das,
    /// wird die Session beendet, damit kein halb bestückter Zustand bleibt.
    pub fn replace_entities(
        &mut self,
        entities: Vec<Entity>,
        config: &EngineConfig,
    ) -> Result<usize, SessionError> {
        let on_select = self.on_select.clone();
        let result = match &mut self.slot {
            None => return Ok(0),
            Some(SessionSlot::Pending(pending)) => {
                pending.entities = entities;
                return Ok(0);
            }
            Some(SessionSlot::Live(session)) => {
                session.rebuild_markers(&entities, config.marker_anchor, &on_select)
            }
        };

        match result {
            Ok(count) => Ok(count),
            Err(e) => {
                log::error!("Marker-Neuaufbau fehlgeschlagen, beende Session: {}", e);
                self.end_current();
                Err(e.into())
            }
        }
    }

    /// Klick auf den Marker einer Entität (z.B. aus Tests oder Tastatur-Navigation).
    pub fn click_marker(&self, entity_id: &str) -> bool {
        self.session()
            .is_some_and(|session| session.markers().click(entity_id))
    }

    /// Klick, wie ihn die Engine meldet.
    pub fn click_engine_marker(&self, marker: EngineMarkerId) -> bool {
        self.session()
            .is_some_and(|session| session.markers().click_engine_marker(marker))
    }
}

impl Drop for MapLifecycleCoordinator {
    fn drop(&mut self) {
        self.end_current();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        sample_entities, EngineEvent, HeadlessEngineFactory, LngLat, MarkerAnchor,
    };
    use std::cell::RefCell;

    fn config(token: Option<&str>) -> EngineConfig {
        EngineConfig {
            center: LngLat::new(-73.0498, -36.8201),
            zoom: 12.0,
            style: "mapbox://styles/mapbox/streets-v12".to_string(),
            access_token: token.map(str::to_string),
            access_token_env: "MAPBOX_ACCESS_TOKEN".to_string(),
            marker_anchor: MarkerAnchor::Center,
        }
    }

    fn coordinator() -> (MapLifecycleCoordinator, Rc<RefCell<Vec<String>>>) {
        let clicked = Rc::new(RefCell::new(Vec::new()));
        let sink = clicked.clone();
        let coordinator = MapLifecycleCoordinator::new(Rc::new(move |entity: &Entity| {
            sink.borrow_mut().push(entity.id.clone())
        }));
        (coordinator, clicked)
    }

    fn container() -> Container {
        Container::new("map-view", [1024.0, 768.0])
    }

    #[test]
    fn start_then_resolve_builds_full_session() {
        let (mut coordinator, _) = coordinator();
        let factory = HeadlessEngineFactory::new();

        let handle = coordinator.start_session(container(), sample_entities());
        assert_eq!(coordinator.phase(), SessionPhase::Pending);

        let outcome = coordinator
            .resolve_session(handle, &factory, &config(Some("token")))
            .expect("Auflösung sollte gelingen");

        assert_eq!(outcome, ResolveOutcome::Live);
        assert_eq!(coordinator.phase(), SessionPhase::Live);
        let session = coordinator.session().expect("Session sollte leben");
        assert_eq!(session.markers().len(), 5);
        assert!(session.is_observing());
        assert_eq!(factory.log().borrow().live_engines(), 1);
    }

    #[test]
    fn second_start_for_same_container_returns_existing_handle() {
        let (mut coordinator, _) = coordinator();
        let factory = HeadlessEngineFactory::new();

        let first = coordinator.start_session(container(), sample_entities());
        let again_pending = coordinator.start_session(container(), sample_entities());
        coordinator
            .resolve_session(first, &factory, &config(Some("token")))
            .expect("Auflösung sollte gelingen");
        let again_live = coordinator.start_session(container(), sample_entities());

        assert_eq!(first, again_pending);
        assert_eq!(first, again_live);
        assert_eq!(factory.log().borrow().created, 1);
    }

    #[test]
    fn end_before_resolve_creates_nothing() {
        let (mut coordinator, _) = coordinator();
        let factory = HeadlessEngineFactory::new();

        let handle = coordinator.start_session(container(), sample_entities());
        let token = coordinator.cancel_token(handle).expect("Token vorhanden");
        assert!(coordinator.end_session(handle));
        assert!(token.is_cancelled());

        let outcome = coordinator
            .resolve_session(handle, &factory, &config(Some("token")))
            .expect("Abbruch ist kein Fehler");

        assert_eq!(outcome, ResolveOutcome::Cancelled);
        assert_eq!(coordinator.phase(), SessionPhase::Idle);
        let log = factory.log();
        let log = log.borrow();
        assert_eq!(log.created, 0);
        assert!(log.live_markers.is_empty());
        assert!(log.events.is_empty());
    }

    #[test]
    fn stale_resolve_does_not_touch_newer_pending_session() {
        let (mut coordinator, _) = coordinator();
        let factory = HeadlessEngineFactory::new();

        let old = coordinator.start_session(container(), sample_entities());
        coordinator.end_session(old);
        let new = coordinator.start_session(container(), sample_entities());

        let outcome = coordinator
            .resolve_session(old, &factory, &config(Some("token")))
            .expect("Abbruch ist kein Fehler");

        assert_eq!(outcome, ResolveOutcome::Cancelled);
        assert_eq!(coordinator.handle(), Some(new));
        assert_eq!(coordinator.phase(), SessionPhase::Pending);
    }

    #[test]
    fn end_session_tears_down_in_order_and_is_idempotent() {
        let (mut coordinator, _) = coordinator();
        let factory = HeadlessEngineFactory::new();
        let handle = coordinator.start_session(container(), sample_entities());
        coordinator
            .resolve_session(handle, &factory, &config(Some("token")))
            .expect("Auflösung sollte gelingen");

        assert!(coordinator.end_session(handle));
        assert!(!coordinator.end_session(handle));

        assert_eq!(coordinator.phase(), SessionPhase::Idle);
        let log = factory.log();
        let log = log.borrow();
        assert_eq!(log.live_engines(), 0);
        assert!(log.live_markers.is_empty());
        let removals: Vec<_> = log
            .events
            .iter()
            .skip_while(|e| !matches!(e, EngineEvent::MarkerRemoved(_)))
            .collect();
        assert_eq!(removals.len(), 6);
        assert_eq!(removals.last(), Some(&&EngineEvent::Removed));
    }

    #[test]
    fn missing_token_fails_without_leaving_state() {
        let (mut coordinator, _) = coordinator();
        let factory = HeadlessEngineFactory::new();
        let handle = coordinator.start_session(container(), sample_entities());

        let result = coordinator.resolve_session(handle, &factory, &config(None));

        assert!(matches!(
            result,
            Err(SessionError::Construction(EngineError::MissingAccessToken { .. }))
        ));
        assert_eq!(coordinator.phase(), SessionPhase::Idle);
        assert_eq!(factory.log().borrow().created, 0);
        assert!(!coordinator.end_session(handle));
    }

    #[test]
    fn rejected_marker_disposes_engine() {
        let (mut coordinator, _) = coordinator();
        let factory = HeadlessEngineFactory::new().rejecting_markers_after(3);
        let handle = coordinator.start_session(container(), sample_entities());

        let result = coordinator.resolve_session(handle, &factory, &config(Some("token")));

        assert!(result.is_err());
        assert_eq!(coordinator.phase(), SessionPhase::Idle);
        let log = factory.log();
        let log = log.borrow();
        assert_eq!(log.live_engines(), 0);
        assert!(log.live_markers.is_empty());
    }

    #[test]
    fn paint_cycle_performs_next_frame_fit_then_first_paint_fit_once() {
        let (mut coordinator, _) = coordinator();
        let factory = HeadlessEngineFactory::new();
        let handle = coordinator.start_session(container(), sample_entities());
        coordinator
            .resolve_session(handle, &factory, &config(Some("token")))
            .expect("Auflösung sollte gelingen");

        assert_eq!(coordinator.on_paint_cycle(), 1);
        assert_eq!(coordinator.on_paint_cycle(), 0);

        factory.log().borrow_mut().mark_painted();
        assert_eq!(coordinator.on_paint_cycle(), 1);
        assert_eq!(coordinator.on_paint_cycle(), 0);

        assert_eq!(factory.log().borrow().resizes, 2);
        let session = coordinator.session().expect("Session");
        assert_eq!(session.fits_performed(), 2);
        assert!(!session.fit_schedule().on_first_paint);
    }

    #[test]
    fn resize_while_pending_updates_construction_size() {
        let (mut coordinator, _) = coordinator();
        let factory = HeadlessEngineFactory::new();
        let handle = coordinator.start_session(container(), sample_entities());

        assert!(!coordinator.on_container_resize([1280.0, 800.0]));
        coordinator
            .resolve_session(handle, &factory, &config(Some("token")))
            .expect("Auflösung sollte gelingen");

        let session = coordinator.session().expect("Session");
        assert_eq!(session.container().size, [1280.0, 800.0]);
        assert_eq!(factory.log().borrow().resizes, 0);
    }

    #[test]
    fn remount_on_other_container_ends_previous_session() {
        let (mut coordinator, _) = coordinator();
        let factory = HeadlessEngineFactory::new();
        let first = coordinator.start_session(container(), sample_entities());
        coordinator
            .resolve_session(first, &factory, &config(Some("token")))
            .expect("Auflösung sollte gelingen");

        let second =
            coordinator.start_session(Container::new("other", [300.0, 200.0]), sample_entities());

        assert_ne!(first, second);
        assert_eq!(coordinator.phase(), SessionPhase::Pending);
        assert_eq!(factory.log().borrow().live_engines(), 0);
    }

    #[test]
    fn click_marker_reaches_select_callback() {
        let (mut coordinator, clicked) = coordinator();
        let factory = HeadlessEngineFactory::new();
        let handle = coordinator.start_session(container(), sample_entities());
        assert!(!coordinator.click_marker("m2"));

        coordinator
            .resolve_session(handle, &factory, &config(Some("token")))
            .expect("Auflösung sollte gelingen");

        assert!(coordinator.click_marker("m2"));
        assert_eq!(*clicked.borrow(), vec!["m2".to_string()]);
    }

    #[test]
    fn dropping_coordinator_releases_live_session() {
        let factory = HeadlessEngineFactory::new();
        {
            let (mut coordinator, _) = coordinator();
            let handle = coordinator.start_session(container(), sample_entities());
            coordinator
                .resolve_session(handle, &factory, &config(Some("token")))
                .expect("Auflösung sollte gelingen");
        }

        let log = factory.log();
        let log = log.borrow();
        assert_eq!(log.live_engines(), 0);
        assert!(log.live_markers.is_empty());
    }

    #[test]
    fn factory_failure_leaves_no_session() {
        let (mut coordinator, _) = coordinator();
        let factory =
            HeadlessEngineFactory::new().failing(EngineError::Backend("Style nicht ladbar".into()));
        let log = factory.log();
        let handle = coordinator.start_session(container(), sample_entities());

        let result = coordinator.resolve_session(handle, &factory, &config(Some("token")));

        assert!(matches!(
            result,
            Err(SessionError::Construction(EngineError::Backend(_)))
        ));
        assert_eq!(coordinator.phase(), SessionPhase::Idle);
        assert_eq!(log.borrow().created, 0);
        assert!(log.borrow().live_markers.is_empty());
    }

    #[test]
    fn failed_marker_rebuild_ends_session() {
        let (mut coordinator, _) = coordinator();
        let factory = HeadlessEngineFactory::new().rejecting_markers_after(3);
        let log = factory.log();
        let handle = coordinator.start_session(container(), sample_entities()[..2].to_vec());
        coordinator
            .resolve_session(handle, &factory, &config(Some("token")))
            .expect("Auflösung sollte gelingen");
        assert_eq!(log.borrow().live_markers.len(), 2);

        let result = coordinator.replace_entities(sample_entities(), &config(Some("token")));

        assert!(matches!(
            result,
            Err(SessionError::Construction(EngineError::MarkerRejected { .. }))
        ));
        assert_eq!(coordinator.phase(), SessionPhase::Idle);
        assert!(!coordinator.click_marker("m1"));
        let log = log.borrow();
        assert_eq!(log.live_engines(), 0);
        assert!(log.live_markers.is_empty());
    }

    #[test]
    fn next_frame_fit_runs_before_first_paint_fit() {
        let (mut coordinator, _) = coordinator();
        let factory = HeadlessEngineFactory::new();
        let log = factory.log();
        let handle = coordinator.start_session(container(), sample_entities());
        coordinator
            .resolve_session(handle, &factory, &config(Some("token")))
            .expect("Auflösung sollte gelingen");
        log.borrow_mut().mark_painted();

        assert_eq!(coordinator.on_paint_cycle(), 2);
        assert_eq!(coordinator.on_paint_cycle(), 0);

        let schedule = coordinator.session().expect("Session").fit_schedule();
        assert!(!schedule.on_next_frame && !schedule.on_first_paint);
        let resized: Vec<_> = log
            .borrow()
            .events
            .iter()
            .filter(|e| **e == EngineEvent::Resized)
            .cloned()
            .collect();
        assert_eq!(resized.len(), 2);
    }
}

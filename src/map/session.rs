//! Eine lebende Map-Session: Engine, Marker und Größenbeobachtung.

use super::registry::MarkerRegistry;
use super::sizer::{self, SizerSubscription};
use super::SessionHandle;
use crate::core::{Container, EngineError, Entity, MapEngine, MarkerAnchor, SelectCallback};

/// Ausstehende Fits nach der Konstruktion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitSchedule {
    /// Fit im nächsten Paint-Zyklus (Engines melden "geladen" teils vor dem finalen Layout)
    pub on_next_frame: bool,
    /// Fit, sobald die Engine den ersten Frame meldet
    pub on_first_paint: bool,
}

impl FitSchedule {
    fn after_construction() -> Self {
        Self {
            on_next_frame: true,
            on_first_paint: true,
        }
    }
}

/// Besitzt alles, was zu einer gemounteten Karte gehört.
pub struct MapSession {
    handle: SessionHandle,
    container: Container,
    engine: Box<dyn MapEngine>,
    markers: MarkerRegistry,
    sizer: Option<SizerSubscription>,
    fits: FitSchedule,
    fits_performed: usize,
}

impl MapSession {
    /// Bestückt eine frisch erstellte Engine.
    ///
    /// Schlägt das Einhängen der Marker fehl, wird die Engine freigegeben;
    /// es bleibt nichts zurück.
    pub(crate) fn assemble(
        handle: SessionHandle,
        container: Container,
        mut engine: Box<dyn MapEngine>,
        entities: &[Entity],
        anchor: MarkerAnchor,
        on_select: &SelectCallback,
    ) -> Result<Self, EngineError> {
        let mut markers = MarkerRegistry::new();
        if let Err(e) = markers.attach_all(engine.as_mut(), entities, anchor, on_select) {
            engine.remove();
            return Err(e);
        }

        let sizer = Some(sizer::observe(&container));

        Ok(Self {
            handle,
            container,
            engine,
            markers,
            sizer,
            fits: FitSchedule::after_construction(),
            fits_performed: 0,
        })
    }

    /// Baut die Session in fester Reihenfolge ab:
    /// Größenbeobachtung, Marker, Engine.
    pub(crate) fn teardown(mut self) {
        if let Some(subscription) = self.sizer.take() {
            sizer::dispose(subscription);
        }
        let removed = self.markers.detach_all(self.engine.as_mut());
        self.engine.remove();
        log::info!(
            "Map-Session {:?} beendet ({} Marker entfernt)",
            self.handle,
            removed
        );
    }

    /// Handle der Session
    pub fn handle(&self) -> SessionHandle {
        self.handle
    }

    /// Gebundener Container
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Marker der Session
    pub fn markers(&self) -> &MarkerRegistry {
        &self.markers
    }

    /// Noch ausstehende Fits
    pub fn fit_schedule(&self) -> FitSchedule {
        self.fits
    }

    /// Anzahl ausgeführter Initial-Fits
    pub fn fits_performed(&self) -> usize {
        self.fits_performed
    }

    /// Ob die Größenbeobachtung aktiv ist
    pub fn is_observing(&self) -> bool {
        self.sizer.is_some()
    }

    /// Wird einmal pro UI-Paint-Zyklus aufgerufen und führt fällige Fits aus.
    ///
    /// Reihenfolge: erst der Next-Frame-Fit, dann der First-Paint-Fit.
    pub fn on_paint_cycle(&mut self) -> usize {
        let mut fits = 0;

        if self.fits.on_next_frame {
            self.fits.on_next_frame = false;
            self.engine.resize();
            fits += 1;
        }

        if self.fits.on_first_paint && self.engine.take_first_paint() {
            self.fits.on_first_paint = false;
            self.engine.resize();
            fits += 1;
        }

        self.fits_performed += fits;
        fits
    }

    /// Leitet eine Größenänderung des Containers an die Beobachtung weiter.
    pub fn on_container_resize(&mut self, size: [f32; 2]) -> bool {
        self.container.size = size;
        match self.sizer.as_mut() {
            Some(subscription) => subscription.on_container_resize(size, self.engine.as_mut()),
            None => false,
        }
    }

    /// Ersetzt alle Marker (vollständiger Neuaufbau auf derselben Engine).
    pub fn rebuild_markers(
        &mut self,
        entities: &[Entity],
        anchor: MarkerAnchor,
        on_select: &SelectCallback,
    ) -> Result<usize, EngineError> {
        self.markers
            .attach_all(self.engine.as_mut(), entities, anchor, on_select)
    }
}

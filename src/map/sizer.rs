//! Viewport-Sizer: hält die Zeichenfläche der Engine auf Containergröße.

use crate::core::{Container, ContainerId, MapEngine};

/// Aktive Beobachtung der Containergröße.
///
/// Wird nur über `dispose` beendet; nach dem Verbrauch sind keine weiteren
/// Re-Measure-Aufrufe mehr möglich.
#[derive(Debug)]
pub struct SizerSubscription {
    container: ContainerId,
    last_size: [f32; 2],
    remeasures: usize,
}

/// Startet die Beobachtung. Löst selbst kein Re-Measure aus.
pub fn observe(container: &Container) -> SizerSubscription {
    log::debug!("Größenbeobachtung für Container '{}' gestartet", container.id.0);
    SizerSubscription {
        container: container.id.clone(),
        last_size: container.size,
        remeasures: 0,
    }
}

/// Beendet die Beobachtung und liefert die Anzahl ausgelöster Re-Measures.
pub fn dispose(subscription: SizerSubscription) -> usize {
    log::debug!(
        "Größenbeobachtung für Container '{}' beendet ({} Re-Measures)",
        subscription.container.0,
        subscription.remeasures
    );
    subscription.remeasures
}

impl SizerSubscription {
    /// Beobachteter Container
    pub fn container(&self) -> &ContainerId {
        &self.container
    }

    /// Zuletzt gemeldete Größe
    pub fn last_size(&self) -> [f32; 2] {
        self.last_size
    }

    /// Anzahl bisher ausgelöster Re-Measures
    pub fn remeasures(&self) -> usize {
        self.remeasures
    }

    /// Meldet eine neue Containergröße.
    ///
    /// Jede tatsächliche Änderung führt zu genau einem `resize` der Engine.
    /// Wiederholte Meldungen derselben Größe werden verworfen.
    pub fn on_container_resize(&mut self, size: [f32; 2], engine: &mut dyn MapEngine) -> bool {
        if size == self.last_size {
            return false;
        }
        self.last_size = size;
        self.remeasures += 1;
        engine.resize();
        true
    }
}

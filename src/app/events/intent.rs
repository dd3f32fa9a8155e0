use super::EngineCapability;
use crate::core::{Container, Entity};
use crate::map::SessionHandle;

/// App-Intent und App-Command Events.
/// Intents sind Eingaben aus UI/Engine ohne direkte Mutationslogik.
#[derive(Debug, Clone)]
pub enum AppIntent {
    /// Kartenansicht wurde in einen Container eingehängt
    MountRequested { container: Container },
    /// Kartenansicht wird ausgehängt
    UnmountRequested,
    /// Engine-Fähigkeit ist geladen (Auflösung der ausstehenden Session)
    EngineCapabilityLoaded {
        handle: SessionHandle,
        capability: EngineCapability,
    },
    /// Neuer UI-Paint-Zyklus (Frame)
    PaintCycle,
    /// Layout-Box des Containers hat sich geändert
    ContainerResized { size: [f32; 2] },
    /// Marker wurde angeklickt (aus dem Marker-Callback)
    MarkerSelected { entity: Entity },
    /// Detail-Overlay per Klick daneben geschlossen
    OverlayDismissed,
    /// Entitätsquelle liefert eine neue Liste
    EntitiesReplaced { entities: Vec<Entity> },
    /// Anwendung beenden
    ExitRequested,
}

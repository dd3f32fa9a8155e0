use super::EngineCapability;
use crate::core::{Container, Entity};
use crate::map::SessionHandle;

/// Commands sind mutierende Schritte, die zentral ausgeführt werden.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Map-Session für den Container anfordern
    StartSession { container: Container },
    /// Ausstehende Session mit geladener Engine-Fähigkeit auflösen
    ResolveSession {
        handle: SessionHandle,
        capability: EngineCapability,
    },
    /// Aktuelle Session beenden (Sizer, Marker, Engine)
    EndSession,
    /// Fällige Initial-Fits ausführen
    RunPaintCycle,
    /// Neue Containergröße an die Session weiterreichen
    ResizeViewport { size: [f32; 2] },
    /// Entität selektieren (Detailkarte zeigen)
    SelectEntity { entity: Entity },
    /// Selektion aufheben (Detailkarte schließen)
    DismissSelection,
    /// Entitätsliste ersetzen (Marker-Neuaufbau)
    ReplaceEntities { entities: Vec<Entity> },
    /// Anwendung beenden
    RequestExit,
}

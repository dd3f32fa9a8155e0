//! Map-Lebenszyklus: Session-Koordination, Marker-Registry, Viewport-Sizer.

pub mod coordinator;
pub mod registry;
pub mod session;
pub mod sizer;

pub use coordinator::{
    CancelToken, MapLifecycleCoordinator, ResolveOutcome, SessionError, SessionPhase,
};
pub use registry::MarkerRegistry;
pub use session::{FitSchedule, MapSession};
pub use sizer::SizerSubscription;

/// Identifiziert eine (ausstehende oder lebende) Map-Session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle(pub(crate) u64);

impl SessionHandle {
    /// Numerische ID für Logs und Statusanzeige
    pub fn id(self) -> u64 {
        self.0
    }
}

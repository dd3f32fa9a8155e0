//! AppIntent- und AppCommand-Enums für den Intent/Command-Datenfluss.

mod command;
mod intent;

pub use command::AppCommand;
pub use intent::AppIntent;

use crate::core::EngineFactory;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Geladene Engine-Fähigkeit, wie sie mit einem Intent transportiert wird.
#[derive(Clone)]
pub struct EngineCapability(Rc<dyn EngineFactory>);

impl EngineCapability {
    /// Verpackt eine Factory.
    pub fn new(factory: Rc<dyn EngineFactory>) -> Self {
        Self(factory)
    }

    /// Zugriff auf die Factory.
    pub fn factory(&self) -> &dyn EngineFactory {
        self.0.as_ref()
    }
}

impl fmt::Debug for EngineCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EngineCapability({})", self.0.name())
    }
}

/// Warteschlange für Intents, die außerhalb des UI-Durchlaufs entstehen
/// (z.B. Marker-Klicks aus Engine-Callbacks).
#[derive(Clone, Default)]
pub struct IntentQueue(Rc<RefCell<VecDeque<AppIntent>>>);

impl IntentQueue {
    /// Erstellt eine leere Warteschlange.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hängt einen Intent an.
    pub fn push(&self, intent: AppIntent) {
        self.0.borrow_mut().push_back(intent);
    }

    /// Entnimmt alle wartenden Intents in Reihenfolge.
    pub fn drain(&self) -> Vec<AppIntent> {
        self.0.borrow_mut().drain(..).collect()
    }

    /// Anzahl wartender Intents
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// `true`, wenn nichts wartet
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

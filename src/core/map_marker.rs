use super::engine::{EngineMarkerId, MarkerElement};
use super::{Entity, LngLat};
use std::fmt;
use std::rc::Rc;

/// Callback, der beim Klick auf einen Marker mit dessen Entität aufgerufen wird.
pub type SelectCallback = Rc<dyn Fn(&Entity)>;

/// Darstellung eines Markers. Hängt ausschließlich von `Entity::active` ab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerVisual {
    /// Verfügbar (grün)
    Active,
    /// Pausiert (rot)
    Inactive,
}

impl MarkerVisual {
    /// Leitet die Darstellung aus der Entität ab.
    pub fn for_entity(entity: &Entity) -> Self {
        if entity.active {
            Self::Active
        } else {
            Self::Inactive
        }
    }

    /// Kurzname der Klasse: `active` oder `inactive`.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Modifier-Klasse am Element: `is-active` oder `is-inactive`.
    pub fn modifier_class(self) -> &'static str {
        match self {
            Self::Active => "is-active",
            Self::Inactive => "is-inactive",
        }
    }
}

/// Bindung zwischen einer Entität und genau einem Pin der Engine.
///
/// Besitzt den Klick-Callback. Registrierung passiert einmalig beim Erstellen,
/// `release` gibt ihn wieder frei; danach ist `click` wirkungslos.
pub struct MarkerHandle {
    entity: Entity,
    engine_marker: EngineMarkerId,
    element: MarkerElement,
    on_click: Option<SelectCallback>,
}

impl MarkerHandle {
    /// Erstellt einen Handle mit registriertem Klick-Callback.
    pub fn new(
        entity: Entity,
        engine_marker: EngineMarkerId,
        element: MarkerElement,
        on_click: SelectCallback,
    ) -> Self {
        Self {
            entity,
            engine_marker,
            element,
            on_click: Some(on_click),
        }
    }

    /// Gebundene Entität
    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    /// ID der gebundenen Entität
    pub fn entity_id(&self) -> &str {
        &self.entity.id
    }

    /// Geo-Position des Pins
    pub fn position(&self) -> LngLat {
        self.entity.position()
    }

    /// Engine-seitige Marker-ID
    pub fn engine_marker(&self) -> EngineMarkerId {
        self.engine_marker
    }

    /// Das eingehängte Element
    pub fn element(&self) -> &MarkerElement {
        &self.element
    }

    /// Darstellung des Pins
    pub fn visual(&self) -> MarkerVisual {
        self.element.visual
    }

    /// Ob der Klick-Callback noch registriert ist
    pub fn is_wired(&self) -> bool {
        self.on_click.is_some()
    }

    /// Löst den Klick aus. Gibt `false` zurück, wenn der Callback bereits freigegeben ist.
    pub fn click(&self) -> bool {
        match &self.on_click {
            Some(callback) => {
                callback(&self.entity);
                true
            }
            None => false,
        }
    }

    /// Gibt den Klick-Callback frei.
    pub fn release(&mut self) {
        self.on_click = None;
    }
}

impl fmt::Debug for MarkerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerHandle")
            .field("entity_id", &self.entity.id)
            .field("engine_marker", &self.engine_marker)
            .field("visual", &self.element.visual)
            .field("wired", &self.is_wired())
            .finish()
    }
}

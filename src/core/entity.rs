//! Ortsgebundene Entitäten (Profile), die als Pins auf der Karte erscheinen.

use serde::{Deserialize, Serialize};

/// Geographische Position in Grad (Längengrad zuerst, wie bei der Engine).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    /// Längengrad
    pub lng: f64,
    /// Breitengrad
    pub lat: f64,
}

impl LngLat {
    /// Erstellt eine Position aus Längen- und Breitengrad.
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl From<[f64; 2]> for LngLat {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self { lng, lat }
    }
}

/// Eine Entität der Kartenansicht.
///
/// Unveränderlich für die Dauer einer Map-Session. Die `id` ist innerhalb
/// einer Entitätsliste eindeutig; die übrigen Felder werden unverändert an
/// die Präsentationsschicht weitergereicht.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Opake, eindeutige ID
    pub id: String,
    /// Anzeigename
    pub name: String,
    /// Breitengrad
    pub lat: f64,
    /// Längengrad
    pub lng: f64,
    /// Verfügbar (aktiv) oder pausiert
    pub active: bool,
    /// Freitext für die Detailkarte
    pub description: String,
}

impl Entity {
    /// Erstellt eine neue Entität.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        lat: f64,
        lng: f64,
        active: bool,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lat,
            lng,
            active,
            description: description.into(),
        }
    }

    /// Position der Entität als `LngLat`.
    pub fn position(&self) -> LngLat {
        LngLat::new(self.lng, self.lat)
    }
}

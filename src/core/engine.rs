//! Vertrag zur externen Karten-Engine.
//!
//! Die Engine selbst (Tiles, Pan/Zoom, Rendering) wird nicht hier
//! implementiert. Der Kern braucht nur Konstruktion, eine einmalige
//! "erster Frame gezeichnet"-Meldung, Re-Measure, Marker-Anbindung
//! und vollständige Freigabe.

use super::map_marker::MarkerVisual;
use super::LngLat;
use serde::{Deserialize, Serialize};

/// Engine-seitige ID eines angehängten Markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EngineMarkerId(pub u64);

/// Ankerpunkt des Marker-Elements relativ zur Geo-Position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerAnchor {
    /// Elementmitte liegt auf der Position
    #[default]
    Center,
    /// Oberkante mittig
    Top,
    /// Unterkante mittig (Pin-Spitze)
    Bottom,
    /// Linke Kante mittig
    Left,
    /// Rechte Kante mittig
    Right,
}

impl MarkerAnchor {
    /// Verschiebung des Element-Mittelpunkts in Vielfachen der halben Elementgröße.
    ///
    /// `Bottom` liefert `(0, -1)`: das Element sitzt oberhalb der Position.
    pub fn offset_factor(self) -> [f32; 2] {
        match self {
            Self::Center => [0.0, 0.0],
            Self::Top => [0.0, 1.0],
            Self::Bottom => [0.0, -1.0],
            Self::Left => [1.0, 0.0],
            Self::Right => [-1.0, 0.0],
        }
    }
}

/// Visuelles Element, das die Engine an einer Geo-Position einhängt.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerElement {
    /// Tooltip-Titel (Name der Entität)
    pub title: String,
    /// Aktiv/Inaktiv-Darstellung
    pub visual: MarkerVisual,
    /// Ankerpunkt
    pub anchor: MarkerAnchor,
}

impl MarkerElement {
    /// Vollständige Klassenliste des Elements, z.B. `model-marker is-active`.
    pub fn class_list(&self) -> String {
        format!("model-marker {}", self.visual.modifier_class())
    }
}

/// Identifiziert den Container, an den eine Session gebunden ist.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerId(pub String);

impl ContainerId {
    /// Erstellt eine Container-ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Layout-Box, in die die Karte gerendert wird.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    /// Container-ID
    pub id: ContainerId,
    /// Aktuelle Größe in Pixel
    pub size: [f32; 2],
}

impl Container {
    /// Erstellt einen Container mit Startgröße.
    pub fn new(id: impl Into<String>, size: [f32; 2]) -> Self {
        Self {
            id: ContainerId::new(id),
            size,
        }
    }
}

/// Fehler beim Erstellen oder Bestücken der Engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// Kein Access-Token konfiguriert
    #[error("kein Access-Token gesetzt (Umgebungsvariable {env_var})")]
    MissingAccessToken { env_var: String },
    /// Container ist nicht (mehr) eingehängt
    #[error("Container '{0}' ist nicht verfügbar")]
    ContainerUnavailable(String),
    /// Engine hat einen Marker abgelehnt
    #[error("Marker für '{title}' wurde abgelehnt: {reason}")]
    MarkerRejected { title: String, reason: String },
    /// Sonstiger Fehler der Engine-Implementierung
    #[error("Engine-Fehler: {0}")]
    Backend(String),
}

/// Konstruktionsparameter der Engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Startzentrum
    pub center: LngLat,
    /// Start-Zoomstufe
    pub zoom: f64,
    /// Style-URL
    pub style: String,
    /// Access-Token (aus der Umgebung)
    pub access_token: Option<String>,
    /// Name der Umgebungsvariable, aus der das Token stammt (für Fehlermeldungen)
    pub access_token_env: String,
    /// Ankerpunkt aller Marker
    pub marker_anchor: MarkerAnchor,
}

impl EngineConfig {
    /// Liefert das Token oder einen Konstruktionsfehler, wenn es fehlt oder leer ist.
    pub fn require_access_token(&self) -> Result<&str, EngineError> {
        match self.access_token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(EngineError::MissingAccessToken {
                env_var: self.access_token_env.clone(),
            }),
        }
    }
}

/// Eine laufende Karten-Engine, gebunden an genau einen Container.
pub trait MapEngine {
    /// Einmalige Meldung "erster Frame gezeichnet".
    ///
    /// Liefert genau einmal `true`, sobald die Engine ihren ersten Frame
    /// fertig hat, danach immer `false`.
    fn take_first_paint(&mut self) -> bool;

    /// Misst den Container neu aus und passt die interne Zeichenfläche an.
    /// Mehrfache Aufrufe sind unschädlich.
    fn resize(&mut self);

    /// Hängt ein Marker-Element an der Position ein.
    fn add_marker(
        &mut self,
        element: MarkerElement,
        position: LngLat,
    ) -> Result<EngineMarkerId, EngineError>;

    /// Entfernt einen Marker. Unbekannte IDs werden ignoriert.
    fn remove_marker(&mut self, marker: EngineMarkerId);

    /// Gibt alle nativen Ressourcen der Engine frei.
    fn remove(&mut self);
}

/// Geladene Engine-Fähigkeit: erzeugt Engines für Container.
pub trait EngineFactory {
    /// Kurzname für Logs.
    fn name(&self) -> &str;

    /// Erstellt eine Engine für den Container.
    fn create(
        &self,
        container: &Container,
        config: &EngineConfig,
    ) -> Result<Box<dyn MapEngine>, EngineError>;
}

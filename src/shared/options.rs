//! Zentrale Konfiguration der Kartenansicht.
//!
//! `MapViewOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use crate::core::{EngineConfig, LngLat, MarkerAnchor};
use serde::{Deserialize, Serialize};

// ── Kamera ──────────────────────────────────────────────────────────

/// Startzentrum `[lng, lat]` (Concepción, Chile).
pub const DEFAULT_CENTER: [f64; 2] = [-73.0498, -36.8201];
/// Start-Zoomstufe.
pub const DEFAULT_ZOOM: f64 = 12.0;
/// Minimale Zoomstufe.
pub const ZOOM_MIN: f64 = 2.0;
/// Maximale Zoomstufe.
pub const ZOOM_MAX: f64 = 19.0;
/// Zoom-Schritt pro Mausrad-Raste.
pub const SCROLL_ZOOM_STEP: f64 = 0.25;

// ── Engine ──────────────────────────────────────────────────────────

/// Style der Karte.
pub const DEFAULT_STYLE: &str = "mapbox://styles/mapbox/streets-v12";
/// Umgebungsvariable mit dem Access-Token.
pub const ACCESS_TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";

// ── Marker ──────────────────────────────────────────────────────────

/// Pin-Radius in Screen-Pixeln.
pub const MARKER_RADIUS_PX: f32 = 6.0;
/// Farbe aktiver Pins (RGBA: Grün #16a34a).
pub const MARKER_COLOR_ACTIVE: [f32; 4] = [0.086, 0.639, 0.290, 1.0];
/// Farbe inaktiver Pins (RGBA: Rot #ef4444).
pub const MARKER_COLOR_INACTIVE: [f32; 4] = [0.937, 0.267, 0.267, 1.0];
/// Pick-Radius für Klicks auf Pins in Screen-Pixeln.
pub const MARKER_PICK_RADIUS_PX: f32 = 14.0;

/// Alle zur Laufzeit änderbaren Optionen der Kartenansicht.
/// Wird als `pinmap.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapViewOptions {
    // ── Kamera ──────────────────────────────────────────────────
    /// Startzentrum `[lng, lat]`
    pub center: [f64; 2],
    /// Start-Zoomstufe
    pub zoom: f64,
    /// Minimale Zoomstufe
    #[serde(default = "default_zoom_min")]
    pub zoom_min: f64,
    /// Maximale Zoomstufe
    #[serde(default = "default_zoom_max")]
    pub zoom_max: f64,
    /// Zoom-Schritt pro Mausrad-Raste
    #[serde(default = "default_scroll_zoom_step")]
    pub scroll_zoom_step: f64,

    // ── Engine ──────────────────────────────────────────────────
    /// Style-URL
    pub style: String,
    /// Name der Umgebungsvariable mit dem Access-Token
    pub access_token_env: String,

    // ── Marker ──────────────────────────────────────────────────
    /// Ankerpunkt der Pins
    #[serde(default)]
    pub marker_anchor: MarkerAnchor,
    /// Pin-Radius in Pixeln
    pub marker_radius_px: f32,
    /// Farbe aktiver Pins
    pub marker_color_active: [f32; 4],
    /// Farbe inaktiver Pins
    pub marker_color_inactive: [f32; 4],
    /// Pick-Radius in Pixeln
    pub marker_pick_radius_px: f32,

    // ── Daten ───────────────────────────────────────────────────
    /// Optionale JSON-Datei mit Entitäten (sonst Beispieldaten)
    #[serde(default)]
    pub entities_path: Option<std::path::PathBuf>,
}

impl Default for MapViewOptions {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            zoom_min: ZOOM_MIN,
            zoom_max: ZOOM_MAX,
            scroll_zoom_step: SCROLL_ZOOM_STEP,

            style: DEFAULT_STYLE.to_string(),
            access_token_env: ACCESS_TOKEN_ENV.to_string(),

            marker_anchor: MarkerAnchor::Center,
            marker_radius_px: MARKER_RADIUS_PX,
            marker_color_active: MARKER_COLOR_ACTIVE,
            marker_color_inactive: MARKER_COLOR_INACTIVE,
            marker_pick_radius_px: MARKER_PICK_RADIUS_PX,

            entities_path: None,
        }
    }
}

/// Serde-Default für `zoom_min` (Abwärtskompatibilität bestehender TOML-Dateien).
fn default_zoom_min() -> f64 {
    ZOOM_MIN
}

/// Serde-Default für `zoom_max`.
fn default_zoom_max() -> f64 {
    ZOOM_MAX
}

/// Serde-Default für `scroll_zoom_step`.
fn default_scroll_zoom_step() -> f64 {
    SCROLL_ZOOM_STEP
}

impl MapViewOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<Self>(&content) {
                Ok(mut opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts.normalize_zoom_limits();
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Gültige Zoom-Grenzen `(min, max)`.
    ///
    /// Vertauschte Grenzen werden getauscht, nicht-endliche durch die
    /// Standardwerte ersetzt. Es gilt immer `min <= max`.
    pub fn zoom_limits(&self) -> (f64, f64) {
        let min = if self.zoom_min.is_finite() {
            self.zoom_min
        } else {
            ZOOM_MIN
        };
        let max = if self.zoom_max.is_finite() {
            self.zoom_max
        } else {
            ZOOM_MAX
        };
        if min <= max {
            (min, max)
        } else {
            (max, min)
        }
    }

    /// Korrigiert ungültige Zoom-Grenzen aus einer handbearbeiteten Datei.
    fn normalize_zoom_limits(&mut self) {
        let (min, max) = self.zoom_limits();
        if (min, max) != (self.zoom_min, self.zoom_max) {
            log::warn!(
                "Ungültige Zoom-Grenzen {}..{} in der Optionen-Datei, verwende {}..{}",
                self.zoom_min,
                self.zoom_max,
                min,
                max
            );
            self.zoom_min = min;
            self.zoom_max = max;
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("pinmap"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("pinmap.toml")
    }

    /// Liest das Access-Token aus der konfigurierten Umgebungsvariable.
    pub fn read_access_token(&self) -> Option<String> {
        std::env::var(&self.access_token_env)
            .ok()
            .filter(|token| !token.trim().is_empty())
    }

    /// Baut die Engine-Konfiguration mit dem gegebenen Token.
    pub fn engine_config(&self, access_token: Option<String>) -> EngineConfig {
        EngineConfig {
            center: LngLat::from(self.center),
            zoom: {
                let (min, max) = self.zoom_limits();
                if self.zoom.is_finite() {
                    self.zoom.clamp(min, max)
                } else {
                    DEFAULT_ZOOM.clamp(min, max)
                }
            },
            style: self.style.clone(),
            access_token,
            access_token_env: self.access_token_env.clone(),
            marker_anchor: self.marker_anchor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_concepcion() {
        let options = MapViewOptions::default();

        approx::assert_relative_eq!(options.center[0], -73.0498);
        approx::assert_relative_eq!(options.center[1], -36.8201);
        approx::assert_relative_eq!(options.zoom, 12.0);
        assert_eq!(options.style, "mapbox://styles/mapbox/streets-v12");
    }

    #[test]
    fn partial_toml_falls_back_to_serde_defaults() {
        let toml = r#"
            center = [-70.65, -33.45]
            zoom = 10.0
            style = "custom"
            access_token_env = "MY_TOKEN"
            marker_radius_px = 8.0
            marker_color_active = [0.0, 1.0, 0.0, 1.0]
            marker_color_inactive = [1.0, 0.0, 0.0, 1.0]
            marker_pick_radius_px = 12.0
            marker_anchor = "bottom"
        "#;

        let options: MapViewOptions = toml::from_str(toml).expect("TOML sollte parsebar sein");

        assert_eq!(options.access_token_env, "MY_TOKEN");
        assert_eq!(options.marker_anchor, MarkerAnchor::Bottom);
        approx::assert_relative_eq!(options.zoom_max, ZOOM_MAX);
        assert!(options.entities_path.is_none());
    }

    #[test]
    fn engine_config_clamps_zoom_and_carries_token() {
        let options = MapViewOptions {
            zoom: 40.0,
            ..MapViewOptions::default()
        };

        let config = options.engine_config(Some("pk.test".to_string()));

        approx::assert_relative_eq!(config.zoom, ZOOM_MAX);
        assert_eq!(config.require_access_token(), Ok("pk.test"));
        assert_eq!(config.access_token_env, ACCESS_TOKEN_ENV);
    }

    #[test]
    fn load_from_missing_file_uses_defaults() {
        let options = MapViewOptions::load_from_file(std::path::Path::new("/nonexistent/pinmap.toml"));

        assert_eq!(options, MapViewOptions::default());
    }

    #[test]
    fn inverted_zoom_limits_do_not_panic() {
        let toml = r#"
            center = [-73.0498, -36.8201]
            zoom = 12.0
            zoom_min = 15.0
            zoom_max = 5.0
            style = "mapbox://styles/mapbox/streets-v12"
            access_token_env = "MAPBOX_ACCESS_TOKEN"
            marker_radius_px = 6.0
            marker_color_active = [0.0, 1.0, 0.0, 1.0]
            marker_color_inactive = [1.0, 0.0, 0.0, 1.0]
            marker_pick_radius_px = 14.0
        "#;
        let options: MapViewOptions = toml::from_str(toml).expect("TOML sollte parsebar sein");

        let result = std::panic::catch_unwind(|| options.engine_config(Some("t".to_string())));

        let config = result.expect("engine_config darf nicht paniken");
        approx::assert_relative_eq!(config.zoom, 12.0);
        assert_eq!(options.zoom_limits(), (5.0, 15.0));
    }

    #[test]
    fn load_from_file_swaps_inverted_zoom_limits() {
        let path = std::env::temp_dir().join(format!(
            "pinmap_options_inverted_{}.toml",
            std::process::id()
        ));
        let options = MapViewOptions {
            zoom: 30.0,
            zoom_min: 15.0,
            zoom_max: 5.0,
            ..MapViewOptions::default()
        };
        options.save_to_file(&path).expect("Speichern sollte gelingen");

        let loaded = MapViewOptions::load_from_file(&path);
        let _ = std::fs::remove_file(&path);

        approx::assert_relative_eq!(loaded.zoom_min, 5.0);
        approx::assert_relative_eq!(loaded.zoom_max, 15.0);
        approx::assert_relative_eq!(loaded.engine_config(None).zoom, 15.0);
        assert_eq!(loaded.style, options.style);
    }
}

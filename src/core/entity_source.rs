//! Quelle der Entitätsliste: feste Beispieldaten oder eine JSON-Datei.

use super::Entity;
use anyhow::{bail, Context};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Read-only, geordnete Entitätsliste, einmal pro Session geliefert.
pub trait EntitySource {
    /// Liefert die Entitäten in Anzeige-Reihenfolge.
    fn entities(&self) -> Vec<Entity>;
}

/// In-Memory-Liste als Quelle.
#[derive(Debug, Clone, Default)]
pub struct StaticEntitySource {
    entities: Vec<Entity>,
}

impl StaticEntitySource {
    /// Erstellt eine Quelle aus einer festen Liste.
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    /// Quelle mit den Beispielprofilen aus Concepción.
    pub fn sample() -> Self {
        Self::new(sample_entities())
    }
}

impl EntitySource for StaticEntitySource {
    fn entities(&self) -> Vec<Entity> {
        self.entities.clone()
    }
}

/// JSON-Datei als Quelle.
///
/// Ist die Datei nicht lesbar oder fehlerhaft, liefert die Ersatzquelle.
#[derive(Debug, Clone)]
pub struct JsonEntitySource {
    path: PathBuf,
    fallback: StaticEntitySource,
}

impl JsonEntitySource {
    /// Erstellt eine Quelle für `path` mit Ersatzliste.
    pub fn new(path: impl Into<PathBuf>, fallback: StaticEntitySource) -> Self {
        Self {
            path: path.into(),
            fallback,
        }
    }

    /// Pfad der JSON-Datei
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EntitySource for JsonEntitySource {
    fn entities(&self) -> Vec<Entity> {
        match load_entities_from_json(&self.path) {
            Ok(entities) => entities,
            Err(e) => {
                log::error!("Entitäten konnten nicht geladen werden: {:#}", e);
                self.fallback.entities()
            }
        }
    }
}

/// Wählt die Quelle: JSON-Datei, falls konfiguriert, sonst Beispielprofile.
pub fn entity_source_for(path: Option<&Path>) -> Box<dyn EntitySource> {
    match path {
        Some(path) => Box::new(JsonEntitySource::new(path, StaticEntitySource::sample())),
        None => Box::new(StaticEntitySource::sample()),
    }
}

/// Fünf Beispielprofile rund um Concepción, Chile (aktive und inaktive gemischt).
pub fn sample_entities() -> Vec<Entity> {
    vec![
        Entity::new(
            "m1",
            "Catalina",
            -36.8219,
            -73.0507,
            true,
            "Modelo disponible para sesiones privadas y eventos.",
        ),
        Entity::new(
            "m2",
            "Valentina",
            -36.8126,
            -73.0119,
            false,
            "En pausa temporal, vuelve pronto con nuevas fotos.",
        ),
        Entity::new(
            "m3",
            "Fernanda",
            -36.8294,
            -73.0401,
            true,
            "Acompañante con estilo relajado y trato cercano.",
        ),
        Entity::new(
            "m4",
            "Isidora",
            -36.8327,
            -73.0664,
            false,
            "Disponibilidad limitada durante la semana.",
        ),
        Entity::new(
            "m5",
            "Martina",
            -36.8172,
            -73.0288,
            true,
            "Atención personalizada con ambiente premium.",
        ),
    ]
}

/// Prüft die Eindeutigkeit der IDs.
pub fn validate_unique_ids(entities: &[Entity]) -> anyhow::Result<()> {
    let mut seen = HashSet::with_capacity(entities.len());
    for entity in entities {
        if !seen.insert(entity.id.as_str()) {
            bail!("Doppelte Entitäts-ID: {}", entity.id);
        }
    }
    Ok(())
}

/// Lädt eine Entitätsliste aus einer JSON-Datei (Array von Objekten).
pub fn load_entities_from_json(path: &Path) -> anyhow::Result<Vec<Entity>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Entitäten-Datei nicht lesbar: {}", path.display()))?;
    let entities: Vec<Entity> = serde_json::from_str(&content)
        .with_context(|| format!("Entitäten-Datei fehlerhaft: {}", path.display()))?;
    validate_unique_ids(&entities)?;
    log::info!(
        "{} Entitäten geladen aus: {}",
        entities.len(),
        path.display()
    );
    Ok(entities)
}

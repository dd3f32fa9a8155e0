//! Core-Domänentypen: Entitäten, Marker, Engine-Vertrag.

pub mod engine;
pub mod entity;
pub mod entity_source;
pub mod headless;
pub mod map_marker;

pub use engine::{
    Container, ContainerId, EngineConfig, EngineError, EngineFactory, EngineMarkerId, MapEngine,
    MarkerAnchor, MarkerElement,
};
pub use entity::{Entity, LngLat};
pub use entity_source::{
    entity_source_for, load_entities_from_json, sample_entities, validate_unique_ids,
    EntitySource, JsonEntitySource, StaticEntitySource,
};
pub use headless::{EngineEvent, EngineLog, HeadlessEngine, HeadlessEngineFactory, SharedEngineLog};
pub use map_marker::{MarkerHandle, MarkerVisual, SelectCallback};

//! Pinmap: interaktive Kartenansicht mit Profil-Pins.
//! Core-Funktionalität als Library exportiert für Tests und Wiederverwendung.

pub mod app;
pub mod core;
pub mod map;
pub mod shared;
pub mod ui;

pub use app::{
    AppCommand, AppController, AppIntent, AppState, EngineCapability, SelectionController,
    SelectionState, ViewState,
};
pub use core::{
    Container, EngineConfig, EngineError, EngineFactory, Entity, LngLat, MapEngine, MarkerHandle,
    MarkerVisual,
};
pub use map::{MapLifecycleCoordinator, ResolveOutcome, SessionError, SessionHandle, SessionPhase};
pub use shared::MapViewOptions;

//! Application-Layer: Controller, State, Events und Use-Cases.

pub mod command_log;
pub mod controller;
pub mod events;
pub mod handlers;
mod intent_mapping;
/// Application State und Controller
///
/// Dieses Modul verwaltet den Zustand der Anwendung (Session, Auswahl, View).
pub mod state;
pub mod use_cases;

pub use command_log::CommandLog;
pub use controller::AppController;
pub use events::{AppCommand, AppIntent, EngineCapability, IntentQueue};
pub use state::{AppState, SelectionController, SelectionState, ViewState};

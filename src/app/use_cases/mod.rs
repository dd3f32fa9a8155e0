//! Use-Cases der Application-Layer-Orchestrierung.

pub mod lifecycle;
pub mod selection;
pub mod viewport;

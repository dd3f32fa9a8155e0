//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält die Laufzeit-Optionen, die `app`, `ui` und der Host gemeinsam nutzen.

pub mod options;

pub use options::MapViewOptions;
pub use options::{ACCESS_TOKEN_ENV, DEFAULT_CENTER, DEFAULT_STYLE, DEFAULT_ZOOM};

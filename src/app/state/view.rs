use crate::core::Container;

/// View-bezogener Anwendungszustand
#[derive(Debug, Default)]
pub struct ViewState {
    /// Container, in den die Karte eingehängt ist (None = nicht gemountet)
    pub container: Option<Container>,
    /// Zuletzt gemeldete Containergröße in Pixel
    pub viewport_size: [f32; 2],
    /// Anzahl verarbeiteter Paint-Zyklen
    pub paint_cycles: u64,
    /// Letzte Fehlermeldung für die Statusanzeige
    pub last_error: Option<String>,
}

impl ViewState {
    /// Erstellt den Standard-View-Zustand.
    pub fn new() -> Self {
        Self {
            container: None,
            viewport_size: [0.0, 0.0],
            paint_cycles: 0,
            last_error: None,
        }
    }

    /// Ob die Ansicht gemountet ist
    pub fn is_mounted(&self) -> bool {
        self.container.is_some()
    }
}

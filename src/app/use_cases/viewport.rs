//! Use-Case-Funktionen für Viewport-Zustand.

use crate::app::AppState;

/// Aktualisiert die gespeicherte Containergröße und reicht sie an die Session weiter.
pub fn resize(state: &mut AppState, size: [f32; 2]) {
    state.view.viewport_size = size;
    if let Some(container) = state.view.container.as_mut() {
        container.size = size;
    }
    state.map.on_container_resize(size);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_updates_viewport_size() {
        let mut state = AppState::new();

        resize(&mut state, [1920.0, 1080.0]);

        assert_eq!(state.view.viewport_size, [1920.0, 1080.0]);
    }

    #[test]
    fn resize_without_session_is_harmless() {
        let mut state = AppState::new();

        resize(&mut state, [1.0, 1.0]);
        resize(&mut state, [2.0, 2.0]);

        assert!(state.map.session().is_none());
    }
}

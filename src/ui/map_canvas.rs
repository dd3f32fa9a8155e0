//! Karten-Engine auf einer egui-Zeichenfläche.
//!
//! `CanvasSurface` ist der Container: er wird von der UI gezeichnet und
//! von genau einer `CanvasEngine` bespielt. Die Engine projiziert Pins per
//! Web-Mercator um Zentrum und Zoom, Pan per Drag, Zoom per Mausrad.

use crate::core::{
    Container, EngineConfig, EngineError, EngineFactory, EngineMarkerId, LngLat, MapEngine,
    MarkerElement, MarkerVisual,
};
use crate::shared::MapViewOptions;
use glam::DVec2;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;

/// Kachelgröße der Projektion in Pixeln.
const TILE_SIZE: f64 = 512.0;
/// Hintergrund der Zeichenfläche.
const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(232, 236, 229);
/// Farbe der Gitterlinien.
const GRID_COLOR: egui::Color32 = egui::Color32::from_rgb(214, 219, 210);

/// Projiziert eine Geo-Position auf Weltpixel bei gegebenem Zoom.
pub fn project(position: LngLat, zoom: f64) -> DVec2 {
    let world = TILE_SIZE * 2f64.powf(zoom);
    let lat = position.lat.clamp(-85.051_128, 85.051_128).to_radians();
    let x = (position.lng + 180.0) / 360.0 * world;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * world;
    DVec2::new(x, y)
}

/// Umkehrung von `project`.
pub fn unproject(point: DVec2, zoom: f64) -> LngLat {
    let world = TILE_SIZE * 2f64.powf(zoom);
    let lng = point.x / world * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * point.y / world)).sinh().atan().to_degrees();
    LngLat::new(lng, lat)
}

struct CanvasPin {
    element: MarkerElement,
    position: LngLat,
}

struct CanvasView {
    engine_id: u64,
    center: LngLat,
    zoom: f64,
    style: String,
    measured_size: [f32; 2],
    pins: IndexMap<EngineMarkerId, CanvasPin>,
    next_marker: u64,
    painted: bool,
    first_paint_reported: bool,
}

impl CanvasView {
    fn to_screen(&self, position: LngLat, origin: egui::Pos2) -> egui::Pos2 {
        let offset = project(position, self.zoom) - project(self.center, self.zoom);
        origin + egui::vec2(offset.x as f32, offset.y as f32)
    }

    fn pan_by(&mut self, delta: egui::Vec2) {
        let center = project(self.center, self.zoom) - DVec2::new(delta.x as f64, delta.y as f64);
        self.center = unproject(center, self.zoom);
    }
}

#[derive(Default)]
struct SurfaceState {
    mounted: bool,
    container_size: [f32; 2],
    view: Option<CanvasView>,
    next_engine_id: u64,
}

/// Container der Karte in der egui-Oberfläche.
#[derive(Clone, Default)]
pub struct CanvasSurface(Rc<RefCell<SurfaceState>>);

impl CanvasSurface {
    /// Erstellt eine nicht eingehängte Fläche.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hängt die Fläche ein (Engines können erstellt werden).
    pub fn mount(&self) {
        self.0.borrow_mut().mounted = true;
    }

    /// Hängt die Fläche aus.
    pub fn unmount(&self) {
        self.0.borrow_mut().mounted = false;
    }

    /// Ob die Fläche eingehängt ist
    pub fn is_mounted(&self) -> bool {
        self.0.borrow().mounted
    }

    /// Ob aktuell eine Engine auf der Fläche lebt
    pub fn has_engine(&self) -> bool {
        self.0.borrow().view.is_some()
    }

    /// Anzahl gezeichneter Pins
    pub fn pin_count(&self) -> usize {
        self.0.borrow().view.as_ref().map_or(0, |v| v.pins.len())
    }

    /// Engine-Fähigkeit für diese Fläche.
    pub fn factory(&self) -> CanvasEngineFactory {
        CanvasEngineFactory {
            surface: self.clone(),
        }
    }
}

/// Erstellt `CanvasEngine`s auf einer `CanvasSurface`.
pub struct CanvasEngineFactory {
    surface: CanvasSurface,
}

impl EngineFactory for CanvasEngineFactory {
    fn name(&self) -> &str {
        "egui-canvas"
    }

    fn create(
        &self,
        container: &Container,
        config: &EngineConfig,
    ) -> Result<Box<dyn MapEngine>, EngineError> {
        let mut state = self.surface.0.borrow_mut();
        if !state.mounted {
            return Err(EngineError::ContainerUnavailable(container.id.0.clone()));
        }
        if state.view.is_some() {
            return Err(EngineError::Backend(format!(
                "Container '{}' ist bereits an eine Engine gebunden",
                container.id.0
            )));
        }

        state.next_engine_id += 1;
        let engine_id = state.next_engine_id;
        state.view = Some(CanvasView {
            engine_id,
            center: config.center,
            zoom: config.zoom,
            style: config.style.clone(),
            measured_size: container.size,
            pins: IndexMap::new(),
            next_marker: 0,
            painted: false,
            first_paint_reported: false,
        });
        log::info!(
            "Canvas-Engine {} erstellt (Style {}, Zoom {:.1})",
            engine_id,
            config.style,
            config.zoom
        );

        Ok(Box::new(CanvasEngine {
            surface: self.surface.clone(),
            engine_id,
        }))
    }
}

/// Engine, die auf eine `CanvasSurface` zeichnet.
pub struct CanvasEngine {
    surface: CanvasSurface,
    engine_id: u64,
}

impl CanvasEngine {
    fn with_view<R>(&self, f: impl FnOnce(&mut CanvasView, [f32; 2]) -> R) -> Option<R> {
        let mut state = self.surface.0.borrow_mut();
        let container_size = state.container_size;
        state
            .view
            .as_mut()
            .filter(|view| view.engine_id == self.engine_id)
            .map(|view| f(view, container_size))
    }
}

impl MapEngine for CanvasEngine {
    fn take_first_paint(&mut self) -> bool {
        self.with_view(|view, _| {
            if view.painted && !view.first_paint_reported {
                view.first_paint_reported = true;
                true
            } else {
                false
            }
        })
        .unwrap_or(false)
    }

    fn resize(&mut self) {
        self.with_view(|view, container_size| view.measured_size = container_size);
    }

    fn add_marker(
        &mut self,
        element: MarkerElement,
        position: LngLat,
    ) -> Result<EngineMarkerId, EngineError> {
        self.with_view(|view, _| {
            view.next_marker += 1;
            let id = EngineMarkerId(view.next_marker);
            view.pins.insert(id, CanvasPin { element, position });
            id
        })
        .ok_or_else(|| EngineError::Backend("Engine ist nicht mehr aktiv".to_string()))
    }

    fn remove_marker(&mut self, marker: EngineMarkerId) {
        self.with_view(|view, _| view.pins.shift_remove(&marker));
    }

    fn remove(&mut self) {
        let mut state = self.surface.0.borrow_mut();
        if state
            .view
            .as_ref()
            .is_some_and(|view| view.engine_id == self.engine_id)
        {
            state.view = None;
            log::info!("Canvas-Engine {} freigegeben", self.engine_id);
        }
    }
}

/// Ergebnis eines Canvas-Durchlaufs.
#[derive(Debug, Default)]
pub struct CanvasResponse {
    /// Neue Containergröße, falls sie sich geändert hat
    pub resized: Option<[f32; 2]>,
    /// Angeklickter Pin
    pub clicked_marker: Option<EngineMarkerId>,
    /// Klick auf die Karte außerhalb jedes Pins
    pub clicked_background: bool,
}

fn to_color(rgba: [f32; 4]) -> egui::Color32 {
    egui::Rgba::from_rgba_unmultiplied(rgba[0], rgba[1], rgba[2], rgba[3]).into()
}

/// Zeichnet die Fläche samt Pins und wertet Pan, Zoom und Klicks aus.
pub fn show_map_canvas(
    ui: &mut egui::Ui,
    surface: &CanvasSurface,
    options: &MapViewOptions,
) -> CanvasResponse {
    let (rect, response) =
        ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
    let painter = ui.painter_at(rect);
    let mut out = CanvasResponse::default();

    let mut state = surface.0.borrow_mut();
    let size = [rect.width(), rect.height()];
    if state.container_size != size {
        state.container_size = size;
        out.resized = Some(size);
    }

    painter.rect_filled(rect, 0.0, BACKGROUND);

    let Some(view) = state.view.as_mut() else {
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "Karte wird geladen…",
            egui::FontId::proportional(18.0),
            egui::Color32::DARK_GRAY,
        );
        return out;
    };

    if response.dragged() {
        view.pan_by(response.drag_delta());
    }
    if response.hovered() {
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll != 0.0 {
            let step = options.scroll_zoom_step * f64::from(scroll.signum());
            let (zoom_min, zoom_max) = options.zoom_limits();
            view.zoom = (view.zoom + step).clamp(zoom_min, zoom_max);
        }
    }

    // Die Engine zeichnet in ihre zuletzt gemessene Größe, nicht in den Container.
    let canvas = egui::Rect::from_min_size(
        rect.min,
        egui::vec2(view.measured_size[0], view.measured_size[1]),
    );
    let origin = canvas.center();

    let grid_step = 128.0;
    let offset = project(view.center, view.zoom);
    let shift = egui::vec2(
        (-(offset.x % grid_step)) as f32,
        (-(offset.y % grid_step)) as f32,
    );
    let mut x = canvas.left() + shift.x.rem_euclid(grid_step as f32);
    while x < canvas.right() {
        painter.line_segment(
            [egui::pos2(x, canvas.top()), egui::pos2(x, canvas.bottom())],
            egui::Stroke::new(1.0, GRID_COLOR),
        );
        x += grid_step as f32;
    }
    let mut y = canvas.top() + shift.y.rem_euclid(grid_step as f32);
    while y < canvas.bottom() {
        painter.line_segment(
            [egui::pos2(canvas.left(), y), egui::pos2(canvas.right(), y)],
            egui::Stroke::new(1.0, GRID_COLOR),
        );
        y += grid_step as f32;
    }

    let radius = options.marker_radius_px;
    let click_pos = if response.clicked() {
        response.interact_pointer_pos()
    } else {
        None
    };
    let hover_pos = response.hover_pos();
    let mut closest: Option<(EngineMarkerId, f32)> = None;
    let mut hovered: Option<(egui::Pos2, &str)> = None;

    for (id, pin) in &view.pins {
        let [fx, fy] = pin.element.anchor.offset_factor();
        let center = view.to_screen(pin.position, origin) + egui::vec2(fx, fy) * (radius + 2.0);
        if !canvas.expand(radius * 2.0).contains(center) {
            continue;
        }

        let color = match pin.element.visual {
            MarkerVisual::Active => to_color(options.marker_color_active),
            MarkerVisual::Inactive => to_color(options.marker_color_inactive),
        };
        let tip = [
            center + egui::vec2(-5.0, radius + 1.0),
            center + egui::vec2(5.0, radius + 1.0),
            center + egui::vec2(0.0, radius + 8.0),
        ];
        painter.add(egui::Shape::convex_polygon(
            tip.to_vec(),
            color,
            egui::Stroke::NONE,
        ));
        painter.circle_filled(center, radius, color);
        painter.circle_stroke(center, radius, egui::Stroke::new(2.0, egui::Color32::WHITE));

        if let Some(pos) = click_pos {
            let dist = center.distance(pos);
            if dist <= options.marker_pick_radius_px && closest.is_none_or(|(_, d)| dist < d) {
                closest = Some((*id, dist));
            }
        }
        if hover_pos.is_some_and(|pos| center.distance(pos) <= options.marker_pick_radius_px) {
            hovered = Some((center, pin.element.title.as_str()));
        }
    }

    if let Some((center, title)) = hovered {
        painter.text(
            center + egui::vec2(radius + 6.0, -radius - 6.0),
            egui::Align2::LEFT_BOTTOM,
            title,
            egui::FontId::proportional(13.0),
            egui::Color32::BLACK,
        );
    }

    painter.text(
        rect.right_bottom() + egui::vec2(-8.0, -8.0),
        egui::Align2::RIGHT_BOTTOM,
        format!("{} · z{:.1}", view.style, view.zoom),
        egui::FontId::proportional(11.0),
        egui::Color32::GRAY,
    );

    match closest {
        Some((id, _)) => out.clicked_marker = Some(id),
        None => out.clicked_background = click_pos.is_some(),
    }

    view.painted = true;
    out
}

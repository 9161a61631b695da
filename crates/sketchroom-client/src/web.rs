//! WebAssembly entry point: a `WebClient` the page drives from its `<canvas>`
//! and DOM event handlers.

use kurbo::Point;
use sketchroom_core::{
    ClientConfig, PointerEvent, RoomClient, Rgba, SessionChange, Tool, Viewport, png_data_url,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use crate::params::UrlParams;

/// Read `room`, `name` and `server` from the page's query string, then hash.
pub fn get_url_params() -> UrlParams {
    let Some(window) = web_sys::window() else {
        return UrlParams::default();
    };
    let location = window.location();
    let mut params = UrlParams::default();
    if let Ok(search) = location.search() {
        params.merge(&search);
    }
    if let Ok(hash) = location.hash() {
        params.merge(&hash);
    }
    params
}

/// Server base URL: the `server` param if given, else the page origin.
pub fn get_server_url(server_param: Option<&str>) -> Option<String> {
    if let Some(server) = server_param {
        return Some(server.trim().to_string());
    }
    let location = web_sys::window()?.location();
    let protocol = location.protocol().ok()?;
    let host = location.host().ok()?;
    let ws_protocol = if protocol == "https:" { "wss:" } else { "ws:" };
    Some(format!("{}//{}", ws_protocol, host))
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Browser-facing client bound to one canvas element.
#[wasm_bindgen]
pub struct WebClient {
    client: RoomClient,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Buffer changed since the last blit.
    dirty: bool,
}

#[wasm_bindgen]
impl WebClient {
    /// Bind to the canvas with id `canvas_id`. `room` and `name` fall back to URL params.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, room: Option<String>, name: Option<String>) -> Result<WebClient, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("No document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str("Canvas element not found"))?
            .dyn_into::<HtmlCanvasElement>()?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let params = get_url_params();
        let mut config = ClientConfig::default();
        if let Some(server) = get_server_url(params.server.as_deref()) {
            config.server_url = server;
        }
        if let Some(room) = room.or(params.room) {
            config.room = room;
        }
        if let Some(name) = name.or(params.name) {
            config.name = name;
        }

        let client = RoomClient::new(config);
        let buffer = client.session().canvas().buffer();
        canvas.set_width(buffer.width());
        canvas.set_height(buffer.height());

        Ok(WebClient {
            client,
            canvas,
            ctx,
            dirty: true,
        })
    }

    pub fn connect(&mut self) -> Result<(), JsValue> {
        self.client.connect().map_err(to_js)
    }

    pub fn reconnect(&mut self) -> Result<(), JsValue> {
        self.client.reconnect().map_err(to_js)
    }

    pub fn disconnect(&mut self) {
        self.client.disconnect();
    }

    /// Process network events, flush intents and repaint if needed.
    ///
    /// Returns the kinds of change seen (`canvas`, `round`, `chat`, `connection`)
    /// so the page can refresh just those panels.
    pub fn tick(&mut self) -> Result<js_sys::Array, JsValue> {
        self.client.tick();
        let kinds = js_sys::Array::new();
        let mut seen: Vec<&str> = Vec::new();
        for change in self.client.session_mut().take_changes() {
            let kind = match change {
                SessionChange::Canvas => {
                    self.dirty = true;
                    "canvas"
                }
                SessionChange::Round(_) => "round",
                SessionChange::Chat => "chat",
                SessionChange::Connection(_) => "connection",
            };
            if !seen.contains(&kind) {
                seen.push(kind);
                kinds.push(&JsValue::from_str(kind));
            }
        }
        if self.dirty {
            self.blit()?;
        }
        Ok(kinds)
    }

    fn blit(&mut self) -> Result<(), JsValue> {
        let buffer = self.client.session().canvas().buffer();
        if self.canvas.width() != buffer.width() || self.canvas.height() != buffer.height() {
            self.canvas.set_width(buffer.width());
            self.canvas.set_height(buffer.height());
        }
        let data = buffer.to_rgba8();
        let image = ImageData::new_with_u8_clamped_array_and_sh(Clamped(data.as_slice()), buffer.width(), buffer.height())?;
        self.ctx.put_image_data(&image, 0.0, 0.0)?;
        self.dirty = false;
        Ok(())
    }

    /// The canvas element's CSS size or the device pixel ratio changed.
    pub fn resize(&mut self, css_width: f64, css_height: f64, device_pixel_ratio: f64) {
        let viewport = Viewport::new(css_width, css_height, device_pixel_ratio);
        self.client.session_mut().set_viewport(viewport);
    }

    // Pointer positions are CSS pixels relative to the canvas element.

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.pointer(PointerEvent::Down {
            position: Point::new(x, y),
        });
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.pointer(PointerEvent::Move {
            position: Point::new(x, y),
        });
    }

    pub fn pointer_up(&mut self) {
        self.pointer(PointerEvent::Up);
    }

    pub fn pointer_leave(&mut self) {
        self.pointer(PointerEvent::Leave);
    }

    fn pointer(&mut self, event: PointerEvent) {
        self.client.session_mut().handle_pointer(event);
    }

    /// `"brush"` or `"fill"`.
    pub fn set_tool(&mut self, tool: &str) -> Result<(), JsValue> {
        let tool = match tool {
            "brush" => Tool::Brush,
            "fill" => Tool::Fill,
            other => return Err(JsValue::from_str(&format!("Unknown tool {}", other))),
        };
        self.client.session_mut().set_tool(tool);
        Ok(())
    }

    /// Any CSS hex color or basic color name.
    pub fn set_color(&mut self, color: &str) -> Result<(), JsValue> {
        let color = Rgba::parse(color).map_err(to_js)?;
        self.client.session_mut().set_color(color);
        Ok(())
    }

    pub fn send_chat(&mut self, text: &str) {
        self.client.session_mut().send_chat(text);
    }

    pub fn select_word(&mut self, word: &str) -> bool {
        self.client.session_mut().select_word(word)
    }

    pub fn undo(&mut self) {
        self.client.session_mut().request_undo();
    }

    pub fn clear(&mut self) {
        self.client.session_mut().clear_canvas();
    }

    pub fn is_drawer(&self) -> bool {
        self.client.session().round().is_drawer()
    }

    pub fn connection_state(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.client.connection_state()).map_err(to_js)
    }

    /// Round state (phase, role, hint, timer, leaderboard, word options) as JSON.
    pub fn round_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.client.session().round()).map_err(to_js)
    }

    /// Chat entries, newest first, as JSON.
    pub fn chat_json(&self) -> Result<String, JsValue> {
        let entries: Vec<_> = self.client.session().chat().recent_first().collect();
        serde_json::to_string(&entries).map_err(to_js)
    }

    pub fn leaderboard_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.client.session().round().leaderboard).map_err(to_js)
    }

    /// PNG of the current canvas as a data URL.
    pub fn snapshot_data_url(&self) -> Result<String, JsValue> {
        png_data_url(self.client.session().canvas().buffer()).map_err(to_js)
    }
}

/// Install logging and the panic hook when the module loads.
#[wasm_bindgen(start)]
pub fn run_wasm() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Starting sketchroom (WASM)");

    let params = get_url_params();
    if let Some(room) = &params.room {
        log::info!("Room from URL: {}", room);
    }
    if let Some(server) = &params.server {
        log::info!("Server from URL: {}", server);
    }
}

//! # Code Canvas WASM
//!
//! Browser bindings for the playground. JavaScript owns the UI; this
//! crate owns buffers, composition, the preview iframe and `localStorage`.
//!
//! ```text
//! const canvas = new CodeCanvas(document.getElementById("preview"));
//! canvas.editActive("<h1>Hi</h1>");
//! setInterval(() => {
//!     canvas.tick();
//!     for (const event of JSON.parse(canvas.drainEvents())) render(event);
//! }, 100);
//! ```

mod iframe;
mod logging;
mod storage;
mod window;

pub use iframe::IframeContext;
pub use logging::{ConsoleMakeWriter, ConsoleWriter};
pub use storage::LocalStorage;
pub use window::NewWindowViewer;

use codecanvas_common::{SharedClock, SystemClock};
use codecanvas_editor::EditorTheme;
use codecanvas_persistence::SaveStatus;
use codecanvas_workspace::{Command, KeyPress, Playground, PlaygroundConfig};
use serde::de::DeserializeOwned;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init();
}

fn to_js(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Parse a serde enum from its JSON string name, e.g. `"preview"`
fn parse_name<T: DeserializeOwned>(name: &str) -> Result<T, JsValue> {
    serde_json::from_value(serde_json::Value::String(name.to_string()))
        .map_err(|_| JsValue::from_str(&format!("Unknown value: {name}")))
}

#[wasm_bindgen]
pub struct CodeCanvas {
    playground: Playground<IframeContext, NewWindowViewer, LocalStorage>,
}

#[wasm_bindgen]
impl CodeCanvas {
    /// Mount the preview inside `container`. `config` is optional JSON.
    #[wasm_bindgen(constructor)]
    pub fn new(container: web_sys::Element, config: Option<String>) -> Result<CodeCanvas, JsValue> {
        let config = match config {
            Some(json) => PlaygroundConfig::from_json(&json).map_err(to_js)?,
            None => PlaygroundConfig::default(),
        };

        let storage = LocalStorage::from_window().map_err(to_js)?;
        let clock: SharedClock = Rc::new(SystemClock);

        let playground = Playground::start(
            config,
            IframeContext::new(container),
            NewWindowViewer,
            storage,
            clock,
        )
        .map_err(to_js)?;

        Ok(CodeCanvas { playground })
    }

    /// Apply a command given as JSON, e.g. `{"command": "run"}`
    pub fn dispatch(&mut self, command: &str) -> Result<(), JsValue> {
        let command: Command = serde_json::from_str(command).map_err(to_js)?;
        self.playground.dispatch(command).map_err(to_js)
    }

    #[wasm_bindgen(js_name = selectBuffer)]
    pub fn select_buffer(&mut self, name: String) -> Result<(), JsValue> {
        self.playground
            .dispatch(Command::SelectBuffer { name })
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = editActive)]
    pub fn edit_active(&mut self, text: String) -> Result<(), JsValue> {
        self.playground
            .dispatch(Command::EditActive { text })
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = editBuffer)]
    pub fn edit_buffer(&mut self, name: String, text: String) -> Result<(), JsValue> {
        self.playground
            .dispatch(Command::EditBuffer { name, text })
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = switchTab)]
    pub fn switch_tab(&mut self, tab: &str) -> Result<(), JsValue> {
        let tab = parse_name(tab)?;
        self.playground.dispatch(Command::SwitchTab { tab }).map_err(to_js)
    }

    pub fn run(&mut self) -> Result<(), JsValue> {
        self.playground.dispatch(Command::Run).map_err(to_js)
    }

    #[wasm_bindgen(js_name = changeTheme)]
    pub fn change_theme(&mut self, theme: &str) -> Result<(), JsValue> {
        let theme = parse_name(theme)?;
        self.playground
            .dispatch(Command::ChangeTheme { theme })
            .map_err(to_js)
    }

    /// Returns whether the save succeeded. A failure is also reported
    /// through `save_status_changed` and `notice` events.
    #[wasm_bindgen(js_name = saveNow)]
    pub fn save_now(&mut self) -> Result<bool, JsValue> {
        self.playground.dispatch(Command::SaveNow).map_err(to_js)?;
        Ok(self.playground.save_status() == Some(SaveStatus::Saved))
    }

    #[wasm_bindgen(js_name = openExternal)]
    pub fn open_external(&mut self) -> Result<(), JsValue> {
        self.playground.dispatch(Command::OpenExternal).map_err(to_js)
    }

    #[wasm_bindgen(js_name = clearConsole)]
    pub fn clear_console(&mut self) -> Result<(), JsValue> {
        self.playground.dispatch(Command::ClearConsole).map_err(to_js)
    }

    #[wasm_bindgen(js_name = setViewport)]
    pub fn set_viewport(&mut self, viewport: &str) -> Result<(), JsValue> {
        let viewport = parse_name(viewport)?;
        self.playground
            .dispatch(Command::SetViewport { viewport })
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = dismissError)]
    pub fn dismiss_error(&mut self) -> Result<(), JsValue> {
        self.playground.dispatch(Command::DismissError).map_err(to_js)
    }

    /// Returns true when the key press triggered a command
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(
        &mut self,
        key: String,
        ctrl: bool,
        meta: bool,
        shift: bool,
        alt: bool,
    ) -> Result<bool, JsValue> {
        let press = KeyPress {
            key,
            ctrl,
            meta,
            shift,
            alt,
        };
        self.playground.handle_key(&press).map_err(to_js)
    }

    /// Call periodically from a timer
    pub fn tick(&mut self) {
        self.playground.tick();
    }

    /// Pending events as a JSON array
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.playground.drain_events()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = bufferValue)]
    pub fn buffer_value(&self, name: &str) -> Result<String, JsValue> {
        self.playground
            .buffer_value(name)
            .map(str::to_string)
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = bufferNames)]
    pub fn buffer_names(&self) -> Vec<String> {
        self.playground.buffers().names().map(str::to_string).collect()
    }

    #[wasm_bindgen(js_name = activeBuffer)]
    pub fn active_buffer(&self) -> String {
        self.playground.active_buffer().to_string()
    }

    #[wasm_bindgen(js_name = activeTab)]
    pub fn active_tab(&self) -> String {
        self.playground.active_tab().to_string()
    }

    pub fn theme(&self) -> String {
        self.playground.theme().to_string()
    }

    #[wasm_bindgen(js_name = composedDocument)]
    pub fn composed_document(&self) -> String {
        self.playground.composed_document()
    }

    /// Console log as copyable text
    #[wasm_bindgen(js_name = consoleText)]
    pub fn console_text(&self) -> String {
        self.playground.diagnostics().to_text()
    }

    #[wasm_bindgen(js_name = currentError)]
    pub fn current_error(&self) -> Option<String> {
        self.playground.current_error().map(str::to_string)
    }

    #[wasm_bindgen(js_name = previewState)]
    pub fn preview_state(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.playground.preview_state()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = frameStyle)]
    pub fn frame_style(&self) -> String {
        self.playground.viewport().frame_style()
    }

    #[wasm_bindgen(js_name = lastSaved)]
    pub fn last_saved(&self) -> Option<String> {
        self.playground.last_saved().map(|t| t.to_rfc3339())
    }

    /// Flush pending edits and stop timers, e.g. on `beforeunload`
    pub fn teardown(&mut self) {
        self.playground.teardown();
    }
}

/// Editor widget definition for a theme name, as JSON
#[wasm_bindgen(js_name = themePalette)]
pub fn theme_palette(theme: &str) -> Result<String, JsValue> {
    let theme: EditorTheme = parse_name(theme)?;
    serde_json::to_string(&theme.palette().to_widget_json()).map_err(to_js)
}

/// Names of every selectable theme
#[wasm_bindgen(js_name = themeNames)]
pub fn theme_names() -> Vec<String> {
    EditorTheme::ALL.iter().map(|t| t.as_str().to_string()).collect()
}

//! # Playground
//!
//! Owns one instance of each component and routes host commands:
//!
//! ```text
//! Command ─▶ BufferStore ─┬─▶ CompositionRelay ─▶ ComposedDocument ─▶ SandboxBridge::refresh
//!                         └─▶ AutosaveTrigger ──▶ Debouncer ─(tick)─▶ PersistenceEngine::save_now
//! ```
//!
//! Buffer observers only record what changed. The preview refresh and any
//! due autosave run afterwards on the playground itself, so no component
//! is re-entered while it is mutating.

use crate::{
    ComposedDocument, CompositionRelay, EventQueue, KeyPress, Keymap, NoticeLevel, PlaygroundConfig,
    PlaygroundError, PlaygroundEvent,
};
use chrono::{DateTime, Utc};
use codecanvas_common::SharedClock;
use codecanvas_composer::compose_buffers;
use codecanvas_editor::{
    default_buffers, BufferStore, Buffers, EditorTheme, ViewTab, DEFAULT_ACTIVE_BUFFER,
};
use codecanvas_persistence::{AutosaveTrigger, PersistenceEngine, SaveStatus, Snapshot, Storage};
use codecanvas_preview::{
    BridgeState, DiagnosticLog, ExecutionContext, ExternalViewer, Generation, SandboxBridge,
    Viewport,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Host-issued command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    SelectBuffer { name: String },
    EditActive { text: String },
    EditBuffer { name: String, text: String },
    SwitchTab { tab: ViewTab },
    Run,
    ChangeTheme { theme: EditorTheme },
    SaveNow,
    OpenExternal,
    ClearConsole,
    SetViewport { viewport: Viewport },
    DismissError,
}

pub struct Playground<C, V, S> {
    config: PlaygroundConfig,
    store: BufferStore,
    document: ComposedDocument,
    bridge: SandboxBridge<C, EventQueue>,
    persistence: PersistenceEngine<S>,
    viewer: V,
    keymap: Keymap,
    events: EventQueue,
    active_tab: ViewTab,
    theme: EditorTheme,
    torn_down: bool,
}

impl<C, V, S> Playground<C, V, S>
where
    C: ExecutionContext,
    V: ExternalViewer,
    S: Storage,
{
    /// Restore saved state (or the default template) and render it
    pub fn start(
        config: PlaygroundConfig,
        context: C,
        viewer: V,
        storage: S,
        clock: SharedClock,
    ) -> Result<Self, PlaygroundError> {
        config.validate()?;

        let persistence = PersistenceEngine::new(
            storage,
            config.storage.clone(),
            clock.clone(),
            config.autosave_delay(),
        );

        let template = default_buffers();
        let buffers = match persistence.restore() {
            Some(snapshot) => {
                info!(buffers = snapshot.buffers.len(), "Restored saved buffers");
                snapshot.apply_to(&template)
            }
            None => template,
        };
        let preferences = persistence.restore_preferences();

        let active = resolve_active(&buffers, preferences.active_buffer);
        let mut store = BufferStore::new(buffers, &active)?;

        let events = EventQueue::default();
        let document =
            ComposedDocument::new(compose_buffers(store.buffers(), &config.placeholders));

        store.subscribe(Box::new(CompositionRelay::new(
            config.placeholders.clone(),
            document.clone(),
            events.clone(),
        )));
        store.subscribe(Box::new(AutosaveTrigger::new(persistence.debouncer())));

        let bridge = SandboxBridge::new(context, events.clone(), clock)
            .with_policy(config.sandbox.clone())
            .with_loading_floor(config.loading_floor());

        let mut playground = Self {
            active_tab: preferences.active_tab.unwrap_or_default(),
            theme: preferences.theme.unwrap_or(config.default_theme),
            config,
            store,
            document,
            bridge,
            persistence,
            viewer,
            keymap: Keymap::default(),
            events,
            torn_down: false,
        };

        info!(
            active = %playground.store.get_active(),
            tab = %playground.active_tab,
            theme = %playground.theme,
            "Playground started"
        );

        // Failures land in the current error surface
        let _ = playground.render();
        Ok(playground)
    }

    /// Apply one host command
    pub fn dispatch(&mut self, command: Command) -> Result<(), PlaygroundError> {
        if self.torn_down {
            return Err(PlaygroundError::TornDown);
        }
        debug!(?command, "Dispatch");

        match command {
            Command::SelectBuffer { name } => {
                self.store.set_active(&name)?;
                let _ = self.persistence.persist_active_buffer(&name);
                self.events.push(PlaygroundEvent::ActiveBufferChanged { name });
            }
            Command::EditActive { text } => {
                self.store.set_active_value(text)?;
                self.refresh_if_stale()?;
            }
            Command::EditBuffer { name, text } => {
                self.store.set_buffer_value(&name, text)?;
                self.refresh_if_stale()?;
            }
            Command::SwitchTab { tab } => {
                self.active_tab = tab;
                let _ = self.persistence.persist_active_tab(tab);
                self.events.push(PlaygroundEvent::TabChanged { tab });
            }
            Command::Run => {
                self.render()?;
            }
            Command::ChangeTheme { theme } => {
                self.theme = theme;
                let _ = self.persistence.persist_theme(theme);
                self.events.push(PlaygroundEvent::ThemeChanged { theme });
            }
            Command::SaveNow => {
                self.save();
            }
            Command::OpenExternal => {
                self.bridge.open_external(&mut self.viewer)?;
            }
            Command::ClearConsole => {
                self.bridge.clear_diagnostics();
                self.events.push(PlaygroundEvent::ConsoleCleared);
            }
            Command::SetViewport { viewport } => {
                self.bridge.set_viewport(viewport);
            }
            Command::DismissError => {
                self.bridge.dismiss_error();
            }
        }

        Ok(())
    }

    /// Run the command bound to a key press. Returns whether one matched.
    pub fn handle_key(&mut self, press: &KeyPress) -> Result<bool, PlaygroundError> {
        let Some(command) = self.keymap.resolve(press).cloned() else {
            return Ok(false);
        };
        self.dispatch(command)?;
        Ok(true)
    }

    /// Collect preview events, end the loading floor and run a due autosave
    pub fn tick(&mut self) {
        if self.torn_down {
            return;
        }

        self.bridge.tick();

        if self.persistence.autosave_due() {
            debug!("Autosave due");
            self.save();
        }
    }

    /// Take every event produced since the last call, in order
    pub fn drain_events(&mut self) -> Vec<PlaygroundEvent> {
        self.events.drain()
    }

    /// Save pending edits (best effort) and stop all timers
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }

        let snapshot = self.snapshot();
        if let Some(result) = self.persistence.flush(&snapshot) {
            self.forward_save_status();
            if let Err(e) = result {
                warn!(error = %e, "Pending changes could not be saved on teardown");
            }
        }
        self.persistence.cancel_autosave();
        self.torn_down = true;
        info!("Playground torn down");
    }

    fn render(&mut self) -> Result<Generation, PlaygroundError> {
        let text = compose_buffers(self.store.buffers(), &self.config.placeholders);
        self.document.update(text);
        self.document.take_stale();
        Ok(self.bridge.refresh(&self.document.text())?)
    }

    fn refresh_if_stale(&mut self) -> Result<(), PlaygroundError> {
        if self.document.take_stale() {
            self.bridge.refresh(&self.document.text())?;
        }
        Ok(())
    }

    /// Storage failures are reported through status events and a notice
    fn save(&mut self) -> Option<DateTime<Utc>> {
        let snapshot = self.snapshot();
        let result = self.persistence.save_now(&snapshot);
        self.forward_save_status();

        let notice = match &result {
            Ok(_) => (NoticeLevel::Success, "All changes saved".to_string()),
            Err(e) => (NoticeLevel::Failure, format!("Could not save changes: {e}")),
        };
        self.events.push(PlaygroundEvent::Notice {
            level: notice.0,
            message: notice.1,
        });

        result.ok()
    }

    fn forward_save_status(&mut self) {
        for status in self.persistence.drain_status_changes() {
            self.events.push(PlaygroundEvent::SaveStatusChanged { status });
        }
    }

    /// Current state as it would be saved
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(
            self.store.buffers(),
            self.store.get_active(),
            self.active_tab,
            self.theme,
        )
    }

    pub fn buffers(&self) -> &Buffers {
        self.store.buffers()
    }

    pub fn buffer_value(&self, name: &str) -> Result<&str, PlaygroundError> {
        Ok(self.store.get_buffer(name)?.value.as_str())
    }

    pub fn active_buffer(&self) -> &str {
        self.store.get_active()
    }

    pub fn active_tab(&self) -> ViewTab {
        self.active_tab
    }

    pub fn theme(&self) -> EditorTheme {
        self.theme
    }

    pub fn composed_document(&self) -> String {
        self.document.text()
    }

    pub fn diagnostics(&self) -> &DiagnosticLog {
        self.bridge.diagnostics()
    }

    pub fn current_error(&self) -> Option<&str> {
        self.bridge.current_error()
    }

    pub fn preview_state(&self) -> BridgeState {
        self.bridge.state()
    }

    pub fn viewport(&self) -> Viewport {
        self.bridge.viewport()
    }

    pub fn save_status(&self) -> Option<SaveStatus> {
        self.persistence.status()
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.persistence.last_saved()
    }

    pub fn has_pending_autosave(&self) -> bool {
        self.persistence.has_pending_autosave()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn config(&self) -> &PlaygroundConfig {
        &self.config
    }

    pub fn keymap_mut(&mut self) -> &mut Keymap {
        &mut self.keymap
    }

    pub fn bridge(&self) -> &SandboxBridge<C, EventQueue> {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut SandboxBridge<C, EventQueue> {
        &mut self.bridge
    }

    pub fn persistence(&self) -> &PersistenceEngine<S> {
        &self.persistence
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }
}

/// Saved active buffer if it still exists, otherwise the default one
fn resolve_active(buffers: &Buffers, saved: Option<String>) -> String {
    match saved {
        Some(name) if buffers.contains(&name) => name,
        Some(name) => {
            warn!(buffer = %name, "Saved active buffer no longer exists");
            DEFAULT_ACTIVE_BUFFER.to_string()
        }
        None => DEFAULT_ACTIVE_BUFFER.to_string(),
    }
}

//! Host-facing notifications

use codecanvas_editor::{EditorTheme, Language, ViewTab};
use codecanvas_persistence::SaveStatus;
use codecanvas_preview::{DiagnosticEntry, DiagnosticSink, Generation};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Tone of a transient notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Failure,
}

/// Something the host should tell the user about
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaygroundEvent {
    BufferChanged { name: String, language: Language },
    ActiveBufferChanged { name: String },
    TabChanged { tab: ViewTab },
    ThemeChanged { theme: EditorTheme },
    SaveStatusChanged { status: SaveStatus },
    DiagnosticAppended { entry: DiagnosticEntry },
    ConsoleCleared,
    CurrentErrorChanged { error: Option<String> },
    PreviewReady { generation: Generation },

    /// Transient, dismissible message
    Notice { level: NoticeLevel, message: String },
}

/// Shared FIFO of events, filled by the playground and its observers
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Rc<RefCell<Vec<PlaygroundEvent>>>,
}

impl EventQueue {
    pub fn push(&self, event: PlaygroundEvent) {
        self.events.borrow_mut().push(event);
    }

    pub fn drain(&self) -> Vec<PlaygroundEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl DiagnosticSink for EventQueue {
    fn diagnostic_appended(&mut self, entry: &DiagnosticEntry) {
        self.push(PlaygroundEvent::DiagnosticAppended {
            entry: entry.clone(),
        });
    }

    fn current_error_changed(&mut self, error: Option<&str>) {
        self.push(PlaygroundEvent::CurrentErrorChanged {
            error: error.map(str::to_string),
        });
    }

    fn preview_ready(&mut self, generation: Generation) {
        self.push(PlaygroundEvent::PreviewReady { generation });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_one_queue() {
        let queue = EventQueue::default();
        let mut sink = queue.clone();

        sink.current_error_changed(Some("boom"));
        sink.preview_ready(Generation(1));

        assert_eq!(queue.len(), 2);
        let drained = queue.drain();
        assert_eq!(
            drained[0],
            PlaygroundEvent::CurrentErrorChanged {
                error: Some("boom".to_string())
            }
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = PlaygroundEvent::SaveStatusChanged {
            status: SaveStatus::Saved,
        };
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["type"], "save_status_changed");
        assert_eq!(value["status"], "saved");
    }
}

//! Buffer store observer that keeps the composed document current

use crate::{EventQueue, PlaygroundEvent};
use codecanvas_composer::{compose_buffers, Placeholders};
use codecanvas_editor::{Buffer, BufferObserver, Buffers};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::trace;

/// Latest composed document plus a flag set when its text changed
#[derive(Debug, Clone, Default)]
pub struct ComposedDocument {
    text: Rc<RefCell<String>>,
    stale_preview: Rc<Cell<bool>>,
}

impl ComposedDocument {
    pub fn new(text: String) -> Self {
        Self {
            text: Rc::new(RefCell::new(text)),
            stale_preview: Rc::new(Cell::new(false)),
        }
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    /// Store a new composition, flagging the preview if the text differs
    pub fn update(&self, text: String) -> bool {
        let mut current = self.text.borrow_mut();
        if *current == text {
            return false;
        }
        *current = text;
        self.stale_preview.set(true);
        true
    }

    /// Clear and return the stale flag
    pub fn take_stale(&self) -> bool {
        self.stale_preview.replace(false)
    }
}

/// Recomposes on every edit and reports the edit to the host
pub struct CompositionRelay {
    placeholders: Placeholders,
    document: ComposedDocument,
    events: EventQueue,
}

impl CompositionRelay {
    pub fn new(placeholders: Placeholders, document: ComposedDocument, events: EventQueue) -> Self {
        Self {
            placeholders,
            document,
            events,
        }
    }
}

impl BufferObserver for CompositionRelay {
    fn buffer_changed(&mut self, changed: &Buffer, buffers: &Buffers) {
        self.events.push(PlaygroundEvent::BufferChanged {
            name: changed.name.clone(),
            language: changed.language,
        });

        let recomposed = self.document.update(compose_buffers(buffers, &self.placeholders));
        trace!(buffer = %changed.name, recomposed, "Composition refreshed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codecanvas_editor::{BufferStore, CSS_BUFFER};

    #[test]
    fn test_only_text_changes_mark_preview_stale() {
        let mut store = BufferStore::with_default_template();
        let placeholders = Placeholders::default();
        let document = ComposedDocument::new(compose_buffers(store.buffers(), &placeholders));
        let events = EventQueue::default();
        store.subscribe(Box::new(CompositionRelay::new(
            placeholders,
            document.clone(),
            events.clone(),
        )));

        let css = store.get_buffer(CSS_BUFFER).unwrap().value.clone();
        store.set_buffer_value(CSS_BUFFER, css).unwrap();
        assert!(!document.take_stale());

        store.set_buffer_value(CSS_BUFFER, "body { margin: 0; }").unwrap();
        assert!(document.take_stale());
        assert!(!document.take_stale());
        assert!(document.text().contains("body { margin: 0; }"));

        assert_eq!(events.drain().len(), 2);
    }
}

//! Integration tests for editor crate

use codecanvas_editor::{
    Buffer, BufferObserver, BufferStore, Buffers, EditorError, Language, ViewTab, CSS_BUFFER,
    HTML_BUFFER, JS_BUFFER,
};
use std::cell::Cell;
use std::rc::Rc;

struct Counter(Rc<Cell<usize>>);

impl BufferObserver for Counter {
    fn buffer_changed(&mut self, _changed: &Buffer, _buffers: &Buffers) {
        self.0.set(self.0.get() + 1);
    }
}

#[test]
fn test_default_store_lifecycle() -> anyhow::Result<()> {
    let mut store = BufferStore::with_default_template();

    let names: Vec<&str> = store.buffers().names().collect();
    assert_eq!(names, vec![HTML_BUFFER, CSS_BUFFER, JS_BUFFER]);
    assert_eq!(store.get_buffer(JS_BUFFER)?.language, Language::Javascript);

    store.set_active(JS_BUFFER)?;
    store.set_active_value("console.log('hi')")?;

    assert_eq!(store.get_buffer(JS_BUFFER)?.value, "console.log('hi')");
    Ok(())
}

#[test]
fn test_every_observer_is_notified_per_edit() -> anyhow::Result<()> {
    let first = Rc::new(Cell::new(0));
    let second = Rc::new(Cell::new(0));

    let mut store = BufferStore::with_default_template();
    store.subscribe(Box::new(Counter(first.clone())));
    store.subscribe(Box::new(Counter(second.clone())));

    store.set_buffer_value(CSS_BUFFER, "a")?;
    store.set_buffer_value(CSS_BUFFER, "ab")?;
    store.set_buffer_value(HTML_BUFFER, "<b></b>")?;

    assert_eq!(first.get(), 3);
    assert_eq!(second.get(), 3);
    Ok(())
}

#[test]
fn test_custom_buffer_set() -> anyhow::Result<()> {
    let buffers = Buffers::new(vec![
        Buffer::new("page.html", Language::Html, ""),
        Buffer::new("theme.css", Language::Css, ""),
    ])?;
    let mut store = BufferStore::new(buffers, "theme.css")?;

    assert_eq!(store.get_active(), "theme.css");
    assert_eq!(
        store.set_buffer_value(JS_BUFFER, "x"),
        Err(EditorError::UnknownBuffer(JS_BUFFER.to_string()))
    );
    Ok(())
}

#[test]
fn test_view_tab_parsing() {
    assert_eq!("preview".parse::<ViewTab>().unwrap(), ViewTab::Preview);
    assert_eq!(ViewTab::default(), ViewTab::Code);
    assert!("split".parse::<ViewTab>().is_err());
}

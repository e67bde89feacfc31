//! Integration tests for composition over buffer sets

use codecanvas_composer::{compose_buffers, Placeholders};
use codecanvas_editor::{BufferStore, CSS_BUFFER, HTML_BUFFER, JS_BUFFER};

fn placeholders() -> Placeholders {
    Placeholders {
        css: "/*CSS*/".to_string(),
        js: "//JS".to_string(),
    }
}

#[test]
fn test_composition_is_pure_and_repeatable() {
    let mut store = BufferStore::with_default_template();
    store.set_buffer_value(HTML_BUFFER, "<style>/*CSS*/</style><script>//JS</script>").unwrap();
    store.set_buffer_value(CSS_BUFFER, "h1{}").unwrap();
    store.set_buffer_value(JS_BUFFER, "start()").unwrap();

    let first = compose_buffers(store.buffers(), &placeholders());
    let second = compose_buffers(store.buffers(), &placeholders());

    assert_eq!(first, second);
    assert_eq!(first, "<style>h1{}</style><script>start()</script>");
}

#[test]
fn test_html_without_placeholders_is_unchanged() {
    let mut store = BufferStore::with_default_template();
    store.set_buffer_value(HTML_BUFFER, "<main></main>").unwrap();

    let out = compose_buffers(store.buffers(), &placeholders());

    assert_eq!(out, "<main></main>");
}

#[test]
fn test_js_marker_inside_css_text_is_consumed_first() {
    // CSS is injected before the JS lookup runs, so a JS marker carried in
    // the CSS text is the first occurrence the JS pass sees.
    let mut store = BufferStore::with_default_template();
    store.set_buffer_value(HTML_BUFFER, "/*CSS*/|//JS").unwrap();
    store.set_buffer_value(CSS_BUFFER, "a{} //JS").unwrap();
    store.set_buffer_value(JS_BUFFER, "run()").unwrap();

    let out = compose_buffers(store.buffers(), &placeholders());

    assert_eq!(out, "a{} run()|//JS");
}

#[test]
fn test_placeholders_deserialize_with_defaults() {
    let parsed: Placeholders = serde_json::from_str(r#"{ "css": "/*CSS*/" }"#).unwrap();

    assert_eq!(parsed.css, "/*CSS*/");
    assert_eq!(parsed.js, Placeholders::default().js);
}

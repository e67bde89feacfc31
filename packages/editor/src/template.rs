//! Starter content used when no saved state exists

use crate::{Buffer, Buffers, Language};

pub const HTML_BUFFER: &str = "index.html";
pub const CSS_BUFFER: &str = "style.css";
pub const JS_BUFFER: &str = "script.js";

/// Buffer selected on a fresh start
pub const DEFAULT_ACTIVE_BUFFER: &str = HTML_BUFFER;

const DEFAULT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Code Canvas - Live Preview</title>
    <style id="custom-styles">
        /* Your CSS will be injected here */
    </style>
</head>
<body>
    <h1>Hello World!</h1>
    <script id="custom-script">
        // Your JavaScript will be injected here
    </script>
</body>
</html>"#;

const DEFAULT_CSS: &str = r#"/* Code Canvas Styles */
body {
    font-family: 'Inter', -apple-system, BlinkMacSystemFont, sans-serif;
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}
"#;

const DEFAULT_JS: &str = "// Code Canvas JavaScript\n";

/// The three starter buffers, in display order
pub fn default_buffers() -> Buffers {
    let items = vec![
        Buffer::new(HTML_BUFFER, Language::Html, DEFAULT_HTML),
        Buffer::new(CSS_BUFFER, Language::Css, DEFAULT_CSS),
        Buffer::new(JS_BUFFER, Language::Javascript, DEFAULT_JS),
    ];

    Buffers::from_unique(items)
}

use codecanvas_editor::{Buffers, Language};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_CSS_PLACEHOLDER: &str = "/* Your CSS will be injected here */";
pub const DEFAULT_JS_PLACEHOLDER: &str = "// Your JavaScript will be injected here";

/// Marker strings replaced by buffer contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placeholders {
    pub css: String,
    pub js: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            css: DEFAULT_CSS_PLACEHOLDER.to_string(),
            js: DEFAULT_JS_PLACEHOLDER.to_string(),
        }
    }
}

/// The three texts a composition reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sources<'a> {
    pub html: &'a str,
    pub css: &'a str,
    pub js: &'a str,
}

impl<'a> Sources<'a> {
    /// Pick the first HTML, CSS and JavaScript buffer of a set.
    /// A missing language reads as empty text.
    pub fn from_buffers(buffers: &'a Buffers) -> Self {
        let text = move |language| {
            buffers
                .by_language(language)
                .map(|b| b.value.as_str())
                .unwrap_or("")
        };

        Self {
            html: text(Language::Html),
            css: text(Language::Css),
            js: text(Language::Javascript),
        }
    }
}

/// Result of a composition with injection bookkeeping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    pub document: String,
    pub css_injected: bool,
    pub js_injected: bool,
}

/// Compose with bookkeeping about which placeholders were found
pub fn compose_sources(sources: &Sources<'_>, placeholders: &Placeholders) -> Composition {
    let (with_css, css_injected) = replace_first(sources.html, &placeholders.css, sources.css);
    let (document, js_injected) = replace_first(&with_css, &placeholders.js, sources.js);

    debug!(css_injected, js_injected, bytes = document.len(), "Composed preview document");

    Composition {
        document,
        css_injected,
        js_injected,
    }
}

/// Compose a preview document from raw texts
pub fn compose(html: &str, css: &str, js: &str, placeholders: &Placeholders) -> String {
    compose_sources(&Sources { html, css, js }, placeholders).document
}

/// Compose a preview document from a buffer set
pub fn compose_buffers(buffers: &Buffers, placeholders: &Placeholders) -> String {
    compose_sources(&Sources::from_buffers(buffers), placeholders).document
}

/// Verbatim replacement of the first occurrence. An empty marker never matches.
fn replace_first(haystack: &str, marker: &str, replacement: &str) -> (String, bool) {
    if marker.is_empty() || !haystack.contains(marker) {
        return (haystack.to_string(), false);
    }
    (haystack.replacen(marker, replacement, 1), true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers(css: &str, js: &str) -> Placeholders {
        Placeholders {
            css: css.to_string(),
            js: js.to_string(),
        }
    }

    #[test]
    fn test_css_substitution() {
        let out = compose(
            "<style>/*CSS*/</style>",
            "body{color:red}",
            "",
            &markers("/*CSS*/", "//JS"),
        );
        assert_eq!(out, "<style>body{color:red}</style>");
    }

    #[test]
    fn test_only_first_occurrence_is_replaced() {
        let out = compose("/*CSS*/ /*CSS*/", "x", "", &markers("/*CSS*/", "//JS"));
        assert_eq!(out, "x /*CSS*/");
    }

    #[test]
    fn test_missing_placeholder_skips_injection() {
        let placeholders = markers("/*CSS*/", "//JS");
        let result = compose_sources(
            &Sources {
                html: "<script>//JS</script>",
                css: "body{}",
                js: "go()",
            },
            &placeholders,
        );

        assert_eq!(result.document, "<script>go()</script>");
        assert!(!result.css_injected);
        assert!(result.js_injected);
    }

    #[test]
    fn test_replacement_text_is_verbatim() {
        // `$&` and backslashes must not be treated as replacement patterns
        let out = compose(
            "[/*CSS*/]",
            "a::after{content:'$&\\1'}",
            "",
            &markers("/*CSS*/", "//JS"),
        );
        assert_eq!(out, "[a::after{content:'$&\\1'}]");
    }

    #[test]
    fn test_empty_marker_never_matches() {
        let out = compose("<p></p>", "x", "y", &markers("", ""));
        assert_eq!(out, "<p></p>");
    }

    #[test]
    fn test_default_placeholders_match_template() {
        let buffers = codecanvas_editor::default_buffers();
        let result = compose_sources(&Sources::from_buffers(&buffers), &Placeholders::default());

        assert!(result.css_injected);
        assert!(result.js_injected);
        assert!(result.document.contains("/* Code Canvas Styles */"));
        assert!(result.document.contains("// Code Canvas JavaScript"));
    }
}

use crate::storage::describe;
use codecanvas_preview::{ExternalViewer, PreviewError};
use js_sys::Array;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlDocument;

/// Opens the document in a new browser tab, with no bridge attached
#[derive(Debug, Default)]
pub struct NewWindowViewer;

impl ExternalViewer for NewWindowViewer {
    fn open(&mut self, document: &str) -> Result<(), PreviewError> {
        let host =
            web_sys::window().ok_or_else(|| PreviewError::ExternalView("no window".to_string()))?;

        let opened = host
            .open()
            .map_err(|e| PreviewError::ExternalView(describe(&e)))?
            .ok_or_else(|| PreviewError::ExternalView("blocked by the browser".to_string()))?;

        let target = opened
            .document()
            .ok_or_else(|| PreviewError::ExternalView("new window has no document".to_string()))?
            .dyn_into::<HtmlDocument>()
            .map_err(|_| {
                PreviewError::ExternalView("new window has no HTML document".to_string())
            })?;

        target
            .open()
            .map_err(|e| PreviewError::ExternalView(describe(&e)))?;
        target
            .write(&Array::of1(&JsValue::from_str(document)))
            .map_err(|e| PreviewError::ExternalView(describe(&e)))?;
        target
            .close()
            .map_err(|e| PreviewError::ExternalView(describe(&e)))
    }
}

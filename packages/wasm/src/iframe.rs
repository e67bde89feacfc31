//! # Iframe Context
//!
//! [`ExecutionContext`] backed by a sandboxed `<iframe>`. Every reset
//! replaces the iframe element, which gives the preview a new window,
//! document and global scope. Callbacks registered on a window are
//! dropped together with it.

use crate::storage::describe;
use codecanvas_preview::{
    ContextEvent, ExecutionContext, Generation, PreviewError, SandboxPolicy, Severity,
};
use js_sys::{Array, Function, Reflect};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlDocument, HtmlIFrameElement, Window};

/// Builds a console method that forwards its joined arguments, then
/// performs the original call
const CONSOLE_WRAPPER: &str = r#"
return function (...args) {
    forward(args.map(function (value) {
        if (typeof value === 'object' && value !== null) {
            try { return JSON.stringify(value); } catch (_) { return String(value); }
        }
        return String(value);
    }).join(' '));
    return original.apply(this, args);
};
"#;

type ErrorHandler = Closure<dyn FnMut(JsValue, JsValue, JsValue, JsValue, JsValue) -> bool>;

pub struct IframeContext {
    /// Element the iframe is mounted in
    container: Element,
    frame: Option<HtmlIFrameElement>,
    generation: Generation,
    queue: Rc<RefCell<Vec<ContextEvent>>>,

    forwarders: Vec<Closure<dyn FnMut(String)>>,
    error_handler: Option<ErrorHandler>,
    rejection_handler: Option<Closure<dyn FnMut(Event)>>,
}

impl IframeContext {
    pub fn new(container: Element) -> Self {
        Self {
            container,
            frame: None,
            generation: Generation::default(),
            queue: Rc::new(RefCell::new(Vec::new())),
            forwarders: Vec::new(),
            error_handler: None,
            rejection_handler: None,
        }
    }

    pub fn frame(&self) -> Option<&HtmlIFrameElement> {
        self.frame.as_ref()
    }

    fn window(&self) -> Result<Window, PreviewError> {
        self.frame
            .as_ref()
            .and_then(|f| f.content_window())
            .ok_or_else(|| {
                PreviewError::ContextUnavailable("preview frame has no window".to_string())
            })
    }

    fn unmount(&mut self) {
        if let Some(frame) = self.frame.take() {
            frame.remove();
        }
        self.forwarders.clear();
        self.error_handler = None;
        self.rejection_handler = None;
    }
}

impl ExecutionContext for IframeContext {
    fn reset(
        &mut self,
        generation: Generation,
        policy: &SandboxPolicy,
    ) -> Result<(), PreviewError> {
        self.unmount();
        self.generation = generation;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| PreviewError::ContextUnavailable("no host document".to_string()))?;

        let frame: HtmlIFrameElement = document
            .create_element("iframe")
            .map_err(|e| PreviewError::ContextUnavailable(describe(&e)))?
            .dyn_into()
            .map_err(|_| {
                PreviewError::ContextUnavailable("created element is not an iframe".to_string())
            })?;

        frame
            .set_attribute("sandbox", &policy.attribute())
            .map_err(|e| PreviewError::ContextUnavailable(describe(&e)))?;
        frame.set_title("Preview");

        self.container
            .append_child(&frame)
            .map_err(|e| PreviewError::ContextUnavailable(describe(&e)))?;

        self.frame = Some(frame);
        Ok(())
    }

    fn install_console_bridge(&mut self, generation: Generation) -> Result<(), PreviewError> {
        let window = self.window()?;
        let console = Reflect::get(&window, &JsValue::from_str("console")).map_err(script_error)?;
        let factory = Function::new_with_args("original, forward", CONSOLE_WRAPPER);

        for severity in Severity::ALL {
            let method = JsValue::from_str(severity.method());
            let original = Reflect::get(&console, &method).map_err(script_error)?;

            let queue = self.queue.clone();
            let forward = Closure::wrap(Box::new(move |message: String| {
                queue.borrow_mut().push(ContextEvent::Console {
                    generation,
                    severity,
                    message,
                });
            }) as Box<dyn FnMut(String)>);

            let wrapper = factory
                .call2(&JsValue::NULL, &original, forward.as_ref())
                .map_err(script_error)?;
            Reflect::set(&console, &method, &wrapper).map_err(script_error)?;

            self.forwarders.push(forward);
        }

        Ok(())
    }

    fn install_error_handlers(&mut self, generation: Generation) -> Result<(), PreviewError> {
        let window = self.window()?;

        let queue = self.queue.clone();
        let on_error: ErrorHandler = Closure::wrap(Box::new(
            move |message: JsValue,
                  _source: JsValue,
                  line: JsValue,
                  _column: JsValue,
                  _error: JsValue| {
                queue.borrow_mut().push(ContextEvent::RuntimeError {
                    generation,
                    message: message.as_string().unwrap_or_else(|| describe(&message)),
                    line: line.as_f64().unwrap_or(0.0) as u32,
                });
                // Handled: keep it out of the host console
                true
            },
        )
            as Box<dyn FnMut(JsValue, JsValue, JsValue, JsValue, JsValue) -> bool>);
        window.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        let queue = self.queue.clone();
        let on_rejection = Closure::wrap(Box::new(move |event: Event| {
            let reason =
                Reflect::get(&event, &JsValue::from_str("reason")).unwrap_or(JsValue::UNDEFINED);
            queue.borrow_mut().push(ContextEvent::UnhandledRejection {
                generation,
                reason: display(&reason),
            });
        }) as Box<dyn FnMut(Event)>);
        window
            .add_event_listener_with_callback(
                "unhandledrejection",
                on_rejection.as_ref().unchecked_ref(),
            )
            .map_err(script_error)?;

        self.error_handler = Some(on_error);
        self.rejection_handler = Some(on_rejection);
        Ok(())
    }

    fn write_document(&mut self, document: &str) -> Result<(), PreviewError> {
        let target = self
            .frame
            .as_ref()
            .and_then(|f| f.content_document())
            .ok_or_else(|| {
                PreviewError::ContextUnavailable("preview document is not accessible".to_string())
            })?
            .dyn_into::<HtmlDocument>()
            .map_err(|_| {
                PreviewError::ContextUnavailable("preview document is not HTML".to_string())
            })?;

        target.open().map_err(script_error)?;
        target
            .write(&Array::of1(&JsValue::from_str(document)))
            .map_err(script_error)?;
        target.close().map_err(script_error)
    }

    fn drain_events(&mut self) -> Vec<ContextEvent> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }
}

impl Drop for IframeContext {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn script_error(error: JsValue) -> PreviewError {
    PreviewError::Script(describe(&error))
}

/// `String(value)` semantics for rejection reasons
fn display(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if value.is_undefined() {
        return "undefined".to_string();
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.to_string());
    }
    describe(value)
}

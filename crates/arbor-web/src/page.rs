//! Host page bindings: input fields, trigger button, output elements

use arbor_core::config::PageConfig;
use arbor_core::{OutputSink, RawReading};
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlInputElement, HtmlTextAreaElement};

#[derive(Error, Debug)]
pub enum PageError {
    #[error("no browser window available")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("host page is missing element #{id}")]
    MissingElement { id: String },
    #[error("DOM operation failed on #{id}: {reason}")]
    Dom { id: String, reason: String },
}

/// The page hosting the viewer, addressed through configured element ids
pub struct HostPage {
    document: Document,
    ids: PageConfig,
}

impl HostPage {
    pub fn from_window(ids: PageConfig) -> Result<Self, PageError> {
        let window = web_sys::window().ok_or(PageError::NoWindow)?;
        let document = window.document().ok_or(PageError::NoDocument)?;
        Ok(Self { document, ids })
    }

    fn element(&self, id: &str) -> Result<Element, PageError> {
        self.document
            .get_element_by_id(id)
            .ok_or_else(|| PageError::MissingElement { id: id.to_string() })
    }

    /// Create the render canvas inside the mount element, reusing one if present
    pub fn mount_canvas(&self) -> Result<(), PageError> {
        let mount = self.element(&self.ids.mount)?;
        if self.document.get_element_by_id(&self.ids.canvas).is_some() {
            return Ok(());
        }

        let dom_err = |e: JsValue| PageError::Dom {
            id: self.ids.mount.clone(),
            reason: format!("{:?}", e),
        };
        let canvas = self.document.create_element("canvas").map_err(dom_err)?;
        canvas.set_id(&self.ids.canvas);
        canvas
            .set_attribute("style", "width: 100%; height: 100%; display: block; outline: none;")
            .map_err(dom_err)?;
        mount.append_child(&canvas).map_err(dom_err)?;

        tracing::debug!(mount = %self.ids.mount, canvas = %self.ids.canvas, "Canvas mounted");
        Ok(())
    }

    /// CSS selector Bevy uses to find the canvas
    pub fn canvas_selector(&self) -> String {
        format!("#{}", self.ids.canvas)
    }

    fn input_value(&self, id: &str) -> String {
        match self
            .document
            .get_element_by_id(id)
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        {
            Some(input) => input.value(),
            None => {
                tracing::warn!("Input #{} not found on page", id);
                String::new()
            }
        }
    }

    /// Current text of the four inputs; validation happens in the pipeline
    pub fn read_reading(&self) -> RawReading {
        RawReading::new(
            self.input_value(&self.ids.temperature),
            self.input_value(&self.ids.humidity),
            self.input_value(&self.ids.light_intensity),
            self.input_value(&self.ids.co2_level),
        )
    }

    /// Call `handler` on every click of the trigger element
    pub fn on_trigger(&self, mut handler: impl FnMut() + 'static) -> Result<(), PageError> {
        let trigger = self.element(&self.ids.trigger)?;

        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            event.prevent_default();
            handler();
        });
        trigger
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .map_err(|e| PageError::Dom {
                id: self.ids.trigger.clone(),
                reason: format!("{:?}", e),
            })?;
        // Lives as long as the page
        closure.forget();
        Ok(())
    }

    pub fn output(&self) -> DomOutput {
        DomOutput {
            document: self.document.clone(),
            prediction: self.ids.prediction_output.clone(),
            recommendation: self.ids.recommendation_output.clone(),
        }
    }
}

/// Writes pipeline messages into the page's output elements
pub struct DomOutput {
    document: Document,
    prediction: String,
    recommendation: String,
}

impl DomOutput {
    fn lookup(&self, id: &str) -> Option<Element> {
        let element = self.document.get_element_by_id(id);
        if element.is_none() {
            tracing::warn!("Output #{} not found on page", id);
        }
        element
    }
}

impl OutputSink for DomOutput {
    fn show_prediction(&self, text: &str) {
        if let Some(element) = self.lookup(&self.prediction) {
            element.set_text_content(Some(text));
        }
    }

    fn show_recommendation(&self, text: &str) {
        let Some(element) = self.lookup(&self.recommendation) else {
            return;
        };
        match element.dyn_into::<HtmlTextAreaElement>() {
            Ok(textarea) => textarea.set_value(text),
            Err(element) => element.set_text_content(Some(text)),
        }
    }
}

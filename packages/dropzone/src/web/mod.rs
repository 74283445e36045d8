//! The browser host.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, Element, Event, HtmlElement, HtmlInputElement};

use crate::error::HostError;
use crate::host::{DropEffect, EventKind, Host, HostEvent};

mod file;
#[cfg(feature = "js")]
mod js;

pub use file::WebImageFile;
#[cfg(feature = "js")]
pub use js::start_drag_and_drop;

/// Keeps the picker in the document without it taking up space or catching the pointer.
const PICKER_STYLE: [(&str, &str); 7] = [
    ("opacity", "0"),
    ("width", "0"),
    ("height", "0"),
    ("border", "0"),
    ("margin", "0"),
    ("padding", "0"),
    ("pointer-events", "none"),
];

/// A [`Host`] backed by the browser DOM.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebHost;

/// A listener registered by [`WebHost`]. Dropping it without unlistening leaves a dead callback behind.
pub struct WebListener {
    kind: EventKind,
    closure: Closure<dyn Fn(Event)>,
}

impl Host for WebHost {
    type Node = Element;
    type File = WebImageFile;
    type Event = Event;
    type Listener = WebListener;

    fn create_file_picker(
        &self,
        parent: &Element,
        accept: &str,
    ) -> Result<Element, HostError> {
        let document = parent.owner_document().ok_or(HostError::NoDocument)?;
        let input: HtmlInputElement = document.create_element("input")?.unchecked_into();
        input.set_type("file");
        input.set_accept(accept);

        let style = input.style();
        for (property, value) in PICKER_STYLE {
            style.set_property(property, value)?;
        }

        parent.append_child(&input)?;
        Ok(input.unchecked_into())
    }

    fn remove_node(&self, node: &Element) {
        node.remove();
    }

    fn set_class(&self, node: &Element, class: &str, enabled: bool) {
        let classes = node.class_list();
        let result = match enabled {
            true => classes.add_1(class),
            false => classes.remove_1(class),
        };
        if let Err(err) = result {
            tracing::error!("Failed to toggle class {class}: {:?}", err);
        }
    }

    fn set_hidden(&self, node: &Element, hidden: bool) {
        // Non-HTML elements fall back to the `hidden` attribute.
        let result = match node.dyn_ref::<HtmlElement>().map(HtmlElement::style) {
            Some(style) if hidden => style.set_property("display", "none"),
            Some(style) => style.remove_property("display").map(drop),
            None => node.toggle_attribute_with_force("hidden", hidden).map(drop),
        };
        if let Err(err) = result {
            tracing::error!("Failed to update file picker display: {:?}", err);
        }
    }

    fn open_file_picker(&self, picker: &Element) {
        let Some(input) = picker.dyn_ref::<HtmlInputElement>() else {
            tracing::error!("File picker is not an input element");
            return;
        };
        // Without clearing, picking the same file twice fires no change event.
        input.set_value("");
        input.click();
    }

    fn listen(
        &self,
        node: &Element,
        kind: EventKind,
        handler: Box<dyn Fn(Event)>,
    ) -> Result<WebListener, HostError> {
        let closure = Closure::wrap(handler);
        node.add_event_listener_with_callback(kind.name(), closure.as_ref().unchecked_ref())?;
        Ok(WebListener { kind, closure })
    }

    fn unlisten(&self, node: &Element, listener: WebListener) {
        let result = node.remove_event_listener_with_callback(
            listener.kind.name(),
            listener.closure.as_ref().unchecked_ref(),
        );
        if let Err(err) = result {
            tracing::error!("Failed to remove {} listener: {:?}", listener.kind.name(), err);
        }
    }

    fn report(&self, message: &str) {
        web_sys::console::warn_1(&JsValue::from_str(message));
    }
}

impl HostEvent for Event {
    type File = WebImageFile;

    fn prevent_default(&self) {
        Event::prevent_default(self)
    }

    fn stop_propagation(&self) {
        Event::stop_propagation(self)
    }

    fn set_drop_effect(&self, effect: DropEffect) -> bool {
        let Some(data_transfer) = self
            .dyn_ref::<DragEvent>()
            .and_then(|drag| drag.data_transfer())
        else {
            return false;
        };
        data_transfer.set_drop_effect(effect.as_str());
        true
    }

    fn first_file(&self) -> Option<WebImageFile> {
        let files = match self.dyn_ref::<DragEvent>() {
            Some(drag) => drag.data_transfer()?.files()?,
            None => self
                .target()?
                .dyn_into::<HtmlInputElement>()
                .ok()?
                .files()?,
        };
        files.item(0).map(WebImageFile::from)
    }
}

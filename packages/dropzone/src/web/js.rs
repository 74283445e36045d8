use js_sys::{Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

use super::{WebHost, WebImageFile};
use crate::Dropzone;

/// `startDragAndDrop({ dropTarget, onImageDropped, onError })` for JavaScript callers.
///
/// `onImageDropped` receives the `File`, `onError` a message string. Without
/// `onError`, messages go to `console.warn`. Throws an `Error` when `dropTarget`
/// is not an element or `onImageDropped` is not a function.
///
/// Returns a function that tears the dropzone down. Calling it again does nothing.
/// Letting it be garbage collected leaves the dropzone in place.
#[wasm_bindgen(js_name = startDragAndDrop)]
pub fn start_drag_and_drop(options: &JsValue) -> Result<Function, JsValue> {
    let target = option::<Element>(options, "dropTarget")
        .ok_or_else(|| js_error("startDragAndDrop requires a dropTarget element"))?;
    let on_image = option::<Function>(options, "onImageDropped")
        .ok_or_else(|| js_error("startDragAndDrop requires an onImageDropped callback"))?;

    let mut dropzone = Dropzone::<WebHost>::new()
        .target(target)
        .on_image(move |file: WebImageFile| {
            if let Err(err) = on_image.call1(&JsValue::NULL, file.as_file()) {
                tracing::error!("onImageDropped threw: {:?}", err);
            }
        });

    if let Some(on_error) = option::<Function>(options, "onError") {
        dropzone = dropzone.on_error(move |rejection| {
            let message = JsValue::from_str(rejection.message());
            if let Err(err) = on_error.call1(&JsValue::NULL, &message) {
                tracing::error!("onError threw: {:?}", err);
            }
        });
    }

    let mut teardown = dropzone
        .attach(WebHost)
        .map_err(|err| js_error(&err.to_string()))?
        .into_teardown();

    let teardown = Closure::<dyn FnMut()>::new(move || teardown.run());
    Ok(teardown.into_js_value().unchecked_into())
}

fn js_error(message: &str) -> JsValue {
    js_sys::Error::new(message).into()
}

/// Read `key` from the options object, ignoring values of the wrong type.
fn option<T: JsCast>(options: &JsValue, key: &str) -> Option<T> {
    if !options.is_object() {
        return None;
    }
    Reflect::get(options, &JsValue::from_str(key))
        .ok()?
        .dyn_into::<T>()
        .ok()
}

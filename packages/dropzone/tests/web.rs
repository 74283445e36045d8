#![cfg(all(target_arch = "wasm32", feature = "web"))]

use std::cell::RefCell;
use std::rc::Rc;

use dioxus_dropzone::{Dropzone, DropzoneHandle, ImageFile, Rejection, WebHost};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{
    DataTransfer, DragEvent, DragEventInit, Element, Event, File, FilePropertyBag, HtmlElement,
    HtmlInputElement,
};

wasm_bindgen_test_configure!(run_in_browser);

#[derive(Default)]
struct Calls {
    images: RefCell<Vec<String>>,
    errors: RefCell<Vec<Rejection>>,
}

fn target() -> Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let div = document.create_element("div").unwrap();
    document.body().unwrap().append_child(&div).unwrap();
    div
}

fn svg_target() -> Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let svg = document
        .create_element_ns(Some("http://www.w3.org/2000/svg"), "svg")
        .unwrap();
    document.body().unwrap().append_child(&svg).unwrap();
    svg
}

fn attach(target: &Element) -> (Rc<Calls>, DropzoneHandle<WebHost>) {
    let _ = tracing_wasm::try_set_as_global_default();

    let calls = Rc::new(Calls::default());
    let on_image = calls.clone();
    let on_error = calls.clone();
    let handle = Dropzone::<WebHost>::new()
        .target(target.clone())
        .on_image(move |file| on_image.images.borrow_mut().push(file.name()))
        .on_error(move |rejection| on_error.errors.borrow_mut().push(rejection))
        .attach(WebHost)
        .unwrap();
    (calls, handle)
}

fn file(name: &str, mime: &str) -> File {
    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(&[1u8, 2, 3][..]));
    let options = FilePropertyBag::new();
    options.set_type(mime);
    File::new_with_u8_array_sequence_and_options(&parts, name, &options).unwrap()
}

fn drag_event(kind: &str, files: &[File]) -> DragEvent {
    let data_transfer = DataTransfer::new().unwrap();
    for file in files {
        data_transfer.items().add_with_file(file).unwrap();
    }
    let init = DragEventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    init.set_data_transfer(Some(&data_transfer));
    DragEvent::new_with_event_init_dict(kind, &init).unwrap()
}

fn picker(target: &Element) -> HtmlInputElement {
    target
        .query_selector("input[type=file]")
        .unwrap()
        .unwrap()
        .unchecked_into()
}

#[wasm_bindgen_test]
fn appends_a_hidden_picker() {
    let target = target();
    let (_calls, handle) = attach(&target);

    let picker = picker(&target);
    assert_eq!(picker.accept(), "image/*");
    assert_eq!(picker.style().get_property_value("opacity").unwrap(), "0");
    assert_eq!(
        picker.style().get_property_value("pointer-events").unwrap(),
        "none"
    );
    drop(handle);
}

#[wasm_bindgen_test]
fn highlights_while_dragging() {
    let target = target();
    let (_calls, handle) = attach(&target);

    target.dispatch_event(&drag_event("dragenter", &[])).unwrap();
    target.dispatch_event(&drag_event("dragenter", &[])).unwrap();
    assert!(target.class_list().contains("drag-over"));
    assert_eq!(picker(&target).style().get_property_value("display").unwrap(), "none");

    target.dispatch_event(&drag_event("dragleave", &[])).unwrap();
    assert!(target.class_list().contains("drag-over"));

    target.dispatch_event(&drag_event("dragleave", &[])).unwrap();
    assert!(!target.class_list().contains("drag-over"));
    assert_eq!(picker(&target).style().get_property_value("display").unwrap(), "");
    assert_eq!(handle.drag_depth(), 0);
}

#[wasm_bindgen_test]
fn drag_over_is_cancelled() {
    let target = target();
    let (_calls, _handle) = attach(&target);

    let event = drag_event("dragover", &[]);
    target.dispatch_event(&event).unwrap();
    assert!(event.default_prevented());
}

#[wasm_bindgen_test]
fn dropping_an_image_accepts_it() {
    let target = target();
    let (calls, _handle) = attach(&target);

    target.dispatch_event(&drag_event("dragenter", &[])).unwrap();
    target
        .dispatch_event(&drag_event("drop", &[file("cat.png", "image/png")]))
        .unwrap();

    assert_eq!(*calls.images.borrow(), vec!["cat.png".to_string()]);
    assert!(calls.errors.borrow().is_empty());
    assert!(!target.class_list().contains("drag-over"));
}

#[wasm_bindgen_test]
fn dropping_a_non_image_is_rejected() {
    let target = target();
    let (calls, _handle) = attach(&target);

    target
        .dispatch_event(&drag_event("drop", &[file("notes.txt", "text/plain")]))
        .unwrap();
    target.dispatch_event(&drag_event("drop", &[])).unwrap();

    assert!(calls.images.borrow().is_empty());
    assert_eq!(
        *calls.errors.borrow(),
        vec![Rejection::NotAnImageDropped, Rejection::NoFileDropped]
    );
}

#[wasm_bindgen_test]
fn empty_picker_change_is_rejected() {
    let target = target();
    let (calls, _handle) = attach(&target);

    let change = Event::new("change").unwrap();
    picker(&target).dispatch_event(&change).unwrap();

    assert_eq!(*calls.errors.borrow(), vec![Rejection::NoFileSelected]);
}

#[wasm_bindgen_test]
fn clicking_the_target_opens_the_picker_once() {
    let target = target();
    let (calls, _handle) = attach(&target);
    let clicks = Rc::new(RefCell::new(0));

    let count = clicks.clone();
    let observer = Closure::<dyn Fn(Event)>::new(move |_: Event| *count.borrow_mut() += 1);
    target
        .add_event_listener_with_callback("click", observer.as_ref().unchecked_ref())
        .unwrap();

    target.unchecked_ref::<HtmlElement>().click();

    // The target's click, then the picker's own click bubbling back up.
    assert_eq!(*clicks.borrow(), 2);
    assert_eq!(picker(&target).value(), "");
    assert!(calls.errors.borrow().is_empty());

    target
        .remove_event_listener_with_callback("click", observer.as_ref().unchecked_ref())
        .unwrap();
}

#[wasm_bindgen_test]
fn svg_targets_accept_drops() {
    let target = svg_target();
    let (calls, _handle) = attach(&target);

    assert!(target.query_selector("input[type=file]").unwrap().is_some());

    target.dispatch_event(&drag_event("dragenter", &[])).unwrap();
    assert!(target.class_list().contains("drag-over"));
    assert_eq!(picker(&target).style().get_property_value("display").unwrap(), "none");

    target
        .dispatch_event(&drag_event("drop", &[file("cat.svg", "image/svg+xml")]))
        .unwrap();

    assert_eq!(*calls.images.borrow(), vec!["cat.svg".to_string()]);
    assert!(!target.class_list().contains("drag-over"));
}

#[wasm_bindgen_test]
fn teardown_removes_the_picker_and_listeners() {
    let target = target();
    let (calls, mut handle) = attach(&target);

    handle.teardown();
    handle.teardown();

    assert!(target.query_selector("input[type=file]").unwrap().is_none());
    target
        .dispatch_event(&drag_event("drop", &[file("cat.png", "image/png")]))
        .unwrap();
    target.dispatch_event(&drag_event("dragenter", &[])).unwrap();

    assert!(calls.images.borrow().is_empty());
    assert!(calls.errors.borrow().is_empty());
    assert!(!target.class_list().contains("drag-over"));
}

#[wasm_bindgen_test]
async fn dropped_files_can_be_read() {
    let target = target();
    let dropped: Rc<RefCell<Option<dioxus_dropzone::WebImageFile>>> = Rc::default();

    let slot = dropped.clone();
    let _handle = Dropzone::<WebHost>::new()
        .target(target.clone())
        .on_image(move |file| *slot.borrow_mut() = Some(file))
        .attach(WebHost)
        .unwrap();

    target
        .dispatch_event(&drag_event("drop", &[file("cat.png", "image/png")]))
        .unwrap();

    let file = dropped.borrow_mut().take().unwrap();
    assert_eq!(file.mime_type(), "image/png");
    assert_eq!(file.read_bytes().await.unwrap(), vec![1, 2, 3]);
}

#[cfg(feature = "js")]
mod js {
    use super::*;
    use dioxus_dropzone::web::start_drag_and_drop;
    use js_sys::{Function, Object, Reflect};

    type Seen = Rc<RefCell<Vec<JsValue>>>;

    fn options(entries: &[(&str, &JsValue)]) -> JsValue {
        let options = Object::new();
        for (key, value) in entries {
            Reflect::set(&options, &JsValue::from_str(key), value).unwrap();
        }
        options.into()
    }

    fn recorder() -> (Seen, Closure<dyn Fn(JsValue)>) {
        let seen = Seen::default();
        let sink = seen.clone();
        let closure =
            Closure::<dyn Fn(JsValue)>::new(move |value: JsValue| sink.borrow_mut().push(value));
        (seen, closure)
    }

    fn thrown(result: Result<Function, JsValue>) -> String {
        let Err(err) = result else {
            panic!("startDragAndDrop should have thrown");
        };
        err.dyn_into::<js_sys::Error>().unwrap().message().into()
    }

    #[wasm_bindgen_test]
    fn missing_drop_target_throws() {
        let (_seen, on_image) = recorder();

        assert_eq!(
            thrown(start_drag_and_drop(&options(&[(
                "onImageDropped",
                on_image.as_ref()
            )]))),
            "startDragAndDrop requires a dropTarget element"
        );
        assert_eq!(
            thrown(start_drag_and_drop(&JsValue::UNDEFINED)),
            "startDragAndDrop requires a dropTarget element"
        );
    }

    #[wasm_bindgen_test]
    fn non_function_image_callback_throws() {
        let target = target();

        let message = thrown(start_drag_and_drop(&options(&[
            ("dropTarget", target.as_ref()),
            ("onImageDropped", &JsValue::from_str("not a function")),
        ])));

        assert_eq!(message, "startDragAndDrop requires an onImageDropped callback");
        assert!(target.query_selector("input[type=file]").unwrap().is_none());
    }

    #[wasm_bindgen_test]
    fn images_reach_the_callback_as_files() {
        let target = target();
        let (images, on_image) = recorder();
        let stop = start_drag_and_drop(&options(&[
            ("dropTarget", target.as_ref()),
            ("onImageDropped", on_image.as_ref()),
        ]))
        .unwrap();

        target
            .dispatch_event(&drag_event("drop", &[file("cat.png", "image/png")]))
            .unwrap();

        let images = images.borrow();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].dyn_ref::<File>().unwrap().name(), "cat.png");
        stop.call0(&JsValue::NULL).unwrap();
    }

    #[wasm_bindgen_test]
    fn rejections_reach_on_error_as_strings() {
        let target = target();
        let (images, on_image) = recorder();
        let (errors, on_error) = recorder();
        let stop = start_drag_and_drop(&options(&[
            ("dropTarget", target.as_ref()),
            ("onImageDropped", on_image.as_ref()),
            ("onError", on_error.as_ref()),
        ]))
        .unwrap();

        target
            .dispatch_event(&drag_event("drop", &[file("notes.txt", "text/plain")]))
            .unwrap();
        target.dispatch_event(&drag_event("drop", &[])).unwrap();

        let errors: Vec<Option<String>> = errors.borrow().iter().map(JsValue::as_string).collect();
        assert_eq!(
            errors,
            vec![
                Some("Please drop an image file".to_string()),
                Some("No file detected in drop event".to_string()),
            ]
        );
        assert!(images.borrow().is_empty());
        stop.call0(&JsValue::NULL).unwrap();
    }

    #[wasm_bindgen_test]
    fn rejections_without_on_error_are_only_logged() {
        let target = target();
        let (images, on_image) = recorder();
        let stop = start_drag_and_drop(&options(&[
            ("dropTarget", target.as_ref()),
            ("onImageDropped", on_image.as_ref()),
            ("onError", &JsValue::NULL),
        ]))
        .unwrap();

        target
            .dispatch_event(&drag_event("drop", &[file("notes.txt", "text/plain")]))
            .unwrap();

        assert!(images.borrow().is_empty());
        stop.call0(&JsValue::NULL).unwrap();
    }

    #[wasm_bindgen_test]
    fn the_returned_function_tears_down_once() {
        let target = target();
        let (images, on_image) = recorder();
        let stop = start_drag_and_drop(&options(&[
            ("dropTarget", target.as_ref()),
            ("onImageDropped", on_image.as_ref()),
        ]))
        .unwrap();
        assert!(target.query_selector("input[type=file]").unwrap().is_some());

        stop.call0(&JsValue::NULL).unwrap();
        stop.call0(&JsValue::NULL).unwrap();

        assert!(target.query_selector("input[type=file]").unwrap().is_none());
        target
            .dispatch_event(&drag_event("drop", &[file("cat.png", "image/png")]))
            .unwrap();
        assert!(images.borrow().is_empty());
    }

    #[wasm_bindgen_test]
    fn svg_drop_targets_are_accepted() {
        let target = svg_target();
        let (images, on_image) = recorder();
        let stop = start_drag_and_drop(&options(&[
            ("dropTarget", target.as_ref()),
            ("onImageDropped", on_image.as_ref()),
        ]))
        .unwrap();

        target
            .dispatch_event(&drag_event("drop", &[file("cat.png", "image/png")]))
            .unwrap();

        assert_eq!(images.borrow().len(), 1);
        stop.call0(&JsValue::NULL).unwrap();
    }
}

use std::cell::Cell;
use std::rc::Rc;

use crate::config::DropzoneConfig;
use crate::depth::DragDepth;
use crate::error::{AttachError, Rejection};
use crate::host::{DropEffect, EventKind, Host, HostEvent, ImageFile};

type ImageCallback<F> = Box<dyn Fn(F)>;
type ErrorCallback = Box<dyn Fn(Rejection)>;

/// Builder for a dropzone.
///
/// ```rust
/// use dioxus_dropzone::{Dropzone, ImageFile, MemoryHost};
///
/// let host = MemoryHost::new();
/// let target = host.create_element();
///
/// let handle = Dropzone::<MemoryHost>::new()
///     .target(target)
///     .on_image(|file| println!("got {}", file.name()))
///     .on_error(|rejection| eprintln!("{rejection}"))
///     .attach(host.clone())
///     .unwrap();
///
/// assert!(handle.is_attached());
/// ```
pub struct Dropzone<H: Host> {
    target: Option<H::Node>,
    on_image: Option<ImageCallback<H::File>>,
    on_error: Option<ErrorCallback>,
    config: DropzoneConfig,
}

impl<H: Host> Default for Dropzone<H> {
    fn default() -> Self {
        Self {
            target: None,
            on_image: None,
            on_error: None,
            config: DropzoneConfig::default(),
        }
    }
}

impl<H: Host> Dropzone<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The element files are dropped onto. Required.
    pub fn target(mut self, target: H::Node) -> Self {
        self.target = Some(target);
        self
    }

    /// Called with every accepted image. Required.
    pub fn on_image(mut self, callback: impl Fn(H::File) + 'static) -> Self {
        self.on_image = Some(Box::new(callback));
        self
    }

    /// Called with every rejected selection or drop.
    ///
    /// Without it, rejections go to [`Host::report`].
    pub fn on_error(mut self, callback: impl Fn(Rejection) + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    pub fn config(mut self, config: DropzoneConfig) -> Self {
        self.config = config;
        self
    }

    /// Wire the dropzone into `host`.
    ///
    /// The returned handle owns every listener. Dropping it tears the dropzone down.
    pub fn attach(self, host: H) -> Result<DropzoneHandle<H>, AttachError> {
        let target = self
            .target
            .ok_or(AttachError::InvalidArgument("a drop target element is required"))?;
        let on_image = self
            .on_image
            .ok_or(AttachError::InvalidArgument("an image callback is required"))?;

        let picker = host.create_file_picker(&target, &self.config.accept)?;

        let shared = Rc::new(Shared {
            host,
            target,
            picker,
            config: self.config,
            depth: Cell::new(DragDepth::IDLE),
            opening: Cell::new(false),
            on_image,
            on_error: self.on_error,
        });
        shared.sync_picker();

        // Anything registered before a failure is undone when `handle` drops.
        let mut handle = DropzoneHandle {
            attached: Some(Attached {
                shared: shared.clone(),
                listeners: Vec::with_capacity(EventKind::TARGET.len() + 1),
            }),
        };

        for kind in EventKind::TARGET {
            handle.listen(shared.target.clone(), kind)?;
        }
        handle.listen(shared.picker.clone(), EventKind::Change)?;

        tracing::debug!(accept = %shared.config.accept, "dropzone attached");

        Ok(handle)
    }
}

struct Shared<H: Host> {
    host: H,
    target: H::Node,
    picker: H::Node,
    config: DropzoneConfig,
    depth: Cell<DragDepth>,
    opening: Cell<bool>,
    on_image: ImageCallback<H::File>,
    on_error: Option<ErrorCallback>,
}

impl<H: Host> Shared<H> {
    fn handle(&self, kind: EventKind, event: H::Event) {
        match kind {
            EventKind::DragEnter => self.drag_enter(&event),
            EventKind::DragOver => self.drag_over(&event),
            EventKind::DragLeave => self.drag_leave(&event),
            EventKind::Drop => self.drop_files(&event),
            EventKind::Click => self.click(),
            EventKind::Change => self.change(&event),
        }
    }

    fn drag_enter(&self, event: &H::Event) {
        event.prevent_default();
        event.stop_propagation();
        let depth = self.depth.get().enter();
        self.depth.set(depth);
        tracing::trace!(depth = depth.get(), "dragenter");
        self.highlight(true);
        self.sync_picker();
    }

    fn drag_over(&self, event: &H::Event) {
        event.prevent_default();
        event.stop_propagation();
        event.set_drop_effect(DropEffect::Copy);
    }

    fn drag_leave(&self, event: &H::Event) {
        event.prevent_default();
        event.stop_propagation();
        let depth = self.depth.get().leave();
        self.depth.set(depth);
        tracing::trace!(depth = depth.get(), "dragleave");
        if !depth.is_dragging() {
            self.highlight(false);
        }
        self.sync_picker();
    }

    fn drop_files(&self, event: &H::Event) {
        event.prevent_default();
        event.stop_propagation();
        self.depth.set(DragDepth::IDLE);
        tracing::trace!("drop");
        self.highlight(false);
        self.sync_picker();

        match event.first_file() {
            None => self.reject(Rejection::NoFileDropped),
            Some(file) if !file.is_image() => self.reject(Rejection::NotAnImageDropped),
            Some(file) => self.accept(file),
        }
    }

    fn click(&self) {
        // Opening the picker can dispatch a click that bubbles back up to the target.
        if self.opening.replace(true) {
            return;
        }
        self.host.open_file_picker(&self.picker);
        self.opening.set(false);
    }

    fn change(&self, event: &H::Event) {
        match event.first_file() {
            None => self.reject(Rejection::NoFileSelected),
            Some(file) if !file.is_image() => self.reject(Rejection::NotAnImageSelected),
            Some(file) => self.accept(file),
        }
    }

    fn accept(&self, file: H::File) {
        tracing::debug!(name = %file.name(), mime = %file.mime_type(), "image accepted");
        (self.on_image)(file);
    }

    fn reject(&self, rejection: Rejection) {
        match &self.on_error {
            Some(on_error) => on_error(rejection),
            None => self.host.report(rejection.message()),
        }
    }

    fn highlight(&self, enabled: bool) {
        self.host.set_class(&self.target, &self.config.highlight_class, enabled);
    }

    fn sync_picker(&self) {
        self.host.set_hidden(&self.picker, self.depth.get().is_dragging());
    }
}

struct Attached<H: Host> {
    shared: Rc<Shared<H>>,
    listeners: Vec<(H::Node, H::Listener)>,
}

/// A live dropzone.
///
/// Call [`DropzoneHandle::teardown`] or drop the handle to remove it again.
/// Use [`DropzoneHandle::forget`] to keep it for the lifetime of the page.
#[must_use = "dropping the handle tears the dropzone down"]
pub struct DropzoneHandle<H: Host> {
    attached: Option<Attached<H>>,
}

impl<H: Host> DropzoneHandle<H> {
    fn listen(&mut self, node: H::Node, kind: EventKind) -> Result<(), AttachError> {
        let Some(attached) = self.attached.as_mut() else {
            return Ok(());
        };
        let shared = attached.shared.clone();
        let listener = attached.shared.host.listen(
            &node,
            kind,
            Box::new(move |event| shared.handle(kind, event)),
        )?;
        attached.listeners.push((node, listener));
        Ok(())
    }

    /// Whether the dropzone is still wired into its target.
    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    /// The number of drag-enters still waiting for their drag-leave.
    pub fn drag_depth(&self) -> u32 {
        self.attached
            .as_ref()
            .map(|attached| attached.shared.depth.get().get())
            .unwrap_or(0)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_depth() > 0
    }

    /// Remove every listener, the file picker and the highlight.
    ///
    /// Calling this more than once does nothing.
    pub fn teardown(&mut self) {
        let Some(Attached { shared, listeners }) = self.attached.take() else {
            return;
        };

        for (node, listener) in listeners {
            shared.host.unlisten(&node, listener);
        }
        shared.host.remove_node(&shared.picker);
        shared.depth.set(DragDepth::IDLE);
        shared.highlight(false);

        tracing::debug!("dropzone torn down");
    }

    /// Leak the dropzone so it stays wired after the handle goes away.
    pub fn forget(mut self) {
        if let Some(attached) = self.attached.take() {
            std::mem::forget(attached);
        }
    }

    /// Turn the handle into a [`Teardown`] that only detaches when run.
    pub fn into_teardown(self) -> Teardown<H> {
        Teardown { handle: Some(self) }
    }
}

impl<H: Host> Drop for DropzoneHandle<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// An explicit teardown for a dropzone.
///
/// Unlike [`DropzoneHandle`], dropping this leaves the dropzone attached, so it can
/// be handed to a caller whose lifetime the dropzone must not follow, like a
/// JavaScript function collected by the garbage collector.
pub struct Teardown<H: Host> {
    handle: Option<DropzoneHandle<H>>,
}

impl<H: Host> Teardown<H> {
    /// Detach the dropzone. Later calls do nothing.
    pub fn run(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.teardown();
        }
    }

    /// Whether [`Teardown::run`] has yet to detach the dropzone.
    pub fn is_pending(&self) -> bool {
        self.handle.is_some()
    }
}

impl<H: Host> Drop for Teardown<H> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.forget();
        }
    }
}

//! The seam between the dropzone and the document it lives in.

use crate::error::HostError;

/// Files whose MIME type starts with this are treated as images.
pub const IMAGE_MIME_PREFIX: &str = "image/";

/// The events a dropzone listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    DragEnter,
    DragOver,
    DragLeave,
    Drop,
    Click,
    Change,
}

impl EventKind {
    /// Events registered on the drop target itself. `Change` lives on the file picker.
    pub const TARGET: [EventKind; 5] = [
        EventKind::DragEnter,
        EventKind::DragOver,
        EventKind::DragLeave,
        EventKind::Drop,
        EventKind::Click,
    ];

    /// The DOM event name.
    pub fn name(self) -> &'static str {
        match self {
            EventKind::DragEnter => "dragenter",
            EventKind::DragOver => "dragover",
            EventKind::DragLeave => "dragleave",
            EventKind::Drop => "drop",
            EventKind::Click => "click",
            EventKind::Change => "change",
        }
    }
}

/// The `dropEffect` hint shown to the user while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEffect {
    None,
    Copy,
    Move,
    Link,
}

impl DropEffect {
    pub fn as_str(self) -> &'static str {
        match self {
            DropEffect::None => "none",
            DropEffect::Copy => "copy",
            DropEffect::Move => "move",
            DropEffect::Link => "link",
        }
    }
}

/// A file handed over by the host.
#[async_trait::async_trait(?Send)]
pub trait ImageFile: 'static {
    fn name(&self) -> String;

    fn mime_type(&self) -> String;

    fn size(&self) -> u64;

    /// Read the whole file into memory.
    async fn read_bytes(&self) -> Result<Vec<u8>, HostError>;

    fn is_image(&self) -> bool {
        self.mime_type().starts_with(IMAGE_MIME_PREFIX)
    }
}

/// An event delivered to one of the dropzone's listeners.
pub trait HostEvent {
    type File: ImageFile;

    fn prevent_default(&self);

    fn stop_propagation(&self);

    /// Set the drop effect on the event's data transfer.
    ///
    /// Returns `false` and does nothing if the event carries no data transfer.
    fn set_drop_effect(&self, effect: DropEffect) -> bool;

    /// The first file of the drag payload, or of the input that fired the event.
    fn first_file(&self) -> Option<Self::File>;
}

/// A document the dropzone can be wired into.
///
/// Every method is called from the host's event loop, one event at a time.
pub trait Host: 'static {
    type Node: Clone + 'static;
    type File: ImageFile;
    type Event: HostEvent<File = Self::File> + 'static;
    type Listener: 'static;

    /// Create a hidden file input limited to `accept` and append it to `parent`.
    fn create_file_picker(&self, parent: &Self::Node, accept: &str)
        -> Result<Self::Node, HostError>;

    /// Detach `node` from the document.
    fn remove_node(&self, node: &Self::Node);

    fn set_class(&self, node: &Self::Node, class: &str, enabled: bool);

    fn set_hidden(&self, node: &Self::Node, hidden: bool);

    /// Clear the picker's current value and open the native file chooser.
    fn open_file_picker(&self, picker: &Self::Node);

    fn listen(
        &self,
        node: &Self::Node,
        kind: EventKind,
        handler: Box<dyn Fn(Self::Event)>,
    ) -> Result<Self::Listener, HostError>;

    fn unlisten(&self, node: &Self::Node, listener: Self::Listener);

    /// Where rejections go when the caller did not ask for them.
    fn report(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

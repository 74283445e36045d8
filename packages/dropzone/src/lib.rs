#![doc = include_str!("../README.md")]

mod config;
mod depth;
mod dropzone;
mod error;
mod host;
mod memory;

#[cfg(feature = "web")]
pub mod web;

pub use config::DropzoneConfig;
pub use depth::DragDepth;
pub use dropzone::{Dropzone, DropzoneHandle, Teardown};
pub use error::{AttachError, HostError, Rejection};
pub use host::{DropEffect, EventKind, Host, HostEvent, ImageFile, IMAGE_MIME_PREFIX};
pub use memory::{MemoryEvent, MemoryFile, MemoryHost, MemoryListener, MemoryNode};

#[cfg(feature = "web")]
pub use web::{WebHost, WebImageFile};

/// Attach a dropzone to `target` in one call.
///
/// A shorthand for the [`Dropzone`] builder when no configuration is needed.
pub fn attach<H: Host>(
    host: H,
    target: H::Node,
    on_image: impl Fn(H::File) + 'static,
    on_error: Option<Box<dyn Fn(Rejection)>>,
) -> Result<DropzoneHandle<H>, AttachError> {
    let mut dropzone = Dropzone::<H>::new().target(target).on_image(on_image);
    if let Some(on_error) = on_error {
        dropzone = dropzone.on_error(on_error);
    }
    dropzone.attach(host)
}

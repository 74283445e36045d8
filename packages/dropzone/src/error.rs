use std::fmt::{self, Display};

/// Errors returned while wiring a dropzone onto its target.
#[derive(Debug, thiserror::Error)]
pub enum AttachError {
    /// The caller left out something the dropzone cannot work without.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The host refused one of the operations needed to set up the dropzone.
    #[error(transparent)]
    Host(#[from] HostError),
}

/// A failure reported by the host document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// There is no document to create elements in.
    #[error("no document is available")]
    NoDocument,

    /// The node does not belong to the host it was handed to.
    #[error("node is not owned by this host")]
    UnknownNode,

    /// An exception thrown by the JavaScript side.
    #[error("javascript error: {0}")]
    Js(String),
}

#[cfg(feature = "web")]
impl From<wasm_bindgen::JsValue> for HostError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        use wasm_bindgen::JsCast;

        let message = match value.dyn_ref::<js_sys::Error>() {
            Some(error) => String::from(error.message()),
            None => value.as_string().unwrap_or_else(|| format!("{value:?}")),
        };
        HostError::Js(message)
    }
}

/// Why a selected or dropped file was not handed to the image callback.
///
/// These never abort anything. They go to the error callback, or to
/// [`Host::report`](crate::Host::report) when none was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// The file picker changed without a file in it.
    NoFileSelected,
    /// The file picker produced something that is not an image.
    NotAnImageSelected,
    /// A drop carried no files.
    NoFileDropped,
    /// A drop carried something that is not an image.
    NotAnImageDropped,
}

impl Rejection {
    /// The human readable message for this rejection.
    pub fn message(self) -> &'static str {
        match self {
            Rejection::NoFileSelected => "No file selected",
            Rejection::NotAnImageSelected => "Please choose an image file",
            Rejection::NoFileDropped => "No file detected in drop event",
            Rejection::NotAnImageDropped => "Please drop an image file",
        }
    }
}

impl Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Configuration for a dropzone.
///
/// # Example
///
/// ```rust
/// use dioxus_dropzone::DropzoneConfig;
///
/// let cfg = DropzoneConfig::new()
///     .with_highlight_class("is-hovered")
///     .with_accept("image/png,image/jpeg");
/// assert_eq!(cfg.highlight_class(), "is-hovered");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropzoneConfig {
    pub(crate) highlight_class: String,
    pub(crate) accept: String,
}

impl Default for DropzoneConfig {
    fn default() -> Self {
        Self {
            highlight_class: "drag-over".to_string(),
            accept: "image/*".to_string(),
        }
    }
}

impl DropzoneConfig {
    /// Create a new config with the default highlight class and accept filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the class applied to the target while a drag hovers over it.
    pub fn with_highlight_class(mut self, class: impl Into<String>) -> Self {
        self.highlight_class = class.into();
        self
    }

    /// Set the `accept` attribute of the hidden file picker.
    ///
    /// This only narrows what the native chooser offers. Selected and dropped
    /// files are still checked for an `image/` MIME type.
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    pub fn highlight_class(&self) -> &str {
        &self.highlight_class
    }

    pub fn accept(&self) -> &str {
        &self.accept
    }
}

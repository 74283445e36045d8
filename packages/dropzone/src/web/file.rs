use js_sys::Uint8Array;
use wasm_bindgen_futures::JsFuture;
use web_sys::File;

use crate::error::HostError;
use crate::host::ImageFile;

/// A file picked or dropped in the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebImageFile {
    file: File,
}

impl WebImageFile {
    /// The underlying `web_sys::File`, for handing to other browser APIs.
    pub fn as_file(&self) -> &File {
        &self.file
    }

    pub fn into_inner(self) -> File {
        self.file
    }
}

impl From<File> for WebImageFile {
    fn from(file: File) -> Self {
        Self { file }
    }
}

#[async_trait::async_trait(?Send)]
impl ImageFile for WebImageFile {
    fn name(&self) -> String {
        self.file.name()
    }

    fn mime_type(&self) -> String {
        self.file.type_()
    }

    fn size(&self) -> u64 {
        self.file.size() as u64
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, HostError> {
        let buffer = JsFuture::from(self.file.array_buffer()).await?;
        Ok(Uint8Array::new(&buffer).to_vec())
    }
}

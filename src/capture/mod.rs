//! Image acquisition: camera snapshots and uploaded files, both kept in the
//! data-URI form a front end can preview directly.

use std::fmt;

use base64::{engine::general_purpose, Engine};

use crate::{AttendError, Result};

pub mod camera;
pub mod upload;

pub use camera::{CameraDevice, CameraHandle, FrameFileCamera, FrameSource};
pub use upload::load_upload;

pub const JPEG_MIME: &str = "image/jpeg";

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64";

pub const GUIDELINES: [&str; 5] = [
    "Face should be straight and centered",
    "Look directly into the camera",
    "Ensure proper lighting",
    "Remove glasses and face coverings",
    "Maintain neutral expression",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Camera,
    Upload,
}

/// A face photo waiting to be sent, as `data:<mime>;base64,<payload>`.
#[derive(Clone, PartialEq, Eq)]
pub struct CapturedImage {
    data_uri: String,
    mime_end: usize,
    source: ImageSource,
}

impl CapturedImage {
    pub fn from_bytes(bytes: &[u8], mime: &str, source: ImageSource) -> Self {
        let data_uri = format!(
            "{}{}{},{}",
            DATA_PREFIX,
            mime,
            BASE64_MARKER,
            general_purpose::STANDARD.encode(bytes)
        );
        Self {
            data_uri,
            mime_end: DATA_PREFIX.len() + mime.len(),
            source,
        }
    }

    pub fn from_jpeg_bytes(bytes: &[u8], source: ImageSource) -> Self {
        Self::from_bytes(bytes, JPEG_MIME, source)
    }

    /// Accepts a data URI produced elsewhere, e.g. by a browser snapshot.
    pub fn from_data_uri<S: Into<String>>(
        data_uri: S,
        source: ImageSource,
    ) -> Result<Self> {
        let data_uri = data_uri.into();
        let header = data_uri
            .strip_prefix(DATA_PREFIX)
            .and_then(|rest| rest.split_once(','))
            .map(|(header, _)| header)
            .ok_or_else(|| {
                AttendError::Decode("not a data URI".to_owned())
            })?;
        let mime = header.strip_suffix(BASE64_MARKER).ok_or_else(|| {
            AttendError::Decode("data URI is not base64 encoded".to_owned())
        })?;
        if mime.is_empty() {
            return Err(AttendError::Decode(
                "data URI has no media type".to_owned(),
            ));
        }

        let mime_end = DATA_PREFIX.len() + mime.len();
        Ok(Self {
            data_uri,
            mime_end,
            source,
        })
    }

    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    pub fn mime(&self) -> &str {
        &self.data_uri[DATA_PREFIX.len()..self.mime_end]
    }

    pub fn source(&self) -> ImageSource {
        self.source
    }

    fn payload(&self) -> &str {
        let start = self.mime_end + BASE64_MARKER.len() + 1;
        &self.data_uri[start..]
    }

    /// Approximate binary size, without decoding.
    pub fn len_hint(&self) -> usize {
        self.payload().len() / 4 * 3
    }

    /// Decodes the base64 payload into the bytes that go over the wire.
    pub fn decode(&self) -> Result<FaceImage> {
        let payload = self.payload();
        if payload.is_empty() {
            return Err(AttendError::Decode("image is empty".to_owned()));
        }
        let bytes = general_purpose::STANDARD.decode(payload)?;
        log::trace!("Decoded {} bytes of {}", bytes.len(), self.mime());

        Ok(FaceImage {
            bytes,
            mime: self.mime().to_owned(),
        })
    }
}

impl fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedImage")
            .field("mime", &self.mime())
            .field("source", &self.source)
            .field("len_hint", &self.len_hint())
            .finish()
    }
}

/// Binary form of a [`CapturedImage`], ready for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct FaceImage {
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl fmt::Debug for FaceImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaceImage")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Holds at most one captured image; a retake empties it and a new capture
/// replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureSlot(Option<CapturedImage>);

impl CaptureSlot {
    pub fn store(&mut self, image: CapturedImage) -> Option<CapturedImage> {
        self.0.replace(image)
    }

    pub fn retake(&mut self) {
        self.0 = None;
    }

    pub fn current(&self) -> Option<&CapturedImage> {
        self.0.as_ref()
    }

    pub fn take(&mut self) -> Option<CapturedImage> {
        self.0.take()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

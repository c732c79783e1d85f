use reqwest::multipart::{Form, Part};

use crate::capture::FaceImage;
use crate::Result;

pub const FACE_IMAGE_FIELD: &str = "face_image";
pub const FACE_IMAGE_FILENAME: &str = "face.jpg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartValue {
    Text(String),
    File {
        bytes: Vec<u8>,
        file_name: &'static str,
        mime: String,
    },
}

/// Ordered multipart fields. Kept separate from [`Form`] so a submission can
/// be inspected before it is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartPayload {
    parts: Vec<(&'static str, PartValue)>,
}

impl MultipartPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text<S: Into<String>>(mut self, name: &'static str, value: S) -> Self {
        self.parts.push((name, PartValue::Text(value.into())));
        self
    }

    pub fn face(mut self, face: &FaceImage) -> Self {
        self.parts.push((
            FACE_IMAGE_FIELD,
            PartValue::File {
                bytes: face.bytes.clone(),
                file_name: FACE_IMAGE_FILENAME,
                mime: face.mime.clone(),
            },
        ));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.parts.iter().map(|(name, _)| *name).collect()
    }

    pub fn get(&self, name: &str) -> Option<&PartValue> {
        self.parts
            .iter()
            .find(|(part, _)| *part == name)
            .map(|(_, value)| value)
    }

    pub fn text_value(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(PartValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    pub fn into_form(self) -> Result<Form> {
        let mut form = Form::new();
        for (name, value) in self.parts {
            form = match value {
                PartValue::Text(text) => form.text(name, text),
                PartValue::File {
                    bytes,
                    file_name,
                    mime,
                } => {
                    let part = Part::bytes(bytes)
                        .file_name(file_name)
                        .mime_str(&mime)?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

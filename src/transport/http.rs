use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;

use super::{
    attendance_payload, interpret_attendance, interpret_registration,
    AttendanceVerdict, Backend, RegistrationReceipt, RegistrationRequest,
};
use crate::capture::FaceImage;
use crate::{ApiConfig, Result};

const AGENT: &str = concat!("faceattend/", env!("CARGO_PKG_VERSION"));

/// [`Backend`] talking to the recognition service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    config: ApiConfig,
}

impl HttpBackend {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn register(
        &self,
        request: &RegistrationRequest,
    ) -> Result<RegistrationReceipt> {
        let url = self.config.register_url();
        log::info!("Registering user {} at {}", request.user_id, url);

        let form = request.payload().into_form()?;
        let response = self.client.post(url).multipart(form).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        interpret_registration(status, &body)
    }

    async fn mark_attendance(
        &self,
        face: &FaceImage,
    ) -> Result<AttendanceVerdict> {
        let url = self.config.attendance_url();
        log::info!("Verifying face ({} bytes) at {}", face.bytes.len(), url);

        let form = attendance_payload(face).into_form()?;
        let response = self.client.post(url).multipart(form).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        interpret_attendance(status, &body)
    }
}

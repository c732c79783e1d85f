use std::env;

use url::Url;

use crate::{AttendError, Result};

pub const API_URL_VAR: &str = "ATTENDANCE_API_URL";
/// Name used by the browser build of the front end; still honored.
pub const LEGACY_API_URL_VAR: &str = "REACT_APP_API_URL";

const REGISTER_PATH: &str = "register";
const ATTENDANCE_PATH: &str = "mark-attendance";

/// Location of the recognition service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base: Url,
}

impl ApiConfig {
    pub fn new(base: &str) -> Result<Self> {
        let trimmed = base.trim();
        if trimmed.is_empty() {
            return Err(AttendError::Config("API URL is empty".to_owned()));
        }

        let mut base = Url::parse(trimmed)?;
        if base.cannot_be_a_base() {
            return Err(AttendError::Config(format!(
                "{} cannot be used as a base URL",
                trimmed
            )));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self { base })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup(API_URL_VAR)
            .or_else(|| lookup(LEGACY_API_URL_VAR))
            .ok_or_else(|| {
                AttendError::Config(format!("{} is not set", API_URL_VAR))
            })?;
        log::debug!("Using recognition service at {}", raw);
        Self::new(&raw)
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn register_url(&self) -> Url {
        self.endpoint(REGISTER_PATH)
    }

    pub fn attendance_url(&self) -> Url {
        self.endpoint(ATTENDANCE_PATH)
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        let joined = format!("{}{}", self.base.path(), path);
        url.set_path(&joined);
        url
    }
}

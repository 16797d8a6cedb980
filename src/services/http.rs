//! HTTP implementations of the collaborator services.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::ServiceError;
use crate::store::FileAttachment;
use crate::submit::payload::EnrollmentPayload;

use super::{CreatedRecord, FileStore, PincodeInfo, PincodeLookup, RecordService, StoredFile, UploadKind};

/// File storage backed by the remote document store.
pub struct HttpFileStore {
    base_url: String,
    api_token: SecretString,
    client: reqwest::Client,
}

impl HttpFileStore {
    pub fn new(base_url: impl Into<String>, api_token: SecretString) -> Self {
        Self {
            base_url: base_url.into(),
            api_token,
            client: reqwest::Client::new(),
        }
    }

    fn upload_url(&self, kind: UploadKind) -> String {
        format!("{}/files/{kind}", self.base_url)
    }
}

#[async_trait]
impl FileStore for HttpFileStore {
    async fn upload(
        &self,
        kind: UploadKind,
        file: &FileAttachment,
        owner: Option<&str>,
    ) -> Result<StoredFile, ServiceError> {
        let data = file
            .data
            .clone()
            .ok_or_else(|| ServiceError::InvalidResponse("no local file data to upload".into()))?;

        let part = Part::bytes(data)
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| ServiceError::Http(e.to_string()))?;
        let mut form = Form::new().part("file", part);
        if let Some(owner) = owner {
            form = form.text("owner", owner.to_string());
        }

        let response = self
            .client
            .post(self.upload_url(kind))
            .bearer_auth(self.api_token.expose_secret())
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status { status, body });
        }

        let stored: StoredFile = response.json().await?;
        Ok(stored)
    }
}

/// Pincode lookup against a public postal directory API.
pub struct HttpPincodeLookup {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct PincodeResponse {
    city: Option<String>,
    state: Option<String>,
}

impl HttpPincodeLookup {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PincodeLookup for HttpPincodeLookup {
    async fn lookup(&self, pincode: &str) -> Result<PincodeInfo, ServiceError> {
        let url = format!("{}/pincode/{pincode}", self.base_url);
        let response = self.client.get(&url).send().await?;

        if response.status().as_u16() == 404 {
            return Err(ServiceError::PincodeNotFound(pincode.to_string()));
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status { status, body });
        }

        let parsed: PincodeResponse = response.json().await?;
        match (parsed.city, parsed.state) {
            (Some(city), Some(state)) => Ok(PincodeInfo { city, state }),
            _ => Err(ServiceError::PincodeNotFound(pincode.to_string())),
        }
    }
}

/// Enrollment record creation against the HR backend.
pub struct HttpRecordService {
    base_url: String,
    api_token: SecretString,
    client: reqwest::Client,
}

impl HttpRecordService {
    pub fn new(base_url: impl Into<String>, api_token: SecretString) -> Self {
        Self {
            base_url: base_url.into(),
            api_token,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    record: Option<CreatedRecord>,
}

#[async_trait]
impl RecordService for HttpRecordService {
    async fn create(
        &self,
        payload: &EnrollmentPayload,
    ) -> Result<Option<CreatedRecord>, ServiceError> {
        let url = format!("{}/enrollments", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_token.expose_secret())
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status { status, body });
        }

        let parsed: CreateResponse = response.json().await?;
        Ok(parsed.record)
    }
}

use reqwest::Client;
use serde::Deserialize;

use crate::config::AppConfig;

/// Verdict returned by the external image-classification service.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierVerdict {
    pub disease_label: String,
    pub confidence: f64,
}

/// Thin client for the external disease-classification API. The model
/// behind it is opaque; we send an image and a species hint, we get back a
/// label and a confidence.
pub struct ClassifierClient {
    client: Client,
    base_url: String,
}

impl ClassifierClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(config.classifier_timeout)
            .build()
            .expect("reqwest client");
        Self {
            client,
            base_url: config.classifier_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn classify(
        &self,
        image: Vec<u8>,
        file_name: &str,
        species: &str,
    ) -> Result<ClassifierVerdict, String> {
        let url = format!("{}/classify", self.base_url);

        let mime_type = mime_guess::from_path(file_name)
            .first_or_octet_stream()
            .to_string();

        let part = reqwest::multipart::Part::bytes(image)
            .file_name(file_name.to_string())
            .mime_str(&mime_type)
            .map_err(|e| e.to_string())?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("species", species.to_string());

        let res = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| format!("classify request failed: {}", e))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(format!("classify failed ({}): {}", status, text));
        }

        res.json::<ClassifierVerdict>()
            .await
            .map_err(|e| format!("classify response malformed: {}", e))
    }
}

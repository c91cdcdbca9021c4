//! Image captioning via an OpenAI-compatible vision chat endpoint.
//!
//! The caption is later used verbatim as a semantic-search query, so the
//! prompt asks for a dense scene description rather than a title-style
//! one-liner. All failure paths return `None`; the caller decides what an
//! absent caption means.

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::types::ImageCaptioner;
use crate::config::Settings;

/// Description prompt sent alongside the uploaded image.
const CAPTION_PROMPT: &str = "\
Analyze the given painting and generate a detailed description. \
Summarize the overall scene, the main figures, the atmosphere and emotional \
tone, the dominant colors, and the composition. Mention any historical, \
religious, mythological or cultural context, and the key themes represented \
visually or symbolically. Write flowing prose, 200-300 words.";

pub struct VisionCaptioner {
    api_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
}

impl VisionCaptioner {
    pub fn new(api_url: &str, api_key: &str, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            &settings.vision_api_url,
            &settings.vision_api_key,
            &settings.vision_model,
            settings.http_timeout_secs,
        )
    }
}

// ── Wire types (OpenAI chat completions, vision content parts) ──

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl ImageCaptioner for VisionCaptioner {
    fn caption(&self, image_base64: &str) -> Option<String> {
        // Reject garbage before spending a network round-trip on it.
        let payload = image_base64
            .strip_prefix("data:image/jpeg;base64,")
            .or_else(|| image_base64.split_once(";base64,").map(|(_, rest)| rest))
            .unwrap_or(image_base64);
        let bytes = match base64::engine::general_purpose::STANDARD.decode(payload) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "Uploaded image is not valid base64");
                return None;
            }
        };
        tracing::info!(image_bytes = bytes.len(), "Generating caption for uploaded image");

        let data_url = format!("data:image/jpeg;base64,{payload}");
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: CAPTION_PROMPT,
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: data_url },
                    },
                ],
            }],
            max_tokens: 600,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send();

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "Caption request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::error!(status = %response.status(), "Caption request rejected");
            return None;
        }

        let parsed: ChatResponse = match response.json() {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(error = %e, "Caption response did not parse");
                return None;
            }
        };

        let caption = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        match &caption {
            Some(text) => tracing::info!(chars = text.len(), "Caption generated"),
            None => tracing::warn!("Vision model returned an empty caption"),
        }
        caption
    }
}

//! Generative suggestion capability
//!
//! When neither the archive nor the index knows a replacement, a language
//! model gets to guess. The shipped implementation speaks the Gemini REST
//! API; the reply text goes through the tolerant block parser.

use crate::repair::parser::{parse_suggestion_text, usable_suggestions, GeneratedSuggestion};
use crate::state::LinkContext;
use anyhow::{bail, Context as _};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Proposes replacement URLs for broken links
#[async_trait]
pub trait SuggestionGenerator: Send + Sync {
    /// Returns candidate replacements for `broken_url`
    ///
    /// An unusable reply is not an error; it yields an empty list.
    async fn suggest(
        &self,
        broken_url: &str,
        context: Option<&LinkContext>,
    ) -> anyhow::Result<Vec<GeneratedSuggestion>>;
}

/// Gemini REST generator
pub struct GeminiGenerator {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GeminiGenerator {
    /// Builds a generator client for the given API base and model
    pub fn new(endpoint: String, api_key: String, model: String) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl SuggestionGenerator for GeminiGenerator {
    async fn suggest(
        &self,
        broken_url: &str,
        context: Option<&LinkContext>,
    ) -> anyhow::Result<Vec<GeneratedSuggestion>> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(broken_url, context),
                }],
            }],
        };

        let url = format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .context("generation request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("generation endpoint returned {}", status);
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .context("malformed generation response")?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default();

        Ok(usable_suggestions(parse_suggestion_text(&text)))
    }
}

/// Builds the repair prompt for one broken link
fn build_prompt(broken_url: &str, context: Option<&LinkContext>) -> String {
    let mut prompt = format!(
        "Generate repair suggestions for this broken link:\nURL: {}\n",
        broken_url
    );

    if let Some(ctx) = context {
        if !ctx.text.is_empty() {
            prompt.push_str(&format!("Anchor text: {}\n", ctx.text));
        }
        if !ctx.surrounding_text.is_empty() {
            prompt.push_str(&format!("Surrounding text: {}\n", ctx.surrounding_text));
        }
        if !ctx.heading.is_empty() {
            prompt.push_str(&format!("Section heading: {}\n", ctx.heading));
        }
        if !ctx.page_url.is_empty() {
            prompt.push_str(&format!("Found on page: {}\n", ctx.page_url));
        }
    }

    prompt.push_str(
        "\nConsider:\n\
         1. Similar URLs on the same domain\n\
         2. Common URL patterns\n\
         3. Content relevance\n\
         \n\
         Provide suggestions in format:\n\
         URL: suggested_url\n\
         Confidence: 0.0-1.0\n\
         Reason: explanation\n",
    );

    prompt
}

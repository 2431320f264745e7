//! Narrative traffic estimates via an OpenAI-compatible chat endpoint.
//!
//! Builds the instruction prompt, sends a single-turn completion request,
//! and reshapes the markdown-flavored answer into an HTML fragment.

use std::sync::LazyLock;

use chrono::Local;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;

/// Fallback body when the model answers with no text.
pub const UNAVAILABLE: &str = "Traffic data unavailable";

static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("traffic model request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("traffic model returned status {0}")]
    Status(u16),
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Instruction template for a present-tense, display-ready traffic report.
pub fn build_prompt(latitude: f64, longitude: f64, time: &str) -> String {
    format!(
        "Provide live traffic flow details for the location at latitude {latitude} and \
         longitude {longitude}. The current local time is {time}. Cover the congestion \
         expected at this time of day and the current road conditions. Format the response \
         with clear headings and bullet points for readability. Answer in present tense \
         and stay on point: no disclaimers, no hedging, no referring the reader to another \
         app, and never mention being a model. A rough estimate is fine -- the text is \
         shown directly in an app."
    )
}

/// Reshape a markdown-flavored answer for HTML rendering:
/// bold spans to `<b>`, line-start bullets to `•` on their own line,
/// newlines to `<br>`, stray `**` markers stripped.
pub fn format_traffic_html(text: &str) -> String {
    let text = BOLD_RE.replace_all(text, "<b>$1</b>").into_owned();
    let text = text.replace("\n* ", "\n• ");
    let text = text.replace('\n', "<br>");
    let text = text.replace('•', "<br>•");
    text.replace("**", "")
}

/// Request a narrative estimate for a location at the current wall-clock time.
pub async fn fetch_narrative(
    http: &reqwest::Client,
    config: &AppConfig,
    latitude: f64,
    longitude: f64,
) -> Result<String, LlmError> {
    let time = Local::now().format("%I:%M %p").to_string();
    let prompt = build_prompt(latitude, longitude, &time);

    let url = format!(
        "{}/chat/completions",
        config.llm_base_url.trim_end_matches('/')
    );
    let body = ChatRequest {
        model: &config.llm_model,
        messages: vec![ChatMessage {
            role: "user",
            content: prompt,
        }],
    };

    let resp = http
        .post(&url)
        .header("Authorization", format!("Bearer {}", config.llm_api_key))
        .json(&body)
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        tracing::warn!("Chat completion failed: {} {}", status, text);
        return Err(LlmError::Status(status.as_u16()));
    }

    let parsed: ChatResponse = resp.json().await?;
    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| UNAVAILABLE.to_string());

    Ok(format_traffic_html(&content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_spans_become_tags() {
        assert_eq!(
            format_traffic_html("**Heavy** traffic on **I-80**"),
            "<b>Heavy</b> traffic on <b>I-80</b>"
        );
    }

    #[test]
    fn bullets_start_on_their_own_line() {
        assert_eq!(
            format_traffic_html("Now:\n* slow on Main St\n* clear downtown"),
            "Now:<br><br>• slow on Main St<br><br>• clear downtown"
        );
    }

    #[test]
    fn stray_bold_markers_are_stripped() {
        assert_eq!(format_traffic_html("rush hour ** ahead"), "rush hour  ahead");
    }

    #[test]
    fn formatting_leaves_no_markers_behind() {
        let raw = "**Summary**\n* lane closed\nExpect delays **";
        let once = format_traffic_html(raw);
        let twice = format_traffic_html(&once);
        for out in [&once, &twice] {
            assert!(!out.contains("**"), "leftover bold marker in {out:?}");
            assert!(!out.contains("\n* "), "leftover bullet marker in {out:?}");
        }
    }

    #[test]
    fn prompt_interpolates_location_and_time() {
        let prompt = build_prompt(12.97, 77.59, "08:30 AM");
        assert!(prompt.contains("latitude 12.97"));
        assert!(prompt.contains("longitude 77.59"));
        assert!(prompt.contains("08:30 AM"));
    }
}

//! Application configuration — loaded from environment variables.

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Secret used to sign session cookies.
    pub session_secret: String,
    /// Minutes before an idle session expires.
    pub session_ttl_min: i64,
    /// API credential for the chat-completions endpoint.
    pub llm_api_key: String,
    /// Base URL of the OpenAI-compatible endpoint.
    pub llm_base_url: String,
    /// Model identifier sent with every chat request.
    pub llm_model: String,
    /// Request timeout for upstream model calls, in seconds.
    pub llm_timeout_secs: u64,
    /// Path to the pre-trained regression artifact.
    pub model_path: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let session_secret = std::env::var("SESSION_SECRET").unwrap_or_default();
        let session_ttl_min = std::env::var("SESSION_TTL_MIN")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(720);
        let llm_api_key = std::env::var("LLM_API_KEY").unwrap_or_default();
        let llm_base_url = std::env::var("LLM_BASE_URL")
            .unwrap_or_else(|_| "https://api.groq.com/openai/v1".to_string());
        let llm_model =
            std::env::var("LLM_MODEL").unwrap_or_else(|_| "llama-3.1-8b-instant".to_string());
        let llm_timeout_secs = std::env::var("LLM_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);
        let model_path =
            std::env::var("MODEL_PATH").unwrap_or_else(|_| "traffic_model.json".to_string());

        if session_secret.is_empty() {
            tracing::warn!("SESSION_SECRET not set -- session cookies signed with an empty key");
        }
        if llm_api_key.is_empty() {
            tracing::warn!("LLM_API_KEY not set -- narrative traffic estimates will fail");
        }

        Self {
            session_secret,
            session_ttl_min,
            llm_api_key,
            llm_base_url,
            llm_model,
            llm_timeout_secs,
            model_path,
        }
    }
}

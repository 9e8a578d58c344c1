//! Client for the name-suggestion / summarization collaborator.
//!
//! The collaborator is an AI chat-completion API consumed through a narrow
//! contract: given the serialized source of one function it returns either
//! a suggested identifier preceded by a marker token, or a revised copy of
//! the function with comments added, optionally fenced. Requests are
//! size-bounded up front — a function whose estimated response budget
//! exceeds the token ceiling is never sent, and the caller decides what
//! the fallback is. A response missing the marker or with an unterminated
//! fence is fatal and carries the raw text for the user to inspect.

use crate::error::Error;
use serde::Serialize;
use std::time::Duration;

/// Default chat-completions model.
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Hard ceiling on the per-request response budget, in tokens.
pub const MAX_TOKENS: u32 = 8192;

/// Marker the collaborator is asked to put before a suggested name. The
/// last occurrence in the response wins.
pub const NAME_MARKER: &str = ">> ";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "LUCID_OPENAI_BASE";

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const TEMPERATURE: f32 = 0.2;

/// Outcome of a name-suggestion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion {
    /// A cleaned-up candidate identifier.
    Name(String),
    /// The function exceeds the response budget; no request was made.
    TooLarge,
}

/// Outcome of a comment-generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Description {
    /// The revised function source, fence removed.
    Revised(String),
    /// The function exceeds the response budget; no request was made.
    TooLarge,
}

/// The suggestion collaborator, seen from the passes.
pub trait Suggester {
    /// Suggest a better identifier for the named function.
    fn suggest_name(&self, function: &str, code: &str) -> Result<Suggestion, Error>;

    /// Return a commented rewrite of the named function.
    fn describe(&self, function: &str, code: &str) -> Result<Description, Error>;
}

/// Stand-in for runs with AI features disabled. The pipeline never calls
/// a suggester unless a flag asked for it, so these are unreachable in
/// practice; if reached, they fail loudly instead of guessing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSuggester;

impl Suggester for NoSuggester {
    fn suggest_name(&self, _function: &str, _code: &str) -> Result<Suggestion, Error> {
        Err(Error::other("no suggestion backend configured"))
    }

    fn describe(&self, _function: &str, _code: &str) -> Result<Description, Error> {
        Err(Error::other("no suggestion backend configured"))
    }
}

/// Response budget for a name suggestion.
fn suggest_budget(code_len: usize) -> u32 {
    (code_len as f64).mul_add(1.4, 20.0) as u32
}

/// Response budget for a commented rewrite.
fn describe_budget(code_len: usize) -> u32 {
    (code_len as f64 * 2.6) as u32
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

/// [`Suggester`] over the OpenAI chat-completions HTTP API.
#[derive(Debug, Clone)]
pub struct OpenAiSuggester {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiSuggester {
    /// Build a client from the environment (`OPENAI_API_KEY`, optional
    /// `LUCID_OPENAI_BASE`).
    pub fn new(model: impl Into<String>) -> Result<Self, Error> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| Error::MissingApiKey)?;
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let http = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .user_agent(concat!("lucid/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, base_url, api_key, model: model.into() })
    }

    fn complete(&self, prompt: String, max_tokens: u32) -> Result<String, Error> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            max_tokens,
            temperature: TEMPERATURE,
        };
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let response = self.http.post(&url).bearer_auth(&self.api_key).json(&body).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: response.text().unwrap_or_default(),
            });
        }
        let json: serde_json::Value = response.json()?;
        extract_content(&json)
            .ok_or_else(|| Error::other("completion response had no message content"))
    }
}

fn extract_content(json: &serde_json::Value) -> Option<String> {
    json.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .map(str::to_string)
}

fn malformed(function: &str, raw: &str) -> Error {
    Error::MalformedResponse { function: function.to_string(), raw: raw.to_string() }
}

/// Pull the suggested identifier out of a marked response: everything
/// after the last marker, first whitespace-delimited token, stripped of
/// quoting and parentheses.
pub fn extract_marked_name(function: &str, raw: &str) -> Result<String, Error> {
    let start = raw.rfind(NAME_MARKER).ok_or_else(|| malformed(function, raw))?;
    let rest = &raw[start + NAME_MARKER.len()..];
    let token = rest.split_whitespace().next().ok_or_else(|| malformed(function, raw))?;
    let name = token.trim_matches(|c| matches!(c, '`' | '\'' | '"' | '(' | ')'));
    if name.is_empty() {
        return Err(malformed(function, raw));
    }
    Ok(name.to_string())
}

/// Strip an optional code fence from a revised-function response. No
/// fence means the whole response is code; an opening fence without a
/// matching close is malformed.
pub fn extract_fenced_code(function: &str, raw: &str) -> Result<String, Error> {
    let Some(open) = raw.find("```") else {
        return Ok(raw.to_string());
    };
    let body_start = raw[open..]
        .find('\n')
        .map(|i| open + i + 1)
        .ok_or_else(|| malformed(function, raw))?;
    let close = raw[body_start..]
        .find("```")
        .map(|i| body_start + i)
        .ok_or_else(|| malformed(function, raw))?;
    Ok(raw[body_start..close].to_string())
}

impl Suggester for OpenAiSuggester {
    fn suggest_name(&self, function: &str, code: &str) -> Result<Suggestion, Error> {
        let max_tokens = suggest_budget(code.len());
        if max_tokens > MAX_TOKENS {
            return Ok(Suggestion::TooLarge);
        }
        tracing::info!(function, "requesting a name suggestion");
        let prompt = format!(
            "Can you please suggest a better name for the following JavaScript function? \
             Please precede the suggested name with '{NAME_MARKER}'.\n{code}\n"
        );
        let raw = self.complete(prompt, max_tokens)?;
        Ok(Suggestion::Name(extract_marked_name(function, &raw)?))
    }

    fn describe(&self, function: &str, code: &str) -> Result<Description, Error> {
        let max_tokens = describe_budget(code.len());
        if max_tokens > MAX_TOKENS {
            return Ok(Description::TooLarge);
        }
        tracing::info!(function, "requesting comments");
        let prompt = format!(
            "Can you please add comments to the following JavaScript function? \
             Include a few line comments and a header with a general description of the \
             function, arguments, and return value. Don't comment every line, and please \
             ignore any nested functions.\n{code}\n"
        );
        let raw = self.complete(prompt, max_tokens)?;
        Ok(Description::Revised(extract_fenced_code(function, &raw)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marked_name_takes_last_marker() {
        let raw = "The marker is '>> '. My suggestion:\n>> computeTotal\n";
        assert_eq!(extract_marked_name("f_a", raw).unwrap(), "computeTotal");
    }

    #[test]
    fn test_marked_name_strips_quoting() {
        let raw = ">> `parseHeader()`";
        assert_eq!(extract_marked_name("f_a", raw).unwrap(), "parseHeader");
    }

    #[test]
    fn test_missing_marker_is_malformed() {
        let err = extract_marked_name("f_a", "no marker here").unwrap_err();
        match err {
            Error::MalformedResponse { function, raw } => {
                assert_eq!(function, "f_a");
                assert_eq!(raw, "no marker here");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_fenced_code_extracted() {
        let raw = "Here you go:\n```js\nfunction a() {}\n```\nEnjoy!";
        assert_eq!(extract_fenced_code("f_a", raw).unwrap(), "function a() {}\n");
    }

    #[test]
    fn test_unfenced_response_used_verbatim() {
        let raw = "function a() {}\n";
        assert_eq!(extract_fenced_code("f_a", raw).unwrap(), raw);
    }

    #[test]
    fn test_unterminated_fence_is_malformed() {
        let raw = "```js\nfunction a() {}";
        assert!(matches!(
            extract_fenced_code("f_a", raw),
            Err(Error::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_budgets_scale_with_code_length() {
        assert_eq!(suggest_budget(100), 160);
        assert_eq!(describe_budget(100), 260);
        assert!(suggest_budget(10_000) > MAX_TOKENS);
        assert!(describe_budget(4_000) > MAX_TOKENS);
    }
}

//! Chat-completion extraction against an OpenAI-compatible API.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use cadence_core::ExtractedFields;

use crate::{ExtractError, FieldExtractor};

const SYSTEM_PROMPT: &str = "You are an expert productivity analyst. Respond only with valid \
                             JSON matching the exact format requested.";

fn build_prompt(text: &str) -> String {
    format!(
        "Analyze the following weekly update and provide a structured analysis focusing on \
         productivity metrics:\n\
         1. Completed_Tasks (list of completed tasks/deliverables with measurable outcomes)\n\
         2. Project_Progress (list of ongoing projects and their status updates)\n\
         3. Goals_Status (list of goals and their completion status)\n\
         4. Blockers (list of any impediments affecting progress)\n\
         5. Next_Week_Plans (list of planned tasks/objectives for next week)\n\
         6. Productivity_Score (number between 0 and 1, based on task completion and progress)\n\
         \n\
         Return ONLY a JSON object with these exact field names.\n\
         Each field (except Productivity_Score) should be a list of strings.\n\
         Productivity_Score should be a number between 0 and 1.\n\
         \n\
         Weekly Update:\n\
         {text}"
    )
}

/// Connection settings for the chat extractor. The key is passed in by
/// the caller (read from the environment at the edge, never persisted).
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_base: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub api_key: String,
}

/// [`FieldExtractor`] backed by a chat completion endpoint.
#[derive(Debug)]
pub struct ChatExtractor {
    client: reqwest::Client,
    config: ChatConfig,
}

impl ChatExtractor {
    pub fn new(config: ChatConfig) -> Result<Self, ExtractError> {
        if config.api_key.is_empty() {
            return Err(ExtractError::MissingKey);
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ExtractError::Unavailable { reason: e.to_string() })?;
        Ok(Self { client, config })
    }

    async fn send_once(&self, url: &str, body: &ChatRequest) -> Result<String, RequestFailure> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| RequestFailure::Transient(e.to_string()))?;

        let status = response.status();
        if status.is_server_error() || status.as_u16() == 429 {
            return Err(RequestFailure::Transient(format!("upstream returned {status}")));
        }
        if !status.is_success() {
            return Err(RequestFailure::Fatal(ExtractError::Unavailable {
                reason: format!("upstream returned {status}"),
            }));
        }
        let parsed: ChatResponse = response.json().await.map_err(|e| {
            RequestFailure::Fatal(ExtractError::BadResponse { reason: e.to_string() })
        })?;
        match parsed.choices.into_iter().next().and_then(|c| c.message.content) {
            Some(content) if !content.is_empty() => Ok(content),
            _ => Err(RequestFailure::Fatal(ExtractError::BadResponse {
                reason: "no content in completion".to_string(),
            })),
        }
    }
}

#[async_trait::async_trait]
impl FieldExtractor for ChatExtractor {
    async fn extract(&self, text: &str) -> Result<ExtractedFields, ExtractError> {
        let body = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: build_prompt(text),
                },
            ],
            temperature: 0.7,
        };
        let url = format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        );

        let mut attempt = 0;
        loop {
            match self.send_once(&url, &body).await {
                Ok(content) => return parse_fields(&content),
                Err(RequestFailure::Fatal(e)) => return Err(e),
                Err(RequestFailure::Transient(reason)) => {
                    if attempt >= self.config.max_retries {
                        return Err(ExtractError::Unavailable { reason });
                    }
                    let delay = backoff_delay(attempt);
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        %reason,
                        "extraction request failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

enum RequestFailure {
    /// Worth retrying: transport error, timeout, 429, or 5xx.
    Transient(String),
    Fatal(ExtractError),
}

/// 500ms doubling per attempt, capped, with up to 250ms of jitter so
/// concurrent submissions do not retry in lockstep.
fn backoff_delay(attempt: u32) -> Duration {
    let base = 500u64 * (1 << attempt.min(4));
    let jitter = rand::thread_rng().gen_range(0..250);
    Duration::from_millis(base + jitter)
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Analysis object as the model returns it: capitalized field names,
/// any subset present.
#[derive(Deserialize)]
struct WireAnalysis {
    #[serde(rename = "Completed_Tasks", default)]
    completed_tasks: Vec<String>,
    #[serde(rename = "Project_Progress", default)]
    project_progress: Vec<String>,
    #[serde(rename = "Goals_Status", default)]
    goals_status: Vec<String>,
    #[serde(rename = "Blockers", default)]
    blockers: Vec<String>,
    #[serde(rename = "Next_Week_Plans", default)]
    next_week_plans: Vec<String>,
    #[serde(rename = "Productivity_Score", default, deserialize_with = "lenient_score")]
    productivity_score: f64,
}

/// Models occasionally quote the score; accept a numeric string too.
fn lenient_score<'de, D: serde::Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(f64),
        Str(String),
    }
    Ok(match NumOrStr::deserialize(d)? {
        NumOrStr::Num(n) => n,
        NumOrStr::Str(s) => s.trim().parse().unwrap_or(0.0),
    })
}

/// Parse a completion's content into `ExtractedFields`. Missing fields
/// default (empty lists, score 0); an out-of-range or non-finite score
/// is pulled back into [0, 1].
pub fn parse_fields(content: &str) -> Result<ExtractedFields, ExtractError> {
    let wire: WireAnalysis = serde_json::from_str(strip_code_fence(content))
        .map_err(|e| ExtractError::BadResponse { reason: e.to_string() })?;
    let score = if wire.productivity_score.is_finite() {
        wire.productivity_score.clamp(0.0, 1.0)
    } else {
        0.0
    };
    Ok(ExtractedFields {
        completed_tasks: wire.completed_tasks,
        project_progress: wire.project_progress,
        goals_status: wire.goals_status,
        blockers: wire.blockers,
        next_week_plans: wire.next_week_plans,
        productivity_score: score,
    })
}

/// Models sometimes wrap the JSON in a markdown fence despite the
/// instructions; unwrap it before parsing.
fn strip_code_fence(s: &str) -> &str {
    let t = s.trim();
    let Some(rest) = t.strip_prefix("```") else {
        return t;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.trim_start();
    rest.strip_suffix("```").map_or(rest, str::trim_end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_analysis_payload() {
        let content = r#"{
            "Completed_Tasks": ["Shipped payment retries"],
            "Project_Progress": ["Billing: 80% complete"],
            "Goals_Status": ["Q1 Goal 1: on track"],
            "Blockers": ["Waiting on security review"],
            "Next_Week_Plans": ["Finish rollout"],
            "Productivity_Score": 0.85
        }"#;
        let fields = parse_fields(content).unwrap();
        assert_eq!(fields.completed_tasks, ["Shipped payment retries"]);
        assert_eq!(fields.blockers, ["Waiting on security review"]);
        assert_eq!(fields.productivity_score, 0.85);
    }

    #[test]
    fn missing_fields_default_instead_of_failing() {
        let fields = parse_fields(r#"{"Completed_Tasks": ["one thing"]}"#).unwrap();
        assert_eq!(fields.completed_tasks, ["one thing"]);
        assert!(fields.blockers.is_empty());
        assert!(fields.next_week_plans.is_empty());
        assert_eq!(fields.productivity_score, 0.0);
    }

    #[test]
    fn fenced_json_is_unwrapped() {
        let content = "```json\n{\"Productivity_Score\": 0.7}\n```";
        let fields = parse_fields(content).unwrap();
        assert_eq!(fields.productivity_score, 0.7);

        let bare_fence = "```\n{\"Productivity_Score\": 0.6}\n```";
        assert_eq!(parse_fields(bare_fence).unwrap().productivity_score, 0.6);
    }

    #[test]
    fn score_is_clamped_and_coerced() {
        assert_eq!(
            parse_fields(r#"{"Productivity_Score": 1.7}"#).unwrap().productivity_score,
            1.0
        );
        assert_eq!(
            parse_fields(r#"{"Productivity_Score": -0.2}"#).unwrap().productivity_score,
            0.0
        );
        assert_eq!(
            parse_fields(r#"{"Productivity_Score": "0.8"}"#).unwrap().productivity_score,
            0.8
        );
        assert_eq!(
            parse_fields(r#"{"Productivity_Score": "not a number"}"#)
                .unwrap()
                .productivity_score,
            0.0
        );
    }

    #[test]
    fn non_json_content_is_a_bad_response() {
        let err = parse_fields("Sure! Here is the analysis you asked for.").unwrap_err();
        assert!(matches!(err, ExtractError::BadResponse { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn prompt_names_all_six_fields_and_embeds_the_text() {
        let prompt = build_prompt("shipped the widget");
        for field in [
            "Completed_Tasks",
            "Project_Progress",
            "Goals_Status",
            "Blockers",
            "Next_Week_Plans",
            "Productivity_Score",
        ] {
            assert!(prompt.contains(field), "missing {field}");
        }
        assert!(prompt.contains("shipped the widget"));
        assert!(prompt.contains("Return ONLY a JSON object"));
    }

    #[test]
    fn backoff_grows_and_stays_bounded() {
        for attempt in 0..8 {
            let d = backoff_delay(attempt);
            assert!(d >= Duration::from_millis(500 * (1 << attempt.min(4))));
            assert!(d < Duration::from_millis(500 * (1 << attempt.min(4)) + 250));
        }
    }

    #[test]
    fn empty_key_is_rejected_at_construction() {
        let config = ChatConfig {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4".to_string(),
            timeout_secs: 30,
            max_retries: 2,
            api_key: String::new(),
        };
        let err = ChatExtractor::new(config).unwrap_err();
        assert!(matches!(err, ExtractError::MissingKey));
        assert!(!err.is_retryable());
    }
}

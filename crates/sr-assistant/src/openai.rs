//! Blocking HTTP adapter for the OpenAI Assistants API (v2).

use std::fmt;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::backend::{AssistantBackend, AssistantSpec};
use crate::error::{AssistantError, AssistantResult};
use crate::run::{Run, RunId, RunStatus, ThreadId, ToolCall, ToolOutput};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Header selecting the Assistants API version.
const BETA_HEADER: (&str, &str) = ("OpenAI-Beta", "assistants=v2");

/// Client for the OpenAI Assistants API.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    /// Create a client for the public API with a 60 second request timeout.
    pub fn new(api_key: impl Into<String>) -> AssistantResult<Self> {
        Self::with_timeout(api_key, Duration::from_secs(60))
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> AssistantResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        })
    }

    /// Point the client at a different API root (proxies, compatible servers).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// The API root requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.api_key)
            .header(BETA_HEADER.0, BETA_HEADER.1)
    }

    fn get<R: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> AssistantResult<R> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%url, "GET");
        let response = self.request(self.client.get(url).query(query)).send()?;
        decode(response)
    }

    fn post<R: DeserializeOwned>(&self, path: &str, body: &Value) -> AssistantResult<R> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%url, "POST");
        let response = self.request(self.client.post(url).json(body)).send()?;
        decode(response)
    }
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl AssistantBackend for OpenAiClient {
    fn create_assistant(&self, spec: &AssistantSpec) -> AssistantResult<String> {
        let tools: Vec<Value> = spec
            .tools
            .iter()
            .map(|t| json!({ "type": "function", "function": t }))
            .collect();
        let body = json!({
            "name": spec.name,
            "model": spec.model,
            "instructions": spec.instructions,
            "tools": tools,
        });
        let assistant: IdObject = self.post("/assistants", &body)?;
        Ok(assistant.id)
    }

    fn create_thread(&self) -> AssistantResult<ThreadId> {
        let thread: IdObject = self.post("/threads", &json!({}))?;
        Ok(ThreadId(thread.id))
    }

    fn create_message(&self, thread: &ThreadId, content: &str) -> AssistantResult<()> {
        let body = json!({ "role": "user", "content": content });
        let _: IdObject = self.post(&format!("/threads/{thread}/messages"), &body)?;
        Ok(())
    }

    fn create_run(&self, thread: &ThreadId, assistant_id: &str) -> AssistantResult<Run> {
        let body = json!({ "assistant_id": assistant_id });
        let run: RunObject = self.post(&format!("/threads/{thread}/runs"), &body)?;
        Ok(run.into())
    }

    fn retrieve_run(&self, thread: &ThreadId, run: &RunId) -> AssistantResult<Run> {
        let run: RunObject = self.get(&format!("/threads/{thread}/runs/{run}"), &[])?;
        Ok(run.into())
    }

    fn submit_tool_outputs(
        &self,
        thread: &ThreadId,
        run: &RunId,
        outputs: &[ToolOutput],
    ) -> AssistantResult<Run> {
        let body = json!({ "tool_outputs": outputs });
        let run: RunObject = self.post(
            &format!("/threads/{thread}/runs/{run}/submit_tool_outputs"),
            &body,
        )?;
        Ok(run.into())
    }

    fn latest_message_text(&self, thread: &ThreadId) -> AssistantResult<Option<String>> {
        let list: MessageList = self.get(
            &format!("/threads/{thread}/messages"),
            &[("order", "desc"), ("limit", "1")],
        )?;
        Ok(list.data.into_iter().next().and_then(|m| {
            m.content.into_iter().find_map(|part| match part {
                ContentPart::Text { text } => Some(text.value),
                ContentPart::Other => None,
            })
        }))
    }
}

/// Turn a response into `R`, or into an API error carrying the backend's message.
fn decode<R: DeserializeOwned>(response: Response) -> AssistantResult<R> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json()?);
    }

    let body = response.text()?;
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    Err(AssistantError::Api {
        status: status.as_u16(),
        message,
    })
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct IdObject {
    id: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Deserialize)]
struct RunObject {
    id: String,
    thread_id: String,
    status: RunStatus,
    #[serde(default)]
    required_action: Option<RequiredAction>,
}

#[derive(Deserialize)]
struct RequiredAction {
    submit_tool_outputs: SubmitToolOutputs,
}

#[derive(Deserialize)]
struct SubmitToolOutputs {
    tool_calls: Vec<ToolCallObject>,
}

#[derive(Deserialize)]
struct ToolCallObject {
    id: String,
    function: FunctionCall,
}

#[derive(Deserialize)]
struct FunctionCall {
    name: String,
    arguments: String,
}

impl From<RunObject> for Run {
    fn from(run: RunObject) -> Self {
        let tool_calls = run
            .required_action
            .map(|a| {
                a.submit_tool_outputs
                    .tool_calls
                    .into_iter()
                    .map(|c| ToolCall::new(c.id, c.function.name, c.function.arguments))
                    .collect()
            })
            .unwrap_or_default();

        Run {
            id: RunId(run.id),
            thread_id: ThreadId(run.thread_id),
            status: run.status,
            tool_calls,
        }
    }
}

#[derive(Deserialize)]
struct MessageList {
    data: Vec<MessageObject>,
}

#[derive(Deserialize)]
struct MessageObject {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: TextValue },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct TextValue {
    value: String,
}

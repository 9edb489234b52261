//! Assistant chat: wire types, transports and the conversation state.

use crate::error::ApiResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

pub const WELCOME_MESSAGE: &str =
    "Hello! I'm your Manufacturing Intelligence Assistant. Ask me about inventory, production, or logistics.";
/// Shown when the assistant answers with an empty response.
pub const FALLBACK_RESPONSE: &str = "I encountered an issue processing your request.";
/// Replaces the pending placeholder when a request fails.
pub const ERROR_RESPONSE: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatSource {
    pub title: String,
    #[serde(default)]
    pub snippet: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatReply {
    pub response: String,
    pub sources: Vec<ChatSource>,
    pub sql: Option<String>,
    pub context: Option<Value>,
    pub thread_id: Option<String>,
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, req: ChatRequest) -> ApiResult<ChatReply>;
}

/// Offline assistant answering from fixed, keyword-matched replies.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeywordResponder;

const KEYWORD_REPLIES: [(&[&str], &str, &str, &str); 5] = [
    (
        &["inventory", "stock"],
        "Based on my analysis, there are currently 5 critical inventory alerts across your manufacturing network. The highest risk is at the Berlin Manufacturing Hub with €45M in excess inventory. I recommend reviewing slow-moving SKUs and expediting outbound shipments.",
        "Inventory Analysis",
        "Real-time inventory data from 75 sites",
    ),
    (
        &["supplier", "risk"],
        "I've identified 2 high-risk suppliers in your network: Global Components Ltd (risk score: 72) and Pacific Manufacturing (risk score: 68). Both are in Asia-Pacific region. I recommend diversifying sourcing and increasing safety stock for critical components from these suppliers.",
        "Supplier Risk Analysis",
        "AI-powered risk assessment",
    ),
    (
        &["cash", "capital"],
        "Your current working capital tied in inventory is approximately €750M monthly. I've identified €285M in potential cash release opportunities through slow-moving inventory reduction, excess safety stock optimization, and supplier consolidation.",
        "Cash Flow Analysis",
        "Working capital optimization",
    ),
    (
        &["logistics", "provider"],
        "Your logistics portfolio includes 12 providers with an average performance score of 91.3%. The top performers are Nordic Freight AB (96.8%) and Pacific Express (95.2%). I recommend consolidating to 8-10 providers for optimal cost savings of €35M annually.",
        "3PL Performance",
        "Provider analytics",
    ),
    (
        &["production", "forecast"],
        "Based on demand forecasting, I project a 15% increase in production requirements over the next 6 months. This will require approximately €120M additional working capital and a 25% increase in safety stock for critical components.",
        "Demand Forecast",
        "ML-powered predictions",
    ),
];

const DEFAULT_REPLY: &str = "I can help you with inventory analysis, supplier risk assessment, cash flow optimization, logistics performance, and production forecasting. What would you like to know?";

#[async_trait]
impl ChatTransport for KeywordResponder {
    async fn send(&self, req: ChatRequest) -> ApiResult<ChatReply> {
        let text = req.message.to_lowercase();
        let hit = KEYWORD_REPLIES
            .iter()
            .find(|(keys, ..)| keys.iter().any(|k| text.contains(k)));
        let (response, sources) = match hit {
            Some((_, reply, title, snippet)) => (
                reply.to_string(),
                vec![ChatSource {
                    title: title.to_string(),
                    snippet: Some(snippet.to_string()),
                }],
            ),
            None => (DEFAULT_REPLY.to_string(), Vec::new()),
        };
        Ok(ChatReply {
            response,
            sources,
            sql: None,
            context: Some(json!({ "query_type": "natural_language" })),
            thread_id: req.thread_id,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageStatus {
    Pending,
    Complete,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub role: Role,
    pub content: String,
    pub sources: Vec<ChatSource>,
    pub sql: Option<String>,
    pub context: Option<Value>,
    pub status: MessageStatus,
}

impl ChatMessage {
    fn new(id: u64, role: Role, content: impl Into<String>, status: MessageStatus) -> Self {
        Self {
            id,
            role,
            content: content.into(),
            sources: Vec::new(),
            sql: None,
            context: None,
            status,
        }
    }
}

/// Conversation history plus the server thread it belongs to.
///
/// Each exchange adds the user message and a pending assistant placeholder;
/// the placeholder is then completed or turned into an error bubble. Earlier
/// messages are never touched.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    thread_id: Option<String>,
    next_id: u64,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        let welcome = ChatMessage::new(
            0,
            Role::Assistant,
            WELCOME_MESSAGE,
            MessageStatus::Complete,
        );
        Self {
            messages: vec![welcome],
            thread_id: None,
            next_id: 1,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    pub fn is_waiting(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.status == MessageStatus::Pending)
    }

    fn push(&mut self, role: Role, content: &str, status: MessageStatus) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ChatMessage::new(id, role, content, status));
        id
    }

    fn placeholder(&mut self, id: u64) -> Option<&mut ChatMessage> {
        self.messages
            .iter_mut()
            .find(|m| m.id == id && m.status == MessageStatus::Pending)
    }

    /// Record the user's message and a pending reply.
    ///
    /// Returns the placeholder id and the request to send, or `None` for
    /// blank input or while a reply is outstanding.
    pub fn begin(&mut self, text: &str) -> Option<(u64, ChatRequest)> {
        let text = text.trim();
        if text.is_empty() || self.is_waiting() {
            return None;
        }
        self.push(Role::User, text, MessageStatus::Complete);
        let pending = self.push(Role::Assistant, "", MessageStatus::Pending);
        Some((
            pending,
            ChatRequest {
                message: text.to_string(),
                thread_id: self.thread_id.clone(),
            },
        ))
    }

    pub fn complete(&mut self, pending: u64, reply: ChatReply) {
        if let Some(thread) = reply.thread_id {
            self.thread_id = Some(thread);
        }
        if let Some(msg) = self.placeholder(pending) {
            msg.content = if reply.response.trim().is_empty() {
                FALLBACK_RESPONSE.to_string()
            } else {
                reply.response
            };
            msg.sources = reply.sources;
            msg.sql = reply.sql;
            msg.context = reply.context;
            msg.status = MessageStatus::Complete;
        }
    }

    pub fn fail(&mut self, pending: u64) {
        if let Some(msg) = self.placeholder(pending) {
            msg.content = ERROR_RESPONSE.to_string();
            msg.status = MessageStatus::Failed;
        }
    }

    /// One full exchange over `transport`; returns the assistant's message.
    pub async fn ask<T: ChatTransport + ?Sized>(
        &mut self,
        transport: &T,
        text: &str,
    ) -> Option<&ChatMessage> {
        let (pending, req) = self.begin(text)?;
        match transport.send(req).await {
            Ok(reply) => self.complete(pending, reply),
            Err(e) => {
                warn!(error = %e, "chat request failed");
                self.fail(pending);
            }
        }
        self.messages.iter().find(|m| m.id == pending)
    }
}

/// Successive word prefixes of `text`, for a word-by-word reveal.
///
/// Example:
/// let steps: Vec<&str> = reveal_words("a b c").collect();
/// assert_eq!(steps, ["a", "a b", "a b c"]);
pub fn reveal_words(text: &str) -> impl Iterator<Item = &str> + '_ {
    let mut end = 0usize;
    text.split(' ').enumerate().map(move |(i, word)| {
        if i > 0 {
            end += 1;
        }
        end += word.len();
        &text[..end]
    })
}

use serde::{Deserialize, Serialize};

use crate::ChatRequest;

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    User,
    Model,
}

impl TryFrom<crate::api::Role> for Role {
    type Error = anyhow::Error;

    fn try_from(value: crate::api::Role) -> Result<Self, Self::Error> {
        match value {
            crate::api::Role::User => Ok(Role::User),
            crate::api::Role::Assistant => Ok(Role::Model),
            crate::api::Role::System => Err(anyhow::anyhow!(
                "Gemini does not support system messages directly."
            )),
        }
    }
}

impl From<Role> for crate::api::Role {
    fn from(value: Role) -> Self {
        match value {
            Role::User => crate::api::Role::User,
            Role::Model => crate::api::Role::Assistant,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub(crate) struct Part {
    pub(crate) text: String,
}

impl Part {
    pub fn new(text: impl Into<String>) -> Self {
        Part { text: text.into() }
    }
}

// Gemini representation of messages.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub(crate) struct Content {
    pub(crate) role: Role,
    pub(crate) parts: Vec<Part>,
}

impl Content {
    /// Concatenated text of all parts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("")
    }
}

impl TryFrom<&crate::ChatMessage> for Content {
    type Error = anyhow::Error;

    fn try_from(msg: &crate::ChatMessage) -> Result<Self, Self::Error> {
        Ok(Content {
            role: msg.role.try_into()?,
            parts: vec![Part::new(&msg.text)],
        })
    }
}

/// System instruction block. Gemini ignores the role here, so only
/// parts are carried.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub(crate) struct SystemInstruction {
    pub(crate) parts: Vec<Part>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub(crate) contents: Vec<Content>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) system_instruction: Option<SystemInstruction>,
}

impl TryFrom<&ChatRequest> for GenerateContentRequest {
    type Error = anyhow::Error;

    fn try_from(request: &ChatRequest) -> Result<Self, Self::Error> {
        // System messages go into the dedicated systemInstruction field.
        let system_parts: Vec<Part> = request
            .messages
            .iter()
            .filter(|m| m.role == crate::api::Role::System)
            .map(|m| Part::new(&m.text))
            .collect();

        let contents = request
            .messages
            .iter()
            .filter(|m| m.role != crate::api::Role::System)
            .map(Content::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let system_instruction = if system_parts.is_empty() {
            None
        } else {
            Some(SystemInstruction {
                parts: system_parts,
            })
        };

        Ok(GenerateContentRequest {
            contents,
            system_instruction,
        })
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub(crate) struct Candidate {
    pub(crate) content: Content,

    #[serde(flatten)]
    pub(crate) extra: Option<serde_json::Value>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub(crate) candidates: Vec<Candidate>,

    #[serde(flatten)]
    pub(crate) extra: Option<serde_json::Value>,
}

impl GenerateContentResponse {
    /// Extract the first candidate as a chat message.
    /// An empty candidate list is a malformed response, reported as an error
    /// rather than a panic so callers can substitute their fallback reply.
    pub fn into_message(self) -> anyhow::Result<crate::ChatMessage> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("Gemini response contained no candidates"))?;
        Ok(crate::ChatMessage::new(
            candidate.content.role.into(),
            candidate.content.text(),
        ))
    }
}

//! Conversation transcript exchanged with the model.
//!
//! The transcript is `{prefix, pinned, suffix}` rather than one flat list:
//! the pinned entry is the single "current saved code" record, and rewriting
//! it is a field assignment instead of a reverse scan over the history.

use serde::{Deserialize, Serialize};
use serde_json::json;

/// Author of a turn. Tool results travel as `user` turns per the provider
/// wire protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One content unit within a turn, in the provider's type-tagged wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
    },
}

/// A single turn: one author, ordered content units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl Turn {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }

    pub fn assistant(content: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content,
        }
    }

    /// A tool result, tagged with the originating invocation's id.
    pub fn tool_result(tool_use_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::ToolResult {
                tool_use_id: tool_use_id.into(),
                content: content.into(),
            }],
        }
    }
}

/// The single transcript entry representing "current saved code".
///
/// Rendered as an assistant turn (optional preamble text plus a `tool_use`
/// block carrying the code) followed by a user turn with the matching
/// `tool_result` acknowledgement. `anchor` is the index into the suffix
/// before which the pair renders, so a replaced record keeps conversational
/// order while old code copies drop out of the rendered view.
#[derive(Debug, Clone, PartialEq)]
struct PinnedCode {
    tool_use_id: String,
    tool_name: String,
    preamble: Option<String>,
    code: String,
    ack: String,
    anchor: usize,
}

impl PinnedCode {
    fn render(&self, out: &mut Vec<Turn>) {
        let mut content = Vec::new();
        if let Some(preamble) = &self.preamble {
            content.push(ContentBlock::Text {
                text: preamble.clone(),
            });
        }
        content.push(ContentBlock::ToolUse {
            id: self.tool_use_id.clone(),
            name: self.tool_name.clone(),
            input: json!({ "content": self.code }),
        });
        out.push(Turn::assistant(content));
        out.push(Turn::tool_result(self.tool_use_id.clone(), self.ack.clone()));
    }
}

/// Ordered conversation history for one phase invocation.
///
/// Exclusively owned by the active phase; discarded when the phase returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    prefix: Vec<Turn>,
    pinned: Option<PinnedCode>,
    suffix: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn to the fixed prefix (seed material).
    pub fn seed(&mut self, turn: Turn) {
        self.prefix.push(turn);
    }

    /// Append a turn to the live suffix.
    pub fn push(&mut self, turn: Turn) {
        self.suffix.push(turn);
    }

    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty() && self.pinned.is_none() && self.suffix.is_empty()
    }

    /// Install or replace the pinned code record at the current end of the
    /// conversation. An earlier record (and its tool_use/tool_result pair)
    /// disappears from the rendered view entirely.
    pub fn pin_code(
        &mut self,
        tool_use_id: impl Into<String>,
        tool_name: impl Into<String>,
        code: impl Into<String>,
        ack: impl Into<String>,
    ) {
        self.pinned = Some(PinnedCode {
            tool_use_id: tool_use_id.into(),
            tool_name: tool_name.into(),
            preamble: None,
            code: code.into(),
            ack: ack.into(),
            anchor: self.suffix.len(),
        });
    }

    /// Like [`pin_code`](Self::pin_code), with a fabricated assistant
    /// preamble. Used when resuming a session to prime the model with the
    /// on-disk code without re-sending it as a plain message.
    pub fn pin_code_with_preamble(
        &mut self,
        tool_use_id: impl Into<String>,
        tool_name: impl Into<String>,
        preamble: impl Into<String>,
        code: impl Into<String>,
        ack: impl Into<String>,
    ) {
        self.pin_code(tool_use_id, tool_name, code, ack);
        if let Some(pinned) = &mut self.pinned {
            pinned.preamble = Some(preamble.into());
        }
    }

    /// Rewrite the pinned record's code in place (position and correlation id
    /// unchanged). Returns false when nothing is pinned.
    pub fn refresh_pinned_code(&mut self, code: impl Into<String>) -> bool {
        match &mut self.pinned {
            Some(pinned) => {
                pinned.code = code.into();
                true
            }
            None => false,
        }
    }

    /// Current pinned code, if any.
    pub fn pinned_code(&self) -> Option<&str> {
        self.pinned.as_ref().map(|p| p.code.as_str())
    }

    /// Materialize the ordered turn list sent to the model.
    pub fn to_turns(&self) -> Vec<Turn> {
        let mut turns = Vec::with_capacity(self.prefix.len() + self.suffix.len() + 2);
        turns.extend(self.prefix.iter().cloned());
        for (i, turn) in self.suffix.iter().enumerate() {
            if let Some(pinned) = &self.pinned {
                if pinned.anchor == i {
                    pinned.render(&mut turns);
                }
            }
            turns.push(turn.clone());
        }
        if let Some(pinned) = &self.pinned {
            if pinned.anchor >= self.suffix.len() {
                pinned.render(&mut turns);
            }
        }
        turns
    }
}

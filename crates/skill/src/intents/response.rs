//! What the skill hands back to the dialogue platform.

use serde::Serialize;

/// Speech for the user plus whether the conversation continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillResponse {
    /// Text to speak and display.
    pub speech: String,
    /// Text to speak if the user stays silent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<String>,
    /// `true` ends the conversation, `false` waits for more input.
    pub should_end_session: bool,
}

impl SkillResponse {
    /// Speak and keep listening.
    #[must_use]
    pub fn ask(speech: impl Into<String>) -> Self {
        Self {
            speech: speech.into(),
            reprompt: None,
            should_end_session: false,
        }
    }

    /// Speak and keep listening, with a follow-up prompt.
    #[must_use]
    pub fn ask_with_reprompt(speech: impl Into<String>, reprompt: impl Into<String>) -> Self {
        Self {
            reprompt: Some(reprompt.into()),
            ..Self::ask(speech)
        }
    }

    /// Speak and end the conversation.
    #[must_use]
    pub fn tell(speech: impl Into<String>) -> Self {
        Self {
            speech: speech.into(),
            reprompt: None,
            should_end_session: true,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization() {
        let ask = serde_json::to_value(SkillResponse::ask_with_reprompt("Hi", "Still there?")).unwrap();
        assert_eq!(
            ask,
            serde_json::json!({"speech": "Hi", "reprompt": "Still there?", "shouldEndSession": false})
        );

        let tell = serde_json::to_value(SkillResponse::tell("Bye")).unwrap();
        assert_eq!(
            tell,
            serde_json::json!({"speech": "Bye", "shouldEndSession": true})
        );
    }
}

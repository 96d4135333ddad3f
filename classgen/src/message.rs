//! Chat message roles sent to the completion service.

/// A single message in a completion request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Message {
    /// Instructions placed ahead of the user text.
    System(String),
    /// The lesson-plan prompt.
    User(String),
    /// Model reply.
    Assistant(String),
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System(content.into())
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::User(content.into())
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant(content.into())
    }

    /// Text of the message regardless of role.
    pub fn content(&self) -> &str {
        match self {
            Self::System(s) | Self::User(s) | Self::Assistant(s) => s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_produce_matching_variant() {
        assert!(matches!(Message::system("s"), Message::System(c) if c == "s"));
        assert!(matches!(Message::user("u"), Message::User(c) if c == "u"));
        assert!(matches!(Message::assistant("a"), Message::Assistant(c) if c == "a"));
    }

    #[test]
    fn content_ignores_role() {
        assert_eq!(Message::user("prompt").content(), "prompt");
        assert_eq!(Message::assistant("reply").content(), "reply");
    }
}

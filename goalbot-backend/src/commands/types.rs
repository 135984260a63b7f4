//! Command and reply types shared by the dispatcher and chat integrations.

/// A parsed command from the chat integration.
#[derive(Debug, Clone)]
pub struct IncomingCommand {
    pub name: String,
    pub args: String,
    pub author: String,
}

impl IncomingCommand {
    pub fn new(name: &str, args: &str, author: &str) -> Self {
        Self {
            name: name.to_string(),
            args: args.to_string(),
            author: author.to_string(),
        }
    }

    /// Parse a prefixed chat message like `!list 2` into a command.
    /// Returns None for ordinary chatter.
    pub fn parse(content: &str, prefix: char, author: &str) -> Option<Self> {
        let rest = content.trim().strip_prefix(prefix)?;
        if rest.is_empty() {
            return None;
        }
        let mut parts = rest.splitn(2, char::is_whitespace);
        let name = parts.next()?.to_string();
        let args = parts.next().unwrap_or("").trim().to_string();
        Some(Self {
            name,
            args,
            author: author.to_string(),
        })
    }
}

/// Outgoing reply, pre-chunked so no single message exceeds the transport
/// limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub chunks: Vec<String>,
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            chunks: vec![content.into()],
        }
    }

    pub fn chunked(chunks: Vec<String>) -> Self {
        Self { chunks }
    }

    /// The first chunk, for log lines and assertions.
    pub fn first(&self) -> &str {
        self.chunks.first().map(String::as_str).unwrap_or("")
    }
}

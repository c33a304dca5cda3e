//! Member record
//!
//! Represents one client as its room sees it: identity, display name, and
//! the write half of its connection. The read half stays with the session
//! task; after the join handshake only the room's broadcaster writes to a
//! client.

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::types::ClientId;

/// The outbound stream of a member. Boxed so tests can substitute an
/// in-memory stream for a real socket's write half.
pub type MemberWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// One client inside a room's member list.
pub struct Member {
    /// Unique identifier for this client
    pub id: ClientId,
    /// Display name chosen during the handshake
    pub name: String,
    /// Outbound stream, owned by the room from join onward
    writer: MemberWriter,
}

impl Member {
    /// Create a new member record
    pub fn new(id: ClientId, name: String, writer: MemberWriter) -> Self {
        Self { id, name, writer }
    }

    /// Write a message to this member's connection.
    ///
    /// An error means the connection is dead and the member should be
    /// evicted from its room.
    pub async fn write(&mut self, msg: &str) -> std::io::Result<()> {
        self.writer.write_all(msg.as_bytes()).await?;
        self.writer.flush().await
    }
}

impl std::fmt::Debug for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Member")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

//! Room actor implementation
//!
//! Each room is an actor: a dedicated task owning the member table, fed by an
//! mpsc channel that doubles as the room's pending-message queue. Sending on
//! the channel is the enqueue; the actor's `recv().await` is the broadcaster
//! sleeping until work exists. Because every command for a room flows through
//! that one channel and is handled by that one task, enqueues are serialized
//! into a single total order and delivery is FIFO per room.
//!
//! Known limitation: fan-out writes are synchronous, so one stalled member
//! connection delays delivery to the rest of its room until that write
//! completes. There is no write timeout and no per-member outbound queue.

use std::collections::BTreeMap;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::client::Member;
use crate::error::SendError;
use crate::types::{ClientId, MemberId};

/// Capacity of a room's command channel (the pending queue)
const ROOM_CHANNEL_CAPACITY: usize = 256;

/// Commands sent from sessions to a room actor
#[derive(Debug)]
pub enum RoomCommand {
    /// A client finished the handshake and joins the room. The reply
    /// carries the membership handle used later for removal.
    Join {
        member: Member,
        reply: oneshot::Sender<MemberId>,
    },
    /// Deliver a message to every current member, in join order.
    Broadcast(String),
    /// A client's read side ended; remove it and announce the departure.
    /// `client_id` guards against removing anything but the member the
    /// handle was issued for.
    Leave {
        member_id: MemberId,
        client_id: ClientId,
        farewell: String,
    },
    /// Snapshot of current member display names, for the connect roster.
    Roster { reply: oneshot::Sender<Vec<String>> },
}

/// A chat room actor
///
/// Owns the member table and processes commands until every handle is
/// dropped. In the server proper that never happens: the registry holds a
/// handle for the process lifetime.
pub struct Room {
    /// Room name, fixed at startup
    name: String,
    /// Current members, keyed by join sequence number so iteration runs in
    /// join order. Evicted and departed members are removed outright, so
    /// the table tracks current membership, not historical joins.
    members: BTreeMap<MemberId, Member>,
    /// Next join sequence number; monotonic, never reused
    next_seq: u64,
    /// Command receiver channel
    receiver: mpsc::Receiver<RoomCommand>,
}

impl Room {
    /// Create a room and spawn its broadcaster task, returning the handle
    /// used to address it.
    pub fn spawn(name: &str) -> RoomHandle {
        let (sender, receiver) = mpsc::channel(ROOM_CHANNEL_CAPACITY);
        let room = Self {
            name: name.to_string(),
            members: BTreeMap::new(),
            next_seq: 0,
            receiver,
        };
        tokio::spawn(room.run());
        RoomHandle {
            name: name.to_string(),
            sender,
        }
    }

    /// Run the room event loop
    async fn run(mut self) {
        info!("room '{}' started", self.name);

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd).await;
        }

        info!("room '{}' shutting down", self.name);
    }

    /// Process a single command
    async fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join { member, reply } => {
                self.handle_join(member, reply);
            }
            RoomCommand::Broadcast(msg) => {
                self.fan_out(&msg).await;
            }
            RoomCommand::Leave {
                member_id,
                client_id,
                farewell,
            } => {
                self.handle_leave(member_id, client_id, farewell).await;
            }
            RoomCommand::Roster { reply } => {
                let _ = reply.send(self.roster());
            }
        }
    }

    /// Add a member under the next join sequence number and hand back its
    /// handle.
    fn handle_join(&mut self, member: Member, reply: oneshot::Sender<MemberId>) {
        info!("{} ({}) joined room '{}'", member.name, member.id, self.name);
        let member_id = MemberId::new(self.next_seq);
        self.next_seq += 1;
        self.members.insert(member_id, member);
        // If the session died before reading the reply, the member stays in
        // the table until a broadcast write fails and evicts it.
        let _ = reply.send(member_id);
        debug!("room '{}' now has {} member(s)", self.name, self.members.len());
    }

    /// Write `msg` to every current member in join order. A member whose
    /// write fails is evicted on the spot and delivery continues with the
    /// rest; nobody is told about the eviction.
    async fn fan_out(&mut self, msg: &str) {
        let mut evicted = Vec::new();
        for (member_id, member) in self.members.iter_mut() {
            if let Err(e) = member.write(msg).await {
                info!(
                    "evicting {} ({}) from room '{}': {}",
                    member.name, member.id, self.name, e
                );
                evicted.push(*member_id);
            }
        }
        for member_id in evicted {
            self.members.remove(&member_id);
        }
    }

    /// Handle a session's leave signal. A no-op when the member was already
    /// removed by a write-failure eviction: evicted members get no farewell
    /// broadcast.
    async fn handle_leave(&mut self, member_id: MemberId, client_id: ClientId, farewell: String) {
        let occupied = self
            .members
            .get(&member_id)
            .is_some_and(|m| m.id == client_id);

        if !occupied {
            debug!(
                "leave for {} in room '{}': already evicted",
                client_id, self.name
            );
            return;
        }

        // Remove first, then announce: the leaver never sees its own
        // farewell.
        if let Some(member) = self.members.remove(&member_id) {
            info!("{} ({}) left room '{}'", member.name, member.id, self.name);
        }
        self.fan_out(&farewell).await;
    }

    /// Current member display names in join order.
    fn roster(&self) -> Vec<String> {
        self.members.values().map(|m| m.name.clone()).collect()
    }
}

/// Cloneable address of a room actor. The registry hands these out to
/// sessions; all methods post commands on the room's channel.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    name: String,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// The room's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Join the room, transferring the member's write half to the actor.
    /// Returns the membership handle for the eventual leave.
    pub async fn join(&self, member: Member) -> Result<MemberId, SendError> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join { member, reply })
            .await
            .map_err(|_| SendError::ChannelClosed)?;
        rx.await.map_err(|_| SendError::ChannelClosed)
    }

    /// Enqueue a message for delivery to every current member.
    pub async fn broadcast(&self, msg: String) -> Result<(), SendError> {
        self.sender
            .send(RoomCommand::Broadcast(msg))
            .await
            .map_err(|_| SendError::ChannelClosed)
    }

    /// Post the leaving signal for a member.
    pub async fn leave(
        &self,
        member_id: MemberId,
        client_id: ClientId,
        farewell: String,
    ) -> Result<(), SendError> {
        self.sender
            .send(RoomCommand::Leave {
                member_id,
                client_id,
                farewell,
            })
            .await
            .map_err(|_| SendError::ChannelClosed)
    }

    /// Snapshot of current member display names in join order.
    pub async fn roster(&self) -> Result<Vec<String>, SendError> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Roster { reply })
            .await
            .map_err(|_| SendError::ChannelClosed)?;
        rx.await.map_err(|_| SendError::ChannelClosed)
    }
}

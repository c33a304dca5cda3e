//! Multi-Room TCP Chat Server Library
//!
//! A line-oriented chat server speaking plain text over TCP, usable with
//! `nc` or telnet. Rooms are fixed at startup; each runs its own
//! broadcaster that fans messages out to current members in FIFO order.
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - Each `Room` is an actor owning its member list; its inbox is the
//!   room's pending-message queue, so enqueue order is delivery order
//! - Each connection gets a session task that performs the handshake and
//!   feeds lines into its room
//! - Only the room actor ever mutates membership: sessions post a leave
//!   signal, and write failures evict in place
//!
//! # Example
//! ```ignore
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//! use chatrooms::{serve, Registry};
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = Arc::new(Registry::build(["general", "random"]).unwrap());
//!     let listener = TcpListener::bind("127.0.0.1:8080").await.unwrap();
//!     serve(listener, registry).await;
//! }
//! ```

pub mod client;
pub mod error;
pub mod message;
pub mod registry;
pub mod room;
pub mod server;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use client::{Member, MemberWriter};
pub use error::{AppError, SendError};
pub use registry::Registry;
pub use room::{Room, RoomCommand, RoomHandle};
pub use server::serve;
pub use session::handle_session;
pub use types::{ClientId, MemberId};

//! End-to-end tests over real TCP sockets.
//!
//! Each test starts a full server on an ephemeral port and drives it with
//! plain line-oriented clients, the way `nc` would.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};

use chatrooms::{serve, Registry};

async fn start_server(rooms: &[&str]) -> SocketAddr {
    let registry = Arc::new(Registry::build(rooms.iter().copied()).unwrap());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        serve(listener, registry).await;
    });
    addr
}

struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, writer) = stream.into_split();
        Self {
            reader: BufReader::new(read_half),
            writer,
        }
    }

    /// Read one line, terminator included. Empty string means EOF.
    async fn read_line(&mut self) -> String {
        let mut line = String::new();
        self.reader.read_line(&mut line).await.unwrap();
        line
    }

    async fn expect_line(&mut self, expected: &str) {
        assert_eq!(self.read_line().await, expected);
    }

    async fn send(&mut self, text: &str) {
        self.writer.write_all(text.as_bytes()).await.unwrap();
    }

    /// Run the handshake: consume the roster (`room_count` lines plus the
    /// blank line and both prompts), then submit a name and a room.
    async fn handshake(&mut self, room_count: usize, name: &str, room: &str) {
        for _ in 0..room_count {
            let line = self.read_line().await;
            assert!(line.contains(':'), "unexpected roster line: {line:?}");
        }
        self.expect_line("\n").await;
        self.expect_line("Enter your chat name (no spaces):\n").await;
        self.send(&format!("{name}\n")).await;
        self.expect_line("Enter chat room:\n").await;
        self.send(&format!("{room}\n")).await;
    }
}

#[tokio::test]
async fn full_two_client_scenario() {
    let addr = start_server(&["general", "random"]).await;

    // Client A: empty rosters, then joins general as alice.
    let mut alice = TestClient::connect(addr).await;
    alice.expect_line("general:\n").await;
    alice.expect_line("random:\n").await;
    alice.expect_line("\n").await;
    alice
        .expect_line("Enter your chat name (no spaces):\n")
        .await;
    alice.send("alice\n").await;
    alice.expect_line("Enter chat room:\n").await;
    alice.send("general\n").await;

    // Alice is a member when her join announcement is fanned out, so she
    // receives it herself.
    alice.expect_line("alice has joined\n").await;

    // Client B: the roster now shows alice in general.
    let mut bob = TestClient::connect(addr).await;
    bob.expect_line("general: alice\n").await;
    bob.expect_line("random:\n").await;
    bob.expect_line("\n").await;
    bob.expect_line("Enter your chat name (no spaces):\n").await;
    bob.send("bob\n").await;
    bob.expect_line("Enter chat room:\n").await;
    bob.send("general\n").await;

    bob.expect_line("bob has joined\n").await;
    alice.expect_line("bob has joined\n").await;

    // A chat line reaches everyone, sender included.
    alice.send("hello\n").await;
    alice.expect_line("alice: hello\n").await;
    bob.expect_line("alice: hello\n").await;

    // B disconnects; the remaining member hears about it.
    drop(bob);
    alice.expect_line("bob has left\n").await;
}

#[tokio::test]
async fn unknown_room_closes_silently() {
    let addr = start_server(&["general"]).await;

    // An observer in the room, to prove nothing gets broadcast.
    let mut alice = TestClient::connect(addr).await;
    alice.handshake(1, "alice", "general").await;
    alice.expect_line("alice has joined\n").await;

    let mut mallory = TestClient::connect(addr).await;
    mallory.handshake(1, "mallory", "no-such-room").await;

    // Connection closed with no further output.
    assert_eq!(mallory.read_line().await, "");

    // Alice saw nothing in between; the next thing she receives is her own
    // chat line.
    alice.send("ping\n").await;
    alice.expect_line("alice: ping\n").await;
}

#[tokio::test]
async fn rooms_are_independent() {
    let addr = start_server(&["general", "random"]).await;

    let mut alice = TestClient::connect(addr).await;
    alice.handshake(2, "alice", "general").await;
    alice.expect_line("alice has joined\n").await;

    let mut randy = TestClient::connect(addr).await;
    randy.handshake(2, "randy", "random").await;
    randy.expect_line("randy has joined\n").await;

    // Traffic in random never reaches general.
    randy.send("anyone here?\n").await;
    randy.expect_line("randy: anyone here?\n").await;

    alice.send("quiet in here\n").await;
    alice.expect_line("alice: quiet in here\n").await;
}

#[tokio::test]
async fn crlf_terminators_are_stripped_in_handshake() {
    let addr = start_server(&["general"]).await;

    let mut carol = TestClient::connect(addr).await;
    carol.expect_line("general:\n").await;
    carol.expect_line("\n").await;
    carol
        .expect_line("Enter your chat name (no spaces):\n")
        .await;
    carol.send("carol\r\n").await;
    carol.expect_line("Enter chat room:\n").await;
    carol.send("general\r\n").await;

    carol.expect_line("carol has joined\n").await;
}

#[tokio::test]
async fn bare_newline_is_broadcast() {
    let addr = start_server(&["general"]).await;

    let mut alice = TestClient::connect(addr).await;
    alice.handshake(1, "alice", "general").await;
    alice.expect_line("alice has joined\n").await;

    // A bare newline is still a successful read, not a disconnect.
    alice.send("\n").await;
    alice.expect_line("alice: \n").await;
}

#[tokio::test]
async fn hangup_before_naming_leaves_no_trace() {
    let addr = start_server(&["general"]).await;

    let ghost = TestClient::connect(addr).await;
    drop(ghost);

    // The next client sees an untouched roster.
    let mut alice = TestClient::connect(addr).await;
    alice.expect_line("general:\n").await;
}

//! Per-connection session handler
//!
//! Drives one client from the connect-time roster and name/room handshake
//! into the active chat loop, and posts the leave signal when the read side
//! ends. After the join the session owns only the read half of the socket;
//! the write half belongs to the room's broadcaster.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info};

use crate::client::Member;
use crate::error::AppError;
use crate::message;
use crate::registry::Registry;
use crate::types::ClientId;

/// Handle a single client connection, from handshake to disconnect.
///
/// Every early return before the join just drops the socket: a client that
/// never reached a room gets no broadcast and leaves no trace.
pub async fn handle_session(stream: TcpStream, registry: Arc<Registry>) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let client_id = ClientId::new();
    debug!("client {} connected from {}", client_id, peer_addr);

    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    // Roster block: one line per room, a blank line, then the name prompt.
    let mut preamble = String::new();
    for room in registry.iter() {
        let names = room.roster().await?;
        preamble.push_str(&message::roster_line(room.name(), &names));
    }
    preamble.push('\n');
    preamble.push_str(message::NAME_PROMPT);
    write_half.write_all(preamble.as_bytes()).await?;

    // NAMING: one line, terminator stripped. EOF before a name means the
    // handshake never reached a room.
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        debug!("client {} hung up before naming", client_id);
        return Ok(());
    }
    let name = message::trim_line(&line).to_string();

    // ROOM_SELECT
    write_half.write_all(message::ROOM_PROMPT.as_bytes()).await?;
    line.clear();
    if reader.read_line(&mut line).await? == 0 {
        debug!("client {} hung up before picking a room", client_id);
        return Ok(());
    }
    let room_name = message::trim_line(&line);

    // Unknown room: close silently, nothing was mutated anywhere.
    let Some(room) = registry.lookup(room_name) else {
        info!(
            "client {} requested unknown room '{}', closing",
            client_id, room_name
        );
        return Ok(());
    };
    let room = room.clone();

    // The write half moves into the room; from here on only the room's
    // broadcaster writes to this client.
    let member = Member::new(client_id, name.clone(), Box::new(write_half));
    let member_id = room.join(member).await?;
    room.broadcast(message::joined_line(&name)).await?;

    info!(
        "client {} is '{}' in room '{}'",
        client_id,
        name,
        room.name()
    );

    // ACTIVE: every line read, terminator and all, is broadcast verbatim
    // under the client's name. EOF or a read error ends the session the
    // same way.
    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => break,
            Ok(_) => room.broadcast(message::chat_line(&name, &line)).await?,
            Err(e) => {
                debug!("read error for client {}: {}", client_id, e);
                break;
            }
        }
    }

    // DISCONNECTING: the room owns all member removal; the session only
    // posts the leaving signal and exits.
    room.leave(member_id, client_id, message::left_line(&name))
        .await?;

    info!("client {} ('{}') disconnected", client_id, name);
    Ok(())
}

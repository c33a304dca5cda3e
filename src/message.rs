//! Wire-text vocabulary
//!
//! Every byte the server writes is built here, so the exact protocol text
//! lives in one place. The protocol is plain lines over TCP — a client can
//! be `nc` or telnet.

/// Prompt sent after the room roster (preceded by a blank line).
pub const NAME_PROMPT: &str = "Enter your chat name (no spaces):\n";

/// Prompt sent after the client picks a name.
pub const ROOM_PROMPT: &str = "Enter chat room:\n";

/// One roster line: the room name, a colon, then each current member
/// prefixed with a single space.
///
/// `"general: alice bob\n"`, or `"general:\n"` when the room is empty.
pub fn roster_line(room: &str, members: &[String]) -> String {
    let mut line = String::with_capacity(room.len() + 2);
    line.push_str(room);
    line.push(':');
    for name in members {
        line.push(' ');
        line.push_str(name);
    }
    line.push('\n');
    line
}

/// Announcement broadcast when a client joins its room.
pub fn joined_line(name: &str) -> String {
    format!("{name} has joined\n")
}

/// Announcement broadcast when a client disconnects.
pub fn left_line(name: &str) -> String {
    format!("{name} has left\n")
}

/// A chat message as broadcast to the room. `line` is the raw line as read
/// from the client, trailing terminator included, and is passed through
/// untouched.
pub fn chat_line(name: &str, line: &str) -> String {
    format!("{name}: {line}")
}

/// Strip the trailing line terminator (`\n` or `\r\n`) from a line read
/// during the handshake.
pub fn trim_line(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line)
}

//! Multi-Room TCP Chat Server - Entry Point
//!
//! Builds the room registry from the command line, binds the listener, and
//! runs the accept loop.

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chatrooms::{serve, Registry};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=chatrooms=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chatrooms=info")),
        )
        .init();

    // Bind address, then one or more room names. Rooms are fixed for the
    // life of the process.
    let mut args = env::args().skip(1);
    let Some(addr) = args.next() else {
        eprintln!("usage: chatrooms <addr> <room-name>...");
        return ExitCode::FAILURE;
    };
    let room_names: Vec<String> = args.collect();

    let registry = match Registry::build(&room_names) {
        Ok(registry) => Arc::new(registry),
        Err(e) => {
            eprintln!("usage: chatrooms <addr> <room-name>...");
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("error: failed to bind {addr}: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        "chat server listening on {} with {} room(s)",
        addr,
        registry.room_count()
    );

    serve(listener, registry).await
}

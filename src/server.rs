//! Accept loop
//!
//! Takes connections off the listener and spawns a session task for each.
//! Lives in the library so tests can run a real server on an ephemeral port.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};

use crate::registry::Registry;
use crate::session::handle_session;

/// Accept connections forever, one session task per connection.
///
/// Accept errors are logged and skipped; a failed accept never takes the
/// server down. Session errors stay inside their own task.
pub async fn serve(listener: TcpListener, registry: Arc<Registry>) -> ! {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                info!("new connection from {}", addr);
                let registry = registry.clone();

                tokio::spawn(async move {
                    if let Err(e) = handle_session(stream, registry).await {
                        error!("session error: {}", e);
                    }
                });
            }
            Err(e) => {
                error!("failed to accept connection: {}", e);
            }
        }
    }
}

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::messages::{self, JoinRequest};
use super::socket::{write_raw, Connection};
use crate::shared::AppState;

/// Accepts connections forever, one task per connection
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    info!(addr = %listener.local_addr()?, "Server started");

    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                debug!(peer = %peer, "Accepted connection");
                let state = state.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, state).await {
                        debug!(peer = %peer, error = %e, "Connection ended with error");
                    }
                });
            }
            Err(e) => warn!(error = %e, "Error accepting connection"),
        }
    }
}

/// Performs the join handshake on a fresh connection, then runs it until disconnect
#[instrument(skip(stream, state), fields(connection_id = %Uuid::new_v4()))]
pub async fn handle_connection<S>(stream: S, state: AppState) -> std::io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (read_half, mut write_half) = tokio::io::split(stream);
    let mut lines = BufReader::new(read_half).lines();

    let Some(first_line) = lines.next_line().await? else {
        debug!("Connection closed before handshake");
        return Ok(());
    };

    let request = match JoinRequest::parse(&first_line) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Rejecting connection with invalid handshake");
            write_raw(&mut write_half, &format!("{e}\n")).await?;
            write_half.shutdown().await?;
            return Ok(());
        }
    };

    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel();
    if let Err(e) = state
        .registry
        .join(&request.socket_id, &request.username, outbound_sender)
        .await
    {
        info!(
            room_id = %request.socket_id,
            username = %request.username,
            error = %e,
            "Join rejected"
        );
        write_raw(&mut write_half, &format!("{e}\n")).await?;
        write_half.shutdown().await?;
        return Ok(());
    }

    let welcome = messages::welcome(&request.socket_id, &request.username);
    if let Err(e) = write_raw(&mut write_half, &format!("{welcome}\n")).await {
        warn!(error = %e, "Error writing welcome");
    }

    Connection::new(
        request.socket_id,
        request.username,
        lines,
        write_half,
        outbound_receiver,
        state,
    )
    .run()
    .await
}

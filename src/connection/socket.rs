use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt, Lines};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::messages::InboundCommand;
use crate::shared::AppState;

/// Writes one already-terminated line and flushes it
pub(crate) async fn write_raw<W: AsyncWrite + Unpin>(writer: &mut W, text: &str) -> std::io::Result<()> {
    writer.write_all(text.as_bytes()).await?;
    writer.flush().await
}

/// Connection represents one joined participant.
///
/// It forwards queued outbound lines to the socket and feeds inbound lines to
/// the dispatcher until the peer disconnects, then removes the session.
pub struct Connection<R, W> {
    pub room_id: String,
    pub identity: String,
    lines: Lines<R>,
    writer: W,
    outbound_receiver: mpsc::UnboundedReceiver<String>,
    state: AppState,
}

impl<R, W> Connection<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(
        room_id: String,
        identity: String,
        lines: Lines<R>,
        writer: W,
        outbound_receiver: mpsc::UnboundedReceiver<String>,
        state: AppState,
    ) -> Self {
        Self {
            room_id,
            identity,
            lines,
            writer,
            outbound_receiver,
            state,
        }
    }

    /// Run the connection until disconnect. The session is always removed afterwards.
    pub async fn run(mut self) -> std::io::Result<()> {
        let result = self.pump().await;

        self.state
            .registry
            .remove(&self.room_id, &self.identity)
            .await;

        // Deliver whatever was queued before the session left the room
        while let Ok(message) = self.outbound_receiver.try_recv() {
            if write_raw(&mut self.writer, &message).await.is_err() {
                break;
            }
        }
        let _ = self.writer.shutdown().await;

        info!(room_id = %self.room_id, identity = %self.identity, "Connection closed");
        result
    }

    async fn pump(&mut self) -> std::io::Result<()> {
        loop {
            tokio::select! {
                // Outbound: lines queued for this participant
                msg = self.outbound_receiver.recv() => {
                    match msg {
                        Some(message) => {
                            if let Err(e) = write_raw(&mut self.writer, &message).await {
                                warn!(
                                    room_id = %self.room_id,
                                    identity = %self.identity,
                                    error = %e,
                                    "Error writing to connection"
                                );
                            }
                        }
                        None => break,
                    }
                }

                // Inbound: commands from the participant
                line = self.lines.next_line() => {
                    match line {
                        Ok(Some(line)) => self.handle_line(&line).await,
                        Ok(None) => break, // Client disconnected
                        Err(e) => {
                            debug!(error = %e, "Error reading from connection");
                            return Err(e);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    async fn handle_line(&self, line: &str) {
        let command = InboundCommand::parse(line);

        if let Some(socket_id) = command.socket_id.as_deref() {
            if socket_id != self.room_id {
                debug!(
                    room_id = %self.room_id,
                    socket_id = %socket_id,
                    "Ignoring socketId that differs from the joined room"
                );
            }
        }

        if let Err(e) = self
            .state
            .dispatcher
            .dispatch(&self.room_id, &self.identity, &command)
            .await
        {
            debug!(identity = %self.identity, error = %e, "Command rejected");
        }
    }
}

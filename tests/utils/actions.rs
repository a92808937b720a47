use cardroom::{AppError, InboundCommand};

use super::setup::TestSetup;

// ============================================================================
// Action Helpers
// ============================================================================

impl TestSetup {
    /// Send one raw line as `player`
    pub async fn send_line(&self, player: &str, line: &str) -> Result<(), AppError> {
        self.dispatcher
            .dispatch(&self.room_id, player, &InboundCommand::parse(line))
            .await
    }

    /// Send a JSON command envelope
    pub async fn send_command(
        &self,
        player: &str,
        command: &str,
        metadata: &str,
    ) -> Result<(), AppError> {
        let envelope = serde_json::json!({
            "socketId": self.room_id,
            "command": command,
            "metadata": metadata,
        });
        self.send_line(player, &envelope.to_string()).await
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    pub async fn send_ready(&self, player: &str) -> Result<(), AppError> {
        self.send_command(player, "/ready", "").await
    }

    pub async fn send_check(&self, player: &str) -> Result<(), AppError> {
        self.send_command(player, "/check", "").await
    }

    pub async fn send_chat(&self, player: &str, text: &str) -> Result<(), AppError> {
        self.send_command(player, "/chat", text).await
    }

    pub async fn send_bid(&self, player: &str, card_id: &str) -> Result<(), AppError> {
        self.send_command(player, "", card_id).await
    }

    /// Every player readies up in join order
    pub async fn ready_everyone(&self) {
        for player in &self.players {
            self.send_ready(player).await.expect("ready should succeed");
        }
    }
}

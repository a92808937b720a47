#![allow(dead_code)] // Test utilities may not all be used in every test

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use cardroom::{CommandDispatcher, Room, RoomRegistry};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub registry: Arc<RoomRegistry>,
    pub dispatcher: CommandDispatcher,
    pub room_id: String,
    pub players: Vec<String>,
    inboxes: Mutex<HashMap<String, mpsc::UnboundedReceiver<String>>>,
}

pub struct TestSetupBuilder {
    players: Vec<String>,
    room_id: String,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            players: vec![],
            room_id: "R1".to_string(),
        }
    }

    pub fn with_players(mut self, players: Vec<&str>) -> Self {
        self.players = players.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_three_players(self) -> Self {
        self.with_players(vec!["A", "B", "C"])
    }

    pub fn with_four_players(self) -> Self {
        self.with_players(vec!["A", "B", "C", "D"])
    }

    pub async fn build(self) -> TestSetup {
        let registry = Arc::new(RoomRegistry::default());
        let dispatcher = CommandDispatcher::with_pending_rules(registry.clone());

        let mut setup = TestSetup {
            registry,
            dispatcher,
            room_id: self.room_id,
            players: Vec::new(),
            inboxes: Mutex::new(HashMap::new()),
        };

        for player in &self.players {
            setup.join(player).await.expect("player should join");
        }
        setup
    }
}

impl TestSetup {
    /// Joins another player, keeping the receiving end of its connection
    pub async fn join(&mut self, player: &str) -> Result<(), cardroom::AppError> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.registry.join(&self.room_id, player, tx).await?;
        self.inboxes.lock().unwrap().insert(player.to_string(), rx);
        self.players.push(player.to_string());
        Ok(())
    }

    /// Everything delivered to `player` since the last call, without line terminators
    pub fn take_messages(&self, player: &str) -> Vec<String> {
        let mut inboxes = self.inboxes.lock().unwrap();
        let rx = inboxes
            .get_mut(player)
            .unwrap_or_else(|| panic!("unknown player {player}"));

        let mut messages = Vec::new();
        while let Ok(message) = rx.try_recv() {
            assert!(message.ends_with('\n'), "every delivery ends with a newline");
            messages.push(message.trim_end_matches('\n').to_string());
        }
        messages
    }

    /// Clear all recorded messages
    pub fn clear_messages(&self) {
        for player in &self.players {
            self.take_messages(player);
        }
    }

    pub async fn room(&self) -> Room {
        self.registry.get_or_create(&self.room_id).await
    }
}

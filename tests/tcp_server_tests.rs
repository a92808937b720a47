use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use cardroom::{serve, AppState, CommandDispatcher, RoomRegistry};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

const READ_TIMEOUT: Duration = Duration::from_secs(5);
const GAME_STARTED_PREFIX: &str = "All players are ready, game has started. Here are your cards: ";

async fn start_server() -> (SocketAddr, Arc<RoomRegistry>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let registry = Arc::new(RoomRegistry::default());
    let dispatcher = Arc::new(CommandDispatcher::with_pending_rules(registry.clone()));
    let state = AppState::new(registry.clone(), dispatcher);
    tokio::spawn(serve(listener, state));

    (addr, registry)
}

struct Client {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: SocketAddr, username: &str, room_id: &str) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read, writer) = stream.into_split();
        let mut client = Self {
            lines: BufReader::new(read).lines(),
            writer,
        };
        let handshake = serde_json::json!({ "username": username, "socketId": room_id });
        client.send(&handshake.to_string()).await;
        client
    }

    async fn send(&mut self, line: &str) {
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
    }

    async fn command(&mut self, room_id: &str, command: &str, metadata: &str) {
        let envelope = serde_json::json!({
            "socketId": room_id,
            "command": command,
            "metadata": metadata,
        });
        self.send(&envelope.to_string()).await;
    }

    async fn next_line(&mut self) -> Option<String> {
        timeout(READ_TIMEOUT, self.lines.next_line())
            .await
            .expect("timed out waiting for a line")
            .unwrap()
    }

    async fn expect_line(&mut self, expected: &str) {
        assert_eq!(self.next_line().await.as_deref(), Some(expected));
    }

    /// Reads until a game-start line arrives and returns its card payload
    async fn wait_for_hand(&mut self) -> Vec<serde_json::Value> {
        loop {
            let line = self.next_line().await.expect("connection closed early");
            if let Some(json) = line.strip_prefix(GAME_STARTED_PREFIX) {
                return serde_json::from_str(json).unwrap();
            }
        }
    }
}

async fn join_table(addr: SocketAddr, room_id: &str, players: &[&str]) -> Vec<Client> {
    let mut clients = Vec::new();
    for player in players {
        let mut client = Client::connect(addr, player, room_id).await;
        client
            .expect_line(&format!("Welcome to room {room_id}, {player}!"))
            .await;
        clients.push(client);
    }
    clients
}

#[tokio::test]
async fn test_welcome_and_room_full() {
    let (addr, registry) = start_server().await;
    let _table = join_table(addr, "R1", &["A", "B", "C", "D"]).await;

    let mut late = Client::connect(addr, "E", "R1").await;
    late.expect_line("Sorry, the maximum number of players in a game has been reached.")
        .await;
    assert_eq!(late.next_line().await, None);

    let room = registry.get_or_create("R1").await;
    assert_eq!(room.player_count(), 4);
    assert!(!room.has_player("E"));
}

#[tokio::test]
async fn test_invalid_handshake_closes_connection() {
    let (addr, registry) = start_server().await;

    let stream = TcpStream::connect(addr).await.unwrap();
    let (read, mut writer) = stream.into_split();
    let mut lines = BufReader::new(read).lines();
    writer.write_all(b"hello\n").await.unwrap();

    let reply = timeout(READ_TIMEOUT, lines.next_line())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert!(reply.starts_with("Invalid handshake: "));
    assert_eq!(
        timeout(READ_TIMEOUT, lines.next_line()).await.unwrap().unwrap(),
        None
    );
    assert_eq!(registry.room_count().await, 0);
}

#[tokio::test]
async fn test_ready_flow_over_tcp() {
    let (addr, _registry) = start_server().await;
    let mut table = join_table(addr, "R1", &["A", "B", "C", "D"]).await;

    for client in table.iter_mut() {
        client.command("R1", "/ready", "").await;
    }

    let mut seen = std::collections::HashSet::new();
    for client in table.iter_mut() {
        let hand = client.wait_for_hand().await;
        assert_eq!(hand.len(), 13);
        for card in hand {
            assert!(seen.insert(card["ID"].as_u64().unwrap()));
        }
    }
    assert_eq!(seen.len(), 52);
}

#[tokio::test]
async fn test_chat_over_tcp() {
    let (addr, _registry) = start_server().await;
    let mut table = join_table(addr, "R1", &["A", "B"]).await;

    table[0].send("/chat hello").await;
    table[1].expect_line("A: hello").await;

    // Sender gets nothing back; the next line A sees is its own help reply
    table[0].command("R1", "/help", "").await;
    table[0].expect_line("Enter").await;
}

#[tokio::test]
async fn test_rooms_are_isolated() {
    let (addr, _registry) = start_server().await;
    let mut first = join_table(addr, "R1", &["A"]).await;
    let mut second = join_table(addr, "R2", &["A"]).await;

    first[0].send("/chat only here").await;
    second[0].command("R2", "/check", "").await;

    second[0]
        .expect_line("Checking status of players in room R2...")
        .await;
    second[0].expect_line("A: is not ready yet").await;
}

#[tokio::test]
async fn test_disconnect_frees_seat() {
    let (addr, registry) = start_server().await;
    let mut table = join_table(addr, "R1", &["A", "B", "C", "D"]).await;

    drop(table.remove(1));

    // Removal happens once the server notices EOF
    let mut freed = false;
    for _ in 0..50 {
        if !registry.get_or_create("R1").await.has_player("B") {
            freed = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(freed, "B should be removed after disconnecting");

    let mut replacement = Client::connect(addr, "E", "R1").await;
    replacement.expect_line("Welcome to room R1, E!").await;

    let room = registry.get_or_create("R1").await;
    assert_eq!(room.player_count(), 4);
    assert!(room.has_player("E"));
}

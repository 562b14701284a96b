use crate::api::{GuildMember, Role};
use crate::core::config::{Config, ConfigOverrides, Settings};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

pub const SAMPLE_ROSTER_JSON: &str = r#"{
    "name": "Whispering Woods",
    "realm": "Thrall",
    "members": [
        { "rank": 3, "character": { "name": "Aldra", "class": 8, "race": 10, "gender": 1, "level": 100,
          "thumbnail": "thrall/1/2-avatar.jpg", "spec": { "name": "Frost", "role": "DPS" } } },
        { "rank": 1, "character": { "name": "Brokk", "class": 1, "race": 3, "gender": 0, "level": 100,
          "thumbnail": "thrall/3/4-avatar.jpg", "spec": { "name": "Protection", "role": "TANK" } } },
        { "rank": 1, "character": { "name": "Cyra", "class": 5, "race": 1, "gender": 1, "level": 100,
          "thumbnail": "thrall/5/6-avatar.jpg", "spec": { "name": "Holy", "role": "HEALING" } } },
        { "rank": 2, "character": { "name": "Dorn", "class": 11, "race": 6, "gender": 0, "level": 98,
          "thumbnail": "thrall/7/8-avatar.jpg" } }
    ]
}"#;

pub fn create_test_member(name: &str, rank: u32) -> GuildMember {
    GuildMember {
        name: name.to_string(),
        race: 1,
        gender: 0,
        level: 100,
        class: 1,
        thumbnail_path: format!("thrall/{}-avatar.jpg", name.to_lowercase()),
        spec_name: "Arms".to_string(),
        role: Role::Dps,
        rank,
    }
}

pub fn create_test_members(ranks: &[u32]) -> Vec<GuildMember> {
    ranks
        .iter()
        .enumerate()
        .map(|(index, rank)| create_test_member(&format!("Member{index}"), *rank))
        .collect()
}

/// Settings pointing the roster API at `api_host`, typically a [`MockUpstream`].
pub fn test_settings(api_host: &str) -> Settings {
    let config = Config {
        api_host: Some(api_host.to_string()),
        server: Some("Thrall".to_string()),
        guild: Some("Whispering Woods".to_string()),
        api_key: Some("test-key".to_string()),
        timeout_secs: Some(2),
        ..Config::default()
    };
    Settings::resolve(&config, &ConfigOverrides::default(), None)
        .expect("test settings should resolve")
}

pub fn json_response(status: u16, body: &str) -> String {
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    };
    format!(
        "HTTP/1.1 {status} {reason}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    )
}

enum Behaviour {
    Respond(String),
    Stall(Duration),
}

/// Throwaway HTTP upstream bound to an ephemeral local port.
pub struct MockUpstream {
    addr: SocketAddr,
    last_request_line: Arc<Mutex<Option<String>>>,
    task: JoinHandle<()>,
}

impl MockUpstream {
    /// Answer every connection with the same raw HTTP response.
    pub async fn respond_with(response: String) -> Self {
        Self::spawn(Behaviour::Respond(response)).await
    }

    /// Accept connections but hold them open without answering.
    pub async fn stall(delay: Duration) -> Self {
        Self::spawn(Behaviour::Stall(delay)).await
    }

    async fn spawn(behaviour: Behaviour) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("local addr should resolve");
        let last_request_line = Arc::new(Mutex::new(None));
        let captured = Arc::clone(&last_request_line);
        let behaviour = Arc::new(behaviour);

        let task = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    return;
                };
                let captured = Arc::clone(&captured);
                let behaviour = Arc::clone(&behaviour);
                tokio::spawn(async move {
                    serve_connection(stream, &behaviour, &captured).await;
                });
            }
        });

        Self {
            addr,
            last_request_line,
            task,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub async fn request_line(&self) -> String {
        self.last_request_line
            .lock()
            .await
            .clone()
            .unwrap_or_default()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve_connection(
    mut stream: TcpStream,
    behaviour: &Behaviour,
    captured: &Mutex<Option<String>>,
) {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 1024];
    while !buffer.windows(4).any(|window| window == b"\r\n\r\n") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(read) => buffer.extend_from_slice(&chunk[..read]),
        }
    }

    let head = String::from_utf8_lossy(&buffer);
    if let Some(line) = head.lines().next() {
        *captured.lock().await = Some(line.to_string());
    }

    match behaviour {
        Behaviour::Respond(response) => {
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
        Behaviour::Stall(delay) => {
            tokio::time::sleep(*delay).await;
        }
    }
}

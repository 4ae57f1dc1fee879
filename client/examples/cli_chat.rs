use anyhow::Result;
use banter_client::{
    ChannelSender, Client, ClientConfig, Connection, Key, KeyPress, LogSink, ReconnectPolicy,
    TransportEvent,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Prints room log lines to the terminal
struct PrintLog {
    room_id: String,
}

impl LogSink for PrintLog {
    fn append_line(&mut self, tokens: &[String]) {
        match tokens.first().map(String::as_str) {
            Some("c") | Some("chat") if tokens.len() >= 3 => {
                println!("[{}] {}: {}", self.room_id, tokens[1].trim(), tokens[2]);
            }
            Some("c:") if tokens.len() >= 4 => {
                println!("[{}] {}: {}", self.room_id, tokens[2].trim(), tokens[3]);
            }
            Some("error") => println!("[{}] error: {}", self.room_id, tokens[1..].join("|")),
            Some("") => println!("[{}] {}", self.room_id, tokens[1..].join("|")),
            _ => tracing::debug!(room = %self.room_id, line = %tokens.join("|"), "Unshown line"),
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  /room <room>        - Switch to an open room");
    println!("  /rooms              - List open rooms");
    println!("  /users              - List users in the current room");
    println!("  /make <format>      - Challenge the DM peer");
    println!("  /acceptchallenge    - Accept the DM peer's challenge");
    println!("  /quit               - Exit");
    println!("  /join, /part, /challenge <user>, /cancelchallenge, /reject");
    println!("  <message>           - Send message to current room");
}

/// Commands the terminal handles itself. Returns false to quit.
fn handle_input(client: &mut Client, current: &mut String, line: &str) -> bool {
    let (cmd, arg) = line.split_once(' ').unwrap_or((line, ""));
    let arg = arg.trim();

    match cmd {
        "/help" => print_help(),
        "/quit" | "/exit" => return false,
        "/room" => {
            if client.room(arg).is_some() {
                *current = arg.to_string();
                println!("Switched to room: {}", arg);
            } else {
                println!("Not in room: {}", arg);
            }
        }
        "/rooms" => {
            for id in client.room_ids() {
                let marker = if id == current.as_str() { " *" } else { "" };
                println!("  {}{}", id, marker);
            }
        }
        "/users" => {
            if let Some(room) = client.room(current) {
                println!("{} users in {}", room.user_count(), room.title());
                for user in room.sorted_users(client.groups()) {
                    println!("  {}", user.display_name());
                }
            }
        }
        "/make" | "/acceptchallenge" => {
            let Some(room) = client.room_mut(current) else {
                return true;
            };
            let result = if cmd == "/make" {
                room.make_challenge(arg, None)
            } else {
                let format = room
                    .challenges()
                    .incoming()
                    .map(|c| c.format_name.clone())
                    .unwrap_or_default();
                room.accept_challenge(&format, None)
            };
            if let Err(e) = result {
                println!("Error: {}", e);
            }
        }
        _ => {
            // everything else goes through the draft like a typed line
            if let Some(entry) = client.entry_mut(current) {
                entry.set_value(line, None);
            }
            if let Err(e) = client.handle_key(current, KeyPress::new(Key::Enter)) {
                println!("Error: {}", e);
            }
        }
    }
    true
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };

    println!("Connecting to {}...", config.server_url);
    let (sender, outgoing) = ChannelSender::channel();
    let mut connection =
        Connection::open(&config.server_url, ReconnectPolicy::default(), outgoing).await?;
    println!("Connected. Type /help for commands.\n");

    let mut current = config.autojoin.first().cloned().unwrap_or_default();
    let mut client = Client::new(config, sender).with_log_factory(|room_id| {
        Box::new(PrintLog {
            room_id: room_id.to_string(),
        })
    });
    client.autojoin();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = connection.next_event() => match event? {
                TransportEvent::Frame(frame) => client.receive_frame(frame),
                TransportEvent::Reconnected => client.rejoin_all(),
                TransportEvent::Closed => break,
            },
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !handle_input(&mut client, &mut current, line.trim()) {
                    break;
                }
            }
        }
    }

    Ok(())
}

//! Chat command

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::render;
use crate::config::Config;
use crate::services::ChatSession;

pub async fn cmd_chat(config: &Config, message: &[String]) -> anyhow::Result<()> {
    let backend = super::connect(config)?;
    let mut session = ChatSession::new();

    if !message.is_empty() {
        if let Some(reply) = session.send(backend.as_ref(), &message.join(" ")).await {
            println!("{}", render::chat_message(reply));
        }
        return Ok(());
    }

    println!("Ask about recipes. Type 'exit' to leave.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }
        if let Some(reply) = session.send(backend.as_ref(), line).await {
            println!("{}", render::chat_message(reply));
        }
    }

    Ok(())
}

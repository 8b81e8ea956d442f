use std::io::{self, BufRead, Write};

use bidwatch_agent::{ChatSession, OpenRouterClient};

use super::{build_gateway, load_config, CommandResult, EXIT_FAILURE};

pub async fn run() -> CommandResult {
    let config = match load_config() {
        Ok(config) => config,
        Err(result) => return result,
    };
    let gateway = match build_gateway(&config) {
        Ok(gateway) => gateway,
        Err(result) => return result,
    };
    let client = match OpenRouterClient::new(&config.llm) {
        Ok(client) => client,
        Err(error) => {
            return CommandResult::failure(
                format!("could not build completion client: {error}"),
                EXIT_FAILURE,
            )
        }
    };

    let snapshot = match gateway.fetch_all().await {
        Ok(snapshot) => snapshot,
        Err(error) => {
            return CommandResult::failure(format!("could not fetch records: {error}"), EXIT_FAILURE)
        }
    };

    let mut session = ChatSession::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("Ask about a bid, agency, category, or strategy. Empty line or Ctrl-D exits.");
    loop {
        print!("> ");
        if stdout.flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let message = line.trim();
        if message.is_empty() {
            break;
        }

        println!("thinking...");
        let reply = session.send(&client, &snapshot.records, message).await;
        println!("{}", reply.content);
    }

    CommandResult::ok("chat session ended")
}

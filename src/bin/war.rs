//! War Server Binary
//!
//! Hosts matchmaking and concurrent War sessions over TCP, or drives one
//! or many scripted clients against a running server.

use clap::Parser;
use clap::Subcommand;
use robowar::hosting::*;
use robowar::war::*;
use robowar::*;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Host to bind or connect to. The server falls back to BIND_ADDR.
    #[arg(long, global = true)]
    host: Option<String>,
    #[arg(long, global = true, default_value_t = 7878)]
    port: u16,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand)]
enum Mode {
    #[command(about = "Accept players and host their games")]
    Server {
        #[arg(long, default_value_t = DECK_SIZE)]
        deck: usize,
        #[arg(long, default_value_t = WAR_STAKE)]
        war_stake: usize,
        #[arg(long, default_value = "tally", value_parser = scoring)]
        scoring: Scoring,
        #[arg(long, default_value_t = MAX_ROUNDS)]
        max_rounds: usize,
        /// Seconds to wait for each message during a game.
        #[arg(long, default_value_t = READ_TIMEOUT)]
        read_timeout: u64,
        /// Seconds to wait for the opening want_game.
        #[arg(long, default_value_t = HANDSHAKE_TIMEOUT)]
        handshake_timeout: u64,
        /// Deal every round without waiting for ready.
        #[arg(long)]
        unpaced: bool,
    },
    #[command(about = "Play a single game against a server")]
    Client,
    #[command(about = "Play many games at once against a server")]
    Clients {
        #[arg(required = true)]
        n: usize,
        #[arg(long, default_value_t = CLIENT_CONCURRENCY)]
        concurrency: usize,
    },
}

fn scoring(s: &str) -> Result<Scoring, String> {
    Scoring::try_from(s)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    log()?;
    kys();
    match cli.mode {
        Mode::Server {
            deck,
            war_stake,
            scoring,
            max_rounds,
            read_timeout,
            handshake_timeout,
            unpaced,
        } => {
            let config = Config {
                rules: Rules {
                    war_stake,
                    scoring,
                    max_rounds,
                },
                deck,
                read_timeout: Duration::from_secs(read_timeout),
                handshake_timeout: Duration::from_secs(handshake_timeout),
                paced: !unpaced,
            };
            log::info!("[server] {:?}", config);
            let addr = cli.host.map(|host| format!("{}:{}", host, cli.port));
            let casino = Arc::new(Casino::new(config));
            Server::bind(addr, casino).await?.run().await
        }
        Mode::Client => {
            let addr = format!("{}:{}", cli.host.as_deref().unwrap_or("127.0.0.1"), cli.port);
            let verdict = Client::play(&addr).await?;
            log::info!("[client] {:?}", verdict);
            Ok(())
        }
        Mode::Clients { n, concurrency } => {
            let addr = format!("{}:{}", cli.host.as_deref().unwrap_or("127.0.0.1"), cli.port);
            let summary = Client::swarm(&addr, n, concurrency).await;
            println!("{}", summary);
            Ok(())
        }
    }
}

//! CellBridge CLI Client
//!
//! Command-line interface for the CellBridge user API.

use cellbridge::gateway::GatewayClient;
use cellbridge::Config;
use clap::{Parser, Subcommand};
use reqwest::{Client, RequestBuilder};
use serde_json::json;

/// CellBridge CLI
#[derive(Parser, Debug)]
#[command(name = "cellbridge-cli")]
#[command(about = "CLI for the CellBridge user API")]
#[command(version)]
struct Args {
    /// Server base URL
    #[arg(short, long, default_value = "http://127.0.0.1:7070", env = "CELLBRIDGE_SERVER")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the users table
    Init,

    /// Add a user
    Create {
        id: String,
        name: String,
        email: String,
        age: String,
    },

    /// Get a user by id
    Get {
        id: String,
    },

    /// Replace a user's fields
    Update {
        id: String,
        name: String,
        email: String,
        age: String,
    },

    /// Delete a user
    #[command(alias = "del")]
    Delete {
        id: String,
    },

    /// List users, ordered by id
    List {
        #[arg(short, long, default_value = "1")]
        page: usize,

        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Ask the storage gateway for its version
    Ping {
        /// Storage gateway base URL
        #[arg(short, long, default_value = "http://127.0.0.1:8080")]
        gateway: String,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let base = args.server.trim_end_matches('/').to_string();
    let client = Client::new();

    let request = match args.command {
        Commands::Init => client.get(format!("{}/init", base)),
        Commands::Create { id, name, email, age } => client
            .post(format!("{}/users", base))
            .json(&json!({ "id": id, "name": name, "email": email, "age": age })),
        Commands::Get { id } => client.get(user_url(&base, &id)),
        Commands::Update { id, name, email, age } => client
            .put(user_url(&base, &id))
            .json(&json!({ "name": name, "email": email, "age": age })),
        Commands::Delete { id } => client.delete(user_url(&base, &id)),
        Commands::List { page, limit } => client
            .get(format!("{}/users", base))
            .query(&[("page", page), ("limit", limit)]),
        Commands::Ping { gateway } => {
            ping(&gateway).await;
            return;
        }
    };

    send(request).await;
}

fn user_url(base: &str, id: &str) -> String {
    let mut url = match reqwest::Url::parse(base) {
        Ok(url) => url,
        Err(e) => fail(&format!("invalid server url '{}': {}", base, e)),
    };
    match url.path_segments_mut() {
        Ok(mut segments) => {
            segments.pop_if_empty().extend(["users", id]);
        }
        Err(_) => fail(&format!("server url '{}' cannot be a base", base)),
    }
    url.to_string()
}

async fn send(request: RequestBuilder) {
    let response = match request.send().await {
        Ok(r) => r,
        Err(e) => fail(&format!("request failed: {}", e)),
    };

    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if status.is_success() {
        println!("{}", body);
    } else {
        fail(&format!("{}: {}", status, body));
    }
}

async fn ping(gateway: &str) {
    let config = Config::builder().gateway_url(gateway).build();
    let client = match GatewayClient::new(&config) {
        Ok(c) => c,
        Err(e) => fail(&e.to_string()),
    };

    match client.version().await {
        Ok(version) => println!("Gateway cluster version: {}", version),
        Err(e) => fail(&e.to_string()),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, SET_COOKIE};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "spiracle-cli")]
#[command(about = "Operator CLI for a running Spiracle gate", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the gate's liveness endpoint
    Health,
    /// Try a password and print the resulting cookie
    Login {
        #[arg(short, long, env = "DEMO_PASSWORD")]
        password: String,
    },
    /// Log in, then send one message through the chat webhook
    Chat {
        #[arg(short, long, env = "DEMO_PASSWORD")]
        password: String,
        /// Session id; a fresh UUID when omitted
        #[arg(short, long)]
        session: Option<String>,
        message: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Login { password } => {
            if let Some(cookie) = login(&client, &cli.url, &password).await? {
                println!("{cookie}");
            }
        }
        Commands::Chat {
            password,
            session,
            message,
        } => {
            let Some(cookie) = login(&client, &cli.url, &password).await? else {
                return Ok(());
            };

            let mut headers = HeaderMap::new();
            headers.insert(COOKIE, HeaderValue::from_str(&cookie)?);

            let session = session.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            let res = client
                .post(format!("{}/api/chat", cli.url))
                .headers(headers)
                .json(&json!({ "message": message, "sessionId": session }))
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

/// Log in and return the `name=value` part of the auth cookie.
async fn login(
    client: &reqwest::Client,
    url: &str,
    password: &str,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let res = client
        .post(format!("{url}/api/auth"))
        .json(&json!({ "password": password }))
        .send()
        .await?;

    let cookie = res
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);

    if !res.status().is_success() {
        print_response(res).await?;
        return Ok(None);
    }
    Ok(cookie)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gate returned status {}", status);
    }

    let text = res.text().await?;
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}

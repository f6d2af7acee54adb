use fleet_advisor::config::DEFAULT_DATABASE_URL;
use fleet_advisor::lookup;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    print!("Enter the user name to retrieve conversation history: ");
    io::stdout().flush()?;
    let mut user_name = String::new();
    io::stdin().read_line(&mut user_name)?;
    let user_name = user_name.trim_end_matches(['\r', '\n']);

    let history = lookup::get_conversation_history(&database_url, user_name).await;

    let mut stdout = io::stdout().lock();
    lookup::write_report(&mut stdout, user_name, &history)?;
    stdout.flush()?;

    Ok(())
}

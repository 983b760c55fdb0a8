use anyhow::Result;
use clap::{Parser, Subcommand};

/// folio - portfolio contact relay
#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Relays portfolio contact-form submissions by email", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Load and validate configuration, then print a summary
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = folio::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    // Initialize observability (tracing + logging)
    folio::observability::init_observability(
        "folio",
        env!("CARGO_PKG_VERSION"),
        &config.observability,
    )?;

    match cli.command {
        Commands::Serve { host, port } => folio::server::serve(config, host, port).await,
        Commands::CheckConfig => {
            check_config(&config);
            Ok(())
        }
    }
}

fn check_config(config: &folio::Config) {
    let email = &config.email;

    println!("server:  {}:{}", config.server.host, config.server.port);
    println!(
        "smtp:    {}:{} ({})",
        email.smtp_host,
        email.smtp_port,
        if email.smtp_secure { "implicit TLS" } else { "STARTTLS or plain" }
    );
    println!(
        "auth:    {}",
        if email.has_credentials() { email.smtp_username.as_str() } else { "none" }
    );
    println!("from:    {}", email.from_mailbox());
    println!("to:      {}", email.contact_address);
    println!(
        "timeout: {}s relay, {}s connect",
        email.timeout_secs, email.connect_timeout_secs
    );
}

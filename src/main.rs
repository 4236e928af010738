use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use portfolio_backend::adapters::server;
use portfolio_backend::core::ConfigProvider;
use portfolio_backend::utils::{logger, validation::Validate, validation::validate_socket_addr};
use portfolio_backend::{
    build_mailer, CliConfig, ContactService, EnvConfig, ExperienceSummary, SiteConfig, SiteError,
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "portfolio-backend")]
#[command(about = "Backend for the portfolio site: contact endpoint and experience figures")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (POST /api/contact, GET /api/experience)
    Serve(CliConfig),
    /// Print years of experience
    Experience {
        /// Evaluate at this date instead of today (YYYY-MM-DD)
        #[arg(long)]
        at: Option<NaiveDate>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(config) => {
            if let Err(e) = run_server(config).await {
                exit_with(&e);
            }
        }
        Command::Experience { at, json } => {
            let today = at.unwrap_or_else(|| Local::now().date_naive());
            let summary = ExperienceSummary::at(&today);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{} ({} years including internship)", summary.text, summary.total);
            }
        }
    }

    Ok(())
}

async fn run_server(cli: CliConfig) -> portfolio_backend::Result<()> {
    // 選擇設定來源：TOML > 環境變數 > 命令列
    let (config, verbose, json_logs): (Box<dyn ConfigProvider>, bool, bool) =
        if let Some(path) = &cli.config {
            let site = SiteConfig::from_file(path)?;
            site.validate()?;
            let verbose = cli.verbose || site.verbose();
            let json_logs = cli.json_logs || site.json_logs();
            (Box::new(site) as Box<dyn ConfigProvider>, verbose, json_logs)
        } else if cli.from_env {
            let env = EnvConfig::from_env()?;
            env.validate()?;
            (Box::new(env) as Box<dyn ConfigProvider>, cli.verbose, cli.json_logs)
        } else {
            cli.validate()?;
            let (verbose, json_logs) = (cli.verbose, cli.json_logs);
            (Box::new(cli) as Box<dyn ConfigProvider>, verbose, json_logs)
        };

    // 初始化日誌
    logger::init_logger(verbose, json_logs);
    tracing::info!("Starting portfolio-backend");
    tracing::info!(
        "📬 Mailer: {:?}, recipient: {}",
        config.mailer_kind(),
        config.recipient()
    );

    let addr = validate_socket_addr("bind", config.bind_address())?;
    let mailer = build_mailer(config.as_ref())?;
    let service = Arc::new(ContactService::new(
        mailer,
        config.recipient().to_string(),
        config.sender().to_string(),
    ));

    server::serve(service, addr).await
}

fn exit_with(e: &SiteError) -> ! {
    tracing::error!(
        "❌ Server failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    std::process::exit(e.severity().exit_code());
}

use clap::Parser;
use portfolio_backend::core::{FormField, SubmissionStatus};
use portfolio_backend::utils::error::ErrorSeverity;
use portfolio_backend::utils::{logger, validation::validate_url};
use portfolio_backend::{ContactForm, HttpContactTransport, SiteError, SubmitOutcome};

#[derive(Parser)]
#[command(name = "contact-client")]
#[command(about = "Submit a message to the portfolio contact endpoint")]
struct Args {
    /// Contact endpoint URL
    #[arg(long, default_value = "http://127.0.0.1:4321/api/contact")]
    endpoint: String,

    #[arg(long)]
    first_name: String,

    #[arg(long)]
    last_name: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    phone: Option<String>,

    #[arg(long)]
    message: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    if let Err(e) = validate_url("endpoint", &args.endpoint) {
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.severity().exit_code());
    }

    let transport = HttpContactTransport::new(args.endpoint)?;
    println!("🚀 Sending message to {}", transport.endpoint());

    let form = ContactForm::new(transport);
    form.set_field(FormField::FirstName, args.first_name);
    form.set_field(FormField::LastName, args.last_name);
    form.set_field(FormField::Email, args.email);
    form.set_field(FormField::Phone, args.phone.unwrap_or_default());
    form.set_field(FormField::Message, args.message);

    // 輸出狀態變化
    let mut updates = form.subscribe();
    let watcher = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let status = updates.borrow_and_update().status;
            println!("… status: {:?}", status);
            if status == SubmissionStatus::Error || status == SubmissionStatus::Success {
                break;
            }
        }
    });

    let outcome = form.submit().await;
    if matches!(outcome, SubmitOutcome::Sent | SubmitOutcome::Failed) {
        let _ = watcher.await;
    } else {
        watcher.abort();
    }

    match outcome {
        SubmitOutcome::Sent => {
            println!("✅ Thank you! Your message has been sent successfully.");
            Ok(())
        }
        SubmitOutcome::Invalid(fields) => {
            let e = SiteError::MissingFieldsError {
                fields: fields.into_iter().map(String::from).collect(),
            };
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.severity().exit_code());
        }
        SubmitOutcome::Failed | SubmitOutcome::Ignored => {
            eprintln!("❌ Oops! Something went wrong. Please try again.");
            std::process::exit(ErrorSeverity::Medium.exit_code());
        }
    }
}

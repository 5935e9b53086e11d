use anyhow::{Context, Result};
use std::env;
use std::io::{self, BufRead, Write};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use supportpal::ai::flows_from_config;
use supportpal::credentials::ApiKeyStore;
use supportpal::query::{Field, QueryForm, QueryTopic, UrgencyLevel};
use supportpal::store::{KvStore, PendingQueries};
use supportpal::{App, Config, SupportData};

fn setup_logging() {
    use std::fs::OpenOptions;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,supportpal=debug"));

    // Try to create a log file in the config directory
    let log_file = Config::config_dir()
        .ok()
        .and_then(|dir| std::fs::create_dir_all(&dir).ok().map(|_| dir))
        .map(|dir| dir.join("supportpal.log"))
        .and_then(|path| {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .ok()
        });

    if let Some(file) = log_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else {
        // Fallback to stderr if file logging fails
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_usage() {
    eprintln!(
        r#"supportpal - Customer support inbox with AI assistance

Usage: supportpal [command]

Commands:
    (none)      Open the inbox
    open <id>   Open the inbox with one inquiry selected
    submit      Submit a product query
    setup       Configure the AI provider and API key
    help        Show this help message

Inbox keys:
    j/k         Move the cursor
    Enter       Open the highlighted inquiry
    t           Re-run triage
    q           Quit

Conversation keys:
    i/Enter     Edit the draft (Esc to stop, Ctrl+S to send)
    a           Copy the suggested reply into the draft
    1-9         Replace the draft with a quick response
    s           Send the draft
    c           Clear the draft
    r / u / f   Regenerate the reply, summary or article suggestions
    Tab / o     Select and open a knowledge base link
    j/k         Scroll the conversation
    Esc         Back to the inbox

Configuration file: ~/.config/supportpal/config.toml
API key: SUPPORTPAL_API_KEY, the OS keyring, or [ai].api_key
"#
    );
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        anyhow::bail!("stdin closed");
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn run_setup() -> Result<()> {
    println!("SupportPal Setup");
    println!("================\n");

    let mut config = Config::load()?;

    let key = loop {
        print!("OpenRouter API key: ");
        io::stdout().flush()?;
        let key = rpassword_read()?;
        println!();
        if !key.is_empty() {
            break key;
        }
        println!("The API key cannot be empty.");
    };

    let model = prompt(&format!("Model [{}]: ", config.ai.model))?;
    if !model.trim().is_empty() {
        config.ai.model = model.trim().to_string();
    }

    let agent = prompt(&format!("Agent display name [{}]: ", config.inbox.agent_name))?;
    if !agent.trim().is_empty() {
        config.inbox.agent_name = agent.trim().to_string();
    }

    // The key lives in the keyring or key file, not in config.toml
    config.ai.api_key = None;
    config.ensure_dirs()?;
    config.save()?;
    println!("Configuration saved to {}", Config::config_path()?.display());

    ApiKeyStore::new().set_api_key(&key)?;
    println!("API key stored.");

    println!("\nSetup complete! Run 'supportpal' to start.");
    Ok(())
}

fn rpassword_read() -> Result<String> {
    // Disable echo
    let _guard = DisableEcho::new()?;

    let mut secret = String::new();
    io::stdin().read_line(&mut secret)?;
    Ok(secret.trim().to_string())
}

struct DisableEcho {
    #[cfg(unix)]
    original: libc::termios,
}

impl DisableEcho {
    #[cfg(unix)]
    fn new() -> Result<Self> {
        use std::mem::MaybeUninit;
        use std::os::unix::io::AsRawFd;

        let fd = std::io::stdin().as_raw_fd();
        let mut termios = MaybeUninit::<libc::termios>::uninit();

        unsafe {
            if libc::tcgetattr(fd, termios.as_mut_ptr()) != 0 {
                anyhow::bail!("Failed to get terminal attributes");
            }
            let original = termios.assume_init();
            let mut new = original;
            new.c_lflag &= !libc::ECHO;
            if libc::tcsetattr(fd, libc::TCSANOW, &new) != 0 {
                anyhow::bail!("Failed to set terminal attributes");
            }
            Ok(Self { original })
        }
    }

    #[cfg(not(unix))]
    fn new() -> Result<Self> {
        Ok(Self {})
    }
}

#[cfg(unix)]
impl Drop for DisableEcho {
    fn drop(&mut self) {
        use std::os::unix::io::AsRawFd;
        let fd = std::io::stdin().as_raw_fd();
        unsafe {
            libc::tcsetattr(fd, libc::TCSANOW, &self.original);
        }
    }
}

async fn open_queue(config: &Config) -> Result<PendingQueries> {
    config.ensure_dirs()?;
    let path = config.store_path()?;
    let store = KvStore::open(&path).await?;
    Ok(PendingQueries::new(store))
}

async fn run_submit(config: &Config) -> Result<()> {
    println!("Submit a Product Query");
    println!("======================\n");

    let topics = QueryTopic::ALL
        .iter()
        .map(|t| format!("{} ({})", t.as_str(), t.label()))
        .collect::<Vec<_>>()
        .join(", ");
    let urgencies = UrgencyLevel::ALL
        .iter()
        .map(|u| format!("{} - {}", u.as_str(), u.description()))
        .collect::<Vec<_>>()
        .join(", ");

    let mut form = QueryForm::default();
    let mut ask = vec![
        Field::Name,
        Field::Email,
        Field::QueryTopic,
        Field::UrgencyLevel,
        Field::Message,
    ];

    let query = loop {
        for field in &ask {
            match field {
                Field::Name => form.name = prompt("Your name: ")?,
                Field::Email => form.email = prompt("Your email: ")?,
                Field::QueryTopic => {
                    println!("Topics: {}", topics);
                    form.query_topic = prompt("Query topic: ")?;
                }
                Field::UrgencyLevel => {
                    println!("Urgency: {}", urgencies);
                    form.urgency_level = prompt("Urgency level: ")?;
                }
                Field::Message => form.message = prompt("Message: ")?,
            }
        }

        match form.validate() {
            Ok(query) => break query,
            Err(errors) => {
                for e in &errors.0 {
                    println!("  {}", e.message);
                }
                ask = errors.0.iter().map(|e| e.field).collect();
            }
        }
    };

    let queue = open_queue(config).await?;
    queue.enqueue(&query).await?;
    let waiting = queue.len().await?;

    println!("\nProduct Query Submitted!");
    println!("Your query has been received and will appear in the inbox.");
    println!("{} queries waiting for the next inbox load.", waiting);
    Ok(())
}

async fn start_app(config: &Config) -> Result<App> {
    let api_key = ApiKeyStore::new()
        .get_api_key(config.ai.api_key.as_deref())
        .map(|(key, source)| {
            tracing::info!("Using API key from {}", source.as_str());
            key
        });
    if api_key.is_none() {
        eprintln!("No API key configured; AI suggestions will show fallbacks.");
        eprintln!("Run 'supportpal setup' or set SUPPORTPAL_API_KEY.\n");
    }

    let flows = flows_from_config(&config.ai, api_key);
    let mut app = App::new(
        config.inbox.clone(),
        flows,
        SupportData::seeded(chrono::Utc::now()),
    );

    let queue = open_queue(config).await?;
    println!("Triaging inquiries...");
    let merged = app
        .bootstrap(&queue)
        .await
        .context("Failed to load the inbox")?;
    if merged > 0 {
        println!("{} new product queries added.", merged);
    }
    Ok(app)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("help") | Some("--help") | Some("-h") => {
            print_usage();
            Ok(())
        }
        Some("setup") => run_setup().await,
        Some("submit") => {
            setup_logging();
            let config = Config::load()?;
            run_submit(&config).await
        }
        Some("open") => {
            let Some(id) = args.get(2) else {
                eprintln!("Usage: supportpal open <id>");
                std::process::exit(1);
            };
            setup_logging();
            let config = Config::load()?;
            let mut app = start_app(&config).await?;
            if let Err(e) = app.open_inquiry(id).await {
                app.shutdown().await;
                eprintln!("{}", e);
                std::process::exit(1);
            }
            app.run().await
        }
        Some(cmd) => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            std::process::exit(1);
        }
        None => {
            setup_logging();
            let config = Config::load()?;
            let mut app = start_app(&config).await?;
            app.run().await
        }
    }
}

//! viewbind CLI - demo host for the binder and table components

use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;

use viewbind::{
    check_balance, create_fetcher, placeholder, Binder, Counter, CounterView, DataTable,
    FixSuggestion, LoadState, TextView, ViewError, ViewHandle, DATA_SOURCE_ATTR, DEFAULT_ACCOUNTS_URL,
};

#[derive(Parser)]
#[command(name = "viewbind")]
#[command(about = "Demo host for one-way bindings and async data tables")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bind a template to one property and apply writes
    Bind {
        /// Template containing {{ property }} placeholders
        #[arg(short, long)]
        template: String,

        /// Tracked property name
        #[arg(short, long)]
        property: String,

        /// Values written to the property, in order (first is the initial value)
        #[arg(long = "value")]
        values: Vec<String>,
    },

    /// Render a data table from a URL or inline JSON
    Table {
        /// URL returning a JSON array
        #[arg(short, long, conflicts_with = "data")]
        source: Option<String>,

        /// Inline JSON rows
        #[arg(short, long)]
        data: Option<String>,

        /// Also print the isolated markup
        #[arg(long)]
        shadow: bool,
    },

    /// Click a bound counter
    Counter {
        /// Number of clicks
        #[arg(short, long, default_value_t = 3)]
        clicks: u32,
    },

    /// Check whether an account is in credit
    Balance {
        account: String,

        #[arg(long, default_value = DEFAULT_ACCOUNTS_URL)]
        base_url: String,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (ignore if not present)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let result = match cli.command {
        Commands::Bind {
            template,
            property,
            values,
        } => {
            run_bind(&template, &property, &values);
            Ok(())
        }
        Commands::Table {
            source,
            data,
            shadow,
        } => run_table(source, data, shadow).await,
        Commands::Counter { clicks } => {
            run_counter(clicks);
            Ok(())
        }
        Commands::Balance { account, base_url } => run_balance(&account, &base_url).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

/// Treat each CLI value as JSON when it parses, as a string otherwise
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn run_bind(template: &str, property: &str, values: &[String]) {
    if !placeholder::references(template, property) {
        tracing::warn!(property, "template has no {{{{ {} }}}} placeholder", property);
    }

    let view = TextView::new(template);
    let mut values = values.iter().map(|v| parse_value(v));

    let initial: Vec<(String, Value)> = values
        .next()
        .map(|v| vec![(property.to_string(), v)])
        .unwrap_or_default();
    let mut binder = Binder::new(view.clone(), initial, property);
    println!("{}", view.content());

    for value in values {
        binder.set(property, value);
        println!("{}", view.content());
    }
}

async fn run_table(source: Option<String>, data: Option<String>, shadow: bool) -> Result<(), ViewError> {
    let fetcher = create_fetcher("http")?;
    let table = DataTable::new(Arc::from(fetcher));

    if let Some(raw) = data {
        let value: Value = serde_json::from_str(&raw).map_err(|e| ViewError::json(&e))?;
        table.set_data(value);
    }
    if let Some(url) = source {
        if let Some(load) = table.set_attribute(DATA_SOURCE_ATTR, &url) {
            // The handle never carries the load outcome; a join error only means the task panicked
            let _ = load.await;
        }
    }

    println!("{}", table.host_markup());
    if shadow {
        println!("{}", table.shadow_root().inner_html());
    }

    match table.load_state() {
        LoadState::Empty => println!("{} no rows", "∅".dimmed()),
        LoadState::Ready => println!(
            "{} {} rows × {} columns",
            "✓".green(),
            table.data().len(),
            table.columns().len()
        ),
        LoadState::Error(message) => println!("{} {}", "✗".red(), message),
    }
    Ok(())
}

fn run_counter(clicks: u32) {
    let display = TextView::new("Count: {{ count }}");
    let mut app = CounterView::new(display.clone(), Counter::default());
    println!("{}", display.content());
    for _ in 0..clicks {
        app.click();
        println!("{}", display.content());
    }
}

async fn run_balance(account: &str, base_url: &str) -> Result<(), ViewError> {
    let fetcher = create_fetcher("http")?;
    let in_credit = check_balance(fetcher.as_ref(), base_url, account).await?;
    if in_credit {
        println!("{} {} is in credit", "✓".green(), account.cyan());
    } else {
        println!("{} {} is not in credit", "✗".red(), account.cyan());
    }
    Ok(())
}

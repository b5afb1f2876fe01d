//! # LeadWatch — CRM follow-up alerts
//!
//! Pulls leads from a Notion CRM database, buckets them by days since last
//! contact, and posts a summary to a Telegram group topic. Meant to be run
//! from cron or a systemd timer.
//!
//! Usage:
//!   leadwatch run                 # Extract, compose and send
//!   leadwatch run --dry-run       # Print the message without sending
//!   leadwatch leads --limit 10    # Check the Notion connection
//!   leadwatch discover            # Find the Telegram group/topic ids

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use leadwatch_alerts::{AlertComposer, Buckets, Delivery, run_alerts};
use leadwatch_channels::TelegramChannel;
use leadwatch_core::LeadWatchConfig;
use leadwatch_core::config::{ENV_TELEGRAM_CHAT, ENV_TELEGRAM_THREAD};
use leadwatch_core::traits::{LeadSource, Notifier};
use leadwatch_crm::NotionClient;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "leadwatch",
    version,
    about = "🚨 LeadWatch — Notion CRM follow-up alerts for Telegram"
)]
struct Cli {
    /// Config file (defaults to ~/.leadwatch/config.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract leads, compose the alert and send it to Telegram
    Run {
        /// Print the message instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// Extract leads and print a staleness summary
    Leads {
        /// How many sample leads to print
        #[arg(short, long, default_value = "5")]
        limit: usize,

        /// Print every normalized lead as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the chats and topics of the bot's latest messages
    Discover {
        /// How many of the latest messages to show
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },
}

fn load_config(path: Option<&str>) -> Result<LeadWatchConfig> {
    let mut config = match path {
        Some(p) => {
            let expanded = shellexpand::tilde(p).to_string();
            LeadWatchConfig::load_from(std::path::Path::new(&expanded))?
        }
        None => LeadWatchConfig::load()?,
    };
    dotenvy::dotenv().ok();
    config.apply_process_env()?;
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "leadwatch=debug,leadwatch_crm=debug,leadwatch_channels=debug,leadwatch_alerts=debug"
    } else {
        "leadwatch=info,leadwatch_crm=info,leadwatch_channels=info,leadwatch_alerts=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Command::Run { dry_run } => run(config, dry_run).await,
        Command::Leads { limit, json } => leads(config, limit, json).await,
        Command::Discover { limit } => discover(config, limit).await,
    }
}

async fn run(config: LeadWatchConfig, dry_run: bool) -> Result<()> {
    let source = NotionClient::new(config.notion.clone(), config.fields.clone())?;
    // A dry run only needs Notion. Otherwise fail on a missing destination
    // before spending a Notion query.
    let channel = if dry_run {
        None
    } else {
        let channel = TelegramChannel::new(config.telegram.clone())?;
        config.telegram.validate()?;
        Some(channel)
    };
    let composer = AlertComposer::new(config.alerts.clone());
    let today = chrono::Local::now().date_naive();

    let notifier = channel.as_ref().map(|c| c as &dyn Notifier);
    let report = run_alerts(&source, notifier, &composer, today)
        .await
        .context("Lead extraction failed")?;

    match report.delivery {
        Delivery::Sent(ack) => {
            println!(
                "✅ CRM alert sent to {} (message {}): {} of {} leads need follow-up",
                ack.chat_id,
                ack.message_id,
                report.counts.needing_follow_up(),
                report.total_leads
            );
            Ok(())
        }
        Delivery::Skipped => {
            println!("📝 Message Preview:");
            println!("{}", "=".repeat(60));
            println!("{}", report.message);
            println!("{}", "=".repeat(60));
            Ok(())
        }
        Delivery::Failed(e) => Err(anyhow::Error::new(e).context("Telegram delivery failed")),
    }
}

async fn leads(config: LeadWatchConfig, limit: usize, json: bool) -> Result<()> {
    println!("🔍 Testing Notion CRM connection...");
    println!("📊 Database ID: {}", config.notion.database_id);
    println!(
        "🔑 Token configured: {}\n",
        if config.notion.token.is_empty() { "No" } else { "Yes" }
    );

    let result = match NotionClient::new(config.notion.clone(), config.fields.clone()) {
        Ok(client) => client.fetch_leads().await,
        Err(e) => Err(e),
    };
    let leads = match result {
        Ok(leads) => leads,
        Err(e) => {
            println!("❌ Error: {e}\n");
            println!("💡 Troubleshooting:");
            println!("  1. Verify NOTION_INTEGRATION_SECRET is correct");
            println!("  2. Verify NOTION_DATABASE_ID is correct");
            println!("  3. Ensure the integration has access to the database");
            println!("  4. Check that the database exists and is shared with the integration");
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&leads)?);
        return Ok(());
    }

    println!("✅ Successfully extracted {} leads!\n", leads.len());
    let buckets = Buckets::classify(&leads);
    let counts = buckets.counts();
    println!("📊 SUMMARY BY PRIORITY:");
    println!("  🔴 Critical (21+ days): {} leads", counts.critical);
    println!("  🟡 Warning (14-20 days): {} leads", counts.warning);
    println!("  🟠 Attention (7-13 days): {} leads", counts.attention);
    println!("  ✅ Recent (< 7 days): {} leads\n", counts.recent);

    println!("📋 SAMPLE LEADS (first {limit}):");
    for (i, lead) in leads.iter().take(limit).enumerate() {
        println!("\n{}. {}", i + 1, lead.name);
        println!("   Status: {}", lead.status);
        println!("   Last Contact: {}", lead.last_contact);
        println!("   Days Since: {}", lead.days_since_contact);
        if !lead.company.is_empty() {
            println!("   Industry: {}", lead.company);
        }
        if !lead.telegram.is_empty() {
            println!("   Telegram: {}", lead.telegram);
        }
        if !lead.tags.is_empty() {
            println!("   Tags: {}", lead.tags);
        }
        println!("   URL: {}", lead.url);
    }
    Ok(())
}

async fn discover(config: LeadWatchConfig, limit: usize) -> Result<()> {
    let channel = TelegramChannel::new(config.telegram)?;
    let topics = channel.recent_topics(limit).await?;

    if topics.is_empty() {
        println!("❌ No recent messages. Send a message to the bot inside the target topic.");
        return Ok(());
    }

    println!("🔍 Latest messages received by the bot:\n");
    for topic in topics {
        println!("📱 Chat: {}", topic.chat_title);
        println!("   Chat ID: {}", topic.chat_id);
        match topic.thread_id {
            Some(thread_id) => {
                println!("   🧵 Thread/Topic ID: {thread_id}");
                println!("   ✅ {ENV_TELEGRAM_CHAT}={}", topic.chat_id);
                println!("   ✅ {ENV_TELEGRAM_THREAD}={thread_id}");
            }
            None => println!("   ℹ️  Not a topic (message in the main group)"),
        }
        let excerpt: String = topic.text.chars().take(50).collect();
        println!("   Text: {excerpt}...\n");
    }
    Ok(())
}

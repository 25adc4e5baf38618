use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use vidnote_core::{
    ChannelTransport, InMemoryTabs, JsonFileStore, NoteField, NoteIndex, NoteStore,
    PopupController, SyncOutcome, TabHandle, TabId, TransportConfig, VideoMetadata,
    VidnoteConfig,
};

use crate::{
    contexts::{PageContext, WebAppContext},
    format::format_index_readable,
};

mod contexts;
mod format;

const PAGE_TAB: TabId = TabId(1);
const WEB_APP_TAB: TabId = TabId(2);

#[derive(Parser)]
#[command(name = "vidnote")]
#[command(about = "Attach timestamped notes to videos and sync them to the companion web app")]
struct Cli {
    /// Notes file (defaults to $VIDNOTE_STORAGE_PATH or the user data dir)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    /// Page title of the companion web-app tab
    #[arg(long, global = true)]
    web_app_title: Option<String>,

    /// Run without the companion web-app tab
    #[arg(long, global = true)]
    no_web_app: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open the popup on a video page, fill in the note and press Save
    Note {
        #[arg(long)]
        video_id: String,

        /// Playback position, e.g. "01:15"
        #[arg(long)]
        timestamp: String,

        #[arg(long)]
        url: String,

        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        description: String,
    },

    /// Press Sync: push every stored note to the web app
    Sync,

    /// Print stored notes
    List {
        #[arg(long)]
        video_id: Option<String>,
    },
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.cyan} {msg}")
    {
        pb.set_style(spinner_style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();
}

struct Contexts {
    tabs: Arc<InMemoryTabs>,
    transport: ChannelTransport,
    web_app: Option<Arc<WebAppContext>>,
}

/// Opens the simulated tabs and registers their message handlers.
fn start_contexts(
    config: &VidnoteConfig,
    page: Option<VideoMetadata>,
    with_web_app: bool,
) -> Result<Contexts> {
    let tabs = Arc::new(InMemoryTabs::new());
    let transport = ChannelTransport::new(TransportConfig::default());

    let web_app = if with_web_app {
        let web_app = Arc::new(WebAppContext::new());
        tabs.open_tab(TabHandle {
            id: WEB_APP_TAB,
            title: config.web_app_title.clone(),
            url: "http://localhost:3000".to_string(),
            active: false,
        });
        transport.register(WEB_APP_TAB, web_app.clone())?;
        Some(web_app)
    } else {
        None
    };

    if let Some(metadata) = page {
        tabs.open_tab(TabHandle {
            id: PAGE_TAB,
            title: format!("Video {}", metadata.video_id),
            url: metadata.url.clone(),
            active: true,
        });
        transport.register(PAGE_TAB, Arc::new(PageContext::new(metadata)))?;
    }

    Ok(Contexts {
        tabs,
        transport,
        web_app,
    })
}

fn print_sync_outcome(outcome: Option<&SyncOutcome>) {
    match outcome {
        Some(SyncOutcome::Pushed { tab, videos }) => println!(
            "{} Synced {} video(s) to tab {}",
            style("✓").green().bold(),
            videos,
            tab
        ),
        Some(SyncOutcome::Skipped) => println!(
            "{} Sync skipped {}",
            style("–").yellow().bold(),
            style("(no web-app tab open)").dim()
        ),
        None => println!("{} Sync failed {}", style("✗").red().bold(), style("(see log)").dim()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let mut config = VidnoteConfig::from_env();
    if let Some(storage) = cli.storage {
        config.storage_path = storage;
    }
    if let Some(title) = cli.web_app_title {
        config.web_app_title = title;
    }

    let kv = Arc::new(JsonFileStore::new(&config.storage_path));

    println!(
        "\n{}  {}\n",
        style("vidnote").cyan().bold(),
        style(kv.path().display()).dim()
    );

    match cli.command {
        Command::Note {
            video_id,
            timestamp,
            url,
            title,
            description,
        } => {
            let metadata = VideoMetadata {
                timestamp,
                video_id,
                url,
            };
            let contexts = start_contexts(&config, Some(metadata), !cli.no_web_app)?;
            let mut popup = PopupController::new(
                contexts.tabs.clone(),
                Arc::new(contexts.transport.clone()),
                kv,
                &config,
            );
            info!(
                "event=popup_started popup_session={} transport_session={}",
                popup.session_id(),
                contexts.transport.session_id()
            );

            popup.on_open().await;
            let Some(draft) = popup.draft() else {
                eprintln!(
                    "{} No video metadata from the page, Save stays disabled",
                    style("Error:").red().bold()
                );
                std::process::exit(1);
            };
            println!(
                "{} Draft for {} at {}",
                style("✓").green().bold(),
                style(&draft.id).yellow(),
                draft.start_time
            );

            popup.on_input(NoteField::Title, title);
            let can_save = popup.on_input(NoteField::Description, description);
            if !can_save {
                eprintln!(
                    "{} Title and description are both required",
                    style("Error:").red().bold()
                );
                std::process::exit(1);
            }

            let spinner = create_spinner("Saving note...");
            match popup.save().await {
                Ok(report) => {
                    spinner.finish_with_message(format!(
                        "{} Saved \"{}\"",
                        style("✓").green().bold(),
                        report.note.title
                    ));
                    print_sync_outcome(report.sync.as_ref());
                }
                Err(e) => {
                    spinner.finish_and_clear();
                    eprintln!("{} {}", style("Error:").red().bold(), e);
                    contexts.transport.shutdown();
                    std::process::exit(1);
                }
            }

            contexts.transport.shutdown();
        }
        Command::Sync => {
            let contexts = start_contexts(&config, None, !cli.no_web_app)?;
            let popup = PopupController::new(
                contexts.tabs.clone(),
                Arc::new(contexts.transport.clone()),
                kv,
                &config,
            );
            info!(
                "event=popup_started popup_session={} transport_session={}",
                popup.session_id(),
                contexts.transport.session_id()
            );

            let spinner = create_spinner("Syncing...");
            let outcome = popup.on_sync().await;
            spinner.finish_and_clear();
            print_sync_outcome(outcome.as_ref());

            if let Some(snapshot) = contexts.web_app.as_ref().and_then(|w| w.last_snapshot()) {
                println!("{}", style("─".repeat(60)).dim());
                println!("{}", format_index_readable(&snapshot));
            }

            contexts.transport.shutdown();
        }
        Command::List { video_id } => {
            let store = NoteStore::new(kv);
            let index = match video_id {
                Some(video_id) => {
                    let notes = store.notes_for(&video_id).await?;
                    let mut index = NoteIndex::new();
                    if !notes.is_empty() {
                        index.insert(video_id, notes);
                    }
                    index
                }
                None => store.snapshot().await?,
            };

            println!("{}", format_index_readable(&index));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logs_at_info_unless_asked_otherwise() {
        let cli = Cli::try_parse_from(["vidnote", "sync"]).unwrap();
        assert_eq!(cli.log_level, "info");

        let cli = Cli::try_parse_from(["vidnote", "list", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_level, "debug");
    }
}

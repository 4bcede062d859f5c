use clap::{Parser, Subcommand};
use overlaykit_cli::commands::{self, GoalAction, LayerAction};
use overlaykit_cli::{CliContext, logging};
use overlaykit_core::Listener;
use overlaykit_core::types::{Color, Tool};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), String> {
    let _log_guard = logging::init();
    let ctx = CliContext::new();

    // One-shot mode: run the command line arguments and exit
    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        return respond(args, &ctx).await.map(|_| ());
    }

    ctx.restart_tasks().await;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt()?;
        let Some(line) = lines.next_line().await.map_err(|e| e.to_string())? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let result = match shlex::split(line) {
            Some(args) => respond(args, &ctx).await,
            None => Err("error: Invalid quoting".to_string()),
        };
        match result {
            Ok(true) => break,
            Ok(false) => {}
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
            }
        }
    }

    ctx.tasks.lock().await.abort_all().await;
    Ok(())
}

fn prompt() -> Result<(), String> {
    write!(std::io::stdout(), "$ ").map_err(|e| e.to_string())?;
    std::io::stdout().flush().map_err(|e| e.to_string())
}

#[derive(Parser)]
#[command(version, about = "Overlay widget studio")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Switch the active tool (chat, goal, timer, asset)
    Tool { name: Tool },
    /// Load tool settings from a .toml or .json file
    Load { tool: Tool, path: String },
    /// Save the current tool settings to a .toml or .json file
    Save {
        path: String,
        #[arg(short, long)]
        tool: Option<Tool>,
    },
    /// Print default settings as TOML
    Defaults { tool: Tool },
    /// Write the widget bundle for a tool
    Export {
        tool: Option<Tool>,
        #[arg(short, long)]
        out: Option<String>,
    },
    /// Print the live preview
    Show { tool: Option<Tool> },
    /// Post a chat message to the mock feed
    Msg {
        user: String,
        text: String,
        #[arg(long)]
        color: Option<Color>,
        /// Comma-joined badge tags, e.g. "moderator/1,subscriber/12"
        #[arg(long, default_value = "")]
        badges: String,
    },
    /// Manage the mock chat feed
    Messages {
        #[arg(short, long)]
        generate: Option<usize>,
        #[arg(long)]
        remove: Option<u64>,
        #[arg(long)]
        remove_user: Option<String>,
        #[arg(long)]
        clear: bool,
    },
    /// Simulate a donation toward the current goal
    Donate { amount: f64 },
    /// List or edit goals
    Goals {
        #[command(subcommand)]
        action: Option<GoalAction>,
    },
    /// Simulate a host event (e.g. tip-latest 5, bulk-subscriber 3 --gifted)
    Event {
        listener: Listener,
        #[arg(default_value_t = 1.0)]
        amount: f64,
        #[arg(long)]
        gifted: bool,
    },
    Status,
    /// Edit asset color layers
    Layer {
        #[command(subcommand)]
        action: LayerAction,
    },
    /// Set base image corrections
    Filter {
        #[arg(long, allow_hyphen_values = true)]
        hue: Option<i32>,
        #[arg(long)]
        saturation: Option<u32>,
        #[arg(long)]
        brightness: Option<u32>,
        #[arg(long)]
        contrast: Option<u32>,
    },
    /// Show goal ordering warnings
    Warnings,
    /// Show or change studio configuration
    Config {
        #[arg(long)]
        export_dir: Option<String>,
        #[arg(long)]
        auto_feed: Option<bool>,
        #[arg(long)]
        interval: Option<u64>,
    },
    Exit,
}

async fn respond(mut args: Vec<String>, ctx: &CliContext) -> Result<bool, String> {
    args.insert(0, "overlaykit".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match cli.command {
        Some(Commands::Tool { name }) => commands::set_tool(ctx, name).await,
        Some(Commands::Load { tool, path }) => commands::load(ctx, tool, &path).await?,
        Some(Commands::Save { path, tool }) => commands::save(ctx, tool, &path).await?,
        Some(Commands::Defaults { tool }) => commands::defaults(tool)?,
        Some(Commands::Export { tool, out }) => {
            commands::export(ctx, tool, out.as_deref()).await?
        }
        Some(Commands::Show { tool }) => commands::show(ctx, tool).await,
        Some(Commands::Msg {
            user,
            text,
            color,
            badges,
        }) => commands::msg(ctx, &user, &text, color, &badges).await,
        Some(Commands::Messages {
            generate,
            remove,
            remove_user,
            clear,
        }) => commands::messages(ctx, generate, remove, remove_user.as_deref(), clear).await,
        Some(Commands::Donate { amount }) => commands::donate(ctx, amount).await?,
        Some(Commands::Goals { action }) => commands::goals(ctx, action).await?,
        Some(Commands::Event {
            listener,
            amount,
            gifted,
        }) => commands::event(ctx, listener, amount, gifted).await?,
        Some(Commands::Status) => commands::status(ctx).await,
        Some(Commands::Layer { action }) => commands::layer(ctx, action).await?,
        Some(Commands::Filter {
            hue,
            saturation,
            brightness,
            contrast,
        }) => commands::filter(ctx, hue, saturation, brightness, contrast).await,
        Some(Commands::Warnings) => commands::warnings(ctx).await,
        Some(Commands::Config {
            export_dir,
            auto_feed,
            interval,
        }) => commands::config(ctx, export_dir, auto_feed, interval).await?,
        Some(Commands::Exit) => {
            commands::exit();
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}

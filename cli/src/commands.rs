use std::fmt::Write as _;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::Subcommand;
use overlaykit_core::asset::parse_analysis;
use overlaykit_core::chat::Segment;
use overlaykit_core::goal::GoalBar;
use overlaykit_core::timer::end_label;
use overlaykit_core::types::{
    BlendMode, ChatSettings, Color, GoalSettings, StudioConfig, TimerSettings, Tool,
};
use overlaykit_core::{
    ExportWidget, GoalListExt, GoalView, HostEvent, LayerPatch, Listener, StudioConfigExt,
    WidgetBundle, load_settings, save_settings, to_toml,
};

use crate::context::{CliContext, Studio};

const BAR_WIDTH: usize = 24;

// ─────────────────────────────────────────────────────────────────────────────
// Subcommand Actions
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum GoalAction {
    /// Append a goal above the last one
    Add,
    Remove { id: String },
    Target { id: String, amount: f64 },
    Title { id: String, title: String },
    /// Sort goals by ascending target
    Sort,
}

#[derive(Subcommand, Debug)]
pub enum LayerAction {
    Add,
    Remove {
        id: String,
    },
    Set {
        id: String,
        #[arg(long)]
        color: Option<Color>,
        #[arg(long)]
        opacity: Option<f32>,
        #[arg(long)]
        blend: Option<BlendMode>,
        #[arg(long)]
        name: Option<String>,
    },
    /// Recolor toward a palette entry (index into the analyzed palette)
    Match {
        index: usize,
    },
    /// Load a palette analysis response from a JSON file
    Analyze {
        path: String,
    },
    Reset,
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

pub async fn set_tool(ctx: &CliContext, tool: Tool) {
    ctx.studio.write().await.tool = tool;
    println!("Active tool: {} (accent {})", tool.as_str(), tool.accent());
}

async fn active_tool(ctx: &CliContext, tool: Option<Tool>) -> Tool {
    match tool {
        Some(tool) => tool,
        None => ctx.studio.read().await.tool,
    }
}

pub async fn load(ctx: &CliContext, tool: Tool, path: &str) -> Result<(), String> {
    let path = Path::new(path);
    let now = ctx.now();
    {
        let mut studio = ctx.studio.write().await;
        match tool {
            Tool::Chat => {
                let settings: ChatSettings = load_settings(path).map_err(|e| e.to_string())?;
                studio.set_chat_settings(settings, now);
            }
            Tool::Goal => {
                let settings: GoalSettings = load_settings(path).map_err(|e| e.to_string())?;
                studio.set_goal_settings(settings);
                print_warnings(&studio.goal_settings);
            }
            Tool::Timer => {
                let settings: TimerSettings = load_settings(path).map_err(|e| e.to_string())?;
                studio.set_timer_settings(settings);
            }
            Tool::Asset => return Err("asset adjustments are not file-backed".to_string()),
        }
        studio.tool = tool;
    }

    ctx.restart_tasks().await;
    println!("Loaded {} settings from {}", tool.as_str(), path.display());
    Ok(())
}

pub async fn save(ctx: &CliContext, tool: Option<Tool>, path: &str) -> Result<(), String> {
    let tool = active_tool(ctx, tool).await;
    let path = Path::new(path);
    let studio = ctx.studio.read().await;
    let result = match tool {
        Tool::Chat => save_settings(&studio.chat_settings, path),
        Tool::Goal => save_settings(&studio.goal_settings, path),
        Tool::Timer => save_settings(&studio.timer_settings, path),
        Tool::Asset => save_settings(studio.asset.state(), path),
    };
    result.map_err(|e| e.to_string())?;
    println!("Saved {} settings to {}", tool.as_str(), path.display());
    Ok(())
}

pub fn defaults(tool: Tool) -> Result<(), String> {
    let text = match tool {
        Tool::Chat => to_toml(&ChatSettings::default()),
        Tool::Goal => to_toml(&GoalSettings::default()),
        Tool::Timer => to_toml(&TimerSettings::default()),
        Tool::Asset => to_toml(&overlaykit_core::types::AdjustmentState::default()),
    }
    .map_err(|e| e.to_string())?;
    print!("{text}");
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Export
// ─────────────────────────────────────────────────────────────────────────────

fn bundle_for(studio: &Studio, tool: Tool) -> Option<WidgetBundle> {
    match tool {
        Tool::Chat => Some(studio.chat_settings.export()),
        Tool::Goal => Some(studio.goal_settings.export()),
        Tool::Timer => Some(studio.timer_settings.export()),
        Tool::Asset => None,
    }
}

pub async fn export(ctx: &CliContext, tool: Option<Tool>, out: Option<&str>) -> Result<(), String> {
    let tool = active_tool(ctx, tool).await;
    let dir = match out {
        Some(dir) => PathBuf::from(dir),
        None => ctx.config.read().await.export_dir_for(tool),
    };

    let bundle = {
        let studio = ctx.studio.read().await;
        if tool == Tool::Goal {
            print_warnings(&studio.goal_settings);
        }
        bundle_for(&studio, tool)
    }
    .ok_or_else(|| "the asset tool has no widget export".to_string())?;

    let written = bundle.write_to(&dir).map_err(|e| e.to_string())?;
    println!("Exported {} widget:", tool.as_str());
    for path in written {
        println!("  {}", path.display());
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Preview Output
// ─────────────────────────────────────────────────────────────────────────────

pub async fn show(ctx: &CliContext, tool: Option<Tool>) {
    let tool = active_tool(ctx, tool).await;
    let now = ctx.now();
    let mut studio = ctx.studio.write().await;
    studio.advance(now);

    match tool {
        Tool::Chat => show_chat(&studio),
        Tool::Goal => show_goals(&studio, now),
        Tool::Timer => show_timer(&studio),
        Tool::Asset => show_asset(&studio),
    }
}

fn show_chat(studio: &Studio) {
    let rows = studio.chat.render(&studio.chat_settings, &Local::now());
    if rows.is_empty() {
        println!("(no messages)");
        return;
    }

    for row in rows {
        let mut line = String::new();
        if let Some(ts) = &row.timestamp {
            let _ = write!(line, "{ts} ");
        }
        if !row.badges.is_empty() {
            let names: Vec<&str> = row.badges.iter().map(|b| b.name.as_str()).collect();
            let _ = write!(line, "[{}] ", names.join(","));
        }
        let _ = write!(line, "{} ({}): ", row.user, row.style.username_color);
        for segment in &row.segments {
            match segment {
                Segment::Text(text) => line.push_str(text),
                Segment::Emote { code, .. } => {
                    let _ = write!(line, ":{code}:");
                }
            }
        }
        if row.hiding {
            line.push_str("  (hiding)");
        }
        println!("#{:<4} {line}", row.id);
    }
}

fn progress_bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

fn goal_line(bar: &GoalBar) -> String {
    let mut line = format!("{:>2}. ", bar.index + 1);
    if let Some(title) = &bar.title {
        let _ = write!(line, "{title:<16} ");
    }
    line.push_str(&progress_bar(bar.percent));
    if let Some(text) = &bar.amount_text {
        let _ = write!(line, " {text}");
    }
    if bar.fading {
        line.push_str("  (fading)");
    } else if bar.completing {
        line.push_str("  (complete!)");
    }
    if bar.tier.opacity < 1.0 {
        let _ = write!(line, "  opacity {}", bar.tier.opacity);
    }
    line
}

fn show_goals(studio: &Studio, now: overlaykit_core::Millis) {
    println!(
        "Total: {} ({} goal)",
        studio.goals.total(),
        studio.goal_settings.goal_type.as_str()
    );
    match studio.goals.view(&studio.goal_settings, now) {
        GoalView::Completed => println!("{}", overlaykit_core::goal::COMPLETED_TEXT),
        GoalView::Bars(bars) if bars.is_empty() => println!("(no goals)"),
        GoalView::Bars(bars) => {
            for bar in &bars {
                println!("{}", goal_line(bar));
            }
        }
    }
}

fn show_timer(studio: &Studio) {
    let countdown = &studio.countdown;
    let settings = &studio.timer_settings;
    println!("{}", countdown.display());
    if settings.show_end_time {
        println!("{}", end_label(countdown.remaining(), &Local::now()));
    }
    let cap = match countdown.cap() {
        0 => "unlimited".to_string(),
        cap => overlaykit_core::timer::format_hms(cap),
    };
    println!(
        "mode {} | platform {} | cap {}",
        settings.mode.as_str(),
        settings.platform.as_str(),
        cap
    );
}

fn show_asset(studio: &Studio) {
    let asset = &studio.asset;
    println!("filter: {}", asset.filter_css());
    if asset.layers().is_empty() {
        println!("(no layers)");
    }
    for layer in asset.layers() {
        println!(
            "  {:<10} {:<20} {} {} @ {:.2}",
            layer.id,
            layer.name,
            layer.color,
            layer.blend_mode.as_str(),
            layer.opacity
        );
    }
    if let Some(palette) = asset.palette() {
        println!("palette:");
        for (i, color) in palette.colors.iter().enumerate() {
            println!("  {i}: {} {}", color.hex, color.name);
        }
    }
    if let Some(err) = asset.error() {
        println!("{err}");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat Feed
// ─────────────────────────────────────────────────────────────────────────────

pub async fn msg(
    ctx: &CliContext,
    user: &str,
    text: &str,
    color: Option<Color>,
    badges: &str,
) {
    let now = ctx.now();
    let mut studio = ctx.studio.write().await;
    let id = studio.feed.push(user, text, color, badges);
    studio.refresh_chat(now);
    println!("Message #{id} from {user}");
}

pub async fn messages(
    ctx: &CliContext,
    generate: Option<usize>,
    remove: Option<u64>,
    remove_user: Option<&str>,
    clear: bool,
) {
    let now = ctx.now();
    let mut studio = ctx.studio.write().await;

    if clear {
        studio.feed.clear();
        println!("Cleared feed");
    }
    if let Some(id) = remove {
        if studio.feed.remove(id) {
            println!("Removed message #{id}");
        } else {
            println!("No message #{id}");
        }
    }
    if let Some(user) = remove_user {
        let n = studio.feed.remove_user(user);
        println!("Removed {n} messages from {user}");
    }
    for _ in 0..generate.unwrap_or(0) {
        studio.feed.generate();
    }
    studio.refresh_chat(now);

    println!(
        "{} in feed, {} displayed",
        studio.feed.messages().len(),
        studio.chat.displayed().len()
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Goals and Events
// ─────────────────────────────────────────────────────────────────────────────

pub async fn donate(ctx: &CliContext, amount: f64) -> Result<(), String> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err("amount must be positive".to_string());
    }
    let now = ctx.now();
    let mut studio = ctx.studio.write().await;
    if !studio.goals.simulate_contribution(amount, now) {
        return Err("goal is completing or all goals are met".to_string());
    }
    println!("Total now {}", studio.goals.total());
    Ok(())
}

pub async fn goals(ctx: &CliContext, action: Option<GoalAction>) -> Result<(), String> {
    let mut studio = ctx.studio.write().await;
    let mut settings = studio.goal_settings.clone();

    let changed = match action {
        None => {
            for (i, goal) in settings.goals.iter().enumerate() {
                let marker = if i == studio.goals.index() { ">" } else { " " };
                println!("{marker} {:<4} {:<20} {}", goal.id, goal.title, goal.target_amount);
            }
            false
        }
        Some(GoalAction::Add) => {
            let goal = settings
                .add_goal()
                .ok_or_else(|| "maximum number of goals reached".to_string())?;
            println!("Added goal {} ({})", goal.id, goal.target_amount);
            true
        }
        Some(GoalAction::Remove { id }) => settings.remove_goal(&id),
        Some(GoalAction::Target { id, amount }) => settings.set_goal_target(&id, amount),
        Some(GoalAction::Title { id, title }) => settings.set_goal_title(&id, &title),
        Some(GoalAction::Sort) => {
            settings.sort_goals();
            true
        }
    };

    if changed {
        print_warnings(&settings);
        studio.set_goal_settings(settings);
    }
    Ok(())
}

pub async fn event(
    ctx: &CliContext,
    listener: Listener,
    amount: f64,
    gifted: bool,
) -> Result<(), String> {
    let event = if gifted {
        HostEvent::gifted(listener, amount)
    } else {
        HostEvent::new(listener, amount)
    };
    let now = ctx.now();
    let mut studio = ctx.studio.write().await;
    let outcome = studio.handle_event(&event, now);

    if outcome.goal_amount > 0.0 {
        println!("Goal +{} (total {})", outcome.goal_amount, studio.goals.total());
    }
    if outcome.timer_seconds > 0 {
        println!(
            "Timer {}{}s -> {}",
            match studio.timer_settings.mode {
                overlaykit_core::types::TimerMode::CountdownAdd => "+",
                overlaykit_core::types::TimerMode::CountdownSub => "-",
            },
            outcome.timer_seconds,
            studio.countdown.display()
        );
    }
    if outcome.goal_amount <= 0.0 && outcome.timer_seconds == 0 {
        println!("No effect for {listener}");
    }
    Ok(())
}

pub async fn status(ctx: &CliContext) {
    let studio = ctx.studio.read().await;
    let tasks = ctx.tasks.lock().await.running();
    println!("tool      {}", studio.tool.as_str());
    println!(
        "chat      {} displayed / {} in feed",
        studio.chat.displayed().len(),
        studio.feed.messages().len()
    );
    println!(
        "goal      {} of {} met, total {}",
        studio.goals.index(),
        studio.goal_settings.goals.len(),
        studio.goals.total()
    );
    println!("timer     {}", studio.countdown.display());
    println!("layers    {}", studio.asset.layers().len());
    println!("tasks     {tasks} running");
}

pub async fn warnings(ctx: &CliContext) {
    let studio = ctx.studio.read().await;
    if studio.goal_settings.warnings().is_empty() {
        println!("No warnings");
    }
    print_warnings(&studio.goal_settings);
}

fn print_warnings(settings: &GoalSettings) {
    for warning in settings.warnings() {
        println!("warning: {warning}");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Asset
// ─────────────────────────────────────────────────────────────────────────────

pub async fn layer(ctx: &CliContext, action: LayerAction) -> Result<(), String> {
    let mut studio = ctx.studio.write().await;
    let asset = &mut studio.asset;

    match action {
        LayerAction::Add => {
            let layer = asset.add_layer().map_err(|e| e.to_string())?;
            println!("Added {} ({})", layer.id, layer.name);
        }
        LayerAction::Remove { id } => {
            let layer = asset.remove_layer(&id).map_err(|e| e.to_string())?;
            println!("Removed {} ({})", layer.id, layer.name);
        }
        LayerAction::Set {
            id,
            color,
            opacity,
            blend,
            name,
        } => {
            let patch = LayerPatch {
                color,
                opacity,
                blend_mode: blend,
                name,
            };
            let layer = asset.update_layer(&id, patch).map_err(|e| e.to_string())?;
            println!("Updated {} ({})", layer.id, layer.name);
        }
        LayerAction::Match { index } => {
            let color = asset
                .palette()
                .and_then(|p| p.colors.get(index))
                .cloned()
                .ok_or_else(|| format!("no palette color {index}"))?;
            asset.smart_recolor(&color);
            println!("Recolored toward {} ({})", color.name, color.hex);
        }
        LayerAction::Analyze { path } => {
            let result = std::fs::read_to_string(&path)
                .map_err(|e| overlaykit_core::PaletteError::Service(e.to_string()))
                .and_then(|json| parse_analysis(&json));
            asset.apply_analysis(result);
            match asset.error() {
                Some(err) => return Err(err.to_string()),
                None => {
                    let count = asset.palette().map_or(0, |p| p.colors.len());
                    println!("Palette with {count} colors");
                }
            }
        }
        LayerAction::Reset => {
            asset.reset();
            println!("Adjustments reset");
        }
    }
    Ok(())
}

pub async fn filter(
    ctx: &CliContext,
    hue: Option<i32>,
    saturation: Option<u32>,
    brightness: Option<u32>,
    contrast: Option<u32>,
) {
    let mut studio = ctx.studio.write().await;
    let asset = &mut studio.asset;
    if let Some(v) = hue {
        asset.set_hue(v);
    }
    if let Some(v) = saturation {
        asset.set_saturation(v);
    }
    if let Some(v) = brightness {
        asset.set_brightness(v);
    }
    if let Some(v) = contrast {
        asset.set_contrast(v);
    }
    println!("{}", asset.filter_css());
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

pub async fn config(
    ctx: &CliContext,
    export_dir: Option<String>,
    auto_feed: Option<bool>,
    interval: Option<u64>,
) -> Result<(), String> {
    let changed = export_dir.is_some() || auto_feed.is_some() || interval.is_some();
    {
        let mut config = ctx.config.write().await;
        if let Some(dir) = export_dir {
            config.export_dir = Some(dir);
        }
        if let Some(on) = auto_feed {
            config.preview.auto_feed = on;
        }
        if let Some(secs) = interval {
            config.preview.mock_message_interval_secs = secs.max(1);
        }
        if changed {
            config.save().map_err(|e| e.to_string())?;
        }
        print_config(&config);
    }

    if changed {
        ctx.restart_tasks().await;
    }
    Ok(())
}

fn print_config(config: &StudioConfig) {
    if let Ok(path) = StudioConfig::config_path() {
        println!("file           {}", path.display());
    }
    println!(
        "export dir     {}",
        config.export_dir_for(Tool::Chat).parent().map_or_else(
            || "-".to_string(),
            |p| p.display().to_string()
        )
    );
    println!("auto feed      {}", config.preview.auto_feed);
    println!(
        "feed interval  {}s",
        config.preview.mock_message_interval_secs
    );
    println!("feed history   {}", config.preview.mock_history_limit);
}

pub fn exit() {
    println!("quitting...");
    let _ = std::io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_clamps() {
        assert_eq!(progress_bar(0.0), format!("[{}]", "-".repeat(BAR_WIDTH)));
        assert_eq!(progress_bar(100.0), format!("[{}]", "#".repeat(BAR_WIDTH)));
        assert_eq!(progress_bar(50.0).matches('#').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn asset_has_no_bundle() {
        let studio = Studio::new(&Default::default(), 0);
        assert!(bundle_for(&studio, Tool::Asset).is_none());
        assert!(bundle_for(&studio, Tool::Timer).is_some());
    }
}

use anyhow::{anyhow, Context, Result};
use archlift_graph::{
    highlight_violation, lifting_index, select_group, DisplayGroup, EngineStats, GroupDetails,
    Violation, ViolationEngine, VisibilityOption,
};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

mod document;
mod flags;
mod report;

use document::{LoadedView, ViewOverrides, ViolationDocument};
use flags::RefreshFlag;
use report::{render_details, render_groups, CommandResponse};

#[derive(Parser)]
#[command(name = "archlift")]
#[command(about = "Group reference architecture violations by lifted source", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List violation groups for the current view, largest first
    Groups(GroupsArgs),

    /// Show the violations of one group, optionally highlighting one of them
    Details(DetailsArgs),
}

#[derive(Args)]
struct ViewArgs {
    /// Violation document (JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Layers shown below the current node
    #[arg(long, env = "ARCHLIFT_LAYER_DEPTH")]
    layer_depth: Option<usize>,

    /// Override the number of hierarchy layers
    #[arg(long)]
    total_layers: Option<usize>,

    /// Node the view is drilled into
    #[arg(long, env = "ARCHLIFT_CURRENT_NODE")]
    current_node: Option<String>,

    /// When the ancestry cache is rebuilt after the violation set changes
    #[arg(long, value_enum, default_value_t = RefreshFlag::Sync)]
    refresh: RefreshFlag,

    /// Output JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct GroupsArgs {
    #[command(flatten)]
    view: ViewArgs,
}

#[derive(Args)]
struct DetailsArgs {
    #[command(flatten)]
    view: ViewArgs,

    /// Group label, decorated ("Services (High Priority)") or plain ("Services")
    #[arg(short, long)]
    group: String,

    /// Highlight the violation at this position within the group
    #[arg(long)]
    highlight: Option<usize>,
}

impl ViewArgs {
    fn overrides(&self) -> ViewOverrides {
        ViewOverrides {
            layer_depth: self.layer_depth,
            total_layers: self.total_layers,
            current_node: self.current_node.clone(),
        }
    }

    fn load(&self) -> Result<LoadedView> {
        ViolationDocument::load(&self.input)?.into_view(&self.overrides())
    }
}

pub fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON parsing
    let json_output = match &cli.command {
        Commands::Groups(args) => args.view.json,
        Commands::Details(args) => args.view.json,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let result = match cli.command {
        Commands::Groups(args) => run_groups(args),
        Commands::Details(args) => run_details(args),
    };

    match result {
        Ok(output) => {
            print!("{output}");
            Ok(())
        }
        Err(err) => {
            if json_output {
                let response = CommandResponse::error(format!("{err:#}"));
                println!("{}", serde_json::to_string_pretty(&response)?);
            }
            Err(err)
        }
    }
}

struct Evaluation {
    groups: Arc<[DisplayGroup]>,
    lifting_index: i64,
    stats: EngineStats,
}

/// Evaluate the view to fixpoint
fn evaluate(view: &LoadedView, refresh: RefreshFlag) -> Evaluation {
    let mut engine = ViolationEngine::new(refresh.as_domain());
    let groups = engine.settle(
        &view.violations,
        &view.navigation,
        &view.settings,
        &view.hierarchy,
    );
    log::debug!("Engine stats: {:?}", engine.stats());
    Evaluation {
        groups,
        lifting_index: lifting_index(&view.settings, &view.navigation),
        stats: engine.stats(),
    }
}

fn run_groups(args: GroupsArgs) -> Result<String> {
    let view = args.view.load()?;
    let evaluation = evaluate(&view, args.view.refresh);

    if args.view.json {
        let response = CommandResponse::ok(json!({
            "lifting_index": evaluation.lifting_index,
            "groups": &*evaluation.groups,
            "stats": evaluation.stats,
        }));
        return Ok(format!("{}\n", serde_json::to_string_pretty(&response)?));
    }
    Ok(render_groups(&evaluation.groups, evaluation.lifting_index))
}

fn run_details(args: DetailsArgs) -> Result<String> {
    let view = args.view.load()?;
    let groups = evaluate(&view, args.view.refresh).groups;

    let group = select_group(&groups, &args.group)
        .ok_or_else(|| anyhow!("No violation group labeled {:?}", args.group))?;
    let details = GroupDetails::from_group(group);

    let mut highlighted: Vec<Violation> = Vec::new();
    let mut visibility = None;
    if let Some(position) = args.highlight {
        let violation = group.items.get(position).with_context(|| {
            format!(
                "Group {:?} has {} violations, cannot highlight #{position}",
                group.label,
                group.len()
            )
        })?;
        let mut overlay = VisibilityOption::Invisible;
        highlight_violation(violation, &mut highlighted, &mut overlay);
        visibility = Some(overlay);
    }

    if args.view.json {
        let response = CommandResponse::ok(json!({
            "details": details,
            "highlighted": highlighted,
            "visibility": visibility,
        }));
        return Ok(format!("{}\n", serde_json::to_string_pretty(&response)?));
    }
    Ok(render_details(&details, &highlighted, visibility))
}

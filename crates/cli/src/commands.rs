//! Subcommand handlers
//!
//! Each handler loads its inputs, runs the work and prints either a colored
//! summary or JSON to stdout. Logs go to stderr.

use crate::args::{SceneArgs, SettingsCommand, SimulateArgs};
use crate::replay::{SceneReport, replay_scene};
use crate::simulation::{SimulationPlan, SimulationReport, run_simulation};
use anyhow::{Context, Result, bail};
use colored::Colorize;
use joint_core::Validatable;
use joint_graph::{ConnectionCategory, load_scene};
use joint_render::{WireSettings, load_settings, save_settings, settings_to_toml};
use std::path::Path;

/// Settings from `path`, or the defaults
pub fn resolve_settings(path: Option<&Path>) -> Result<WireSettings> {
    match path {
        Some(path) => load_settings(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => Ok(WireSettings::default()),
    }
}

// ============================================================================
// simulate
// ============================================================================

pub fn simulate(args: &SimulateArgs) -> Result<()> {
    if !(args.delta_time.is_finite() && args.delta_time >= 0.0) {
        bail!("--delta-time must be a non-negative number, got {}", args.delta_time);
    }

    let settings = resolve_settings(args.settings.as_deref())?;
    let category = ConnectionCategory::from(args.category);
    let config = settings.config(category);
    config
        .validate()
        .with_context(|| format!("Invalid {} connection config", category.display_name()))?;

    let report = run_simulation(&SimulationPlan::from(args), category, config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_simulation(&report);
    }
    Ok(())
}

fn print_simulation(report: &SimulationReport) {
    println!(
        "{} {} wire, stiffness {}, damping {}",
        "Simulating".bold(),
        report.category,
        report.config.stiffness,
        report.config.damping_ratio
    );
    println!();
    println!(
        "{:>6}  {:>8}  {:>18}  {:>18}  {}",
        "frame".dimmed(),
        "time".dimmed(),
        "offset".dimmed(),
        "velocity".dimmed(),
        "state".dimmed()
    );
    for sample in &report.samples {
        let state = if sample.active {
            "active".yellow()
        } else {
            "at rest".green()
        };
        println!(
            "{:>6}  {:>7.3}s  {:>8.2},{:>9.2}  {:>8.2},{:>9.2}  {}",
            sample.frame,
            sample.time,
            sample.offset.x,
            sample.offset.y,
            sample.velocity.x,
            sample.velocity.y,
            state
        );
    }
    println!();
    println!(
        "final offset ({:.2}, {:.2}), target ({:.2}, {:.2})",
        report.final_offset.x,
        report.final_offset.y,
        report.target_offset.x,
        report.target_offset.y
    );
    match report.settled_frame {
        Some(frame) if !report.active => {
            println!("{} settled on frame {}", "✓".green(), frame)
        }
        _ if report.active => println!("{} still moving", "…".yellow()),
        _ => println!("{} never moved", "✓".green()),
    }
}

// ============================================================================
// scene
// ============================================================================

pub fn scene(args: &SceneArgs) -> Result<()> {
    let settings = resolve_settings(args.settings.as_deref())?;
    let scene = load_scene(&args.file)
        .with_context(|| format!("Failed to load scene from {}", args.file.display()))?;

    let report = replay_scene(scene, &settings, args.json)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_scene(&report);
    }
    Ok(())
}

fn print_scene(report: &SceneReport) {
    println!("{} {}", "Scene".bold(), report.graph.cyan());
    println!("  frames:      {}", report.frames);
    println!("  links drawn: {}", report.links_drawn);
    println!(
        "  simulators:  {} ({} active)",
        report.simulators, report.active_simulators
    );
    println!(
        "  draw calls:  {} splines, {} boxes, {} rotated boxes",
        report.draw_counts.splines, report.draw_counts.boxes, report.draw_counts.rotated_boxes
    );

    match &report.hover {
        Some(hover) => match hover.distance {
            Some(distance) => println!(
                "  hover:       {} -> {} at {:.2}, nearest {}",
                hover.start.as_deref().unwrap_or("?").green(),
                hover.end.as_deref().unwrap_or("?").green(),
                distance,
                hover.nearest.as_deref().unwrap_or("none")
            ),
            None => println!("  hover:       {}", "close to a wire".yellow()),
        },
        None => println!("  hover:       {}", "none".dimmed()),
    }
}

// ============================================================================
// settings
// ============================================================================

pub fn settings(command: &SettingsCommand) -> Result<()> {
    match command {
        SettingsCommand::Init { path, force } => settings_init(path, *force),
        SettingsCommand::Show { path, json } => settings_show(path.as_deref(), *json),
        SettingsCommand::Validate { path } => settings_validate(path),
    }
}

fn settings_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists, pass --force to overwrite it",
            path.display()
        );
    }
    save_settings(&WireSettings::default(), path)
        .with_context(|| format!("Failed to write settings to {}", path.display()))?;
    println!(
        "{} Wrote default wire settings to {}",
        "✓".green(),
        path.display()
    );
    Ok(())
}

fn settings_show(path: Option<&Path>, json: bool) -> Result<()> {
    let settings = resolve_settings(path)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
    } else {
        print!("{}", settings_to_toml(&settings)?);
    }
    Ok(())
}

fn settings_validate(path: &Path) -> Result<()> {
    let settings = resolve_settings(Some(path))?;
    let problems = settings.validation_errors();
    if problems.is_empty() {
        println!("{} {} is valid", "✓".green(), path.display());
        return Ok(());
    }

    for problem in &problems {
        println!("{} {}", "✗".red(), problem);
    }
    bail!("{} problem(s) in {}", problems.len(), path.display())
}

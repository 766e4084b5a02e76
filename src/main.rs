//! Joint Wires
//!
//! Physically simulated connection rendering for node graph editors.
//!
//! This binary replays the built-in sample dialogue with wiggle wires on
//! every connection and logs what the drawing policy does each second.

use anyhow::{Context, Result};
use joint_graph::Scene;
use joint_render::{ScenePlayer, WireSettings};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Print startup banner
    println!();
    println!("╔═══════════════════════════════════════════════════════════╗");
    println!("║                                                           ║");
    println!("║   Joint Wires v{:<43}║", joint_render::VERSION);
    println!("║   Wiggle-wire connections for node graph editors          ║");
    println!("║                                                           ║");
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!();

    let scene = Scene::sample().context("Failed to build the sample scene")?;
    let frames_per_second = (1.0 / scene.delta_time.max(f32::EPSILON)).round() as u32;
    let settings = WireSettings::default().with_wiggle_everywhere(true);
    let mut player = ScenePlayer::new(scene, &settings);

    while let Some(outcome) = player.step().context("Failed to play the sample scene")? {
        if outcome.frame % frames_per_second.max(1) == 0 {
            tracing::info!(
                frame = outcome.frame,
                drawn = outcome.links_drawn,
                draw_calls = outcome.draw_list.len(),
                active = player.wires().active_count(),
                hovered = outcome.overlap.is_valid(),
                close = outcome.overlap.close_to_spline,
                "Frame"
            );
        }
    }

    tracing::info!(
        simulators = player.wires().len(),
        active = player.wires().active_count(),
        "Sample dialogue finished"
    );
    Ok(())
}

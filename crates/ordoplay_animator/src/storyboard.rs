// SPDX-License-Identifier: MIT OR Apache-2.0
//! Turning storyboard scripts into timelines, and printing them.

use crate::cli::{RunArgs, ShowArgs};
use crate::config::load_config;
use crate::error::{ProjectError, Result};
use crate::project::{ProjectFile, PROJECT_EXTENSION};
use crate::script::{ScriptCommand, ScriptParser};
use ordoplay_timeline::{MotionPreset, OverlayEntry, Session, SessionConfig, TimelineError};

/// Group collecting every scene event
pub const SCENES_GROUP: &str = "Scenes";

/// Group collecting every character entrance
pub const CHARACTERS_GROUP: &str = "Characters";

/// Lay script commands out on a new session, one every `step` seconds.
///
/// Action lines that name a motion preset animate the most recently entered
/// character for `step` seconds.
pub fn build_session(
    commands: &[ScriptCommand],
    config: SessionConfig,
    step: f64,
) -> Result<Session> {
    if !step.is_finite() || step <= 0.0 {
        return Err(TimelineError::InvalidArgument(format!(
            "step must be a positive number of seconds, got {step}"
        ))
        .into());
    }

    let mut session = Session::with_config(config);
    let mut character: Option<&str> = None;

    for (index, command) in commands.iter().enumerate() {
        let time = index as f64 * step;
        match command {
            ScriptCommand::Scene { .. } => {
                session.add_event(time, command.label(), Some(SCENES_GROUP))?;
            }
            ScriptCommand::Character { name, .. } => {
                session.add_event(time, command.label(), Some(CHARACTERS_GROUP))?;
                character = Some(name.as_str());
            }
            ScriptCommand::Action { description } => {
                session.add_event(time, command.label(), None)?;
                let Some(preset) = find_preset(description) else {
                    continue;
                };
                match character {
                    Some(name) => {
                        let count = session.sync_with_motion(name, &preset, step)?;
                        tracing::info!(
                            "Applied {} motion to {name}: {count} keyframe(s)",
                            preset.name()
                        );
                    }
                    None => tracing::warn!(
                        "No character on stage for '{description}', skipping {} motion",
                        preset.name()
                    ),
                }
            }
        }
    }

    Ok(session)
}

/// First word of `description` that names a motion preset
fn find_preset(description: &str) -> Option<MotionPreset> {
    description
        .split_whitespace()
        .find_map(|word| word.parse::<MotionPreset>().ok())
}

/// Human-readable listing of a session
pub fn render(session: &Session) -> String {
    let mut lines = vec![format!(
        "Timeline: {} event(s), {:.2}s",
        session.event_count(),
        session.duration()
    )];
    for entry in session.overlay_entries(None, None) {
        match entry {
            OverlayEntry::Event(event) => {
                lines.push(format!("  {:>8.2}s  {}", event.timestamp, event.payload));
            }
            OverlayEntry::Audio(cue) => {
                lines.push(format!("  {:>8.2}s  [audio] {}", cue.time, cue.description));
            }
        }
    }

    if !session.groups().is_empty() {
        lines.push("Groups:".to_string());
        for (name, members) in session.groups().iter() {
            let labels: Vec<String> = members.iter().map(|e| e.payload.to_string()).collect();
            lines.push(format!("  {name}: {}", labels.join(", ")));
        }
    }

    let mut tracks = session.tracks().peekable();
    if tracks.peek().is_some() {
        lines.push("Tracks:".to_string());
        for track in tracks {
            lines.push(format!(
                "  {}: {} keyframe(s), last at {:.2}s",
                track.entity,
                track.keyframe_count(),
                track.duration()
            ));
        }
    }

    lines.join("\n")
}

/// `run` subcommand
pub fn run(args: &RunArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let script =
        std::fs::read_to_string(&args.script).map_err(|e| ProjectError::io(&args.script, e))?;
    let commands = ScriptParser::new()?.parse(&script);
    tracing::info!(
        "Read {} command(s) from {}",
        commands.len(),
        args.script.display()
    );

    let session = build_session(&commands, config, args.step)?;
    println!("{}", render(&session));

    if let Some(path) = &args.save {
        let path = if path.extension().is_none() {
            path.with_extension(PROJECT_EXTENSION)
        } else {
            path.clone()
        };
        ProjectFile::from_session(&session).save(&path)?;
    }
    Ok(())
}

/// `show` subcommand
pub fn show(args: &ShowArgs) -> Result<()> {
    let file = ProjectFile::load(&args.project)?;
    let mut session = Session::new();
    file.into_session(&mut session)?;
    println!("{}", render(&session));
    Ok(())
}

/// Fog Command Module
/// Events carrying script, console and map-load requests into the fog subsystem

use bevy::prelude::*;
use thiserror::Error;

use super::definition::{FogParameters, FogSlot};

/// A fire-and-forget request against the fog subsystem.
///
/// Slots stay raw integers here; invalid ones are dropped when the command is applied.
#[derive(Debug, Clone, PartialEq, Event)]
pub enum FogCommand {
    SetParameters {
        index: i32,
        params: FogParameters,
    },
    SwitchActive {
        index: i32,
        duration_ms: i32,
    },
    SetGlobal {
        restore: bool,
        duration_ms: i32,
        color: Vec3,
        depth_for_opaque: f32,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum FogCommandParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown fog command '{0}'")]
    UnknownCommand(String),
    #[error("{command} expects {expected} arguments, got {found}")]
    ArgumentCount {
        command: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("argument '{0}' is not a number")]
    InvalidNumber(String),
}

impl FogCommand {
    pub const USAGE: [&'static str; 3] = [
        "setfog <index> <near> <far> <r> <g> <b> <density>",
        "switchfog <index> <duration_ms>",
        "setglobalfog <restore 0|1> <duration_ms> <r> <g> <b> <depthForOpaque>",
    ];

    /// Parses a console line such as `switchfog 4 2000`.
    pub fn parse(line: &str) -> Result<Self, FogCommandParseError> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(FogCommandParseError::Empty)?;
        let args: Vec<&str> = words.collect();

        match name.to_ascii_lowercase().as_str() {
            "setfog" => {
                let n = numbers::<7>("setfog", &args)?;
                Ok(FogCommand::SetParameters {
                    index: n[0] as i32,
                    params: FogParameters {
                        near: n[1],
                        far: n[2],
                        color: Vec3::new(n[3], n[4], n[5]),
                        density: n[6],
                    },
                })
            }
            "switchfog" => {
                let n = numbers::<2>("switchfog", &args)?;
                Ok(FogCommand::SwitchActive {
                    index: n[0] as i32,
                    duration_ms: n[1] as i32,
                })
            }
            "setglobalfog" => {
                let n = numbers::<6>("setglobalfog", &args)?;
                Ok(FogCommand::SetGlobal {
                    restore: n[0] != 0.0,
                    duration_ms: n[1] as i32,
                    color: Vec3::new(n[2], n[3], n[4]),
                    depth_for_opaque: n[5],
                })
            }
            _ => Err(FogCommandParseError::UnknownCommand(name.to_string())),
        }
    }
}

fn numbers<const N: usize>(
    command: &'static str,
    args: &[&str],
) -> Result<[f32; N], FogCommandParseError> {
    if args.len() != N {
        return Err(FogCommandParseError::ArgumentCount {
            command,
            expected: N,
            found: args.len(),
        });
    }

    let mut values = [0.0; N];
    for (value, arg) in values.iter_mut().zip(args) {
        *value = arg
            .parse::<f32>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| FogCommandParseError::InvalidNumber(arg.to_string()))?;
    }
    Ok(values)
}

/// Fog declared by the BSP for one slot.
#[derive(Debug, Clone, PartialEq)]
pub struct FogVolumeDecl {
    pub slot: FogSlot,
    pub params: FogParameters,
}

/// Baseline of the global fog as authored in the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalFogBaseline {
    pub color: Vec3,
    pub depth_for_opaque: f32,
}

/// Sent once a map's fog lump is parsed. Replaces all fog state.
#[derive(Debug, Clone, PartialEq, Event)]
pub struct WorldFogLoaded {
    pub volumes: Vec<FogVolumeDecl>,
    pub global: Option<GlobalFogBaseline>,
    pub initial: Option<FogSlot>,
}

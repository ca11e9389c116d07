//! Save/Load functionality for persisting a haunt session.
//!
//! Uses bincode for binary serialization of the full session state.
//! The RNG stream is deliberately not serialized: saves carry the
//! session seed, and a restored session reseeds from it, so determinism
//! holds for engines restored at the same point with the same inputs.

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::components::{FearState, GhostState, LightState, Vec3};
use crate::config::HouseConfig;
use crate::systems::{CueScheduler, FeedbackState, SessionState};

/// Version number for the save file format (increment when it changes).
pub const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of a session.
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    /// Seed the session was started with
    pub seed: u64,
    /// Simulation clock in seconds
    pub sim_time: f64,
    /// House parameters
    pub config: HouseConfig,
    pub ghost: GhostState,
    pub fear: FearState,
    pub lights: Vec<LightState>,
    pub session: SessionState,
    /// Cues still pending, so a save mid-death-sequence replays correctly
    pub cues: CueScheduler,
    pub feedback: FeedbackState,
    pub player_position: Vec3,
}

/// Write a session snapshot to a writer.
pub fn write_save<W: Write>(writer: W, data: &SaveData) -> Result<(), SaveError> {
    bincode::serialize_into(writer, data)?;
    Ok(())
}

/// Read a session snapshot from a reader, checking the format version.
pub fn read_save<R: Read>(reader: R) -> Result<SaveData, SaveError> {
    let data: SaveData = bincode::deserialize_from(reader)?;
    if data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: data.version,
        });
    }
    Ok(data)
}

/// Errors that can occur during save/load
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    VersionMismatch { expected: u32, found: u32 },
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Save version mismatch: expected {}, found {}",
                    expected, found
                )
            }
        }
    }
}

impl std::error::Error for SaveError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{FrameInput, HauntEngine};

    #[test]
    fn test_save_load_roundtrip() {
        let mut engine = HauntEngine::new(HouseConfig::default(), 99);
        let spawn = engine.config().player_spawn;
        for _ in 0..120 {
            engine.update(1.0 / 60.0, &FrameInput::at(spawn));
        }

        let mut buffer = Vec::new();
        engine.save(&mut buffer).expect("save failed");

        let loaded = HauntEngine::load(&buffer[..]).expect("load failed");
        assert_eq!(loaded.seed(), engine.seed());
        assert!((loaded.sim_time() - engine.sim_time()).abs() < 1e-9);
        assert_eq!(loaded.fear(), engine.fear());
        assert_eq!(loaded.ghost(), engine.ghost());
        assert_eq!(loaded.lights(), engine.lights());
        assert_eq!(loaded.outcome(), engine.outcome());
        assert_eq!(loaded.player_position(), engine.player_position());
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let engine = HauntEngine::new(HouseConfig::default(), 1);
        let mut buffer = Vec::new();
        engine.save(&mut buffer).expect("save failed");

        let mut data: SaveData = bincode::deserialize_from(&buffer[..]).unwrap();
        data.version = SAVE_VERSION + 1;
        let mut tampered = Vec::new();
        write_save(&mut tampered, &data).unwrap();

        assert!(matches!(
            read_save(&tampered[..]),
            Err(SaveError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn test_truncated_save_is_bincode_error() {
        let engine = HauntEngine::new(HouseConfig::default(), 1);
        let mut buffer = Vec::new();
        engine.save(&mut buffer).expect("save failed");
        let result = read_save(&buffer[..buffer.len() / 2]);
        assert!(matches!(result, Err(SaveError::Bincode(_))));
    }
}

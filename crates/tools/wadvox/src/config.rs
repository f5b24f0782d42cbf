//! Per-frame sprite offset corrections.
//!
//! Some stock sprites carry offsets that leave their rotations visibly
//! misaligned against each other, which ruins the carve. Corrections are
//! keyed by sprite name plus frame letter (`CYBRA`) and give a left/top
//! offset delta for each of the eight rotations. A TOML file can extend
//! or override the built-in table:
//!
//! ```toml
//! [corrections.CYBRA]
//! rotations = [[0, -1], [0, -1], [0, -2], [0, -5], [0, -5], [0, -4], [0, -4], [0, -4]]
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Left/top offset deltas, one pair per rotation.
pub type FrameAdjustments = [[i32; 2]; 8];

#[derive(Debug, Clone, Deserialize)]
struct FrameCorrection {
    rotations: FrameAdjustments,
}

/// Offset correction table, keyed by sprite name plus frame letter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Corrections {
    #[serde(default)]
    corrections: HashMap<String, FrameCorrection>,
}

impl Corrections {
    /// The corrections shipped with the tool, covering the stock sprites
    /// known to need realignment.
    pub fn builtin() -> Self {
        let mut corrections = HashMap::new();
        corrections.insert(
            "CYBRA".to_string(),
            FrameCorrection {
                rotations: [
                    [0, -1],
                    [0, -1],
                    [0, -2],
                    [0, -5],
                    [0, -5],
                    [0, -4],
                    [0, -4],
                    [0, -4],
                ],
            },
        );
        corrections.insert(
            "SPIDA".to_string(),
            FrameCorrection {
                rotations: [
                    [0, 0],
                    [0, 0],
                    [0, 3],
                    [0, 3],
                    [0, 7],
                    [0, 2],
                    [0, 2],
                    [0, 2],
                ],
            },
        );
        Self { corrections }
    }

    /// Reads a correction table from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let loaded: Corrections = toml::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            entries = loaded.corrections.len(),
            "loaded corrections"
        );
        Ok(loaded)
    }

    /// Merges `other` into this table. Entries in `other` win.
    pub fn extend(&mut self, other: Corrections) {
        self.corrections.extend(other.corrections);
    }

    /// Adjustments for a frame, keyed like `CYBRA`.
    pub fn get(&self, frame_name: &str) -> Option<&FrameAdjustments> {
        self.corrections.get(frame_name).map(|c| &c.rotations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_covers_known_frames() {
        let corrections = Corrections::builtin();
        assert_eq!(corrections.get("CYBRA").unwrap()[3], [0, -5]);
        assert_eq!(corrections.get("SPIDA").unwrap()[4], [0, 7]);
        assert!(corrections.get("POSSA").is_none());
    }

    #[test]
    fn loads_and_overrides_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[corrections.CYBRA]\n\
             rotations = [[1, 1], [0, 0], [0, 0], [0, 0], [0, 0], [0, 0], [0, 0], [0, 0]]\n\
             [corrections.TSTAA]\n\
             rotations = [[0, 2], [0, 2], [0, 2], [0, 2], [0, 2], [0, 2], [0, 2], [0, 2]]\n"
        )
        .unwrap();

        let mut corrections = Corrections::builtin();
        corrections.extend(Corrections::load(file.path()).unwrap());

        assert_eq!(corrections.get("CYBRA").unwrap()[0], [1, 1]);
        assert_eq!(corrections.get("TSTAA").unwrap()[7], [0, 2]);
        // Untouched builtin entries survive the merge.
        assert_eq!(corrections.get("SPIDA").unwrap()[4], [0, 7]);
    }

    #[test]
    fn rejects_malformed_tables() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[corrections.CYBRA]\nrotations = [[0, 0]]\n").unwrap();
        assert!(Corrections::load(file.path()).is_err());
    }
}

//! Scripted input tracks.
//!
//! A script is a RON list of segments, each holding keys (and optionally an orbit azimuth)
//! for a number of frames:
//!
//! ```text
//! [
//!     (frames: 60, forward: true),
//!     (frames: 30, right: true, azimuth: Some(1.57)),
//! ]
//! ```

use std::path::Path;

use anyhow::Context;
use gallery_shared::MoveInput;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Segment {
    pub frames: u32,
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    /// Orbit azimuth (radians) applied when the segment starts.
    pub azimuth: Option<f32>,
}

impl Segment {
    pub fn input(&self) -> MoveInput {
        MoveInput {
            forward: self.forward,
            back: self.back,
            left: self.left,
            right: self.right,
        }
    }
}

/// Input for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScriptFrame {
    pub input: MoveInput,
    /// Set on the first frame of a segment that names an azimuth.
    pub azimuth: Option<f32>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Script {
    pub segments: Vec<Segment>,
}

impl Script {
    pub fn from_ron_str(text: &str) -> anyhow::Result<Self> {
        let segments = ron::from_str(text).context("invalid input script")?;
        Ok(Self { segments })
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        Self::from_ron_str(&text)
    }

    /// Walk forward for `frames` frames.
    pub fn walk_forward(frames: u32) -> Self {
        Self {
            segments: vec![Segment {
                frames,
                forward: true,
                ..Segment::default()
            }],
        }
    }

    pub fn total_frames(&self) -> u64 {
        self.segments.iter().map(|s| u64::from(s.frames)).sum()
    }

    pub fn frames(&self) -> impl Iterator<Item = ScriptFrame> + '_ {
        self.segments.iter().flat_map(|segment| {
            let input = segment.input();
            (0..segment.frames).map(move |i| ScriptFrame {
                input,
                azimuth: if i == 0 { segment.azimuth } else { None },
            })
        })
    }
}

//! Debug sinks for label bundles.
//!
//! Synthesis never writes anything itself. Callers that want to inspect a
//! bundle hand it to a [`LabelSink`] afterwards.
//!
//! ## PLY Export
//!
//! ```rust,ignore
//! use scene_labels::io::{LabelSink, PlyVoteSink};
//!
//! // Writes <scene>_center_votes.ply, <scene>_corner_votes.ply, <scene>_planes.ply
//! let mut sink = PlyVoteSink::new("debug/");
//! sink.consume(&bundle)?;
//! ```

mod ply;

pub use ply::{PlyVoteSink, save_ply, write_ply};

use crate::bundle::LabelBundle;
use crate::error::Result;

/// Consumer of finished label bundles.
pub trait LabelSink {
    /// Inspect or persist one bundle
    fn consume(&mut self, bundle: &LabelBundle) -> Result<()>;

    /// Get the name of this sink for logging/debugging
    fn name(&self) -> &str;
}

/// Sink that keeps per-scene statistics only.
#[derive(Clone, Debug, Default)]
pub struct StatsSink {
    /// `(scene name, valid boxes, voted points)` per consumed bundle
    pub entries: Vec<(String, usize, usize)>,
}

impl LabelSink for StatsSink {
    fn consume(&mut self, bundle: &LabelBundle) -> Result<()> {
        let voted = bundle.vote_mask.iter().filter(|&&m| m > 0.0).count();
        self.entries
            .push((bundle.scene_name.clone(), bundle.boxes.count(), voted));
        Ok(())
    }

    fn name(&self) -> &str {
        "stats"
    }
}

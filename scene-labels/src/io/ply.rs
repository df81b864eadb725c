//! ASCII PLY export of voted and plane-labelled points.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::bundle::LabelBundle;
use crate::core::Point3;
use crate::error::Result;

use super::LabelSink;

/// Save points to an ASCII PLY file
pub fn save_ply(points: &[Point3], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_ply(points, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write points to a writer in ASCII PLY format
pub fn write_ply<W: Write>(points: &[Point3], writer: &mut W) -> Result<()> {
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "element vertex {}", points.len())?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    writeln!(writer, "end_header")?;
    for p in points {
        writeln!(writer, "{} {} {}", p.x, p.y, p.z)?;
    }
    Ok(())
}

/// Writes vote targets (`point + vote`) and plane-labelled points per scene.
#[derive(Clone, Debug)]
pub struct PlyVoteSink {
    dir: PathBuf,
}

impl PlyVoteSink {
    /// Write into `dir` (must exist)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Output path for one scene and layer
    pub fn path_for(&self, scene: &str, layer: &str) -> PathBuf {
        self.dir.join(format!("{}_{}.ply", scene, layer))
    }
}

/// `point + vote` for every masked point.
fn vote_targets(bundle: &LabelBundle, votes: &[[f32; 9]]) -> Vec<Point3> {
    bundle
        .points
        .iter_xyz()
        .zip(votes)
        .zip(&bundle.vote_mask)
        .filter(|(_, m)| **m > 0.0)
        .map(|((p, v), _)| p + Point3::new(v[0], v[1], v[2]))
        .collect()
}

impl LabelSink for PlyVoteSink {
    fn consume(&mut self, bundle: &LabelBundle) -> Result<()> {
        let centers = vote_targets(bundle, &bundle.center_votes);
        let corners = vote_targets(bundle, &bundle.corner_votes);
        let planes: Vec<Point3> = bundle
            .points
            .iter_xyz()
            .zip(&bundle.planes.mask)
            .filter(|(_, m)| **m > 0.0)
            .map(|(p, _)| p)
            .collect();

        let name = &bundle.scene_name;
        save_ply(&centers, &self.path_for(name, "center_votes"))?;
        save_ply(&corners, &self.path_for(name, "corner_votes"))?;
        save_ply(&planes, &self.path_for(name, "planes"))?;

        info!(
            "[PLY] {}: {} voted points, {} plane points",
            name,
            centers.len(),
            planes.len()
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "ply"
    }
}

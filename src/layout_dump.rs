use crate::compositor::{ImageStatus, RenderOutcome};
use crate::layout::{ElbowBranch, TextBranch};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: u32,
    pub height: u32,
    pub center: [f32; 2],
    pub scale: [f32; 2],
    pub radius: f32,
    pub image_drawn: bool,
    pub labels: Vec<LabelDump>,
}

#[derive(Debug, Serialize)]
pub struct LabelDump {
    pub index: usize,
    pub text: String,
    pub angle: f32,
    pub elbow_branch: ElbowBranch,
    pub elbow_rotation: f32,
    pub text_branch: TextBranch,
    pub text_rotation: f32,
    pub text_offset: [f32; 2],
    /// Leader end and text origin, in logical units.
    pub leader_end: [f32; 2],
    pub text_origin: [f32; 2],
    pub lines: Vec<String>,
}

impl LayoutDump {
    pub fn from_outcome<C>(outcome: &RenderOutcome<C>) -> Self {
        let center = outcome.center.to_logical(outcome.scale);
        let labels = outcome
            .labels
            .iter()
            .enumerate()
            .map(|(index, label)| {
                let leader_end = label.leader_end(center);
                let text_origin = label.text_origin(center);
                LabelDump {
                    index,
                    text: label.text.clone(),
                    angle: label.angle_degrees,
                    elbow_branch: label.elbow.branch,
                    elbow_rotation: label.elbow.rotation_degrees,
                    text_branch: label.anchor.branch,
                    text_rotation: label.anchor.rotation_degrees,
                    text_offset: [label.anchor.offset.0, label.anchor.offset.1],
                    leader_end: [leader_end.0, leader_end.1],
                    text_origin: [text_origin.0, text_origin.1],
                    lines: label.lines.clone(),
                }
            })
            .collect();

        LayoutDump {
            width: outcome.surface.width,
            height: outcome.surface.height,
            center: [outcome.center.x, outcome.center.y],
            scale: [outcome.scale.x, outcome.scale.y],
            radius: outcome.radius,
            image_drawn: matches!(outcome.image, ImageStatus::Drawn { .. }),
            labels,
        }
    }
}

pub fn write_layout_dump<C>(path: &Path, outcome: &RenderOutcome<C>) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_outcome(outcome);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

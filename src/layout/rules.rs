//! Angle-dependent decision tables for the leader elbow and the text anchor.
//!
//! Angles are in degrees, 0 at the top, increasing clockwise, over `[0, 360]`.
//! Each table is an ordered list of guarded rules; the first rule whose guard
//! accepts the angle wins.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElbowBranch {
    /// Multiples of 90°: the elbow stays in line with the leader.
    Cardinal,
    /// `angle > 180`.
    LeftHalf,
    /// `0 < angle < 180`.
    RightHalf,
    /// No rule matched (angles outside the domain).
    Straight,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElbowPlacement {
    pub branch: ElbowBranch,
    /// Rotation applied on top of the leader's frame before stroking the elbow.
    pub rotation_degrees: f32,
}

struct ElbowRule {
    branch: ElbowBranch,
    applies: fn(f32) -> bool,
    rotation: fn(f32) -> f32,
}

const ELBOW_RULES: &[ElbowRule] = &[
    ElbowRule {
        branch: ElbowBranch::Cardinal,
        applies: |angle| angle % 90.0 == 0.0,
        rotation: |_| 0.0,
    },
    ElbowRule {
        branch: ElbowBranch::LeftHalf,
        applies: |angle| angle > 180.0,
        rotation: |angle| -90.0 - angle,
    },
    ElbowRule {
        branch: ElbowBranch::RightHalf,
        applies: |angle| angle > 0.0,
        rotation: |angle| 90.0 - angle,
    },
];

pub fn elbow_rotation(angle: f32) -> ElbowPlacement {
    ELBOW_RULES
        .iter()
        .find(|rule| (rule.applies)(angle))
        .map(|rule| ElbowPlacement {
            branch: rule.branch,
            rotation_degrees: (rule.rotation)(angle),
        })
        .unwrap_or(ElbowPlacement {
            branch: ElbowBranch::Straight,
            rotation_degrees: 0.0,
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextBranch {
    /// The closing label at 360° (0° is treated the same).
    Top,
    Bottom,
    Right,
    RightHalf,
    LeftHalf,
    /// No rule matched (angles outside the domain): anchor at the elbow end.
    Unplaced,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextPlacement {
    pub branch: TextBranch,
    /// Rotation applied in the elbow-end frame before drawing text.
    pub rotation_degrees: f32,
    /// Offset of the first line's top-left corner in the rotated frame.
    pub offset: (f32, f32),
}

struct TextRule {
    branch: TextBranch,
    applies: fn(f32) -> bool,
    place: fn(f32, usize) -> (f32, (f32, f32)),
}

const TEXT_RULES: &[TextRule] = &[
    TextRule {
        branch: TextBranch::Top,
        applies: |angle| angle == 360.0 || angle == 0.0,
        place: |_, lines| (0.0, (-35.0, top_offset_y(lines))),
    },
    TextRule {
        branch: TextBranch::Bottom,
        applies: |angle| angle == 180.0,
        place: |angle, _| (-angle, (-35.0, 25.0)),
    },
    TextRule {
        branch: TextBranch::Right,
        applies: |angle| angle == 90.0,
        place: |angle, _| (-angle, (25.0, 0.0)),
    },
    TextRule {
        branch: TextBranch::RightHalf,
        applies: |angle| angle > 0.0 && angle < 180.0,
        place: |angle, _| (-angle, (25.0, -10.0)),
    },
    TextRule {
        branch: TextBranch::LeftHalf,
        applies: |angle| angle > 180.0,
        place: |angle, _| (-angle, (-95.0, -10.0)),
    },
];

/// The top label grows upward: reserve room above the elbow for every
/// wrapped line beyond the first.
fn top_offset_y(line_count: usize) -> f32 {
    match line_count {
        0 | 1 => -35.0,
        2 => -50.0,
        _ => -70.0,
    }
}

/// Text anchor for a label at `angle` whose text wraps into `line_count`
/// lines.
pub fn text_placement(angle: f32, line_count: usize) -> TextPlacement {
    TEXT_RULES
        .iter()
        .find(|rule| (rule.applies)(angle))
        .map(|rule| {
            let (rotation_degrees, offset) = (rule.place)(angle, line_count);
            TextPlacement {
                branch: rule.branch,
                rotation_degrees,
                offset,
            }
        })
        .unwrap_or(TextPlacement {
            branch: TextBranch::Unplaced,
            rotation_degrees: 0.0,
            offset: (0.0, 0.0),
        })
}

use serde::Serialize;
use tracing::debug;

use super::rules::{ElbowPlacement, TextPlacement, elbow_rotation, text_placement};
use super::wrap::{fill_lines, wrap_lines};
use super::{CenterPoint, ELBOW_LENGTH, LEADER_EXTENSION, LINE_HEIGHT, WRAP_WIDTH, label_font};
use crate::surface::{Context2d, TextBaseline, Transform};

/// Geometry of one label, independent of any surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelPlacement {
    pub angle_degrees: f32,
    pub text: String,
    /// Length of the radial leader, from the image center outward.
    pub leader_length: f32,
    pub elbow: ElbowPlacement,
    pub anchor: TextPlacement,
    pub lines: Vec<String>,
}

impl LabelPlacement {
    /// Outer end of the radial leader, in the coordinates `center` is given in.
    pub fn leader_end(&self, center: CenterPoint) -> (f32, f32) {
        self.leader_frame(center).apply(0.0, 0.0)
    }

    /// Where the first text line's top-left corner lands.
    pub fn text_origin(&self, center: CenterPoint) -> (f32, f32) {
        let mut frame = self.leader_frame(center);
        frame.rotate(self.anchor.rotation_degrees.to_radians());
        frame.apply(self.anchor.offset.0, self.anchor.offset.1)
    }

    fn leader_frame(&self, center: CenterPoint) -> Transform {
        let mut frame = Transform::identity();
        frame.translate(center.x, center.y);
        frame.rotate(self.angle_degrees.to_radians());
        frame.translate(0.0, -self.leader_length);
        frame
    }
}

/// Computes a label's leader, elbow and wrapped text without drawing.
/// `measure` must report widths in the label font.
pub fn plan_label<M>(radius: f32, angle_degrees: f32, text: &str, measure: M) -> LabelPlacement
where
    M: FnMut(&str) -> f32,
{
    let lines = wrap_lines(text, WRAP_WIDTH, measure);
    LabelPlacement {
        angle_degrees,
        text: text.to_string(),
        leader_length: radius + LEADER_EXTENSION,
        elbow: elbow_rotation(angle_degrees),
        anchor: text_placement(angle_degrees, lines.len()),
        lines,
    }
}

/// Draws one label: radial leader, tangential elbow, wrapped text.
///
/// Every transform and style change (font, baseline, line width) is scoped
/// inside a single save/restore, so labels can be drawn in any order.
pub fn draw_label<C: Context2d + ?Sized>(
    ctx: &mut C,
    center: CenterPoint,
    radius: f32,
    angle_degrees: f32,
    text: &str,
) -> LabelPlacement {
    ctx.save();
    ctx.set_line_width(1.0);
    ctx.set_font(&label_font());
    ctx.set_text_baseline(TextBaseline::Top);

    let placement = plan_label(radius, angle_degrees, text, |line| ctx.measure_text(line));

    ctx.translate(center.x, center.y);
    ctx.rotate(angle_degrees.to_radians());
    ctx.begin_path();
    ctx.move_to(0.0, 0.0);
    ctx.line_to(0.0, -placement.leader_length);
    ctx.stroke();
    ctx.close_path();

    ctx.translate(0.0, -placement.leader_length);
    ctx.save();
    ctx.rotate(placement.elbow.rotation_degrees.to_radians());
    ctx.begin_path();
    ctx.move_to(0.0, 0.0);
    ctx.line_to(0.0, -ELBOW_LENGTH);
    ctx.stroke();
    ctx.close_path();
    ctx.restore();

    ctx.rotate(placement.anchor.rotation_degrees.to_radians());
    let (x, y) = placement.anchor.offset;
    fill_lines(ctx, &placement.lines, x, y, LINE_HEIGHT);
    ctx.restore();

    debug!(
        angle = angle_degrees,
        elbow = ?placement.elbow.branch,
        anchor = ?placement.anchor.branch,
        lines = placement.lines.len(),
        "drew label"
    );
    placement
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::rules::{ElbowBranch, TextBranch};
    use crate::surface::{DrawCommand, RecordingContext};

    const CENTER: CenterPoint = CenterPoint { x: 250.0, y: 250.0 };

    fn close(actual: (f32, f32), expected: (f32, f32)) -> bool {
        (actual.0 - expected.0).abs() < 1e-3 && (actual.1 - expected.1).abs() < 1e-3
    }

    #[test]
    fn top_label_leader_points_straight_up() {
        let mut ctx = RecordingContext::new();
        let placement = draw_label(&mut ctx, CENTER, 80.0, 360.0, "x");
        let strokes: Vec<_> = ctx.strokes().copied().collect();
        assert_eq!(strokes.len(), 2);
        assert!(close(strokes[0][0], (250.0, 250.0)));
        assert!(close(strokes[0][1], (250.0, 110.0)));
        // Elbow continues upward for another 20 units.
        assert!(close(strokes[1][1], (250.0, 90.0)));
        assert_eq!(placement.anchor.offset, (-35.0, -35.0));
        assert!(close(placement.text_origin(CENTER), (215.0, 75.0)));
    }

    #[test]
    fn right_label_elbow_and_text() {
        let mut ctx = RecordingContext::new();
        let placement = draw_label(&mut ctx, CENTER, 80.0, 90.0, "east");
        assert_eq!(placement.elbow.branch, ElbowBranch::Cardinal);
        assert_eq!(placement.anchor.branch, TextBranch::Right);
        assert!(close(placement.leader_end(CENTER), (390.0, 250.0)));
        let strokes: Vec<_> = ctx.strokes().copied().collect();
        assert!(close(strokes[1][1], (410.0, 250.0)));
    }

    fn text_rotations(ctx: &RecordingContext) -> Vec<f32> {
        ctx.commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::FillText { transform, .. } => Some(transform.rotation_degrees()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn bottom_label_text_is_upright_below_the_leader() {
        let mut ctx = RecordingContext::new();
        let placement = draw_label(&mut ctx, CENTER, 80.0, 180.0, "south");
        let rotations = text_rotations(&ctx);
        assert_eq!(rotations.len(), 1);
        assert!(rotations[0].abs() < 1e-3, "net rotation {}", rotations[0]);
        let end = placement.leader_end(CENTER);
        assert!(close(end, (250.0, 390.0)));
        let origin = placement.text_origin(CENTER);
        assert!(close(origin, (215.0, 415.0)));
        assert!(origin.1 > end.1);
    }

    #[test]
    fn every_placed_label_reads_upright() {
        for angle in [45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0, 360.0] {
            let mut ctx = RecordingContext::new();
            draw_label(&mut ctx, CENTER, 80.0, angle, "upright");
            for rotation in text_rotations(&ctx) {
                assert!(rotation.abs() < 1e-3, "angle {angle}: net rotation {rotation}");
            }
        }
    }

    #[test]
    fn right_label_text_starts_past_the_leader() {
        let mut ctx = RecordingContext::new();
        let placement = draw_label(&mut ctx, CENTER, 80.0, 90.0, "east");
        assert!(close(placement.text_origin(CENTER), (415.0, 250.0)));
    }

    #[test]
    fn diagonal_elbow_is_tangential() {
        let mut ctx = RecordingContext::new();
        draw_label(&mut ctx, CENTER, 80.0, 45.0, "ne");
        let strokes: Vec<_> = ctx.strokes().copied().collect();
        let [start, end] = strokes[1];
        // Total rotation 45 + 45 = 90: the elbow runs horizontally to the right.
        assert!((end.1 - start.1).abs() < 1e-3);
        assert!((end.0 - start.0 - 20.0).abs() < 1e-3);
    }

    #[test]
    fn state_is_fully_restored() {
        let mut ctx = RecordingContext::new();
        draw_label(&mut ctx, CENTER, 80.0, 270.0, "a much longer caption text");
        assert_eq!(ctx.depth(), 0);
        assert_eq!(ctx.current_transform(), Transform::identity());
        let saves = ctx
            .commands()
            .iter()
            .filter(|command| matches!(command, DrawCommand::Save))
            .count();
        let restores = ctx
            .commands()
            .iter()
            .filter(|command| matches!(command, DrawCommand::Restore))
            .count();
        assert_eq!(saves, restores);
    }

    #[test]
    fn font_and_baseline_are_set_inside_the_scope() {
        let mut ctx = RecordingContext::new();
        draw_label(&mut ctx, CENTER, 80.0, 180.0, "south");
        let commands = ctx.commands();
        let first_save = commands
            .iter()
            .position(|command| matches!(command, DrawCommand::Save))
            .expect("save");
        let set_font = commands
            .iter()
            .position(|command| matches!(command, DrawCommand::SetFont { .. }))
            .expect("font");
        assert!(first_save < set_font);
        match commands.iter().find(|c| matches!(c, DrawCommand::FillText { .. })) {
            Some(DrawCommand::FillText { font, baseline, .. }) => {
                assert_eq!(font, &label_font());
                assert_eq!(*baseline, TextBaseline::Top);
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn empty_text_draws_leaders_only() {
        let mut ctx = RecordingContext::new();
        let placement = draw_label(&mut ctx, CENTER, 80.0, 120.0, "");
        assert!(placement.lines.is_empty());
        assert_eq!(ctx.strokes().count(), 2);
        assert_eq!(ctx.texts().count(), 0);
    }

    #[test]
    fn drawing_twice_is_identical() {
        let mut first = RecordingContext::new();
        let mut second = RecordingContext::new();
        let a = draw_label(&mut first, CENTER, 80.0, 200.0, "repeatable label");
        let b = draw_label(&mut second, CENTER, 80.0, 200.0, "repeatable label");
        assert_eq!(a, b);
        assert_eq!(first.commands(), second.commands());

        // Same context, back to back: the second label's commands repeat the first's.
        let mut shared = RecordingContext::new();
        draw_label(&mut shared, CENTER, 80.0, 200.0, "repeatable label");
        let half = shared.commands().len();
        draw_label(&mut shared, CENTER, 80.0, 200.0, "repeatable label");
        assert_eq!(&shared.commands()[..half], &shared.commands()[half..]);
    }

    #[test]
    fn never_panics_across_the_domain() {
        let mut ctx = RecordingContext::new();
        for step in 0..=720 {
            let angle = step as f32 * 0.5;
            draw_label(&mut ctx, CENTER, 80.0, angle, "text that wraps more than once");
        }
        assert_eq!(ctx.depth(), 0);
    }
}

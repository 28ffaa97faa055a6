use std::collections::HashMap;

use serde::Serialize;

use super::{ContainerBox, Context2d, Font, Host, SurfaceSize, TextBaseline, Transform};
use crate::hero::DecodedImage;

/// One observable call against a [`RecordingContext`].
///
/// Geometry-producing commands carry device-space coordinates so a test can
/// reason about where things actually land without replaying the transform
/// stack.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Save,
    Restore,
    Translate { x: f32, y: f32 },
    Rotate { radians: f32 },
    Scale { sx: f32, sy: f32 },
    SetLineWidth { width: f32 },
    SetFont { font: Font },
    SetTextBaseline { baseline: TextBaseline },
    Stroke {
        segments: Vec<[(f32, f32); 2]>,
        line_width: f32,
    },
    Clip {
        center: (f32, f32),
        radius: f32,
    },
    FillText {
        text: String,
        x: f32,
        y: f32,
        transform: Transform,
        font: Font,
        baseline: TextBaseline,
    },
    DrawImage {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        transform: Transform,
        clipped: bool,
    },
}

#[derive(Debug, Clone)]
struct RecordingState {
    transform: Transform,
    font: Font,
    baseline: TextBaseline,
    line_width: f32,
    clipped: bool,
}

impl Default for RecordingState {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            font: Font::default(),
            baseline: TextBaseline::default(),
            line_width: 1.0,
            clipped: false,
        }
    }
}

/// A context that draws nothing and remembers everything.
///
/// Text is measured as `char_width` per character, which keeps wrapping
/// deterministic regardless of installed fonts.
#[derive(Debug, Clone)]
pub struct RecordingContext {
    commands: Vec<DrawCommand>,
    state: RecordingState,
    stack: Vec<RecordingState>,
    path: Vec<Vec<(f32, f32)>>,
    last_arc: Option<((f32, f32), f32)>,
    char_width: f32,
    surface_width: Option<f32>,
    line_height: Option<f32>,
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingContext {
    pub const DEFAULT_CHAR_WIDTH: f32 = 7.0;

    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            state: RecordingState::default(),
            stack: Vec::new(),
            path: Vec::new(),
            last_arc: None,
            char_width: Self::DEFAULT_CHAR_WIDTH,
            surface_width: None,
            line_height: None,
        }
    }

    pub fn with_char_width(mut self, width: f32) -> Self {
        self.char_width = width;
        self
    }

    pub fn with_surface_width(mut self, width: f32) -> Self {
        self.surface_width = Some(width);
        self
    }

    pub fn with_line_height(mut self, height: f32) -> Self {
        self.line_height = Some(height);
        self
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Current save-stack depth; zero when every `save` has been restored.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn current_transform(&self) -> Transform {
        self.state.transform
    }

    pub fn strokes(&self) -> impl Iterator<Item = &[(f32, f32); 2]> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Stroke { segments, .. } => Some(segments.iter()),
                _ => None,
            })
            .flatten()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::FillText { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Context2d for RecordingContext {
    fn save(&mut self) {
        self.stack.push(self.state.clone());
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.state.transform.translate(x, y);
        self.commands.push(DrawCommand::Translate { x, y });
    }

    fn rotate(&mut self, radians: f32) {
        self.state.transform.rotate(radians);
        self.commands.push(DrawCommand::Rotate { radians });
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.state.transform.scale(sx, sy);
        self.commands.push(DrawCommand::Scale { sx, sy });
    }

    fn begin_path(&mut self) {
        self.path.clear();
        self.last_arc = None;
    }

    fn close_path(&mut self) {
        if let Some(sub) = self.path.last_mut()
            && let Some(first) = sub.first().copied()
        {
            sub.push(first);
        }
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.path.push(vec![self.state.transform.apply(x, y)]);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let point = self.state.transform.apply(x, y);
        match self.path.last_mut() {
            Some(sub) => sub.push(point),
            None => self.path.push(vec![point]),
        }
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, _start_angle: f32, _end_angle: f32) {
        let center = self.state.transform.apply(x, y);
        let (sx, sy) = self.state.transform.axis_scales();
        self.last_arc = Some((center, radius * sx.max(sy)));
    }

    fn stroke(&mut self) {
        let segments = self
            .path
            .iter()
            .flat_map(|sub| sub.windows(2).map(|pair| [pair[0], pair[1]]))
            .collect();
        self.commands.push(DrawCommand::Stroke {
            segments,
            line_width: self.state.line_width,
        });
    }

    fn clip(&mut self) {
        let (center, radius) = self.last_arc.unwrap_or(((0.0, 0.0), 0.0));
        self.state.clipped = true;
        self.commands.push(DrawCommand::Clip { center, radius });
    }

    fn set_line_width(&mut self, width: f32) {
        self.state.line_width = width;
        self.commands.push(DrawCommand::SetLineWidth { width });
    }

    fn set_font(&mut self, font: &Font) {
        self.state.font = font.clone();
        self.commands.push(DrawCommand::SetFont { font: font.clone() });
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.state.baseline = baseline;
        self.commands.push(DrawCommand::SetTextBaseline { baseline });
    }

    fn measure_text(&mut self, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_width
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
            transform: self.state.transform,
            font: self.state.font.clone(),
            baseline: self.state.baseline,
        });
    }

    fn draw_image(&mut self, _image: &DecodedImage, x: f32, y: f32, width: f32, height: f32) {
        self.commands.push(DrawCommand::DrawImage {
            x,
            y,
            width,
            height,
            transform: self.state.transform,
            clipped: self.state.clipped,
        });
    }

    fn surface_width(&self) -> Option<f32> {
        self.surface_width
    }

    fn line_height(&self) -> Option<f32> {
        self.line_height
    }
}

/// In-memory host handing out [`RecordingContext`]s.
#[derive(Debug, Clone)]
pub struct RecordingHost {
    containers: HashMap<String, ContainerBox>,
    supports_2d: bool,
    char_width: f32,
    attached: Vec<(String, SurfaceSize)>,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            containers: HashMap::new(),
            supports_2d: true,
            char_width: RecordingContext::DEFAULT_CHAR_WIDTH,
            attached: Vec::new(),
        }
    }

    pub fn with_container(mut self, tag_id: &str, width: f32, height: f32) -> Self {
        self.containers.insert(
            tag_id.to_string(),
            ContainerBox {
                client_width: width,
                client_height: height,
            },
        );
        self
    }

    /// Simulates a host without a 2D context.
    pub fn without_2d(mut self) -> Self {
        self.supports_2d = false;
        self
    }

    pub fn with_char_width(mut self, width: f32) -> Self {
        self.char_width = width;
        self
    }

    /// Surfaces attached so far, in order.
    pub fn attached(&self) -> &[(String, SurfaceSize)] {
        &self.attached
    }
}

impl Host for RecordingHost {
    type Context = RecordingContext;

    fn resolve_container(&self, tag_id: &str) -> Option<ContainerBox> {
        self.containers.get(tag_id).copied()
    }

    fn attach_surface(&mut self, tag_id: &str, size: SurfaceSize) {
        self.attached.push((tag_id.to_string(), size));
    }

    fn context_2d(&mut self, size: SurfaceSize) -> Option<RecordingContext> {
        if !self.supports_2d {
            return None;
        }
        Some(
            RecordingContext::new()
                .with_char_width(self.char_width)
                .with_surface_width(size.width as f32),
        )
    }
}

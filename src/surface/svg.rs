use std::collections::HashMap;
use std::f32::consts::{PI, TAU};

use super::{ContainerBox, Context2d, Font, Host, SurfaceSize, TextBaseline, Transform};
use crate::hero::DecodedImage;
use crate::text_metrics;

const INK: &str = "#000000";

#[derive(Debug, Clone)]
enum Segment {
    Move(f32, f32),
    Line(f32, f32),
    Arc {
        rx: f32,
        ry: f32,
        rotation: f32,
        large: bool,
        sweep: bool,
        to: (f32, f32),
    },
    Close,
}

#[derive(Debug, Clone)]
struct SvgState {
    transform: Transform,
    font: Font,
    baseline: TextBaseline,
    line_width: f32,
    clip: Option<String>,
}

impl Default for SvgState {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            font: Font::default(),
            baseline: TextBaseline::default(),
            line_width: 1.0,
            clip: None,
        }
    }
}

/// A [`Context2d`] that turns canvas calls into an SVG document.
///
/// Paths are flattened into device space as they are built, the same way a
/// canvas applies the current transform at `moveTo`/`lineTo` time. Text and
/// images keep their user-space coordinates and carry the transform as a
/// `matrix(..)` attribute.
#[derive(Debug, Clone)]
pub struct SvgContext {
    size: SurfaceSize,
    background: Option<String>,
    state: SvgState,
    stack: Vec<SvgState>,
    path: Vec<Segment>,
    has_current_point: bool,
    defs: String,
    body: String,
    clip_count: usize,
}

impl SvgContext {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            background: None,
            state: SvgState::default(),
            stack: Vec::new(),
            path: Vec::new(),
            has_current_point: false,
            defs: String::new(),
            body: String::new(),
            clip_count: 0,
        }
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }

    /// Serializes everything drawn so far.
    pub fn to_svg(&self) -> String {
        let SurfaceSize { width, height } = self.size;
        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
        ));
        if let Some(background) = &self.background {
            svg.push_str(&format!(
                "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
                escape_xml(background)
            ));
        }
        if !self.defs.is_empty() {
            svg.push_str("<defs>");
            svg.push_str(&self.defs);
            svg.push_str("</defs>");
        }
        svg.push_str(&self.body);
        svg.push_str("</svg>");
        svg
    }

    fn path_data(&self) -> String {
        let mut d = String::new();
        for segment in &self.path {
            if !d.is_empty() {
                d.push(' ');
            }
            match segment {
                Segment::Move(x, y) => d.push_str(&format!("M {x:.2} {y:.2}")),
                Segment::Line(x, y) => d.push_str(&format!("L {x:.2} {y:.2}")),
                Segment::Arc {
                    rx,
                    ry,
                    rotation,
                    large,
                    sweep,
                    to,
                } => d.push_str(&format!(
                    "A {rx:.2} {ry:.2} {rotation:.2} {} {} {:.2} {:.2}",
                    u8::from(*large),
                    u8::from(*sweep),
                    to.0,
                    to.1
                )),
                Segment::Close => d.push('Z'),
            }
        }
        d
    }

    fn emit(&mut self, element: String) {
        match &self.state.clip {
            Some(id) => {
                self.body
                    .push_str(&format!("<g clip-path=\"url(#{id})\">{element}</g>"));
            }
            None => self.body.push_str(&element),
        }
    }

    fn push_point(&mut self, x: f32, y: f32) {
        let (px, py) = self.state.transform.apply(x, y);
        if self.has_current_point {
            self.path.push(Segment::Line(px, py));
        } else {
            self.path.push(Segment::Move(px, py));
            self.has_current_point = true;
        }
    }

    fn push_arc_to(&mut self, center: (f32, f32), radius: f32, angle: f32, large: bool) {
        let transform = self.state.transform;
        let (sx, sy) = transform.axis_scales();
        let determinant = transform.a * transform.d - transform.b * transform.c;
        let to = transform.apply(
            center.0 + radius * angle.cos(),
            center.1 + radius * angle.sin(),
        );
        self.path.push(Segment::Arc {
            rx: radius * sx,
            ry: radius * sy,
            rotation: transform.rotation_degrees(),
            large,
            sweep: determinant >= 0.0,
            to,
        });
    }
}

impl Context2d for SvgContext {
    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.state.transform.translate(x, y);
    }

    fn rotate(&mut self, radians: f32) {
        self.state.transform.rotate(radians);
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.state.transform.scale(sx, sy);
    }

    fn begin_path(&mut self) {
        self.path.clear();
        self.has_current_point = false;
    }

    fn close_path(&mut self) {
        if self.has_current_point {
            self.path.push(Segment::Close);
        }
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.has_current_point = false;
        self.push_point(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push_point(x, y);
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start_angle: f32, end_angle: f32) {
        let sweep = (end_angle - start_angle).clamp(0.0, TAU);
        self.push_point(x + radius * start_angle.cos(), y + radius * start_angle.sin());
        if sweep >= TAU - f32::EPSILON {
            // A single SVG arc cannot close on itself; split at the halfway point.
            self.push_arc_to((x, y), radius, start_angle + PI, false);
            self.push_arc_to((x, y), radius, start_angle + TAU, false);
        } else if sweep > 0.0 {
            self.push_arc_to((x, y), radius, end_angle, sweep > PI);
        }
    }

    fn stroke(&mut self) {
        if self.path.is_empty() {
            return;
        }
        let width = self.state.line_width * self.state.transform.mean_scale();
        let element = format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{INK}\" stroke-width=\"{width:.2}\"/>",
            self.path_data()
        );
        self.emit(element);
    }

    fn clip(&mut self) {
        self.clip_count += 1;
        let id = format!("clip-{}", self.clip_count);
        let nested = self
            .state
            .clip
            .as_ref()
            .map(|parent| format!(" clip-path=\"url(#{parent})\""))
            .unwrap_or_default();
        self.defs.push_str(&format!(
            "<clipPath id=\"{id}\"{nested}><path d=\"{}\"/></clipPath>",
            self.path_data()
        ));
        self.state.clip = Some(id);
    }

    fn set_line_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    fn set_font(&mut self, font: &Font) {
        self.state.font = font.clone();
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.state.baseline = baseline;
    }

    fn measure_text(&mut self, text: &str) -> f32 {
        text_metrics::measure_text_width(text, self.state.font.size, &self.state.font.family)
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        let baseline = match self.state.baseline {
            TextBaseline::Top => " dominant-baseline=\"text-before-edge\"",
            TextBaseline::Middle => " dominant-baseline=\"central\"",
            TextBaseline::Bottom => " dominant-baseline=\"text-after-edge\"",
            TextBaseline::Alphabetic => "",
        };
        let element = format!(
            "<text transform=\"{}\" x=\"{x:.2}\" y=\"{y:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{INK}\" xml:space=\"preserve\"{baseline}>{}</text>",
            self.state.transform.to_svg_matrix(),
            escape_xml(&self.state.font.family),
            self.state.font.size,
            escape_xml(text)
        );
        self.emit(element);
    }

    fn draw_image(&mut self, image: &DecodedImage, x: f32, y: f32, width: f32, height: f32) {
        let element = format!(
            "<image transform=\"{}\" x=\"{x:.2}\" y=\"{y:.2}\" width=\"{width:.2}\" height=\"{height:.2}\" preserveAspectRatio=\"none\" href=\"{}\"/>",
            self.state.transform.to_svg_matrix(),
            escape_xml(&image.href)
        );
        self.emit(element);
    }

    fn surface_width(&self) -> Option<f32> {
        Some(self.size.width as f32)
    }
}

/// A host with a fixed set of named containers, handing out [`SvgContext`]s.
#[derive(Debug, Clone, Default)]
pub struct StaticHost {
    containers: HashMap<String, ContainerBox>,
    background: Option<String>,
    attached: Vec<String>,
}

impl StaticHost {
    pub fn new() -> Self {
        Self::default()
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

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }

    pub fn attached(&self) -> &[String] {
        &self.attached
    }
}

impl Host for StaticHost {
    type Context = SvgContext;

    fn resolve_container(&self, tag_id: &str) -> Option<ContainerBox> {
        self.containers.get(tag_id).copied()
    }

    fn attach_surface(&mut self, tag_id: &str, _size: SurfaceSize) {
        self.attached.push(tag_id.to_string());
    }

    fn context_2d(&mut self, size: SurfaceSize) -> Option<SvgContext> {
        let context = SvgContext::new(size);
        Some(match &self.background {
            Some(color) => context.with_background(color.clone()),
            None => context,
        })
    }
}

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

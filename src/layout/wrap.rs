//! Greedy, character-granular line breaking driven by measured widths.
//!
//! Lines break between any two characters, not only at spaces, so scripts
//! without word separators wrap the same way as Latin text.

use crate::error::RenderError;
use crate::surface::Context2d;

/// Wrap width used when neither the caller nor the surface provides one.
pub const DEFAULT_MAX_WIDTH: f32 = 300.0;
/// Line advance used when neither the caller nor the host provides one.
pub const DEFAULT_LINE_HEIGHT: f32 = 16.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WrapOptions {
    /// Defaults to the surface width, then [`DEFAULT_MAX_WIDTH`].
    pub max_width: Option<f32>,
    /// Defaults to the host line height, then [`DEFAULT_LINE_HEIGHT`].
    pub line_height: Option<f32>,
}

impl WrapOptions {
    pub fn new(max_width: f32, line_height: f32) -> Self {
        Self {
            max_width: Some(max_width),
            line_height: Some(line_height),
        }
    }
}

/// What [`wrap_text`] drew.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedText {
    pub lines: Vec<String>,
    pub max_width: f32,
    pub line_height: f32,
}

struct WrapState {
    current_line: String,
    cursor_y: f32,
}

fn wrap_each<M, E>(text: &str, max_width: f32, line_height: f32, mut measure: M, mut emit: E)
where
    M: FnMut(&str) -> f32,
    E: FnMut(&str, f32),
{
    let mut state = WrapState {
        current_line: String::new(),
        cursor_y: 0.0,
    };
    for ch in text.chars() {
        let mut candidate = state.current_line.clone();
        candidate.push(ch);
        if measure(&candidate) > max_width && !state.current_line.is_empty() {
            emit(&state.current_line, state.cursor_y);
            state.current_line.clear();
            state.current_line.push(ch);
            state.cursor_y += line_height;
        } else {
            state.current_line = candidate;
        }
    }
    if !state.current_line.is_empty() {
        emit(&state.current_line, state.cursor_y);
    }
}

/// Splits `text` into lines no wider than `max_width` according to
/// `measure`. A single character wider than `max_width` gets a line of its
/// own. Concatenating the result gives back `text`; empty text yields no
/// lines.
pub fn wrap_lines<M>(text: &str, max_width: f32, measure: M) -> Vec<String>
where
    M: FnMut(&str) -> f32,
{
    let mut lines = Vec::new();
    wrap_each(text, max_width, 0.0, measure, |line, _| {
        lines.push(line.to_string())
    });
    lines
}

/// Draws already-wrapped `lines` starting at `(x, y)`, one `line_height`
/// apart.
pub fn fill_lines<C: Context2d + ?Sized>(
    ctx: &mut C,
    lines: &[String],
    x: f32,
    y: f32,
    line_height: f32,
) {
    for (idx, line) in lines.iter().enumerate() {
        ctx.fill_text(line, x, y + idx as f32 * line_height);
    }
}

/// Wraps `text` with the context's current font and draws each line.
///
/// Non-finite coordinates and non-positive or non-finite widths/heights are
/// rejected with [`RenderError::InvalidArgument`] before anything is drawn.
pub fn wrap_text<C: Context2d + ?Sized>(
    ctx: &mut C,
    text: &str,
    x: f32,
    y: f32,
    options: WrapOptions,
) -> Result<WrappedText, RenderError> {
    if !x.is_finite() || !y.is_finite() {
        return Err(RenderError::InvalidArgument(format!(
            "text position ({x}, {y}) is not finite"
        )));
    }
    let max_width = options
        .max_width
        .or_else(|| ctx.surface_width())
        .unwrap_or(DEFAULT_MAX_WIDTH);
    if !max_width.is_finite() || max_width <= 0.0 {
        return Err(RenderError::InvalidArgument(format!(
            "wrap width {max_width} must be positive"
        )));
    }
    let line_height = options
        .line_height
        .or_else(|| ctx.line_height())
        .unwrap_or(DEFAULT_LINE_HEIGHT);
    if !line_height.is_finite() || line_height <= 0.0 {
        return Err(RenderError::InvalidArgument(format!(
            "line height {line_height} must be positive"
        )));
    }

    let mut lines = Vec::new();
    wrap_each(
        text,
        max_width,
        line_height,
        |candidate| ctx.measure_text(candidate),
        |line, offset| lines.push((line.to_string(), offset)),
    );
    for (line, offset) in &lines {
        ctx.fill_text(line, x, y + offset);
    }

    Ok(WrappedText {
        lines: lines.into_iter().map(|(line, _)| line).collect(),
        max_width,
        line_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingContext};

    fn by_chars(width: f32) -> impl FnMut(&str) -> f32 {
        move |text| text.chars().count() as f32 * width
    }

    #[test]
    fn short_text_stays_on_one_line() {
        assert_eq!(wrap_lines("short", 80.0, by_chars(7.0)), vec!["short"]);
    }

    #[test]
    fn breaks_between_characters_not_words() {
        // 10 px per char, 40 px budget -> 4 chars per line.
        let lines = wrap_lines("hello world", 40.0, by_chars(10.0));
        assert_eq!(lines, vec!["hell", "o wo", "rld"]);
    }

    #[test]
    fn wraps_text_without_spaces() {
        let lines = wrap_lines("图片描述文本内容", 30.0, by_chars(14.0));
        assert_eq!(lines, vec!["图片", "描述", "文本", "内容"]);
    }

    #[test]
    fn oversized_characters_get_their_own_line() {
        let lines = wrap_lines("abc", 5.0, by_chars(10.0));
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_text_has_no_lines() {
        assert!(wrap_lines("", 80.0, by_chars(7.0)).is_empty());
    }

    #[test]
    fn lines_fit_and_concatenate_back() {
        let samples = [
            "A caption that is definitely longer than eighty pixels",
            "iiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiii mmmmmmmmmmmmmmm",
            "混合 mixed 文字 text",
            "x",
            "  leading and trailing  ",
        ];
        // Variable-width measure so breaks land at different counts per line.
        let measure = |text: &str| {
            text.chars()
                .map(crate::text_metrics::char_width_factor)
                .sum::<f32>()
                * 14.0
        };
        for max_width in [1.0, 20.0, 80.0, 300.0] {
            for text in samples {
                let lines = wrap_lines(text, max_width, measure);
                assert_eq!(lines.concat(), text, "round trip at {max_width}");
                for line in &lines {
                    assert!(
                        measure(line) <= max_width || line.chars().count() == 1,
                        "{line:?} exceeds {max_width}"
                    );
                }
            }
        }
    }

    #[test]
    fn wrap_text_draws_lines_one_line_height_apart() {
        let mut ctx = RecordingContext::new().with_char_width(10.0);
        let wrapped = wrap_text(&mut ctx, "abcdefgh", 5.0, 7.0, WrapOptions::new(40.0, 16.0))
            .expect("valid arguments");
        assert_eq!(wrapped.lines, vec!["abcd", "efgh"]);
        let positions: Vec<(String, f32, f32)> = ctx
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::FillText { text, x, y, .. } => Some((text.clone(), *x, *y)),
                _ => None,
            })
            .collect();
        assert_eq!(
            positions,
            vec![
                ("abcd".to_string(), 5.0, 7.0),
                ("efgh".to_string(), 5.0, 23.0)
            ]
        );
    }

    #[test]
    fn defaults_come_from_the_surface_then_constants() {
        let mut ctx = RecordingContext::new().with_surface_width(120.0);
        let wrapped = wrap_text(&mut ctx, "x", 0.0, 0.0, WrapOptions::default()).expect("ok");
        assert_eq!(wrapped.max_width, 120.0);
        assert_eq!(wrapped.line_height, DEFAULT_LINE_HEIGHT);

        let mut bare = RecordingContext::new().with_line_height(20.0);
        let wrapped = wrap_text(&mut bare, "x", 0.0, 0.0, WrapOptions::default()).expect("ok");
        assert_eq!(wrapped.max_width, DEFAULT_MAX_WIDTH);
        assert_eq!(wrapped.line_height, 20.0);
    }

    #[test]
    fn invalid_arguments_draw_nothing() {
        let mut ctx = RecordingContext::new();
        let bad_position = wrap_text(&mut ctx, "x", f32::NAN, 0.0, WrapOptions::default());
        assert!(matches!(bad_position, Err(RenderError::InvalidArgument(_))));
        let bad_width = wrap_text(&mut ctx, "x", 0.0, 0.0, WrapOptions::new(0.0, 16.0));
        assert!(matches!(bad_width, Err(RenderError::InvalidArgument(_))));
        let bad_height = wrap_text(&mut ctx, "x", 0.0, 0.0, WrapOptions::new(80.0, -1.0));
        assert!(matches!(bad_height, Err(RenderError::InvalidArgument(_))));
        assert_eq!(ctx.texts().count(), 0);
    }
}

//! Display surface seam.
//!
//! The render engine never touches pixels. It talks to a [`Surface`], which
//! exposes the handful of operations the dashboard needs: fill the screen,
//! print a string at a position in a font and color, and draw a vertical
//! line. [`GraphicsSurface`] implements it for any `embedded-graphics`
//! `DrawTarget`, so the same engine drives an SPI panel, the simulator window
//! or an in-memory framebuffer.
//!
//! Text is drawn with a transparent background: only glyph pixels are set.
//! Erasing a digit therefore means drawing the *old* glyph again in the
//! background color, exactly where it was drawn before.

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};
use embedded_graphics::text::{Baseline, Text};

/// Drawing operations the dashboard needs from the display collaborator.
pub trait Surface {
    /// Fill the whole screen with one color.
    fn fill_screen(
        &mut self,
        color: Rgb565,
    );

    /// Draw `text` with its top-left corner at `top_left`.
    fn draw_text(
        &mut self,
        text: &str,
        top_left: Point,
        font: &'static MonoFont<'static>,
        color: Rgb565,
    );

    /// Draw a one pixel wide vertical line from `y0` to `y1` inclusive.
    fn draw_vline(
        &mut self,
        x: i32,
        y0: i32,
        y1: i32,
        color: Rgb565,
    );

    /// Advance of one glyph cell for `font` (width includes spacing).
    #[inline]
    fn glyph_size(
        &self,
        font: &MonoFont<'_>,
    ) -> Size {
        Size::new(font.character_size.width + font.character_spacing, font.character_size.height)
    }
}

/// [`Surface`] over an `embedded-graphics` draw target.
///
/// Draw errors are discarded: from the dashboard's point of view a render is
/// synchronous and infallible.
pub struct GraphicsSurface<D> {
    target: D,
}

impl<D> GraphicsSurface<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub const fn new(target: D) -> Self { Self { target } }

    /// Borrow the underlying draw target (e.g. to flush a simulator window).
    #[inline]
    pub const fn target(&self) -> &D { &self.target }

    #[inline]
    pub fn target_mut(&mut self) -> &mut D { &mut self.target }

    pub fn into_inner(self) -> D { self.target }
}

impl<D> Surface for GraphicsSurface<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn fill_screen(
        &mut self,
        color: Rgb565,
    ) {
        self.target.clear(color).ok();
    }

    fn draw_text(
        &mut self,
        text: &str,
        top_left: Point,
        font: &'static MonoFont<'static>,
        color: Rgb565,
    ) {
        Text::with_baseline(text, top_left, MonoTextStyle::new(font, color), Baseline::Top)
            .draw(&mut self.target)
            .ok();
    }

    fn draw_vline(
        &mut self,
        x: i32,
        y0: i32,
        y1: i32,
        color: Rgb565,
    ) {
        Line::new(Point::new(x, y0), Point::new(x, y1))
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(&mut self.target)
            .ok();
    }
}

/// Surface that records every call, for asserting on redraw cost in tests.
#[cfg(test)]
pub(crate) mod recording {
    use embedded_graphics::mono_font::MonoFont;
    use embedded_graphics::pixelcolor::Rgb565;
    use embedded_graphics::prelude::Point;

    use super::Surface;

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Op {
        Fill(Rgb565),
        Text {
            text: String,
            at: Point,
            color: Rgb565,
        },
        VLine {
            x: i32,
        },
    }

    #[derive(Default)]
    pub struct RecordingSurface {
        pub ops: Vec<Op>,
    }

    impl RecordingSurface {
        pub fn new() -> Self { Self::default() }

        pub fn take(&mut self) -> Vec<Op> { core::mem::take(&mut self.ops) }

        pub fn fills(&self) -> usize { self.ops.iter().filter(|op| matches!(op, Op::Fill(_))).count() }

        /// Text draws in `color`, in order.
        pub fn texts_in(
            &self,
            color: Rgb565,
        ) -> Vec<(&str, Point)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Text { text, at, color: c } if *c == color => Some((text.as_str(), *at)),
                    _ => None,
                })
                .collect()
        }
    }

    impl Surface for RecordingSurface {
        fn fill_screen(
            &mut self,
            color: Rgb565,
        ) {
            self.ops.push(Op::Fill(color));
        }

        fn draw_text(
            &mut self,
            text: &str,
            top_left: Point,
            _font: &'static MonoFont<'static>,
            color: Rgb565,
        ) {
            self.ops.push(Op::Text {
                text: text.into(),
                at: top_left,
                color,
            });
        }

        fn draw_vline(
            &mut self,
            x: i32,
            _y0: i32,
            _y1: i32,
            _color: Rgb565,
        ) {
            self.ops.push(Op::VLine { x });
        }
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::mock_display::MockDisplay;

    use super::*;
    use crate::colors::{BLACK, WHITE};
    use crate::styles::{LABEL_FONT, LARGE_VALUE_FONT};

    #[test]
    fn test_glyph_size_includes_spacing() {
        let surface = GraphicsSurface::new(MockDisplay::<Rgb565>::new());
        let size = surface.glyph_size(LABEL_FONT);
        assert_eq!(size.width, LABEL_FONT.character_size.width + LABEL_FONT.character_spacing);
        assert_eq!(size.height, LABEL_FONT.character_size.height);
    }

    #[test]
    fn test_large_font_wider_than_label_font() {
        let surface = GraphicsSurface::new(MockDisplay::<Rgb565>::new());
        assert!(surface.glyph_size(LARGE_VALUE_FONT).width > surface.glyph_size(LABEL_FONT).width);
    }

    #[test]
    fn test_draw_text_sets_only_glyph_pixels() {
        let mut display = MockDisplay::<Rgb565>::new();
        display.set_allow_overdraw(true);
        let mut surface = GraphicsSurface::new(display);
        surface.draw_text("1", Point::zero(), LABEL_FONT, WHITE);

        let display = surface.into_inner();
        let lit = display.affected_area();
        assert!(!lit.is_zero_sized(), "glyph should set some pixels");
        // Transparent background: the corner of the cell stays untouched
        assert_eq!(display.get_pixel(Point::zero()), None);
    }

    #[test]
    fn test_vline_spans_inclusive_range() {
        let mut surface = GraphicsSurface::new(MockDisplay::<Rgb565>::new());
        surface.draw_vline(3, 0, 9, BLACK);
        let display = surface.into_inner();
        assert_eq!(display.get_pixel(Point::new(3, 0)), Some(BLACK));
        assert_eq!(display.get_pixel(Point::new(3, 9)), Some(BLACK));
        assert_eq!(display.get_pixel(Point::new(3, 10)), None);
    }
}

//! Fake elevation for runs of list items.
//!
//! A run of consecutive elevated items gets a faint one-row shadow above
//! its first item and a stronger two-row shadow fading out below its last
//! item. Shadows are drawn with eighth-block glyphs on blank cells only,
//! so they never cover text.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;

pub trait ElevationDecoration {
    fn is_item_elevated(&self, index: usize) -> bool;
    fn item_count(&self) -> usize;
}

/// One on-screen list item. `top` is relative to the list area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleItem {
    pub index: usize,
    pub top: i32,
    pub height: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowEdge {
    /// Above the first item of a run.
    Start,
    /// Below the last item of a run.
    End,
}

/// A shadow to paint. `top` is the first shadow row relative to the area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shadow {
    pub edge: ShadowEdge,
    pub top: i32,
}

/// Precomputed rows of one shadow, nearest-to-item row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brush {
    rows: Vec<(char, Color)>,
}

impl Brush {
    /// `alphas` run from the item outwards.
    fn new(glyphs: &[char], alphas: &[u8], background: Color) -> Self {
        Self {
            rows: glyphs
                .iter()
                .zip(alphas)
                .map(|(&g, &a)| (g, shade(background, a)))
                .collect(),
        }
    }

    pub fn height(&self) -> u16 {
        u16::try_from(self.rows.len()).unwrap_or(u16::MAX)
    }

    pub fn row(&self, distance: usize) -> Option<(char, Color)> {
        self.rows.get(distance).copied()
    }
}

/// Black at `alpha`/255 composited over `background`.
pub fn shade(background: Color, alpha: u8) -> Color {
    let Color::Rgb(r, g, b) = background else {
        return Color::Black;
    };
    let keep = 255 - u16::from(alpha);
    let mix = |c: u8| u8::try_from(u16::from(c) * keep / 255).unwrap_or(0);
    Color::Rgb(mix(r), mix(g), mix(b))
}

pub struct ElevationPainter {
    start: Brush,
    end: Brush,
}

impl ElevationPainter {
    pub const START_ALPHA: u8 = 16;
    pub const END_ALPHA: u8 = 40;

    pub fn new(background: Color) -> Self {
        Self {
            // One row fading in towards the item.
            start: Brush::new(&['▁'], &[Self::START_ALPHA], background),
            // Two rows fading out away from the item.
            end: Brush::new(&['▀', '▔'], &[Self::END_ALPHA, Self::END_ALPHA / 2], background),
        }
    }

    #[cfg(test)]
    pub fn start_brush(&self) -> &Brush {
        &self.start
    }

    #[cfg(test)]
    pub fn end_brush(&self) -> &Brush {
        &self.end
    }

    /// Shadows for the visible items, in the order they are found.
    pub fn shadow_spans(
        &self,
        decoration: &dyn ElevationDecoration,
        visible: &[VisibleItem],
    ) -> Vec<Shadow> {
        let count = decoration.item_count();
        let mut shadows = Vec::new();
        for item in visible {
            if !decoration.is_item_elevated(item.index) {
                continue;
            }
            if item.index == 0 || !decoration.is_item_elevated(item.index - 1) {
                shadows.push(Shadow {
                    edge: ShadowEdge::Start,
                    top: item.top - i32::from(self.start.height()),
                });
            }
            if item.index + 1 >= count || !decoration.is_item_elevated(item.index + 1) {
                shadows.push(Shadow {
                    edge: ShadowEdge::End,
                    top: item.top + i32::from(item.height),
                });
            }
        }
        shadows
    }

    /// Paint every shadow into `buf`, clipped to `area`.
    pub fn draw(
        &self,
        buf: &mut Buffer,
        area: Rect,
        decoration: &dyn ElevationDecoration,
        visible: &[VisibleItem],
    ) {
        for shadow in self.shadow_spans(decoration, visible) {
            let brush = match shadow.edge {
                ShadowEdge::Start => &self.start,
                ShadowEdge::End => &self.end,
            };
            for row in 0..brush.height() {
                let y = shadow.top + i32::from(row);
                if y < 0 || y >= i32::from(area.height) {
                    continue;
                }
                // The start brush is listed outwards from the item, which
                // for a shadow above the item means bottom-up.
                let distance = match shadow.edge {
                    ShadowEdge::Start => usize::from(brush.height() - 1 - row),
                    ShadowEdge::End => usize::from(row),
                };
                let Some((glyph, color)) = brush.row(distance) else {
                    continue;
                };
                let Ok(y) = u16::try_from(y) else {
                    continue;
                };
                paint_row(buf, area, area.y + y, glyph, color);
            }
        }
    }
}

fn paint_row(buf: &mut Buffer, area: Rect, y: u16, glyph: char, color: Color) {
    for x in area.left()..area.right() {
        let cell = &mut buf[(x, y)];
        if cell.symbol() == " " {
            cell.set_char(glyph);
            cell.set_fg(color);
        }
    }
}

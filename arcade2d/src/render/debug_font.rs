//! Built-in 5x7 bitmap font for debug text.
//!
//! Each glyph is seven rows, top to bottom; bit 4 of a row is the leftmost pixel.
//! Text is turned into one rectangle per lit pixel, which the renderer draws like
//! any other filled rect.

use crate::math::{Rect, Vec2};

pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 7;
/// Horizontal distance between glyph origins, in font pixels.
pub const ADVANCE: u32 = GLYPH_WIDTH + 1;
/// Vertical distance between lines, in font pixels.
pub const LINE_HEIGHT: u32 = GLYPH_HEIGHT + 3;
/// Logical pixels per font pixel.
pub const SCALE: f32 = 2.0;

type Glyph = [u8; GLYPH_HEIGHT as usize];

const FALLBACK: Glyph = [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100];

/// Bitmap for `ch`. Characters without a glyph use `?`.
pub fn glyph(ch: char) -> &'static Glyph {
    lookup(ch).unwrap_or(&FALLBACK)
}

fn lookup(ch: char) -> Option<&'static Glyph> {
    let g: &'static Glyph = match ch {
        ' ' => &[0, 0, 0, 0, 0, 0, 0],
        '!' => &[0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '#' => &[0b01010, 0b01010, 0b11111, 0b01010, 0b11111, 0b01010, 0b01010],
        '%' => &[0b11000, 0b11001, 0b00010, 0b00100, 0b01000, 0b10011, 0b00011],
        '\'' => &[0b01100, 0b00100, 0b01000, 0b00000, 0b00000, 0b00000, 0b00000],
        '(' => &[0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010],
        ')' => &[0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000],
        '*' => &[0b00000, 0b00100, 0b10101, 0b01110, 0b10101, 0b00100, 0b00000],
        '+' => &[0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000],
        ',' => &[0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b00100, 0b01000],
        '-' => &[0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '.' => &[0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        '/' => &[0b00000, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b00000],
        '0' => &[0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => &[0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => &[0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => &[0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => &[0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => &[0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => &[0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => &[0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => &[0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => &[0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        ':' => &[0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000],
        '=' => &[0b00000, 0b00000, 0b11111, 0b00000, 0b11111, 0b00000, 0b00000],
        '?' => &FALLBACK,
        'A' => &[0b01110, 0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001],
        'B' => &[0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => &[0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => &[0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        'E' => &[0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => &[0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => &[0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => &[0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => &[0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => &[0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => &[0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => &[0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => &[0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => &[0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => &[0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => &[0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => &[0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => &[0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => &[0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => &[0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => &[0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => &[0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => &[0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => &[0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => &[0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100],
        'Z' => &[0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '_' => &[0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b11111],
        'a' => &[0b00000, 0b00000, 0b01110, 0b00001, 0b01111, 0b10001, 0b01111],
        'b' => &[0b10000, 0b10000, 0b10110, 0b11001, 0b10001, 0b10001, 0b11110],
        'c' => &[0b00000, 0b00000, 0b01110, 0b10000, 0b10000, 0b10001, 0b01110],
        'd' => &[0b00001, 0b00001, 0b01101, 0b10011, 0b10001, 0b10001, 0b01111],
        'e' => &[0b00000, 0b00000, 0b01110, 0b10001, 0b11111, 0b10000, 0b01110],
        'f' => &[0b00110, 0b01001, 0b01000, 0b11100, 0b01000, 0b01000, 0b01000],
        'g' => &[0b00000, 0b01111, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110],
        'h' => &[0b10000, 0b10000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001],
        'i' => &[0b00100, 0b00000, 0b01100, 0b00100, 0b00100, 0b00100, 0b01110],
        'j' => &[0b00010, 0b00000, 0b00110, 0b00010, 0b00010, 0b10010, 0b01100],
        'k' => &[0b10000, 0b10000, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010],
        'l' => &[0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'm' => &[0b00000, 0b00000, 0b11010, 0b10101, 0b10101, 0b10001, 0b10001],
        'n' => &[0b00000, 0b00000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001],
        'o' => &[0b00000, 0b00000, 0b01110, 0b10001, 0b10001, 0b10001, 0b01110],
        'p' => &[0b00000, 0b00000, 0b11110, 0b10001, 0b11110, 0b10000, 0b10000],
        'q' => &[0b00000, 0b00000, 0b01101, 0b10011, 0b01111, 0b00001, 0b00001],
        'r' => &[0b00000, 0b00000, 0b10110, 0b11001, 0b10000, 0b10000, 0b10000],
        's' => &[0b00000, 0b00000, 0b01110, 0b10000, 0b01110, 0b00001, 0b11110],
        't' => &[0b01000, 0b01000, 0b11100, 0b01000, 0b01000, 0b01001, 0b00110],
        'u' => &[0b00000, 0b00000, 0b10001, 0b10001, 0b10001, 0b10011, 0b01101],
        'v' => &[0b00000, 0b00000, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'w' => &[0b00000, 0b00000, 0b10001, 0b10001, 0b10101, 0b10101, 0b01010],
        'x' => &[0b00000, 0b00000, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001],
        'y' => &[0b00000, 0b00000, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110],
        'z' => &[0b00000, 0b00000, 0b11111, 0b00010, 0b00100, 0b01000, 0b11111],
        _ => return None,
    };
    Some(g)
}

/// Rectangles (in logical pixels) covering every lit pixel of `text` drawn at `origin`.
///
/// `\n` moves to the start of the next line.
pub fn text_rects(text: &str, origin: Vec2) -> Vec<Rect> {
    let mut rects = Vec::new();
    let (mut col, mut line) = (0u32, 0u32);

    for ch in text.chars() {
        if ch == '\n' {
            col = 0;
            line += 1;
            continue;
        }

        let base = Vec2::new(
            origin.x + (col * ADVANCE) as f32 * SCALE,
            origin.y + (line * LINE_HEIGHT) as f32 * SCALE,
        );
        for (row, bits) in glyph(ch).iter().enumerate() {
            for px in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - px)) != 0 {
                    rects.push(Rect::new(
                        base.x + px as f32 * SCALE,
                        base.y + row as f32 * SCALE,
                        SCALE,
                        SCALE,
                    ));
                }
            }
        }
        col += 1;
    }

    rects
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_pixels(ch: char) -> usize {
        glyph(ch).iter().map(|row| row.count_ones() as usize).sum()
    }

    #[test]
    fn space_draws_nothing() {
        assert!(text_rects("   ", Vec2::ZERO).is_empty());
    }

    #[test]
    fn one_rect_per_lit_pixel() {
        let rects = text_rects("Lives: 3", Vec2::ZERO);
        let expected: usize = "Lives: 3".chars().map(lit_pixels).sum();
        assert_eq!(rects.len(), expected);
    }

    #[test]
    fn unknown_characters_fall_back_to_question_mark() {
        assert_eq!(glyph('~'), glyph('?'));
        assert_eq!(glyph('é'), &FALLBACK);
    }

    #[test]
    fn glyph_pixels_are_placed_from_the_origin() {
        // Top row of 'T' is solid.
        let rects = text_rects("T", Vec2::new(10.0, 20.0));
        let top_row: Vec<_> = rects.iter().filter(|r| r.origin.y == 20.0).collect();
        assert_eq!(top_row.len(), GLYPH_WIDTH as usize);
        assert_eq!(top_row[0].origin.x, 10.0);
        assert_eq!(top_row[4].origin.x, 10.0 + 4.0 * SCALE);
    }

    #[test]
    fn second_character_is_advanced() {
        let rects = text_rects("!!", Vec2::ZERO);
        let min_second = rects
            .iter()
            .map(|r| r.origin.x)
            .filter(|&x| x >= ADVANCE as f32 * SCALE)
            .count();
        assert_eq!(min_second, lit_pixels('!'));
    }

    #[test]
    fn newline_starts_a_new_line() {
        let rects = text_rects("-\n-", Vec2::ZERO);
        assert_eq!(rects.len(), 10);
        assert!(rects
            .iter()
            .any(|r| r.origin.x == 0.0 && r.origin.y == (LINE_HEIGHT + 3) as f32 * SCALE));
    }

    #[test]
    fn game_text_is_fully_covered() {
        for ch in "GAME OVER!Lives: -0123456789".chars() {
            assert!(lookup(ch).is_some(), "missing glyph for {ch:?}");
        }
    }
}

use crate::math::{Color, Rect, Vec2};

/// Where `debug_print` text starts, in logical pixels.
pub const DEBUG_TEXT_ORIGIN: Vec2 = Vec2::new(4.0, 4.0);

/// Drawing primitives available to game code.
///
/// Coordinates are logical pixels with the origin at the top-left corner.
pub trait Surface {
    /// Fill the whole surface with a single color.
    fn fill(&mut self, color: Color);

    /// Draw a filled, axis-aligned rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Print a line of debug text at [`DEBUG_TEXT_ORIGIN`].
    fn debug_print(&mut self, text: &str);
}

/// Anything that knows how to put itself on a [`Surface`].
pub trait Drawable {
    fn draw(&self, surface: &mut dyn Surface);
}

/// One recorded drawing operation.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Fill(Color),
    Rect { rect: Rect, color: Color },
    Text { text: String, origin: Vec2 },
}

/// A [`Surface`] that records commands in call order.
///
/// The renderer replays this list at the end of a frame; tests inspect it directly.
#[derive(Clone, Debug, Default)]
pub struct CommandList {
    commands: Vec<DrawCommand>,
}

impl CommandList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Color of the last `fill`, if any, and the commands drawn after it.
    ///
    /// Everything before the last fill is covered by it and can be skipped.
    pub fn visible(&self) -> (Option<Color>, &[DrawCommand]) {
        let last_fill = self
            .commands
            .iter()
            .rposition(|cmd| matches!(cmd, DrawCommand::Fill(_)));

        match last_fill {
            Some(idx) => {
                let color = match self.commands[idx] {
                    DrawCommand::Fill(color) => Some(color),
                    _ => None,
                };
                (color, &self.commands[idx + 1..])
            }
            None => (None, &self.commands),
        }
    }
}

impl Surface for CommandList {
    fn fill(&mut self, color: Color) {
        self.commands.push(DrawCommand::Fill(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Rect { rect, color });
    }

    fn debug_print(&mut self, text: &str) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            origin: DEBUG_TEXT_ORIGIN,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dot;

    impl Drawable for Dot {
        fn draw(&self, surface: &mut dyn Surface) {
            surface.fill_rect(Rect::new(1.0, 2.0, 1.0, 1.0), Color::WHITE);
        }
    }

    #[test]
    fn records_in_call_order() {
        let mut list = CommandList::new();
        list.fill(Color::BLACK);
        Dot.draw(&mut list);
        list.debug_print("hi");

        assert_eq!(
            list.commands(),
            &[
                DrawCommand::Fill(Color::BLACK),
                DrawCommand::Rect {
                    rect: Rect::new(1.0, 2.0, 1.0, 1.0),
                    color: Color::WHITE
                },
                DrawCommand::Text {
                    text: "hi".into(),
                    origin: DEBUG_TEXT_ORIGIN
                },
            ]
        );
    }

    #[test]
    fn visible_skips_everything_before_last_fill() {
        let mut list = CommandList::new();
        list.fill(Color::WHITE);
        list.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Color::RED);
        list.fill(Color::BLACK);
        list.debug_print("GAME OVER!");

        let (clear, rest) = list.visible();
        assert_eq!(clear, Some(Color::BLACK));
        assert_eq!(rest.len(), 1);
        assert!(matches!(&rest[0], DrawCommand::Text { text, .. } if text == "GAME OVER!"));
    }

    #[test]
    fn visible_without_fill_keeps_all_commands() {
        let mut list = CommandList::new();
        list.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Color::RED);

        let (clear, rest) = list.visible();
        assert_eq!(clear, None);
        assert_eq!(rest.len(), 1);
    }
}

//! The immediate-mode command stream paintings are drawn with.
//!
//! The painting core never talks to a graphics API. Each draw produces a
//! [`DisplayList`] of [`Command`]s that the surrounding renderer executes in
//! order. Static lists authored with the level (frames, the flat painting,
//! ripple material setup) are referenced by name.

use glam::Mat4;

use crate::vertex::PaintingVertex;

/// Display lists shared by every painting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinList {
    /// Render state for image paintings while rippling.
    RipplingBegin,
    RipplingEnd,
    /// Render state for environment-mapped paintings while rippling.
    EnvMappedBegin,
    EnvMappedEnd,
    /// Draws the five triangles of a full vertex upload.
    DrawRipples,
}

/// A reference to another display list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListRef {
    Builtin(BuiltinList),
    /// A list authored with the level, by name.
    Authored(String),
}

/// Texel format of a texture upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TexelFormat {
    Rgba16,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Multiply the modelview matrix, optionally pushing first.
    Matrix { matrix: Mat4, push: bool },
    PopMatrix,
    /// Call another display list.
    CallList(ListRef),
    /// Load a painting image as the current texture.
    LoadBlockTexture { image: usize, width: u32, height: u32, format: TexelFormat },
    /// Upload vertices into the vertex buffer starting at slot `start`.
    Vertices { start: u8, vertices: Vec<PaintingVertex> },
    /// Draw one triangle from vertex-buffer slots.
    Triangle([u8; 3]),
    End,
}

/// An ordered list of commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    commands: Vec<Command>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn call(&mut self, list: ListRef) {
        self.push(Command::CallList(list));
    }

    pub fn call_builtin(&mut self, list: BuiltinList) {
        self.call(ListRef::Builtin(list));
    }

    pub fn end(&mut self) {
        self.push(Command::End);
    }

    #[inline]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of triangles this list draws, counting full uploads as five.
    pub fn triangle_count(&self) -> usize {
        self.commands
            .iter()
            .map(|c| match c {
                Command::Triangle(_) => 1,
                Command::CallList(ListRef::Builtin(BuiltinList::DrawRipples)) => 5,
                _ => 0,
            })
            .sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.commands.iter()
    }
}

impl<'a> IntoIterator for &'a DisplayList {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

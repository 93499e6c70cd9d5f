//=========================================================================
// Graphics Interface
//=========================================================================
//
// Backend-neutral drawing contract.
//
//   Drawable::draw ──► dyn Renderer ──► DisplayList ──► Frame ──► platform
//
// The engine never issues GPU calls. It records RenderCommands into a
// DisplayList; a platform backend replays the Frame however it likes.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::assets::AssetHandle;
use crate::core::math::{Color4f, Rect};

//=== Renderer ============================================================

/// Drawing sink handed to drawables and games.
pub trait Renderer {
    fn clear(&mut self, color: Color4f);

    fn fill_rect(&mut self, rect: Rect, color: Color4f);

    /// Draws a loaded image asset stretched into `dest`, multiplied by `tint`.
    fn draw_image(&mut self, image: AssetHandle, dest: Rect, tint: Color4f);
}

//=== Drawable ============================================================

/// Something the engine draws every frame.
pub trait Drawable: Send {
    /// Lower layers draw first.
    fn layer(&self) -> i32 {
        0
    }

    fn is_visible(&self) -> bool {
        true
    }

    fn draw(&self, renderer: &mut dyn Renderer);
}

//=== RenderCommand =======================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderCommand {
    Clear(Color4f),
    FillRect {
        rect: Rect,
        color: Color4f,
    },
    DrawImage {
        image: AssetHandle,
        dest: Rect,
        tint: Color4f,
    },
}

//=== DisplayList =========================================================

/// A [`Renderer`] that records commands instead of executing them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    commands: Vec<RenderCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drops recorded commands while preserving allocated capacity.
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// Packages the recorded commands as frame `number`.
    pub fn into_frame(self, number: u64) -> Frame {
        Frame {
            number,
            commands: self.commands,
        }
    }
}

impl Renderer for DisplayList {
    fn clear(&mut self, color: Color4f) {
        self.commands.push(RenderCommand::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color4f) {
        self.commands.push(RenderCommand::FillRect { rect, color });
    }

    fn draw_image(&mut self, image: AssetHandle, dest: Rect, tint: Color4f) {
        self.commands.push(RenderCommand::DrawImage { image, dest, tint });
    }
}

//=== Frame ===============================================================

/// One rendered frame, sent from the logic thread to the platform.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub number: u64,
    pub commands: Vec<RenderCommand>,
}

impl Frame {
    /// The clear color of the frame, if it starts with a clear.
    pub fn clear_color(&self) -> Option<Color4f> {
        match self.commands.first() {
            Some(RenderCommand::Clear(color)) => Some(*color),
            _ => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

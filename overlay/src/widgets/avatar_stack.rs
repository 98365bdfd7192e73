//! Avatar stack widget: a composed stack placed on a padded canvas

use std::sync::Arc;

use avatar_stack_core::{AvatarStack, RenderTree};
use avatar_stack_types::{Color, stack_colors};

use crate::canvas::StackCanvas;
use crate::error::RasterError;
use crate::images::ImageLoader;
use crate::renderer::Renderer;

/// A composed avatar stack ready to be drawn
#[derive(Debug, Clone)]
pub struct AvatarStackWidget {
    tree: RenderTree,
    /// Empty space around the stack, in logical pixels
    padding: f32,
    background: Color,
}

impl AvatarStackWidget {
    pub fn new(stack: &AvatarStack) -> Self {
        Self::from_tree(stack.compose())
    }

    pub fn from_tree(tree: RenderTree) -> Self {
        Self {
            tree,
            padding: 0.0,
            background: stack_colors::TRANSPARENT,
        }
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding.max(0.0);
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn tree(&self) -> &RenderTree {
        &self.tree
    }

    /// Logical canvas size needed for the stack plus padding (at least 1x1)
    pub fn size(&self) -> (f32, f32) {
        (
            (self.tree.width + 2.0 * self.padding).max(1.0),
            (self.tree.height + 2.0 * self.padding).max(1.0),
        )
    }

    /// Clear `canvas` to the background and paint the stack inside the padding
    pub fn render(&self, canvas: &mut StackCanvas<'_>) {
        canvas.clear(self.background);
        canvas.set_origin(self.padding, self.padding);
        self.tree.paint(canvas);
    }

    /// Allocate a canvas of [`Self::size`] at `scale` and render into it
    pub fn rasterize<'r>(
        &self,
        renderer: &'r mut Renderer,
        images: Arc<dyn ImageLoader>,
        scale: f32,
    ) -> Result<StackCanvas<'r>, RasterError> {
        let (width, height) = self.size();
        let mut canvas = StackCanvas::new(renderer, images, width, height, scale)?;
        self.render(&mut canvas);
        tracing::debug!(
            width = canvas.width(),
            height = canvas.height(),
            nodes = self.tree.nodes.len(),
            "rasterized avatar stack"
        );
        Ok(canvas)
    }
}

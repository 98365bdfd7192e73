//! Output tree of a composed avatar stack

use std::sync::Arc;

use avatar_stack_types::{Color, TextStyle};

use super::Painter;
use crate::geometry::{Circle, Point};
use crate::source::{ImageRef, Renderable, ResolvedImage};

/// What fills an avatar's circle
#[derive(Debug, Clone, PartialEq)]
pub enum NodeContent {
    Image(ImageRef),
    Renderable(Renderable),
    Resolved(Arc<ResolvedImage>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    pub width: f32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub style: TextStyle,
}

/// One avatar of the stack
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarNode {
    pub display_index: usize,
    pub z_index: usize,
    pub circle: Circle,
    pub background: Color,
    pub content: NodeContent,
    pub border: Border,
    /// Translucent fill composited over the content
    pub tint: Option<Color>,
    /// Centered "+N" overflow label
    pub label: Option<TextLabel>,
}

/// Separate overflow badge placed after the stack
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeNode {
    pub circle: Circle,
    pub background: Color,
    pub border: Border,
    pub label: TextLabel,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderNode {
    Avatar(AvatarNode),
    Badge(BadgeNode),
}

impl RenderNode {
    pub fn circle(&self) -> Circle {
        match self {
            Self::Avatar(avatar) => avatar.circle,
            Self::Badge(badge) => badge.circle,
        }
    }
}

/// Nodes in paint order (back to front) plus the stack's extent
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderTree {
    pub nodes: Vec<RenderNode>,
    pub width: f32,
    pub height: f32,
}

impl RenderTree {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Avatars in paint order
    pub fn avatars(&self) -> impl Iterator<Item = &AvatarNode> {
        self.nodes.iter().filter_map(|node| match node {
            RenderNode::Avatar(avatar) => Some(avatar),
            RenderNode::Badge(_) => None,
        })
    }

    pub fn badge(&self) -> Option<&BadgeNode> {
        self.nodes.iter().find_map(|node| match node {
            RenderNode::Badge(badge) => Some(badge),
            RenderNode::Avatar(_) => None,
        })
    }

    /// Topmost node whose circle contains `point`
    pub fn node_at(&self, point: Point) -> Option<&RenderNode> {
        self.nodes
            .iter()
            .rev()
            .find(|node| node.circle().contains(point))
    }

    /// Replay the tree through `painter`, back to front.
    ///
    /// Per avatar: background, content (clipped to the circle), tint, border
    /// ring, label.
    pub fn paint(&self, painter: &mut dyn Painter) {
        for node in &self.nodes {
            match node {
                RenderNode::Avatar(avatar) => paint_avatar(avatar, painter),
                RenderNode::Badge(badge) => paint_badge(badge, painter),
            }
        }
    }
}

fn paint_avatar(avatar: &AvatarNode, painter: &mut dyn Painter) {
    painter.fill_circle(avatar.circle, avatar.background);

    painter.push_clip(avatar.circle);
    match &avatar.content {
        NodeContent::Image(image) => painter.draw_image_ref(image, avatar.circle),
        NodeContent::Renderable(renderable) => {
            renderable.drawable().paint(painter, avatar.circle)
        }
        NodeContent::Resolved(image) => painter.draw_resolved_image(image, avatar.circle),
    }
    painter.pop_clip();

    if let Some(tint) = avatar.tint {
        painter.fill_circle(avatar.circle, tint);
    }
    paint_border(avatar.circle, avatar.border, painter);
    if let Some(label) = &avatar.label {
        painter.draw_centered_text(&label.text, avatar.circle.center, &label.style);
    }
}

fn paint_badge(badge: &BadgeNode, painter: &mut dyn Painter) {
    painter.fill_circle(badge.circle, badge.background);
    paint_border(badge.circle, badge.border, painter);
    painter.draw_centered_text(&badge.label.text, badge.circle.center, &badge.label.style);
}

/// Ring drawn entirely inside the circle's radius
fn paint_border(circle: Circle, border: Border, painter: &mut dyn Painter) {
    if border.width <= 0.0 {
        return;
    }
    painter.stroke_circle(circle.inset(border.width / 2.0), border.width, border.color);
}

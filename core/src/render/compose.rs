//! Composition: arrangement + overflow + styling into a render tree

use avatar_stack_types::{CounterMode, ItemConfig, stack_colors};

use super::tree::{AvatarNode, BadgeNode, Border, NodeContent, RenderNode, RenderTree, TextLabel};
use crate::geometry::Circle;
use crate::layout::{OverflowCalculator, StackArranger};
use crate::source::{ContentSource, SourceKind};
use crate::stack::AvatarStack;

/// Compose `stack` into a tree of avatars and, if visible, an overflow badge.
///
/// Pure: the same stack always yields an equal tree.
pub fn compose(stack: &AvatarStack) -> RenderTree {
    let Some(source) = stack.source() else {
        tracing::debug!(total_count = stack.total_count(), "no content source, empty stack");
        return RenderTree::empty();
    };

    match source {
        ContentSource::Images { items, config } => {
            compose_items(stack, SourceKind::Images, items, config, |image| {
                NodeContent::Image(image.clone())
            })
        }
        ContentSource::Renderables { items, config } => {
            compose_items(stack, SourceKind::Renderables, items, config, |renderable| {
                NodeContent::Renderable(renderable.clone())
            })
        }
        ContentSource::ResolvedImages { items, config } => {
            compose_items(stack, SourceKind::ResolvedImages, items, config, |image| {
                NodeContent::Resolved(image.clone())
            })
        }
    }
}

fn compose_items<T>(
    stack: &AvatarStack,
    kind: SourceKind,
    items: &[T],
    config: &ItemConfig,
    content: impl Fn(&T) -> NodeContent,
) -> RenderTree {
    if items.is_empty() {
        return RenderTree::empty();
    }

    let arranger = StackArranger::from_config(config);
    let arrangement = arranger.arrange(items);
    let effective_count = arrangement.effective_count();
    let overflow = OverflowCalculator::new(stack.counter_mode(), stack.show_overflow_badge())
        .compute(stack.total_count(), effective_count, config.max_visible);

    // Image references always get a white ring; the configured color is
    // used by every other family and by the badge.
    let avatar_border = Border {
        width: config.border_width,
        color: if kind == SourceKind::Images {
            stack_colors::WHITE
        } else {
            config.border_color
        },
    };
    let badge_border = Border {
        width: config.border_width,
        color: config.border_color,
    };
    let on_image = kind == SourceKind::Images
        && overflow.mode == CounterMode::OnImage
        && overflow.visible;

    let mut nodes = Vec::with_capacity(effective_count + 1);
    let mut width = arrangement.width;

    if overflow.mode == CounterMode::Separate && overflow.visible {
        let circle = Circle::from_left_edge(arranger.offset(effective_count), config.radius);
        width = width.max(circle.right());
        nodes.push(RenderNode::Badge(BadgeNode {
            circle,
            background: stack.background_color(),
            border: badge_border,
            label: TextLabel {
                text: overflow.label(),
                style: *stack.overlay_text_style(),
            },
            value: overflow.value,
        }));
    }

    for placed in arrangement.paint_order() {
        let overlaid = on_image && placed.display_index == 0;
        nodes.push(RenderNode::Avatar(AvatarNode {
            display_index: placed.display_index,
            z_index: placed.z_index,
            circle: placed.circle,
            background: stack.background_color(),
            content: content(placed.item),
            border: avatar_border,
            tint: overlaid.then_some(stack_colors::ON_IMAGE_TINT),
            label: overlaid.then(|| TextLabel {
                text: overflow.label(),
                style: *stack.overlay_text_style(),
            }),
        }));
    }

    tracing::debug!(
        source = %kind,
        items = items.len(),
        effective_count,
        total_count = stack.total_count(),
        counter_mode = overflow.mode.as_str(),
        overflow = overflow.value,
        overflow_visible = overflow.visible,
        "composed avatar stack"
    );

    RenderTree {
        nodes,
        width,
        height: 2.0 * config.radius,
    }
}

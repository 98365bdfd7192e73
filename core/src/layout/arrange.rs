//! Stack arrangement: effective count, fan offsets and draw order

use avatar_stack_types::ItemConfig;

use crate::geometry::Circle;

/// Horizontal step between neighbouring avatars, as a fraction of the radius.
///
/// Avatars are `2 * radius` wide, so each one hides part of the next.
pub const OVERLAP_FACTOR: f32 = 0.8;

/// One item placed in the stack
#[derive(Debug)]
pub struct ArrangedItem<'a, T> {
    pub item: &'a T,
    /// Position in source order, 0 is the first (topmost) avatar
    pub display_index: usize,
    /// Left edge of the avatar's bounding box
    pub offset: f32,
    /// Higher values are drawn above lower ones
    pub z_index: usize,
    pub circle: Circle,
}

/// The rendered subset of a content source, in source order
#[derive(Debug)]
pub struct Arrangement<'a, T> {
    pub items: Vec<ArrangedItem<'a, T>>,
    pub radius: f32,
    /// Extent of the arranged avatars (zero when nothing is arranged)
    pub width: f32,
    pub height: f32,
}

impl<'a, T> Arrangement<'a, T> {
    pub fn effective_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items back to front: the last avatar first, the first avatar last
    pub fn paint_order(&self) -> impl Iterator<Item = &ArrangedItem<'a, T>> {
        self.items.iter().rev()
    }
}

/// Lays out at most `max_visible` items as a right-to-left overlapping fan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackArranger {
    radius: f32,
    max_visible: usize,
}

impl StackArranger {
    pub fn new(radius: f32, max_visible: usize) -> Self {
        Self {
            radius,
            max_visible,
        }
    }

    pub fn from_config(config: &ItemConfig) -> Self {
        Self::new(config.radius, config.max_visible)
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn max_visible(&self) -> usize {
        self.max_visible
    }

    /// Number of avatars actually drawn for `available` items
    pub fn effective_count(&self, available: usize) -> usize {
        self.max_visible.min(available)
    }

    /// Left edge of the avatar at `display_index`
    pub fn offset(&self, display_index: usize) -> f32 {
        if display_index == 0 {
            return 0.0;
        }
        OVERLAP_FACTOR * self.radius * display_index as f32
    }

    /// Arrange the first `effective_count` items in source order
    pub fn arrange<'a, T>(&self, items: &'a [T]) -> Arrangement<'a, T> {
        let count = self.effective_count(items.len());
        if count == 0 {
            return Arrangement {
                items: Vec::new(),
                radius: self.radius,
                width: 0.0,
                height: 0.0,
            };
        }

        let arranged: Vec<_> = if items.len() <= 1 {
            // Single avatar: nothing to fan out
            vec![self.place(&items[0], 0, 0.0, 0)]
        } else {
            items[..count]
                .iter()
                .enumerate()
                .map(|(index, item)| self.place(item, index, self.offset(index), count - 1 - index))
                .collect()
        };

        let last_offset = arranged.last().map_or(0.0, |placed| placed.offset);
        Arrangement {
            items: arranged,
            radius: self.radius,
            width: last_offset + 2.0 * self.radius,
            height: 2.0 * self.radius,
        }
    }

    fn place<'a, T>(
        &self,
        item: &'a T,
        display_index: usize,
        offset: f32,
        z_index: usize,
    ) -> ArrangedItem<'a, T> {
        ArrangedItem {
            item,
            display_index,
            offset,
            z_index,
            circle: Circle::from_left_edge(offset, self.radius),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_count_is_bounded_by_both_limits() {
        let arranger = StackArranger::new(25.0, 3);
        for available in 0..8 {
            let count = arranger.effective_count(available);
            assert_eq!(count, available.min(3));
            assert!(count <= available && count <= 3);
            assert_eq!(arranger.arrange(&vec![(); available]).effective_count(), count);
        }
    }

    #[test]
    fn test_offsets_fan_by_eighty_percent_of_radius() {
        let arranger = StackArranger::new(25.0, 5);
        let items = ["a", "b", "c", "d", "e"];
        let arrangement = arranger.arrange(&items);

        let offsets: Vec<f32> = arrangement.items.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0.0, 20.0, 40.0, 60.0, 80.0]);
        for placed in &arrangement.items {
            assert_eq!(placed.offset, arranger.offset(placed.display_index));
        }
        assert_eq!(arrangement.width, 130.0);
        assert_eq!(arrangement.height, 50.0);
    }

    #[test]
    fn test_source_order_and_z_order() {
        let arranger = StackArranger::new(10.0, 3);
        let items = ["first", "second", "third", "fourth"];
        let arrangement = arranger.arrange(&items);

        let in_order: Vec<&str> = arrangement.items.iter().map(|a| *a.item).collect();
        assert_eq!(in_order, vec!["first", "second", "third"]);

        let z: Vec<usize> = arrangement.items.iter().map(|a| a.z_index).collect();
        assert_eq!(z, vec![2, 1, 0], "first avatar must sit on top");

        let painted: Vec<&str> = arrangement.paint_order().map(|a| *a.item).collect();
        assert_eq!(painted, vec!["third", "second", "first"]);
    }

    #[test]
    fn test_single_and_empty_inputs() {
        let arranger = StackArranger::new(25.0, 3);

        let empty: [u8; 0] = [];
        let arrangement = arranger.arrange(&empty);
        assert!(arrangement.is_empty());
        assert_eq!((arrangement.width, arrangement.height), (0.0, 0.0));

        let arrangement = arranger.arrange(&["only"]);
        assert_eq!(arrangement.effective_count(), 1);
        assert_eq!(arrangement.items[0].offset, 0.0);
        assert_eq!(arrangement.items[0].z_index, 0);
        assert_eq!(arrangement.items[0].circle, Circle::from_left_edge(0.0, 25.0));
    }

    #[test]
    fn test_zero_max_visible_arranges_nothing() {
        let arranger = StackArranger::new(25.0, 0);
        assert!(arranger.arrange(&[1, 2, 3]).is_empty());
    }

    #[test]
    fn test_circles_follow_offsets() {
        let arrangement = StackArranger::new(20.0, 2).arrange(&[1, 2]);
        assert_eq!(arrangement.items[1].circle.left(), 16.0);
        assert_eq!(arrangement.items[1].circle.center.y, 20.0);
    }
}

//! Source selection across the three content slots

use std::sync::Arc;

use avatar_stack_types::ItemConfig;

use super::{ContentSource, ImageRef, Renderable, ResolvedImage, SourceKind};
use crate::error::StackError;

/// The three content slots a stack can be fed from, plus each family's config.
///
/// Resolved images share the image family's config.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceSlots {
    pub images: Vec<ImageRef>,
    pub renderables: Vec<Renderable>,
    pub resolved_images: Vec<Arc<ResolvedImage>>,
    pub image_config: ItemConfig,
    pub widget_config: ItemConfig,
}

impl SourceSlots {
    /// Non-empty slots, highest priority first
    pub fn populated(&self) -> Vec<SourceKind> {
        let mut kinds = Vec::with_capacity(3);
        if !self.images.is_empty() {
            kinds.push(SourceKind::Images);
        }
        if !self.renderables.is_empty() {
            kinds.push(SourceKind::Renderables);
        }
        if !self.resolved_images.is_empty() {
            kinds.push(SourceKind::ResolvedImages);
        }
        kinds
    }

    /// Legacy selection: first non-empty slot in the order
    /// images > renderables > resolved images, silently dropping the rest.
    ///
    /// Returns `None` when every slot is empty.
    pub fn select_by_priority(self) -> Option<ContentSource> {
        let populated = self.populated();
        if populated.len() > 1 {
            tracing::warn!(
                populated = ?populated,
                "multiple content sources populated, keeping the highest priority one"
            );
        }

        match populated.first()? {
            SourceKind::Images => Some(ContentSource::Images {
                items: self.images,
                config: self.image_config,
            }),
            SourceKind::Renderables => Some(ContentSource::Renderables {
                items: self.renderables,
                config: self.widget_config,
            }),
            SourceKind::ResolvedImages => Some(ContentSource::ResolvedImages {
                items: self.resolved_images,
                config: self.image_config,
            }),
        }
    }

    /// Strict selection: at most one slot may be populated and its config
    /// must be usable. Empty slots everywhere yield `Ok(None)`.
    pub fn into_source(self) -> Result<Option<ContentSource>, StackError> {
        let populated = self.populated();
        if populated.len() > 1 {
            return Err(StackError::MultipleSources { active: populated });
        }

        let source = self.select_by_priority();
        if let Some(source) = &source {
            source.validate()?;
        }
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Initials;

    fn images(n: usize) -> Vec<ImageRef> {
        (0..n)
            .map(|i| ImageRef::network(format!("https://example.com/{i}.png")))
            .collect()
    }

    fn renderables(n: usize) -> Vec<Renderable> {
        (0..n)
            .map(|i| Renderable::new(Initials::new(format!("U{i}"), [90, 90, 200, 255])))
            .collect()
    }

    fn resolved(n: usize) -> Vec<Arc<ResolvedImage>> {
        (0..n)
            .filter_map(|_| ResolvedImage::solid(2, 2, [0, 0, 0, 255]).map(Arc::new))
            .collect()
    }

    #[test]
    fn test_all_empty_selects_nothing() {
        assert_eq!(SourceSlots::default().into_source(), Ok(None));
        assert_eq!(SourceSlots::default().select_by_priority(), None);
    }

    #[test]
    fn test_single_slot_keeps_its_family_config() {
        let widget_config = ItemConfig {
            radius: 12.0,
            max_visible: 4,
            ..Default::default()
        };
        let slots = SourceSlots {
            renderables: renderables(2),
            widget_config,
            ..Default::default()
        };

        let source = slots.into_source().expect("valid").expect("one source");
        assert_eq!(source.kind(), SourceKind::Renderables);
        assert_eq!(source.config(), &widget_config);
        assert_eq!(source.len(), 2);
    }

    #[test]
    fn test_resolved_images_use_image_config() {
        let image_config = ItemConfig {
            radius: 30.0,
            ..Default::default()
        };
        let slots = SourceSlots {
            resolved_images: resolved(3),
            image_config,
            ..Default::default()
        };

        let source = slots.into_source().expect("valid").expect("one source");
        assert_eq!(source.kind(), SourceKind::ResolvedImages);
        assert_eq!(source.config().radius, 30.0);
    }

    #[test]
    fn test_priority_order_for_legacy_selection() {
        let slots = SourceSlots {
            images: images(1),
            renderables: renderables(1),
            resolved_images: resolved(1),
            ..Default::default()
        };
        assert_eq!(
            slots.clone().select_by_priority().map(|s| s.kind()),
            Some(SourceKind::Images)
        );

        let slots = SourceSlots {
            images: Vec::new(),
            ..slots
        };
        assert_eq!(
            slots.select_by_priority().map(|s| s.kind()),
            Some(SourceKind::Renderables)
        );
    }

    #[test]
    fn test_strict_selection_rejects_multiple_sources() {
        let slots = SourceSlots {
            renderables: renderables(1),
            resolved_images: resolved(2),
            ..Default::default()
        };

        let err = slots.into_source().expect_err("two sources populated");
        assert_eq!(
            err,
            StackError::MultipleSources {
                active: vec![SourceKind::Renderables, SourceKind::ResolvedImages]
            }
        );
        assert_eq!(
            err.to_string(),
            "more than one content source is populated: renderables, resolved_images"
        );
    }

    #[test]
    fn test_strict_selection_validates_active_config_only() {
        let broken = ItemConfig {
            radius: f32::INFINITY,
            ..Default::default()
        };

        // The widget config is unused when images are active
        let slots = SourceSlots {
            images: images(2),
            widget_config: broken,
            ..Default::default()
        };
        assert!(slots.into_source().is_ok());

        let slots = SourceSlots {
            images: images(2),
            image_config: broken,
            ..Default::default()
        };
        assert!(matches!(
            slots.into_source(),
            Err(StackError::InvalidItemConfig {
                kind: SourceKind::Images,
                field: "radius",
                ..
            })
        ));
    }
}

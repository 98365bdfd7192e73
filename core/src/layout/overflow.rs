//! Overflow count resolution for both counter modes

use avatar_stack_types::CounterMode;

/// What the overflow indicator shows, and whether it is shown at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverflowIndicator {
    pub mode: CounterMode,
    /// `Separate`: `max(0, total - effective)`.
    /// `OnImage`: `total - max_visible`, kept signed and unclamped.
    pub value: i64,
    pub visible: bool,
}

impl OverflowIndicator {
    /// Text drawn inside the badge or over the first avatar
    pub fn label(&self) -> String {
        match self.mode {
            CounterMode::Separate => self.value.to_string(),
            CounterMode::OnImage => format!("+{}", self.value),
        }
    }
}

/// Computes the overflow indicator from the logical total and the rendered count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverflowCalculator {
    pub mode: CounterMode,
    pub show_overflow_badge: bool,
}

impl OverflowCalculator {
    pub fn new(mode: CounterMode, show_overflow_badge: bool) -> Self {
        Self {
            mode,
            show_overflow_badge,
        }
    }

    pub fn compute(
        &self,
        total_count: usize,
        effective_count: usize,
        max_visible: usize,
    ) -> OverflowIndicator {
        match self.mode {
            CounterMode::Separate => {
                let value = signed(total_count)
                    .saturating_sub(signed(effective_count))
                    .max(0);
                OverflowIndicator {
                    mode: self.mode,
                    value,
                    visible: self.show_overflow_badge && value > 0,
                }
            }
            // Counts against the configured maximum, not the rendered count,
            // and is shown whenever anything is rendered.
            CounterMode::OnImage => OverflowIndicator {
                mode: self.mode,
                value: signed(total_count).saturating_sub(signed(max_visible)),
                visible: effective_count > 0,
            },
        }
    }
}

fn signed(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separate_counts_unrendered_items() {
        let calc = OverflowCalculator::new(CounterMode::Separate, true);
        let indicator = calc.compute(10, 3, 3);
        assert_eq!(indicator.value, 7);
        assert!(indicator.visible);
        assert_eq!(indicator.label(), "7");
    }

    #[test]
    fn test_separate_hides_zero_and_clamps_negative() {
        let calc = OverflowCalculator::new(CounterMode::Separate, true);

        let exact = calc.compute(2, 2, 3);
        assert_eq!(exact.value, 0);
        assert!(!exact.visible);

        // Caller supplied more items than the logical total
        let under = calc.compute(1, 3, 3);
        assert_eq!(under.value, 0, "separate overflow is never negative");
        assert!(!under.visible);
    }

    #[test]
    fn test_separate_respects_badge_switch() {
        let calc = OverflowCalculator::new(CounterMode::Separate, false);
        let indicator = calc.compute(10, 3, 3);
        assert_eq!(indicator.value, 7);
        assert!(!indicator.visible);
    }

    #[test]
    fn test_on_image_uses_configured_maximum() {
        let calc = OverflowCalculator::new(CounterMode::OnImage, true);
        // Only 2 rendered out of a configured 5
        let indicator = calc.compute(10, 2, 5);
        assert_eq!(indicator.value, 5);
        assert_eq!(indicator.label(), "+5");
        assert!(indicator.visible);
    }

    #[test]
    fn test_on_image_keeps_zero_and_negative_values() {
        let calc = OverflowCalculator::new(CounterMode::OnImage, false);

        let zero = calc.compute(3, 3, 3);
        assert_eq!(zero.value, 0);
        assert!(zero.visible, "on-image label ignores value and badge switch");

        let negative = calc.compute(2, 2, 3);
        assert_eq!(negative.value, -1);
        assert_eq!(negative.label(), "+-1");
        assert!(negative.visible);
    }

    #[test]
    fn test_on_image_hidden_without_rendered_items() {
        let calc = OverflowCalculator::new(CounterMode::OnImage, true);
        assert!(!calc.compute(10, 0, 3).visible);
    }

    #[test]
    fn test_modes_disagree_when_list_is_short() {
        // 2 items supplied, 5 allowed, 10 in total: the two formulas differ
        let separate = OverflowCalculator::new(CounterMode::Separate, true).compute(10, 2, 5);
        let on_image = OverflowCalculator::new(CounterMode::OnImage, true).compute(10, 2, 5);
        assert_eq!(separate.value, 8);
        assert_eq!(on_image.value, 5);
    }
}

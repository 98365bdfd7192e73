//! Count resolution and placement
//!
//! - [`StackArranger`] picks the rendered subset and fans it out
//! - [`OverflowCalculator`] decides what the overflow indicator says

mod arrange;
mod overflow;

pub use arrange::{ArrangedItem, Arrangement, OVERLAP_FACTOR, StackArranger};
pub use overflow::{OverflowCalculator, OverflowIndicator};

//! A no-op strategy — vehicles never move.

use crate::{DrivingStrategy, StrategyContext, StrategyFactory};

/// A [`DrivingStrategy`] that issues no operations.
///
/// Useful as a placeholder in tests and as the baseline every other strategy
/// should beat.
pub struct NoopStrategy;

impl DrivingStrategy for NoopStrategy {
    fn on_tick(&mut self, _cx: &mut StrategyContext<'_>) {}
}

/// Factory for [`NoopStrategy`].
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopStrategyFactory;

impl StrategyFactory for NoopStrategyFactory {
    fn create(&self) -> Box<dyn DrivingStrategy> {
        Box::new(NoopStrategy)
    }
}

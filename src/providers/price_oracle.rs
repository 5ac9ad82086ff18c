use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Current USD price for a lower-cased token symbol.
    ///
    /// `Ok(None)` means the oracle has no price for this token.
    async fn price_of(&self, symbol: &str) -> Result<Option<f64>>;
}

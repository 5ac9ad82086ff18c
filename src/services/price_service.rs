use std::collections::HashMap;
use std::sync::Arc;
use std::time::{ Duration, Instant };

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::error::{ AppError, Result };
use crate::providers::PriceOracle;

pub const DEFAULT_PRICE_API_BASE: &str = "https://api.binance.com/api/v3";
const CACHE_DURATION: Duration = Duration::from_secs(30);
const MAX_RETRIES: u32 = 3;
const STABLECOINS: &[&str] = &["usdt", "usdc", "dai", "busd", "fdusd"];

#[derive(Deserialize)]
struct TickerPrice {
    price: String,
}

#[derive(Debug, Clone, Copy)]
struct CachedPrice {
    usd_price: f64,
    fetched_at: Instant,
}

/// USD spot prices from the Binance public ticker, quoted against USDT.
pub struct PriceService {
    client: reqwest::Client,
    base_url: String,
    cache: Arc<RwLock<HashMap<String, CachedPrice>>>,
}

impl PriceService {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client
            ::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    async fn get_from_cache(&self, symbol: &str) -> Option<f64> {
        let cache = self.cache.read().await;
        cache
            .get(symbol)
            .filter(|cached| cached.fetched_at.elapsed() < CACHE_DURATION)
            .map(|cached| cached.usd_price)
    }

    async fn update_cache(&self, symbol: &str, usd_price: f64) {
        let mut cache = self.cache.write().await;
        cache.insert(symbol.to_string(), CachedPrice {
            usd_price,
            fetched_at: Instant::now(),
        });
    }

    /// GET with backoff on 429. `Ok(None)` when Binance rejects the pair.
    async fn fetch_with_retry(&self, url: &str) -> Result<Option<reqwest::Response>> {
        for attempt in 0..MAX_RETRIES {
            let response = self.client
                .get(url)
                .send().await
                .map_err(|e| AppError::External(format!("Price API error: {}", e)))?;

            let status = response.status();
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let wait_secs = 2u64.pow(attempt + 1);
                tracing::warn!("Price API rate limited, retrying in {}s", wait_secs);
                tokio::time::sleep(Duration::from_secs(wait_secs)).await;
                continue;
            }

            // Binance answers 400 "Invalid symbol" for pairs it does not list.
            if status == reqwest::StatusCode::BAD_REQUEST {
                return Ok(None);
            }

            if !status.is_success() {
                return Err(AppError::External(format!("Price API returned status: {}", status)));
            }

            return Ok(Some(response));
        }

        Err(AppError::External("Price API still rate limited after retries".to_string()))
    }

    async fn fetch_price(&self, pair: &str) -> Result<Option<f64>> {
        let url = format!("{}/ticker/price?symbol={}", self.base_url, urlencoding::encode(pair));

        let response = match self.fetch_with_retry(&url).await? {
            Some(response) => response,
            None => {
                return Ok(None);
            }
        };

        let ticker: TickerPrice = response
            .json().await
            .map_err(|e| AppError::External(format!("Failed to parse price response: {}", e)))?;

        let price = ticker.price
            .parse::<f64>()
            .map_err(|_| AppError::External(format!("Invalid price for {}: {}", pair, ticker.price)))?;

        Ok(Some(price))
    }
}

#[async_trait]
impl PriceOracle for PriceService {
    async fn price_of(&self, symbol: &str) -> Result<Option<f64>> {
        let symbol = symbol.trim().to_lowercase();

        if STABLECOINS.contains(&symbol.as_str()) {
            return Ok(Some(1.0));
        }

        if let Some(price) = self.get_from_cache(&symbol).await {
            return Ok(Some(price));
        }

        let pair = match symbol_to_pair(&symbol) {
            Some(pair) => pair,
            None => {
                return Ok(None);
            }
        };

        let price = self.fetch_price(&pair).await?;
        if let Some(price) = price {
            self.update_cache(&symbol, price).await;
        }

        Ok(price)
    }
}

/// Map a lower-cased token symbol to a Binance USDT pair.
/// Wrapped tokens resolve to their underlying asset.
fn symbol_to_pair(symbol: &str) -> Option<String> {
    if symbol.is_empty() || !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    let base = match symbol {
        "weth" | "steth" | "reth" | "cbeth" => "ETH",
        "wbtc" | "cbbtc" | "tbtc" => "BTC",
        "wbnb" => "BNB",
        "wsol" | "msol" | "jitosol" => "SOL",
        "wmatic" | "pol" => "POL",
        "wavax" => "AVAX",
        "rndr" => "RENDER",
        other => {
            return Some(format!("{}USDT", other.to_uppercase()));
        }
    };

    Some(format!("{}USDT", base))
}

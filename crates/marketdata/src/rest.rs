use async_trait::async_trait;
use serde::Deserialize;
use structure::candle::{Candle, Timeframe};
use trade_core::types::{Price, Qty, TimestampMs};

use crate::error::MarketDataError;
use crate::source::BarSource;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

// the chart endpoint refuses requests without a browser-ish agent
const USER_AGENT: &str = "Mozilla/5.0 (compatible; forecast-signals/0.1)";

/// Client for the public Yahoo Finance chart endpoint
#[derive(Clone)]
pub struct YahooChart {
    client: reqwest::Client,
    base: String,
}

impl YahooChart {
    pub fn new(base: impl Into<String>) -> Result<Self, MarketDataError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            base: base.into().trim_end_matches('/').to_string(),
        })
    }

    pub async fn get_chart(
        &self,
        symbol: &str,
        range: &str,    // "1d", "7d", "16d"...
        interval: &str, // "1m", "1h", "1d"
    ) -> Result<Vec<Candle>, MarketDataError> {
        let url = format!("{}/v8/finance/chart/{}", self.base, symbol);

        let resp = self
            .client
            .get(url)
            .query(&[("range", range), ("interval", interval)])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        // unknown symbols come back as 404 with a chart.error body
        match parse_chart(&body) {
            Err(MarketDataError::Malformed(_)) if !status.is_success() => {
                Err(MarketDataError::Status(status.as_u16()))
            }
            other => other,
        }
    }
}

#[async_trait]
impl BarSource for YahooChart {
    async fn fetch_bars(
        &self,
        symbol: &str,
        days: u32,
        interval: Timeframe,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let range = format!("{}d", days.max(1));
        self.get_chart(symbol, &range, interval.as_interval()).await
    }
}

#[derive(Debug, Deserialize)]
struct ChartResp {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Decodes a chart payload into candles, oldest first.
///
/// Rows with a missing OHLC value are dropped (halted or not yet printed minutes),
/// a missing volume counts as zero.
pub fn parse_chart(body: &str) -> Result<Vec<Candle>, MarketDataError> {
    let resp: ChartResp =
        serde_json::from_str(body).map_err(|e| MarketDataError::Malformed(e.to_string()))?;

    if let Some(err) = resp.chart.error {
        return Err(MarketDataError::Rejected {
            code: err.code,
            description: err.description,
        });
    }

    let Some(result) = resp.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let at = |col: &Vec<Option<f64>>, i: usize| col.get(i).copied().flatten();

    let mut out = Vec::with_capacity(result.timestamp.len());
    for (i, &ts_sec) in result.timestamp.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close)) = (
            at(&quote.open, i),
            at(&quote.high, i),
            at(&quote.low, i),
            at(&quote.close, i),
        ) else {
            continue;
        };
        let Some(ts_ms) = ts_sec.checked_mul(1000) else {
            continue;
        };

        out.push(Candle {
            ts: TimestampMs(ts_ms),
            open: Price(open),
            high: Price(high),
            low: Price(low),
            close: Price(close),
            volume: Qty(at(&quote.volume, i).unwrap_or(0.0)),
        });
    }

    out.sort_by_key(|c| c.ts);
    out.dedup_by_key(|c| c.ts);

    Ok(out)
}

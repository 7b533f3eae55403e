/*
[INPUT]:  Symbol identifiers and market filters
[OUTPUT]: Market data (symbols, level-1 ticker, 24h stats, all tickers, markets)
[POS]:    HTTP layer - public market data endpoints (no auth required)
[UPDATE]: When adding new public endpoints or changing response format
*/

use crate::http::{KucoinClient, Result};
use crate::types::{AllTickersResponse, SymbolResponse, SymbolTickResponse, TickerResponse};
use reqwest::Method;

impl KucoinClient {
    /// List symbols using the legacy route
    ///
    /// GET /api/v1/symbols
    #[deprecated(note = "the exchange keeps this route for compatibility; prefer get_symbols")]
    pub async fn get_symbols_v1(&self) -> Result<Vec<SymbolResponse>> {
        let builder = self.public_request(Method::GET, "/api/v1/symbols", &[])?;
        self.send_json(builder).await
    }

    /// List symbols, optionally restricted to one market (e.g. "BTC", "USDS")
    ///
    /// GET /api/v2/symbols?market={market}
    pub async fn get_symbols(&self, market: Option<&str>) -> Result<Vec<SymbolResponse>> {
        let query: Vec<(&str, String)> = market
            .map(|market| vec![("market", market.to_string())])
            .unwrap_or_default();
        let builder = self.public_request(Method::GET, "/api/v2/symbols", &query)?;
        self.send_json(builder).await
    }

    /// Level-1 best bid/ask for a symbol
    ///
    /// GET /api/v1/market/orderbook/level1?symbol={symbol}
    pub async fn get_ticker(&self, symbol: &str) -> Result<TickerResponse> {
        let builder = self.public_request(
            Method::GET,
            "/api/v1/market/orderbook/level1",
            &[("symbol", symbol.to_string())],
        )?;
        self.send_json(builder).await
    }

    /// 24h statistics for a symbol
    ///
    /// GET /api/v1/market/stats?symbol={symbol}
    pub async fn get_market_stats(&self, symbol: &str) -> Result<SymbolTickResponse> {
        let builder = self.public_request(
            Method::GET,
            "/api/v1/market/stats",
            &[("symbol", symbol.to_string())],
        )?;
        self.send_json(builder).await
    }

    /// Snapshot of every ticker
    ///
    /// GET /api/v1/market/allTickers
    pub async fn get_all_tickers(&self) -> Result<AllTickersResponse> {
        let builder = self.public_request(Method::GET, "/api/v1/market/allTickers", &[])?;
        self.send_json(builder).await
    }

    /// Names of the trading markets
    ///
    /// GET /api/v1/markets
    pub async fn get_market_list(&self) -> Result<Vec<String>> {
        let builder = self.public_request(Method::GET, "/api/v1/markets", &[])?;
        self.send_json(builder).await
    }

    /// Exchange server time in milliseconds
    ///
    /// GET /api/v1/timestamp
    pub async fn get_server_time(&self) -> Result<i64> {
        let builder = self.public_request(Method::GET, "/api/v1/timestamp", &[])?;
        self.send_json(builder).await
    }
}

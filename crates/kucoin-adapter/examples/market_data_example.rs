/*
[INPUT]:  Symbol identifier (e.g., "ETH-BTC")
[OUTPUT]: Market data (symbols, ticker, 24h stats, server time)
[POS]:    Examples - public market data queries
[UPDATE]: When adding new market data endpoints
*/

use kucoin_adapter::*;

/// Example: Query market data (no authentication required)
#[tokio::main]
async fn main() {
    println!("=== KuCoin Market Data Example ===\n");

    let client = match KucoinClient::new() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };
    println!("✓ HTTP client created (no auth required for public endpoints)\n");

    let symbol = "ETH-BTC";

    match client.get_server_time().await {
        Ok(time) => println!("✓ Server time: {time}"),
        Err(e) => println!("✗ Error: {e}"),
    }

    println!("\nQuerying BTC market symbols...");
    match client.get_symbols(Some("BTC")).await {
        Ok(symbols) => {
            println!("✓ {} symbols", symbols.len());
            for info in symbols.iter().take(5) {
                println!("  {} tick={} min={}", info.symbol, info.price_increment, info.base_min_size);
            }
        }
        Err(e) => println!("✗ Error: {e}"),
    }

    println!("\nQuerying ticker for {symbol}...");
    match client.get_ticker(symbol).await {
        Ok(ticker) => println!("✓ Ticker: {ticker:?}"),
        Err(e) => println!("✗ Error: {e}"),
    }

    println!("\nQuerying 24h stats for {symbol}...");
    match client.get_market_stats(symbol).await {
        Ok(stats) => println!("✓ Stats: {stats:?}"),
        Err(e) => println!("✗ Error: {e}"),
    }

    println!("\n✓ Market data example complete");
}

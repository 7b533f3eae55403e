/*
[INPUT]:  Parsed subcommand, configured REST client, shutdown token
[OUTPUT]: Rendered market/account reports, streamed private events
[POS]:    Command layer - maps CLI subcommands onto adapter calls
[UPDATE]: When adding subcommands or changing report formats
*/

use std::fmt::Write as _;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use kucoin_adapter::{
    AccountBalancesResponse, AllTickersResponse, KucoinClient, KucoinPrivateWebSocket,
    OrderResponse, SymbolResponse, SymbolTickResponse, TickerResponse, WsConfig,
};
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List tradable symbols
    Symbols {
        /// Restrict to one market (e.g. BTC, USDS)
        #[arg(long)]
        market: Option<String>,
        /// Use the legacy v1 route
        #[arg(long)]
        legacy: bool,
    },
    /// Level-1 ticker for a symbol
    Ticker { symbol: String },
    /// 24h statistics for a symbol
    Stats { symbol: String },
    /// Snapshot of every ticker
    AllTickers {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Trading market names
    Markets,
    /// Exchange server time
    Time,
    /// Account balances (requires credentials)
    Accounts {
        #[arg(long)]
        currency: Option<String>,
    },
    /// Orders from the last 24 hours (requires credentials)
    RecentOrders,
    /// Stream private order, stop order and balance events
    Watch {
        /// Symbols to filter order events by; empty means all
        symbols: Vec<String>,
        /// Stop after this many seconds instead of waiting for a signal
        #[arg(long)]
        duration_secs: Option<u64>,
    },
    /// Round-trip a ping over the private WebSocket
    Ping {
        #[arg(default_value = "12345")]
        id: String,
    },
}

impl Command {
    pub fn needs_credentials(&self) -> bool {
        matches!(
            self,
            Command::Accounts { .. } | Command::RecentOrders | Command::Watch { .. } | Command::Ping { .. }
        )
    }
}

/// Execute a subcommand, printing its output to stdout
pub async fn run(
    command: &Command,
    client: &KucoinClient,
    ws_config: WsConfig,
    shutdown: CancellationToken,
) -> Result<()> {
    if command.needs_credentials() && client.credentials().is_none() {
        bail!("command requires credentials (config file or KUCOIN_API_* environment)");
    }

    match command {
        Command::Watch {
            symbols,
            duration_secs,
        } => watch(client, ws_config, symbols, *duration_secs, shutdown).await,
        Command::Ping { id } => {
            let ws = KucoinPrivateWebSocket::from_client(client, ws_config)
                .await
                .context("connect private websocket")?;
            let outcome = ws.ping(id).await.context("ping")?;
            println!("{outcome:?}");
            ws.close().await.context("close websocket")?;
            Ok(())
        }
        rest => {
            let output = report(rest, client).await?;
            print!("{output}");
            Ok(())
        }
    }
}

/// Fetch and render a REST subcommand
pub async fn report(command: &Command, client: &KucoinClient) -> Result<String> {
    match command {
        Command::Symbols { market, legacy } => {
            let symbols = if *legacy {
                #[allow(deprecated)]
                let symbols = client.get_symbols_v1().await;
                symbols
            } else {
                client.get_symbols(market.as_deref()).await
            };
            render_symbols(&symbols.context("fetch symbols")?)
        }
        Command::Ticker { symbol } => {
            let ticker = client.get_ticker(symbol).await.context("fetch ticker")?;
            render_ticker(symbol, &ticker)
        }
        Command::Stats { symbol } => {
            let stats = client.get_market_stats(symbol).await.context("fetch 24h stats")?;
            render_stats(&stats)
        }
        Command::AllTickers { limit } => {
            let tickers = client.get_all_tickers().await.context("fetch all tickers")?;
            render_all_tickers(&tickers, *limit)
        }
        Command::Markets => {
            let markets = client.get_market_list().await.context("fetch markets")?;
            Ok(format!("{}\n", markets.join(" ")))
        }
        Command::Time => {
            let time = client.get_server_time().await.context("fetch server time")?;
            Ok(format!("{time}\n"))
        }
        Command::Accounts { currency } => {
            let accounts = client
                .list_accounts(currency.as_deref(), None)
                .await
                .context("fetch accounts")?;
            render_accounts(&accounts)
        }
        Command::RecentOrders => {
            let orders = client.list_recent_orders().await.context("fetch recent orders")?;
            render_orders(&orders)
        }
        Command::Watch { .. } | Command::Ping { .. } => {
            bail!("{command:?} is a websocket command")
        }
    }
}

async fn watch(
    client: &KucoinClient,
    ws_config: WsConfig,
    symbols: &[String],
    duration_secs: Option<u64>,
    shutdown: CancellationToken,
) -> Result<()> {
    let ws = KucoinPrivateWebSocket::from_client(client, ws_config)
        .await
        .context("connect private websocket")?;
    let filter: Vec<&str> = symbols.iter().map(String::as_str).collect();

    ws.on_order_change(&filter, |event| {
        let order = &event.data;
        println!(
            "order   {} {} {:?} status={} price={} filled={}",
            order.symbol,
            order.order_id,
            order.change_type,
            order.status.as_deref().unwrap_or("-"),
            opt(order.price),
            opt(order.filled_size),
        );
    })
    .context("subscribe order changes")?;
    ws.on_advanced_order(&filter, |event| {
        let order = &event.data;
        println!(
            "stop    {} {} {:?} stop_price={}",
            order.symbol,
            order.order_id,
            order.event_type,
            opt(order.stop_price),
        );
    })
    .context("subscribe stop orders")?;
    ws.on_account_balance(|event| {
        let balance = &event.data;
        println!(
            "balance {} available={} hold={} ({})",
            balance.currency,
            opt(balance.available),
            opt(balance.hold),
            balance.relation_event.as_deref().unwrap_or("-"),
        );
    })
    .context("subscribe balances")?;
    info!(symbols = ?symbols, "watching private channels");

    let mut states = ws.state_changes();
    let deadline = async {
        match duration_secs {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::select! {
        _ = shutdown.cancelled() => info!("shutdown requested"),
        _ = deadline => info!("watch duration elapsed"),
        _ = states.wait_for(|state| *state == kucoin_adapter::ConnectionState::Closed) => {
            warn!("private websocket closed by server");
        }
    }

    ws.close().await.context("close websocket")?;
    Ok(())
}

fn opt(value: Option<Decimal>) -> String {
    value.map_or_else(|| "-".to_string(), |value| value.to_string())
}

pub fn render_symbols(symbols: &[SymbolResponse]) -> Result<String> {
    let mut out = String::new();
    for symbol in symbols {
        writeln!(
            out,
            "{:<14} tick={} lot={} min={} trading={}",
            symbol.symbol,
            symbol.price_increment,
            symbol.base_increment,
            symbol.base_min_size,
            symbol.enable_trading
        )?;
    }
    writeln!(out, "{} symbols", symbols.len())?;
    Ok(out)
}

pub fn render_ticker(symbol: &str, ticker: &TickerResponse) -> Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "{symbol} last={} bid={} ({}) ask={} ({}) seq={}",
        opt(ticker.price),
        opt(ticker.best_bid),
        opt(ticker.best_bid_size),
        opt(ticker.best_ask),
        opt(ticker.best_ask_size),
        ticker.sequence
    )?;
    Ok(out)
}

pub fn render_stats(stats: &SymbolTickResponse) -> Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "{} last={} high={} low={} vol={} change={}",
        stats.symbol,
        opt(stats.last),
        opt(stats.high),
        opt(stats.low),
        opt(stats.vol),
        opt(stats.change_rate)
    )?;
    Ok(out)
}

pub fn render_all_tickers(tickers: &AllTickersResponse, limit: usize) -> Result<String> {
    let mut out = String::new();
    for item in tickers.ticker.iter().take(limit) {
        writeln!(out, "{:<14} last={} vol={}", item.symbol, opt(item.last), opt(item.vol))?;
    }
    writeln!(out, "{} tickers at {}", tickers.ticker.len(), tickers.time)?;
    Ok(out)
}

pub fn render_accounts(accounts: &[AccountBalancesResponse]) -> Result<String> {
    let mut out = String::new();
    for account in accounts {
        writeln!(
            out,
            "{:<8} {:<8} balance={} available={} holds={}",
            account.currency,
            account.account_type.as_str(),
            account.balance,
            account.available,
            account.holds
        )?;
    }
    Ok(out)
}

pub fn render_orders(orders: &[OrderResponse]) -> Result<String> {
    let mut out = String::new();
    for order in orders {
        writeln!(
            out,
            "{} {:<10} {} {} price={} size={} dealt={} active={}",
            order.id,
            order.symbol,
            order.side.as_str(),
            order.order_type.as_str(),
            order.price,
            order.size,
            order.deal_size,
            order.is_active
        )?;
    }
    Ok(out)
}

/*
[INPUT]:  KUCOIN_API_* credentials
[OUTPUT]: Real-time order and balance updates printed to stdout
[POS]:    Examples - private WebSocket stream handling
[UPDATE]: When WebSocket API changes
*/

use kucoin_adapter::*;
use tokio::time::{Duration, sleep};

/// Example: private order and balance streams
///
/// Connects through `bullet-private`, subscribes to order changes for
/// ETH-BTC and to balance changes, then listens for 30 seconds.
#[tokio::main]
async fn main() {
    println!("=== KuCoin Private WebSocket Example ===\n");

    let client = match Credentials::from_env()
        .and_then(|credentials| Ok(KucoinClient::new()?.with_credentials(credentials)))
    {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };

    let ws = match KucoinPrivateWebSocket::from_client(&client, WsConfig::default()).await {
        Ok(ws) => ws,
        Err(e) => {
            eprintln!("Failed to connect: {}", e);
            return;
        }
    };
    println!("✓ Connected ({:?})", ws.state());

    match ws.ping("12345").await {
        Ok(outcome) => println!("✓ Ping: {:?}", outcome),
        Err(e) => println!("✗ Ping failed: {}", e),
    }

    let subscribed = ws
        .on_order_change(&["ETH-BTC"], |event| {
            println!(
                "order {} {:?} {:?} filled={:?}",
                event.data.order_id, event.data.change_type, event.data.status, event.data.filled_size
            );
        })
        .and_then(|_| {
            ws.on_account_balance(|event| {
                println!(
                    "balance {} available={:?} ({:?})",
                    event.data.currency, event.data.available, event.data.relation_event
                );
            })
        });
    if let Err(e) = subscribed {
        eprintln!("Subscribe failed: {}", e);
        return;
    }
    println!("✓ Subscribed, listening for 30 seconds...\n");

    sleep(Duration::from_secs(30)).await;

    if let Err(e) = ws.close().await {
        eprintln!("Close failed: {}", e);
    }
    println!("\n✓ WebSocket example complete");
}

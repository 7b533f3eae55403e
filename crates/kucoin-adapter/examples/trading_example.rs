/*
[INPUT]:  KUCOIN_API_* credentials and order parameters
[OUTPUT]: Order creation/cancellation confirmations
[POS]:    Examples - trading operations
[UPDATE]: When trading API changes
*/

use kucoin_adapter::*;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Example: place a far-from-market limit order on the sandbox and cancel it
///
/// Requires `KUCOIN_API_KEY`, `KUCOIN_API_SECRET` and `KUCOIN_API_PASSPHRASE`.
#[tokio::main]
async fn main() {
    println!("=== KuCoin Trading Example (sandbox) ===\n");

    let credentials = match Credentials::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Credentials unavailable: {}", e);
            return;
        }
    };

    let config = ClientConfig {
        environment: Environment::Sandbox,
        ..ClientConfig::default()
    };
    let client = match KucoinClient::with_config(config) {
        Ok(c) => c.with_credentials(credentials),
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };
    println!("✓ HTTP client created");

    let price = Decimal::from_str("0.000001").unwrap_or_default();
    let order = OrderCreateRequest::limit("ETH-BTC", Side::Buy, price, Decimal::ONE);
    println!("\nPlacing order: {:?}", order);

    let created = match client.create_order(&order).await {
        Ok(created) => {
            println!("✓ Order created: {}", created.order_id);
            created
        }
        Err(e) => {
            println!("✗ Error: {}", e);
            return;
        }
    };

    match client.get_order(&created.order_id).await {
        Ok(details) => println!("✓ Order details: {:?}", details),
        Err(e) => println!("✗ Error: {}", e),
    }

    match client.cancel_order(&created.order_id).await {
        Ok(cancelled) => println!("✓ Cancelled: {:?}", cancelled.cancelled_order_ids),
        Err(e) => println!("✗ Error: {}", e),
    }

    println!("\n✓ Trading example complete");
}

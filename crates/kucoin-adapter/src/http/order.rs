/*
[INPUT]:  Order requests and identifiers, signed with account credentials
[OUTPUT]: Order ids, cancellation results, order details and listings
[POS]:    HTTP layer - order endpoints (require auth)
[UPDATE]: When adding new trading endpoints or changing order flow
*/

use crate::http::{KucoinClient, Result};
use crate::types::{
    OrderCancelByClientOidResponse, OrderCancelResponse, OrderCreateRequest, OrderCreateResponse,
    OrderListQuery, OrderResponse, Pagination, TradeType,
};
use reqwest::Method;
use tracing::info;

impl KucoinClient {
    /// Place a new order
    ///
    /// POST /api/v1/orders
    pub async fn create_order(&self, req: &OrderCreateRequest) -> Result<OrderCreateResponse> {
        let builder = self.private_request(Method::POST, "/api/v1/orders", &[], Some(req))?;
        let response: OrderCreateResponse = self.send_json(builder).await?;
        info!(
            symbol = %req.symbol,
            side = req.side.as_str(),
            client_oid = %req.client_oid,
            order_id = %response.order_id,
            "order created"
        );
        Ok(response)
    }

    /// Cancel an order by exchange id. An empty payload counts as success.
    ///
    /// DELETE /api/v1/orders/{orderId}
    pub async fn cancel_order(&self, order_id: &str) -> Result<OrderCancelResponse> {
        let builder = self.private_resource_request(Method::DELETE, "/api/v1/orders", order_id)?;
        let response = self.send_optional(builder).await?.unwrap_or_default();
        info!(order_id, "order cancel requested");
        Ok(response)
    }

    /// Cancel an order by the client-supplied id
    ///
    /// DELETE /api/v1/order/client-order/{clientOid}
    pub async fn cancel_order_by_client_oid(
        &self,
        client_oid: &str,
    ) -> Result<OrderCancelByClientOidResponse> {
        let builder = self.private_resource_request(
            Method::DELETE,
            "/api/v1/order/client-order",
            client_oid,
        )?;
        self.send_json(builder).await
    }

    /// Cancel every open order, optionally for one symbol / trade type
    ///
    /// DELETE /api/v1/orders?symbol={symbol}&tradeType={tradeType}
    pub async fn cancel_all_orders(
        &self,
        symbol: Option<&str>,
        trade_type: Option<TradeType>,
    ) -> Result<OrderCancelResponse> {
        let mut query = Vec::new();
        if let Some(symbol) = symbol {
            query.push(("symbol", symbol.to_string()));
        }
        if let Some(trade_type) = trade_type {
            query.push(("tradeType", trade_type.as_str().to_string()));
        }
        let builder = self.private_request::<()>(Method::DELETE, "/api/v1/orders", &query, None)?;
        Ok(self.send_optional(builder).await?.unwrap_or_default())
    }

    /// Fetch a single order
    ///
    /// GET /api/v1/orders/{orderId}
    pub async fn get_order(&self, order_id: &str) -> Result<OrderResponse> {
        let builder = self.private_resource_request(Method::GET, "/api/v1/orders", order_id)?;
        self.send_json(builder).await
    }

    /// Paginated order listing
    ///
    /// GET /api/v1/orders
    pub async fn list_orders(&self, query: &OrderListQuery) -> Result<Pagination<OrderResponse>> {
        let builder =
            self.private_request::<()>(Method::GET, "/api/v1/orders", &query.query_pairs(), None)?;
        self.send_json(builder).await
    }

    /// Orders completed in the last 24 hours
    ///
    /// GET /api/v1/limit/orders
    pub async fn list_recent_orders(&self) -> Result<Vec<OrderResponse>> {
        let builder = self.private_request::<()>(Method::GET, "/api/v1/limit/orders", &[], None)?;
        self.send_json(builder).await
    }
}

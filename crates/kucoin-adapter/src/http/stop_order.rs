/*
[INPUT]:  Stop order requests, identifiers and listing filters
[OUTPUT]: Stop order ids, cancellation results and stop order details
[POS]:    HTTP layer - stop order endpoints (require auth)
[UPDATE]: When stop order routes or payloads change
*/

use crate::http::{KucoinClient, Result};
use crate::types::{
    OrderCancelResponse, OrderCreateResponse, Pagination, StopOrderCreateRequest,
    StopOrderListQuery, StopOrderResponse, TradeType,
};
use reqwest::Method;
use tracing::info;

impl KucoinClient {
    /// POST /api/v1/stop-order
    pub async fn create_stop_order(
        &self,
        req: &StopOrderCreateRequest,
    ) -> Result<OrderCreateResponse> {
        let builder = self.private_request(Method::POST, "/api/v1/stop-order", &[], Some(req))?;
        let response: OrderCreateResponse = self.send_json(builder).await?;
        info!(
            symbol = %req.symbol,
            stop_price = %req.stop_price,
            order_id = %response.order_id,
            "stop order created"
        );
        Ok(response)
    }

    /// DELETE /api/v1/stop-order/{orderId}
    pub async fn cancel_stop_order(&self, order_id: &str) -> Result<OrderCancelResponse> {
        let builder =
            self.private_resource_request(Method::DELETE, "/api/v1/stop-order", order_id)?;
        Ok(self.send_optional(builder).await?.unwrap_or_default())
    }

    /// Batch cancel. `order_ids` is joined with commas on the wire.
    ///
    /// DELETE /api/v1/stop-order/cancel
    pub async fn cancel_stop_orders(
        &self,
        symbol: Option<&str>,
        trade_type: Option<TradeType>,
        order_ids: &[&str],
    ) -> Result<OrderCancelResponse> {
        let mut query = Vec::new();
        if let Some(symbol) = symbol {
            query.push(("symbol", symbol.to_string()));
        }
        if let Some(trade_type) = trade_type {
            query.push(("tradeType", trade_type.as_str().to_string()));
        }
        if !order_ids.is_empty() {
            query.push(("orderIds", order_ids.join(",")));
        }
        let builder =
            self.private_request::<()>(Method::DELETE, "/api/v1/stop-order/cancel", &query, None)?;
        Ok(self.send_optional(builder).await?.unwrap_or_default())
    }

    /// GET /api/v1/stop-order/{orderId}
    pub async fn get_stop_order(&self, order_id: &str) -> Result<StopOrderResponse> {
        let builder = self.private_resource_request(Method::GET, "/api/v1/stop-order", order_id)?;
        self.send_json(builder).await
    }

    /// The exchange answers with a list even though a client oid is unique
    /// per open order.
    ///
    /// GET /api/v1/stop-order/queryOrderByClientOid
    pub async fn get_stop_order_by_client_oid(
        &self,
        client_oid: &str,
        symbol: Option<&str>,
    ) -> Result<Vec<StopOrderResponse>> {
        let mut query = vec![("clientOid", client_oid.to_string())];
        if let Some(symbol) = symbol {
            query.push(("symbol", symbol.to_string()));
        }
        let builder = self.private_request::<()>(
            Method::GET,
            "/api/v1/stop-order/queryOrderByClientOid",
            &query,
            None,
        )?;
        Ok(self.send_optional(builder).await?.unwrap_or_default())
    }

    /// GET /api/v1/stop-order
    pub async fn list_stop_orders(
        &self,
        query: &StopOrderListQuery,
    ) -> Result<Pagination<StopOrderResponse>> {
        let builder = self.private_request::<()>(
            Method::GET,
            "/api/v1/stop-order",
            &query.query_pairs(),
            None,
        )?;
        self.send_json(builder).await
    }
}

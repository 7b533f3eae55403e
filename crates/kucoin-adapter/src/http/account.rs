/*
[INPUT]:  Account filters, transfer requests and credentials
[OUTPUT]: Account balances, created account ids, transfer order ids
[POS]:    HTTP layer - account endpoints (require auth)
[UPDATE]: When adding account or funding endpoints
*/

use crate::http::{KucoinClient, Result};
use crate::types::{
    AccountBalanceResponse, AccountBalancesResponse, AccountCreateRequest, AccountCreateResponse,
    AccountType, InnerTransferRequest, InnerTransferResponse, LegacyInnerTransferRequest,
};
use reqwest::Method;
use tracing::info;

impl KucoinClient {
    /// List accounts, optionally narrowed by currency and account type
    ///
    /// GET /api/v1/accounts
    pub async fn list_accounts(
        &self,
        currency: Option<&str>,
        account_type: Option<AccountType>,
    ) -> Result<Vec<AccountBalancesResponse>> {
        let mut query = Vec::new();
        if let Some(currency) = currency {
            query.push(("currency", currency.to_string()));
        }
        if let Some(account_type) = account_type {
            query.push(("type", account_type.as_str().to_string()));
        }
        let builder = self.private_request::<()>(Method::GET, "/api/v1/accounts", &query, None)?;
        self.send_json(builder).await
    }

    /// GET /api/v1/accounts/{accountId}
    pub async fn get_account(&self, account_id: &str) -> Result<AccountBalanceResponse> {
        let builder = self.private_resource_request(Method::GET, "/api/v1/accounts", account_id)?;
        self.send_json(builder).await
    }

    /// POST /api/v1/accounts
    pub async fn create_account(&self, req: &AccountCreateRequest) -> Result<AccountCreateResponse> {
        let builder = self.private_request(Method::POST, "/api/v1/accounts", &[], Some(req))?;
        let response: AccountCreateResponse = self.send_json(builder).await?;
        info!(
            currency = %req.currency,
            account_type = req.account_type.as_str(),
            account_id = %response.id,
            "account created"
        );
        Ok(response)
    }

    /// Transfer between accounts addressed by id
    ///
    /// POST /api/v1/accounts/inner-transfer
    #[deprecated(note = "use inner_transfer, which addresses accounts by type")]
    pub async fn inner_transfer_v1(
        &self,
        req: &LegacyInnerTransferRequest,
    ) -> Result<InnerTransferResponse> {
        let builder = self.private_request(
            Method::POST,
            "/api/v1/accounts/inner-transfer",
            &[],
            Some(req),
        )?;
        self.send_json(builder).await
    }

    /// Transfer between account types of the same user
    ///
    /// POST /api/v2/accounts/inner-transfer
    pub async fn inner_transfer(&self, req: &InnerTransferRequest) -> Result<InnerTransferResponse> {
        let builder = self.private_request(
            Method::POST,
            "/api/v2/accounts/inner-transfer",
            &[],
            Some(req),
        )?;
        let response: InnerTransferResponse = self.send_json(builder).await?;
        info!(
            currency = %req.currency,
            from = req.from.as_str(),
            to = req.to.as_str(),
            amount = %req.amount,
            order_id = %response.order_id,
            "inner transfer submitted"
        );
        Ok(response)
    }
}

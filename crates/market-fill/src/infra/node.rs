use {
    crate::simulator::{AccountResolving, Call, CallDispatching},
    alloy::{
        primitives::{Address, Bytes, TxKind, U256},
        providers::{DynProvider, Provider, ProviderBuilder},
        rpc::types::{TransactionInput, TransactionRequest},
    },
    anyhow::{Context, Result},
    url::Url,
};

/// An Ethereum node reachable over JSON-RPC. Calls and estimates run against
/// the latest block.
#[derive(Clone)]
pub struct Node {
    provider: DynProvider,
    account: Option<Address>,
}

impl Node {
    /// Connects to the node at `url`. Calls are sent from `account`, or from
    /// the first account the node manages if none is given.
    pub fn new(url: &Url, account: Option<Address>) -> Self {
        let provider = ProviderBuilder::new()
            .connect_http(url.clone())
            .erased();
        Self::with_provider(provider, account)
    }

    pub fn with_provider(provider: DynProvider, account: Option<Address>) -> Self {
        Self { provider, account }
    }
}

fn request(call: Call) -> TransactionRequest {
    TransactionRequest {
        from: Some(call.from),
        to: Some(TxKind::Call(call.to)),
        input: TransactionInput::new(call.data),
        ..Default::default()
    }
}

#[async_trait::async_trait]
impl AccountResolving for Node {
    async fn account(&self) -> Result<Address> {
        if let Some(account) = self.account {
            return Ok(account);
        }
        let accounts = self.provider.get_accounts().await?;
        accounts.first().copied().context("node manages no accounts")
    }
}

#[async_trait::async_trait]
impl CallDispatching for Node {
    async fn call(&self, call: Call) -> Result<Bytes> {
        Ok(self.provider.call(request(call)).await?)
    }

    async fn estimate_gas(&self, call: Call) -> Result<U256> {
        let gas = self.provider.estimate_gas(request(call)).await?;
        Ok(U256::from(gas))
    }
}

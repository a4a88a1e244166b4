use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use super::FanOut;
use crate::platform::{ClientApp, Contract, ExchangeApi};

/// An Exchange client application with the outcome of its contract lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClientAppContracts {
    pub app: ClientApp,
    pub contracts: Vec<Contract>,
    pub error: Option<String>,
}

impl ClientAppContracts {
    pub fn has_contracts(&self) -> bool {
        !self.contracts.is_empty()
    }
}

/// Looks up the contracts of every client application through the fan-out.
/// A failed lookup is recorded on its row and never aborts the batch.
pub async fn collect_contracts(
    fan_out: &FanOut,
    exchange: Arc<dyn ExchangeApi>,
    org_id: &str,
    apps: Vec<ClientApp>,
) -> Vec<ClientAppContracts> {
    let org_id: Arc<str> = Arc::from(org_id);
    let mut rows = fan_out
        .run(apps, move |app: ClientApp| {
            let exchange = Arc::clone(&exchange);
            let org_id = Arc::clone(&org_id);
            async move {
                match exchange.contracts(&org_id, app.id).await {
                    Ok(contracts) => {
                        debug!("Client app {} has {} contracts", app.id, contracts.len());
                        ClientAppContracts {
                            app,
                            contracts,
                            error: None,
                        }
                    }
                    Err(e) => {
                        warn!("Contract lookup for client app {} failed: {}", app.id, e);
                        ClientAppContracts {
                            app,
                            contracts: Vec::new(),
                            error: Some(e.to_string()),
                        }
                    }
                }
            }
        })
        .await;

    rows.sort_by_key(|row| row.app.id);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use muletrack_types::{MuletrackError, MuletrackResult};
    use std::time::Duration;

    struct FakeExchange;

    #[async_trait]
    impl ExchangeApi for FakeExchange {
        async fn client_apps(&self, _org_id: &str, _admin: bool) -> MuletrackResult<Vec<ClientApp>> {
            Ok(Vec::new())
        }

        async fn contracts(&self, org_id: &str, app_id: i64) -> MuletrackResult<Vec<Contract>> {
            assert_eq!(org_id, "org-1");
            match app_id {
                1 => Ok(vec![Contract {
                    id: 10,
                    status: "APPROVED".into(),
                    api_id: Some(7),
                }]),
                2 => Ok(Vec::new()),
                _ => Err(MuletrackError::Api("non-OK status 403: forbidden".into())),
            }
        }
    }

    fn client_app(id: i64) -> ClientApp {
        ClientApp {
            id,
            name: format!("app-{}", id),
            client_id: format!("cid-{}", id),
            description: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_app_gets_a_row() {
        let fan_out = FanOut::new(5, Duration::from_millis(100));
        let rows = collect_contracts(
            &fan_out,
            Arc::new(FakeExchange),
            "org-1",
            vec![client_app(3), client_app(1), client_app(2)],
        )
        .await;

        let ids: Vec<_> = rows.iter().map(|r| r.app.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(rows[0].has_contracts());
        assert!(!rows[1].has_contracts());
        assert!(rows[1].error.is_none());
        assert!(rows[2].error.as_deref().unwrap().contains("403"));
    }
}

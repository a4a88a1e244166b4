use async_trait::async_trait;
use muletrack_types::MuletrackResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use tracing::debug;

use crate::config::EXCHANGE_PAGE_LIMIT;
use crate::http_client::PlatformHttpClient;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientApp {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub api_id: Option<i64>,
}

/// Exchange client applications and their API contracts.
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    async fn client_apps(&self, org_id: &str, target_admin_site: bool) -> MuletrackResult<Vec<ClientApp>>;

    async fn contracts(&self, org_id: &str, app_id: i64) -> MuletrackResult<Vec<Contract>>;
}

/// Fetches pages of `limit` items until a short page comes back.
pub async fn collect_pages<T, F, Fut>(limit: usize, mut fetch: F) -> MuletrackResult<Vec<T>>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = MuletrackResult<Vec<T>>>,
{
    let mut all = Vec::new();
    let mut offset = 0;
    loop {
        let page = fetch(offset).await?;
        let full = page.len() >= limit;
        offset += page.len();
        all.extend(page);
        if !full || limit == 0 {
            return Ok(all);
        }
    }
}

/// Counts contracts per status, ordered by status name.
pub fn count_by_status(contracts: &[Contract]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for contract in contracts {
        *counts.entry(contract.status.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Renders `Total N / APPROVED 2 / REVOKED 1`, or `empty`.
pub fn contract_summary(contracts: &[Contract]) -> String {
    if contracts.is_empty() {
        return "empty".to_string();
    }
    let mut parts = vec![format!("Total {}", contracts.len())];
    parts.extend(
        count_by_status(contracts)
            .into_iter()
            .map(|(status, n)| format!("{} {}", status, n)),
    );
    parts.join(" / ")
}

pub struct ExchangeClient {
    http: PlatformHttpClient,
    token: String,
}

impl ExchangeClient {
    pub fn new(http: PlatformHttpClient, token: impl Into<String>) -> Self {
        Self {
            http,
            token: token.into(),
        }
    }

    async fn client_apps_page(
        &self,
        org_id: &str,
        target_admin_site: bool,
        offset: usize,
    ) -> MuletrackResult<Vec<ClientApp>> {
        let request = self
            .http
            .get(&format!("/exchange/api/v2/organizations/{}/applications", org_id))
            .query(&[
                ("limit", EXCHANGE_PAGE_LIMIT.to_string()),
                ("offset", offset.to_string()),
                ("targetAdminSite", target_admin_site.to_string()),
            ])
            .bearer_auth(&self.token);
        self.http.send_json(request).await
    }
}

#[async_trait]
impl ExchangeApi for ExchangeClient {
    async fn client_apps(&self, org_id: &str, target_admin_site: bool) -> MuletrackResult<Vec<ClientApp>> {
        let apps = collect_pages(EXCHANGE_PAGE_LIMIT, move |offset| {
            self.client_apps_page(org_id, target_admin_site, offset)
        })
        .await?;
        debug!("Exchange returned {} client apps for org {}", apps.len(), org_id);
        Ok(apps)
    }

    async fn contracts(&self, org_id: &str, app_id: i64) -> MuletrackResult<Vec<Contract>> {
        let request = self
            .http
            .get(&format!(
                "/exchange/api/v2/organizations/{}/applications/{}/contracts",
                org_id, app_id
            ))
            .bearer_auth(&self.token);
        self.http.send_json(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muletrack_types::MuletrackError;

    fn contract(id: i64, status: &str) -> Contract {
        Contract {
            id,
            status: status.into(),
            api_id: None,
        }
    }

    #[tokio::test]
    async fn test_collect_pages_stops_on_short_page() {
        let mut calls = Vec::new();
        let items = collect_pages(3, |offset| {
            calls.push(offset);
            let page: Vec<usize> = (offset..(offset + 3).min(7)).collect();
            async move { Ok(page) }
        })
        .await
        .unwrap();

        assert_eq!(items, (0..7).collect::<Vec<_>>());
        assert_eq!(calls, vec![0, 3, 6]);
    }

    #[tokio::test]
    async fn test_collect_pages_exact_multiple_needs_extra_call() {
        let mut calls = 0;
        let items = collect_pages(2, |offset| {
            calls += 1;
            let page: Vec<usize> = (offset..(offset + 2).min(4)).collect();
            async move { Ok(page) }
        })
        .await
        .unwrap();

        assert_eq!(items.len(), 4);
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_collect_pages_propagates_errors() {
        let result: MuletrackResult<Vec<u8>> = tokio_test::block_on(collect_pages(2, |_| async {
            Err(MuletrackError::Api("non-OK status 401".into()))
        }));
        tokio_test::assert_err!(result);
    }

    #[test]
    fn test_contract_summary() {
        assert_eq!(contract_summary(&[]), "empty");

        let contracts = vec![
            contract(1, "APPROVED"),
            contract(2, "REVOKED"),
            contract(3, "APPROVED"),
        ];
        assert_eq!(contract_summary(&contracts), "Total 3 / APPROVED 2 / REVOKED 1");
    }

    #[test]
    fn test_parse_client_app() {
        let body = r#"[{"id": 42, "name": "mobile", "clientId": "abc", "description": null, "grantTypes": []}]"#;
        let apps: Vec<ClientApp> = serde_json::from_str(body).unwrap();
        assert_eq!(apps[0].id, 42);
        assert_eq!(apps[0].client_id, "abc");
    }
}

use crate::bridge::model::{InventoryUpdate, InventoryUpdateResponse, RecommendationsResponse};
use floodcore::allocation::RankedCluster;
use floodcore::{ReliefError, ReliefResult};
use serde::de::DeserializeOwned;

/// Client for a remote dispatch API. Every failure comes back as
/// [`ReliefError::RemoteApiFailure`], carrying the server's `error` text when it sent one.
#[derive(Clone)]
pub struct ReliefClient {
    base_url: String,
    http: reqwest::Client,
}

impl ReliefClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub async fn recommendations(
        &self,
        min_people: u32,
        max_distance_km: f64,
    ) -> ReliefResult<Vec<RankedCluster>> {
        let response = self
            .http
            .get(format!("{}/api/recommendations", self.base_url))
            .query(&[
                ("min_people", min_people.to_string()),
                ("max_distance", max_distance_km.to_string()),
            ])
            .send()
            .await
            .map_err(remote)?;
        let body: RecommendationsResponse =
            decode(response, "Failed to fetch recommendations").await?;
        if body.success {
            Ok(body.recommendations)
        } else {
            Err(ReliefError::RemoteApiFailure(
                body.error
                    .unwrap_or_else(|| "Invalid response format".to_string()),
            ))
        }
    }

    pub async fn update_inventory(
        &self,
        item: &str,
        quantity: u32,
    ) -> ReliefResult<InventoryUpdateResponse> {
        let response = self
            .http
            .post(format!("{}/api/inventory/update", self.base_url))
            .json(&InventoryUpdate {
                item: item.to_string(),
                quantity,
            })
            .send()
            .await
            .map_err(remote)?;
        decode(response, "Failed to update inventory").await
    }
}

fn remote(err: reqwest::Error) -> ReliefError {
    ReliefError::RemoteApiFailure(err.to_string())
}

async fn decode<T: DeserializeOwned>(
    response: reqwest::Response,
    fallback: &str,
) -> ReliefResult<T> {
    let status = response.status();
    let text = response.text().await.map_err(remote)?;
    if !status.is_success() {
        let message = serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or_else(|| fallback.to_string());
        return Err(ReliefError::RemoteApiFailure(format!("{}: {}", status, message)));
    }
    serde_json::from_str(&text)
        .map_err(|err| ReliefError::RemoteApiFailure(format!("decoding response: {}", err)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::server::routes;
    use crate::workflow::runner::SharedState;
    use floodcore::{DashboardOptions, DashboardState, SystemClock};
    use std::sync::{Arc, RwLock};

    fn spawn_server() -> String {
        let mut state = DashboardState::new(DashboardOptions::default(), Arc::new(SystemClock));
        let ticket = state.begin_load();
        state.complete_load(
            ticket,
            Ok("h\nC1,120,18.52,73.85,5.5\nC2,30,18.5,73.8,1.0\n".to_string()),
        );
        let shared: SharedState = Arc::new(RwLock::new(state));
        let (addr, server) = warp::serve(routes(shared)).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn fetches_ranked_recommendations() {
        let client = ReliefClient::new(spawn_server());
        let ranked = client.recommendations(50, 100.0).await.unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].cluster_id, "C1");
        assert_eq!(ranked[0].recommended_resources.food_packets, 120);
    }

    #[tokio::test]
    async fn updates_inventory() {
        let client = ReliefClient::new(spawn_server());
        let reply = client.update_inventory("Blankets", 10).await.unwrap();
        assert_eq!(
            reply,
            InventoryUpdateResponse {
                success: true,
                applied: true,
                current: Some(377),
            }
        );
    }

    #[tokio::test]
    async fn server_error_text_is_propagated() {
        let client = ReliefClient::new(spawn_server());
        let err = client.recommendations(0, f64::NAN).await.unwrap_err();
        match err {
            ReliefError::RemoteApiFailure(message) => {
                assert!(message.contains("max_distance"), "{}", message)
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreachable_server_is_remote_failure() {
        let client = ReliefClient::new("http://127.0.0.1:1");
        assert!(matches!(
            client.update_inventory("Blankets", 1).await,
            Err(ReliefError::RemoteApiFailure(_))
        ));
    }
}

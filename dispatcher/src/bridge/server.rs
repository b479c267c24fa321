use crate::bridge::model::{
    ClusterRequest, ErrorBody, InventoryUpdate, InventoryUpdateResponse, RecommendationsResponse,
};
use crate::workflow::runner::{read_state, write_state, SharedState};
use floodcore::allocation::ranking::{DEFAULT_MAX_DISTANCE_KM, DEFAULT_MIN_PEOPLE};
use floodcore::allocation::{rank_clusters, RankingQuery};
use floodcore::ReliefError;
use std::collections::HashMap;
use warp::http::StatusCode;
use warp::reply::{json, with_status, Json, WithStatus};
use warp::{Filter, Rejection, Reply};

type Response = WithStatus<Json>;

/// HTTP surface over the shared dashboard.
///
/// - `GET  /api/recommendations?min_people=&max_distance=`
/// - `POST /api/inventory/update` `{item, quantity}`
/// - `POST /api/recommend` and `POST /api/locate` `{cluster_id}`
/// - `GET  /api/dashboard`
pub fn routes(
    state: SharedState,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let state_filter = warp::any().map(move || state.clone());

    let recommendations = warp::path!("api" / "recommendations")
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .and(state_filter.clone())
        .map(handle_recommendations);

    let inventory = warp::path!("api" / "inventory" / "update")
        .and(warp::post())
        .and(warp::body::json())
        .and(state_filter.clone())
        .map(handle_inventory_update);

    let recommend = warp::path!("api" / "recommend")
        .and(warp::post())
        .and(warp::body::json())
        .and(state_filter.clone())
        .map(handle_recommend);

    let locate = warp::path!("api" / "locate")
        .and(warp::post())
        .and(warp::body::json())
        .and(state_filter.clone())
        .map(handle_locate);

    let dashboard = warp::path!("api" / "dashboard")
        .and(warp::get())
        .and(state_filter)
        .map(|state: SharedState| {
            let model = write_state(&state).take_model();
            with_status(json(&model), StatusCode::OK)
        });

    recommendations
        .or(inventory)
        .or(recommend)
        .or(locate)
        .or(dashboard)
}

fn error_reply(message: impl Into<String>, status: StatusCode) -> Response {
    with_status(json(&ErrorBody::new(message)), status)
}

fn parse_query(params: &HashMap<String, String>) -> Result<RankingQuery, ReliefError> {
    let min_people = match params.get("min_people") {
        Some(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ReliefError::InvalidInput(format!("min_people must be an integer, got {:?}", raw)))?,
        None => DEFAULT_MIN_PEOPLE,
    };
    let max_distance_km = match params.get("max_distance") {
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| !v.is_nan())
            .ok_or_else(|| ReliefError::InvalidInput(format!("max_distance must be a number, got {:?}", raw)))?,
        None => DEFAULT_MAX_DISTANCE_KM,
    };
    Ok(RankingQuery {
        min_people,
        max_distance_km,
    })
}

fn handle_recommendations(params: HashMap<String, String>, state: SharedState) -> Response {
    let query = match parse_query(&params) {
        Ok(query) => query,
        Err(err) => return error_reply(err.to_string(), StatusCode::BAD_REQUEST),
    };
    let recommendations = rank_clusters(read_state(&state).records(), &query);
    with_status(
        json(&RecommendationsResponse {
            success: true,
            recommendations,
            error: None,
        }),
        StatusCode::OK,
    )
}

fn handle_inventory_update(update: InventoryUpdate, state: SharedState) -> Response {
    let (change, _persist) = write_state(&state).add_stock_and_persist(&update.item, update.quantity);
    println!(
        "[API] inventory {} +{} -> {:?}",
        update.item, update.quantity, change.current
    );
    with_status(
        json(&InventoryUpdateResponse {
            success: true,
            applied: change.applied.is_some(),
            current: change.current,
        }),
        StatusCode::OK,
    )
}

fn handle_recommend(request: ClusterRequest, state: SharedState) -> Response {
    let mut guard = write_state(&state);
    let Some(record) = guard.record(&request.cluster_id).cloned() else {
        return error_reply(
            format!("unknown cluster {}", request.cluster_id),
            StatusCode::NOT_FOUND,
        );
    };
    let recommendation = guard.on_recommend(&record);
    with_status(json(recommendation), StatusCode::OK)
}

fn handle_locate(request: ClusterRequest, state: SharedState) -> Response {
    let mut guard = write_state(&state);
    let Some(record) = guard.record(&request.cluster_id).cloned() else {
        return error_reply(
            format!("unknown cluster {}", request.cluster_id),
            StatusCode::NOT_FOUND,
        );
    };
    match guard.on_locate(&record) {
        Ok(snapshot) => with_status(json(snapshot), StatusCode::OK),
        Err(err) => error_reply(err.to_string(), StatusCode::UNPROCESSABLE_ENTITY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floodcore::ingest::DetectionRecord;
    use floodcore::{DashboardOptions, DashboardState, SystemClock};
    use serde_json::Value;
    use std::sync::{Arc, RwLock};

    const BATCH: &str = "Cluster_ID,No_of_People,Latitude,Longitude,Distance_from_Inventory_km
C1,120,18.52,73.85,5.5
C3,5,18.5,73.8,0.75
";

    fn shared() -> SharedState {
        let mut state = DashboardState::new(DashboardOptions::default(), Arc::new(SystemClock));
        let ticket = state.begin_load();
        state.complete_load(ticket, Ok(BATCH.to_string()));
        Arc::new(RwLock::new(state))
    }

    fn body(response: &warp::http::Response<warp::hyper::body::Bytes>) -> Value {
        serde_json::from_slice(response.body()).unwrap()
    }

    #[tokio::test]
    async fn recommendations_are_ranked() {
        let api = routes(shared());
        let response = warp::test::request()
            .method("GET")
            .path("/api/recommendations?min_people=0&max_distance=100")
            .reply(&api)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body(&response);
        assert_eq!(json["success"], true);
        assert_eq!(json["recommendations"][0]["Cluster_ID"], "C1");
    }

    #[tokio::test]
    async fn bad_query_is_rejected_with_error_body() {
        let api = routes(shared());
        let response = warp::test::request()
            .method("GET")
            .path("/api/recommendations?min_people=lots")
            .reply(&api)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body(&response);
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("min_people"));
    }

    #[tokio::test]
    async fn inventory_update_applies_in_memory() {
        let state = shared();
        let api = routes(state.clone());
        let response = warp::test::request()
            .method("POST")
            .path("/api/inventory/update")
            .json(&InventoryUpdate {
                item: "Medical Kits".into(),
                quantity: 20,
            })
            .reply(&api)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(&response)["current"], 109);
        let guard = read_state(&state);
        let item = guard
            .inventory()
            .iter()
            .find(|i| i.name == "Medical Kits")
            .unwrap();
        assert_eq!(item.current_quantity, 109);
    }

    #[tokio::test]
    async fn locate_focuses_cluster() {
        let state = shared();
        let api = routes(state.clone());
        let response = warp::test::request()
            .method("POST")
            .path("/api/locate")
            .json(&ClusterRequest {
                cluster_id: "C3".into(),
            })
            .reply(&api)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(&response)["total_people"], 5);
        assert_eq!(read_state(&state).active_marker_id(), Some("C3"));
    }

    #[tokio::test]
    async fn locate_unknown_cluster_is_not_found() {
        let state = shared();
        let bad = DetectionRecord::new("C9", 10, 200.0, 73.85, 1.0);
        assert!(write_state(&state).on_locate(&bad).is_err());

        let api = routes(state.clone());
        let response = warp::test::request()
            .method("POST")
            .path("/api/locate")
            .json(&ClusterRequest {
                cluster_id: "missing".into(),
            })
            .reply(&api)
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(read_state(&state).active_marker_id().is_none());
    }

    #[tokio::test]
    async fn recommend_then_dashboard_reflects_it() {
        let api = routes(shared());
        let response = warp::test::request()
            .method("POST")
            .path("/api/recommend")
            .json(&ClusterRequest {
                cluster_id: "C1".into(),
            })
            .reply(&api)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(&response)["food_kits"], 96);

        let response = warp::test::request()
            .method("GET")
            .path("/api/dashboard")
            .reply(&api)
            .await;
        let json = body(&response);
        assert_eq!(json["recommendation"]["priority"], "Critical");
        assert_eq!(json["total_rows"], 2);
    }

    #[tokio::test]
    async fn dashboard_delivers_view_commands_once() {
        let api = routes(shared());
        for _ in 0..3 {
            let response = warp::test::request()
                .method("POST")
                .path("/api/locate")
                .json(&ClusterRequest {
                    cluster_id: "C3".into(),
                })
                .reply(&api)
                .await;
            assert_eq!(response.status(), StatusCode::OK);
        }

        let first = warp::test::request()
            .method("GET")
            .path("/api/dashboard")
            .reply(&api)
            .await;
        let commands = body(&first)["view_commands"].clone();
        assert_eq!(commands.as_array().map(Vec::len), Some(2));
        assert_eq!(commands[0]["command"], "fly_to");
        assert_eq!(commands[0]["marker_id"], "C3");
        assert_eq!(commands[1]["command"], "scroll_into_view");

        let second = warp::test::request()
            .method("GET")
            .path("/api/dashboard")
            .reply(&api)
            .await;
        assert_eq!(body(&second)["view_commands"], serde_json::json!([]));
        assert_eq!(body(&second)["active_marker_id"], "C3");
    }
}

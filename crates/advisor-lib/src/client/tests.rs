//! ARM client tests against a mock HTTP backend

use mockito::Matcher;
use serde_json::json;

use super::{ArmClient, GraphQueryRequest, MetricsApi, MetricsQuery, ResourceGraphApi};
use crate::error::AdvisorError;

fn graph_body(query: &str, skip_token: Option<&str>) -> serde_json::Value {
    let mut options = json!({"resultFormat": "objectArray"});
    if let Some(token) = skip_token {
        options["$skipToken"] = json!(token);
    }
    json!({
        "subscriptions": ["sub-1"],
        "query": query,
        "options": options,
    })
}

#[tokio::test]
async fn graph_pages_are_concatenated_in_order() {
    let mut server = mockito::Server::new_async().await;
    let query = "resources|project id=id";

    let first = server
        .mock("POST", "/providers/Microsoft.ResourceGraph/resources")
        .match_query(Matcher::UrlEncoded("api-version".into(), "2021-03-01".into()))
        .match_body(Matcher::Json(graph_body(query, None)))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "totalRecords": 3,
                "count": 2,
                "data": [{"id": "a"}, {"id": "b"}],
                "$skipToken": "page-2"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let second = server
        .mock("POST", "/providers/Microsoft.ResourceGraph/resources")
        .match_query(Matcher::UrlEncoded("api-version".into(), "2021-03-01".into()))
        .match_body(Matcher::Json(graph_body(query, Some("page-2"))))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"totalRecords": 3, "count": 1, "data": [{"id": "c"}]}).to_string())
        .create_async()
        .await;

    let client = ArmClient::with_endpoint("token", server.url()).unwrap();
    let request = GraphQueryRequest::new("sub-1", query.to_string());
    let rows = client.resources(&request).await.unwrap();

    first.assert_async().await;
    second.assert_async().await;
    let ids: Vec<&str> = rows.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["a", "b", "c"]);
}

#[test]
fn facets_ride_along_only_when_present() {
    let bare = GraphQueryRequest::new("sub-1", "resources".to_string());
    let encoded = serde_json::to_value(&bare).unwrap();
    assert!(encoded.get("facets").is_none());

    let faceted = bare.with_facets(vec![super::FacetRequest {
        expression: "location".to_string(),
    }]);
    let encoded = serde_json::to_value(&faceted).unwrap();
    assert_eq!(encoded["facets"][0]["expression"], "location");
}

#[tokio::test]
async fn non_success_status_surfaces_as_api_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/providers/Microsoft.ResourceGraph/resources")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body("forbidden")
        .create_async()
        .await;

    let client = ArmClient::with_endpoint("token", server.url()).unwrap();
    let request = GraphQueryRequest::new("sub-1", "resources".to_string());
    let err = client.resources(&request).await.unwrap_err();

    match err {
        AdvisorError::Api { status, body, .. } => {
            assert_eq!(status, 403);
            assert_eq!(body, "forbidden");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn metrics_response_parses_aggregated_points() {
    let mut server = mockito::Server::new_async().await;
    let resource_uri =
        "/subscriptions/sub-1/resourceGroups/rg/providers/microsoft.compute/virtualmachines/vm-1";

    let mock = server
        .mock(
            "GET",
            format!("{resource_uri}/providers/Microsoft.Insights/metrics").as_str(),
        )
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("metricnames".into(), "Percentage CPU".into()),
            Matcher::UrlEncoded("aggregation".into(), "Average".into()),
            Matcher::UrlEncoded("interval".into(), "PT24H".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "value": [{
                    "name": {"value": "Percentage CPU", "localizedValue": "Percentage CPU"},
                    "timeseries": [{"data": [
                        {"timeStamp": "2026-07-01T00:00:00Z", "average": 1.25},
                        {"timeStamp": "2026-07-02T00:00:00Z"}
                    ]}]
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = ArmClient::with_endpoint("token", server.url()).unwrap();
    let query = MetricsQuery {
        resource_uri: resource_uri.to_string(),
        timespan: "2026-06-01T00:00:00Z/2026-07-01T00:00:00Z".to_string(),
        interval: "PT24H".to_string(),
        metric_names: "Percentage CPU".to_string(),
        aggregation: "Average".to_string(),
    };
    let response = client.list_metrics(&query).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.value.len(), 1);
    assert_eq!(response.value[0].name.value, "Percentage CPU");
    let points = &response.value[0].timeseries[0].data;
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].average, Some(1.25));
    assert!(points[1].average.is_none());
}

#[tokio::test]
async fn metrics_error_status_carries_the_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", Matcher::Regex("/metrics".to_string()))
        .match_query(Matcher::Any)
        .with_status(429)
        .with_body("too many requests")
        .create_async()
        .await;

    let client = ArmClient::with_endpoint("token", server.url()).unwrap();
    let query = MetricsQuery {
        resource_uri: "/subscriptions/s/resourceGroups/rg/providers/ns/r".to_string(),
        timespan: "2026-06-01T00:00:00Z/2026-07-01T00:00:00Z".to_string(),
        interval: "PT24H".to_string(),
        metric_names: "Percentage CPU".to_string(),
        aggregation: "Average".to_string(),
    };
    let err = client.list_metrics(&query).await.unwrap_err();

    assert!(matches!(err, AdvisorError::Api { status: 429, .. }));
}

mod helpers;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use cached_cosmos_rpc::proto::ZONE_INFOS_PATH;
use cached_cosmos_rpc::server;
use helpers::{dispatcher, test_config, validators, MockData, MockNode};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

#[actix_web::test]
async fn zones_route_serves_json_and_caches_it() {
    let node = Arc::new(MockNode::new().with_zones(&["cosmoshub-4"]));
    let state = web::Data::new(dispatcher(
        test_config(),
        node.clone(),
        Arc::new(MockData::default()),
    ));
    let app = test::init_service(App::new().app_data(state.clone()).configure(server::configure)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/zones").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let first = test::read_body(resp).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/zones").to_request()).await;
    let second = test::read_body(resp).await;

    assert_eq!(first, second);
    assert_eq!(node.query_count(ZONE_INFOS_PATH), 1);
    assert_eq!(state.cache().get("zones").unwrap(), first);
}

#[actix_web::test]
async fn path_parameters_select_the_resource() {
    let node = Arc::new(
        MockNode::new()
            .with_validator_pages(validators(3), 2)
            .with_delegations(),
    );
    let state = web::Data::new(dispatcher(test_config(), node, Arc::new(MockData::default())));
    let app = test::init_service(App::new().app_data(state.clone()).configure(server::configure)).await;

    let req = test::TestRequest::get()
        .uri("/validatorList/cosmoshub-4")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["validators"].as_array().unwrap().len(), 3);

    let req = test::TestRequest::get()
        .uri("/existingDelegations/cosmoshub-4/cosmos1alice")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body["delegation_responses"][0]["delegation"]["delegator_address"],
        "cosmos1alice"
    );

    assert!(state.cache().get("validatorList.cosmoshub-4").is_some());
    assert!(state
        .cache()
        .get("existingDelegations.cosmoshub-4.cosmos1alice")
        .is_some());
}

#[actix_web::test]
async fn resolver_failures_do_not_leak_details() {
    let mut config = test_config();
    config.chains = vec!["cosmoshub".to_string()];
    let state = web::Data::new(dispatcher(
        config,
        Arc::new(MockNode::refusing()),
        Arc::new(MockData::default()),
    ));
    let app = test::init_service(App::new().app_data(state).configure(server::configure)).await;

    for uri in ["/apr", "/zones", "/validatorList/cosmoshub-4"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "message": "Internal Server Error" }));
    }
}

#[actix_web::test]
async fn invalid_chain_id_is_a_bad_request() {
    let node = Arc::new(MockNode::new());
    let state = web::Data::new(dispatcher(
        test_config(),
        node.clone(),
        Arc::new(MockData::default()),
    ));
    let app = test::init_service(App::new().app_data(state).configure(server::configure)).await;

    let req = test::TestRequest::get()
        .uri("/validatorList/bad@chain")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(node.connection_count(), 0);
}

#[actix_web::test]
async fn malformed_address_is_a_bad_request() {
    let node = Arc::new(MockNode::new().with_delegations());
    let state = web::Data::new(dispatcher(
        test_config(),
        node.clone(),
        Arc::new(MockData::default()),
    ));
    let app = test::init_service(App::new().app_data(state.clone()).configure(server::configure)).await;

    let req = test::TestRequest::get()
        .uri("/existingDelegations/a/b.c")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "Bad Request" }));
    assert_eq!(node.connection_count(), 0);
    assert!(state.cache().is_empty());
}

#[actix_web::test]
async fn supply_routes_return_display_figures() {
    let mut config = test_config();
    config.ttls.supply = Duration::from_secs(3600);
    let data = MockData::default().with_supply(2_000_000_000_000, 0);
    let state = web::Data::new(dispatcher(config, Arc::new(MockNode::new()), Arc::new(data)));
    let app = test::init_service(App::new().app_data(state).configure(server::configure)).await;

    let req = test::TestRequest::get().uri("/total_supply").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!(2_000_000.0));

    let req = test::TestRequest::get().uri("/circulating_supply").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!(1_500_000.0));
}

#[actix_web::test]
async fn banner_reports_version() {
    let state = web::Data::new(dispatcher(
        test_config(),
        Arc::new(MockNode::new()),
        Arc::new(MockData::default()),
    ));
    let app = test::init_service(App::new().app_data(state).configure(server::configure)).await;

    let body = test::call_and_read_body(&app, test::TestRequest::get().uri("/").to_request()).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains(env!("CARGO_PKG_VERSION")));
}

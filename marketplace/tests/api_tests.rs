// tests/api_tests.rs

mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use common::{demo_state, setup_tracing, test_config, valid_checkout_form};
use kiln_market::state::AppState;
use kiln_market::store::{DemoData, Marketplace};
use kiln_market::web::configure_app_routes;
use kiln_market::web::extractors::BUYER_HEADER;
use serde_json::{json, Value};

macro_rules! app {
  ($state:expr) => {
    test::init_service(
      App::new()
        .app_data(web::Data::new($state.clone()))
        .configure(configure_app_routes),
    )
    .await
  };
}

#[actix_web::test]
async fn health_check_answers() {
  let state = demo_state();
  let app = app!(state);
  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/v1/health").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn browse_filters_by_category_and_search() {
  let state = demo_state();
  let app = app!(state);

  let req = test::TestRequest::get()
    .uri("/api/v1/products?category=Garden")
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["count"], 1);
  assert_eq!(body["products"][0]["id"], "p10");

  let req = test::TestRequest::get().uri("/api/v1/products?search=TEAPOT").to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["count"], 1);
  assert_eq!(body["products"][0]["title"], "Stoneware Teapot");
}

#[actix_web::test]
async fn featured_route_is_not_taken_as_a_product_id() {
  let state = demo_state();
  let app = app!(state);
  let req = test::TestRequest::get().uri("/api/v1/products/featured").to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  let products = body["products"].as_array().cloned().unwrap_or_default();
  assert!(!products.is_empty());
  assert!(products.iter().all(|p| p["featured"] == true));
}

#[actix_web::test]
async fn product_detail_includes_the_seller_and_404s_unknown_ids() {
  let state = demo_state();
  let app = app!(state);

  let req = test::TestRequest::get().uri("/api/v1/products/p4").to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["product"]["title"], "Textured Vase");
  assert_eq!(body["seller"]["id"], "seller2");

  let req = test::TestRequest::get().uri("/api/v1/products/p999").to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn add_to_cart_over_stock_returns_a_destructive_notice() {
  let state = demo_state();
  let app = app!(state);

  let req = test::TestRequest::post()
    .uri("/api/v1/cart/items")
    .insert_header((BUYER_HEADER, "buyer1"))
    .set_json(json!({ "productId": "p4", "quantity": 5 }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;

  assert_eq!(body["cart"]["itemCount"], 3);
  assert_eq!(body["cart"]["total"], "360");
  assert_eq!(body["notices"][0]["title"], "Insufficient Stock");
  assert_eq!(body["notices"][0]["variant"], "destructive");
  assert_eq!(body["shortfall"]["available"], 3);
}

#[actix_web::test]
async fn zero_quantity_add_is_a_bad_request() {
  let state = demo_state();
  let app = app!(state);
  let req = test::TestRequest::post()
    .uri("/api/v1/cart/items")
    .insert_header((BUYER_HEADER, "buyer1"))
    .set_json(json!({ "productId": "p1", "quantity": 0 }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Quantity must be at least 1.");
}

#[actix_web::test]
async fn unknown_buyer_header_is_rejected() {
  let state = demo_state();
  let app = app!(state);
  let req = test::TestRequest::get()
    .uri("/api/v1/cart")
    .insert_header((BUYER_HEADER, "nobody"))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn cart_quantity_update_and_removal() {
  let state = demo_state();
  let app = app!(state);

  let req = test::TestRequest::post()
    .uri("/api/v1/cart/items")
    .insert_header((BUYER_HEADER, "buyer2"))
    .set_json(json!({ "productId": "p2", "quantity": 1 }))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

  let req = test::TestRequest::put()
    .uri("/api/v1/cart/items/p2")
    .insert_header((BUYER_HEADER, "buyer2"))
    .set_json(json!({ "quantity": 9 }))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["cart"]["itemCount"], 7);
  assert_eq!(body["notices"][0]["description"], "Sorry, only 7 units available.");

  let req = test::TestRequest::delete()
    .uri("/api/v1/cart/items/p2")
    .insert_header((BUYER_HEADER, "buyer2"))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["cart"]["itemCount"], 0);
  assert_eq!(body["notices"][0]["title"], "Removed from Cart");
}

#[actix_web::test]
async fn session_switch_changes_the_default_buyer() {
  let state = demo_state();
  let app = app!(state);

  let req = test::TestRequest::get().uri("/api/v1/session").to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["currentBuyer"]["id"], "buyer1");

  let req = test::TestRequest::put()
    .uri("/api/v1/session")
    .set_json(json!({ "buyerId": "buyer2" }))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["notices"][0]["description"], "You are now browsing as Jamie Wong");

  // No header: the favorites belong to the session buyer.
  let req = test::TestRequest::get().uri("/api/v1/favorites").to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["count"], 2);
  assert_eq!(body["products"][0]["id"], "p3");
}

#[actix_web::test]
async fn session_survives_a_restart() {
  setup_tracing();
  let dir = tempfile::tempdir().expect("temp dir");
  let file = dir.path().join("session");

  let first = Marketplace::from_data(DemoData::bundled().unwrap(), Some(file.clone()));
  first.switch_buyer("buyer2").unwrap();

  let second = Marketplace::from_data(DemoData::bundled().unwrap(), Some(file));
  assert_eq!(second.current_buyer().as_deref(), Some("buyer2"));
}

#[actix_web::test]
async fn messages_round_trip_with_unread_counts() {
  let state = demo_state();
  let app = app!(state);

  let req = test::TestRequest::post()
    .uri("/api/v1/messages/seller3")
    .insert_header((BUYER_HEADER, "buyer2"))
    .set_json(json!({ "content": "Do the lanterns ship with candles?" }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);

  let req = test::TestRequest::get()
    .uri("/api/v1/messages/seller3")
    .insert_header((BUYER_HEADER, "buyer2"))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["messages"].as_array().map(Vec::len), Some(1));

  let req = test::TestRequest::post()
    .uri("/api/v1/messages/seller3")
    .insert_header((BUYER_HEADER, "buyer2"))
    .set_json(json!({ "content": "   " }))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn seller_dashboard_lifecycle() {
  let state = demo_state();
  let app = app!(state);

  let req = test::TestRequest::post()
    .uri("/api/v1/sellers/seller3/products")
    .set_json(json!({
      "title": "Ceramic Bird Feeder",
      "description": "A hanging feeder glazed in moss green.",
      "price": "42.50",
      "category": "Garden",
      "tags": ["garden", "birds"],
      "images": ["/placeholder.svg"],
      "inventory": 6
    }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["product"]["id"], "p14");
  assert_eq!(body["notices"][0]["title"], "Product Created");

  let req = test::TestRequest::post()
    .uri("/api/v1/sellers/seller3/products/p14/duplicate")
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["product"]["title"], "Ceramic Bird Feeder (Copy)");

  let req = test::TestRequest::post()
    .uri("/api/v1/sellers/seller3/products/p14/toggle-status")
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["product"]["active"], false);

  let req = test::TestRequest::get().uri("/api/v1/sellers/seller3/dashboard").to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  let inactive = body["inactiveProducts"].as_array().cloned().unwrap_or_default();
  assert!(inactive.iter().any(|p| p["id"] == "p14"));

  let req = test::TestRequest::delete()
    .uri("/api/v1/sellers/seller3/products/p14")
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["notices"][0]["title"], "Product Deleted");
}

#[actix_web::test]
async fn invalid_product_draft_is_unprocessable() {
  let state = demo_state();
  let app = app!(state);
  let req = test::TestRequest::post()
    .uri("/api/v1/sellers/seller1/products")
    .set_json(json!({
      "title": "Mu",
      "description": "A mug.",
      "price": 0,
      "category": "Kitchen",
      "inventory": 1
    }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["errors"]["title"], "Title must be at least 3 characters");
  assert!(body["errors"]["images"].is_string());
}

#[actix_web::test]
async fn checkout_over_http() {
  let state = demo_state();
  let app = app!(state);

  let req = test::TestRequest::post()
    .uri("/api/v1/cart/items")
    .insert_header((BUYER_HEADER, "buyer1"))
    .set_json(json!({ "productId": "p11", "quantity": 2 }))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

  let req = test::TestRequest::post()
    .uri("/api/v1/checkout")
    .insert_header((BUYER_HEADER, "buyer1"))
    .set_json(valid_checkout_form())
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["total"], "136");
  assert_eq!(body["confirmationEmailSent"], true);
  assert_eq!(body["notices"][0]["title"], "Order Placed!");

  let req = test::TestRequest::get()
    .uri("/api/v1/cart")
    .insert_header((BUYER_HEADER, "buyer1"))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["cart"]["itemCount"], 0);
}

#[actix_web::test]
async fn declined_card_is_payment_required() {
  let state = AppState::new(
    test_config(),
    Marketplace::from_data(DemoData::bundled().unwrap(), None),
  );
  let app = app!(state);

  let req = test::TestRequest::post()
    .uri("/api/v1/cart/items")
    .insert_header((BUYER_HEADER, "buyer2"))
    .set_json(json!({ "productId": "p5", "quantity": 1 }))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

  let mut form = valid_checkout_form();
  form.card_number = "4000 0000 0000 0002".into();
  let req = test::TestRequest::post()
    .uri("/api/v1/checkout")
    .insert_header((BUYER_HEADER, "buyer2"))
    .set_json(form)
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::PAYMENT_REQUIRED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Your card was declined.");
  assert_eq!(state.market.cart("buyer2").unwrap().item_count, 1);
}

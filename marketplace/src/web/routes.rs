// kiln-market/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{
  cart_handlers, catalog_handlers, checkout_handlers, favorites_handlers, message_handlers, seller_handlers,
  session_handlers,
};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Mounts every API route under `/api/v1`. Shared by `main.rs` and the integration tests.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      .route("/categories", web::get().to(catalog_handlers::list_categories_handler))
      .route("/buyers", web::get().to(catalog_handlers::list_buyers_handler))
      // Catalog. Literal segments go before `{id}` so they are not captured as ids.
      .service(
        web::scope("/products")
          .route("", web::get().to(catalog_handlers::browse_products_handler))
          .route("/featured", web::get().to(catalog_handlers::featured_products_handler))
          .route("/{product_id}", web::get().to(catalog_handlers::get_product_handler)),
      )
      // Sellers and the seller dashboard
      .service(
        web::scope("/sellers")
          .route("", web::get().to(catalog_handlers::list_sellers_handler))
          .route("/featured", web::get().to(catalog_handlers::featured_sellers_handler))
          .route("/{seller_id}", web::get().to(catalog_handlers::get_seller_handler))
          .route("/{seller_id}/dashboard", web::get().to(seller_handlers::dashboard_handler))
          .route("/{seller_id}/products", web::post().to(seller_handlers::create_product_handler))
          .route(
            "/{seller_id}/products/{product_id}",
            web::put().to(seller_handlers::update_product_handler),
          )
          .route(
            "/{seller_id}/products/{product_id}",
            web::delete().to(seller_handlers::delete_product_handler),
          )
          .route(
            "/{seller_id}/products/{product_id}/duplicate",
            web::post().to(seller_handlers::duplicate_product_handler),
          )
          .route(
            "/{seller_id}/products/{product_id}/toggle-status",
            web::post().to(seller_handlers::toggle_product_status_handler),
          ),
      )
      .service(
        web::resource("/session")
          .route(web::get().to(session_handlers::get_session_handler))
          .route(web::put().to(session_handlers::switch_buyer_handler)),
      )
      // Buyer-scoped routes; the buyer comes from `X-Buyer-ID` or the session.
      .service(
        web::scope("/cart")
          .route("", web::get().to(cart_handlers::get_cart_handler))
          .route("", web::delete().to(cart_handlers::clear_cart_handler))
          .route("/items", web::post().to(cart_handlers::add_to_cart_handler))
          .route("/items/{product_id}", web::put().to(cart_handlers::set_quantity_handler))
          .route("/items/{product_id}", web::delete().to(cart_handlers::remove_item_handler)),
      )
      .service(
        web::scope("/favorites")
          .route("", web::get().to(favorites_handlers::list_favorites_handler))
          .route("/{product_id}/toggle", web::post().to(favorites_handlers::toggle_favorite_handler)),
      )
      .service(
        web::scope("/messages")
          .route("", web::get().to(message_handlers::inbox_handler))
          .route("/{seller_id}", web::get().to(message_handlers::conversation_handler))
          .route("/{seller_id}", web::post().to(message_handlers::send_message_handler))
          .route("/{seller_id}/read", web::post().to(message_handlers::mark_read_handler)),
      )
      .route("/checkout", web::post().to(checkout_handlers::checkout_handler))
      .route("/orders", web::get().to(checkout_handlers::list_orders_handler)),
  );
}

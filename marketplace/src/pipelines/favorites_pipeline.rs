// kiln-market/src/pipelines/favorites_pipeline.rs

use crate::errors::AppError;
use crate::models::Notice;
use crate::pipelines::common_steps::resolve_buyer;
use crate::pipelines::contexts::ToggleFavoriteCtxData;
use kiln_flow::{Flow, FlowContext, FlowRegistry, StepControl};
use tracing::info;

pub fn register_toggle_favorite_flow(registry: &FlowRegistry<AppError>) {
  let mut f = Flow::<ToggleFavoriteCtxData, AppError>::new(&[
    ("resolve_buyer", false, None),
    ("toggle", false, None),
    ("notify", false, None),
  ]);

  f.on("resolve_buyer", resolve_buyer::<ToggleFavoriteCtxData>);

  f.on("toggle", |ctx: FlowContext<ToggleFavoriteCtxData>| async move {
    let now_favorite = {
      let guard = ctx.read();
      guard.app_state.market.toggle_favorite(&guard.buyer_id, &guard.product_id)?
    };
    ctx.write().is_favorite = Some(now_favorite);
    Ok::<_, AppError>(StepControl::Continue)
  });

  f.on("notify", |ctx: FlowContext<ToggleFavoriteCtxData>| async move {
    let mut guard = ctx.write();
    let notice = match guard.is_favorite {
      Some(true) => Notice::info("Added to Favorites", "Item added to your favorites."),
      _ => Notice::info("Removed from Favorites", "Item removed from your favorites."),
    };
    info!(buyer_id = %guard.buyer_id, product_id = %guard.product_id, "{}", notice.title);
    guard.notices.push(notice);
    Ok::<_, AppError>(StepControl::Continue)
  });

  registry.register(f);
  info!("Toggle favorite flow registered.");
}

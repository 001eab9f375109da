// kiln-flow/examples/cart_flow.rs

use kiln_flow::{Flow, FlowContext, FlowError, FlowOutcome, StepControl};
use tracing::info;

#[derive(Clone, Debug, Default)]
struct AddToCart {
  requested: u32,
  inventory: u32,
  in_cart: u32,
  warnings: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), FlowError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  let mut flow = Flow::<AddToCart, FlowError>::new(&[("validate", false, None), ("clamp", false, None), ("apply", false, None)]);

  flow.on("validate", |ctx: FlowContext<AddToCart>| {
    Box::pin(async move {
      if ctx.read().requested == 0 {
        return Ok::<_, FlowError>(StepControl::Stop);
      }
      Ok(StepControl::Continue)
    })
  });

  flow.on("clamp", |ctx: FlowContext<AddToCart>| {
    Box::pin(async move {
      let mut data = ctx.write();
      let wanted = data.in_cart + data.requested;
      if wanted > data.inventory {
        let msg = format!("only {} units available", data.inventory);
        data.warnings.push(msg);
        data.requested = data.inventory - data.in_cart;
      }
      Ok::<_, FlowError>(StepControl::Continue)
    })
  });

  flow.on("apply", |ctx: FlowContext<AddToCart>| {
    Box::pin(async move {
      let mut data = ctx.write();
      data.in_cart += data.requested;
      info!("cart now holds {} units", data.in_cart);
      Ok::<_, FlowError>(StepControl::Continue)
    })
  });

  let ctx = FlowContext::new(AddToCart {
    requested: 4,
    inventory: 5,
    in_cart: 3,
    warnings: Vec::new(),
  });
  let outcome = flow.run(ctx.clone()).await?;
  assert_eq!(outcome, FlowOutcome::Completed);

  let data = ctx.read();
  info!("final quantity {}, warnings {:?}", data.in_cart, data.warnings);
  assert_eq!(data.in_cart, 5);
  Ok(())
}

use clap::Args;
use trolley::CartUuid;

use crate::cli::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct RecalculateArgs {
    /// Cart to reconcile
    #[arg(long)]
    cart: CartUuid,

    #[command(flatten)]
    store: StoreArgs,
}

pub(crate) async fn run(args: RecalculateArgs) -> Result<(), String> {
    let context = args.store.context();

    let totals = context
        .carts
        .recalculate_totals(args.cart)
        .await
        .map_err(|error| format!("failed to recalculate cart totals: {error}"))?;

    println!("cart_id: {}", args.cart);
    println!("total_items: {}", totals.total_items);
    println!("total_price: {}", totals.total_price);

    Ok(())
}

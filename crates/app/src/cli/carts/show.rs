use clap::Args;
use trolley::UserUuid;

use crate::cli::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct ShowArgs {
    /// Owner of the cart
    #[arg(long)]
    user: UserUuid,

    #[command(flatten)]
    store: StoreArgs,
}

pub(crate) async fn run(args: ShowArgs) -> Result<(), String> {
    let context = args.store.context();

    let view = context
        .carts
        .get_cart_view(args.user)
        .await
        .map_err(|error| format!("failed to load cart: {error}"))?;

    let Some(view) = view else {
        println!("user {} has no active cart", args.user);

        return Ok(());
    };

    let json = serde_json::to_string_pretty(&view)
        .map_err(|error| format!("failed to render cart: {error}"))?;

    println!("{json}");

    Ok(())
}

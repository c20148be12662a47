use clap::{Args, Subcommand};

mod recalculate;
mod show;

#[derive(Debug, Args)]
pub(crate) struct CartsCommand {
    #[command(subcommand)]
    command: CartsSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartsSubcommand {
    /// Recompute a cart's stored totals from its items
    Recalculate(recalculate::RecalculateArgs),

    /// Print a user's active cart
    Show(show::ShowArgs),
}

pub(crate) async fn run(command: CartsCommand) -> Result<(), String> {
    match command.command {
        CartsSubcommand::Recalculate(args) => recalculate::run(args).await,
        CartsSubcommand::Show(args) => show::run(args).await,
    }
}

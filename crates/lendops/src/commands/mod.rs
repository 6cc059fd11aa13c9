//! Command dispatch: bridges CLI args -> domain service calls -> output formatting.

pub mod accounting;
pub mod auth;
pub mod collections;
pub mod compliance;
pub mod config_cmd;
pub mod customers;
pub mod loans;
pub mod media;
pub mod notifications;
pub mod org;
pub mod products;
pub mod reports;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config::Session;
use crate::error::CliError;

/// Dispatch a gateway-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    let client = &session.client;
    match cmd {
        Command::Auth(args) => auth::handle(session, args, global).await,
        Command::Loans(args) => loans::handle(client, args, global).await,
        Command::Customers(args) => customers::handle(client, args, global).await,
        Command::Products(args) => products::handle(client, args, global).await,
        Command::Accounting(args) => accounting::handle(client, args, global).await,
        Command::Collections(args) => collections::handle(client, args, global).await,
        Command::Compliance(args) => compliance::handle(client, args, global).await,
        Command::Reports(args) => reports::handle(client, args, global).await,
        Command::Notifications(args) => notifications::handle(client, args, global).await,
        Command::Media(args) => media::handle(client, args, global).await,
        Command::Org(args) => org::handle(client, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

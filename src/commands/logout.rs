use super::Workspace;
use crate::{libs::messages::Message, msg_info, msg_success};
use anyhow::Result;

pub async fn cmd() -> Result<()> {
    let workspace = Workspace::open()?;
    let mut guard = workspace.guard().await;

    if !guard.context().is_signed_in() {
        msg_info!(Message::SignInRequired);
    } else if guard.sign_out().await.is_ok() {
        msg_success!(Message::SignedOut);
    }
    guard.teardown();
    Ok(())
}

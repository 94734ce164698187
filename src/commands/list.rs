use super::Workspace;
use crate::{
    libs::{messages::Message, view::View},
    msg_info,
};
use anyhow::Result;

pub async fn cmd() -> Result<()> {
    let workspace = Workspace::open()?;
    if !workspace.ready().await {
        return Ok(());
    }

    if let Some(session) = workspace.store.context().current() {
        msg_info!(Message::SignedInAs(session.user.display_name().to_string()));
    }
    View::tasks(&workspace.store.tasks());
    Ok(())
}

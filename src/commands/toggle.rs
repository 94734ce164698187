use super::Workspace;
use crate::{libs::messages::Message, msg_error, msg_success};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ToggleArgs {
    /// Task id or its position in `todoer list`
    reference: String,
}

pub async fn cmd(args: ToggleArgs) -> Result<()> {
    let workspace = Workspace::open()?;
    if !workspace.ready().await {
        return Ok(());
    }

    let Some(task) = workspace.store.resolve(&args.reference) else {
        msg_error!(Message::TaskNotFound(args.reference));
        return Ok(());
    };
    if let Ok(Some(task)) = workspace.store.toggle(&task.id).await {
        if task.completed {
            msg_success!(Message::TaskMarkedCompleted(task.text));
        } else {
            msg_success!(Message::TaskMarkedActive(task.text));
        }
    }
    Ok(())
}

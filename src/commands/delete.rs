use super::Workspace;
use crate::{libs::messages::Message, msg_error, msg_info};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Task id or its position in `todoer list`
    reference: String,

    /// Skip confirmation prompt
    #[arg(long)]
    force: bool,
}

pub async fn cmd(args: DeleteArgs) -> Result<()> {
    let workspace = Workspace::open()?;
    if !workspace.ready().await {
        return Ok(());
    }

    let Some(task) = workspace.store.resolve(&args.reference) else {
        msg_error!(Message::TaskNotFound(args.reference));
        return Ok(());
    };

    if !args.force {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmDeleteTask(task.text.clone()).to_string())
            .default(false)
            .interact()?;

        if !confirmed {
            msg_info!(Message::OperationCancelled);
            return Ok(());
        }
    }

    let _ = workspace.store.delete(&task.id).await;
    Ok(())
}

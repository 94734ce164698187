use super::Workspace;
use crate::{libs::messages::Message, msg_warning};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Task text; several words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    text: Vec<String>,
}

pub async fn cmd(args: AddArgs) -> Result<()> {
    let text = args.text.join(" ");
    if text.trim().is_empty() {
        msg_warning!(Message::TaskTextEmpty);
        return Ok(());
    }

    let workspace = Workspace::open()?;
    if !workspace.ready().await {
        return Ok(());
    }
    // the store reports the outcome itself
    let _ = workspace.store.add(&text).await;
    Ok(())
}

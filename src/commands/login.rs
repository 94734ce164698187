use crate::{
    api::auth::GoTrueAuth,
    libs::{config::Config, messages::Message},
    msg_error, msg_success,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Input, Password};

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email, prompted for when omitted
    #[arg(short, long)]
    email: Option<String>,
}

pub async fn cmd(args: LoginArgs) -> Result<()> {
    let backend = Config::read()?.with_env().backend()?;
    let auth = GoTrueAuth::new(&backend);

    let email = match args.email {
        Some(email) => email,
        None => Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptEmail.to_string())
            .interact_text()?,
    };
    let password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptPassword.to_string())
        .interact()?;

    match auth.sign_in_with_password(email.trim(), &password).await {
        Ok(session) => msg_success!(Message::SignedInAs(session.user.display_name().to_string())),
        Err(e) => msg_error!(Message::SignInFailed(e.to_string())),
    }
    Ok(())
}

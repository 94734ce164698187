//! Backend configuration wizard.

use crate::{
    libs::{config::Config, messages::Message},
    msg_success,
};
use anyhow::Result;

pub fn cmd() -> Result<()> {
    Config::init()?.save()?;
    msg_success!(Message::ConfigSaved);
    Ok(())
}

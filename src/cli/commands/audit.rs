//! `audit` command handler.

use anyhow::Result;

use crate::cli::display::TableFormatter;
use crate::Kernel;

pub async fn handle_audit(kernel: &Kernel, agent: Option<String>, json: bool) -> Result<()> {
    let events = match agent {
        Some(id) => kernel.audit.for_agent(&id).await?,
        None => kernel.audit.all().await?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
    } else {
        println!("{}", TableFormatter::new().format_audit(&events));
    }
    Ok(())
}

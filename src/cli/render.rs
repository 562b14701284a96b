//! `bnet-roster render`

use crate::core::pipeline::RequestContext;
use std::error::Error;

pub async fn render_roster(context: &RequestContext) -> Result<(), Box<dyn Error>> {
    let html = context.render_roster().await?;
    println!("{html}");
    Ok(())
}

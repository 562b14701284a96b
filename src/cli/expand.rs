//! `bnet-roster expand`: shortcode expansion for static pages and templates.

use crate::core::pipeline::RequestContext;
use std::error::Error;
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Read the whole input, from `path` or from stdin when no path is given.
pub async fn read_input(path: Option<&Path>) -> Result<String, Box<dyn Error>> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|err| format!("Failed to read {}: {err}", path.display()).into()),
        None => {
            let mut text = String::new();
            tokio::io::stdin().read_to_string(&mut text).await?;
            Ok(text)
        }
    }
}

pub async fn expand_input(
    context: &RequestContext,
    path: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let text = read_input(path).await?;
    print!("{}", context.expand_text(&text).await);
    Ok(())
}

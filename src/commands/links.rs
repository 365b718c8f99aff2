use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;

use ont2wb::config::Config;
use ont2wb::links::LinkStore;

pub fn links(config: Config, link_file: Option<PathBuf>, format: &str) -> Result<()> {
    let path = link_file.unwrap_or(config.migration.link_file);

    let Some(store) = LinkStore::load(&path)
        .map_err(|e| super::failure(e, format!("Failed to read link store: {}", path.display())))?
    else {
        println!("No link store at {}", path.display());
        return Ok(());
    };

    match format {
        "json" => {
            let map: BTreeMap<&str, String> = store
                .iter()
                .map(|(iri, id)| (iri, id.to_string()))
                .collect();
            let json = serde_json::to_string_pretty(&map).context("Failed to serialize link store")?;
            println!("{json}");
        }
        "turtle" => {
            let turtle = store
                .to_turtle()
                .map_err(|e| super::failure(e, "Failed to encode link store".to_string()))?;
            print!("{turtle}");
        }
        _ => {
            for (iri, id) in store.iter() {
                println!("{:<8} {iri}", id.to_string());
            }
            println!("{} linked node(s) in {}", store.len(), path.display());
        }
    }

    Ok(())
}

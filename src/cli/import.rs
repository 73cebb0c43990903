use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use recipebox_recipe::TagInput;
use serde::Deserialize;

use crate::config::Config;

#[derive(Debug, Deserialize)]
struct IngredientRecord {
    name: String,
    measurement_unit: String,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub ingredients: usize,
    pub tags: usize,
    pub skipped: usize,
}

#[tracing::instrument(skip(config))]
pub async fn import(
    config: Config,
    ingredients: Option<PathBuf>,
    tags: Option<PathBuf>,
) -> Result<()> {
    let pool = crate::db::create_pool(&config.database.url, 1).await?;
    crate::cli::run_migrations(&pool).await?;

    let recipe = recipebox_recipe::Command::new(recipebox_shared::State::single(pool.clone()));
    let summary = import_catalog(&recipe, ingredients.as_deref(), tags.as_deref()).await?;
    pool.close().await;

    tracing::info!(
        ingredients = summary.ingredients,
        tags = summary.tags,
        skipped = summary.skipped,
        "Catalog imported"
    );

    Ok(())
}

/// Loads ingredient and tag JSON arrays into the catalog. Entries that
/// already exist are skipped, any other failure aborts the import.
pub async fn import_catalog(
    recipe: &recipebox_recipe::Command,
    ingredients: Option<&Path>,
    tags: Option<&Path>,
) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    if let Some(path) = ingredients {
        for record in read_records::<IngredientRecord>(path)? {
            match recipe
                .ingredient
                .create(&record.name, &record.measurement_unit)
                .await
            {
                Ok(_) => summary.ingredients += 1,
                Err(recipebox_shared::Error::Invalid(msg)) => {
                    tracing::warn!("Skipping ingredient {}: {msg}", record.name);
                    summary.skipped += 1;
                }
                Err(e) => return Err(e).with_context(|| format!("ingredient {}", record.name)),
            }
        }
    }

    if let Some(path) = tags {
        for record in read_records::<TagInput>(path)? {
            let name = record.name.to_owned();
            match recipe.tag.create(record).await {
                Ok(_) => summary.tags += 1,
                Err(recipebox_shared::Error::Invalid(msg)) => {
                    tracing::warn!("Skipping tag {name}: {msg}");
                    summary.skipped += 1;
                }
                Err(e) => return Err(e).with_context(|| format!("tag {name}")),
            }
        }
    }

    Ok(summary)
}

fn read_records<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

//! Load layout-sets from an app directory.
//!
//! ```text
//! layout-sets.json              { "sets": [ { "id", "dataType", "tasks" } ] }
//! <layouts>/<set id>/Settings.json   optional { "pages": { "order": [...] } }
//! <layouts>/<set id>/layouts/<page>.json
//! ```
//!
//! Without a `Settings.json` page order, pages are loaded in file-name order.

use crate::error::{LayoutError, LayoutResult};
use crate::layout_set::LayoutSet;
use crate::page::Page;
use formtree_instance::DataType;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSetsDefinition {
    pub sets: Vec<LayoutSetDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSetDefinition {
    pub id: String,
    pub data_type: String,
    #[serde(default)]
    pub tasks: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LayoutSettings {
    #[serde(default)]
    pages: PageSettings,
}

#[derive(Debug, Default, Deserialize)]
struct PageSettings {
    #[serde(default)]
    order: Option<Vec<String>>,
}

fn read_to_string(path: &Path) -> LayoutResult<String> {
    std::fs::read_to_string(path).map_err(|source| LayoutError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn parse_json<T: for<'de> Deserialize<'de>>(path: &Path, content: &str) -> LayoutResult<T> {
    serde_json::from_str(content).map_err(|source| LayoutError::Json {
        path: path.display().to_string(),
        source,
    })
}

impl LayoutSetsDefinition {
    pub fn load(path: &Path) -> LayoutResult<Self> {
        let content = read_to_string(path)?;
        parse_json(path, &content)
    }
}

/// Page names for a layout-set directory, in render order
fn page_order(set_dir: &Path) -> LayoutResult<Vec<String>> {
    let settings_path = set_dir.join("Settings.json");
    if settings_path.exists() {
        let settings: LayoutSettings = parse_json(&settings_path, &read_to_string(&settings_path)?)?;
        if let Some(order) = settings.pages.order {
            return Ok(order);
        }
    }

    let layouts_dir = set_dir.join("layouts");
    let entries = std::fs::read_dir(&layouts_dir).map_err(|source| LayoutError::Io {
        path: layouts_dir.display().to_string(),
        source,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| LayoutError::Io {
                path: layouts_dir.display().to_string(),
                source,
            })?
            .path();
        if path.extension().is_some_and(|ext| ext == "json") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Load one layout-set from `<layouts_dir>/<definition.id>`
#[instrument(skip(definition), fields(layout_set = %definition.id))]
pub fn load_layout_set(definition: &LayoutSetDefinition, layouts_dir: &Path) -> LayoutResult<LayoutSet> {
    let set_dir: PathBuf = layouts_dir.join(&definition.id);
    let mut pages = Vec::new();
    for page_name in page_order(&set_dir)? {
        let path = set_dir.join("layouts").join(format!("{page_name}.json"));
        debug!(page = %page_name, path = %path.display(), "Loading page");
        let content = read_to_string(&path)?;
        pages.push(Page::from_json(&page_name, &content).map_err(|err| match err {
            LayoutError::Json { source, .. } => LayoutError::Json {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })?);
    }

    Ok(LayoutSet::new(&definition.id, DataType::new(&definition.data_type), pages)?
        .with_tasks(definition.tasks.clone()))
}

/// Load every layout-set listed in `layout_sets_file`
pub fn load_layout_sets(layout_sets_file: &Path, layouts_dir: &Path) -> LayoutResult<Vec<LayoutSet>> {
    let definition = LayoutSetsDefinition::load(layout_sets_file)?;
    let sets = definition
        .sets
        .iter()
        .map(|set| load_layout_set(set, layouts_dir))
        .collect::<LayoutResult<Vec<_>>>()?;
    info!(count = sets.len(), "Loaded layout sets");
    Ok(sets)
}

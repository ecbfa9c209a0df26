use crate::config::Config;
use anyhow::{Context, Result};
use formtree_evaluator::JsonDataAccessor;
use formtree_instance::Instance;
use formtree_layout::{loader, LayoutModel};
use std::path::Path;
use tracing::{debug, info, warn};

/// Everything loaded from one app directory
pub struct App {
    pub model: LayoutModel,
    pub instance: Instance,
    pub accessor: JsonDataAccessor,
}

impl App {
    pub fn load(app_dir: &Path) -> Result<Self> {
        let config = Config::load(app_dir)
            .with_context(|| format!("Failed to read config in {}", app_dir.display()))?;
        let model = load_model(app_dir, &config)?;

        let instance_path = config.instance_path(app_dir);
        let instance = if instance_path.exists() {
            let content = std::fs::read_to_string(&instance_path)
                .with_context(|| format!("Failed to read {}", instance_path.display()))?;
            Instance::from_json(&content)
                .with_context(|| format!("Invalid instance in {}", instance_path.display()))?
        } else {
            debug!(path = %instance_path.display(), "No instance file");
            Instance::new("local")
        };

        let accessor = load_data(app_dir, &config, &instance)?;

        Ok(Self {
            model,
            instance,
            accessor,
        })
    }
}

/// Layout model only, for commands that never touch instance data
pub fn load_model(app_dir: &Path, config: &Config) -> Result<LayoutModel> {
    let layout_sets = loader::load_layout_sets(
        &config.layout_sets_path(app_dir),
        &config.layouts_path(app_dir),
    )?;
    info!(count = layout_sets.len(), "Loaded layout-sets");
    Ok(LayoutModel::new(
        layout_sets,
        config.default_layout_set.as_deref(),
    )?)
}

fn load_data(app_dir: &Path, config: &Config, instance: &Instance) -> Result<JsonDataAccessor> {
    let data_dir = config.data_path(app_dir);
    let mut accessor = JsonDataAccessor::new();

    for element in &instance.data {
        let path = data_dir.join(format!("{}.json", element.id));
        if !path.exists() {
            warn!(data_element = %element.id, path = %path.display(), "No data file for data element");
            continue;
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let value = serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?;
        accessor.insert(element, value);
    }

    debug!(elements = accessor.len(), "Loaded form data");
    Ok(accessor)
}

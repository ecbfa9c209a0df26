use crate::app::load_model;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use formtree_evaluator::referenced_functions;
use formtree_layout::Component;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ComponentsArgs {
    /// App directory holding layout-sets
    pub app_dir: PathBuf,

    /// Layout-set to list (defaults to the configured default)
    #[arg(short, long)]
    pub layout_set: Option<String>,
}

pub fn components(args: ComponentsArgs) -> Result<()> {
    let config = Config::load(&args.app_dir)?;
    let model = load_model(&args.app_dir, &config)?;
    let model = match &args.layout_set {
        Some(id) => model.with_default(id)?,
        None => model,
    };

    let layout_set = model.default_layout_set();
    println!(
        "📋 {} {} ({} pages)",
        "Components".green().bold(),
        layout_set.id(),
        layout_set.pages().len()
    );
    println!();

    let mut problems = Vec::new();
    let mut count = 0;
    for component in model.get_components() {
        count += 1;
        println!("{}", describe(component));
        problems.extend(check_expressions(component));
    }

    if let Err(err) = model.check_sub_form_references() {
        problems.push(err.to_string());
    }

    println!();
    println!("   Components: {}", count);
    if problems.is_empty() {
        println!("   {} No issues found!", "✓".green());
        return Ok(());
    }

    for problem in &problems {
        println!("   {} {}", "✗".red(), problem);
    }
    anyhow::bail!("{} problem(s) found", problems.len())
}

fn describe(component: &Component) -> String {
    let mut line = format!(
        "  {}/{} {}",
        component.page_id.dimmed(),
        component.id.bold(),
        component.component_type.cyan()
    );
    for (name, binding) in &component.data_model_bindings {
        line.push_str(&format!(" {}={}", name, binding));
    }
    if let Some(layout_set) = component.sub_form_layout_set() {
        line.push_str(&format!(" {}", format!("-> {layout_set}").magenta()));
    }
    line
}

/// Validate the `hidden`/`required` expressions of a component
fn check_expressions(component: &Component) -> Vec<String> {
    [("hidden", &component.hidden), ("required", &component.required)]
        .into_iter()
        .filter_map(|(property, expression)| {
            let expression: &Value = expression.as_ref()?;
            referenced_functions(expression).err().map(|err| {
                format!(
                    "{}/{}: invalid {} expression: {}",
                    component.page_id, component.id, property, err
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_expressions_reports_unknown_function() {
        let mut component = Component::leaf("name", "page1", "Input");
        component.hidden = Some(json!(["equals", ["component", "age"], 18]));
        component.required = Some(json!(["frobnicate", 1]));

        let problems = check_expressions(&component);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].starts_with("page1/name: invalid required expression"));
    }

    #[test]
    fn test_literal_expressions_are_valid() {
        let mut component = Component::leaf("name", "page1", "Input");
        component.hidden = Some(json!(true));
        assert!(check_expressions(&component).is_empty());
    }
}

use crate::app::App;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use formtree_evaluator::{ComponentContext, ContextBuilder, ContextSummary};
use formtree_instance::Instance;
use formtree_layout::page::PAGE_COMPONENT_TYPE;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ContextsArgs {
    /// App directory holding layout-sets, instance and data
    pub app_dir: PathBuf,

    /// Layout-set to generate contexts for (defaults to the current task's)
    #[arg(short, long)]
    pub layout_set: Option<String>,

    /// Print the context trees as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn contexts(args: ContextsArgs) -> Result<()> {
    let app = App::load(&args.app_dir)?;

    let model = match &args.layout_set {
        Some(id) => app.model.with_default(id)?,
        None => app.model.for_instance(&app.instance),
    };

    let builder = ContextBuilder::new(&model, &app.instance, &app.accessor);
    let pages = builder.generate_component_contexts().await?;

    if args.json {
        let summaries: Vec<ContextSummary> = pages.iter().map(ComponentContext::summary).collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    let layout_set = model.default_layout_set();
    println!(
        "🌲 {} {} ({})",
        "Layout-set".green().bold(),
        layout_set.id(),
        layout_set.default_data_type().id
    );
    println!("   Instance: {} ({})", app.instance.id, process_status(&app.instance));

    if pages.is_empty() {
        println!(
            "   {} No data element of type {} on instance {}",
            "!".yellow(),
            layout_set.default_data_type().id,
            app.instance.id
        );
        return Ok(());
    }

    for page in &pages {
        println!();
        print_context(page, 1);
    }

    let total: usize = pages.iter().map(|page| page.descendants().count()).sum();
    println!();
    println!("   {} {} contexts on {} pages", "✓".green(), total, pages.len());
    Ok(())
}

/// Where the instance's process stands
fn process_status(instance: &Instance) -> String {
    if instance.is_ended() {
        return "process ended".to_string();
    }
    match instance.require_current_task() {
        Ok(task) => format!("task {task}"),
        Err(err) => err.to_string(),
    }
}

fn print_context(context: &ComponentContext<'_>, depth: usize) {
    let indent = "  ".repeat(depth);
    let component = context.component();

    let mut line = format!(
        "{}{} {}",
        indent,
        context.id().bold(),
        component.component_type.dimmed()
    );
    if !context.index_path().is_empty() {
        line.push_str(&format!(" {}", format!("{:?}", context.index_path()).cyan()));
    }
    if let Some(rows) = context.row_count() {
        line.push_str(&format!(" {}", format!("rows={rows}").yellow()));
    }
    if component.sub_form_layout_set().is_some() || component.component_type == PAGE_COMPONENT_TYPE {
        line.push_str(&format!(" {}", format!("@{}", context.data_element()).magenta()));
    }
    println!("{line}");

    for child in context.children() {
        print_context(child, depth + 1);
    }
}

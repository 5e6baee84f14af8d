use std::fs;
use std::path::Path;

use anyhow::Context;
use serde_json::Value;
use tracing::debug;

use tracediff_diff::{diff_trees, BuilderConfig, ObjectTreeBuilder};
use tracediff_types::{DiffNode, DiffType, Node};
use tracediff_view::{HierarchyView, ViewOptions};

use crate::cli::*;
use crate::render;
use crate::settings::Settings;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    match cli.command {
        Command::Diff(args) => cmd_diff(args, settings.view, cli.format),
        Command::Inspect(args) => cmd_inspect(args, settings.builder, cli.format),
    }
}

fn cmd_diff(args: DiffArgs, options: ViewOptions, format: OutputFormat) -> anyhow::Result<()> {
    let new = load_node(&args.new)?;
    let tree = match &args.previous {
        Some(path) => {
            let old = load_node(path)?;
            diff_trees(&new, &old).with_context(|| {
                format!("comparing {} with {}", args.new.display(), path.display())
            })?
        }
        None => DiffNode::stamped(&new, DiffType::None),
    };

    let options = merge_view_options(options, &args);
    debug!(?options, "view options");
    let view = HierarchyView::new(options).apply(&tree);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Text => {
            print!("{}", render::render_view(&view));
            if args.previous.is_some() {
                println!("\n{}", render::summary(&tree));
            }
        }
    }
    Ok(())
}

fn cmd_inspect(args: InspectArgs, mut config: BuilderConfig, format: OutputFormat) -> anyhow::Result<()> {
    if let Some(name) = args.root_name {
        config.root_name = name;
    }
    let builder = ObjectTreeBuilder::new(config);

    let new = load_value(&args.new)?;
    let tree = match &args.previous {
        Some(path) => builder.build_diff(&new, &load_value(path)?)?,
        None => builder.build(&new)?,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tree)?),
        OutputFormat::Text => print!("{}", render::render_object(&tree)),
    }
    Ok(())
}

/// Command-line flags win over the config file; pins are added to it.
fn merge_view_options(mut options: ViewOptions, args: &DiffArgs) -> ViewOptions {
    if args.filter.is_some() {
        options.filter = args.filter.clone();
    }
    options.only_visible |= args.only_visible;
    options.flat |= args.flat;
    options.simplify_names |= args.simplify_names;
    for pin in &args.pins {
        if !options.is_pinned(pin) {
            options.pinned_ids.push(pin.clone());
        }
    }
    options
}

fn load_node(path: &Path) -> anyhow::Result<Node> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Node::from_json(&text).with_context(|| format!("parsing snapshot {}", path.display()))
}

fn load_value(path: &Path) -> anyhow::Result<Value> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing JSON {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args(pins: &[&str]) -> DiffArgs {
        DiffArgs {
            new: PathBuf::from("new.json"),
            previous: None,
            filter: None,
            only_visible: false,
            flat: true,
            simplify_names: false,
            pins: pins.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn flags_extend_config_options() {
        let from_file = ViewOptions {
            filter: Some("display".into()),
            only_visible: true,
            pinned_ids: vec!["1".into()],
            ..Default::default()
        };
        let merged = merge_view_options(from_file, &args(&["1", "7"]));
        assert_eq!(merged.filter.as_deref(), Some("display"));
        assert!(merged.only_visible);
        assert!(merged.flat);
        assert!(!merged.simplify_names);
        assert_eq!(merged.pinned_ids, vec!["1".to_string(), "7".to_string()]);
    }

    #[test]
    fn filter_flag_replaces_config_filter() {
        let mut a = args(&[]);
        a.filter = Some("nav".into());
        let merged = merge_view_options(
            ViewOptions {
                filter: Some("display".into()),
                ..Default::default()
            },
            &a,
        );
        assert_eq!(merged.filter.as_deref(), Some("nav"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_node(Path::new("/nonexistent/tracediff/snapshot.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/tracediff/snapshot.json"));
    }
}

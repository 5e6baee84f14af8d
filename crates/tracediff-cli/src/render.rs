//! Text rendering of view and property trees.

use std::fmt::Write;

use colored::{ColoredString, Colorize};

use tracediff_diff::ObjectNode;
use tracediff_types::{DiffNode, DiffType};
use tracediff_view::{ViewNode, ViewTree};

const INDENT: &str = "  ";

/// One-character marker shown in front of a tagged node.
fn marker(diff_type: DiffType) -> &'static str {
    match diff_type {
        DiffType::None => " ",
        DiffType::Modified => "~",
        DiffType::Added => "+",
        DiffType::Deleted => "-",
        DiffType::AddedMove => ">",
        DiffType::DeletedMove => "<",
    }
}

fn paint(text: &str, diff_type: DiffType) -> ColoredString {
    match diff_type {
        DiffType::None => text.normal(),
        DiffType::Modified => text.yellow(),
        DiffType::Added => text.green(),
        DiffType::Deleted => text.red(),
        DiffType::AddedMove => text.cyan(),
        DiffType::DeletedMove => text.magenta(),
    }
}

pub fn render_view(view: &ViewTree) -> String {
    let mut out = String::new();
    match &view.root {
        Some(root) => write_view_node(&mut out, root, 0),
        None => out.push_str(&format!("{}\n", "(nothing to show)".dimmed())),
    }
    if !view.pinned.is_empty() {
        let _ = writeln!(out, "\n{}", "Pinned:".bold());
        for node in &view.pinned {
            write_view_line(&mut out, node, 1);
        }
    }
    out
}

fn write_view_node(out: &mut String, node: &ViewNode, depth: usize) {
    write_view_line(out, node, depth);
    for child in &node.children {
        write_view_node(out, child, depth + 1);
    }
}

fn write_view_line(out: &mut String, node: &ViewNode, depth: usize) {
    let _ = write!(
        out,
        "{}{} {}",
        INDENT.repeat(depth),
        paint(marker(node.diff_type), node.diff_type),
        paint(&node.name, node.diff_type),
    );
    if !node.kind.is_empty() {
        let _ = write!(out, " {}", format!("({})", node.kind).dimmed());
    }
    for chip in &node.chips {
        let _ = write!(out, " {}", format!("[{chip}]").blue());
    }
    if node.diff_type.is_changed() {
        let _ = write!(out, " {}", paint(node.diff_type.as_str(), node.diff_type).bold());
    }
    out.push('\n');
}

pub fn render_object(node: &ObjectNode) -> String {
    let mut out = String::new();
    write_object_node(&mut out, node, 0);
    out
}

fn write_object_node(out: &mut String, node: &ObjectNode, depth: usize) {
    let _ = writeln!(
        out,
        "{}{} {}",
        INDENT.repeat(depth),
        paint(marker(node.diff_type), node.diff_type),
        paint(&node.name, node.diff_type),
    );
    for child in &node.children {
        write_object_node(out, child, depth + 1);
    }
}

/// Per-type counts for a diff tree, changed types only.
pub fn summary(tree: &DiffNode) -> String {
    let parts: Vec<String> = DiffType::ALL
        .iter()
        .filter(|t| t.is_changed())
        .filter_map(|&t| match tree.count(t) {
            0 => None,
            n => Some(format!("{n} {}", paint(t.as_str(), t))),
        })
        .collect();
    if parts.is_empty() {
        "No changes.".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tracediff_diff::{diff_trees, ObjectTreeBuilder};
    use tracediff_types::{Node, NodeAttributes};
    use tracediff_view::{HierarchyView, ViewOptions};

    fn plain() {
        colored::control::set_override(false);
    }

    fn node(id: &str, kind: &str, visible: bool, children: Vec<Node>) -> Node {
        Node::new(id)
            .with_attributes(NodeAttributes {
                kind: kind.into(),
                is_visible: visible,
                ..NodeAttributes::named(id)
            })
            .with_children(children)
    }

    #[test]
    fn view_lines_carry_markers_chips_and_tags() {
        plain();
        let old = node("root", "", false, vec![node("a", "Layer", true, vec![])]);
        let new = node("root", "", false, vec![node("b", "", false, vec![])]);
        let diff = diff_trees(&new, &old).unwrap();
        let text = render_view(&HierarchyView::default().apply(&diff));

        assert_eq!(
            text,
            "  root\n  - a (Layer) [V] DELETED\n  + b ADDED\n"
        );
        assert_eq!(summary(&diff), "1 ADDED, 1 DELETED");
    }

    #[test]
    fn pinned_section_is_listed_after_tree() {
        plain();
        let tree = DiffNode::stamped(&node("root", "", false, vec![node("a", "", false, vec![])]), DiffType::None);
        let view = HierarchyView::new(ViewOptions {
            pinned_ids: vec!["a".into()],
            ..Default::default()
        })
        .apply(&tree);
        let text = render_view(&view);
        assert!(text.ends_with("Pinned:\n    a\n"), "{text}");
        assert_eq!(summary(&tree), "No changes.");
    }

    #[test]
    fn object_tree_indents_children() {
        plain();
        let tree = ObjectTreeBuilder::default()
            .build_diff(&json!({"a": 2}), &json!({"a": 1}))
            .unwrap();
        let text = render_object(&tree);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "  root");
        assert_eq!(lines[1], "    a");
        assert!(lines.contains(&"    + 2"));
        assert!(lines.contains(&"    - 1"));
    }
}

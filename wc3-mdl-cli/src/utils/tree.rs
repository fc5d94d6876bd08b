//! Tree rendering for model structure visualization

use console::Style;

/// A node in the rendered tree
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub node_type: NodeType,
    pub children: Vec<TreeNode>,
    /// Key/value pairs in insertion order
    pub metadata: Vec<(String, String)>,
    pub external_refs: Vec<ExternalRef>,
}

/// Kinds of entries in a model tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Root,
    Header,
    Section,
    Entry,
    Track,
}

/// A file the model points at
#[derive(Debug, Clone)]
pub struct ExternalRef {
    pub path: String,
    pub ref_type: RefType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefType {
    Texture,
    Model,
    Replaceable,
    Unknown,
}

/// Options for tree rendering
#[derive(Debug, Clone)]
pub struct TreeOptions {
    pub max_depth: Option<usize>,
    pub show_external_refs: bool,
    pub no_color: bool,
    pub show_metadata: bool,
    pub compact: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            show_external_refs: true,
            no_color: false,
            show_metadata: true,
            compact: false,
        }
    }
}

impl TreeNode {
    pub fn new(name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            name: name.into(),
            node_type,
            children: Vec::new(),
            metadata: Vec::new(),
            external_refs: Vec::new(),
        }
    }

    pub fn add_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_metadata(mut self, key: &str, value: impl ToString) -> Self {
        self.metadata.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_external_ref(mut self, path: &str) -> Self {
        self.external_refs.push(ExternalRef {
            path: path.to_string(),
            ref_type: detect_ref_type(path),
        });
        self
    }
}

impl ExternalRef {
    pub fn icon(&self) -> &'static str {
        match self.ref_type {
            RefType::Texture => "🖼️",
            RefType::Model => "🏗️",
            RefType::Replaceable => "🎨",
            RefType::Unknown => "📁",
        }
    }

    pub fn style(&self, no_color: bool) -> Style {
        if no_color {
            Style::new()
        } else {
            match self.ref_type {
                RefType::Replaceable => Style::new().magenta(),
                RefType::Unknown => Style::new().yellow(),
                RefType::Texture | RefType::Model => Style::new().green(),
            }
        }
    }
}

impl NodeType {
    pub fn icon(&self) -> &'static str {
        match self {
            NodeType::Root => "📁",
            NodeType::Header => "📋",
            NodeType::Section => "📦",
            NodeType::Entry => "🏷️",
            NodeType::Track => "📽️",
        }
    }

    pub fn style(&self, no_color: bool) -> Style {
        if no_color {
            Style::new()
        } else {
            match self {
                NodeType::Root => Style::new().bold().cyan(),
                NodeType::Header => Style::new().bold().yellow(),
                NodeType::Section => Style::new().blue(),
                NodeType::Entry => Style::new().green(),
                NodeType::Track => Style::new().dim(),
            }
        }
    }
}

/// Render a tree structure to string
pub fn render_tree(root: &TreeNode, options: &TreeOptions) -> String {
    let mut output = String::new();
    render_node(root, &mut output, "", true, 0, options);
    output
}

fn render_node(
    node: &TreeNode,
    output: &mut String,
    prefix: &str,
    is_last: bool,
    depth: usize,
    options: &TreeOptions,
) {
    if let Some(max_depth) = options.max_depth
        && depth > max_depth
    {
        return;
    }

    let style = node.node_type.style(options.no_color);
    let connector = if depth == 0 {
        ""
    } else if is_last {
        "└── "
    } else {
        "├── "
    };

    let mut line = format!(
        "{prefix}{connector}{} {}",
        node.node_type.icon(),
        style.apply_to(&node.name)
    );

    if options.show_metadata && options.compact && !node.metadata.is_empty() {
        let parts: Vec<String> = node
            .metadata
            .iter()
            .map(|(key, value)| format!("{key}:{value}"))
            .collect();
        line.push_str(&format!(" [{}]", parts.join(", ")));
    }

    output.push_str(&line);
    output.push('\n');

    let child_prefix = if depth == 0 {
        ""
    } else if is_last {
        "    "
    } else {
        "│   "
    };
    let detail_prefix = format!("{prefix}{child_prefix}    ");

    if options.show_metadata && !options.compact {
        let meta_style = if options.no_color {
            Style::new()
        } else {
            Style::new().dim()
        };
        for (key, value) in &node.metadata {
            output.push_str(&format!(
                "{detail_prefix}{}: {value}\n",
                meta_style.apply_to(key)
            ));
        }
    }

    if options.show_external_refs {
        for ext_ref in &node.external_refs {
            output.push_str(&format!(
                "{detail_prefix}└─→ {} {}\n",
                ext_ref.icon(),
                ext_ref.style(options.no_color).apply_to(&ext_ref.path)
            ));
        }
    }

    let new_prefix = if depth == 0 {
        String::new()
    } else {
        format!("{prefix}{child_prefix}")
    };
    for (i, child) in node.children.iter().enumerate() {
        let is_last_child = i == node.children.len() - 1;
        render_node(
            child,
            output,
            &new_prefix,
            is_last_child,
            depth + 1,
            options,
        );
    }
}

/// Reference type from a path's extension
pub fn detect_ref_type(path: &str) -> RefType {
    let path_lower = path.to_lowercase();

    if path_lower.ends_with(".blp") || path_lower.ends_with(".tga") {
        RefType::Texture
    } else if path_lower.ends_with(".mdl") || path_lower.ends_with(".mdx") {
        RefType::Model
    } else if path_lower.starts_with("replaceable") {
        RefType::Replaceable
    } else {
        RefType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_rendering() {
        let root = TreeNode::new("Footman.mdl", NodeType::Root)
            .with_metadata("version", 800)
            .add_child(
                TreeNode::new("Textures", NodeType::Section).add_child(
                    TreeNode::new("Texture 0", NodeType::Entry)
                        .with_external_ref("Units\\Human\\Footman\\Footman.blp"),
                ),
            )
            .add_child(TreeNode::new("Sequences", NodeType::Section));

        let options = TreeOptions {
            no_color: true,
            ..TreeOptions::default()
        };
        let output = render_tree(&root, &options);

        assert!(output.starts_with("📁 Footman.mdl\n"));
        assert!(output.contains("    version: 800\n"));
        assert!(output.contains("├── 📦 Textures\n"));
        assert!(output.contains("│   └── 🏷️ Texture 0\n"));
        assert!(output.contains("Footman.blp"));
        assert!(output.contains("└── 📦 Sequences\n"));
    }

    #[test]
    fn test_depth_limit() {
        let root = TreeNode::new("root", NodeType::Root).add_child(
            TreeNode::new("a", NodeType::Section).add_child(TreeNode::new("b", NodeType::Entry)),
        );
        let options = TreeOptions {
            max_depth: Some(1),
            no_color: true,
            ..TreeOptions::default()
        };
        let output = render_tree(&root, &options);
        assert!(output.contains("a"));
        assert!(!output.contains("b\n"));
    }

    #[test]
    fn test_ref_type_detection() {
        assert_eq!(detect_ref_type("Footman.blp"), RefType::Texture);
        assert_eq!(detect_ref_type("Abilities\\Spells\\Heal.MDL"), RefType::Model);
        assert_eq!(detect_ref_type("ReplaceableTextures\\TeamColor\\TeamColor00"), RefType::Replaceable);
        assert_eq!(detect_ref_type("notes.txt"), RefType::Unknown);
    }
}

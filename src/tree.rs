use std::fmt::{self, Write};

/// Intermediate representation of one parsed line.
///
/// A tree has an optional root label and owns its children in source order.
/// A tree with no children and a tree with an empty child list are the same
/// thing: [`Tree::children`] returns `None` for both.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tree {
    root: Option<String>,
    children: Vec<Node>,
}

/// A child of a [`Tree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A positional token, bare or the content of a quoted literal.
    Value(String),
    /// A single-letter boolean switch, `-r`.
    Flag(char),
    /// A long named option, `--key` or `--key value`.
    Kwarg { key: String, value: Option<String> },
    Tree(Tree),
}

impl Tree {
    pub fn new(root: impl Into<String>, children: Vec<Node>) -> Tree {
        Tree { root: Some(root.into()), children }
    }

    pub fn leaf(root: impl Into<String>) -> Tree {
        Tree::new(root, Vec::new())
    }

    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn children(&self) -> Option<&[Node]> {
        if self.children.is_empty() {
            None
        } else {
            Some(&self.children)
        }
    }

    /// Children as a possibly empty slice.
    pub fn nodes(&self) -> &[Node] {
        &self.children
    }
}

impl Node {
    pub fn kwarg(key: impl Into<String>, value: Option<String>) -> Node {
        Node::Kwarg { key: key.into(), value }
    }

    /// Source-like spelling of the node, used in error messages.
    pub fn spelling(&self) -> String {
        match self {
            Node::Value(it) => it.clone(),
            Node::Flag(it) => format!("-{it}"),
            Node::Kwarg { key, value: None } => format!("--{key}"),
            Node::Kwarg { key, value: Some(value) } => format!("--{key} {value}"),
            Node::Tree(tree) => tree.root().unwrap_or_default().to_string(),
        }
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = String::new();
        write_tree(&mut buf, self, 0);
        f.write_str(buf.trim_end())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = String::new();
        write_node(&mut buf, self, 0);
        f.write_str(buf.trim_end())
    }
}

fn write_tree(buf: &mut String, tree: &Tree, indent: usize) {
    w!(buf, "{blank:indent$}Tree: {}", tree.root().unwrap_or("<anon>"), blank = "");
    write_children(buf, tree.nodes(), indent);
}

fn write_node(buf: &mut String, node: &Node, indent: usize) {
    match node {
        Node::Value(it) => w!(buf, "{blank:indent$}Value: {it}\n", blank = ""),
        Node::Flag(it) => w!(buf, "{blank:indent$}Flag: {it}\n", blank = ""),
        Node::Kwarg { key, value } => {
            w!(buf, "{blank:indent$}Kwarg: {key}", blank = "");
            let value = value.iter().map(|it| Node::Value(it.clone())).collect::<Vec<_>>();
            write_children(buf, &value, indent);
        }
        Node::Tree(tree) => write_tree(buf, tree, indent),
    }
}

fn write_children(buf: &mut String, children: &[Node], indent: usize) {
    if children.is_empty() {
        buf.push('\n');
        return;
    }
    buf.push_str(" {\n");
    for child in children {
        write_node(buf, child, indent + 4);
    }
    w!(buf, "{blank:indent$}}}\n", blank = "");
}

use crate::Memento;
use std::fmt::{self, Write};
use std::sync::OnceLock;

/// Deterministic tree serialization and structural equality for tests.
/// Not a persistence format; lines are meant for humans reading a diff.
///
/// Equivalence rules:
/// - Node names must match.
/// - Attribute sets must match; order only counts with `attribute_order`.
/// - Text must match exactly, including presence (`None` vs `Some("")`).
/// - Children must match pairwise, in order.
/// - Handle identity is never compared.
#[derive(Clone, Copy, Debug, Default)]
pub struct TreeSnapshotOptions {
    pub attribute_order: bool,
}

#[derive(Debug)]
pub struct TreeSnapshot {
    lines: Vec<String>,
}

impl TreeSnapshot {
    pub fn new(root: &Memento, options: TreeSnapshotOptions) -> Self {
        let mut lines = Vec::new();
        // (node, depth), children pushed in reverse to pop in document order.
        let mut stack = vec![(root.clone(), 0usize)];
        while let Some((node, depth)) = stack.pop() {
            let mut line = " ".repeat(depth * 2);
            write_node_line(&mut line, &node, &options);
            lines.push(line);
            if let Some(text) = node.text_data() {
                let mut line = " ".repeat((depth + 1) * 2);
                line.push('"');
                write_escaped(&mut line, &text);
                line.push('"');
                lines.push(line);
            }
            for child in node.all_children().into_iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        Self { lines }
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for TreeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i != 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct TreeMismatch {
    path: String,
    detail: String,
    expected: String,
    actual: String,
    expected_node: Memento,
    actual_node: Memento,
    options: TreeSnapshotOptions,
    expected_subtree: OnceLock<String>,
    actual_subtree: OnceLock<String>,
}

impl TreeMismatch {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl fmt::Display for TreeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expected_subtree = self
            .expected_subtree
            .get_or_init(|| TreeSnapshot::new(&self.expected_node, self.options).render());
        let actual_subtree = self
            .actual_subtree
            .get_or_init(|| TreeSnapshot::new(&self.actual_node, self.options).render());
        writeln!(f, "tree mismatch at {}: {}", self.path, self.detail)?;
        writeln!(f, "expected: {}", self.expected)?;
        writeln!(f, "actual:   {}", self.actual)?;
        writeln!(f, "expected subtree:\n{}", expected_subtree)?;
        writeln!(f, "actual subtree:\n{}", actual_subtree)?;
        Ok(())
    }
}

impl std::error::Error for TreeMismatch {}

pub fn assert_tree_eq(expected: &Memento, actual: &Memento, options: TreeSnapshotOptions) {
    if let Err(mismatch) = compare_trees(expected, actual, options) {
        panic!("{mismatch}");
    }
}

pub fn compare_trees(
    expected: &Memento,
    actual: &Memento,
    options: TreeSnapshotOptions,
) -> Result<(), Box<TreeMismatch>> {
    let mut path = vec![expected.name()];
    compare_nodes(expected, actual, &options, &mut path)
}

fn compare_nodes(
    expected: &Memento,
    actual: &Memento,
    options: &TreeSnapshotOptions,
    path: &mut Vec<String>,
) -> Result<(), Box<TreeMismatch>> {
    let fail = |detail: &str| Err(Box::new(mismatch(path, detail, expected, actual, options)));

    if expected.name() != actual.name() {
        return fail("node name");
    }
    let expected_attrs = ordered_attributes(expected, options);
    let actual_attrs = ordered_attributes(actual, options);
    if expected_attrs.len() != actual_attrs.len() {
        return fail("attribute count");
    }
    for (i, (exp, act)) in expected_attrs.iter().zip(actual_attrs.iter()).enumerate() {
        if exp.0 != act.0 {
            return fail(&format!("attribute name at index {i}"));
        }
        if exp.1 != act.1 {
            return fail(&format!("value of attribute `{}`", exp.0));
        }
    }
    if expected.text_data() != actual.text_data() {
        return fail("text");
    }

    let expected_children = expected.all_children();
    let actual_children = actual.all_children();
    if expected_children.len() != actual_children.len() {
        return fail(&format!(
            "child count (expected {}, actual {})",
            expected_children.len(),
            actual_children.len()
        ));
    }
    for (idx, (exp, act)) in expected_children.iter().zip(actual_children.iter()).enumerate() {
        path.push(format!("{}[{}]", exp.name(), idx));
        let result = compare_nodes(exp, act, options, path);
        path.pop();
        result?;
    }
    Ok(())
}

fn ordered_attributes(node: &Memento, options: &TreeSnapshotOptions) -> Vec<(String, String)> {
    let mut attributes = node.attributes();
    if !options.attribute_order {
        attributes.sort();
    }
    attributes
}

fn mismatch(
    path: &[String],
    detail: &str,
    expected: &Memento,
    actual: &Memento,
    options: &TreeSnapshotOptions,
) -> TreeMismatch {
    let mut expected_line = String::new();
    write_node_line(&mut expected_line, expected, options);
    let mut actual_line = String::new();
    write_node_line(&mut actual_line, actual, options);
    TreeMismatch {
        path: format!("/{}", path.join("/")),
        detail: detail.to_string(),
        expected: truncate_line(expected_line, 160),
        actual: truncate_line(actual_line, 160),
        expected_node: expected.clone(),
        actual_node: actual.clone(),
        options: *options,
        expected_subtree: OnceLock::new(),
        actual_subtree: OnceLock::new(),
    }
}

fn truncate_line(mut line: String, max_len: usize) -> String {
    if line.len() > max_len {
        let mut cut = max_len.saturating_sub(3);
        while !line.is_char_boundary(cut) {
            cut -= 1;
        }
        line.truncate(cut);
        line.push_str("...");
    }
    line
}

fn write_node_line(out: &mut String, node: &Memento, options: &TreeSnapshotOptions) {
    out.push('<');
    out.push_str(&node.name());
    for (key, value) in ordered_attributes(node, options) {
        out.push(' ');
        out.push_str(&key);
        out.push_str("=\"");
        write_escaped(out, &value);
        out.push('"');
    }
    out.push('>');
}

fn write_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ if ch.is_ascii() => out.push(ch),
            _ => {
                let _ = write!(out, "\\u{{{:X}}}", ch as u32);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TreeSnapshot, TreeSnapshotOptions, assert_tree_eq, compare_trees};
    use crate::Memento;

    fn sample(text: &str) -> Memento {
        let root = Memento::new_root("config");
        root.put_string("version", "2");
        root.put_string("mode", "fast");
        let user = root.create_child("user");
        user.put_string("name", "ada");
        user.put_text_data(text);
        root
    }

    #[test]
    fn snapshot_lines_are_indented_and_escaped() {
        let snapshot = TreeSnapshot::new(&sample("hi\n"), TreeSnapshotOptions::default());
        assert_eq!(
            snapshot.as_lines(),
            [
                "<config mode=\"fast\" version=\"2\">",
                "  <user name=\"ada\">",
                "    \"hi\\n\"",
            ]
        );
    }

    #[test]
    fn equal_trees_compare_equal_regardless_of_identity() {
        assert_tree_eq(&sample("a"), &sample("a"), TreeSnapshotOptions::default());
    }

    #[test]
    fn attribute_order_only_counts_when_requested() {
        let a = Memento::new_root("n");
        a.put_string("x", "1");
        a.put_string("y", "2");
        let b = Memento::new_root("n");
        b.put_string("y", "2");
        b.put_string("x", "1");
        assert!(compare_trees(&a, &b, TreeSnapshotOptions::default()).is_ok());
        let strict = TreeSnapshotOptions {
            attribute_order: true,
        };
        assert!(compare_trees(&a, &b, strict).is_err());
    }

    #[test]
    fn mismatch_points_to_text() {
        let err = compare_trees(&sample("a"), &sample("b"), TreeSnapshotOptions::default())
            .expect_err("expected mismatch");
        assert_eq!(err.path(), "/config/user[0]");
        assert_eq!(err.detail(), "text");
        assert!(err.to_string().contains("expected subtree"));
    }

    #[test]
    fn missing_text_differs_from_empty_text() {
        let a = Memento::new_root("n");
        let b = Memento::new_root("n");
        b.put_text_data("");
        let err = compare_trees(&a, &b, TreeSnapshotOptions::default()).unwrap_err();
        assert_eq!(err.detail(), "text");
    }
}

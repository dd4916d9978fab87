//! Textual grammar codec: deterministic rendering and the line-oriented
//! parser accepting exactly what the renderer emits.

use std::fs;
use std::path::Path;

use crate::errors::{ErrorInfo, GenError};
use crate::tree::ConfigTree;
use crate::value::{Entry, Scalar};

impl ConfigTree {
    /// Renders the tree in its textual grammar.
    ///
    /// Keys are emitted in lexicographic order, indented two spaces per
    /// nesting level. Nested nodes open with `key = {` and close with
    /// `};`; leaves render as `key = <literal>;`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        render_node(self, &mut out);
        out
    }

    /// Parses text in the grammar [`ConfigTree::render`] emits.
    ///
    /// Also accepts the aggregate spelling that places a colon before the
    /// opening brace, which is normalized to the primary form. Inline
    /// `#` comments and blank lines are skipped. Any line that matches no
    /// expected shape aborts the parse with [`GenError::Parse`].
    pub fn parse(text: &str) -> Result<ConfigTree, GenError> {
        // Aggregates in simulator-emitted files spell `key : \n{`.
        let canonical = text.replace(": \n", "= ");
        let mut tree = ConfigTree::new();
        let mut stack: Vec<String> = Vec::new();

        for raw in canonical.lines() {
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            if let Some(head) = line.strip_suffix('{') {
                let head = head.trim_end();
                let key = head
                    .strip_suffix('=')
                    .or_else(|| head.strip_suffix(':'))
                    .map(str::trim_end)
                    .unwrap_or("");
                if key.is_empty() {
                    return Err(malformed("scope-open", raw));
                }
                stack.push(key.to_string());
            } else if line == "};" {
                if stack.pop().is_none() {
                    return Err(malformed("scope-underflow", raw));
                }
            } else if let Some(stmt) = line.strip_suffix(';') {
                let Some((key, literal)) = stmt.split_once('=') else {
                    return Err(malformed("missing-assignment", raw));
                };
                let key = key.trim();
                let scalar = parse_literal(literal.trim(), raw)?;
                let path = if stack.is_empty() {
                    key.to_string()
                } else {
                    format!("{}.{}", stack.join("."), key)
                };
                tree.set(&path, scalar)?;
            } else {
                return Err(malformed("missing-terminator", raw));
            }
        }

        if !stack.is_empty() {
            return Err(GenError::Parse(
                ErrorInfo::new("scope-unterminated", "scope still open at end of input")
                    .with_context("scope", stack.join(".")),
            ));
        }
        Ok(tree)
    }

    /// Reads and parses a config file.
    pub fn from_file(path: &Path) -> Result<ConfigTree, GenError> {
        let text = fs::read_to_string(path).map_err(|err| wrap_io("config-read", path, &err))?;
        ConfigTree::parse(&text)
    }

    /// Renders the tree to `path`, atomically.
    ///
    /// Content lands in a sibling temp file first and is renamed into
    /// place, so a failure never leaves a partially written config.
    pub fn write_file(&self, path: &Path) -> Result<(), GenError> {
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            return Err(GenError::Io(
                ErrorInfo::new("config-path", "config path has no file name")
                    .with_context("path", path.display().to_string()),
            ));
        };
        let staging = path.with_file_name(format!("{name}.tmp"));
        fs::write(&staging, self.render()).map_err(|err| wrap_io("config-stage", &staging, &err))?;
        fs::rename(&staging, path).map_err(|err| wrap_io("config-commit", path, &err))?;
        Ok(())
    }
}

fn render_node(node: &ConfigTree, out: &mut String) {
    let prefix = "  ".repeat(node.level);
    for (key, entry) in &node.entries {
        match entry {
            Entry::Node(child) => {
                out.push_str(&format!("{prefix}{key} = {{\n"));
                render_node(child, out);
                out.push_str(&format!("{prefix}}};\n"));
            }
            Entry::Leaf(scalar) => {
                out.push_str(&format!("{prefix}{key} = {scalar};\n"));
            }
        }
    }
}

fn parse_literal(literal: &str, line: &str) -> Result<Scalar, GenError> {
    if literal.len() >= 2 && literal.starts_with('"') && literal.ends_with('"') {
        return Ok(Scalar::Str(literal[1..literal.len() - 1].to_string()));
    }
    match literal {
        "true" | "True" => return Ok(Scalar::Bool(true)),
        "false" | "False" => return Ok(Scalar::Bool(false)),
        _ => {}
    }
    if let Some(digits) = literal.strip_suffix('L') {
        if let Ok(value) = digits.parse::<i64>() {
            return Ok(Scalar::wide_int(value));
        }
    } else if numeric_shape(literal) {
        if let Ok(value) = literal.parse::<i64>() {
            return Ok(Scalar::int(value));
        }
        if let Ok(value) = literal.parse::<f64>() {
            return Ok(Scalar::Float(value));
        }
    }
    Err(malformed("bad-literal", line))
}

/// Guards the float fallback against `f64::from_str` accepting words
/// like `inf` and `NaN`, which the grammar never produces.
fn numeric_shape(literal: &str) -> bool {
    !literal.is_empty()
        && literal
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
}

fn malformed(code: &str, line: &str) -> GenError {
    GenError::Parse(
        ErrorInfo::new(code, "line matches no expected grammar shape").with_context("line", line),
    )
}

fn wrap_io(code: &str, path: &Path, err: &std::io::Error) -> GenError {
    GenError::Io(
        ErrorInfo::new(code, "config file access failed")
            .with_context("path", path.display().to_string())
            .with_hint(err.to_string()),
    )
}

//! Directive-based template engine (spec.md §4.H).
//!
//! A small from-scratch engine rather than a general scripting language:
//! `%if`/`%elif`/`%else`/`%endif`, `%for`/`%endfor`, `%--` comments, and
//! `{{expr|filter}}` interpolation over a `.tmpl` source string. Grounded on
//! the teacher's `template/` module (`.ptpl` files, the same directive set),
//! condensed into one parse-then-render pass since this schema's templates
//! are far smaller than the teacher's C# surface. Rhai is dropped entirely
//! (see DESIGN.md) — every helper the templates need is a plain Rust
//! function in [`super::helpers`], called to build the [`Context`] before
//! rendering, not invoked from inside the template language itself.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::CompileError;

use super::helpers;

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Str(s) => !s.is_empty(),
            Value::List(l) => !l.is_empty(),
            Value::Map(_) => true,
        }
    }

    fn field(&self, name: &str) -> Value {
        match self {
            Value::Map(m) => m.get(name).cloned().unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, ""),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::List(_) | Value::Map(_) => write!(f, ""),
        }
    }
}

/// Builder-friendly wrapper: every generator builds one of these per
/// top-level template invocation.
#[derive(Debug, Clone, Default)]
pub struct Context(BTreeMap<String, Value>);

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.0.insert(key.into(), value);
        self
    }
}

#[derive(Debug, Clone)]
enum Node {
    Text(String),
    Interp { path: String, filter: Option<String> },
    If {
        branches: Vec<(String, Vec<Node>)>,
        else_branch: Vec<Node>,
    },
    For {
        var: String,
        iterable: String,
        body: Vec<Node>,
    },
}

/// Parses and renders `source` against `root`. Template text is read from an
/// `include_str!`-embedded `.tmpl` file at each generator's call site.
pub fn render(source: &str, root: &Context) -> Result<String, CompileError> {
    let lines: Vec<&str> = source.lines().collect();
    let mut pos = 0usize;
    let nodes = parse_block(&lines, &mut pos, None)?;
    let mut scopes: Vec<BTreeMap<String, Value>> = vec![root.0.clone()];
    let mut out = String::new();
    render_nodes(&nodes, &mut scopes, &mut out)?;
    Ok(out)
}

fn parse_block(
    lines: &[&str],
    pos: &mut usize,
    terminator: Option<&[&str]>,
) -> Result<Vec<Node>, CompileError> {
    let mut nodes = Vec::new();
    while *pos < lines.len() {
        let raw = lines[*pos];
        let trimmed = raw.trim_start();
        if let Some(terms) = terminator {
            if terms.iter().any(|t| trimmed.starts_with(t)) {
                return Ok(nodes);
            }
        }
        if let Some(directive) = trimmed.strip_prefix('%') {
            let directive = directive.trim();
            if directive.starts_with("--") {
                *pos += 1;
                continue;
            }
            if let Some(cond) = directive.strip_prefix("if ") {
                *pos += 1;
                let (branches, else_branch) = parse_if(lines, pos, cond.trim().to_string())?;
                nodes.push(Node::If { branches, else_branch });
                continue;
            }
            if let Some(rest) = directive.strip_prefix("for ") {
                *pos += 1;
                let (var, iterable) = split_for(rest)?;
                let body = parse_block(lines, pos, Some(&["%endfor"]))?;
                *pos += 1; // consume %endfor
                nodes.push(Node::For { var, iterable, body });
                continue;
            }
            return Err(CompileError::Generator(format!(
                "unexpected template directive '%{directive}'"
            )));
        }
        nodes.extend(parse_text_line(raw));
        *pos += 1;
    }
    Ok(nodes)
}

fn parse_if(
    lines: &[&str],
    pos: &mut usize,
    first_cond: String,
) -> Result<(Vec<(String, Vec<Node>)>, Vec<Node>), CompileError> {
    let mut branches = Vec::new();
    let mut cond = first_cond;
    loop {
        let body = parse_block(lines, pos, Some(&["%elif", "%else", "%endif"]))?;
        branches.push((cond.clone(), body));
        let trimmed = lines[*pos].trim_start();
        if let Some(rest) = trimmed.strip_prefix("%elif ") {
            cond = rest.trim().to_string();
            *pos += 1;
            continue;
        }
        if trimmed.starts_with("%else") {
            *pos += 1;
            let else_branch = parse_block(lines, pos, Some(&["%endif"]))?;
            *pos += 1; // consume %endif
            return Ok((branches, else_branch));
        }
        if trimmed.starts_with("%endif") {
            *pos += 1;
            return Ok((branches, Vec::new()));
        }
        return Err(CompileError::Generator("unterminated %if".to_string()));
    }
}

fn split_for(rest: &str) -> Result<(String, String), CompileError> {
    let mut parts = rest.splitn(2, " in ");
    let var = parts
        .next()
        .ok_or_else(|| CompileError::Generator("malformed %for".to_string()))?
        .trim()
        .to_string();
    let iterable = parts
        .next()
        .ok_or_else(|| CompileError::Generator("%for missing 'in'".to_string()))?
        .trim()
        .to_string();
    Ok((var, iterable))
}

fn parse_text_line(raw: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut rest = raw;
    while let Some(start) = rest.find("{{") {
        if start > 0 {
            nodes.push(Node::Text(rest[..start].to_string()));
        }
        let after = &rest[start + 2..];
        let end = after.find("}}").unwrap_or(after.len());
        let expr = after[..end].trim();
        let (path, filter) = match expr.split_once('|') {
            Some((p, f)) => (p.trim().to_string(), Some(f.trim().to_string())),
            None => (expr.to_string(), None),
        };
        nodes.push(Node::Interp { path, filter });
        rest = &after[end.min(after.len())..];
        rest = rest.strip_prefix("}}").unwrap_or(rest);
    }
    nodes.push(Node::Text(rest.to_string()));
    nodes.push(Node::Text("\n".to_string()));
    nodes
}

fn render_nodes(
    nodes: &[Node],
    scopes: &mut Vec<BTreeMap<String, Value>>,
    out: &mut String,
) -> Result<(), CompileError> {
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Interp { path, filter } => {
                let value = resolve_path(&*scopes, path);
                let value = match filter {
                    Some(f) => helpers::apply_filter(f, &value)?,
                    None => value,
                };
                out.push_str(&value.to_string());
            }
            Node::If { branches, else_branch } => {
                let mut matched = false;
                for (cond, body) in branches {
                    if resolve_path(&*scopes, cond).truthy() {
                        render_nodes(body, scopes, out)?;
                        matched = true;
                        break;
                    }
                }
                if !matched {
                    render_nodes(else_branch, scopes, out)?;
                }
            }
            Node::For { var, iterable, body } => {
                let list = resolve_path(&*scopes, iterable);
                let Value::List(items) = list else {
                    continue;
                };
                for item in items {
                    let mut scope = BTreeMap::new();
                    scope.insert(var.clone(), item);
                    scopes.push(scope);
                    render_nodes(body, scopes, out)?;
                    scopes.pop();
                }
            }
        }
    }
    Ok(())
}

fn resolve_path(scopes: &[BTreeMap<String, Value>], path: &str) -> Value {
    let mut parts = path.split('.');
    let head = match parts.next() {
        Some(h) => h,
        None => return Value::Null,
    };
    let mut value = scopes
        .iter()
        .rev()
        .find_map(|scope| scope.get(head))
        .cloned()
        .unwrap_or(Value::Null);
    for part in parts {
        value = value.field(part);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_simple_value() {
        let mut ctx = Context::new();
        ctx.set("name", Value::Str("World".to_string()));
        let out = render("Hello, {{name}}!", &ctx).unwrap();
        assert_eq!(out, "Hello, World!\n");
    }

    #[test]
    fn renders_for_loop() {
        let mut ctx = Context::new();
        ctx.set(
            "items",
            Value::List(vec![Value::Str("a".into()), Value::Str("b".into())]),
        );
        let src = "%for item in items\n- {{item}}\n%endfor";
        let out = render(src, &ctx).unwrap();
        assert_eq!(out, "- a\n- b\n");
    }

    #[test]
    fn renders_if_else() {
        let mut ctx = Context::new();
        ctx.set("flag", Value::Bool(false));
        let src = "%if flag\nyes\n%else\nno\n%endif";
        let out = render(src, &ctx).unwrap();
        assert_eq!(out, "no\n");
    }

    #[test]
    fn applies_filter() {
        let mut ctx = Context::new();
        ctx.set("name", Value::Str("machine_owner".to_string()));
        let out = render("{{name|pascal_case}}", &ctx).unwrap();
        assert_eq!(out, "MachineOwner\n");
    }
}

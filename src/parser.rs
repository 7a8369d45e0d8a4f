//! Lexer + parser (spec.md §4.A, §4.B).
//!
//! `pest`'s grammar (`schema.pest`) realizes both components in one pass:
//! its atomic rules (`ident`, `int_lit`, `string_lit`, `line_comment`,
//! `block_comment`) are the lexer (component A); its composite rules
//! (`model_def`, `field_def`, ...) are the parser (component B). This
//! mirrors the teacher's own `Polygen` grammar + `ast_parser` tree-builder
//! split, generalized to this schema's grammar (spec.md §4.B, §6).

use pest::iterators::Pair;
use pest::Parser as _;
use pest_derive::Parser as DeriveParser;

use crate::ast::*;
use crate::error::{CompileError, Position};
use crate::path_template;

#[derive(DeriveParser)]
#[grammar = "schema.pest"]
struct SchemaGrammar;

/// Parses one schema source text into an [`AstFile`].
pub fn parse(source: &str) -> Result<AstFile, CompileError> {
    let mut pairs = SchemaGrammar::parse(Rule::file, source).map_err(|e| syntax_error(e))?;
    let file_pair = pairs.next().expect("file rule always produces one pair");

    let mut items = Vec::new();
    let mut pending_comment = CommentAccumulator::new();
    for pair in file_pair.into_inner() {
        match pair.as_rule() {
            Rule::top_level_item => {
                let inner_pair = pair.into_inner().next().unwrap();
                if pending_comment.take_if_comment(&inner_pair) {
                    continue;
                }
                let comment =
                    std::mem::replace(&mut pending_comment, CommentAccumulator::new()).finish();
                let mut item = parse_top_level_item(inner_pair)?;
                item.comment = comment;
                items.push(item);
            }
            Rule::EOI => {}
            other => unreachable(other),
        }
    }
    Ok(AstFile { items })
}

fn syntax_error(e: pest::error::Error<Rule>) -> CompileError {
    let (line, col) = match e.line_col {
        pest::error::LineColLocation::Pos((l, c)) => (l, c),
        pest::error::LineColLocation::Span((l, c), _) => (l, c),
    };
    CompileError::Syntax {
        pos: Position { line, col },
        expected: "a valid declaration".to_string(),
        found: e.variant.message().to_string(),
    }
}

fn pos_of(pair: &Pair<Rule>) -> Position {
    let (line, col) = pair.line_col();
    Position { line, col }
}

fn unreachable(rule: Rule) -> ! {
    panic!("grammar produced unexpected rule {rule:?} — schema.pest and parser.rs disagree")
}

/// Peels comment tokens off the front of an iterator, folding consecutive
/// `///`-ish lines into one attached comment string (spec.md §9, "Comment
/// attachment").
struct CommentAccumulator {
    lines: Vec<String>,
}

impl CommentAccumulator {
    fn new() -> Self {
        Self { lines: Vec::new() }
    }

    fn take_if_comment(&mut self, pair: &Pair<Rule>) -> bool {
        match pair.as_rule() {
            Rule::line_comment => {
                let text = pair.as_str().trim_start_matches('/');
                self.lines.push(text.strip_prefix(' ').unwrap_or(text).to_string());
                true
            }
            Rule::block_comment => {
                let text = pair
                    .as_str()
                    .trim_start_matches("/*")
                    .trim_end_matches("*/");
                for line in text.lines() {
                    let line = line.trim_start().trim_start_matches('*').trim_start();
                    self.lines.push(line.to_string());
                }
                true
            }
            _ => false,
        }
    }

    fn finish(self) -> Option<String> {
        if self.lines.is_empty() {
            None
        } else {
            Some(self.lines.join("\n").trim().to_string())
        }
    }
}

fn parse_top_level_item(pair: Pair<Rule>) -> Result<AstItem, CompileError> {
    let pos = pos_of(&pair);
    let kind = match pair.as_rule() {
        Rule::model_def => AstItemKind::Model(parse_model(pair)?),
        Rule::struct_def => AstItemKind::Struct(parse_struct(pair)?),
        Rule::interface_def => AstItemKind::Interface(parse_interface(pair)?),
        Rule::enum_def => AstItemKind::Enum(parse_enum(pair)?),
        Rule::option_def => AstItemKind::Option(parse_option(pair)?),
        other => unreachable(other),
    };
    Ok(AstItem {
        comment: None,
        pos,
        kind,
    })
}

fn parse_model(pair: Pair<Rule>) -> Result<AstModel, CompileError> {
    let mut inner = pair.into_inner();
    let name = inner.next().unwrap().as_str().to_string();
    let path_pair = inner.next().unwrap();
    let path = parse_path_template(path_pair)?;

    let mut implements = Vec::new();
    let mut elements = Vec::new();
    let mut pending_comment = CommentAccumulator::new();

    for p in inner {
        match p.as_rule() {
            Rule::implements_clause => {
                implements = parse_implements(p);
            }
            Rule::model_member => {
                let member_pair = p.into_inner().next().unwrap();
                if pending_comment.take_if_comment(&member_pair) {
                    continue;
                }
                let comment = std::mem::replace(&mut pending_comment, CommentAccumulator::new()).finish();
                match member_pair.as_rule() {
                    Rule::option_def => {
                        elements.push(AstModelElement::Option(parse_option(member_pair)?));
                    }
                    Rule::field_def => {
                        elements.push(AstModelElement::Field(parse_field(member_pair, comment)?));
                    }
                    other => unreachable(other),
                }
            }
            other => unreachable(other),
        }
    }

    Ok(AstModel {
        name,
        path,
        implements,
        elements,
    })
}

fn parse_struct(pair: Pair<Rule>) -> Result<AstStruct, CompileError> {
    let mut inner = pair.into_inner();
    let name = inner.next().unwrap().as_str().to_string();

    let mut implements = Vec::new();
    let mut fields = Vec::new();
    let mut pending_comment = CommentAccumulator::new();

    for p in inner {
        match p.as_rule() {
            Rule::implements_clause => implements = parse_implements(p),
            Rule::struct_member => {
                let member_pair = p.into_inner().next().unwrap();
                if pending_comment.take_if_comment(&member_pair) {
                    continue;
                }
                let comment = std::mem::replace(&mut pending_comment, CommentAccumulator::new()).finish();
                fields.push(parse_field(member_pair, comment)?);
            }
            other => unreachable(other),
        }
    }

    Ok(AstStruct {
        name,
        implements,
        fields,
    })
}

fn parse_interface(pair: Pair<Rule>) -> Result<AstInterface, CompileError> {
    let mut inner = pair.into_inner();
    let name = inner.next().unwrap().as_str().to_string();
    let mut fields = Vec::new();
    let mut pending_comment = CommentAccumulator::new();

    for p in inner {
        match p.as_rule() {
            Rule::interface_member => {
                let member_pair = p.into_inner().next().unwrap();
                if pending_comment.take_if_comment(&member_pair) {
                    continue;
                }
                let comment = std::mem::replace(&mut pending_comment, CommentAccumulator::new()).finish();
                fields.push(parse_field(member_pair, comment)?);
            }
            other => unreachable(other),
        }
    }

    Ok(AstInterface { name, fields })
}

fn parse_enum(pair: Pair<Rule>) -> Result<AstEnum, CompileError> {
    let mut inner = pair.into_inner();
    let name = inner.next().unwrap().as_str().to_string();
    let mut values = Vec::new();
    let mut pending_comment = CommentAccumulator::new();

    for p in inner {
        match p.as_rule() {
            Rule::enum_member => {
                let member_pair = p.into_inner().next().unwrap();
                if pending_comment.take_if_comment(&member_pair) {
                    continue;
                }
                let comment = std::mem::replace(&mut pending_comment, CommentAccumulator::new()).finish();
                values.push(parse_enum_value(member_pair, comment)?);
            }
            other => unreachable(other),
        }
    }

    Ok(AstEnum { name, values })
}

fn parse_enum_value(pair: Pair<Rule>, comment: Option<String>) -> Result<AstEnumValue, CompileError> {
    let mut inner = pair.into_inner();
    let name = inner.next().unwrap().as_str().to_string();
    let associated_value = match inner.next() {
        Some(type_ref_pair) => Some(parse_type_ref(type_ref_pair)),
        None => None,
    };
    Ok(AstEnumValue {
        comment,
        name,
        associated_value,
    })
}

fn parse_implements(pair: Pair<Rule>) -> Vec<String> {
    pair.into_inner().map(|p| p.as_str().to_string()).collect()
}

fn parse_field(pair: Pair<Rule>, comment: Option<String>) -> Result<AstField, CompileError> {
    let pos = pos_of(&pair);
    let mut inner = pair.into_inner();
    let type_ref = parse_type_ref(inner.next().unwrap());
    let name = inner.next().unwrap().as_str().to_string();
    Ok(AstField {
        comment,
        type_ref,
        name,
        pos,
    })
}

fn parse_type_ref(pair: Pair<Rule>) -> AstTypeRef {
    let pos = pos_of(&pair);
    let mut inner = pair.into_inner();
    let base = inner.next().unwrap().as_str().to_string();
    let inner_ref = inner.next().map(|p| Box::new(parse_type_ref(p)));
    AstTypeRef {
        base,
        inner: inner_ref,
        pos,
    }
}

fn parse_option(pair: Pair<Rule>) -> Result<AstOption, CompileError> {
    let pos = pos_of(&pair);
    let mut inner = pair.into_inner();
    let namespace = inner.next().unwrap().as_str().to_string();
    let key = inner.next().unwrap().as_str().to_string();
    let value_pair = inner.next().unwrap();
    let value = parse_literal(value_pair)?;
    Ok(AstOption {
        namespace,
        key,
        value,
        pos,
    })
}

fn parse_literal(pair: Pair<Rule>) -> Result<AstLiteral, CompileError> {
    let text = pair.as_str();
    let inner = pair.into_inner().next();
    let literal = match inner {
        Some(p) if p.as_rule() == Rule::string_lit => AstLiteral::String(unquote(p.as_str())),
        Some(p) if p.as_rule() == Rule::int_lit => {
            AstLiteral::Int(p.as_str().parse().expect("int_lit is digit-only"))
        }
        _ => match text {
            "true" => AstLiteral::Bool(true),
            "false" => AstLiteral::Bool(false),
            "null" => AstLiteral::Null,
            other => panic!("grammar produced unexpected option value '{other}'"),
        },
    };
    Ok(literal)
}

fn parse_path_template(pair: Pair<Rule>) -> Result<AstPathTemplate, CompileError> {
    let pos = pos_of(&pair);
    let raw = pair.as_str();
    let pattern = unquote(raw);
    let parts = path_template::parse_at(&pattern, pos)
        .map_err(|(e, _)| CompileError::Schema(e))?;
    Ok(AstPathTemplate {
        pattern,
        parts,
        pos,
    })
}

fn unquote(raw: &str) -> String {
    if let Some(stripped) = raw.strip_prefix("r\"") {
        stripped.trim_end_matches('"').to_string()
    } else {
        raw.trim_matches('"')
            .replace("\\\"", "\"")
            .replace("\\\\", "\\")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_empty_file() {
        let ast = parse("").unwrap();
        assert!(ast.items.is_empty());
    }

    #[test]
    fn parses_empty_model() {
        let ast = parse(r#"model Empty: "/empties/{empty_id}" {}"#).unwrap();
        assert_eq!(ast.items.len(), 1);
        match &ast.items[0].kind {
            AstItemKind::Model(m) => {
                assert_eq!(m.name, "Empty");
                assert_eq!(m.path.parts.len(), 1);
                assert!(m.elements.is_empty());
            }
            other => panic!("expected model, got {other:?}"),
        }
    }

    #[test]
    fn parses_field_with_generic_reference() {
        let src = r#"
            model Machine: "/machines/{machine_id}" {
                reference<Operator> owner;
                array<string> tags;
                map untyped_map;
            }
        "#;
        let ast = parse(src).unwrap();
        let AstItemKind::Model(m) = &ast.items[0].kind else {
            panic!("expected model")
        };
        assert_eq!(m.elements.len(), 3);
    }

    #[test]
    fn parses_doc_comment_attachment() {
        let src = r#"
            /// A widget.
            struct Widget {
                /// the name
                string name;
            }
        "#;
        let ast = parse(src).unwrap();
        assert_eq!(ast.items[0].comment.as_deref(), Some("A widget."));
        let AstItemKind::Struct(s) = &ast.items[0].kind else {
            panic!("expected struct")
        };
        assert_eq!(s.fields[0].comment.as_deref(), Some("the name"));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse("model : {}").is_err());
    }

    #[test]
    fn parses_enum_with_payload() {
        let src = r#"
            struct ComputerOnState { integer brightness; }
            enum Computer {
                off,
                on(ComputerOnState),
            }
        "#;
        let ast = parse(src).unwrap();
        let AstItemKind::Enum(e) = &ast.items[1].kind else {
            panic!("expected enum")
        };
        assert_eq!(e.values[1].name, "on");
        assert!(e.values[1].associated_value.is_some());
    }
}

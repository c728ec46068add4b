#![allow(clippy::unwrap_used)]

use jsonast::{
    Ast, CommentType, Dialect, ErrorKind, NodeId, NodeKind, ParseOptions, StaticValue,
    TokenOrComment, TokenType, TokenizeOptions, Visitor, parse, parse_for_eslint, static_value,
    tokenize, traverse_nodes,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn options(dialect: Dialect) -> ParseOptions {
    ParseOptions {
        dialect: Some(dialect),
        ..ParseOptions::default()
    }
}

fn value_of(source: &str, dialect: Dialect) -> anyhow::Result<serde_json::Value> {
    let ast = parse(source, &options(dialect))?;
    Ok(static_value(&ast)?.to_json())
}

#[test]
fn strict_json_object() -> anyhow::Result<()> {
    assert_eq!(value_of(r#"{"a":1}"#, Dialect::Json)?, json!({ "a": 1 }));
    Ok(())
}

/// Every number as an `f64`, so integers and floats with the same value compare equal.
fn as_doubles(value: serde_json::Value) -> serde_json::Value {
    use serde_json::Value;

    match value {
        Value::Number(n) => n
            .as_f64()
            .and_then(serde_json::Number::from_f64)
            .map_or(Value::Null, Value::Number),
        Value::Array(items) => Value::Array(items.into_iter().map(as_doubles).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, as_doubles(value)))
                .collect(),
        ),
        other => other,
    }
}

#[test]
fn strict_json_values_match_a_json_decoder() -> anyhow::Result<()> {
    let corpus = [
        "null",
        "true",
        r#""plain""#,
        r#""esc \" \\ \/ \b \f \n \r \t \u00e9 \u2028""#,
        r#""\ud83d\ude00 and \u00ff""#,
        r#""héllo wörld 😀""#,
        "0",
        "-0",
        "1e3",
        "-2.5E-3",
        "1.5e+10",
        "123456789",
        "9007199254740991",
        "-9007199254740991",
        "12345678901234567890",
        "0.1",
        "[]",
        "{}",
        "[1, [2, [3, [4, []]]]]",
        r#"{"a": {"b": {"c": [true, false, null]}}}"#,
        r#"[{"x": 1}, {"y": [{"z": "w"}]}]"#,
        r#"{"a": 1, "b": 2, "a": 3}"#,
        r#"{"": "", " ": [" "]}"#,
        " \n\t {\"k\" : [ 1 , 2 ] } \r\n",
    ];
    for source in corpus {
        let ours = as_doubles(value_of(source, Dialect::Json)?);
        let decoded = as_doubles(serde_json::from_str(source)?);
        assert_eq!(ours, decoded, "{source}");
    }
    Ok(())
}

#[test]
fn deep_nesting_is_an_error_not_a_crash() -> anyhow::Result<()> {
    let depth = 10_000;
    let source = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
    let error = parse(&source, &options(Dialect::Json)).unwrap_err();
    assert_eq!(error.message(), "Maximum nesting depth exceeded");
    assert_eq!(error.index, 128);

    let source = format!("{}1{}", "{\"a\":".repeat(depth), "}".repeat(depth));
    assert!(parse(&source, &options(Dialect::Json)).is_err());

    let source = format!("{}{}", "[".repeat(100), "]".repeat(100));
    let ast = parse(&source, &options(Dialect::Json))?;
    let mut ranges = Ranges::default();
    traverse_nodes(&ast, ast.root(), &mut ranges);
    assert_eq!(ranges.max_depth, 102);
    serde_json::to_string(&ast)?;
    let mut expected = json!([]);
    for _ in 1..100 {
        expected = json!([expected]);
    }
    assert_eq!(static_value(&ast)?.to_json(), expected);
    Ok(())
}

#[test]
fn json5_accepts_unquoted_keys_and_trailing_commas() -> anyhow::Result<()> {
    assert_eq!(value_of("{a: 1,}", Dialect::Json5)?, json!({ "a": 1 }));
    Ok(())
}

#[test]
fn json_rejects_trailing_comma_and_unquoted_key() {
    let error = parse(r#"{"a": 1,}"#, &options(Dialect::Json)).unwrap_err();
    assert_eq!(error.kind, ErrorKind::UnexpectedToken(",".into()));
    assert_eq!(error.index, 7);

    // The key is complete before the comma is reached.
    let error = parse("{a: 1,}", &options(Dialect::Json)).unwrap_err();
    assert_eq!(error.message(), "Unexpected identifier 'a'.");
    assert_eq!(error.index, 1);
}

#[test]
fn json5_rejects_binary_numbers() {
    let error = parse("0b1", &options(Dialect::Json5)).unwrap_err();
    assert_eq!(error.message(), "Unexpected binary numeric literal.");
    assert_eq!(error.index, 0);
}

#[test]
fn jsonc_records_comments() -> anyhow::Result<()> {
    let ast = parse("// c\n1", &options(Dialect::Jsonc))?;
    assert_eq!(static_value(&ast)?.to_json(), json!(1));
    assert_eq!(ast.comments.len(), 1);
    assert_eq!(ast.comments[0].comment_type, CommentType::Line);
    assert_eq!(ast.comments[0].value, " c");
    Ok(())
}

#[test]
fn empty_input() {
    for dialect in Dialect::ALL {
        let error = parse("", &options(dialect)).unwrap_err();
        assert_eq!(error.kind, ErrorKind::EmptyInput);
        assert_eq!((error.index, error.line_number, error.column), (0, 1, 1));
    }
}

#[test]
fn wider_dialects_accept_what_narrower_ones_do() {
    let samples = [
        r#"{"a": [1, 2.5, -3e2, true, null, "s"]}"#,
        "{\"a\": 1, // c\n}",
        "/* c */ [1,]",
        "{a: 'b', c: +1, d: .5, e: 0x1F, f: Infinity, g: -NaN}",
        "'multi\\\nline'",
        "[1,,2]",
        "{1: 2}",
        "[1n, /re/u, `t`, undefined, 0o7, 0b1, 1_000, 017]",
        "- 1",
        "[1 2]",
        "(1)",
    ];
    for source in samples {
        for narrow in Dialect::ALL {
            for wide in Dialect::ALL {
                if !wide.syntax_context().includes(&narrow.syntax_context()) {
                    continue;
                }
                if parse(source, &options(narrow)).is_ok() {
                    assert!(
                        parse(source, &options(wide)).is_ok(),
                        "{source:?} passes {narrow} but fails {wide}"
                    );
                }
            }
        }
    }
}

#[derive(Default)]
struct Ranges {
    visited: Vec<(NodeId, Option<NodeId>)>,
    depth: usize,
    max_depth: usize,
}

impl Visitor for Ranges {
    fn enter_node(&mut self, _ast: &Ast, node: NodeId, parent: Option<NodeId>) {
        self.visited.push((node, parent));
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
    }

    fn leave_node(&mut self, _ast: &Ast, _node: NodeId, _parent: Option<NodeId>) {
        self.depth -= 1;
    }
}

#[test]
fn child_ranges_nest_inside_their_parents() -> anyhow::Result<()> {
    let source = "  {\"a\": [1, {\"b\": -2}], c: `x`} // end\n";
    let ast = parse(source, &ParseOptions::default())?;
    let root = ast.root();
    assert_eq!(ast[root].range.start, 0);
    assert_eq!(ast[root].range.end, source.len());

    let mut ranges = Ranges::default();
    traverse_nodes(&ast, root, &mut ranges);
    assert_eq!(ranges.visited.len(), ast.len());
    assert_eq!(ranges.depth, 0);
    assert_eq!(ranges.visited[0], (root, None));
    for &(node, parent) in &ranges.visited {
        let Some(parent) = parent else { continue };
        assert_eq!(ast.parent(node), Some(parent));
        let (outer, inner) = (ast[parent].range, ast[node].range);
        assert!(outer.start <= inner.start && inner.end <= outer.end);
    }

    let tokens = &ast.tokens;
    assert!(tokens.windows(2).all(|pair| pair[0].range.end <= pair[1].range.start));
    let expression = ast.expression().unwrap();
    assert_eq!(ast[expression].range.start, 2);
    Ok(())
}

#[test]
fn duplicate_keys_keep_the_last_value_in_the_first_position() -> anyhow::Result<()> {
    let ast = parse(r#"{"a": 1, "b": 2, "a": 3}"#, &options(Dialect::Json))?;
    let StaticValue::Object(object) = static_value(&ast)? else {
        panic!("expected an object");
    };
    let keys: Vec<_> = object.keys().map(String::as_str).collect();
    assert_eq!(keys, ["a", "b"]);
    assert_eq!(object["a"], StaticValue::Number(3.0));
    Ok(())
}

#[test]
fn sparse_arrays_keep_their_holes() -> anyhow::Result<()> {
    let ast = parse("[1,,2]", &ParseOptions::default())?;
    let expression = ast.expression().unwrap();
    let NodeKind::ArrayExpression { elements } = &ast[expression].kind else {
        panic!("expected an array");
    };
    assert_eq!(elements.len(), 3);
    assert!(elements[1].is_none());
    assert_eq!(static_value(&ast)?.to_json(), json!([1, null, 2]));

    let serialized = serde_json::to_value(ast.node_ref(expression))?;
    assert_eq!(serialized["elements"][1], serde_json::Value::Null);
    Ok(())
}

#[test]
fn permissive_values() -> anyhow::Result<()> {
    let source = "[1n, /a+/g, `x`, -Infinity, NaN, undefined, +1, 0x10, {1e21: 'big', 0b11: 3}]";
    assert_eq!(
        value_of(source, Dialect::Default)?,
        json!(["1", "/a+/g", "x", null, null, null, 1, 16, { "1e+21": "big", "3": 3 }])
    );
    Ok(())
}

#[test]
fn json5_rejects_templates() {
    let error = parse("[`x`]", &options(Dialect::Json5)).unwrap_err();
    assert_eq!(error.message(), "Unexpected template literal.");
    assert_eq!(error.index, 1);
}

#[test]
fn spaced_signs_need_the_flag() -> anyhow::Result<()> {
    let error = parse("- 1", &options(Dialect::Json)).unwrap_err();
    assert_eq!(error.kind, ErrorKind::UnexpectedWhitespace);
    assert_eq!(error.index, 1);
    assert_eq!(value_of("- 1", Dialect::Json5)?, json!(-1));
    Ok(())
}

#[test]
fn helper_predicates() -> anyhow::Result<()> {
    let ast = parse("{NaN: NaN, undefined: undefined}", &ParseOptions::default())?;
    let expression = ast.expression().unwrap();
    let NodeKind::ObjectExpression { properties } = &ast[expression].kind else {
        panic!("expected an object");
    };
    let NodeKind::Property { key, value } = ast[properties[0]].kind else {
        panic!("expected a property");
    };
    assert!(!ast.is_expression(key));
    assert!(!ast.is_number_identifier(key));
    assert!(ast.is_number_identifier(value));
    let NodeKind::Property { key, value } = ast[properties[1]].kind else {
        panic!("expected a property");
    };
    assert!(!ast.is_undefined_identifier(key));
    assert!(ast.is_undefined_identifier(value));
    assert!(ast.is_expression(expression));
    Ok(())
}

#[test]
fn templates_cover_their_backquotes() -> anyhow::Result<()> {
    let ast = parse("`ab`", &ParseOptions::default())?;
    let expression = ast.expression().unwrap();
    let NodeKind::TemplateLiteral { quasi } = ast[expression].kind else {
        panic!("expected a template");
    };
    assert_eq!((ast[quasi].range.start, ast[quasi].range.end), (0, 4));
    assert_eq!(ast.tokens.len(), 1);
    assert_eq!(ast.tokens[0].token_type, TokenType::Template);
    assert_eq!(ast.tokens[0].value, "`ab`");
    Ok(())
}

#[test]
fn estree_shape() -> anyhow::Result<()> {
    let ast = parse("-1", &ParseOptions::default())?;
    let expression = ast.expression().unwrap();
    let text = serde_json::to_string(&ast.node_ref(expression))?;
    insta::assert_snapshot!(text, @r#"{"type":"JSONUnaryExpression","operator":"-","prefix":true,"argument":{"type":"JSONLiteral","value":1,"raw":"1","range":[1,2],"loc":{"start":{"line":1,"column":1},"end":{"line":1,"column":2}}},"range":[0,2],"loc":{"start":{"line":1,"column":0},"end":{"line":1,"column":2}}}"#);

    let program = serde_json::to_value(&ast)?;
    assert_eq!(program["type"], "Program");
    assert_eq!(program["body"][0]["type"], "JSONExpressionStatement");
    assert_eq!(program["tokens"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[test]
fn host_adapter_result() -> anyhow::Result<()> {
    let result = parse_for_eslint("{\"a\": 1}", &ParseOptions::default())?;
    assert!(result.services.is_json);
    assert_eq!(result.visitor_keys["JSONProperty"], ["key", "value"]);
    let serialized = serde_json::to_value(&result)?;
    assert_eq!(serialized["services"], json!({ "isJSON": true }));
    Ok(())
}

#[test]
fn tokenize_interleaves_comments() -> anyhow::Result<()> {
    let source = "// c\n[1 /* x */]";
    let mut tokenize_options = TokenizeOptions {
        parse: options(Dialect::Jsonc),
        include_comments: true,
    };
    let items = tokenize(source, &tokenize_options)?;
    let kinds: Vec<_> = items
        .iter()
        .map(|item| match item {
            TokenOrComment::Token(token) => token.value.clone(),
            TokenOrComment::Comment(comment) => format!("{:?}", comment.comment_type),
        })
        .collect();
    assert_eq!(kinds, ["Line", "[", "1", "Block", "]"]);

    tokenize_options.include_comments = false;
    assert_eq!(tokenize(source, &tokenize_options)?.len(), 3);

    tokenize_options.parse.dialect = Some(Dialect::Json);
    let error = tokenize(source, &tokenize_options).unwrap_err();
    assert_eq!(error.kind, ErrorKind::UnexpectedComment);
    Ok(())
}

#[test]
fn tokenize_rejects_parentheses() {
    let error = tokenize("(1)", &TokenizeOptions::default()).unwrap_err();
    assert_eq!(error.kind, ErrorKind::UnexpectedToken("(".into()));
    assert_eq!(error.index, 0);
}

#![allow(clippy::unwrap_used)]

use jsonast::{Dialect, ParseError, ParseOptions, parse};
use pretty_assertions::assert_eq;

struct Case {
    code: &'static str,
    message: &'static str,
    line_number: usize,
    column: usize,
    index: usize,
    ch: char,
}

fn parse_error(code: &str, dialect: Option<Dialect>) -> ParseError {
    let options = ParseOptions {
        dialect,
        file_path: Some("test.json".into()),
        ..ParseOptions::default()
    };
    match parse(code, &options) {
        Ok(_) => panic!("expected {code:?} to fail"),
        Err(error) => error,
    }
}

fn check(cases: &[Case], dialect: Option<Dialect>) {
    for case in cases {
        let error = parse_error(case.code, dialect);
        let actual = (
            error.message(),
            error.line_number,
            error.column,
            error.index,
            case.code[error.index..].chars().next(),
        );
        let expected = (
            case.message.to_string(),
            case.line_number,
            case.column,
            case.index,
            Some(case.ch),
        );
        assert_eq!(actual, expected, "{:?}", case.code);
    }
}

#[test]
fn default_dialect_rejects_non_data_syntax() {
    let cases = [
        Case {
            code: "\n{\n  a: }\n}",
            message: "Unexpected token '}'.",
            line_number: 3,
            column: 6,
            index: 8,
            ch: '}',
        },
        Case {
            code: "/*empty*/",
            message: "Expected to be an expression, but got empty.",
            line_number: 1,
            column: 1,
            index: 0,
            ch: '/',
        },
        Case {
            code: "\n{foo}\n",
            message: "Expected token ':'.",
            line_number: 2,
            column: 5,
            index: 5,
            ch: '}',
        },
        Case {
            code: "\n...spread\n",
            message: "Unexpected token '...'.",
            line_number: 2,
            column: 1,
            index: 1,
            ch: '.',
        },
        Case {
            code: "\n{},{}\n",
            message: "Unexpected sequence expression.",
            line_number: 2,
            column: 1,
            index: 1,
            ch: '{',
        },
        Case {
            code: "\n{a: b}\n",
            message: "Unexpected identifier 'b'.",
            line_number: 2,
            column: 5,
            index: 5,
            ch: 'b',
        },
        Case {
            code: "\n{...spread}\n",
            message: "Unexpected token '...'.",
            line_number: 2,
            column: 2,
            index: 2,
            ch: '.',
        },
        Case {
            code: "\n{[\"computed\"]: \"b\"}\n",
            message: "Unexpected token '['.",
            line_number: 2,
            column: 2,
            index: 2,
            ch: '[',
        },
        Case {
            code: "\n{method(){}}\n",
            message: "Unexpected token '('.",
            line_number: 2,
            column: 8,
            index: 8,
            ch: '(',
        },
        Case {
            code: "\n{foo,bar}\n",
            message: "Expected token ':'.",
            line_number: 2,
            column: 5,
            index: 5,
            ch: ',',
        },
        Case {
            code: "\n{get foo(){}}\n",
            message: "Unexpected token '('.",
            line_number: 2,
            column: 9,
            index: 9,
            ch: '(',
        },
        Case {
            code: "\n{set foo(p){}}\n",
            message: "Unexpected token '('.",
            line_number: 2,
            column: 9,
            index: 9,
            ch: '(',
        },
        Case {
            code: "\n[('a')]\n",
            message: "Unexpected token '('.",
            line_number: 2,
            column: 2,
            index: 2,
            ch: '(',
        },
        Case {
            code: "\n['a'+'b']\n",
            message: "Unexpected binary expression.",
            line_number: 2,
            column: 2,
            index: 2,
            ch: '\'',
        },
        Case {
            code: "\n[call()]\n",
            message: "Unexpected token '('.",
            line_number: 2,
            column: 6,
            index: 6,
            ch: '(',
        },
        Case {
            code: "\nfoo\n",
            message: "Unexpected identifier 'foo'.",
            line_number: 2,
            column: 1,
            index: 1,
            ch: 'f',
        },
        Case {
            code: "\n[foo]\n",
            message: "Unexpected identifier 'foo'.",
            line_number: 2,
            column: 2,
            index: 2,
            ch: 'f',
        },
        Case {
            code: "\n42,\n",
            message: "Unexpected token ','.",
            line_number: 2,
            column: 3,
            index: 3,
            ch: ',',
        },
        Case {
            code: "\ntypeof 123\n",
            message: "Unexpected unary expression.",
            line_number: 2,
            column: 1,
            index: 1,
            ch: 't',
        },
        Case {
            code: "\n+a\n",
            message: "Unexpected identifier 'a'.",
            line_number: 2,
            column: 2,
            index: 2,
            ch: 'a',
        },
        Case {
            code: "\n+\"str\"\n",
            message: "Unexpected string literal.",
            line_number: 2,
            column: 2,
            index: 2,
            ch: '"',
        },
        Case {
            code: "\n+(+1)\n",
            message: "Unexpected token '('.",
            line_number: 2,
            column: 2,
            index: 2,
            ch: '(',
        },
        Case {
            code: "\n`${''}`\n",
            message: "Unexpected token '${'.",
            line_number: 2,
            column: 2,
            index: 2,
            ch: '$',
        },
        Case {
            code: "\n`a${''}b`\n",
            message: "Unexpected token '${'.",
            line_number: 2,
            column: 3,
            index: 3,
            ch: '$',
        },
        Case {
            code: "\n-undefined\n",
            message: "Unexpected identifier 'undefined'.",
            line_number: 2,
            column: 2,
            index: 2,
            ch: 'u',
        },
        Case {
            code: "\n+undefined\n",
            message: "Unexpected identifier 'undefined'.",
            line_number: 2,
            column: 2,
            index: 2,
            ch: 'u',
        },
    ];
    check(&cases, None);
}

#[test]
fn json_rejects_every_extension() {
    let cases = [
        Case {
            code: "/**/1",
            message: "Unexpected comment.",
            line_number: 1,
            column: 1,
            index: 0,
            ch: '/',
        },
        Case {
            code: "[1,]",
            message: "Unexpected token ','.",
            line_number: 1,
            column: 3,
            index: 2,
            ch: ',',
        },
        Case {
            code: r#"{"foo": "bar",}"#,
            message: "Unexpected token ','.",
            line_number: 1,
            column: 14,
            index: 13,
            ch: ',',
        },
        Case {
            code: r#"{"foo": "bar"/**/}"#,
            message: "Unexpected comment.",
            line_number: 1,
            column: 14,
            index: 13,
            ch: '/',
        },
        Case {
            code: r#"{"foo": 1_2_3}"#,
            message: "Unexpected token '_'.",
            line_number: 1,
            column: 10,
            index: 9,
            ch: '_',
        },
        Case {
            code: r#"{"\u{31}":"foo"}"#,
            message: "Unexpected unicode codepoint escape.",
            line_number: 1,
            column: 2,
            index: 1,
            ch: '"',
        },
        Case {
            code: r#"{"foo": "\u{31}"}"#,
            message: "Unexpected unicode codepoint escape.",
            line_number: 1,
            column: 9,
            index: 8,
            ch: '"',
        },
        Case {
            code: r#"{"foo": "___\u{1}"}"#,
            message: "Unexpected unicode codepoint escape.",
            line_number: 1,
            column: 9,
            index: 8,
            ch: '"',
        },
        Case {
            code: r#"{a\u{31}:"foo"}"#,
            message: "Unexpected escape sequence.",
            line_number: 1,
            column: 2,
            index: 1,
            ch: 'a',
        },
        Case {
            code: "0b1",
            message: "Unexpected binary numeric literal.",
            line_number: 1,
            column: 1,
            index: 0,
            ch: '0',
        },
        Case {
            code: "0o1",
            message: "Unexpected octal numeric literal.",
            line_number: 1,
            column: 1,
            index: 0,
            ch: '0',
        },
        Case {
            code: "(42)",
            message: "Unexpected token '('.",
            line_number: 1,
            column: 1,
            index: 0,
            ch: '(',
        },
        Case {
            code: "[('a')]",
            message: "Unexpected token '('.",
            line_number: 1,
            column: 2,
            index: 1,
            ch: '(',
        },
        Case {
            code: "42+1",
            message: "Unexpected binary expression.",
            line_number: 1,
            column: 1,
            index: 0,
            ch: '4',
        },
        Case {
            code: "{\"a\": 1} x",
            message: "Unexpected token 'x'.",
            line_number: 1,
            column: 10,
            index: 9,
            ch: 'x',
        },
    ];
    check(&cases, Some(Dialect::Json));
}

#[test]
fn jsonc_rejects_json5_extensions() {
    let cases = [
        Case {
            code: "+1",
            message: "Unexpected token '+'.",
            line_number: 1,
            column: 1,
            index: 0,
            ch: '+',
        },
        Case {
            code: "- 1",
            message: "Unexpected whitespace.",
            line_number: 1,
            column: 2,
            index: 1,
            ch: ' ',
        },
        Case {
            code: ".1",
            message: "Unexpected token '.'.",
            line_number: 1,
            column: 1,
            index: 0,
            ch: '.',
        },
        Case {
            code: "1.",
            message: "Unexpected token '.'.",
            line_number: 1,
            column: 2,
            index: 1,
            ch: '.',
        },
        Case {
            code: "NaN",
            message: "Unexpected identifier 'NaN'.",
            line_number: 1,
            column: 1,
            index: 0,
            ch: 'N',
        },
        Case {
            code: "Infinity",
            message: "Unexpected identifier 'Infinity'.",
            line_number: 1,
            column: 1,
            index: 0,
            ch: 'I',
        },
        Case {
            code: "0x123",
            message: "Invalid number 0x123.",
            line_number: 1,
            column: 1,
            index: 0,
            ch: '0',
        },
        Case {
            code: "\"Line 1 \\\nLine 2\"",
            message: "Unexpected multiline string.",
            line_number: 1,
            column: 1,
            index: 0,
            ch: '"',
        },
        Case {
            code: r#"{a: "b"}"#,
            message: "Unexpected identifier 'a'.",
            line_number: 1,
            column: 2,
            index: 1,
            ch: 'a',
        },
        Case {
            code: r#"{"a": 'b'}"#,
            message: "Unexpected single quoted.",
            line_number: 1,
            column: 7,
            index: 6,
            ch: '\'',
        },
        Case {
            code: r#"{"\u{31}":"foo"}"#,
            message: "Unexpected unicode codepoint escape.",
            line_number: 1,
            column: 2,
            index: 1,
            ch: '"',
        },
        Case {
            code: r#"{"foo": "\u{31}"}"#,
            message: "Unexpected unicode codepoint escape.",
            line_number: 1,
            column: 9,
            index: 8,
            ch: '"',
        },
        // The escaped identifier is rejected as it completes, before it is checked as a key,
        // so this matches the same input under JSON.
        Case {
            code: r#"{a\u{31}:"foo"}"#,
            message: "Unexpected escape sequence.",
            line_number: 1,
            column: 2,
            index: 1,
            ch: 'a',
        },
        Case {
            code: "0b1",
            message: "Unexpected binary numeric literal.",
            line_number: 1,
            column: 1,
            index: 0,
            ch: '0',
        },
        Case {
            code: "0o1",
            message: "Unexpected octal numeric literal.",
            line_number: 1,
            column: 1,
            index: 0,
            ch: '0',
        },
    ];
    check(&cases, Some(Dialect::Jsonc));
}

#[test]
fn json5_rejects_permissive_values() {
    let cases = [
        Case {
            code: "{1:2}",
            message: "Unexpected number literal.",
            line_number: 1,
            column: 2,
            index: 1,
            ch: '1',
        },
        Case {
            code: "undefined",
            message: "Unexpected identifier 'undefined'.",
            line_number: 1,
            column: 1,
            index: 0,
            ch: 'u',
        },
        Case {
            code: "[1,,3]",
            message: "Unexpected token ','.",
            line_number: 1,
            column: 3,
            index: 2,
            ch: ',',
        },
        Case {
            code: "[,2,3]",
            message: "Unexpected token ','.",
            line_number: 1,
            column: 2,
            index: 1,
            ch: ',',
        },
        Case {
            code: "[1,,]",
            message: "Unexpected token ','.",
            line_number: 1,
            column: 3,
            index: 2,
            ch: ',',
        },
        Case {
            code: "/reg/",
            message: "Unexpected regex literal.",
            line_number: 1,
            column: 1,
            index: 0,
            ch: '/',
        },
        Case {
            code: "`tmp`",
            message: "Unexpected template literal.",
            line_number: 1,
            column: 1,
            index: 0,
            ch: '`',
        },
        Case {
            code: "1n",
            message: "Unexpected bigint literal.",
            line_number: 1,
            column: 1,
            index: 0,
            ch: '1',
        },
    ];
    check(&cases, Some(Dialect::Json5));
}

#[test]
fn end_of_input_inside_a_value() {
    // Running out of input blames the last token read.
    let error = parse_error("{\"a\": ", Some(Dialect::Json));
    assert_eq!(error.message(), "Unexpected token ':'.");
    assert_eq!(error.index, 4);

    let error = parse_error("\"abc", Some(Dialect::Json));
    assert_eq!(error.message(), "Unterminated string constant");
    assert_eq!(error.index, 0);
}

#[test]
fn diagnostics_render_with_the_source() {
    let source = "[1,,2]";
    let error = parse_error(source, Some(Dialect::Json5));
    assert_eq!(error.message(), "Unexpected token ','.");
    assert_eq!(error.index, 2);
    let diagnostic = error.with_source("data.json5", source);
    assert_eq!(diagnostic.to_string(), "Unexpected token ','.");
}

#[test]
fn columns_count_characters() {
    // The emoji takes four bytes but one column.
    let error = parse_error("\"😀\" x", Some(Dialect::Json));
    assert_eq!(error.message(), "Unexpected token 'x'.");
    assert_eq!((error.index, error.column), (7, 5));
}

//! End-to-end tests for the text → text rewrite pipeline.

use std::io::Write;

use dearrow::{parse_source, rewrite_source, rewrite_source_with, Error, RewriteOptions};

#[test]
fn simple_arrow_becomes_bound_function() {
    let out = rewrite_source("x => x + 1").unwrap();
    assert_eq!(
        out,
        "(function (x) { return ko.unwrap(x + 1); }).bind(this)()"
    );
}

#[test]
fn empty_parameter_list_is_preserved() {
    let out = rewrite_source("() => items.length").unwrap();
    assert_eq!(
        out,
        "(function () { return ko.unwrap(items.length); }).bind(this)()"
    );
}

#[test]
fn arrow_free_input_is_unchanged() {
    assert_eq!(rewrite_source("items().length").unwrap(), "items().length");
}

#[test]
fn missing_arrow_body_is_a_parse_error() {
    let err = rewrite_source("x =>").unwrap_err();
    let Error::Parse {
        source_text,
        diagnostics,
    } = err
    else {
        panic!("expected a parse error");
    };
    assert_eq!(source_text, "x =>");
    assert!(!diagnostics.is_empty());
}

#[test]
fn nested_arrows_are_fully_eliminated() {
    let out = rewrite_source("x => y => x + y").unwrap();
    insta::assert_snapshot!(
        out,
        @"(function (x) { return ko.unwrap((function (y) { return ko.unwrap(x + y); }).bind(this)()); }).bind(this)()"
    );
    // Re-parsing the output must find zero arrow shapes: rewriting it again
    // changes nothing.
    assert_eq!(rewrite_source(&out).unwrap(), out);
}

#[test]
fn rewriting_is_idempotent_on_output() {
    for source in [
        "x => x + 1",
        "() => items.length",
        "items.filter(item => item.active())",
        "{ click: e => dismiss(e), attr: { title: tip } }",
    ] {
        let once = rewrite_source(source).unwrap();
        let twice = rewrite_source(&once).unwrap();
        assert_eq!(once, twice, "second rewrite of {:?} changed output", source);
    }
}

#[test]
fn output_reparses_cleanly() {
    for source in [
        "x => x + 1",
        "(a, b) => a * b - 1",
        "x => { log(x); return x; }",
        "list.map(x => x.label)",
    ] {
        let out = rewrite_source(source).unwrap();
        parse_source(&out).unwrap_or_else(|_| panic!("output failed to re-parse: {}", out));
    }
}

#[test]
fn arrow_free_inputs_keep_their_shape() {
    for source in [
        "name",
        "items().length > 0 ? 'some' : 'none'",
        "{ text: fullName, visible: isVisible }",
        "[first, second, third()]",
        "!enabled || busy()",
    ] {
        let before = parse_source(source).unwrap();
        let after = parse_source(&rewrite_source(source).unwrap()).unwrap();
        assert!(
            before.same_shape(&after),
            "rewrite changed an arrow-free tree for {:?}",
            source
        );
    }
}

#[test]
fn block_bodied_arrow_is_bound_without_unwrap() {
    let out = rewrite_source("x => { seen(x); return x * 2; }").unwrap();
    insta::assert_snapshot!(
        out,
        @"(function (x) { seen(x); return x * 2; }).bind(this)()"
    );
}

#[test]
fn custom_unwrap_path_is_used() {
    let options = RewriteOptions::new("bridge.peek").unwrap();
    let out = rewrite_source_with("v => v", &options).unwrap();
    assert_eq!(
        out,
        "(function (v) { return bridge.peek(v); }).bind(this)()"
    );
}

#[test]
fn arrows_inside_binding_objects_are_rewritten() {
    let out =
        rewrite_source("{ text: () => name(), visible: x => x > 0 }").unwrap();
    assert!(!out.contains("=>"), "arrows remain in output: {}", out);
    assert!(out.contains("ko.unwrap(name())"), "got: {}", out);
}

#[test]
fn statement_sequences_are_supported() {
    let out = rewrite_source("prime(); x => x").unwrap();
    assert_eq!(
        out,
        "prime(); (function (x) { return ko.unwrap(x); }).bind(this)()"
    );
}

#[test]
fn rewrite_from_file_round_trips() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "item => item.price * qty()").unwrap();
    let text = std::fs::read_to_string(file.path()).unwrap();
    let out = rewrite_source(text.trim_end()).unwrap();
    assert_eq!(
        out,
        "(function (item) { return ko.unwrap(item.price * qty()); }).bind(this)()"
    );
}

//! End-to-end render tests: template source in, rendered output out.
//!
//! Rendering walks the compiled line list with the map-backed evaluator
//! from the testing module; expression semantics beyond lookup and block
//! iteration are out of scope by design.

use lamina::lamina::testing::MapEvaluator;
use lamina::{Compiler, CompiledTemplate, RenderError};

fn compile(source: &str) -> CompiledTemplate {
    Compiler::new().compile(source, "Ctx").expect("compile failed")
}

#[test]
fn renders_static_markup() {
    let template = compile("%ul\n  %li\n    hi\nbye");
    assert_eq!(
        template.render(&mut MapEvaluator::new()),
        Ok("<ul>\n  <li>\n    hi\n  </li>\n</ul>\nbye".to_string())
    );
}

#[test]
fn escapes_text_but_not_markup() {
    let template = compile("%p\n  a & b < c");
    assert_eq!(
        template.render(&mut MapEvaluator::new()),
        Ok("<p>\n  a &amp; b &lt; c\n</p>".to_string())
    );
}

#[test]
fn fused_one_liner_renders_without_indentation_duplication() {
    let template = compile("%ul\n  %li hi");
    assert_eq!(
        template.render(&mut MapEvaluator::new()),
        Ok("<ul>\n  <li>hi</li>\n</ul>".to_string())
    );
}

#[test]
fn inline_code_renders_through_the_evaluator() {
    let template = compile("%h1= page.title");
    let mut evaluator = MapEvaluator::new().with("page.title", "Welcome");
    assert_eq!(
        template.render(&mut evaluator),
        Ok("<h1>Welcome</h1>".to_string())
    );
}

#[test]
fn attribute_expressions_interpolate() {
    let template = compile("%a href={user.url} visit");
    let mut evaluator = MapEvaluator::new().with("user.url", "/home");
    assert_eq!(
        template.render(&mut evaluator),
        Ok("<a href=\"/home\">visit</a>".to_string())
    );
}

#[test]
fn text_interpolation_is_escaped_with_the_text() {
    let template = compile("%p\n  hi ${user.name}");
    let mut evaluator = MapEvaluator::new().with("user.name", "<Ada>");
    assert_eq!(
        template.render(&mut evaluator),
        Ok("<p>\n  hi &lt;Ada&gt;\n</p>".to_string())
    );
}

#[test]
fn silent_block_iterates_nested_lines() {
    let template = compile("%ul\n  - items\n    %li= it\n%p done");
    let mut evaluator = MapEvaluator::new().with("items", "a,b");
    assert_eq!(
        template.render(&mut evaluator),
        Ok("<ul>\n    <li>a</li>\n    <li>b</li>\n</ul>\n<p>done</p>".to_string())
    );
}

#[test]
fn silent_block_with_empty_collection_renders_nothing() {
    let template = compile("%ul\n  - items\n    %li= it");
    let mut evaluator = MapEvaluator::new().with("items", "");
    assert_eq!(
        template.render(&mut evaluator),
        Ok("<ul>\n</ul>".to_string())
    );
}

#[test]
fn code_block_appends_its_converted_result() {
    let template = compile("= box\n  inner");
    let mut evaluator = MapEvaluator::new().with("box", "once");
    assert_eq!(
        template.render(&mut evaluator),
        Ok("  inner\nonce".to_string())
    );
}

#[test]
fn silent_inline_code_evaluates_for_effect_only() {
    let template = compile("- audit.touch()\n%p ok");
    let mut evaluator = MapEvaluator::new().with("audit.touch()", "ignored");
    assert_eq!(template.render(&mut evaluator), Ok("<p>ok</p>".to_string()));
}

#[test]
fn doctype_renders_verbatim() {
    let template = compile("!!! 5\n%html");
    assert_eq!(
        template.render(&mut MapEvaluator::new()),
        Ok("<!DOCTYPE html>\n<html></html>".to_string())
    );
}

#[test]
fn comment_renders_unescaped() {
    let template = compile("/ a & b");
    assert_eq!(
        template.render(&mut MapEvaluator::new()),
        Ok("<!-- a & b -->".to_string())
    );
}

#[test]
fn unknown_expression_surfaces_the_evaluator_error() {
    let template = compile("%p= missing");
    assert_eq!(
        template.render(&mut MapEvaluator::new()),
        Err(RenderError::evaluation("missing", "unknown expression"))
    );
}

#[test]
fn rendering_twice_from_one_template_is_stable() {
    let template = compile("%ul\n  - items\n    %li= it");
    let mut evaluator = MapEvaluator::new().with("items", "x,y");
    let first = template.render(&mut evaluator);
    let second = template.render(&mut evaluator);
    assert_eq!(first, second);
}

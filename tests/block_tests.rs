use mkdown::{to_html, to_html_with_options, Options};
use pretty_assertions::assert_eq;

fn html(input: &str) -> String {
    to_html(input)
}

#[test]
fn empty_input() {
    assert_eq!(html(""), "");
    assert_eq!(html("\n\n"), "");
}

#[test]
fn paragraphs_split_on_blank_lines() {
    assert_eq!(html("one\ntwo\n\nthree"), "<p>one two</p>\n<p>three</p>\n");
}

#[test]
fn atx_headings() {
    assert_eq!(html("# One\n## Two"), "<h1>One</h1>\n<h2>Two</h2>\n");
    assert_eq!(html("#nospace"), "<p>#nospace</p>\n");
}

#[test]
fn underline_headings() {
    assert_eq!(html("Title\n====="), "<h1>Title</h1>\n");
    assert_eq!(html("Sub\n---"), "<h2>Sub</h2>\n");
}

#[test]
fn rule_after_blank_line() {
    assert_eq!(html("a\n\n---\nb"), "<p>a</p>\n<hr>\n<p>b</p>\n");
    assert_eq!(html("* * *"), "<hr>\n");
}

#[test]
fn tight_list_closes_before_paragraph() {
    assert_eq!(
        html("- one\n- two\n\nafter"),
        "<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n<p>after</p>\n"
    );
}

#[test]
fn loose_list_wraps_items_in_paragraphs() {
    assert_eq!(
        html("- one\n\n- two"),
        "<ul>\n<li>\n<p>one</p>\n</li>\n<li>\n<p>two</p>\n</li>\n</ul>\n"
    );
}

#[test]
fn ordered_list() {
    assert_eq!(html("1. one\n2. two"), "<ol>\n<li>one</li>\n<li>two</li>\n</ol>\n");
}

#[test]
fn marker_kind_switch_starts_new_list() {
    assert_eq!(
        html("- a\n1. b"),
        "<ul>\n<li>a</li>\n</ul>\n<ol>\n<li>b</li>\n</ol>\n"
    );
}

#[test]
fn nested_list() {
    assert_eq!(
        html("- a\n    - b\n- c"),
        "<ul>\n<li>a\n<ul>\n<li>b</li>\n</ul>\n</li>\n<li>c</li>\n</ul>\n"
    );
}

#[test]
fn list_item_follow_on_line() {
    assert_eq!(html("- first\n  second"), "<ul>\n<li>first second</li>\n</ul>\n");
}

#[test]
fn blockquote() {
    assert_eq!(html("> a\n> b"), "<blockquote>\n<p>a b</p>\n</blockquote>\n");
}

#[test]
fn lazy_blockquote_continuation() {
    assert_eq!(html("> quoted\nlazy"), "<blockquote>\n<p>quoted lazy</p>\n</blockquote>\n");
}

#[test]
fn nested_blockquote() {
    assert_eq!(
        html("> > deep"),
        "<blockquote>\n<blockquote>\n<p>deep</p>\n</blockquote>\n</blockquote>\n"
    );
}

#[test]
fn indented_code_keeps_blank_lines() {
    assert_eq!(
        html("    a < b\n\n    c\n\nafter"),
        "<pre><code>a &lt; b\n\nc\n</code></pre>\n<p>after</p>\n"
    );
}

#[test]
fn indented_line_continues_paragraph() {
    assert_eq!(html("para\n    more"), "<p>para more</p>\n");
}

#[test]
fn fenced_code_is_not_parsed() {
    assert_eq!(
        html("```\n*not emphasis*\n```"),
        "<pre><code>*not emphasis*\n</code></pre>\n"
    );
}

#[test]
fn fenced_code_info_string() {
    assert_eq!(
        html("~~~python extra\nprint(1)\n~~~"),
        "<pre><code class=\"language-python\">print(1)\n</code></pre>\n"
    );
}

#[test]
fn html_block_passthrough() {
    assert_eq!(html("<div>\n*raw*\n</div>\n\ntext"), "<div>\n*raw*\n</div>\n<p>text</p>\n");
}

#[test]
fn html_block_disabled() {
    let options = Options {
        allow_html: false,
        ..Options::default()
    };
    assert_eq!(to_html_with_options("<div>x</div>", &options), "<p>&lt;div&gt;x&lt;/div&gt;</p>\n");
}

#[test]
fn inline_html_is_escaped() {
    assert_eq!(html("<span>inline</span>"), "<p>&lt;span&gt;inline&lt;/span&gt;</p>\n");
}

#[test]
fn hard_breaks() {
    assert_eq!(html("a  \nb"), "<p>a<br>\nb</p>\n");
    assert_eq!(html("a\\\nb"), "<p>a<br>\nb</p>\n");
}

#[test]
fn trailing_backslash_at_block_end_is_kept() {
    assert_eq!(html("foo\\"), "<p>foo\\</p>\n");
    assert_eq!(html("\\"), "<p>\\</p>\n");
    assert_eq!(html("foo\\\n\nbar"), "<p>foo\\</p>\n<p>bar</p>\n");
}

#[test]
fn blockquote_inside_list_item() {
    assert_eq!(
        html("- a\n    > q"),
        "<ul>\n<li>a\n<blockquote>\n<p>q</p>\n</blockquote>\n</li>\n</ul>\n"
    );
    assert_eq!(
        html("- a\n\n    > q"),
        "<ul>\n<li>\n<p>a</p>\n<blockquote>\n<p>q</p>\n</blockquote>\n</li>\n</ul>\n"
    );
}

#[test]
fn quoted_fence_closes_on_unquoted_line() {
    assert_eq!(
        html("> ```\n> x\n\ny"),
        "<blockquote>\n<pre><code>x\n</code></pre>\n</blockquote>\n<p>y</p>\n"
    );
}

#[test]
fn indented_rule_after_text_continues_paragraph() {
    assert_eq!(html("foo\n    ---"), "<p>foo ---</p>\n");
}

#[test]
fn link_definitions_produce_no_output() {
    assert_eq!(html("[home]: https://example.com\n\ntext"), "<p>text</p>\n");
}

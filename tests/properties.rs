use mkdown::escape::escape_text_keep_entities_into;
use mkdown::{render, to_html, Options, OutputFormat};
use proptest::prelude::*;

fn escape(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    escape_text_keep_entities_into(&mut out, input);
    out
}

fn entity_text() -> impl Strategy<Value = String> {
    let token = prop_oneof![
        "[a-zA-Z]{1,8}",
        Just("&".to_string()),
        Just("<".to_string()),
        Just(">".to_string()),
        Just("\"".to_string()),
        Just("&amp;".to_string()),
        Just("&copy;".to_string()),
        Just("&#169;".to_string()),
        Just("&#x1F600;".to_string()),
        Just("&nosuchentity;".to_string()),
        Just("&;".to_string()),
        Just("AT&amp;T".to_string()),
    ];
    prop::collection::vec(token, 0..12).prop_map(|tokens| {
        let mut text = String::from("x");
        for token in tokens {
            text.push(' ');
            text.push_str(&token);
        }
        text
    })
}

proptest! {
    #[test]
    fn prop_rendered_text_keeps_entities(s in entity_text()) {
        let html = to_html(&s);
        let escaped = escape(s.as_bytes());
        prop_assert_eq!(&html, &format!("<p>{}</p>\n", String::from_utf8_lossy(&escaped)));

        // Rendering escaped text again changes nothing.
        let inner = &html["<p>".len()..html.len() - "</p>\n".len()];
        prop_assert_eq!(to_html(inner), html.clone());
    }

    #[test]
    fn prop_emphasis_tags_balance(s in "[a-z *_\n]{0,40}") {
        let html = to_html(&s);
        prop_assert_eq!(html.matches("<em>").count(), html.matches("</em>").count());
        prop_assert_eq!(html.matches("<strong>").count(), html.matches("</strong>").count());
    }

    #[test]
    fn prop_single_word_emphasis(w in "[a-z]{1,12}") {
        prop_assert_eq!(to_html(&format!("*{w}*")), format!("<p><em>{w}</em></p>\n"));
        prop_assert_eq!(to_html(&format!("**{w}**")), format!("<p><strong>{w}</strong></p>\n"));
        prop_assert_eq!(
            to_html(&format!("***{w}***")),
            format!("<p><strong><em>{w}</em></strong></p>\n")
        );
    }

    #[test]
    fn prop_block_tags_balance(s in "[a-z>*# \n-]{0,60}") {
        let html = to_html(&s);
        for tag in ["ul", "li", "blockquote", "p"] {
            let open = html.matches(&format!("<{tag}>")).count();
            let close = html.matches(&format!("</{tag}>")).count();
            prop_assert_eq!(open, close, "<{}> in {:?}", tag, html);
        }
    }

    #[test]
    fn prop_never_panics(s in "\\PC{0,200}") {
        for format in [
            OutputFormat::HtmlFragment,
            OutputFormat::HtmlDoc,
            OutputFormat::Markdown,
            OutputFormat::BookmarksXml,
        ] {
            let options = Options { format, ..Options::default() };
            let _ = render(&s, &options, None);
        }
    }

    #[test]
    fn prop_markup_characters_never_panic(s in "[\\[\\]()`*_\\\\!@|#>\n \"'a&<-]{0,80}") {
        let _ = to_html(&s);
        let options = Options { format: OutputFormat::Markdown, ..Options::default() };
        let _ = render(&s, &options, None);
    }
}

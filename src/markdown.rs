//! Markdown rendering for backend-generated text

use pulldown_cmark::{html, Event, Options, Parser};

/// Render Markdown to HTML. Raw HTML in the source is escaped.
pub fn to_html(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_lists_and_emphasis() {
        let html = to_html("**Key points**\n\n- Rent is due monthly\n- Deposit is refundable");
        assert!(html.contains("<strong>Key points</strong>"));
        assert!(html.contains("<li>Rent is due monthly</li>"));
    }

    #[test]
    fn escapes_raw_html() {
        let html = to_html("Hello <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}

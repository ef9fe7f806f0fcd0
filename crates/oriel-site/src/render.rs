//! Markdown page rendering.
//!
//! Renders markdown to HTML with code blocks in the shape the scan plugin
//! expects from its host: `<pre data-lang="…"><code class="lang-…">`.

use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

/// Render a markdown page to HTML.
pub fn render_markdown(source: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let parser = Parser::new_ext(source, options);

    let mut events: Vec<Event> = Vec::new();
    let mut code: Option<(String, String)> = None; // (language, text)

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match &kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .unwrap_or("")
                        .to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                code = Some((language, String::new()));
            }
            Event::Text(text) if code.is_some() => {
                if let Some((_, buffer)) = code.as_mut() {
                    buffer.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((language, text)) = code.take() {
                    events.push(Event::Html(code_block_html(&language, &text).into()));
                }
            }
            other => events.push(other),
        }
    }

    let mut out = String::new();
    html::push_html(&mut out, events.into_iter());
    out
}

/// Render one code block in the host's shape.
fn code_block_html(language: &str, text: &str) -> String {
    // Fenced blocks carry the fence's trailing newline; drop it so the
    // element text is exactly the authored source.
    let text = text.strip_suffix('\n').unwrap_or(text);
    if language.is_empty() {
        format!("<pre><code>{}</code></pre>", escape_html(text))
    } else {
        let language = escape_html(language);
        format!(
            r#"<pre data-lang="{language}"><code class="lang-{language}">{}</code></pre>"#,
            escape_html(text)
        )
    }
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

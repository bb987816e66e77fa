use crate::config::ContentFormat;

/// Body of the description file: a title header line, a blank line, then the
/// content as typed. HTML content is passed through untouched; only the title
/// is escaped since it is plain text.
pub fn render(format: ContentFormat, title: &str, content: &str) -> String {
    match format {
        ContentFormat::Html => format!("<h1>{}</h1>\n\n{}", escape_html(title), content),
        ContentFormat::PlainText => format!("{}\n\n{}", title, content),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

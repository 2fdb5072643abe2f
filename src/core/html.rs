//! `<script>` and `<link>` tags for fingerprinted assets.

/// Escape a value for use inside a double-quoted HTML attribute
pub fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn push_attr(out: &mut String, key: &str, value: &str) {
    out.push(' ');
    out.push_str(key);
    out.push_str("=\"");
    out.push_str(&escape_attr(value));
    out.push('"');
}

/// `integrity` is appended after the caller's attributes when present,
/// even if it is empty.
pub fn script_tag(src: &str, attrs: &[(&str, &str)], integrity: Option<&str>) -> String {
    let mut tag = String::from("<script");
    push_attr(&mut tag, "src", src);
    push_attr(&mut tag, "type", "text/javascript");
    for (key, value) in attrs {
        push_attr(&mut tag, key, value);
    }
    if let Some(integrity) = integrity {
        push_attr(&mut tag, "integrity", integrity);
    }
    tag.push_str("></script>");
    tag
}

pub fn link_tag(href: &str, attrs: &[(&str, &str)], integrity: Option<&str>) -> String {
    let mut tag = String::from("<link");
    push_attr(&mut tag, "href", href);
    push_attr(&mut tag, "rel", "stylesheet");
    push_attr(&mut tag, "type", "text/css");
    for (key, value) in attrs {
        push_attr(&mut tag, key, value);
    }
    if let Some(integrity) = integrity {
        push_attr(&mut tag, "integrity", integrity);
    }
    tag.push_str("></link>");
    tag
}

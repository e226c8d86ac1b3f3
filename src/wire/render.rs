//! Turning a turn's raw output into a display-safe fragment.

const ALLOWED_TAGS: &[&str] = &["a", "b", "i", "p", "br"];

const DIRECTION_LINKS: &[&str] = &[
    "North",
    "South",
    "East",
    "West",
    "Northeast",
    "Northwest",
    "Southeast",
    "Southwest",
    "Up",
    "Down",
];

/// Render simulation output for the client.
///
/// Whitelisted tags pass through untouched, every other `<`, `>` and `&` is
/// escaped and line breaks become `<br>`. One leading `<br>` is then dropped
/// and exit links such as `<a href="North">` are rewritten to
/// `<a href="?north">`.
pub fn render_output(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 16);
    let mut rest = raw;
    while let Some(ch) = rest.chars().next() {
        match ch {
            '<' => {
                if let Some(len) = allowed_tag(rest) {
                    out.push_str(&rest[..len]);
                    rest = &rest[len..];
                    continue;
                }
                out.push_str("&lt;");
            }
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\n' => out.push_str("<br>"),
            '\r' => {}
            c => out.push(c),
        }
        rest = &rest[ch.len_utf8()..];
    }

    let body = match out.strip_prefix("<br>") {
        Some(stripped) => stripped,
        None => &out,
    };
    rewrite_direction_links(body)
}

/// Length of the whitelisted tag at the start of `s`, if there is one.
///
/// `b`, `i`, `p` and `br` pass only as bare tags (`<br/>` too). `a` passes
/// only with a single double-quoted relative `href`.
fn allowed_tag(s: &str) -> Option<usize> {
    let end = s.find('>')?;
    let inner = &s[1..end];
    if inner.contains('<') {
        return None;
    }
    let ok = match inner.strip_prefix('/') {
        Some(name) => is_allowed_name(name),
        None => {
            let name_len = inner
                .find(|c: char| !c.is_ascii_alphabetic())
                .unwrap_or(inner.len());
            let (name, attrs) = inner.split_at(name_len);
            if name.eq_ignore_ascii_case("a") {
                is_plain_href(attrs)
            } else if name.eq_ignore_ascii_case("br") {
                matches!(attrs, "" | "/" | " /")
            } else {
                attrs.is_empty() && is_allowed_name(name)
            }
        }
    };
    ok.then_some(end + 1)
}

fn is_allowed_name(name: &str) -> bool {
    ALLOWED_TAGS.iter().any(|t| t.eq_ignore_ascii_case(name))
}

/// ` href="target"` with no other attribute and no URL scheme in the target.
fn is_plain_href(attrs: &str) -> bool {
    let rest = attrs.trim_start_matches(' ');
    if rest.len() == attrs.len() {
        return false;
    }
    let value = rest
        .strip_prefix("href=\"")
        .and_then(|v| v.trim_end_matches(' ').strip_suffix('"'));
    match value {
        Some(value) => !value.contains(['"', '\'', ':', '&']),
        None => false,
    }
}

fn rewrite_direction_links(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find("<a") {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 2..];
        let tail = after.trim_start_matches(' ');
        if tail.len() < after.len() {
            let hit = DIRECTION_LINKS.iter().find_map(|dir| {
                let target = format!("href=\"{}\"", dir);
                tail.strip_prefix(target.as_str()).map(|remaining| (*dir, remaining))
            });
            if let Some((dir, remaining)) = hit {
                out.push_str("<a href=\"?");
                out.push_str(&dir.to_lowercase());
                out.push('"');
                rest = remaining;
                continue;
            }
        }
        out.push_str("<a");
        rest = after;
    }
    out.push_str(rest);
    out
}

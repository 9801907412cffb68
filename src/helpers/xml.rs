//! XML helpers for the feed

/// Escape XML special characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Strip characters XML 1.0 does not allow
/// (#x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF])
pub fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            c == '\t'
                || c == '\n'
                || c == '\r'
                || ('\u{0020}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || ('\u{10000}'..='\u{10FFFF}').contains(&c)
        })
        .collect()
}

/// Make root-relative `href`/`src` attributes absolute
pub fn absolutize_urls(html: &str, base_url: &str) -> String {
    html.replace("href=\"/", &format!("href=\"{}/", base_url))
        .replace("src=\"/", &format!("src=\"{}/", base_url))
}

/// Content for a CDATA section; a literal `]]>` would end it early
pub fn cdata(s: &str) -> String {
    s.replace("]]>", "]]]]><![CDATA[>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("Tom & \"Jerry\" <3"), "Tom &amp; &quot;Jerry&quot; &lt;3");
    }

    #[test]
    fn test_strip_invalid_chars() {
        assert_eq!(strip_invalid_xml_chars("a\u{0}b\u{1b}c\n"), "abc\n");
    }

    #[test]
    fn test_absolutize_urls() {
        let html = r#"<a href="/cookie-jar/">x</a><img src="/cookie-jar/jar.png"><a href="https://go.dev">y</a>"#;
        let out = absolutize_urls(html, "https://example.com");
        assert!(out.contains(r#"href="https://example.com/cookie-jar/""#));
        assert!(out.contains(r#"src="https://example.com/cookie-jar/jar.png""#));
        assert!(out.contains(r#"href="https://go.dev""#));
    }

    #[test]
    fn test_cdata_split() {
        assert_eq!(cdata("a]]>b"), "a]]]]><![CDATA[>b");
    }
}

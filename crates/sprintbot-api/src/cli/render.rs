//! Terminal rendering of the bot's HTML message markup.

use std::sync::LazyLock;

use console::style;
use regex::Regex;

static STRUCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<s>(.*?)</s>").expect("valid struck-through pattern"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<b>([^<]*)</b>").expect("valid bold pattern"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"));

/// Convert chat HTML into styled terminal text.
///
/// Struck-through spans are dimmed, simple bold spans stay bold, every other
/// tag is dropped and entities are decoded.
pub fn html_to_terminal(html: &str) -> String {
    let text = STRUCK.replace_all(html, |caps: &regex::Captures<'_>| {
        style(TAG.replace_all(&caps[1], "").into_owned())
            .dim()
            .to_string()
    });
    let text = BOLD.replace_all(&text, |caps: &regex::Captures<'_>| {
        style(caps[1].to_string()).bold().to_string()
    });
    unescape(&TAG.replace_all(&text, ""))
}

/// Drop every tag without styling.
pub fn html_to_plain(html: &str) -> String {
    unescape(&TAG.replace_all(html, ""))
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_drops_tags_and_decodes() {
        assert_eq!(
            html_to_plain("<b>Спринт</b> <a href=\"tg://user?id=1\">A &amp; B</a>"),
            "Спринт A & B"
        );
    }

    #[test]
    fn test_terminal_output_has_no_tags() {
        console::set_colors_enabled(false);
        let out = html_to_terminal("<b>3</b>\n<s><code>d6 </code><b>2</b>: [2]</s>\n<code>d6 </code><b>3</b>: [3]");
        assert_eq!(out, "3\nd6 2: [2]\nd6 3: [3]");
    }
}

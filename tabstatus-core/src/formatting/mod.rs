//! src/formatting/mod.rs
//!
//! Permission-gated markup translation for statuses (and chat lines).
//!
//! Markup uses `&` followed by one code character. Rendering runs four passes
//! in a fixed order:
//!   1. `&_` becomes a literal space (no capability needed)
//!   2. each style directive the principal may not use is removed
//!   3. without the color capability every color *and* style code is removed
//!   4. remaining codes are translated to the `§` control form
//!
//! The color gate therefore supersedes the style gates.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use tabstatus_common::capabilities::{
    Capabilities, FORMAT_BOLD, FORMAT_COLOR, FORMAT_ITALIC, FORMAT_MAGIC, FORMAT_STRIKETHROUGH,
    FORMAT_UNDERLINE,
};

/// Marker of a translated control sequence.
pub const CONTROL_CHAR: char = '§';
/// Neutral reset, inserted after a rendered status so it cannot bleed.
pub const RESET: &str = "§r";
/// Two-character token that always renders as a space.
pub const SPACE_TOKEN: &str = "&_";

/// Every code the presentation layer understands after `&`/`§`.
const RECOGNIZED_CODES: &str = "0123456789abcdefklmnorx";

/// Color digits, style letters and reset; what the color gate removes.
static COLOR_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)&[0-9a-fk-orx]").expect("color code pattern"));

/// Leftover raw codes and translated control sequences; neither is visible.
static MARKUP_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[&§][0-9a-fk-orx]").expect("markup code pattern"));

/// `%...%` placeholder tokens, expanded later by the host.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"%[^%]+%").expect("placeholder pattern"));

#[derive(Debug, Clone, Copy)]
struct StyleDirective {
    code: char,
    capability: &'static str,
    label: &'static str,
}

const STYLE_DIRECTIVES: [StyleDirective; 5] = [
    StyleDirective { code: 'l', capability: FORMAT_BOLD, label: "bold" },
    StyleDirective { code: 'k', capability: FORMAT_MAGIC, label: "magic" },
    StyleDirective { code: 'n', capability: FORMAT_UNDERLINE, label: "underline" },
    StyleDirective { code: 'm', capability: FORMAT_STRIKETHROUGH, label: "strikethrough" },
    StyleDirective { code: 'o', capability: FORMAT_ITALIC, label: "italic" },
];

#[derive(Debug, Clone, Copy, Default)]
pub struct FormattingEngine;

impl FormattingEngine {
    pub fn new() -> Self {
        Self
    }

    /// Renders `raw` for a principal holding `caps`.
    ///
    /// The result contains literal text, untouched `%...%` placeholders and
    /// only those control sequences the principal is allowed to use.
    pub fn render<C: Capabilities + ?Sized>(&self, raw: &str, caps: &C) -> String {
        let mut text = substitute_spaces(raw);

        // Removing one directive can splice another one together (`&&ol`),
        // so sweep all of them until a full pass removes nothing.
        loop {
            let mut removed = false;
            for directive in STYLE_DIRECTIVES.iter() {
                if !caps.has(directive.capability) && contains_directive(&text, directive.code) {
                    text = strip_directive(&text, directive.code);
                    removed = true;
                    debug!("Removed {} directive (&{}) from status, capability missing.", directive.label, directive.code);
                }
            }
            if !removed {
                break;
            }
        }

        if !caps.has(FORMAT_COLOR) {
            text = strip_color_codes(&text);
            debug!("Removed color codes from status, capability missing.");
        }

        translate_codes(&text)
    }

    /// Visible length used for the max-length bound: markup codes (raw or
    /// translated) and placeholder tokens do not count.
    pub fn effective_length(&self, text: &str) -> usize {
        let without_codes = MARKUP_CODE.replace_all(text, "");
        let visible = PLACEHOLDER.replace_all(&without_codes, "");
        visible.chars().count()
    }
}

/// `&_` → space.
pub fn substitute_spaces(raw: &str) -> String {
    raw.replace(SPACE_TOKEN, " ")
}

fn contains_directive(text: &str, code: char) -> bool {
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '&' {
            if let Some(next) = chars.peek() {
                if next.eq_ignore_ascii_case(&code) {
                    return true;
                }
            }
        }
    }
    false
}

/// Removes every `&<code>` (either case). Repeats until none is left, since
/// removing `&l` from `&&ll` splices a new `&l` together.
fn strip_directive(text: &str, code: char) -> String {
    let lower = format!("&{}", code.to_ascii_lowercase());
    let upper = format!("&{}", code.to_ascii_uppercase());
    let mut out = text.to_string();
    while out.contains(&lower) || out.contains(&upper) {
        out = out.replace(&lower, "").replace(&upper, "");
    }
    out
}

/// Same fixed-point sweep as [`strip_directive`], for all color/style codes.
fn strip_color_codes(text: &str) -> String {
    let mut out = text.to_string();
    while COLOR_CODE.is_match(&out) {
        out = COLOR_CODE.replace_all(&out, "").into_owned();
    }
    out
}

fn is_recognized(code: char) -> bool {
    RECOGNIZED_CODES.contains(code.to_ascii_lowercase())
}

/// `&<code>` → `§<code>` for recognized codes; anything else passes through.
fn translate_codes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '&' {
            if let Some(&next) = chars.peek() {
                if is_recognized(next) {
                    out.push(CONTROL_CHAR);
                    out.push(next.to_ascii_lowercase());
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabstatus_common::capabilities::CapabilitySet;

    fn all_caps() -> CapabilitySet {
        [
            FORMAT_BOLD,
            FORMAT_MAGIC,
            FORMAT_UNDERLINE,
            FORMAT_STRIKETHROUGH,
            FORMAT_ITALIC,
            FORMAT_COLOR,
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_space_token_renders_as_space() {
        let engine = FormattingEngine::new();
        assert_eq!(engine.render("&_", &CapabilitySet::new()), " ");
        assert_eq!(engine.render("&_", &all_caps()), " ");
        assert_eq!(engine.render("a&_b&_c", &CapabilitySet::new()), "a b c");
    }

    #[test]
    fn test_color_without_styles() {
        let engine = FormattingEngine::new();
        let caps = CapabilitySet::new().with(FORMAT_COLOR);
        let rendered = engine.render("&aAdmin&_Cool", &caps);
        assert_eq!(rendered, "§aAdmin Cool");
        assert_eq!(engine.effective_length(&rendered), 10);
    }

    #[test]
    fn test_style_stripped_when_capability_missing() {
        let engine = FormattingEngine::new();
        let caps = CapabilitySet::new().with(FORMAT_COLOR).with(FORMAT_ITALIC);
        assert_eq!(engine.render("&l&oHi&lThere", &caps), "§oHiThere");
    }

    #[test]
    fn test_all_occurrences_of_style_removed_any_case() {
        let engine = FormattingEngine::new();
        let caps = CapabilitySet::new().with(FORMAT_COLOR);
        assert_eq!(engine.render("&lA&LB&lC", &caps), "ABC");
        assert_eq!(engine.render("&&llX", &caps), "X");
    }

    #[test]
    fn test_stripping_one_style_cannot_splice_another() {
        let engine = FormattingEngine::new();
        let caps = CapabilitySet::new().with(FORMAT_COLOR);
        let rendered = engine.render("&&olBold", &caps);
        assert!(!rendered.contains("§l"), "bold leaked: {:?}", rendered);
        assert_eq!(rendered, "Bold");
        assert_eq!(engine.render("&&&MoNk", &caps), "k");

        let with_italic = caps.with(FORMAT_ITALIC);
        assert_eq!(engine.render("&&olBold", &with_italic), "&§olBold");
    }

    #[test]
    fn test_color_gate_supersedes_style_gate() {
        let engine = FormattingEngine::new();
        let caps = CapabilitySet::new().with(FORMAT_BOLD);
        assert_eq!(engine.render("&l&cBold", &caps), "Bold");
    }

    #[test]
    fn test_color_strip_cannot_be_spliced() {
        let engine = FormattingEngine::new();
        let rendered = engine.render("&&aaX&A", &CapabilitySet::new());
        assert_eq!(rendered, "X");
    }

    #[test]
    fn test_unrecognized_codes_pass_through() {
        let engine = FormattingEngine::new();
        assert_eq!(engine.render("R&D &z", &all_caps()), "R§d &z");
        assert_eq!(engine.render("Tom & Jerry", &CapabilitySet::new()), "Tom & Jerry");
    }

    #[test]
    fn test_uppercase_codes_are_lowercased() {
        let engine = FormattingEngine::new();
        assert_eq!(engine.render("&AHi&R", &all_caps()), "§aHi§r");
    }

    #[test]
    fn test_effective_length_ignores_codes_and_placeholders() {
        let engine = FormattingEngine::new();
        assert_eq!(engine.effective_length("&aHi"), 2);
        assert_eq!(engine.effective_length("§a§lHi"), 2);
        assert_eq!(engine.effective_length("%rank_prefix%Hi"), 2);
        assert_eq!(engine.effective_length("Ünïcödé"), 7);
        assert_eq!(engine.effective_length(""), 0);
    }

    #[test]
    fn test_plain_text_length_is_unchanged() {
        let engine = FormattingEngine::new();
        for raw in ["Hello", "AFK for lunch", "x", "Working hard 42"] {
            for caps in [CapabilitySet::new(), all_caps()] {
                let rendered = engine.render(raw, &caps);
                assert_eq!(engine.effective_length(&rendered), raw.chars().count());
            }
        }
    }
}

/* src/server/injector/rust/src/helpers.rs */

/// Escape text for use in HTML content or a double-quoted attribute value.
pub fn escape_html(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for ch in s.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#x27;"),
      c => out.push(c),
    }
  }
  out
}

// Elements that never take a closing tag.
const VOID_ELEMENTS: &[&str] = &[
  "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
  "wbr",
];

pub fn is_void_element(tag: &str) -> bool {
  VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

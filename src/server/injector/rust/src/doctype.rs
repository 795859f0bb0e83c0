/* src/server/injector/rust/src/doctype.rs */

use std::borrow::Cow;

pub const HTML5_DOCTYPE: &str = "<!DOCTYPE html>";

/// Prepend the HTML5 doctype to documents that open with `<html` and carry no
/// doctype of their own. Fragments are returned untouched.
pub fn normalize_doctype(html: &str) -> Cow<'_, str> {
  let has_doctype = html.get(..9).is_some_and(|head| head.eq_ignore_ascii_case("<!doctype"));
  if has_doctype || !html.starts_with("<html") {
    return Cow::Borrowed(html);
  }
  let mut out = String::with_capacity(HTML5_DOCTYPE.len() + html.len());
  out.push_str(HTML5_DOCTYPE);
  out.push_str(html);
  Cow::Owned(out)
}

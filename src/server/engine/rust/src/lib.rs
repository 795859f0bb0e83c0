/* src/server/engine/rust/src/lib.rs */

pub mod assets;
pub mod attributes;
pub mod cookies;
pub mod document;
pub mod escape;
pub mod head;
pub mod resolvable;
pub mod state;

// Public API re-exports
pub use assets::{
  Asset, AssetBundle, AssetLoadTiming, AssetSelector, AssetUsage, SelectedAsset, UseAsset,
  preload_link_values, render_load_tags, render_preload_tags,
};
pub use attributes::Attributes;
pub use cookies::{CookieOptions, Cookies, SameSite, is_valid_cookie_name, serialize_cookie};
pub use document::{Document, Element, Node, Template, render_template};
pub use escape::script_safe_json;
pub use head::HeadElementKind;
pub use resolvable::Resolvable;
pub use state::{AttributeTarget, DEFAULT_STATUS, Disposer, ResponseState};

//! Pagetune - web-page optimization toolkit core.
//!
//! Two subsystems do the heavy lifting:
//! - a heuristic JavaScript minifier that strips whitespace and
//!   comments without changing program behavior, and
//! - a redirect chain resolver that recovers the ordered redirect
//!   chains from a set of observed HTTP resources, including the
//!   landing page's chain when intermediate hops were never observed.
//!
//! Resources are added to a [`ResourceCollection`], the collection is
//! frozen, and the owned [`RedirectRegistry`] answers chain queries
//! from then on. The minifier is independent and operates on raw
//! bytes. The `image` module ships the scanline-based PNG/JPEG/WebP
//! conversion component consumed by optimization reporting tools.

pub mod collection;
pub mod core;
pub mod image;
pub mod logger;
pub mod minify;
pub mod redirect;

pub use collection::{
    AllowAllFilter, Resource, ResourceCollection, ResourceFilter, ResourceId, ResourceType,
};
pub use logger::set_verbose;
pub use minify::{
    MinifyError, minified_js_size, minified_js_size_collapse_strings, minify_js,
    minify_js_collapse_strings,
};
pub use redirect::{RedirectChain, RedirectRegistry};

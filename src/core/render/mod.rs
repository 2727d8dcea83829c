//! Poster layout
//!
//! Pure functions from a [`ProductRecord`](crate::domain::ProductRecord) and a
//! [`StyleConfig`](crate::domain::StyleConfig) to a [`RenderTarget`]. Nothing
//! here touches the filesystem or the network.

pub mod layout;
pub mod price;
pub mod template;

pub use layout::{Align, Element, ElementKind, Fill, Rgb, RenderTarget, TextBlock};
pub use price::{format_price, split_price, PriceParts};
pub use template::{check_renderable, render};

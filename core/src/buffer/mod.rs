//! buffer/mod.rs
//! Caller-side buffers and the resolver that marshals them onto the
//! native entry points.
pub mod resolver;
pub mod types;

pub use resolver::{check_views, classify, resolve, DispatchShape, Resolved};
pub use types::{Backing, BufferView, ByteBuf};

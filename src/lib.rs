//! A selectable circular image widget for iced
//!
//! `roundel` renders an image clipped to a circle, with an optional ring
//! border that swaps color while the widget is selected. Pressing an
//! interactive widget toggles the selection flag and reports the transition
//! through a pair of optional messages.
//!
//! The clip is composited in software: the source is scaled to cover the
//! largest square that fits the widget, clamp-sampled, masked to an
//! antialiased circle on the CPU, and handed to the renderer as a finished
//! texture.
//!
//! # Architecture
//!
//! - [`geometry`]: pure draw-pass math, testable without a renderer
//! - [`texture`]: the source raster, the scaling sampler, and the circle
//!   compositing
//! - [`source`]: the four image entry points and their conversion funnel
//! - [`CircleImage`]: the widget itself, re-exported at the crate root
//!
//! # Example
//!
//! ```no_run
//! use roundel::{Source, circle_image};
//!
//! #[derive(Debug, Clone)]
//! enum Message {
//!     AvatarSelected,
//!     AvatarUnselected,
//! }
//!
//! let avatar = circle_image::<Message>(Source::from_path("avatar.png"))
//!     .bordered(true)
//!     .border_width(3.0)
//!     .interactive(true)
//!     .on_selected(Message::AvatarSelected)
//!     .on_unselected(Message::AvatarUnselected);
//! ```

pub mod geometry;
pub mod source;
pub mod texture;
mod widget;

pub use source::Source;
pub use widget::{CircleImage, Style, circle_image};

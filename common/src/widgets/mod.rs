//! Static elements of the two layouts.
//!
//! All widgets draw through [`Surface`](crate::surface::Surface) and are drawn
//! once per full-screen repaint; they are never diffed.

mod alert;
mod labels;

pub use alert::{draw_alert_banner, draw_percent_sign};
pub use labels::draw_labels;

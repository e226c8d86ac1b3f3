//! # Wire Format
//!
//! Everything the bridge sends back is an HTML fragment in three parts:
//!
//! ```text
//! <script class="header"></script>
//! ...rendered turn output...
//! <script class="footer">{"affordances": [...], "objects": [...]}</script>
//! ```
//!
//! The final reply of a game carries the game-over message and
//! `{"gameOver": true}` instead of the affordance footer.
//!
//! All functions here are pure.

pub mod listing;
pub mod records;
pub mod render;

pub use listing::{affordances_listing, objects_listing, verb_listing, verb_usage};
pub use records::{Footer, WireAffordance, WireSlot};
pub use render::render_output;

use crate::afford::AffordanceRecord;

pub const HEADER: &str = "<script class=\"header\"></script>\n";
pub const GAME_OVER_FOOTER: &str = "{\"gameOver\": true}";

const FOOTER_OPEN: &str = "<script class=\"footer\">";
const FOOTER_CLOSE: &str = "</script>";

/// Reply for an ordinary turn.
pub fn compose_reply(
    raw_output: &str,
    records: &[AffordanceRecord],
    objects: &[String],
) -> Result<String, serde_json::Error> {
    let footer = serde_json::to_string(&Footer::turn(records, objects))?;
    Ok(wrap(raw_output, "", &footer))
}

/// The single terminal reply of a session.
pub fn compose_game_over(raw_output: &str, message: &str) -> String {
    wrap(raw_output, message, GAME_OVER_FOOTER)
}

fn wrap(raw_output: &str, trailer: &str, footer_json: &str) -> String {
    let body = render_output(raw_output);
    let mut reply = String::with_capacity(
        HEADER.len() + body.len() + trailer.len() + footer_json.len() + 40,
    );
    reply.push_str(HEADER);
    reply.push_str(&body);
    reply.push_str(trailer);
    reply.push('\n');
    reply.push_str(FOOTER_OPEN);
    reply.push_str(footer_json);
    reply.push_str(FOOTER_CLOSE);
    reply.push('\n');
    reply
}

/// Parse the footer back out of a reply.
pub fn extract_footer(reply: &str) -> Option<Footer> {
    let start = reply.rfind(FOOTER_OPEN)? + FOOTER_OPEN.len();
    let len = reply[start..].find(FOOTER_CLOSE)?;
    serde_json::from_str(&reply[start..start + len]).ok()
}

/// The rendered output between header and footer.
pub fn extract_body(reply: &str) -> Option<&str> {
    let body = reply.strip_prefix(HEADER)?;
    let end = body.rfind(&format!("\n{}", FOOTER_OPEN))?;
    Some(&body[..end])
}

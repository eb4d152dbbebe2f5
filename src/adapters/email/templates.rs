//! HTML email templates with `#{placeholder}` substitution.
//!
//! Templates ship built-in; a template directory can override them without
//! a redeploy. Unknown placeholders are left in place so a broken override
//! is visible rather than silently blank.

use std::collections::HashMap;
use std::path::Path;

/// Built-in booking receipt template.
pub const BOOKING_RECEIPT_TEMPLATE: &str = r#"<html>
  <body style="font-family: sans-serif; color: #1a1a1a;">
    <h2>Your booking is confirmed</h2>
    <p>Thanks for booking with Marquee. See you at the show!</p>
    <table cellpadding="4">
      <tr><td><b>Show</b></td><td>#{show_title}</td></tr>
      <tr><td><b>Starts at</b></td><td>#{starts_at}</td></tr>
      <tr><td><b>Seats</b></td><td>#{seats}</td></tr>
      <tr><td><b>Amount paid</b></td><td>#{amount}</td></tr>
      <tr><td><b>Booking id</b></td><td>#{booking_id}</td></tr>
    </table>
  </body>
</html>
"#;

/// File name of the receipt template inside a template directory override.
pub const BOOKING_RECEIPT_TEMPLATE_FILE: &str = "booking_receipt.html";

/// Replaces every `#{key}` occurrence with its value.
pub fn render(template: &str, values: &HashMap<&str, String>) -> String {
    let mut content = template.to_string();
    for (key, value) in values {
        content = content.replace(&format!("#{{{}}}", key), value);
    }
    content
}

/// Loads a template from the override directory, falling back to the
/// built-in on any failure.
pub fn load_template(template_dir: Option<&Path>, name: &str, fallback: &'static str) -> String {
    let Some(dir) = template_dir else {
        return fallback.to_string();
    };

    match std::fs::read_to_string(dir.join(name)) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(
                template = name,
                error = %e,
                "Failed to read template override; using built-in"
            );
            fallback.to_string()
        }
    }
}

//! HTML helpers shared by the generated pages.

use std::time::{SystemTime, UNIX_EPOCH};

const STYLE: &str = r#"
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Roboto', sans-serif;
            background: linear-gradient(135deg, #1e3c72 0%, #2a5298 100%);
            color: white;
            min-height: 100vh;
            padding: 40px 20px;
        }
        .container {
            max-width: 900px;
            margin: 0 auto;
            background: rgba(255,255,255,0.15);
            border: 1px solid rgba(255,255,255,0.2);
            border-radius: 24px;
            padding: 40px;
        }
        h1 { font-size: 2.4em; margin-bottom: 20px; }
        h2 { color: #93c5fd; margin: 24px 0 12px; }
        a { color: #93c5fd; }
        code { background: rgba(0,0,0,0.3); padding: 2px 8px; border-radius: 4px; }
        pre { background: rgba(0,0,0,0.3); padding: 20px; border-radius: 8px; overflow: auto; }
        .nav a { display: block; margin: 10px 0; padding: 12px; border-radius: 8px;
                 background: rgba(255,255,255,0.1); text-decoration: none; }
        .notice { background: rgba(234,179,8,0.2); border: 1px solid rgba(234,179,8,0.3);
                  border-radius: 8px; padding: 20px; margin: 20px 0; }
        .section { margin: 24px 0; padding: 24px; background: rgba(255,255,255,0.1); border-radius: 16px; }
        .status { display: inline-block; padding: 4px 12px; border-radius: 12px;
                  background: rgba(34,197,94,0.3); font-size: 0.85em; font-weight: 600; }
        .item { margin: 8px 0; padding: 10px; background: rgba(255,255,255,0.1);
                border-radius: 8px; border-left: 4px solid #3b82f6; }
        .footer { margin-top: 30px; text-align: center; opacity: 0.8; font-size: 0.9em; }
"#;

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// "create-account" → "Create Account".
pub fn title_case(name: &str) -> String {
    name.split('-')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Wrap `body` (already escaped HTML) in the shared document shell.
///
/// `title` is escaped here.
pub fn document(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{style}</style>
</head>
<body>
    <div class="container">
{body}
    </div>
</body>
</html>"#,
        title = escape_html(title),
        style = STYLE,
        body = body,
    )
}

/// Current time as `YYYY-MM-DD HH:MM:SS UTC`.
pub fn now_utc() -> String {
    format_utc(SystemTime::now())
}

/// Format a timestamp as `YYYY-MM-DD HH:MM:SS UTC`.
pub fn format_utc(time: SystemTime) -> String {
    let secs = time
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let (year, month, day) = civil_from_days((secs / 86_400) as i64);
    let rem = secs % 86_400;
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02} UTC",
        year,
        month,
        day,
        rem / 3600,
        rem % 3600 / 60,
        rem % 60
    )
}

// Days since 1970-01-01 to proleptic Gregorian (year, month, day).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = (if z >= 0 { z } else { z - 146_096 }) / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

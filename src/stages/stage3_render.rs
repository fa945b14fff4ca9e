use std::collections::BTreeMap;

use chrono::{DateTime, Local};

use crate::error::{PipelineError, PipelineResult};
use crate::models::{AlignedBlock, SpeakerDirectory, speaker_hue};

/// Prefix of the line carrying the embedded speaker name table
const NAMES_DECLARATION: &str = "const speakerNames = ";

/// Configuration for Stage 3 rendering
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Page title and heading
    pub title: String,
    /// Shown in the footer when set
    pub generated_at: Option<DateTime<Local>>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: "Transcript".to_string(),
            generated_at: None,
        }
    }
}

/// Perform Stage 3: render the aligned transcript as a self-contained HTML page
///
/// Each block's left border colour is fixed here from the speaker's hue. Names
/// are not written into the blocks: every label carries only the raw speaker
/// id, and an embedded script swaps in the display name from a lookup table
/// when the page loads.
pub fn render_document(
    blocks: &[AlignedBlock],
    directory: &SpeakerDirectory,
    config: &RenderConfig,
) -> PipelineResult<String> {
    let title = escape_html(&config.title);
    let names: BTreeMap<&str, &str> = directory
        .iter()
        .map(|(id, identity)| (id.as_str(), identity.display_name.as_str()))
        .collect();
    let names_json = escape_script_json(&serde_json::to_string(&names)?);

    let mut html = format!(
        "<!DOCTYPE html>
<html lang='en'>
<head>
  <meta charset='UTF-8'>
  <meta name='viewport' content='width=device-width, initial-scale=1.0'>
  <title>{title}</title>
  <style>
    body {{ font-family: sans-serif; padding: 20px; background: #f4f4f4; }}
    .speaker {{ font-weight: bold; color: #333; margin-top: 1em; }}
    .block {{ background: white; border-left: 5px solid #007BFF; border-radius: 8px; padding: 10px 15px; margin: 10px 0; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }}
    footer {{ color: #777; font-size: 0.8em; margin-top: 2em; }}
  </style>
</head>
<body>
<h1>{title}</h1>
"
    );

    for block in blocks {
        let hue = directory
            .get(&block.speaker_id)
            .map(|identity| identity.color_hue)
            .unwrap_or_else(|| speaker_hue(&block.speaker_id));
        html.push_str(&format!(
            "<div class='block' style='border-left-color:hsl({hue},70%,50%)'><div class='speaker' data-speaker='{}'></div>{}</div>\n",
            escape_html(&block.speaker_id),
            escape_html(&block.text),
        ));
    }

    if let Some(generated_at) = config.generated_at {
        html.push_str(&format!(
            "<footer>Generated {}</footer>\n",
            generated_at.format("%Y-%m-%d %H:%M")
        ));
    }

    html.push_str(&format!(
        "<script>
  {NAMES_DECLARATION}{names_json};
  window.addEventListener('DOMContentLoaded', () => {{
    document.querySelectorAll('[data-speaker]').forEach(el => {{
      const id = el.getAttribute('data-speaker');
      el.innerText = speakerNames[id] || id;
    }});
  }});
</script>
</body></html>
"
    ));

    Ok(html)
}

/// Recover the speaker id to display name table embedded by [`render_document`]
///
/// Only the trailing `<script>` element is searched. Transcript text is
/// escaped, so it can never open a script element of its own.
pub fn extract_speaker_names(document: &str) -> PipelineResult<BTreeMap<String, String>> {
    let script = document
        .rfind("<script>")
        .map(|start| &document[start..])
        .ok_or(PipelineError::MissingNameTable)?;
    let line = script
        .lines()
        .map(str::trim_start)
        .find_map(|line| line.strip_prefix(NAMES_DECLARATION))
        .ok_or(PipelineError::MissingNameTable)?;
    let json = line.trim_end().trim_end_matches(';');
    Ok(serde_json::from_str(json)?)
}

/// Escape text for HTML element content and quoted attribute values
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Make serialized JSON safe to inline in a `<script>` element
///
/// The replacements are JSON unicode escapes, so the result still parses to
/// the same value.
fn escape_script_json(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '&' => escaped.push_str("\\u0026"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            _ => escaped.push(c),
        }
    }
    escaped
}

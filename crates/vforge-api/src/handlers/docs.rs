//! Documentation page.

use axum::extract::State;
use axum::response::Html;

use vforge_models::Operation;

use crate::state::AppState;

/// GET /
pub async fn docs(State(state): State<AppState>) -> Html<String> {
    Html(render_docs(state.config.max_body_size))
}

fn describe(operation: Operation) -> (&'static str, &'static str) {
    match operation {
        Operation::Trim => (
            "Cut a section without re-encoding.",
            "<code>startTime</code> seconds (default 0), <code>duration</code> seconds (default 5)",
        ),
        Operation::Crop => (
            "Crop to a rectangle.",
            "<code>w</code> (1080), <code>h</code> (1920), <code>x</code> (0), <code>y</code> (0)",
        ),
        Operation::AddVoice => (
            "Replace the audio track; output ends with the shorter stream.",
            "none",
        ),
        Operation::AddCaption => ("Burn subtitles into the video.", "none"),
        Operation::Merge => ("Join two videos back to back.", "none"),
    }
}

fn render_docs(max_body_size: usize) -> String {
    let max_mb = max_body_size / (1024 * 1024);
    let rows: String = Operation::ALL
        .iter()
        .map(|op| {
            let (summary, params) = describe(*op);
            let files = op
                .file_fields()
                .iter()
                .map(|(field, count)| {
                    if *count == 1 {
                        format!("<code>{}</code>", field)
                    } else {
                        format!("<code>{}</code> &times; {}", field, count)
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "<tr><td><code>POST {}</code></td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                op.route(),
                summary,
                files,
                params
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>VForge media API</title>
<style>
body {{ font-family: system-ui, sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; }}
table {{ border-collapse: collapse; width: 100%; }}
td, th {{ border: 1px solid #ddd; padding: .5rem; text-align: left; vertical-align: top; }}
code {{ background: #f4f4f4; padding: 0 .25rem; }}
</style>
</head>
<body>
<h1>VForge media API</h1>
<p>Upload files as <code>multipart/form-data</code> (max {max_mb}MB per request). Successful requests return
<code>{{"success": true, "downloadUrl": "..."}}</code>; failures return <code>{{"error": "...", "details": "..."}}</code>.
Download links expire after 24 hours.</p>
<table>
<tr><th>Route</th><th>Description</th><th>File fields</th><th>Parameters</th></tr>
{rows}</table>
<p><code>GET /health</code> liveness, <code>GET /ready</code> readiness.</p>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docs_list_every_route() {
        let html = render_docs(20 * 1024 * 1024);
        assert!(html.contains("max 20MB"));
        for op in Operation::ALL {
            assert!(html.contains(op.route()), "missing {}", op.route());
        }
        assert!(html.contains("<code>videos</code> &times; 2"));
    }
}

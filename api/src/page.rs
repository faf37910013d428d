use pdf_qa::RunOutcome;

/// What the page shows after an interaction.
#[derive(Debug, Default)]
pub struct PageView {
    pub question: Option<String>,
    pub outcome: Option<RunOutcome>,
    pub error: Option<String>,
}

pub fn render_page(view: &PageView) -> String {
    let question = view.question.as_deref().map(escape_html).unwrap_or_default();

    let mut body = String::new();
    if let Some(outcome) = &view.outcome {
        if let Some(document) = &outcome.document {
            body.push_str(&format!(
                "<p class=\"status\">Indexed {} chunks from {}</p>\n",
                outcome.chunk_count,
                escape_html(document)
            ));
        }
        if let Some(answer) = &outcome.answer {
            body.push_str(&format!(
                "<div class=\"answer\">{}</div>\n",
                escape_html(&answer.text)
            ));
        }
    }
    if let Some(error) = &view.error {
        body.push_str(&format!(
            "<p class=\"error\">{}</p>\n",
            escape_html(error)
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Chat pdf</title>
</head>
<body>
<h1>Ask your PDF 💬</h1>
<form method="post" action="/" enctype="multipart/form-data">
<label>Upload the PDF you want to ask about <input type="file" name="pdf" accept="application/pdf"></label>
<label>Ask a question: <input type="text" name="question" value="{question}"></label>
<button type="submit">Ask</button>
</form>
{body}</body>
</html>
"#
    )
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
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

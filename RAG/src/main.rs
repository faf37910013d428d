// One-shot command line run of the pipeline; the web page lives in ../api.

use anyhow::{Context, Result};
use pdf_qa::{PdfQa, RagConfig, UploadedPdf};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: pdf_qa <file.pdf> [question]");
        std::process::exit(2);
    };
    let question = args.collect::<Vec<_>>().join(" ");

    let config = RagConfig::from_env()?;
    let qa = PdfQa::from_config(&config)?;

    let bytes = std::fs::read(&path).with_context(|| format!("Failed to read {}", path))?;
    let filename = Path::new(&path)
        .file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_else(|| path.clone());

    let outcome = qa
        .run(Some(UploadedPdf::new(filename, bytes)), Some(question.as_str()))
        .await?;

    match outcome.answer {
        Some(answer) => println!("{}", answer.text),
        None => println!(
            "Indexed {} chunks from {}. Pass a question to ask about it.",
            outcome.chunk_count,
            outcome.document.unwrap_or_default()
        ),
    }

    Ok(())
}

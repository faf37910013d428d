use reqwest::multipart::{Form, Part};
use reqwest::Client;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let pdf_path = args.next().ok_or("usage: client <file.pdf> [question]")?;
    let question = args.collect::<Vec<_>>().join(" ");

    let client = Client::new();
    let base_url = std::env::var("PDF_QA_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());

    println!("Health Check:");
    let health_response = client.get(format!("{}/health", base_url)).send().await?;
    println!("Status: {}", health_response.status());
    let health_json: serde_json::Value = health_response.json().await?;
    println!("Response: {}", serde_json::to_string_pretty(&health_json)?);

    println!("\nAsk:");
    let bytes = std::fs::read(&pdf_path)?;
    let pdf = Part::bytes(bytes)
        .file_name(pdf_path.clone())
        .mime_str("application/pdf")?;
    let form = Form::new().part("pdf", pdf).text("question", question);

    let ask_response = client
        .post(format!("{}/api/ask", base_url))
        .multipart(form)
        .send()
        .await?;

    println!("Status: {}", ask_response.status());
    let ask_json: serde_json::Value = ask_response.json().await?;
    println!("Response: {}", serde_json::to_string_pretty(&ask_json)?);

    Ok(())
}

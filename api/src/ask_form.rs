use crate::error::ApiError;
use axum::extract::Multipart;
use pdf_qa::UploadedPdf;

const ACCEPTED_CONTENT_TYPES: [&str; 2] = ["application/pdf", "application/octet-stream"];

/// Fields of the upload form. Both are optional, as on the page.
#[derive(Debug, Default)]
pub struct AskForm {
    pub pdf: Option<UploadedPdf>,
    pub question: Option<String>,
}

impl AskForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = AskForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("pdf") => {
                    let filename = field
                        .file_name()
                        .filter(|f| !f.is_empty())
                        .unwrap_or("upload.pdf")
                        .to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await?;

                    // Browsers send an empty part when no file is chosen.
                    if bytes.is_empty() {
                        continue;
                    }
                    if let Some(content_type) = content_type {
                        if !ACCEPTED_CONTENT_TYPES.contains(&content_type.as_str()) {
                            return Err(ApiError::BadRequest(format!(
                                "Expected a PDF upload, got {}",
                                content_type
                            )));
                        }
                    }
                    form.pdf = Some(UploadedPdf::new(filename, bytes.to_vec()));
                }
                Some("question") => {
                    form.question = Some(field.text().await?);
                }
                _ => {}
            }
        }

        Ok(form)
    }
}

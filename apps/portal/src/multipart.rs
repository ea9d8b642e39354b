//! Buffers a `multipart/form-data` body into text fields and uploaded files.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::errors::AppError;
use crate::storage::ResumeUpload;

#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, ResumeUpload>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await.map_err(malformed)?;
                    // Browsers send an empty, unnamed part when no file was chosen.
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.files.insert(
                        name,
                        ResumeUpload {
                            file_name,
                            content_type,
                            bytes,
                        },
                    );
                }
                None => {
                    let text = field.text().await.map_err(malformed)?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// Removes and returns a text field; `None` means the field was not submitted.
    pub fn take_text(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    pub fn take_file(&mut self, name: &str) -> Option<ResumeUpload> {
        self.files.remove(name)
    }
}

fn malformed(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Malformed multipart body: {e}"))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::Request;

    pub(crate) async fn multipart_from(body: &'static str) -> Multipart {
        let request = Request::builder()
            .header("content-type", "multipart/form-data; boundary=XBOUNDARY")
            .body(Body::from(body))
            .unwrap();
        Multipart::from_request(request, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_reads_text_and_file_fields() {
        let body = "--XBOUNDARY\r\n\
            Content-Disposition: form-data; name=\"skills\"\r\n\r\n\
            rust, go\r\n\
            --XBOUNDARY\r\n\
            Content-Disposition: form-data; name=\"resume\"; filename=\"cv.pdf\"\r\n\
            Content-Type: application/pdf\r\n\r\n\
            %PDF-1.4\r\n\
            --XBOUNDARY--\r\n";

        let mut form = MultipartForm::read(multipart_from(body).await).await.unwrap();
        assert_eq!(form.take_text("skills").as_deref(), Some("rust, go"));
        assert_eq!(form.take_text("skills"), None);

        let resume = form.take_file("resume").unwrap();
        assert_eq!(resume.file_name, "cv.pdf");
        assert_eq!(resume.content_type.as_deref(), Some("application/pdf"));
        assert_eq!(&resume.bytes[..], b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_empty_file_part_is_skipped() {
        let body = "--XBOUNDARY\r\n\
            Content-Disposition: form-data; name=\"resume\"; filename=\"\"\r\n\
            Content-Type: application/octet-stream\r\n\r\n\
            \r\n\
            --XBOUNDARY--\r\n";

        let mut form = MultipartForm::read(multipart_from(body).await).await.unwrap();
        assert!(form.take_file("resume").is_none());
    }
}

use actix_multipart::Multipart;
use actix_web::{dev::Payload, http::header::CONTENT_TYPE, web, FromRequest, HttpRequest};
use futures_util::{future::LocalBoxFuture, StreamExt as _};
use xevents_shared::{
    const_config::upload::{
        UPLOAD_MAX_FILE_BYTES, UPLOAD_MAX_SUBMISSION_BYTES, UPLOAD_MAX_TEXT_FIELD_BYTES,
    },
    errors::e400,
    forms::{FormInput, UploadedFile},
};

/// The raw values of a submitted form
///
/// Accepts both url encoded and multipart bodies. A request without a content
/// type is treated as an empty submission.
pub struct FormSubmission(pub FormInput);

impl FromRequest for FormSubmission {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<FormSubmission, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|x| x.to_str().ok())
            .map(str::to_ascii_lowercase);
        match content_type {
            None => Box::pin(async { Ok(FormSubmission(FormInput::default())) }),
            Some(content_type) if content_type.starts_with("multipart/form-data") => {
                let multipart = Multipart::from_request(req, payload);
                Box::pin(async move { read_multipart(multipart.await?).await })
            }
            Some(_) => {
                let form = web::Form::<Vec<(String, String)>>::from_request(req, payload);
                Box::pin(async move {
                    let web::Form(pairs) = form.await?;
                    Ok(FormSubmission(FormInput::from_pairs(pairs)))
                })
            }
        }
    }
}

/// Fails with a 400 as soon as a field or the whole submission goes over its
/// cap so nothing more is buffered
#[tracing::instrument(skip_all)]
async fn read_multipart(mut multipart: Multipart) -> actix_web::Result<FormSubmission> {
    let mut result = FormInput::default();
    let mut total = 0usize;
    while let Some(field) = multipart.next().await {
        let mut field = field?;
        let Some((name, filename)) = field.content_disposition().and_then(|disposition| {
            let name = disposition.get_name()?.to_string();
            Some((name, disposition.get_filename().map(str::to_string)))
        }) else {
            tracing::debug!("skipping multipart field without a name");
            continue;
        };
        let content_type = field.content_type().map(|x| x.to_string());
        let field_cap = if filename.is_some() {
            UPLOAD_MAX_FILE_BYTES
        } else {
            UPLOAD_MAX_TEXT_FIELD_BYTES
        };
        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            total += chunk.len();
            if bytes.len() + chunk.len() > field_cap {
                tracing::warn!(field = %name, field_cap, "multipart field too large");
                return Err(e400(format!("field {name:?} exceeds {field_cap} bytes")));
            }
            if total > UPLOAD_MAX_SUBMISSION_BYTES {
                tracing::warn!(total, "multipart submission too large");
                return Err(e400(format!(
                    "submission exceeds {UPLOAD_MAX_SUBMISSION_BYTES} bytes"
                )));
            }
            bytes.extend_from_slice(&chunk);
        }
        match filename {
            Some(filename) => result.insert_file(
                name,
                UploadedFile {
                    filename,
                    content_type,
                    bytes,
                },
            ),
            None => result.insert(name, String::from_utf8(bytes).map_err(e400)?),
        }
    }
    Ok(FormSubmission(result))
}

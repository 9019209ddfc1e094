//! Turns the image paths stored by the backend into urls a browser can load

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
pub use url::Url;

/// Everything but the unreserved characters is escaped, `&`, `+` and `=`
/// included
const FILE_NAME: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Clone)]
pub struct PlaceImages {
    base_url: Url,
    placeholder_url: String,
}

impl PlaceImages {
    pub fn new(base_url: Url, placeholder_url: String) -> anyhow::Result<Self> {
        if base_url.cannot_be_a_base() {
            anyhow::bail!("image base url cannot be used as a base: {base_url}");
        }
        Ok(Self {
            base_url,
            placeholder_url,
        })
    }

    pub fn placeholder_url(&self) -> &str {
        &self.placeholder_url
    }

    /// Only the file name of `stored_path` is kept. The backend may report
    /// windows style paths so both separators are handled
    #[tracing::instrument(ret)]
    pub fn image_url(&self, stored_path: Option<&str>) -> String {
        let Some(path) = stored_path.map(str::trim).filter(|p| !p.is_empty()) else {
            return self.placeholder_url.clone();
        };
        let normalized = path.replace('\\', "/");
        let file_name = normalized.rsplit('/').next().unwrap_or_default();
        if file_name.is_empty() {
            return self.placeholder_url.clone();
        }

        let mut result = self.base_url.clone();
        let path = format!(
            "{}/{}",
            result.path().trim_end_matches('/'),
            utf8_percent_encode(file_name, FILE_NAME)
        );
        // Already encoded sequences are kept as is
        result.set_path(&path);
        result.to_string()
    }
}

use reqwest::{
    Method, Request, Url,
    header::{HeaderMap, HeaderName, HeaderValue},
};

use crate::error::{AppError, AppResult, HttpError};

/// Immutable description of the GET request repeated by a run.
///
/// The template never lends out a shared request. Each call to
/// [`RequestTemplate::instantiate`] builds a fresh, owned [`Request`], so no
/// two in-flight attempts can observe each other's state.
#[derive(Debug, Clone)]
pub struct RequestTemplate {
    url: Url,
    headers: HeaderMap,
}

impl RequestTemplate {
    /// Builds a GET template for `url`.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL cannot be parsed or has no host.
    pub fn get(url: &str) -> AppResult<Self> {
        let parsed = Url::parse(url).map_err(|err| {
            AppError::http(HttpError::InvalidUrl {
                url: url.to_owned(),
                source: err,
            })
        })?;
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(AppError::http(HttpError::UrlMissingHost {
                url: url.to_owned(),
            }));
        }
        Ok(Self {
            url: parsed,
            headers: HeaderMap::new(),
        })
    }

    /// Adds headers sent with every attempt. Later values replace earlier ones.
    ///
    /// # Errors
    ///
    /// Returns an error when a header name or value is not valid HTTP.
    pub fn with_headers(mut self, headers: &[(String, String)]) -> AppResult<Self> {
        for (key, value) in headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|err| {
                AppError::http(HttpError::InvalidHeaderName {
                    header: key.clone(),
                    source: err,
                })
            })?;
            let val = HeaderValue::from_str(value).map_err(|err| {
                AppError::http(HttpError::InvalidHeaderValue {
                    header: key.clone(),
                    source: err,
                })
            })?;
            self.headers.insert(name, val);
        }
        Ok(self)
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn instantiate(&self) -> Request {
        let mut request = Request::new(Method::GET, self.url.clone());
        request.headers_mut().clone_from(&self.headers);
        request
    }
}

use crate::config::toml_config::TargetConfig;
use crate::domain::ports::QueryService;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

/// Queries the fixed remote resource with one POST per identifier. The
/// endpoint, headers, cookies, and constant form fields all come from
/// configuration; only the identifier field varies between requests.
pub struct HttpQueryService {
    client: Client,
    endpoint: String,
    id_field: String,
    headers: HashMap<String, String>,
    cookie_header: Option<String>,
    form_fields: HashMap<String, String>,
}

impl HttpQueryService {
    pub fn new(target: &TargetConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        let cookie_header = target
            .cookies
            .as_ref()
            .filter(|cookies| !cookies.is_empty())
            .map(|cookies| {
                cookies
                    .iter()
                    .map(|(name, value)| format!("{}={}", name, value))
                    .collect::<Vec<_>>()
                    .join("; ")
            });

        Ok(Self {
            client,
            endpoint: target.endpoint.clone(),
            id_field: target.id_field.clone(),
            headers: target.headers.clone().unwrap_or_default(),
            cookie_header,
            form_fields: target.form_fields.clone().unwrap_or_default(),
        })
    }
}

#[async_trait]
impl QueryService for HttpQueryService {
    async fn query(&self, identifier: u32) -> Result<String> {
        let mut form = self.form_fields.clone();
        form.insert(self.id_field.clone(), identifier.to_string());

        let mut request = self.client.post(&self.endpoint).form(&form);

        for (key, value) in &self.headers {
            request = request.header(key.as_str(), value.as_str());
        }
        if let Some(cookie) = &self.cookie_header {
            request = request.header("Cookie", cookie.as_str());
        }

        tracing::debug!("POST {} ({}={})", self.endpoint, self.id_field, identifier);
        let response = request.send().await?;
        tracing::debug!("Response status: {}", response.status());

        // The body is opaque text; callers only ever look for a substring,
        // so a non-2xx page is returned as-is rather than treated as an error.
        let body = response.text().await?;
        Ok(body)
    }
}

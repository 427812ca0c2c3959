//! Preset endpoints.

use crate::{Client, Context, Response, Result};
use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A saved targeting preset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    #[serde(default)]
    pub id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Remaining fields, as returned by the API.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Filters for [`PresetsClient::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PresetListOpts {
    /// Search by title.
    pub q: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct PresetGetResponse {
    #[serde(rename = "status", default)]
    _status: i64,
    #[serde(default)]
    preset: Option<Preset>,
}

#[derive(Debug, Deserialize)]
struct PresetListResponse {
    #[serde(rename = "status", default)]
    _status: i64,
    #[serde(default)]
    presets: Option<Vec<Preset>>,
}

/// Preset operations, borrowed from a [`Client`] via [`Client::presets`].
#[derive(Debug, Clone, Copy)]
pub struct PresetsClient<'a> {
    client: &'a Client,
}

impl<'a> PresetsClient<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Fetches one preset. `None` when the API answers with `"preset": null`.
    pub async fn get_by_id(&self, ctx: &Context, id: i64) -> Result<Response<Option<Preset>>> {
        let request =
            self.client
                .build_request::<()>(ctx, Method::GET, &format!("/preset/{}", id), None)?;

        let response = self
            .client
            .execute_json::<PresetGetResponse>(ctx, request)
            .await?;
        Ok(response.map(|body| body.preset))
    }

    pub async fn list(
        &self,
        ctx: &Context,
        opts: &PresetListOpts,
    ) -> Result<Response<Vec<Preset>>> {
        let request = self.client.build_request_with_query::<_, ()>(
            ctx,
            Method::GET,
            "/presets",
            Some(opts),
            None,
        )?;

        let response = self
            .client
            .execute_json::<PresetListResponse>(ctx, request)
            .await?;
        Ok(response.map(|body| body.presets.unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_wrappers() {
        let body: PresetGetResponse = serde_json::from_str(r#"{"preset":{"title":"GEO"}}"#).unwrap();
        let preset = body.preset.unwrap();
        assert_eq!(preset.id, 0);
        assert_eq!(preset.title.as_deref(), Some("GEO"));

        let body: PresetListResponse =
            serde_json::from_str(r#"{"status":200,"presets":null}"#).unwrap();
        assert!(body.presets.is_none());
    }
}

//! Offer endpoints.
//!
//! - `GET /offer/{id}` returns `{"status": .., "offer": {..} | null}`
//! - `GET /offers?q=..&ids=..&os=..` returns `{"status": .., "offers": [..], "pagination": {..}}`

use crate::{Client, Context, Pagination, Response, Result};
use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An advertising offer.
///
/// `id` and `offer_id` fall back to zero values when the API leaves them
/// out. Every other field the API returns is kept in [`Offer::extra`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    /// Numeric identifier.
    #[serde(default)]
    pub id: i64,

    /// String identifier shown in the Affise dashboard.
    #[serde(default)]
    pub offer_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Remaining fields, as returned by the API.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Offer {
    pub fn new(id: i64, offer_id: impl Into<String>) -> Self {
        Self {
            id,
            offer_id: offer_id.into(),
            ..Default::default()
        }
    }
}

/// Filters for [`OffersClient::list`]. Unset fields are not sent.
///
/// # Examples
///
/// ```
/// use affise::OfferListOpts;
///
/// let opts = OfferListOpts {
///     q: Some("summer".into()),
///     os: vec!["iOS".into(), "Android".into()],
///     ..Default::default()
/// };
/// # let _ = opts;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OfferListOpts {
    /// Search by title and id.
    pub q: Option<String>,

    /// Only offers with these string ids.
    pub ids: Vec<String>,

    /// Only offers targeting these operating systems.
    pub os: Vec<String>,

    pub page: Option<u32>,

    /// Page size.
    pub limit: Option<u32>,
}

/// One page of offers with its pagination block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OfferPage {
    pub offers: Vec<Offer>,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct OfferGetResponse {
    #[serde(rename = "status", default)]
    _status: i64,
    #[serde(default)]
    offer: Option<Offer>,
}

#[derive(Debug, Deserialize)]
struct OfferListResponse {
    #[serde(rename = "status", default)]
    _status: i64,
    #[serde(default)]
    offers: Option<Vec<Offer>>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

/// Offer operations, borrowed from a [`Client`] via [`Client::offers`].
#[derive(Debug, Clone, Copy)]
pub struct OffersClient<'a> {
    client: &'a Client,
}

impl<'a> OffersClient<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Fetches full information on one offer.
    ///
    /// Resolves to `None` when the API answers with `"offer": null`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use affise::{Client, Context};
    ///
    /// # async fn example() -> Result<(), affise::Error> {
    /// let client = Client::builder()
    ///     .endpoint("https://api-example.affise.com")
    ///     .api_key("secret")
    ///     .build()?;
    ///
    /// if let Some(offer) = client.offers().get_by_id(&Context::background(), 7).await?.data {
    ///     println!("{} ({})", offer.offer_id, offer.id);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_by_id(&self, ctx: &Context, id: i64) -> Result<Response<Option<Offer>>> {
        let request =
            self.client
                .build_request::<()>(ctx, Method::GET, &format!("/offer/{}", id), None)?;

        let response = self
            .client
            .execute_json::<OfferGetResponse>(ctx, request)
            .await?;
        Ok(response.map(|body| body.offer))
    }

    /// Lists offers matching `opts`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use affise::{Client, Context, OfferListOpts};
    ///
    /// # async fn example() -> Result<(), affise::Error> {
    /// let client = Client::builder()
    ///     .endpoint("https://api-example.affise.com")
    ///     .api_key("secret")
    ///     .build()?;
    ///
    /// let opts = OfferListOpts {
    ///     os: vec!["Android".into()],
    ///     ..Default::default()
    /// };
    /// for offer in client.offers().list(&Context::background(), &opts).await?.data {
    ///     println!("{}", offer.offer_id);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list(&self, ctx: &Context, opts: &OfferListOpts) -> Result<Response<Vec<Offer>>> {
        let response = self.list_page(ctx, opts).await?;
        Ok(response.map(|page| page.offers))
    }

    /// Lists offers matching `opts`, keeping the pagination block.
    pub async fn list_page(
        &self,
        ctx: &Context,
        opts: &OfferListOpts,
    ) -> Result<Response<OfferPage>> {
        let request = self.client.build_request_with_query::<_, ()>(
            ctx,
            Method::GET,
            "/offers",
            Some(opts),
            None,
        )?;

        let response = self
            .client
            .execute_json::<OfferListResponse>(ctx, request)
            .await?;
        Ok(response.map(|body| OfferPage {
            offers: body.offers.unwrap_or_default(),
            pagination: body.pagination,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::encode_query;

    #[test]
    fn test_decode_single_offer() {
        let body: OfferGetResponse =
            serde_json::from_str(r#"{"status":200,"offer":{"id":1,"offer_id":"abc"}}"#).unwrap();
        assert_eq!(body.offer, Some(Offer::new(1, "abc")));
    }

    #[test]
    fn test_decode_null_offer() {
        let body: OfferGetResponse =
            serde_json::from_str(r#"{"status":200,"offer":null}"#).unwrap();
        assert_eq!(body.offer, None);
    }

    #[test]
    fn test_missing_status_and_ids_decode_to_zero_values() {
        let body: OfferGetResponse =
            serde_json::from_str(r#"{"offer":{"id":1,"offer_id":"abc"}}"#).unwrap();
        assert_eq!(body._status, 0);
        assert_eq!(body.offer, Some(Offer::new(1, "abc")));

        let body: OfferGetResponse =
            serde_json::from_str(r#"{"status":200,"offer":{"id":1}}"#).unwrap();
        assert_eq!(body.offer, Some(Offer::new(1, "")));

        let offer: Offer = serde_json::from_str("{}").unwrap();
        assert_eq!(offer, Offer::default());
    }

    #[test]
    fn test_null_offer_list_decodes_as_absent() {
        let body: OfferListResponse =
            serde_json::from_str(r#"{"status":200,"offers":null}"#).unwrap();
        assert_eq!(body.offers.unwrap_or_default(), Vec::<Offer>::new());
    }

    #[test]
    fn test_unknown_fields_are_kept() {
        let offer: Offer = serde_json::from_str(
            r#"{"id":9,"offer_id":"x9","title":"Summer","payments":[{"revenue":1.5}]}"#,
        )
        .unwrap();
        assert_eq!(offer.title.as_deref(), Some("Summer"));
        assert!(offer.extra.contains_key("payments"));
        assert!(!offer.extra.contains_key("id"));
    }

    #[test]
    fn test_list_without_offers_key_is_empty() {
        let body: OfferListResponse = serde_json::from_str(r#"{"status":200}"#).unwrap();
        assert!(body.offers.is_none());
        assert!(body.pagination.is_none());
    }

    #[test]
    fn test_list_opts_encoding() {
        let opts = OfferListOpts {
            q: Some("game".into()),
            ids: vec!["a1".into(), "b2".into()],
            os: vec!["iOS".into()],
            page: None,
            limit: Some(50),
        };
        let pairs = encode_query(&opts).unwrap();
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["ids", "ids", "limit", "os", "q"]);
        assert!(encode_query(&OfferListOpts::default()).unwrap().is_empty());
    }
}

//! SODA dataset client
//!
//! HTTP client for a Socrata-style tabular resource. Two operations: the
//! paged per-facility record fetch and the facility discharge-count
//! aggregate listing. Requests are synchronous in effect (each page is
//! awaited before the next is requested) and carry no timeout and no retry:
//! a failed page aborts the fetch, a hung request blocks the run.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::models::FacilityCountRow;
use super::DischargeSource;
use crate::domain::{DischargeRecord, FetchError};

/// Default page size for the paged record fetch
pub const DEFAULT_PAGE_SIZE: usize = 10_000;

/// Default row-ordering key for stable pagination
pub const DEFAULT_ORDER_BY: &str = ":id";

/// Client for a SODA-compatible dataset service
pub struct SodaClient {
    base_url: String,
    page_size: usize,
    order_by: String,
    client: Client,
}

impl SodaClient {
    /// Create a client against a service base URL
    ///
    /// `base_url` is the resource root (e.g.
    /// `https://health.data.ny.gov/resource/`); a trailing slash is added
    /// when missing so dataset tags join cleanly.
    pub fn new(base_url: &str, page_size: usize, order_by: &str) -> Self {
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        Self {
            base_url,
            page_size,
            order_by: order_by.to_string(),
            client: Client::new(),
        }
    }

    fn dataset_url(&self, dataset_tag: &str) -> Result<Url, FetchError> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| FetchError::ConnectionFailed(format!("invalid base URL: {e}")))?;
        base.join(dataset_tag)
            .map_err(|e| FetchError::ConnectionFailed(format!("invalid dataset tag: {e}")))
    }

    async fn get_rows(&self, url: Url) -> Result<Vec<serde_json::Value>, FetchError> {
        tracing::debug!(url = %url, "Requesting dataset page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::ConnectionFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::ServerError { status, message });
        }

        response
            .json::<Vec<serde_json::Value>>()
            .await
            .map_err(|e| FetchError::MalformedPayload(e.to_string()))
    }
}

#[async_trait]
impl DischargeSource for SodaClient {
    /// Fetch every discharge row for one facility, paging until exhaustion
    ///
    /// Pages are requested at offset `page * page_size`, ordered by the
    /// stable row key, and appended in request order (no re-sorting). A page
    /// shorter than the page size terminates the loop.
    async fn fetch_facility_records(
        &self,
        dataset_tag: &str,
        facility_id: i64,
    ) -> Result<Vec<DischargeRecord>, FetchError> {
        let mut records = Vec::new();
        let mut offset = 0usize;

        loop {
            let mut url = self.dataset_url(dataset_tag)?;
            url.query_pairs_mut()
                .append_pair("facility_id", &facility_id.to_string())
                .append_pair("$order", &self.order_by)
                .append_pair("$offset", &offset.to_string())
                .append_pair("$limit", &self.page_size.to_string())
                .append_pair("$$exclude_system_fields", "false");

            let rows = self.get_rows(url).await?;
            let page_len = rows.len();

            for row in rows {
                let record: DischargeRecord = serde_json::from_value(row)
                    .map_err(|e| FetchError::MalformedPayload(e.to_string()))?;
                records.push(record);
            }

            tracing::debug!(
                facility_id = facility_id,
                offset = offset,
                page_rows = page_len,
                total_rows = records.len(),
                "Fetched dataset page"
            );

            if page_len < self.page_size {
                break;
            }
            offset += self.page_size;
        }

        tracing::info!(
            facility_id = facility_id,
            dataset_tag = dataset_tag,
            rows = records.len(),
            "Completed paged fetch"
        );

        Ok(records)
    }

    /// Fetch the per-facility discharge-count listing for a dataset
    async fn fetch_facility_counts(
        &self,
        dataset_tag: &str,
    ) -> Result<Vec<FacilityCountRow>, FetchError> {
        let mut url = self.dataset_url(dataset_tag)?;
        url.query_pairs_mut()
            .append_pair("$select", "facility_id,count(*)")
            .append_pair("$group", "facility_id");

        let rows = self.get_rows(url).await?;
        let mut counts = Vec::with_capacity(rows.len());
        for row in rows {
            let count: FacilityCountRow = serde_json::from_value(row)
                .map_err(|e| FetchError::MalformedPayload(e.to_string()))?;
            counts.push(count);
        }

        tracing::info!(
            dataset_tag = dataset_tag,
            facilities = counts.len(),
            "Fetched facility discharge-count listing"
        );

        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn sample_row(row_id: &str) -> serde_json::Value {
        serde_json::json!({
            ":id": row_id,
            "facility_id": 42,
            "facility_name": "General Hospital",
            "apr_drg_code": 5,
            "apr_drg_description": "Foo",
            "apr_mdc_code": 1,
            "apr_mdc_description": "Bar",
            "apr_severity_of_illness_code": 2,
            "apr_severity_of_illness_description": "Moderate",
            "length_of_stay": "3",
            "patient_disposition": "Home or Self Care",
            "age_group": "0 to 17",
            "apr_risk_of_mortality": "Minor",
            "gender": "F",
            "source_of_payment_1": "Medicare",
            "discharge_year": 2014
        })
    }

    fn page_mock(
        server: &mut mockito::ServerGuard,
        offset: usize,
        limit: usize,
        body: &serde_json::Value,
    ) -> mockito::Mock {
        server
            .mock("GET", "/tag-1")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("facility_id".into(), "42".into()),
                Matcher::UrlEncoded("$order".into(), ":id".into()),
                Matcher::UrlEncoded("$offset".into(), offset.to_string()),
                Matcher::UrlEncoded("$limit".into(), limit.to_string()),
                Matcher::UrlEncoded("$$exclude_system_fields".into(), "false".into()),
            ]))
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(1)
            .create()
    }

    #[tokio::test]
    async fn test_paged_fetch_stops_on_short_page() {
        let mut server = mockito::Server::new_async().await;
        let client = SodaClient::new(&server.url(), 2, DEFAULT_ORDER_BY);

        // 5 rows with page size 2: pages of 2, 2, 1 -> exactly 3 requests.
        let p0 = page_mock(
            &mut server,
            0,
            2,
            &serde_json::json!([sample_row("r1"), sample_row("r2")]),
        );
        let p1 = page_mock(
            &mut server,
            2,
            2,
            &serde_json::json!([sample_row("r3"), sample_row("r4")]),
        );
        let p2 = page_mock(&mut server, 4, 2, &serde_json::json!([sample_row("r5")]));

        let records = client.fetch_facility_records("tag-1", 42).await.unwrap();
        assert_eq!(records.len(), 5);
        // Row order across pages is preserved (append semantics).
        let ids: Vec<_> = records.iter().map(|r| r.row_id.clone().unwrap()).collect();
        assert_eq!(ids, vec!["r1", "r2", "r3", "r4", "r5"]);

        p0.assert_async().await;
        p1.assert_async().await;
        p2.assert_async().await;
    }

    #[tokio::test]
    async fn test_paged_fetch_exact_multiple_issues_trailing_empty_request() {
        let mut server = mockito::Server::new_async().await;
        let client = SodaClient::new(&server.url(), 2, DEFAULT_ORDER_BY);

        // 4 rows with page size 2: pages of 2, 2, 0 -> N/P + 1 requests.
        let p0 = page_mock(
            &mut server,
            0,
            2,
            &serde_json::json!([sample_row("r1"), sample_row("r2")]),
        );
        let p1 = page_mock(
            &mut server,
            2,
            2,
            &serde_json::json!([sample_row("r3"), sample_row("r4")]),
        );
        let p2 = page_mock(&mut server, 4, 2, &serde_json::json!([]));

        let records = client.fetch_facility_records("tag-1", 42).await.unwrap();
        assert_eq!(records.len(), 4);

        p0.assert_async().await;
        p1.assert_async().await;
        p2.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_aborts_fetch() {
        let mut server = mockito::Server::new_async().await;
        let client = SodaClient::new(&server.url(), 2, DEFAULT_ORDER_BY);

        let _m = server
            .mock("GET", "/tag-1")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("unavailable")
            .create();

        let err = client.fetch_facility_records("tag-1", 42).await.unwrap_err();
        assert!(matches!(err, FetchError::ServerError { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_malformed_row_aborts_fetch() {
        let mut server = mockito::Server::new_async().await;
        let client = SodaClient::new(&server.url(), 2, DEFAULT_ORDER_BY);

        let _m = server
            .mock("GET", "/tag-1")
            .match_query(Matcher::Any)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"facility_id": "oops"}]"#)
            .create();

        let err = client.fetch_facility_records("tag-1", 42).await.unwrap_err();
        assert!(matches!(err, FetchError::MalformedPayload(_)));
    }

    #[tokio::test]
    async fn test_facility_counts_query() {
        let mut server = mockito::Server::new_async().await;
        let client = SodaClient::new(&server.url(), DEFAULT_PAGE_SIZE, DEFAULT_ORDER_BY);

        let m = server
            .mock("GET", "/tag-1")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("$select".into(), "facility_id,count(*)".into()),
                Matcher::UrlEncoded("$group".into(), "facility_id".into()),
            ]))
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"facility_id": "1", "count": "10"}, {"facility_id": "2", "count": "30"}]"#,
            )
            .expect(1)
            .create();

        let counts = client.fetch_facility_counts("tag-1").await.unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[1].count, 30);
        m.assert_async().await;
    }

    #[test]
    fn test_base_url_gains_trailing_slash() {
        let client = SodaClient::new("https://example.com/resource", 10, ":id");
        let url = client.dataset_url("abcd-1234").unwrap();
        assert_eq!(url.as_str(), "https://example.com/resource/abcd-1234");
    }
}

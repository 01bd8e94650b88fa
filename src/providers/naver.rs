//! Naver Search Ad keyword tool (monthly search volume)
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use tracing::debug;
use url::Url;

use super::{http_client, read_json, KeywordVolume, SearchVolumeProvider};
use crate::config::SearchVolumeConfig;
use crate::error::{ProviderError, ProviderOutcome};

const PROVIDER: &str = "Naver";
const KEYWORD_TOOL_PATH: &str = "/keywordstool";

type HmacSha256 = Hmac<Sha256>;

struct Credentials {
    access_key: String,
    secret_key: String,
    customer_id: String,
}

pub struct NaverSearchAd {
    credentials: Option<Credentials>,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct KeywordToolResponse {
    #[serde(rename = "keywordList", default)]
    keyword_list: Vec<KeywordStat>,
}

#[derive(Debug, Deserialize)]
struct KeywordStat {
    #[serde(rename = "relKeyword")]
    rel_keyword: String,
    #[serde(rename = "monthlyPcQcCnt")]
    monthly_pc: QueryCount,
    #[serde(rename = "monthlyMobileQcCnt")]
    monthly_mobile: QueryCount,
}

/// Counts arrive as numbers, or as strings like `"< 10"` / `"1,234"`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QueryCount {
    Number(f64),
    Text(String),
}

impl QueryCount {
    fn value(&self) -> u64 {
        match self {
            QueryCount::Number(n) => n.max(0.0) as u64,
            QueryCount::Text(text) => {
                let text = text.trim();
                if text == "< 10" {
                    return 0;
                }
                text.replace(',', "").parse::<f64>().map(|n| n.max(0.0) as u64).unwrap_or(0)
            }
        }
    }
}

/// base64(HMAC-SHA256(secret, "{timestamp}.{method}.{path}"))
pub fn sign(secret_key: &str, timestamp: &str, method: &str, path: &str) -> Result<String, ProviderError> {
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .map_err(|e| ProviderError::Malformed(format!("invalid signing key: {}", e)))?;
    mac.update(format!("{}.{}.{}", timestamp, method, path).as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

fn strip_spaces(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Prefer the row whose keyword equals the query (upper-cased, with or
/// without spaces), else the first row
fn pick_stat<'a>(stats: &'a [KeywordStat], query: &str) -> Option<&'a KeywordStat> {
    let compact = strip_spaces(query).to_uppercase();
    let upper = query.to_uppercase();
    stats
        .iter()
        .find(|s| s.rel_keyword == compact || s.rel_keyword == upper)
        .or_else(|| stats.first())
}

fn to_volume(response: KeywordToolResponse, query: &str) -> Option<KeywordVolume> {
    let target = pick_stat(&response.keyword_list, query)?;
    let pc = target.monthly_pc.value();
    let mobile = target.monthly_mobile.value();
    Some(KeywordVolume {
        total: pc + mobile,
        pc,
        mobile,
        related: response
            .keyword_list
            .iter()
            .map(|s| s.rel_keyword.clone())
            .collect(),
    })
}

impl NaverSearchAd {
    pub fn new(config: &SearchVolumeConfig) -> Result<Self, ProviderError> {
        let credentials = match (&config.access_key, &config.secret_key, &config.customer_id) {
            (Some(access_key), Some(secret_key), Some(customer_id)) => Some(Credentials {
                access_key: access_key.clone(),
                secret_key: secret_key.clone(),
                customer_id: customer_id.clone(),
            }),
            _ => None,
        };

        Ok(Self {
            credentials,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: http_client(config.timeout_seconds)?,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.credentials.is_some()
    }

    async fn fetch(&self, keyword: &str) -> Result<Option<KeywordVolume>, ProviderError> {
        let credentials = self.credentials.as_ref().ok_or(ProviderError::Disabled(PROVIDER))?;

        let timestamp = Utc::now().timestamp_millis().to_string();
        let signature = sign(&credentials.secret_key, &timestamp, "GET", KEYWORD_TOOL_PATH)?;

        let mut url = Url::parse(&format!("{}{}", self.base_url, KEYWORD_TOOL_PATH))
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("hintKeywords", &strip_spaces(keyword))
            .append_pair("showDetail", "1");

        debug!("Sending request to Naver Search Ad for '{}'", keyword);

        let response = self
            .client
            .get(url)
            .header("X-Timestamp", &timestamp)
            .header("X-API-KEY", &credentials.access_key)
            .header("X-Customer", &credentials.customer_id)
            .header("X-Signature", signature)
            .send()
            .await?;

        let body: KeywordToolResponse = read_json(PROVIDER, response).await?;
        Ok(to_volume(body, keyword))
    }
}

#[async_trait]
impl SearchVolumeProvider for NaverSearchAd {
    async fn keyword_volume(&self, keyword: &str) -> ProviderOutcome<KeywordVolume> {
        match self.fetch(keyword).await {
            Ok(Some(volume)) => ProviderOutcome::Found(volume),
            Ok(None) => ProviderOutcome::NotFound,
            Err(e) => ProviderOutcome::Failed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_is_stable_base64() {
        let a = sign("secret", "1700000000000", "GET", "/keywordstool").unwrap();
        let b = sign("secret", "1700000000000", "GET", "/keywordstool").unwrap();
        let c = sign("secret", "1700000000001", "GET", "/keywordstool").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        // 32-byte digest
        assert_eq!(BASE64.decode(&a).unwrap().len(), 32);
    }

    #[test]
    fn test_count_parsing() {
        let body = r#"{"keywordList":[
            {"relKeyword":"캠핑","monthlyPcQcCnt":"< 10","monthlyMobileQcCnt":"1,250"},
            {"relKeyword":"IPHONE15","monthlyPcQcCnt":12000,"monthlyMobileQcCnt":48000}
        ]}"#;
        let response: KeywordToolResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.keyword_list[0].monthly_pc.value(), 0);
        assert_eq!(response.keyword_list[0].monthly_mobile.value(), 1250);

        let volume = to_volume(response, "iphone 15").unwrap();
        assert_eq!(volume.total, 60_000);
        assert_eq!(volume.pc, 12_000);
        assert_eq!(volume.related, vec!["캠핑", "IPHONE15"]);
    }

    #[test]
    fn test_first_row_when_no_exact_match() {
        let body = r#"{"keywordList":[
            {"relKeyword":"A","monthlyPcQcCnt":10,"monthlyMobileQcCnt":20},
            {"relKeyword":"B","monthlyPcQcCnt":1,"monthlyMobileQcCnt":2}
        ]}"#;
        let response: KeywordToolResponse = serde_json::from_str(body).unwrap();
        assert_eq!(to_volume(response, "zzz").unwrap().total, 30);

        let empty: KeywordToolResponse = serde_json::from_str(r#"{"keywordList":[]}"#).unwrap();
        assert!(to_volume(empty, "zzz").is_none());
    }

    #[tokio::test]
    async fn test_missing_credentials_disable_provider() {
        let config = SearchVolumeConfig {
            access_key: Some("a".to_string()),
            ..Default::default()
        };
        let provider = NaverSearchAd::new(&config).unwrap();
        assert!(!provider.is_enabled());
        assert!(matches!(
            provider.keyword_volume("camping").await,
            ProviderOutcome::Failed(ProviderError::Disabled(_))
        ));
    }
}

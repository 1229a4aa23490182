use chrono::Utc;
use url::Url;

use super::signer::LinkSigner;

/// A minted, time-bounded access link.
///
/// Transient: constructed on demand and handed to the client, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedLink {
    /// Storage path the link grants access to.
    pub target: String,
    /// Filename hint for the content disposition at fetch time; `None`
    /// lets the browser decide how to render the bytes.
    pub filename: Option<String>,
    /// Unix timestamp after which the link stops validating.
    pub expire: i64,
    /// Keyed fingerprint over `(target, expire)`.
    pub fingerprint: String,
    /// The full fetch URL to hand to the client.
    pub url: Url,
}

/// Mints and validates signed fetch URLs.
///
/// Carries the [`LinkSigner`], the configured link lifetime, and the
/// public base URL the fetch endpoint is reachable under.
#[derive(Debug, Clone)]
pub struct AccessLinks {
    signer: LinkSigner,
    ttl_secs: i64,
    base_url: Url,
}

impl AccessLinks {
    pub fn new(signer: LinkSigner, ttl_secs: u64, base_url: Url) -> Self {
        Self {
            signer,
            ttl_secs: ttl_secs as i64,
            base_url,
        }
    }

    /// Mint a link for a storage path, valid for the configured TTL.
    ///
    /// The fetch URL carries the path, the optional filename hint, the
    /// expiry, and the fingerprint as the `secret` query parameter.
    pub fn mint(&self, target: &str, filename: Option<&str>) -> SignedLink {
        let expire = Utc::now().timestamp() + self.ttl_secs;
        let fingerprint = self.signer.mint(target, expire);

        let mut url = self.base_url.clone();
        url.set_path("/fetch");
        {
            let mut query = url.query_pairs_mut();
            query.clear();
            query.append_pair("target", target);
            if let Some(filename) = filename {
                query.append_pair("filename", filename);
            }
            query.append_pair("expire", &expire.to_string());
            query.append_pair("secret", &fingerprint);
        }

        SignedLink {
            target: target.to_string(),
            filename: filename.map(str::to_string),
            expire,
            fingerprint,
            url,
        }
    }

    /// Validate a presented link.
    ///
    /// Expired and forged links are indistinguishable to callers: both
    /// simply fail validation, so a response cannot be used as an oracle
    /// for how close a guessed fingerprint was.
    pub fn verify(&self, target: &str, expire: i64, fingerprint: &str) -> bool {
        if expire < Utc::now().timestamp() {
            return false;
        }
        self.signer.verify(target, expire, fingerprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links() -> AccessLinks {
        AccessLinks::new(
            LinkSigner::new("server-secret".into()),
            300,
            Url::parse("http://localhost:3001").unwrap(),
        )
    }

    #[test]
    fn test_minted_link_verifies() {
        let links = links();
        let link = links.mint("user/1/report.txt", Some("report.txt"));

        assert_eq!(link.target, "user/1/report.txt");
        assert_eq!(link.filename.as_deref(), Some("report.txt"));
        assert!(link.expire > Utc::now().timestamp());
        assert!(links.verify(&link.target, link.expire, &link.fingerprint));
    }

    #[test]
    fn test_url_carries_query_parameters() {
        let links = links();
        let link = links.mint("user/1/report.txt", Some("report.txt"));

        assert_eq!(link.url.path(), "/fetch");
        let pairs: Vec<(String, String)> = link
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert!(pairs.contains(&("target".into(), "user/1/report.txt".into())));
        assert!(pairs.contains(&("filename".into(), "report.txt".into())));
        assert!(pairs.contains(&("expire".into(), link.expire.to_string())));
        assert!(pairs.contains(&("secret".into(), link.fingerprint.clone())));
    }

    #[test]
    fn test_no_filename_hint_omits_parameter() {
        let links = links();
        let link = links.mint("user/1/report.txt", None);

        assert!(link.filename.is_none());
        assert!(!link.url.query_pairs().any(|(k, _)| k == "filename"));
    }

    #[test]
    fn test_tampered_target_fails() {
        let links = links();
        let link = links.mint("user/1/report.txt", None);

        assert!(!links.verify("user/2/report.txt", link.expire, &link.fingerprint));
    }

    #[test]
    fn test_expired_link_fails_even_with_valid_fingerprint() {
        let links = links();
        let signer = LinkSigner::new("server-secret".into());

        let past = Utc::now().timestamp() - 10;
        let fingerprint = signer.mint("user/1/report.txt", past);

        // The fingerprint itself is genuine
        assert!(signer.verify("user/1/report.txt", past, &fingerprint));
        // But the link is dead
        assert!(!links.verify("user/1/report.txt", past, &fingerprint));
    }
}

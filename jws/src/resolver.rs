use crate::{Header, Jwk, JwsError};
use serde::Deserialize;

/// 根据JOSE Header选择验证用的密钥
pub trait KeyResolver {
    fn resolve(&self, header: &Header) -> Result<Jwk, JwsError>;
}

/// 总是返回同一个密钥
#[derive(Clone, Debug)]
pub struct StaticKeyResolver {
    key: Jwk,
}

impl StaticKeyResolver {
    pub fn new(key: Jwk) -> Self {
        Self { key }
    }
}

impl KeyResolver for StaticKeyResolver {
    fn resolve(&self, _header: &Header) -> Result<Jwk, JwsError> {
        Ok(self.key.clone())
    }
}

/// JWK Set(RFC 7517 Section 5): 先按`kid`匹配, 没有`kid`时按`alg`匹配
#[derive(Clone, Debug, Default, Deserialize)]
pub struct JwkSetResolver {
    keys: Vec<Jwk>,
}

impl JwkSetResolver {
    pub fn new(keys: Vec<Jwk>) -> Self {
        Self { keys }
    }

    /// `{"keys": [...]}`
    pub fn from_json(s: &str) -> Result<Self, JwsError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn keys(&self) -> &[Jwk] {
        self.keys.as_slice()
    }
}

impl KeyResolver for JwkSetResolver {
    fn resolve(&self, header: &Header) -> Result<Jwk, JwsError> {
        let found = match header.kid() {
            Some(kid) => self.keys.iter().find(|k| k.kid() == Some(kid)),
            None => {
                let alg = header.alg()?;
                self.keys.iter().find(|k| k.alg() == Some(alg.name()))
            }
        };

        found.cloned().ok_or_else(|| {
            JwsError::KeyNotFound(serde_json::to_string(header).unwrap_or_default())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{JwkSetResolver, KeyResolver, StaticKeyResolver};
    use crate::{Header, Jwk, JwsError, SignatureAlgorithm};

    #[test]
    fn static_key() {
        let key = Jwk::oct(b"k");
        let r = StaticKeyResolver::new(key.clone());
        assert_eq!(r.resolve(&Header::default()).unwrap(), key);
    }

    #[test]
    fn jwk_set() {
        let r = JwkSetResolver::from_json(
            r#"{"keys":[
                {"kty":"oct","kid":"a","alg":"HS256","k":"AA"},
                {"kty":"oct","kid":"b","alg":"HS512","k":"AQ"},
                {"kty":"RSA","alg":"RS256","n":"DKE","e":"EQ"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(r.keys().len(), 3);

        let h = Header::new(SignatureAlgorithm::HS256).with_kid("b");
        assert_eq!(r.resolve(&h).unwrap().k().unwrap(), vec![1]);

        let h = Header::new(SignatureAlgorithm::RS256);
        assert_eq!(r.resolve(&h).unwrap().kty(), Some("RSA"));

        let h = Header::new(SignatureAlgorithm::HS256).with_kid("c");
        assert!(matches!(r.resolve(&h), Err(JwsError::KeyNotFound(_))));
        let h = Header::new(SignatureAlgorithm::RS512);
        assert!(matches!(r.resolve(&h), Err(JwsError::KeyNotFound(_))));
        assert!(matches!(
            r.resolve(&Header::default()),
            Err(JwsError::MalformedToken(_))
        ));
    }
}

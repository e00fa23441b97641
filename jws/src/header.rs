//! JOSE Header(RFC 7515 Section 4)和JWT Claims Set(RFC 7519 Section 4) <br>
//!
//! 两者都是有序的JSON对象, 成员的插入顺序就是序列化顺序.
//!

use crate::{JwsError, SignatureAlgorithm};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header(Map<String, Value>);

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Header {
    pub fn new(alg: SignatureAlgorithm) -> Self {
        Self::default().with_alg(alg)
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn insert<V: Into<Value>>(&mut self, name: &str, value: V) -> Option<Value> {
        self.0.insert(name.to_string(), value.into())
    }

    fn str_member(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// `alg`是必需成员
    pub fn alg(&self) -> Result<SignatureAlgorithm, JwsError> {
        self.str_member("alg")
            .ok_or_else(|| JwsError::MalformedToken("missing header `alg`".to_string()))?
            .parse()
    }

    pub fn typ(&self) -> Option<&str> {
        self.str_member("typ")
    }

    pub fn kid(&self) -> Option<&str> {
        self.str_member("kid")
    }

    pub fn cty(&self) -> Option<&str> {
        self.str_member("cty")
    }

    pub fn with_alg(mut self, alg: SignatureAlgorithm) -> Self {
        self.insert("alg", alg.name());
        self
    }

    pub fn with_typ(mut self, typ: &str) -> Self {
        self.insert("typ", typ);
        self
    }

    pub fn with_kid(mut self, kid: &str) -> Self {
        self.insert("kid", kid);
        self
    }

    pub fn with_cty(mut self, cty: &str) -> Self {
        self.insert("cty", cty);
        self
    }
}

impl Claims {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn insert<V: Into<Value>>(&mut self, name: &str, value: V) -> Option<Value> {
        self.0.insert(name.to_string(), value.into())
    }

    fn str_member(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn iss(&self) -> Option<&str> {
        self.str_member("iss")
    }

    pub fn sub(&self) -> Option<&str> {
        self.str_member("sub")
    }

    pub fn jti(&self) -> Option<&str> {
        self.str_member("jti")
    }

    /// `aud`可以是单个字符串或字符串数组
    pub fn aud(&self) -> Vec<&str> {
        match self.0.get("aud") {
            Some(Value::String(s)) => vec![s.as_str()],
            Some(Value::Array(arr)) => arr.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// NumericDate, 单位秒
    pub fn exp(&self) -> Option<i64> {
        self.0.get("exp").and_then(Value::as_i64)
    }

    pub fn nbf(&self) -> Option<i64> {
        self.0.get("nbf").and_then(Value::as_i64)
    }

    pub fn iat(&self) -> Option<i64> {
        self.0.get("iat").and_then(Value::as_i64)
    }

    pub fn with_iss(mut self, iss: &str) -> Self {
        self.insert("iss", iss);
        self
    }

    pub fn with_sub(mut self, sub: &str) -> Self {
        self.insert("sub", sub);
        self
    }

    pub fn with_aud(mut self, aud: &str) -> Self {
        self.insert("aud", aud);
        self
    }

    pub fn with_jti(mut self, jti: &str) -> Self {
        self.insert("jti", jti);
        self
    }

    pub fn with_exp(mut self, exp: i64) -> Self {
        self.insert("exp", exp);
        self
    }

    pub fn with_nbf(mut self, nbf: i64) -> Self {
        self.insert("nbf", nbf);
        self
    }

    pub fn with_iat(mut self, iat: i64) -> Self {
        self.insert("iat", iat);
        self
    }

    /// 自定义成员
    pub fn with<V: Into<Value>>(mut self, name: &str, value: V) -> Self {
        self.insert(name, value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{Claims, Header};
    use crate::{JwsError, SignatureAlgorithm};

    #[test]
    fn header_members() {
        let h = Header::new(SignatureAlgorithm::RS256)
            .with_typ("JWT")
            .with_kid("k1");
        assert_eq!(
            serde_json::to_string(&h).unwrap(),
            r#"{"alg":"RS256","typ":"JWT","kid":"k1"}"#
        );
        assert_eq!(h.alg().unwrap(), SignatureAlgorithm::RS256);
        assert_eq!(h.typ(), Some("JWT"));
        assert_eq!(h.kid(), Some("k1"));
        assert_eq!(h.cty(), None);

        assert!(matches!(
            Header::default().alg(),
            Err(JwsError::MalformedToken(_))
        ));
        let mut h = Header::default();
        h.insert("alg", "XS256");
        assert!(matches!(h.alg(), Err(JwsError::UnsupportedAlgorithm(_))));
    }

    #[test]
    fn claims_members() {
        let c = Claims::new()
            .with_sub("1234567890")
            .with("name", "John Doe")
            .with_iat(1516239022);
        assert_eq!(
            serde_json::to_string(&c).unwrap(),
            r#"{"sub":"1234567890","name":"John Doe","iat":1516239022}"#
        );
        assert_eq!(c.sub(), Some("1234567890"));
        assert_eq!(c.iat(), Some(1516239022));
        assert_eq!(c.exp(), None);
        assert!(c.aud().is_empty());

        let c: Claims =
            serde_json::from_str(r#"{"iss":"joe","aud":["a","b"],"exp":1300819380}"#).unwrap();
        assert_eq!(c.iss(), Some("joe"));
        assert_eq!(c.aud(), vec!["a", "b"]);
        assert_eq!(c.exp(), Some(1300819380));
        assert_eq!(Claims::new().with_aud("a").aud(), vec!["a"]);
    }
}

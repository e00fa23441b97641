//! JSON Web Key(RFC 7517), 只处理`RSA`和`oct`两种类型的参数 <br>
//!
//! JWK保持为有序的JSON对象, 数值参数在访问时才做base64url解码.
//!

use crate::{b64_decode, b64_encode, JwsError};
use cipher::asn1::AlgorithmIdentifier;
use cipher::rsa::{OtherPrime, PrivateKey, PublicKey};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Jwk(Map<String, Value>);

impl Jwk {
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn from_json(s: &str) -> Result<Self, JwsError> {
        Ok(serde_json::from_str(s)?)
    }

    /// 对称密钥`{"kty":"oct","k":...}`
    pub fn oct(k: &[u8]) -> Self {
        let mut map = Map::new();
        map.insert("kty".to_string(), Value::from("oct"));
        map.insert("k".to_string(), Value::from(b64_encode(k)));
        Self(map)
    }

    pub fn from_public_key(key: &PublicKey) -> Self {
        let mut map = Map::new();
        map.insert("kty".to_string(), Value::from("RSA"));
        map.insert(
            "n".to_string(),
            Value::from(b64_encode(key.modulus().to_bytes_be())),
        );
        map.insert(
            "e".to_string(),
            Value::from(b64_encode(key.exponent().to_bytes_be())),
        );
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

    pub fn with_kid(mut self, kid: &str) -> Self {
        self.insert("kid", kid);
        self
    }

    pub fn with_alg(mut self, alg: crate::SignatureAlgorithm) -> Self {
        self.insert("alg", alg.name());
        self
    }

    pub fn with_use(mut self, use_: &str) -> Self {
        self.insert("use", use_);
        self
    }

    fn str_member(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    fn bytes_member(&self, name: &'static str) -> Result<Vec<u8>, JwsError> {
        self.str_member(name)
            .ok_or(JwsError::MissingKeyParameter(name))
            .and_then(b64_decode)
    }

    fn big_member(&self, name: &'static str) -> Result<BigUint, JwsError> {
        self.bytes_member(name)
            .map(|x| BigUint::from_bytes_be(x.as_slice()))
    }

    pub fn kty(&self) -> Option<&str> {
        self.str_member("kty")
    }

    pub fn kid(&self) -> Option<&str> {
        self.str_member("kid")
    }

    pub fn alg(&self) -> Option<&str> {
        self.str_member("alg")
    }

    pub fn use_(&self) -> Option<&str> {
        self.str_member("use")
    }

    pub fn n(&self) -> Result<BigUint, JwsError> {
        self.big_member("n")
    }

    pub fn e(&self) -> Result<BigUint, JwsError> {
        self.big_member("e")
    }

    pub fn d(&self) -> Result<BigUint, JwsError> {
        self.big_member("d")
    }

    pub fn p(&self) -> Result<BigUint, JwsError> {
        self.big_member("p")
    }

    pub fn q(&self) -> Result<BigUint, JwsError> {
        self.big_member("q")
    }

    pub fn dp(&self) -> Result<BigUint, JwsError> {
        self.big_member("dp")
    }

    pub fn dq(&self) -> Result<BigUint, JwsError> {
        self.big_member("dq")
    }

    pub fn qi(&self) -> Result<BigUint, JwsError> {
        self.big_member("qi")
    }

    /// 其它素因子`[{"r":..,"d":..,"t":..}, ...]`, 缺省时为空
    pub fn oth(&self) -> Result<Vec<OtherPrime>, JwsError> {
        let Some(oth) = self.0.get("oth") else {
            return Ok(Vec::new());
        };

        let arr = oth.as_array().ok_or(JwsError::MissingKeyParameter("oth"))?;
        arr.iter()
            .map(|x| {
                let member = |name: &'static str| {
                    x.get(name)
                        .and_then(Value::as_str)
                        .ok_or(JwsError::MissingKeyParameter(name))
                        .and_then(b64_decode)
                        .map(|b| BigUint::from_bytes_be(b.as_slice()))
                };
                Ok(OtherPrime {
                    r: member("r")?,
                    d: member("d")?,
                    t: member("t")?,
                })
            })
            .collect()
    }

    /// 对称密钥字节
    pub fn k(&self) -> Result<Vec<u8>, JwsError> {
        self.bytes_member("k")
    }

    fn check_kty(&self, expect: &str) -> Result<(), JwsError> {
        match self.kty() {
            Some(kty) if kty == expect => Ok(()),
            Some(kty) => Err(JwsError::InvalidKey(format!(
                "key type `{kty}` is not `{expect}`"
            ))),
            None => Err(JwsError::MissingKeyParameter("kty")),
        }
    }

    pub fn to_public_key(&self) -> Result<PublicKey, JwsError> {
        self.check_kty("RSA")?;
        Ok(PublicKey::new_uncheck(self.n()?, self.e()?))
    }

    /// 有`p`时按CRT形式构造, 此时`q, dp, dq, qi`也必须存在; 否则使用`(n, d)`
    pub fn to_private_key(&self) -> Result<PrivateKey, JwsError> {
        self.check_kty("RSA")?;
        if self.0.contains_key("p") {
            Ok(PrivateKey::MultiPrime {
                p: self.p()?,
                q: self.q()?,
                dp: self.dp()?,
                dq: self.dq()?,
                qinv: self.qi()?,
                others: self.oth()?,
            })
        } else {
            Ok(PrivateKey::new_pair(self.n()?, self.d()?))
        }
    }

    pub fn to_hmac_key(&self) -> Result<Vec<u8>, JwsError> {
        self.check_kty("oct")?;
        self.k()
    }

    /// RFC 7638 JWK Thumbprint: 只取必需成员, 按字典序排列, 无空白, 摘要后base64url编码
    pub fn thumbprint(&self, alg: AlgorithmIdentifier) -> Result<String, JwsError> {
        let members: &[&'static str] = match self.kty() {
            Some("RSA") => &["e", "kty", "n"],
            Some("oct") => &["k", "kty"],
            Some("EC") => &["crv", "kty", "x", "y"],
            Some(kty) => {
                return Err(JwsError::InvalidKey(format!(
                    "unsupported key type `{kty}`"
                )))
            }
            None => return Err(JwsError::MissingKeyParameter("kty")),
        };

        let mut required = BTreeMap::new();
        for &name in members {
            let v = self.0.get(name).ok_or(JwsError::MissingKeyParameter(name))?;
            required.insert(name, v);
        }

        let json = serde_json::to_string(&required)?;
        Ok(b64_encode(alg.digest(json.as_bytes())))
    }
}

impl Display for Jwk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(&self.0) {
            Ok(s) => f.write_str(s.as_str()),
            Err(_) => Err(std::fmt::Error),
        }
    }
}

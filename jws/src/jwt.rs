//! JWS Compact Serialization(RFC 7515 Section 7.1) <br>
//!
//! `base64url(header) || '.' || base64url(claims) || '.' || base64url(signature)`
//!

use crate::{b64_decode, b64_encode, Claims, Header, Jwk, JwsError, KeyResolver, Signer, Verifier};
use serde::de::DeserializeOwned;

#[derive(Debug, Clone)]
pub struct Jwt {
    header: Header,
    claims: Claims,
    // base64url(header).base64url(claims), 验证时使用原始字节
    signing_input: String,
    signature: Vec<u8>,
}

fn decode_segment<T: DeserializeOwned>(seg: &str, name: &str) -> Result<T, JwsError> {
    let bytes = b64_decode(seg)?;
    let v = serde_json::from_slice::<serde_json::Value>(bytes.as_slice())?;
    if !v.is_object() {
        return Err(JwsError::MalformedToken(format!(
            "{name} is not a JSON object"
        )));
    }

    Ok(serde_json::from_value(v)?)
}

impl Jwt {
    /// 用`header`中的`alg`签名
    pub fn sign(
        header: Header,
        claims: Claims,
        key: &Jwk,
        signer: &dyn Signer,
    ) -> Result<Self, JwsError> {
        let alg = header.alg()?;
        let signing_input = format!(
            "{}.{}",
            b64_encode(serde_json::to_vec(&header)?),
            b64_encode(serde_json::to_vec(&claims)?)
        );
        let signature = signer.sign(alg, signing_input.as_bytes(), key)?;

        Ok(Self {
            header,
            claims,
            signing_input,
            signature,
        })
    }

    pub fn decode(token: &str) -> Result<Self, JwsError> {
        let segs = token.split('.').collect::<Vec<_>>();
        let [h, c, s] = segs.as_slice() else {
            return Err(JwsError::MalformedToken(format!(
                "expected 3 segments, but got `{}`",
                segs.len()
            )));
        };

        Ok(Self {
            header: decode_segment(h, "header")?,
            claims: decode_segment(c, "claims")?,
            signing_input: format!("{h}.{c}"),
            signature: b64_decode(s)?,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn signing_input(&self) -> &str {
        self.signing_input.as_str()
    }

    pub fn signature(&self) -> &[u8] {
        self.signature.as_slice()
    }

    pub fn compact(&self) -> String {
        format!("{}.{}", self.signing_input, b64_encode(&self.signature))
    }

    /// 签名不匹配返回`Ok(false)`
    pub fn verify(
        &self,
        resolver: &dyn KeyResolver,
        verifier: &dyn Verifier,
    ) -> Result<bool, JwsError> {
        let alg = self.header.alg()?;
        let key = resolver.resolve(&self.header)?;
        verifier.verify(alg, self.signing_input.as_bytes(), &self.signature, &key)
    }
}

#[cfg(test)]
mod tests {
    use super::Jwt;
    use crate::fixtures::{HS256_JWT, HS256_K, RS256_JWT, RSA_JWK};
    use crate::{
        b64_decode, Claims, DefaultSigner, Header, Jwk, JwkSetResolver, JwsError,
        SignatureAlgorithm, StaticKeyResolver,
    };

    fn hs256_key() -> Jwk {
        Jwk::oct(b64_decode(HS256_K).unwrap().as_slice())
    }

    #[test]
    fn hs256_vector() {
        let header = Header::new(SignatureAlgorithm::HS256).with_typ("JWT");
        let claims = Claims::new()
            .with_sub("1234567890")
            .with("name", "John Doe")
            .with_iat(1516239022);

        let jwt = Jwt::sign(header, claims, &hs256_key(), &DefaultSigner::new()).unwrap();
        assert_eq!(jwt.compact(), HS256_JWT);

        let back = Jwt::decode(HS256_JWT).unwrap();
        assert_eq!(back.header(), jwt.header());
        assert_eq!(back.claims().sub(), Some("1234567890"));
        assert_eq!(back.claims().iat(), Some(1516239022));
        assert!(back
            .verify(&StaticKeyResolver::new(hs256_key()), &DefaultSigner::new())
            .unwrap());
    }

    #[test]
    fn rs256_vector() {
        let key = Jwk::from_json(RSA_JWK).unwrap();
        let jwt = Jwt::decode(RS256_JWT).unwrap();
        assert_eq!(jwt.header().alg().unwrap(), SignatureAlgorithm::RS256);
        assert_eq!(jwt.claims().get("admin"), Some(&serde_json::Value::Bool(true)));

        let (resolver, verifier) = (StaticKeyResolver::new(key.clone()), DefaultSigner::new());
        assert!(jwt.verify(&resolver, &verifier).unwrap());

        // PKCS#1 v1.5签名是确定性的
        let resigned = Jwt::sign(
            jwt.header().clone(),
            jwt.claims().clone(),
            &key,
            &verifier,
        )
        .unwrap();
        assert_eq!(resigned.compact(), RS256_JWT);
    }

    #[test]
    fn tampered_token() {
        let (resolver, verifier) = (StaticKeyResolver::new(hs256_key()), DefaultSigner::new());
        let segs = HS256_JWT.split('.').collect::<Vec<_>>();

        // 替换claims
        let other = Jwt::sign(
            Header::new(SignatureAlgorithm::HS256).with_typ("JWT"),
            Claims::new().with_sub("admin"),
            &hs256_key(),
            &verifier,
        )
        .unwrap();
        let forged = format!(
            "{}.{}.{}",
            segs[0],
            other.signing_input().split('.').nth(1).unwrap(),
            segs[2]
        );
        assert!(!Jwt::decode(&forged).unwrap().verify(&resolver, &verifier).unwrap());

        // 截断签名
        let short = &HS256_JWT[..HS256_JWT.len() - 3];
        assert!(!Jwt::decode(short).unwrap().verify(&resolver, &verifier).unwrap());
    }

    #[test]
    fn resolve_by_kid() {
        let set = JwkSetResolver::new(vec![
            Jwk::oct(&[1u8; 32]).with_kid("one"),
            hs256_key().with_kid("two"),
        ]);
        let jwt = Jwt::sign(
            Header::new(SignatureAlgorithm::HS256).with_kid("two"),
            Claims::new().with_iss("jose"),
            &hs256_key(),
            &DefaultSigner::new(),
        )
        .unwrap();

        let back = Jwt::decode(&jwt.compact()).unwrap();
        assert!(back.verify(&set, &DefaultSigner::new()).unwrap());
    }

    #[test]
    fn malformed() {
        let cases = [
            "",
            "a.b",
            "a.b.c.d",
            "e30.e30.***",
            "W10.e30.",
            "bm90IGpzb24.e30.",
        ];
        for (i, token) in cases.into_iter().enumerate() {
            assert!(Jwt::decode(token).is_err(), "case {i} `{token}` accepted");
        }
        assert!(matches!(
            Jwt::decode("W10.e30."),
            Err(JwsError::MalformedToken(_))
        ));

        // 空签名可以解码, 但`none`不被支持
        let jwt = Jwt::decode("eyJhbGciOiJub25lIn0.e30.").unwrap();
        assert!(jwt.signature().is_empty());
        assert!(matches!(
            jwt.verify(&StaticKeyResolver::new(hs256_key()), &DefaultSigner::new()),
            Err(JwsError::UnsupportedAlgorithm(_))
        ));
    }
}

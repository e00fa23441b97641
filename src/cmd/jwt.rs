use std::path::PathBuf;

use cipher::asn1::AlgorithmIdentifier;
use clap::Args;
use jws::{
    Claims, DefaultSigner, Header, Jwk, JwkSetResolver, Jwt, KeyResolver, SignatureAlgorithm,
    StaticKeyResolver,
};
use serde_json::{Map, Value};

use super::config::JoseConfig;
use crate::JoseError;

#[derive(Args)]
pub struct JwkArgs {
    #[arg(long, value_name = "FILE")]
    #[arg(help = "the JWK file, `jose verify` also accepts a JWK Set file")]
    pub jwk: PathBuf,
}

impl JwkArgs {
    fn read(&self) -> anyhow::Result<String> {
        std::fs::read_to_string(&self.jwk)
            .map_err(|e| anyhow::anyhow!("read `{}` failed, {e}", self.jwk.display()))
    }

    pub fn key(&self) -> anyhow::Result<Jwk> {
        Ok(Jwk::from_json(self.read()?.as_str())?)
    }

    /// `{"keys": [...]}`按JWK Set解析, 否则是单个JWK
    pub fn resolver(&self) -> anyhow::Result<Box<dyn KeyResolver>> {
        let s = self.read()?;
        let v = serde_json::from_str::<Value>(s.as_str())?;
        if v.get("keys").is_some() {
            Ok(Box::new(JwkSetResolver::from_json(s.as_str())?))
        } else {
            Ok(Box::new(StaticKeyResolver::new(Jwk::from_json(
                s.as_str(),
            )?)))
        }
    }
}

#[derive(Args)]
#[command(about = "sign the claims to a JWS compact serialization")]
pub struct SignArgs {
    #[command(flatten)]
    key: JwkArgs,

    #[arg(long, value_name = "ALG")]
    #[arg(help = "the `alg` header, default to the JWK `alg` or `default_algorithm` in the config")]
    alg: Option<SignatureAlgorithm>,

    #[arg(long, help = "the `kid` header, default to the JWK `kid`")]
    kid: Option<String>,

    #[arg(long, value_name = "JSON", help = "the claims set JSON object")]
    claims: String,

    #[arg(long, help = "set the `iat` claim to now")]
    iat: bool,

    #[arg(long, value_name = "SECONDS", help = "set the `exp` claim to now + SECONDS")]
    expires_in: Option<u64>,
}

impl SignArgs {
    fn algorithm(&self, key: &Jwk) -> anyhow::Result<SignatureAlgorithm> {
        if let Some(alg) = self.alg {
            return Ok(alg);
        }

        match key.alg() {
            Some(alg) => Ok(alg.parse()?),
            None => Ok(JoseConfig::config().default_algorithm),
        }
    }

    fn claims(&self, now: i64) -> anyhow::Result<Claims> {
        let map = serde_json::from_str::<Map<String, Value>>(self.claims.as_str())
            .map_err(|e| JoseError::InvalidClaims(e.to_string()))?;

        let mut claims = Claims::from_map(map);
        if self.iat {
            claims.insert("iat", now);
        }
        if let Some(secs) = self.expires_in {
            let exp = i64::try_from(secs)
                .ok()
                .and_then(|secs| now.checked_add(secs))
                .ok_or_else(|| JoseError::TimeOverflow(format!("{now} + {secs}")))?;
            claims.insert("exp", exp);
        }

        Ok(claims)
    }

    fn sign(&self, key: &Jwk, now: i64) -> anyhow::Result<String> {
        let alg = self.algorithm(key)?;
        let mut header = Header::new(alg).with_typ("JWT");
        if let Some(kid) = self.kid.as_deref().or(key.kid()) {
            header = header.with_kid(kid);
        }

        let jwt = Jwt::sign(header, self.claims(now)?, key, &DefaultSigner::new())?;
        Ok(jwt.compact())
    }

    pub fn exe(self) -> anyhow::Result<()> {
        let key = self.key.key()?;
        println!("{}", self.sign(&key, chrono::Utc::now().timestamp())?);
        Ok(())
    }
}

#[derive(Args)]
#[command(about = "verify a JWS compact serialization, exit with failure if invalid")]
pub struct VerifyArgs {
    #[command(flatten)]
    key: JwkArgs,

    #[arg(value_name = "TOKEN")]
    token: String,

    #[arg(long, help = "do not check the `exp` and `nbf` claims")]
    ignore_time: bool,

    #[arg(long, value_name = "SECONDS", default_value_t = 0)]
    #[arg(help = "the allowed clock skew when checking `exp` and `nbf`")]
    leeway: u32,
}

impl VerifyArgs {
    fn check_time(&self, claims: &Claims, now: i64) -> Result<(), JoseError> {
        if self.ignore_time {
            return Ok(());
        }

        let leeway = i64::from(self.leeway);
        if let Some(exp) = claims.exp() {
            let earliest = now
                .checked_sub(leeway)
                .ok_or_else(|| JoseError::TimeOverflow(format!("{now} - {leeway}")))?;
            if earliest >= exp {
                return Err(JoseError::Expired(exp));
            }
        }
        if let Some(nbf) = claims.nbf() {
            let latest = now
                .checked_add(leeway)
                .ok_or_else(|| JoseError::TimeOverflow(format!("{now} + {leeway}")))?;
            if latest < nbf {
                return Err(JoseError::NotYetValid(nbf));
            }
        }

        Ok(())
    }

    fn verify(&self, resolver: &dyn KeyResolver, now: i64) -> anyhow::Result<bool> {
        let jwt = Jwt::decode(self.token.trim())?;
        if !jwt.verify(resolver, &DefaultSigner::new())? {
            log::debug!("signature mismatch");
            return Ok(false);
        }

        if let Err(e) = self.check_time(jwt.claims(), now) {
            log::warn!("{e}");
            return Ok(false);
        }

        Ok(true)
    }

    pub fn exe(self) -> anyhow::Result<bool> {
        let resolver = self.key.resolver()?;
        let valid = self.verify(resolver.as_ref(), chrono::Utc::now().timestamp())?;
        println!("{}", if valid { "valid" } else { "invalid" });
        Ok(valid)
    }
}

#[derive(Args)]
#[command(about = "RFC 7638 JWK thumbprint")]
pub struct ThumbprintArgs {
    #[command(flatten)]
    key: JwkArgs,

    #[arg(long, value_name = "ALG", default_value = "sha256")]
    #[arg(help = "the digest algorithm")]
    hash: AlgorithmIdentifier,
}

impl ThumbprintArgs {
    pub fn exe(self) -> anyhow::Result<()> {
        println!("{}", self.key.key()?.thumbprint(self.hash)?);
        Ok(())
    }
}

#[derive(Args)]
#[command(about = "output the public JWK of a RSA private JWK")]
pub struct PublicArgs {
    #[command(flatten)]
    key: JwkArgs,
}

impl PublicArgs {
    pub fn public(key: &Jwk) -> anyhow::Result<Jwk> {
        let mut public = Jwk::from_public_key(&key.to_public_key()?);
        for name in ["kid", "alg", "use"] {
            if let Some(v) = key.get(name) {
                public.insert(name, v.clone());
            }
        }

        Ok(public)
    }

    pub fn exe(self) -> anyhow::Result<()> {
        println!("{}", Self::public(&self.key.key()?)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{JwkArgs, PublicArgs, SignArgs, ThumbprintArgs, VerifyArgs};
    use crate::JoseError;
    use cipher::asn1::AlgorithmIdentifier;
    use jws::fixtures::{HS256_JWT, HS256_K, RS256_JWT, RSA_JWK};
    use jws::{Claims, Jwk, SignatureAlgorithm};
    use std::path::Path;

    fn hs256_jwk() -> String {
        format!(r#"{{"kty":"oct","k":"{HS256_K}"}}"#)
    }

    fn jwk_args(dir: &Path, name: &str, jwk: &str) -> JwkArgs {
        let p = dir.join(name);
        std::fs::write(&p, jwk).unwrap();
        JwkArgs { jwk: p }
    }

    fn sign_args(key: JwkArgs, alg: Option<SignatureAlgorithm>, claims: &str) -> SignArgs {
        SignArgs {
            key,
            alg,
            kid: None,
            claims: claims.to_string(),
            iat: false,
            expires_in: None,
        }
    }

    fn verify_args(key: JwkArgs, token: &str) -> VerifyArgs {
        VerifyArgs {
            key,
            token: token.to_string(),
            ignore_time: false,
            leeway: 0,
        }
    }

    #[test]
    fn sign_vectors() {
        let dir = tempfile::tempdir().unwrap();
        let hs256 = hs256_jwk();
        let cases = [
            (
                hs256.as_str(),
                Some(SignatureAlgorithm::HS256),
                r#"{"sub":"1234567890","name":"John Doe","iat":1516239022}"#,
                HS256_JWT,
            ),
            (
                RSA_JWK,
                Some(SignatureAlgorithm::RS256),
                r#"{"sub":"1234567890","name":"John Doe","admin":true,"iat":1516239022}"#,
                RS256_JWT,
            ),
        ];

        for (i, (jwk, alg, claims, tgt)) in cases.into_iter().enumerate() {
            let args = sign_args(jwk_args(dir.path(), "k.json", jwk), alg, claims);
            let key = args.key.key().unwrap();
            assert_eq!(args.sign(&key, 0).unwrap(), tgt, "case {i} failed");
        }
    }

    #[test]
    fn sign_options() {
        let dir = tempfile::tempdir().unwrap();
        let jwk = r#"{"kty":"oct","kid":"k1","alg":"HS384","k":"AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"}"#;
        let mut args = sign_args(jwk_args(dir.path(), "k.json", jwk), None, r#"{"iss":"jose"}"#);
        args.iat = true;
        args.expires_in = Some(60);

        let key = args.key.key().unwrap();
        let token = args.sign(&key, 1000).unwrap();
        let jwt = jws::Jwt::decode(&token).unwrap();
        assert_eq!(jwt.header().alg().unwrap(), SignatureAlgorithm::HS384);
        assert_eq!(jwt.header().kid(), Some("k1"));
        assert_eq!(jwt.claims().iat(), Some(1000));
        assert_eq!(jwt.claims().exp(), Some(1060));

        let verify = verify_args(jwk_args(dir.path(), "k.json", jwk), &token);
        let resolver = verify.key.resolver().unwrap();
        assert!(verify.verify(resolver.as_ref(), 1059).unwrap());
        assert!(!verify.verify(resolver.as_ref(), 1060).unwrap());

        let args = sign_args(jwk_args(dir.path(), "k.json", jwk), None, "[1, 2]");
        assert!(args.sign(&key, 0).is_err());
    }

    #[test]
    fn verify_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let set = format!(r#"{{"keys": [{}]}}"#, RSA_JWK.replacen('{', r#"{"alg": "RS256", "#, 1));
        let hs256 = hs256_jwk();
        let cases = [
            (hs256.as_str(), HS256_JWT, true),
            (RSA_JWK, RS256_JWT, true),
            (set.as_str(), RS256_JWT, true),
            (hs256.as_str(), &HS256_JWT[..HS256_JWT.len() - 3], false),
            (RSA_JWK, HS256_JWT, false),
        ];

        for (i, (jwk, token, valid)) in cases.into_iter().enumerate() {
            let args = verify_args(jwk_args(dir.path(), "k.json", jwk), token);
            let resolver = args.key.resolver().unwrap();
            let res = args.verify(resolver.as_ref(), 1516239022).unwrap_or(false);
            assert_eq!(res, valid, "case {i} failed");
        }
    }

    #[test]
    fn time_window() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = verify_args(jwk_args(dir.path(), "k.json", &hs256_jwk()), HS256_JWT);
        let claims = Claims::new().with_nbf(100).with_exp(200);

        assert!(args.check_time(&claims, 150).is_ok());
        assert!(args.check_time(&claims, 99).is_err());
        assert!(args.check_time(&claims, 200).is_err());

        args.leeway = 5;
        assert!(args.check_time(&claims, 96).is_ok());
        assert!(args.check_time(&claims, 204).is_ok());

        args.ignore_time = true;
        assert!(args.check_time(&claims, 1000).is_ok());
    }

    #[test]
    fn time_overflow() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = verify_args(jwk_args(dir.path(), "k.json", &hs256_jwk()), HS256_JWT);
        args.leeway = u32::MAX;

        // 溢出时拒绝, 不回绕
        assert!(matches!(
            args.check_time(&Claims::new().with_exp(200), i64::MIN),
            Err(JoseError::TimeOverflow(_))
        ));
        assert!(matches!(
            args.check_time(&Claims::new().with_nbf(200), i64::MAX),
            Err(JoseError::TimeOverflow(_))
        ));
        assert!(args
            .check_time(&Claims::new().with_exp(i64::MAX), 1_700_000_000)
            .is_ok());
        let exp = Claims::new().with_exp(200);
        assert!(args.check_time(&exp, 199 + u32::MAX as i64).is_ok());
        assert!(matches!(
            args.check_time(&exp, 200 + u32::MAX as i64),
            Err(JoseError::Expired(200))
        ));

        let mut sign = sign_args(jwk_args(dir.path(), "k.json", &hs256_jwk()), None, "{}");
        let cases = [
            (u64::MAX, 0),
            (i64::MAX as u64, 1),
            (i64::MAX as u64 - 10, 11),
        ];
        for (i, (secs, now)) in cases.into_iter().enumerate() {
            sign.expires_in = Some(secs);
            assert!(
                matches!(
                    sign.claims(now).unwrap_err().downcast_ref::<JoseError>(),
                    Some(JoseError::TimeOverflow(_))
                ),
                "case {i} failed"
            );
        }

        sign.expires_in = Some(i64::MAX as u64 - 10);
        assert_eq!(sign.claims(10).unwrap().exp(), Some(i64::MAX));
    }

    #[test]
    fn thumbprint_and_public() {
        let dir = tempfile::tempdir().unwrap();
        let args = ThumbprintArgs {
            key: jwk_args(dir.path(), "k.json", RSA_JWK),
            hash: AlgorithmIdentifier::Sha256,
        };
        let key = args.key.key().unwrap();
        let public = PublicArgs::public(&key.clone().with_kid("k1")).unwrap();
        assert_eq!(public.kid(), Some("k1"));
        assert!(public.get("d").is_none());
        assert_eq!(
            public.thumbprint(args.hash).unwrap(),
            key.thumbprint(AlgorithmIdentifier::Sha256).unwrap()
        );
        assert!(PublicArgs::public(&Jwk::from_json(&hs256_jwk()).unwrap()).is_err());
    }
}

//! ASN.1 DER编码 <br>
//!
//! [X.690](https://www.itu.int/rec/T-REC-X.690) <br>
//! [RFC 8017 Appendix A.2.4](https://www.rfc-editor.org/rfc/rfc8017#appendix-A.2.4) <br>
//!
//! 只覆盖PKCS#1签名需要的部分: 长度字段, OBJECT IDENTIFIER, 摘要算法的AlgorithmIdentifier以及DigestInfo.
//!

pub mod der;
pub use der::{encode_length, encode_tlv, Asn1Tag, DerLength, DerReader};

mod oid;
pub use oid::ObjectIdentifier;

mod algorithm;
pub use algorithm::{AlgorithmIdentifier, DigestInfo};

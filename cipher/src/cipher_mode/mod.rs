//! # Recommendation for Block Cipher Mode of Operation: Method and Techniques
//!
//! [Block Cipher Techniques](https://csrc.nist.gov/Projects/block-cipher-techniques/BCM/current-modes)<br>
//! [NIST 800-38A, Recommendation for Block Cipher Modes of operation Methods and Techniques](https://nvlpubs.nist.gov/nistpubs/Legacy/SP/nistspecialpublication800-38a.pdf)<br>
//!
//! <br>
//! ## The Electronic Codebook Mode(ECB)
//!
//! $$
//! C_j = Encrypt(P_j), j = 1...n
//!
//! P_j = Decrypt(C_j), j = 1...n
//! $$
//!
//! 给定的密钥, 每个明文块和密文块一一对应(如果不期待使用这一特性, 不应该使用ECB模式), 加解密都可并行. 构造ECB时会记录一条警告日志. <br>
//! <br>
//! ## The Cipher Block Chaining Mode(CBC)
//!
//! 给定初始向量IV, IV可以不保密, 但是**它必须是不可预测的(unpredictable)**. <br>
//!
//! $$
//! C_1 = Encrypt(P_1 \xor IV); C_j = Encrypt(P_j \xor C_{j-1}), j = 2...n
//!
//! P_1 = Decrypt(C_1) \xor IV; P_j = Decrypt(C_j) \xor C_{j-1}, j = 2...n
//! $$
//!
//! 在CBC模式中, 加密每个明文块依赖前一个密文输出, 故Encrypt无法并行. 但Decrypt是可以并行的. <br>
//! <br>
//! ## 流式会话
//!
//! `BlockCipherSession`把工作模式(`ChainingMode`)和填充策略(`BlockPadding`)组合起来,
//! 输出按顺序推送给`BlockSink`: `Vec<u8>`, `mpsc::Sender<BlockOutput<N>>`或`WriteSink<W: Write>`. <br>
//!

mod padding;
pub use padding::{BlockPadding, DefaultPadding, EmptyPadding, Pkcs7Padding};

mod session;
pub use session::{BlockCipherSession, BlockOutput, BlockSink, ChainingMode, Operation, WriteSink};

mod ecb;
pub use ecb::{AesEcb, Ecb};

mod cbc;
pub use cbc::{AesCbc, Cbc};

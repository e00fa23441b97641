//! 分组密码流式会话: `update`若干次, 最后调用一次`do_final`.
//!
//! 每凑满一个分组即变换并推送给`BlockSink`, 不足一个分组的数据缓存到下次调用. <br>
//! `do_final`处理填充, 推送最后的数据以及结束标记, 并消耗会话. <br>

use std::io::Write;
use std::sync::mpsc::Sender;

use crate::cipher_mode::BlockPadding;
use crate::CipherError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Encrypt,
    Decrypt,
}

/// 分组密码工作模式的单块变换, 链接状态(如CBC的前一个密文块)由实现者持有.
pub trait ChainingMode<const N: usize> {
    fn encrypt_chained(&mut self, block: &[u8; N]) -> [u8; N];

    fn decrypt_chained(&mut self, block: &[u8; N]) -> [u8; N];
}

/// 会话输出: 按顺序接收完整分组, 去除填充后的尾部数据, 最后是结束标记.
pub trait BlockSink<const N: usize> {
    fn emit(&mut self, block: &[u8; N]) -> Result<(), CipherError>;

    /// 解密去除填充后剩下的不足一个分组的数据
    fn emit_partial(&mut self, data: &[u8]) -> Result<(), CipherError>;

    fn end(&mut self) -> Result<(), CipherError>;
}

impl<const N: usize> BlockSink<N> for Vec<u8> {
    fn emit(&mut self, block: &[u8; N]) -> Result<(), CipherError> {
        self.extend_from_slice(block);
        Ok(())
    }

    fn emit_partial(&mut self, data: &[u8]) -> Result<(), CipherError> {
        self.extend_from_slice(data);
        Ok(())
    }

    fn end(&mut self) -> Result<(), CipherError> {
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockOutput<const N: usize> {
    Block([u8; N]),
    Partial(Vec<u8>),
    End,
}

impl<const N: usize> BlockSink<N> for Sender<BlockOutput<N>> {
    fn emit(&mut self, block: &[u8; N]) -> Result<(), CipherError> {
        self.send(BlockOutput::Block(*block))
            .map_err(|e| CipherError::Other(format!("{e}")))
    }

    fn emit_partial(&mut self, data: &[u8]) -> Result<(), CipherError> {
        self.send(BlockOutput::Partial(data.to_vec()))
            .map_err(|e| CipherError::Other(format!("{e}")))
    }

    fn end(&mut self) -> Result<(), CipherError> {
        self.send(BlockOutput::End)
            .map_err(|e| CipherError::Other(format!("{e}")))
    }
}

/// 把输出写到`std::io::Write`, `end`时flush.
pub struct WriteSink<W> {
    writer: W,
    written: usize,
}

impl<W: Write> WriteSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// 已写出的字节数
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write, const N: usize> BlockSink<N> for WriteSink<W> {
    fn emit(&mut self, block: &[u8; N]) -> Result<(), CipherError> {
        self.writer.write_all(block)?;
        self.written += N;
        Ok(())
    }

    fn emit_partial(&mut self, data: &[u8]) -> Result<(), CipherError> {
        self.writer.write_all(data)?;
        self.written += data.len();
        Ok(())
    }

    fn end(&mut self) -> Result<(), CipherError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// 分组密码会话. <br>
///
/// - `M`: 工作模式(持有分组密码和链接状态);
/// - `P`: 填充策略;
///
/// 不变量: 两次调用之间缓存长度小于`N`. 解密且有填充时, 最近解密的一个分组暂不输出,
/// 待`do_final`时去除填充.
pub struct BlockCipherSession<M, P, const N: usize> {
    op: Operation,
    mode: M,
    padding: P,
    buf: Vec<u8>,
    held: Option<[u8; N]>,
}

impl<M, P, const N: usize> BlockCipherSession<M, P, N>
where
    M: ChainingMode<N>,
    P: BlockPadding,
{
    pub fn new(op: Operation, mode: M) -> Self {
        Self::with_padding(op, mode, P::new(N))
    }

    pub fn with_padding(op: Operation, mode: M, padding: P) -> Self {
        Self {
            op,
            mode,
            padding,
            buf: Vec::with_capacity(N),
            held: None,
        }
    }

    pub fn operation(&self) -> Operation {
        self.op
    }

    pub fn mode(&self) -> &M {
        &self.mode
    }

    /// 当前缓存的不足一个分组的字节数
    pub fn buffered_len(&self) -> usize {
        self.buf.len()
    }

    fn hold_back(&self) -> bool {
        self.op == Operation::Decrypt && self.padding.max_padding_blocks() > 0
    }

    fn transform(&mut self, block: &[u8; N]) -> [u8; N] {
        match self.op {
            Operation::Encrypt => self.mode.encrypt_chained(block),
            Operation::Decrypt => self.mode.decrypt_chained(block),
        }
    }

    fn process<S: BlockSink<N>>(&mut self, block: &[u8; N], sink: &mut S) -> Result<(), CipherError> {
        let out = self.transform(block);
        if self.hold_back() {
            if let Some(prev) = self.held.replace(out) {
                sink.emit(&prev)?;
            }
            Ok(())
        } else {
            sink.emit(&out)
        }
    }

    pub fn update<S: BlockSink<N>>(&mut self, data: &[u8], sink: &mut S) -> Result<(), CipherError> {
        let mut data = data;

        if !self.buf.is_empty() {
            let need = (N - self.buf.len()).min(data.len());
            self.buf.extend_from_slice(&data[..need]);
            data = &data[need..];
            if self.buf.len() < N {
                return Ok(());
            }

            let mut block = [0u8; N];
            block.copy_from_slice(&self.buf);
            self.buf.clear();
            self.process(&block, sink)?;
        }

        let mut itr = data.chunks_exact(N);
        for chunk in &mut itr {
            let mut block = [0u8; N];
            block.copy_from_slice(chunk);
            self.process(&block, sink)?;
        }
        self.buf.extend_from_slice(itr.remainder());

        Ok(())
    }

    /// 处理剩余数据和填充, 最后推送结束标记. 会话随之结束.
    pub fn do_final<S: BlockSink<N>>(mut self, data: &[u8], sink: &mut S) -> Result<(), CipherError> {
        self.update(data, sink)?;

        match self.op {
            Operation::Encrypt => {
                let mut tail = std::mem::take(&mut self.buf);
                self.padding.padding(&mut tail);
                if tail.len() % N != 0 {
                    return Err(CipherError::InvalidBlockSize {
                        target: N,
                        real: tail.len() % N,
                    });
                }

                for chunk in tail.chunks_exact(N) {
                    let mut block = [0u8; N];
                    block.copy_from_slice(chunk);
                    let out = self.mode.encrypt_chained(&block);
                    sink.emit(&out)?;
                }
            }
            Operation::Decrypt => {
                if !self.buf.is_empty() {
                    return Err(CipherError::InvalidBlockSize {
                        target: N,
                        real: self.buf.len(),
                    });
                }

                if self.hold_back() {
                    let mut tail = self.held.take().map(Vec::from).unwrap_or_default();
                    self.padding.unpadding(&mut tail)?;
                    if tail.len() == N {
                        let mut block = [0u8; N];
                        block.copy_from_slice(&tail);
                        sink.emit(&block)?;
                    } else if !tail.is_empty() {
                        sink.emit_partial(&tail)?;
                    }
                }
            }
        }

        sink.end()
    }

    /// `update` + `do_final`, 结果收集到`Vec<u8>`
    pub fn collect(self, data: &[u8]) -> Result<Vec<u8>, CipherError> {
        let mut out = Vec::with_capacity(data.len() + N);
        self.do_final(data, &mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::{BlockCipherSession, BlockOutput, BlockSink, ChainingMode, Operation, WriteSink};
    use crate::cipher_mode::{DefaultPadding, EmptyPadding, Pkcs7Padding};
    use crate::CipherError;
    use std::sync::mpsc;

    // 每个字节加上分组序号, 便于检查顺序
    struct Counter(u8);

    impl ChainingMode<4> for Counter {
        fn encrypt_chained(&mut self, block: &[u8; 4]) -> [u8; 4] {
            self.0 += 1;
            block.map(|x| x.wrapping_add(self.0))
        }

        fn decrypt_chained(&mut self, block: &[u8; 4]) -> [u8; 4] {
            self.0 += 1;
            block.map(|x| x.wrapping_sub(self.0))
        }
    }

    #[test]
    fn update_buffers_partial_blocks() {
        let mut s = BlockCipherSession::<_, EmptyPadding, 4>::new(Operation::Encrypt, Counter(0));
        let mut out = Vec::new();
        s.update(&[1, 2, 3], &mut out).unwrap();
        assert!(out.is_empty());
        assert_eq!(s.buffered_len(), 3);
        s.update(&[4, 5], &mut out).unwrap();
        assert_eq!(out, vec![2, 3, 4, 5]);
        assert_eq!(s.buffered_len(), 1);
        s.update(&[6, 7, 8, 9, 10, 11, 12], &mut out).unwrap();
        assert_eq!(out, vec![2, 3, 4, 5, 7, 8, 9, 10, 12, 13, 14, 15]);
        assert_eq!(s.buffered_len(), 0);
        s.do_final(&[], &mut out).unwrap();
        assert_eq!(out.len(), 12);
    }

    #[test]
    fn empty_padding_rejects_partial_block() {
        let s = BlockCipherSession::<_, EmptyPadding, 4>::new(Operation::Encrypt, Counter(0));
        assert_eq!(
            s.collect(&[1, 2, 3, 4, 5]),
            Err(CipherError::InvalidBlockSize { target: 4, real: 1 })
        );

        let s = BlockCipherSession::<_, Pkcs7Padding, 4>::new(Operation::Decrypt, Counter(0));
        assert!(s.collect(&[1, 2, 3]).is_err());
    }

    #[test]
    fn padding_round_trip() {
        for len in 0..14u8 {
            let pt = (0..len).collect::<Vec<_>>();
            let ct = BlockCipherSession::<_, Pkcs7Padding, 4>::new(Operation::Encrypt, Counter(0))
                .collect(&pt)
                .unwrap();
            assert_eq!(ct.len(), (pt.len() / 4 + 1) * 4, "len {len}");

            let s = BlockCipherSession::<_, Pkcs7Padding, 4>::new(Operation::Decrypt, Counter(0));
            assert_eq!(s.collect(&ct).unwrap(), pt, "len {len}");

            let ct = BlockCipherSession::<_, DefaultPadding, 4>::new(Operation::Encrypt, Counter(0))
                .collect(&pt)
                .unwrap();
            let s = BlockCipherSession::<_, DefaultPadding, 4>::new(Operation::Decrypt, Counter(0));
            assert_eq!(s.collect(&ct).unwrap(), pt, "len {len}");
        }
    }

    #[test]
    fn decrypt_holds_back_last_block() {
        let ct = BlockCipherSession::<_, Pkcs7Padding, 4>::new(Operation::Encrypt, Counter(0))
            .collect(&[9, 9, 9, 9, 9, 9])
            .unwrap();
        assert_eq!(ct.len(), 8);

        let mut s = BlockCipherSession::<_, Pkcs7Padding, 4>::new(Operation::Decrypt, Counter(0));
        let mut out = Vec::new();
        s.update(&ct[..4], &mut out).unwrap();
        assert!(out.is_empty());
        s.update(&ct[4..], &mut out).unwrap();
        assert_eq!(out, vec![9, 9, 9, 9]);
        s.do_final(&[], &mut out).unwrap();
        assert_eq!(out, vec![9, 9, 9, 9, 9, 9]);
    }

    #[test]
    fn channel_sink_preserves_order() {
        let (tx, rx) = mpsc::channel();
        let handle = std::thread::spawn(move || rx.iter().collect::<Vec<BlockOutput<4>>>());

        let mut tx = tx;
        let s = BlockCipherSession::<_, Pkcs7Padding, 4>::new(Operation::Encrypt, Counter(0));
        s.do_final(&[0, 0, 0, 0, 0], &mut tx).unwrap();
        drop(tx);

        let out = handle.join().unwrap();
        assert_eq!(
            out,
            vec![
                BlockOutput::Block([1, 1, 1, 1]),
                BlockOutput::Block([2, 5, 5, 5]),
                BlockOutput::End
            ]
        );
    }

    #[test]
    fn write_sink() {
        let mut sink = WriteSink::new(Vec::new());
        let s = BlockCipherSession::<_, EmptyPadding, 4>::new(Operation::Decrypt, Counter(0));
        s.do_final(&[1, 1, 1, 1, 2, 2, 2, 2], &mut sink).unwrap();
        assert_eq!(BlockSink::<4>::end(&mut sink), Ok(()));
        assert_eq!(sink.written(), 8);
        assert_eq!(sink.into_inner(), vec![0, 0, 0, 0, 0, 0, 0, 0]);
    }
}

//! Output sinks for the minifier.
//!
//! One scanner implementation serves both minification and size
//! estimation; the sink decides whether emitted bytes are stored or
//! merely counted.

/// Byte-accepting output of the scanner.
pub(crate) trait OutputSink {
    fn push_byte(&mut self, byte: u8);
    fn append_span(&mut self, bytes: &[u8]);
}

/// Sink that stores the minified bytes.
#[derive(Default)]
pub(crate) struct ByteSink {
    pub(crate) bytes: Vec<u8>,
}

impl OutputSink for ByteSink {
    fn push_byte(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    fn append_span(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }
}

/// Sink that only measures the output size.
#[derive(Default)]
pub(crate) struct SizeSink {
    pub(crate) size: usize,
}

impl OutputSink for SizeSink {
    fn push_byte(&mut self, _byte: u8) {
        self.size += 1;
    }

    fn append_span(&mut self, bytes: &[u8]) {
        self.size += bytes.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sinks_agree_on_length() {
        let mut bytes = ByteSink::default();
        let mut size = SizeSink::default();
        for sink in [&mut bytes as &mut dyn OutputSink, &mut size] {
            sink.push_byte(b'a');
            sink.append_span(b"bcd");
            sink.push_byte(b'\n');
        }
        assert_eq!(bytes.bytes, b"abcd\n");
        assert_eq!(size.size, bytes.bytes.len());
    }
}

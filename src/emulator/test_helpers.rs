use crate::hardware::console::Console;
use std::collections::VecDeque;
use std::io;

/// Scripted [`Console`] for tests: input is served from a fixed byte
/// queue, output is captured for assertions.
///
/// Running out of scripted input is an `UnexpectedEof` error so that a
/// runaway program fails its test instead of blocking.
pub struct FakeConsole {
    input: VecDeque<u8>,
    output: Vec<u8>,
    interrupt_after_reads: Option<usize>,
    fail_polls: bool,
}

impl FakeConsole {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.bytes().collect(),
            output: Vec::with_capacity(120),
            interrupt_after_reads: None,
            fail_polls: false,
        }
    }
    /// Reports an interrupt once `reads` characters have been consumed.
    pub fn interrupt_after_reads(mut self, reads: usize) -> Self {
        self.interrupt_after_reads = Some(reads);
        self
    }
    /// Makes every keyboard poll fail, as a dead input device would.
    pub fn fail_polls(mut self) -> Self {
        self.fail_polls = true;
        self
    }
    pub fn output(&self) -> String {
        String::from_utf8(self.output.clone()).unwrap()
    }
}

impl Console for FakeConsole {
    fn poll_ready(&mut self) -> io::Result<bool> {
        if self.fail_polls {
            return Err(io::Error::other("keyboard poll failed"));
        }
        Ok(!self.input.is_empty())
    }
    fn read_char(&mut self) -> io::Result<u8> {
        if let Some(reads) = &mut self.interrupt_after_reads {
            *reads = reads.saturating_sub(1);
        }
        self.input
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script out of input"))
    }
    fn write_char(&mut self, c: u8) -> io::Result<()> {
        self.output.push(c);
        Ok(())
    }
    fn is_interrupted(&self) -> bool {
        self.interrupt_after_reads == Some(0)
    }
}

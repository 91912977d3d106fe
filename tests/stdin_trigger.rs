// tests/stdin_trigger.rs

mod common;
use crate::common::init_tracing;

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use buildwatch::engine::{run_stdin_loop, StdinExit};
use buildwatch::exec::BuildOutcome;
use buildwatch_test_utils::buffer::SharedBuffer;
use buildwatch_test_utils::fake_backend::FakeBuildBackend;
use tokio::io::{AsyncRead, BufReader, ReadBuf};

#[tokio::test]
async fn each_line_runs_one_build() {
    init_tracing();

    let backend = FakeBuildBackend::new();
    let output = SharedBuffer::new();
    let input: &[u8] = b"\n\nrebuild please\n";

    let (exit, builds) = run_stdin_loop(input, &backend, &output.reporter(), "make").await;

    assert_eq!(exit, StdinExit::Eof);
    assert_eq!(builds, 3);
    assert_eq!(backend.commands(), vec!["make"; 3]);
}

#[tokio::test]
async fn unterminated_trailing_text_does_not_trigger() {
    init_tracing();

    let backend = FakeBuildBackend::new();
    let output = SharedBuffer::new();
    let input: &[u8] = b"go\npartial";

    let (exit, builds) = run_stdin_loop(input, &backend, &output.reporter(), "make").await;

    assert_eq!(exit, StdinExit::Eof);
    assert_eq!(builds, 1);
}

#[tokio::test]
async fn stdin_build_failures_are_reported() {
    init_tracing();

    let backend = FakeBuildBackend::new();
    backend.push_outcome(BuildOutcome::failed(Some(1), Vec::new()));
    let output = SharedBuffer::new();
    let input: &[u8] = b"\n";

    run_stdin_loop(input, &backend, &output.reporter(), "false").await;

    assert_eq!(output.text(), "Errors found:\n\n");
}

/// Reader that yields one line, then fails.
struct FailingReader {
    sent: bool,
}

impl AsyncRead for FailingReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if self.sent {
            return Poll::Ready(Err(io::Error::other("terminal went away")));
        }
        self.sent = true;
        buf.put_slice(b"\n");
        Poll::Ready(Ok(()))
    }
}

#[tokio::test]
async fn read_error_ends_the_loop_cleanly() {
    init_tracing();

    let backend = FakeBuildBackend::new();
    let output = SharedBuffer::new();
    let reader = BufReader::new(FailingReader { sent: false });

    let (exit, builds) = run_stdin_loop(reader, &backend, &output.reporter(), "make").await;

    assert_eq!(exit, StdinExit::ReadError);
    assert_eq!(builds, 1);
}

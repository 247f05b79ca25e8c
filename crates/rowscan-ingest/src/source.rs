//! Physical line sources.
//!
//! A line source hands out one physical line at a time with its line
//! ending (`\n` or `\r\n`) removed. The sync and async variants differ only
//! in whether the read suspends.

use std::fmt;
use std::future::Future;
use std::io::{self, BufRead};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Terminator used to re-join physical lines inside a qualified field.
#[cfg(windows)]
pub const LINE_TERMINATOR: &str = "\r\n";
/// Terminator used to re-join physical lines inside a qualified field.
#[cfg(not(windows))]
pub const LINE_TERMINATOR: &str = "\n";

/// Synchronous "read next physical line".
pub trait LineSource {
    /// Returns `Ok(None)` once the source is exhausted.
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

/// Asynchronous "read next physical line".
pub trait AsyncLineSource {
    /// Resolves to `Ok(None)` once the source is exhausted.
    fn next_line(&mut self) -> impl Future<Output = io::Result<Option<String>>> + Send;
}

impl<S: LineSource + ?Sized> LineSource for &mut S {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        (**self).next_line()
    }
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        (**self).next_line()
    }
}

/// Lines of any buffered reader.
#[derive(Debug)]
pub struct ReaderLines<R> {
    lines: io::Lines<R>,
}

impl<R: BufRead> ReaderLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> LineSource for ReaderLines<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        self.lines.next().transpose()
    }
}

/// Lines of an in-memory iterator.
#[derive(Debug)]
pub struct IterLines<I> {
    iter: I,
}

impl<I> IterLines<I>
where
    I: Iterator,
    I::Item: Into<String>,
{
    pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            iter: iter.into_iter(),
        }
    }
}

impl<I> LineSource for IterLines<I>
where
    I: Iterator,
    I::Item: Into<String>,
{
    fn next_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.iter.next().map(Into::into))
    }
}

/// Lines produced by an injected closure.
pub struct FnLines<F> {
    read: F,
}

impl<F> FnLines<F>
where
    F: FnMut() -> io::Result<Option<String>>,
{
    pub fn new(read: F) -> Self {
        Self { read }
    }
}

impl<F> fmt::Debug for FnLines<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnLines").finish_non_exhaustive()
    }
}

impl<F> LineSource for FnLines<F>
where
    F: FnMut() -> io::Result<Option<String>>,
{
    fn next_line(&mut self) -> io::Result<Option<String>> {
        (self.read)()
    }
}

/// Lines of a tokio buffered reader.
#[derive(Debug)]
pub struct AsyncReaderLines<R> {
    lines: tokio::io::Lines<R>,
}

impl<R: AsyncBufRead + Unpin> AsyncReaderLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: AsyncBufRead + Unpin + Send> AsyncLineSource for AsyncReaderLines<R> {
    fn next_line(&mut self) -> impl Future<Output = io::Result<Option<String>>> + Send {
        self.lines.next_line()
    }
}

/// Cooperative cancellation signal shared between a caller and an async read.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

use std::{io, sync::Arc};

use slog::{Drain, Logger};
use slog_async::Async;
use slog_term::{CompactFormat, PlainDecorator};

use crate::Operation;

pub struct TestLogger;

impl TestLogger {
    fn from_writer<W: io::Write + Send + 'static>(writer: W) -> Logger {
        let decorator = PlainDecorator::new(writer);
        let drain = CompactFormat::new(decorator).build().fuse();
        let drain = Async::new(drain).build().fuse();
        Logger::root(Arc::new(drain), slog::o!())
    }

    pub fn stdout() -> Logger {
        Self::from_writer(slog_term::TestStdoutWriter)
    }
}

/// Target with a supported `bar` operation and an unsupported `snafu` one.
#[derive(Debug)]
pub struct Foo {
    pub bar: Operation<(), &'static str>,
    pub snafu: Operation<(), &'static str>,
}

impl Foo {
    pub fn new() -> Self {
        Self {
            bar: Operation::new("bar", |()| "bar"),
            snafu: Operation::unsupported("snafu"),
        }
    }
}

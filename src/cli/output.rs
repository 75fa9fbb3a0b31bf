//! Logging setup for the command-line runner

use std::fmt;
use std::fs::File;
use std::sync::Mutex;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{
    fmt::format::Writer, fmt::layer, fmt::time::FormatTime, layer::SubscriberExt,
    util::SubscriberInitExt, Registry,
};

/// Stamps each line with whole seconds since logging was set up
struct RunClock(Instant);

impl RunClock {
    fn start() -> Self {
        RunClock(Instant::now())
    }
}

impl FormatTime for RunClock {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let elapsed = self.0.elapsed().as_secs();
        write!(w, "+{:>5}s", elapsed)
    }
}

/// Send log output to a file, or to stdout when no path is given
pub fn setup_output(output_path: Option<&String>) {
    match output_path {
        Some(path) => match File::create(path) {
            Ok(log) => {
                let file_layer = layer()
                    .with_writer(Mutex::new(log))
                    .with_timer(RunClock::start())
                    .with_ansi(false);
                Registry::default().with(file_layer).init();
                info!("Log output written to: {}", path);
            }
            Err(e) => eprintln!("Could not create output file {}: {}", path, e),
        },
        None => {
            let stdout_layer = layer()
                .with_writer(std::io::stdout)
                .with_timer(RunClock::start())
                .with_ansi(true);
            Registry::default().with(stdout_layer).init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_clock_format() {
        let mut line = String::new();
        RunClock::start()
            .format_time(&mut Writer::new(&mut line))
            .unwrap();
        assert_eq!(line, "+    0s");
    }
}

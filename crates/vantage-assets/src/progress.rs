use tokio::sync::mpsc;

/// A 0-100 percentage update emitted while a load is underway.
///
/// Purely observational: consumers may display it, drop it, or never attach
/// a receiver at all; it carries no control-flow meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    pub percent: u8,
}

/// Sending half of the optional progress stream.
///
/// Loaders report through this without knowing whether anyone is listening;
/// a closed or absent receiver is silently ignored.
#[derive(Debug, Clone, Default)]
pub struct ProgressSink {
    tx: Option<mpsc::UnboundedSender<LoadProgress>>,
}

impl ProgressSink {
    /// A sink that discards every report.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// A connected sink plus the receiver to observe it with.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<LoadProgress>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    pub fn report(&self, percent: u8) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(LoadProgress {
                percent: percent.min(100),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_are_clamped_and_ordered() {
        let (sink, mut rx) = ProgressSink::channel();
        sink.report(0);
        sink.report(50);
        sink.report(200);

        assert_eq!(rx.try_recv().unwrap().percent, 0);
        assert_eq!(rx.try_recv().unwrap().percent, 50);
        assert_eq!(rx.try_recv().unwrap().percent, 100);
    }

    #[test]
    fn disabled_sink_swallows_reports() {
        let sink = ProgressSink::disabled();
        sink.report(42); // must not panic or block
    }

    #[test]
    fn dropped_receiver_is_ignored() {
        let (sink, rx) = ProgressSink::channel();
        drop(rx);
        sink.report(10);
    }
}

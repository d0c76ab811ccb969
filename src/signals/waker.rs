use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

// Wakes consumers interested in source signal changes of a device.
#[derive(Debug)]
pub struct SourcesChangedWaker {
    sender: watch::Sender<()>,
}
impl SourcesChangedWaker {
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(());

        Self { sender }
    }

    pub fn wake(&self) {
        self.sender.send_replace(());
    }

    pub fn stream(&self) -> WatchStream<()> {
        WatchStream::from_changes(self.sender.subscribe())
    }
}

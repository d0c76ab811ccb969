use super::async_flag;
use async_trait::async_trait;

// Long-running unit of the controller. Runs until the exit flag is
// signaled, then returns.
#[async_trait]
pub trait Runnable: Send + Sync {
    async fn run(
        &self,
        exit_flag: async_flag::Receiver,
    ) -> Exited;
}

#[derive(Debug)]
pub struct Exited;

pub mod events;
pub mod fetch;
pub mod poller;

pub use events::PollEvent;
pub use fetch::{Fetch, FetchQueues, QueueStatsFetcher, WorkPoolFetcher};
pub use poller::{run_queues, run_work_pool};

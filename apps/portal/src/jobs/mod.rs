// Job postings: creation and editing by their recruiter, public search,
// owner-only deletion that takes the job's applications with it.

pub mod forms;
pub mod handlers;
pub mod ownership;
pub mod search;
pub mod store;

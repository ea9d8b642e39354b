// Applications: one per (jobseeker, job), submitted with a skills and resume
// snapshot, triaged by the recruiter who owns the job.

pub mod forms;
pub mod handlers;
pub mod store;

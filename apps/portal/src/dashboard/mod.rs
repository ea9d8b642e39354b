// Per-user landing page: a recruiter sees their postings, a jobseeker sees
// their applications and jobs matching their skills.

pub mod handlers;
pub mod matching;

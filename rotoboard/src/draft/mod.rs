// Draft tracking: picks, rosters, log ingestion, and name resolution.

pub mod log_parser;
pub mod pick;
pub mod resolver;
pub mod roster;
pub mod state;

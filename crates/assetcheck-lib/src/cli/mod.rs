mod args;
mod check;
mod check_zip;
mod params;
mod resolved_command;
mod verify_file;

pub use args::{Args, Command, parse_args};
pub use check::run_check;
pub use check_zip::run_check_zip;
pub use params::{CheckParams, CheckZipParams, VerifyFileParams};
pub use resolved_command::{ResolvedCommand, resolve_command};
pub use verify_file::run_verify_file;

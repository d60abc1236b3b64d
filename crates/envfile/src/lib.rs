//! # envsync env files
//!
//! The `KEY=VALUE` line format shared by env files and parameter exports.
//!
//! ```text
//! DB_HOST=db1
//! DB_PASSWORD=hunter2 # encrypted
//! ```
//!
//! Lines that do not split into exactly one key and one value are dropped
//! when reading. A trailing `# encrypted` comment marks a secret and is
//! written back for encrypted parameters.

mod error;
mod file;
mod format;
mod param;
mod remap;

pub use error::{EnvFileError, Result};
pub use file::{load_file_into_env, read_env_file, write_env_file};
pub use format::{parse_env_str, parse_line, render_env, ENCRYPTED_MARKER};
pub use param::EnvParam;
pub use remap::{load_into_env, params_from_process_env, remap_keys, remap_keys_in_env};

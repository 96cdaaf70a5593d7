pub mod config_gen;
pub mod history;
pub mod shorten;
pub mod status;

pub use config_gen::config_generate;
pub use history::history;
pub use shorten::shorten;
pub use status::{account_stats, credential_status};

pub mod slug_validator;
pub mod url_validator;

pub use slug_validator::{normalize_slug, validate_slug, SlugValidationError};
pub use url_validator::{normalize_and_validate, normalize_url, validate_url, UrlValidationError};

/// 格式化运行时长，例如 `1d 2h 3m 4s`
pub fn format_uptime(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    if days > 0 {
        format!("{}d {}h {}m {}s", days, hours, minutes, seconds)
    } else if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

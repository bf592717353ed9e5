use crate::api::Time;

/// Short label for when a comment was posted, relative to `now`
pub fn format_relative(time: Time, now: Time) -> String {
    let elapsed = now - time;
    if elapsed < chrono::Duration::minutes(1) {
        String::from("just now")
    } else if elapsed < chrono::Duration::hours(1) {
        format!("{}m ago", elapsed.num_minutes())
    } else if elapsed < chrono::Duration::days(1) {
        format!("{}h ago", elapsed.num_hours())
    } else if elapsed < chrono::Duration::days(7) {
        format!("{}d ago", elapsed.num_days())
    } else {
        time.format("%b %-d, %Y").to_string()
    }
}

pub mod lead;
pub mod product;
pub mod settings;
pub mod slug;

use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

const STAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Lexicographically sortable UTC timestamp, `2024-09-01 12:30:00`.
pub fn now_stamp() -> String {
    OffsetDateTime::now_utc()
        .format(STAMP_FORMAT)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::now_stamp;

    #[test]
    fn stamp_is_sortable_shape() {
        let s = now_stamp();
        assert_eq!(s.len(), 19);
        assert_eq!(&s[4..5], "-");
        assert_eq!(&s[10..11], " ");
    }
}

use chrono::{Datelike, NaiveDate};

/// Motivational quotes shown on the home screen
pub const QUOTES: [&str; 5] = [
    "\"Indeed, Allah does not change the condition of a people until they change what is in themselves.\" - Quran (13:11)",
    "\"The ink of a scholar is more sacred than the blood of a martyr.\" - Prophet Muhammad (PBUH)",
    "\"Take account of yourselves before you are taken to account.\" - Umar ibn al-Khattab",
    "\"The world is a prison for the believer and a paradise for the disbeliever.\" - Prophet Muhammad (PBUH)",
    "\"Do not lose hope, nor be sad.\" - Quran (3:139)",
];

/// Quote of the day, stable for a given date
pub fn quote_for(date: NaiveDate) -> &'static str {
    QUOTES[date.ordinal0() as usize % QUOTES.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_rotates_daily() {
        let jan1 = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let jan2 = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let jan6 = NaiveDate::from_ymd_opt(2026, 1, 6).unwrap();

        assert_eq!(quote_for(jan1), QUOTES[0]);
        assert_eq!(quote_for(jan2), QUOTES[1]);
        assert_eq!(quote_for(jan6), QUOTES[0]);
    }
}

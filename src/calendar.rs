use time::{Date, Month};

use crate::db::Event;
use crate::res::escape;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEK_DAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// The month currently shown on the calendar. Navigation moves it exactly one
/// calendar month at a time, with no bounds in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    pub year: i32,
    pub month: Month,
}

impl MonthCursor {
    pub fn containing(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parses the `month` query parameter, e.g. `2024-03`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (year, month) = raw.split_once('-')?;
        let year = year.parse().ok()?;
        let month = Month::try_from(month.parse::<u8>().ok()?).ok()?;
        Some(Self { year, month })
    }

    pub fn query(&self) -> String {
        format!("{:04}-{:02}", self.year, u8::from(self.month))
    }

    pub fn label(&self) -> String {
        format!("{} {}", MONTH_NAMES[u8::from(self.month) as usize - 1], self.year)
    }

    pub fn prev(self) -> Self {
        let year = if self.month == Month::January {
            self.year - 1
        } else {
            self.year
        };
        Self {
            year,
            month: self.month.previous(),
        }
    }

    pub fn next(self) -> Self {
        let year = if self.month == Month::December {
            self.year + 1
        } else {
            self.year
        };
        Self {
            year,
            month: self.month.next(),
        }
    }
}

#[derive(Debug)]
pub struct DayCell<'a> {
    pub day: u8,
    pub is_today: bool,
    pub events: Vec<&'a Event>,
}

#[derive(Debug)]
pub struct MonthView<'a> {
    pub label: String,
    pub total_events: usize,
    pub leading_blanks: u8,
    pub days: Vec<DayCell<'a>>,
    pub prev: MonthCursor,
    pub next: MonthCursor,
}

/// Lays a flat event list onto the cursor's month: one cell per day, preceded
/// by blank cells up to the weekday of the 1st (0 = Sunday). Events sharing a
/// date keep their input order within the cell.
pub fn month_view<'a>(events: &'a [Event], cursor: MonthCursor, today: Date) -> MonthView<'a> {
    let leading_blanks = match Date::from_calendar_date(cursor.year, cursor.month, 1) {
        Ok(first) => first.weekday().number_days_from_sunday(),
        // year outside the supported range
        Err(_) => 0,
    };

    let days = (1..=cursor.month.length(cursor.year))
        .map(|day| {
            let events = events
                .iter()
                .filter(|e| {
                    e.event_date.year() == cursor.year
                        && e.event_date.month() == cursor.month
                        && e.event_date.day() == day
                })
                .collect();
            let is_today = today.year() == cursor.year
                && today.month() == cursor.month
                && today.day() == day;
            DayCell {
                day,
                is_today,
                events,
            }
        })
        .collect();

    MonthView {
        label: cursor.label(),
        total_events: events.len(),
        leading_blanks,
        days,
        prev: cursor.prev(),
        next: cursor.next(),
    }
}

pub fn render(view: &MonthView<'_>) -> String {
    let mut html = format!(
        "<div class=\"calendar-header\"><span>{}</span><span>{} total plans</span></div><div class=\"calendar-grid\">",
        view.label, view.total_events
    );
    for day in WEEK_DAYS {
        html += &format!("<div class=\"calendar-weekday\">{day}</div>");
    }
    for _ in 0..view.leading_blanks {
        html += "<div class=\"calendar-day\"></div>";
    }
    for cell in &view.days {
        let class = if cell.is_today {
            "calendar-cell is-today"
        } else {
            "calendar-cell"
        };
        html += &format!(
            "<div class=\"{class}\"><div class=\"calendar-date\">{}</div>",
            cell.day
        );
        for event in &cell.events {
            html += &format!(
                "<a class=\"calendar-event\" href=\"/events/{}\">{}</a>",
                event.id,
                escape(&event.title)
            );
        }
        html += "</div>";
    }
    html += "</div>";
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn event(id: i64, event_date: Date, title: &str) -> Event {
        Event {
            id,
            title: title.to_string(),
            description: String::new(),
            event_date,
            event_time: None,
            location: None,
        }
    }

    fn cursor(year: i32, month: Month) -> MonthCursor {
        MonthCursor { year, month }
    }

    #[test]
    fn grid_has_offset_blanks_then_one_cell_per_day() {
        // 2024-03-01 is a Friday
        let view = month_view(&[], cursor(2024, Month::March), date!(2020 - 01 - 01));
        assert_eq!(view.leading_blanks, 5);
        assert_eq!(view.days.len(), 31);
        assert_eq!(view.leading_blanks as usize + view.days.len(), 36);
    }

    #[test]
    fn february_length_tracks_leap_years() {
        let today = date!(2020 - 01 - 01);
        assert_eq!(month_view(&[], cursor(2024, Month::February), today).days.len(), 29);
        assert_eq!(month_view(&[], cursor(2023, Month::February), today).days.len(), 28);
    }

    #[test]
    fn label_and_total_cover_the_whole_collection() {
        let events = [
            event(1, date!(2024 - 03 - 05), "a"),
            event(2, date!(2024 - 09 - 05), "b"),
        ];
        let view = month_view(&events, cursor(2024, Month::March), date!(2020 - 01 - 01));
        assert_eq!(view.label, "March 2024");
        // events in other months still count toward the header total
        assert_eq!(view.total_events, 2);
        assert_eq!(view.days[4].events.len(), 1);
    }

    #[test]
    fn events_on_the_same_day_keep_their_input_order() {
        let events = [
            event(7, date!(2024 - 03 - 05), "first"),
            event(3, date!(2024 - 03 - 05), "second"),
        ];
        let view = month_view(&events, cursor(2024, Month::March), date!(2020 - 01 - 01));
        let titles: Vec<_> = view.days[4].events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["first", "second"]);
    }

    #[test]
    fn today_is_marked_only_in_the_current_month() {
        let today = date!(2024 - 03 - 15);
        let march = month_view(&[], cursor(2024, Month::March), today);
        assert!(march.days[14].is_today);
        assert_eq!(march.days.iter().filter(|d| d.is_today).count(), 1);

        let april = month_view(&[], cursor(2024, Month::April), today);
        assert!(april.days.iter().all(|d| !d.is_today));
    }

    #[test]
    fn navigation_rolls_over_year_boundaries() {
        assert_eq!(cursor(2024, Month::January).prev(), cursor(2023, Month::December));
        assert_eq!(cursor(2023, Month::December).next(), cursor(2024, Month::January));
        assert_eq!(cursor(2024, Month::June).prev(), cursor(2024, Month::May));
        assert_eq!(cursor(2024, Month::June).next(), cursor(2024, Month::July));
    }

    #[test]
    fn month_query_parameter_round_trips() {
        let parsed = MonthCursor::parse("2024-03").unwrap();
        assert_eq!(parsed, cursor(2024, Month::March));
        assert_eq!(parsed.query(), "2024-03");

        assert!(MonthCursor::parse("2024-13").is_none());
        assert!(MonthCursor::parse("whenever").is_none());
        assert!(MonthCursor::parse("2024").is_none());
    }

    #[test]
    fn rendered_grid_links_each_event_and_marks_today() {
        let events = [event(9, date!(2024 - 03 - 05), "Game <Night>")];
        let view = month_view(&events, cursor(2024, Month::March), date!(2024 - 03 - 05));
        let html = render(&view);

        assert!(html.contains("<span>March 2024</span>"));
        assert!(html.contains("href=\"/events/9\""));
        assert!(html.contains("Game &lt;Night&gt;"));
        assert!(html.contains("is-today"));
        assert_eq!(html.matches("<div class=\"calendar-day\"></div>").count(), 5);
    }
}

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::config::BookingConfig;
use crate::entities::{field, game};
use crate::error::AppError;

/// A half-open `[start, end)` UTC interval occupied by an existing game.
pub type BusyInterval = (DateTime<Utc>, DateTime<Utc>);

pub struct AvailabilityService;

impl AvailabilityService {
    /// Free start-time slots for a field on a calendar date, as `"HH:MM"`
    /// strings in the caller's local time.
    ///
    /// Pure with respect to game data: no side effects, identical output for
    /// identical data. All games block slots, including pending bookings.
    ///
    /// # Errors
    ///
    /// `NotFound` if the field does not exist.
    pub async fn free_slots(
        db: &DatabaseConnection,
        cfg: &BookingConfig,
        field_id: Uuid,
        date: NaiveDate,
        tz_offset_hours: i32,
    ) -> Result<Vec<String>, AppError> {
        let busy = Self::busy_intervals(db, cfg, field_id, date, tz_offset_hours).await?;
        let occupied = occupied_slots(cfg, date, tz_offset_hours, &busy);

        Ok(slot_start_minutes(cfg)
            .filter(|(i, _)| !occupied[*i])
            .map(|(_, minutes)| format_hhmm(minutes))
            .collect())
    }

    /// Valid end times for a chosen start slot: extend forward through
    /// contiguous free increments, offsetting each candidate by one increment
    /// to represent an end boundary.
    ///
    /// # Errors
    ///
    /// `NotFound` if the field does not exist, `BadRequest` if the start is
    /// malformed, outside the booking window, or not free.
    pub async fn end_times(
        db: &DatabaseConnection,
        cfg: &BookingConfig,
        field_id: Uuid,
        date: NaiveDate,
        tz_offset_hours: i32,
        start: &str,
    ) -> Result<Vec<String>, AppError> {
        let start_minutes = parse_hhmm(start)
            .ok_or_else(|| AppError::BadRequest("start must be formatted as HH:MM".to_string()))?;

        let busy = Self::busy_intervals(db, cfg, field_id, date, tz_offset_hours).await?;
        let occupied = occupied_slots(cfg, date, tz_offset_hours, &busy);

        let open = cfg.open_hour * 60;
        if start_minutes < open || (start_minutes - open) % cfg.slot_minutes != 0 {
            return Err(AppError::BadRequest(
                "start is not a valid slot boundary".to_string(),
            ));
        }
        let start_index = ((start_minutes - open) / cfg.slot_minutes) as usize;
        if start_index >= occupied.len() || occupied[start_index] {
            return Err(AppError::BadRequest(
                "start time is not available".to_string(),
            ));
        }

        let run = occupied[start_index..]
            .iter()
            .take_while(|taken| !**taken)
            .count();

        Ok((1..=run)
            .map(|k| {
                #[allow(clippy::cast_possible_truncation)]
                let offset = k as u32 * cfg.slot_minutes;
                format_hhmm(start_minutes + offset)
            })
            .collect())
    }

    /// Fetch the UTC intervals of all games on the field that overlap the
    /// local-day booking window. A game spanning midnight shows up in the
    /// windows of both affected dates.
    async fn busy_intervals(
        db: &DatabaseConnection,
        cfg: &BookingConfig,
        field_id: Uuid,
        date: NaiveDate,
        tz_offset_hours: i32,
    ) -> Result<Vec<BusyInterval>, AppError> {
        field::Entity::find_by_id(field_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Field not found.".to_string()))?;

        let window_start = local_minutes_to_utc(date, tz_offset_hours, cfg.open_hour * 60);
        let window_end = local_minutes_to_utc(date, tz_offset_hours, cfg.close_hour * 60);

        let games = game::Entity::find()
            .filter(game::Column::FieldId.eq(field_id))
            .filter(game::Column::StartsAt.lt(window_end))
            .filter(game::Column::EndsAt.gt(window_start))
            .all(db)
            .await?;

        Ok(games
            .into_iter()
            .map(|g| {
                (
                    g.starts_at.with_timezone(&Utc),
                    g.ends_at.with_timezone(&Utc),
                )
            })
            .collect())
    }
}

/// Iterate slot indices with their start offsets in minutes from local midnight.
fn slot_start_minutes(cfg: &BookingConfig) -> impl Iterator<Item = (usize, u32)> + '_ {
    let open = cfg.open_hour * 60;
    let close = cfg.close_hour * 60;
    (0..)
        .map(move |i: u32| (i as usize, open + i * cfg.slot_minutes))
        .take_while(move |(_, start)| start + cfg.slot_minutes <= close)
}

/// Mark every slot whose `[start, start + slot)` interval intersects a busy
/// interval. Both sides are half-open, so a game ending exactly at a slot's
/// start does not block that slot.
#[must_use]
pub fn occupied_slots(
    cfg: &BookingConfig,
    date: NaiveDate,
    tz_offset_hours: i32,
    busy: &[BusyInterval],
) -> Vec<bool> {
    slot_start_minutes(cfg)
        .map(|(_, minutes)| {
            let slot_start = local_minutes_to_utc(date, tz_offset_hours, minutes);
            let slot_end = slot_start + Duration::minutes(i64::from(cfg.slot_minutes));
            busy.iter()
                .any(|(start, end)| *start < slot_end && *end > slot_start)
        })
        .collect()
}

/// Convert a minute offset from local midnight on `date` to a UTC instant,
/// given the caller's offset from UTC in whole hours.
fn local_minutes_to_utc(date: NaiveDate, tz_offset_hours: i32, minutes: u32) -> DateTime<Utc> {
    let midnight_local = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    midnight_local + Duration::minutes(i64::from(minutes)) - Duration::hours(i64::from(tz_offset_hours))
}

/// Format minutes from midnight as `"HH:MM"`. The window close boundary may
/// render as `"24:00"`.
#[must_use]
pub fn format_hhmm(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Parse an `"HH:MM"` string into minutes from midnight.
#[must_use]
pub fn parse_hhmm(s: &str) -> Option<u32> {
    let (hours, mins) = s.split_once(':')?;
    if hours.len() != 2 || mins.len() != 2 {
        return None;
    }
    let hours: u32 = hours.parse().ok()?;
    let mins: u32 = mins.parse().ok()?;
    if hours > 24 || mins > 59 || (hours == 24 && mins != 0) {
        return None;
    }
    Some(hours * 60 + mins)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        chrono::NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|date| date.and_hms_opt(h, mi, 0))
            .map(|dt| Utc.from_utc_datetime(&dt))
            .unwrap_or_default()
    }

    fn date(y: i32, mo: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, mo, d).unwrap_or_default()
    }

    fn free_labels(cfg: &BookingConfig, d: NaiveDate, tz: i32, busy: &[BusyInterval]) -> Vec<String> {
        occupied_slots(cfg, d, tz, busy)
            .iter()
            .zip(slot_start_minutes(cfg))
            .filter_map(|(taken, (_, minutes))| (!taken).then(|| format_hhmm(minutes)))
            .collect()
    }

    #[test]
    fn empty_field_has_all_slots() {
        let cfg = BookingConfig::default();
        let labels = free_labels(&cfg, date(2025, 6, 1), 0, &[]);
        assert_eq!(labels.len(), 48);
        assert_eq!(labels[0], "00:00");
        assert_eq!(labels[47], "23:30");
    }

    #[test]
    fn booked_interval_blocks_its_slots_only() {
        // One game 10:00-12:00 UTC on the requested date.
        let cfg = BookingConfig::default();
        let busy = vec![(utc(2025, 6, 1, 10, 0), utc(2025, 6, 1, 12, 0))];
        let labels = free_labels(&cfg, date(2025, 6, 1), 0, &busy);

        assert!(labels.contains(&"09:30".to_string()));
        assert!(!labels.contains(&"10:00".to_string()));
        assert!(!labels.contains(&"11:30".to_string()));
        // Half-open interval: a game ending exactly at 12:00 frees that slot.
        assert!(labels.contains(&"12:00".to_string()));
    }

    #[test]
    fn timezone_offset_shifts_blocked_labels() {
        // Game at 10:00-11:00 UTC seen from UTC+2 blocks the 12:00 local slot.
        let cfg = BookingConfig::default();
        let busy = vec![(utc(2025, 6, 1, 10, 0), utc(2025, 6, 1, 11, 0))];
        let labels = free_labels(&cfg, date(2025, 6, 1), 2, &busy);

        assert!(!labels.contains(&"12:00".to_string()));
        assert!(!labels.contains(&"12:30".to_string()));
        assert!(labels.contains(&"13:00".to_string()));
        assert!(labels.contains(&"11:30".to_string()));
    }

    #[test]
    fn midnight_spanning_game_blocks_both_dates() {
        let cfg = BookingConfig::default();
        let busy = vec![(utc(2025, 6, 1, 23, 0), utc(2025, 6, 2, 1, 0))];

        let day_one = free_labels(&cfg, date(2025, 6, 1), 0, &busy);
        assert!(!day_one.contains(&"23:00".to_string()));
        assert!(!day_one.contains(&"23:30".to_string()));
        assert!(day_one.contains(&"22:30".to_string()));

        let day_two = free_labels(&cfg, date(2025, 6, 2), 0, &busy);
        assert!(!day_two.contains(&"00:00".to_string()));
        assert!(!day_two.contains(&"00:30".to_string()));
        assert!(day_two.contains(&"01:00".to_string()));
    }

    #[test]
    fn fully_booked_day_yields_no_slots() {
        let cfg = BookingConfig::default();
        let busy = vec![(utc(2025, 6, 1, 0, 0), utc(2025, 6, 2, 0, 0))];
        assert!(free_labels(&cfg, date(2025, 6, 1), 0, &busy).is_empty());
    }

    #[test]
    fn restricted_window_limits_slot_grid() {
        let cfg = BookingConfig {
            open_hour: 8,
            close_hour: 22,
            slot_minutes: 30,
        };
        let labels = free_labels(&cfg, date(2025, 6, 1), 0, &[]);
        assert_eq!(labels.first().map(String::as_str), Some("08:00"));
        assert_eq!(labels.last().map(String::as_str), Some("21:30"));
        assert_eq!(labels.len(), 28);
    }

    #[test]
    fn parse_hhmm_accepts_valid_rejects_invalid() {
        assert_eq!(parse_hhmm("09:30"), Some(570));
        assert_eq!(parse_hhmm("24:00"), Some(1440));
        assert_eq!(parse_hhmm("24:30"), None);
        assert_eq!(parse_hhmm("9:30"), None);
        assert_eq!(parse_hhmm("ab:cd"), None);
        assert_eq!(parse_hhmm("1200"), None);
    }

    #[test]
    fn format_hhmm_pads_and_handles_close_boundary() {
        assert_eq!(format_hhmm(0), "00:00");
        assert_eq!(format_hhmm(570), "09:30");
        assert_eq!(format_hhmm(1440), "24:00");
    }
}

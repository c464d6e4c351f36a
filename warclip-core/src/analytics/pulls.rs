//! Daily pull numbering.
//!
//! A pull number is the 1-based position of a recording among the same day's
//! attempts at the same encounter on the same difficulty. It is derived from
//! whatever sibling set the caller passes in and is never stored.

use chrono::{Local, NaiveDate, TimeZone};

use crate::types::VideoSession;

/// Pull number of `target` among `siblings`, using the local calendar day.
///
/// Returns `0` when no pull number applies: the target lacks an encounter or
/// difficulty id, or it is not part of `siblings`.
pub fn pull_number<'a>(
    target: &VideoSession,
    siblings: impl IntoIterator<Item = &'a VideoSession>,
) -> u32 {
    pull_number_in(&Local, target, siblings)
}

/// Pull number of `target` among `siblings`, comparing calendar days in `tz`.
///
/// Qualifying siblings share the target's calendar day and have the same
/// defined encounter and difficulty ids. They are ordered by capture time;
/// equal capture times keep their order in `siblings`. The target is located
/// by [`SessionKey`](crate::types::SessionKey), not by reference.
pub fn pull_number_in<'a, Tz: TimeZone>(
    tz: &Tz,
    target: &VideoSession,
    siblings: impl IntoIterator<Item = &'a VideoSession>,
) -> u32 {
    let (Some(encounter_id), Some(difficulty_id)) = (target.encounter_id, target.difficulty_id)
    else {
        return 0;
    };

    let day = calendar_day(tz, target);

    let mut group: Vec<&VideoSession> = siblings
        .into_iter()
        .filter(|s| s.encounter_id == Some(encounter_id))
        .filter(|s| s.difficulty_id == Some(difficulty_id))
        .filter(|s| calendar_day(tz, s) == day)
        .collect();

    // Stable: ties keep caller order.
    group.sort_by_key(|s| s.captured_at());

    group
        .iter()
        .position(|s| s.key() == target.key())
        .map_or(0, |index| index as u32 + 1)
}

fn calendar_day<Tz: TimeZone>(tz: &Tz, session: &VideoSession) -> NaiveDate {
    session.captured_at().with_timezone(tz).date_naive()
}

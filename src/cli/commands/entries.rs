// Time entry commands. The pure parts take `now` and the display zone so they
// can be exercised with fixed clocks.

use crate::cli::api_client::ApiClient;
use crate::cli::args::{AddEntryArgs, GetEntriesArgs, StartArgs, StopArgs, UpdateEntryArgs};
use crate::contracts::time_entry::{StartRequest, StopRequest, TimeEntryResource};
use crate::modules::time_entries::core::time_entry::{EntryType, start_of_day};
use crate::shared::core::duration::format_duration;
use crate::shared::core::time_reference::parse_time_ref;
use anyhow::{Context, bail};
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use std::fmt;

/// Resolves a time reference typed on the command line against `reference`.
pub fn resolve<Tz: TimeZone>(input: &str, reference: &DateTime<Tz>) -> anyhow::Result<DateTime<Utc>> {
    let resolved = parse_time_ref(input, reference)
        .with_context(|| format!("cannot understand the time \"{input}\""))?;
    Ok(resolved.with_timezone(&Utc))
}

/// Day-based entries start and end at local midnight.
pub fn at_midnight<Tz: TimeZone>(instant: DateTime<Utc>, zone: &Tz) -> DateTime<Utc> {
    start_of_day(&instant.with_timezone(zone)).with_timezone(&Utc)
}

fn normalize<Tz: TimeZone>(
    entry_type: EntryType,
    instant: Option<DateTime<Utc>>,
    zone: &Tz,
) -> Option<DateTime<Utc>> {
    match instant {
        Some(instant) if !entry_type.is_work() => Some(at_midnight(instant, zone)),
        other => other,
    }
}

pub fn new_entry<Tz: TimeZone>(
    args: &AddEntryArgs,
    now: &DateTime<Tz>,
) -> anyhow::Result<TimeEntryResource> {
    if args.start.is_none() && args.end.is_none() {
        bail!("At least one of start time or end time must be specified!");
    }
    let at = |input: &Option<String>| match input {
        Some(input) => resolve(input, now),
        None => Ok(now.with_timezone(&Utc)),
    };
    let zone = now.timezone();

    Ok(TimeEntryResource {
        id: String::new(),
        project_name: args.project.clone(),
        entry_type: args.entry_type,
        start: normalize(args.entry_type, Some(at(&args.start)?), &zone),
        end: normalize(args.entry_type, Some(at(&args.end)?), &zone),
        breaks: args.breaks.unwrap_or_else(TimeDelta::zero),
        comment: args.comment.clone(),
    })
}

pub fn start_request<Tz: TimeZone>(
    args: &StartArgs,
    now: &DateTime<Tz>,
) -> anyhow::Result<StartRequest> {
    let start = match &args.when {
        Some(when) => resolve(when, now)?,
        None => now.with_timezone(&Utc),
    };
    Ok(StartRequest {
        entry_type: args.entry_type,
        start: normalize(args.entry_type, Some(start), &now.timezone()),
        breaks: args.breaks.unwrap_or_else(TimeDelta::zero),
        comment: args.comment.clone(),
    })
}

/// The only running entry in `entries`.
pub fn select_open_entry(entries: &[TimeEntryResource]) -> anyhow::Result<&TimeEntryResource> {
    let open: Vec<&TimeEntryResource> = entries.iter().filter(|entry| entry.is_open()).collect();
    match open.as_slice() {
        [] => bail!("Did not find any time entry to close"),
        [entry] => Ok(entry),
        several => {
            let projects: Vec<&str> = several
                .iter()
                .map(|entry| entry.project_name.as_str())
                .collect();
            bail!(
                "More than one running entry ({}); name the project to stop",
                projects.join(", ")
            )
        }
    }
}

pub fn stop_request<Tz: TimeZone>(
    entry: &TimeEntryResource,
    args: &StopArgs,
    now: &DateTime<Tz>,
) -> anyhow::Result<StopRequest> {
    let end = match &args.when {
        Some(when) => resolve(when, now)?,
        None => now.with_timezone(&Utc),
    };
    Ok(StopRequest {
        end: normalize(entry.entry_type, Some(end), &now.timezone()),
        breaks: args.breaks,
    })
}

/// Applies the given fields; relative start and end times are resolved
/// against the entry's current start (or end) rather than the clock.
pub fn apply_update<Tz: TimeZone>(
    entry: &mut TimeEntryResource,
    args: &UpdateEntryArgs,
    now: &DateTime<Tz>,
) -> anyhow::Result<()> {
    let zone = now.timezone();
    let anchor = |instant: Option<DateTime<Utc>>| match instant {
        Some(instant) => instant.with_timezone(&zone),
        None => now.clone(),
    };

    if let Some(start) = &args.start {
        entry.start = Some(resolve(start, &anchor(entry.start))?);
    }
    if let Some(end) = &args.end {
        entry.end = Some(resolve(end, &anchor(entry.end.or(entry.start)))?);
    }
    if let Some(breaks) = args.breaks {
        entry.breaks = breaks;
    }
    if let Some(entry_type) = args.entry_type {
        entry.entry_type = entry_type;
    }
    if let Some(comment) = &args.comment {
        entry.comment = comment.clone();
    }
    entry.start = normalize(entry.entry_type, entry.start, &zone);
    entry.end = normalize(entry.entry_type, entry.end, &zone);
    Ok(())
}

/// Entries starting at or after `from` and ending at or before `to`; a bound
/// excludes entries lacking the instant it checks.
pub fn in_range(
    entry: &TimeEntryResource,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> bool {
    let after = from.is_none_or(|from| entry.start.is_some_and(|start| start >= from));
    let before = to.is_none_or(|to| entry.end.is_some_and(|end| end <= to));
    after && before
}

/// Listing printed by `get-entries`: one line per entry, then the total work
/// duration.
pub struct EntryListing<'a, Tz: TimeZone> {
    pub entries: Vec<&'a TimeEntryResource>,
    pub now: DateTime<Utc>,
    pub zone: Tz,
}

impl<'a, Tz: TimeZone> EntryListing<'a, Tz> {
    pub fn new(
        entries: &'a [TimeEntryResource],
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        zone: Tz,
    ) -> Self {
        Self {
            entries: entries
                .iter()
                .filter(|entry| in_range(entry, from, to))
                .collect(),
            now,
            zone,
        }
    }

    pub fn total_work(&self) -> TimeDelta {
        self.entries
            .iter()
            .filter(|entry| entry.entry_type.is_work())
            .map(|entry| entry.elapsed(self.now))
            .fold(TimeDelta::zero(), |total, elapsed| total + elapsed)
    }
}

impl<Tz: TimeZone> fmt::Display for EntryListing<'_, Tz>
where
    Tz::Offset: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry.line(self.now, self.zone.clone()))?;
        }
        write!(f, "Total duration: {}", format_duration(self.total_work()))
    }
}

pub async fn add_entry(client: &mut ApiClient, args: AddEntryArgs) -> anyhow::Result<()> {
    let entry = new_entry(&args, &Local::now())?;
    let created = client.add_time_entry(&args.project, &entry).await?;
    println!("{created}");
    Ok(())
}

pub async fn get_entries(client: &mut ApiClient, args: GetEntriesArgs) -> anyhow::Result<()> {
    let now = Local::now();
    let from = args.start.as_deref().map(|from| resolve(from, &now)).transpose()?;
    let to = args.end.as_deref().map(|to| resolve(to, &now)).transpose()?;

    let entries = client.get_time_entries(args.project.as_deref()).await?;
    println!(
        "{}",
        EntryListing::new(&entries, from, to, now.with_timezone(&Utc), Local)
    );
    Ok(())
}

pub async fn start(client: &mut ApiClient, args: StartArgs) -> anyhow::Result<()> {
    let request = start_request(&args, &Local::now())?;
    let started = client.start(&args.project, &request).await?;
    println!("{started}");
    Ok(())
}

pub async fn stop(client: &mut ApiClient, args: StopArgs) -> anyhow::Result<()> {
    let entries = client.get_time_entries(args.project.as_deref()).await?;
    let open = select_open_entry(&entries)?;
    let request = stop_request(open, &args, &Local::now())?;
    let stopped = client.stop(&open.project_name, &request).await?;
    println!("{stopped}");
    Ok(())
}

pub async fn update_entry(client: &mut ApiClient, args: UpdateEntryArgs) -> anyhow::Result<()> {
    let mut entry = client.get_time_entry(&args.project, &args.id).await?;
    apply_update(&mut entry, &args, &Local::now())?;
    let updated = client.update_time_entry(&args.project, &entry).await?;
    println!("{updated}");
    Ok(())
}

#[cfg(test)]
mod entry_commands_tests {
    use super::*;
    use chrono::FixedOffset;
    use rstest::{fixture, rstest};

    fn zone() -> FixedOffset {
        FixedOffset::east_opt(3600).unwrap()
    }

    #[fixture]
    fn now() -> DateTime<FixedOffset> {
        zone().with_ymd_and_hms(2024, 3, 6, 14, 30, 0).unwrap()
    }

    fn local(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        zone()
            .with_ymd_and_hms(2024, 3, day, hour, minute, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn add_args(start: Option<&str>, end: Option<&str>, entry_type: EntryType) -> AddEntryArgs {
        AddEntryArgs {
            project: "acme".into(),
            start: start.map(String::from),
            end: end.map(String::from),
            breaks: None,
            entry_type,
            comment: String::new(),
        }
    }

    fn entry(project: &str, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> TimeEntryResource {
        TimeEntryResource {
            id: format!("{project}-1"),
            project_name: project.into(),
            entry_type: EntryType::Work,
            start,
            end,
            breaks: TimeDelta::zero(),
            comment: String::new(),
        }
    }

    #[rstest]
    fn add_entry_needs_a_start_or_an_end(now: DateTime<FixedOffset>) {
        assert!(new_entry(&add_args(None, None, EntryType::Work), &now).is_err());
    }

    #[rstest]
    fn add_entry_defaults_the_missing_side_to_now(now: DateTime<FixedOffset>) {
        let entry = new_entry(&add_args(Some("9:00"), None, EntryType::Work), &now).unwrap();

        assert_eq!(entry.start, Some(local(6, 9, 0)));
        assert_eq!(entry.end, Some(now.with_timezone(&Utc)));
        assert_eq!(entry.project_name, "acme");
    }

    #[rstest]
    fn day_entries_snap_to_local_midnight(now: DateTime<FixedOffset>) {
        let entry = new_entry(
            &add_args(Some("yesterday"), Some("tomorrow"), EntryType::Vacation),
            &now,
        )
        .unwrap();

        assert_eq!(entry.start, Some(local(5, 0, 0)));
        assert_eq!(entry.end, Some(local(7, 0, 0)));
    }

    #[rstest]
    fn unparseable_times_name_the_input(now: DateTime<FixedOffset>) {
        let error = new_entry(&add_args(Some("whenever"), None, EntryType::Work), &now).unwrap_err();

        assert!(error.to_string().contains("whenever"));
    }

    #[rstest]
    fn start_resolves_relative_times(now: DateTime<FixedOffset>) {
        let args = StartArgs {
            project: "acme".into(),
            when: Some("15 minutes ago".into()),
            breaks: None,
            entry_type: EntryType::Work,
            comment: "standup".into(),
        };

        let request = start_request(&args, &now).unwrap();

        assert_eq!(request.start, Some(local(6, 14, 15)));
        assert_eq!(request.comment, "standup");
    }

    #[rstest]
    fn stop_picks_the_single_running_entry() {
        let entries = vec![
            entry("acme", Some(local(6, 8, 0)), Some(local(6, 9, 0))),
            entry("globex", Some(local(6, 9, 0)), None),
        ];

        assert_eq!(select_open_entry(&entries).unwrap().project_name, "globex");
    }

    #[rstest]
    fn stop_refuses_to_guess_between_running_entries() {
        let entries = vec![
            entry("acme", Some(local(6, 8, 0)), None),
            entry("globex", Some(local(6, 9, 0)), None),
        ];

        let error = select_open_entry(&entries).unwrap_err().to_string();
        assert!(error.contains("acme, globex"), "{error}");
        assert!(select_open_entry(&[]).is_err());
    }

    #[rstest]
    fn stop_requests_normalise_day_entries(now: DateTime<FixedOffset>) {
        let mut sick = entry("acme", Some(local(4, 0, 0)), None);
        sick.entry_type = EntryType::Sick;
        let args = StopArgs {
            project: None,
            when: None,
            breaks: Some(TimeDelta::minutes(5)),
        };

        let request = stop_request(&sick, &args, &now).unwrap();

        assert_eq!(request.end, Some(local(6, 0, 0)));
        assert_eq!(request.breaks, Some(TimeDelta::minutes(5)));
    }

    #[rstest]
    fn updates_resolve_against_the_entry_not_the_clock(now: DateTime<FixedOffset>) {
        let mut updated = entry("acme", Some(local(4, 9, 0)), Some(local(4, 17, 0)));
        let args = UpdateEntryArgs {
            project: "acme".into(),
            id: "acme-1".into(),
            start: Some("8:30".into()),
            end: Some("-1h".into()),
            breaks: None,
            entry_type: None,
            comment: Some("moved".into()),
        };

        apply_update(&mut updated, &args, &now).unwrap();

        assert_eq!(updated.start, Some(local(4, 8, 30)));
        assert_eq!(updated.end, Some(local(4, 16, 0)));
        assert_eq!(updated.comment, "moved");
    }

    #[rstest]
    fn ranges_exclude_entries_missing_the_checked_instant() {
        let closed = entry("acme", Some(local(4, 9, 0)), Some(local(4, 17, 0)));
        let running = entry("acme", Some(local(5, 9, 0)), None);

        assert!(in_range(&closed, None, None));
        assert!(in_range(&closed, Some(local(4, 0, 0)), Some(local(5, 0, 0))));
        assert!(!in_range(&closed, Some(local(4, 10, 0)), None));
        assert!(!in_range(&running, None, Some(local(6, 0, 0))));
        assert!(in_range(&running, Some(local(5, 0, 0)), None));
    }

    #[rstest]
    fn listings_end_with_the_total_work_duration() {
        let mut vacation = entry("acme", Some(local(1, 0, 0)), Some(local(3, 0, 0)));
        vacation.entry_type = EntryType::Vacation;
        let entries = vec![
            entry("acme", Some(local(4, 9, 0)), Some(local(4, 17, 0))),
            entry("acme", Some(local(5, 9, 0)), Some(local(5, 10, 30))),
            vacation,
        ];

        let listing = EntryListing::new(&entries, None, None, local(6, 0, 0), zone());
        let rendered = listing.to_string();

        assert_eq!(listing.total_work(), TimeDelta::minutes(9 * 60 + 30));
        assert_eq!(rendered.lines().count(), 4);
        assert_eq!(rendered.lines().last(), Some("Total duration: 9h30m0s"));
    }
}

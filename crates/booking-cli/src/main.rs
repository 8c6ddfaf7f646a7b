//! `booking-check` CLI: check an event request against existing bookings.
//!
//! ## Usage
//!
//! ```sh
//! # Venue conflicts, events fetched from the API
//! booking-check venue -l "Hall 1" -d 2024-06-01 -s 10:00 -e 12:00
//!
//! # Same check against a saved event dump
//! booking-check --events events.json venue -l "Hall 1" -d 2024-06-01 -s 10:00 -e 12:00
//!
//! # Who else holds "Chairs" at that time, at any venue
//! booking-check requirement --name Chairs -l "Hall 2" -d 2024-06-01 -s 10:00 -e 12:00
//!
//! # Remaining quantities for one department's catalog
//! booking-check availability --department GSO -l "Hall 2" -d 2024-06-01 -s 10:00 -e 12:00
//!
//! # Picker badges every 30 minutes between 07:00 and 21:00
//! booking-check slots -l "Hall 1" -d 2024-06-01 --requirement Chairs
//!
//! # Refuse a claim set that asks for more than is left (exit code 1)
//! booking-check validate --claims claims.json --department GSO -l "Hall 2" -d 2024-06-01 -s 10:00 -e 12:00
//! ```

mod client;
mod config;
mod source;

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use booking_engine::availability::{department_availability, RequirementAvailability};
use booking_engine::conflict::{
    check_booking, find_requirement_conflicts, find_venue_conflicts, BookingCheck, NameMatch,
    RequirementConflict, VenueConflict,
};
use booking_engine::error::BookingError;
use booking_engine::freebusy::{first_free_window, venue_free_windows, FreeWindow};
use booking_engine::gate::validate_department_claims;
use booking_engine::model::{ProposedBooking, RequirementClaim};
use booking_engine::slots::{slot_board, IntervalRule, SlotBadge, SlotStatus};
use booking_engine::time::{slot_options, ClockTime, TimeRange};
use booking_engine::Schedule;

use crate::client::ApiClient;
use crate::config::{Config, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_TIMEZONE};
use crate::source::Source;

#[derive(Parser)]
#[command(
    name = "booking-check",
    version,
    about = "Check event booking requests for venue and resource conflicts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Read events from a JSON file instead of the API
    #[arg(long, global = true)]
    events: Option<PathBuf>,

    /// Department catalog JSON file (with --events)
    #[arg(long, global = true)]
    departments: Option<PathBuf>,

    /// Availability records JSON file (with --events)
    #[arg(long, global = true)]
    records: Option<PathBuf>,

    /// Base URL of the events API
    #[arg(long, global = true, env = "BOOKING_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// IANA timezone used to resolve event dates
    #[arg(long, global = true, env = "BOOKING_TZ", default_value = DEFAULT_TIMEZONE)]
    timezone: String,

    /// HTTP timeout in seconds
    #[arg(long, global = true, env = "BOOKING_API_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Match requirement names ignoring case and surrounding whitespace
    #[arg(long, global = true)]
    normalized_names: bool,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// The booking being requested.
#[derive(Args)]
struct BookingArgs {
    /// Venue name, as stored on events
    #[arg(short, long)]
    location: String,
    /// Calendar date (YYYY-MM-DD)
    #[arg(short, long)]
    date: NaiveDate,
    /// Start time (HH:MM)
    #[arg(short, long)]
    start: ClockTime,
    /// End time (HH:MM)
    #[arg(short, long)]
    end: ClockTime,
}

impl BookingArgs {
    fn proposed(&self) -> Result<ProposedBooking> {
        let range = TimeRange::new(self.start, self.end)?;
        Ok(ProposedBooking {
            location: self.location.clone(),
            date: self.date,
            range,
        })
    }
}

/// A venue's operating hours on one day.
#[derive(Args)]
struct DayArgs {
    /// Venue name
    #[arg(short, long)]
    location: String,
    /// Calendar date (YYYY-MM-DD)
    #[arg(short, long)]
    date: NaiveDate,
    /// First bookable time
    #[arg(long, default_value = "07:00")]
    from: ClockTime,
    /// Last bookable time
    #[arg(long, default_value = "21:00")]
    to: ClockTime,
}

#[derive(Subcommand)]
enum Commands {
    /// Existing bookings at the same venue that overlap the request
    Venue {
        #[command(flatten)]
        booking: BookingArgs,
    },
    /// Bookings at any venue that hold the named requirement during the request
    Requirement {
        /// Requirement name as claimed on events (e.g. "Chairs")
        #[arg(short, long)]
        name: String,
        /// Catalog quantity; when given, the remaining quantity is reported
        #[arg(long)]
        total: Option<u32>,
        #[command(flatten)]
        booking: BookingArgs,
    },
    /// Remaining quantity of every requirement in a department's catalog
    Availability {
        /// Department name or id
        #[arg(long)]
        department: String,
        #[command(flatten)]
        booking: BookingArgs,
    },
    /// Venue conflicts plus requirement availability for the tagged departments
    Check {
        /// Tagged department name or id (repeatable)
        #[arg(long = "department", id = "department")]
        departments: Vec<String>,
        #[command(flatten)]
        booking: BookingArgs,
    },
    /// VENUE/REQ badges for each start-time option of the picker
    Slots {
        #[command(flatten)]
        day: DayArgs,
        /// Minutes between options
        #[arg(long, default_value_t = 30)]
        step: u16,
        /// Requirement the user has selected (repeatable)
        #[arg(long = "requirement")]
        requirements: Vec<String>,
        /// Treat an option equal to a booking's end time as free
        #[arg(long)]
        half_open: bool,
    },
    /// Free windows at a venue
    Free {
        #[command(flatten)]
        day: DayArgs,
        /// Only report the first window at least this long
        #[arg(long)]
        min_minutes: Option<u16>,
    },
    /// Refuse a claim set that requests more than is available
    Validate {
        /// JSON array of requirement claims
        #[arg(long)]
        claims: PathBuf,
        /// Department name or id supplying the claims
        #[arg(long)]
        department: String,
        #[command(flatten)]
        booking: BookingArgs,
    },
    /// Venues and whether they are open for booking (API only)
    Locations {
        /// Only list entries for this date
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::new(&cli.api_url, &cli.timezone, cli.timeout_secs)?;
    let source = match &cli.events {
        Some(events) => Source::Files {
            events: events.clone(),
            departments: cli.departments.clone(),
            records: cli.records.clone(),
        },
        None => {
            debug!(api_url = %config.api_url, "reading from events API");
            Source::Api(ApiClient::new(&config)?)
        }
    };
    let name_match = if cli.normalized_names {
        NameMatch::Normalized
    } else {
        NameMatch::Exact
    };

    let load_schedule = || -> Result<Schedule> {
        let schedule = Schedule::build(source.events()?, config.timezone);
        debug!(
            indexed = schedule.len(),
            rejected = schedule.rejected().len(),
            "schedule built"
        );
        Ok(schedule)
    };

    match cli.command {
        Commands::Venue { booking } => {
            let proposed = booking.proposed()?;
            let conflicts = find_venue_conflicts(&load_schedule()?, &proposed);
            emit(cli.format, &conflicts, || render_venue(&proposed, &conflicts))?;
        }
        Commands::Requirement { name, total, booking } => {
            let proposed = booking.proposed()?;
            let conflicts = find_requirement_conflicts(&load_schedule()?, &name, &proposed, name_match);
            let report = RequirementReport {
                requirement: name,
                total,
                available: total.map(|t| booking_engine::available_quantity(t, &conflicts)),
                conflicts,
            };
            emit(cli.format, &report, || render_requirement(&report))?;
        }
        Commands::Availability { department, booking } => {
            let proposed = booking.proposed()?;
            let department = source.department(&department)?;
            let records = source.records(&department, proposed.date)?;
            let report = department_availability(&load_schedule()?, &department, &proposed, &records, name_match);
            emit(cli.format, &report, || render_availability(&report))?;
        }
        Commands::Check { departments, booking } => {
            let proposed = booking.proposed()?;
            let schedule = load_schedule()?;
            let mut tagged = Vec::new();
            let mut records = Vec::new();
            for key in &departments {
                let dept = source.department(key)?;
                records.extend(source.records(&dept, proposed.date)?);
                tagged.push(dept);
            }
            let check = check_booking(&schedule, &proposed, &tagged, &records, name_match);
            emit(cli.format, &check, || render_check(&proposed, &check))?;
            if check.is_blocked() {
                process::exit(1);
            }
        }
        Commands::Slots {
            day,
            step,
            requirements,
            half_open,
        } => {
            let rule = if half_open {
                IntervalRule::HalfOpen
            } else {
                IntervalRule::Inclusive
            };
            let options = slot_options(day.from, day.to, step);
            let board = slot_board(
                &load_schedule()?,
                &day.location,
                day.date,
                &options,
                &requirements,
                rule,
                name_match,
            );
            emit(cli.format, &board, || render_slots(&board))?;
        }
        Commands::Free { day, min_minutes } => {
            let window = TimeRange::new(day.from, day.to)?;
            let schedule = load_schedule()?;
            let windows: Vec<FreeWindow> = match min_minutes {
                Some(min) => first_free_window(&schedule, &day.location, day.date, window, min)
                    .into_iter()
                    .collect(),
                None => venue_free_windows(&schedule, &day.location, day.date, window),
            };
            emit(cli.format, &windows, || render_free(&windows))?;
        }
        Commands::Validate {
            claims,
            department,
            booking,
        } => {
            let proposed = booking.proposed()?;
            let raw = std::fs::read_to_string(&claims)
                .with_context(|| format!("Failed to read file: {}", claims.display()))?;
            let claims: Vec<RequirementClaim> = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse claims in {}", claims.display()))?;
            let department = source.department(&department)?;
            let records = source.records(&department, proposed.date)?;
            let report = department_availability(&load_schedule()?, &department, &proposed, &records, name_match);

            match validate_department_claims(&department.name, &claims, &report, name_match) {
                Ok(()) => emit(cli.format, &serde_json::json!({ "ok": true }), || "OK".to_string())?,
                Err(BookingError::QuantityExceeded(violations)) => {
                    let message = BookingError::QuantityExceeded(violations.clone()).to_string();
                    emit(
                        cli.format,
                        &serde_json::json!({ "ok": false, "message": message, "violations": violations }),
                        || format!("REJECTED: {}", message),
                    )?;
                    process::exit(1);
                }
                Err(other) => return Err(other.into()),
            }
        }
        Commands::Locations { date } => {
            let locations: Vec<_> = source
                .locations()?
                .into_iter()
                .filter(|l| match (date, l.date.as_deref()) {
                    (Some(want), Some(raw)) => booking_engine::calendar::calendar_date(raw, config.timezone)
                        .is_ok_and(|d| d == want),
                    _ => true,
                })
                .collect();
            emit(cli.format, &locations, || {
                locations
                    .iter()
                    .map(|l| format!("{}\t{}", l.location, if l.is_available { "open" } else { "closed" }))
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
    }

    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequirementReport {
    requirement: String,
    total: Option<u32>,
    available: Option<u32>,
    conflicts: Vec<RequirementConflict>,
}

fn emit<T: Serialize>(format: Format, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(value)?),
        Format::Text => println!("{}", text()),
    }
    Ok(())
}

fn describe_event(title: &str, location: &str, start: &str, end: &str) -> String {
    let title = if title.is_empty() { "(untitled)" } else { title };
    format!("{} at {} {}-{}", title, location, start, end)
}

fn render_venue(proposed: &ProposedBooking, conflicts: &[VenueConflict]) -> String {
    if conflicts.is_empty() {
        return format!(
            "No venue conflicts for {} on {} {}",
            proposed.location, proposed.date, proposed.range
        );
    }
    let mut lines = vec![format!(
        "VENUE: {} booking(s) overlap {} on {} {}",
        conflicts.len(),
        proposed.location,
        proposed.date,
        proposed.range
    )];
    for c in conflicts {
        let e = &c.event;
        lines.push(format!(
            "  {} [{}] overlaps {} min",
            describe_event(&e.event_title, &e.location, &e.start_time, &e.end_time),
            e.id,
            c.overlap_minutes
        ));
    }
    lines.join("\n")
}

fn render_requirement(report: &RequirementReport) -> String {
    let mut lines = Vec::new();
    if report.conflicts.is_empty() {
        lines.push(format!("No events hold {} at that time", report.requirement));
    } else {
        lines.push(format!("REQ: {} held by {} event(s)", report.requirement, report.conflicts.len()));
        for c in &report.conflicts {
            let e = &c.event;
            lines.push(format!(
                "  {} [{}] claims {}",
                describe_event(&e.event_title, &e.location, &e.start_time, &e.end_time),
                e.id,
                c.claimed_quantity
            ));
        }
    }
    if let (Some(total), Some(available)) = (report.total, report.available) {
        lines.push(format!("Available: {} of {}", available, total));
    }
    lines.join("\n")
}

fn render_availability(report: &[RequirementAvailability]) -> String {
    report
        .iter()
        .map(|r| {
            let quantity = match (r.available, r.total) {
                (Some(available), Some(total)) => format!("{}/{} available", available, total),
                _ => "service".to_string(),
            };
            let flag = if r.conflicting_event_ids.is_empty() {
                String::new()
            } else {
                format!("  REQ ({})", r.conflicting_event_ids.join(", "))
            };
            format!("{}\t{}{}", r.name, quantity, flag)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_check(proposed: &ProposedBooking, check: &BookingCheck) -> String {
    let mut out = render_venue(proposed, &check.venue_conflicts);
    if !check.requirements.is_empty() {
        out.push('\n');
        out.push_str(&render_availability(&check.requirements));
    }
    out
}

fn render_slots(board: &[SlotStatus]) -> String {
    board
        .iter()
        .map(|slot| {
            let badge = match slot.badge {
                Some(SlotBadge::Venue) => "VENUE".to_string(),
                Some(SlotBadge::Req) => format!("REQ {}", slot.conflicted_requirements.join(", ")),
                None => String::new(),
            };
            format!("{}\t{}", slot.time, badge).trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_free(windows: &[FreeWindow]) -> String {
    if windows.is_empty() {
        return "No free windows".to_string();
    }
    windows
        .iter()
        .map(|w| format!("{}-{}\t{} min", w.start, w.end, w.duration_minutes))
        .collect::<Vec<_>>()
        .join("\n")
}

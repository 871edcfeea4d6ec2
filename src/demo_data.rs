//! Demo rosters for guard scheduling.
//!
//! Generation is seeded, so every call for the same size yields the same
//! guards and shifts.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::{Guard, GuardPreferences, GuardStatus, Roster, Shift, TimeOfDay};
use crate::interval::format_date;

/// Year the demo shift dates fall in. Schedule demo rosters with
/// `ScheduleConfig::for_year(DEMO_YEAR)`.
pub const DEMO_YEAR: i32 = 2025;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoData {
    Small,
    Large,
}

impl std::str::FromStr for DemoData {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SMALL" => Ok(DemoData::Small),
            "LARGE" => Ok(DemoData::Large),
            _ => Err(()),
        }
    }
}

impl DemoData {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemoData::Small => "SMALL",
            DemoData::Large => "LARGE",
        }
    }

    fn parameters(&self) -> DemoDataParameters {
        match self {
            DemoData::Small => DemoDataParameters {
                sites: vec![
                    Site::new("Riverside Mall", "Mall Patrol", &["06:00 - 14:00", "14:00 - 22:00"]),
                    Site::new(
                        "Harbor Warehouse",
                        "Warehouse Watch",
                        &["06:00 - 14:00", "14:00 - 22:00", "22:00 - 06:00"],
                    ),
                    Site::new("City Bank", "Bank Security", &["08:00 - 16:00"]),
                ],
                days_in_schedule: 7,
                guard_count: 15,
                level_distribution: vec![(1, 4.0), (2, 3.0), (3, 1.0)],
                optional_skill_distribution: vec![(0, 2.0), (1, 3.0), (2, 1.0)],
                shift_count_distribution: vec![(1, 0.8), (2, 0.2)],
            },
            DemoData::Large => DemoDataParameters {
                sites: vec![
                    Site::new("Riverside Mall", "Mall Patrol", &["06:00 - 14:00", "14:00 - 22:00"]),
                    Site::new(
                        "Harbor Warehouse",
                        "Warehouse Watch",
                        &["06:00 - 14:00", "14:00 - 22:00", "22:00 - 06:00"],
                    ),
                    Site::new("City Bank", "Bank Security", &["08:00 - 16:00"]),
                    Site::new(
                        "Central Station",
                        "Station Patrol",
                        &["05:00 - 13:00", "13:00 - 21:00", "21:00 - 05:00"],
                    ),
                    Site::new("Tech Campus", "Front Desk", &["07:00 - 15:00", "15:00 - 23:00"]),
                    Site::new("Concert Arena", "Event Security", &["17:00 - 01:00"]),
                    Site::new("City Hospital", "Ward Security", &["06:00 - 18:00", "18:00 - 06:00"]),
                ],
                days_in_schedule: 28,
                guard_count: 50,
                level_distribution: vec![(1, 4.0), (2, 3.0), (3, 2.0), (4, 1.0)],
                optional_skill_distribution: vec![(0, 1.0), (1, 3.0), (2, 2.0)],
                shift_count_distribution: vec![(1, 0.5), (2, 0.3), (3, 0.2)],
            },
        }
    }
}

struct Site {
    location: &'static str,
    title: &'static str,
    times: &'static [&'static str],
}

impl Site {
    fn new(location: &'static str, title: &'static str, times: &'static [&'static str]) -> Self {
        Self {
            location,
            title,
            times,
        }
    }
}

struct DemoDataParameters {
    sites: Vec<Site>,
    days_in_schedule: i64,
    guard_count: usize,
    level_distribution: Vec<(usize, f64)>,
    optional_skill_distribution: Vec<(usize, f64)>,
    shift_count_distribution: Vec<(usize, f64)>,
}

const OPTIONAL_SKILLS: &[&str] = &["First Aid", "CCTV", "Crowd Control", "K9 Handling"];

const WEEKDAYS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// List of available demo data sets.
pub fn list_demo_data() -> Vec<&'static str> {
    vec!["SMALL", "LARGE"]
}

/// Generates a demo roster for the given size. No shift is assigned.
pub fn generate(demo: DemoData) -> Roster {
    let params = demo.parameters();
    let mut rng = StdRng::seed_from_u64(0);

    let start_date = find_next_monday(
        NaiveDate::from_ymd_opt(DEMO_YEAR, 1, 1).expect("January 1st is a valid date"),
    );

    let name_permutations = generate_name_permutations(&mut rng);

    let mut guards = Vec::with_capacity(params.guard_count);
    for i in 0..params.guard_count {
        let name = name_permutations[i % name_permutations.len()].clone();
        let email = format!("{}@guards.example", name.to_lowercase().replace(' ', "."));

        let level = pick_count(&mut rng, &params.level_distribution);
        let optional_count = pick_count(&mut rng, &params.optional_skill_distribution);
        let mut skills: Vec<String> = OPTIONAL_SKILLS
            .choose_multiple(&mut rng, optional_count.min(OPTIONAL_SKILLS.len()))
            .map(|s| s.to_string())
            .collect();
        skills.push(format!("Level {}", level));

        let mut guard = Guard::new(format!("guard-{}", i), name)
            .with_email(email)
            .with_skills(skills);

        if rng.gen_bool(0.1) {
            guard = guard.with_status(GuardStatus::OffDuty);
        }
        if rng.gen_bool(0.6) {
            guard = guard.with_preferences(generate_preferences(&mut rng, &params));
        }

        guards.push(guard);
    }

    let mut shifts = Vec::new();
    let mut shift_id = 0usize;

    for day in 0..params.days_in_schedule {
        let date = format_date(start_date + Duration::days(day));

        for site in &params.sites {
            for &time in site.times {
                let shift_count = pick_count(&mut rng, &params.shift_count_distribution);

                for _ in 0..shift_count {
                    let level = pick_count(&mut rng, &params.level_distribution);
                    let requirements: Vec<&str> = if rng.gen_bool(0.25) {
                        OPTIONAL_SKILLS.choose(&mut rng).copied().into_iter().collect()
                    } else {
                        Vec::new()
                    };

                    shifts.push(
                        Shift::new(
                            format!("shift-{}", shift_id),
                            site.title,
                            site.location,
                            date.clone(),
                            time,
                        )
                        .with_security_level(format!("Level {}", level))
                        .with_requirements(requirements),
                    );
                    shift_id += 1;
                }
            }
        }
    }

    Roster::new(guards, shifts)
}

fn generate_preferences(rng: &mut StdRng, params: &DemoDataParameters) -> GuardPreferences {
    let mut prefs = GuardPreferences::default();

    if rng.gen_bool(0.5) {
        prefs.max_hours_per_week = [24, 32, 40].choose(rng).copied();
    }
    if let Some(site) = params.sites.choose(rng) {
        prefs.preferred_locations.insert(site.location.to_string());
    }
    if let Some(time) = [TimeOfDay::Morning, TimeOfDay::Afternoon, TimeOfDay::Night].choose(rng) {
        prefs.preferred_shift_times.insert(*time);
    }
    if rng.gen_bool(0.3) {
        if let Some(day) = WEEKDAYS.choose(rng) {
            prefs.unavailable_days.insert(day.to_string());
        }
    }

    prefs
}

fn find_next_monday(date: NaiveDate) -> NaiveDate {
    let days_until_monday = match date.weekday() {
        Weekday::Mon => 0,
        Weekday::Tue => 6,
        Weekday::Wed => 5,
        Weekday::Thu => 4,
        Weekday::Fri => 3,
        Weekday::Sat => 2,
        Weekday::Sun => 1,
    };
    date + Duration::days(days_until_monday)
}

/// Pick a count based on weighted distribution.
fn pick_count(rng: &mut StdRng, distribution: &[(usize, f64)]) -> usize {
    let total_weight: f64 = distribution.iter().map(|(_, w)| w).sum();
    let mut choice = rng.gen::<f64>() * total_weight;

    for (count, weight) in distribution {
        if choice < *weight {
            return *count;
        }
        choice -= weight;
    }
    distribution.last().map(|(c, _)| *c).unwrap_or(1)
}

const FIRST_NAMES: &[&str] = &[
    "Amy", "Beth", "Carl", "Dan", "Elsa", "Flo", "Gus", "Hugo", "Ivy", "Jay",
];
const LAST_NAMES: &[&str] = &[
    "Cole", "Fox", "Green", "Jones", "King", "Li", "Poe", "Rye", "Smith", "Watt",
];

fn generate_name_permutations(rng: &mut StdRng) -> Vec<String> {
    let mut names = Vec::with_capacity(FIRST_NAMES.len() * LAST_NAMES.len());
    for first in FIRST_NAMES {
        for last in LAST_NAMES {
            names.push(format!("{} {}", first, last));
        }
    }
    names.shuffle(rng);
    names
}

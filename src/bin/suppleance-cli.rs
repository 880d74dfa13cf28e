#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use suppleance::{
    model::{AbsentEntity, ClassId, Leave, Teacher, TeacherId},
    scheduler::{CoverageGap, Scheduler, TeacherStatus, Unavailability},
    storage::{JsonStorage, Storage},
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de gestion des suppléances (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de l'établissement
    #[arg(long, global = true, default_value = "school.json")]
    data: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ajouter un enseignant au roster
    AddTeacher {
        #[arg(long)]
        name: String,
        #[arg(long)]
        contact: Option<String>,
    },

    /// Déclarer une absence (enseignant ou classe) sur une période
    Absent {
        #[arg(long, conflicts_with = "class")]
        teacher: Option<String>,
        #[arg(long)]
        class: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        from: String,
        /// YYYY-MM-DD (par défaut : `from`)
        #[arg(long)]
        to: Option<String>,
        /// Demi-journée : liste "1,2,..." de créneaux
        #[arg(long, conflicts_with = "from_period")]
        periods: Option<String>,
        /// Demi-journée : à partir de ce créneau
        #[arg(long)]
        from_period: Option<u8>,
    },

    /// Retirer une absence pour une date
    Present {
        #[arg(long, conflicts_with = "class")]
        teacher: Option<String>,
        #[arg(long)]
        class: Option<String>,
        #[arg(long)]
        date: String,
    },

    /// Lister les créneaux à couvrir
    Gaps {
        #[arg(long)]
        date: String,
    },

    /// Classer les suppléants pour un créneau (numéro affiché par `gaps`)
    Candidates {
        #[arg(long)]
        date: String,
        #[arg(long)]
        gap: usize,
    },

    /// Affecter un suppléant (sans `--with` : retire la suppléance)
    Assign {
        #[arg(long)]
        date: String,
        #[arg(long)]
        gap: usize,
        #[arg(long)]
        with: Option<String>,
    },

    /// Historique des suppléances sur 7 jours
    History {
        #[arg(long)]
        date: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.data)?;
    let mut scheduler = Scheduler::with_data(storage.load()?);

    let code = match cli.cmd {
        Commands::AddTeacher { name, contact } => {
            let teacher = Teacher::new(name, contact);
            println!("{}", teacher.id);
            scheduler.data_mut().school.teachers.push(teacher);
            storage.save(scheduler.data())?;
            0
        }
        Commands::Absent {
            teacher,
            class,
            from,
            to,
            periods,
            from_period,
        } => {
            let entity = absent_entity(teacher, class)?;
            let from = parse_date(&from)?;
            let to = match to {
                Some(to) => parse_date(&to)?,
                None => from,
            };
            let leave = match (periods, from_period) {
                (Some(list), _) => Leave::half_periods(parse_periods(&list)?),
                (None, Some(start)) => Leave::half_from(start),
                (None, None) => Leave::Full,
            };
            if !leave.is_well_formed() {
                bail!("half-day leave needs a period list or a starting period >= 1");
            }
            let days = scheduler
                .data_mut()
                .absences
                .record_leave(entity, leave, from, to)
                .map_err(anyhow::Error::msg)?;
            storage.save(scheduler.data())?;
            println!("Leave recorded on {days} day(s)");
            0
        }
        Commands::Present {
            teacher,
            class,
            date,
        } => {
            let entity = absent_entity(teacher, class)?;
            let date = parse_date(&date)?;
            if !scheduler.data_mut().absences.clear_leave(&entity, date) {
                bail!("no leave recorded for {entity} on {date}");
            }
            storage.save(scheduler.data())?;
            0
        }
        Commands::Gaps { date } => {
            let date = parse_date(&date)?;
            let gaps = scheduler.resolve_gaps(date);
            if gaps.is_empty() {
                println!("OK: no gaps on {date}");
            }
            for (idx, gap) in gaps.iter().enumerate() {
                let substitutes: Vec<String> = scheduler
                    .substitutes_for(gap)
                    .iter()
                    .map(|a| a.substitute.to_string())
                    .collect();
                println!(
                    "#{} | P{} | {} | {} | {} | {}{}",
                    idx + 1,
                    gap.period_number(),
                    gap.absent,
                    join_classes(gap),
                    gap.subject_label,
                    if substitutes.is_empty() {
                        "-".to_string()
                    } else {
                        substitutes.join(",")
                    },
                    if gap.is_legacy { " | legacy" } else { "" }
                );
            }
            // Code 2 = WARNING/INCOMPLETE
            let uncovered = scheduler.uncovered(date).len();
            if uncovered > 0 {
                eprintln!("{uncovered} gap(s) without substitute");
                2
            } else {
                0
            }
        }
        Commands::Candidates { date, gap } => {
            let gap = select_gap(&scheduler, &date, gap)?;
            for candidate in scheduler.rank_candidates(&gap) {
                println!(
                    "{} | {} | {} | load {}",
                    candidate.teacher,
                    candidate.name,
                    describe_status(&candidate.status),
                    candidate.recent_load
                );
            }
            0
        }
        Commands::Assign { date, gap, with } => {
            let gap = select_gap(&scheduler, &date, gap)?;
            let substitute = with.map(TeacherId::new);
            let created = scheduler.assign(&gap, substitute.as_ref())?;
            storage.save(scheduler.data())?;
            match substitute {
                None => println!("Substitution cleared"),
                Some(id) => {
                    println!("{} adjustment(s) recorded for {id}", created.len());
                    if let Some(conflict) = created.iter().find_map(|a| a.conflict_details.as_ref())
                    {
                        eprintln!("warning: double booking with class {}", conflict.class_id);
                    }
                }
            }
            0
        }
        Commands::History { date } => {
            let date = parse_date(&date)?;
            let window = scheduler.history_window(date);
            println!("teacher | {}", window.labels.join(" | "));
            for load in &window.per_teacher {
                let counts: Vec<String> = load.counts.iter().map(u32::to_string).collect();
                println!("{} | {}", load.name, counts.join(" | "));
            }
            0
        }
    };

    std::process::exit(code);
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}

fn parse_periods(raw: &str) -> Result<Vec<u8>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u8>()
                .with_context(|| format!("invalid period number: {s}"))
        })
        .collect()
}

fn absent_entity(teacher: Option<String>, class: Option<String>) -> Result<AbsentEntity> {
    match (teacher, class) {
        (Some(t), None) => Ok(AbsentEntity::Teacher(TeacherId::new(t))),
        (None, Some(c)) => Ok(AbsentEntity::Class(ClassId::new(c))),
        _ => bail!("expected exactly one of --teacher or --class"),
    }
}

fn select_gap(scheduler: &Scheduler, date: &str, number: usize) -> Result<CoverageGap> {
    let date = parse_date(date)?;
    let gaps = scheduler.resolve_gaps(date);
    number
        .checked_sub(1)
        .and_then(|idx| gaps.into_iter().nth(idx))
        .with_context(|| format!("no gap #{number} on {date}"))
}

fn join_classes(gap: &CoverageGap) -> String {
    gap.class_ids
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn describe_status(status: &TeacherStatus) -> String {
    match status {
        TeacherStatus::InCharge => "in charge".to_string(),
        TeacherStatus::TeachesClass => "teaches class".to_string(),
        TeacherStatus::Available => "available".to_string(),
        TeacherStatus::Unavailable(Unavailability::Substitution) => {
            "unavailable (substitution)".to_string()
        }
        TeacherStatus::Unavailable(Unavailability::DoubleBook { conflict_class }) => {
            format!("unavailable (double book: {conflict_class})")
        }
    }
}

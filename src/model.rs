use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new<S: AsRef<str>>(s: S) -> Self {
                Self(s.as_ref().to_owned())
            }
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifiant fort pour un enseignant
    TeacherId
);
string_id!(
    /// Identifiant fort pour une classe
    ClassId
);
string_id!(SubjectId);
string_id!(
    /// Identifiant d'un cours commun (plusieurs classes, un seul enseignant)
    JointPeriodId
);

impl TeacherId {
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// Enseignant du roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    /// Téléphone ou adresse, utilisé par la couche de notification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl Teacher {
    pub fn new<N: Into<String>>(name: N, contact: Option<String>) -> Self {
        Self {
            id: TeacherId::random(),
            name: name.into(),
            short_name: None,
            contact,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointPeriod {
    pub id: JointPeriodId,
    pub name: String,
}

/// Cours placé dans un créneau de l'emploi du temps d'une classe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotEntry {
    pub subject: SubjectId,
    pub teacher: TeacherId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joint_period: Option<JointPeriodId>,
}

impl SlotEntry {
    pub fn new(subject: SubjectId, teacher: TeacherId) -> Self {
        Self {
            subject,
            teacher,
            joint_period: None,
        }
    }

    pub fn joint(mut self, id: JointPeriodId) -> Self {
        self.joint_period = Some(id);
        self
    }
}

/// Emploi du temps d'une journée : `periods[i]` est le créneau d'index `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTimetable {
    pub day: Weekday,
    #[serde(default)]
    pub periods: Vec<Vec<SlotEntry>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectAssignment {
    pub subject: SubjectId,
    pub teacher: TeacherId,
    #[serde(default)]
    pub periods_per_week: u8,
}

/// Classe avec son emploi du temps hebdomadaire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolClass {
    pub id: ClassId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_charge: Option<TeacherId>,
    #[serde(default)]
    pub timetable: Vec<DayTimetable>,
    #[serde(default)]
    pub subjects: Vec<SubjectAssignment>,
}

impl SchoolClass {
    pub fn new<S: AsRef<str>, N: Into<String>>(id: S, name: N) -> Self {
        Self {
            id: ClassId::new(id),
            name: name.into(),
            short_name: None,
            in_charge: None,
            timetable: Vec::new(),
            subjects: Vec::new(),
        }
    }

    /// Créneaux du jour, vide si la classe n'a pas cours ce jour-là.
    pub fn periods(&self, day: Weekday) -> &[Vec<SlotEntry>] {
        self.timetable
            .iter()
            .find(|d| d.day == day)
            .map(|d| d.periods.as_slice())
            .unwrap_or(&[])
    }

    pub fn slot(&self, day: Weekday, period: usize) -> &[SlotEntry] {
        self.periods(day)
            .get(period)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Remplace le contenu d'un créneau, en créant les jours/créneaux manquants.
    pub fn set_slot(&mut self, day: Weekday, period: usize, entries: Vec<SlotEntry>) {
        let pos = match self.timetable.iter().position(|d| d.day == day) {
            Some(pos) => pos,
            None => {
                self.timetable.push(DayTimetable {
                    day,
                    periods: Vec::new(),
                });
                self.timetable.len() - 1
            }
        };
        let periods = &mut self.timetable[pos].periods;
        if periods.len() <= period {
            periods.resize_with(period + 1, Vec::new);
        }
        periods[period] = entries;
    }

    /// Vrai si l'enseignant a une matière attribuée ou un cours régulier dans la classe.
    pub fn is_taught_by(&self, teacher: &TeacherId) -> bool {
        self.subjects.iter().any(|s| &s.teacher == teacher)
            || self
                .timetable
                .iter()
                .flat_map(|d| d.periods.iter().flatten())
                .any(|e| &e.teacher == teacher)
    }
}

fn default_teaching_days() -> Vec<Weekday> {
    vec![
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ]
}

/// Rosters et emploi du temps de l'établissement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub classes: Vec<SchoolClass>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub joint_periods: Vec<JointPeriod>,
    #[serde(default = "default_teaching_days")]
    pub teaching_days: Vec<Weekday>,
}

impl Default for School {
    fn default() -> Self {
        Self {
            teachers: Vec::new(),
            classes: Vec::new(),
            subjects: Vec::new(),
            joint_periods: Vec::new(),
            teaching_days: default_teaching_days(),
        }
    }
}

impl School {
    pub fn find_teacher<'a>(&'a self, id: &TeacherId) -> Option<&'a Teacher> {
        self.teachers.iter().find(|t| &t.id == id)
    }
    pub fn find_class<'a>(&'a self, id: &ClassId) -> Option<&'a SchoolClass> {
        self.classes.iter().find(|c| &c.id == id)
    }
    pub fn find_class_mut(&mut self, id: &ClassId) -> Option<&mut SchoolClass> {
        self.classes.iter_mut().find(|c| &c.id == id)
    }

    pub fn is_teaching_day(&self, day: Weekday) -> bool {
        self.teaching_days.contains(&day)
    }

    // Les libellés retombent sur l'identifiant brut si la référence a disparu.
    pub fn teacher_name<'a>(&'a self, id: &'a TeacherId) -> &'a str {
        self.find_teacher(id).map_or(id.as_str(), |t| t.name.as_str())
    }
    pub fn subject_name<'a>(&'a self, id: &'a SubjectId) -> &'a str {
        self.subjects
            .iter()
            .find(|s| &s.id == id)
            .map_or(id.as_str(), |s| s.name.as_str())
    }
    pub fn joint_period_name<'a>(&'a self, id: &'a JointPeriodId) -> &'a str {
        self.joint_periods
            .iter()
            .find(|j| &j.id == id)
            .map_or(id.as_str(), |j| j.name.as_str())
    }
}

/// Type de congé. Les numéros de créneaux sont comptés à partir de 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Leave {
    Full,
    Half {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        periods: Vec<u8>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start_period: Option<u8>,
    },
}

impl Leave {
    pub fn half_from(start_period: u8) -> Self {
        Leave::Half {
            periods: Vec::new(),
            start_period: Some(start_period),
        }
    }

    pub fn half_periods(periods: Vec<u8>) -> Self {
        Leave::Half {
            periods,
            start_period: None,
        }
    }

    /// Un demi-congé sans liste ni créneau de départ valide n'annule rien.
    pub fn is_well_formed(&self) -> bool {
        match self {
            Leave::Full => true,
            Leave::Half {
                periods,
                start_period,
            } => !periods.is_empty() || matches!(start_period, Some(s) if *s > 0),
        }
    }

    /// Le créneau d'index `period` (base 0) est-il annulé par ce congé ?
    pub fn cancels(&self, period: usize) -> bool {
        let number = period + 1;
        match self {
            Leave::Full => true,
            Leave::Half { periods, .. } if !periods.is_empty() => {
                periods.iter().any(|p| usize::from(*p) == number)
            }
            Leave::Half { start_period, .. } => match start_period {
                Some(start) if *start > 0 => number >= usize::from(*start),
                _ => false,
            },
        }
    }
}

/// Sujet d'un congé : un enseignant ou une classe entière.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum AbsentEntity {
    Teacher(TeacherId),
    Class(ClassId),
}

impl AbsentEntity {
    pub fn teacher(&self) -> Option<&TeacherId> {
        match self {
            AbsentEntity::Teacher(id) => Some(id),
            AbsentEntity::Class(_) => None,
        }
    }
    pub fn class(&self) -> Option<&ClassId> {
        match self {
            AbsentEntity::Class(id) => Some(id),
            AbsentEntity::Teacher(_) => None,
        }
    }
}

impl fmt::Display for AbsentEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbsentEntity::Teacher(id) => write!(f, "teacher:{id}"),
            AbsentEntity::Class(id) => write!(f, "class:{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRecord {
    pub entity: AbsentEntity,
    pub leave: Leave,
}

/// Registre des absences, une entrée au plus par sujet et par date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceRegistry {
    #[serde(default)]
    pub days: BTreeMap<NaiveDate, Vec<LeaveRecord>>,
}

impl AbsenceRegistry {
    pub fn on(&self, date: NaiveDate) -> &[LeaveRecord] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_teacher_absent(&self, date: NaiveDate, teacher: &TeacherId) -> bool {
        self.on(date)
            .iter()
            .any(|r| r.entity.teacher() == Some(teacher))
    }

    pub fn class_leave(&self, date: NaiveDate, class: &ClassId) -> Option<&Leave> {
        self.on(date)
            .iter()
            .find(|r| r.entity.class() == Some(class))
            .map(|r| &r.leave)
    }

    /// Enregistre le congé sur chaque date de `[from, to]` (bornes incluses).
    /// Une entrée existante pour le même sujet est remplacée.
    pub fn record_leave(
        &mut self,
        entity: AbsentEntity,
        leave: Leave,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<usize, String> {
        if to < from {
            return Err("leave end date must not be before start date".to_string());
        }
        let mut count = 0usize;
        for date in from.iter_days().take_while(|d| *d <= to) {
            let records = self.days.entry(date).or_default();
            let record = LeaveRecord {
                entity: entity.clone(),
                leave: leave.clone(),
            };
            match records.iter_mut().find(|r| r.entity == entity) {
                Some(existing) => *existing = record,
                None => records.push(record),
            }
            count += 1;
        }
        Ok(count)
    }

    pub fn clear_leave(&mut self, entity: &AbsentEntity, date: NaiveDate) -> bool {
        let Some(records) = self.days.get_mut(&date) else {
            return false;
        };
        let before = records.len();
        records.retain(|r| &r.entity != entity);
        let removed = records.len() != before;
        if records.is_empty() {
            self.days.remove(&date);
        }
        removed
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictDetails {
    /// Classe où le suppléant a déjà cours au même créneau.
    pub class_id: ClassId,
}

/// Suppléance concrète pour une classe à un créneau donné.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    pub class_id: ClassId,
    pub subject_id: SubjectId,
    pub original_teacher: TeacherId,
    pub substitute: TeacherId,
    pub day: Weekday,
    pub period: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict_details: Option<ConflictDetails>,
}

type LedgerKey = (ClassId, usize, TeacherId);

fn ledger_key(adjustment: &Adjustment) -> LedgerKey {
    (
        adjustment.class_id.clone(),
        adjustment.period,
        adjustment.original_teacher.clone(),
    )
}

/// Suppléances d'une date, indexées par (classe, créneau, enseignant remplacé).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Adjustment>", into = "Vec<Adjustment>")]
pub struct DayLedger {
    entries: BTreeMap<LedgerKey, Adjustment>,
}

impl DayLedger {
    /// Insère en écrasant la suppléance précédente du même enseignant sur ce
    /// (classe, créneau) ; celles des autres enseignants sont conservées.
    pub fn insert(&mut self, adjustment: Adjustment) -> Option<Adjustment> {
        self.entries.insert(ledger_key(&adjustment), adjustment)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Adjustment> + '_ {
        self.entries.values()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn remove_where<F>(&mut self, mut pred: F) -> Vec<Adjustment>
    where
        F: FnMut(&Adjustment) -> bool,
    {
        let keys: Vec<LedgerKey> = self
            .entries
            .iter()
            .filter(|(_, adj)| pred(adj))
            .map(|(key, _)| key.clone())
            .collect();
        keys.into_iter()
            .filter_map(|key| self.entries.remove(&key))
            .collect()
    }
}

impl From<Vec<Adjustment>> for DayLedger {
    fn from(adjustments: Vec<Adjustment>) -> Self {
        let mut day = DayLedger::default();
        for adjustment in adjustments {
            day.insert(adjustment);
        }
        day
    }
}

impl From<DayLedger> for Vec<Adjustment> {
    fn from(day: DayLedger) -> Self {
        day.entries.into_values().collect()
    }
}

/// Journal des suppléances par date
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentLedger {
    #[serde(default)]
    pub days: BTreeMap<NaiveDate, DayLedger>,
}

impl AdjustmentLedger {
    /// Suppléances de la date ; une date absente du journal n'en a aucune.
    pub fn on(&self, date: NaiveDate) -> impl Iterator<Item = &Adjustment> + '_ {
        self.days.get(&date).into_iter().flat_map(|day| day.iter())
    }

    pub fn day_mut(&mut self, date: NaiveDate) -> &mut DayLedger {
        self.days.entry(date).or_default()
    }

    pub fn remove_where<F>(&mut self, date: NaiveDate, pred: F) -> Vec<Adjustment>
    where
        F: FnMut(&Adjustment) -> bool,
    {
        let Some(day) = self.days.get_mut(&date) else {
            return Vec::new();
        };
        let removed = day.remove_where(pred);
        if day.is_empty() {
            self.days.remove(&date);
        }
        removed
    }
}

/// Données complètes persistées : établissement, absences, suppléances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolData {
    #[serde(default)]
    pub school: School,
    #[serde(default)]
    pub absences: AbsenceRegistry,
    #[serde(default)]
    pub adjustments: AdjustmentLedger,
}

impl SchoolData {
    pub fn is_teaching_date(&self, date: NaiveDate) -> bool {
        self.school.is_teaching_day(date.weekday())
    }
}

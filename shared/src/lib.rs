use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Which table an animal lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimalKind {
    Dog,
    Monkey,
}

impl AnimalKind {
    pub const ALL: [AnimalKind; 2] = [AnimalKind::Dog, AnimalKind::Monkey];

    /// Singular lowercase label used in prompts and messages
    pub fn label(&self) -> &'static str {
        match self {
            AnimalKind::Dog => "dog",
            AnimalKind::Monkey => "monkey",
        }
    }

    /// Plural lowercase label used in listing headers
    pub fn plural(&self) -> &'static str {
        match self {
            AnimalKind::Dog => "dogs",
            AnimalKind::Monkey => "monkeys",
        }
    }
}

impl fmt::Display for AnimalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AnimalKind {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dog" | "dogs" | "d" => Ok(AnimalKind::Dog),
            "monkey" | "monkeys" | "m" => Ok(AnimalKind::Monkey),
            _ => Err(ParseFieldError::new("animal type", s, "dog or monkey")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(ParseFieldError::new("gender", s, "Male or Female")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingStatus {
    Trained,
    Untrained,
}

impl TrainingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingStatus::Trained => "Trained",
            TrainingStatus::Untrained => "Untrained",
        }
    }
}

impl fmt::Display for TrainingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrainingStatus {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trained" => Ok(TrainingStatus::Trained),
            "untrained" => Ok(TrainingStatus::Untrained),
            _ => Err(ParseFieldError::new("training status", s, "Trained or Untrained")),
        }
    }
}

/// Reservation state derived from the `reserved` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationState {
    /// Free for reservation (`reserved = false`)
    Available,
    /// Allocated for service use (`reserved = true`)
    Reserved,
}

impl ReservationState {
    pub fn from_flag(reserved: bool) -> Self {
        if reserved {
            ReservationState::Reserved
        } else {
            ReservationState::Available
        }
    }

    pub fn is_reserved(&self) -> bool {
        matches!(self, ReservationState::Reserved)
    }
}

impl fmt::Display for ReservationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReservationState::Available => write!(f, "available"),
            ReservationState::Reserved => write!(f, "reserved"),
        }
    }
}

/// Attributes only dogs carry
#[derive(Debug, Clone, PartialEq)]
pub struct DogDetails {
    pub breed: String,
}

/// Attributes only monkeys carry
#[derive(Debug, Clone, PartialEq)]
pub struct MonkeyDetails {
    pub species: String,
    pub tail_length: f64,
    pub height: f64,
    pub body_length: f64,
}

/// Kind-specific payload of an [`AnimalRecord`]
#[derive(Debug, Clone, PartialEq)]
pub enum AnimalDetails {
    Dog(DogDetails),
    Monkey(MonkeyDetails),
}

impl AnimalDetails {
    pub fn kind(&self) -> AnimalKind {
        match self {
            AnimalDetails::Dog(_) => AnimalKind::Dog,
            AnimalDetails::Monkey(_) => AnimalKind::Monkey,
        }
    }
}

/// A rescue animal, persisted or about to be.
///
/// The base attributes are shared by every kind; `details` carries the
/// kind-specific columns and fixes the kind for the lifetime of the record.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimalRecord {
    /// Store-assigned row id, `None` until the record has been inserted
    pub id: Option<i64>,
    /// Unique within the kind's table; the key for lookups and updates
    pub name: String,
    pub gender: Gender,
    pub age: u32,
    /// Weight in kilograms
    pub weight: f64,
    pub acquisition_date: NaiveDate,
    pub acquisition_country: String,
    pub training_status: TrainingStatus,
    /// Only changed through reserve/unreserve
    pub reserved: bool,
    pub in_service_country: String,
    pub details: AnimalDetails,
}

impl AnimalRecord {
    pub fn kind(&self) -> AnimalKind {
        self.details.kind()
    }

    pub fn reservation_state(&self) -> ReservationState {
        ReservationState::from_flag(self.reserved)
    }

    pub fn is_available(&self) -> bool {
        !self.reserved
    }

    /// Copy of this record carrying the given store id
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

/// Error produced when a text field does not name a known enumeration value
#[derive(Debug, Clone, PartialEq)]
pub struct ParseFieldError {
    pub field: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl ParseFieldError {
    pub fn new(field: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            field,
            value: value.trim().to_string(),
            expected,
        }
    }
}

impl fmt::Display for ParseFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid {}: '{}' (expected {})",
            self.field, self.value, self.expected
        )
    }
}

impl std::error::Error for ParseFieldError {}

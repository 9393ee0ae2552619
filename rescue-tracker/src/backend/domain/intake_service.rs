use chrono::NaiveDate;
use shared::{AnimalDetails, AnimalKind, AnimalRecord, DogDetails, MonkeyDetails};
use tracing::info;

use crate::backend::domain::errors::{RescueResult, ValidationError};
use crate::backend::storage::schema::DATE_FORMAT;
use crate::backend::storage::Repositories;

/// Number of comma-separated fields an intake line must carry
pub fn intake_arity(kind: AnimalKind) -> usize {
    match kind {
        AnimalKind::Dog => 10,
        AnimalKind::Monkey => 13,
    }
}

/// Human-readable field layout shown to the operator before an intake
pub fn intake_format(kind: AnimalKind) -> &'static str {
    match kind {
        AnimalKind::Dog => {
            "name, breed, gender[Male/Female], age, weight, acquisitionDate[YYYY-MM-DD], \
             acquisitionCountry, trainingStatus[Trained/Untrained], reserved[true/false], \
             inServiceCountry"
        }
        AnimalKind::Monkey => {
            "name, species, gender[Male/Female], age, weight, acquisitionDate[YYYY-MM-DD], \
             acquisitionCountry, trainingStatus[Trained/Untrained], reserved[true/false], \
             inServiceCountry, tailLength, height, bodyLength"
        }
    }
}

/// Service that validates raw intake input and stores the resulting record
#[derive(Clone)]
pub struct IntakeService {
    repositories: Repositories,
}

impl IntakeService {
    pub fn new(repositories: Repositories) -> Self {
        Self { repositories }
    }

    /// Validate one comma-separated intake line and insert the record.
    /// Nothing reaches the store unless validation passes.
    pub async fn intake(&self, kind: AnimalKind, input: &str) -> RescueResult<AnimalRecord> {
        let record = parse_intake(kind, input)?;
        info!("Admitting {} '{}'", kind, record.name);

        let stored = self.repositories.for_kind(kind).insert(&record).await?;

        match stored.id {
            Some(id) => info!("Admitted {} '{}' with ID {}", kind, stored.name, id),
            None => info!("Admitted {} '{}'", kind, stored.name),
        }
        Ok(stored)
    }
}

/// Build an unsaved record from one comma-separated intake line
pub fn parse_intake(kind: AnimalKind, input: &str) -> Result<AnimalRecord, ValidationError> {
    let fields: Vec<&str> = input.split(',').map(str::trim).collect();
    let expected = intake_arity(kind);
    if fields.len() != expected {
        return Err(ValidationError::FieldCount {
            kind,
            expected,
            actual: fields.len(),
        });
    }

    // Shared prefix: name, kind-specific text, gender, age, weight, date,
    // acquisition country, training status, reserved, in-service country.
    let age = parse_age(fields[3])?;
    let weight = parse_measure("weight", fields[4])?;
    let details = match kind {
        AnimalKind::Dog => AnimalDetails::Dog(DogDetails {
            breed: required("breed", fields[1])?,
        }),
        AnimalKind::Monkey => {
            let tail_length = parse_measure("tail length", fields[10])?;
            let height = parse_measure("height", fields[11])?;
            let body_length = parse_measure("body length", fields[12])?;
            AnimalDetails::Monkey(MonkeyDetails {
                species: required("species", fields[1])?,
                tail_length,
                height,
                body_length,
            })
        }
    };

    Ok(AnimalRecord {
        id: None,
        name: required("name", fields[0])?,
        gender: fields[2].parse()?,
        age,
        weight,
        acquisition_date: parse_date(fields[5])?,
        acquisition_country: fields[6].to_string(),
        training_status: fields[7].parse()?,
        reserved: parse_reserved(fields[8]),
        in_service_country: fields[9].to_string(),
        details,
    })
}

/// `true` only for a case-insensitive "true"; every other token means not reserved
pub fn parse_reserved(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

fn parse_age(value: &str) -> Result<u32, ValidationError> {
    value.parse::<u32>().map_err(|_| ValidationError::NumericField {
        field: "age",
        value: value.to_string(),
    })
}

fn parse_measure(field: &'static str, value: &str) -> Result<f64, ValidationError> {
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Ok(n),
        _ => Err(ValidationError::NumericField {
            field,
            value: value.to_string(),
        }),
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::errors::RescueError;
    use shared::{Gender, TrainingStatus};

    const REX: &str = "Rex, Lab, Male, 3, 25.5, 2022-05-01, USA, Trained, false, USA";
    const BINGO: &str =
        "Bingo, Capuchin, Female, 4, 7.2, 2021-03-14, Brazil, Untrained, TRUE, USA, 40, 35.5, 45";

    async fn setup_test() -> (IntakeService, Repositories) {
        let repositories = Repositories::init_test()
            .await
            .expect("Failed to create test repositories");
        (IntakeService::new(repositories.clone()), repositories)
    }

    #[test]
    fn test_parse_dog_line() {
        let record = parse_intake(AnimalKind::Dog, REX).expect("Valid dog line");

        assert_eq!(record.id, None);
        assert_eq!(record.name, "Rex");
        assert_eq!(record.gender, Gender::Male);
        assert_eq!(record.age, 3);
        assert_eq!(record.weight, 25.5);
        assert_eq!(record.acquisition_date, NaiveDate::from_ymd_opt(2022, 5, 1).unwrap());
        assert_eq!(record.acquisition_country, "USA");
        assert_eq!(record.training_status, TrainingStatus::Trained);
        assert!(!record.reserved);
        assert_eq!(record.in_service_country, "USA");
        assert_eq!(
            record.details,
            AnimalDetails::Dog(DogDetails {
                breed: "Lab".to_string()
            })
        );
    }

    #[test]
    fn test_parse_monkey_line() {
        let record = parse_intake(AnimalKind::Monkey, BINGO).expect("Valid monkey line");

        assert_eq!(record.kind(), AnimalKind::Monkey);
        assert!(record.reserved, "Reserved flag is case-insensitive");
        assert_eq!(
            record.details,
            AnimalDetails::Monkey(MonkeyDetails {
                species: "Capuchin".to_string(),
                tail_length: 40.0,
                height: 35.5,
                body_length: 45.0,
            })
        );
    }

    #[test]
    fn test_field_count_must_match_kind() {
        let err = parse_intake(AnimalKind::Dog, "Rex, Lab, Male").unwrap_err();
        assert_eq!(
            err,
            ValidationError::FieldCount {
                kind: AnimalKind::Dog,
                expected: 10,
                actual: 3
            }
        );

        // A dog line is three fields short of a monkey
        let err = parse_intake(AnimalKind::Monkey, REX).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::FieldCount { expected: 13, actual: 10, .. }
        ));

        let err = parse_intake(AnimalKind::Dog, "").unwrap_err();
        assert!(matches!(err, ValidationError::FieldCount { actual: 1, .. }));
    }

    #[test]
    fn test_numeric_fields_are_validated() {
        let cases = [
            ("Rex, Lab, Male, three, 25.5, 2022-05-01, USA, Trained, false, USA", "age"),
            ("Rex, Lab, Male, -1, 25.5, 2022-05-01, USA, Trained, false, USA", "age"),
            ("Rex, Lab, Male, 3.5, 25.5, 2022-05-01, USA, Trained, false, USA", "age"),
            ("Rex, Lab, Male, 3, heavy, 2022-05-01, USA, Trained, false, USA", "weight"),
            ("Rex, Lab, Male, 3, -2, 2022-05-01, USA, Trained, false, USA", "weight"),
            ("Rex, Lab, Male, 3, NaN, 2022-05-01, USA, Trained, false, USA", "weight"),
        ];

        for (line, expected_field) in cases {
            match parse_intake(AnimalKind::Dog, line) {
                Err(ValidationError::NumericField { field, .. }) => {
                    assert_eq!(field, expected_field, "line: {}", line)
                }
                other => panic!("Expected numeric field error for {:?}, got {:?}", line, other),
            }
        }

        let err = parse_intake(
            AnimalKind::Monkey,
            "Bingo, Capuchin, Female, 4, 7.2, 2021-03-14, Brazil, Untrained, false, USA, 40, tall, 45",
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::NumericField {
                field: "height",
                value: "tall".to_string()
            }
        );
    }

    #[test]
    fn test_unrecognised_reserved_token_means_available() {
        for token in ["false", "FALSE", "yes", "1", ""] {
            assert!(!parse_reserved(token), "token {:?}", token);
        }
        assert!(parse_reserved("True"));

        let record = parse_intake(
            AnimalKind::Dog,
            "Rex, Lab, Male, 3, 25.5, 2022-05-01, USA, Trained, maybe, USA",
        )
        .expect("Unknown reserved token is not an error");
        assert!(!record.reserved);
    }

    #[test]
    fn test_text_fields_are_validated() {
        let err = parse_intake(
            AnimalKind::Dog,
            ", Lab, Male, 3, 25.5, 2022-05-01, USA, Trained, false, USA",
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingField { field: "name" });

        let err = parse_intake(
            AnimalKind::Dog,
            "Rex, , Male, 3, 25.5, 2022-05-01, USA, Trained, false, USA",
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingField { field: "breed" });

        let err = parse_intake(
            AnimalKind::Dog,
            "Rex, Lab, Unknown, 3, 25.5, 2022-05-01, USA, Trained, false, USA",
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField(ref e) if e.field == "gender"));

        let err = parse_intake(
            AnimalKind::Dog,
            "Rex, Lab, Male, 3, 25.5, 05/01/2022, USA, Trained, false, USA",
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::InvalidDate("05/01/2022".to_string()));

        let err = parse_intake(
            AnimalKind::Dog,
            "Rex, Lab, Male, 3, 25.5, 2022-05-01, USA, In service, false, USA",
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField(ref e) if e.field == "training status"));
    }

    #[tokio::test]
    async fn test_intake_inserts_valid_dog() {
        let (service, repositories) = setup_test().await;

        let stored = service
            .intake(AnimalKind::Dog, REX)
            .await
            .expect("Failed to intake dog");
        assert_eq!(stored.id, Some(1));

        let dogs = repositories.for_kind(AnimalKind::Dog).fetch_all().await.unwrap();
        assert_eq!(dogs.len(), 1);
        assert_eq!(dogs[0].id, stored.id);
        assert_eq!(dogs[0].name, "Rex");
        assert!(!dogs[0].reserved);
    }

    #[tokio::test]
    async fn test_invalid_intake_inserts_nothing() {
        let (service, repositories) = setup_test().await;

        let short_monkey = "Bingo, Capuchin, Female, 4, 7.2, 2021-03-14, Brazil, Untrained, false, USA";
        let err = service.intake(AnimalKind::Monkey, short_monkey).await.unwrap_err();
        assert!(err.is_validation());

        let bad_age = "Rex, Lab, Male, old, 25.5, 2022-05-01, USA, Trained, false, USA";
        let err = service.intake(AnimalKind::Dog, bad_age).await.unwrap_err();
        assert!(matches!(
            err,
            RescueError::Validation(ValidationError::NumericField { field: "age", .. })
        ));

        for kind in AnimalKind::ALL {
            assert!(repositories.for_kind(kind).fetch_all().await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_duplicate_intake_is_reported() {
        let (service, repositories) = setup_test().await;
        service.intake(AnimalKind::Dog, REX).await.unwrap();

        let err = service.intake(AnimalKind::Dog, REX).await.unwrap_err();
        assert!(matches!(err, RescueError::DuplicateName { .. }));
        assert_eq!(
            repositories.for_kind(AnimalKind::Dog).fetch_all().await.unwrap().len(),
            1
        );
    }
}

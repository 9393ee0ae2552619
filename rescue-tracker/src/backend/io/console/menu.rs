use shared::{AnimalKind, ReservationState};
use std::io::{self, Write};
use std::ops::ControlFlow;
use tracing::{error, info};

use super::input::InputProvider;
use super::render::{render_queue, render_records};
use crate::backend::domain::intake_service::intake_format;
use crate::backend::domain::{RescueError, ValidationError};
use crate::backend::AppState;

const MENU: &str = "\
\t\t\t\tRescue Animal System Menu
[1] Intake a new dog
[2] Intake a new monkey
[3] Reserve an animal
[4] Release a reserved animal
[5] Print a list of all dogs
[6] Print a list of all monkeys
[7] Print a list of all that are not reserved
[8] Queue an animal for training
[9] Train the next animal in the queue
[q] Quit application
";

const STORAGE_FAILURE: &str = "The operation could not be completed because of a storage error.";

/// One entry of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSelection {
    Intake(AnimalKind),
    Reserve,
    Release,
    List(AnimalKind),
    ListAvailable,
    QueueTraining,
    TrainNext,
    Quit,
}

impl MenuSelection {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "1" => Some(MenuSelection::Intake(AnimalKind::Dog)),
            "2" => Some(MenuSelection::Intake(AnimalKind::Monkey)),
            "3" => Some(MenuSelection::Reserve),
            "4" => Some(MenuSelection::Release),
            "5" => Some(MenuSelection::List(AnimalKind::Dog)),
            "6" => Some(MenuSelection::List(AnimalKind::Monkey)),
            "7" => Some(MenuSelection::ListAvailable),
            "8" => Some(MenuSelection::QueueTraining),
            "9" => Some(MenuSelection::TrainNext),
            "q" | "quit" => Some(MenuSelection::Quit),
            _ => None,
        }
    }
}

/// Drives the console session: shows the menu, reads a selection, runs it,
/// and repeats until the operator quits or input ends.
pub struct MenuController<I, W> {
    state: AppState,
    input: I,
    output: W,
}

impl<I, W> MenuController<I, W>
where
    I: InputProvider,
    W: Write,
{
    pub fn new(state: AppState, input: I, output: W) -> Self {
        Self {
            state,
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub async fn run(&mut self) -> io::Result<()> {
        loop {
            write!(self.output, "\n\n{}\n", MENU)?;

            let Some(line) = self.prompt("Enter a menu selection: ").await? else {
                info!("Input closed, leaving menu");
                break;
            };

            match MenuSelection::parse(&line) {
                Some(selection) => {
                    if self.dispatch(selection).await?.is_break() {
                        break;
                    }
                }
                None => writeln!(self.output, "Invalid selection. Please try again.")?,
            }
        }

        self.output.flush()
    }

    async fn dispatch(&mut self, selection: MenuSelection) -> io::Result<ControlFlow<()>> {
        info!("Menu selection: {:?}", selection);
        match selection {
            MenuSelection::Quit => {
                writeln!(self.output, "Quitting application.")?;
                return Ok(ControlFlow::Break(()));
            }
            MenuSelection::Intake(kind) => self.intake(kind).await?,
            MenuSelection::Reserve => self.change_reservation(ReservationState::Reserved).await?,
            MenuSelection::Release => self.change_reservation(ReservationState::Available).await?,
            MenuSelection::List(kind) => self.print_all(kind).await?,
            MenuSelection::ListAvailable => self.print_available().await?,
            MenuSelection::QueueTraining => self.queue_for_training().await?,
            MenuSelection::TrainNext => self.train_next().await?,
        }
        Ok(ControlFlow::Continue(()))
    }

    async fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        Ok(self
            .input
            .read_line()
            .await?
            .map(|line| line.trim().to_string()))
    }

    async fn prompt_kind(&mut self) -> io::Result<Option<AnimalKind>> {
        let Some(line) = self.prompt("Animal type [dog/monkey]: ").await? else {
            return Ok(None);
        };

        match line.parse::<AnimalKind>() {
            Ok(kind) => Ok(Some(kind)),
            Err(e) => {
                self.report(&ValidationError::from(e).into())?;
                Ok(None)
            }
        }
    }

    async fn intake(&mut self, kind: AnimalKind) -> io::Result<()> {
        writeln!(self.output, "\nEnter {} information", kind)?;
        writeln!(self.output, "Format: {}", intake_format(kind))?;
        writeln!(self.output, "Leave the line empty to return to the menu.\n")?;

        loop {
            let Some(line) = self.prompt("Input: ").await? else {
                return Ok(());
            };
            if line.is_empty() {
                return writeln!(self.output, "Intake cancelled.");
            }

            match self.state.intake_service.intake(kind, &line).await {
                Ok(record) => {
                    return match record.id {
                        Some(id) => {
                            writeln!(self.output, "Added {} '{}' with ID {}.", kind, record.name, id)
                        }
                        None => writeln!(self.output, "Added {} '{}'.", kind, record.name),
                    };
                }
                Err(err) if err.is_validation() => {
                    self.report(&err)?;
                    writeln!(self.output, "Please try again.")?;
                }
                Err(err) => return self.report(&err),
            }
        }
    }

    async fn change_reservation(&mut self, target: ReservationState) -> io::Result<()> {
        let Some(kind) = self.prompt_kind().await? else {
            return Ok(());
        };

        let service = &self.state.reservation_service;
        let candidates = match target {
            ReservationState::Reserved => service.list_reservable(kind).await,
            ReservationState::Available => service.list_releasable(kind).await,
        };
        let candidates = match candidates {
            Ok(candidates) => candidates,
            Err(err) => return self.report(&err),
        };

        if candidates.is_empty() {
            let state = match target {
                ReservationState::Reserved => "available to reserve",
                ReservationState::Available => "reserved",
            };
            return writeln!(self.output, "No {} are currently {}.", kind.plural(), state);
        }

        writeln!(self.output, "\n{}", render_records(kind, &candidates))?;
        let Some(line) = self.prompt("Enter the ID: ").await? else {
            return Ok(());
        };
        let id = match line.parse::<i64>() {
            Ok(id) => id,
            Err(_) => return self.report(&ValidationError::InvalidId(line).into()),
        };

        let service = &self.state.reservation_service;
        let result = match target {
            ReservationState::Reserved => service.reserve(kind, id).await,
            ReservationState::Available => service.unreserve(kind, id).await,
        };
        match result {
            Ok(record) => writeln!(self.output, "{} (ID {}) is now {}.", record.name, id, target),
            Err(err) => self.report(&err),
        }
    }

    async fn print_all(&mut self, kind: AnimalKind) -> io::Result<()> {
        match self.state.inventory_service.list(kind).await {
            Ok(records) if records.is_empty() => {
                writeln!(self.output, "No {} on record.", kind.plural())
            }
            Ok(records) => writeln!(self.output, "\n{}", render_records(kind, &records)),
            Err(err) => self.report(&err),
        }
    }

    async fn print_available(&mut self) -> io::Result<()> {
        let available = match self.state.inventory_service.list_available().await {
            Ok(available) => available,
            Err(err) => return self.report(&err),
        };
        if available.is_empty() {
            return writeln!(self.output, "No animals are currently available.");
        }

        for kind in AnimalKind::ALL {
            let records = available.of_kind(kind);
            writeln!(self.output, "\n === Available {} === ", kind.plural())?;
            if records.is_empty() {
                writeln!(self.output, "None")?;
            } else {
                write!(self.output, "{}", render_records(kind, records))?;
            }
        }
        Ok(())
    }

    async fn queue_for_training(&mut self) -> io::Result<()> {
        let Some(kind) = self.prompt_kind().await? else {
            return Ok(());
        };
        let Some(name) = self.prompt("Name: ").await? else {
            return Ok(());
        };

        match self.state.training_service.enqueue(kind, &name).await {
            Ok(record) => {
                writeln!(
                    self.output,
                    "{} is waiting for training (position {}).",
                    record.name,
                    self.state.training_service.len()
                )?;
                write!(self.output, "{}", render_queue(self.state.training_service.pending()))
            }
            Err(err) => self.report(&err),
        }
    }

    async fn train_next(&mut self) -> io::Result<()> {
        let Some(next) = self.state.training_service.peek().cloned() else {
            return writeln!(self.output, "No animals are waiting for training.");
        };

        writeln!(self.output, "Next up: {} '{}'.", next.kind, next.name)?;
        let Some(answer) = self
            .prompt("Train now? [y]es, [s]kip, anything else to go back: ")
            .await?
        else {
            return Ok(());
        };

        match answer.to_ascii_lowercase().as_str() {
            "y" | "yes" => match self.state.training_service.train_next().await {
                Ok(Some(record)) => {
                    writeln!(self.output, "{} is now {}.", record.name, record.training_status)
                }
                Ok(None) => writeln!(self.output, "No animals are waiting for training."),
                Err(err) => self.report(&err),
            },
            "s" | "skip" => {
                if let Some(skipped) = self.state.training_service.skip_next() {
                    writeln!(self.output, "Skipped {}.", skipped.name)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn report(&mut self, err: &RescueError) -> io::Result<()> {
        match err {
            RescueError::Persistence(source) => {
                error!("Storage operation failed: {:?}", source);
                writeln!(self.output, "{}", STORAGE_FAILURE)
            }
            other => {
                info!("Operation rejected: {}", other);
                writeln!(self.output, "{}", other)
            }
        }
    }
}

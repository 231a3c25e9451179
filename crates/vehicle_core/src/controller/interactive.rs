//! Orchestrating controller for interactive front ends.
//!
//! # Responsibility
//! - Drive one menu action per call: pull input from a presenter, run the
//!   operation through `VehicleController`, push the result back.
//! - Dispatch `action:payload` commands sent by an embedded web front end.
//!
//! # Invariants
//! - Errors are rendered as messages; nothing is returned as `Err`.
//! - Service semantics are exactly those of `VehicleController`.

use crate::controller::input::{parse_vehicle_id, ValidationError, VehicleInput};
use crate::controller::vehicle_controller::{CatalogError, ErrorCategory, VehicleController};
use crate::model::vehicle::{Vehicle, VehicleId};
use crate::repo::vehicle_repo::VehicleRepository;
use percent_encoding::percent_decode_str;
use serde::Serialize;

/// Severity of a message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

/// Input/output capability of an interactive front end.
///
/// `read_*` methods return `None` when the user cancelled the prompt.
pub trait VehiclePresenter {
    fn read_vehicle_input(&mut self) -> Option<VehicleInput>;
    /// Prompts for changes to `existing`; blank fields mean "keep".
    fn read_vehicle_update(&mut self, existing: &Vehicle) -> Option<VehicleInput>;
    fn read_vehicle_id(&mut self) -> Option<String>;
    fn show_vehicle(&mut self, vehicle: &Vehicle);
    fn show_vehicles(&mut self, vehicles: &[Vehicle]);
    fn show_message(&mut self, kind: MessageKind, message: &str);
}

/// How an interactive action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    Completed,
    Cancelled,
    Failed(ErrorCategory),
}

/// Command sent over the web front end's status channel.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogCommand {
    Add(Vehicle),
    Update(Vehicle),
    Delete(VehicleId),
    List,
}

impl CatalogCommand {
    /// Parses `action:payload`. Payloads are form-encoded JSON vehicles for
    /// add/update and a plain id for delete.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let (action, payload) = raw.split_once(':').unwrap_or((raw, ""));
        match action.trim() {
            "addVehicle" => Ok(Self::Add(decode_vehicle(payload)?)),
            "updateVehicle" => Ok(Self::Update(decode_vehicle(payload)?)),
            "deleteVehicle" => Ok(Self::Delete(parse_vehicle_id(payload)?)),
            "listVehicles" => Ok(Self::List),
            other => Err(ValidationError::UnknownCommand(other.to_string())),
        }
    }
}

/// Toast-style reply for the web front end, carrying the refreshed list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionResponse {
    /// Whether the requested action itself succeeded.
    pub ok: bool,
    pub kind: MessageKind,
    pub message: String,
    /// Current catalog after the action; empty when the refresh failed.
    pub vehicles: Vec<Vehicle>,
    /// Set when the action succeeded but reloading the catalog did not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_error: Option<String>,
}

/// Presenter-driven wrapper around a `VehicleController`.
pub struct InteractiveController<'c, R: VehicleRepository> {
    controller: &'c VehicleController<R>,
}

impl<'c, R: VehicleRepository> InteractiveController<'c, R> {
    pub fn new(controller: &'c VehicleController<R>) -> Self {
        Self { controller }
    }

    pub fn add_vehicle(&self, presenter: &mut impl VehiclePresenter) -> FlowOutcome {
        let Some(input) = presenter.read_vehicle_input() else {
            return FlowOutcome::Cancelled;
        };

        match self.controller.add_vehicle_from_input(&input) {
            Ok(saved) => {
                let message = match saved.id() {
                    Some(id) => format!("Vehicle added successfully with ID: {id}"),
                    None => "Vehicle added successfully.".to_string(),
                };
                presenter.show_message(MessageKind::Success, &message);
                FlowOutcome::Completed
            }
            Err(err) => fail(presenter, "Error adding vehicle", &err),
        }
    }

    pub fn list_vehicles(&self, presenter: &mut impl VehiclePresenter) -> FlowOutcome {
        match self.controller.list_vehicles() {
            Ok(vehicles) if vehicles.is_empty() => {
                presenter.show_message(MessageKind::Info, "No vehicles found.");
                FlowOutcome::Completed
            }
            Ok(vehicles) => {
                presenter.show_vehicles(&vehicles);
                FlowOutcome::Completed
            }
            Err(err) => fail(presenter, "Error fetching vehicles", &err),
        }
    }

    pub fn find_vehicle(&self, presenter: &mut impl VehiclePresenter) -> FlowOutcome {
        let id = match read_id(presenter) {
            Ok(Some(id)) => id,
            Ok(None) => return FlowOutcome::Cancelled,
            Err(err) => return fail(presenter, "Error finding vehicle", &err),
        };

        match self.controller.find_vehicle(id) {
            Ok(Some(vehicle)) => {
                presenter.show_vehicle(&vehicle);
                FlowOutcome::Completed
            }
            Ok(None) => {
                presenter.show_message(MessageKind::Info, "Vehicle not found.");
                FlowOutcome::Completed
            }
            Err(err) => fail(presenter, "Error finding vehicle", &err),
        }
    }

    pub fn update_vehicle(&self, presenter: &mut impl VehiclePresenter) -> FlowOutcome {
        let (id, existing) = match self.lookup(presenter, "Error updating vehicle") {
            Ok(Some(found)) => found,
            Ok(None) => return FlowOutcome::Cancelled,
            Err(outcome) => return outcome,
        };

        let Some(input) = presenter.read_vehicle_update(&existing) else {
            return FlowOutcome::Cancelled;
        };
        let data = match input.merge_into(existing.data()) {
            Ok(data) => data,
            Err(err) => {
                return fail(presenter, "Error updating vehicle", &CatalogError::from(err));
            }
        };

        match self.controller.update_vehicle(Vehicle::persisted(id, data)) {
            Ok(_) => {
                presenter.show_message(MessageKind::Success, "Vehicle updated successfully.");
                FlowOutcome::Completed
            }
            Err(err) => fail(presenter, "Error updating vehicle", &err),
        }
    }

    pub fn delete_vehicle(&self, presenter: &mut impl VehiclePresenter) -> FlowOutcome {
        let id = match self.lookup(presenter, "Error deleting vehicle") {
            Ok(Some((id, _))) => id,
            Ok(None) => return FlowOutcome::Cancelled,
            Err(outcome) => return outcome,
        };

        match self.controller.delete_vehicle(id) {
            Ok(_) => {
                presenter.show_message(MessageKind::Success, "Vehicle deleted successfully.");
                FlowOutcome::Completed
            }
            Err(err) => fail(presenter, "Error deleting vehicle", &err),
        }
    }

    /// Parses and runs one web front end command.
    pub fn handle_command(&self, raw: &str) -> ActionResponse {
        let command = match CatalogCommand::parse(raw) {
            Ok(command) => command,
            Err(err) => return self.respond_error("Error", &CatalogError::from(err)),
        };
        self.dispatch(command)
    }

    pub fn dispatch(&self, command: CatalogCommand) -> ActionResponse {
        match command {
            CatalogCommand::Add(vehicle) => {
                match self.controller.add_vehicle(vehicle.into_data()) {
                    Ok(_) => self.respond_ok("Vehicle added successfully!"),
                    Err(err) => self.respond_error("Error adding vehicle", &err),
                }
            }
            CatalogCommand::Update(vehicle) => match self.controller.update_vehicle(vehicle) {
                Ok(_) => self.respond_ok("Vehicle updated successfully!"),
                Err(err) => self.respond_error("Error updating vehicle", &err),
            },
            CatalogCommand::Delete(id) => match self.controller.delete_vehicle(id) {
                Ok(_) => self.respond_ok("Vehicle deleted successfully!"),
                Err(err) => self.respond_error("Error deleting vehicle", &err),
            },
            CatalogCommand::List => match self.controller.list_vehicles() {
                Ok(vehicles) => ActionResponse {
                    ok: true,
                    kind: MessageKind::Info,
                    message: format!("Loaded {} vehicle(s).", vehicles.len()),
                    vehicles,
                    refresh_error: None,
                },
                Err(err) => self.respond_error("Error loading vehicles", &err),
            },
        }
    }

    /// Prompts for an id and loads the vehicle; reports a missing one.
    fn lookup(
        &self,
        presenter: &mut impl VehiclePresenter,
        context: &str,
    ) -> Result<Option<(VehicleId, Vehicle)>, FlowOutcome> {
        let id = match read_id(presenter) {
            Ok(Some(id)) => id,
            Ok(None) => return Ok(None),
            Err(err) => return Err(fail(presenter, context, &err)),
        };

        match self.controller.find_vehicle(id) {
            Ok(Some(vehicle)) => Ok(Some((id, vehicle))),
            Ok(None) => {
                presenter.show_message(MessageKind::Error, "Vehicle not found.");
                Err(FlowOutcome::Failed(ErrorCategory::NotFound))
            }
            Err(err) => Err(fail(presenter, context, &err)),
        }
    }

    fn respond_ok(&self, message: &str) -> ActionResponse {
        match self.controller.list_vehicles() {
            Ok(vehicles) => ActionResponse {
                ok: true,
                kind: MessageKind::Success,
                message: message.to_string(),
                vehicles,
                refresh_error: None,
            },
            Err(err) => ActionResponse {
                ok: true,
                kind: MessageKind::Success,
                message: message.to_string(),
                vehicles: Vec::new(),
                refresh_error: Some(format!("Error loading vehicles: {err}")),
            },
        }
    }

    fn respond_error(&self, context: &str, err: &CatalogError) -> ActionResponse {
        ActionResponse {
            ok: false,
            kind: MessageKind::Error,
            message: format!("{context}: {err}"),
            vehicles: self.controller.list_vehicles().unwrap_or_default(),
            refresh_error: None,
        }
    }
}

fn read_id(presenter: &mut impl VehiclePresenter) -> Result<Option<VehicleId>, CatalogError> {
    match presenter.read_vehicle_id() {
        Some(raw) => Ok(Some(parse_vehicle_id(&raw)?)),
        None => Ok(None),
    }
}

fn fail(
    presenter: &mut impl VehiclePresenter,
    context: &str,
    err: &CatalogError,
) -> FlowOutcome {
    presenter.show_message(MessageKind::Error, &format!("{context}: {err}"));
    FlowOutcome::Failed(err.category())
}

/// Decodes a form-encoded JSON vehicle. `+` stands for a space.
fn decode_vehicle(payload: &str) -> Result<Vehicle, ValidationError> {
    let payload = payload.replace('+', " ");
    let json = percent_decode_str(&payload)
        .decode_utf8()
        .map_err(|err| ValidationError::MalformedPayload(err.to_string()))?;
    serde_json::from_str(&json).map_err(|err| ValidationError::MalformedPayload(err.to_string()))
}
